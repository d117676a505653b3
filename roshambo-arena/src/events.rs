//! Structured tournament events
//!
//! The arena reports everything observable through these events; it never
//! prints. Sinks must be cheap and non-blocking: emission happens on
//! worker and orchestrator threads, always outside the match-state lock.

use serde::Serialize;

use roshambo_core::{Move, Outcome};

use crate::standings::Standing;

/// One observable tournament occurrence
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ArenaEvent {
    /// A player worker has registered
    Registered { id: usize },
    /// A pairing was published and both participants are being woken
    RoundStarted {
        round: usize,
        total: usize,
        first: usize,
        second: usize,
    },
    /// A participant submitted its move
    MoveMade {
        id: usize,
        #[serde(rename = "move")]
        mv: Move,
    },
    /// Both moves are in and the round has been scored
    RoundResult {
        first: usize,
        second: usize,
        first_move: Move,
        second_move: Move,
        outcome: Outcome,
    },
    /// A worker observed termination and left its loop
    WorkerDone { id: usize },
    /// Ranked final scores, emitted once after every worker has been joined
    FinalStandings { standings: Vec<Standing> },
}

/// Consumer of the event stream
pub trait EventSink: Send + Sync {
    fn emit(&self, event: &ArenaEvent);
}

/// Sink that discards every event
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&self, _event: &ArenaEvent) {}
}
