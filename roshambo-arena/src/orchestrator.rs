//! Tournament orchestration
//!
//! Drives the deterministic round-robin schedule: wait for the full
//! roster, then for each pair publish the pairing, wake exactly the two
//! participants, wait for exactly two completion signals, score, move on.
//! Every exit path (completion, cancellation, a protocol error) ends
//! with the termination flag raised and a wake-all, so no worker is
//! ever left blocked.

use std::sync::Arc;
use std::thread;

use crossbeam_channel::{select, Receiver};

use roshambo_core::duel;

use crate::cancel::CancelToken;
use crate::config::ArenaConfig;
use crate::error::ArenaError;
use crate::events::{ArenaEvent, EventSink};
use crate::signal::WakeBoard;
use crate::state::MatchState;

/// All unordered pairs (i, j) with i < j, in canonical schedule order
pub fn round_robin_pairings(n: usize) -> Vec<(usize, usize)> {
    let mut pairings = Vec::new();
    for i in 0..n {
        for j in (i + 1)..n {
            pairings.push((i, j));
        }
    }
    pairings
}

pub struct Orchestrator {
    config: ArenaConfig,
    state: Arc<MatchState>,
    sink: Arc<dyn EventSink>,
    wakes: WakeBoard,
    turn_rx: Receiver<usize>,
    ready_rx: Receiver<usize>,
}

impl Orchestrator {
    pub fn new(
        config: ArenaConfig,
        state: Arc<MatchState>,
        sink: Arc<dyn EventSink>,
        wakes: WakeBoard,
        turn_rx: Receiver<usize>,
        ready_rx: Receiver<usize>,
    ) -> Self {
        Self {
            config,
            state,
            sink,
            wakes,
            turn_rx,
            ready_rx,
        }
    }

    /// Run the schedule to completion or cancellation. Returns whether
    /// the run was cancelled. Termination propagation to the workers
    /// happens here and only here, on every path.
    pub fn run(&self, token: &CancelToken) -> Result<bool, ArenaError> {
        let result = self.drive(token);
        self.finish();
        result
    }

    fn drive(&self, token: &CancelToken) -> Result<bool, ArenaError> {
        if !self.await_registration(token)? {
            tracing::info!("interrupted during registration");
            return Ok(true);
        }
        tracing::info!(players = self.config.players, "all players registered");

        let pairings = round_robin_pairings(self.config.players);
        let total = pairings.len();
        for (first, second) in pairings {
            // Cancellation stops the schedule, never a round in flight.
            if token.is_cancelled() {
                return Ok(true);
            }
            self.play_round(first, second, total)?;
            if !self.config.round_delay.is_zero() {
                thread::sleep(self.config.round_delay);
            }
        }
        Ok(false)
    }

    /// Block until every worker has registered, or until cancellation.
    /// Returns false if cancellation won the race. No timeout: a roster
    /// that never fills blocks here until cancelled.
    fn await_registration(&self, token: &CancelToken) -> Result<bool, ArenaError> {
        let mut ready = 0;
        while ready < self.config.players {
            select! {
                recv(self.ready_rx) -> msg => {
                    msg.map_err(|_| ArenaError::Desync)?;
                    ready += 1;
                }
                recv(token.closed()) -> _ => return Ok(false),
            }
        }
        debug_assert_eq!(self.state.registered(), self.config.players);
        Ok(true)
    }

    /// One full round, from pairing announcement to scored result
    fn play_round(&self, first: usize, second: usize, total: usize) -> Result<(), ArenaError> {
        let round = self.state.open_round(first, second);
        self.sink.emit(&ArenaEvent::RoundStarted {
            round,
            total,
            first,
            second,
        });

        // Wake exactly the two participants. A broadcast would invite
        // non-participants to act.
        self.wakes.wake(first);
        self.wakes.wake(second);

        // Rendezvous sized to two: one signal per submitted move. The
        // submission order between the two players is unspecified; the
        // outcome rule is symmetric so it does not matter.
        for _ in 0..2 {
            self.turn_rx.recv().map_err(|_| ArenaError::Desync)?;
        }

        let (first_move, second_move) = self
            .state
            .collect_moves(first, second)
            .ok_or(ArenaError::Desync)?;
        let outcome = duel::resolve(first_move, second_move);
        self.state.apply_outcome(first, second, outcome);
        self.state.close_round();

        self.sink.emit(&ArenaEvent::RoundResult {
            first,
            second,
            first_move,
            second_move,
            outcome,
        });
        tracing::debug!(round, first, second, ?outcome, "round scored");
        Ok(())
    }

    /// Terminal step: raise the flag, then wake everyone so even players
    /// that were never selected again observe it and exit.
    fn finish(&self) {
        self.state.terminate();
        self.wakes.wake_all();
        tracing::debug!(workers = self.wakes.len(), "termination broadcast");
    }
}
