//! Shared match state
//!
//! Single source of truth for the pairing in flight, per-player pending
//! moves, scores, and the termination flag. One mutex guards all of it;
//! every critical section is O(1) and never blocks while held.
//!
//! The method surface enforces the writer discipline instead of trusting
//! convention: workers can register, read their own wake disposition, and
//! write their own move slot; only the orchestrator opens and closes
//! rounds, scores them, and terminates the tournament.

use std::sync::{Mutex, MutexGuard};

use roshambo_core::{points, Move, Outcome};

/// What a worker should do after a wake-up
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WakeAction {
    /// Tournament over; leave the loop
    Exit,
    /// Not a participant of the current pairing (bookkeeping wake);
    /// keep waiting
    Ignore,
    /// Selected for the current round; submit a move
    Play,
}

#[derive(Debug)]
struct StateInner {
    /// Last submitted move per player; written once and taken once per round
    pending: Vec<Option<Move>>,
    /// Cumulative scores, mutated only by the orchestrator
    scores: Vec<u32>,
    /// The two ids eligible to act; None outside an active round
    current_pair: Option<(usize, usize)>,
    /// Readiness gate, incremented once per worker at startup
    registered: usize,
    rounds_completed: usize,
    rounds_total: usize,
    /// Set exactly once, never unset
    terminated: bool,
}

pub struct MatchState {
    inner: Mutex<StateInner>,
}

impl MatchState {
    pub fn new(players: usize, rounds_total: usize) -> Self {
        Self {
            inner: Mutex::new(StateInner {
                pending: vec![None; players],
                scores: vec![0; players],
                current_pair: None,
                registered: 0,
                rounds_completed: 0,
                rounds_total,
                terminated: false,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, StateInner> {
        self.inner.lock().unwrap()
    }

    /// Count a worker in; returns the new registered total
    pub fn register(&self) -> usize {
        let mut state = self.lock();
        state.registered += 1;
        state.registered
    }

    pub fn registered(&self) -> usize {
        self.lock().registered
    }

    /// Combined post-wake check, under one lock acquisition: termination
    /// wins over everything, then participation in the current pairing.
    pub fn on_wake(&self, id: usize) -> WakeAction {
        let state = self.lock();
        if state.terminated {
            WakeAction::Exit
        } else if matches!(state.current_pair, Some((a, b)) if a == id || b == id) {
            WakeAction::Play
        } else {
            WakeAction::Ignore
        }
    }

    /// Record `id`'s move for the round in flight. A worker only ever
    /// writes its own slot.
    pub fn submit_move(&self, id: usize, mv: Move) {
        let mut state = self.lock();
        debug_assert!(
            matches!(state.current_pair, Some((a, b)) if a == id || b == id),
            "move submitted by a non-participant"
        );
        state.pending[id] = Some(mv);
    }

    /// Publish the pairing for the next round and clear both move slots.
    /// Returns the 1-based round number.
    pub fn open_round(&self, first: usize, second: usize) -> usize {
        let mut state = self.lock();
        debug_assert!(state.current_pair.is_none(), "previous round still open");
        state.pending[first] = None;
        state.pending[second] = None;
        state.current_pair = Some((first, second));
        state.rounds_completed += 1;
        state.rounds_completed
    }

    /// Take both submitted moves. Returns None if either slot is empty,
    /// which the caller treats as a protocol violation.
    pub fn collect_moves(&self, first: usize, second: usize) -> Option<(Move, Move)> {
        let mut state = self.lock();
        match (state.pending[first].take(), state.pending[second].take()) {
            (Some(a), Some(b)) => Some((a, b)),
            _ => None,
        }
    }

    /// Apply the point split for the round's outcome
    pub fn apply_outcome(&self, first: usize, second: usize, outcome: Outcome) {
        let (first_points, second_points) = points(outcome);
        let mut state = self.lock();
        state.scores[first] += first_points;
        state.scores[second] += second_points;
    }

    /// Retire the pairing; no round is in flight afterwards
    pub fn close_round(&self) {
        self.lock().current_pair = None;
    }

    /// Raise the termination flag. One-way.
    pub fn terminate(&self) {
        self.lock().terminated = true;
    }

    pub fn is_terminated(&self) -> bool {
        self.lock().terminated
    }

    pub fn scores(&self) -> Vec<u32> {
        self.lock().scores.clone()
    }

    /// (rounds completed, rounds total)
    pub fn progress(&self) -> (usize, usize) {
        let state = self.lock();
        (state.rounds_completed, state.rounds_total)
    }
}
