//! Arena error taxonomy

use thiserror::Error;

use crate::config::{MAX_PLAYERS, MIN_PLAYERS};

/// Everything that can go wrong before or while a tournament runs.
///
/// Cancellation is not an error: a cancelled tournament still produces
/// a (partial) report through the normal return path.
#[derive(Debug, Error)]
pub enum ArenaError {
    /// Roster size outside the supported range
    #[error("roster size must be between {min} and {max} players, got {0}", min = MIN_PLAYERS, max = MAX_PLAYERS)]
    RosterSize(usize),

    /// Picker list does not line up with the roster
    #[error("expected {expected} move pickers, got {got}")]
    PickerCount { expected: usize, got: usize },

    /// A worker thread could not be spawned
    #[error("failed to spawn worker thread: {0}")]
    Spawn(#[from] std::io::Error),

    /// A worker hung up a channel the protocol still needed; only
    /// reachable if a worker thread dies outside its contract
    #[error("worker channel closed mid-protocol")]
    Desync,
}
