//! Tournament configuration

use std::time::Duration;

use crate::error::ArenaError;

/// Smallest roster that yields a schedule
pub const MIN_PLAYERS: usize = 2;

/// Fixed roster capacity
pub const MAX_PLAYERS: usize = 10;

/// Configuration for one tournament run
#[derive(Clone, Debug)]
pub struct ArenaConfig {
    /// Number of players (2..=10)
    pub players: usize,
    /// Pause between rounds, for watchability; zero skips the pause
    pub round_delay: Duration,
    /// Base seed for move generation (None = entropy from start time
    /// and process id)
    pub seed: Option<u64>,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            players: 4,
            round_delay: Duration::ZERO,
            seed: None,
        }
    }
}

impl ArenaConfig {
    /// Config for a roster of the given size
    pub fn new(players: usize) -> Self {
        Self {
            players,
            ..Default::default()
        }
    }

    /// Set a base seed for reproducible move generation
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the pause between rounds
    pub fn with_round_delay(mut self, delay: Duration) -> Self {
        self.round_delay = delay;
        self
    }

    /// Reject out-of-range rosters before any thread is spawned
    pub fn validate(&self) -> Result<(), ArenaError> {
        if self.players < MIN_PLAYERS || self.players > MAX_PLAYERS {
            return Err(ArenaError::RosterSize(self.players));
        }
        Ok(())
    }

    /// Length of the full round-robin schedule
    pub fn rounds_total(&self) -> usize {
        self.players * (self.players - 1) / 2
    }
}
