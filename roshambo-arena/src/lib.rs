//! Roshambo Arena - threaded round-robin tournament core
//!
//! One orchestrator drives a deterministic round-robin schedule over N
//! long-lived player workers, each on its own thread:
//! - per-player counting wake signals, so a wake is never lost
//! - a rendezvous sized to exactly two move submissions before any
//!   round is scored
//! - a single lock over all mutable shared match state
//! - cooperative one-shot cancellation that unblocks every waiter
//!
//! The arena emits structured [`ArenaEvent`]s; rendering them is the
//! caller's business.

mod arena;
mod cancel;
mod config;
mod error;
mod events;
mod orchestrator;
mod signal;
mod standings;
mod state;
mod worker;

pub use arena::Arena;
pub use cancel::CancelToken;
pub use config::{ArenaConfig, MAX_PLAYERS, MIN_PLAYERS};
pub use error::ArenaError;
pub use events::{ArenaEvent, EventSink, NullSink};
pub use standings::{Standing, TournamentReport};
pub use worker::{FixedPicker, MovePicker, RandomPicker};
