//! Player workers
//!
//! A worker registers once, then loops: block on its private wake signal,
//! re-check the world, act only when it is one of the two selected
//! players. It tolerates spurious wakes (the shutdown broadcast reaches
//! everyone, selected or not) and exits the moment it observes
//! termination.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use crossbeam_channel::{Receiver, Sender};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use roshambo_core::Move;

use crate::events::{ArenaEvent, EventSink};
use crate::signal::Wake;
use crate::state::{MatchState, WakeAction};

/// Source of moves for one player
pub trait MovePicker: Send {
    fn pick(&mut self) -> Move;
}

/// Uniform random picker with a worker-private generator
pub struct RandomPicker {
    rng: ChaCha8Rng,
}

impl RandomPicker {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Picker for a given worker id. The base seed comes from start time
    /// and process id unless the caller pins one; either way it is mixed
    /// with the id so no two workers share a stream.
    pub fn for_worker(base_seed: Option<u64>, id: usize) -> Self {
        let base = base_seed.unwrap_or_else(entropy_seed);
        Self::new(mix(base, id as u64))
    }
}

impl MovePicker for RandomPicker {
    fn pick(&mut self) -> Move {
        Move::ALL[self.rng.gen_range(0..Move::ALL.len())]
    }
}

/// Picker that always plays the same move
pub struct FixedPicker(pub Move);

impl MovePicker for FixedPicker {
    fn pick(&mut self) -> Move {
        self.0
    }
}

fn entropy_seed() -> u64 {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0x5EED);
    nanos ^ ((std::process::id() as u64) << 32)
}

/// SplitMix64 finalizer; decorrelates per-worker seeds that differ only
/// in the id
fn mix(seed: u64, salt: u64) -> u64 {
    let mut z = seed.wrapping_add(salt.wrapping_mul(0x9E37_79B9_7F4A_7C15));
    z ^= z >> 30;
    z = z.wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z ^= z >> 27;
    z = z.wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// One player's thread body
pub struct PlayerWorker {
    id: usize,
    state: Arc<MatchState>,
    sink: Arc<dyn EventSink>,
    picker: Box<dyn MovePicker>,
    wake_rx: Receiver<Wake>,
    turn_tx: Sender<usize>,
    ready_tx: Sender<usize>,
}

impl PlayerWorker {
    pub fn new(
        id: usize,
        state: Arc<MatchState>,
        sink: Arc<dyn EventSink>,
        picker: Box<dyn MovePicker>,
        wake_rx: Receiver<Wake>,
        turn_tx: Sender<usize>,
        ready_tx: Sender<usize>,
    ) -> Self {
        Self {
            id,
            state,
            sink,
            picker,
            wake_rx,
            turn_tx,
            ready_tx,
        }
    }

    /// Register, then wait / play / signal until termination
    pub fn run(mut self) {
        self.state.register();
        self.sink.emit(&ArenaEvent::Registered { id: self.id });
        // The readiness notification goes out after the event, so every
        // `Registered` is visible before the orchestrator opens a round.
        let _ = self.ready_tx.send(self.id);
        tracing::debug!(id = self.id, "worker registered");

        loop {
            if self.wake_rx.recv().is_err() {
                // Wake sender gone: the orchestrator has torn down, there
                // is nothing left to wait for.
                break;
            }
            match self.state.on_wake(self.id) {
                WakeAction::Exit => break,
                WakeAction::Ignore => {
                    tracing::debug!(id = self.id, "spurious wake");
                    continue;
                }
                WakeAction::Play => self.play_turn(),
            }
        }

        self.sink.emit(&ArenaEvent::WorkerDone { id: self.id });
        tracing::debug!(id = self.id, "worker done");
    }

    fn play_turn(&mut self) {
        let mv = self.picker.pick();
        self.state.submit_move(self.id, mv);
        self.sink.emit(&ArenaEvent::MoveMade { id: self.id, mv });
        // Completion signal last: once it is sent the orchestrator may
        // collect and score the round.
        let _ = self.turn_tx.send(self.id);
    }
}
