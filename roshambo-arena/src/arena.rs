//! Arena assembly
//!
//! Front door for a tournament run: validate the configuration, spawn
//! one worker thread per player, drive the schedule on the calling
//! thread, join every worker, then report.

use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam_channel::unbounded;

use crate::cancel::CancelToken;
use crate::config::ArenaConfig;
use crate::error::ArenaError;
use crate::events::{ArenaEvent, EventSink};
use crate::orchestrator::{round_robin_pairings, Orchestrator};
use crate::signal::WakeBoard;
use crate::standings::{compute_standings, TournamentReport};
use crate::state::MatchState;
use crate::worker::{MovePicker, PlayerWorker, RandomPicker};

/// A configured tournament, ready to run
pub struct Arena {
    config: ArenaConfig,
    pickers: Vec<Box<dyn MovePicker>>,
}

impl Arena {
    /// Arena with uniform random players
    pub fn new(config: ArenaConfig) -> Result<Self, ArenaError> {
        config.validate()?;
        let pickers = (0..config.players)
            .map(|id| Box::new(RandomPicker::for_worker(config.seed, id)) as Box<dyn MovePicker>)
            .collect();
        Ok(Self { config, pickers })
    }

    /// Arena with caller-supplied move pickers, one per player in id order
    pub fn with_pickers(
        config: ArenaConfig,
        pickers: Vec<Box<dyn MovePicker>>,
    ) -> Result<Self, ArenaError> {
        config.validate()?;
        if pickers.len() != config.players {
            return Err(ArenaError::PickerCount {
                expected: config.players,
                got: pickers.len(),
            });
        }
        Ok(Self { config, pickers })
    }

    /// Run the tournament. Worker threads are spawned at entry and all
    /// joined before the report (and the `FinalStandings` event) is
    /// produced, on success, cancellation, and error paths alike.
    pub fn run(
        self,
        sink: Arc<dyn EventSink>,
        token: &CancelToken,
    ) -> Result<TournamentReport, ArenaError> {
        let players = self.config.players;
        let rounds_total = round_robin_pairings(players).len();
        let state = Arc::new(MatchState::new(players, rounds_total));

        let (wakes, wake_receivers) = WakeBoard::new(players);
        let (turn_tx, turn_rx) = unbounded();
        let (ready_tx, ready_rx) = unbounded();

        // Spawn the full roster before the orchestrator starts waiting.
        let mut handles: Vec<JoinHandle<()>> = Vec::with_capacity(players);
        for (id, (picker, wake_rx)) in self.pickers.into_iter().zip(wake_receivers).enumerate() {
            let worker = PlayerWorker::new(
                id,
                Arc::clone(&state),
                Arc::clone(&sink),
                picker,
                wake_rx,
                turn_tx.clone(),
                ready_tx.clone(),
            );
            match thread::Builder::new()
                .name(format!("player-{id}"))
                .spawn(move || worker.run())
            {
                Ok(handle) => handles.push(handle),
                Err(err) => {
                    // Unblock and reap the workers spawned so far before
                    // surfacing the resource failure.
                    state.terminate();
                    wakes.wake_all();
                    join_all(handles);
                    return Err(ArenaError::Spawn(err));
                }
            }
        }

        // Only workers may hold sending ends from here on, so a dead
        // worker shows up as a channel disconnect instead of a hang.
        drop(turn_tx);
        drop(ready_tx);

        let orchestrator = Orchestrator::new(
            self.config.clone(),
            Arc::clone(&state),
            Arc::clone(&sink),
            wakes,
            turn_rx,
            ready_rx,
        );
        let outcome = orchestrator.run(token);

        // The orchestrator has raised the termination flag and woken
        // everyone on whichever path it took; the joins cannot hang.
        debug_assert!(state.is_terminated());
        join_all(handles);

        let cancelled = outcome?;
        let standings = compute_standings(&state.scores());
        sink.emit(&ArenaEvent::FinalStandings {
            standings: standings.clone(),
        });
        let (rounds_completed, rounds_total) = state.progress();
        Ok(TournamentReport {
            standings,
            rounds_completed,
            rounds_total,
            cancelled,
        })
    }
}

fn join_all(handles: Vec<JoinHandle<()>>) {
    for handle in handles {
        // A worker that panicked already surfaced as a protocol error;
        // the join itself only reaps the thread.
        let _ = handle.join();
    }
}
