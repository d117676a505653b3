//! Event sinks and result formatting
//!
//! The arena emits structured events; everything human-readable happens
//! here. The file sink keeps its own lock so lines from concurrent
//! workers stay whole; it is a separate lock from anything in the
//! arena.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};

use roshambo_arena::{ArenaEvent, EventSink, Standing};
use roshambo_core::Outcome;

/// Render one event as a display line; None for events rendered
/// elsewhere (the standings get a table, not a line)
pub fn render(event: &ArenaEvent) -> Option<String> {
    match event {
        ArenaEvent::Registered { id } => Some(format!("[player {id}] registered")),
        ArenaEvent::RoundStarted {
            round,
            total,
            first,
            second,
        } => Some(format!(
            "\n--- round {round}/{total}: player {first} vs player {second} ---"
        )),
        ArenaEvent::MoveMade { id, mv } => Some(format!("[player {id}] plays {mv}")),
        ArenaEvent::RoundResult {
            first,
            second,
            outcome,
            ..
        } => Some(match outcome {
            Outcome::Draw => "draw (+1 each)".to_string(),
            Outcome::FirstWins => format!("player {first} wins (+2)"),
            Outcome::SecondWins => format!("player {second} wins (+2)"),
        }),
        ArenaEvent::WorkerDone { id } => Some(format!("[player {id}] finished")),
        ArenaEvent::FinalStandings { .. } => None,
    }
}

/// Ranked standings, one place per line
pub fn standings_table(standings: &[Standing]) -> String {
    let mut out = String::from("\n=== Final standings ===\n");
    for (place, standing) in standings.iter().enumerate() {
        out.push_str(&format!(
            "{}. player {} - {} points\n",
            place + 1,
            standing.id,
            standing.score
        ));
    }
    out
}

/// Prints events to stdout
pub struct ConsoleSink {
    /// Render the standings table at the end (off in JSON mode, where
    /// the report goes to stdout instead)
    with_standings: bool,
}

impl ConsoleSink {
    pub fn new(with_standings: bool) -> Self {
        Self { with_standings }
    }
}

impl EventSink for ConsoleSink {
    fn emit(&self, event: &ArenaEvent) {
        if let ArenaEvent::FinalStandings { standings } = event {
            if self.with_standings {
                print!("{}", standings_table(standings));
            }
            return;
        }
        if let Some(line) = render(event) {
            println!("{line}");
        }
    }
}

/// Mirrors every event line into a log file
pub struct FileSink {
    writer: Mutex<BufWriter<File>>,
}

impl FileSink {
    /// Create the log file and write the run header
    pub fn create(path: &Path, players: usize) -> Result<Self> {
        let file = File::create(path)
            .with_context(|| format!("failed to create log file {}", path.display()))?;
        let mut writer = BufWriter::new(file);
        writeln!(
            writer,
            "# roshambo tournament, {} players, started {}",
            players,
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
        )
        .with_context(|| format!("failed to write log header to {}", path.display()))?;
        Ok(Self {
            writer: Mutex::new(writer),
        })
    }
}

impl EventSink for FileSink {
    fn emit(&self, event: &ArenaEvent) {
        let text = match event {
            ArenaEvent::FinalStandings { standings } => standings_table(standings),
            other => match render(other) {
                Some(line) => format!("{line}\n"),
                None => return,
            },
        };
        let mut writer = self.writer.lock().unwrap();
        // Sinks are infallible by contract; a full disk loses log lines,
        // not the tournament. Flush per line so a cancelled run keeps
        // everything written so far.
        let _ = writer.write_all(text.as_bytes());
        let _ = writer.flush();
    }
}

/// Fans one event out to several sinks
pub struct TeeSink {
    sinks: Vec<Arc<dyn EventSink>>,
}

impl TeeSink {
    pub fn new(sinks: Vec<Arc<dyn EventSink>>) -> Self {
        Self { sinks }
    }
}

impl EventSink for TeeSink {
    fn emit(&self, event: &ArenaEvent) {
        for sink in &self.sinks {
            sink.emit(event);
        }
    }
}
