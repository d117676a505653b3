//! Roshambo CLI - threaded rock-scissors-paper round-robin
//!
//! Each player runs on its own thread and is woken only for its own
//! matches; the orchestrator drives the schedule and scores rounds.
//! Ctrl-C ends the tournament early but cleanly: the round in flight
//! finishes, every worker exits, and partial standings are reported.

mod report;

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Parser;

use roshambo_arena::{
    Arena, ArenaConfig, CancelToken, EventSink, TournamentReport, MAX_PLAYERS, MIN_PLAYERS,
};

use crate::report::{ConsoleSink, FileSink, TeeSink};

#[derive(Parser)]
#[command(name = "roshambo")]
#[command(about = "Round-robin rock-scissors-paper tournament between player threads")]
struct Cli {
    /// Number of players
    #[arg(short = 'n', long, default_value_t = 4)]
    players: usize,

    /// Read the number of players from a file containing a single integer
    /// (overrides --players)
    #[arg(short = 'i', long, value_name = "FILE")]
    input: Option<PathBuf>,

    /// Mirror every event to a log file
    #[arg(short = 'o', long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Pause between rounds, in milliseconds
    #[arg(long, default_value_t = 0, value_name = "MS")]
    delay_ms: u64,

    /// Base seed for move generation (reproducible runs)
    #[arg(long)]
    seed: Option<u64>,

    /// Print the final report as JSON instead of a standings table
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let players = resolve_players(&cli)?;

    let token = CancelToken::new();
    {
        let token = token.clone();
        ctrlc::set_handler(move || {
            eprintln!("\ninterrupt received, finishing up...");
            token.cancel();
        })
        .context("failed to install interrupt handler")?;
    }

    println!("Rock-Scissors-Paper tournament with {players} players");
    println!("Press Ctrl+C to stop early");

    let sink = build_sink(&cli, players)?;

    let mut config = ArenaConfig::new(players)
        .with_round_delay(Duration::from_millis(cli.delay_ms));
    if let Some(seed) = cli.seed {
        config = config.with_seed(seed);
    }

    let arena = Arena::new(config)?;
    let report = arena.run(sink, &token)?;

    finish(&report, cli.json)
}

/// Roster size from the input file if given, else the flag. Out-of-range
/// or unreadable values are startup errors, raised before any thread
/// exists.
fn resolve_players(cli: &Cli) -> Result<usize> {
    let players = match &cli.input {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            text.trim()
                .parse::<usize>()
                .with_context(|| format!("{} does not contain a player count", path.display()))?
        }
        None => cli.players,
    };
    if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&players) {
        bail!("player count must be between {MIN_PLAYERS} and {MAX_PLAYERS}, got {players}");
    }
    Ok(players)
}

fn build_sink(cli: &Cli, players: usize) -> Result<Arc<dyn EventSink>> {
    let console: Arc<dyn EventSink> = Arc::new(ConsoleSink::new(!cli.json));
    Ok(match &cli.output {
        Some(path) => {
            let file = FileSink::create(path, players)?;
            Arc::new(TeeSink::new(vec![console, Arc::new(file)]))
        }
        None => console,
    })
}

/// Final output. Cooperative cancellation is a normal ending: partial
/// standings and exit code 0.
fn finish(report: &TournamentReport, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
    } else if report.cancelled {
        println!(
            "\ntournament stopped after {}/{} rounds",
            report.rounds_completed, report.rounds_total
        );
    } else {
        println!("\ntournament complete: {} rounds", report.rounds_completed);
    }
    Ok(())
}
