//! End-to-end tests for the arena
//!
//! Everything here runs real worker threads; scenarios are made
//! deterministic with fixed pickers and pinned seeds, never with timing.

use std::sync::{Arc, Mutex};

use roshambo_arena::{
    Arena, ArenaConfig, ArenaError, ArenaEvent, CancelToken, EventSink, FixedPicker, MovePicker,
    NullSink,
};
use roshambo_core::{Move, Outcome};

/// Sink that records every event in arrival order
#[derive(Default)]
struct RecordingSink {
    events: Mutex<Vec<ArenaEvent>>,
}

impl RecordingSink {
    fn snapshot(&self) -> Vec<ArenaEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl EventSink for RecordingSink {
    fn emit(&self, event: &ArenaEvent) {
        self.events.lock().unwrap().push(event.clone());
    }
}

/// Sink that cancels the token as soon as a given round starts
struct CancelOnRound {
    token: CancelToken,
    round: usize,
}

impl EventSink for CancelOnRound {
    fn emit(&self, event: &ArenaEvent) {
        if let ArenaEvent::RoundStarted { round, .. } = event {
            if *round == self.round {
                self.token.cancel();
            }
        }
    }
}

fn fixed_pickers(moves: &[Move]) -> Vec<Box<dyn MovePicker>> {
    moves
        .iter()
        .map(|&mv| Box::new(FixedPicker(mv)) as Box<dyn MovePicker>)
        .collect()
}

#[test]
fn test_full_schedule_for_every_roster_size() {
    for players in 2..=10 {
        let arena = Arena::new(ArenaConfig::new(players).with_seed(7)).unwrap();
        let report = arena.run(Arc::new(NullSink), &CancelToken::new()).unwrap();

        let expected_rounds = players * (players - 1) / 2;
        assert_eq!(report.rounds_total, expected_rounds);
        assert_eq!(report.rounds_completed, expected_rounds);
        assert!(!report.cancelled);
        assert_eq!(report.standings.len(), players);

        // Every round hands out exactly two points.
        let total: u32 = report.standings.iter().map(|s| s.score).sum();
        assert_eq!(total, 2 * expected_rounds as u32);
    }
}

#[test]
fn test_rock_beats_scissors_head_to_head() {
    let sink = Arc::new(RecordingSink::default());
    let arena = Arena::with_pickers(
        ArenaConfig::new(2),
        fixed_pickers(&[Move::Rock, Move::Scissors]),
    )
    .unwrap();
    let report = arena.run(sink.clone(), &CancelToken::new()).unwrap();

    assert_eq!(report.rounds_completed, 1);
    assert_eq!(report.winner().map(|s| s.id), Some(0));
    assert_eq!(report.standings[0].score, 2);
    assert_eq!(report.standings[1].score, 0);

    let events = sink.snapshot();
    assert!(events.iter().any(|e| matches!(
        e,
        ArenaEvent::RoundResult {
            outcome: Outcome::FirstWins,
            ..
        }
    )));
}

#[test]
fn test_scissors_beat_paper_and_paper_beats_rock() {
    // The cycle runs along the ordinals, not the everyday convention.
    for (first, second) in [(Move::Scissors, Move::Paper), (Move::Paper, Move::Rock)] {
        let arena = Arena::with_pickers(ArenaConfig::new(2), fixed_pickers(&[first, second]))
            .unwrap();
        let report = arena.run(Arc::new(NullSink), &CancelToken::new()).unwrap();
        assert_eq!(report.winner().map(|s| s.id), Some(0), "{first} vs {second}");
    }
}

#[test]
fn test_all_draws_tie_break_by_id() {
    let arena = Arena::with_pickers(
        ArenaConfig::new(3),
        fixed_pickers(&[Move::Rock, Move::Rock, Move::Rock]),
    )
    .unwrap();
    let report = arena.run(Arc::new(NullSink), &CancelToken::new()).unwrap();

    assert_eq!(report.rounds_completed, 3);
    for standing in &report.standings {
        assert_eq!(standing.score, 3);
    }
    // Equal scores are reported in ascending id order.
    let ids: Vec<usize> = report.standings.iter().map(|s| s.id).collect();
    assert_eq!(ids, vec![0, 1, 2]);
}

#[test]
fn test_cancel_before_registration_runs_zero_rounds() {
    let token = CancelToken::new();
    token.cancel();

    let arena = Arena::new(ArenaConfig::new(5)).unwrap();
    let report = arena.run(Arc::new(NullSink), &token).unwrap();

    assert!(report.cancelled);
    assert_eq!(report.rounds_completed, 0);
    assert_eq!(report.standings.len(), 5);
    assert!(report.standings.iter().all(|s| s.score == 0));
}

#[test]
fn test_cancel_mid_schedule_finishes_round_in_flight() {
    let token = CancelToken::new();
    let sink = Arc::new(CancelOnRound {
        token: token.clone(),
        round: 1,
    });

    let arena = Arena::new(ArenaConfig::new(4).with_seed(11)).unwrap();
    let report = arena.run(sink, &token).unwrap();

    // The round whose start triggered cancellation still completes and
    // is scored; nothing after it runs.
    assert!(report.cancelled);
    assert_eq!(report.rounds_completed, 1);
    assert_eq!(report.rounds_total, 6);
    let total: u32 = report.standings.iter().map(|s| s.score).sum();
    assert_eq!(total, 2);
}

#[test]
fn test_second_cancel_has_no_further_effect() {
    let token = CancelToken::new();
    token.cancel();
    token.cancel();

    let arena = Arena::new(ArenaConfig::new(3)).unwrap();
    let report = arena.run(Arc::new(NullSink), &token).unwrap();
    assert!(report.cancelled);
    assert_eq!(report.rounds_completed, 0);

    // Cancelling after the run is equally inert.
    token.cancel();
    assert!(token.is_cancelled());
}

#[test]
fn test_event_stream_ordering() {
    let sink = Arc::new(RecordingSink::default());
    let arena = Arena::with_pickers(
        ArenaConfig::new(2),
        fixed_pickers(&[Move::Paper, Move::Paper]),
    )
    .unwrap();
    arena.run(sink.clone(), &CancelToken::new()).unwrap();

    let events = sink.snapshot();
    let position = |pred: &dyn Fn(&ArenaEvent) -> bool| events.iter().position(|e| pred(e));

    // Both registrations precede the round; the round announcement
    // precedes both moves; both moves precede the result.
    let round_started = position(&|e| matches!(e, ArenaEvent::RoundStarted { .. })).unwrap();
    let round_result = position(&|e| matches!(e, ArenaEvent::RoundResult { .. })).unwrap();
    let registered: Vec<usize> = events
        .iter()
        .enumerate()
        .filter(|(_, e)| matches!(e, ArenaEvent::Registered { .. }))
        .map(|(i, _)| i)
        .collect();
    let moves: Vec<usize> = events
        .iter()
        .enumerate()
        .filter(|(_, e)| matches!(e, ArenaEvent::MoveMade { .. }))
        .map(|(i, _)| i)
        .collect();

    assert_eq!(registered.len(), 2);
    assert_eq!(moves.len(), 2);
    assert!(registered.iter().all(|&i| i < round_started));
    assert!(moves.iter().all(|&i| round_started < i && i < round_result));

    // Every worker reports done, and the standings close the stream
    // after all of them.
    let done_count = events
        .iter()
        .filter(|e| matches!(e, ArenaEvent::WorkerDone { .. }))
        .count();
    assert_eq!(done_count, 2);
    assert!(matches!(
        events.last(),
        Some(ArenaEvent::FinalStandings { .. })
    ));
}

#[test]
fn test_exactly_two_moves_per_round() {
    let sink = Arc::new(RecordingSink::default());
    let arena = Arena::new(ArenaConfig::new(5).with_seed(3)).unwrap();
    let report = arena.run(sink.clone(), &CancelToken::new()).unwrap();

    let events = sink.snapshot();
    let move_count = events
        .iter()
        .filter(|e| matches!(e, ArenaEvent::MoveMade { .. }))
        .count();
    assert_eq!(move_count, 2 * report.rounds_completed);

    // Moves always come from the announced pair of their round.
    let mut current_pair: Option<(usize, usize)> = None;
    for event in &events {
        match event {
            ArenaEvent::RoundStarted { first, second, .. } => {
                current_pair = Some((*first, *second));
            }
            ArenaEvent::MoveMade { id, .. } => {
                let (a, b) = current_pair.expect("move outside any round");
                assert!(*id == a || *id == b);
            }
            ArenaEvent::RoundResult { .. } => current_pair = None,
            _ => {}
        }
    }
}

#[test]
fn test_seeded_runs_are_reproducible() {
    let run = || {
        let arena = Arena::new(ArenaConfig::new(6).with_seed(2024)).unwrap();
        let report = arena.run(Arc::new(NullSink), &CancelToken::new()).unwrap();
        report
            .standings
            .iter()
            .map(|s| (s.id, s.score))
            .collect::<Vec<_>>()
    };
    assert_eq!(run(), run());
}

#[test]
fn test_roster_size_rejected_before_spawning() {
    assert!(matches!(
        Arena::new(ArenaConfig::new(1)),
        Err(ArenaError::RosterSize(1))
    ));
    assert!(matches!(
        Arena::new(ArenaConfig::new(11)),
        Err(ArenaError::RosterSize(11))
    ));
}

#[test]
fn test_picker_count_mismatch_rejected() {
    let result = Arena::with_pickers(ArenaConfig::new(3), fixed_pickers(&[Move::Rock]));
    assert!(matches!(
        result,
        Err(ArenaError::PickerCount {
            expected: 3,
            got: 1
        })
    ));
}

#[test]
fn test_events_serialize_to_tagged_json() {
    let event = ArenaEvent::MoveMade {
        id: 3,
        mv: Move::Scissors,
    };
    let json = serde_json::to_value(&event).unwrap();
    assert_eq!(json["event"], "move_made");
    assert_eq!(json["id"], 3);
    assert_eq!(json["move"], "Scissors");
}
