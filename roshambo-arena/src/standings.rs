//! Final standings and the tournament report

use serde::Serialize;

/// One player's final ranking entry
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Standing {
    pub id: usize,
    pub score: u32,
}

/// What a finished (or cancelled) tournament run produced
#[derive(Clone, Debug, Serialize)]
pub struct TournamentReport {
    /// Standings sorted by score descending, ties by ascending id
    pub standings: Vec<Standing>,
    /// Rounds actually played
    pub rounds_completed: usize,
    /// Length of the full schedule
    pub rounds_total: usize,
    /// Whether the run was cut short by cancellation
    pub cancelled: bool,
}

impl TournamentReport {
    /// Top standing, if the roster was non-empty
    pub fn winner(&self) -> Option<&Standing> {
        self.standings.first()
    }
}

/// Rank players by score. Equal scores are ordered by ascending id, so
/// the ranking is deterministic across runs.
pub fn compute_standings(scores: &[u32]) -> Vec<Standing> {
    let mut standings: Vec<Standing> = scores
        .iter()
        .enumerate()
        .map(|(id, &score)| Standing { id, score })
        .collect();
    standings.sort_by(|a, b| b.score.cmp(&a.score).then_with(|| a.id.cmp(&b.id)));
    standings
}
