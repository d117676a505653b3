//! The move set

use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of distinct moves
pub const MOVE_COUNT: usize = 3;

/// A move in the game
///
/// The discriminants are the wire/ordinal encoding: Rock=0, Scissors=1,
/// Paper=2. The dominance rule in [`crate::duel`] is defined over this
/// ordering, so the discriminants are part of the contract.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Move {
    Rock = 0,
    Scissors = 1,
    Paper = 2,
}

impl Move {
    /// All moves in ordinal order
    pub const ALL: [Move; MOVE_COUNT] = [Move::Rock, Move::Scissors, Move::Paper];

    /// Map an ordinal back to a move
    pub fn from_index(index: usize) -> Option<Move> {
        match index {
            0 => Some(Move::Rock),
            1 => Some(Move::Scissors),
            2 => Some(Move::Paper),
            _ => None,
        }
    }

    /// Ordinal of this move
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Move::Rock => "Rock",
            Move::Scissors => "Scissors",
            Move::Paper => "Paper",
        };
        write!(f, "{}", name)
    }
}
