//! Opposed-roll contests.
//!
//! Duels and house battles both compare two hit counts. The first side is
//! the one that initiated the contest.

use serde::{Deserialize, Serialize};

/// Who came out ahead in an opposed roll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContestOutcome {
    /// The initiating side rolled more hits.
    FirstWins {
        /// Hit difference, always positive.
        margin: u32,
    },
    /// The responding side rolled more hits.
    SecondWins {
        /// Hit difference, always positive.
        margin: u32,
    },
    /// Both sides rolled the same number of hits.
    Stalemate,
}

impl ContestOutcome {
    /// The signed margin from the initiating side's point of view.
    pub fn signed_margin(&self) -> i32 {
        match *self {
            Self::FirstWins { margin } => margin as i32,
            Self::SecondWins { margin } => -(margin as i32),
            Self::Stalemate => 0,
        }
    }
}

impl std::fmt::Display for ContestOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FirstWins { margin } => write!(f, "first side wins by {margin}"),
            Self::SecondWins { margin } => write!(f, "second side wins by {margin}"),
            Self::Stalemate => write!(f, "stalemate"),
        }
    }
}

/// Compare two hit counts.
pub fn resolve_contest(first_hits: u32, second_hits: u32) -> ContestOutcome {
    match first_hits.cmp(&second_hits) {
        std::cmp::Ordering::Greater => ContestOutcome::FirstWins {
            margin: first_hits - second_hits,
        },
        std::cmp::Ordering::Less => ContestOutcome::SecondWins {
            margin: second_hits - first_hits,
        },
        std::cmp::Ordering::Equal => ContestOutcome::Stalemate,
    }
}
