//! Rule formulas shared by duels, battles and patronage.
//!
//! Reputation is kept in tenths so that glory and cost come out of integer
//! arithmetic: a knight who won every recent battle has reputation 2.0
//! (20 tenths), one who lost them all 0.5 (5 tenths).

use serde::{Deserialize, Serialize};

/// How many trailing battle results count towards reputation.
pub const REPUTATION_WINDOW: usize = 5;

/// The outcome of one house battle for one knight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BattleResult {
    /// The knight's house won the battle.
    Victory,
    /// The knight's house lost the battle.
    Defeat,
}

/// Reputation in tenths, derived from a knight's recent battles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Reputation {
    tenths: u32,
}

impl Reputation {
    /// Reputation of a knight with no battle history.
    pub const NEUTRAL: Self = Self { tenths: 10 };

    /// Reputation scaled by ten.
    pub fn tenths(self) -> u32 {
        self.tenths
    }

    /// Reputation as a ratio, 1.0 being average.
    pub fn as_f64(self) -> f64 {
        f64::from(self.tenths) / 10.0
    }
}

impl std::fmt::Display for Reputation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.1}", self.as_f64())
    }
}

/// Reputation over the last [`REPUTATION_WINDOW`] results.
///
/// Short histories are padded with an assumed average record of
/// `(window - len) / 2` victories. The ratio is `0.5 + victories * 0.3`.
pub fn recent_reputation(results: &[BattleResult]) -> Reputation {
    let window = results.len().min(REPUTATION_WINDOW);
    if window == 0 {
        return Reputation::NEUTRAL;
    }
    let padded = (REPUTATION_WINDOW - window) / 2;
    let won = results[results.len() - window..]
        .iter()
        .filter(|r| **r == BattleResult::Victory)
        .count();
    let victories = (padded + won) as u32;
    Reputation {
        tenths: 5 + 3 * victories,
    }
}

/// Coin needed to sponsor a knight: `1 + floor(prowess * might * reputation)`.
pub fn sponsorship_cost(prowess: u32, house_might: u32, reputation: Reputation) -> u32 {
    1 + prowess * house_might * reputation.tenths() / 10
}

/// Glory for slaying a knight in a duel: `floor(5 * prowess * reputation)`.
pub fn duel_glory(loser_prowess: u32, loser_reputation: Reputation) -> u32 {
    5 * loser_prowess * loser_reputation.tenths() / 10
}

/// Glory per sponsored knight on the winning side of a house battle.
///
/// Beating a mightier house pays more than beating a weaker one. Uses base
/// might, not war-adjusted might.
pub fn battle_glory(max_might: u32, winner_might: u32, loser_might: u32) -> u32 {
    let glory = i64::from(max_might) + 1 + i64::from(loser_might) - i64::from(winner_might);
    glory.max(0) as u32
}

/// How badly a house was beaten: half the hit margin, rounded down.
pub fn defeat_severity(winner_hits: u32, loser_hits: u32) -> u32 {
    winner_hits.saturating_sub(loser_hits) / 2
}

/// Might after the penalty for fighting several wars at once.
///
/// Each war beyond the first costs one point. Never below zero.
pub fn war_adjusted_might(might: u32, concurrent_wars: usize) -> u32 {
    let penalty = concurrent_wars.saturating_sub(1) as u32;
    might.saturating_sub(penalty)
}
