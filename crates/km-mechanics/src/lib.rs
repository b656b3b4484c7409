//! Dice and rule formulas for Knight Manager.
//!
//! Every stochastic decision in the game is a pool of exploding d6s whose
//! successes ("hits") are counted. This crate provides that pool, the
//! injectable random source it draws from, and the pure formulas the
//! season engine uses for reputation, glory and casualties.

pub mod dice;
pub mod error;
pub mod resolution;
pub mod rules;

pub use dice::{
    HitPool, RandomSource, RollResult, ScriptedRolls, choose, roll_hits, shuffled,
};
pub use error::{MechError, MechResult};
pub use resolution::{ContestOutcome, resolve_contest};
pub use rules::{BattleResult, Reputation, recent_reputation};
