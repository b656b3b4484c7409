//! Exploding d6 hit pools.
//!
//! A rating of `n` rolls `n` six-sided dice. Each die showing
//! [`HIT_THRESHOLD`] or more is a hit, and each die showing [`EXPLODE_ON`]
//! adds one more die to the pool, which may explode again in turn.

pub mod pool;
pub mod roll;
pub mod source;

pub use pool::HitPool;
pub use roll::RollResult;
pub use source::{RandomSource, ScriptedRolls, choose, shuffled};

use crate::error::MechResult;

/// Number of faces on every die in a hit pool.
pub const SIDES: u8 = 6;

/// Lowest face that counts as a hit.
pub const HIT_THRESHOLD: u8 = 4;

/// Face that grants an additional die.
pub const EXPLODE_ON: u8 = 6;

/// Roll a pool of `rating` exploding d6s and return the number of hits.
///
/// A rating of 0 rolls nothing and scores 0. A negative rating is
/// rejected with [`crate::MechError::NegativeRating`].
pub fn roll_hits(rating: i32, source: &mut dyn RandomSource) -> MechResult<u32> {
    Ok(HitPool::new(rating)?.roll(source).hits())
}
