//! Hit pool construction and rolling.

use super::roll::RollResult;
use super::source::RandomSource;
use super::{EXPLODE_ON, SIDES};
use crate::error::{MechError, MechResult};

/// A pool of exploding d6s sized by a rating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HitPool {
    dice: u32,
}

impl HitPool {
    /// Create a pool from a signed rating, rejecting negative ratings.
    pub fn new(rating: i32) -> MechResult<Self> {
        let dice = u32::try_from(rating).map_err(|_| MechError::NegativeRating(rating))?;
        Ok(Self { dice })
    }

    /// Number of dice before any explosions.
    pub fn dice(&self) -> u32 {
        self.dice
    }

    /// Returns true if the pool rolls nothing.
    pub fn is_empty(&self) -> bool {
        self.dice == 0
    }

    /// Roll the pool. Dice granted by explosions are queued and rolled in
    /// the same loop, so arbitrarily long chains never recurse.
    pub fn roll(&self, source: &mut dyn RandomSource) -> RollResult {
        let mut faces = Vec::with_capacity(self.dice as usize);
        let mut pending = self.dice;
        while pending > 0 {
            pending -= 1;
            let face = source.range(1, i64::from(SIDES) + 1) as u8;
            if face == EXPLODE_ON {
                pending += 1;
            }
            faces.push(face);
        }
        let result = RollResult { faces };
        tracing::trace!(dice = self.dice, hits = result.hits(), "rolled hit pool");
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dice::ScriptedRolls;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn empty_pool() {
        let pool = HitPool::new(0).unwrap();
        assert!(pool.is_empty());
        let mut rng = StdRng::seed_from_u64(3);
        assert_eq!(pool.roll(&mut rng).count(), 0);
    }

    #[test]
    fn roll_produces_valid_faces() {
        let mut rng = StdRng::seed_from_u64(42);
        let result = HitPool::new(50).unwrap().roll(&mut rng);
        assert!(result.count() >= 50);
        for face in &result.faces {
            assert!((1..=6).contains(face));
        }
    }

    #[test]
    fn explosions_extend_the_pool() {
        let mut source = ScriptedRolls::new([6, 2, 6, 6, 3, 1]);
        let result = HitPool::new(2).unwrap().roll(&mut source);
        assert_eq!(result.faces, vec![6, 2, 6, 6, 3]);
        assert_eq!(result.explosions(), 3);
        assert_eq!(result.hits(), 3);
    }

    #[test]
    fn roll_deterministic_with_seed() {
        let pool = HitPool::new(8).unwrap();
        let mut rng1 = StdRng::seed_from_u64(99);
        let mut rng2 = StdRng::seed_from_u64(99);
        assert_eq!(pool.roll(&mut rng1).faces, pool.roll(&mut rng2).faces);
    }
}
