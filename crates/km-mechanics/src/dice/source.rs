//! The random source every stochastic rule draws from.
//!
//! Gameplay uses a seeded [`rand::rngs::StdRng`]; any [`rand::Rng`] is a
//! [`RandomSource`]. Tests that need an exact outcome use [`ScriptedRolls`].

use rand::Rng;
use rand::seq::SliceRandom;

/// A uniform integer source, object-safe so it can sit behind `&mut dyn`.
pub trait RandomSource {
    /// A uniform integer in `[min, max)`.
    ///
    /// # Panics
    ///
    /// Panics if the interval is empty (`min >= max`).
    fn range(&mut self, min: i64, max: i64) -> i64;

    /// A uniform index into a sequence of length `len`.
    ///
    /// # Panics
    ///
    /// Panics if `len` is 0.
    fn choose_index(&mut self, len: usize) -> usize {
        self.range(0, len as i64) as usize
    }

    /// A uniformly random permutation of `0..len`.
    fn shuffle_indices(&mut self, len: usize) -> Vec<usize> {
        let mut indices: Vec<usize> = (0..len).collect();
        for i in (1..len).rev() {
            let j = self.range(0, i as i64 + 1) as usize;
            indices.swap(i, j);
        }
        indices
    }
}

impl<R: Rng> RandomSource for R {
    fn range(&mut self, min: i64, max: i64) -> i64 {
        self.random_range(min..max)
    }

    fn shuffle_indices(&mut self, len: usize) -> Vec<usize> {
        let mut indices: Vec<usize> = (0..len).collect();
        indices.shuffle(self);
        indices
    }
}

/// Pick one element uniformly, or `None` from an empty slice.
pub fn choose<'a, T>(source: &mut dyn RandomSource, items: &'a [T]) -> Option<&'a T> {
    if items.is_empty() {
        return None;
    }
    items.get(source.choose_index(items.len()))
}

/// A shuffled copy of `items`.
pub fn shuffled<T: Clone>(source: &mut dyn RandomSource, items: &[T]) -> Vec<T> {
    source
        .shuffle_indices(items.len())
        .into_iter()
        .map(|i| items[i].clone())
        .collect()
}

/// A deterministic source replaying a fixed cycle of values.
///
/// Each draw takes the next value in the cycle and clamps it into the
/// requested interval, so `ScriptedRolls::constant(4)` makes every d6 a
/// non-exploding hit. A cycle made only of 6s never lets a hit pool
/// finish rolling.
#[derive(Debug, Clone)]
pub struct ScriptedRolls {
    values: Vec<i64>,
    cursor: usize,
}

impl ScriptedRolls {
    /// Replay `values` in order, wrapping around at the end.
    ///
    /// An empty cycle behaves like `constant(0)`.
    pub fn new(values: impl IntoIterator<Item = i64>) -> Self {
        let mut values: Vec<i64> = values.into_iter().collect();
        if values.is_empty() {
            values.push(0);
        }
        Self { values, cursor: 0 }
    }

    /// Return the same value on every draw.
    pub fn constant(value: i64) -> Self {
        Self::new([value])
    }

    /// Number of values drawn so far.
    pub fn draws(&self) -> usize {
        self.cursor
    }
}

impl RandomSource for ScriptedRolls {
    fn range(&mut self, min: i64, max: i64) -> i64 {
        assert!(min < max, "empty range [{min}, {max})");
        let value = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        value.clamp(min, max - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn rng_range_within_bounds() {
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..500 {
            let v = rng.range(1, 7);
            assert!((1..7).contains(&v));
        }
    }

    #[test]
    fn shuffle_is_a_permutation() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut indices = rng.shuffle_indices(10);
        indices.sort_unstable();
        assert_eq!(indices, (0..10).collect::<Vec<_>>());
    }

    #[test]
    fn scripted_values_are_clamped_and_cycle() {
        let mut source = ScriptedRolls::new([9, -2]);
        assert_eq!(source.range(1, 7), 6);
        assert_eq!(source.range(1, 7), 1);
        assert_eq!(source.range(1, 7), 6);
        assert_eq!(source.draws(), 3);
    }

    #[test]
    fn scripted_shuffle_is_a_permutation() {
        let mut source = ScriptedRolls::new([3, 0, 1]);
        let mut indices = source.shuffle_indices(6);
        indices.sort_unstable();
        assert_eq!(indices, (0..6).collect::<Vec<_>>());
    }

    #[test]
    fn choose_from_empty_is_none() {
        let mut rng = StdRng::seed_from_u64(0);
        let empty: [u8; 0] = [];
        assert!(choose(&mut rng, &empty).is_none());
    }

    #[test]
    fn choose_uses_source_index() {
        let mut source = ScriptedRolls::constant(2);
        assert_eq!(choose(&mut source, &["a", "b", "c", "d"]), Some(&"c"));
    }

    #[test]
    fn shuffled_keeps_all_items() {
        let mut rng = StdRng::seed_from_u64(8);
        let mut items = shuffled(&mut rng, &["x", "y", "z"]);
        items.sort_unstable();
        assert_eq!(items, vec!["x", "y", "z"]);
    }

    #[test]
    #[should_panic(expected = "empty range")]
    fn scripted_empty_range_panics() {
        ScriptedRolls::constant(1).range(3, 3);
    }
}
