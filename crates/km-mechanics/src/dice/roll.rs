//! Hit pool results.

use serde::{Deserialize, Serialize};

use super::{EXPLODE_ON, HIT_THRESHOLD};

/// The faces rolled by a hit pool, explosions included, in roll order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollResult {
    /// Every face rolled, in order.
    pub faces: Vec<u8>,
}

impl RollResult {
    /// Number of dice showing a hit.
    pub fn hits(&self) -> u32 {
        self.count_at_or_above(HIT_THRESHOLD)
    }

    /// Number of dice that granted an extra die.
    pub fn explosions(&self) -> u32 {
        self.faces.iter().filter(|&&f| f == EXPLODE_ON).count() as u32
    }

    /// Count dice with faces at or above the given threshold.
    pub fn count_at_or_above(&self, threshold: u8) -> u32 {
        self.faces.iter().filter(|&&f| f >= threshold).count() as u32
    }

    /// Number of dice rolled.
    pub fn count(&self) -> usize {
        self.faces.len()
    }
}

impl std::fmt::Display for RollResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let faces: Vec<String> = self.faces.iter().map(u8::to_string).collect();
        write!(f, "[{}] = {} hits", faces.join(", "), self.hits())
    }
}
