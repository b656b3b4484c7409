use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::banner::Banner;
use crate::id::{HouseId, KnightId};

/// How hostile one house feels toward another. Directional.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiplomaticRelation {
    /// Non-negative hostility; higher makes war more likely.
    pub tension: u32,
}

/// A noble house.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct House {
    /// Registry identifier.
    pub id: HouseId,
    /// House name without the "House" prefix.
    pub name: String,
    /// Heraldry.
    pub banner: Banner,
    /// Military strength, between 1 and the configured maximum.
    pub might: u32,
    /// Wealth, between 1 and the configured maximum.
    pub wealth: u32,
    /// Member knights in joining order.
    pub knights: Vec<KnightId>,
    /// Relation toward every other live house.
    pub relations: BTreeMap<HouseId, DiplomaticRelation>,
}

impl House {
    /// "House <name>".
    pub fn title(&self) -> String {
        format!("House {}", self.name)
    }

    /// Tension this house holds toward another, if a relation exists.
    pub fn tension_toward(&self, other: HouseId) -> Option<u32> {
        self.relations.get(&other).map(|r| r.tension)
    }

    /// Lower might by one, never below 1.
    pub fn weaken(&mut self) {
        self.might = self.might.saturating_sub(1).max(1);
    }

    /// Raise might by one, never above `max_might`.
    pub fn strengthen(&mut self, max_might: u32) {
        self.might = (self.might + 1).min(max_might);
    }
}
