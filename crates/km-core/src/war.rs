use std::fmt;

use serde::{Deserialize, Serialize};

use crate::id::{HouseId, WarId};

/// One of the two sides of a war.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    /// The side that declared the war.
    Attackers,
    /// The side war was declared on.
    Defenders,
}

impl Side {
    /// The other side.
    pub fn opposite(self) -> Self {
        match self {
            Self::Attackers => Self::Defenders,
            Self::Defenders => Self::Attackers,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Attackers => write!(f, "attackers"),
            Self::Defenders => write!(f, "defenders"),
        }
    }
}

/// A leader house, the houses that joined it, and their shared morale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alliance {
    /// The house that leads this side. Fixed for the whole war.
    pub leader: HouseId,
    /// Houses recruited to this side, in joining order.
    pub allies: Vec<HouseId>,
    /// The side loses once morale reaches 0 or below.
    pub morale: i32,
}

impl Alliance {
    /// An alliance with no allies yet.
    pub fn new(leader: HouseId, morale: i32) -> Self {
        Self {
            leader,
            allies: Vec::new(),
            morale,
        }
    }

    /// Leader first, then allies in joining order.
    pub fn combatants(&self) -> Vec<HouseId> {
        let mut houses = Vec::with_capacity(self.allies.len() + 1);
        houses.push(self.leader);
        houses.extend_from_slice(&self.allies);
        houses
    }

    /// Returns true if the house leads or has joined this side.
    pub fn includes(&self, house: HouseId) -> bool {
        self.leader == house || self.allies.contains(&house)
    }

    /// Returns true if morale has run out.
    pub fn is_broken(&self) -> bool {
        self.morale <= 0
    }
}

/// A war between two alliances.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct War {
    /// Registry identifier.
    pub id: WarId,
    /// The declaring side.
    pub attackers: Alliance,
    /// The side war was declared on.
    pub defenders: Alliance,
    /// Index of the combatant on each side that attacks next round.
    pub cursor: usize,
}

impl War {
    /// A war with both sides at the given morale and no allies.
    pub fn new(id: WarId, attacker: HouseId, defender: HouseId, morale: i32) -> Self {
        Self {
            id,
            attackers: Alliance::new(attacker, morale),
            defenders: Alliance::new(defender, morale),
            cursor: 0,
        }
    }

    /// The alliance on one side.
    pub fn alliance(&self, side: Side) -> &Alliance {
        match side {
            Side::Attackers => &self.attackers,
            Side::Defenders => &self.defenders,
        }
    }

    /// The alliance on one side, mutably.
    pub fn alliance_mut(&mut self, side: Side) -> &mut Alliance {
        match side {
            Side::Attackers => &mut self.attackers,
            Side::Defenders => &mut self.defenders,
        }
    }

    /// True iff either side's morale is at or below 0.
    pub fn is_over(&self) -> bool {
        self.attackers.is_broken() || self.defenders.is_broken()
    }

    /// Which side a house fights on, if any.
    pub fn side_of(&self, house: HouseId) -> Option<Side> {
        if self.attackers.includes(house) {
            Some(Side::Attackers)
        } else if self.defenders.includes(house) {
            Some(Side::Defenders)
        } else {
            None
        }
    }

    /// Returns true if the house fights in this war on either side.
    pub fn involves(&self, house: HouseId) -> bool {
        self.side_of(house).is_some()
    }

    /// Returns true if the house leads either side.
    pub fn is_led_by(&self, house: HouseId) -> bool {
        self.attackers.leader == house || self.defenders.leader == house
    }

    /// Returns true if the two houses fight on opposite sides.
    pub fn opposes(&self, a: HouseId, b: HouseId) -> bool {
        match (self.side_of(a), self.side_of(b)) {
            (Some(side_a), Some(side_b)) => side_a != side_b,
            _ => false,
        }
    }

    /// Move the round cursor on, wrapping at the larger side's size.
    pub fn advance_cursor(&mut self) {
        let largest = self
            .attackers
            .combatants()
            .len()
            .max(self.defenders.combatants().len());
        self.cursor = (self.cursor + 1) % largest;
    }

    /// Drop a house from both ally lists.
    pub fn remove_ally(&mut self, house: HouseId) -> bool {
        let before = self.attackers.allies.len() + self.defenders.allies.len();
        self.attackers.allies.retain(|h| *h != house);
        self.defenders.allies.retain(|h| *h != house);
        before != self.attackers.allies.len() + self.defenders.allies.len()
    }
}
