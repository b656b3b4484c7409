use km_core::{HouseId, KnightId, Side, WarId};
use serde::Serialize;

/// What kind of state transition a narration event records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum SimEventKind {
    // World
    /// A house was founded.
    HouseFounded {
        /// The new house.
        house: HouseId,
    },
    /// A knight swore fealty to a house.
    KnightJoined {
        /// The new knight.
        knight: KnightId,
        /// The house they joined.
        house: HouseId,
    },
    /// A house was wiped out.
    HouseDestroyed {
        /// The destroyed house.
        house: HouseId,
    },
    /// A house's might changed after a war.
    MightChanged {
        /// The house.
        house: HouseId,
        /// Might after the change.
        might: u32,
    },

    // Diplomacy
    /// One house's tension toward another rose.
    TensionRaised {
        /// The house whose grievance grew.
        holder: HouseId,
        /// The house the grievance is held against.
        toward: HouseId,
        /// Tension after the change.
        tension: u32,
    },
    /// Two knights were wed.
    KnightsMarried {
        /// The knight who changed house.
        moved: KnightId,
        /// The knight who stayed.
        stayed: KnightId,
    },

    // Patronage
    /// The bishop sponsored a knight.
    KnightSponsored {
        /// The knight.
        knight: KnightId,
        /// Coin paid.
        cost: u32,
    },
    /// The bishop blessed a knight.
    KnightBlessed {
        /// The knight.
        knight: KnightId,
        /// Blessings after this one.
        blessings: u32,
    },
    /// The bishop received glory through a sponsored knight.
    GloryEarned {
        /// The knight who earned it.
        knight: KnightId,
        /// Glory gained.
        amount: u32,
    },
    /// The bishop received coin.
    CoinReceived {
        /// Coin gained.
        amount: u32,
    },

    // Combat
    /// A house marched on another.
    BattleJoined {
        /// The attacking house.
        attacker: HouseId,
        /// The defending house.
        defender: HouseId,
    },
    /// Neither house had a knight to field.
    NoChampions {
        /// The attacking house.
        attacker: HouseId,
        /// The defending house.
        defender: HouseId,
    },
    /// One house fielded no champion and handed the other an edge.
    ChampionAbsent {
        /// The house without knights.
        house: HouseId,
        /// The house that gained the edge.
        edge_to: HouseId,
    },
    /// A champion duel ended without a casualty.
    DuelStalemate {
        /// The attacking champion.
        first: KnightId,
        /// The defending champion.
        second: KnightId,
    },
    /// A champion slew the other.
    DuelWon {
        /// The surviving champion.
        victor: KnightId,
        /// The slain champion, no longer registered.
        victim: KnightId,
    },
    /// A knight earned a nickname.
    NicknameEarned {
        /// The knight.
        knight: KnightId,
        /// The nickname.
        nickname: String,
    },
    /// The might rolls of a battle were compared.
    BattleDecided {
        /// The winning house.
        winner: HouseId,
        /// The losing house.
        loser: HouseId,
        /// Winner's hits minus loser's hits.
        margin: u32,
    },
    /// A knight died.
    KnightDied {
        /// The knight, no longer registered.
        knight: KnightId,
        /// The house they fought for.
        house: HouseId,
    },
    /// A house paid the funeral tithe for a sponsored knight.
    FuneralTithe {
        /// The dead knight.
        knight: KnightId,
        /// Coin paid to the bishop.
        amount: u32,
    },
    /// A knight lost their spouse.
    Widowed {
        /// The surviving spouse.
        knight: KnightId,
    },

    // War
    /// A war was declared.
    WarDeclared {
        /// The war.
        war: WarId,
        /// The declaring house.
        attacker: HouseId,
        /// The house war was declared on.
        defender: HouseId,
    },
    /// A house joined one side of a war.
    AllyJoined {
        /// The war.
        war: WarId,
        /// The recruited house.
        house: HouseId,
        /// The side it joined.
        side: Side,
    },
    /// An alliance lost morale after a battle.
    MoraleLost {
        /// The war.
        war: WarId,
        /// The side that lost morale.
        side: Side,
        /// Morale after the loss.
        morale: i32,
    },
    /// A war ended and its consequences were applied.
    WarEnded {
        /// The war, no longer registered.
        war: WarId,
        /// The attacking leader.
        attacker: HouseId,
        /// The defending leader.
        defender: HouseId,
    },
}

impl SimEventKind {
    /// Check whether a house is named by this event.
    pub fn involves_house(&self, id: HouseId) -> bool {
        match self {
            Self::HouseFounded { house }
            | Self::KnightJoined { house, .. }
            | Self::HouseDestroyed { house }
            | Self::MightChanged { house, .. }
            | Self::KnightDied { house, .. }
            | Self::AllyJoined { house, .. } => *house == id,
            Self::TensionRaised { holder, toward, .. } => *holder == id || *toward == id,
            Self::BattleJoined { attacker, defender }
            | Self::NoChampions { attacker, defender }
            | Self::WarDeclared {
                attacker, defender, ..
            }
            | Self::WarEnded {
                attacker, defender, ..
            } => *attacker == id || *defender == id,
            Self::ChampionAbsent { house, edge_to } => *house == id || *edge_to == id,
            Self::BattleDecided { winner, loser, .. } => *winner == id || *loser == id,
            _ => false,
        }
    }

    /// Check whether a knight is named by this event.
    pub fn involves_knight(&self, id: KnightId) -> bool {
        match self {
            Self::KnightJoined { knight, .. }
            | Self::KnightSponsored { knight, .. }
            | Self::KnightBlessed { knight, .. }
            | Self::GloryEarned { knight, .. }
            | Self::NicknameEarned { knight, .. }
            | Self::KnightDied { knight, .. }
            | Self::FuneralTithe { knight, .. }
            | Self::Widowed { knight } => *knight == id,
            Self::KnightsMarried { moved, stayed } => *moved == id || *stayed == id,
            Self::DuelStalemate { first, second } => *first == id || *second == id,
            Self::DuelWon { victor, victim } => *victor == id || *victim == id,
            _ => false,
        }
    }
}

/// A narrated state transition.
#[derive(Debug, Clone, Serialize)]
pub struct SimEvent {
    /// The season in which this event occurred.
    pub season: u32,
    /// The specific kind of event that occurred.
    pub kind: SimEventKind,
    /// A human-readable description of the event.
    pub description: String,
}

impl SimEvent {
    /// Create a new event with the given season, kind, and description.
    pub fn new(season: u32, kind: SimEventKind, description: impl Into<String>) -> Self {
        Self {
            season,
            kind,
            description: description.into(),
        }
    }
}

/// Accumulates narration in the order transitions happen.
#[derive(Debug, Default)]
pub struct EventLog {
    events: Vec<SimEvent>,
    max_events: usize,
}

impl EventLog {
    /// Create a new event log with the given maximum capacity (0 = unlimited).
    pub fn new(max_events: usize) -> Self {
        Self {
            events: Vec::new(),
            max_events,
        }
    }

    /// Append an event, dropping the oldest events if the log exceeds its capacity.
    pub fn push(&mut self, event: SimEvent) {
        tracing::trace!(season = event.season, "{}", event.description);
        self.events.push(event);
        if self.max_events > 0 && self.events.len() > self.max_events {
            let drain_count = self.events.len() - self.max_events;
            self.events.drain(..drain_count);
        }
    }

    /// Return a slice of all recorded events.
    pub fn events(&self) -> &[SimEvent] {
        &self.events
    }

    /// Remove and return every recorded event, oldest first.
    pub fn drain(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.events)
    }

    /// Return all events naming the given house.
    pub fn events_for_house(&self, id: HouseId) -> Vec<&SimEvent> {
        self.events
            .iter()
            .filter(|e| e.kind.involves_house(id))
            .collect()
    }

    /// Return all events naming the given knight.
    pub fn events_for_knight(&self, id: KnightId) -> Vec<&SimEvent> {
        self.events
            .iter()
            .filter(|e| e.kind.involves_knight(id))
            .collect()
    }

    /// Return the number of recorded events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Return `true` if no events have been recorded.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn died(season: u32, knight: u64) -> SimEvent {
        SimEvent::new(
            season,
            SimEventKind::KnightDied {
                knight: KnightId(knight),
                house: HouseId(1),
            },
            "test",
        )
    }

    #[test]
    fn event_log_push_and_query() {
        let mut log = EventLog::new(0);
        log.push(died(1, 7));
        assert_eq!(log.len(), 1);
        assert_eq!(log.events_for_knight(KnightId(7)).len(), 1);
        assert_eq!(log.events_for_house(HouseId(1)).len(), 1);
        assert!(log.events_for_house(HouseId(2)).is_empty());
    }

    #[test]
    fn event_log_max_events_trims() {
        let mut log = EventLog::new(2);
        for i in 0..5 {
            log.push(died(i, 1));
        }
        assert_eq!(log.len(), 2);
        assert_eq!(log.events()[0].season, 3);
        assert_eq!(log.events()[1].season, 4);
    }

    #[test]
    fn drain_empties_the_log() {
        let mut log = EventLog::new(0);
        log.push(died(0, 1));
        log.push(died(0, 2));
        let drained = log.drain();
        assert_eq!(drained.len(), 2);
        assert!(log.is_empty());
    }

    #[test]
    fn kind_involves() {
        let kind = SimEventKind::DuelWon {
            victor: KnightId(1),
            victim: KnightId(2),
        };
        assert!(kind.involves_knight(KnightId(1)));
        assert!(kind.involves_knight(KnightId(2)));
        assert!(!kind.involves_house(HouseId(1)));

        let kind = SimEventKind::TensionRaised {
            holder: HouseId(3),
            toward: HouseId(4),
            tension: 2,
        };
        assert!(kind.involves_house(HouseId(3)));
        assert!(kind.involves_house(HouseId(4)));
        assert!(!kind.involves_house(HouseId(5)));
    }
}
