use km_core::{HouseDestruction, HouseId, KnightDeath, KnightId, World};
use km_mechanics::{RandomSource, roll_hits};

use crate::config::GameConfig;
use crate::error::SimResult;
use crate::event::{EventLog, SimEvent, SimEventKind};

/// Mutable context passed to every rule and each system during a season.
pub struct SimContext<'a> {
    /// The registry.
    pub world: &'a mut World,
    /// Narration sink.
    pub events: &'a mut EventLog,
    /// Every die and random pick is drawn from here.
    pub rng: &'a mut dyn RandomSource,
    /// Game rules.
    pub config: &'a GameConfig,
}

impl SimContext<'_> {
    /// Emit a narration event for the current season.
    pub fn emit(&mut self, kind: SimEventKind, description: impl Into<String>) {
        self.events
            .push(SimEvent::new(self.world.season, kind, description));
    }

    /// Roll a hit pool of the given rating.
    pub fn roll_hits(&mut self, rating: u32) -> SimResult<u32> {
        let rating = i32::try_from(rating).unwrap_or(i32::MAX);
        Ok(roll_hits(rating, self.rng)?)
    }

    /// Current season number.
    pub fn season(&self) -> u32 {
        self.world.season
    }

    /// Kill a knight through the registry and narrate every side effect.
    ///
    /// `cause` completes the sentence "<title> ...", e.g. "was overwhelmed
    /// by the enemy forces".
    pub fn kill_knight(&mut self, id: KnightId, cause: &str) -> SimResult<KnightDeath> {
        let death = self.world.kill_knight(id)?;
        self.narrate_death(&death, cause);
        Ok(death)
    }

    fn narrate_death(&mut self, death: &KnightDeath, cause: &str) {
        let house = death.knight.house;
        self.emit(
            SimEventKind::KnightDied {
                knight: death.knight.id,
                house,
            },
            format!("{} {cause}.", death.title),
        );
        if let Some(amount) = death.tithe {
            self.emit(
                SimEventKind::FuneralTithe {
                    knight: death.knight.id,
                    amount,
                },
                format!(
                    "{} paid the Church a funeral tithe of {amount} coin for {}.",
                    death.house_title, death.title
                ),
            );
        }
        if let Some(spouse) = death.widowed {
            let widow = self
                .world
                .knight_title(spouse)
                .unwrap_or_else(|_| spouse.to_string());
            self.emit(
                SimEventKind::Widowed { knight: spouse },
                format!("{widow} mourns {}.", death.title),
            );
        }
    }

    /// Destroy a house through the registry and narrate the fallout.
    pub fn destroy_house(&mut self, id: HouseId) -> SimResult<HouseDestruction> {
        let report = self.world.destroy_house(id)?;
        let title = report.house.title();
        for death in &report.deaths {
            self.narrate_death(death, &format!("fell with {title}"));
        }
        for war in &report.ended_wars {
            self.emit(
                SimEventKind::WarEnded {
                    war: war.id,
                    attacker: war.attackers.leader,
                    defender: war.defenders.leader,
                },
                format!("With {title} gone, its war came to an end."),
            );
        }
        self.emit(
            SimEventKind::HouseDestroyed { house: id },
            format!("{title} has been wiped from the realm."),
        );
        Ok(report)
    }
}

/// Run `f` against a throwaway context over `world` with default rules.
#[cfg(test)]
pub(crate) fn scripted<T>(
    world: &mut World,
    rng: &mut dyn RandomSource,
    f: impl FnOnce(&mut SimContext<'_>) -> T,
) -> (T, EventLog) {
    let mut events = EventLog::new(0);
    let config = GameConfig::default();
    let mut ctx = SimContext {
        world,
        events: &mut events,
        rng,
        config: &config,
    };
    let out = f(&mut ctx);
    (out, events)
}

#[cfg(test)]
mod tests {
    use super::*;
    use km_core::{Banner, Bishop, Gender, NewKnight, Weapon};
    use km_mechanics::ScriptedRolls;

    #[test]
    fn kill_narrates_tithe_and_widow() {
        let mut world = World::new(Bishop::new(0));
        let house = world.add_house("Vell", Banner::new("black", "stag"), 2, 3);
        let recruit = |name: &str| NewKnight {
            name: name.into(),
            gender: Gender::Male,
            prowess: 1,
            bravery: 1,
            weapon: Weapon::Sword,
        };
        let a = world.add_knight(recruit("Aldric"), house).unwrap();
        let b = world.add_knight(recruit("Bran"), house).unwrap();
        world.sponsor(a).unwrap();
        world.wed(a, b).unwrap();

        let mut events = EventLog::new(0);
        let mut rng = ScriptedRolls::constant(1);
        let config = GameConfig::default();
        let mut ctx = SimContext {
            world: &mut world,
            events: &mut events,
            rng: &mut rng,
            config: &config,
        };
        ctx.kill_knight(a, "fell from his horse").unwrap();

        let kinds: Vec<_> = events.events().iter().map(|e| &e.kind).collect();
        assert!(matches!(kinds[0], SimEventKind::KnightDied { .. }));
        assert!(matches!(kinds[1], SimEventKind::FuneralTithe { amount: 15, .. }));
        assert!(matches!(kinds[2], SimEventKind::Widowed { knight } if *knight == b));
        assert_eq!(events.events()[0].description, "Ser Aldric Vell fell from his horse.");
        assert_eq!(world.bishop.coin, 15);
    }
}
