//! The phases of a season, in the order the default pipeline runs them.

use crate::alliance::start_wars;
use crate::context::SimContext;
use crate::diplomacy::world_event;
use crate::error::SimResult;
use crate::event::SimEventKind;
use crate::generate::recruit_knight;
use crate::system::System;
use crate::war::run_wars;

/// One slight between two random houses.
#[derive(Debug, Default)]
pub struct WorldEventSystem;

impl System for WorldEventSystem {
    fn name(&self) -> &str {
        "world-event"
    }

    fn tick(&mut self, ctx: &mut SimContext<'_>) -> SimResult<()> {
        world_event(ctx)?;
        Ok(())
    }
}

/// A round of battles in every live war; finished wars make peace.
#[derive(Debug, Default)]
pub struct WarSystem;

impl System for WarSystem {
    fn name(&self) -> &str {
        "wars"
    }

    fn tick(&mut self, ctx: &mut SimContext<'_>) -> SimResult<()> {
        run_wars(ctx)
    }
}

/// Houses at peace weigh their grievances and may declare war.
#[derive(Debug, Default)]
pub struct WarOutbreakSystem;

impl System for WarOutbreakSystem {
    fn name(&self) -> &str {
        "war-outbreak"
    }

    fn tick(&mut self, ctx: &mut SimContext<'_>) -> SimResult<()> {
        let declared = start_wars(ctx)?;
        if !declared.is_empty() {
            tracing::debug!(wars = declared.len(), "wars broke out");
        }
        Ok(())
    }
}

/// New knights swear fealty to random houses.
#[derive(Debug, Default)]
pub struct KnightInfluxSystem;

impl System for KnightInfluxSystem {
    fn name(&self) -> &str {
        "knight-influx"
    }

    fn tick(&mut self, ctx: &mut SimContext<'_>) -> SimResult<()> {
        for _ in 0..ctx.config.knights_per_season {
            recruit_knight(ctx)?;
        }
        Ok(())
    }
}

/// The Church's seasonal income.
#[derive(Debug, Default)]
pub struct IncomeSystem;

impl System for IncomeSystem {
    fn name(&self) -> &str {
        "income"
    }

    fn tick(&mut self, ctx: &mut SimContext<'_>) -> SimResult<()> {
        let amount = ctx.config.coin_per_season;
        if amount == 0 {
            return Ok(());
        }
        ctx.world.bishop.coin += amount;
        let coin = ctx.world.bishop.coin;
        ctx.emit(
            SimEventKind::CoinReceived { amount },
            format!("The Church received {amount} coin in tithes. You now have {coin} coin."),
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::scripted;
    use km_core::{Banner, Bishop, World};
    use km_mechanics::ScriptedRolls;

    #[test]
    fn income_adds_coin() {
        let mut world = World::new(Bishop::new(3));
        let mut rng = ScriptedRolls::constant(0);
        let (_, events) = scripted(&mut world, &mut rng, |ctx| IncomeSystem.tick(ctx).unwrap());
        assert_eq!(world.bishop.coin, 8);
        assert!(matches!(
            events.events()[0].kind,
            SimEventKind::CoinReceived { amount: 5 }
        ));
    }

    #[test]
    fn influx_recruits_into_live_houses() {
        let mut world = World::new(Bishop::new(0));
        let house = world.add_house("Vell", Banner::new("black", "stag"), 2, 2);
        let mut rng = ScriptedRolls::constant(1);
        scripted(&mut world, &mut rng, |ctx| {
            KnightInfluxSystem.tick(ctx).unwrap();
        });
        assert_eq!(world.house(house).unwrap().knights.len(), 1);
    }

    #[test]
    fn outbreak_declares_war_on_grievance() {
        let mut world = World::new(Bishop::new(0));
        let a = world.add_house("Vell", Banner::new("black", "stag"), 3, 2);
        let b = world.add_house("Morrow", Banner::new("amber", "wolf"), 1, 2);
        world.raise_tension(a, b, 9).unwrap();
        let mut rng = ScriptedRolls::constant(4);
        let (_, events) = scripted(&mut world, &mut rng, |ctx| WarOutbreakSystem.tick(ctx).unwrap());
        assert!(world.at_war_with(a, b));
        assert!(events
            .events()
            .iter()
            .any(|e| matches!(e.kind, SimEventKind::WarDeclared { .. })));
    }
}
