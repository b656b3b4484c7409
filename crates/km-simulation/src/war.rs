//! The war state machine: rounds of battles, then peace terms.

use km_core::{HouseId, Side, WarId};
use km_mechanics::choose;

use crate::combat::run_battle;
use crate::context::SimContext;
use crate::error::{SimError, SimResult};
use crate::event::SimEventKind;
use crate::generate::generate_house;

/// How a war ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarOutcome {
    /// Both sides ran out of morale. Both leaders lose a point of might.
    Truce,
    /// One side ran out of morale.
    Victory {
        /// The winning leader, strengthened by a point of might.
        winner: HouseId,
        /// The losing leader.
        loser: HouseId,
        /// Set when the loser was already at minimum might and was destroyed.
        replaced_by: Option<HouseId>,
    },
}

/// Fight one round of a war.
///
/// The combatant at the round cursor on each side attacks a random house
/// of the other side; a side with fewer combatants than the cursor sits the
/// round out. A winning attack costs the defeated alliance morale equal to
/// the margin.
pub fn do_next_battles(ctx: &mut SimContext<'_>, id: WarId) -> SimResult<()> {
    let war = ctx.world.war(id)?.clone();
    let attackers = war.attackers.combatants();
    let defenders = war.defenders.combatants();

    for (side, own, enemies) in [
        (Side::Attackers, &attackers, &defenders),
        (Side::Defenders, &defenders, &attackers),
    ] {
        let Some(&attacker) = own.get(war.cursor) else {
            continue;
        };
        let Some(&defender) = choose(ctx.rng, enemies) else {
            continue;
        };
        let margin = run_battle(ctx, attacker, defender)?;
        if margin > 0 {
            let enemy_side = side.opposite();
            let alliance = ctx.world.war_mut(id)?.alliance_mut(enemy_side);
            alliance.morale -= margin;
            let (leader, morale) = (alliance.leader, alliance.morale);
            let leader_title = ctx.world.house(leader)?.title();
            ctx.emit(
                SimEventKind::MoraleLost {
                    war: id,
                    side: enemy_side,
                    morale,
                },
                format!("The morale of {leader_title}'s alliance is now at {morale}."),
            );
        }
    }

    ctx.world.war_mut(id)?.advance_cursor();
    Ok(())
}

/// Make peace and apply the consequences.
///
/// Fails with [`SimError::WarNotOver`] while both alliances have morale.
/// The war is unregistered before anything else so that a destroyed loser
/// cannot drag it through another cleanup.
pub fn end_war(ctx: &mut SimContext<'_>, id: WarId) -> SimResult<WarOutcome> {
    if !ctx.world.war(id)?.is_over() {
        return Err(SimError::WarNotOver(id));
    }
    let war = ctx.world.remove_war(id)?;
    let attacker = war.attackers.leader;
    let defender = war.defenders.leader;
    ctx.world.reset_tension(attacker, defender)?;

    let attacker_title = ctx.world.house(attacker)?.title();
    let defender_title = ctx.world.house(defender)?.title();

    let outcome = if war.attackers.is_broken() && war.defenders.is_broken() {
        ctx.emit(
            SimEventKind::WarEnded {
                war: id,
                attacker,
                defender,
            },
            format!(
                "The war between {attacker_title} and {defender_title} ended in a truce after significant losses on both sides."
            ),
        );
        for house in [attacker, defender] {
            weaken(ctx, house)?;
        }
        WarOutcome::Truce
    } else {
        let (winner, loser) = if war.attackers.is_broken() {
            (defender, attacker)
        } else {
            (attacker, defender)
        };
        let winner_title = ctx.world.house(winner)?.title();
        let loser_title = ctx.world.house(loser)?.title();
        ctx.emit(
            SimEventKind::WarEnded {
                war: id,
                attacker,
                defender,
            },
            format!("{loser_title} surrenders the war to {winner_title}."),
        );

        let max_might = ctx.config.max_might;
        let house = ctx.world.house_mut(winner)?;
        let before = house.might;
        house.strengthen(max_might);
        let might = house.might;
        if might > before {
            ctx.emit(
                SimEventKind::MightChanged {
                    house: winner,
                    might,
                },
                format!("{winner_title}'s might rises to {might}."),
            );
        }

        let replaced_by = if ctx.world.house(loser)?.might <= 1 {
            ctx.destroy_house(loser)?;
            Some(generate_house(ctx)?)
        } else {
            weaken(ctx, loser)?;
            None
        };
        WarOutcome::Victory {
            winner,
            loser,
            replaced_by,
        }
    };

    tracing::info!(%id, ?outcome, "war ended");
    Ok(outcome)
}

fn weaken(ctx: &mut SimContext<'_>, id: HouseId) -> SimResult<()> {
    let house = ctx.world.house_mut(id)?;
    house.weaken();
    let might = house.might;
    let title = house.title();
    ctx.emit(
        SimEventKind::MightChanged { house: id, might },
        format!("{title}'s might falls to {might}."),
    );
    Ok(())
}

/// Fight a round of every live war and end those that are over.
///
/// Works from a snapshot of war ids. A war that disappears mid-pass,
/// because ending another war destroyed one of its leaders, is skipped.
pub fn run_wars(ctx: &mut SimContext<'_>) -> SimResult<()> {
    for id in ctx.world.war_ids() {
        if ctx.world.war(id).is_err() {
            continue;
        }
        do_next_battles(ctx, id)?;
        if ctx.world.war(id)?.is_over() {
            end_war(ctx, id)?;
        }
    }
    Ok(())
}
