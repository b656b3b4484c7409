//! War declaration and ally recruitment.

use km_core::{HouseId, Side, War, WarId};
use km_mechanics::shuffled;

use crate::context::SimContext;
use crate::error::SimResult;
use crate::event::SimEventKind;

/// Decide whether `candidate` joins `side` of `war`.
///
/// Leaders, houses already on either side, houses in `other_known_enemies`
/// and houses fighting any registered war never join. Otherwise the
/// candidate rolls its might plus how much more it resents the enemy leader
/// than its own, and joins if the hits reach the enemy alliance's total
/// might.
pub fn house_will_join(
    ctx: &mut SimContext<'_>,
    candidate: HouseId,
    war: &War,
    side: Side,
    other_known_enemies: &[HouseId],
) -> SimResult<bool> {
    let own = war.alliance(side);
    let enemy = war.alliance(side.opposite());
    if candidate == enemy.leader
        || candidate == own.leader
        || enemy.allies.contains(&candidate)
        || own.allies.contains(&candidate)
        || other_known_enemies.contains(&candidate)
        || ctx.world.is_at_war(candidate)
    {
        return Ok(false);
    }

    let toward_enemy = i64::from(ctx.world.tension(candidate, enemy.leader)?);
    let toward_own = i64::from(ctx.world.tension(candidate, own.leader)?);
    let might = i64::from(ctx.world.house(candidate)?.might);
    let pool = (toward_enemy - toward_own + might).max(0);
    let hits = ctx.roll_hits(u32::try_from(pool).unwrap_or(u32::MAX))?;
    let needed = ctx.world.alliance_might(enemy);
    let joins = hits >= needed;
    tracing::debug!(%candidate, pool, hits, needed, joins, "ally considered");

    if joins {
        let title = ctx.world.house(candidate)?.title();
        let own_title = ctx.world.house(own.leader)?.title();
        let enemy_title = ctx.world.house(enemy.leader)?.title();
        ctx.emit(
            SimEventKind::AllyJoined {
                war: war.id,
                house: candidate,
                side,
            },
            format!(
                "{title} allied with {own_title} in the war against {enemy_title}! [{hits}/{pool} vs {needed}]"
            ),
        );
    }
    Ok(joins)
}

/// Walk `order` from `cursor` until a house agrees to join `side`.
fn next_recruit(
    ctx: &mut SimContext<'_>,
    war: &War,
    side: Side,
    order: &[HouseId],
    cursor: &mut usize,
    other_known_enemies: &[HouseId],
) -> SimResult<Option<HouseId>> {
    while let Some(&candidate) = order.get(*cursor) {
        *cursor += 1;
        if house_will_join(ctx, candidate, war, side, other_known_enemies)? {
            return Ok(Some(candidate));
        }
    }
    Ok(None)
}

/// Declare war and recruit allies for both sides, then register the war.
///
/// Houses are visited in a random order. Each round the attackers and then
/// the defenders pick their next recruit, and both are enlisted only after
/// both picks, so neither side gains might before the other has chosen.
/// The attackers' pick of a round is off limits to the defenders.
pub fn create_war(ctx: &mut SimContext<'_>, attacker: HouseId, defender: HouseId) -> SimResult<WarId> {
    let id = ctx.world.next_war_id();
    let mut war = War::new(id, attacker, defender, ctx.config.starting_morale);

    let attacker_title = ctx.world.house(attacker)?.title();
    let defender_title = ctx.world.house(defender)?.title();
    ctx.emit(
        SimEventKind::WarDeclared {
            war: id,
            attacker,
            defender,
        },
        format!("{attacker_title} declared war against {defender_title}!"),
    );
    tracing::info!(%id, %attacker, %defender, "war declared");

    let order = shuffled(ctx.rng, &ctx.world.house_ids());
    let (mut attacker_cursor, mut defender_cursor) = (0, 0);
    while attacker_cursor < order.len() || defender_cursor < order.len() {
        let attacker_ally =
            next_recruit(ctx, &war, Side::Attackers, &order, &mut attacker_cursor, &[])?;
        let claimed: Vec<HouseId> = attacker_ally.into_iter().collect();
        let defender_ally =
            next_recruit(ctx, &war, Side::Defenders, &order, &mut defender_cursor, &claimed)?;

        war.attackers.allies.extend(attacker_ally);
        war.defenders.allies.extend(defender_ally);
    }

    ctx.world.add_war(war);
    Ok(id)
}

/// Let every house at peace consider declaring war.
///
/// Houses are visited in a random order and each weighs its grievances in
/// a random order. A grievance starts a war when its tension rolls at least
/// the target's might plus the configured threshold. A house declares at
/// most one war per pass; the declaration puts it at war, so it cannot be
/// recruited or declare again this pass.
pub fn start_wars(ctx: &mut SimContext<'_>) -> SimResult<Vec<WarId>> {
    let mut declared = Vec::new();
    let houses = ctx.world.house_ids();
    for house in shuffled(ctx.rng, &houses) {
        if !ctx.world.contains_house(house) || ctx.world.is_at_war(house) {
            continue;
        }
        let grievances: Vec<(HouseId, u32)> = ctx
            .world
            .house(house)?
            .relations
            .iter()
            .map(|(target, relation)| (*target, relation.tension))
            .collect();
        for (target, tension) in shuffled(ctx.rng, &grievances) {
            let hits = ctx.roll_hits(tension)?;
            let needed = ctx.world.house(target)?.might + ctx.config.war_threshold_bonus;
            if hits >= needed {
                declared.push(create_war(ctx, house, target)?);
                break;
            }
        }
    }
    Ok(declared)
}
