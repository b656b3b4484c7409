//! Champion duels and house battles.
//!
//! A battle opens with each house choosing its bravest knight. The duel
//! winner (or the only house able to field a champion) earns a one-die
//! tactical edge for the clash of might that follows. The losing house's
//! knights then roll to survive the rout.

use km_core::{BattleResult, HouseId, KnightId, Side, SlainKnight};
use km_mechanics::rules::{
    battle_glory, defeat_severity, duel_glory, war_adjusted_might,
};
use km_mechanics::{ContestOutcome, resolve_contest};

use crate::context::SimContext;
use crate::error::SimResult;
use crate::event::SimEventKind;

/// How a champion duel ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DuelOutcome {
    /// Both champions rolled the same hits. Nobody was harmed.
    Stalemate,
    /// One champion slew the other.
    Slain {
        /// The surviving champion.
        victor: KnightId,
        /// The dead champion.
        victim: KnightId,
    },
}

/// Pick a house's champion: the knight with the most bravery hits.
///
/// Ties go to strictly higher prowess, so the earliest knight in the
/// house's list wins a full tie. Returns `None` for a house without knights.
pub fn choose_champion(ctx: &mut SimContext<'_>, house: HouseId) -> SimResult<Option<KnightId>> {
    let members = ctx.world.house(house)?.knights.clone();
    let mut best: Option<(KnightId, u32, u32)> = None;
    for id in members {
        let (bravery, prowess) = {
            let knight = ctx.world.knight(id)?;
            (knight.bravery, knight.prowess)
        };
        let hits = ctx.roll_hits(bravery)?;
        let better = match best {
            None => true,
            Some((_, best_hits, best_prowess)) => {
                hits > best_hits || (hits == best_hits && prowess > best_prowess)
            }
        };
        if better {
            best = Some((id, hits, prowess));
        }
    }
    Ok(best.map(|(id, _, _)| id))
}

/// Fight a duel between two champions.
///
/// Each rolls prowess plus blessings. The loser dies, the winner records
/// the kill, and a sponsored winner earns the bishop glory scaled by the
/// loser's prowess and reputation. Both champions' blessings are spent
/// whatever the outcome.
pub fn resolve_duel(
    ctx: &mut SimContext<'_>,
    first: KnightId,
    second: KnightId,
) -> SimResult<DuelOutcome> {
    let first_rating = ctx.world.knight(first)?.duel_rating();
    let second_rating = ctx.world.knight(second)?.duel_rating();
    let first_title = ctx.world.knight_title(first)?;
    let second_title = ctx.world.knight_title(second)?;

    let first_hits = ctx.roll_hits(first_rating)?;
    let second_hits = ctx.roll_hits(second_rating)?;
    tracing::debug!(%first, %second, first_hits, second_hits, "duel rolled");

    ctx.world.knight_mut(first)?.blessings = 0;
    ctx.world.knight_mut(second)?.blessings = 0;

    let (victor, victim) = match resolve_contest(first_hits, second_hits) {
        ContestOutcome::Stalemate => {
            ctx.emit(
                SimEventKind::DuelStalemate { first, second },
                format!(
                    "{first_title} met {second_title} on the battlefield, their duel raged until it met a stalemate [{first_hits}/{first_rating} vs {second_hits}/{second_rating}]."
                ),
            );
            return Ok(DuelOutcome::Stalemate);
        }
        ContestOutcome::FirstWins { .. } => (first, second),
        ContestOutcome::SecondWins { .. } => (second, first),
    };

    let (victor_title, victim_title) = if victor == first {
        (first_title, second_title)
    } else {
        (second_title, first_title)
    };
    let (victim_prowess, victim_reputation, victim_house) = {
        let knight = ctx.world.knight(victim)?;
        let house = ctx.world.house(knight.house)?;
        (knight.prowess, knight.reputation(), house.name.clone())
    };
    let (weapon, sponsored) = {
        let knight = ctx.world.knight(victor)?;
        (knight.weapon, knight.sponsored)
    };

    ctx.emit(
        SimEventKind::DuelWon { victor, victim },
        format!(
            "{} after an intense duel.",
            weapon.kill_message(&victor_title, &victim_title)
        ),
    );

    if sponsored {
        let glory = duel_glory(victim_prowess, victim_reputation);
        ctx.world.bishop.glory += glory;
        ctx.emit(
            SimEventKind::GloryEarned {
                knight: victor,
                amount: glory,
            },
            format!(
                "The Church earned {glory} glory for sponsoring {victor_title}. Your sponsorships have earned the Church {} glory in total.",
                ctx.world.bishop.glory
            ),
        );
    }

    ctx.kill_knight(victim, "was slain in single combat")?;

    let nickname = ctx
        .world
        .knight_mut(victor)?
        .record_slain(SlainKnight {
            title: victim_title,
            house: victim_house,
        })
        .map(str::to_string);
    if let Some(nickname) = nickname {
        let title = ctx.world.knight_title(victor)?;
        ctx.emit(
            SimEventKind::NicknameEarned {
                knight: victor,
                nickname,
            },
            format!("Songs are sung of {title}."),
        );
    }

    Ok(DuelOutcome::Slain { victor, victim })
}

/// Open a battle with a champion duel. Returns the side holding the
/// tactical edge, if any.
fn champion_duel(
    ctx: &mut SimContext<'_>,
    attacker: HouseId,
    defender: HouseId,
) -> SimResult<Option<Side>> {
    let attacking = choose_champion(ctx, attacker)?;
    let defending = choose_champion(ctx, defender)?;
    let attacker_title = ctx.world.house(attacker)?.title();
    let defender_title = ctx.world.house(defender)?.title();

    match (attacking, defending) {
        (None, None) => {
            ctx.emit(
                SimEventKind::NoChampions { attacker, defender },
                "Neither house could field a champion!",
            );
            Ok(None)
        }
        (None, Some(_)) => {
            ctx.emit(
                SimEventKind::ChampionAbsent {
                    house: attacker,
                    edge_to: defender,
                },
                format!(
                    "{attacker_title} could not field a champion, giving {defender_title} a tactical edge!"
                ),
            );
            Ok(Some(Side::Defenders))
        }
        (Some(_), None) => {
            ctx.emit(
                SimEventKind::ChampionAbsent {
                    house: defender,
                    edge_to: attacker,
                },
                format!(
                    "{defender_title} could not field a champion, giving {attacker_title} a tactical edge!"
                ),
            );
            Ok(Some(Side::Attackers))
        }
        (Some(first), Some(second)) => match resolve_duel(ctx, first, second)? {
            DuelOutcome::Stalemate => Ok(None),
            DuelOutcome::Slain { victor, .. } if victor == first => Ok(Some(Side::Attackers)),
            DuelOutcome::Slain { .. } => Ok(Some(Side::Defenders)),
        },
    }
}

/// Fight a battle between two houses.
///
/// Returns the attacker's hits minus the defender's hits. A tie goes to
/// the defender, so the attacker only won if the margin is positive.
pub fn run_battle(ctx: &mut SimContext<'_>, attacker: HouseId, defender: HouseId) -> SimResult<i32> {
    let attacker_title = ctx.world.house(attacker)?.title();
    let defender_title = ctx.world.house(defender)?.title();
    ctx.emit(
        SimEventKind::BattleJoined { attacker, defender },
        format!("{attacker_title} attacks {defender_title}!"),
    );

    let edge = champion_duel(ctx, attacker, defender)?;
    let bonus = |side: Side| u32::from(edge == Some(side));

    let attacker_might = ctx.world.house(attacker)?.might;
    let defender_might = ctx.world.house(defender)?.might;
    let attacker_rating = war_adjusted_might(attacker_might, ctx.world.wars_involving(attacker))
        + bonus(Side::Attackers);
    let defender_rating = war_adjusted_might(defender_might, ctx.world.wars_involving(defender))
        + bonus(Side::Defenders);
    let attacker_hits = ctx.roll_hits(attacker_rating)?;
    let defender_hits = ctx.roll_hits(defender_rating)?;
    tracing::debug!(
        %attacker, %defender, attacker_rating, defender_rating, attacker_hits, defender_hits,
        "battle rolled"
    );

    let (winner, winner_hits, winner_might, loser, loser_hits, loser_might) =
        if attacker_hits > defender_hits {
            (attacker, attacker_hits, attacker_might, defender, defender_hits, defender_might)
        } else {
            (defender, defender_hits, defender_might, attacker, attacker_hits, attacker_might)
        };
    let winner_title = ctx.world.house(winner)?.title();
    let loser_title = ctx.world.house(loser)?.title();
    ctx.emit(
        SimEventKind::BattleDecided {
            winner,
            loser,
            margin: winner_hits - loser_hits,
        },
        format!(
            "{winner_title} [{winner_hits}/{winner_might} hits] defeated {loser_title} [{loser_hits}/{loser_might} hits]!"
        ),
    );

    let glory = battle_glory(ctx.config.max_might, winner_might, loser_might);
    for id in ctx.world.house(winner)?.knights.clone() {
        let knight = ctx.world.knight_mut(id)?;
        knight.battle_results.push(BattleResult::Victory);
        if knight.sponsored {
            ctx.world.bishop.glory += glory;
            let title = ctx.world.knight_title(id)?;
            ctx.emit(
                SimEventKind::GloryEarned {
                    knight: id,
                    amount: glory,
                },
                format!(
                    "The Church earned {glory} glory for sponsoring {title}. Your sponsorships have earned the Church {} glory in total.",
                    ctx.world.bishop.glory
                ),
            );
        }
    }

    let severity = defeat_severity(winner_hits, loser_hits);
    let losers = ctx.world.house(loser)?.knights.clone();
    for id in losers {
        let rating = {
            let knight = ctx.world.knight_mut(id)?;
            knight.battle_results.push(BattleResult::Defeat);
            knight.duel_rating()
        };
        let survival = ctx.roll_hits(rating)?;
        if survival < severity {
            ctx.kill_knight(
                id,
                &format!("was overwhelmed by the enemy forces and killed [{survival}/{rating} vs {severity}]"),
            )?;
        }
    }

    Ok(resolve_contest(attacker_hits, defender_hits).signed_margin())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::scripted as run;
    use km_core::{Banner, Bishop, Gender, NewKnight, Weapon, World};
    use km_mechanics::ScriptedRolls;

    fn recruit(name: &str, prowess: u32, bravery: u32) -> NewKnight {
        NewKnight {
            name: name.into(),
            gender: Gender::Male,
            prowess,
            bravery,
            weapon: Weapon::WarHammer,
        }
    }

    fn realm(might_a: u32, might_b: u32) -> (World, HouseId, HouseId) {
        let mut world = World::new(Bishop::new(0));
        let a = world.add_house("Vell", Banner::new("black", "stag"), might_a, 2);
        let b = world.add_house("Morrow", Banner::new("amber", "wolf"), might_b, 3);
        (world, a, b)
    }

    #[test]
    fn champion_is_bravest() {
        let (mut world, a, _) = realm(3, 3);
        world.add_knight(recruit("Odo", 1, 1), a).unwrap();
        let brave = world.add_knight(recruit("Hugh", 1, 3), a).unwrap();
        // Every die a non-exploding hit: hits equal bravery.
        let mut rng = ScriptedRolls::constant(4);
        let (champion, _) = run(&mut world, &mut rng, |ctx| choose_champion(ctx, a).unwrap());
        assert_eq!(champion, Some(brave));
    }

    #[test]
    fn champion_tie_goes_to_prowess_then_list_order() {
        let (mut world, a, _) = realm(3, 3);
        let first = world.add_knight(recruit("Odo", 2, 2), a).unwrap();
        let strong = world.add_knight(recruit("Hugh", 4, 2), a).unwrap();
        world.add_knight(recruit("Guy", 4, 2), a).unwrap();
        let mut rng = ScriptedRolls::constant(4);
        let (champion, _) = run(&mut world, &mut rng, |ctx| choose_champion(ctx, a).unwrap());
        assert_eq!(champion, Some(strong));
        assert_ne!(champion, Some(first));
    }

    #[test]
    fn no_champion_for_empty_house() {
        let (mut world, a, _) = realm(3, 3);
        let mut rng = ScriptedRolls::constant(4);
        let (champion, _) = run(&mut world, &mut rng, |ctx| choose_champion(ctx, a).unwrap());
        assert_eq!(champion, None);
    }

    #[test]
    fn duel_winner_kills_and_earns_glory() {
        let (mut world, a, b) = realm(3, 3);
        let strong = world.add_knight(recruit("Hugh", 3, 1), a).unwrap();
        let weak = world.add_knight(recruit("Odo", 2, 1), b).unwrap();
        world.sponsor(strong).unwrap();
        world.knight_mut(strong).unwrap().blessings = 1;
        let mut rng = ScriptedRolls::constant(4);

        let (outcome, events) =
            run(&mut world, &mut rng, |ctx| resolve_duel(ctx, strong, weak).unwrap());

        assert_eq!(
            outcome,
            DuelOutcome::Slain {
                victor: strong,
                victim: weak
            }
        );
        assert!(!world.contains_knight(weak));
        let victor = world.knight(strong).unwrap();
        assert_eq!(victor.blessings, 0);
        assert_eq!(victor.slain.len(), 1);
        assert_eq!(victor.slain[0].house, "Morrow");
        // floor(5 * 2 * 1.0)
        assert_eq!(world.bishop.glory, 10);
        assert!(events
            .events()
            .iter()
            .any(|e| e.description.contains("caved in Ser Odo Morrow's chest")));
    }

    #[test]
    fn duel_stalemate_spends_blessings() {
        let (mut world, a, b) = realm(3, 3);
        let first = world.add_knight(recruit("Hugh", 2, 1), a).unwrap();
        let second = world.add_knight(recruit("Odo", 1, 1), b).unwrap();
        world.knight_mut(second).unwrap().blessings = 1;
        let mut rng = ScriptedRolls::constant(4);

        let (outcome, _) =
            run(&mut world, &mut rng, |ctx| resolve_duel(ctx, first, second).unwrap());

        assert_eq!(outcome, DuelOutcome::Stalemate);
        assert!(world.contains_knight(first));
        assert!(world.contains_knight(second));
        assert_eq!(world.knight(second).unwrap().blessings, 0);
    }

    #[test]
    fn third_kill_earns_nickname() {
        let (mut world, a, b) = realm(3, 3);
        let slayer = world.add_knight(recruit("Hugh", 5, 1), a).unwrap();
        let mut rng = ScriptedRolls::constant(4);
        for name in ["Odo", "Guy", "Miles"] {
            let victim = world.add_knight(recruit(name, 1, 1), b).unwrap();
            run(&mut world, &mut rng, |ctx| resolve_duel(ctx, slayer, victim).unwrap());
        }
        assert_eq!(
            world.knight(slayer).unwrap().nickname.as_deref(),
            Some("the Morrow-crusher")
        );
        assert_eq!(world.knight_title(slayer).unwrap(), "Ser Hugh Vell the Morrow-crusher");
    }

    #[test]
    fn battle_without_knights_is_a_pure_might_roll() {
        let (mut world, a, b) = realm(3, 3);
        let mut rng = ScriptedRolls::constant(4);
        let (margin, events) = run(&mut world, &mut rng, |ctx| run_battle(ctx, a, b).unwrap());

        assert_eq!(margin, 0);
        assert!(events
            .events()
            .iter()
            .all(|e| !matches!(e.kind, SimEventKind::DuelWon { .. } | SimEventKind::DuelStalemate { .. })));
        assert!(events
            .events()
            .iter()
            .any(|e| matches!(e.kind, SimEventKind::NoChampions { .. })));
        // The tie went to the defender.
        assert!(events.events().iter().any(|e| matches!(
            e.kind,
            SimEventKind::BattleDecided { winner, .. } if winner == b
        )));
    }

    #[test]
    fn walkover_edge_and_battle_records() {
        let (mut world, a, b) = realm(2, 2);
        let knight = world.add_knight(recruit("Hugh", 1, 1), a).unwrap();
        world.sponsor(knight).unwrap();
        let mut rng = ScriptedRolls::constant(4);

        let (margin, _) = run(&mut world, &mut rng, |ctx| run_battle(ctx, a, b).unwrap());

        // Might 2 plus the edge against might 2.
        assert_eq!(margin, 1);
        assert_eq!(
            world.knight(knight).unwrap().battle_results,
            vec![BattleResult::Victory]
        );
        // (5 + 1) + (2 - 2)
        assert_eq!(world.bishop.glory, 6);
    }

    #[test]
    fn rout_kills_weak_losers() {
        let (mut world, a, b) = realm(5, 1);
        let hero = world.add_knight(recruit("Hugh", 5, 1), a).unwrap();
        let weak = world.add_knight(recruit("Odo", 1, 1), b).unwrap();
        let champion = world.add_knight(recruit("Guy", 3, 3), b).unwrap();
        let hardy = world.add_knight(recruit("Miles", 2, 1), b).unwrap();
        let mut rng = ScriptedRolls::constant(4);

        let (margin, _) = run(&mut world, &mut rng, |ctx| run_battle(ctx, a, b).unwrap());

        // Hugh slays Guy for the edge: 6 hits against 1, severity 2.
        assert_eq!(margin, 5);
        assert!(!world.contains_knight(champion));
        assert!(!world.contains_knight(weak));
        let survivor = world.knight(hardy).unwrap();
        assert_eq!(survivor.battle_results, vec![BattleResult::Defeat]);
        assert_eq!(
            world.knight(hero).unwrap().battle_results,
            vec![BattleResult::Victory]
        );
    }

    #[test]
    fn concurrent_wars_weaken_a_house() {
        let (mut world, a, b) = realm(3, 3);
        let c = world.add_house("Ashby", Banner::new("red", "rose"), 1, 1);
        let d = world.add_house("Thorne", Banner::new("green", "goat"), 1, 1);
        for enemy in [c, d] {
            let id = world.next_war_id();
            world.add_war(km_core::War::new(id, a, enemy, 6));
        }
        let mut rng = ScriptedRolls::constant(4);
        let (margin, _) = run(&mut world, &mut rng, |ctx| run_battle(ctx, a, b).unwrap());
        // 3 - (2 - 1) = 2 hits against 3.
        assert_eq!(margin, -1);
    }
}
