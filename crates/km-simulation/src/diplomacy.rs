//! Tension between houses: world events and arranged marriages.

use km_core::{HouseId, KnightId};
use km_mechanics::choose;

use crate::context::SimContext;
use crate::error::{SimError, SimResult};
use crate::event::SimEventKind;

/// A slight one house commits against another.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorldEvent {
    /// Narration with `{source}` and `{target}` placeholders for house titles.
    pub template: &'static str,
    /// Tension the target gains toward the source.
    pub tension: u32,
}

impl WorldEvent {
    /// Fill in the template.
    pub fn describe(&self, source: &str, target: &str) -> String {
        self.template
            .replace("{source}", source)
            .replace("{target}", target)
    }
}

/// Every slight that can happen in a season.
pub const WORLD_EVENTS: [WorldEvent; 9] = [
    WorldEvent {
        template: "{source} imposed a trade embargo on {target}.",
        tension: 2,
    },
    WorldEvent {
        template: "{source} raided a village in {target}'s lands.",
        tension: 3,
    },
    WorldEvent {
        template: "A noble of {source} offended a noble of {target} during a feast.",
        tension: 1,
    },
    WorldEvent {
        template: "A noble of {source} had a noble of {target} assassinated.",
        tension: 3,
    },
    WorldEvent {
        template: "{source} is blackmailing {target}.",
        tension: 2,
    },
    WorldEvent {
        template: "A noble of {source} killed a noble of {target} in a duel.",
        tension: 2,
    },
    WorldEvent {
        template: "A noble of {source} started a brawl with a noble of {target} during a feast.",
        tension: 1,
    },
    WorldEvent {
        template: "{source} imposed tolls on all roads leading to {target}'s lands.",
        tension: 1,
    },
    WorldEvent {
        template: "{source} deployed a garrison on {target}'s border.",
        tension: 2,
    },
];

/// Let one random house slight another.
///
/// The target's tension toward the source rises. Needs two live houses;
/// returns the offended pair otherwise `None`.
pub fn world_event(ctx: &mut SimContext<'_>) -> SimResult<Option<(HouseId, HouseId)>> {
    let houses = ctx.world.house_ids();
    if houses.len() < 2 {
        tracing::warn!(houses = houses.len(), "too few houses for a world event");
        return Ok(None);
    }
    let Some(event) = choose(ctx.rng, &WORLD_EVENTS).copied() else {
        return Ok(None);
    };
    let Some(&source) = choose(ctx.rng, &houses) else {
        return Ok(None);
    };
    let targets: Vec<HouseId> = houses.into_iter().filter(|h| *h != source).collect();
    let Some(&target) = choose(ctx.rng, &targets) else {
        return Ok(None);
    };

    let tension = ctx.world.raise_tension(target, source, event.tension)?;
    let source_title = ctx.world.house(source)?.title();
    let target_title = ctx.world.house(target)?.title();
    ctx.emit(
        SimEventKind::TensionRaised {
            holder: target,
            toward: source,
            tension,
        },
        format!(
            "{} Tensions increased to {tension}.",
            event.describe(&source_title, &target_title)
        ),
    );
    Ok(Some((source, target)))
}

/// Arrange a marriage between two knights of different houses.
///
/// Refused when the houses fight on opposite sides of a war, when both
/// knights serve the same house, when either is married, or when the
/// bishop lacks the glory. Otherwise the knight of the weaker house (the
/// first knight on equal might) moves to the stronger house, and tension
/// between the two houses drops in both directions. Returns the knight
/// who moved.
pub fn marry_knights(
    ctx: &mut SimContext<'_>,
    first: KnightId,
    second: KnightId,
) -> SimResult<KnightId> {
    let first_title = ctx.world.knight_title(first)?;
    let second_title = ctx.world.knight_title(second)?;
    let (first_house, first_spouse) = {
        let knight = ctx.world.knight(first)?;
        (knight.house, knight.spouse)
    };
    let (second_house, second_spouse) = {
        let knight = ctx.world.knight(second)?;
        (knight.house, knight.spouse)
    };

    if ctx.world.at_war_with(first_house, second_house) {
        return Err(SimError::Refused(format!(
            "{} and {} are at war, they refuse to marry {first_title} and {second_title}",
            ctx.world.house(first_house)?.title(),
            ctx.world.house(second_house)?.title(),
        )));
    }
    if first_house == second_house {
        return Err(SimError::Refused(format!(
            "{first_title} and {second_title} are from the same house, they cannot be wed"
        )));
    }
    for (title, spouse) in [(&first_title, first_spouse), (&second_title, second_spouse)] {
        if let Some(spouse) = spouse {
            return Err(SimError::Refused(format!(
                "{title} is already married to {}, they cannot be wed again",
                ctx.world.knight_title(spouse)?
            )));
        }
    }
    let cost = ctx.config.marriage_glory_cost;
    if ctx.world.bishop.glory < cost {
        return Err(SimError::Refused(format!(
            "arranging a marriage costs {cost} glory, you only have {}",
            ctx.world.bishop.glory
        )));
    }

    ctx.world.bishop.glory -= cost;
    let first_might = ctx.world.house(first_house)?.might;
    let second_might = ctx.world.house(second_house)?.might;
    let (moving, staying, from, to) = if second_might >= first_might {
        (first, second, first_house, second_house)
    } else {
        (second, first, second_house, first_house)
    };

    ctx.world
        .relieve_tension(from, to, ctx.config.marriage_tension_relief)?;
    ctx.world.transfer_knight(moving, to)?;
    ctx.world.wed(moving, staying)?;

    let moving_title = if moving == first { &first_title } else { &second_title };
    let staying_title = if moving == first { &second_title } else { &first_title };
    let house_title = ctx.world.house(to)?.title();
    ctx.emit(
        SimEventKind::KnightsMarried {
            moved: moving,
            stayed: staying,
        },
        format!(
            "{moving_title} married {staying_title} and became a member of {house_title}. Tensions between the houses are reduced by {}.",
            ctx.config.marriage_tension_relief
        ),
    );
    Ok(moving)
}
