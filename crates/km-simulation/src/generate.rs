//! Procedural houses and knights.
//!
//! Names and heraldry are drawn from fixed word lists. House names are
//! unique among live houses and knight names among live knights, so the
//! player can address either by name.

use km_core::{Banner, Gender, HouseId, KnightId, NewKnight, Weapon};
use km_mechanics::choose;

use crate::context::SimContext;
use crate::error::SimResult;
use crate::event::SimEventKind;

const FEMALE_NAMES: &[&str] = &[
    "Adela", "Aelis", "Agnes", "Alys", "Amice", "Avelina", "Beatrix", "Berenice", "Cecily",
    "Clemence", "Constance", "Dionisia", "Edith", "Elaine", "Emma", "Ermengarde", "Felice",
    "Gisela", "Gunilda", "Hawise", "Helewise", "Isabeau", "Isolde", "Joan", "Juliana",
    "Katherine", "Lettice", "Mabel", "Margery", "Matilda", "Maud", "Melisende", "Nicola",
    "Petronilla", "Richenda", "Rohese", "Sibyl", "Tiphaine", "Ysmay", "Yvette",
];

const MALE_NAMES: &[&str] = &[
    "Aldric", "Alard", "Amaury", "Anselm", "Baldwin", "Bertrand", "Bohemond", "Brian", "Conrad",
    "Drogo", "Eudes", "Eustace", "Fulk", "Gawain", "Geoffrey", "Gerard", "Gilbert", "Godfrey",
    "Guy", "Hamon", "Hugh", "Humphrey", "Ingram", "Jocelin", "Lambert", "Leofric", "Miles",
    "Odo", "Osbert", "Percival", "Ralph", "Reynard", "Roger", "Simon", "Tancred", "Thibault",
    "Walter", "Warin", "William", "Wymond",
];

const HOUSE_NAMES: &[&str] = &[
    "Ashby", "Blackmoor", "Brandt", "Carrow", "Corwen", "Dunmere", "Elsworth", "Falkirk",
    "Greyholt", "Harrow", "Hollin", "Ironwood", "Kestrel", "Larkin", "Marwick", "Morrow",
    "Northam", "Oakhart", "Pendry", "Quarrel", "Ravensworth", "Redvers", "Rookwood", "Selby",
    "Stormcrag", "Thorne", "Tunstall", "Umber", "Vane", "Vell", "Westerling", "Whitlock",
    "Wolfram", "Wyvern", "Yarrow",
];

const BANNER_SYMBOLS: &[&str] = &[
    "stag", "wolf", "crab", "crow", "lion", "elephant", "snake", "cross", "heart", "arrow",
    "ship", "rose", "sword", "hanged man", "wheel", "octopus", "horse", "star", "fist",
    "sunrise", "crescent moon", "beaver", "sparrow", "eagle", "chain", "spear", "shield",
    "apple", "raindrop", "cloud", "lightning bolt", "crystal", "demon", "angel", "dragon",
    "griffin", "unicorn", "hydra", "bull", "goat", "sheep",
];

const BANNER_COLOURS: &[&str] = &[
    "crimson", "aqua", "light grey", "dark grey", "black", "white", "pink", "golden", "yellow",
    "blue", "red", "purple", "turquoise", "amber", "violet", "orange", "navy", "magenta",
    "silver", "copper", "teal", "green",
];

const BANNER_ADJECTIVES: &[&str] = &[
    "flaming", "submerged", "bloody", "crowned", "upside down", "striped", "spotted",
    "mirrored", "frozen", "shattered",
];

/// Random draws before falling back to a numbered name.
const NAME_ATTEMPTS: usize = 16;

/// One banner in five carries an adjective.
const ADJECTIVE_ODDS: i64 = 5;

fn unique_name(
    ctx: &mut SimContext<'_>,
    pool: &[&str],
    taken: impl Fn(&SimContext<'_>, &str) -> bool,
) -> String {
    for _ in 0..NAME_ATTEMPTS {
        let name = choose(ctx.rng, pool).copied().unwrap_or("Nameless");
        if !taken(ctx, name) {
            return name.to_string();
        }
    }
    if let Some(free) = pool.iter().find(|name| !taken(ctx, name)) {
        return (*free).to_string();
    }
    let base = choose(ctx.rng, pool).copied().unwrap_or("Nameless");
    (2..)
        .map(|n| format!("{base}-{n}"))
        .find(|name| !taken(ctx, name))
        .unwrap_or_else(|| base.to_string())
}

/// Draw a banner: colour and symbol, sometimes with an adjective.
pub fn generate_banner(ctx: &mut SimContext<'_>) -> Banner {
    let colour = choose(ctx.rng, BANNER_COLOURS).copied().unwrap_or("white");
    let symbol = choose(ctx.rng, BANNER_SYMBOLS).copied().unwrap_or("cross");
    let banner = Banner::new(colour, symbol);
    if ctx.rng.range(0, ADJECTIVE_ODDS) == 0 {
        let adjective = choose(ctx.rng, BANNER_ADJECTIVES)
            .copied()
            .unwrap_or("crowned");
        banner.with_adjective(adjective)
    } else {
        banner
    }
}

/// Found a house with random might and wealth, related to every live house
/// at zero tension.
pub fn generate_house(ctx: &mut SimContext<'_>) -> SimResult<HouseId> {
    let name = unique_name(ctx, HOUSE_NAMES, |ctx, name| {
        ctx.world.find_house_by_name(name).is_ok()
    });
    let banner = generate_banner(ctx);
    let might = ctx.rng.range(1, i64::from(ctx.config.max_might) + 1) as u32;
    let wealth = ctx.rng.range(1, i64::from(ctx.config.max_wealth) + 1) as u32;
    let description = format!(
        "House {name} rises to prominence under {}.",
        banner.description()
    );
    let id = ctx.world.add_house(name, banner, might, wealth);
    ctx.emit(SimEventKind::HouseFounded { house: id }, description);
    Ok(id)
}

/// Recruit a knight with random gender, stats and weapon into a house.
pub fn generate_knight(ctx: &mut SimContext<'_>, house: HouseId) -> SimResult<KnightId> {
    let gender = *choose(ctx.rng, &[Gender::Female, Gender::Male]).unwrap_or(&Gender::Female);
    let pool = match gender {
        Gender::Female => FEMALE_NAMES,
        Gender::Male => MALE_NAMES,
    };
    let name = unique_name(ctx, pool, |ctx, name| ctx.world.knight_name_taken(name));
    let stat_bound = i64::from(ctx.config.stat_max) + 1;
    let prowess = ctx.rng.range(1, stat_bound) as u32;
    let bravery = ctx.rng.range(1, stat_bound) as u32;
    let weapon = *choose(ctx.rng, &Weapon::ALL).unwrap_or(&Weapon::Sword);

    let id = ctx.world.add_knight(
        NewKnight {
            name,
            gender,
            prowess,
            bravery,
            weapon,
        },
        house,
    )?;
    let title = ctx.world.knight_title(id)?;
    let house_title = ctx.world.house(house)?.title();
    ctx.emit(
        SimEventKind::KnightJoined { knight: id, house },
        format!("{title} swore fealty to {house_title}, bearing a {weapon}."),
    );
    Ok(id)
}

/// Recruit a knight into a random live house. Does nothing in an empty realm.
pub fn recruit_knight(ctx: &mut SimContext<'_>) -> SimResult<Option<KnightId>> {
    let houses = ctx.world.house_ids();
    match choose(ctx.rng, &houses).copied() {
        Some(house) => Ok(Some(generate_knight(ctx, house)?)),
        None => {
            tracing::warn!("no house left to take in a new knight");
            Ok(None)
        }
    }
}

/// Populate an empty world and mark one knight as chosen.
///
/// Returns the chosen knight, or `None` if no knights were created.
pub fn generate_world(ctx: &mut SimContext<'_>) -> SimResult<Option<KnightId>> {
    for _ in 0..ctx.config.initial_houses {
        generate_house(ctx)?;
    }
    if ctx.config.initial_houses < 2 {
        tracing::warn!(
            houses = ctx.config.initial_houses,
            "a realm with fewer than two houses will never see war"
        );
    }

    let mut knights = Vec::with_capacity(ctx.config.initial_knights);
    for _ in 0..ctx.config.initial_knights {
        if let Some(id) = recruit_knight(ctx)? {
            knights.push(id);
        }
    }

    let chosen = choose(ctx.rng, &knights).copied();
    if let Some(id) = chosen {
        ctx.world.knight_mut(id)?.chosen = true;
        tracing::debug!(%id, "chosen knight marked");
    }
    Ok(chosen)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::event::EventLog;
    use km_core::{Bishop, World};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn with_ctx<T>(config: &GameConfig, f: impl FnOnce(&mut SimContext<'_>) -> T) -> (T, World) {
        let mut world = World::new(Bishop::new(15));
        let mut events = EventLog::new(0);
        let mut rng = StdRng::seed_from_u64(config.seed);
        let mut ctx = SimContext {
            world: &mut world,
            events: &mut events,
            rng: &mut rng,
            config,
        };
        let out = f(&mut ctx);
        (out, world)
    }

    #[test]
    fn world_generation_counts() {
        let config = GameConfig::default();
        let (chosen, world) = with_ctx(&config, |ctx| generate_world(ctx).unwrap());
        assert_eq!(world.houses().len(), 6);
        assert_eq!(world.knights().len(), 10);
        let chosen = chosen.unwrap();
        assert!(world.knight(chosen).unwrap().chosen);
        assert_eq!(world.knights().iter().filter(|k| k.chosen).count(), 1);
        assert!(world.integrity_violations().is_empty());
    }

    #[test]
    fn stats_within_configured_bounds() {
        let config = GameConfig::default().with_initial_knights(60);
        let (_, world) = with_ctx(&config, |ctx| generate_world(ctx).unwrap());
        for house in world.houses() {
            assert!((1..=5).contains(&house.might));
            assert!((1..=5).contains(&house.wealth));
        }
        for knight in world.knights() {
            assert!((1..=5).contains(&knight.prowess));
            assert!((1..=5).contains(&knight.bravery));
        }
    }

    #[test]
    fn knight_names_unique_past_the_word_list() {
        let config = GameConfig::default().with_initial_knights(120);
        let (_, world) = with_ctx(&config, |ctx| generate_world(ctx).unwrap());
        let mut names: Vec<_> = world.knights().iter().map(|k| k.name.to_lowercase()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), 120);
    }

    #[test]
    fn no_chosen_without_knights() {
        let config = GameConfig::default().with_initial_knights(0);
        let (chosen, world) = with_ctx(&config, |ctx| generate_world(ctx).unwrap());
        assert!(chosen.is_none());
        assert!(world.knights().is_empty());
    }

    #[test]
    fn seeded_generation_is_deterministic() {
        let config = GameConfig::default().with_seed(9);
        let (_, a) = with_ctx(&config, |ctx| generate_world(ctx).unwrap());
        let (_, b) = with_ctx(&config, |ctx| generate_world(ctx).unwrap());
        let names = |w: &World| w.knights().iter().map(|k| k.name.clone()).collect::<Vec<_>>();
        assert_eq!(names(&a), names(&b));
    }
}
