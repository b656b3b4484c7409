//! Tables and narration shared by `play` and `simulate`.

use colored::{ColoredString, Colorize};
use comfy_table::{Cell, Color, ContentArrangement, Table};
use km_core::{HouseId, KnightId, World};
use km_simulation::{EventLog, SimEvent, SimEventKind};

/// Chronicle entries shown by `research`.
const RECENT_HISTORY: usize = 5;

fn table() -> Table {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table
}

fn house_name(world: &World, id: HouseId) -> String {
    world
        .house(id)
        .map(|h| h.name.clone())
        .unwrap_or_else(|_| id.to_string())
}

/// Every live house with its standing.
pub fn houses_table(world: &World) -> Table {
    let mut table = table();
    table.set_header(vec!["House", "Banner", "Might", "Wealth", "Knights", "Wars"]);
    for house in world.houses() {
        table.add_row(vec![
            house.title(),
            house.banner.to_string(),
            house.might.to_string(),
            house.wealth.to_string(),
            house.knights.len().to_string(),
            world.wars_involving(house.id).to_string(),
        ]);
    }
    table
}

/// The knights of one house, with what sponsoring each would cost.
pub fn knights_table(world: &World, id: HouseId) -> Result<Table, String> {
    let house = world.house(id).map_err(|e| e.to_string())?;
    let mut table = table();
    table.set_header(vec![
        "Knight", "Prowess", "Bravery", "Weapon", "Record", "Cost", "Sponsored",
    ]);
    for member in &house.knights {
        let knight = world.knight(*member).map_err(|e| e.to_string())?;
        let mut name = Cell::new(knight.title(&house.name));
        if knight.chosen {
            name = name.fg(Color::Yellow);
        }
        table.add_row(vec![
            name,
            Cell::new(knight.prowess),
            Cell::new(knight.bravery),
            Cell::new(knight.weapon),
            Cell::new(knight.record_summary()),
            Cell::new(knight.cost(house.might)),
            Cell::new(if knight.sponsored { "yes" } else { "" }),
        ]);
    }
    Ok(table)
}

/// Every live war with both alliances and their morale.
pub fn wars_table(world: &World) -> Table {
    let mut table = table();
    table.set_header(vec!["War", "Attackers", "Morale", "Defenders", "Morale"]);
    for war in world.wars() {
        let side = |houses: Vec<HouseId>| {
            houses
                .into_iter()
                .map(|h| house_name(world, h))
                .collect::<Vec<_>>()
                .join(", ")
        };
        table.add_row(vec![
            war.id.to_string(),
            side(war.attackers.combatants()),
            war.attackers.morale.to_string(),
            side(war.defenders.combatants()),
            war.defenders.morale.to_string(),
        ]);
    }
    table
}

fn tension_cell(tension: u32) -> Cell {
    let cell = Cell::new(tension);
    match tension {
        0 => cell.fg(Color::DarkGrey),
        1..=4 => cell,
        5..=9 => cell.fg(Color::Yellow),
        _ => cell.fg(Color::Red),
    }
}

/// Tension matrix: row house toward column house.
pub fn tensions_table(world: &World) -> Table {
    let mut table = table();
    let mut header = vec![Cell::new("Tension toward")];
    header.extend(world.houses().iter().map(|h| Cell::new(&h.name)));
    table.set_header(header);
    for holder in world.houses() {
        let mut row = vec![Cell::new(&holder.name)];
        for other in world.houses() {
            row.push(match holder.tension_toward(other.id) {
                Some(tension) => tension_cell(tension),
                None => Cell::new("-"),
            });
        }
        table.add_row(row);
    }
    table
}

/// What the bishop's agents learn about a knight.
pub fn knight_dossier(
    world: &World,
    chronicle: &EventLog,
    id: KnightId,
) -> Result<String, String> {
    let knight = world.knight(id).map_err(|e| e.to_string())?;
    let house = world.house(knight.house).map_err(|e| e.to_string())?;
    let mut lines = vec![format!("  {}", knight.title(&house.name).bold())];
    if knight.chosen {
        lines.push(format!("  {}", "Marked by prophecy as the chosen one.".yellow()));
    }
    lines.push(format!(
        "  A {} knight of {} who fights with a {}.",
        knight.gender,
        house.title(),
        knight.weapon
    ));
    lines.push(format!(
        "  Prowess {}, bravery {}, reputation {}.",
        knight.prowess,
        knight.bravery,
        knight.reputation()
    ));
    if knight.sponsored {
        lines.push("  Sponsored by the Church.".to_string());
    } else {
        lines.push(format!(
            "  Sponsoring them would cost {} coin.",
            knight.cost(house.might)
        ));
    }
    if knight.blessings > 0 {
        lines.push(format!("  Carries {} blessing(s) into their next duel.", knight.blessings));
    }
    if let Some(spouse) = knight.spouse {
        let spouse = world.knight_title(spouse).map_err(|e| e.to_string())?;
        lines.push(format!("  Married to {spouse}."));
    }
    if knight.battle_results.is_empty() {
        lines.push("  Has never fought a battle.".to_string());
    } else {
        lines.push(format!("  Battle record: {}", knight.record_summary()));
    }
    for slain in &knight.slain {
        lines.push(format!("  Slew {} of House {}.", slain.title, slain.house));
    }
    push_history(&mut lines, &chronicle.events_for_knight(id));
    Ok(lines.join("\n"))
}

/// A house, its grievances, its recent history and its knights.
pub fn house_report(
    world: &World,
    chronicle: &EventLog,
    id: HouseId,
) -> Result<String, String> {
    let house = world.house(id).map_err(|e| e.to_string())?;
    let mut lines = vec![
        format!("  {}", house.title().bold()),
        format!("  {}", house.banner.description()),
        format!("  Might {}, wealth {}.", house.might, house.wealth),
    ];
    let mut grievances: Vec<_> = house
        .relations
        .iter()
        .filter(|(_, r)| r.tension > 0)
        .map(|(other, r)| (r.tension, house_name(world, *other)))
        .collect();
    grievances.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.cmp(&b.1)));
    if grievances.is_empty() {
        lines.push("  Holds no grudges.".to_string());
    }
    for (tension, other) in grievances {
        lines.push(format!("  Tension toward House {other}: {tension}"));
    }
    push_history(&mut lines, &chronicle.events_for_house(id));
    lines.push(knights_table(world, id)?.to_string());
    Ok(lines.join("\n"))
}

fn push_history(lines: &mut Vec<String>, events: &[&SimEvent]) {
    if events.is_empty() {
        return;
    }
    lines.push("  Lately:".to_string());
    let skip = events.len().saturating_sub(RECENT_HISTORY);
    for event in &events[skip..] {
        lines.push(format!("    [season {}] {}", event.season + 1, event.description));
    }
}

/// Events worth showing without `--verbose`.
pub fn is_notable(kind: &SimEventKind) -> bool {
    matches!(
        kind,
        SimEventKind::WarDeclared { .. }
            | SimEventKind::WarEnded { .. }
            | SimEventKind::HouseDestroyed { .. }
            | SimEventKind::HouseFounded { .. }
            | SimEventKind::KnightDied { .. }
            | SimEventKind::NicknameEarned { .. }
            | SimEventKind::GloryEarned { .. }
            | SimEventKind::KnightsMarried { .. }
    )
}

pub fn colorize_event(kind: &SimEventKind, description: &str) -> ColoredString {
    match kind {
        SimEventKind::KnightDied { .. } | SimEventKind::HouseDestroyed { .. } => {
            description.red().bold()
        }
        SimEventKind::WarDeclared { .. } | SimEventKind::AllyJoined { .. } => description.red(),
        SimEventKind::WarEnded { .. } | SimEventKind::KnightsMarried { .. } => description.green(),
        SimEventKind::GloryEarned { .. } | SimEventKind::NicknameEarned { .. } => {
            description.yellow()
        }
        SimEventKind::TensionRaised { .. } | SimEventKind::MoraleLost { .. } => description.cyan(),
        SimEventKind::CoinReceived { .. }
        | SimEventKind::FuneralTithe { .. }
        | SimEventKind::KnightSponsored { .. }
        | SimEventKind::KnightBlessed { .. } => description.blue(),
        _ => description.normal(),
    }
}

/// Print a batch of narration, optionally only the notable part.
pub fn print_events(events: &[SimEvent], verbose: bool) {
    for event in events.iter().filter(|e| verbose || is_notable(&e.kind)) {
        let season = format!("[season {:>3}]", event.season + 1).dimmed();
        println!("  {season} {}", colorize_event(&event.kind, &event.description));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use km_core::{Banner, Bishop, Gender, NewKnight, Weapon};

    fn realm() -> (World, HouseId, KnightId) {
        let mut world = World::new(Bishop::new(0));
        let house = world.add_house("Vell", Banner::new("black", "stag"), 3, 2);
        let knight = world
            .add_knight(
                NewKnight {
                    name: "Aldric".into(),
                    gender: Gender::Male,
                    prowess: 3,
                    bravery: 2,
                    weapon: Weapon::Sword,
                },
                house,
            )
            .unwrap();
        (world, house, knight)
    }

    #[test]
    fn dossier_lists_the_knights_history() {
        let (world, house, knight) = realm();
        let mut chronicle = EventLog::new(0);
        chronicle.push(SimEvent::new(
            2,
            SimEventKind::KnightSponsored { knight, cost: 7 },
            "The Church now sponsors Ser Aldric Vell.",
        ));
        chronicle.push(SimEvent::new(
            3,
            SimEventKind::CoinReceived { amount: 5 },
            "The Church received 5 coin in tithes.",
        ));

        let dossier = knight_dossier(&world, &chronicle, knight).unwrap();
        assert!(dossier.contains("Lately:"));
        assert!(dossier.contains("[season 3] The Church now sponsors Ser Aldric Vell."));
        assert!(!dossier.contains("tithes"));

        let report = house_report(&world, &chronicle, house).unwrap();
        assert!(!report.contains("Lately:"));
    }

    #[test]
    fn house_history_keeps_the_latest_entries() {
        let (world, house, _) = realm();
        let mut chronicle = EventLog::new(0);
        for season in 0..8 {
            chronicle.push(SimEvent::new(
                season,
                SimEventKind::MightChanged { house, might: season + 1 },
                format!("House Vell's might is now {}.", season + 1),
            ));
        }

        let report = house_report(&world, &chronicle, house).unwrap();
        assert!(report.contains("[season 8] House Vell's might is now 8."));
        assert!(report.contains("[season 4] House Vell's might is now 4."));
        assert!(!report.contains("might is now 3."));
    }
}
