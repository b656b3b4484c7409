use colored::Colorize;
use serde_json::json;

use km_simulation::{GameConfig, GameStatus, SimEventKind, Simulation};

use super::display;

pub fn run(config: GameConfig, seasons: u32, verbose: bool, json: bool) -> Result<(), String> {
    let seed = config.seed;
    let mut sim = Simulation::new(config).map_err(|e| format!("world generation failed: {e}"))?;
    tracing::info!(seed, seasons, systems = ?sim.system_names(), "simulating");
    let played = sim
        .run(seasons)
        .map_err(|e| format!("simulation error: {e}"))?;
    let status = sim.status();
    tracing::info!(played, ?status, events = sim.events().len(), "simulation finished");

    if json {
        let report = json!({
            "seed": seed,
            "seasons": played,
            "status": status,
            "events": sim.events().events(),
            "world": sim.world(),
        });
        let text = serde_json::to_string_pretty(&report)
            .map_err(|e| format!("JSON serialization failed: {e}"))?;
        println!("{text}");
        return Ok(());
    }

    println!(
        "  {} {}",
        "Knight Manager".bold(),
        format!("({played} seasons, seed={seed})").dimmed()
    );
    let events = sim.events().events();
    let count = |pred: fn(&SimEventKind) -> bool| events.iter().filter(|e| pred(&e.kind)).count();
    println!(
        "  {} wars declared, {} ended, {} knights fell, {} houses destroyed",
        count(|k| matches!(k, SimEventKind::WarDeclared { .. })),
        count(|k| matches!(k, SimEventKind::WarEnded { .. })),
        count(|k| matches!(k, SimEventKind::KnightDied { .. })),
        count(|k| matches!(k, SimEventKind::HouseDestroyed { .. })),
    );
    println!();

    println!(
        "  {}",
        if verbose { "Chronicle" } else { "Notable Events" }.bold().underline()
    );
    display::print_events(events, verbose);
    println!();

    println!("  {}", "Houses".bold().underline());
    println!("{}", display::houses_table(sim.world()));
    println!();

    if sim.world().wars().is_empty() {
        println!("  {}", "The realm is at peace.".dimmed());
    } else {
        println!("  {}", "Wars".bold().underline());
        println!("{}", display::wars_table(sim.world()));
    }
    println!();

    match status {
        GameStatus::Ongoing => {}
        GameStatus::Won => println!("  {}", "The Church's glory is complete.".green().bold()),
        GameStatus::Lost => println!("  {}", "The chosen knight has fallen.".red().bold()),
    }
    Ok(())
}
