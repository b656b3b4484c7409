//! The interactive game: the player acts between seasons.

use std::io::{BufRead, Write};

use colored::Colorize;
use km_simulation::{EventLog, GameConfig, GameStatus, SimError, Simulation};

use super::display;

const HELP: &str = "\
  sponsor <knight>        sponsor a knight with coin
  bless <knight>          bless a knight for their next duel with glory
  marry <knight> <knight> arrange a marriage between two houses
  research <name>         learn about a knight or a house
  houses                  list the houses of the realm
  wars                    list the wars being fought
  tensions                show how every house feels about the others
  done                    end your turn and play the season
  quit                    leave the game";

enum Turn {
    Continue,
    Quit,
}

pub fn run(config: GameConfig, mut input: impl BufRead) -> Result<(), String> {
    let seed = config.seed;
    let goal = config.glory_goal;
    let mut sim = Simulation::new(config).map_err(|e| format!("world generation failed: {e}"))?;
    let mut chronicle = EventLog::new(sim.config().max_events);
    for event in sim.drain_events() {
        chronicle.push(event);
    }
    tracing::info!(seed, systems = ?sim.system_names(), "game started");

    println!("  {} {}", "Knight Manager".bold(), format!("(seed={seed})").dimmed());
    println!("  You are the glory bishop. Earn the Church {goal} glory by sponsoring knights.");
    if let Some(chosen) = sim.chosen() {
        let title = sim.world().knight_title(chosen).map_err(|e| e.to_string())?;
        println!(
            "  Prophecy names {} as the chosen one. Should they die, all is lost.",
            title.yellow().bold()
        );
    }
    println!("  Type 'help' for commands.");

    loop {
        match sim.status() {
            GameStatus::Won => {
                println!("  {}", "The Church's glory is complete. You have won!".green().bold());
                return Ok(());
            }
            GameStatus::Lost => {
                println!("  {}", "The chosen knight has fallen. You have lost.".red().bold());
                return Ok(());
            }
            GameStatus::Ongoing => {}
        }

        let bishop = &sim.world().bishop;
        println!();
        println!(
            "  {} {}",
            format!("Season {}", sim.world().season + 1).bold().underline(),
            format!("(coin {}, glory {}/{goal})", bishop.coin, bishop.glory).dimmed()
        );

        if let Turn::Quit = player_turn(&mut sim, &mut chronicle, &mut input)? {
            println!("  Farewell, your grace.");
            return Ok(());
        }

        sim.season().map_err(|e| format!("simulation error: {e}"))?;
        report(&mut sim, &mut chronicle);
    }
}

/// Print what just happened and keep it for later research.
fn report(sim: &mut Simulation, chronicle: &mut EventLog) {
    let events = sim.drain_events();
    display::print_events(&events, true);
    for event in events {
        chronicle.push(event);
    }
}

fn player_turn(
    sim: &mut Simulation,
    chronicle: &mut EventLog,
    input: &mut impl BufRead,
) -> Result<Turn, String> {
    let mut line = String::new();
    loop {
        print!("> ");
        std::io::stdout().flush().map_err(|e| e.to_string())?;

        line.clear();
        let read = input.read_line(&mut line).map_err(|e| e.to_string())?;
        if read == 0 {
            println!();
            return Ok(Turn::Quit);
        }

        let words: Vec<&str> = line.split_whitespace().collect();
        let Some((&command, args)) = words.split_first() else {
            continue;
        };
        let outcome = match (command.to_lowercase().as_str(), args) {
            ("done" | "end", []) => return Ok(Turn::Continue),
            ("quit" | "exit", []) => return Ok(Turn::Quit),
            ("help", _) => {
                println!("{HELP}");
                Ok(())
            }
            ("houses", []) => {
                println!("{}", display::houses_table(sim.world()));
                Ok(())
            }
            ("wars", []) => {
                if sim.world().wars().is_empty() {
                    println!("  The realm is at peace.");
                } else {
                    println!("{}", display::wars_table(sim.world()));
                }
                Ok(())
            }
            ("tensions", []) => {
                println!("{}", display::tensions_table(sim.world()));
                Ok(())
            }
            ("research", [name]) => research(sim, chronicle, name),
            ("sponsor", [name]) => sponsor(sim, name),
            ("bless", [name]) => bless(sim, name),
            ("marry", [first, second]) => marry(sim, first, second),
            _ => Err(format!("unknown command '{}', type 'help'", line.trim())),
        };
        match outcome {
            Ok(()) => report(sim, chronicle),
            Err(message) => println!("  {}", message.red()),
        }
    }
}

fn research(sim: &Simulation, chronicle: &EventLog, name: &str) -> Result<(), String> {
    let world = sim.world();
    let report = if let Ok(knight) = world.find_knight_by_name(name) {
        display::knight_dossier(world, chronicle, knight.id)?
    } else {
        let house = world
            .find_house_by_name(name)
            .map_err(|_| format!("nobody in the realm is called '{name}'"))?;
        display::house_report(world, chronicle, house.id)?
    };
    println!("{report}");
    Ok(())
}

fn refusal(error: SimError) -> String {
    match error {
        SimError::Refused(reason) => reason,
        other => other.to_string(),
    }
}

fn sponsor(sim: &mut Simulation, name: &str) -> Result<(), String> {
    let id = sim.knight_named(name).map_err(refusal)?;
    sim.sponsor(id).map_err(refusal)?;
    Ok(())
}

fn bless(sim: &mut Simulation, name: &str) -> Result<(), String> {
    let id = sim.knight_named(name).map_err(refusal)?;
    sim.bless(id).map_err(refusal)?;
    Ok(())
}

fn marry(sim: &mut Simulation, first: &str, second: &str) -> Result<(), String> {
    let first = sim.knight_named(first).map_err(refusal)?;
    let second = sim.knight_named(second).map_err(refusal)?;
    sim.marry(first, second).map_err(refusal)?;
    Ok(())
}
