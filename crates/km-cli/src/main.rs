//! Command-line frontend for Knight Manager.

mod commands;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "knightmanager",
    about = "Knight Manager: sponsor knights and steer the feuds of the great houses",
    version,
    propagate_version = true
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a game as the glory bishop, one season per turn
    Play {
        /// RNG seed (default: random)
        #[arg(short, long)]
        seed: Option<u64>,

        /// TOML file overriding the game rules
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Run seasons without a player and report what happened
    Simulate {
        /// Number of seasons to simulate
        #[arg(short = 'n', long, default_value = "20")]
        seasons: u32,

        /// RNG seed (default: random)
        #[arg(short, long)]
        seed: Option<u64>,

        /// TOML file overriding the game rules
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Show every event, not just the notable ones
        #[arg(short, long)]
        verbose: bool,

        /// Print the chronicle and final world as JSON
        #[arg(long)]
        json: bool,

        /// Keep only the latest N events in the chronicle
        #[arg(long)]
        max_events: Option<usize>,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Play { seed, config } => commands::load_config(config.as_deref(), seed)
            .and_then(|config| commands::play::run(config, std::io::stdin().lock())),
        Commands::Simulate {
            seasons,
            seed,
            config,
            verbose,
            json,
            max_events,
        } => commands::load_config(config.as_deref(), seed).and_then(|config| {
            let config = match max_events {
                Some(max) => config.with_max_events(max),
                None => config,
            };
            commands::simulate::run(config, seasons, verbose, json)
        }),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
