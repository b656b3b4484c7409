pub mod display;
pub mod play;
pub mod simulate;

use std::path::Path;

use km_simulation::GameConfig;

/// Build the game rules from an optional TOML file and seed override.
///
/// The seed comes from `--seed`, else from the file, else it is random.
pub fn load_config(path: Option<&Path>, seed: Option<u64>) -> Result<GameConfig, String> {
    let (config, seeded) = match path {
        Some(path) => {
            let source = std::fs::read_to_string(path)
                .map_err(|e| format!("cannot read {}: {e}", path.display()))?;
            let seeded = source
                .parse::<toml::Table>()
                .is_ok_and(|table| table.contains_key("seed"));
            let config = GameConfig::from_toml(&source)
                .map_err(|e| format!("{}: {e}", path.display()))?;
            (config, seeded)
        }
        None => (GameConfig::default(), false),
    };

    let config = match seed {
        Some(seed) => config.with_seed(seed),
        None if seeded => config,
        None => config.with_seed(rand::random()),
    };
    tracing::debug!(?path, seed = config.seed, "configuration loaded");
    Ok(config)
}
