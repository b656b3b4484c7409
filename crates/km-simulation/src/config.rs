use serde::{Deserialize, Serialize};

use crate::error::{SimError, SimResult};

/// Configuration for a game.
///
/// Every field has a default, so a TOML file only needs to name the values
/// it overrides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// RNG seed for deterministic games.
    pub seed: u64,
    /// Upper bound of house might.
    pub max_might: u32,
    /// Upper bound of house wealth.
    pub max_wealth: u32,
    /// Upper bound of knight prowess and bravery.
    pub stat_max: u32,
    /// Houses created by world generation.
    pub initial_houses: usize,
    /// Knights created by world generation.
    pub initial_knights: usize,
    /// The bishop's coin at the start of the game.
    pub starting_coin: u32,
    /// Coin the bishop receives every season.
    pub coin_per_season: u32,
    /// Knights that join a random house every season.
    pub knights_per_season: usize,
    /// Morale of both alliances when a war is declared.
    pub starting_morale: i32,
    /// Added to the target's might to get the hits needed to declare war.
    pub war_threshold_bonus: u32,
    /// Glory spent to arrange a marriage.
    pub marriage_glory_cost: u32,
    /// Tension removed in both directions by a marriage.
    pub marriage_tension_relief: u32,
    /// Glory per blessing step: the nth blessing costs `n * step`.
    pub blessing_glory_step: u32,
    /// Glory needed to win.
    pub glory_goal: u32,
    /// Maximum event log size (oldest events dropped when exceeded). 0 = unlimited.
    pub max_events: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            max_might: 5,
            max_wealth: 5,
            stat_max: 5,
            initial_houses: 6,
            initial_knights: 10,
            starting_coin: 15,
            coin_per_season: 5,
            knights_per_season: 1,
            starting_morale: 6,
            war_threshold_bonus: 3,
            marriage_glory_cost: 50,
            marriage_tension_relief: 5,
            blessing_glory_step: 10,
            glory_goal: 500,
            max_events: 0,
        }
    }
}

impl GameConfig {
    /// Parse overrides from TOML and validate the result.
    pub fn from_toml(source: &str) -> SimResult<Self> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations that cannot produce a playable world.
    pub fn validate(&self) -> SimResult<()> {
        if self.max_might == 0 || self.max_wealth == 0 || self.stat_max == 0 {
            return Err(SimError::InvalidConfig(
                "max_might, max_wealth and stat_max must be at least 1".into(),
            ));
        }
        if self.starting_morale <= 0 {
            return Err(SimError::InvalidConfig(
                "starting_morale must be positive".into(),
            ));
        }
        Ok(())
    }

    /// Set the RNG seed for deterministic games.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the number of knights created at the start.
    pub fn with_initial_knights(mut self, knights: usize) -> Self {
        self.initial_knights = knights;
        self
    }

    /// Set the bishop's starting coin.
    pub fn with_starting_coin(mut self, coin: u32) -> Self {
        self.starting_coin = coin;
        self
    }

    /// Set the glory needed to win.
    pub fn with_glory_goal(mut self, glory: u32) -> Self {
        self.glory_goal = glory;
        self
    }

    /// Set the maximum event log size (0 = unlimited).
    pub fn with_max_events(mut self, max: usize) -> Self {
        self.max_events = max;
        self
    }
}
