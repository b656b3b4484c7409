use km_core::{Bishop, KnightId, World};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;

use crate::config::GameConfig;
use crate::context::SimContext;
use crate::diplomacy::marry_knights;
use crate::error::SimResult;
use crate::event::{EventLog, SimEvent};
use crate::generate::generate_world;
use crate::patronage::{bless_knight, sponsor_knight};
use crate::seasons::{IncomeSystem, KnightInfluxSystem, WarOutbreakSystem, WarSystem, WorldEventSystem};
use crate::system::System;

/// Where the game stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GameStatus {
    /// Keep playing.
    Ongoing,
    /// The bishop's glory reached the goal.
    Won,
    /// The chosen knight is dead.
    Lost,
}

/// The top-level game orchestrator.
///
/// Owns the world, RNG, event log, configuration and the season pipeline.
/// Player actions go through here between seasons.
pub struct Simulation {
    world: World,
    rng: StdRng,
    events: EventLog,
    config: GameConfig,
    systems: Vec<Box<dyn System>>,
    chosen: Option<KnightId>,
    initialized: bool,
}

impl std::fmt::Debug for Simulation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Simulation")
            .field("season", &self.world.season)
            .field("systems", &self.systems.len())
            .field("events", &self.events.len())
            .finish()
    }
}

impl Simulation {
    /// Generate a fresh realm and register the default season pipeline.
    pub fn new(config: GameConfig) -> SimResult<Self> {
        config.validate()?;
        let world = World::new(Bishop::new(config.starting_coin));
        let mut sim = Self::bare(world, config);
        let chosen = {
            let mut ctx = sim.context();
            generate_world(&mut ctx)?
        };
        sim.chosen = chosen;
        sim.register_default_systems();
        tracing::info!(
            seed = sim.config.seed,
            houses = sim.world.houses().len(),
            knights = sim.world.knights().len(),
            "realm generated"
        );
        Ok(sim)
    }

    /// A simulation over `world` with no systems registered.
    pub fn bare(world: World, config: GameConfig) -> Self {
        let rng = StdRng::seed_from_u64(config.seed);
        let events = EventLog::new(config.max_events);
        Self {
            world,
            rng,
            events,
            config,
            systems: Vec::new(),
            chosen: None,
            initialized: false,
        }
    }

    fn register_default_systems(&mut self) {
        self.add_system(WorldEventSystem);
        self.add_system(WarSystem);
        self.add_system(WarOutbreakSystem);
        self.add_system(KnightInfluxSystem);
        self.add_system(IncomeSystem);
    }

    /// Register a system. Systems run in registration order.
    pub fn add_system<S: System + 'static>(&mut self, system: S) {
        self.systems.push(Box::new(system));
    }

    /// Names of the registered systems, in order.
    pub fn system_names(&self) -> Vec<&str> {
        self.systems.iter().map(|s| s.name()).collect()
    }

    /// A context over this simulation's state, for rules not wrapped here.
    pub fn context(&mut self) -> SimContext<'_> {
        SimContext {
            world: &mut self.world,
            events: &mut self.events,
            rng: &mut self.rng,
            config: &self.config,
        }
    }

    /// Initialize all registered systems.
    pub fn init(&mut self) -> SimResult<()> {
        if self.initialized {
            return Ok(());
        }
        for i in 0..self.systems.len() {
            let mut system = std::mem::replace(&mut self.systems[i], Box::new(NoopSystem));
            let result = system.init(&mut self.context());
            self.systems[i] = system;
            result?;
        }
        self.initialized = true;
        Ok(())
    }

    /// Play one season: every system in order, then advance the counter.
    pub fn season(&mut self) -> SimResult<()> {
        if !self.initialized {
            self.init()?;
        }

        for i in 0..self.systems.len() {
            let mut system = std::mem::replace(&mut self.systems[i], Box::new(NoopSystem));
            tracing::trace!(system = system.name(), season = self.world.season, "phase");
            let result = system.tick(&mut self.context());
            self.systems[i] = system;
            result?;
        }

        self.world.season += 1;
        Ok(())
    }

    /// Play up to `n` seasons, stopping early once the game is decided.
    /// Returns the number of seasons played.
    pub fn run(&mut self, n: u32) -> SimResult<u32> {
        for played in 0..n {
            if self.status() != GameStatus::Ongoing {
                return Ok(played);
            }
            self.season()?;
        }
        Ok(n)
    }

    /// Lost if the chosen knight has died, else won once glory reaches the goal.
    pub fn status(&self) -> GameStatus {
        if let Some(id) = self.chosen {
            if !self.world.contains_knight(id) {
                return GameStatus::Lost;
            }
        }
        if self.world.bishop.glory >= self.config.glory_goal {
            GameStatus::Won
        } else {
            GameStatus::Ongoing
        }
    }

    /// The knight whose death loses the game.
    pub fn chosen(&self) -> Option<KnightId> {
        self.chosen
    }

    // -----------------------------------------------------------------------
    // Player actions
    // -----------------------------------------------------------------------

    /// Look up a live knight by name, ignoring case.
    pub fn knight_named(&self, name: &str) -> SimResult<KnightId> {
        Ok(self.world.find_knight_by_name(name)?.id)
    }

    /// Sponsor a knight. Returns the coin spent.
    pub fn sponsor(&mut self, id: KnightId) -> SimResult<u32> {
        sponsor_knight(&mut self.context(), id)
    }

    /// Bless a knight. Returns the glory spent.
    pub fn bless(&mut self, id: KnightId) -> SimResult<u32> {
        bless_knight(&mut self.context(), id)
    }

    /// Arrange a marriage. Returns the knight who changed house.
    pub fn marry(&mut self, first: KnightId, second: KnightId) -> SimResult<KnightId> {
        marry_knights(&mut self.context(), first, second)
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    /// The registry.
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Events logged since the last drain.
    pub fn events(&self) -> &EventLog {
        &self.events
    }

    /// Take every event logged since the last drain.
    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        self.events.drain()
    }

    /// The rules this game runs under.
    pub fn config(&self) -> &GameConfig {
        &self.config
    }
}

/// Placeholder system used during the swap-and-tick pattern.
#[derive(Debug)]
struct NoopSystem;

impl System for NoopSystem {
    fn name(&self) -> &str {
        "noop"
    }
    fn tick(&mut self, _ctx: &mut SimContext<'_>) -> SimResult<()> {
        Ok(())
    }
}
