//! Season engine for Knight Manager.
//!
//! A [`Simulation`] owns a generated [`km_core::World`] and plays it one
//! season at a time through a pipeline of [`System`]s: a diplomatic slight,
//! a round of every war, new declarations of war, fresh knights and the
//! Church's income. The player acts between seasons by sponsoring,
//! blessing and marrying knights. Every rule draws its dice from the
//! context's random source and narrates into the [`EventLog`].

/// Alliance recruitment and war declaration.
pub mod alliance;
/// Champion selection, duels and house battles.
pub mod combat;
/// Game rules and their TOML overrides.
pub mod config;
/// Mutable context passed to rules and systems.
pub mod context;
/// World events and marriages.
pub mod diplomacy;
/// Error types for the simulation crate.
pub mod error;
/// Narration events and the event log.
pub mod event;
/// Procedural houses, knights and banners.
pub mod generate;
/// Sponsorship and blessings.
pub mod patronage;
/// The default season phases.
pub mod seasons;
/// Top-level game orchestrator.
pub mod simulation;
/// The trait that all season phases implement.
pub mod system;
/// Rounds of battle and peace terms.
pub mod war;

/// Re-export of [`config::GameConfig`].
pub use config::GameConfig;
/// Re-export of [`context::SimContext`].
pub use context::SimContext;
/// Re-exports of [`error::SimError`] and [`error::SimResult`].
pub use error::{SimError, SimResult};
/// Re-exports of [`event::EventLog`], [`event::SimEvent`], and [`event::SimEventKind`].
pub use event::{EventLog, SimEvent, SimEventKind};
/// Re-exports of [`simulation::Simulation`] and [`simulation::GameStatus`].
pub use simulation::{GameStatus, Simulation};
/// Re-export of [`system::System`].
pub use system::System;
/// Re-export of [`war::WarOutcome`].
pub use war::WarOutcome;
