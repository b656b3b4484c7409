//! Core types for Knight Manager: houses, knights, wars, and the world registry.
//!
//! The [`World`] is the single owner of every house, knight and war. Entities
//! refer to each other only by identifier, and the registry's kill and
//! destroy operations clean up every back-reference in one call.

/// The bishop: the player's purse and glory.
pub mod bishop;
/// Heraldic banners.
pub mod banner;
/// Error types used throughout the crate.
pub mod error;
/// Noble houses and their diplomatic relations.
pub mod house;
/// Stable identifiers for registry entries.
pub mod id;
/// Knights and their battle records.
pub mod knight;
/// Wars, alliances and sides.
pub mod war;
/// Weapons and their kill narration.
pub mod weapon;
/// The registry that owns houses, knights and wars.
pub mod world;

pub use banner::Banner;
pub use bishop::Bishop;
pub use error::{CoreError, CoreResult};
pub use house::{DiplomaticRelation, House};
pub use id::{HouseId, KnightId, WarId};
pub use knight::{Gender, Knight, NewKnight, SlainKnight};
pub use km_mechanics::BattleResult;
pub use war::{Alliance, Side, War};
pub use weapon::Weapon;
pub use world::{HouseDestruction, KnightDeath, World};
