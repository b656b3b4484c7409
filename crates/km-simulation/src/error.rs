use km_core::{CoreError, WarId};
use km_mechanics::MechError;

/// Alias for `Result<T, SimError>`.
pub type SimResult<T> = Result<T, SimError>;

/// Errors raised by the season engine.
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    /// A registry lookup or mutation failed.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A dice pool was built from an invalid rating.
    #[error(transparent)]
    Mechanics(#[from] MechError),

    /// `end_war` was called while both alliances still had morale.
    #[error("{0} is not over")]
    WarNotOver(WarId),

    /// The rules forbid a player action. Nothing was changed.
    #[error("{0}")]
    Refused(String),

    /// A configuration value is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A configuration file could not be parsed.
    #[error("could not parse configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),
}
