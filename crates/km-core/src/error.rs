use crate::id::{HouseId, KnightId, WarId};

/// Alias for `Result<T, CoreError>`.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur when manipulating the world registry.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// The house is not (or no longer) registered.
    #[error("house not found: {0}")]
    HouseNotFound(HouseId),

    /// The knight is not (or no longer) registered.
    #[error("knight not found: {0}")]
    KnightNotFound(KnightId),

    /// The war is not (or no longer) registered.
    #[error("war not found: {0}")]
    WarNotFound(WarId),

    /// No live house carries this name.
    #[error("could not find house '{0}'")]
    NoHouseNamed(String),

    /// No live knight carries this name.
    #[error("could not find knight '{0}'")]
    NoKnightNamed(String),

    /// A house has no relation with itself.
    #[error("house {0} has no relation with itself")]
    SelfRelation(HouseId),
}
