//! Error types for the mechanics engine.

/// Errors that can occur during mechanics operations.
#[derive(Debug, thiserror::Error)]
pub enum MechError {
    /// A dice pool was asked to roll a negative number of dice.
    #[error("negative dice rating: {0}")]
    NegativeRating(i32),
}

/// Convenience result type for mechanics operations.
pub type MechResult<T> = Result<T, MechError>;
