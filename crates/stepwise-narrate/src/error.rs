//! Error types for narration.

use stepwise_calculus::DiffError;
use thiserror::Error;

/// Errors that abandon a narration.
///
/// Narration is best effort: callers drop the lines of a failed narration
/// and keep the computed result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NarrationError {
    /// A derivative shown in the narration could not be computed.
    #[error(transparent)]
    Diff(#[from] DiffError),

    /// A step refers to an antiderivative the proof tree does not provide.
    #[error("no antiderivative known for {0}")]
    MissingAntiderivative(String),

    /// The sign of a discriminant is not a real number.
    #[error("cannot decide the sign of the discriminant {0}")]
    UndecidedDiscriminant(String),
}
