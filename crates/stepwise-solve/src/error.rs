//! Error types for equation solving.

use thiserror::Error;

/// Errors raised while solving an equation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SolveError {
    /// The equation has no free symbol to solve for.
    #[error("equation has no unknown")]
    NoUnknown,

    /// No method applies to the equation.
    #[error("cannot solve {0}")]
    Unsupported(String),
}
