//! Error types for differentiation and evaluation.

use thiserror::Error;

/// Errors raised while differentiating.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiffError {
    /// The differentiation variable is not a plain symbol.
    #[error("can only differentiate with respect to a symbol")]
    NotASymbol,

    /// The expression contains a node with no derivative rule.
    #[error("cannot differentiate {0}")]
    Unsupported(&'static str),
}

/// Errors raised while forcing pending derivatives and integrals.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
    /// A pending derivative could not be computed.
    #[error(transparent)]
    Diff(#[from] DiffError),

    /// The integration variable is not a plain symbol.
    #[error("can only integrate with respect to a symbol")]
    NotASymbol,
}
