//! Parse errors.

use thiserror::Error;

/// Error produced while lexing or parsing LaTeX input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} at position {position}")]
pub struct ParseError {
    /// Byte offset into the preprocessed input.
    pub position: usize,
    /// What went wrong.
    pub message: String,
}

impl ParseError {
    /// Creates a new parse error.
    pub fn new(position: usize, message: impl Into<String>) -> Self {
        Self {
            position,
            message: message.into(),
        }
    }
}
