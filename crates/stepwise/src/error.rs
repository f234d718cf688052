//! Error type of the request pipeline.

use stepwise_calculus::EvalError;
use stepwise_latex::ParseError;
use stepwise_solve::SolveError;
use thiserror::Error;

/// A request that produced no answer.
///
/// Narration failures never surface here; they only drop steps.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The input is not a supported LaTeX expression.
    #[error("could not parse input: {0}")]
    Parse(#[from] ParseError),

    /// A pending derivative or integral could not be computed.
    #[error(transparent)]
    Evaluate(#[from] EvalError),

    /// The equation could not be solved.
    #[error(transparent)]
    Solve(#[from] SolveError),

    /// The input or its value divides by zero.
    #[error("division by zero in {0}")]
    DivisionByZero(String),
}
