//! # stepwise-narrate
//!
//! Turns decisions already made by the symbolic engine into an ordered list
//! of LaTeX lines, one narrator per operation:
//!
//! - [`narrate_integral`] walks an [`IntegralStep`](stepwise_calculus::IntegralStep)
//!   proof tree, indenting one `\quad ` per level of recursion
//! - [`narrate_derivative`] explains the rule matching the top-level operator
//! - [`narrate_equation`] classifies a polynomial equation by degree and
//!   shows the closed-form solution
//!
//! Narrators never decide anything themselves; every derivative, antiderivative
//! and root they print comes from the engine crates. A narrator that fails
//! returns a [`NarrationError`] and the caller drops its lines.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod derivative;
pub mod equation;
pub mod error;
pub mod integral;

pub use derivative::narrate_derivative;
pub use equation::narrate_equation;
pub use error::NarrationError;
pub use integral::narrate_integral;

/// Indentation added per level of recursion.
pub const INDENT: &str = r"\quad ";
