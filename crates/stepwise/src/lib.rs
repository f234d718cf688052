//! # Stepwise
//!
//! Solves LaTeX math input and explains how the answer was reached.
//!
//! A request is one LaTeX string: an equation, an integral, a derivative
//! or a plain expression. The answer comes back as LaTeX together with an
//! ordered list of LaTeX lines narrating the derivation.
//!
//! ## Features
//!
//! - **Parsing**: a LaTeX subset covering fractions, roots, powers,
//!   elementary functions, integrals and Leibniz derivatives
//! - **Calculus**: rule-based integration that records its proof tree,
//!   and symbolic differentiation
//! - **Solving**: closed forms for polynomials plus isolation through
//!   invertible functions
//! - **Simplification**: equality saturation via e-graphs
//! - **Narration**: step-by-step explanations built from the engine's own
//!   decisions
//!
//! ## Quick Start
//!
//! ```
//! use stepwise::{solve_latex, Simplifier};
//!
//! let simplifier = Simplifier::new();
//! let solution = solve_latex("x^2 - 5x + 6 = 0", &simplifier).unwrap();
//! assert_eq!(solution.result, r"\left[ 2, \  3\right]");
//! assert!(solution.steps[0].starts_with(r"\text{1. Parse input: }"));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod pipeline;

pub use error::Error;
pub use pipeline::{solve_latex, Solution};

pub use stepwise_calculus as calculus;
pub use stepwise_core as core;
pub use stepwise_latex as latex;
pub use stepwise_narrate as narrate;
pub use stepwise_simplify as simplify;
pub use stepwise_solve as solver;

pub use stepwise_simplify::{Simplifier, SimplifierConfig};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::{solve_latex, Error, Simplifier, SimplifierConfig, Solution};
    pub use stepwise_core::{ExprArena, ExprHandle, ExprKind, ExprNode};
    pub use stepwise_latex::parse_latex;
}
