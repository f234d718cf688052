//! # stepwise-calculus
//!
//! Differentiation and rule-based integration for the stepwise solver.
//!
//! Integration does not return a bare antiderivative: [`integral_steps`]
//! builds an [`IntegralStep`] proof tree that records which technique was
//! applied at every level, and [`antiderivative`] reads the result off that
//! tree. The same tree drives the step narration.
//!
//! # Quick Start
//!
//! ```
//! use stepwise_calculus::{antiderivative, integral_steps};
//! use stepwise_core::ExprArena;
//!
//! let mut arena = ExprArena::new();
//! let x = arena.symbol("x");
//!
//! // ∫ x dx = x²/2
//! let steps = integral_steps(&mut arena, x, x);
//! let result = antiderivative(&mut arena, &steps);
//! assert_eq!(arena.to_latex(result), r"\frac{x^{2}}{2}");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod diff;
pub mod error;
pub mod eval;
pub mod manual;
pub mod step;

pub use diff::{differentiate, differentiate_n};
pub use error::{DiffError, EvalError};
pub use eval::{antiderivative, evaluate};
pub use manual::{integral_steps, MAX_DEPTH};
pub use step::{IntegralRule, IntegralStep, TrigForm};
