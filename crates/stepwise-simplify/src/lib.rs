//! # stepwise-simplify
//!
//! Equality saturation-based simplification for stepwise expressions.
//!
//! This crate uses the `egg` library to provide:
//! - E-graph based term rewriting with constant folding
//! - Algebraic, trigonometric and exponential/logarithmic rules
//! - AST-size extraction back into the canonical expression arena
//!
//! ## Equality Saturation vs. Greedy Rewriting
//!
//! The canonical constructors of `stepwise-core` already apply every
//! rewrite that always makes an expression simpler. What remains are
//! identities that only pay off in combination (factor, then apply
//! `sin^2 + cos^2 = 1`, then drop the unit factor). Equality saturation
//! explores those paths together and picks the smallest result.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod convert;
pub mod cost;
pub mod engine;
pub mod language;
pub mod rules;

pub use engine::{SimplificationStats, Simplifier, SimplifierConfig};
pub use language::{ConstantFold, MathLang};
