//! Exact numbers backing every numeric literal.

mod integer;
mod rational;

pub use integer::Integer;
pub use rational::{ParseRationalError, Rational};
