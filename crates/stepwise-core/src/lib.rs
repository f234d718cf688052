//! # stepwise-core
//!
//! Core expression engine for the stepwise solver.
//!
//! This crate provides:
//! - Arena-allocated expression storage with hash-consing
//! - Type-safe expression handles
//! - Canonical constructors with automatic simplification
//! - Exact rational numbers backed by `dashu`
//! - Structural utilities, a polynomial view and a LaTeX printer
//!
//! ## Design Principles
//!
//! - **Hash-Consing**: Every structurally unique expression stored exactly once
//! - **Canonical Forms**: Sums and products are flat and sorted on construction
//! - **Request Scope**: One arena per request, dropped with the response

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod arena;
mod canon;
pub mod expr;
pub mod handle;
pub mod intern;
mod latex;
pub mod number;
mod order;
pub mod poly;
mod structure;

mod proptests;

pub use arena::ExprArena;
pub use expr::{Constant, ExprKind, ExprNode, Function, SymbolId};
pub use handle::ExprHandle;
pub use number::{Integer, Rational};
pub use poly::Polynomial;
