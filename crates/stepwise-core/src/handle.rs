//! Type-safe expression handles.
//!
//! Handles are 32-bit indices into the arena. Thanks to hash-consing, two
//! handles from the same arena are equal exactly when the expressions are
//! structurally identical.

use std::fmt;

/// A handle to an expression in an [`ExprArena`](crate::ExprArena).
///
/// Handles are only meaningful for the arena that produced them; a request
/// builds one arena and drops it together with all of its handles.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ExprHandle(u32);

impl ExprHandle {
    /// Creates a new handle from an index.
    ///
    /// This is primarily for internal use by the arena.
    #[must_use]
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    /// Returns the raw index of this handle.
    #[must_use]
    pub const fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for ExprHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Expr({})", self.0)
    }
}
