//! Arena allocator for expression storage.
//!
//! This module provides a contiguous memory arena for storing expression
//! nodes. One arena lives for one request: every expression the request
//! parses, derives or prints is interned here and dropped with it.

use hashbrown::HashMap;

use crate::expr::{Constant, ExprKind, ExprNode, SymbolId};
use crate::handle::ExprHandle;
use crate::intern::InternTable;
use crate::number::Rational;

/// The arena storing expressions.
///
/// All expressions are stored contiguously in a `Vec`, with hash-consing
/// ensuring each unique expression is stored exactly once.
#[derive(Debug, Default, Clone)]
pub struct ExprArena {
    /// Storage for all expression nodes.
    nodes: Vec<ExprNode>,
    /// Interning table: maps node content to its handle.
    intern_map: HashMap<ExprNode, ExprHandle>,
    /// Symbol names.
    symbols: InternTable<String>,
}

impl ExprArena {
    /// Creates a new empty arena.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Interns an expression node, returning its handle.
    ///
    /// This stores the node exactly as given. Arithmetic should go through
    /// the canonical constructors (`add`, `mul`, `pow`, `apply`) instead.
    ///
    /// # Panics
    ///
    /// Panics if the arena holds `u32::MAX` nodes.
    pub fn intern(&mut self, node: ExprNode) -> ExprHandle {
        if let Some(&handle) = self.intern_map.get(&node) {
            return handle;
        }

        let index = u32::try_from(self.nodes.len()).expect("arena capacity exceeded");
        let handle = ExprHandle::new(index);
        self.nodes.push(node.clone());
        self.intern_map.insert(node, handle);
        handle
    }

    /// Looks up an already interned node without creating it.
    #[must_use]
    pub fn lookup(&self, node: &ExprNode) -> Option<ExprHandle> {
        self.intern_map.get(node).copied()
    }

    /// Gets the node at the given handle.
    ///
    /// # Panics
    ///
    /// Panics if the handle was produced by a different arena.
    #[must_use]
    pub fn get(&self, handle: ExprHandle) -> &ExprNode {
        &self.nodes[handle.index() as usize]
    }

    /// Returns the number of nodes in the arena.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the arena is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    // === Symbols ===

    /// Interns a symbol name, returning its unique ID.
    pub fn intern_symbol(&mut self, name: &str) -> SymbolId {
        self.symbols.intern(name.to_string())
    }

    /// Gets the name of a symbol by its ID.
    #[must_use]
    pub fn symbol_name(&self, id: SymbolId) -> &str {
        self.symbols.get(id).map_or("?", String::as_str)
    }

    /// Returns the symbol id if the handle is a bare symbol.
    #[must_use]
    pub fn as_symbol(&self, handle: ExprHandle) -> Option<SymbolId> {
        match self.get(handle) {
            ExprNode::Symbol(id) => Some(*id),
            _ => None,
        }
    }

    /// Returns the number if the handle is a numeric literal.
    #[must_use]
    pub fn as_number(&self, handle: ExprHandle) -> Option<&Rational> {
        self.get(handle).as_number()
    }

    /// Returns a symbol named like `preferred` that does not occur in `avoid`.
    ///
    /// Tries `preferred` first, then a short list of conventional names, then
    /// primed variants.
    pub fn fresh_symbol(&mut self, preferred: &str, avoid: &[SymbolId]) -> ExprHandle {
        let taken = |arena: &Self, name: &str| {
            arena
                .symbols
                .get_id(&name.to_string())
                .is_some_and(|id| avoid.contains(&id))
        };

        let mut candidates: Vec<String> = [preferred, "u", "v", "w", "t", "s"]
            .iter()
            .map(|s| (*s).to_string())
            .collect();
        candidates.extend((1..).take(8).map(|i| format!("u_{i}")));

        let name = candidates
            .into_iter()
            .find(|name| !taken(self, name))
            .unwrap_or_else(|| "u_0".to_string());
        self.symbol(&name)
    }

    // === Atom constructors ===

    /// Creates a numeric literal.
    pub fn number(&mut self, value: Rational) -> ExprHandle {
        self.intern(ExprNode::Number(value))
    }

    /// Creates an integer literal.
    pub fn integer(&mut self, value: i64) -> ExprHandle {
        self.number(Rational::from(value))
    }

    /// Creates a rational literal num/den.
    ///
    /// # Panics
    ///
    /// Panics if `den` is zero.
    pub fn rational(&mut self, num: i64, den: i64) -> ExprHandle {
        self.number(Rational::from_i64(num, den))
    }

    /// Creates a symbol expression.
    pub fn symbol(&mut self, name: &str) -> ExprHandle {
        let id = self.intern_symbol(name);
        self.intern(ExprNode::Symbol(id))
    }

    /// Creates a named constant.
    pub fn constant(&mut self, constant: Constant) -> ExprHandle {
        self.intern(ExprNode::Constant(constant))
    }

    // === Unevaluated operations ===

    /// Creates an unevaluated derivative of the given order.
    pub fn derivative(&mut self, expr: ExprHandle, var: ExprHandle, order: u32) -> ExprHandle {
        self.intern(ExprNode::Derivative {
            expr,
            var,
            order: order.max(1),
        })
    }

    /// Creates an unevaluated integral.
    pub fn integral(
        &mut self,
        expr: ExprHandle,
        var: ExprHandle,
        bounds: Option<(ExprHandle, ExprHandle)>,
    ) -> ExprHandle {
        self.intern(ExprNode::Integral { expr, var, bounds })
    }

    /// Creates an equation.
    pub fn equality(&mut self, lhs: ExprHandle, rhs: ExprHandle) -> ExprHandle {
        self.intern(ExprNode::Equality { lhs, rhs })
    }

    /// Classifies an expression by its top-level node.
    #[must_use]
    pub fn classify(&self, handle: ExprHandle) -> ExprKind {
        self.get(handle).kind()
    }
}
