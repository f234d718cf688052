//! Cost functions for expression extraction.
//!
//! After equality saturation, we need to pick the "best" expression
//! from each equivalence class. Cost functions define what "best" means.

use egg::{CostFunction, Id, Language};

use crate::language::MathLang;

/// A cost function that minimizes AST size.
///
/// Every node costs one, so a term costs the number of nodes in its tree.
/// The same measure is applied to the input, which lets the engine reject
/// results that are not strictly smaller.
#[derive(Debug, Default, Clone, Copy)]
pub struct AstSizeCost;

impl CostFunction<MathLang> for AstSizeCost {
    type Cost = usize;

    fn cost<C>(&mut self, enode: &MathLang, mut costs: C) -> Self::Cost
    where
        C: FnMut(Id) -> Self::Cost,
    {
        enode.fold(1, |sum, id| sum.saturating_add(costs(id)))
    }
}
