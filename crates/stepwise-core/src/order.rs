//! Structural ordering of expressions.
//!
//! Arguments of sums and products are kept sorted so that hash-consing
//! identifies `x y` with `y x`. Powers sort next to their base, which keeps
//! `x^{2} \sin{\left(x \right)}` in the order a reader expects.

use std::cmp::Ordering;

use crate::arena::ExprArena;
use crate::expr::ExprNode;
use crate::handle::ExprHandle;

impl ExprArena {
    /// Total structural order on expressions of this arena.
    #[must_use]
    pub fn compare(&self, a: ExprHandle, b: ExprHandle) -> Ordering {
        if a == b {
            return Ordering::Equal;
        }
        let (base_a, exp_a) = self.power_parts(a);
        let (base_b, exp_b) = self.power_parts(b);
        if base_a != base_b {
            return self.compare_nodes(base_a, base_b);
        }
        match (exp_a, exp_b) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Less,
            (Some(_), None) => Ordering::Greater,
            (Some(x), Some(y)) => self.compare(x, y),
        }
    }

    fn power_parts(&self, h: ExprHandle) -> (ExprHandle, Option<ExprHandle>) {
        match self.get(h) {
            ExprNode::Pow { base, exp } => (*base, Some(*exp)),
            _ => (h, None),
        }
    }

    fn compare_nodes(&self, a: ExprHandle, b: ExprHandle) -> Ordering {
        let (na, nb) = (self.get(a), self.get(b));
        let rank = rank(na).cmp(&rank(nb));
        if rank != Ordering::Equal {
            return rank;
        }

        match (na, nb) {
            (ExprNode::Number(x), ExprNode::Number(y)) => x.cmp(y),
            (ExprNode::Constant(x), ExprNode::Constant(y)) => x.cmp(y),
            (ExprNode::Symbol(x), ExprNode::Symbol(y)) => {
                self.symbol_name(*x).cmp(self.symbol_name(*y))
            }
            (
                ExprNode::Function { func: f, arg: x },
                ExprNode::Function { func: g, arg: y },
            ) => f.name().cmp(g.name()).then_with(|| self.compare(*x, *y)),
            _ => self.compare_children(&na.children(), &nb.children()),
        }
    }

    fn compare_children(&self, xs: &[ExprHandle], ys: &[ExprHandle]) -> Ordering {
        for (&x, &y) in xs.iter().zip(ys) {
            let ord = self.compare(x, y);
            if ord != Ordering::Equal {
                return ord;
            }
        }
        xs.len().cmp(&ys.len())
    }
}

/// Sort rank of a node kind.
fn rank(node: &ExprNode) -> u8 {
    match node {
        ExprNode::Number(_) => 0,
        ExprNode::Constant(_) => 1,
        ExprNode::Symbol(_) => 2,
        ExprNode::Function { .. } => 3,
        ExprNode::Pow { .. } => 4,
        ExprNode::Mul(_) => 5,
        ExprNode::Add(_) => 6,
        ExprNode::Derivative { .. } => 7,
        ExprNode::Integral { .. } => 8,
        ExprNode::Equality { .. } => 9,
    }
}
