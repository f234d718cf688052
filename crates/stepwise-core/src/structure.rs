//! Structural queries and rewrites.
//!
//! Tree walks over arena expressions: free symbols, dependency tests,
//! substitution, expansion and numeric evaluation.

use hashbrown::HashMap;
use smallvec::SmallVec;

use crate::arena::ExprArena;
use crate::expr::{ExprNode, SymbolId};
use crate::handle::ExprHandle;
use crate::number::Rational;

/// Largest power of a sum that `expand` multiplies out.
const EXPAND_POWER_LIMIT: i64 = 12;

impl ExprArena {
    /// Returns the free symbols of an expression, sorted by name.
    #[must_use]
    pub fn free_symbols(&self, expr: ExprHandle) -> Vec<SymbolId> {
        let mut found = Vec::new();
        let mut stack = vec![expr];
        while let Some(h) = stack.pop() {
            match self.get(h) {
                ExprNode::Symbol(id) => {
                    if !found.contains(id) {
                        found.push(*id);
                    }
                }
                node => stack.extend(node.children()),
            }
        }
        found.sort_by(|a, b| self.symbol_name(*a).cmp(self.symbol_name(*b)));
        found
    }

    /// Returns true if `needle` occurs anywhere inside `expr`.
    #[must_use]
    pub fn depends_on(&self, expr: ExprHandle, needle: ExprHandle) -> bool {
        if expr == needle {
            return true;
        }
        self.get(expr)
            .children()
            .iter()
            .any(|&child| self.depends_on(child, needle))
    }

    /// Returns true if `expr` contains a zero raised to a negative power.
    #[must_use]
    pub fn has_zero_division(&self, expr: ExprHandle) -> bool {
        match self.get(expr) {
            ExprNode::Pow { base, exp }
                if self.get(*base).is_zero()
                    && self.as_number(*exp).is_some_and(Rational::is_negative) =>
            {
                true
            }
            node => node.children().iter().any(|&child| self.has_zero_division(child)),
        }
    }

    /// Replaces every occurrence of `from` with `to`, renormalizing on the way up.
    pub fn substitute(&mut self, expr: ExprHandle, from: ExprHandle, to: ExprHandle) -> ExprHandle {
        let mut memo = HashMap::new();
        self.substitute_memo(expr, from, to, &mut memo)
    }

    fn substitute_memo(
        &mut self,
        expr: ExprHandle,
        from: ExprHandle,
        to: ExprHandle,
        memo: &mut HashMap<ExprHandle, ExprHandle>,
    ) -> ExprHandle {
        if expr == from {
            return to;
        }
        if let Some(&done) = memo.get(&expr) {
            return done;
        }
        let node = self.get(expr).clone();
        if node.is_atom() {
            return expr;
        }
        let children: SmallVec<[ExprHandle; 4]> = node
            .children()
            .iter()
            .map(|&c| self.substitute_memo(c, from, to, memo))
            .collect();
        let result = self.rebuild(&node, &children);
        memo.insert(expr, result);
        result
    }

    /// Rebuilds a node over new children through the canonical constructors.
    pub fn rebuild(&mut self, node: &ExprNode, children: &[ExprHandle]) -> ExprHandle {
        match node {
            ExprNode::Number(_) | ExprNode::Symbol(_) | ExprNode::Constant(_) => {
                self.intern(node.clone())
            }
            ExprNode::Add(_) => self.add_many(children.iter().copied()),
            ExprNode::Mul(_) => self.mul_many(children.iter().copied()),
            ExprNode::Pow { .. } => self.pow(children[0], children[1]),
            ExprNode::Function { func, .. } => self.apply(*func, children[0]),
            ExprNode::Derivative { order, .. } => self.derivative(children[0], children[1], *order),
            ExprNode::Integral { bounds, .. } => {
                let bounds = bounds.map(|_| (children[2], children[3]));
                self.integral(children[0], children[1], bounds)
            }
            ExprNode::Equality { .. } => self.equality(children[0], children[1]),
        }
    }

    /// Multiplies out products of sums and small positive powers of sums.
    pub fn expand(&mut self, expr: ExprHandle) -> ExprHandle {
        let node = self.get(expr).clone();
        if node.is_atom() {
            return expr;
        }
        let children: SmallVec<[ExprHandle; 4]> =
            node.children().iter().map(|&c| self.expand(c)).collect();

        match node {
            ExprNode::Mul(_) => self.distribute(&children),
            ExprNode::Pow { .. } => {
                let (base, exp) = (children[0], children[1]);
                let n = self.as_number(exp).and_then(Rational::to_i64);
                let is_sum = matches!(self.get(base), ExprNode::Add(_));
                match n {
                    Some(n) if is_sum && (2..=EXPAND_POWER_LIMIT).contains(&n) => {
                        let count = usize::try_from(n).unwrap_or(0);
                        let factors = vec![base; count];
                        self.distribute(&factors)
                    }
                    _ => self.pow(base, exp),
                }
            }
            other => self.rebuild(&other, &children),
        }
    }

    /// Product of factors with every sum multiplied out.
    fn distribute(&mut self, factors: &[ExprHandle]) -> ExprHandle {
        let mut terms: Vec<ExprHandle> = vec![self.integer(1)];
        for &factor in factors {
            let summands: SmallVec<[ExprHandle; 4]> = match self.get(factor) {
                ExprNode::Add(args) => args.clone(),
                _ => smallvec::smallvec![factor],
            };
            let mut next = Vec::with_capacity(terms.len() * summands.len());
            for &t in &terms {
                for &s in &summands {
                    next.push(self.mul(t, s));
                }
            }
            terms = next;
        }
        self.add_many(terms)
    }

    /// Numerically evaluates a real expression without free symbols.
    ///
    /// Returns `None` for symbols, the imaginary unit, unevaluated operations
    /// and any non-finite intermediate value.
    #[must_use]
    pub fn eval_f64(&self, expr: ExprHandle) -> Option<f64> {
        let value = match self.get(expr) {
            ExprNode::Number(n) => n.to_f64(),
            ExprNode::Constant(c) => c.to_f64()?,
            ExprNode::Symbol(_)
            | ExprNode::Derivative { .. }
            | ExprNode::Integral { .. }
            | ExprNode::Equality { .. } => return None,
            ExprNode::Add(args) => args
                .iter()
                .map(|&a| self.eval_f64(a))
                .sum::<Option<f64>>()?,
            ExprNode::Mul(args) => args
                .iter()
                .map(|&a| self.eval_f64(a))
                .product::<Option<f64>>()?,
            ExprNode::Pow { base, exp } => self.eval_f64(*base)?.powf(self.eval_f64(*exp)?),
            ExprNode::Function { func, arg } => func.apply_f64(self.eval_f64(*arg)?),
        };
        value.is_finite().then_some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::{Constant, Function};

    #[test]
    fn test_free_symbols_sorted() {
        let mut arena = ExprArena::new();
        let y = arena.symbol("y");
        let x = arena.symbol("x");
        let sum = arena.add(y, x);
        let sin = arena.apply(Function::Sin, sum);

        let names: Vec<&str> = arena
            .free_symbols(sin)
            .into_iter()
            .map(|id| arena.symbol_name(id))
            .collect();
        assert_eq!(names, vec!["x", "y"]);
    }

    #[test]
    fn test_zero_division_is_found_anywhere() {
        let mut arena = ExprArena::new();
        let x = arena.symbol("x");
        let zero = arena.integer(0);
        let two = arena.integer(2);

        let reciprocal = arena.div(x, zero);
        let sum = arena.add(reciprocal, two);
        assert!(arena.has_zero_division(sum));

        let half = arena.div(x, two);
        let root = arena.sqrt(zero);
        assert!(!arena.has_zero_division(half));
        assert!(!arena.has_zero_division(root));
    }

    #[test]
    fn test_substitute_renormalizes() {
        let mut arena = ExprArena::new();
        let x = arena.symbol("x");
        let y = arena.symbol("y");
        let sum = arena.add(x, y);

        // (x + y)[y := x] = 2x
        let replaced = arena.substitute(sum, y, x);
        let two = arena.integer(2);
        assert_eq!(replaced, arena.mul(two, x));
    }

    #[test]
    fn test_expand_square() {
        let mut arena = ExprArena::new();
        let x = arena.symbol("x");
        let one = arena.integer(1);
        let two = arena.integer(2);

        let sum = arena.add(x, one);
        let square = arena.pow(sum, two);
        let expanded = arena.expand(square);

        let x2 = arena.pow(x, two);
        let two_x = arena.mul(two, x);
        let expected = arena.add_many([x2, two_x, one]);
        assert_eq!(expanded, expected);
    }

    #[test]
    fn test_eval_f64() {
        let mut arena = ExprArena::new();
        let pi = arena.constant(Constant::Pi);
        let two = arena.integer(2);
        let root = arena.sqrt(two);
        let sum = arena.add(pi, root);

        let value = arena.eval_f64(sum).unwrap();
        assert!((value - (std::f64::consts::PI + 2f64.sqrt())).abs() < 1e-12);

        let i = arena.constant(Constant::I);
        assert_eq!(arena.eval_f64(i), None);
        let x = arena.symbol("x");
        assert_eq!(arena.eval_f64(x), None);
    }
}
