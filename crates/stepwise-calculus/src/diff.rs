//! Symbolic differentiation.
//!
//! Sum, product, power and chain rules over the arena expressions, with
//! results rebuilt through the canonical constructors so that constant
//! factors fold on the way up.

use smallvec::SmallVec;
use stepwise_core::{ExprArena, ExprHandle, ExprNode, Function};

use crate::error::DiffError;

/// Differentiates `expr` once with respect to the symbol `var`.
///
/// # Errors
///
/// Returns an error if `var` is not a symbol, or if `expr` contains an
/// equation or an integral that cannot be differentiated.
pub fn differentiate(
    arena: &mut ExprArena,
    expr: ExprHandle,
    var: ExprHandle,
) -> Result<ExprHandle, DiffError> {
    if arena.as_symbol(var).is_none() {
        return Err(DiffError::NotASymbol);
    }
    Differentiator { arena, var }.diff(expr)
}

/// Differentiates `expr` `order` times with respect to `var`.
///
/// # Errors
///
/// Same as [`differentiate`].
pub fn differentiate_n(
    arena: &mut ExprArena,
    expr: ExprHandle,
    var: ExprHandle,
    order: u32,
) -> Result<ExprHandle, DiffError> {
    let mut result = expr;
    for _ in 0..order {
        result = differentiate(arena, result, var)?;
    }
    Ok(result)
}

struct Differentiator<'a> {
    arena: &'a mut ExprArena,
    var: ExprHandle,
}

impl Differentiator<'_> {
    fn depends(&self, expr: ExprHandle) -> bool {
        self.arena.depends_on(expr, self.var)
    }

    fn diff(&mut self, expr: ExprHandle) -> Result<ExprHandle, DiffError> {
        if expr == self.var {
            return Ok(self.arena.integer(1));
        }

        match self.arena.get(expr).clone() {
            ExprNode::Equality { .. } => Err(DiffError::Unsupported("an equation")),
            _ if !self.depends(expr) => Ok(self.arena.integer(0)),

            ExprNode::Number(_) | ExprNode::Symbol(_) | ExprNode::Constant(_) => {
                Ok(self.arena.integer(0))
            }

            ExprNode::Add(args) => {
                let mut terms: SmallVec<[ExprHandle; 4]> = SmallVec::new();
                for arg in args {
                    terms.push(self.diff(arg)?);
                }
                Ok(self.arena.add_many(terms))
            }

            // (f g h)' = f' g h + f g' h + f g h'
            ExprNode::Mul(args) => {
                let mut terms = Vec::with_capacity(args.len());
                for (i, &factor) in args.iter().enumerate() {
                    if !self.depends(factor) {
                        continue;
                    }
                    let d = self.diff(factor)?;
                    let others: SmallVec<[ExprHandle; 4]> = args
                        .iter()
                        .enumerate()
                        .filter(|&(j, _)| j != i)
                        .map(|(_, &h)| h)
                        .chain(std::iter::once(d))
                        .collect();
                    terms.push(self.arena.mul_many(others));
                }
                Ok(self.arena.add_many(terms))
            }

            ExprNode::Pow { base, exp } => self.diff_pow(expr, base, exp),

            ExprNode::Function { func, arg } => {
                let outer = self.outer_derivative(func, arg);
                let inner = self.diff(arg)?;
                Ok(self.arena.mul(outer, inner))
            }

            ExprNode::Derivative { expr: inner, var, order } => {
                let forced = differentiate_n(self.arena, inner, var, order)?;
                self.diff(forced)
            }

            ExprNode::Integral {
                expr: body,
                var,
                bounds: None,
            } if var == self.var => Ok(body),

            ExprNode::Integral { .. } => Err(DiffError::Unsupported("an integral")),
        }
    }

    fn diff_pow(
        &mut self,
        expr: ExprHandle,
        base: ExprHandle,
        exp: ExprHandle,
    ) -> Result<ExprHandle, DiffError> {
        // n u^(n-1) u'
        if !self.depends(exp) {
            let one = self.arena.integer(1);
            let reduced = self.arena.sub(exp, one);
            let power = self.arena.pow(base, reduced);
            let d_base = self.diff(base)?;
            return Ok(self.arena.mul_many([exp, power, d_base]));
        }

        // a^v ln(a) v'
        let ln_base = self.arena.apply(Function::Ln, base);
        let d_exp = self.diff(exp)?;
        if !self.depends(base) {
            return Ok(self.arena.mul_many([expr, ln_base, d_exp]));
        }

        // u^v (v' ln u + v u'/u)
        let d_base = self.diff(base)?;
        let log_part = self.arena.mul(d_exp, ln_base);
        let ratio = self.arena.div(d_base, base);
        let power_part = self.arena.mul(exp, ratio);
        let inner = self.arena.add(log_part, power_part);
        Ok(self.arena.mul(expr, inner))
    }

    /// Derivative of `func` evaluated at `arg`, without the chain factor.
    fn outer_derivative(&mut self, func: Function, arg: ExprHandle) -> ExprHandle {
        let arena = &mut *self.arena;
        match func {
            Function::Sin => arena.apply(Function::Cos, arg),
            Function::Cos => {
                let sin = arena.apply(Function::Sin, arg);
                arena.neg(sin)
            }
            Function::Tan => {
                let tan = arena.apply(Function::Tan, arg);
                let two = arena.integer(2);
                let square = arena.pow(tan, two);
                let one = arena.integer(1);
                arena.add(square, one)
            }
            Function::Asin | Function::Acos => {
                let two = arena.integer(2);
                let square = arena.pow(arg, two);
                let one = arena.integer(1);
                let radicand = arena.sub(one, square);
                let half = arena.rational(-1, 2);
                let inverse_root = arena.pow(radicand, half);
                if func == Function::Asin {
                    inverse_root
                } else {
                    arena.neg(inverse_root)
                }
            }
            Function::Atan => {
                let two = arena.integer(2);
                let square = arena.pow(arg, two);
                let one = arena.integer(1);
                let denominator = arena.add(square, one);
                let minus_one = arena.integer(-1);
                arena.pow(denominator, minus_one)
            }
            Function::Exp => arena.apply(Function::Exp, arg),
            Function::Ln => {
                let minus_one = arena.integer(-1);
                arena.pow(arg, minus_one)
            }
            Function::Abs => {
                let abs = arena.apply(Function::Abs, arg);
                arena.div(arg, abs)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stepwise_core::Constant;

    #[test]
    fn test_power_rule() {
        let mut arena = ExprArena::new();
        let x = arena.symbol("x");
        let three = arena.integer(3);
        let cube = arena.pow(x, three);

        let d = differentiate(&mut arena, cube, x).unwrap();
        assert_eq!(arena.to_latex(d), "3 x^{2}");
    }

    #[test]
    fn test_product_rule() {
        let mut arena = ExprArena::new();
        let x = arena.symbol("x");
        let sin = arena.apply(Function::Sin, x);
        let product = arena.mul(x, sin);

        let d = differentiate(&mut arena, product, x).unwrap();
        let cos = arena.apply(Function::Cos, x);
        let x_cos = arena.mul(x, cos);
        assert_eq!(d, arena.add(x_cos, sin));
    }

    #[test]
    fn test_chain_rule() {
        let mut arena = ExprArena::new();
        let x = arena.symbol("x");
        let two = arena.integer(2);
        let square = arena.pow(x, two);
        let sin = arena.apply(Function::Sin, square);

        let d = differentiate(&mut arena, sin, x).unwrap();
        let cos = arena.apply(Function::Cos, square);
        let expected = arena.mul_many([two, x, cos]);
        assert_eq!(d, expected);
    }

    #[test]
    fn test_exponential_base() {
        let mut arena = ExprArena::new();
        let x = arena.symbol("x");
        let two = arena.integer(2);
        let power = arena.pow(two, x);

        let d = differentiate(&mut arena, power, x).unwrap();
        let ln2 = arena.apply(Function::Ln, two);
        assert_eq!(d, arena.mul(power, ln2));
    }

    #[test]
    fn test_exp_and_ln() {
        let mut arena = ExprArena::new();
        let x = arena.symbol("x");
        let e = arena.constant(Constant::E);
        let exp = arena.pow(e, x);
        assert_eq!(differentiate(&mut arena, exp, x).unwrap(), exp);

        let ln = arena.apply(Function::Ln, x);
        let d = differentiate(&mut arena, ln, x).unwrap();
        let minus_one = arena.integer(-1);
        assert_eq!(d, arena.pow(x, minus_one));
    }

    #[test]
    fn test_other_symbols_are_constants() {
        let mut arena = ExprArena::new();
        let x = arena.symbol("x");
        let y = arena.symbol("y");
        let product = arena.mul(x, y);

        assert_eq!(differentiate(&mut arena, product, x).unwrap(), y);
        let zero = arena.integer(0);
        assert_eq!(differentiate(&mut arena, y, x).unwrap(), zero);
    }

    #[test]
    fn test_higher_order() {
        let mut arena = ExprArena::new();
        let x = arena.symbol("x");
        let sin = arena.apply(Function::Sin, x);

        let d2 = differentiate_n(&mut arena, sin, x, 2).unwrap();
        assert_eq!(d2, arena.neg(sin));
    }

    #[test]
    fn test_pending_derivative_is_forced() {
        let mut arena = ExprArena::new();
        let x = arena.symbol("x");
        let two = arena.integer(2);
        let square = arena.pow(x, two);
        let pending = arena.derivative(square, x, 1);

        let d = differentiate(&mut arena, pending, x).unwrap();
        assert_eq!(d, two);
    }

    #[test]
    fn test_errors() {
        let mut arena = ExprArena::new();
        let x = arena.symbol("x");
        let two = arena.integer(2);
        assert_eq!(
            differentiate(&mut arena, x, two),
            Err(DiffError::NotASymbol)
        );

        let eq = arena.equality(x, two);
        assert!(matches!(
            differentiate(&mut arena, eq, x),
            Err(DiffError::Unsupported(_))
        ));
    }
}
