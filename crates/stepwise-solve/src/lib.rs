//! Single-variable equation solving for the stepwise solver.
//!
//! An equation `lhs = rhs` is solved as `lhs - rhs = 0` for the
//! alphabetically first symbol it contains. The solver tries, in order:
//!
//! - **Zero products**: each factor is solved on its own, and roots of a
//!   denominator factor are discarded
//! - **Polynomials**: closed forms up to degree two, rational root
//!   deflation above
//! - **Denominators**: a sum of fractions is multiplied through by its
//!   denominators once
//! - **Isolation**: invertible outer operations are peeled off
//!
//! # Example
//!
//! ```
//! use stepwise_core::ExprArena;
//! use stepwise_solve::solve;
//!
//! let mut arena = ExprArena::new();
//! let x = arena.symbol("x");
//! let two = arena.integer(2);
//! let four = arena.integer(4);
//!
//! // 2x + 4 = 0
//! let two_x = arena.mul(two, x);
//! let lhs = arena.add(two_x, four);
//! let zero = arena.integer(0);
//! let equation = arena.equality(lhs, zero);
//!
//! let roots = solve(&mut arena, equation).unwrap();
//! assert_eq!(arena.list_to_latex(&roots), r"\left[ -2\right]");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod isolate;
pub mod univariate;

mod proptests;

pub use error::SolveError;
pub use isolate::isolate;
pub use univariate::{discriminant, linear_root, polynomial_roots, quadratic_root};

use stepwise_core::{ExprArena, ExprHandle, ExprNode, Polynomial, Rational};
use tracing::debug;

/// Solves an equation for its unknown.
///
/// A non-equation `f` is solved as `f = 0`. Real numeric roots come first
/// in ascending order, followed by the remaining roots in the order they
/// were found; each root is listed once.
///
/// # Errors
///
/// Returns [`SolveError::NoUnknown`] if the equation has no free symbol and
/// [`SolveError::Unsupported`] if no method applies.
pub fn solve(arena: &mut ExprArena, equation: ExprHandle) -> Result<Vec<ExprHandle>, SolveError> {
    let var = unknown(arena, equation).ok_or(SolveError::NoUnknown)?;
    let expr = match *arena.get(equation) {
        ExprNode::Equality { lhs, rhs } => arena.sub(lhs, rhs),
        _ => equation,
    };
    debug!(unknown = %arena.to_latex(var), expr = %arena.to_latex(expr), "solving");

    let roots = Solver { arena, var }.solve(expr, true)?;
    let roots = discard_extraneous(arena, equation, var, roots);
    Ok(order_roots(arena, roots))
}

/// Relative tolerance when checking a root numerically.
const RESIDUAL_TOLERANCE: f64 = 1e-9;

/// The symbol an equation is solved for: the alphabetically first one.
pub fn unknown(arena: &mut ExprArena, expr: ExprHandle) -> Option<ExprHandle> {
    let id = arena.free_symbols(expr).first().copied()?;
    Some(arena.intern(ExprNode::Symbol(id)))
}

struct Solver<'a> {
    arena: &'a mut ExprArena,
    var: ExprHandle,
}

impl Solver<'_> {
    fn depends(&self, expr: ExprHandle) -> bool {
        self.arena.depends_on(expr, self.var)
    }

    fn solve(&mut self, expr: ExprHandle, clear_denominators: bool) -> Result<Vec<ExprHandle>, SolveError> {
        if let ExprNode::Mul(factors) = self.arena.get(expr).clone() {
            return self.zero_product(&factors);
        }
        if let Some(poly) = Polynomial::from_expr(self.arena, expr, self.var) {
            debug!(degree = ?poly.degree(), "polynomial equation");
            return polynomial_roots(self.arena, &poly);
        }
        if clear_denominators {
            if let Some((cleared, poles)) = self.clear_denominators(expr) {
                debug!("cleared denominators");
                let roots = self.solve(cleared, false)?;
                return Ok(self.exclude_poles(roots, &poles));
            }
        }
        let zero = self.arena.integer(0);
        isolate(self.arena, expr, zero, self.var)
    }

    fn zero_product(&mut self, factors: &[ExprHandle]) -> Result<Vec<ExprHandle>, SolveError> {
        let mut roots = Vec::new();
        let mut poles = Vec::new();
        for &factor in factors {
            if !self.depends(factor) {
                continue;
            }
            match *self.arena.get(factor) {
                ExprNode::Pow { base, exp }
                    if self.arena.as_number(exp).is_some_and(Rational::is_negative) =>
                {
                    poles.push(base);
                }
                _ => roots.extend(self.solve(factor, true)?),
            }
        }
        Ok(self.exclude_poles(roots, &poles))
    }

    /// Multiplies a sum by every denominator that depends on the unknown.
    ///
    /// Returns the expanded product and the denominators.
    fn clear_denominators(&mut self, expr: ExprHandle) -> Option<(ExprHandle, Vec<ExprHandle>)> {
        let ExprNode::Add(terms) = self.arena.get(expr).clone() else {
            return None;
        };

        let mut denominators: Vec<(ExprHandle, Rational)> = Vec::new();
        for term in terms {
            let factors = match self.arena.get(term) {
                ExprNode::Mul(args) => args.to_vec(),
                _ => vec![term],
            };
            for factor in factors {
                let ExprNode::Pow { base, exp } = *self.arena.get(factor) else {
                    continue;
                };
                let Some(power) = self.arena.as_number(exp).filter(|e| e.is_negative()).map(|e| -e) else {
                    continue;
                };
                if !self.depends(base) {
                    continue;
                }
                match denominators.iter_mut().find(|(b, _)| *b == base) {
                    Some((_, highest)) => {
                        if power > *highest {
                            *highest = power;
                        }
                    }
                    None => denominators.push((base, power)),
                }
            }
        }
        if denominators.is_empty() {
            return None;
        }

        let mut multipliers = Vec::with_capacity(denominators.len());
        for (base, power) in &denominators {
            let power = self.arena.number(power.clone());
            multipliers.push(self.arena.pow(*base, power));
        }
        let multiplier = self.arena.mul_many(multipliers);
        let product = self.arena.mul(multiplier, expr);
        let cleared = self.arena.expand(product);
        Some((cleared, denominators.into_iter().map(|(base, _)| base).collect()))
    }

    fn exclude_poles(&mut self, roots: Vec<ExprHandle>, poles: &[ExprHandle]) -> Vec<ExprHandle> {
        let mut kept = Vec::with_capacity(roots.len());
        for root in roots {
            let mut is_pole = false;
            for &pole in poles {
                let value = self.arena.substitute(pole, self.var, root);
                if self.arena.get(value).is_zero() {
                    is_pole = true;
                    break;
                }
            }
            if is_pole {
                debug!(root = %self.arena.to_latex(root), "discarding root of a denominator");
            } else {
                kept.push(root);
            }
        }
        kept
    }
}

/// Drops roots that divide by zero or numerically miss the equation.
///
/// Roots whose check does not evaluate to a real number are kept.
fn discard_extraneous(
    arena: &mut ExprArena,
    equation: ExprHandle,
    var: ExprHandle,
    roots: Vec<ExprHandle>,
) -> Vec<ExprHandle> {
    let zero = arena.integer(0);
    let (lhs, rhs) = match *arena.get(equation) {
        ExprNode::Equality { lhs, rhs } => (lhs, rhs),
        _ => (equation, zero),
    };

    let mut kept = Vec::with_capacity(roots.len());
    for root in roots {
        let left = arena.substitute(lhs, var, root);
        let right = arena.substitute(rhs, var, root);
        let divides_by_zero = [root, left, right].iter().any(|&e| arena.has_zero_division(e));
        let misses = match (arena.eval_f64(left), arena.eval_f64(right)) {
            (Some(l), Some(r)) => (l - r).abs() > RESIDUAL_TOLERANCE * l.abs().max(r.abs()).max(1.0),
            _ => false,
        };
        if divides_by_zero || misses {
            debug!(root = %arena.to_latex(root), "discarding extraneous root");
        } else {
            kept.push(root);
        }
    }
    kept
}

/// Removes duplicates, then puts real numeric roots first in ascending order.
fn order_roots(arena: &ExprArena, roots: Vec<ExprHandle>) -> Vec<ExprHandle> {
    let mut unique: Vec<ExprHandle> = Vec::with_capacity(roots.len());
    for root in roots {
        if !unique.contains(&root) {
            unique.push(root);
        }
    }

    let mut real: Vec<(f64, ExprHandle)> = Vec::new();
    let mut rest: Vec<ExprHandle> = Vec::new();
    for root in unique {
        match arena.eval_f64(root) {
            Some(value) => real.push((value, root)),
            None => rest.push(root),
        }
    }
    real.sort_by(|a, b| a.0.total_cmp(&b.0));
    real.into_iter().map(|(_, root)| root).chain(rest).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use stepwise_core::{Constant, Function};

    fn setup() -> (ExprArena, ExprHandle) {
        let mut arena = ExprArena::new();
        let x = arena.symbol("x");
        (arena, x)
    }

    /// Builds `sum c_i x^i = 0`.
    fn polynomial_equation(arena: &mut ExprArena, x: ExprHandle, coeffs: &[i64]) -> ExprHandle {
        let mut terms = Vec::new();
        for (degree, &c) in coeffs.iter().enumerate() {
            let c = arena.integer(c);
            let d = arena.integer(i64::try_from(degree).unwrap());
            let power = arena.pow(x, d);
            terms.push(arena.mul(c, power));
        }
        let lhs = arena.add_many(terms);
        let zero = arena.integer(0);
        arena.equality(lhs, zero)
    }

    fn solve_latex(arena: &mut ExprArena, equation: ExprHandle) -> String {
        let roots = solve(arena, equation).unwrap();
        arena.list_to_latex(&roots)
    }

    #[rstest]
    #[case::linear(&[4, 2], r"\left[ -2\right]")]
    #[case::quadratic(&[6, -5, 1], r"\left[ 2, \  3\right]")]
    #[case::double_root(&[1, -2, 1], r"\left[ 1\right]")]
    #[case::cubic(&[-6, 11, -6, 1], r"\left[ 1, \  2, \  3\right]")]
    #[case::zero_root(&[0, -4, 0, 1], r"\left[ -2, \  0, \  2\right]")]
    #[case::irrational(&[-2, 0, 1], r"\left[ - \sqrt{2}, \  \sqrt{2}\right]")]
    fn test_polynomials(#[case] coeffs: &[i64], #[case] expected: &str) {
        let (mut arena, x) = setup();
        let equation = polynomial_equation(&mut arena, x, coeffs);
        assert_eq!(solve_latex(&mut arena, equation), expected);
    }

    #[test]
    fn test_complex_roots() {
        let (mut arena, x) = setup();
        let equation = polynomial_equation(&mut arena, x, &[1, 1, 1]);
        assert_eq!(
            solve_latex(&mut arena, equation),
            r"\left[ - \frac{1}{2} - \frac{\sqrt{3} i}{2}, \  - \frac{1}{2} + \frac{\sqrt{3} i}{2}\right]"
        );
    }

    #[test]
    fn test_unknown_is_alphabetically_first() {
        let mut arena = ExprArena::new();
        let y = arena.symbol("y");
        let b = arena.symbol("b");
        let equation = arena.equality(y, b);
        assert_eq!(solve(&mut arena, equation).unwrap(), vec![y]);
    }

    #[test]
    fn test_zero_product_skips_denominator_roots() {
        let (mut arena, x) = setup();
        let one = arena.integer(1);
        let two = arena.integer(2);
        let x_squared = arena.pow(x, two);
        let numerator = arena.sub(x_squared, one);
        let denominator = arena.sub(x, one);
        let lhs = arena.div(numerator, denominator);
        let zero = arena.integer(0);
        let equation = arena.equality(lhs, zero);

        assert_eq!(solve(&mut arena, equation).unwrap(), vec![arena.integer(-1)]);
    }

    #[test]
    fn test_sum_of_fractions() {
        let (mut arena, x) = setup();
        let one = arena.integer(1);
        let minus_one = arena.integer(-1);
        let reciprocal = arena.pow(x, minus_one);
        let equation = arena.equality(reciprocal, one);

        assert_eq!(solve(&mut arena, equation).unwrap(), vec![one]);
    }

    #[rstest]
    #[case::reciprocal(-1)]
    #[case::inverse_square(-2)]
    fn test_vanishing_reciprocal_has_no_roots(#[case] power: i64) {
        let (mut arena, x) = setup();
        let exp = arena.integer(power);
        let lhs = arena.pow(x, exp);
        let zero = arena.integer(0);
        let equation = arena.equality(lhs, zero);

        assert_eq!(solve(&mut arena, equation).unwrap(), Vec::new());
    }

    #[test]
    fn test_shifted_reciprocal_has_no_roots() {
        let (mut arena, x) = setup();
        let one = arena.integer(1);
        let shifted = arena.sub(x, one);
        let lhs = arena.div(one, shifted);
        let zero = arena.integer(0);
        let equation = arena.equality(lhs, zero);

        assert_eq!(solve(&mut arena, equation).unwrap(), Vec::new());
    }

    #[test]
    fn test_negative_square_root_has_no_roots() {
        let (mut arena, x) = setup();
        let root = arena.sqrt(x);
        let minus_one = arena.integer(-1);
        let equation = arena.equality(root, minus_one);

        assert_eq!(solve(&mut arena, equation).unwrap(), Vec::new());
    }

    #[test]
    fn test_candidates_are_checked_against_the_equation() {
        let (mut arena, x) = setup();
        let root = arena.sqrt(x);
        let minus_one = arena.integer(-1);
        let equation = arena.equality(root, minus_one);
        let one = arena.integer(1);
        assert_eq!(discard_extraneous(&mut arena, equation, x, vec![one]), Vec::new());

        // x^2 = 4 keeps both signs
        let two = arena.integer(2);
        let square = arena.pow(x, two);
        let four = arena.integer(4);
        let equation = arena.equality(square, four);
        let minus_two = arena.integer(-2);
        assert_eq!(
            discard_extraneous(&mut arena, equation, x, vec![two, minus_two]),
            vec![two, minus_two]
        );

        // roots that are not real numbers are not judged
        let i = arena.constant(Constant::I);
        let plus_one = arena.add(square, one);
        let zero = arena.integer(0);
        let equation = arena.equality(plus_one, zero);
        assert_eq!(discard_extraneous(&mut arena, equation, x, vec![i]), vec![i]);
    }

    #[test]
    fn test_candidates_dividing_by_zero_are_dropped() {
        let (mut arena, x) = setup();
        let zero = arena.integer(0);
        let minus_one = arena.integer(-1);
        let reciprocal = arena.pow(x, minus_one);
        let equation = arena.equality(reciprocal, zero);
        let infinite = arena.pow(zero, minus_one);

        assert_eq!(discard_extraneous(&mut arena, equation, x, vec![infinite]), Vec::new());
    }

    #[test]
    fn test_trigonometric_roots_are_sorted() {
        let (mut arena, x) = setup();
        let sin = arena.apply(Function::Sin, x);
        let zero = arena.integer(0);
        let equation = arena.equality(sin, zero);

        let pi = arena.constant(Constant::Pi);
        assert_eq!(solve(&mut arena, equation).unwrap(), vec![zero, pi]);
    }

    #[test]
    fn test_no_unknown() {
        let mut arena = ExprArena::new();
        let two = arena.integer(2);
        let three = arena.integer(3);
        let equation = arena.equality(two, three);
        assert_eq!(solve(&mut arena, equation), Err(SolveError::NoUnknown));
    }

    #[test]
    fn test_identity_has_no_roots() {
        let (mut arena, x) = setup();
        let equation = arena.equality(x, x);
        assert_eq!(solve(&mut arena, equation).unwrap(), Vec::new());
    }

    #[test]
    fn test_transcendental_is_unsupported() {
        let (mut arena, x) = setup();
        let cos = arena.apply(Function::Cos, x);
        let equation = arena.equality(cos, x);
        assert!(matches!(
            solve(&mut arena, equation),
            Err(SolveError::Unsupported(_))
        ));
    }
}
