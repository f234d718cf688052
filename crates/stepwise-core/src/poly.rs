//! Univariate polynomial view of an expression.
//!
//! Coefficients are arbitrary expressions free of the variable, so
//! `a x^2 + b x + c` is a quadratic with symbolic coefficients.

use crate::arena::ExprArena;
use crate::expr::ExprNode;
use crate::handle::ExprHandle;

/// Highest degree accepted when viewing an expression as a polynomial.
pub const MAX_DEGREE: usize = 64;

/// A polynomial in one variable with expression coefficients.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Polynomial {
    /// Coefficients in ascending order of degree, trailing zeros trimmed.
    coeffs: Vec<ExprHandle>,
}

impl Polynomial {
    /// Views `expr` as a polynomial in `var` after expansion.
    ///
    /// Returns `None` if some term is not a coefficient times a non-negative
    /// integer power of `var`.
    pub fn from_expr(arena: &mut ExprArena, expr: ExprHandle, var: ExprHandle) -> Option<Self> {
        let expanded = arena.expand(expr);
        let terms: Vec<ExprHandle> = match arena.get(expanded) {
            ExprNode::Add(args) => args.to_vec(),
            _ => vec![expanded],
        };

        let mut buckets: Vec<Vec<ExprHandle>> = Vec::new();
        for term in terms {
            let (coeff, degree) = term_degree(arena, term, var)?;
            if degree > MAX_DEGREE {
                return None;
            }
            if buckets.len() <= degree {
                buckets.resize(degree + 1, Vec::new());
            }
            buckets[degree].push(coeff);
        }

        let mut coeffs: Vec<ExprHandle> = buckets
            .into_iter()
            .map(|parts| arena.add_many(parts))
            .collect();
        while coeffs.last().is_some_and(|&c| arena.get(c).is_zero()) {
            coeffs.pop();
        }
        Some(Self { coeffs })
    }

    /// Returns the degree, or `None` for the zero polynomial.
    #[must_use]
    pub fn degree(&self) -> Option<usize> {
        self.coeffs.len().checked_sub(1)
    }

    /// Returns the coefficient of `var^i`, if stored.
    #[must_use]
    pub fn coeff(&self, i: usize) -> Option<ExprHandle> {
        self.coeffs.get(i).copied()
    }

    /// Returns all coefficients in ascending order.
    #[must_use]
    pub fn coeffs(&self) -> &[ExprHandle] {
        &self.coeffs
    }

    /// Returns the leading coefficient.
    #[must_use]
    pub fn leading(&self) -> Option<ExprHandle> {
        self.coeffs.last().copied()
    }
}

/// Splits a single term into `(coefficient, degree)` with respect to `var`.
fn term_degree(
    arena: &mut ExprArena,
    term: ExprHandle,
    var: ExprHandle,
) -> Option<(ExprHandle, usize)> {
    if !arena.depends_on(term, var) {
        return Some((term, 0));
    }
    if term == var {
        return Some((arena.integer(1), 1));
    }
    match arena.get(term).clone() {
        ExprNode::Pow { base, exp } if base == var => {
            let n = arena.as_number(exp)?.to_i64()?;
            let n = usize::try_from(n).ok()?;
            Some((arena.integer(1), n))
        }
        ExprNode::Mul(args) => {
            let mut rest = Vec::with_capacity(args.len());
            let mut degree = None;
            for &factor in &args {
                if arena.depends_on(factor, var) {
                    if degree.is_some() {
                        return None;
                    }
                    let (_, d) = term_degree(arena, factor, var)?;
                    degree = Some(d);
                } else {
                    rest.push(factor);
                }
            }
            let coeff = arena.mul_many(rest);
            Some((coeff, degree?))
        }
        _ => None,
    }
}
