//! Closed-form roots of univariate polynomials.
//!
//! Degrees one and two are solved by formula for any coefficients. Higher
//! degrees need rational coefficients: rational roots are found by the
//! rational root test and divided out until a quadratic remains.

use num_traits::{One, Zero};
use stepwise_core::{ExprArena, ExprHandle, Polynomial, Rational};

use crate::error::SolveError;

/// Largest |coefficient| whose divisors the rational root test enumerates.
const DIVISOR_LIMIT: i64 = 1_000_000;

/// Returns the roots of `poly`, complex roots included.
///
/// The zero polynomial and non-zero constants have no roots to report.
///
/// # Errors
///
/// Returns [`SolveError::Unsupported`] for a polynomial of degree three or
/// more that does not deflate to a quadratic over the rationals.
pub fn polynomial_roots(arena: &mut ExprArena, poly: &Polynomial) -> Result<Vec<ExprHandle>, SolveError> {
    roots_of(arena, poly.coeffs())
}

fn roots_of(arena: &mut ExprArena, coeffs: &[ExprHandle]) -> Result<Vec<ExprHandle>, SolveError> {
    match *coeffs {
        [] | [_] => Ok(Vec::new()),
        [b, a] => Ok(vec![linear_root(arena, a, b)]),
        [c, b, a] => {
            let disc = discriminant(arena, a, b, c);
            if arena.get(disc).is_zero() {
                return Ok(vec![quadratic_root(arena, a, b, disc, true)]);
            }
            Ok(vec![
                quadratic_root(arena, a, b, disc, false),
                quadratic_root(arena, a, b, disc, true),
            ])
        }
        _ => higher_degree_roots(arena, coeffs),
    }
}

/// The root `-b/a` of `a x + b`.
pub fn linear_root(arena: &mut ExprArena, a: ExprHandle, b: ExprHandle) -> ExprHandle {
    let minus_b = arena.neg(b);
    arena.div(minus_b, a)
}

/// The discriminant `b^2 - 4ac` of `a x^2 + b x + c`.
pub fn discriminant(arena: &mut ExprArena, a: ExprHandle, b: ExprHandle, c: ExprHandle) -> ExprHandle {
    let two = arena.integer(2);
    let b_squared = arena.pow(b, two);
    let four = arena.integer(4);
    let four_ac = arena.mul_many([four, a, c]);
    arena.sub(b_squared, four_ac)
}

/// One root `(-b ± √Δ) / 2a` of a quadratic; `plus` picks the sign.
pub fn quadratic_root(
    arena: &mut ExprArena,
    a: ExprHandle,
    b: ExprHandle,
    discriminant: ExprHandle,
    plus: bool,
) -> ExprHandle {
    let root = arena.sqrt(discriminant);
    let root = if plus { root } else { arena.neg(root) };
    let minus_b = arena.neg(b);
    let numerator = arena.add(minus_b, root);
    let two = arena.integer(2);
    let two_a = arena.mul(two, a);
    arena.div(numerator, two_a)
}

fn higher_degree_roots(arena: &mut ExprArena, coeffs: &[ExprHandle]) -> Result<Vec<ExprHandle>, SolveError> {
    let unsupported = || SolveError::Unsupported(format!("a polynomial of degree {}", coeffs.len() - 1));

    let mut values: Vec<Rational> = coeffs
        .iter()
        .map(|&c| arena.as_number(c).cloned())
        .collect::<Option<_>>()
        .ok_or_else(unsupported)?;

    let mut roots = Vec::new();
    while values.len() > 3 {
        let root = if values[0].is_zero() {
            Rational::zero()
        } else {
            rational_root(&values).ok_or_else(unsupported)?
        };
        values = deflate(&values, &root);
        roots.push(arena.number(root));
    }

    let rest: Vec<ExprHandle> = values.into_iter().map(|v| arena.number(v)).collect();
    roots.extend(roots_of(arena, &rest)?);
    Ok(roots)
}

/// Finds a rational root `±p/q` with `p | a_0` and `q | a_n`.
fn rational_root(coeffs: &[Rational]) -> Option<Rational> {
    let scale = coeffs
        .iter()
        .fold(Rational::one(), |acc, c| acc * Rational::from_integer(c.denominator()));
    let constant = (&coeffs[0] * &scale).to_i64()?.checked_abs()?;
    let leading = (&coeffs[coeffs.len() - 1] * &scale).to_i64()?.checked_abs()?;
    if constant > DIVISOR_LIMIT || leading > DIVISOR_LIMIT {
        return None;
    }

    let numerators = divisors(constant);
    let denominators = divisors(leading);
    for &p in &numerators {
        for &q in &denominators {
            for sign in [1, -1] {
                let candidate = Rational::from_i64(sign * p, q);
                if horner(coeffs, &candidate).is_zero() {
                    return Some(candidate);
                }
            }
        }
    }
    None
}

fn divisors(n: i64) -> Vec<i64> {
    let mut small = Vec::new();
    let mut large = Vec::new();
    let mut d = 1;
    while d * d <= n {
        if n % d == 0 {
            small.push(d);
            if d != n / d {
                large.push(n / d);
            }
        }
        d += 1;
    }
    small.extend(large.into_iter().rev());
    small
}

fn horner(coeffs: &[Rational], x: &Rational) -> Rational {
    coeffs
        .iter()
        .rev()
        .fold(Rational::zero(), |acc, c| &(&acc * x) + c)
}

/// Divides by `(x - root)`, dropping the zero remainder.
fn deflate(coeffs: &[Rational], root: &Rational) -> Vec<Rational> {
    let n = coeffs.len() - 1;
    let mut quotient = vec![Rational::zero(); n];
    let mut carry = Rational::zero();
    for k in (1..=n).rev() {
        carry = &coeffs[k] + &(&carry * root);
        quotient[k - 1] = carry.clone();
    }
    quotient
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn ints(values: &[i64]) -> Vec<Rational> {
        values.iter().map(|&v| Rational::from(v)).collect()
    }

    #[test]
    fn test_divisors() {
        assert_eq!(divisors(12), vec![1, 2, 3, 4, 6, 12]);
        assert_eq!(divisors(1), vec![1]);
        assert_eq!(divisors(0), Vec::<i64>::new());
    }

    #[test]
    fn test_deflate() {
        // x^3 - 6x^2 + 11x - 6 = (x - 1)(x^2 - 5x + 6)
        let cubic = ints(&[-6, 11, -6, 1]);
        assert_eq!(deflate(&cubic, &Rational::one()), ints(&[6, -5, 1]));
    }

    #[test]
    fn test_rational_root_with_fractions() {
        // 2x^3 - x^2 - 2x + 1 = (x - 1)(x + 1)(2x - 1)
        let cubic = ints(&[1, -2, -1, 2]);
        let root = rational_root(&cubic).unwrap();
        assert!(horner(&cubic, &root).is_zero());
    }

    #[test]
    fn test_cubic_roots() {
        let mut arena = ExprArena::new();
        let coeffs: Vec<ExprHandle> = [-6, 11, -6, 1].iter().map(|&c| arena.integer(c)).collect();
        let roots = roots_of(&mut arena, &coeffs).unwrap();
        let expected: Vec<ExprHandle> = [1, 2, 3].iter().map(|&c| arena.integer(c)).collect();
        let mut sorted = roots.clone();
        sorted.sort_by(|&a, &b| arena.eval_f64(a).unwrap().total_cmp(&arena.eval_f64(b).unwrap()));
        assert_eq!(sorted, expected);
    }

    #[test]
    fn test_irreducible_cubic_is_unsupported() {
        let mut arena = ExprArena::new();
        // x^3 - 2
        let coeffs: Vec<ExprHandle> = [-2, 0, 0, 1].iter().map(|&c| arena.integer(c)).collect();
        assert!(matches!(
            roots_of(&mut arena, &coeffs),
            Err(SolveError::Unsupported(_))
        ));
    }

    #[test]
    fn test_repeated_root_listed_once() {
        let mut arena = ExprArena::new();
        let coeffs: Vec<ExprHandle> = [1, -2, 1].iter().map(|&c| arena.integer(c)).collect();
        let one = arena.integer(1);
        assert_eq!(roots_of(&mut arena, &coeffs).unwrap(), vec![one]);
    }
}
