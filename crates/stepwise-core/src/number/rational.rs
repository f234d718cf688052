//! Arbitrary precision rational numbers.
//!
//! Every numeric literal in an expression is a `Rational`, so `0.5` and
//! `\frac{1}{2}` are the same number.

use dashu::base::{Abs, Inverse, Signed as DashuSigned, UnsignedAbs};
use dashu::integer::IBig;
use dashu::rational::RBig;
use num_traits::{One, Zero};
use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};
use std::str::FromStr;

use super::Integer;

/// An arbitrary precision rational number.
///
/// Rationals are always stored in lowest terms with a positive denominator.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Rational(RBig);

impl Rational {
    /// Creates a new rational from numerator and denominator.
    ///
    /// # Panics
    ///
    /// Panics if the denominator is zero.
    #[must_use]
    pub fn new(numerator: Integer, denominator: Integer) -> Self {
        assert!(!denominator.is_zero(), "denominator cannot be zero");
        let negative = denominator.is_negative();
        let value = RBig::from_parts(
            numerator.into_inner(),
            denominator.into_inner().unsigned_abs(),
        );
        if negative {
            Self(-value)
        } else {
            Self(value)
        }
    }

    /// Creates a rational from an integer (denominator = 1).
    #[must_use]
    pub fn from_integer(n: Integer) -> Self {
        Self(RBig::from(n.into_inner()))
    }

    /// Creates a rational from i64 numerator and denominator.
    ///
    /// # Panics
    ///
    /// Panics if the denominator is zero.
    #[must_use]
    pub fn from_i64(numerator: i64, denominator: i64) -> Self {
        Self::new(Integer::new(numerator), Integer::new(denominator))
    }

    /// Returns the numerator.
    #[must_use]
    pub fn numerator(&self) -> Integer {
        Integer::from(self.0.numerator().clone())
    }

    /// Returns the denominator.
    #[must_use]
    pub fn denominator(&self) -> Integer {
        Integer::from(IBig::from(self.0.denominator().clone()))
    }

    /// Returns true if this rational is an integer.
    #[must_use]
    pub fn is_integer(&self) -> bool {
        self.0.denominator().is_one()
    }

    /// Converts to an i64 if this is an integer that fits.
    #[must_use]
    pub fn to_i64(&self) -> Option<i64> {
        if self.is_integer() {
            self.numerator().to_i64()
        } else {
            None
        }
    }

    /// Returns the absolute value.
    #[must_use]
    pub fn abs(&self) -> Self {
        Self(self.0.clone().abs())
    }

    /// Returns the reciprocal, or `None` for zero.
    #[must_use]
    pub fn recip(&self) -> Option<Self> {
        if self.is_zero() {
            None
        } else {
            Some(Self(self.0.clone().inv()))
        }
    }

    /// Returns true if negative.
    #[must_use]
    pub fn is_negative(&self) -> bool {
        DashuSigned::is_negative(&self.0)
    }

    /// Returns true if strictly positive.
    #[must_use]
    pub fn is_positive(&self) -> bool {
        DashuSigned::is_positive(&self.0)
    }

    /// Returns the largest integer not above this value.
    #[must_use]
    pub fn floor(&self) -> Integer {
        Integer::from(self.0.floor())
    }

    /// Computes self^exp for any integer exponent.
    ///
    /// Returns `None` when raising zero to a negative power.
    #[must_use]
    pub fn powi(&self, exp: i64) -> Option<Self> {
        let magnitude = usize::try_from(exp.unsigned_abs()).ok()?;
        if exp >= 0 {
            Some(Self(self.0.pow(magnitude)))
        } else {
            self.recip().map(|r| Self(r.0.pow(magnitude)))
        }
    }

    /// Approximates this rational as an f64.
    #[must_use]
    pub fn to_f64(&self) -> f64 {
        self.0.to_f64().value()
    }
}

impl Zero for Rational {
    fn zero() -> Self {
        Self(RBig::ZERO)
    }

    fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl One for Rational {
    fn one() -> Self {
        Self(RBig::ONE)
    }

    fn is_one(&self) -> bool {
        self.0 == RBig::ONE
    }
}

impl fmt::Debug for Rational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Rational({self})")
    }
}

impl fmt::Display for Rational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_integer() {
            write!(f, "{}", self.numerator())
        } else {
            write!(f, "{}/{}", self.numerator(), self.denominator())
        }
    }
}

/// Error returned when a string is not `p` or `p/q`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid rational literal '{0}'")]
pub struct ParseRationalError(String);

impl FromStr for Rational {
    type Err = ParseRationalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseRationalError(s.to_string());
        let parse_int = |part: &str| IBig::from_str(part).map(Integer::from).map_err(|_| invalid());

        match s.split_once('/') {
            None => Ok(Self::from_integer(parse_int(s)?)),
            Some((num, den)) => {
                let den = parse_int(den)?;
                if den.is_zero() {
                    return Err(invalid());
                }
                Ok(Self::new(parse_int(num)?, den))
            }
        }
    }
}

impl Add for Rational {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Add<&Rational> for &Rational {
    type Output = Rational;

    fn add(self, rhs: &Rational) -> Self::Output {
        Rational(&self.0 + &rhs.0)
    }
}

impl Sub for Rational {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl Sub<&Rational> for &Rational {
    type Output = Rational;

    fn sub(self, rhs: &Rational) -> Self::Output {
        Rational(&self.0 - &rhs.0)
    }
}

impl Mul for Rational {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        Self(self.0 * rhs.0)
    }
}

impl Mul<&Rational> for &Rational {
    type Output = Rational;

    fn mul(self, rhs: &Rational) -> Self::Output {
        Rational(&self.0 * &rhs.0)
    }
}

impl Div for Rational {
    type Output = Self;

    fn div(self, rhs: Self) -> Self::Output {
        Self(self.0 / rhs.0)
    }
}

impl Neg for Rational {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self(-self.0)
    }
}

impl Neg for &Rational {
    type Output = Rational;

    fn neg(self) -> Self::Output {
        Rational(-&self.0)
    }
}

impl From<Integer> for Rational {
    fn from(n: Integer) -> Self {
        Self::from_integer(n)
    }
}

impl From<i64> for Rational {
    fn from(n: i64) -> Self {
        Self::from_integer(Integer::new(n))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_ops() {
        let a = Rational::from_i64(1, 2);
        let b = Rational::from_i64(1, 3);

        // 1/2 + 1/3 = 5/6
        assert_eq!(&a + &b, Rational::from_i64(5, 6));
        // 1/2 * 1/3 = 1/6
        assert_eq!(&a * &b, Rational::from_i64(1, 6));
    }

    #[test]
    fn test_negative_denominator() {
        let r = Rational::from_i64(3, -6);
        assert_eq!(r, Rational::from_i64(-1, 2));
        assert!(r.is_negative());
    }

    #[test]
    fn test_powi() {
        let r = Rational::from_i64(2, 3);
        assert_eq!(r.powi(2), Some(Rational::from_i64(4, 9)));
        assert_eq!(r.powi(-1), Some(Rational::from_i64(3, 2)));
        assert_eq!(Rational::zero().powi(-1), None);
    }

    #[test]
    fn test_floor() {
        assert_eq!(Rational::from_i64(7, 2).floor(), Integer::new(3));
        assert_eq!(Rational::from_i64(-1, 2).floor(), Integer::new(-1));
    }

    #[test]
    fn test_parse_and_display() {
        assert_eq!("3".parse::<Rational>().unwrap(), Rational::from(3));
        assert_eq!("-2/4".parse::<Rational>().unwrap(), Rational::from_i64(-1, 2));
        assert!("1/0".parse::<Rational>().is_err());
        assert_eq!(Rational::from_i64(2, 3).to_string(), "2/3");
        assert_eq!(Rational::from_i64(6, 3).to_string(), "2");
    }
}
