//! Arbitrary precision integers.
//!
//! A thin wrapper around `dashu::IBig` with the handful of operations the
//! canonical constructors need (gcd, powers, perfect-power splitting).

use dashu::base::{Abs, BitTest, Gcd, Signed as DashuSigned};
use dashu::integer::IBig;
use num_traits::{One, Zero};
use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

/// Trial division bound used when splitting off perfect powers.
const TRIAL_DIVISION_LIMIT: u64 = 1_000_000;

/// An arbitrary precision integer.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Integer(IBig);

impl Integer {
    /// Creates a new integer from an i64.
    #[must_use]
    pub fn new(value: i64) -> Self {
        Self(IBig::from(value))
    }

    /// Returns the absolute value.
    #[must_use]
    pub fn abs(&self) -> Self {
        Self(self.0.clone().abs())
    }

    /// Returns the sign: -1, 0, or 1.
    #[must_use]
    pub fn signum(&self) -> i8 {
        if self.0.is_zero() {
            0
        } else if DashuSigned::is_positive(&self.0) {
            1
        } else {
            -1
        }
    }

    /// Returns true if this integer is negative.
    #[must_use]
    pub fn is_negative(&self) -> bool {
        DashuSigned::is_negative(&self.0)
    }

    /// Computes the greatest common divisor.
    #[must_use]
    pub fn gcd(&self, other: &Self) -> Self {
        Self(IBig::from(self.0.clone().gcd(other.0.clone())))
    }

    /// Returns the inner `dashu::IBig`.
    #[must_use]
    pub fn into_inner(self) -> IBig {
        self.0
    }

    /// Returns a reference to the inner `dashu::IBig`.
    #[must_use]
    pub fn as_inner(&self) -> &IBig {
        &self.0
    }

    /// Attempts to convert to an i64.
    #[must_use]
    pub fn to_i64(&self) -> Option<i64> {
        self.0.clone().try_into().ok()
    }

    /// Attempts to convert to a u64.
    #[must_use]
    pub fn to_u64(&self) -> Option<u64> {
        self.0.clone().try_into().ok()
    }

    /// Number of bits in the magnitude; zero for zero.
    #[must_use]
    pub fn bit_len(&self) -> usize {
        self.0.bit_len()
    }

    /// Computes self^exp.
    #[must_use]
    pub fn pow(&self, exp: u32) -> Self {
        Self(self.0.pow(exp as usize))
    }

    /// Splits `|self|` into `outside^q * inside` with `inside` free of q-th powers.
    ///
    /// Only factors below the trial division bound are pulled out; a large
    /// composite remainder simply stays inside. Returns `None` for zero or for
    /// magnitudes that do not fit in 64 bits.
    #[must_use]
    pub fn split_perfect_power(&self, q: u32) -> Option<(Integer, Integer)> {
        let mut rest = self.abs().to_u64()?;
        if rest == 0 || q < 2 {
            return None;
        }

        let mut outside: u64 = 1;
        let mut inside: u64 = 1;
        let mut d: u64 = 2;
        while d <= TRIAL_DIVISION_LIMIT && d.saturating_mul(d) <= rest {
            let mut count = 0u32;
            while rest % d == 0 {
                rest /= d;
                count += 1;
            }
            outside *= d.pow(count / q);
            inside *= d.pow(count % q);
            d += 1;
        }
        inside *= rest;

        Some((
            Integer::from(IBig::from(outside)),
            Integer::from(IBig::from(inside)),
        ))
    }
}

impl Zero for Integer {
    fn zero() -> Self {
        Self(IBig::ZERO)
    }

    fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl One for Integer {
    fn one() -> Self {
        Self(IBig::ONE)
    }

    fn is_one(&self) -> bool {
        self.0 == IBig::ONE
    }
}

impl fmt::Debug for Integer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Integer({})", self.0)
    }
}

impl fmt::Display for Integer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Add for Integer {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Integer {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl Mul for Integer {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        Self(self.0 * rhs.0)
    }
}

impl Neg for Integer {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self(-self.0)
    }
}

impl From<IBig> for Integer {
    fn from(value: IBig) -> Self {
        Self(value)
    }
}

impl From<i64> for Integer {
    fn from(value: i64) -> Self {
        Self::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gcd() {
        assert_eq!(Integer::new(12).gcd(&Integer::new(18)), Integer::new(6));
        assert_eq!(Integer::new(-4).gcd(&Integer::new(6)), Integer::new(2));
    }

    #[test]
    fn test_split_square() {
        // 8 = 2^2 * 2
        let (outside, inside) = Integer::new(8).split_perfect_power(2).unwrap();
        assert_eq!(outside, Integer::new(2));
        assert_eq!(inside, Integer::new(2));

        // 12 = 2^2 * 3
        let (outside, inside) = Integer::new(12).split_perfect_power(2).unwrap();
        assert_eq!(outside, Integer::new(2));
        assert_eq!(inside, Integer::new(3));
    }

    #[test]
    fn test_split_cube() {
        // 54 = 3^3 * 2
        let (outside, inside) = Integer::new(54).split_perfect_power(3).unwrap();
        assert_eq!(outside, Integer::new(3));
        assert_eq!(inside, Integer::new(2));
    }

    #[test]
    fn test_split_square_free() {
        let (outside, inside) = Integer::new(3).split_perfect_power(2).unwrap();
        assert_eq!(outside, Integer::new(1));
        assert_eq!(inside, Integer::new(3));
        assert!(Integer::new(0).split_perfect_power(2).is_none());
    }

    #[test]
    fn test_bit_len() {
        assert_eq!(Integer::new(0).bit_len(), 0);
        assert_eq!(Integer::new(1).bit_len(), 1);
        assert_eq!(Integer::new(-8).bit_len(), 4);
        assert_eq!(Integer::new(255).bit_len(), 8);
    }
}
