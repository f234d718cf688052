//! Canonical constructors.
//!
//! Every arithmetic node is built here. The constructors perform the
//! automatic simplifications a reader expects to be "free": flattening,
//! numeric folding, collecting like terms and like bases, exact rational
//! powers and the special values of the elementary functions. Anything
//! more expensive belongs to the simplifier.

use hashbrown::HashMap;
use num_traits::{One, Zero};
use smallvec::SmallVec;

use crate::arena::ExprArena;
use crate::expr::{Constant, ExprNode, Function};
use crate::handle::ExprHandle;
use crate::number::{Integer, Rational};

/// How many times a product is re-normalized after powers expand into products.
const MUL_REFLATTEN_LIMIT: usize = 4;

/// Size in bits past which a numeric power stays symbolic.
const EXACT_POWER_BITS: u64 = 1 << 17;

impl ExprArena {
    // === Sums ===

    /// Creates a + b.
    pub fn add(&mut self, a: ExprHandle, b: ExprHandle) -> ExprHandle {
        self.add_many([a, b])
    }

    /// Creates a - b.
    pub fn sub(&mut self, a: ExprHandle, b: ExprHandle) -> ExprHandle {
        let neg_b = self.neg(b);
        self.add(a, neg_b)
    }

    /// Creates -a.
    pub fn neg(&mut self, a: ExprHandle) -> ExprHandle {
        let minus_one = self.integer(-1);
        self.mul(minus_one, a)
    }

    /// Creates the canonical sum of all terms.
    pub fn add_many(&mut self, terms: impl IntoIterator<Item = ExprHandle>) -> ExprHandle {
        let mut flat: Vec<ExprHandle> = Vec::new();
        for term in terms {
            match self.get(term) {
                ExprNode::Add(args) => flat.extend(args.iter().copied()),
                _ => flat.push(term),
            }
        }

        let mut constant = Rational::zero();
        let mut order: Vec<ExprHandle> = Vec::new();
        let mut coeffs: HashMap<ExprHandle, Rational> = HashMap::new();

        for term in flat {
            if let Some(n) = self.as_number(term) {
                constant = &constant + n;
                continue;
            }
            let (coeff, rest) = self.split_coefficient(term);
            match coeffs.get_mut(&rest) {
                Some(existing) => *existing = &*existing + &coeff,
                None => {
                    order.push(rest);
                    coeffs.insert(rest, coeff);
                }
            }
        }

        let mut args: SmallVec<[ExprHandle; 4]> = SmallVec::new();
        for rest in order {
            let coeff = coeffs.remove(&rest).unwrap_or_else(Rational::zero);
            if !coeff.is_zero() {
                args.push(self.scale(coeff, rest));
            }
        }
        args.sort_by(|&a, &b| self.compare(a, b));
        if !constant.is_zero() {
            let c = self.number(constant);
            args.insert(0, c);
        }

        match args.len() {
            0 => self.integer(0),
            1 => args[0],
            _ => self.intern(ExprNode::Add(args)),
        }
    }

    fn coefficient_parts(&self, term: ExprHandle) -> (Rational, Option<SmallVec<[ExprHandle; 4]>>) {
        match self.get(term) {
            ExprNode::Number(n) => (n.clone(), Some(SmallVec::new())),
            ExprNode::Mul(args) => match self.as_number(args[0]) {
                Some(n) => (n.clone(), Some(args[1..].iter().copied().collect())),
                None => (Rational::one(), None),
            },
            _ => (Rational::one(), None),
        }
    }

    /// Splits a term into its numeric coefficient and the remaining factor.
    ///
    /// `3 x y` gives `(3, x y)`; a term without a coefficient gives `(1, term)`.
    pub fn split_coefficient(&mut self, term: ExprHandle) -> (Rational, ExprHandle) {
        match self.coefficient_parts(term) {
            (coeff, None) => (coeff, term),
            (coeff, Some(rest)) => {
                let rest = match rest.len() {
                    0 => self.integer(1),
                    1 => rest[0],
                    _ => self.intern(ExprNode::Mul(rest)),
                };
                (coeff, rest)
            }
        }
    }

    /// Multiplies a coefficient-free term by a number without re-normalizing.
    fn scale(&mut self, coeff: Rational, term: ExprHandle) -> ExprHandle {
        if coeff.is_one() {
            return term;
        }
        let c = self.number(coeff);
        let mut args: SmallVec<[ExprHandle; 4]> = SmallVec::new();
        args.push(c);
        match self.get(term) {
            ExprNode::Mul(factors) => args.extend(factors.iter().copied()),
            _ => args.push(term),
        }
        self.intern(ExprNode::Mul(args))
    }

    // === Products ===

    /// Creates a * b.
    pub fn mul(&mut self, a: ExprHandle, b: ExprHandle) -> ExprHandle {
        self.mul_many([a, b])
    }

    /// Creates a / b.
    pub fn div(&mut self, a: ExprHandle, b: ExprHandle) -> ExprHandle {
        let minus_one = self.integer(-1);
        let inv = self.pow(b, minus_one);
        self.mul(a, inv)
    }

    /// Creates the canonical product of all factors.
    pub fn mul_many(&mut self, factors: impl IntoIterator<Item = ExprHandle>) -> ExprHandle {
        let mut pending: Vec<ExprHandle> = factors.into_iter().collect();
        for _ in 0..MUL_REFLATTEN_LIMIT {
            match self.mul_pass(&pending, true) {
                Ok(done) => return done,
                Err(again) => pending = again,
            }
        }
        match self.mul_pass(&pending, false) {
            Ok(done) => done,
            Err(again) => self.intern_mul_raw(again),
        }
    }

    /// One normalization pass over a product.
    ///
    /// Returns `Err(factors)` when combining like bases produced new products
    /// that must be flattened again.
    fn mul_pass(
        &mut self,
        factors: &[ExprHandle],
        allow_retry: bool,
    ) -> Result<ExprHandle, Vec<ExprHandle>> {
        let mut flat: Vec<ExprHandle> = Vec::with_capacity(factors.len());
        for &f in factors {
            match self.get(f) {
                ExprNode::Mul(args) => flat.extend(args.iter().copied()),
                _ => flat.push(f),
            }
        }

        let mut coeff = Rational::one();
        let mut order: Vec<ExprHandle> = Vec::new();
        let mut exps: HashMap<ExprHandle, Vec<ExprHandle>> = HashMap::new();

        for f in flat {
            if let Some(n) = self.as_number(f) {
                coeff = &coeff * n;
                continue;
            }
            let (base, exp) = self.base_exp(f);
            match exps.get_mut(&base) {
                Some(list) => list.push(exp),
                None => {
                    order.push(base);
                    exps.insert(base, vec![exp]);
                }
            }
        }

        if coeff.is_zero() {
            return Ok(self.integer(0));
        }

        let mut rest: SmallVec<[ExprHandle; 4]> = SmallVec::new();
        let mut needs_retry = false;
        for base in order {
            let list = exps.remove(&base).unwrap_or_default();
            let combined = if list.len() == 1 {
                self.rebuild_power(base, list[0])
            } else {
                let exp = self.add_many(list);
                self.pow(base, exp)
            };
            match self.get(combined) {
                ExprNode::Number(n) => coeff = &coeff * n,
                ExprNode::Mul(_) => {
                    needs_retry = true;
                    rest.push(combined);
                }
                _ => rest.push(combined),
            }
        }

        if needs_retry && allow_retry {
            let mut again: Vec<ExprHandle> = rest.into_vec();
            again.push(self.number(coeff));
            return Err(again);
        }

        rest.sort_by(|&a, &b| self.compare(a, b));

        if rest.is_empty() {
            return Ok(self.number(coeff));
        }
        if coeff.is_one() && rest.len() == 1 {
            return Ok(rest[0]);
        }
        if rest.len() == 1 {
            if let ExprNode::Add(terms) = self.get(rest[0]) {
                let terms = terms.clone();
                let c = self.number(coeff);
                let scaled: Vec<ExprHandle> = terms.iter().map(|&t| self.mul(c, t)).collect();
                return Ok(self.add_many(scaled));
            }
        }

        let mut args: SmallVec<[ExprHandle; 4]> = SmallVec::new();
        if !coeff.is_one() {
            args.push(self.number(coeff));
        }
        args.extend(rest);
        Ok(self.intern(ExprNode::Mul(args)))
    }

    /// Interns a product as given, only dropping nested products.
    fn intern_mul_raw(&mut self, factors: Vec<ExprHandle>) -> ExprHandle {
        let mut args: SmallVec<[ExprHandle; 4]> = SmallVec::new();
        for f in factors {
            match self.get(f) {
                ExprNode::Mul(inner) => args.extend(inner.iter().copied()),
                _ => args.push(f),
            }
        }
        if args.len() == 1 {
            return args[0];
        }
        self.intern(ExprNode::Mul(args))
    }

    /// Splits a factor into base and exponent for collecting like bases.
    ///
    /// `exp(a)` is treated as `e^a` so that `exp(a) exp(b) = exp(a + b)`.
    pub fn base_exp(&mut self, factor: ExprHandle) -> (ExprHandle, ExprHandle) {
        match *self.get(factor) {
            ExprNode::Pow { base, exp } => (base, exp),
            ExprNode::Function {
                func: Function::Exp,
                arg,
            } => (self.constant(Constant::E), arg),
            _ => (factor, self.integer(1)),
        }
    }

    /// Rebuilds a single factor from its split, reusing the original when possible.
    fn rebuild_power(&mut self, base: ExprHandle, exp: ExprHandle) -> ExprHandle {
        if self.get(exp).is_one() {
            return base;
        }
        if matches!(self.get(base), ExprNode::Constant(Constant::E)) {
            return self.apply(Function::Exp, exp);
        }
        let existing = ExprNode::Pow { base, exp };
        match self.lookup(&existing) {
            Some(handle) => handle,
            None => self.pow(base, exp),
        }
    }

    // === Powers ===

    /// Creates base^exp.
    pub fn pow(&mut self, base: ExprHandle, exp: ExprHandle) -> ExprHandle {
        if self.get(exp).is_zero() {
            return self.integer(1);
        }
        if self.get(exp).is_one() {
            return base;
        }
        if self.get(base).is_one() {
            return self.integer(1);
        }

        if let (Some(b), Some(e)) = (self.as_number(base).cloned(), self.as_number(exp).cloned()) {
            if let Some(result) = self.number_power(&b, &e) {
                return result;
            }
            return self.intern(ExprNode::Pow { base, exp });
        }

        let int_exp = self.as_number(exp).and_then(Rational::to_i64);

        match self.get(base).clone() {
            ExprNode::Constant(Constant::I) => {
                if let Some(n) = int_exp {
                    return match n.rem_euclid(4) {
                        0 => self.integer(1),
                        1 => base,
                        2 => self.integer(-1),
                        _ => {
                            let minus_one = self.integer(-1);
                            self.mul(minus_one, base)
                        }
                    };
                }
            }
            ExprNode::Constant(Constant::E) => return self.apply(Function::Exp, exp),
            ExprNode::Pow {
                base: inner,
                exp: inner_exp,
            } if int_exp.is_some() => {
                let new_exp = self.mul(inner_exp, exp);
                return self.pow(inner, new_exp);
            }
            ExprNode::Mul(args) if int_exp.is_some() => {
                let powered: Vec<ExprHandle> = args.iter().map(|&a| self.pow(a, exp)).collect();
                return self.mul_many(powered);
            }
            ExprNode::Function {
                func: Function::Exp,
                arg,
            } if self.as_number(exp).is_some() => {
                let new_arg = self.mul(exp, arg);
                return self.apply(Function::Exp, new_arg);
            }
            _ => {}
        }

        self.intern(ExprNode::Pow { base, exp })
    }

    /// Creates the square root of a.
    pub fn sqrt(&mut self, a: ExprHandle) -> ExprHandle {
        let half = self.rational(1, 2);
        self.pow(a, half)
    }

    /// Exact power of two numbers, or `None` when it must stay symbolic.
    fn number_power(&mut self, base: &Rational, exp: &Rational) -> Option<ExprHandle> {
        if power_too_large(base, exp) {
            return None;
        }
        if exp.is_integer() {
            let e = exp.to_i64()?;
            return base.powi(e).map(|value| self.number(value));
        }
        if base.is_zero() {
            return exp.is_positive().then(|| self.integer(0));
        }

        let p = exp.numerator();
        let q = u32::try_from(exp.denominator().to_i64()?).ok()?;

        if base.is_negative() {
            // (-n)^(p/2) = i^p n^(p/2)
            if q != 2 {
                return None;
            }
            let i = self.constant(Constant::I);
            let p_handle = self.number(Rational::from_integer(p));
            let unit = self.pow(i, p_handle);
            let magnitude = self.number(base.abs());
            let exp_handle = self.number(exp.clone());
            let root = self.pow(magnitude, exp_handle);
            return Some(self.mul(unit, root));
        }

        let p = p.to_i64()?;
        let (num_coeff, num_inside) = integer_root_power(&base.numerator(), p, q)?;
        let (den_coeff, den_inside) = integer_root_power(&base.denominator(), -p, q)?;

        let coeff = num_coeff * den_coeff;
        let radicand = num_inside * den_inside;
        if radicand.is_one() {
            return Some(self.number(coeff));
        }

        let radicand = self.number(Rational::from_integer(radicand));
        let root_exp = self.rational(1, i64::from(q));
        let radical = self.intern(ExprNode::Pow {
            base: radicand,
            exp: root_exp,
        });
        if coeff.is_one() {
            return Some(radical);
        }
        let c = self.number(coeff);
        Some(self.intern(ExprNode::Mul(smallvec::smallvec![c, radical])))
    }

    // === Functions ===

    /// Applies an elementary function, evaluating special values.
    pub fn apply(&mut self, func: Function, arg: ExprHandle) -> ExprHandle {
        if let Some(value) = self.special_value(func, arg) {
            return value;
        }
        self.intern(ExprNode::Function { func, arg })
    }

    fn special_value(&mut self, func: Function, arg: ExprHandle) -> Option<ExprHandle> {
        match func {
            Function::Exp => self.exp_value(arg),
            Function::Ln => self.ln_value(arg),
            Function::Sin | Function::Tan | Function::Asin | Function::Atan => {
                if let Some(positive) = self.extract_minus_sign(arg) {
                    let inner = self.apply(func, positive);
                    return Some(self.neg(inner));
                }
                self.trig_value(func, arg)
            }
            Function::Cos => {
                if let Some(positive) = self.extract_minus_sign(arg) {
                    return Some(self.apply(Function::Cos, positive));
                }
                self.trig_value(func, arg)
            }
            Function::Acos => {
                if let Some(positive) = self.extract_minus_sign(arg) {
                    let pi = self.constant(Constant::Pi);
                    let inner = self.apply(Function::Acos, positive);
                    return Some(self.sub(pi, inner));
                }
                self.trig_value(func, arg)
            }
            Function::Abs => self.abs_value(arg),
        }
    }

    fn exp_value(&mut self, arg: ExprHandle) -> Option<ExprHandle> {
        if self.get(arg).is_zero() {
            return Some(self.integer(1));
        }
        match self.get(arg).clone() {
            ExprNode::Function {
                func: Function::Ln,
                arg: inner,
            } => Some(inner),
            ExprNode::Mul(args) if args.len() == 2 => {
                let coeff = self.as_number(args[0]).is_some();
                match (coeff, self.get(args[1]).clone()) {
                    (
                        true,
                        ExprNode::Function {
                            func: Function::Ln,
                            arg: inner,
                        },
                    ) => Some(self.pow(inner, args[0])),
                    _ => None,
                }
            }
            _ => None,
        }
    }

    fn ln_value(&mut self, arg: ExprHandle) -> Option<ExprHandle> {
        match self.get(arg).clone() {
            ExprNode::Number(n) if n.is_one() => Some(self.integer(0)),
            ExprNode::Constant(Constant::E) => Some(self.integer(1)),
            ExprNode::Function {
                func: Function::Exp,
                arg: inner,
            } => Some(inner),
            _ => None,
        }
    }

    fn abs_value(&mut self, arg: ExprHandle) -> Option<ExprHandle> {
        match self.get(arg).clone() {
            ExprNode::Number(n) => Some(self.number(n.abs())),
            ExprNode::Constant(Constant::E | Constant::Pi) => Some(arg),
            ExprNode::Constant(Constant::I) => Some(self.integer(1)),
            ExprNode::Function {
                func: Function::Abs,
                ..
            } => Some(arg),
            _ => self
                .extract_minus_sign(arg)
                .map(|positive| self.apply(Function::Abs, positive)),
        }
    }

    /// Values of the trigonometric functions at rational multiples of pi,
    /// and of their inverses at the matching algebraic numbers.
    fn trig_value(&mut self, func: Function, arg: ExprHandle) -> Option<ExprHandle> {
        match func {
            Function::Sin => {
                let k = self.pi_multiple(arg)?;
                self.sin_pi_multiple(&k)
            }
            Function::Cos => {
                let k = self.pi_multiple(arg)?;
                self.sin_pi_multiple(&(k + Rational::from_i64(1, 2)))
            }
            Function::Tan => {
                let k = self.pi_multiple(arg)?;
                let sin = self.sin_pi_multiple(&k)?;
                let cos = self.sin_pi_multiple(&(k + Rational::from_i64(1, 2)))?;
                if self.get(cos).is_zero() {
                    return None;
                }
                Some(self.div(sin, cos))
            }
            Function::Asin => {
                let table = self.inverse_sine_table();
                let k = table.into_iter().find(|(value, _)| *value == arg)?.1;
                Some(self.pi_times(k))
            }
            Function::Acos => {
                let table = self.inverse_sine_table();
                let k = table.into_iter().find(|(value, _)| *value == arg)?.1;
                Some(self.pi_times(Rational::from_i64(1, 2) - k))
            }
            Function::Atan => {
                let three = self.integer(3);
                let sqrt3 = self.sqrt(three);
                let third = self.rational(1, 3);
                let sqrt3_over_3 = self.mul(third, sqrt3);
                let k = if self.get(arg).is_zero() {
                    Rational::zero()
                } else if self.get(arg).is_one() {
                    Rational::from_i64(1, 4)
                } else if arg == sqrt3 {
                    Rational::from_i64(1, 3)
                } else if arg == sqrt3_over_3 {
                    Rational::from_i64(1, 6)
                } else {
                    return None;
                };
                Some(self.pi_times(k))
            }
            _ => None,
        }
    }

    /// `(value, k)` pairs with `asin(value) = k pi` for the non-negative table values.
    fn inverse_sine_table(&mut self) -> Vec<(ExprHandle, Rational)> {
        let mut table = Vec::with_capacity(5);
        for k in [
            Rational::zero(),
            Rational::from_i64(1, 6),
            Rational::from_i64(1, 4),
            Rational::from_i64(1, 3),
            Rational::from_i64(1, 2),
        ] {
            if let Some(value) = self.sin_pi_multiple(&k) {
                table.push((value, k));
            }
        }
        table
    }

    /// Exact sin(k pi) for k with denominator 1, 2, 3, 4 or 6.
    fn sin_pi_multiple(&mut self, k: &Rational) -> Option<ExprHandle> {
        let two = Rational::from(2);
        let turns = Rational::from_integer((k.clone() / two.clone()).floor());
        let mut reduced = k - &(turns * two);
        let mut negate = false;
        if reduced >= Rational::one() {
            reduced = reduced - Rational::one();
            negate = true;
        }
        if reduced > Rational::from_i64(1, 2) {
            reduced = Rational::one() - reduced;
        }

        let value = if reduced.is_zero() {
            self.integer(0)
        } else if reduced == Rational::from_i64(1, 6) {
            self.rational(1, 2)
        } else if reduced == Rational::from_i64(1, 4) {
            let two = self.integer(2);
            let root = self.sqrt(two);
            let half = self.rational(1, 2);
            self.mul(half, root)
        } else if reduced == Rational::from_i64(1, 3) {
            let three = self.integer(3);
            let root = self.sqrt(three);
            let half = self.rational(1, 2);
            self.mul(half, root)
        } else if reduced == Rational::from_i64(1, 2) {
            self.integer(1)
        } else {
            return None;
        };

        Some(if negate { self.neg(value) } else { value })
    }

    /// Returns k if `arg` is `k pi` for a rational k.
    fn pi_multiple(&self, arg: ExprHandle) -> Option<Rational> {
        match self.get(arg) {
            ExprNode::Number(n) if n.is_zero() => Some(Rational::zero()),
            ExprNode::Constant(Constant::Pi) => Some(Rational::one()),
            ExprNode::Mul(args) if args.len() == 2 => {
                let k = self.as_number(args[0])?;
                matches!(self.get(args[1]), ExprNode::Constant(Constant::Pi)).then(|| k.clone())
            }
            _ => None,
        }
    }

    fn pi_times(&mut self, k: Rational) -> ExprHandle {
        let k = self.number(k);
        let pi = self.constant(Constant::Pi);
        self.mul(k, pi)
    }

    /// Returns `-arg` if `arg` carries an explicit negative sign.
    pub fn extract_minus_sign(&mut self, arg: ExprHandle) -> Option<ExprHandle> {
        match self.get(arg) {
            ExprNode::Number(n) if n.is_negative() => {
                let positive = -n;
                Some(self.number(positive))
            }
            ExprNode::Mul(args) => {
                let negative = self.as_number(args[0]).is_some_and(Rational::is_negative);
                negative.then(|| self.neg(arg))
            }
            _ => None,
        }
    }
}

/// Splits `m^(p/q)` for a positive integer m into `coeff * inside^(1/q)`.
/// Whether computing `base^exp` exactly could exceed [`EXACT_POWER_BITS`].
fn power_too_large(base: &Rational, exp: &Rational) -> bool {
    if base.is_zero() || base.abs().is_one() {
        return false;
    }
    let width = base.numerator().bit_len().max(base.denominator().bit_len());
    let width = u64::try_from(width).unwrap_or(u64::MAX);
    match (exp.numerator().abs().to_u64(), exp.denominator().to_u64()) {
        (Some(p), Some(q)) => p.max(q).saturating_mul(width) > EXACT_POWER_BITS,
        _ => true,
    }
}

fn integer_root_power(m: &Integer, p: i64, q: u32) -> Option<(Rational, Integer)> {
    if m.is_one() {
        return Some((Rational::one(), Integer::one()));
    }
    let q_i = i64::from(q);
    let whole = p.div_euclid(q_i);
    let remainder = u32::try_from(p.rem_euclid(q_i)).ok()?;

    let whole_part = Rational::from_integer(m.clone()).powi(whole)?;
    if remainder == 0 {
        return Some((whole_part, Integer::one()));
    }
    let (outside, inside) = m.pow(remainder).split_perfect_power(q)?;
    Some((whole_part * Rational::from_integer(outside), inside))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_folds_numbers_and_collects_terms() {
        let mut arena = ExprArena::new();
        let x = arena.symbol("x");
        let two = arena.integer(2);
        let three = arena.integer(3);

        let two_x = arena.mul(two, x);
        let sum = arena.add_many([x, two_x, two, three]);

        let three_x = arena.mul(three, x);
        let five = arena.integer(5);
        let expected = arena.add(three_x, five);
        assert_eq!(sum, expected);
    }

    #[test]
    fn test_add_cancels_to_zero() {
        let mut arena = ExprArena::new();
        let x = arena.symbol("x");
        let zero = arena.sub(x, x);
        assert!(arena.get(zero).is_zero());
    }

    #[test]
    fn test_mul_collects_bases() {
        let mut arena = ExprArena::new();
        let x = arena.symbol("x");
        let two = arena.integer(2);

        let x_squared = arena.pow(x, two);
        let product = arena.mul(x, x);
        assert_eq!(product, x_squared);

        let three = arena.integer(3);
        let x_cubed = arena.pow(x, three);
        assert_eq!(arena.mul(x_squared, x), x_cubed);
    }

    #[test]
    fn test_mul_by_zero() {
        let mut arena = ExprArena::new();
        let x = arena.symbol("x");
        let zero = arena.integer(0);
        let value = arena.mul(zero, x);
        assert!(arena.get(value).is_zero());
    }

    #[test]
    fn test_coefficient_distributes_over_sum() {
        let mut arena = ExprArena::new();
        let x = arena.symbol("x");
        let one = arena.integer(1);
        let two = arena.integer(2);

        let x_plus_1 = arena.add(x, one);
        let product = arena.mul(two, x_plus_1);

        let two_x = arena.mul(two, x);
        let expected = arena.add(two_x, two);
        assert_eq!(product, expected);
    }

    #[test]
    fn test_division_cancels() {
        let mut arena = ExprArena::new();
        let x = arena.symbol("x");
        let two = arena.integer(2);
        let x_squared = arena.pow(x, two);

        let quotient = arena.div(x_squared, x);
        assert_eq!(quotient, x);
    }

    #[test]
    fn test_huge_numeric_power_stays_symbolic() {
        let mut arena = ExprArena::new();
        let two = arena.integer(2);
        let ten = arena.integer(10);
        let huge = arena.integer(1 << 40);

        let power = arena.pow(two, huge);
        assert_eq!(*arena.get(power), ExprNode::Pow { base: two, exp: huge });
        assert_eq!(arena.pow(two, ten), arena.integer(1024));

        let minus_one = arena.integer(-1);
        let sign = arena.pow(minus_one, huge);
        assert!(arena.get(sign).is_one());
    }

    #[test]
    fn test_sqrt_extracts_squares() {
        let mut arena = ExprArena::new();
        let eight = arena.integer(8);
        let two = arena.integer(2);

        let root8 = arena.sqrt(eight);
        let root2 = arena.sqrt(two);
        assert_eq!(root8, arena.mul(two, root2));

        let four = arena.integer(4);
        assert_eq!(arena.sqrt(four), two);

        // sqrt(2) * sqrt(2) = 2
        assert_eq!(arena.mul(root2, root2), two);
    }

    #[test]
    fn test_sqrt_of_fraction_is_rationalized() {
        let mut arena = ExprArena::new();
        let half = arena.rational(1, 2);
        let two = arena.integer(2);

        let root = arena.sqrt(half);
        let root2 = arena.sqrt(two);
        let expected = arena.mul(half, root2);
        assert_eq!(root, expected);
    }

    #[test]
    fn test_sqrt_of_negative_is_imaginary() {
        let mut arena = ExprArena::new();
        let minus_four = arena.integer(-4);
        let two = arena.integer(2);
        let i = arena.constant(Constant::I);

        let root = arena.sqrt(minus_four);
        assert_eq!(root, arena.mul(two, i));
    }

    #[test]
    fn test_imaginary_unit_powers() {
        let mut arena = ExprArena::new();
        let i = arena.constant(Constant::I);
        let two = arena.integer(2);
        let four = arena.integer(4);

        assert_eq!(arena.pow(i, two), arena.integer(-1));
        let value = arena.pow(i, four);
        assert!(arena.get(value).is_one());
        assert_eq!(arena.mul(i, i), arena.integer(-1));
    }

    #[test]
    fn test_exp_and_ln_cancel() {
        let mut arena = ExprArena::new();
        let x = arena.symbol("x");

        let ln_x = arena.apply(Function::Ln, x);
        assert_eq!(arena.apply(Function::Exp, ln_x), x);

        let exp_x = arena.apply(Function::Exp, x);
        assert_eq!(arena.apply(Function::Ln, exp_x), x);

        let e = arena.constant(Constant::E);
        let value = arena.apply(Function::Ln, e);
        assert!(arena.get(value).is_one());
        assert_eq!(arena.pow(e, x), exp_x);
    }

    #[test]
    fn test_exp_products_combine() {
        let mut arena = ExprArena::new();
        let x = arena.symbol("x");
        let exp_x = arena.apply(Function::Exp, x);

        let product = arena.mul(exp_x, exp_x);
        let two = arena.integer(2);
        let two_x = arena.mul(two, x);
        assert_eq!(product, arena.apply(Function::Exp, two_x));
    }

    #[test]
    fn test_trig_special_values() {
        let mut arena = ExprArena::new();
        let zero = arena.integer(0);
        let pi = arena.constant(Constant::Pi);
        let half = arena.rational(1, 2);
        let half_pi = arena.mul(half, pi);

        let value = arena.apply(Function::Sin, zero);

        assert!(arena.get(value).is_zero());
        let value = arena.apply(Function::Cos, zero);
        assert!(arena.get(value).is_one());
        let value = arena.apply(Function::Sin, pi);
        assert!(arena.get(value).is_zero());
        assert_eq!(arena.apply(Function::Cos, pi), arena.integer(-1));
        let value = arena.apply(Function::Sin, half_pi);
        assert!(arena.get(value).is_one());
        let value = arena.apply(Function::Cos, half_pi);
        assert!(arena.get(value).is_zero());
    }

    #[test]
    fn test_inverse_trig_values() {
        let mut arena = ExprArena::new();
        let half = arena.rational(1, 2);
        let one = arena.integer(1);
        let pi = arena.constant(Constant::Pi);

        let sixth = arena.rational(1, 6);
        let pi_6 = arena.mul(sixth, pi);
        assert_eq!(arena.apply(Function::Asin, half), pi_6);

        let quarter = arena.rational(1, 4);
        let pi_4 = arena.mul(quarter, pi);
        assert_eq!(arena.apply(Function::Atan, one), pi_4);

        let minus_one = arena.integer(-1);
        assert_eq!(arena.apply(Function::Acos, minus_one), pi);
    }

    #[test]
    fn test_odd_and_even_sign_extraction() {
        let mut arena = ExprArena::new();
        let x = arena.symbol("x");
        let minus_x = arena.neg(x);

        let sin_x = arena.apply(Function::Sin, x);
        assert_eq!(arena.apply(Function::Sin, minus_x), arena.neg(sin_x));

        let cos_x = arena.apply(Function::Cos, x);
        assert_eq!(arena.apply(Function::Cos, minus_x), cos_x);
    }
}
