//! The expression language for egg-based simplification.
//!
//! This module defines the language understood by the e-graph. It mirrors
//! the arithmetic and function nodes of the arena: sums and products are
//! binary, subtraction is a product with `-1` and division a power with
//! exponent `-1`, exactly as the canonical constructors store them.

use egg::{define_language, Analysis, DidMerge, EGraph, Id, Symbol};
use stepwise_core::{Constant, Rational};

/// Largest integer exponent folded by [`ConstantFold`].
const FOLD_EXPONENT_LIMIT: i64 = 64;

define_language! {
    /// The symbolic expression language for stepwise.
    #[allow(missing_docs)]
    pub enum MathLang {
        // Numeric literals
        Num(Rational),
        // e, pi, i
        Const(Constant),
        // Variables
        Symbol(Symbol),

        // Arithmetic
        "+" = Add([Id; 2]),
        "*" = Mul([Id; 2]),
        "^" = Pow([Id; 2]),

        // Trigonometric functions
        "sin" = Sin(Id),
        "cos" = Cos(Id),
        "tan" = Tan(Id),
        "asin" = Asin(Id),
        "acos" = Acos(Id),
        "atan" = Atan(Id),

        // Exponential and logarithmic
        "exp" = Exp(Id),
        "ln" = Ln(Id),

        // Other functions
        "abs" = Abs(Id),
    }
}

impl MathLang {
    /// Returns true if this node is a number.
    #[must_use]
    pub fn is_num(&self) -> bool {
        matches!(self, MathLang::Num(_))
    }

    /// Extracts the numeric value if this is a number.
    #[must_use]
    pub fn as_num(&self) -> Option<&Rational> {
        match self {
            MathLang::Num(n) => Some(n),
            _ => None,
        }
    }
}

/// The e-graph type used by the simplifier.
pub type MathGraph = EGraph<MathLang, ConstantFold>;

/// E-class analysis that folds numeric subterms.
///
/// Every class whose value is a known rational also receives the literal
/// as a member, so extraction can always pick the number.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConstantFold;

impl Analysis<MathLang> for ConstantFold {
    type Data = Option<Rational>;

    fn make(egraph: &MathGraph, enode: &MathLang) -> Self::Data {
        let value = |id: &Id| egraph[*id].data.as_ref();
        match enode {
            MathLang::Num(n) => Some(n.clone()),
            MathLang::Add([a, b]) => Some(value(a)? + value(b)?),
            MathLang::Mul([a, b]) => Some(value(a)? * value(b)?),
            MathLang::Pow([a, b]) => {
                let exp = value(b)?.to_i64()?;
                if exp.abs() > FOLD_EXPONENT_LIMIT {
                    return None;
                }
                value(a)?.powi(exp)
            }
            _ => None,
        }
    }

    fn merge(&mut self, to: &mut Self::Data, from: Self::Data) -> DidMerge {
        match (to.as_ref(), from) {
            (None, Some(n)) => {
                *to = Some(n);
                DidMerge(true, false)
            }
            (Some(_), None) => DidMerge(false, true),
            _ => DidMerge(false, false),
        }
    }

    fn modify(egraph: &mut MathGraph, id: Id) {
        if let Some(n) = egraph[id].data.clone() {
            let literal = egraph.add(MathLang::Num(n));
            egraph.union(id, literal);
        }
    }
}
