//! Expression node types.
//!
//! This module defines the expression types stored in the arena. Nodes are
//! only ever built through the canonical constructors on [`ExprArena`], so a
//! stored `Add` or `Mul` is always flat, sorted and free of foldable numbers.
//!
//! [`ExprArena`]: crate::ExprArena

use smallvec::SmallVec;

use crate::handle::ExprHandle;
use crate::number::Rational;

/// Unique identifier for a symbol.
pub type SymbolId = u32;

/// Named mathematical constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Constant {
    /// Euler's number.
    E,
    /// The circle constant.
    Pi,
    /// The imaginary unit.
    I,
}

impl Constant {
    /// Name used when the constant travels outside the arena.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Constant::E => "e",
            Constant::Pi => "pi",
            Constant::I => "i",
        }
    }

    /// Real value of the constant, if it has one.
    #[must_use]
    pub fn to_f64(self) -> Option<f64> {
        match self {
            Constant::E => Some(std::f64::consts::E),
            Constant::Pi => Some(std::f64::consts::PI),
            Constant::I => None,
        }
    }
}

impl std::fmt::Display for Constant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for Constant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "e" => Ok(Constant::E),
            "pi" => Ok(Constant::Pi),
            "i" => Ok(Constant::I),
            other => Err(format!("unknown constant '{other}'")),
        }
    }
}

/// Elementary functions of one argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Function {
    /// Sine.
    Sin,
    /// Cosine.
    Cos,
    /// Tangent.
    Tan,
    /// Inverse sine.
    Asin,
    /// Inverse cosine.
    Acos,
    /// Inverse tangent.
    Atan,
    /// Natural exponential.
    Exp,
    /// Natural logarithm.
    Ln,
    /// Absolute value.
    Abs,
}

impl Function {
    /// Lower-case name of the function.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Function::Sin => "sin",
            Function::Cos => "cos",
            Function::Tan => "tan",
            Function::Asin => "asin",
            Function::Acos => "acos",
            Function::Atan => "atan",
            Function::Exp => "exp",
            Function::Ln => "ln",
            Function::Abs => "abs",
        }
    }

    /// Evaluates the function on a real number.
    #[must_use]
    pub fn apply_f64(self, x: f64) -> f64 {
        match self {
            Function::Sin => x.sin(),
            Function::Cos => x.cos(),
            Function::Tan => x.tan(),
            Function::Asin => x.asin(),
            Function::Acos => x.acos(),
            Function::Atan => x.atan(),
            Function::Exp => x.exp(),
            Function::Ln => x.ln(),
            Function::Abs => x.abs(),
        }
    }

    /// Returns true for sin, cos and tan.
    #[must_use]
    pub fn is_trigonometric(self) -> bool {
        matches!(self, Function::Sin | Function::Cos | Function::Tan)
    }
}

/// An expression node stored in the arena.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ExprNode {
    // === Atoms ===
    /// An exact rational literal.
    Number(Rational),

    /// A symbolic variable.
    Symbol(SymbolId),

    /// A named constant.
    Constant(Constant),

    // === Arithmetic ===
    /// Sum of expressions: a + b + c + ...
    ///
    /// Invariant: at least 2 arguments, none of them a sum.
    Add(SmallVec<[ExprHandle; 4]>),

    /// Product of expressions: a * b * c * ...
    ///
    /// Invariant: at least 2 arguments, none of them a product, at most one
    /// number and it comes first.
    Mul(SmallVec<[ExprHandle; 4]>),

    /// Power expression: base^exp. Division is a power with exponent -1.
    Pow {
        /// The base of the power.
        base: ExprHandle,
        /// The exponent.
        exp: ExprHandle,
    },

    /// An elementary function application.
    Function {
        /// Which function.
        func: Function,
        /// The argument.
        arg: ExprHandle,
    },

    // === Unevaluated operations ===
    /// d^order/dvar^order of expr.
    Derivative {
        /// The function being differentiated.
        expr: ExprHandle,
        /// The variable (a symbol).
        var: ExprHandle,
        /// Order of the derivative, at least 1.
        order: u32,
    },

    /// An integral, indefinite unless bounds are given.
    Integral {
        /// The integrand.
        expr: ExprHandle,
        /// The integration variable (a symbol).
        var: ExprHandle,
        /// Lower and upper bound.
        bounds: Option<(ExprHandle, ExprHandle)>,
    },

    /// An equation lhs = rhs.
    Equality {
        /// Left-hand side.
        lhs: ExprHandle,
        /// Right-hand side.
        rhs: ExprHandle,
    },
}

/// The top-level kind of an expression, as seen by the request pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExprKind {
    /// lhs = rhs.
    Equality,
    /// An unevaluated integral.
    Integral,
    /// An unevaluated derivative.
    Derivative,
    /// Anything else.
    Other,
}

impl ExprNode {
    /// Returns true if this node is an atom (no children).
    #[must_use]
    pub fn is_atom(&self) -> bool {
        matches!(
            self,
            ExprNode::Number(_) | ExprNode::Symbol(_) | ExprNode::Constant(_)
        )
    }

    /// Returns the number if this node is a numeric literal.
    #[must_use]
    pub fn as_number(&self) -> Option<&Rational> {
        match self {
            ExprNode::Number(n) => Some(n),
            _ => None,
        }
    }

    /// Returns true if this is the number zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        use num_traits::Zero;
        matches!(self, ExprNode::Number(n) if n.is_zero())
    }

    /// Returns true if this is the number one.
    #[must_use]
    pub fn is_one(&self) -> bool {
        use num_traits::One;
        matches!(self, ExprNode::Number(n) if n.is_one())
    }

    /// Returns the children of this node.
    #[must_use]
    pub fn children(&self) -> SmallVec<[ExprHandle; 4]> {
        match self {
            ExprNode::Number(_) | ExprNode::Symbol(_) | ExprNode::Constant(_) => SmallVec::new(),
            ExprNode::Add(args) | ExprNode::Mul(args) => args.clone(),
            ExprNode::Pow { base, exp } => smallvec::smallvec![*base, *exp],
            ExprNode::Function { arg, .. } => smallvec::smallvec![*arg],
            ExprNode::Derivative { expr, var, .. } => smallvec::smallvec![*expr, *var],
            ExprNode::Integral { expr, var, bounds } => {
                let mut children: SmallVec<[ExprHandle; 4]> = smallvec::smallvec![*expr, *var];
                if let Some((lower, upper)) = bounds {
                    children.push(*lower);
                    children.push(*upper);
                }
                children
            }
            ExprNode::Equality { lhs, rhs } => smallvec::smallvec![*lhs, *rhs],
        }
    }

    /// Classifies the node for pipeline dispatch.
    #[must_use]
    pub fn kind(&self) -> ExprKind {
        match self {
            ExprNode::Equality { .. } => ExprKind::Equality,
            ExprNode::Integral { .. } => ExprKind::Integral,
            ExprNode::Derivative { .. } => ExprKind::Derivative,
            _ => ExprKind::Other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_atom() {
        assert!(ExprNode::Number(Rational::from(42)).is_atom());
        assert!(ExprNode::Symbol(0).is_atom());
        assert!(ExprNode::Constant(Constant::Pi).is_atom());
        assert!(!ExprNode::Function {
            func: Function::Sin,
            arg: ExprHandle::new(0)
        }
        .is_atom());
    }

    #[test]
    fn test_is_zero_one() {
        assert!(ExprNode::Number(Rational::from(0)).is_zero());
        assert!(!ExprNode::Number(Rational::from(1)).is_zero());
        assert!(ExprNode::Number(Rational::from(1)).is_one());
        assert!(!ExprNode::Symbol(1).is_one());
    }

    #[test]
    fn test_kind() {
        let h = ExprHandle::new(0);
        assert_eq!(ExprNode::Equality { lhs: h, rhs: h }.kind(), ExprKind::Equality);
        assert_eq!(
            ExprNode::Integral { expr: h, var: h, bounds: None }.kind(),
            ExprKind::Integral
        );
        assert_eq!(ExprNode::Symbol(0).kind(), ExprKind::Other);
    }

    #[test]
    fn test_constant_names_round_trip() {
        for c in [Constant::E, Constant::Pi, Constant::I] {
            assert_eq!(c.name().parse::<Constant>(), Ok(c));
        }
    }
}
