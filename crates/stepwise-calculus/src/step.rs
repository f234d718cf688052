//! Integration proof trees.
//!
//! An [`IntegralStep`] records which technique was chosen for an integrand
//! and carries exactly the sub-expressions that technique needs. The tree
//! is built by [`integral_steps`](crate::integral_steps) and consumed twice:
//! once to compute the antiderivative and once to narrate the derivation.

use stepwise_core::ExprHandle;

/// One node of an integration proof tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IntegralStep {
    /// The integrand this step integrates.
    pub integrand: ExprHandle,
    /// The integration variable (a symbol).
    pub variable: ExprHandle,
    /// The technique applied.
    pub rule: IntegralRule,
}

/// Integrals of trigonometric expressions known in closed form.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrigForm {
    /// sin(x)
    Sin,
    /// cos(x)
    Cos,
    /// sec²(x) = cos(x)^-2
    SecSquared,
    /// csc²(x) = sin(x)^-2
    CscSquared,
    /// sec(x)tan(x) = sin(x) cos(x)^-2
    SecTan,
    /// csc(x)cot(x) = cos(x) sin(x)^-2
    CscCot,
}

/// The technique applied at one node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum IntegralRule {
    /// ∫ u dv = u v - ∫ v du.
    Parts {
        /// The factor that is differentiated.
        u: ExprHandle,
        /// The factor that is integrated.
        dv: ExprHandle,
        /// How dv is integrated.
        v_step: Box<IntegralStep>,
        /// How the remaining ∫ v du is integrated.
        second_step: Option<Box<IntegralStep>>,
    },

    /// Substitution `u_var = u_func`; the sub-step integrates in `u_var`.
    Substitution {
        /// The new variable.
        u_var: ExprHandle,
        /// Its defining expression in the old variable.
        u_func: ExprHandle,
        /// Integral of the rewritten integrand with respect to `u_var`.
        substep: Box<IntegralStep>,
    },

    /// Several techniques apply; the first one is the one used.
    Alternatives {
        /// Candidate derivations in discovery order, never empty.
        alternatives: Vec<IntegralStep>,
    },

    /// The integrand is rewritten into an equal form first.
    Rewrite {
        /// The rewritten integrand.
        rewritten: ExprHandle,
        /// How the rewritten integrand is integrated.
        substep: Box<IntegralStep>,
    },

    /// No technique applies.
    DontKnow,

    /// ∫ (f + g) = ∫ f + ∫ g.
    Sum {
        /// One step per addend, in order.
        substeps: Vec<IntegralStep>,
    },

    /// ∫ c f = c ∫ f.
    ConstantTimes {
        /// The factor free of the variable.
        constant: ExprHandle,
        /// The remaining factor.
        other: ExprHandle,
        /// How the remaining factor is integrated.
        substep: Box<IntegralStep>,
    },

    /// ∫ x^n dx = x^(n+1)/(n+1).
    Power {
        /// The base, the integration variable.
        base: ExprHandle,
        /// The exponent, free of the variable and not -1.
        exp: ExprHandle,
    },

    /// ∫ 1/x dx = ln(x).
    Reciprocal {
        /// The integration variable.
        base: ExprHandle,
    },

    /// ∫ a^x dx = a^x / ln(a).
    Exponential {
        /// The base, `e` for the natural exponential.
        base: ExprHandle,
        /// The exponent, the integration variable.
        exp: ExprHandle,
    },

    /// A tabulated trigonometric integral.
    Trig {
        /// Which form matched.
        form: TrigForm,
        /// The argument, the integration variable.
        arg: ExprHandle,
    },

    /// ∫ c dx = c x.
    Constant {
        /// The constant integrand.
        constant: ExprHandle,
    },
}

impl IntegralStep {
    /// Creates a step.
    #[must_use]
    pub fn new(integrand: ExprHandle, variable: ExprHandle, rule: IntegralRule) -> Self {
        Self {
            integrand,
            variable,
            rule,
        }
    }

    /// Returns true if this tree, along the branches its antiderivative
    /// uses, ends in a [`IntegralRule::DontKnow`] leaf.
    #[must_use]
    pub fn contains_dont_know(&self) -> bool {
        match &self.rule {
            IntegralRule::DontKnow => true,
            IntegralRule::Parts {
                v_step,
                second_step,
                ..
            } => {
                v_step.contains_dont_know()
                    || second_step.as_ref().is_some_and(|s| s.contains_dont_know())
            }
            IntegralRule::Substitution { substep, .. }
            | IntegralRule::Rewrite { substep, .. }
            | IntegralRule::ConstantTimes { substep, .. } => substep.contains_dont_know(),
            IntegralRule::Alternatives { alternatives } => alternatives
                .first()
                .map_or(true, IntegralStep::contains_dont_know),
            IntegralRule::Sum { substeps } => substeps.iter().any(IntegralStep::contains_dont_know),
            IntegralRule::Power { .. }
            | IntegralRule::Reciprocal { .. }
            | IntegralRule::Exponential { .. }
            | IntegralRule::Trig { .. }
            | IntegralRule::Constant { .. } => false,
        }
    }

    /// Number of nested levels below this step.
    #[must_use]
    pub fn depth(&self) -> usize {
        let children: Vec<&IntegralStep> = match &self.rule {
            IntegralRule::Parts {
                v_step,
                second_step,
                ..
            } => std::iter::once(v_step.as_ref())
                .chain(second_step.as_deref())
                .collect(),
            IntegralRule::Substitution { substep, .. }
            | IntegralRule::Rewrite { substep, .. }
            | IntegralRule::ConstantTimes { substep, .. } => vec![substep.as_ref()],
            IntegralRule::Alternatives { alternatives } => alternatives.iter().collect(),
            IntegralRule::Sum { substeps } => substeps.iter().collect(),
            _ => Vec::new(),
        };
        children.iter().map(|c| c.depth() + 1).max().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(rule: IntegralRule) -> IntegralStep {
        let h = ExprHandle::new(0);
        IntegralStep::new(h, h, rule)
    }

    #[test]
    fn test_contains_dont_know_follows_first_alternative() {
        let h = ExprHandle::new(0);
        let good = leaf(IntegralRule::Constant { constant: h });
        let bad = leaf(IntegralRule::DontKnow);

        let first_good = leaf(IntegralRule::Alternatives {
            alternatives: vec![good.clone(), bad.clone()],
        });
        assert!(!first_good.contains_dont_know());

        let first_bad = leaf(IntegralRule::Alternatives {
            alternatives: vec![bad, good],
        });
        assert!(first_bad.contains_dont_know());
    }

    #[test]
    fn test_depth() {
        let h = ExprHandle::new(0);
        let power = leaf(IntegralRule::Power { base: h, exp: h });
        assert_eq!(power.depth(), 0);

        let scaled = leaf(IntegralRule::ConstantTimes {
            constant: h,
            other: h,
            substep: Box::new(power.clone()),
        });
        let sum = leaf(IntegralRule::Sum {
            substeps: vec![power, scaled],
        });
        assert_eq!(sum.depth(), 2);
    }
}
