//! Rule-based integration that records its derivation.
//!
//! Techniques are tried in a fixed order: constant, the table rules,
//! sum split, constant factor extraction, trigonometric rewrites,
//! polynomial expansion, u-substitution, general expansion and finally
//! integration by parts. The first technique that applies wins, except for
//! substitution where every successful candidate is kept.

use stepwise_core::{Constant, ExprArena, ExprHandle, ExprNode, Function, Polynomial};
use tracing::debug;

use crate::diff::differentiate;
use crate::eval::antiderivative;
use crate::step::{IntegralRule, IntegralStep, TrigForm};

/// Nesting depth beyond which a sub-integral is given up.
pub const MAX_DEPTH: usize = 12;

/// Most substitution candidates examined per integrand.
const MAX_CANDIDATES: usize = 16;

/// Builds the proof tree for `∫ integrand d(var)`.
///
/// Never fails: integrands no technique handles become
/// [`IntegralRule::DontKnow`] leaves.
pub fn integral_steps(arena: &mut ExprArena, integrand: ExprHandle, var: ExprHandle) -> IntegralStep {
    let step = Integrator { arena }.steps(integrand, var, 0);
    debug!(
        depth = step.depth(),
        complete = !step.contains_dont_know(),
        "built integration proof tree"
    );
    step
}

struct Integrator<'a> {
    arena: &'a mut ExprArena,
}

/// Priority of a factor as `u` in integration by parts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
enum PartsPriority {
    Algebraic,
    InverseTrig,
    Logarithmic,
}

impl Integrator<'_> {
    fn steps(&mut self, integrand: ExprHandle, var: ExprHandle, depth: usize) -> IntegralStep {
        let rule = if depth > MAX_DEPTH {
            IntegralRule::DontKnow
        } else {
            self.rule(integrand, var, depth)
        };
        IntegralStep::new(integrand, var, rule)
    }

    fn depends(&self, expr: ExprHandle, var: ExprHandle) -> bool {
        self.arena.depends_on(expr, var)
    }

    fn rule(&mut self, f: ExprHandle, x: ExprHandle, depth: usize) -> IntegralRule {
        if !self.depends(f, x) {
            return IntegralRule::Constant { constant: f };
        }
        if let Some(rule) = self.table_rule(f, x) {
            return rule;
        }

        match self.arena.get(f).clone() {
            ExprNode::Add(args) => {
                let substeps = args.iter().map(|&a| self.steps(a, x, depth + 1)).collect();
                return IntegralRule::Sum { substeps };
            }
            ExprNode::Mul(args) => {
                if let Some(rule) = self.constant_times(&args, x, depth) {
                    return rule;
                }
            }
            _ => {}
        }

        self.trig_rewrite(f, x, depth)
            .or_else(|| self.polynomial_rewrite(f, x, depth))
            .or_else(|| self.substitution(f, x, depth))
            .or_else(|| self.expansion_rewrite(f, x, depth))
            .or_else(|| self.parts(f, x, depth))
            .unwrap_or(IntegralRule::DontKnow)
    }

    // === Table rules ===

    fn table_rule(&mut self, f: ExprHandle, x: ExprHandle) -> Option<IntegralRule> {
        if f == x {
            let one = self.arena.integer(1);
            return Some(IntegralRule::Power { base: x, exp: one });
        }

        match self.arena.get(f).clone() {
            ExprNode::Pow { base, exp } if base == x && !self.depends(exp, x) => {
                let minus_one = self.arena.integer(-1);
                if exp == minus_one {
                    Some(IntegralRule::Reciprocal { base })
                } else {
                    Some(IntegralRule::Power { base, exp })
                }
            }
            ExprNode::Pow { base, exp } if exp == x && !self.depends(base, x) => {
                Some(IntegralRule::Exponential { base, exp })
            }
            ExprNode::Pow { base, exp } => {
                let minus_two = self.arena.integer(-2);
                if exp != minus_two {
                    return None;
                }
                match self.function_of(base, x)? {
                    Function::Cos => Some(IntegralRule::Trig {
                        form: TrigForm::SecSquared,
                        arg: x,
                    }),
                    Function::Sin => Some(IntegralRule::Trig {
                        form: TrigForm::CscSquared,
                        arg: x,
                    }),
                    _ => None,
                }
            }
            ExprNode::Function { func, arg } if arg == x => match func {
                Function::Exp => {
                    let e = self.arena.constant(Constant::E);
                    Some(IntegralRule::Exponential { base: e, exp: x })
                }
                Function::Sin => Some(IntegralRule::Trig {
                    form: TrigForm::Sin,
                    arg: x,
                }),
                Function::Cos => Some(IntegralRule::Trig {
                    form: TrigForm::Cos,
                    arg: x,
                }),
                _ => None,
            },
            ExprNode::Mul(args) if args.len() == 2 => {
                let form = self
                    .sec_tan_form(args[0], args[1], x)
                    .or_else(|| self.sec_tan_form(args[1], args[0], x))?;
                Some(IntegralRule::Trig { form, arg: x })
            }
            _ => None,
        }
    }

    /// Returns `func` if `expr` is `func(x)`.
    fn function_of(&self, expr: ExprHandle, x: ExprHandle) -> Option<Function> {
        match self.arena.get(expr) {
            ExprNode::Function { func, arg } if *arg == x => Some(*func),
            _ => None,
        }
    }

    /// Matches `sin(x) cos(x)^-2` and `cos(x) sin(x)^-2`.
    fn sec_tan_form(&mut self, plain: ExprHandle, squared: ExprHandle, x: ExprHandle) -> Option<TrigForm> {
        let numerator = self.function_of(plain, x)?;
        let ExprNode::Pow { base, exp } = self.arena.get(squared).clone() else {
            return None;
        };
        let minus_two = self.arena.integer(-2);
        if exp != minus_two {
            return None;
        }
        match (numerator, self.function_of(base, x)?) {
            (Function::Sin, Function::Cos) => Some(TrigForm::SecTan),
            (Function::Cos, Function::Sin) => Some(TrigForm::CscCot),
            _ => None,
        }
    }

    // === Structural rules ===

    fn constant_times(&mut self, args: &[ExprHandle], x: ExprHandle, depth: usize) -> Option<IntegralRule> {
        let (constants, rest): (Vec<ExprHandle>, Vec<ExprHandle>) =
            args.iter().copied().partition(|&a| !self.depends(a, x));
        if constants.is_empty() || rest.is_empty() {
            return None;
        }
        let constant = self.arena.mul_many(constants);
        let other = self.arena.mul_many(rest);
        let substep = Box::new(self.steps(other, x, depth + 1));
        Some(IntegralRule::ConstantTimes {
            constant,
            other,
            substep,
        })
    }

    fn rewrite(&mut self, rewritten: ExprHandle, x: ExprHandle, depth: usize) -> IntegralRule {
        let substep = Box::new(self.steps(rewritten, x, depth + 1));
        IntegralRule::Rewrite { rewritten, substep }
    }

    /// tan = sin/cos, and the half-angle forms of sin² and cos².
    fn trig_rewrite(&mut self, f: ExprHandle, x: ExprHandle, depth: usize) -> Option<IntegralRule> {
        let rewritten = match self.arena.get(f).clone() {
            ExprNode::Function {
                func: Function::Tan,
                arg,
            } if arg == x => {
                let sin = self.arena.apply(Function::Sin, x);
                let cos = self.arena.apply(Function::Cos, x);
                self.arena.div(sin, cos)
            }
            ExprNode::Pow { base, exp } => {
                let two = self.arena.integer(2);
                if exp != two {
                    return None;
                }
                let func = self.function_of(base, x)?;
                if !matches!(func, Function::Sin | Function::Cos) {
                    return None;
                }
                // sin²x = 1/2 - cos(2x)/2, cos²x = 1/2 + cos(2x)/2
                let double = self.arena.mul(two, x);
                let cos_double = self.arena.apply(Function::Cos, double);
                let half = self.arena.rational(1, 2);
                let sign = if func == Function::Sin { -1 } else { 1 };
                let coeff = self.arena.rational(sign, 2);
                let varying = self.arena.mul(coeff, cos_double);
                self.arena.add(half, varying)
            }
            _ => return None,
        };
        Some(self.rewrite(rewritten, x, depth))
    }

    /// Multiplies out polynomial integrands such as `(x + 1)^2`.
    fn polynomial_rewrite(&mut self, f: ExprHandle, x: ExprHandle, depth: usize) -> Option<IntegralRule> {
        Polynomial::from_expr(self.arena, f, x)?;
        let expanded = self.arena.expand(f);
        (expanded != f).then(|| self.rewrite(expanded, x, depth))
    }

    /// Multiplies out any product over a sum, e.g. `x (x + \sin x)`.
    fn expansion_rewrite(&mut self, f: ExprHandle, x: ExprHandle, depth: usize) -> Option<IntegralRule> {
        let expanded = self.arena.expand(f);
        let is_sum = matches!(self.arena.get(expanded), ExprNode::Add(_));
        (expanded != f && is_sum).then(|| self.rewrite(expanded, x, depth))
    }

    // === Substitution ===

    /// Non-atomic subterms depending on `x`, latest discovered first.
    fn substitution_candidates(&self, f: ExprHandle, x: ExprHandle) -> Vec<ExprHandle> {
        let mut found = Vec::new();
        let mut stack: Vec<ExprHandle> = self.arena.get(f).children().into_iter().rev().collect();
        while let Some(h) = stack.pop() {
            let node = self.arena.get(h);
            if node.is_atom() || !self.depends(h, x) {
                continue;
            }
            if !found.contains(&h) {
                found.push(h);
            }
            stack.extend(node.children().into_iter().rev());
        }
        found.reverse();
        found.truncate(MAX_CANDIDATES);
        found
    }

    fn substitution(&mut self, f: ExprHandle, x: ExprHandle, depth: usize) -> Option<IntegralRule> {
        let candidates = self.substitution_candidates(f, x);
        if candidates.is_empty() {
            return None;
        }
        let avoid = self.arena.free_symbols(f);
        let u_var = self.arena.fresh_symbol("u", &avoid);

        let mut alternatives = Vec::new();
        for u_func in candidates {
            let Ok(du) = differentiate(self.arena, u_func, x) else {
                continue;
            };
            if self.arena.get(du).is_zero() {
                continue;
            }
            let quotient = self.arena.div(f, du);
            let rewritten = self.arena.substitute(quotient, u_func, u_var);
            if self.depends(rewritten, x) {
                continue;
            }
            let substep = self.steps(rewritten, u_var, depth + 1);
            if substep.contains_dont_know() {
                continue;
            }
            alternatives.push(IntegralStep::new(
                f,
                x,
                IntegralRule::Substitution {
                    u_var,
                    u_func,
                    substep: Box::new(substep),
                },
            ));
        }

        match alternatives.len() {
            0 => None,
            1 => alternatives.pop().map(|step| step.rule),
            _ => Some(IntegralRule::Alternatives { alternatives }),
        }
    }

    // === Integration by parts ===

    fn parts_priority(&self, factor: ExprHandle, x: ExprHandle) -> Option<PartsPriority> {
        if factor == x {
            return Some(PartsPriority::Algebraic);
        }
        match self.arena.get(factor) {
            ExprNode::Function { func, .. } => match func {
                Function::Ln => Some(PartsPriority::Logarithmic),
                Function::Asin | Function::Acos | Function::Atan => Some(PartsPriority::InverseTrig),
                _ => None,
            },
            ExprNode::Pow { base, exp } if *base == x => {
                let n = self.arena.as_number(*exp)?;
                (n.is_integer() && n.is_positive()).then_some(PartsPriority::Algebraic)
            }
            _ => None,
        }
    }

    fn parts(&mut self, f: ExprHandle, x: ExprHandle, depth: usize) -> Option<IntegralRule> {
        let factors: Vec<ExprHandle> = match self.arena.get(f) {
            ExprNode::Mul(args) => args.to_vec(),
            _ => vec![f],
        };

        let (index, priority) = factors
            .iter()
            .enumerate()
            .filter_map(|(i, &factor)| Some((i, self.parts_priority(factor, x)?)))
            .max_by_key(|&(i, priority)| (priority, std::cmp::Reverse(i)))?;
        // ∫ x dx needs no parts; a lone factor must be a logarithm or inverse.
        if factors.len() == 1 && priority == PartsPriority::Algebraic {
            return None;
        }

        let u = factors[index];
        let rest: Vec<ExprHandle> = factors
            .iter()
            .enumerate()
            .filter(|&(i, _)| i != index)
            .map(|(_, &h)| h)
            .collect();
        let dv = self.arena.mul_many(rest);

        let v_step = self.steps(dv, x, depth + 1);
        if v_step.contains_dont_know() {
            return None;
        }
        let v = antiderivative(self.arena, &v_step);
        let du = differentiate(self.arena, u, x).ok()?;

        let remaining = self.arena.mul(v, du);
        let second_step = if self.arena.get(remaining).is_zero() {
            None
        } else {
            Some(Box::new(self.steps(remaining, x, depth + 1)))
        };

        Some(IntegralRule::Parts {
            u,
            dv,
            v_step: Box::new(v_step),
            second_step,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (ExprArena, ExprHandle) {
        let mut arena = ExprArena::new();
        let x = arena.symbol("x");
        (arena, x)
    }

    #[test]
    fn test_power_rule() {
        let (mut arena, x) = setup();
        let step = integral_steps(&mut arena, x, x);
        let one = arena.integer(1);
        assert_eq!(step.rule, IntegralRule::Power { base: x, exp: one });
    }

    #[test]
    fn test_reciprocal_and_constant() {
        let (mut arena, x) = setup();
        let minus_one = arena.integer(-1);
        let recip = arena.pow(x, minus_one);
        assert_eq!(
            integral_steps(&mut arena, recip, x).rule,
            IntegralRule::Reciprocal { base: x }
        );

        let y = arena.symbol("y");
        assert_eq!(
            integral_steps(&mut arena, y, x).rule,
            IntegralRule::Constant { constant: y }
        );
    }

    #[test]
    fn test_sum_and_constant_times() {
        let (mut arena, x) = setup();
        let two = arena.integer(2);
        let three = arena.integer(3);
        let x2 = arena.pow(x, two);
        let three_x2 = arena.mul(three, x2);
        let sum = arena.add(three_x2, x);

        let step = integral_steps(&mut arena, sum, x);
        let IntegralRule::Sum { substeps } = &step.rule else {
            panic!("expected a sum split, got {:?}", step.rule);
        };
        assert_eq!(substeps.len(), 2);
        assert!(substeps.iter().any(|s| matches!(
            s.rule,
            IntegralRule::ConstantTimes { constant, .. } if constant == three
        )));
    }

    #[test]
    fn test_trig_table() {
        let (mut arena, x) = setup();
        let sin = arena.apply(Function::Sin, x);
        assert_eq!(
            integral_steps(&mut arena, sin, x).rule,
            IntegralRule::Trig {
                form: TrigForm::Sin,
                arg: x
            }
        );

        let cos = arena.apply(Function::Cos, x);
        let minus_two = arena.integer(-2);
        let sec2 = arena.pow(cos, minus_two);
        assert_eq!(
            integral_steps(&mut arena, sec2, x).rule,
            IntegralRule::Trig {
                form: TrigForm::SecSquared,
                arg: x
            }
        );
    }

    #[test]
    fn test_tan_is_rewritten() {
        let (mut arena, x) = setup();
        let tan = arena.apply(Function::Tan, x);
        let step = integral_steps(&mut arena, tan, x);
        assert!(matches!(step.rule, IntegralRule::Rewrite { .. }));
        assert!(!step.contains_dont_know());
    }

    #[test]
    fn test_substitution() {
        let (mut arena, x) = setup();
        let two = arena.integer(2);
        let x2 = arena.pow(x, two);
        let cos = arena.apply(Function::Cos, x2);
        let integrand = arena.mul_many([two, x, cos]);

        let step = integral_steps(&mut arena, integrand, x);
        let IntegralRule::Substitution { u_var, u_func, substep } = &step.rule else {
            panic!("expected a substitution, got {:?}", step.rule);
        };
        assert_eq!(*u_func, x2);
        assert_eq!(arena.to_latex(*u_var), "u");
        assert!(matches!(
            substep.rule,
            IntegralRule::Trig {
                form: TrigForm::Cos,
                ..
            }
        ));
    }

    #[test]
    fn test_several_substitutions_become_alternatives() {
        let (mut arena, x) = setup();
        let sin = arena.apply(Function::Sin, x);
        let cos = arena.apply(Function::Cos, x);
        let product = arena.mul(sin, cos);

        let step = integral_steps(&mut arena, product, x);
        let IntegralRule::Alternatives { alternatives } = &step.rule else {
            panic!("expected alternatives, got {:?}", step.rule);
        };
        assert_eq!(alternatives.len(), 2);
        assert!(matches!(
            alternatives[0].rule,
            IntegralRule::Substitution { u_func, .. } if u_func == sin
        ));
    }

    #[test]
    fn test_parts_prefers_algebraic_u_over_exponential() {
        let (mut arena, x) = setup();
        let exp = arena.apply(Function::Exp, x);
        let product = arena.mul(x, exp);

        let step = integral_steps(&mut arena, product, x);
        let IntegralRule::Parts { u, dv, second_step, .. } = &step.rule else {
            panic!("expected parts, got {:?}", step.rule);
        };
        assert_eq!(*u, x);
        assert_eq!(*dv, exp);
        assert!(second_step.is_some());
        assert!(!step.contains_dont_know());
    }

    #[test]
    fn test_lone_logarithm_uses_parts() {
        let (mut arena, x) = setup();
        let ln = arena.apply(Function::Ln, x);
        let step = integral_steps(&mut arena, ln, x);
        assert!(matches!(step.rule, IntegralRule::Parts { u, .. } if u == ln));
    }

    #[test]
    fn test_polynomial_is_expanded() {
        let (mut arena, x) = setup();
        let one = arena.integer(1);
        let two = arena.integer(2);
        let sum = arena.add(x, one);
        let square = arena.pow(sum, two);

        let step = integral_steps(&mut arena, square, x);
        assert!(matches!(step.rule, IntegralRule::Rewrite { .. }));
    }

    #[test]
    fn test_dont_know() {
        let (mut arena, x) = setup();
        let two = arena.integer(2);
        let x2 = arena.pow(x, two);
        let exp = arena.apply(Function::Exp, x2);

        let step = integral_steps(&mut arena, exp, x);
        assert_eq!(step.rule, IntegralRule::DontKnow);
    }
}
