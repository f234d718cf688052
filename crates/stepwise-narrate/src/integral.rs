//! Narration of integration proof trees.

use stepwise_calculus::{antiderivative, differentiate, IntegralRule, IntegralStep};
use stepwise_core::{Constant, ExprArena, ExprHandle, ExprNode};
use tracing::debug;

use crate::error::NarrationError;
use crate::INDENT;

const PARTS_RULE: &str = r"\text{Apply integration by parts: } \int u \, dv = uv - \int v \, du";
const CONSTANT_TIMES_RULE: &str =
    r"\text{Pull out the constant: } \int c \cdot f(x) \, dx = c \cdot \int f(x) \, dx";
const POWER_RULE: &str = r"\text{Apply the power rule: } \int x^n \, dx = \frac{x^{n+1}}{n+1}";
const RECIPROCAL_RULE: &str = r"\text{Apply the reciprocal rule: } \int \frac{1}{x} \, dx = \ln|x|";
const EXP_RULE: &str = r"\text{Apply the exponential rule: } \int e^x \, dx = e^x";
const EXPONENTIAL_RULE: &str =
    r"\text{Apply the exponential rule: } \int a^x \, dx = \frac{a^x}{\ln a}";
const CONSTANT_RULE: &str = r"\text{Integrate the constant: } \int c \, dx = c x";
const SUM_RULE: &str = r"\text{Split using linearity:}";
const DONT_KNOW: &str = r"\text{No further integration steps found}";

/// Narrates a proof tree, one line per fact, indented by recursion depth.
///
/// Only the first of several alternatives is narrated.
///
/// # Errors
///
/// Fails if a by-parts step needs a derivative or antiderivative that cannot
/// be produced; the whole narration is then abandoned.
pub fn narrate_integral(arena: &mut ExprArena, step: &IntegralStep) -> Result<Vec<String>, NarrationError> {
    let mut narrator = IntegralNarrator {
        arena,
        lines: Vec::new(),
    };
    narrator.step(step, 0)?;
    debug!(lines = narrator.lines.len(), "narrated integral");
    Ok(narrator.lines)
}

struct IntegralNarrator<'a> {
    arena: &'a mut ExprArena,
    lines: Vec<String>,
}

impl IntegralNarrator<'_> {
    fn line(&mut self, depth: usize, text: &str) {
        self.lines.push(format!("{}{text}", INDENT.repeat(depth)));
    }

    fn latex(&self, expr: ExprHandle) -> String {
        self.arena.to_latex(expr)
    }

    /// LaTeX of the indefinite integral of `body` in `var`.
    fn integral_latex(&mut self, body: ExprHandle, var: ExprHandle) -> String {
        let integral = self.arena.integral(body, var, None);
        self.arena.to_latex(integral)
    }

    fn step(&mut self, step: &IntegralStep, depth: usize) -> Result<(), NarrationError> {
        let x = step.variable;
        match &step.rule {
            IntegralRule::Parts {
                u,
                dv,
                v_step,
                second_step,
            } => {
                if v_step.contains_dont_know() {
                    return Err(NarrationError::MissingAntiderivative(self.latex(*dv)));
                }
                let du = differentiate(self.arena, *u, x)?;
                let v = antiderivative(self.arena, v_step);
                let uv = self.arena.mul(*u, v);
                let v_du = self.arena.mul(v, du);

                self.line(depth, PARTS_RULE);
                let text = format!(r"\quad u = {}, \quad dv = {}", self.latex(*u), self.latex(*dv));
                self.line(depth, &text);
                let text = format!(r"\quad du = {}, \quad v = {}", self.latex(du), self.latex(v));
                self.line(depth, &text);
                let remaining = self.integral_latex(v_du, x);
                let text = format!(r"\quad \Rightarrow {} - {remaining}", self.latex(uv));
                self.line(depth, &text);

                if let Some(second) = second_step {
                    self.step(second, depth + 1)?;
                }
            }

            IntegralRule::Substitution {
                u_var,
                u_func,
                substep,
            } => {
                let text = format!(
                    r"\text{{Substitute: }} {} = {}",
                    self.latex(*u_var),
                    self.latex(*u_func)
                );
                self.line(depth, &text);
                self.step(substep, depth + 1)?;
            }

            IntegralRule::Alternatives { alternatives } => {
                if let Some(first) = alternatives.first() {
                    self.step(first, depth)?;
                }
            }

            IntegralRule::Rewrite { rewritten, substep } => {
                let text = format!(
                    r"\text{{Rewrite the integrand: }} {}",
                    self.integral_latex(*rewritten, x)
                );
                self.line(depth, &text);
                self.step(substep, depth + 1)?;
            }

            IntegralRule::DontKnow => self.line(depth, DONT_KNOW),

            IntegralRule::Sum { substeps } => {
                self.line(depth, SUM_RULE);
                for substep in substeps {
                    self.step(substep, depth + 1)?;
                }
            }

            IntegralRule::ConstantTimes {
                constant, substep, ..
            } => {
                self.line(depth, CONSTANT_TIMES_RULE);
                let text = format!(r"\quad \text{{Constant: }} {}", self.latex(*constant));
                self.line(depth, &text);
                self.step(substep, depth + 1)?;
            }

            IntegralRule::Power { exp, .. } => {
                let text = format!(r"{POWER_RULE}, \quad n = {}", self.latex(*exp));
                self.line(depth, &text);
            }

            IntegralRule::Reciprocal { .. } => self.line(depth, RECIPROCAL_RULE),

            IntegralRule::Exponential { base, .. } => {
                if matches!(self.arena.get(*base), ExprNode::Constant(Constant::E)) {
                    self.line(depth, EXP_RULE);
                } else {
                    let text = format!(r"{EXPONENTIAL_RULE}, \quad a = {}", self.latex(*base));
                    self.line(depth, &text);
                }
            }

            IntegralRule::Trig { .. } => {
                let result = antiderivative(self.arena, step);
                let text = format!(
                    r"\text{{Apply a trigonometric integral: }} {} = {}",
                    self.integral_latex(step.integrand, x),
                    self.latex(result)
                );
                self.line(depth, &text);
            }

            IntegralRule::Constant { constant } => {
                let text = format!(r"{CONSTANT_RULE}, \quad c = {}", self.latex(*constant));
                self.line(depth, &text);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use stepwise_calculus::integral_steps;
    use stepwise_core::Function;

    fn narrate(build: impl FnOnce(&mut ExprArena, ExprHandle) -> ExprHandle) -> Vec<String> {
        let mut arena = ExprArena::new();
        let x = arena.symbol("x");
        let integrand = build(&mut arena, x);
        let steps = integral_steps(&mut arena, integrand, x);
        narrate_integral(&mut arena, &steps).unwrap()
    }

    fn indent_level(line: &str) -> usize {
        let mut rest = line;
        let mut level = 0;
        while let Some(stripped) = rest.strip_prefix(INDENT) {
            rest = stripped;
            level += 1;
        }
        level
    }

    #[test]
    fn test_power_rule_line() {
        let lines = narrate(|_, x| x);
        assert_eq!(lines, vec![format!(r"{POWER_RULE}, \quad n = 1")]);
    }

    #[test]
    fn test_constant_factor() {
        let lines = narrate(|arena, x| {
            let three = arena.integer(3);
            let sin = arena.apply(Function::Sin, x);
            arena.mul(three, sin)
        });
        assert_eq!(
            lines,
            vec![
                CONSTANT_TIMES_RULE.to_string(),
                r"\quad \text{Constant: } 3".to_string(),
                r"\quad \text{Apply a trigonometric integral: } \int \sin{\left(x \right)}\, dx = - \cos{\left(x \right)}".to_string(),
            ]
        );
    }

    #[test]
    fn test_sum_indents_addends() {
        let lines = narrate(|arena, x| {
            let one = arena.integer(1);
            arena.add(x, one)
        });
        assert_eq!(lines[0], SUM_RULE);
        assert_eq!(lines.len(), 3);
        assert!(lines[1..].iter().all(|line| indent_level(line) == 1));
    }

    #[test]
    fn test_parts() {
        let lines = narrate(|arena, x| {
            let exp = arena.apply(Function::Exp, x);
            arena.mul(x, exp)
        });
        assert_eq!(
            lines,
            vec![
                PARTS_RULE.to_string(),
                r"\quad u = x, \quad dv = e^{x}".to_string(),
                r"\quad du = 1, \quad v = e^{x}".to_string(),
                r"\quad \Rightarrow x e^{x} - \int e^{x}\, dx".to_string(),
                format!("{INDENT}{EXP_RULE}"),
            ]
        );
    }

    #[test]
    fn test_substitution() {
        let lines = narrate(|arena, x| {
            let two = arena.integer(2);
            let square = arena.pow(x, two);
            let cos = arena.apply(Function::Cos, square);
            arena.mul_many([two, x, cos])
        });
        assert_eq!(lines[0], r"\text{Substitute: } u = x^{2}");
        assert!(lines[1..].iter().all(|line| indent_level(line) >= 1));
    }

    #[test]
    fn test_dont_know() {
        let lines = narrate(|arena, x| {
            let two = arena.integer(2);
            let square = arena.pow(x, two);
            arena.apply(Function::Exp, square)
        });
        assert_eq!(lines, vec![DONT_KNOW.to_string()]);
    }

    #[test]
    fn test_indentation_grows_one_level_at_a_time() {
        let lines = narrate(|arena, x| {
            let three = arena.integer(3);
            let two = arena.integer(2);
            let square = arena.pow(x, two);
            let scaled = arena.mul(three, square);
            let ln = arena.apply(Function::Ln, x);
            let x_ln = arena.mul(x, ln);
            arena.add(scaled, x_ln)
        });
        assert!(lines.len() > 3);
        assert_eq!(indent_level(&lines[0]), 0);
        for pair in lines.windows(2) {
            assert!(indent_level(&pair[1]) <= indent_level(&pair[0]) + 1);
        }
    }

    #[test]
    fn test_narration_is_repeatable() {
        let mut arena = ExprArena::new();
        let x = arena.symbol("x");
        let sin = arena.apply(Function::Sin, x);
        let cos = arena.apply(Function::Cos, x);
        let integrand = arena.mul(sin, cos);
        let steps = integral_steps(&mut arena, integrand, x);

        let first = narrate_integral(&mut arena, &steps).unwrap();
        let second = narrate_integral(&mut arena, &steps).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_only_first_alternative_is_narrated() {
        let mut arena = ExprArena::new();
        let x = arena.symbol("x");
        let two = arena.integer(2);
        let square = arena.pow(x, two);
        let power = IntegralStep::new(square, x, IntegralRule::Power { base: x, exp: two });
        let unknown = IntegralStep::new(square, x, IntegralRule::DontKnow);

        let step = IntegralStep::new(
            square,
            x,
            IntegralRule::Alternatives {
                alternatives: vec![power.clone(), unknown.clone()],
            },
        );
        assert_eq!(
            narrate_integral(&mut arena, &step).unwrap(),
            vec![format!(r"{POWER_RULE}, \quad n = 2")]
        );
        let result = antiderivative(&mut arena, &step);
        assert_eq!(arena.to_latex(result), r"\frac{x^{3}}{3}");

        let reversed = IntegralStep::new(
            square,
            x,
            IntegralRule::Alternatives {
                alternatives: vec![unknown, power],
            },
        );
        assert_eq!(narrate_integral(&mut arena, &reversed).unwrap(), vec![DONT_KNOW.to_string()]);
    }

    #[test]
    fn test_rewrite_line() {
        let lines = narrate(|arena, x| {
            let one = arena.integer(1);
            let two = arena.integer(2);
            let sum = arena.add(x, one);
            arena.pow(sum, two)
        });
        assert_eq!(
            lines[0],
            r"\text{Rewrite the integrand: } \int \left(x^{2} + 2 x + 1\right)\, dx"
        );
        assert!(lines.len() > 1);
        assert!(lines[1..].iter().all(|line| indent_level(line) >= 1));
    }

    #[test]
    fn test_reciprocal_line() {
        let mut arena = ExprArena::new();
        let x = arena.symbol("x");
        let minus_one = arena.integer(-1);
        let reciprocal = arena.pow(x, minus_one);
        let step = IntegralStep::new(reciprocal, x, IntegralRule::Reciprocal { base: x });

        assert_eq!(narrate_integral(&mut arena, &step).unwrap(), vec![RECIPROCAL_RULE.to_string()]);
    }

    #[test]
    fn test_exponential_with_other_base() {
        let mut arena = ExprArena::new();
        let x = arena.symbol("x");
        let two = arena.integer(2);
        let power = arena.pow(two, x);
        let step = IntegralStep::new(power, x, IntegralRule::Exponential { base: two, exp: x });

        assert_eq!(
            narrate_integral(&mut arena, &step).unwrap(),
            vec![format!(r"{EXPONENTIAL_RULE}, \quad a = 2")]
        );
    }

    #[test]
    fn test_missing_antiderivative_abandons_narration() {
        let mut arena = ExprArena::new();
        let x = arena.symbol("x");
        let two = arena.integer(2);
        let square = arena.pow(x, two);
        let hard = arena.apply(Function::Exp, square);
        let integrand = arena.mul(x, hard);
        let v_step = IntegralStep::new(hard, x, IntegralRule::DontKnow);
        let step = IntegralStep::new(
            integrand,
            x,
            IntegralRule::Parts {
                u: x,
                dv: hard,
                v_step: Box::new(v_step),
                second_step: None,
            },
        );

        assert!(matches!(
            narrate_integral(&mut arena, &step),
            Err(NarrationError::MissingAntiderivative(_))
        ));
    }
}
