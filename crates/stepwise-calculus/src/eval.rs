//! Antiderivatives from proof trees, and forcing of pending operations.

use smallvec::SmallVec;
use stepwise_core::{Constant, ExprArena, ExprHandle, ExprNode, Function};
use tracing::debug;

use crate::diff::differentiate_n;
use crate::error::EvalError;
use crate::manual::integral_steps;
use crate::step::{IntegralRule, IntegralStep, TrigForm};

/// Computes the antiderivative a proof tree describes.
///
/// Alternatives follow their first candidate. A [`IntegralRule::DontKnow`]
/// leaf contributes its integrand as an unevaluated integral.
pub fn antiderivative(arena: &mut ExprArena, step: &IntegralStep) -> ExprHandle {
    let x = step.variable;
    match &step.rule {
        IntegralRule::Constant { constant } => arena.mul(*constant, x),

        IntegralRule::Power { base, exp } => {
            let one = arena.integer(1);
            let raised = arena.add(*exp, one);
            let power = arena.pow(*base, raised);
            arena.div(power, raised)
        }

        IntegralRule::Reciprocal { base } => arena.apply(Function::Ln, *base),

        IntegralRule::Exponential { base, exp } => {
            let power = arena.pow(*base, *exp);
            if matches!(arena.get(*base), ExprNode::Constant(Constant::E)) {
                power
            } else {
                let ln_base = arena.apply(Function::Ln, *base);
                arena.div(power, ln_base)
            }
        }

        IntegralRule::Trig { form, arg } => trig_antiderivative(arena, *form, *arg),

        IntegralRule::ConstantTimes {
            constant, substep, ..
        } => {
            let inner = antiderivative(arena, substep);
            arena.mul(*constant, inner)
        }

        IntegralRule::Sum { substeps } => {
            let terms: Vec<ExprHandle> = substeps.iter().map(|s| antiderivative(arena, s)).collect();
            arena.add_many(terms)
        }

        IntegralRule::Substitution {
            u_var,
            u_func,
            substep,
        } => {
            let in_u = antiderivative(arena, substep);
            arena.substitute(in_u, *u_var, *u_func)
        }

        IntegralRule::Parts {
            u,
            v_step,
            second_step,
            ..
        } => {
            let v = antiderivative(arena, v_step);
            let uv = arena.mul(*u, v);
            match second_step {
                Some(second) => {
                    let rest = antiderivative(arena, second);
                    arena.sub(uv, rest)
                }
                None => uv,
            }
        }

        IntegralRule::Rewrite { substep, .. } => antiderivative(arena, substep),

        IntegralRule::Alternatives { alternatives } => match alternatives.first() {
            Some(first) => antiderivative(arena, first),
            None => arena.integral(step.integrand, x, None),
        },

        IntegralRule::DontKnow => arena.integral(step.integrand, x, None),
    }
}

fn trig_antiderivative(arena: &mut ExprArena, form: TrigForm, x: ExprHandle) -> ExprHandle {
    let minus_one = arena.integer(-1);
    match form {
        TrigForm::Sin => {
            let cos = arena.apply(Function::Cos, x);
            arena.neg(cos)
        }
        TrigForm::Cos => arena.apply(Function::Sin, x),
        TrigForm::SecSquared => arena.apply(Function::Tan, x),
        // -cot(x)
        TrigForm::CscSquared => {
            let cos = arena.apply(Function::Cos, x);
            let sin = arena.apply(Function::Sin, x);
            let cot = arena.div(cos, sin);
            arena.neg(cot)
        }
        // sec(x)
        TrigForm::SecTan => {
            let cos = arena.apply(Function::Cos, x);
            arena.pow(cos, minus_one)
        }
        // -csc(x)
        TrigForm::CscCot => {
            let sin = arena.apply(Function::Sin, x);
            let csc = arena.pow(sin, minus_one);
            arena.neg(csc)
        }
    }
}

/// Forces every pending derivative and integral in `expr`, innermost first.
///
/// Definite integrals are evaluated as `F(b) - F(a)`. A definite integral
/// whose antiderivative is not fully known stays unevaluated.
///
/// # Errors
///
/// Returns an error if a derivative cannot be computed or an integration
/// variable is not a symbol.
pub fn evaluate(arena: &mut ExprArena, expr: ExprHandle) -> Result<ExprHandle, EvalError> {
    let node = arena.get(expr).clone();
    if node.is_atom() {
        return Ok(expr);
    }

    let children = node
        .children()
        .iter()
        .map(|&child| evaluate(arena, child))
        .collect::<Result<SmallVec<[ExprHandle; 4]>, _>>()?;

    match node {
        ExprNode::Derivative { order, .. } => {
            Ok(differentiate_n(arena, children[0], children[1], order)?)
        }
        ExprNode::Integral { bounds, .. } => {
            let (body, var) = (children[0], children[1]);
            if arena.as_symbol(var).is_none() {
                return Err(EvalError::NotASymbol);
            }
            let steps = integral_steps(arena, body, var);
            let primitive = antiderivative(arena, &steps);
            if bounds.is_none() {
                return Ok(primitive);
            }

            let (lower, upper) = (children[2], children[3]);
            if steps.contains_dont_know() {
                debug!("antiderivative incomplete, keeping definite integral");
                return Ok(arena.integral(body, var, Some((lower, upper))));
            }
            let at_upper = arena.substitute(primitive, var, upper);
            let at_lower = arena.substitute(primitive, var, lower);
            Ok(arena.sub(at_upper, at_lower))
        }
        other => Ok(arena.rebuild(&other, &children)),
    }
}
