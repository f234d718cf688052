//! Narration of derivatives by the top-level shape of the function.

use stepwise_calculus::differentiate;
use stepwise_core::{ExprArena, ExprHandle, ExprNode, Function};

use crate::error::NarrationError;

const SUM_RULE: &str =
    r"\text{Apply the sum rule: } \frac{d}{dx}(u + v) = \frac{du}{dx} + \frac{dv}{dx}";
const PRODUCT_RULE: &str = r"\text{Apply the product rule: } \frac{d}{dx}(uv) = u'v + uv'";
const LONG_PRODUCT: &str = r"\text{Apply the product rule}";
const POWER_RULE: &str =
    r"\text{Apply the power and chain rules: } \frac{d}{dx}(u^n) = n u^{n-1} \cdot u'";
const EXPONENTIAL_RULE: &str = r"\text{Apply the exponential differentiation rule}";
const ELEMENTARY_RULE: &str = r"\text{Apply the derivative of an elementary function}";
const CHAIN_RULE: &str = r"\text{and the chain rule}";

/// Narrates `d/d(var) function`.
///
/// Returns no lines when the function has no recognized shape.
///
/// # Errors
///
/// Fails if a factor of a product cannot be differentiated.
pub fn narrate_derivative(
    arena: &mut ExprArena,
    function: ExprHandle,
    var: ExprHandle,
) -> Result<Vec<String>, NarrationError> {
    let body = match arena.get(function).clone() {
        ExprNode::Add(terms) => {
            let placeholders: Vec<String> = terms
                .iter()
                .map(|&term| {
                    let pending = arena.derivative(term, var, 1);
                    arena.to_latex(pending)
                })
                .collect();
            vec![
                SUM_RULE.to_string(),
                format!(r"\quad \Rightarrow {}", placeholders.join(" + ")),
            ]
        }

        ExprNode::Mul(factors) => match *factors.as_slice() {
            [u, v] => {
                let du = differentiate(arena, u, var)?;
                let dv = differentiate(arena, v, var)?;
                let (u, v, du, dv) = (
                    arena.to_latex(u),
                    arena.to_latex(v),
                    arena.to_latex(du),
                    arena.to_latex(dv),
                );
                vec![
                    PRODUCT_RULE.to_string(),
                    format!(r"\quad u = {u}, \quad v = {v}"),
                    format!(r"\quad \Rightarrow \left({du}\right) \cdot {v} + {u} \cdot \left({dv}\right)"),
                ]
            }
            _ => vec![LONG_PRODUCT.to_string()],
        },

        ExprNode::Pow { base, exp } if !arena.depends_on(exp, var) => {
            let one = arena.integer(1);
            let reduced = arena.sub(exp, one);
            let lowered = arena.pow(base, reduced);
            let inner = arena.derivative(base, var, 1);
            vec![
                POWER_RULE.to_string(),
                format!(
                    r"\quad \Rightarrow {} \cdot {} \cdot {}",
                    arena.to_latex(exp),
                    arena.to_latex(lowered),
                    arena.to_latex(inner)
                ),
            ]
        }
        ExprNode::Pow { .. } => vec![EXPONENTIAL_RULE.to_string()],

        ExprNode::Function { func, arg }
            if matches!(func, Function::Sin | Function::Cos | Function::Exp | Function::Ln) =>
        {
            let mut lines = vec![ELEMENTARY_RULE.to_string()];
            if arg != var {
                lines.push(CHAIN_RULE.to_string());
            }
            lines
        }

        _ => return Ok(Vec::new()),
    };

    let goal = format!(
        r"\text{{Goal: differentiate }} {} \text{{ with respect to }} {}",
        arena.to_latex(function),
        arena.to_latex(var)
    );
    Ok(std::iter::once(goal).chain(body).collect())
}
