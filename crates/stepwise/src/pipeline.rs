//! One request from LaTeX input to a narrated answer.

use serde::Serialize;
use stepwise_calculus::{evaluate, integral_steps};
use stepwise_core::{ExprArena, ExprHandle, ExprKind, ExprNode};
use stepwise_latex::parse_latex;
use stepwise_narrate::{narrate_derivative, narrate_equation, narrate_integral, NarrationError};
use stepwise_simplify::Simplifier;
use stepwise_solve::solve;
use tracing::{debug, warn};

use crate::error::Error;

const EQUATION: &str = r"\text{2. Recognized an equation, solving}";
const EXPRESSION: &str = r"\text{2. Recognized an expression, evaluating}";
const EQUATION_HEADER: &str = r"\text{--- Equation steps ---}";
const INTEGRATION_HEADER: &str = r"\text{--- Integration steps ---}";
const DIFFERENTIATION_HEADER: &str = r"\text{--- Differentiation steps ---}";
const FOOTER: &str = r"\text{------------------}";

/// The answer to one request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Solution {
    /// LaTeX of the final answer: a root list for equations, the simplified
    /// value otherwise.
    pub result: String,
    /// LaTeX lines describing how the answer was reached.
    pub steps: Vec<String>,
}

/// Parses, evaluates or solves, and narrates a LaTeX input.
///
/// Each call works in its own arena; `simplifier` is only read.
///
/// # Errors
///
/// Returns an [`Error`] if the input does not parse, a pending operation
/// cannot be evaluated, or an equation cannot be solved.
pub fn solve_latex(input: &str, simplifier: &Simplifier) -> Result<Solution, Error> {
    let mut arena = ExprArena::new();
    let expr = parse_latex(&mut arena, input)?;
    let kind = arena.classify(expr);
    debug!(?kind, expr = %arena.to_latex(expr), "parsed input");
    reject_zero_division(&arena, expr)?;

    let mut steps = vec![format!(r"\text{{1. Parse input: }} {}", arena.to_latex(expr))];
    if kind == ExprKind::Equality {
        steps.push(EQUATION.to_string());
        let narration = narrate_equation(&mut arena, expr);
        append_narration(&mut steps, EQUATION_HEADER, narration);

        let roots = solve(&mut arena, expr)?;
        let result = arena.list_to_latex(&roots);
        steps.push(format!(r"\text{{3. Solution set: }} {result}"));
        return Ok(Solution { result, steps });
    }

    steps.push(EXPRESSION.to_string());
    if let Some((header, narration)) = narrate_operation(&mut arena, expr) {
        append_narration(&mut steps, header, narration);
    }

    let value = evaluate(&mut arena, expr)?;
    reject_zero_division(&arena, value)?;
    steps.push(format!(r"\text{{3. Result: }} {}", arena.to_latex(value)));

    let simplified = simplifier.simplify(&mut arena, value);
    let result = arena.to_latex(simplified);
    if simplified != value {
        steps.push(format!(r"\text{{4. Simplified: }} {result}"));
    }
    Ok(Solution { result, steps })
}

fn reject_zero_division(arena: &ExprArena, expr: ExprHandle) -> Result<(), Error> {
    if arena.has_zero_division(expr) {
        return Err(Error::DivisionByZero(arena.to_latex(expr)));
    }
    Ok(())
}

/// Narrates a top-level integral or first derivative.
fn narrate_operation(
    arena: &mut ExprArena,
    expr: ExprHandle,
) -> Option<(&'static str, Result<Vec<String>, NarrationError>)> {
    match *arena.get(expr) {
        ExprNode::Integral { expr: body, var, .. } if arena.as_symbol(var).is_some() => {
            let steps = integral_steps(arena, body, var);
            Some((INTEGRATION_HEADER, narrate_integral(arena, &steps)))
        }
        ExprNode::Derivative {
            expr: body,
            var,
            order: 1,
        } => Some((DIFFERENTIATION_HEADER, narrate_derivative(arena, body, var))),
        _ => None,
    }
}

/// Appends a narration between its header and the footer.
///
/// Empty and failed narrations add nothing.
fn append_narration(steps: &mut Vec<String>, header: &str, narration: Result<Vec<String>, NarrationError>) {
    match narration {
        Ok(lines) if lines.is_empty() => {}
        Ok(lines) => {
            steps.push(header.to_string());
            steps.extend(lines);
            steps.push(FOOTER.to_string());
        }
        Err(error) => warn!(%error, header, "narration failed, omitting steps"),
    }
}
