//! Narration of single-variable polynomial equations.

use stepwise_core::{ExprArena, ExprHandle, ExprNode, Polynomial};
use stepwise_solve::{discriminant, linear_root, quadratic_root};

use crate::error::NarrationError;

const LINEAR: &str = r"\text{This is a linear equation } ax + b = 0";
const LINEAR_FORMULA: &str = r"\text{Solution: } x = -\frac{b}{a}";
const QUADRATIC: &str = r"\text{This is a quadratic equation } ax^2 + bx + c = 0";
const QUADRATIC_FORMULA: &str =
    r"\text{Apply the quadratic formula: } x = \frac{-b \pm \sqrt{b^2 - 4ac}}{2a}";
const NO_REAL_SOLUTION: &str = r"\text{The discriminant is negative: no real solution}";
const FALLBACK: &str = r"\text{Try factoring or a numerical method}";

/// Narrates the closed-form solution of an equation in one unknown.
///
/// Equations with zero or several free symbols get no lines. The narration
/// only covers real roots; complex roots of a quadratic are announced as
/// "no real solution" even though the solver reports them.
///
/// # Errors
///
/// Fails if the sign of a quadratic's discriminant cannot be decided.
pub fn narrate_equation(arena: &mut ExprArena, equation: ExprHandle) -> Result<Vec<String>, NarrationError> {
    let symbols = arena.free_symbols(equation);
    let &[id] = symbols.as_slice() else {
        return Ok(Vec::new());
    };
    let var = arena.intern(ExprNode::Symbol(id));
    let expr = match *arena.get(equation) {
        ExprNode::Equality { lhs, rhs } => arena.sub(lhs, rhs),
        _ => equation,
    };

    let mut lines = vec![format!(
        r"\text{{Move all terms to one side: }} {} = 0",
        arena.to_latex(expr)
    )];
    let poly = Polynomial::from_expr(arena, expr, var);
    match poly.as_ref().map(Polynomial::coeffs) {
        Some(&[b, a]) => {
            let root = linear_root(arena, a, b);
            lines.extend([
                LINEAR.to_string(),
                format!(r"\quad a = {}, \quad b = {}", arena.to_latex(a), arena.to_latex(b)),
                LINEAR_FORMULA.to_string(),
                format!(r"\quad \Rightarrow {} = {}", arena.to_latex(var), arena.to_latex(root)),
            ]);
        }
        Some(&[c, b, a]) => {
            let disc = discriminant(arena, a, b, c);
            lines.extend([
                QUADRATIC.to_string(),
                format!(
                    r"\quad a = {}, \quad b = {}, \quad c = {}",
                    arena.to_latex(a),
                    arena.to_latex(b),
                    arena.to_latex(c)
                ),
                QUADRATIC_FORMULA.to_string(),
                format!(r"\quad \Delta = b^2 - 4ac = {}", arena.to_latex(disc)),
            ]);

            let sign = arena
                .eval_f64(disc)
                .ok_or_else(|| NarrationError::UndecidedDiscriminant(arena.to_latex(disc)))?;
            if sign >= 0.0 {
                let plus = quadratic_root(arena, a, b, disc, true);
                let minus = quadratic_root(arena, a, b, disc, false);
                lines.extend([
                    format!(r"\quad x_1 = \frac{{-b + \sqrt{{\Delta}}}}{{2a}} = {}", arena.to_latex(plus)),
                    format!(r"\quad x_2 = \frac{{-b - \sqrt{{\Delta}}}}{{2a}} = {}", arena.to_latex(minus)),
                ]);
            } else {
                lines.push(NO_REAL_SOLUTION.to_string());
            }
        }
        _ => lines.push(FALLBACK.to_string()),
    }
    Ok(lines)
}
