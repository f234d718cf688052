//! Isolation of the unknown through invertible operations.
//!
//! `f(g(x)) = c` becomes `g(x) = f^{-1}(c)` for every branch of the inverse,
//! peeling one operation at a time until the unknown stands alone.

use stepwise_core::{Constant, ExprArena, ExprHandle, ExprNode, Function, Rational};

use crate::error::SolveError;

/// Solves `lhs = rhs` for `var`, where `rhs` is free of `var`.
///
/// # Errors
///
/// Returns [`SolveError::Unsupported`] when `var` occurs in more than one
/// place that cannot be separated, or under a non-invertible operation.
pub fn isolate(
    arena: &mut ExprArena,
    lhs: ExprHandle,
    rhs: ExprHandle,
    var: ExprHandle,
) -> Result<Vec<ExprHandle>, SolveError> {
    if lhs == var {
        return Ok(vec![rhs]);
    }
    if !arena.depends_on(lhs, var) {
        return Ok(Vec::new());
    }

    match arena.get(lhs).clone() {
        ExprNode::Add(terms) => {
            let (fixed, moving) = split(arena, &terms, var);
            if fixed.is_empty() {
                return Err(unsupported(arena, lhs, rhs));
            }
            let fixed = arena.add_many(fixed);
            let moving = arena.add_many(moving);
            let rhs = arena.sub(rhs, fixed);
            isolate(arena, moving, rhs, var)
        }
        ExprNode::Mul(factors) => {
            let (fixed, moving) = split(arena, &factors, var);
            if fixed.is_empty() {
                return Err(unsupported(arena, lhs, rhs));
            }
            let fixed = arena.mul_many(fixed);
            let moving = arena.mul_many(moving);
            let rhs = arena.div(rhs, fixed);
            isolate(arena, moving, rhs, var)
        }
        ExprNode::Pow { base, exp } => {
            let branches = match (arena.depends_on(base, var), arena.depends_on(exp, var)) {
                (true, false) => {
                    // u^n = 0 has no solution for n < 0
                    let negative = arena.as_number(exp).is_some_and(Rational::is_negative);
                    if negative && arena.get(rhs).is_zero() {
                        return Ok(Vec::new());
                    }
                    root_branches(arena, exp, rhs)
                }
                (false, true) => {
                    // a^g = c has no solution for c = 0
                    if arena.get(rhs).is_zero() {
                        return Ok(Vec::new());
                    }
                    let ln_rhs = arena.apply(Function::Ln, rhs);
                    let ln_base = arena.apply(Function::Ln, base);
                    let branch = arena.div(ln_rhs, ln_base);
                    return isolate(arena, exp, branch, var);
                }
                _ => return Err(unsupported(arena, lhs, rhs)),
            };
            isolate_all(arena, base, branches, var)
        }
        ExprNode::Function { func, arg } => {
            let branches = inverse_branches(arena, func, rhs);
            isolate_all(arena, arg, branches, var)
        }
        _ => Err(unsupported(arena, lhs, rhs)),
    }
}

fn isolate_all(
    arena: &mut ExprArena,
    lhs: ExprHandle,
    branches: Vec<ExprHandle>,
    var: ExprHandle,
) -> Result<Vec<ExprHandle>, SolveError> {
    let mut roots = Vec::new();
    for rhs in branches {
        roots.extend(isolate(arena, lhs, rhs, var)?);
    }
    Ok(roots)
}

/// Partitions operands into those free of `var` and those containing it.
fn split(arena: &ExprArena, args: &[ExprHandle], var: ExprHandle) -> (Vec<ExprHandle>, Vec<ExprHandle>) {
    args.iter().copied().partition(|&a| !arena.depends_on(a, var))
}

/// Solutions of `u^n = c` for `u`: `±c^{1/n}` for even integers `n`.
///
/// A principal even root is never negative, so `u^{p/q} = c` with even `q`
/// and a negative real `c` has no solution.
fn root_branches(arena: &mut ExprArena, exp: ExprHandle, rhs: ExprHandle) -> Vec<ExprHandle> {
    let principal = arena
        .as_number(exp)
        .is_some_and(|n| !n.is_integer() && n.denominator().to_i64().is_some_and(|q| q % 2 == 0));
    if principal && is_negative_real(arena, rhs) {
        return Vec::new();
    }
    let even = arena
        .as_number(exp)
        .and_then(Rational::to_i64)
        .is_some_and(|n| n > 0 && n % 2 == 0);
    let minus_one = arena.integer(-1);
    let inverse_exp = arena.pow(exp, minus_one);
    let root = arena.pow(rhs, inverse_exp);
    if even {
        let negative = arena.neg(root);
        vec![negative, root]
    } else {
        vec![root]
    }
}

/// Every `t` with `func(t) = c` that the solver reports.
fn inverse_branches(arena: &mut ExprArena, func: Function, rhs: ExprHandle) -> Vec<ExprHandle> {
    match func {
        Function::Exp => {
            if arena.get(rhs).is_zero() {
                Vec::new()
            } else {
                vec![arena.apply(Function::Ln, rhs)]
            }
        }
        Function::Ln => vec![arena.apply(Function::Exp, rhs)],
        // asin(c) and pi - asin(c)
        Function::Sin => {
            let principal = arena.apply(Function::Asin, rhs);
            let pi = arena.constant(Constant::Pi);
            let mirrored = arena.sub(pi, principal);
            vec![principal, mirrored]
        }
        // acos(c) and 2 pi - acos(c)
        Function::Cos => {
            let principal = arena.apply(Function::Acos, rhs);
            let two = arena.integer(2);
            let pi = arena.constant(Constant::Pi);
            let two_pi = arena.mul(two, pi);
            let mirrored = arena.sub(two_pi, principal);
            vec![principal, mirrored]
        }
        Function::Tan => vec![arena.apply(Function::Atan, rhs)],
        Function::Asin => vec![arena.apply(Function::Sin, rhs)],
        Function::Acos => vec![arena.apply(Function::Cos, rhs)],
        Function::Atan => vec![arena.apply(Function::Tan, rhs)],
        Function::Abs => {
            if is_negative_real(arena, rhs) {
                return Vec::new();
            }
            let negative = arena.neg(rhs);
            vec![rhs, negative]
        }
    }
}

fn is_negative_real(arena: &ExprArena, expr: ExprHandle) -> bool {
    arena.eval_f64(expr).is_some_and(|value| value < 0.0)
}

fn unsupported(arena: &ExprArena, lhs: ExprHandle, rhs: ExprHandle) -> SolveError {
    SolveError::Unsupported(format!("{} = {}", arena.to_latex(lhs), arena.to_latex(rhs)))
}
