//! Conversion between arena expressions and e-graph terms.

use egg::{Id, RecExpr, Symbol};
use hashbrown::HashMap;
use stepwise_core::{ExprArena, ExprHandle, ExprNode, Function};

use crate::language::MathLang;

/// Translates an arena expression into a term.
///
/// n-ary sums and products become left-nested binary nodes. Returns `None`
/// if the expression contains a derivative, an integral or an equality.
#[must_use]
pub fn to_rec_expr(arena: &ExprArena, expr: ExprHandle) -> Option<RecExpr<MathLang>> {
    let mut rec = RecExpr::default();
    let mut memo = HashMap::new();
    add_node(arena, expr, &mut rec, &mut memo)?;
    Some(rec)
}

fn add_node(
    arena: &ExprArena,
    expr: ExprHandle,
    rec: &mut RecExpr<MathLang>,
    memo: &mut HashMap<ExprHandle, Id>,
) -> Option<Id> {
    if let Some(&id) = memo.get(&expr) {
        return Some(id);
    }

    let id = match arena.get(expr) {
        ExprNode::Number(n) => rec.add(MathLang::Num(n.clone())),
        ExprNode::Constant(c) => rec.add(MathLang::Const(*c)),
        ExprNode::Symbol(s) => rec.add(MathLang::Symbol(Symbol::from(arena.symbol_name(*s)))),
        ExprNode::Add(args) => binary_chain(arena, args, rec, memo, MathLang::Add)?,
        ExprNode::Mul(args) => binary_chain(arena, args, rec, memo, MathLang::Mul)?,
        ExprNode::Pow { base, exp } => {
            let base = add_node(arena, *base, rec, memo)?;
            let exp = add_node(arena, *exp, rec, memo)?;
            rec.add(MathLang::Pow([base, exp]))
        }
        ExprNode::Function { func, arg } => {
            let arg = add_node(arena, *arg, rec, memo)?;
            rec.add(function_node(*func, arg))
        }
        ExprNode::Derivative { .. } | ExprNode::Integral { .. } | ExprNode::Equality { .. } => {
            return None
        }
    };

    memo.insert(expr, id);
    Some(id)
}

/// Left-nests `args` under a binary operator.
fn binary_chain(
    arena: &ExprArena,
    args: &[ExprHandle],
    rec: &mut RecExpr<MathLang>,
    memo: &mut HashMap<ExprHandle, Id>,
    op: fn([Id; 2]) -> MathLang,
) -> Option<Id> {
    let mut ids = Vec::with_capacity(args.len());
    for &arg in args {
        ids.push(add_node(arena, arg, rec, memo)?);
    }
    ids.into_iter().reduce(|acc, next| rec.add(op([acc, next])))
}

fn function_node(func: Function, arg: Id) -> MathLang {
    match func {
        Function::Sin => MathLang::Sin(arg),
        Function::Cos => MathLang::Cos(arg),
        Function::Tan => MathLang::Tan(arg),
        Function::Asin => MathLang::Asin(arg),
        Function::Acos => MathLang::Acos(arg),
        Function::Atan => MathLang::Atan(arg),
        Function::Exp => MathLang::Exp(arg),
        Function::Ln => MathLang::Ln(arg),
        Function::Abs => MathLang::Abs(arg),
    }
}

/// Rebuilds a term in the arena through the canonical constructors.
///
/// Returns `None` only for an empty term.
pub fn from_rec_expr(arena: &mut ExprArena, rec: &RecExpr<MathLang>) -> Option<ExprHandle> {
    let nodes = rec.as_ref();
    let mut built: Vec<ExprHandle> = Vec::with_capacity(nodes.len());

    for node in nodes {
        let child = |id: &Id| built[usize::from(*id)];
        let handle = match node {
            MathLang::Num(n) => arena.number(n.clone()),
            MathLang::Const(c) => arena.constant(*c),
            MathLang::Symbol(s) => arena.symbol(s.as_str()),
            MathLang::Add([a, b]) => arena.add(child(a), child(b)),
            MathLang::Mul([a, b]) => arena.mul(child(a), child(b)),
            MathLang::Pow([a, b]) => arena.pow(child(a), child(b)),
            MathLang::Sin(a) => arena.apply(Function::Sin, child(a)),
            MathLang::Cos(a) => arena.apply(Function::Cos, child(a)),
            MathLang::Tan(a) => arena.apply(Function::Tan, child(a)),
            MathLang::Asin(a) => arena.apply(Function::Asin, child(a)),
            MathLang::Acos(a) => arena.apply(Function::Acos, child(a)),
            MathLang::Atan(a) => arena.apply(Function::Atan, child(a)),
            MathLang::Exp(a) => arena.apply(Function::Exp, child(a)),
            MathLang::Ln(a) => arena.apply(Function::Ln, child(a)),
            MathLang::Abs(a) => arena.apply(Function::Abs, child(a)),
        };
        built.push(handle);
    }

    built.last().copied()
}
