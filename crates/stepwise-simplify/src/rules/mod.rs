//! Simplification rules organized by category.

pub mod arithmetic;
pub mod exp_log;
pub mod trig;

use egg::Rewrite;

use crate::language::{ConstantFold, MathLang};

/// A rewrite over the simplifier's language and analysis.
pub type MathRewrite = Rewrite<MathLang, ConstantFold>;

/// Collects all simplification rules.
#[must_use]
pub fn all_rules() -> Vec<MathRewrite> {
    let mut rules = Vec::new();
    rules.extend(arithmetic::rules());
    rules.extend(trig::rules());
    rules.extend(exp_log::rules());
    rules
}

#[cfg(test)]
pub(crate) fn simplest(rules: &[MathRewrite], start: &str) -> String {
    use crate::cost::AstSizeCost;
    use egg::{Extractor, Runner};

    let start = start.parse().unwrap();
    let runner: Runner<MathLang, ConstantFold> = Runner::default()
        .with_expr(&start)
        .with_iter_limit(10)
        .with_node_limit(10_000)
        .run(rules);
    let extractor = Extractor::new(&runner.egraph, AstSizeCost);
    let (_, best) = extractor.find_best(runner.roots[0]);
    best.to_string()
}
