//! The main simplification engine.
//!
//! This module provides the high-level API for simplifying arena
//! expressions using equality saturation.

use std::time::Duration;

use egg::{CostFunction, Extractor, RecExpr, Runner};
use serde::{Deserialize, Serialize};
use stepwise_core::{ExprArena, ExprHandle};
use tracing::debug;

use crate::convert::{from_rec_expr, to_rec_expr};
use crate::cost::AstSizeCost;
use crate::language::{ConstantFold, MathLang};
use crate::rules::{self, MathRewrite};

const fn default_iter_limit() -> usize {
    10
}

const fn default_node_limit() -> usize {
    10_000
}

const fn default_time_limit_ms() -> u64 {
    500
}

/// Configuration for the simplification engine.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct SimplifierConfig {
    /// Maximum number of iterations.
    #[serde(default = "default_iter_limit")]
    pub iter_limit: usize,
    /// Maximum number of nodes in the e-graph.
    #[serde(default = "default_node_limit")]
    pub node_limit: usize,
    /// Time limit in milliseconds.
    #[serde(default = "default_time_limit_ms")]
    pub time_limit_ms: u64,
}

impl Default for SimplifierConfig {
    fn default() -> Self {
        Self {
            iter_limit: default_iter_limit(),
            node_limit: default_node_limit(),
            time_limit_ms: default_time_limit_ms(),
        }
    }
}

/// The main simplification engine.
///
/// Holds only the configuration and the rule set, both immutable, so one
/// instance serves every request.
#[derive(Clone)]
pub struct Simplifier {
    /// Configuration.
    config: SimplifierConfig,
    /// Rewrite rules.
    rules: Vec<MathRewrite>,
}

impl Default for Simplifier {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Simplifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Simplifier")
            .field("config", &self.config)
            .field("rules", &self.rules.len())
            .finish()
    }
}

impl Simplifier {
    /// Creates a new simplifier with default rules.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(SimplifierConfig::default())
    }

    /// Creates a simplifier with custom configuration.
    #[must_use]
    pub fn with_config(config: SimplifierConfig) -> Self {
        Self {
            config,
            rules: rules::all_rules(),
        }
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &SimplifierConfig {
        &self.config
    }

    /// Simplifies an expression in place in the arena.
    ///
    /// Returns the input handle unchanged when the expression contains
    /// nodes the e-graph does not model, or when the cheapest extracted term
    /// is not strictly smaller than the input.
    pub fn simplify(&self, arena: &mut ExprArena, expr: ExprHandle) -> ExprHandle {
        self.simplify_with_stats(arena, expr).0
    }

    /// Simplifies and returns both the result and statistics.
    ///
    /// Statistics are `None` when saturation was not attempted.
    pub fn simplify_with_stats(
        &self,
        arena: &mut ExprArena,
        expr: ExprHandle,
    ) -> (ExprHandle, Option<SimplificationStats>) {
        let Some(start) = to_rec_expr(arena, expr) else {
            debug!("expression has unsupported nodes, skipping saturation");
            return (expr, None);
        };

        let (best, stats) = self.saturate(&start);
        debug!(
            iterations = stats.iterations,
            nodes = stats.egraph_nodes,
            classes = stats.egraph_classes,
            stop_reason = %stats.stop_reason,
            input_cost = stats.input_cost,
            best_cost = stats.best_cost,
            "saturation finished"
        );

        if stats.best_cost >= stats.input_cost {
            return (expr, Some(stats));
        }
        let result = from_rec_expr(arena, &best).unwrap_or(expr);
        (result, Some(stats))
    }

    fn saturate(&self, start: &RecExpr<MathLang>) -> (RecExpr<MathLang>, SimplificationStats) {
        let runner: Runner<MathLang, ConstantFold> = Runner::default()
            .with_expr(start)
            .with_iter_limit(self.config.iter_limit)
            .with_node_limit(self.config.node_limit)
            .with_time_limit(Duration::from_millis(self.config.time_limit_ms))
            .run(&self.rules);

        let input_cost = AstSizeCost.cost_rec(start);
        let extractor = Extractor::new(&runner.egraph, AstSizeCost);
        let (best_cost, best) = match runner.roots.first() {
            Some(&root) => extractor.find_best(root),
            None => (input_cost, start.clone()),
        };

        let stats = SimplificationStats {
            iterations: runner.iterations.len(),
            egraph_nodes: runner.egraph.total_number_of_nodes(),
            egraph_classes: runner.egraph.number_of_classes(),
            stop_reason: format!("{:?}", runner.stop_reason),
            input_cost,
            best_cost,
        };
        (best, stats)
    }
}

/// Statistics about the simplification process.
#[derive(Clone, Debug)]
pub struct SimplificationStats {
    /// Number of iterations run.
    pub iterations: usize,
    /// Total nodes in the e-graph.
    pub egraph_nodes: usize,
    /// Number of equivalence classes.
    pub egraph_classes: usize,
    /// Reason the runner stopped.
    pub stop_reason: String,
    /// AST size of the input term.
    pub input_cost: usize,
    /// AST size of the cheapest extracted term.
    pub best_cost: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use stepwise_core::{ExprNode, Function};

    #[test]
    fn test_pythagorean_identity() {
        let simplifier = Simplifier::new();
        let mut arena = ExprArena::new();
        let x = arena.symbol("x");
        let two = arena.integer(2);
        let sin = arena.apply(Function::Sin, x);
        let cos = arena.apply(Function::Cos, x);
        let sin2 = arena.pow(sin, two);
        let cos2 = arena.pow(cos, two);
        let sum = arena.add(sin2, cos2);

        let result = simplifier.simplify(&mut arena, sum);
        assert!(arena.get(result).is_one());
    }

    #[test]
    fn test_factored_identity() {
        let simplifier = Simplifier::new();
        let mut arena = ExprArena::new();
        let x = arena.symbol("x");
        let two = arena.integer(2);
        let sin = arena.apply(Function::Sin, x);
        let cos = arena.apply(Function::Cos, x);
        let sin2 = arena.pow(sin, two);
        let cos2 = arena.pow(cos, two);
        let a = arena.mul(x, sin2);
        let b = arena.mul(x, cos2);
        let sum = arena.add(a, b);

        // x sin^2 x + x cos^2 x = x
        assert_eq!(simplifier.simplify(&mut arena, sum), x);
    }

    #[test]
    fn test_keeps_input_when_nothing_is_cheaper() {
        let simplifier = Simplifier::new();
        let mut arena = ExprArena::new();
        let x = arena.symbol("x");
        let sin = arena.apply(Function::Sin, x);
        let expr = arena.add(x, sin);

        let (result, stats) = simplifier.simplify_with_stats(&mut arena, expr);
        assert_eq!(result, expr);
        let stats = stats.unwrap();
        assert_eq!(stats.best_cost, stats.input_cost);
    }

    #[test]
    fn test_skips_unsupported_nodes() {
        let simplifier = Simplifier::new();
        let mut arena = ExprArena::new();
        let x = arena.symbol("x");
        let integral = arena.integral(x, x, None);

        let (result, stats) = simplifier.simplify_with_stats(&mut arena, integral);
        assert_eq!(result, integral);
        assert!(stats.is_none());
        assert!(matches!(arena.get(result), ExprNode::Integral { .. }));
    }

    #[test]
    fn test_config_defaults() {
        let config = SimplifierConfig::default();
        assert_eq!(config.iter_limit, 10);
        assert_eq!(config.node_limit, 10_000);
        assert_eq!(config.time_limit_ms, 500);
        assert_eq!(Simplifier::with_config(config.clone()).config(), &config);
    }
}
