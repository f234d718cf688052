//! Exponential and logarithmic simplification rules.

use egg::rewrite;

use super::MathRewrite;

/// Returns exponential and logarithmic rewrite rules.
#[must_use]
pub fn rules() -> Vec<MathRewrite> {
    vec![
        // exp(ln(x)) = x
        rewrite!("exp-ln"; "(exp (ln ?x))" => "?x"),

        // ln(exp(x)) = x
        rewrite!("ln-exp"; "(ln (exp ?x))" => "?x"),

        // ln(x^n) = n*ln(x)
        rewrite!("ln-pow"; "(ln (^ ?x ?n))" => "(* ?n (ln ?x))"),

        // exp(a) * exp(b) = exp(a + b)
        rewrite!("exp-add-fold"; "(* (exp ?a) (exp ?b))" => "(exp (+ ?a ?b))"),

        // exp(a)^n = exp(n * a)
        rewrite!("exp-pow"; "(^ (exp ?a) ?n)" => "(exp (* ?n ?a))"),

        // exp(n * ln(x)) = x^n
        rewrite!("exp-mul-ln"; "(exp (* ?n (ln ?x)))" => "(^ ?x ?n)"),
    ]
}
