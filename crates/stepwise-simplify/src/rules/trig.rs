//! Trigonometric simplification rules.

use egg::rewrite;

use super::MathRewrite;

/// Returns trigonometric rewrite rules.
#[must_use]
pub fn rules() -> Vec<MathRewrite> {
    vec![
        // Pythagorean identity: sin²(x) + cos²(x) = 1
        rewrite!("pythag"; "(+ (^ (sin ?x) 2) (^ (cos ?x) 2))" => "1"),
        rewrite!("pythag-r"; "(+ (^ (cos ?x) 2) (^ (sin ?x) 2))" => "1"),
        rewrite!("one-minus-sin"; "(+ 1 (* -1 (^ (sin ?x) 2)))" => "(^ (cos ?x) 2)"),
        rewrite!("one-minus-cos"; "(+ 1 (* -1 (^ (cos ?x) 2)))" => "(^ (sin ?x) 2)"),

        // tan = sin/cos
        rewrite!("tan-def"; "(tan ?x)" => "(* (sin ?x) (^ (cos ?x) -1))"),
        rewrite!("tan-fold"; "(* (sin ?x) (^ (cos ?x) -1))" => "(tan ?x)"),

        // sin(2x) = 2*sin(x)*cos(x)
        rewrite!("sin-double"; "(* 2 (* (sin ?x) (cos ?x)))" => "(sin (* 2 ?x))"),

        // Inverse function compositions
        rewrite!("sin-asin"; "(sin (asin ?x))" => "?x"),
        rewrite!("cos-acos"; "(cos (acos ?x))" => "?x"),
        rewrite!("tan-atan"; "(tan (atan ?x))" => "?x"),
    ]
}
