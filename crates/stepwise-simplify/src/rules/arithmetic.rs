//! Basic algebraic simplification rules.
//!
//! Subtraction and division do not exist in the language: `a - b` is
//! `(+ a (* -1 b))` and `a / b` is `(* a (^ b -1))`.

use egg::rewrite;

use super::MathRewrite;

/// Returns basic arithmetic rewrite rules.
#[must_use]
pub fn rules() -> Vec<MathRewrite> {
    vec![
        // Identities
        rewrite!("add-zero"; "(+ ?a 0)" => "?a"),
        rewrite!("mul-one"; "(* ?a 1)" => "?a"),
        rewrite!("mul-zero"; "(* ?a 0)" => "0"),
        rewrite!("pow-one"; "(^ ?a 1)" => "?a"),
        rewrite!("pow-zero"; "(^ ?a 0)" => "1"),

        // Commutativity
        rewrite!("add-comm"; "(+ ?a ?b)" => "(+ ?b ?a)"),
        rewrite!("mul-comm"; "(* ?a ?b)" => "(* ?b ?a)"),

        // Associativity
        rewrite!("add-assoc-l"; "(+ (+ ?a ?b) ?c)" => "(+ ?a (+ ?b ?c))"),
        rewrite!("add-assoc-r"; "(+ ?a (+ ?b ?c))" => "(+ (+ ?a ?b) ?c)"),
        rewrite!("mul-assoc-l"; "(* (* ?a ?b) ?c)" => "(* ?a (* ?b ?c))"),
        rewrite!("mul-assoc-r"; "(* ?a (* ?b ?c))" => "(* (* ?a ?b) ?c)"),

        // Distributivity and factoring
        rewrite!("distribute"; "(* ?a (+ ?b ?c))" => "(+ (* ?a ?b) (* ?a ?c))"),
        rewrite!("factor"; "(+ (* ?a ?b) (* ?a ?c))" => "(* ?a (+ ?b ?c))"),
        rewrite!("factor-one"; "(+ ?a (* ?a ?c))" => "(* ?a (+ 1 ?c))"),

        // Like terms
        rewrite!("add-same"; "(+ ?a ?a)" => "(* 2 ?a)"),
        rewrite!("cancel"; "(+ ?a (* -1 ?a))" => "0"),

        // Like bases
        rewrite!("mul-same"; "(* ?a ?a)" => "(^ ?a 2)"),
        rewrite!("mul-pow"; "(* (^ ?a ?m) (^ ?a ?n))" => "(^ ?a (+ ?m ?n))"),
        rewrite!("mul-pow-base"; "(* ?a (^ ?a ?n))" => "(^ ?a (+ ?n 1))"),
        rewrite!("pow-mul"; "(^ (* ?a ?b) ?n)" => "(* (^ ?a ?n) (^ ?b ?n))"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::simplest;

    #[test]
    fn test_add_zero() {
        assert_eq!(simplest(&rules(), "(+ x 0)"), "x");
    }

    #[test]
    fn test_mul_zero() {
        assert_eq!(simplest(&rules(), "(* x 0)"), "0");
    }

    #[test]
    fn test_cancel_after_reassociation() {
        assert_eq!(simplest(&rules(), "(+ (+ x y) (* -1 x))"), "y");
    }

    #[test]
    fn test_folds_exponents() {
        assert_eq!(simplest(&rules(), "(* (^ x 2) (^ x -2))"), "1");
    }
}
