//! Property-based tests for the polynomial solver.

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use crate::solve;
    use stepwise_core::{ExprArena, ExprHandle, Rational};

    /// Builds `x^2 - (r + s) x + r s = 0`.
    fn monic_quadratic(arena: &mut ExprArena, r: i64, s: i64) -> ExprHandle {
        let x = arena.symbol("x");
        let two = arena.integer(2);
        let square = arena.pow(x, two);
        let b = arena.integer(-(r + s));
        let linear = arena.mul(b, x);
        let c = arena.integer(r * s);
        let lhs = arena.add_many([square, linear, c]);
        let zero = arena.integer(0);
        arena.equality(lhs, zero)
    }

    proptest! {
        #[test]
        fn linear_root_is_exact(a in prop_oneof![-50i64..0, 1i64..50], b in -50i64..50) {
            let mut arena = ExprArena::new();
            let x = arena.symbol("x");
            let a_h = arena.integer(a);
            let b_h = arena.integer(b);
            let ax = arena.mul(a_h, x);
            let lhs = arena.add(ax, b_h);
            let zero = arena.integer(0);
            let equation = arena.equality(lhs, zero);

            let roots = solve(&mut arena, equation).unwrap();
            let expected = arena.number(Rational::from_i64(-b, a));
            prop_assert_eq!(roots, vec![expected]);
        }

        #[test]
        fn integer_roots_are_sorted(r in -12i64..12, s in -12i64..12) {
            let mut arena = ExprArena::new();
            let equation = monic_quadratic(&mut arena, r, s);

            let roots = solve(&mut arena, equation).unwrap();
            let mut expected: Vec<i64> = vec![r.min(s), r.max(s)];
            expected.dedup();
            let expected: Vec<ExprHandle> = expected.into_iter().map(|v| arena.integer(v)).collect();
            prop_assert_eq!(roots, expected);
        }
    }
}
