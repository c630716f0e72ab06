//! Property-based tests for parameter expressions.
//!
//! Random expression trees over two symbols are checked for agreement
//! between substitution, evaluation and constant folding.

use proptest::prelude::*;
use rydra_ir::eval::{bindings, evaluate, substitute};
use rydra_ir::{IrError, ParameterExpression};

/// Generate a random expression over the symbols `a` and `b`.
///
/// Division is left out so that every tree evaluates for finite inputs.
fn arb_expr() -> impl Strategy<Value = ParameterExpression> {
    let leaf = prop_oneof![
        (-10.0_f64..10.0).prop_map(ParameterExpression::constant),
        Just(ParameterExpression::symbol("a")),
        Just(ParameterExpression::symbol("b")),
        Just(ParameterExpression::pi()),
    ];
    leaf.prop_recursive(4, 24, 2, |inner| {
        prop_oneof![
            (inner.clone(), inner.clone()).prop_map(|(x, y)| x + y),
            (inner.clone(), inner.clone()).prop_map(|(x, y)| x - y),
            (inner.clone(), inner.clone()).prop_map(|(x, y)| x * y),
            inner.clone().prop_map(|x| -x),
            inner.clone().prop_map(|x| x.sin()),
            inner.prop_map(|x| x.cos()),
        ]
    })
}

proptest! {
    #[test]
    fn substitution_matches_evaluation(expr in arb_expr(), a in -3.0_f64..3.0, b in -3.0_f64..3.0) {
        let values = bindings([("a", a), ("b", b)]);
        let direct = evaluate(&expr, &values);
        let bound = substitute(&substitute(&expr, "a", a), "b", b);

        prop_assert!(!bound.is_symbolic());
        match direct {
            Ok(v) => {
                let folded = bound.as_f64().unwrap();
                prop_assert!((v - folded).abs() <= 1e-9 * (1.0 + v.abs()));
            }
            Err(IrError::NonFinite(_)) => prop_assert!(bound.as_f64().is_none()),
            Err(e) => prop_assert!(false, "unexpected error: {e}"),
        }
    }

    #[test]
    fn substitution_removes_symbol(expr in arb_expr(), a in -3.0_f64..3.0) {
        let bound = substitute(&expr, "a", a);
        prop_assert!(!bound.symbols().contains("a"));
        let mut expected = expr.symbols();
        expected.remove("a");
        prop_assert_eq!(bound.symbols(), expected);
    }

    #[test]
    fn zero_test_agrees_with_folding(expr in arb_expr()) {
        match expr.is_zero() {
            None => prop_assert!(expr.is_symbolic() || expr.as_f64().is_none()),
            Some(zero) => prop_assert_eq!(zero, expr.as_f64() == Some(0.0)),
        }
    }

    #[test]
    fn simplify_preserves_value(expr in arb_expr(), a in -3.0_f64..3.0, b in -3.0_f64..3.0) {
        let values = bindings([("a", a), ("b", b)]);
        if let (Ok(x), Ok(y)) = (evaluate(&expr, &values), evaluate(&expr.simplify(), &values)) {
            prop_assert!((x - y).abs() <= 1e-9 * (1.0 + x.abs()));
        }
    }
}
