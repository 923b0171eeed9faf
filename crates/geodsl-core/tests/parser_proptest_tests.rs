//! Property-based tests for literal parsing and argument splitting

#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use geodsl_core::parser::{parse_number, split_arguments};
use geodsl_core::{ExprKind, Number, Parser, Value};
use proptest::prelude::*;

// Strategy for plain identifiers
fn identifier() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9]{0,5}"
}

// Strategy for small argument lists a basic command accepts
fn small_ints() -> impl Strategy<Value = Vec<i64>> {
    prop::collection::vec(-1000i64..1000i64, 1..=10)
}

proptest! {
    #[test]
    fn integer_literals_stay_integers(n in any::<i64>()) {
        prop_assert_eq!(parse_number(&n.to_string()), Some(Number::Int(n)));
    }

    #[test]
    fn float_literals_round_trip(x in -1e9f64..1e9f64) {
        let parsed = parse_number(&format!("{:?}", x)).map(|n| n.as_f64());
        prop_assert_eq!(parsed, Some(x));
    }

    #[test]
    fn identifiers_are_not_numbers(name in identifier()) {
        prop_assert_eq!(parse_number(&name), None);
    }

    #[test]
    fn split_returns_each_flat_argument(names in prop::collection::vec(identifier(), 1..8)) {
        let joined = names.join(", ");
        prop_assert_eq!(split_arguments(&joined), names.iter().map(String::as_str).collect::<Vec<_>>());
    }

    #[test]
    fn nested_commas_never_split(
        pairs in prop::collection::vec((identifier(), identifier()), 1..6)
    ) {
        let pieces: Vec<String> = pairs
            .iter()
            .map(|(a, b)| format!("F({}, [{}, {}])", a, b, a))
            .collect();
        let joined = pieces.join(",");
        prop_assert_eq!(split_arguments(&joined), pieces.iter().map(String::as_str).collect::<Vec<_>>());
    }

    #[test]
    fn command_arguments_parse_in_order(values in small_ints()) {
        let text = format!(
            "Sum({})",
            values.iter().map(i64::to_string).collect::<Vec<_>>().join(", ")
        );

        let node = Parser::new().parse(&text).unwrap();

        prop_assert_eq!(node.kind, ExprKind::Command);
        prop_assert_eq!(node.arguments(), values.iter().map(|v| Value::int(*v)).collect::<Vec<_>>());
    }

    #[test]
    fn sum_of_small_integers_is_exact(values in small_ints()) {
        let mut algebra = common::quiet_processor();
        let text = format!(
            "Sum({})",
            values.iter().map(i64::to_string).collect::<Vec<_>>().join(", ")
        );

        let result = algebra.process_algebra_command(&text).unwrap();

        prop_assert_eq!(result, vec![common::int_record(values.iter().sum())]);
    }
}
