#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use std::sync::Arc;

use geodsl_core::filters::{ArgumentCountFilter, CategoryGateFilter, ExamModeFilter};
use geodsl_core::{
    Category, CommandDispatcher, CommandId, Descriptor, ErrorKind, EvalInfo, GeoDslError,
    MacroDefinition, MacroProcessor, Value,
};

fn ints(values: &[i64]) -> Vec<Value> {
    values.iter().copied().map(Value::int).collect()
}

#[test]
fn test_unknown_command_from_lookup_and_dispatch() {
    let dispatcher = CommandDispatcher::new();
    let err = dispatcher
        .process_command("UnknownCommand", &ints(&[1, 2]), EvalInfo::default())
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnknownCommand);
    assert_eq!(err.command(), Some("UnknownCommand"));
}

#[test]
fn test_arity_filter_two_to_three() {
    let mut dispatcher = CommandDispatcher::new();
    dispatcher.add_argument_filter(Box::new(ArgumentCountFilter::new(2, Some(3))));

    for rejected in [&[1][..], &[1, 2, 3, 4][..]] {
        let err = dispatcher
            .process_command("Sum", &ints(rejected), EvalInfo::default())
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::IllegalArgumentNumber);
    }

    assert_eq!(
        dispatcher
            .process_command("Sum", &ints(&[1, 2]), EvalInfo::default())
            .unwrap(),
        vec![common::int_record(3)]
    );
    assert_eq!(
        dispatcher
            .process_command("Sum", &ints(&[1, 2, 3]), EvalInfo::default())
            .unwrap(),
        vec![common::int_record(6)]
    );
}

#[test]
fn test_command_filters_are_anded() {
    let mut dispatcher = CommandDispatcher::new();
    let exam = dispatcher.add_command_filter(Box::new(ExamModeFilter::new([
        CommandId::Point,
        CommandId::Gcd,
    ])));
    dispatcher.add_command_filter(Box::new(CategoryGateFilter::new(Category::Algebra, false)));

    assert!(dispatcher
        .process_command("Point", &ints(&[1, 2]), EvalInfo::default())
        .is_ok());
    let err = dispatcher
        .process_command("GCD", &ints(&[4, 6]), EvalInfo::default())
        .unwrap_err();
    assert_eq!(
        err,
        GeoDslError::CommandNotAllowed {
            command: "GCD".into()
        }
    );

    assert!(dispatcher.remove_command_filter(exam));
    let outcome = dispatcher
        .process_command("Line", &ints(&[1, 2]), EvalInfo::default())
        .map(|r| r.len());
    assert_eq!(outcome, Ok(1));
}

#[test]
fn test_registered_macro_processor_serves_unrouted_category() {
    let mut dispatcher = CommandDispatcher::new();
    assert!(!dispatcher.is_command_available("Circle"));

    let mut macros = MacroProcessor::new();
    macros.add_macro(
        "Circle",
        MacroDefinition::dynamic(|args, _| match args {
            [center, radius] => Ok(vec![Descriptor::Circle {
                center: center.clone(),
                radius: radius.clone(),
            }]),
            _ => Err(GeoDslError::illegal_argument("Circle", args)),
        }),
    );
    dispatcher.register_processor("Circle", Arc::new(macros));

    assert!(dispatcher.is_command_available("Circle"));
    let out = dispatcher
        .process_command("Circle", &[Value::text("A"), Value::int(2)], EvalInfo::default())
        .unwrap();
    assert_eq!(out[0].type_name(), "Circle");
}

#[test]
fn test_not_implemented_for_routed_command_without_semantics() {
    let dispatcher = CommandDispatcher::new();
    let err = dispatcher
        .process_command("Polygon", &[Value::text("A"), Value::text("B")], EvalInfo::default())
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotImplemented);
}
