//! Command processors
//!
//! A processor turns a resolved argument list into descriptor records. The
//! dispatcher owns one processor per command name; several names may share
//! the same processor instance.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::commands::CommandId;
use crate::errors::{GeoDslError, Result};
use crate::eval_info::EvalInfo;
use crate::filters::check_arg_count;
use crate::parser::{parse_number, parse_point, is_point_syntax};
use crate::value::{Descriptor, Number, Value};

/// Per-command evaluation logic
pub trait CommandProcessor: Send + Sync {
    /// # Errors
    ///
    /// Returns an error when the arguments do not fit the command or the
    /// command is not handled by this processor.
    fn process(
        &self,
        command: CommandId,
        arguments: &[Value],
        info: EvalInfo,
    ) -> Result<Vec<Descriptor>>;
}

/// Resolve raw arguments into concrete values
///
/// Text that looks like a point tuple becomes a point, fully numeric text
/// becomes a number, lists resolve element-wise. Nested expressions pass
/// through unevaluated.
pub fn resolve_args(arguments: &[Value]) -> Vec<Value> {
    arguments.iter().map(resolve_arg).collect()
}

fn resolve_arg(arg: &Value) -> Value {
    match arg {
        Value::Text(text) => resolve_text(text),
        Value::List(items) => Value::List(items.iter().map(resolve_arg).collect()),
        other => other.clone(),
    }
}

fn resolve_text(text: &str) -> Value {
    let trimmed = text.trim();
    if is_point_syntax(trimmed) {
        if let Some(coords) = parse_point(trimmed) {
            return Value::Point(coords);
        }
    } else if let Some(n) = parse_number(trimmed) {
        return Value::Number(n);
    }
    Value::text(text)
}

fn all_numbers(command: CommandId, args: &[Value]) -> Result<Vec<Number>> {
    args.iter()
        .map(Value::as_number)
        .collect::<Option<Vec<_>>>()
        .ok_or_else(|| GeoDslError::illegal_argument(command.name(), args))
}

/// Processor for the basic geometry, statistics and algebra commands
#[derive(Debug, Clone, Copy, Default)]
pub struct BasicCommandProcessor;

impl BasicCommandProcessor {
    pub const MIN_ARGS: usize = 1;
    pub const MAX_ARGS: usize = 10;

    pub fn new() -> Self {
        Self
    }

    fn execute(&self, command: CommandId, args: Vec<Value>) -> Result<Vec<Descriptor>> {
        let shape_err = |args: &[Value]| GeoDslError::illegal_argument(command.name(), args);

        let record = match (command, args.as_slice()) {
            (CommandId::Point, [x, y]) => match (x.as_number(), y.as_number()) {
                (Some(x), Some(y)) => Descriptor::Point { x, y, z: None },
                _ => return Err(shape_err(&args)),
            },
            (CommandId::Point, [Value::Point(coords)]) => Descriptor::point(*coords),
            (CommandId::Point, _) => return Err(shape_err(&args)),

            (CommandId::Line, [a, b]) => Descriptor::Line {
                point1: a.clone(),
                point2: b.clone(),
            },
            (CommandId::Segment, [a, b]) => Descriptor::Segment {
                point1: a.clone(),
                point2: b.clone(),
            },
            (CommandId::Circle, [center, radius]) => Descriptor::Circle {
                center: center.clone(),
                radius: radius.clone(),
            },
            (CommandId::Intersect, [a, b]) => Descriptor::Intersection {
                obj1: a.clone(),
                obj2: b.clone(),
            },
            (CommandId::Distance, [a, b]) => Descriptor::Distance {
                obj1: a.clone(),
                obj2: b.clone(),
            },
            (CommandId::Length, [obj]) => Descriptor::Length { obj: obj.clone() },
            (CommandId::Angle, [a, vertex, b]) => Descriptor::Angle {
                point1: a.clone(),
                vertex: vertex.clone(),
                point2: b.clone(),
            },
            (CommandId::Midpoint, [a, b]) => Descriptor::Midpoint {
                point1: a.clone(),
                point2: b.clone(),
            },
            (
                CommandId::Line
                | CommandId::Segment
                | CommandId::Circle
                | CommandId::Intersect
                | CommandId::Distance
                | CommandId::Length
                | CommandId::Angle
                | CommandId::Midpoint,
                _,
            ) => return Err(shape_err(&args)),

            (CommandId::Sum, _) => {
                let numbers = all_numbers(command, &args)?;
                let sum = numbers
                    .into_iter()
                    .fold(Number::Int(0), Number::plus);
                Descriptor::Number { value: sum }
            }
            (CommandId::Mean, _) => {
                let numbers = all_numbers(command, &args)?;
                let total: f64 = numbers.iter().map(Number::as_f64).sum();
                Descriptor::Number {
                    value: Number::Float(total / numbers.len() as f64),
                }
            }

            _ => {
                return Err(GeoDslError::NotImplemented {
                    command: command.name().to_string(),
                })
            }
        };

        Ok(vec![record])
    }
}

impl CommandProcessor for BasicCommandProcessor {
    fn process(
        &self,
        command: CommandId,
        arguments: &[Value],
        _info: EvalInfo,
    ) -> Result<Vec<Descriptor>> {
        check_arg_count(
            command.name(),
            arguments,
            Self::MIN_ARGS,
            Some(Self::MAX_ARGS),
        )?;
        let resolved = resolve_args(arguments);
        tracing::debug!(command = command.name(), argc = resolved.len(), "basic processor");
        self.execute(command, resolved)
    }
}

/// Closure computing a macro's result
pub type MacroFn = dyn Fn(&[Value], EvalInfo) -> Result<Vec<Descriptor>> + Send + Sync;

/// Body of a user-defined macro
#[derive(Clone)]
pub enum MacroDefinition {
    /// Always yields the same records
    Fixed(Vec<Descriptor>),
    Dynamic(Arc<MacroFn>),
}

impl MacroDefinition {
    pub fn dynamic<F>(f: F) -> Self
    where
        F: Fn(&[Value], EvalInfo) -> Result<Vec<Descriptor>> + Send + Sync + 'static,
    {
        MacroDefinition::Dynamic(Arc::new(f))
    }
}

impl fmt::Debug for MacroDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MacroDefinition::Fixed(records) => f.debug_tuple("Fixed").field(records).finish(),
            MacroDefinition::Dynamic(_) => f.write_str("Dynamic(..)"),
        }
    }
}

/// Processor resolving commands to named macros
///
/// Install it for a command with `CommandDispatcher::register_processor`;
/// the macro is looked up by the command's canonical name.
#[derive(Debug, Clone, Default)]
pub struct MacroProcessor {
    macros: HashMap<String, MacroDefinition>,
}

impl MacroProcessor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_macro(&mut self, name: impl Into<String>, definition: MacroDefinition) {
        self.macros.insert(name.into(), definition);
    }

    pub fn remove_macro(&mut self, name: &str) -> Option<MacroDefinition> {
        self.macros.remove(name)
    }

    pub fn has_macro(&self, name: &str) -> bool {
        self.macros.contains_key(name)
    }

    pub fn get_macro(&self, name: &str) -> Option<&MacroDefinition> {
        self.macros.get(name)
    }
}

impl CommandProcessor for MacroProcessor {
    fn process(
        &self,
        command: CommandId,
        arguments: &[Value],
        info: EvalInfo,
    ) -> Result<Vec<Descriptor>> {
        let definition =
            self.get_macro(command.name())
                .ok_or_else(|| GeoDslError::UnknownCommand {
                    command: command.name().to_string(),
                })?;

        match definition {
            MacroDefinition::Fixed(records) => Ok(records.clone()),
            MacroDefinition::Dynamic(f) => f(arguments, info),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Coords;

    fn run(command: CommandId, args: Vec<Value>) -> Result<Vec<Descriptor>> {
        BasicCommandProcessor::new().process(command, &args, EvalInfo::default())
    }

    #[test]
    fn test_resolve_text_arguments() {
        let resolved = resolve_args(&[
            Value::text("(1, 2)"),
            Value::text("-3.5"),
            Value::text("B"),
            Value::text("(a, b)"),
            Value::List(vec![Value::text("4")]),
        ]);
        assert_eq!(
            resolved,
            vec![
                Value::Point(Coords::new(1.0, 2.0)),
                Value::float(-3.5),
                Value::text("B"),
                Value::text("(a, b)"),
                Value::List(vec![Value::int(4)]),
            ]
        );
    }

    #[test]
    fn test_point_shapes() {
        assert_eq!(
            run(CommandId::Point, vec![Value::int(1), Value::int(2)]).unwrap(),
            vec![Descriptor::Point {
                x: Number::Int(1),
                y: Number::Int(2),
                z: None
            }]
        );
        assert_eq!(
            run(CommandId::Point, vec![Value::Point(Coords::new_3d(1.0, 2.0, 3.0))]).unwrap(),
            vec![Descriptor::point(Coords::new_3d(1.0, 2.0, 3.0))]
        );
        let err = run(CommandId::Point, vec![Value::text("A"), Value::int(2)]).unwrap_err();
        assert!(matches!(err, GeoDslError::IllegalArgument { ref command, .. } if command == "Point"));
    }

    #[test]
    fn test_circle_shape() {
        assert_eq!(
            run(CommandId::Circle, vec![Value::text("(0, 0)"), Value::text("2")]).unwrap(),
            vec![Descriptor::Circle {
                center: Value::Point(Coords::new(0.0, 0.0)),
                radius: Value::int(2),
            }]
        );
        let err = run(CommandId::Circle, vec![Value::text("c")]).unwrap_err();
        assert!(matches!(err, GeoDslError::IllegalArgument { ref command, .. } if command == "Circle"));
    }

    #[test]
    fn test_sum_and_mean() {
        let ints: Vec<Value> = (1..=5).map(Value::int).collect();
        assert_eq!(
            run(CommandId::Sum, ints).unwrap(),
            vec![Descriptor::Number {
                value: Number::Int(15)
            }]
        );

        let mean = run(
            CommandId::Mean,
            vec![Value::int(10), Value::int(20), Value::int(30)],
        )
        .unwrap();
        assert_eq!(
            mean,
            vec![Descriptor::Number {
                value: Number::Float(20.0)
            }]
        );

        let err = run(CommandId::Sum, vec![Value::int(1), Value::text("x")]).unwrap_err();
        assert_eq!(
            err,
            GeoDslError::IllegalArgument {
                command: "Sum".into(),
                args: vec!["1".into(), "x".into()],
                message: None,
            }
        );
    }

    #[test]
    fn test_arity_is_checked_before_dispatch() {
        let err = run(CommandId::Polygon, vec![]).unwrap_err();
        assert!(matches!(err, GeoDslError::ArgumentCount { expected: 1, actual: 0, .. }));

        let err = run(CommandId::Sum, (0..11).map(Value::int).collect()).unwrap_err();
        assert!(matches!(err, GeoDslError::ArgumentCount { expected: 10, actual: 11, .. }));
    }

    #[test]
    fn test_unhandled_command_is_not_implemented() {
        let err = run(CommandId::Polygon, vec![Value::text("A")]).unwrap_err();
        assert_eq!(
            err,
            GeoDslError::NotImplemented {
                command: "Polygon".into()
            }
        );
    }

    #[test]
    fn test_macro_processor() {
        let mut macros = MacroProcessor::new();
        macros.add_macro(
            "Text",
            MacroDefinition::Fixed(vec![Descriptor::Text {
                value: "hello".into(),
            }]),
        );
        macros.add_macro(
            "First",
            MacroDefinition::dynamic(|args, _| {
                Descriptor::from_value(&args[0]).map(|d| vec![d])
            }),
        );
        assert!(macros.has_macro("Text"));

        let out = macros
            .process(CommandId::First, &[Value::int(9)], EvalInfo::default())
            .unwrap();
        assert_eq!(
            out,
            vec![Descriptor::Number {
                value: Number::Int(9)
            }]
        );

        assert!(macros.remove_macro("Text").is_some());
        let err = macros
            .process(CommandId::Text, &[], EvalInfo::default())
            .unwrap_err();
        assert!(matches!(err, GeoDslError::UnknownCommand { .. }));
    }
}
