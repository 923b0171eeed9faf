//! Raw argument values and typed result descriptors

use serde::ser::SerializeSeq;
use serde::{Serialize, Serializer};
use std::fmt;

use crate::errors::{GeoDslError, Result};
use crate::parser::ExprNode;

/// Numeric scalar: integers stay integers until an operation needs a float
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    pub fn as_f64(&self) -> f64 {
        match self {
            Number::Int(i) => *i as f64,
            Number::Float(f) => *f,
        }
    }

    /// Addition that keeps integer precision while both sides are integers
    pub fn plus(self, other: Number) -> Number {
        match (self, other) {
            (Number::Int(a), Number::Int(b)) => match a.checked_add(b) {
                Some(sum) => Number::Int(sum),
                None => Number::Float(a as f64 + b as f64),
            },
            (a, b) => Number::Float(a.as_f64() + b.as_f64()),
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Int(i) => write!(f, "{}", i),
            // Debug keeps the trailing ".0" on whole floats
            Number::Float(x) => write!(f, "{:?}", x),
        }
    }
}

/// Coordinates of a 2D or 3D point literal
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coords {
    pub x: f64,
    pub y: f64,
    pub z: Option<f64>,
}

impl Coords {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y, z: None }
    }

    pub fn new_3d(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z: Some(z) }
    }

    pub fn dimension(&self) -> usize {
        if self.z.is_some() {
            3
        } else {
            2
        }
    }
}

impl Serialize for Coords {
    // Serialized as a tuple: [x, y] or [x, y, z]
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.dimension()))?;
        seq.serialize_element(&self.x)?;
        seq.serialize_element(&self.y)?;
        if let Some(z) = self.z {
            seq.serialize_element(&z)?;
        }
        seq.end()
    }
}

impl fmt::Display for Coords {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.z {
            Some(z) => write!(f, "({:?}, {:?}, {:?})", self.x, self.y, z),
            None => write!(f, "({:?}, {:?})", self.x, self.y),
        }
    }
}

/// Raw value carried by an expression node or passed to a processor
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Number(Number),
    Point(Coords),
    List(Vec<Value>),
    Text(String),
    /// Nested command, kept unevaluated
    Expr(Box<ExprNode>),
}

impl Value {
    pub fn int(i: i64) -> Self {
        Value::Number(Number::Int(i))
    }

    pub fn float(f: f64) -> Self {
        Value::Number(Number::Float(f))
    }

    pub fn text(s: impl Into<String>) -> Self {
        Value::Text(s.into())
    }

    pub fn as_number(&self) -> Option<Number> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Short type name used in argument-type errors
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Number(Number::Int(_)) => "int",
            Value::Number(Number::Float(_)) => "float",
            Value::Point(_) => "point",
            Value::List(_) => "list",
            Value::Text(_) => "text",
            Value::Expr(_) => "expression",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => write!(f, "{}", n),
            Value::Point(c) => write!(f, "{}", c),
            Value::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str("]")
            }
            Value::Text(s) => f.write_str(s),
            Value::Expr(node) => write!(f, "{}", node),
        }
    }
}

impl From<Number> for Value {
    fn from(n: Number) -> Self {
        Value::Number(n)
    }
}

impl From<Coords> for Value {
    fn from(c: Coords) -> Self {
        Value::Point(c)
    }
}

/// Typed result record produced by evaluation
///
/// Serialized with a `type` tag, e.g. `{"type": "Point", "x": 1, "y": 2}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum Descriptor {
    Point {
        x: Number,
        y: Number,
        #[serde(skip_serializing_if = "Option::is_none")]
        z: Option<Number>,
    },
    Line {
        point1: Value,
        point2: Value,
    },
    Segment {
        point1: Value,
        point2: Value,
    },
    Circle {
        center: Value,
        radius: Value,
    },
    Intersection {
        obj1: Value,
        obj2: Value,
    },
    Distance {
        obj1: Value,
        obj2: Value,
    },
    Length {
        obj: Value,
    },
    Angle {
        point1: Value,
        vertex: Value,
        point2: Value,
    },
    Midpoint {
        point1: Value,
        point2: Value,
    },
    Number {
        value: Number,
    },
    List {
        items: Vec<Value>,
    },
    Text {
        value: String,
    },
}

impl Descriptor {
    pub fn point(coords: Coords) -> Self {
        Descriptor::Point {
            x: Number::Float(coords.x),
            y: Number::Float(coords.y),
            z: coords.z.map(Number::Float),
        }
    }

    /// Value of the `type` tag
    pub fn type_name(&self) -> &'static str {
        match self {
            Descriptor::Point { .. } => "Point",
            Descriptor::Line { .. } => "Line",
            Descriptor::Segment { .. } => "Segment",
            Descriptor::Circle { .. } => "Circle",
            Descriptor::Intersection { .. } => "Intersection",
            Descriptor::Distance { .. } => "Distance",
            Descriptor::Length { .. } => "Length",
            Descriptor::Angle { .. } => "Angle",
            Descriptor::Midpoint { .. } => "Midpoint",
            Descriptor::Number { .. } => "Number",
            Descriptor::List { .. } => "List",
            Descriptor::Text { .. } => "Text",
        }
    }

    /// Record describing a literal or bound value
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for a nested expression, which has no literal
    /// record of its own.
    pub fn from_value(value: &Value) -> Result<Self> {
        match value {
            Value::Number(n) => Ok(Descriptor::Number { value: *n }),
            Value::Point(c) => Ok(Descriptor::point(*c)),
            Value::List(items) => Ok(Descriptor::List {
                items: items.clone(),
            }),
            Value::Text(s) => Ok(Descriptor::Text { value: s.clone() }),
            Value::Expr(node) => Err(GeoDslError::invalid_input(format!(
                "Unsupported expression type: {}",
                node.kind
            ))),
        }
    }
}
