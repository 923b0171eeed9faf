//! Expression parser
//!
//! Converts one line of source text into an [`ExprNode`] tree. The grammar is
//! line-oriented: an optional `label =` prefix, then either a command call
//! `Name(arg, ...)` or a simple expression (number, point tuple, list,
//! bound variable, bare identifier).

use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

use crate::errors::{GeoDslError, Result};
use crate::value::{Coords, Number, Value};

/// Kind of a parsed expression node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExprKind {
    Command,
    Assignment,
    Number,
    Point,
    List,
    Variable,
    Identifier,
    Argument,
}

impl fmt::Display for ExprKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ExprKind::Command => "command",
            ExprKind::Assignment => "assignment",
            ExprKind::Number => "number",
            ExprKind::Point => "point",
            ExprKind::List => "list",
            ExprKind::Variable => "variable",
            ExprKind::Identifier => "identifier",
            ExprKind::Argument => "argument",
        };
        f.write_str(name)
    }
}

/// Node of a parsed expression tree
///
/// Only `Command` nodes have children, one `Argument` node per positional
/// argument. An `Assignment` node carries its right-hand side as
/// `Value::Expr`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExprNode {
    pub kind: ExprKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ExprNode>,
}

impl ExprNode {
    pub fn leaf(kind: ExprKind, value: Value) -> Self {
        Self {
            kind,
            value: Some(value),
            label: None,
            children: Vec::new(),
        }
    }

    pub fn command(name: impl Into<String>, arguments: Vec<Value>) -> Self {
        Self {
            kind: ExprKind::Command,
            value: Some(Value::Text(name.into())),
            label: None,
            children: arguments
                .into_iter()
                .map(|arg| ExprNode::leaf(ExprKind::Argument, arg))
                .collect(),
        }
    }

    pub fn assignment(label: impl Into<String>, rhs: ExprNode) -> Self {
        Self {
            kind: ExprKind::Assignment,
            value: Some(Value::Expr(Box::new(rhs))),
            label: Some(label.into()),
            children: Vec::new(),
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Name of the called command, for `Command` nodes
    pub fn command_name(&self) -> Option<&str> {
        match (self.kind, &self.value) {
            (ExprKind::Command, Some(Value::Text(name))) => Some(name),
            _ => None,
        }
    }

    /// Positional argument values of a `Command` node
    pub fn arguments(&self) -> Vec<Value> {
        self.children
            .iter()
            .filter_map(|child| child.value.clone())
            .collect()
    }

    /// Right-hand side of an `Assignment` node
    pub fn assigned_expr(&self) -> Option<&ExprNode> {
        match (self.kind, &self.value) {
            (ExprKind::Assignment, Some(Value::Expr(rhs))) => Some(rhs),
            _ => None,
        }
    }
}

impl fmt::Display for ExprNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(rhs) = self.assigned_expr() {
            return write!(f, "{} = {}", self.label.as_deref().unwrap_or_default(), rhs);
        }
        if let Some(name) = self.command_name() {
            if let Some(label) = &self.label {
                write!(f, "{} = ", label)?;
            }
            let args: Vec<String> = self.arguments().iter().map(|a| a.to_string()).collect();
            return write!(f, "{}({})", name, args.join(", "));
        }
        match &self.value {
            Some(value) => write!(f, "{}", value),
            None => Ok(()),
        }
    }
}

/// Parser with the session's variable table
#[derive(Debug, Clone, Default)]
pub struct Parser {
    variables: HashMap<String, Value>,
}

impl Parser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse one expression
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for empty text, an empty or non-identifier
    /// assignment label, or a command call whose closing parenthesis is missing or not last.
    pub fn parse(&self, text: &str) -> Result<ExprNode> {
        let text = text.trim();
        if text.is_empty() {
            return Err(GeoDslError::invalid_input("Empty input"));
        }

        if let Some(eq) = find_top_level(text, '=') {
            return self.parse_assignment(text, eq);
        }
        if is_command(text) {
            return self.parse_command(text);
        }
        self.parse_simple_expression(text)
    }

    fn parse_assignment(&self, text: &str, eq: usize) -> Result<ExprNode> {
        let label = text[..eq].trim();
        let rhs = text[eq + 1..].trim();
        if label.is_empty() || rhs.is_empty() {
            return Err(GeoDslError::invalid_input(format!(
                "Invalid assignment: {}",
                text
            )));
        }

        if !is_identifier(label) {
            return Err(GeoDslError::invalid_input(format!("Invalid label: {}", label)));
        }

        let node = self.parse(rhs)?;
        tracing::trace!(label, kind = %node.kind, "parsed assignment");
        // A labeled command on the right (`A = B = Point(1, 2)`) keeps its own label
        Ok(match (node.kind, &node.label) {
            (ExprKind::Command, None) => node.with_label(label),
            _ => ExprNode::assignment(label, node),
        })
    }

    fn parse_command(&self, text: &str) -> Result<ExprNode> {
        let open = text
            .find('(')
            .ok_or_else(|| GeoDslError::invalid_input(format!("Invalid command syntax: {}", text)))?;
        let name = text[..open].trim_end();

        let close = matching_paren(text, open).ok_or_else(|| {
            GeoDslError::invalid_input(format!("Unbalanced parentheses: {}", text))
        })?;
        if close != text.len() - 1 {
            return Err(GeoDslError::invalid_input(format!(
                "Invalid command syntax: {}",
                text
            )));
        }

        let arguments = split_arguments(&text[open + 1..close])
            .into_iter()
            .map(|arg| self.parse_argument(arg))
            .collect::<Result<Vec<_>>>()?;

        Ok(ExprNode::command(name, arguments))
    }

    /// Classify one argument: number, point, list, nested command,
    /// bound variable, else text
    fn parse_argument(&self, arg: &str) -> Result<Value> {
        let arg = arg.trim();
        if let Some(n) = parse_number(arg) {
            return Ok(Value::Number(n));
        }
        if is_point_syntax(arg) {
            return Ok(parse_point(arg)
                .map(Value::Point)
                .unwrap_or_else(|| Value::text(arg)));
        }
        if is_list_syntax(arg) {
            return Ok(Value::List(self.parse_list(arg)?));
        }
        if is_command(arg) {
            return Ok(Value::Expr(Box::new(self.parse_command(arg)?)));
        }
        if let Some(bound) = self.variables.get(arg) {
            return Ok(bound.clone());
        }
        Ok(Value::text(arg))
    }

    fn parse_list(&self, text: &str) -> Result<Vec<Value>> {
        let content = text[1..text.len() - 1].trim();
        split_list_items(content)
            .into_iter()
            .map(|item| self.parse_argument(item))
            .collect()
    }

    fn parse_simple_expression(&self, text: &str) -> Result<ExprNode> {
        if let Some(n) = parse_number(text) {
            return Ok(ExprNode::leaf(ExprKind::Number, Value::Number(n)));
        }
        if is_point_syntax(text) {
            // Unparseable tuples keep their source text
            let value = parse_point(text)
                .map(Value::Point)
                .unwrap_or_else(|| Value::text(text));
            return Ok(ExprNode::leaf(ExprKind::Point, value));
        }
        if is_list_syntax(text) {
            return Ok(ExprNode::leaf(
                ExprKind::List,
                Value::List(self.parse_list(text)?),
            ));
        }
        if let Some(bound) = self.variables.get(text) {
            return Ok(ExprNode::leaf(ExprKind::Variable, bound.clone()));
        }
        Ok(ExprNode::leaf(ExprKind::Identifier, Value::text(text)))
    }

    pub fn set_variable(&mut self, name: impl Into<String>, value: Value) {
        self.variables.insert(name.into(), value);
    }

    pub fn get_variable(&self, name: &str) -> Option<&Value> {
        self.variables.get(name)
    }

    pub fn has_variable(&self, name: &str) -> bool {
        self.variables.contains_key(name)
    }

    pub fn clear_variables(&mut self) {
        self.variables.clear();
    }
}

/// Numeric literal: float when it contains a decimal point, otherwise an
/// integer (falling back to float on overflow or exponent form)
pub fn parse_number(text: &str) -> Option<Number> {
    let text = text.trim();
    let unsigned = text
        .strip_prefix(|c: char| c == '+' || c == '-')
        .unwrap_or(text);
    if !unsigned.starts_with(|c: char| c.is_ascii_digit() || c == '.') {
        return None;
    }

    let float: f64 = text.parse().ok()?;
    if text.contains('.') {
        return Some(Number::Float(float));
    }
    Some(
        text.parse::<i64>()
            .map(Number::Int)
            .unwrap_or(Number::Float(float)),
    )
}

pub fn is_point_syntax(text: &str) -> bool {
    text.len() >= 2 && text.starts_with('(') && text.ends_with(')')
}

fn is_list_syntax(text: &str) -> bool {
    text.len() >= 2 && text.starts_with('[') && text.ends_with(']')
}

/// Point tuple with 2 or 3 numeric coordinates
pub fn parse_point(text: &str) -> Option<Coords> {
    if !is_point_syntax(text) {
        return None;
    }
    let coords = text[1..text.len() - 1]
        .split(',')
        .map(|c| parse_number(c).map(|n| n.as_f64()))
        .collect::<Option<Vec<f64>>>()?;

    match coords.as_slice() {
        [x, y] => Some(Coords::new(*x, *y)),
        [x, y, z] => Some(Coords::new_3d(*x, *y, *z)),
        _ => None,
    }
}

/// `[A-Za-z_][A-Za-z0-9_]*`
pub fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// `identifier` followed by optional whitespace and `(`
pub fn is_command(text: &str) -> bool {
    let mut chars = text.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    let rest = chars
        .as_str()
        .trim_start_matches(|c: char| c.is_ascii_alphanumeric() || c == '_');
    rest.trim_start().starts_with('(')
}

/// Split a command's argument text on top-level commas
///
/// Commas nested in parentheses, brackets or quoted strings never split.
/// Pieces are trimmed and empty pieces dropped.
pub fn split_arguments(text: &str) -> Vec<&str> {
    split_top_level(text, true)
}

/// Split list content on top-level commas (no string tracking)
pub fn split_list_items(text: &str) -> Vec<&str> {
    split_top_level(text, false)
}

fn split_top_level(text: &str, track_strings: bool) -> Vec<&str> {
    let mut pieces = Vec::new();
    let mut paren = 0i32;
    let mut bracket = 0i32;
    let mut quote: Option<char> = None;
    let mut start = 0;

    for (i, c) in text.char_indices() {
        if let Some(q) = quote {
            if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '"' | '\'' if track_strings => quote = Some(c),
            '(' => paren += 1,
            ')' => paren -= 1,
            '[' => bracket += 1,
            ']' => bracket -= 1,
            ',' if paren == 0 && bracket == 0 => {
                pieces.push(&text[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    pieces.push(&text[start..]);

    pieces
        .into_iter()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect()
}

/// Byte offset of the first `target` outside parentheses, brackets and quotes
fn find_top_level(text: &str, target: char) -> Option<usize> {
    let mut depth = 0i32;
    let mut quote: Option<char> = None;

    for (i, c) in text.char_indices() {
        if let Some(q) = quote {
            if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '"' | '\'' => quote = Some(c),
            '(' | '[' => depth += 1,
            ')' | ']' => depth -= 1,
            _ if c == target && depth == 0 => return Some(i),
            _ => {}
        }
    }
    None
}

/// Byte offset of the `)` closing the `(` at `open`
fn matching_paren(text: &str, open: usize) -> Option<usize> {
    let mut depth = 0i32;
    let mut quote: Option<char> = None;

    for (i, c) in text[open..].char_indices() {
        if let Some(q) = quote {
            if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '"' | '\'' => quote = Some(c),
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(open + i);
                }
            }
            _ => {}
        }
    }
    None
}
