//! Static checks over a parsed expression tree

use crate::commands::CommandId;
use crate::parser::{ExprKind, ExprNode, Parser};
use crate::value::Value;

/// Reports unknown commands and unbound identifiers without evaluating
pub struct ExpressionValidator<'a> {
    parser: &'a Parser,
}

impl<'a> ExpressionValidator<'a> {
    pub fn new(parser: &'a Parser) -> Self {
        Self { parser }
    }

    /// Collect every problem in `node` and its descendants, in tree order
    pub fn validate(&self, node: &ExprNode) -> Vec<String> {
        let mut problems = Vec::new();
        self.visit(node, &mut problems);
        problems
    }

    fn visit(&self, node: &ExprNode, problems: &mut Vec<String>) {
        match node.kind {
            ExprKind::Command => {
                if let Some(name) = node.command_name() {
                    if CommandId::from_name(name).is_none() {
                        problems.push(format!("Unknown command: {}", name));
                    }
                }
            }
            ExprKind::Identifier => {
                if let Some(Value::Text(name)) = &node.value {
                    if !self.parser.has_variable(name) {
                        problems.push(format!("Undefined variable: {}", name));
                    }
                }
            }
            _ => {}
        }

        // Nested commands live inside values, not children
        if let Some(value) = &node.value {
            self.visit_value(value, problems);
        }
        for child in &node.children {
            self.visit(child, problems);
        }
    }

    fn visit_value(&self, value: &Value, problems: &mut Vec<String>) {
        match value {
            Value::Expr(inner) => self.visit(inner, problems),
            Value::List(items) => items.iter().for_each(|v| self.visit_value(v, problems)),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reports_unknown_command_and_unbound_identifier() {
        let parser = Parser::new();
        let validator = ExpressionValidator::new(&parser);

        let problems = validator.validate(&parser.parse("Foo(1, 2)").unwrap());
        assert_eq!(problems, vec!["Unknown command: Foo".to_string()]);

        let problems = validator.validate(&parser.parse("zeta").unwrap());
        assert_eq!(problems, vec!["Undefined variable: zeta".to_string()]);
    }

    #[test]
    fn test_descends_into_nested_commands_and_assignments() {
        let parser = Parser::new();
        let validator = ExpressionValidator::new(&parser);

        let problems = validator.validate(&parser.parse("Line(Bogus(1), [Nope(2)])").unwrap());
        assert_eq!(
            problems,
            vec![
                "Unknown command: Bogus".to_string(),
                "Unknown command: Nope".to_string()
            ]
        );

        let problems = validator.validate(&parser.parse("x = y").unwrap());
        assert_eq!(problems, vec!["Undefined variable: y".to_string()]);
    }

    #[test]
    fn test_clean_expression_has_no_problems() {
        let mut parser = Parser::new();
        parser.set_variable("r", Value::int(3));
        let validator = ExpressionValidator::new(&parser);

        assert!(validator.validate(&parser.parse("Circle((0,0), r)").unwrap()).is_empty());
        assert!(validator.validate(&parser.parse("r").unwrap()).is_empty());
    }
}
