//! Kernel: owns the parser, the dispatcher and the construction, and
//! evaluates parsed expressions against them

use crate::construction::Construction;
use crate::dispatcher::CommandDispatcher;
use crate::errors::{GeoDslError, Result};
use crate::eval_info::EvalInfo;
use crate::parser::{ExprKind, ExprNode, Parser};
use crate::value::{Descriptor, Value};

#[derive(Default)]
pub struct Kernel {
    parser: Parser,
    dispatcher: CommandDispatcher,
    construction: Construction,
}

impl Kernel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn parser(&self) -> &Parser {
        &self.parser
    }

    pub fn parser_mut(&mut self) -> &mut Parser {
        &mut self.parser
    }

    pub fn dispatcher(&self) -> &CommandDispatcher {
        &self.dispatcher
    }

    pub fn dispatcher_mut(&mut self) -> &mut CommandDispatcher {
        &mut self.dispatcher
    }

    pub fn construction(&self) -> &Construction {
        &self.construction
    }

    pub fn construction_mut(&mut self) -> &mut Construction {
        &mut self.construction
    }

    pub fn lookup_label(&self, label: &str) -> Option<&[Descriptor]> {
        self.construction.get_element(label)
    }

    /// # Errors
    ///
    /// See [`Construction::add_element`].
    pub fn add_element(&mut self, label: &str, result: Vec<Descriptor>) -> Result<()> {
        self.construction.add_element(label, result)
    }

    /// Evaluate a parsed expression
    ///
    /// # Errors
    ///
    /// - `NameUsed` when a label is already bound and `info` disallows
    ///   redefinition
    /// - dispatcher errors for command nodes
    /// - `InvalidInput` for identifiers and malformed nodes
    pub fn process_valid_expression(
        &mut self,
        node: &ExprNode,
        info: EvalInfo,
    ) -> Result<Vec<Descriptor>> {
        match node.kind {
            ExprKind::Command => self.process_command_node(node, info),
            ExprKind::Assignment => self.process_assignment(node, info),
            _ => process_simple_expression(node),
        }
    }

    fn process_command_node(&mut self, node: &ExprNode, info: EvalInfo) -> Result<Vec<Descriptor>> {
        let name = node
            .command_name()
            .ok_or_else(|| GeoDslError::invalid_input("Command node without a name"))?;

        if let Some(label) = &node.label {
            self.check_redefinition(label, info)?;
        }

        let result = self
            .dispatcher
            .process_command(name, &node.arguments(), info)?;

        if let Some(label) = &node.label {
            self.record(label, &result, info)?;
        }
        Ok(result)
    }

    fn process_assignment(&mut self, node: &ExprNode, info: EvalInfo) -> Result<Vec<Descriptor>> {
        let (label, rhs) = match (&node.label, node.assigned_expr()) {
            (Some(label), Some(rhs)) => (label, rhs),
            _ => return Err(GeoDslError::invalid_input("Malformed assignment")),
        };

        self.check_redefinition(label, info)?;
        let result = self.process_valid_expression(rhs, info)?;
        self.record(label, &result, info)?;
        Ok(result)
    }

    fn check_redefinition(&self, label: &str, info: EvalInfo) -> Result<()> {
        if !info.allow_redefinition && !self.construction.is_free_label(label) {
            return Err(GeoDslError::NameUsed {
                label: label.to_string(),
            });
        }
        Ok(())
    }

    /// Bind every label carried by `node` to `result`, innermost first
    ///
    /// Used to record labels after an evaluation that ran with label output
    /// disabled. Honors `label_output` and label suppression like evaluation.
    ///
    /// # Errors
    ///
    /// See [`Construction::add_element`].
    pub fn bind_labels(
        &mut self,
        node: &ExprNode,
        result: &[Descriptor],
        info: EvalInfo,
    ) -> Result<()> {
        if let Some(rhs) = node.assigned_expr() {
            self.bind_labels(rhs, result, info)?;
        }
        match &node.label {
            Some(label) => self.record(label, result, info),
            None => Ok(()),
        }
    }

    /// Bind `label` to `result` unless label output is disabled or suppressed
    ///
    /// # Errors
    ///
    /// See [`Construction::add_element`].
    pub fn record(&mut self, label: &str, result: &[Descriptor], info: EvalInfo) -> Result<()> {
        if !info.label_output || self.construction.is_suppress_labels_active() {
            tracing::trace!(label, "label output disabled, not recording");
            return Ok(());
        }
        tracing::debug!(label, "binding label");
        self.construction.add_element(label, result.to_vec())
    }
}

/// Number, point, list and variable nodes map to a single record
fn process_simple_expression(node: &ExprNode) -> Result<Vec<Descriptor>> {
    let value = node.value.as_ref();
    let record = match (node.kind, value) {
        (ExprKind::Number, Some(v @ Value::Number(_)))
        | (ExprKind::Point, Some(v @ Value::Point(_)))
        | (ExprKind::List, Some(v @ Value::List(_)))
        | (ExprKind::Variable, Some(v)) => Descriptor::from_value(v)?,
        (ExprKind::Point, Some(Value::Text(text))) => {
            return Err(GeoDslError::invalid_input(format!("Invalid point: {}", text)))
        }
        (ExprKind::Identifier, Some(Value::Text(name))) => {
            return Err(GeoDslError::invalid_input(format!(
                "Unsupported expression type: identifier '{}'",
                name
            )))
        }
        (kind, _) => {
            return Err(GeoDslError::invalid_input(format!(
                "Unsupported expression type: {}",
                kind
            )))
        }
    };
    Ok(vec![record])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Number;

    fn eval(kernel: &mut Kernel, text: &str, info: EvalInfo) -> Result<Vec<Descriptor>> {
        let node = kernel.parser().parse(text)?;
        kernel.process_valid_expression(&node, info)
    }

    #[test]
    fn test_kernel_fields_exist_from_construction() {
        let kernel = Kernel::new();
        assert!(kernel.dispatcher().is_command_available("Point"));
        assert!(kernel.construction().is_empty());
    }

    #[test]
    fn test_labeled_command_records_result() {
        let mut kernel = Kernel::new();
        let out = eval(&mut kernel, "A = Point(1, 2)", EvalInfo::default()).unwrap();
        assert_eq!(kernel.lookup_label("A"), Some(out.as_slice()));
    }

    #[test]
    fn test_label_output_disabled_skips_recording() {
        let mut kernel = Kernel::new();
        eval(&mut kernel, "A = Point(1, 2)", EvalInfo::default().with_labels(false)).unwrap();
        eval(&mut kernel, "b = 5", EvalInfo::default().with_labels(false)).unwrap();
        assert!(kernel.construction().is_empty());
    }

    #[test]
    fn test_suppressed_labels_are_not_recorded() {
        let mut kernel = Kernel::new();
        kernel.construction_mut().set_suppress_label_creation(true);
        eval(&mut kernel, "A = Point(1, 2)", EvalInfo::default()).unwrap();
        assert!(kernel.lookup_label("A").is_none());
    }

    #[test]
    fn test_redefinition_requires_permission() {
        let mut kernel = Kernel::new();
        eval(&mut kernel, "a = 1", EvalInfo::default()).unwrap();

        let err = eval(&mut kernel, "a = 2", EvalInfo::default()).unwrap_err();
        assert!(matches!(err, GeoDslError::NameUsed { .. }));
        let err = eval(&mut kernel, "a = Sum(1, 2)", EvalInfo::default()).unwrap_err();
        assert!(matches!(err, GeoDslError::NameUsed { .. }));

        eval(&mut kernel, "a = 2", EvalInfo::default().with_redefinition(true)).unwrap();
        assert_eq!(
            kernel.lookup_label("a"),
            Some(
                &[Descriptor::Number {
                    value: Number::Int(2)
                }][..]
            )
        );
    }

    #[test]
    fn test_bind_labels_records_chained_labels() {
        let mut kernel = Kernel::new();
        let node = kernel.parser().parse("A = B = Point(1, 2)").unwrap();
        let out = kernel
            .process_valid_expression(&node, EvalInfo::default().with_labels(false))
            .unwrap();
        assert!(kernel.construction().is_empty());

        kernel.bind_labels(&node, &out, EvalInfo::default()).unwrap();

        let labels: Vec<&str> = kernel.construction().labels().collect();
        assert_eq!(labels, vec!["B", "A"]);
    }

    #[test]
    fn test_simple_expressions() {
        let mut kernel = Kernel::new();
        kernel.parser_mut().set_variable("r", Value::float(2.5));

        let out = eval(&mut kernel, "r", EvalInfo::default()).unwrap();
        assert_eq!(
            out,
            vec![Descriptor::Number {
                value: Number::Float(2.5)
            }]
        );
        assert_eq!(
            eval(&mut kernel, "[1, 2]", EvalInfo::default()).unwrap()[0].type_name(),
            "List"
        );

        let err = eval(&mut kernel, "unbound", EvalInfo::default()).unwrap_err();
        assert!(matches!(err, GeoDslError::InvalidInput { .. }));
        let err = eval(&mut kernel, "(1,2,3,4)", EvalInfo::default()).unwrap_err();
        assert!(matches!(err, GeoDslError::InvalidInput { .. }));
    }
}
