//! Algebra processor: the top-level entry point of the engine
//!
//! ## Logging Ownership
//!
//! This module owns lifecycle logging for `process_algebra_command`,
//! `evaluate_expression`, `validate_expression` and `redefine_element`:
//! - `log_op_start!` at entry
//! - `log_op_end!` on success
//! - `log_op_error!` on failure
//!
//! Every evaluation gets a fresh `EvalId`, logged as `eval_id` and attached
//! to the error record when the call fails.

use std::sync::Arc;
use std::time::Instant;

use geodsl_core_types::EvalId;

use crate::commands::{sub_command_set_name, Category, CommandId};
use crate::construction::Construction;
use crate::errors::{CommandError, GeoDslError, Result};
use crate::eval_info::EvalInfo;
use crate::filters::{ArgumentFilter, CommandFilter, FilterChain, FilterId};
use crate::kernel::Kernel;
use crate::parser::ExprNode;
use crate::processor::CommandProcessor;
use crate::validator::ExpressionValidator;
use crate::value::{Descriptor, Value};
use crate::{log_op_end, log_op_error, log_op_start};

/// Predicate over a parsed expression, checked before evaluation
pub type InputFilter = dyn Fn(&ExprNode) -> bool + Send + Sync;

/// Predicate over a non-empty result, checked after evaluation
pub type OutputFilter = dyn Fn(&[Descriptor]) -> bool + Send + Sync;

/// Collects errors swallowed by `process_algebra_command`
#[derive(Debug, Clone, Default)]
pub struct ErrorHandler {
    silent: bool,
    errors: Vec<String>,
    last: Option<CommandError>,
}

impl ErrorHandler {
    pub fn new(silent: bool) -> Self {
        Self {
            silent,
            ..Self::default()
        }
    }

    pub fn is_silent(&self) -> bool {
        self.silent
    }

    pub fn set_silent(&mut self, silent: bool) {
        self.silent = silent;
    }

    /// Record `error`, prefixed with `context` when one is given
    pub fn handle_error(&mut self, error: CommandError, context: &str) {
        let rendered = if context.is_empty() {
            error.to_string()
        } else {
            format!("{}: {}", context, error)
        };

        if !self.silent {
            tracing::warn!(err_code = error.code(), error = %rendered, "command failed");
        }
        self.errors.push(rendered);
        self.last = Some(error);
    }

    pub fn get_errors(&self) -> Vec<String> {
        self.errors.clone()
    }

    /// Structured record of the most recent error
    pub fn last_error(&self) -> Option<&CommandError> {
        self.last.as_ref()
    }

    pub fn clear_errors(&mut self) {
        self.errors.clear();
        self.last = None;
    }
}

pub struct AlgebraProcessor {
    kernel: Kernel,
    error_handler: ErrorHandler,
    input_filters: FilterChain<InputFilter>,
    output_filters: FilterChain<OutputFilter>,
    autocreate_sliders: bool,
}

impl Default for AlgebraProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl AlgebraProcessor {
    pub fn new() -> Self {
        Self::with_kernel(Kernel::new())
    }

    pub fn with_kernel(kernel: Kernel) -> Self {
        Self {
            kernel,
            error_handler: ErrorHandler::default(),
            input_filters: FilterChain::new(),
            output_filters: FilterChain::new(),
            autocreate_sliders: false,
        }
    }

    /// Evaluate one line, recording any error instead of returning it
    ///
    /// Labels are recorded and may be redefined. On failure the error is
    /// handed to the [`ErrorHandler`] and `None` is returned.
    pub fn process_algebra_command(&mut self, text: &str) -> Option<Vec<Descriptor>> {
        let eval_id = EvalId::new();
        log_op_start!("process_algebra_command", eval_id = %eval_id, input = text);
        let start = Instant::now();

        let info = EvalInfo::new(true, true).with_sliders(self.autocreate_sliders);
        match self.evaluate_text(text, info, None) {
            Ok(result) => {
                log_op_end!(
                    "process_algebra_command",
                    duration_ms = start.elapsed().as_millis() as u64,
                    eval_id = %eval_id,
                    result_len = result.len()
                );
                Some(result)
            }
            Err(err) => {
                log_op_error!(
                    "process_algebra_command",
                    err.clone(),
                    duration_ms = start.elapsed().as_millis() as u64,
                    eval_id = %eval_id
                );
                let record = CommandError::from(err).with_eval_id(eval_id);
                self.error_handler.handle_error(record, text);
                None
            }
        }
    }

    /// Same pipeline as [`process_algebra_command`](Self::process_algebra_command)
    /// but errors propagate to the caller
    ///
    /// `callback` receives the result after the output filters passed.
    ///
    /// # Errors
    ///
    /// - `InvalidInput` for empty or malformed text, or a veto by an input or
    ///   output filter
    /// - any dispatch or evaluation error
    pub fn process_algebra_command_no_exception_handling(
        &mut self,
        text: &str,
        autocreate_sliders: bool,
        callback: Option<&mut dyn FnMut(&[Descriptor])>,
    ) -> Result<Vec<Descriptor>> {
        let info = EvalInfo::new(true, true).with_sliders(autocreate_sliders);
        self.evaluate_text(text, info, callback)
    }

    /// Evaluate without recording labels
    ///
    /// # Errors
    ///
    /// Same as `process_algebra_command_no_exception_handling`.
    pub fn evaluate_expression(&mut self, text: &str) -> Result<Vec<Descriptor>> {
        let eval_id = EvalId::new();
        log_op_start!("evaluate_expression", eval_id = %eval_id, input = text);
        let start = Instant::now();

        let info = EvalInfo::new(false, true);
        let result = self.evaluate_text(text, info, None).map_err(|e| {
            log_op_error!(
                "evaluate_expression",
                e.clone(),
                duration_ms = start.elapsed().as_millis() as u64,
                eval_id = %eval_id
            );
            e
        })?;

        log_op_end!(
            "evaluate_expression",
            duration_ms = start.elapsed().as_millis() as u64,
            eval_id = %eval_id,
            result_len = result.len()
        );
        Ok(result)
    }

    /// Problems found in `text` without evaluating it
    ///
    /// A parse failure is reported as its single problem.
    pub fn validate_expression(&self, text: &str) -> Vec<String> {
        log_op_start!("validate_expression", input = text);
        let start = Instant::now();

        let problems = match self.kernel.parser().parse(text) {
            Ok(node) => ExpressionValidator::new(self.kernel.parser()).validate(&node),
            Err(e) => vec![e.to_string()],
        };

        log_op_end!(
            "validate_expression",
            duration_ms = start.elapsed().as_millis() as u64,
            problems = problems.len()
        );
        problems
    }

    /// Re-evaluate `text` and rebind the result to an existing `label`
    ///
    /// # Errors
    ///
    /// - `UndefinedVariable` if `label` is not bound
    /// - `NameUsed` if `redefine_independent` is false
    /// - any error from evaluating `text`
    ///
    /// While label creation is suppressed the result is returned but the
    /// label keeps its old binding.
    pub fn redefine_element(
        &mut self,
        label: &str,
        text: &str,
        redefine_independent: bool,
    ) -> Result<Vec<Descriptor>> {
        let eval_id = EvalId::new();
        log_op_start!("redefine_element", eval_id = %eval_id, label = label, input = text);
        let start = Instant::now();

        let result = self
            .redefine_element_impl(label, text, redefine_independent)
            .map_err(|e| {
                log_op_error!(
                    "redefine_element",
                    e.clone(),
                    duration_ms = start.elapsed().as_millis() as u64,
                    eval_id = %eval_id
                );
                e
            })?;

        log_op_end!(
            "redefine_element",
            duration_ms = start.elapsed().as_millis() as u64,
            eval_id = %eval_id,
            result_len = result.len()
        );
        Ok(result)
    }

    fn redefine_element_impl(
        &mut self,
        label: &str,
        text: &str,
        redefine_independent: bool,
    ) -> Result<Vec<Descriptor>> {
        if self.kernel.construction().is_free_label(label) {
            return Err(GeoDslError::UndefinedVariable {
                name: label.to_string(),
            });
        }
        if !redefine_independent {
            return Err(GeoDslError::NameUsed {
                label: label.to_string(),
            });
        }

        let info = EvalInfo::new(false, true).with_sliders(true);
        let result = self.evaluate_text(text, info, None)?;
        self.kernel.record(label, &result, info.with_labels(true))?;
        Ok(result)
    }

    fn evaluate_text(
        &mut self,
        text: &str,
        info: EvalInfo,
        callback: Option<&mut dyn FnMut(&[Descriptor])>,
    ) -> Result<Vec<Descriptor>> {
        if text.trim().is_empty() {
            return Err(GeoDslError::invalid_input("Empty command"));
        }

        let node = self.kernel.parser().parse(text)?;
        if !self.input_filters.iter().all(|allow| allow(&node)) {
            return Err(GeoDslError::invalid_input(
                "Expression not allowed by input filters",
            ));
        }

        // Labels are bound only once the output filters accepted the result
        let result = self
            .kernel
            .process_valid_expression(&node, info.with_labels(false))?;

        if !result.is_empty() && !self.output_filters.iter().all(|allow| allow(&result)) {
            return Err(GeoDslError::invalid_input(
                "Result not allowed by output filters",
            ));
        }
        self.kernel.bind_labels(&node, &result, info)?;

        if let Some(callback) = callback {
            callback(&result);
        }
        Ok(result)
    }

    // ---- filters ----

    pub fn add_input_filter<F>(&mut self, filter: F) -> FilterId
    where
        F: Fn(&ExprNode) -> bool + Send + Sync + 'static,
    {
        self.input_filters.add(Box::new(filter))
    }

    pub fn remove_input_filter(&mut self, id: FilterId) -> bool {
        self.input_filters.remove(id)
    }

    pub fn add_output_filter<F>(&mut self, filter: F) -> FilterId
    where
        F: Fn(&[Descriptor]) -> bool + Send + Sync + 'static,
    {
        self.output_filters.add(Box::new(filter))
    }

    pub fn remove_output_filter(&mut self, id: FilterId) -> bool {
        self.output_filters.remove(id)
    }

    pub fn add_command_filter(&mut self, filter: Box<dyn CommandFilter>) -> FilterId {
        self.kernel.dispatcher_mut().add_command_filter(filter)
    }

    pub fn remove_command_filter(&mut self, id: FilterId) -> bool {
        self.kernel.dispatcher_mut().remove_command_filter(id)
    }

    pub fn add_argument_filter(&mut self, filter: Box<dyn ArgumentFilter>) -> FilterId {
        self.kernel.dispatcher_mut().add_argument_filter(filter)
    }

    pub fn remove_argument_filter(&mut self, id: FilterId) -> bool {
        self.kernel.dispatcher_mut().remove_argument_filter(id)
    }

    // ---- dispatch and catalog ----

    /// # Errors
    ///
    /// See [`CommandDispatcher::process_command`](crate::dispatcher::CommandDispatcher::process_command).
    pub fn process_command(
        &self,
        name: &str,
        arguments: &[Value],
        info: EvalInfo,
    ) -> Result<Vec<Descriptor>> {
        self.kernel.dispatcher().process_command(name, arguments, info)
    }

    /// # Errors
    ///
    /// Same as `process_command`.
    pub fn simplify_command(
        &self,
        name: &str,
        arguments: &[Value],
        info: EvalInfo,
    ) -> Result<Vec<Descriptor>> {
        self.kernel.dispatcher().simplify_command(name, arguments, info)
    }

    pub fn register_processor(&mut self, name: &str, processor: Arc<dyn CommandProcessor>) {
        self.kernel.dispatcher_mut().register_processor(name, processor);
    }

    pub fn is_command_available(&self, name: &str) -> bool {
        self.kernel.dispatcher().is_command_available(name)
    }

    pub fn get_sub_command_set_name(&self, category: Category) -> &'static str {
        sub_command_set_name(category)
    }

    pub fn get_command_syntax(&self, name: &str) -> Option<String> {
        CommandId::from_name(name).map(|c| c.syntax())
    }

    /// Command names, optionally restricted to one category
    pub fn list_available_commands(&self, category: Option<Category>) -> Vec<&'static str> {
        CommandId::ALL
            .iter()
            .filter(|c| category.map_or(true, |cat| c.category() == cat))
            .map(|c| c.name())
            .collect()
    }

    /// Category tag names
    pub fn get_command_categories(&self) -> Vec<&'static str> {
        Category::ALL.iter().map(|c| c.tag()).collect()
    }

    // ---- construction ----

    pub fn get_element(&self, label: &str) -> Option<&[Descriptor]> {
        self.kernel.lookup_label(label)
    }

    /// # Errors
    ///
    /// See [`Construction::add_element`].
    pub fn add_element(&mut self, label: &str, result: Vec<Descriptor>) -> Result<()> {
        self.kernel.add_element(label, result)
    }

    pub fn remove_element(&mut self, label: &str) -> bool {
        self.kernel.construction_mut().remove_element(label)
    }

    /// Snapshot of every binding, in insertion order
    pub fn get_all_elements(&self) -> Vec<(String, Vec<Descriptor>)> {
        self.kernel
            .construction()
            .iter()
            .map(|(label, result)| (label.to_string(), result.to_vec()))
            .collect()
    }

    /// Empty the construction and the parser's variable table
    pub fn clear_construction(&mut self) {
        self.kernel.construction_mut().clear();
        self.kernel.parser_mut().clear_variables();
    }

    pub fn set_variable(&mut self, name: &str, value: Value) {
        self.kernel.parser_mut().set_variable(name, value);
    }

    pub fn construction(&self) -> &Construction {
        self.kernel.construction()
    }

    pub fn kernel(&self) -> &Kernel {
        &self.kernel
    }

    pub fn kernel_mut(&mut self) -> &mut Kernel {
        &mut self.kernel
    }

    // ---- settings ----

    pub fn error_handler(&self) -> &ErrorHandler {
        &self.error_handler
    }

    pub fn error_handler_mut(&mut self) -> &mut ErrorHandler {
        &mut self.error_handler
    }

    pub fn set_error_handler(&mut self, handler: ErrorHandler) {
        self.error_handler = handler;
    }

    /// Slider setting used by `process_algebra_command`
    pub fn set_autocreate_sliders(&mut self, autocreate_sliders: bool) {
        self.autocreate_sliders = autocreate_sliders;
    }

    pub fn autocreate_sliders(&self) -> bool {
        self.autocreate_sliders
    }
}
