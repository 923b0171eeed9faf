//! Command dispatcher
//!
//! Routes a command name and its raw arguments through the registry, the
//! command filters, the processor table and the argument filters, then
//! invokes the processor.

use std::collections::HashMap;
use std::sync::Arc;

use crate::commands::{Category, CommandId};
use crate::errors::{GeoDslError, Result};
use crate::eval_info::EvalInfo;
use crate::filters::{ArgumentFilter, CommandFilter, FilterChain, FilterId};
use crate::processor::{BasicCommandProcessor, CommandProcessor};
use crate::value::{Descriptor, Value};

/// Categories routed to the basic processor at construction time
const BASIC_CATEGORIES: [Category; 3] = [Category::Geometry, Category::Statistics, Category::Algebra];

pub struct CommandDispatcher {
    command_table: HashMap<String, Arc<dyn CommandProcessor>>,
    command_filters: FilterChain<dyn CommandFilter>,
    argument_filters: FilterChain<dyn ArgumentFilter>,
}

impl Default for CommandDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandDispatcher {
    pub fn new() -> Self {
        let basic: Arc<dyn CommandProcessor> = Arc::new(BasicCommandProcessor::new());
        let command_table = CommandId::ALL
            .iter()
            .filter(|c| BASIC_CATEGORIES.contains(&c.category()))
            .map(|c| (c.name().to_string(), Arc::clone(&basic)))
            .collect();

        Self {
            command_table,
            command_filters: FilterChain::new(),
            argument_filters: FilterChain::new(),
        }
    }

    /// Evaluate `name` with `arguments`
    ///
    /// # Errors
    ///
    /// - `UnknownCommand` if the name is not registered or has no processor
    /// - `CommandNotAllowed` if a command filter rejects it
    /// - the first argument filter error, unchanged
    /// - whatever the processor raises
    pub fn process_command(
        &self,
        name: &str,
        arguments: &[Value],
        info: EvalInfo,
    ) -> Result<Vec<Descriptor>> {
        let command = CommandId::from_name(name).ok_or_else(|| GeoDslError::UnknownCommand {
            command: name.to_string(),
        })?;

        if !self.is_allowed_by_command_filters(command) {
            tracing::debug!(command = name, "rejected by command filter");
            return Err(GeoDslError::CommandNotAllowed {
                command: name.to_string(),
            });
        }

        let processor = self
            .get_processor(name)
            .ok_or_else(|| GeoDslError::UnknownCommand {
                command: name.to_string(),
            })?;

        self.check_allowed_by_argument_filters(name, arguments)?;

        tracing::trace!(command = name, argc = arguments.len(), "dispatching");
        processor.process(command, arguments, info)
    }

    /// Alias of [`process_command`](Self::process_command)
    ///
    /// # Errors
    ///
    /// Same as `process_command`.
    pub fn simplify_command(
        &self,
        name: &str,
        arguments: &[Value],
        info: EvalInfo,
    ) -> Result<Vec<Descriptor>> {
        self.process_command(name, arguments, info)
    }

    /// Install or replace the processor for one command name
    pub fn register_processor(
        &mut self,
        name: impl Into<String>,
        processor: Arc<dyn CommandProcessor>,
    ) {
        self.command_table.insert(name.into(), processor);
    }

    pub fn get_processor(&self, name: &str) -> Option<Arc<dyn CommandProcessor>> {
        self.command_table.get(name).cloned()
    }

    /// Whether a processor is installed for `name`
    pub fn is_command_available(&self, name: &str) -> bool {
        self.command_table.contains_key(name)
    }

    pub fn add_command_filter(&mut self, filter: Box<dyn CommandFilter>) -> FilterId {
        self.command_filters.add(filter)
    }

    pub fn remove_command_filter(&mut self, id: FilterId) -> bool {
        self.command_filters.remove(id)
    }

    pub fn add_argument_filter(&mut self, filter: Box<dyn ArgumentFilter>) -> FilterId {
        self.argument_filters.add(filter)
    }

    pub fn remove_argument_filter(&mut self, id: FilterId) -> bool {
        self.argument_filters.remove(id)
    }

    pub fn is_allowed_by_command_filters(&self, command: CommandId) -> bool {
        self.command_filters
            .iter()
            .all(|f| f.is_command_allowed(command))
    }

    /// # Errors
    ///
    /// Returns the first error raised by an argument filter.
    pub fn check_allowed_by_argument_filters(&self, name: &str, arguments: &[Value]) -> Result<()> {
        self.argument_filters
            .iter()
            .try_for_each(|f| f.check_allowed(name, arguments))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::{ArgumentCountFilter, ExamModeFilter};
    use crate::value::Number;

    fn ints(values: &[i64]) -> Vec<Value> {
        values.iter().copied().map(Value::int).collect()
    }

    #[test]
    fn test_basic_categories_have_processors() {
        let dispatcher = CommandDispatcher::new();
        assert!(dispatcher.is_command_available("Point"));
        assert!(dispatcher.is_command_available("Sum"));
        assert!(dispatcher.is_command_available("GCD"));
        assert!(!dispatcher.is_command_available("Circle"));
        assert!(!dispatcher.is_command_available("Sort"));
    }

    #[test]
    fn test_unknown_name_and_missing_processor_are_unknown_command() {
        let dispatcher = CommandDispatcher::new();
        let err = dispatcher
            .process_command("Nope", &ints(&[1]), EvalInfo::default())
            .unwrap_err();
        assert!(matches!(err, GeoDslError::UnknownCommand { .. }));

        let err = dispatcher
            .process_command("Sort", &ints(&[1]), EvalInfo::default())
            .unwrap_err();
        assert!(matches!(err, GeoDslError::UnknownCommand { .. }));
    }

    #[test]
    fn test_command_filter_runs_before_processor_lookup() {
        let mut dispatcher = CommandDispatcher::new();
        dispatcher.add_command_filter(Box::new(ExamModeFilter::new([CommandId::Point])));

        // Sort has no processor, but the filter answers first
        let err = dispatcher
            .process_command("Sort", &ints(&[1]), EvalInfo::default())
            .unwrap_err();
        assert_eq!(err.to_string(), "Command 'Sort' is not allowed");
    }

    #[test]
    fn test_argument_filter_add_and_remove() {
        let mut dispatcher = CommandDispatcher::new();
        let id = dispatcher.add_argument_filter(Box::new(ArgumentCountFilter::new(2, Some(3))));

        assert!(dispatcher
            .process_command("Sum", &ints(&[1]), EvalInfo::default())
            .is_err());

        assert!(dispatcher.remove_argument_filter(id));
        let out = dispatcher
            .simplify_command("Sum", &ints(&[1]), EvalInfo::default())
            .unwrap();
        assert_eq!(
            out,
            vec![Descriptor::Number {
                value: Number::Int(1)
            }]
        );
    }
}
