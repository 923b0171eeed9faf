//! Command and argument filters
//!
//! Filters gate dispatch in two places: command filters decide whether a
//! command may run at all, argument filters inspect the raw argument list and
//! raise on the first problem. Chains are evaluated in insertion order and
//! the first rejection decides.

use std::collections::HashSet;

use crate::commands::{Category, CommandId};
use crate::errors::{GeoDslError, Result};
use crate::value::{Number, Value};

/// Predicate deciding whether a whole command is permitted
pub trait CommandFilter: Send + Sync {
    fn is_command_allowed(&self, command: CommandId) -> bool;
}

/// Check over a command's argument list
pub trait ArgumentFilter: Send + Sync {
    /// # Errors
    ///
    /// Returns the error describing why the argument list is rejected.
    fn check_allowed(&self, command_name: &str, arguments: &[Value]) -> Result<()>;
}

/// Allow-list of commands, as used during exams
///
/// # Example
/// ```
/// use geodsl_core::commands::CommandId;
/// use geodsl_core::filters::{CommandFilter, ExamModeFilter};
///
/// let filter = ExamModeFilter::new([CommandId::Point, CommandId::Line]);
/// assert!(filter.is_command_allowed(CommandId::Point));
/// assert!(!filter.is_command_allowed(CommandId::Derivative));
/// ```
#[derive(Debug, Clone, Default)]
pub struct ExamModeFilter {
    allowed: HashSet<CommandId>,
}

impl ExamModeFilter {
    pub fn new(allowed: impl IntoIterator<Item = CommandId>) -> Self {
        Self {
            allowed: allowed.into_iter().collect(),
        }
    }

    pub fn allow(&mut self, command: CommandId) {
        self.allowed.insert(command);
    }
}

impl CommandFilter for ExamModeFilter {
    fn is_command_allowed(&self, command: CommandId) -> bool {
        self.allowed.contains(&command)
    }
}

/// Denies every command of one category unless the gate is enabled
#[derive(Debug, Clone, Copy)]
pub struct CategoryGateFilter {
    category: Category,
    enabled: bool,
}

impl CategoryGateFilter {
    pub fn new(category: Category, enabled: bool) -> Self {
        Self { category, enabled }
    }

    /// Gate for CAS commands
    pub fn cas(enabled: bool) -> Self {
        Self::new(Category::Cas, enabled)
    }

    pub fn category(&self) -> Category {
        self.category
    }
}

impl CommandFilter for CategoryGateFilter {
    fn is_command_allowed(&self, command: CommandId) -> bool {
        self.enabled || command.category() != self.category
    }
}

/// Passes only when every sub-filter passes
#[derive(Default)]
pub struct CompositeCommandFilter {
    filters: Vec<Box<dyn CommandFilter>>,
}

impl CompositeCommandFilter {
    pub fn new(filters: Vec<Box<dyn CommandFilter>>) -> Self {
        Self { filters }
    }

    pub fn push(&mut self, filter: Box<dyn CommandFilter>) {
        self.filters.push(filter);
    }
}

impl CommandFilter for CompositeCommandFilter {
    fn is_command_allowed(&self, command: CommandId) -> bool {
        self.filters.iter().all(|f| f.is_command_allowed(command))
    }
}

/// Bounds on the number of arguments
///
/// # Example
/// ```
/// use geodsl_core::filters::{ArgumentCountFilter, ArgumentFilter};
/// use geodsl_core::value::Value;
///
/// let filter = ArgumentCountFilter::new(2, Some(3));
/// assert!(filter.check_allowed("Sum", &[Value::int(1)]).is_err());
/// assert!(filter.check_allowed("Sum", &[Value::int(1), Value::int(2)]).is_ok());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ArgumentCountFilter {
    pub min: usize,
    pub max: Option<usize>,
}

impl ArgumentCountFilter {
    pub fn new(min: usize, max: Option<usize>) -> Self {
        Self { min, max }
    }
}

impl ArgumentFilter for ArgumentCountFilter {
    fn check_allowed(&self, command_name: &str, arguments: &[Value]) -> Result<()> {
        check_arg_count(command_name, arguments, self.min, self.max)
    }
}

/// Fails with `ArgumentCount` when `arguments` falls outside `[min, max]`,
/// naming the violated bound as the expected count
pub(crate) fn check_arg_count(
    command_name: &str,
    arguments: &[Value],
    min: usize,
    max: Option<usize>,
) -> Result<()> {
    let actual = arguments.len();
    let violated = if actual < min {
        Some(min)
    } else {
        max.filter(|&max| actual > max)
    };

    match violated {
        Some(expected) => Err(GeoDslError::ArgumentCount {
            command: command_name.to_string(),
            expected,
            actual,
        }),
        None => Ok(()),
    }
}

/// Expected shape of one positional argument
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgType {
    Int,
    Float,
    /// Int or float
    Number,
    Point,
    List,
    Text,
    Expr,
    Any,
}

impl ArgType {
    pub fn matches(&self, value: &Value) -> bool {
        matches!(
            (self, value),
            (ArgType::Any, _)
                | (ArgType::Int, Value::Number(Number::Int(_)))
                | (ArgType::Float, Value::Number(Number::Float(_)))
                | (ArgType::Number, Value::Number(_))
                | (ArgType::Point, Value::Point(_))
                | (ArgType::List, Value::List(_))
                | (ArgType::Text, Value::Text(_))
                | (ArgType::Expr, Value::Expr(_))
        )
    }

    pub fn name(&self) -> &'static str {
        match self {
            ArgType::Int => "int",
            ArgType::Float => "float",
            ArgType::Number => "number",
            ArgType::Point => "point",
            ArgType::List => "list",
            ArgType::Text => "text",
            ArgType::Expr => "expression",
            ArgType::Any => "any",
        }
    }
}

/// Positional type check; arguments beyond the declared types are unchecked
#[derive(Debug, Clone)]
pub struct ArgumentTypeFilter {
    expected: Vec<ArgType>,
}

impl ArgumentTypeFilter {
    pub fn new(expected: Vec<ArgType>) -> Self {
        Self { expected }
    }
}

impl ArgumentFilter for ArgumentTypeFilter {
    fn check_allowed(&self, command_name: &str, arguments: &[Value]) -> Result<()> {
        let mismatch = arguments
            .iter()
            .zip(&self.expected)
            .enumerate()
            .find(|(_, (arg, expected))| !expected.matches(arg));

        match mismatch {
            Some((index, (arg, expected))) => Err(GeoDslError::ArgumentType {
                command: command_name.to_string(),
                index,
                expected: expected.name().to_string(),
                actual: arg.type_name().to_string(),
            }),
            None => Ok(()),
        }
    }
}

/// Runs sub-filters in order, stopping at the first error
#[derive(Default)]
pub struct CompositeArgumentFilter {
    filters: Vec<Box<dyn ArgumentFilter>>,
}

impl CompositeArgumentFilter {
    pub fn new(filters: Vec<Box<dyn ArgumentFilter>>) -> Self {
        Self { filters }
    }

    pub fn push(&mut self, filter: Box<dyn ArgumentFilter>) {
        self.filters.push(filter);
    }
}

impl ArgumentFilter for CompositeArgumentFilter {
    fn check_allowed(&self, command_name: &str, arguments: &[Value]) -> Result<()> {
        self.filters
            .iter()
            .try_for_each(|f| f.check_allowed(command_name, arguments))
    }
}

/// Handle returned when a filter is attached, used to detach it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FilterId(u64);

/// Ordered list of filters addressed by `FilterId`
pub struct FilterChain<F: ?Sized> {
    next_id: u64,
    entries: Vec<(FilterId, Box<F>)>,
}

impl<F: ?Sized> Default for FilterChain<F> {
    fn default() -> Self {
        Self {
            next_id: 0,
            entries: Vec::new(),
        }
    }
}

impl<F: ?Sized> FilterChain<F> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, filter: Box<F>) -> FilterId {
        let id = FilterId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, filter));
        id
    }

    /// Returns `false` when no filter with `id` is attached
    pub fn remove(&mut self, id: FilterId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry_id, _)| *entry_id != id);
        self.entries.len() != before
    }

    /// Filters in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &F> {
        self.entries.iter().map(|(_, f)| f.as_ref())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
