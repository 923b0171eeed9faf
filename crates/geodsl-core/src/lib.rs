//! GeoDSL Core - command-language engine for geometry/algebra constructions
//!
//! This crate turns free-text commands such as `A = Point(1, 2)` or
//! `Sum(1, 2, 3)` into typed descriptor records, including:
//! - A parser producing typed expression trees
//! - The static command registry and its categories
//! - Command-level and argument-level filter chains
//! - Per-command processors and the dispatcher that routes to them
//! - The kernel owning the labeled construction graph
//! - The `AlgebraProcessor` façade with input/output filters and error capture

pub mod algebra;
pub mod commands;
pub mod construction;
pub mod dispatcher;
pub mod errors;
pub mod eval_info;
pub mod filters;
pub mod kernel;
pub mod logging_facility;
pub mod parser;
pub mod processor;
pub mod profile;
pub mod validator;
pub mod value;

#[doc(hidden)]
pub use geodsl_core_types::schema;

// Re-export commonly used types
pub use algebra::{AlgebraProcessor, ErrorHandler};
pub use commands::{Category, CommandId};
pub use construction::Construction;
pub use dispatcher::CommandDispatcher;
pub use errors::{CommandError, ErrorKind, GeoDslError, Result};
pub use eval_info::{EvalInfo, SymbolicMode};
pub use filters::{
    ArgType, ArgumentCountFilter, ArgumentFilter, ArgumentTypeFilter, CategoryGateFilter,
    CommandFilter, CompositeArgumentFilter, CompositeCommandFilter, ExamModeFilter, FilterChain,
    FilterId,
};
pub use kernel::Kernel;
pub use parser::{ExprKind, ExprNode, Parser};
pub use processor::{BasicCommandProcessor, CommandProcessor, MacroDefinition, MacroProcessor};
pub use profile::SessionProfile;
pub use validator::ExpressionValidator;
pub use value::{Coords, Descriptor, Number, Value};
