//! Error types: the `GeoDslError` taxonomy and the canonical `CommandError` record

use geodsl_core_types::EvalId;
use thiserror::Error;

/// Result type alias using GeoDslError
pub type Result<T> = std::result::Result<T, GeoDslError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// A flat classification shared by every layer of the engine. Each kind maps
/// to a stable code for programmatic handling and to the short name used when
/// rendering an error record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    UnknownCommand,
    IllegalArgument,
    IllegalArgumentNumber,
    IllegalBoolean,
    IllegalComparison,
    IllegalListOperation,
    IllegalAssignment,
    UnbalancedBrackets,
    CircularDefinition,
    InvalidInput,
    UndefinedVariable,
    NameUsed,
    ChangeDependent,
    NumberExpected,
    FunctionExpected,
    InvalidEquation,
    InvalidFunction,
    /// A registered command whose processor has no implementation for it
    NotImplemented,
}

impl ErrorKind {
    pub const ALL: [ErrorKind; 18] = [
        ErrorKind::UnknownCommand,
        ErrorKind::IllegalArgument,
        ErrorKind::IllegalArgumentNumber,
        ErrorKind::IllegalBoolean,
        ErrorKind::IllegalComparison,
        ErrorKind::IllegalListOperation,
        ErrorKind::IllegalAssignment,
        ErrorKind::UnbalancedBrackets,
        ErrorKind::CircularDefinition,
        ErrorKind::InvalidInput,
        ErrorKind::UndefinedVariable,
        ErrorKind::NameUsed,
        ErrorKind::ChangeDependent,
        ErrorKind::NumberExpected,
        ErrorKind::FunctionExpected,
        ErrorKind::InvalidEquation,
        ErrorKind::InvalidFunction,
        ErrorKind::NotImplemented,
    ];

    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::UnknownCommand => "ERR_UNKNOWN_COMMAND",
            ErrorKind::IllegalArgument => "ERR_ILLEGAL_ARGUMENT",
            ErrorKind::IllegalArgumentNumber => "ERR_ILLEGAL_ARGUMENT_NUMBER",
            ErrorKind::IllegalBoolean => "ERR_ILLEGAL_BOOLEAN",
            ErrorKind::IllegalComparison => "ERR_ILLEGAL_COMPARISON",
            ErrorKind::IllegalListOperation => "ERR_ILLEGAL_LIST_OPERATION",
            ErrorKind::IllegalAssignment => "ERR_ILLEGAL_ASSIGNMENT",
            ErrorKind::UnbalancedBrackets => "ERR_UNBALANCED_BRACKETS",
            ErrorKind::CircularDefinition => "ERR_CIRCULAR_DEFINITION",
            ErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ErrorKind::UndefinedVariable => "ERR_UNDEFINED_VARIABLE",
            ErrorKind::NameUsed => "ERR_NAME_USED",
            ErrorKind::ChangeDependent => "ERR_CHANGE_DEPENDENT",
            ErrorKind::NumberExpected => "ERR_NUMBER_EXPECTED",
            ErrorKind::FunctionExpected => "ERR_FUNCTION_EXPECTED",
            ErrorKind::InvalidEquation => "ERR_INVALID_EQUATION",
            ErrorKind::InvalidFunction => "ERR_INVALID_FUNCTION",
            ErrorKind::NotImplemented => "ERR_NOT_IMPLEMENTED",
        }
    }

    /// Short name used as the prefix of rendered error messages
    pub fn name(&self) -> &'static str {
        match self {
            ErrorKind::UnknownCommand => "UnknownCommand",
            ErrorKind::IllegalArgument => "IllegalArgument",
            ErrorKind::IllegalArgumentNumber => "IllegalArgumentNumber",
            ErrorKind::IllegalBoolean => "IllegalBoolean",
            ErrorKind::IllegalComparison => "IllegalComparison",
            ErrorKind::IllegalListOperation => "IllegalListOperation",
            ErrorKind::IllegalAssignment => "IllegalAssignment",
            ErrorKind::UnbalancedBrackets => "UnbalancedBrackets",
            ErrorKind::CircularDefinition => "CircularDefinition",
            ErrorKind::InvalidInput => "InvalidInput",
            ErrorKind::UndefinedVariable => "UndefinedVariable",
            ErrorKind::NameUsed => "NameUsed",
            ErrorKind::ChangeDependent => "ChangeDependent",
            ErrorKind::NumberExpected => "NumberExpected",
            ErrorKind::FunctionExpected => "FunctionExpected",
            ErrorKind::InvalidEquation => "InvalidEquation",
            ErrorKind::InvalidFunction => "InvalidFunction",
            ErrorKind::NotImplemented => "NotImplemented",
        }
    }
}

/// Canonical structured error record
///
/// Carries the kind plus whatever context the raising layer had: the command
/// being processed, a free-text message, and the offending arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct CommandError {
    kind: ErrorKind,
    command: Option<String>,
    message: Option<String>,
    args: Vec<String>,
    eval_id: Option<EvalId>,
}

impl CommandError {
    /// Create a new error with the specified kind
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            command: None,
            message: None,
            args: Vec::new(),
            eval_id: None,
        }
    }

    /// Add the originating command name
    pub fn with_command(mut self, command: impl Into<String>) -> Self {
        self.command = Some(command.into());
        self
    }

    /// Add a custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Add representations of the offending arguments
    pub fn with_args(mut self, args: Vec<String>) -> Self {
        self.args = args;
        self
    }

    /// Tie the error to the evaluation that produced it
    pub fn with_eval_id(mut self, eval_id: EvalId) -> Self {
        self.eval_id = Some(eval_id);
        self
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn command(&self) -> Option<&str> {
        self.command.as_deref()
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub fn eval_id(&self) -> Option<&EvalId> {
        self.eval_id.as_ref()
    }
}

impl std::fmt::Display for CommandError {
    // message, else "Kind: command", else "Kind: a, b", else "Kind"
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(message) = &self.message {
            return f.write_str(message);
        }
        if let Some(command) = &self.command {
            return write!(f, "{}: {}", self.kind.name(), command);
        }
        if !self.args.is_empty() {
            return write!(f, "{}: {}", self.kind.name(), self.args.join(", "));
        }
        f.write_str(self.kind.name())
    }
}

impl std::error::Error for CommandError {}

// ========== End Error Facility ==========

/// Error taxonomy for engine operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeoDslError {
    /// Command name is not in the registry, or has no processor
    #[error("UnknownCommand: {command}")]
    UnknownCommand { command: String },

    /// A command filter rejected the command
    #[error("Command '{command}' is not allowed")]
    CommandNotAllowed { command: String },

    /// Argument list does not fit the shape the command expects
    #[error("IllegalArgument: {command}")]
    IllegalArgument {
        command: String,
        args: Vec<String>,
        message: Option<String>,
    },

    /// Argument count outside the declared bounds
    #[error("Expected {expected} arguments, got {actual}")]
    ArgumentCount {
        command: String,
        expected: usize,
        actual: usize,
    },

    /// Positional argument of the wrong type
    #[error("Argument {index} expected {expected}, got {actual}")]
    ArgumentType {
        command: String,
        index: usize,
        expected: String,
        actual: String,
    },

    /// Registered command that the selected processor does not implement
    #[error("Command {command} not implemented")]
    NotImplemented { command: String },

    /// Label is already bound and redefinition is not permitted
    #[error("Label '{label}' already in use")]
    NameUsed { label: String },

    /// Malformed or rejected input
    #[error("{message}")]
    InvalidInput { message: String },

    /// Reference to a label or variable that is not bound
    #[error("Undefined variable: {name}")]
    UndefinedVariable { name: String },

    /// Definition refers back to itself
    #[error("{message}")]
    CircularDefinition { message: String },

    /// Session profile could not be read or applied
    #[error("Invalid session profile: {reason}")]
    Profile { reason: String },
}

impl GeoDslError {
    /// Shorthand for an `InvalidInput` error
    pub fn invalid_input(message: impl Into<String>) -> Self {
        GeoDslError::InvalidInput {
            message: message.into(),
        }
    }

    /// Shorthand for a shape mismatch on `command` with the offending arguments
    pub fn illegal_argument<T: std::fmt::Display>(command: &str, args: &[T]) -> Self {
        GeoDslError::IllegalArgument {
            command: command.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
            message: None,
        }
    }

    /// Kind of the canonical error this converts into
    pub fn kind(&self) -> ErrorKind {
        match self {
            GeoDslError::UnknownCommand { .. } => ErrorKind::UnknownCommand,
            GeoDslError::CommandNotAllowed { .. }
            | GeoDslError::IllegalArgument { .. }
            | GeoDslError::ArgumentType { .. } => ErrorKind::IllegalArgument,
            GeoDslError::ArgumentCount { .. } => ErrorKind::IllegalArgumentNumber,
            GeoDslError::NotImplemented { .. } => ErrorKind::NotImplemented,
            GeoDslError::NameUsed { .. } => ErrorKind::NameUsed,
            GeoDslError::InvalidInput { .. } | GeoDslError::Profile { .. } => {
                ErrorKind::InvalidInput
            }
            GeoDslError::UndefinedVariable { .. } => ErrorKind::UndefinedVariable,
            GeoDslError::CircularDefinition { .. } => ErrorKind::CircularDefinition,
        }
    }

    /// Command the error names, if any
    pub fn command(&self) -> Option<&str> {
        match self {
            GeoDslError::UnknownCommand { command }
            | GeoDslError::CommandNotAllowed { command }
            | GeoDslError::IllegalArgument { command, .. }
            | GeoDslError::ArgumentCount { command, .. }
            | GeoDslError::ArgumentType { command, .. }
            | GeoDslError::NotImplemented { command } => Some(command),
            _ => None,
        }
    }
}

impl From<GeoDslError> for CommandError {
    fn from(err: GeoDslError) -> Self {
        let kind = err.kind();
        match err {
            GeoDslError::UnknownCommand { command } => CommandError::new(kind).with_command(command),

            GeoDslError::CommandNotAllowed { command } => CommandError::new(kind)
                .with_message(format!("Command '{}' is not allowed", command))
                .with_command(command),

            GeoDslError::IllegalArgument {
                command,
                args,
                message,
            } => {
                let err = CommandError::new(kind).with_command(command).with_args(args);
                match message {
                    Some(m) => err.with_message(m),
                    None => err,
                }
            }

            GeoDslError::ArgumentCount {
                command,
                expected,
                actual,
            } => CommandError::new(kind)
                .with_command(command)
                .with_message(format!("Expected {} arguments, got {}", expected, actual)),

            GeoDslError::ArgumentType {
                command,
                index,
                expected,
                actual,
            } => CommandError::new(kind)
                .with_command(command)
                .with_args(vec![actual.clone()])
                .with_message(format!(
                    "Argument {} expected {}, got {}",
                    index, expected, actual
                )),

            GeoDslError::NotImplemented { command } => CommandError::new(kind)
                .with_message(format!("Command {} not implemented", command))
                .with_command(command),

            GeoDslError::NameUsed { label } => CommandError::new(kind)
                .with_message(format!("Label '{}' already in use", label))
                .with_command(label),

            GeoDslError::InvalidInput { message } => CommandError::new(kind).with_message(message),

            GeoDslError::UndefinedVariable { name } => CommandError::new(kind)
                .with_message(format!("Undefined variable: {}", name))
                .with_args(vec![name]),

            GeoDslError::CircularDefinition { message } => {
                CommandError::new(kind).with_message(message)
            }

            GeoDslError::Profile { reason } => CommandError::new(kind)
                .with_message(format!("Invalid session profile: {}", reason)),
        }
    }
}

impl From<serde_json::Error> for GeoDslError {
    fn from(err: serde_json::Error) -> Self {
        GeoDslError::Profile {
            reason: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for GeoDslError {
    fn from(err: toml::de::Error) -> Self {
        GeoDslError::Profile {
            reason: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_codes_are_unique() {
        let codes: HashSet<_> = ErrorKind::ALL.iter().map(|k| k.code()).collect();
        assert_eq!(codes.len(), ErrorKind::ALL.len());
    }

    #[test]
    fn test_render_prefers_message() {
        let err = CommandError::new(ErrorKind::IllegalArgument)
            .with_command("Point")
            .with_message("bad point")
            .with_args(vec!["x".into()]);
        assert_eq!(err.to_string(), "bad point");
    }

    #[test]
    fn test_render_falls_back_to_command_then_args_then_kind() {
        let with_command = CommandError::new(ErrorKind::UnknownCommand).with_command("Foo");
        assert_eq!(with_command.to_string(), "UnknownCommand: Foo");

        let with_args =
            CommandError::new(ErrorKind::IllegalArgument).with_args(vec!["1".into(), "a".into()]);
        assert_eq!(with_args.to_string(), "IllegalArgument: 1, a");

        let bare = CommandError::new(ErrorKind::InvalidEquation);
        assert_eq!(bare.to_string(), "InvalidEquation");
    }

    #[test]
    fn test_not_implemented_is_distinct_from_unknown_command() {
        let err = GeoDslError::NotImplemented {
            command: "Polygon".into(),
        };
        assert_ne!(err.kind(), ErrorKind::UnknownCommand);
        let record: CommandError = err.into();
        assert_eq!(record.code(), "ERR_NOT_IMPLEMENTED");
        assert_eq!(record.command(), Some("Polygon"));
    }

    #[test]
    fn test_command_accessor() {
        let err = GeoDslError::ArgumentCount {
            command: "Sum".into(),
            expected: 2,
            actual: 1,
        };
        assert_eq!(err.command(), Some("Sum"));
        assert_eq!(GeoDslError::invalid_input("x").command(), None);
    }
}
