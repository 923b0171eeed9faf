//! Boundary logging macros
//!
//! Every event carries `component`, `op` and `event`; end events add
//! `duration_ms`, error events add `err_kind` and `err_code`.

/// Log the start of an operation
///
/// # Example
///
/// ```
/// # use geodsl_core::log_op_start;
/// log_op_start!("evaluate_expression");
/// log_op_start!("evaluate_expression", input = "Point(1, 2)");
/// ```
#[macro_export]
macro_rules! log_op_start {
    ($op:expr) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::schema::EVENT_START,
        );
    };
    ($op:expr, $($field:tt)*) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::schema::EVENT_START,
            $($field)*
        );
    };
}

/// Log the successful end of an operation
///
/// # Example
///
/// ```
/// # use geodsl_core::log_op_end;
/// log_op_end!("evaluate_expression", duration_ms = 3);
/// ```
#[macro_export]
macro_rules! log_op_end {
    ($op:expr, duration_ms = $duration:expr) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::schema::EVENT_END,
            duration_ms = $duration,
        );
    };
    ($op:expr, duration_ms = $duration:expr, $($field:tt)*) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::schema::EVENT_END,
            duration_ms = $duration,
            $($field)*
        );
    };
}

/// Log a failed operation
///
/// `$err` is anything convertible into a `CommandError`.
///
/// # Example
///
/// ```
/// # use geodsl_core::{log_op_error, errors::GeoDslError};
/// let err = GeoDslError::UnknownCommand { command: "Foo".to_string() };
/// log_op_error!("evaluate_expression", err, duration_ms = 1);
/// ```
#[macro_export]
macro_rules! log_op_error {
    ($op:expr, $err:expr, duration_ms = $duration:expr) => {{
        let record: $crate::errors::CommandError = $err.into();
        tracing::error!(
            component = module_path!(),
            op = $op,
            event = $crate::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err_kind = record.kind().name(),
            err_code = record.code(),
        );
    }};
    ($op:expr, $err:expr, duration_ms = $duration:expr, $($field:tt)*) => {{
        let record: $crate::errors::CommandError = $err.into();
        tracing::error!(
            component = module_path!(),
            op = $op,
            event = $crate::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err_kind = record.kind().name(),
            err_code = record.code(),
            $($field)*
        );
    }};
}
