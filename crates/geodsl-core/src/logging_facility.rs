//! Structured logging facility
//!
//! - Single initialization point via `init(profile)`
//! - Boundary macros (`log_op_start!`, `log_op_end!`, `log_op_error!`)
//!   used by the `AlgebraProcessor` entry points only
//! - Test capture mode for deterministic assertions
//!
//! Lower layers (parser, dispatcher, processors) emit plain
//! `tracing::debug!`/`trace!` events and never start/end events.
//!
//! # Usage
//!
//! ```rust
//! use geodsl_core::logging_facility::{init, Profile};
//!
//! init(Profile::Development);
//! ```

pub mod init;
pub mod macros;
pub mod test_capture;

pub use init::{init, Profile};
pub use test_capture::{init_test_capture, CapturedEvent, TestCapture};
