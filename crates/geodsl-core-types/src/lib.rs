//! Core types shared across GeoDSL facilities
//!
//! - **Correlation**: `EvalId`, one per façade evaluation call
//! - **Schema constants**: canonical structured-logging field keys and event names

pub mod correlation;
pub mod schema;

pub use correlation::EvalId;
