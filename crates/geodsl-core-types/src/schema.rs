//! Canonical schema constants for structured logging
//!
//! Every boundary event emitted by the engine uses these keys so that log
//! consumers and the test capture layer agree on field names.

pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";
pub const FIELD_EVAL_ID: &str = "eval_id";

// Evaluation context
pub const FIELD_INPUT: &str = "input";
pub const FIELD_COMMAND: &str = "command";
pub const FIELD_LABEL: &str = "label";
pub const FIELD_RESULT_LEN: &str = "result_len";

// Error fields
pub const FIELD_ERR_KIND: &str = "err_kind";
pub const FIELD_ERR_CODE: &str = "err_code";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_names_are_distinct() {
        assert_ne!(EVENT_START, EVENT_END);
        assert_ne!(EVENT_START, EVENT_END_ERROR);
        assert_ne!(EVENT_END, EVENT_END_ERROR);
    }

    #[test]
    fn test_error_fields_are_flat_keys() {
        assert!(!FIELD_ERR_KIND.contains('.'));
        assert!(!FIELD_ERR_CODE.contains('.'));
    }
}
