use geodsl_core::{AlgebraProcessor, Descriptor, ErrorHandler, Number};

/// Processor whose error handler records without logging
#[allow(dead_code)]
pub fn quiet_processor() -> AlgebraProcessor {
    let mut algebra = AlgebraProcessor::new();
    algebra.set_error_handler(ErrorHandler::new(true));
    algebra
}

#[allow(dead_code)]
pub fn int_record(n: i64) -> Descriptor {
    Descriptor::Number {
        value: Number::Int(n),
    }
}

#[allow(dead_code)]
pub fn float_record(x: f64) -> Descriptor {
    Descriptor::Number {
        value: Number::Float(x),
    }
}

/// Result list as JSON, the way callers see it
#[allow(dead_code)]
pub fn to_json(result: &[Descriptor]) -> serde_json::Value {
    serde_json::to_value(result).unwrap()
}
