use super::Value;

/// Error converting between a dynamic [`Value`] and a concrete field type.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValueError {
    #[error("Expected a {expected} value, got {got}")]
    Mismatch {
        expected: &'static str,
        got: &'static str,
    },

    #[error("Value {value} is out of range for {type_name}")]
    OutOfRange {
        type_name: &'static str,
        value: String,
    },

    #[error("Expected {expected} elements, got {got}")]
    LengthMismatch { expected: usize, got: usize },

    #[error("{value} is not a discriminant of enum '{enum_name}'")]
    UnknownDiscriminant { enum_name: &'static str, value: i64 },

    #[error("No field named '{field}'")]
    UnknownField { field: String },
}

impl ValueError {
    pub fn mismatch(expected: &'static str, got: &Value) -> Self {
        ValueError::Mismatch {
            expected,
            got: got.kind_name(),
        }
    }
}
