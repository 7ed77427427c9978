//! Error types for the rating engine

use thiserror::Error;

/// A match record field that cannot be used as a statistic.
///
/// Raised by the aggregator at the point a raw match document is read.
/// Absent and `null` fields are not errors; they count as zero.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Match record must be an object, found {found}")]
    NotAnObject { found: String },

    #[error("Field '{field}' must be numeric, found {found}")]
    NonNumeric { field: &'static str, found: String },

    #[error("Field '{field}' must be >= 0, got {value}")]
    Negative { field: &'static str, value: f64 },

    #[error("Field '{field}' must be a finite number")]
    NotFinite { field: &'static str },
}

/// Errors surfaced by the rating engine
#[derive(Error, Debug)]
pub enum RatingError {
    #[error("Invalid match record #{index}: {source}")]
    InvalidRecord {
        index: usize,
        #[source]
        source: ValidationError,
    },

    #[error("Player '{player_id}' rejected: {source}")]
    PlayerRejected {
        player_id: String,
        #[source]
        source: Box<RatingError>,
    },

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Short JSON type name used in validation messages
pub(crate) fn json_type_name(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::Null => "null".to_string(),
        serde_json::Value::Bool(b) => format!("bool ({b})"),
        serde_json::Value::Number(n) => format!("number ({n})"),
        serde_json::Value::String(s) => format!("string ({s:?})"),
        serde_json::Value::Array(_) => "array".to_string(),
        serde_json::Value::Object(_) => "object".to_string(),
    }
}
