//! Validation Error Types

use thiserror::Error;

/// Errors while decoding or validating a tap request
#[derive(Debug, Clone, Error)]
pub enum ValidationError {
    /// Payload is not valid JSON
    #[error("Malformed JSON input: {0}")]
    MalformedJson(String),

    /// Invalid data format
    #[error("Invalid data format: {0}")]
    InvalidFormat(String),

    /// Interval that is neither a number nor a numeric string
    #[error("Invalid tap interval at index {index}: {value}")]
    InvalidInterval { index: usize, value: String },

    /// Value out of allowed range
    #[error("{field}[{index}] value {value} is out of range [{min}, {max}]")]
    OutOfRange {
        field: &'static str,
        index: usize,
        value: f64,
        min: f64,
        max: f64,
    },

    /// NaN or infinite tap coordinate
    #[error("Non-finite {axis} coordinate at tap {index}")]
    NonFiniteCoordinate { axis: &'static str, index: usize },
}
