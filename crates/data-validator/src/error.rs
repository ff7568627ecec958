//! Validation Error Types

use thiserror::Error;

/// Errors during request validation
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// Value out of allowed range
    #[error("{field} value {value} is out of range [{min}, {max}]")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    /// Value is not a number
    #[error("{field} is not a valid number: {value:?}")]
    NotANumber { field: &'static str, value: String },

    /// Value is a number but not a whole one
    #[error("{field} must be a whole number, got {value}")]
    NotAnInteger { field: &'static str, value: f64 },

    /// Invalid data format
    #[error("Invalid data format: {0}")]
    InvalidFormat(String),

    /// Missing required field
    #[error("Missing required field: {0}")]
    MissingField(&'static str),
}
