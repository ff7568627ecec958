//! Feature Engine Error Types

use thiserror::Error;

/// Errors while fitting reference statistics or encoding features
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FeatureError {
    /// Categorical value outside the trained vocabulary
    #[error("Unknown {field} category {value:?}, expected one of {allowed:?}")]
    UnknownCategory {
        field: &'static str,
        value: String,
        allowed: Vec<String>,
    },

    /// Dataset could not be opened or parsed
    #[error("Failed to read dataset {source_name}: {message}")]
    Dataset { source_name: String, message: String },

    /// Required column absent from the dataset header
    #[error("Dataset {source_name} has no column {column:?}")]
    MissingColumn {
        source_name: String,
        column: &'static str,
    },

    /// Dataset has a header but no rows
    #[error("Dataset {0} contains no rows")]
    EmptyDataset(String),

    /// Cell could not be used for fitting
    #[error("Dataset {source_name} line {line}: invalid {column} value {value:?}")]
    InvalidCell {
        source_name: String,
        line: u64,
        column: &'static str,
        value: String,
    },

    /// Standard deviation is zero or not finite
    #[error("Degenerate scaling for {column}: std = {std}")]
    DegenerateScale { column: &'static str, std: f64 },

    /// Fitted vocabulary disagrees with the declared feature schema
    #[error("Vocabulary for {field} yields indicators {actual:?}, schema expects {expected:?}")]
    SchemaMismatch {
        field: &'static str,
        expected: Vec<String>,
        actual: Vec<String>,
    },
}
