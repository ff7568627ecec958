//! API Error Types

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use data_validator::ValidationError;
use feature_engine::FeatureError;
use inference_engine::InferenceError;
use serde::Serialize;
use thiserror::Error;

/// Fatal errors before the server accepts traffic
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Reference statistics unavailable: {0}")]
    Statistics(#[from] FeatureError),
    #[error("Price model unavailable: {0}")]
    Model(#[from] InferenceError),
    #[error("Invalid log level {0:?}")]
    LogLevel(String),
    #[error("Logging setup failed: {0}")]
    Logging(String),
    #[error("Metrics exporter setup failed: {0}")]
    Metrics(String),
    #[error("Server error: {0}")]
    Io(#[from] std::io::Error),
}

/// Per-request failures, reported to the caller
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Encoding(#[from] FeatureError),
    #[error(transparent)]
    Prediction(#[from] InferenceError),
}

impl ApiError {
    /// HTTP status for this failure
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::Encoding(_) => StatusCode::BAD_REQUEST,
            ApiError::Prediction(_) => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }

    /// Metrics label
    pub fn outcome(&self) -> &'static str {
        match self {
            ApiError::Validation(_) => "invalid_input",
            ApiError::Encoding(_) => "unknown_category",
            ApiError::Prediction(_) => "prediction_failed",
        }
    }
}

/// Failure body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            success: false,
            error: self.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ApiError::from(ValidationError::MissingField("surface")).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(FeatureError::UnknownCategory {
                field: "Location",
                value: "Nice".to_string(),
                allowed: vec![],
            })
            .status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(InferenceError::InferenceFailed("boom".to_string())).status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }

    #[test]
    fn test_message_is_transparent() {
        let err = ApiError::from(ValidationError::MissingField("surface"));
        assert_eq!(err.to_string(), "Missing required field: surface");
    }
}
