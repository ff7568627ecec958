//! Price Inference Engine
//!
//! Wraps the trained regression model behind a [`Regressor`] trait and
//! formats its output for display.

mod engine;
mod format;
mod linear;
mod onnx;

pub use engine::{PricePredictor, Regressor};
pub use format::{format_price, PredictionResult};
pub use linear::LinearRegressor;
pub use onnx::OnnxRegressor;

use thiserror::Error;

/// Errors during inference
#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("Model load failed: {0}")]
    ModelLoadError(String),
    #[error("Inference failed: {0}")]
    InferenceFailed(String),
    #[error("Invalid input shape: expected {expected}, got {actual}")]
    InvalidInputShape { expected: usize, actual: usize },
}
