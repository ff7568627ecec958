//! Health Route

use axum::{extract::State, Json};
use feature_engine::FEATURE_DIMENSION;
use serde::Serialize;
use std::sync::Arc;

use crate::AppState;

/// Health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub model: ModelHealth,
    pub feature_dimension: usize,
}

/// Loaded model summary
#[derive(Debug, Serialize)]
pub struct ModelHealth {
    pub kind: String,
    pub path: String,
    pub input_dimension: usize,
}

/// Health check handler
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let predictor = state.context.predictor();

    Json(HealthResponse {
        status: "healthy".to_string(),
        version: state.version.clone(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        model: ModelHealth {
            kind: predictor.kind().to_string(),
            path: predictor.model_path().display().to_string(),
            input_dimension: predictor.input_dimension(),
        },
        feature_dimension: FEATURE_DIMENSION,
    })
}
