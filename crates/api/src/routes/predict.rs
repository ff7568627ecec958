//! Prediction Route

use axum::{
    body::Bytes,
    extract::State,
    response::{IntoResponse, Response},
    Json,
};
use data_validator::PredictRequest;
use inference_engine::PredictionResult;
use metrics::{counter, histogram};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

use crate::error::ApiError;
use crate::AppState;

/// Success body
#[derive(Debug, Serialize, Deserialize)]
pub struct PredictResponse {
    pub success: bool,
    pub prediction: f64,
    pub formatted_prediction: String,
}

impl From<PredictionResult> for PredictResponse {
    fn from(result: PredictionResult) -> Self {
        Self {
            success: true,
            prediction: result.value,
            formatted_prediction: result.formatted,
        }
    }
}

/// Estimate a house price
///
/// The body is parsed here rather than through the `Json` extractor so
/// malformed JSON gets the same `{success, error}` body as any other
/// rejected request.
pub async fn predict(State(state): State<Arc<AppState>>, body: Bytes) -> Response {
    let start = Instant::now();

    let outcome = PredictRequest::from_slice(&body)
        .map_err(ApiError::from)
        .and_then(|request| state.context.predict(&request));

    let elapsed = start.elapsed();
    histogram!("immo_prediction_duration_seconds").record(elapsed.as_secs_f64());

    match outcome {
        Ok(result) => {
            counter!("immo_predictions_total", "outcome" => "success").increment(1);
            info!(
                "Prediction {} in {:.3}ms",
                result.formatted,
                elapsed.as_secs_f64() * 1000.0
            );
            Json(PredictResponse::from(result)).into_response()
        }
        Err(err) => {
            counter!("immo_predictions_total", "outcome" => err.outcome()).increment(1);
            warn!("Prediction rejected: {}", err);
            err.into_response()
        }
    }
}
