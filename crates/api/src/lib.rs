//! House Price Prediction API Server
//!
//! Serves the single prediction endpoint backed by the feature encoder and
//! the trained price model.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::str::FromStr;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

mod context;
mod error;
pub mod routes;
pub mod settings;

pub use settings::{LoggingSettings, Settings};
pub use context::PredictionContext;
pub use error::{ApiError, ErrorResponse, StartupError};

/// Application state shared across handlers
///
/// Read-only after startup, so handlers share it through an `Arc` without
/// any lock.
pub struct AppState {
    /// Validator, encoder and model
    pub context: PredictionContext,
    /// Version string
    pub version: String,
    /// Start time
    pub start_time: std::time::Instant,
    /// Prometheus renderer, when the recorder is installed
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// Create new application state
    pub fn new(context: PredictionContext, metrics: Option<PrometheusHandle>) -> Self {
        Self {
            context,
            version: env!("CARGO_PKG_VERSION").to_string(),
            start_time: std::time::Instant::now(),
            metrics,
        }
    }
}

/// Create the application router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/predict", post(routes::predict::predict))
        .route("/api/v1/health", get(routes::health::health))
        .route("/metrics", get(metrics_handler))
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(state)
}

/// Prometheus exposition
async fn metrics_handler(State(state): State<Arc<AppState>>) -> Response {
    match &state.metrics {
        Some(handle) => handle.render().into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

/// Initialize logging
pub fn init_logging(settings: &LoggingSettings) -> Result<(), StartupError> {
    let level = Level::from_str(&settings.level)
        .map_err(|_| StartupError::LogLevel(settings.level.clone()))?;

    let builder = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true);

    let result = if settings.json {
        tracing::subscriber::set_global_default(builder.json().finish())
    } else {
        tracing::subscriber::set_global_default(builder.finish())
    };

    result.map_err(|e| StartupError::Logging(e.to_string()))
}

/// Install the global Prometheus recorder
pub fn install_metrics() -> Result<PrometheusHandle, StartupError> {
    PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| StartupError::Metrics(e.to_string()))
}

/// Load everything and run the server until Ctrl-C
pub async fn run_server(settings: Settings) -> Result<(), StartupError> {
    let context = PredictionContext::load(&settings)?;
    let metrics = install_metrics()?;
    let state = Arc::new(AppState::new(context, Some(metrics)));

    let mut app = create_router(state);
    if settings.server.cors_permissive {
        app = app.layer(CorsLayer::permissive());
    }

    info!("Starting API server on {}", settings.server.addr);

    let listener = tokio::net::TcpListener::bind(&settings.server.addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("API server stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => {
            warn!("Failed to listen for shutdown signal: {}", e);
            std::future::pending::<()>().await
        }
    }
}
