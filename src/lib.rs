#![forbid(unsafe_code)]
#![deny(rust_2018_idioms, future_incompatible)]

// Explicitly acknowledge dependencies only the binary target uses
use anyhow as _;
use dotenvy as _;
use tokio as _;
use tracing_subscriber as _;

// Dev dependencies used in tests (acknowledged to prevent clippy warnings)
#[cfg(test)]
use futures as _;
#[cfg(test)]
use reqwest as _;

use std::sync::Arc;

use axum::{
    http,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

pub mod artifacts;
pub mod classifier;
pub mod documentation;
pub mod encoder;
pub mod errors;
pub mod factors;
pub mod features;
pub mod handlers;
pub mod metrics;
pub mod models;
pub mod prediction;
pub mod validation;

pub use artifacts::load_artifacts;
pub use documentation::ApiDoc;
pub use models::AppState;

use metrics::triage_metrics_middleware;

/// Build the service router with every layer attached.
///
/// CORS defaults to permissive because the frontend is served from another
/// origin; set `ALLOWED_ORIGINS` (comma separated) to restrict it.
pub fn app(state: Arc<AppState>) -> Router {
    let cors = match std::env::var("ALLOWED_ORIGINS") {
        Ok(origins) if !origins.trim().is_empty() => {
            let mut layer = CorsLayer::new();
            for o in origins.split(',') {
                if let Ok(origin) = o.trim().parse::<http::HeaderValue>() {
                    layer = layer.allow_origin(origin);
                }
            }
            layer
        }
        _ => CorsLayer::permissive(),
    };

    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/predict", post(handlers::predict))
        .route("/model-info", get(handlers::model_info))
        .route("/metrics", get(handlers::get_metrics))
        .layer(axum::middleware::from_fn(triage_metrics_middleware))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
