// Explicitly acknowledge dependencies unused by the binary target
use chrono as _;
use once_cell as _;
use prometheus as _;
use serde as _;
use serde_json as _;
use thiserror as _;
use tower_http as _;

// Dev dependencies used in tests (acknowledged to prevent clippy warnings)
#[cfg(test)]
use futures as _;
#[cfg(test)]
use reqwest as _;
#[cfg(test)]
use tempfile as _;

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;

use triage_service::{app, load_artifacts, ApiDoc};

mod config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cfg = config::AppConfig::from_env();
    let state = Arc::new(load_artifacts(&cfg.model_dir)?);
    let openapi = ApiDoc::openapi();

    let app = app(state).route(
        "/openapi.json",
        axum::routing::get(move || async { axum::Json(openapi) }),
    );

    let listener = TcpListener::bind(cfg.bind_addr).await?;
    tracing::info!("triage-service listening on {}", cfg.bind_addr);
    axum::serve(listener, app).await?;
    Ok(())
}
