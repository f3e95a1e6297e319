//! Observability metrics for the triage service.
//!
//! Covers prediction outcomes, encoder fallbacks, prediction errors, and
//! plain HTTP request accounting.

use std::time::{Duration, Instant};

use axum::{
    extract::{MatchedPath, Request},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use once_cell::sync::Lazy;
use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounterVec, IntGauge, Opts, Registry, TextEncoder,
};
use tracing::{debug, error};

/// Core metrics registry for triage service observability
pub struct TriageMetricsRegistry {
    /// Prometheus registry for all metrics
    pub registry: Registry,

    // === Prediction Metrics ===
    /// Completed predictions by risk level and department
    pub prediction_requests_total: IntCounterVec,
    /// End-to-end prediction latency
    pub prediction_duration: HistogramVec,
    /// Prediction failures by error type
    pub prediction_errors_total: IntCounterVec,
    /// Unknown-category encodings that fell back to index 0, by field
    pub encoder_fallback_total: IntCounterVec,
    /// Contributing factors emitted per prediction
    pub factors_per_prediction: HistogramVec,

    // === HTTP Request Metrics ===
    /// HTTP requests by method, endpoint, and status
    pub http_requests_total: IntCounterVec,
    /// HTTP request duration by endpoint
    pub http_request_duration: HistogramVec,
    /// Concurrent HTTP requests
    pub http_requests_in_flight: IntGauge,
}

impl TriageMetricsRegistry {
    /// Create a new metrics registry with all collectors initialized
    pub fn new() -> Self {
        let registry = Registry::new();

        let prediction_requests_total = IntCounterVec::new(
            Opts::new(
                "triage_prediction_requests_total",
                "Total completed predictions",
            ),
            &["risk", "department"],
        )
        .expect("Failed to create prediction_requests_total metric");

        let prediction_duration = HistogramVec::new(
            HistogramOpts::new(
                "triage_prediction_duration_seconds",
                "Duration of prediction handling in seconds",
            )
            .buckets(vec![
                0.0001, 0.0005, 0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5,
            ]),
            &["outcome"],
        )
        .expect("Failed to create prediction_duration metric");

        let prediction_errors_total = IntCounterVec::new(
            Opts::new(
                "triage_prediction_errors_total",
                "Total prediction errors by type",
            ),
            &["error_type"],
        )
        .expect("Failed to create prediction_errors_total metric");

        let encoder_fallback_total = IntCounterVec::new(
            Opts::new(
                "triage_encoder_fallback_total",
                "Labels outside an encoder vocabulary that encoded to index 0",
            ),
            &["field"],
        )
        .expect("Failed to create encoder_fallback_total metric");

        let factors_per_prediction = HistogramVec::new(
            HistogramOpts::new(
                "triage_factors_per_prediction",
                "Number of contributing factors emitted per prediction",
            )
            .buckets(vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0]),
            &["risk"],
        )
        .expect("Failed to create factors_per_prediction metric");

        let http_requests_total = IntCounterVec::new(
            Opts::new("triage_http_requests_total", "Total HTTP requests"),
            &["method", "endpoint", "status_code"],
        )
        .expect("Failed to create http_requests_total metric");

        let http_request_duration = HistogramVec::new(
            HistogramOpts::new(
                "triage_http_request_duration_seconds",
                "HTTP request duration in seconds",
            )
            .buckets(vec![
                0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5,
            ]),
            &["method", "endpoint"],
        )
        .expect("Failed to create http_request_duration metric");

        let http_requests_in_flight = IntGauge::new(
            "triage_http_requests_in_flight",
            "Number of HTTP requests currently being processed",
        )
        .expect("Failed to create http_requests_in_flight metric");

        let metrics: Vec<Box<dyn prometheus::core::Collector>> = vec![
            Box::new(prediction_requests_total.clone()),
            Box::new(prediction_duration.clone()),
            Box::new(prediction_errors_total.clone()),
            Box::new(encoder_fallback_total.clone()),
            Box::new(factors_per_prediction.clone()),
            Box::new(http_requests_total.clone()),
            Box::new(http_request_duration.clone()),
            Box::new(http_requests_in_flight.clone()),
        ];

        for metric in metrics {
            if let Err(e) = registry.register(metric) {
                error!("Failed to register metric: {}", e);
            }
        }

        Self {
            registry,
            prediction_requests_total,
            prediction_duration,
            prediction_errors_total,
            encoder_fallback_total,
            factors_per_prediction,
            http_requests_total,
            http_request_duration,
            http_requests_in_flight,
        }
    }

    /// Generate Prometheus metrics output
    pub fn gather_metrics(&self) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }
}

impl Default for TriageMetricsRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Global triage metrics registry instance
pub static TRIAGE_METRICS: Lazy<TriageMetricsRegistry> = Lazy::new(TriageMetricsRegistry::new);

/// Metrics middleware: request accounting around every route.
pub async fn triage_metrics_middleware(req: Request, next: Next) -> Response {
    let start_time = Instant::now();
    let method = req.method().clone();
    // All routes are fixed paths; the matched route template bounds label
    // cardinality on its own.
    let path = req
        .extensions()
        .get::<MatchedPath>()
        .map_or("unknown".to_string(), |p| p.as_str().to_string());

    TRIAGE_METRICS.http_requests_in_flight.inc();

    let response = next.run(req).await;

    TRIAGE_METRICS.http_requests_in_flight.dec();

    let duration = start_time.elapsed();
    let status_code = response.status();

    TRIAGE_METRICS
        .http_requests_total
        .with_label_values(&[method.as_str(), &path, &status_code.as_u16().to_string()])
        .inc();

    TRIAGE_METRICS
        .http_request_duration
        .with_label_values(&[method.as_str(), &path])
        .observe(duration.as_secs_f64());

    debug!(
        method = %method,
        path = %path,
        status = %status_code,
        duration_ms = %duration.as_millis(),
        "Triage service HTTP request processed"
    );

    response
}

/// Prometheus metrics endpoint handler for the triage service
pub async fn triage_metrics_handler() -> impl IntoResponse {
    match TRIAGE_METRICS.gather_metrics() {
        Ok(metrics) => (
            StatusCode::OK,
            [("content-type", "text/plain; version=0.0.4; charset=utf-8")],
            metrics,
        ),
        Err(e) => {
            error!("Failed to gather triage metrics: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                [("content-type", "text/plain")],
                format!("Error gathering metrics: {e}"),
            )
        }
    }
}

/// Helper functions for prediction-specific metrics
pub struct TriageMetricsHelper;

impl TriageMetricsHelper {
    /// Record a completed prediction with its outcome context
    pub fn record_prediction(risk: &str, department: &str, duration: Duration, factor_count: usize) {
        TRIAGE_METRICS
            .prediction_requests_total
            .with_label_values(&[risk, department])
            .inc();

        TRIAGE_METRICS
            .prediction_duration
            .with_label_values(&["success"])
            .observe(duration.as_secs_f64());

        TRIAGE_METRICS
            .factors_per_prediction
            .with_label_values(&[risk])
            .observe(factor_count as f64);
    }

    /// Record a prediction error by wire error type
    pub fn record_prediction_error(error_type: &str) {
        TRIAGE_METRICS
            .prediction_errors_total
            .with_label_values(&[error_type])
            .inc();
    }

    /// Record an unknown-category encoding that fell back to index 0
    pub fn record_encoder_fallback(field: &str) {
        TRIAGE_METRICS
            .encoder_fallback_total
            .with_label_values(&[field])
            .inc();
    }
}
