//! HTTP request handlers for the triage service

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde_json::Value;

use crate::errors::{AppError, PredictError};
use crate::metrics::{triage_metrics_handler, TriageMetricsHelper};
use crate::models::{
    AppState, EncoderVocabularies, HealthResponse, ModelInfoResponse, PredictResponse,
};
use crate::prediction::run_prediction;
use crate::validation::parse_observation;

#[utoipa::path(
    post,
    path = "/predict",
    tag = "prediction",
    request_body = crate::documentation::PredictRequest,
    responses(
        (status = 200, description = "Triage assessment computed successfully", body = PredictResponse),
        (status = 400, description = "A required field is missing", body = crate::documentation::ErrorResponse),
        (status = 500, description = "Malformed payload, invalid value, or inference failure", body = crate::documentation::ErrorResponse)
    )
)]
/// Run a triage prediction for one patient observation
///
/// The payload must carry all eight fields: `age`, `gender`, `systolicBP`,
/// `diastolicBP`, `heartRate`, `temperature`, `symptoms`, `preExisting`.
/// Presence is checked in that order and the first missing field produces a
/// 400 naming it. Unknown categorical values never fail the request; they
/// encode to vocabulary index 0 and the prediction proceeds.
///
/// The response combines the risk classifier, the department classifier, and
/// the rule-based contributing factors. `riskScore` and `confidence` both
/// carry the top risk probability as a percentage.
///
/// # Errors
///
/// Returns an error if:
/// - The body is not parseable JSON or not a JSON object (500, `mlUsed: false`)
/// - A required field is absent (400, `Missing field: <name>`)
/// - A present field has the wrong shape, e.g. a string where a number is
///   expected or a non-list `symptoms` (500, `mlUsed: false`)
pub async fn predict(
    State(state): State<Arc<AppState>>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<PredictResponse>, AppError> {
    let started = Instant::now();

    // A body axum cannot parse as JSON surfaces through the same 500 shape
    // as any other in-handler failure.
    let Json(body) = body.map_err(|rejection| PredictError::MalformedBody(rejection.to_string()))?;

    let observation = parse_observation(&body)?;
    let response = run_prediction(&state, &observation)?;

    TriageMetricsHelper::record_prediction(
        &response.risk,
        &response.department,
        started.elapsed(),
        response.factors.len(),
    );

    tracing::info!(
        risk = %response.risk,
        department = %response.department,
        factor_count = response.factors.len(),
        "Prediction completed"
    );

    Ok(Json(response))
}

#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is healthy and models are loaded", body = HealthResponse)
    )
)]
/// Health check endpoint
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        models_loaded: true,
        risk_model: state.risk_model.type_name().to_string(),
        dept_model: state.department_model.type_name().to_string(),
    })
}

#[utoipa::path(
    get,
    path = "/model-info",
    tag = "models",
    responses(
        (status = 200, description = "Loaded model and encoder details", body = ModelInfoResponse)
    )
)]
/// Describe the loaded classifiers and encoder vocabularies
pub async fn model_info(State(state): State<Arc<AppState>>) -> Json<ModelInfoResponse> {
    Json(ModelInfoResponse {
        risk_model: AppState::model_entry(&state.risk_model),
        department_model: AppState::model_entry(&state.department_model),
        encoders: EncoderVocabularies {
            gender: state.gender_encoder.classes.clone(),
            symptoms: state.symptom_encoder.classes.clone(),
            pre_existing: state.pre_existing_encoder.classes.clone(),
        },
    })
}

#[utoipa::path(
    get,
    path = "/metrics",
    tag = "metrics",
    responses(
        (status = 200, description = "Prometheus metrics", content_type = "text/plain"),
        (status = 500, description = "Failed to gather metrics")
    )
)]
/// Metrics endpoint
pub async fn get_metrics() -> impl axum::response::IntoResponse {
    triage_metrics_handler().await
}
