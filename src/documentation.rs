use utoipa::OpenApi;

use crate::models::{
    EncoderVocabularies, Factor, HealthResponse, ModelEntry, ModelInfoBlock, ModelInfoResponse,
    PredictResponse,
};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Triage Prediction API",
        version = "1.0.0",
        description = "Patient triage service backed by pretrained risk and department classifiers",
        contact(
            name = "Platform Team",
            email = "platform@example.com"
        )
    ),
    servers(
        (url = "http://localhost:5000", description = "Local development server")
    ),
    paths(
        crate::handlers::predict,
        crate::handlers::health_check,
        crate::handlers::model_info,
        crate::handlers::get_metrics,
    ),
    components(
        schemas(
            PredictRequest,
            PredictResponse,
            Factor,
            ModelInfoBlock,
            HealthResponse,
            ModelEntry,
            EncoderVocabularies,
            ModelInfoResponse,
            ErrorResponse,
        )
    ),
    tags(
        (name = "prediction", description = "Triage prediction operations"),
        (name = "health", description = "Health check operations"),
        (name = "models", description = "Model introspection operations"),
        (name = "metrics", description = "Metrics operations")
    )
)]
pub struct ApiDoc;

/// Documented shape of the predict payload.
///
/// Validation runs field by field over the raw JSON, not through this type,
/// so the first missing field can be named in contract order.
#[derive(serde::Serialize, serde::Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PredictRequest {
    pub age: f64,
    pub gender: String,
    pub systolic_bp: f64,
    pub diastolic_bp: f64,
    pub heart_rate: f64,
    pub temperature: f64,
    pub symptoms: Vec<String>,
    pub pre_existing: String,
}

/// Error body shape shared by the 400 and 500 responses.
#[derive(serde::Serialize, serde::Deserialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    /// Present (and false) only on prediction-path failures.
    #[serde(rename = "mlUsed", skip_serializing_if = "Option::is_none")]
    pub ml_used: Option<bool>,
}
