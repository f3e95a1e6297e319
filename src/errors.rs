//! Error taxonomy for the triage service.

use std::path::PathBuf;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Structural problems found in a model artifact during load-time validation.
#[derive(Error, Debug)]
pub enum ModelValidationError {
    #[error("model declares no classes")]
    EmptyClasses,

    #[error("model holds no trees")]
    NoTrees,

    #[error("tree {tree} has no nodes")]
    EmptyTree { tree: usize },

    #[error("tree {tree} node {node} links to out-of-range child {child}")]
    ChildOutOfRange {
        tree: usize,
        node: usize,
        child: usize,
    },

    #[error("tree {tree} node {node} splits on feature {feature}, expected index below {limit}")]
    FeatureOutOfRange {
        tree: usize,
        node: usize,
        feature: usize,
        limit: usize,
    },

    #[error("tree {tree} node {node} carries {got} class probabilities, expected {expected}")]
    LeafArity {
        tree: usize,
        node: usize,
        got: usize,
        expected: usize,
    },

    #[error("model declares {declared} input features, the feature vector carries {expected}")]
    FeatureWidth { declared: usize, expected: usize },
}

/// Failures while loading model and encoder artifacts at startup.
///
/// Every variant is fatal: the process must not serve without a complete,
/// valid artifact set.
#[derive(Error, Debug)]
pub enum ArtifactError {
    #[error("artifact '{filename}' not found in {} or its parent", .model_dir.display())]
    NotFound { filename: String, model_dir: PathBuf },

    #[error("failed to read artifact '{filename}'")]
    Io {
        filename: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse artifact '{filename}'")]
    Parse {
        filename: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("artifact '{filename}' failed validation")]
    Invalid {
        filename: String,
        #[source]
        source: ModelValidationError,
    },

    #[error("encoder artifact '{filename}' has an empty vocabulary")]
    EmptyVocabulary { filename: String },
}

/// Request-time failures on the prediction path.
///
/// `MissingField` is the only 400; its display string is part of the wire
/// contract. Everything else surfaces as a 500 with `"mlUsed": false`.
#[derive(Error, Debug)]
pub enum PredictError {
    #[error("Missing field: {0}")]
    MissingField(&'static str),

    #[error("{0}")]
    MalformedBody(String),

    #[error("Invalid value for field: {field}")]
    InvalidValue { field: &'static str },

    #[error("inference failed: {reason}")]
    Inference { reason: String },
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Predict(#[from] PredictError),

    #[error("Internal server error: {context}")]
    Internal { context: String },
}

impl AppError {
    pub fn internal(context: impl Into<String>) -> Self {
        Self::Internal {
            context: context.into(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Predict(PredictError::MissingField(_)) => StatusCode::BAD_REQUEST,
            AppError::Predict(_) | AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn error_type(&self) -> &'static str {
        match self {
            AppError::Predict(PredictError::MissingField(_)) => "missing_field",
            AppError::Predict(PredictError::MalformedBody(_)) => "malformed_body",
            AppError::Predict(PredictError::InvalidValue { .. }) => "invalid_value",
            AppError::Predict(PredictError::Inference { .. }) => "inference_error",
            AppError::Internal { .. } => "internal_error",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = self.to_string();

        crate::metrics::TriageMetricsHelper::record_prediction_error(self.error_type());

        // The 500 shape on the predict path carries `mlUsed: false`; the 400
        // and non-predict shapes carry the bare error message.
        let body = match &self {
            AppError::Predict(PredictError::MissingField(_)) | AppError::Internal { .. } => {
                json!({ "error": message })
            }
            AppError::Predict(_) => json!({ "error": message, "mlUsed": false }),
        };

        (status, Json(body)).into_response()
    }
}
