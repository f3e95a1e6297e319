//! Data models and wire types for the triage service.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::classifier::ClassifierModel;
use crate::encoder::LabelEncoder;

/// A single patient observation, produced by validating the predict payload.
///
/// Numeric fields are carried as `f64` regardless of how the caller wrote
/// them; no range validation is applied, out-of-range values flow into the
/// feature vector and the factor rules unchanged.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub age: f64,
    pub gender: String,
    pub systolic_bp: f64,
    pub diastolic_bp: f64,
    pub heart_rate: f64,
    pub temperature: f64,
    /// Ordered; the first entry is the primary symptom.
    pub symptoms: Vec<String>,
    pub pre_existing: String,
}

/// One rule-derived explanation entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Factor {
    /// Human-readable rule name, e.g. "Age > 65 years".
    pub name: String,
    /// Bounded impact score; each rule clamps to its own ceiling.
    pub impact: f64,
}

/// Model introspection block embedded in the predict response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ModelInfoBlock {
    /// Declared classifier type name, e.g. "RandomForestClassifier".
    #[serde(rename = "type")]
    pub model_type: String,
    pub using_ensemble: bool,
    pub features_used: usize,
}

/// Successful predict response.
///
/// Key spelling is a wire contract with the existing frontend; the camelCase
/// renames are deliberate and must not change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PredictResponse {
    pub risk: String,
    pub risk_score: f64,
    pub risk_probabilities: BTreeMap<String, f64>,
    pub confidence: f64,
    pub department: String,
    pub department_probabilities: BTreeMap<String, f64>,
    pub department_confidence: f64,
    pub factors: Vec<Factor>,
    pub model_info: ModelInfoBlock,
    pub ml_used: bool,
    pub model_type: String,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub models_loaded: bool,
    pub risk_model: String,
    pub dept_model: String,
}

/// `/model-info` entry for one classifier.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ModelEntry {
    #[serde(rename = "type")]
    pub model_type: String,
    pub classes: Vec<String>,
    pub n_features: usize,
}

/// `/model-info` encoder vocabulary listing.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EncoderVocabularies {
    pub gender: Vec<String>,
    pub symptoms: Vec<String>,
    pub pre_existing: Vec<String>,
}

/// `/model-info` response.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ModelInfoResponse {
    pub risk_model: ModelEntry,
    pub department_model: ModelEntry,
    pub encoders: EncoderVocabularies,
}

/// Application state: the two classifiers and three label encoders loaded at
/// startup.
///
/// Everything here is immutable after `load_artifacts` returns and is shared
/// across request handlers behind an `Arc`; concurrent prediction calls read
/// the same models without synchronization.
pub struct AppState {
    pub risk_model: ClassifierModel,
    pub department_model: ClassifierModel,
    pub gender_encoder: LabelEncoder,
    pub symptom_encoder: LabelEncoder,
    pub pre_existing_encoder: LabelEncoder,
}

impl AppState {
    pub fn model_entry(model: &ClassifierModel) -> ModelEntry {
        ModelEntry {
            model_type: model.type_name().to_string(),
            classes: model.classes().to_vec(),
            n_features: model.n_features(),
        }
    }
}
