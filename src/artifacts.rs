//! Startup loading of classifier and encoder artifacts.
//!
//! All five artifacts load once before the listener binds. Any failure is
//! fatal; the service never serves with a partial artifact set.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::classifier::{ClassifierModel, ModelArtifact};
use crate::encoder::LabelEncoder;
use crate::errors::ArtifactError;
use crate::models::AppState;

pub const RISK_MODEL_FILE: &str = "risk_model.json";
pub const DEPARTMENT_MODEL_FILE: &str = "department_model.json";
pub const GENDER_ENCODER_FILE: &str = "le_gender.json";
pub const SYMPTOM_ENCODER_FILE: &str = "le_symptoms.json";
pub const PRE_EXISTING_ENCODER_FILE: &str = "le_pre_existing.json";

/// Resolve an artifact path: the model directory first, then its parent.
///
/// The fallback keeps deployments working where artifacts sit next to the
/// binary instead of inside the model directory.
fn resolve(model_dir: &Path, filename: &str) -> Result<PathBuf, ArtifactError> {
    let in_model_dir = model_dir.join(filename);
    if in_model_dir.exists() {
        return Ok(in_model_dir);
    }
    if let Some(parent) = model_dir.parent() {
        let in_parent = parent.join(filename);
        if in_parent.exists() {
            return Ok(in_parent);
        }
    }
    Err(ArtifactError::NotFound {
        filename: filename.to_string(),
        model_dir: model_dir.to_path_buf(),
    })
}

fn read_json<T: serde::de::DeserializeOwned>(
    model_dir: &Path,
    filename: &str,
) -> Result<T, ArtifactError> {
    let path = resolve(model_dir, filename)?;
    let raw = fs::read_to_string(&path).map_err(|source| ArtifactError::Io {
        filename: filename.to_string(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| ArtifactError::Parse {
        filename: filename.to_string(),
        source,
    })
}

fn load_classifier(model_dir: &Path, filename: &str) -> Result<ClassifierModel, ArtifactError> {
    let artifact: ModelArtifact = read_json(model_dir, filename)?;
    ClassifierModel::from_artifact(artifact).map_err(|source| ArtifactError::Invalid {
        filename: filename.to_string(),
        source,
    })
}

fn load_encoder(model_dir: &Path, filename: &str) -> Result<LabelEncoder, ArtifactError> {
    let encoder: LabelEncoder = read_json(model_dir, filename)?;
    if encoder.is_empty() {
        return Err(ArtifactError::EmptyVocabulary {
            filename: filename.to_string(),
        });
    }
    Ok(encoder)
}

/// Load the complete artifact set into ready-to-serve application state.
pub fn load_artifacts(model_dir: &Path) -> Result<AppState, ArtifactError> {
    info!(model_dir = %model_dir.display(), "Loading ML artifacts");

    let risk_model = load_classifier(model_dir, RISK_MODEL_FILE)?;
    let department_model = load_classifier(model_dir, DEPARTMENT_MODEL_FILE)?;
    let gender_encoder = load_encoder(model_dir, GENDER_ENCODER_FILE)?;
    let symptom_encoder = load_encoder(model_dir, SYMPTOM_ENCODER_FILE)?;
    let pre_existing_encoder = load_encoder(model_dir, PRE_EXISTING_ENCODER_FILE)?;

    info!(
        risk_model = risk_model.type_name(),
        risk_trees = risk_model.tree_count(),
        department_model = department_model.type_name(),
        department_trees = department_model.tree_count(),
        symptom_vocabulary = symptom_encoder.len(),
        "All artifacts loaded successfully"
    );

    Ok(AppState {
        risk_model,
        department_model,
        gender_encoder,
        symptom_encoder,
        pre_existing_encoder,
    })
}
