//! Feature vector assembly.

use crate::models::Observation;

/// Width of the feature vector both classifiers were trained on.
pub const FEATURE_COUNT: usize = 8;

/// Build the fixed 8-slot feature vector.
///
/// Slot order is a contract with the pretrained models and must never change:
/// `[age, gender, systolicBP, diastolicBP, heartRate, temperature, symptom,
/// preExisting]`. There is no schema versioning; a reorder breaks model
/// compatibility silently.
pub fn feature_vector(
    obs: &Observation,
    gender_code: usize,
    symptom_code: usize,
    pre_existing_code: usize,
) -> [f64; FEATURE_COUNT] {
    [
        obs.age,
        gender_code as f64,
        obs.systolic_bp,
        obs.diastolic_bp,
        obs.heart_rate,
        obs.temperature,
        symptom_code as f64,
        pre_existing_code as f64,
    ]
}
