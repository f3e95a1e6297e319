//! Closed-vocabulary label encoders with the index-0 unknown fallback.

use serde::{Deserialize, Serialize};

use crate::metrics::TriageMetricsHelper;

/// Substituted when the submitted symptom sequence is empty.
pub const DEFAULT_SYMPTOM: &str = "Cough";

/// A label encoder artifact: a closed vocabulary whose position is the code.
///
/// Vocabularies are stored sorted (the convention of the training pipeline
/// that produced them), so class 0 is the alphabetically first label.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelEncoder {
    pub classes: Vec<String>,
}

impl LabelEncoder {
    /// Exact vocabulary lookup.
    pub fn transform(&self, label: &str) -> Option<usize> {
        self.classes.iter().position(|c| c == label)
    }

    /// Lookup with the silent unknown fallback: labels outside the vocabulary
    /// encode to 0 rather than failing the request. The fallback is counted
    /// per field for observability.
    pub fn encode_or_default(&self, field: &'static str, label: &str) -> usize {
        match self.transform(label) {
            Some(code) => code,
            None => {
                tracing::debug!(field, label, "label outside vocabulary, encoding as 0");
                TriageMetricsHelper::record_encoder_fallback(field);
                0
            }
        }
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

/// Only the first submitted symptom participates in feature encoding; an
/// empty sequence falls back to [`DEFAULT_SYMPTOM`].
pub fn primary_symptom(symptoms: &[String]) -> &str {
    symptoms.first().map_or(DEFAULT_SYMPTOM, String::as_str)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encoder() -> LabelEncoder {
        LabelEncoder {
            classes: vec!["Female".to_string(), "Male".to_string()],
        }
    }

    #[test]
    fn transform_finds_known_labels() {
        let le = encoder();
        assert_eq!(le.transform("Female"), Some(0));
        assert_eq!(le.transform("Male"), Some(1));
        assert_eq!(le.transform("Other"), None);
    }

    #[test]
    fn unknown_labels_encode_to_zero() {
        let le = encoder();
        assert_eq!(le.encode_or_default("gender", "Nonbinary"), 0);
        assert_eq!(le.encode_or_default("gender", "Male"), 1);
    }

    #[test]
    fn lookup_is_case_sensitive() {
        let le = encoder();
        assert_eq!(le.encode_or_default("gender", "male"), 0);
    }

    #[test]
    fn primary_symptom_takes_first_entry() {
        let symptoms = vec!["Chest Pain".to_string(), "Cough".to_string()];
        assert_eq!(primary_symptom(&symptoms), "Chest Pain");
    }

    #[test]
    fn empty_symptoms_default_to_cough() {
        assert_eq!(primary_symptom(&[]), DEFAULT_SYMPTOM);
    }
}
