//! The prediction pipeline: one validated observation in, one full triage
//! assessment out.

use crate::encoder::primary_symptom;
use crate::errors::PredictError;
use crate::factors::contributing_factors;
use crate::features::{feature_vector, FEATURE_COUNT};
use crate::models::{AppState, ModelInfoBlock, Observation, PredictResponse};

/// Run both classifiers and the factor rules over one observation.
///
/// Categorical encoding never fails; unknown labels take the index-0
/// fallback. The risk model drives three response fields at once: the risk
/// label, the score/confidence pair, and the advertised model type.
pub fn run_prediction(
    state: &AppState,
    obs: &Observation,
) -> Result<PredictResponse, PredictError> {
    let gender_code = state.gender_encoder.encode_or_default("gender", &obs.gender);
    let symptom_code = state
        .symptom_encoder
        .encode_or_default("symptoms", primary_symptom(&obs.symptoms));
    let pre_existing_code = state
        .pre_existing_encoder
        .encode_or_default("preExisting", &obs.pre_existing);

    let x = feature_vector(obs, gender_code, symptom_code, pre_existing_code);

    let risk = state.risk_model.classify(&x)?;
    let department = state.department_model.classify(&x)?;

    let factors = contributing_factors(obs);

    // riskScore and confidence carry the same number; both are the top risk
    // probability as a percentage. The duplication is a wire contract.
    let risk_score = risk.top_probability * 100.0;

    Ok(PredictResponse {
        risk: risk.label,
        risk_score,
        risk_probabilities: risk.probabilities,
        confidence: risk_score,
        department: department.label,
        department_probabilities: department.probabilities,
        department_confidence: department.top_probability * 100.0,
        factors,
        model_info: ModelInfoBlock {
            model_type: state.risk_model.type_name().to_string(),
            using_ensemble: state.risk_model.is_ensemble(),
            features_used: FEATURE_COUNT,
        },
        ml_used: true,
        model_type: state.risk_model.type_name().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::{ClassifierModel, DecisionTree, ModelArtifact, TreeNode};
    use crate::encoder::LabelEncoder;

    fn model(model_type: &str, classes: &[&str], trees: Vec<DecisionTree>) -> ClassifierModel {
        ClassifierModel::from_artifact(ModelArtifact {
            model_type: model_type.to_string(),
            n_features: FEATURE_COUNT,
            classes: classes.iter().map(|c| c.to_string()).collect(),
            trained_at: None,
            trees,
        })
        .expect("test artifact is valid")
    }

    fn encoder(classes: &[&str]) -> LabelEncoder {
        LabelEncoder {
            classes: classes.iter().map(|c| c.to_string()).collect(),
        }
    }

    /// Risk model splits on the symptom slot: code <= 0.5 goes Low, else
    /// High. Department model always answers Emergency.
    fn state() -> AppState {
        let risk_tree = DecisionTree {
            nodes: vec![
                TreeNode::Split {
                    feature: 6,
                    threshold: 0.5,
                    left: 1,
                    right: 2,
                },
                TreeNode::Leaf {
                    probabilities: vec![0.1, 0.8, 0.1],
                },
                TreeNode::Leaf {
                    probabilities: vec![0.7, 0.1, 0.2],
                },
            ],
        };
        let dept_tree = DecisionTree {
            nodes: vec![TreeNode::Leaf {
                probabilities: vec![0.75, 0.25],
            }],
        };
        AppState {
            risk_model: model("RandomForestClassifier", &["High", "Low", "Medium"], vec![risk_tree]),
            department_model: model(
                "GradientBoostingClassifier",
                &["Emergency", "General Medicine"],
                vec![dept_tree],
            ),
            gender_encoder: encoder(&["Female", "Male"]),
            symptom_encoder: encoder(&["Chest Pain", "Cough"]),
            pre_existing_encoder: encoder(&["Diabetes", "No History"]),
        }
    }

    fn observation() -> Observation {
        Observation {
            age: 35.0,
            gender: "Male".to_string(),
            systolic_bp: 120.0,
            diastolic_bp: 80.0,
            heart_rate: 75.0,
            temperature: 37.0,
            symptoms: vec!["Cough".to_string()],
            pre_existing: "No History".to_string(),
        }
    }

    #[test]
    fn response_carries_both_classifiers_and_the_contract_fields() {
        let state = state();
        let response = run_prediction(&state, &observation()).expect("prediction succeeds");

        // Cough encodes to 1, so the risk tree takes the right branch.
        assert_eq!(response.risk, "High");
        assert!((response.risk_score - 70.0).abs() < 1e-9);
        assert_eq!(response.confidence, response.risk_score);
        assert_eq!(response.department, "Emergency");
        assert!((response.department_confidence - 75.0).abs() < 1e-9);
        assert!(response.ml_used);
        assert_eq!(response.model_type, "RandomForestClassifier");
        assert_eq!(response.model_info.model_type, "RandomForestClassifier");
        assert!(response.model_info.using_ensemble);
        assert_eq!(response.model_info.features_used, FEATURE_COUNT);
        assert!(response.factors.is_empty());

        let risk_keys: Vec<&str> = response
            .risk_probabilities
            .keys()
            .map(String::as_str)
            .collect();
        assert_eq!(risk_keys, ["High", "Low", "Medium"]);
    }

    #[test]
    fn unknown_categories_still_predict() {
        let state = state();
        let mut obs = observation();
        obs.gender = "Unspecified".to_string();
        obs.pre_existing = "None".to_string();
        let response = run_prediction(&state, &obs).expect("fallback keeps the request alive");
        assert!(response.ml_used);
    }

    #[test]
    fn empty_symptom_list_behaves_like_cough() {
        let state = state();
        let mut obs = observation();
        obs.symptoms.clear();
        let response = run_prediction(&state, &obs).expect("prediction succeeds");
        // The default primary symptom encodes to Cough's code, steering the
        // risk tree to the same branch an explicit Cough takes.
        assert_eq!(response.risk, "High");
    }

    #[test]
    fn factors_ride_along_with_the_model_output() {
        let state = state();
        let mut obs = observation();
        obs.age = 70.0;
        let response = run_prediction(&state, &obs).expect("prediction succeeds");
        assert_eq!(response.factors.len(), 1);
        assert_eq!(response.factors[0].name, "Age > 65 years");
    }
}
