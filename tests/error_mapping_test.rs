use axum::http::StatusCode;
use triage_service::errors::{AppError, ArtifactError, ModelValidationError, PredictError};

#[test]
fn missing_field_is_the_only_400() {
    let e = AppError::from(PredictError::MissingField("age"));
    assert_eq!(e.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(e.error_type(), "missing_field");
}

#[test]
fn prediction_failures_map_to_500() {
    let e1 = AppError::from(PredictError::MalformedBody("body must be an object".into()));
    let e2 = AppError::from(PredictError::InvalidValue { field: "systolicBP" });
    let e3 = AppError::from(PredictError::Inference {
        reason: "walk failed".into(),
    });
    let e4 = AppError::internal("artifact state poisoned");
    assert_eq!(e1.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(e2.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(e3.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(e4.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[test]
fn error_types_label_each_variant() {
    assert_eq!(
        AppError::from(PredictError::MalformedBody("x".into())).error_type(),
        "malformed_body"
    );
    assert_eq!(
        AppError::from(PredictError::InvalidValue { field: "gender" }).error_type(),
        "invalid_value"
    );
    assert_eq!(
        AppError::from(PredictError::Inference { reason: "x".into() }).error_type(),
        "inference_error"
    );
    assert_eq!(AppError::internal("x").error_type(), "internal_error");
}

#[test]
fn wire_messages_match_the_contract() {
    // The 400 message format is load-bearing; the frontend matches on it.
    assert_eq!(
        PredictError::MissingField("preExisting").to_string(),
        "Missing field: preExisting"
    );
    assert_eq!(
        PredictError::InvalidValue { field: "heartRate" }.to_string(),
        "Invalid value for field: heartRate"
    );
    // Malformed-body messages pass through verbatim.
    assert_eq!(
        PredictError::MalformedBody("request body must be a JSON object".into()).to_string(),
        "request body must be a JSON object"
    );
}

#[test]
fn artifact_errors_name_their_file() {
    let e = ArtifactError::NotFound {
        filename: "risk_model.json".into(),
        model_dir: "/srv/models".into(),
    };
    let text = e.to_string();
    assert!(text.contains("risk_model.json"));
    assert!(text.contains("/srv/models"));
}

#[test]
fn validation_errors_pinpoint_the_node() {
    let e = ModelValidationError::LeafArity {
        tree: 2,
        node: 7,
        got: 2,
        expected: 3,
    };
    assert_eq!(
        e.to_string(),
        "tree 2 node 7 carries 2 class probabilities, expected 3"
    );

    let e = ModelValidationError::FeatureOutOfRange {
        tree: 0,
        node: 3,
        feature: 11,
        limit: 8,
    };
    assert_eq!(
        e.to_string(),
        "tree 0 node 3 splits on feature 11, expected index below 8"
    );
}
