//! Predict payload validation.
//!
//! Presence checking runs over the raw JSON object rather than a derived
//! deserializer so the response can name exactly the first missing field, in
//! contract order, as a 400. Only after every field is present are values
//! extracted; a present field with the wrong shape is a value error, which
//! surfaces as a 500 on the wire.

use serde_json::{Map, Value};

use crate::errors::PredictError;
use crate::models::Observation;

/// Required payload fields in contract order; the first missing one names
/// the 400 response.
pub const REQUIRED_FIELDS: [&str; 8] = [
    "age",
    "gender",
    "systolicBP",
    "diastolicBP",
    "heartRate",
    "temperature",
    "symptoms",
    "preExisting",
];

/// Validate the predict body and build an [`Observation`].
pub fn parse_observation(body: &Value) -> Result<Observation, PredictError> {
    let data = body.as_object().ok_or_else(|| {
        PredictError::MalformedBody("request body must be a JSON object".to_string())
    })?;

    for field in REQUIRED_FIELDS {
        if !data.contains_key(field) {
            return Err(PredictError::MissingField(field));
        }
    }

    Ok(Observation {
        age: number(data, "age")?,
        gender: text(data, "gender")?,
        systolic_bp: number(data, "systolicBP")?,
        diastolic_bp: number(data, "diastolicBP")?,
        heart_rate: number(data, "heartRate")?,
        temperature: number(data, "temperature")?,
        symptoms: string_list(data, "symptoms")?,
        pre_existing: text(data, "preExisting")?,
    })
}

fn number(data: &Map<String, Value>, field: &'static str) -> Result<f64, PredictError> {
    data.get(field)
        .and_then(Value::as_f64)
        .ok_or(PredictError::InvalidValue { field })
}

fn text(data: &Map<String, Value>, field: &'static str) -> Result<String, PredictError> {
    data.get(field)
        .and_then(Value::as_str)
        .map(str::to_owned)
        .ok_or(PredictError::InvalidValue { field })
}

fn string_list(data: &Map<String, Value>, field: &'static str) -> Result<Vec<String>, PredictError> {
    let items = data
        .get(field)
        .and_then(Value::as_array)
        .ok_or(PredictError::InvalidValue { field })?;
    items
        .iter()
        .map(|item| {
            item.as_str()
                .map(str::to_owned)
                .ok_or(PredictError::InvalidValue { field })
        })
        .collect()
}
