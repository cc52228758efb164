//! Request body validation.
//!
//! The schema-validation collaborator for the handler: mutating requests
//! (POST/PUT/PATCH) with a non-empty body must carry a JSON object, and the
//! matched route may require specific top-level keys. The forwarder itself
//! never validates; failures here become 400 before anything goes upstream.

use std::collections::BTreeMap;

use axum::body::Bytes;
use serde_json::Value;

/// Why a request body was rejected.
#[derive(Debug, PartialEq, Eq)]
pub enum BodyRejection {
    /// Body present but not parseable as JSON.
    NotJson,
    /// Body parsed but the top level is not an object.
    NotAnObject,
    /// Required top-level keys are absent.
    MissingFields(Vec<String>),
}

impl BodyRejection {
    /// Client-facing message for the error envelope.
    pub fn message(&self) -> &'static str {
        match self {
            BodyRejection::NotJson => "request body is not valid JSON",
            BodyRejection::NotAnObject => "request body must be a JSON object",
            BodyRejection::MissingFields(_) => "request body is missing required fields",
        }
    }

    /// Structured field errors for the envelope's `fields` object.
    pub fn field_errors(&self) -> BTreeMap<String, String> {
        match self {
            BodyRejection::MissingFields(fields) => fields
                .iter()
                .map(|f| (f.clone(), "required".to_string()))
                .collect(),
            _ => BTreeMap::new(),
        }
    }
}

/// Check a mutating request body against the route's requirements.
pub fn validate_body(required_fields: &[String], body: &Bytes) -> Result<(), BodyRejection> {
    if body.is_empty() {
        if required_fields.is_empty() {
            return Ok(());
        }
        return Err(BodyRejection::MissingFields(required_fields.to_vec()));
    }

    let value: Value = serde_json::from_slice(body).map_err(|_| BodyRejection::NotJson)?;
    let object = value.as_object().ok_or(BodyRejection::NotAnObject)?;

    let missing: Vec<String> = required_fields
        .iter()
        .filter(|f| !object.contains_key(f.as_str()))
        .cloned()
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(BodyRejection::MissingFields(missing))
    }
}
