//! Response construction.
//!
//! One canonical error envelope for every gateway-produced failure:
//! `{"error": <message>}`, plus a `"fields"` object on validation errors.
//! Backend responses never pass through here; they are relayed verbatim.

use std::collections::BTreeMap;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

/// Canonical error envelope.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,

    /// Per-field validation errors, present only on 400 responses.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<BTreeMap<String, String>>,
}

/// Build an error response with the canonical envelope.
pub fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorBody {
            error: message.into(),
            fields: None,
        }),
    )
        .into_response()
}

/// Build a 400 response carrying structured field errors.
pub fn validation_error_response(
    message: impl Into<String>,
    fields: BTreeMap<String, String>,
) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorBody {
            error: message.into(),
            fields: Some(fields),
        }),
    )
        .into_response()
}
