use std::str::FromStr;

use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::de::DeserializeOwned;
use serde_json::json;

use barstock_core::DomainError;
use barstock_infra::services::ServiceError;

pub fn service_error_to_response(err: ServiceError) -> Response {
    match err {
        ServiceError::Domain(e) => domain_error_to_response(e),
        ServiceError::Store(e) => {
            tracing::error!(error = %e, "store operation failed");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "store_error", e.to_string())
        }
        ServiceError::PartialApply {
            step,
            record_id,
            source,
        } => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "error": "partial_apply",
                "message": format!("analysis {record_id} was saved but {step} failed: {source}"),
                "step": step.as_str(),
                "recordId": record_id.to_string(),
            })),
        )
            .into_response(),
    }
}

pub fn domain_error_to_response(err: DomainError) -> Response {
    match err {
        DomainError::Validation(msg) => json_error(StatusCode::BAD_REQUEST, "validation_error", msg),
        DomainError::InvalidId(msg) => json_error(StatusCode::BAD_REQUEST, "invalid_id", msg),
        DomainError::InvariantViolation(msg) => {
            json_error(StatusCode::UNPROCESSABLE_ENTITY, "invariant_violation", msg)
        }
        DomainError::NotFound(kind) => {
            json_error(StatusCode::NOT_FOUND, "not_found", format!("{kind} not found"))
        }
        DomainError::Conflict(msg) => json_error(StatusCode::CONFLICT, "conflict", msg),
    }
}

pub fn json_error(status: StatusCode, code: &'static str, message: impl Into<String>) -> Response {
    (
        status,
        Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

/// Parse a path id, answering 400 on malformed input.
pub fn parse_id<T: FromStr>(raw: &str, what: &str) -> Result<T, Response> {
    raw.parse()
        .map_err(|_| json_error(StatusCode::BAD_REQUEST, "invalid_id", format!("invalid {what} id")))
}

/// Unwrap a JSON body, answering 400 with the standard error body on rejection.
pub fn body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, Response> {
    payload
        .map(|Json(v)| v)
        .map_err(|e| json_error(StatusCode::BAD_REQUEST, "invalid_body", e.body_text()))
}

/// Parse a body that may be omitted. Empty (or whitespace-only) means `None`;
/// anything else must be valid JSON for `T`.
pub fn optional_body<T: DeserializeOwned>(raw: &[u8]) -> Result<Option<T>, Response> {
    if raw.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    serde_json::from_slice(raw)
        .map(Some)
        .map_err(|e| json_error(StatusCode::BAD_REQUEST, "invalid_body", e.to_string()))
}

pub fn query<T>(q: Result<axum::extract::Query<T>, QueryRejection>) -> Result<T, Response> {
    q.map(|axum::extract::Query(v)| v)
        .map_err(|e| json_error(StatusCode::BAD_REQUEST, "invalid_query", e.body_text()))
}
