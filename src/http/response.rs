//! Response construction.
//!
//! # Responsibilities
//! - Map routing decisions and service results to HTTP responses
//! - Keep error bodies in one JSON shape: `{ "code": n, "error": "..." }`
//!
//! # Design Decisions
//! - Locale redirects use 302 Found
//! - Service results are JSON; an empty result is 204 No Content
//! - Error codes are stable across releases, messages are not

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::Value;

use crate::routing::MalformedServiceRequest;
use crate::services::ServiceError;

#[derive(Debug, Serialize)]
struct ErrorBody {
    code: u16,
    error: String,
}

fn error_response(status: StatusCode, code: u16, error: String) -> Response {
    (status, Json(ErrorBody { code, error })).into_response()
}

pub fn redirect(destination: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, destination.to_string())]).into_response()
}

pub fn malformed_service(err: &MalformedServiceRequest) -> Response {
    error_response(StatusCode::BAD_REQUEST, err.code(), err.to_string())
}

pub fn service_error(err: &ServiceError) -> Response {
    let status = match err {
        ServiceError::InvalidName(_) => StatusCode::BAD_REQUEST,
        ServiceError::UnknownService(_) | ServiceError::UnknownMethod { .. } => {
            StatusCode::NOT_FOUND
        }
        ServiceError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        ServiceError::Failed(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    error_response(status, err.code(), err.to_string())
}

pub fn service_result(result: Option<Value>) -> Response {
    match result {
        Some(value) => Json(value).into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    }
}
