//! API error envelope and status mapping.
//!
//! Every 4xx/5xx response carries the same JSON envelope. The `path` field is
//! filled in by [`attach_error_path`]: `IntoResponse` stashes the envelope in
//! the response extensions, and the middleware rebuilds the body with the
//! request path once it is known.

use axum::extract::{OriginalUri, Request};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use billfold_core::errors::{Error, ValidationError};

pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// Wrapper turning a domain error into an HTTP response.
#[derive(Debug)]
pub struct ApiError(pub Error);

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        Self(err)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorEnvelope {
    pub timestamp: DateTime<Utc>,
    pub status: u16,
    pub error: String,
    pub message: String,
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_errors: Option<Vec<FieldError>>,
}

/// Field-level details for validation failures. Validation messages follow
/// the `"field: reason"` convention; anything else stays envelope-only.
fn field_errors(validation: &ValidationError) -> Option<Vec<FieldError>> {
    match validation {
        ValidationError::InvalidInput(msg) => msg.split_once(": ").map(|(field, message)| {
            vec![FieldError {
                field: field.to_string(),
                message: message.to_string(),
            }]
        }),
        ValidationError::MissingField(field) => Some(vec![FieldError {
            field: field.clone(),
            message: "is required".to_string(),
        }]),
        _ => None,
    }
}

fn classify(err: &Error) -> (StatusCode, &'static str, String, Option<Vec<FieldError>>) {
    match err {
        Error::Validation(v) => (
            StatusCode::BAD_REQUEST,
            "Validation Failed",
            v.to_string(),
            field_errors(v),
        ),
        Error::InvalidTransfer(_) => (
            StatusCode::BAD_REQUEST,
            "Invalid Transfer",
            err.to_string(),
            None,
        ),
        Error::UnsupportedCurrency(_) => (
            StatusCode::BAD_REQUEST,
            "Unsupported Currency",
            err.to_string(),
            None,
        ),
        Error::WalletNotFound(_) | Error::NotFound(_) => {
            (StatusCode::NOT_FOUND, "Not Found", err.to_string(), None)
        }
        Error::InvalidStateTransition { .. } => (
            StatusCode::CONFLICT,
            "Invalid State Transition",
            err.to_string(),
            None,
        ),
        Error::Conflict(_) => (StatusCode::CONFLICT, "Conflict", err.to_string(), None),
        Error::InsufficientFunds { .. } => (
            StatusCode::UNPROCESSABLE_ENTITY,
            "Insufficient Funds",
            err.to_string(),
            None,
        ),
        Error::Busy(_) => (
            StatusCode::SERVICE_UNAVAILABLE,
            "Busy",
            err.to_string(),
            None,
        ),
        Error::RateUnavailable { .. } => (
            StatusCode::SERVICE_UNAVAILABLE,
            "Rate Unavailable",
            err.to_string(),
            None,
        ),
        Error::Database(_) | Error::Unexpected(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Internal Server Error",
            "An internal error occurred".to_string(),
            None,
        ),
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, name, message, field_errors) = classify(&self.0);
        if status.is_server_error() {
            tracing::error!("request failed: {}", self.0);
        }
        let envelope = ErrorEnvelope {
            timestamp: Utc::now(),
            status: status.as_u16(),
            error: name.to_string(),
            message,
            path: String::new(),
            field_errors,
        };
        let mut response = (status, Json(&envelope)).into_response();
        response.extensions_mut().insert(envelope);
        response
    }
}

/// Rewrites error envelopes with the path of the request that produced them.
pub async fn attach_error_path(request: Request, next: Next) -> Response {
    let path = request
        .extensions()
        .get::<OriginalUri>()
        .map(|uri| uri.path().to_string())
        .unwrap_or_else(|| request.uri().path().to_string());

    let mut response = next.run(request).await;
    if let Some(mut envelope) = response.extensions_mut().remove::<ErrorEnvelope>() {
        envelope.path = path;
        let status = response.status();
        return (status, Json(envelope)).into_response();
    }
    response
}
