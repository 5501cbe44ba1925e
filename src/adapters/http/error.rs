//! Handler error types.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::{json, Value};
use thiserror::Error;

use super::boundary::Fault;

/// An expected HTTP error with a declared status and body.
///
/// The body is sent to the client unchanged.
#[derive(Debug, Clone, Error)]
#[error("{status}: {message}")]
pub struct HttpError {
    status: StatusCode,
    message: String,
    body: Value,
}

impl HttpError {
    /// Error with the canonical `{statusCode, message, error}` body.
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        let message = message.into();
        let body = json!({
            "statusCode": status.as_u16(),
            "message": message,
            "error": status.canonical_reason().unwrap_or("Error"),
        });
        Self {
            status,
            message,
            body,
        }
    }

    /// Error with a caller-supplied body.
    pub fn with_body(status: StatusCode, message: impl Into<String>, body: Value) -> Self {
        Self {
            status,
            message: message.into(),
            body,
        }
    }

    /// 404 with the canonical body.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    /// 400 with the canonical body.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    /// Handler did not finish within the request timeout.
    pub fn request_timeout() -> Self {
        let status = StatusCode::REQUEST_TIMEOUT;
        Self::with_body(
            status,
            "Request Timeout",
            json!({"statusCode": status.as_u16(), "message": "Request Timeout"}),
        )
    }

    /// Status the client receives.
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// Message used in logs.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Body the client receives.
    pub const fn body(&self) -> &Value {
        &self.body
    }
}

/// Error returned by request handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Expected failure, answered with its own status and body.
    #[error(transparent)]
    Http(#[from] HttpError),

    /// Anything else. The client only ever sees a generic 500.
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for ApiError {
    /// The fault rides along in the response extensions so the exception
    /// boundary can log it with the request context.
    fn into_response(self) -> Response {
        let fault = match self {
            Self::Http(err) => Fault::Http(err),
            Self::Internal(err) => Fault::Internal(format!("{err:#}")),
        };
        let mut response = fault.response();
        response.extensions_mut().insert(fault);
        response
    }
}
