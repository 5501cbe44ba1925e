//! Request id propagation and access logging.

use std::time::Instant;

use axum::extract::Request;
use axum::http::{HeaderMap, HeaderName, HeaderValue};
use axum::middleware::Next;
use axum::response::Response;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::infrastructure::logging::redact_headers;

/// Header carrying the request id in both directions.
pub static REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

/// Correlation id of the current request, stored in request extensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestId(String);

impl RequestId {
    /// Reuse the caller's id when present and non-blank, otherwise mint one.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let supplied = headers
            .get(&REQUEST_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty());

        match supplied {
            Some(id) => Self(id.to_string()),
            None => Self::generate(),
        }
    }

    /// Fresh UUID v4 id.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// The id as sent in the response header.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Attach a [`RequestId`] to the request and echo it on the response.
pub async fn propagate_request_id(mut request: Request, next: Next) -> Response {
    let request_id = RequestId::from_headers(request.headers());
    request.extensions_mut().insert(request_id.clone());

    let mut response = next.run(request).await;
    if let Ok(value) = HeaderValue::from_str(request_id.as_str()) {
        response
            .headers_mut()
            .insert(REQUEST_ID_HEADER.clone(), value);
    }
    response
}

/// One record per request, leveled by response status.
pub async fn access_log(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    debug!(headers = ?redact_headers(request.headers()), "request received");

    let started = Instant::now();
    let response = next.run(request).await;
    let latency_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
    let status = response.status();

    if status.is_server_error() {
        error!(%method, %path, status = status.as_u16(), latency_ms, "request completed");
    } else if status.is_client_error() {
        warn!(%method, %path, status = status.as_u16(), latency_ms, "request completed");
    } else {
        info!(%method, %path, status = status.as_u16(), latency_ms, "request completed");
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supplied_id_is_trimmed_and_reused() {
        let mut headers = HeaderMap::new();
        headers.insert(&REQUEST_ID_HEADER, HeaderValue::from_static("  abc-123  "));
        assert_eq!(RequestId::from_headers(&headers).as_str(), "abc-123");
    }

    #[test]
    fn test_blank_id_is_replaced() {
        let mut headers = HeaderMap::new();
        headers.insert(&REQUEST_ID_HEADER, HeaderValue::from_static("   "));
        let id = RequestId::from_headers(&headers);
        assert!(Uuid::parse_str(id.as_str()).is_ok());
    }

    #[test]
    fn test_first_value_wins() {
        let mut headers = HeaderMap::new();
        headers.append(&REQUEST_ID_HEADER, HeaderValue::from_static("first"));
        headers.append(&REQUEST_ID_HEADER, HeaderValue::from_static("second"));
        assert_eq!(RequestId::from_headers(&headers).as_str(), "first");
    }

    #[test]
    fn test_missing_id_is_generated() {
        let a = RequestId::from_headers(&HeaderMap::new());
        let b = RequestId::from_headers(&HeaderMap::new());
        assert_ne!(a, b);
    }
}
