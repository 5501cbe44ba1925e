//! Global exception boundary.
//!
//! Every fault that escapes a handler ends up here: handler errors carried in
//! response extensions, panics, and errors raised while the body is streaming.
//! Each is logged once with the request context. Internal faults are answered
//! with a generic 500 whose body never includes the underlying error; once the
//! response head has gone out, the fault is only logged.

use std::any::Any;
use std::panic::AssertUnwindSafe;

use axum::body::Body;
use axum::extract::Request;
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use futures::FutureExt;
use http_body_util::BodyExt;
use serde_json::json;
use tracing::{debug, error, warn};

use super::error::HttpError;
use super::middleware::RequestId;

/// Something that went wrong while serving a request.
#[derive(Debug, Clone)]
pub enum Fault {
    /// Expected HTTP error, answered as declared.
    Http(HttpError),
    /// Error returned by a handler.
    Internal(String),
    /// Handler panicked.
    Panic(String),
    /// Response body failed mid-stream.
    Stream(String),
}

impl Fault {
    /// Response the client should receive for this fault.
    pub fn response(&self) -> Response {
        match self {
            Self::Http(err) => (err.status(), Json(err.body().clone())).into_response(),
            Self::Internal(_) | Self::Panic(_) | Self::Stream(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "statusCode": 500,
                    "message": "Internal server error",
                })),
            )
                .into_response(),
        }
    }

    fn detail(&self) -> String {
        match self {
            Self::Http(err) => err.to_string(),
            Self::Internal(detail) | Self::Panic(detail) | Self::Stream(detail) => detail.clone(),
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            Self::Http(err) => err.status(),
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Whether the response head has already been written to the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseState {
    /// Nothing sent yet; the boundary may still pick the response.
    Pending,
    /// Status and headers are on the wire.
    HeadersSent,
}

/// Request fields attached to every fault record.
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// Correlation id, `-` when the request id layer did not run.
    pub request_id: String,
    /// HTTP method, e.g. `GET`.
    pub method: String,
    /// Request path without the query string.
    pub path: String,
}

impl RequestContext {
    /// Capture the fields before the request is handed on.
    pub fn from_request(request: &Request) -> Self {
        Self {
            request_id: request
                .extensions()
                .get::<RequestId>()
                .map_or_else(|| "-".to_string(), |id| id.as_str().to_string()),
            method: request.method().to_string(),
            path: request.uri().path().to_string(),
        }
    }
}

/// Log `fault` and decide the response.
///
/// Returns the response to send, or `None` when the head was already sent and
/// nothing may be changed any more.
pub fn catch(ctx: &RequestContext, fault: &Fault, state: ResponseState) -> Option<Response> {
    report(ctx, fault);
    match state {
        ResponseState::Pending => Some(fault.response()),
        ResponseState::HeadersSent => {
            log_untouched(ctx);
            None
        }
    }
}

fn log_untouched(ctx: &RequestContext) {
    debug!(request_id = %ctx.request_id, "response already sent, leaving it untouched");
}

fn report(ctx: &RequestContext, fault: &Fault) {
    let status = fault.status().as_u16();
    if fault.status().is_server_error() {
        error!(
            request_id = %ctx.request_id,
            method = %ctx.method,
            path = %ctx.path,
            status,
            error = %fault.detail(),
            "Unhandled exception"
        );
    } else {
        warn!(
            request_id = %ctx.request_id,
            method = %ctx.method,
            path = %ctx.path,
            status,
            error = %fault.detail(),
            "Request rejected"
        );
    }
}

/// Middleware form of the boundary. Must sit inside the request id layer.
pub async fn exception_boundary(request: Request, next: Next) -> Response {
    let ctx = RequestContext::from_request(&request);

    match AssertUnwindSafe(next.run(request)).catch_unwind().await {
        Ok(mut response) => {
            if let Some(fault) = response.extensions_mut().remove::<Fault>() {
                report(&ctx, &fault);
            }
            guard_body(response, ctx)
        }
        Err(payload) => {
            let fault = Fault::Panic(panic_message(payload.as_ref()));
            catch(&ctx, &fault, ResponseState::Pending)
                .unwrap_or_else(|| StatusCode::INTERNAL_SERVER_ERROR.into_response())
        }
    }
}

/// Report body errors that happen after the head was sent.
fn guard_body(response: Response, ctx: RequestContext) -> Response {
    response.map(|body| {
        Body::new(body.map_err(move |err| {
            report(&ctx, &Fault::Stream(err.to_string()));
            log_untouched(&ctx);
            err
        }))
    })
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|message| (*message).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "handler panicked".to_string())
}
