//! HTTP listener, request pipeline and exception boundary.

pub mod boundary;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod server;

pub use boundary::{catch, exception_boundary, Fault, RequestContext, ResponseState};
pub use error::{ApiError, HttpError};
pub use middleware::{RequestId, REQUEST_ID_HEADER};
pub use routes::{api_routes, HealthResponse};
pub use server::{shutdown_signal, with_request_pipeline, HttpServer};
