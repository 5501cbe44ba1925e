//! HTTP listener.

use std::future::{Future, IntoFuture};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::body::Body;
use axum::error_handling::HandleErrorLayer;
use axum::http::Request;
use axum::{middleware, BoxError, Router};
use tokio::net::TcpListener;
use tokio::signal;
use tokio::sync::oneshot;
use tower::timeout::error::Elapsed;
use tower::timeout::TimeoutLayer;
use tower::ServiceBuilder;
use tower_http::trace::{DefaultOnResponse, TraceLayer};
use tracing::{info, warn, Level};

use super::boundary::exception_boundary;
use super::error::{ApiError, HttpError};
use super::middleware::{access_log, propagate_request_id, RequestId};
use super::routes::api_routes;
use crate::domain::models::{AppConfig, Environment};
use crate::infrastructure::config::HttpSettings;
use crate::SERVICE_NAME;

/// Wrap `router` in the request pipeline.
///
/// Order, outermost first: request id, trace span, access log, exception
/// boundary, timeout. The span carries the service name and environment so
/// every record emitted while handling the request is tagged with them.
pub fn with_request_pipeline(
    router: Router,
    environment: Environment,
    request_timeout: Duration,
) -> Router {
    let trace = TraceLayer::new_for_http()
        .make_span_with(move |request: &Request<Body>| {
            let request_id = request
                .extensions()
                .get::<RequestId>()
                .map_or("-", RequestId::as_str);
            tracing::info_span!(
                "request",
                service = SERVICE_NAME,
                env = %environment,
                request_id = %request_id,
                method = %request.method(),
                path = %request.uri().path(),
            )
        })
        .on_request(())
        .on_response(DefaultOnResponse::new().level(Level::DEBUG))
        .on_failure(());

    router.layer(
        ServiceBuilder::new()
            .layer(middleware::from_fn(propagate_request_id))
            .layer(trace)
            .layer(middleware::from_fn(access_log))
            .layer(middleware::from_fn(exception_boundary))
            .layer(HandleErrorLayer::new(handle_timeout))
            .layer(TimeoutLayer::new(request_timeout)),
    )
}

/// Turn a timed-out request into the canonical 408 body.
async fn handle_timeout(err: BoxError) -> ApiError {
    if err.is::<Elapsed>() {
        HttpError::request_timeout().into()
    } else {
        anyhow::anyhow!("request pipeline failed: {err}").into()
    }
}

/// HTTP server bound to the validated port.
pub struct HttpServer {
    config: Arc<AppConfig>,
    settings: HttpSettings,
}

impl HttpServer {
    /// Server for a validated config. Nothing is bound until it is served.
    pub const fn new(config: Arc<AppConfig>, settings: HttpSettings) -> Self {
        Self { config, settings }
    }

    /// Build the router.
    pub fn router(&self) -> Router {
        with_request_pipeline(
            api_routes(Arc::clone(&self.config)),
            self.config.environment(),
            self.settings.request_timeout(),
        )
    }

    /// Start the server with a shutdown signal.
    pub async fn serve_with_shutdown<F>(self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let router = self.router();
        let host = self.settings.host.as_str();
        let port = self.config.port();

        let listener = TcpListener::bind((host, port))
            .await
            .with_context(|| format!("failed to bind {host}:{port}"))?;

        info!(address = %listener.local_addr()?, "HTTP server listening");

        let grace = self.settings.shutdown_grace();
        let (signalled_tx, signalled_rx) = oneshot::channel::<()>();
        let shutdown = async move {
            shutdown.await;
            let _ = signalled_tx.send(());
        };

        let server = axum::serve(listener, router)
            .with_graceful_shutdown(shutdown)
            .into_future();

        // In-flight requests get `grace` to finish once the signal fires
        let grace_expired = async move {
            if signalled_rx.await.is_err() {
                std::future::pending::<()>().await;
            }
            tokio::time::sleep(grace).await;
        };

        tokio::select! {
            result = server => result.context("HTTP server failed")?,
            () = grace_expired => warn!(
                grace_secs = grace.as_secs(),
                "graceful shutdown timed out, dropping open connections"
            ),
        }

        info!("HTTP server stopped");
        Ok(())
    }
}

/// Resolves on Ctrl+C or SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            warn!(error = %err, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                warn!(error = %err, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Received Ctrl+C, shutting down"),
        () = terminate => info!("Received SIGTERM, shutting down"),
    }
}
