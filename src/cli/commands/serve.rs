//! Implementation of the `stock-service serve` command.

use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Arc;
use tracing::{info, Instrument};

use crate::adapters::http::{shutdown_signal, HttpServer};
use crate::domain::models::AppConfig;
use crate::infrastructure::config::SettingsLoader;
use crate::infrastructure::logging::{service_span, LoggerImpl};
use crate::SERVICE_NAME;

/// Build version
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Start logging and the HTTP listener from an already validated config.
///
/// The async runtime is created here, after validation, so nothing networked
/// exists before the configuration is known to be good.
pub fn execute(config: Arc<AppConfig>, settings_path: Option<&Path>) -> Result<()> {
    let settings = SettingsLoader::load(settings_path)?;
    let logger = LoggerImpl::init(&settings.logging, config.environment())?;
    let root = service_span(config.environment());
    root.in_scope(|| logger.log_startup());

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;

    runtime.block_on(
        async move {
            info!(
                version = VERSION,
                port = config.port(),
                brokers = config.kafka_brokers().len(),
                pid = std::process::id(),
                "Starting {SERVICE_NAME}"
            );
            info!(config = ?config.summary(), "configuration loaded");

            HttpServer::new(config, settings.http)
                .serve_with_shutdown(shutdown_signal())
                .await?;

            info!("Shutdown complete");
            Ok(())
        }
        .instrument(root),
    )
}
