//! Global subscriber installation.

use super::config::{LogConfig, LogFormat, RotationPolicy};
use super::secret_scrubbing::RedactingMakeWriter;
use anyhow::{Context, Result};
use std::io;
use tracing::{Level, Span};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::domain::models::Environment;
use crate::SERVICE_NAME;

/// Base name of rolled log files.
pub const LOG_FILE_NAME: &str = "stock-service.log";

/// Root span for the process. Every record emitted inside it carries the
/// service name and environment.
pub fn service_span(environment: Environment) -> Span {
    tracing::info_span!("service", service = SERVICE_NAME, env = %environment)
}

/// Logger implementation using tracing
pub struct LoggerImpl {
    level: Level,
    format: LogFormat,
    file_output: bool,
    _guard: Option<WorkerGuard>,
}

impl LoggerImpl {
    /// Install the global subscriber.
    ///
    /// Every output goes through [`RedactingMakeWriter`], so credentials are
    /// scrubbed before a line reaches stdout or disk. Keep the returned value
    /// alive for as long as file output should be flushed.
    pub fn init(config: &LogConfig, environment: Environment) -> Result<Self> {
        let default_level = parse_log_level(config.effective_level(environment))?;

        // RUST_LOG still wins when set
        let env_filter = EnvFilter::builder()
            .with_default_directive(LevelFilter::from_level(default_level).into())
            .from_env_lossy();

        let (file_layer, guard) = match &config.log_dir {
            Some(log_dir) => {
                let file_appender = match config.rotation {
                    RotationPolicy::Daily => rolling::daily(log_dir, LOG_FILE_NAME),
                    RotationPolicy::Hourly => rolling::hourly(log_dir, LOG_FILE_NAME),
                    RotationPolicy::Never => rolling::never(log_dir, LOG_FILE_NAME),
                };
                let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);

                // File output is always JSON
                let layer = tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(RedactingMakeWriter::new(non_blocking_file))
                    .with_ansi(false)
                    .with_current_span(true)
                    .with_span_list(true)
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_file(true)
                    .with_line_number(true);
                (Some(layer), Some(guard))
            }
            None => (None, None),
        };

        let stdout_json = (config.enable_stdout && config.format == LogFormat::Json).then(|| {
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(RedactingMakeWriter::new(io::stdout))
                .with_current_span(true)
                .with_span_list(true)
                .with_target(true)
        });

        let stdout_pretty = (config.enable_stdout && config.format == LogFormat::Pretty).then(|| {
            tracing_subscriber::fmt::layer()
                .pretty()
                .with_writer(RedactingMakeWriter::new(io::stdout))
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
        });

        tracing_subscriber::registry()
            .with(env_filter)
            .with(file_layer)
            .with(stdout_json)
            .with(stdout_pretty)
            .try_init()
            .context("failed to install tracing subscriber")?;

        Ok(Self {
            level: default_level,
            format: config.format,
            file_output: config.log_dir.is_some(),
            _guard: guard,
        })
    }

    /// Record the installed outputs. Call inside [`service_span`] so the
    /// record is tagged like every other.
    pub fn log_startup(&self) {
        tracing::info!(
            level = %self.level,
            format = ?self.format,
            file_output = self.file_output,
            "logger initialized"
        );
    }
}

/// Parse log level string to Level
fn parse_log_level(level: &str) -> Result<Level> {
    match level.to_lowercase().as_str() {
        "trace" => Ok(Level::TRACE),
        "debug" => Ok(Level::DEBUG),
        "info" => Ok(Level::INFO),
        "warn" => Ok(Level::WARN),
        "error" => Ok(Level::ERROR),
        _ => anyhow::bail!("Invalid log level: {level}"),
    }
}
