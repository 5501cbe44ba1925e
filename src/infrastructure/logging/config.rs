//! Logging configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::domain::models::Environment;

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// Log level override (trace, debug, info, warn, error).
    /// Unset means `info` in production and `debug` elsewhere.
    #[serde(default)]
    pub level: Option<String>,

    /// Output format (json, pretty)
    #[serde(default = "default_format")]
    pub format: LogFormat,

    /// Directory for log files (optional, if None logs only to stdout)
    #[serde(default)]
    pub log_dir: Option<PathBuf>,

    /// Enable stdout logging
    #[serde(default = "default_true")]
    pub enable_stdout: bool,

    /// Log rotation policy
    #[serde(default)]
    pub rotation: RotationPolicy,
}

/// Line format for log output.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// One JSON object per line, for collectors.
    Json,
    /// Human-readable multi-line output.
    Pretty,
}

/// When the log file rolls over.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RotationPolicy {
    /// New file each day.
    #[default]
    Daily,
    /// New file each hour.
    Hourly,
    /// Single file, never rotated.
    Never,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: None,
            format: default_format(),
            log_dir: None,
            enable_stdout: true,
            rotation: RotationPolicy::default(),
        }
    }
}

impl LogConfig {
    /// Level to use when `RUST_LOG` does not say otherwise.
    pub fn effective_level(&self, environment: Environment) -> &str {
        match &self.level {
            Some(level) => level,
            None if environment.is_production() => "info",
            None => "debug",
        }
    }
}

const fn default_format() -> LogFormat {
    LogFormat::Json
}

const fn default_true() -> bool {
    true
}
