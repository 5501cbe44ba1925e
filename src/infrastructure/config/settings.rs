//! Operational settings: HTTP listener and logging.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::infrastructure::logging::LogConfig;

/// Operational settings that are not part of the environment contract.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Settings {
    /// HTTP listener settings
    #[serde(default)]
    pub http: HttpSettings,

    /// Logging settings
    #[serde(default)]
    pub logging: LogConfig,
}

/// HTTP listener settings. The port comes from the validated environment.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct HttpSettings {
    /// Interface to bind
    #[serde(default = "default_host")]
    pub host: String,

    /// Requests running longer than this are answered with 408
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// How long in-flight requests may finish after a shutdown signal
    #[serde(default = "default_shutdown_grace_secs")]
    pub shutdown_grace_secs: u64,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

const fn default_request_timeout_secs() -> u64 {
    30
}

const fn default_shutdown_grace_secs() -> u64 {
    10
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            request_timeout_secs: default_request_timeout_secs(),
            shutdown_grace_secs: default_shutdown_grace_secs(),
        }
    }
}

impl HttpSettings {
    /// Request timeout as a [`Duration`].
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Shutdown grace period as a [`Duration`].
    pub const fn shutdown_grace(&self) -> Duration {
        Duration::from_secs(self.shutdown_grace_secs)
    }
}
