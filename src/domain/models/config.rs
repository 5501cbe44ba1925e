//! Validated service configuration.

use serde::Serialize;
use std::fmt;
use url::Url;

/// Runtime environment the service was started in.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Local work. Logs at `debug` by default.
    Development,
    /// Live deployment. Logs at `info` by default.
    Production,
    /// Automated test runs. Logs at `debug` by default.
    Test,
}

impl Environment {
    /// Accepted spellings, in the order they are reported to the operator.
    pub const NAMES: [&'static str; 3] = ["development", "production", "test"];

    /// Match an already-trimmed name exactly.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "development" => Some(Self::Development),
            "production" => Some(Self::Production),
            "test" => Some(Self::Test),
            _ => None,
        }
    }

    /// Name as spelled in `NODE_ENV`.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Production => "production",
            Self::Test => "test",
        }
    }

    /// Whether this is the live deployment.
    pub const fn is_production(self) -> bool {
        matches!(self, Self::Production)
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One message-broker endpoint.
///
/// Only the broker-list validator can build these. There is intentionally no
/// `FromStr`: once the environment has been validated, brokers travel as typed
/// values and are never parsed from text again.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct BrokerAddress {
    host: String,
    port: u16,
}

impl BrokerAddress {
    pub(crate) const fn new(host: String, port: u16) -> Self {
        Self { host, port }
    }

    /// Host name or address, never empty.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Port in `1..=65535`.
    pub const fn port(&self) -> u16 {
        self.port
    }
}

impl fmt::Display for BrokerAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// Validated service configuration.
///
/// Built once at start-up by [`EnvSchema::validate`] and shared read-only
/// (usually behind an `Arc`) with every component that needs it. The fields are
/// not reachable from outside the crate, so nothing can overwrite them:
///
/// ```compile_fail
/// use stock_service::AppConfig;
///
/// fn retarget(config: &mut AppConfig) {
///     config.port = 8080;
/// }
/// ```
///
/// [`EnvSchema::validate`]: crate::infrastructure::config::EnvSchema::validate
#[derive(Clone)]
pub struct AppConfig {
    pub(crate) port: u16,
    pub(crate) environment: Environment,
    pub(crate) database_url_primary: Url,
    pub(crate) database_url_replica: Url,
    pub(crate) redis_url: Url,
    pub(crate) kafka_brokers: Vec<BrokerAddress>,
    pub(crate) rabbitmq_url: Url,
    pub(crate) otel_collector_endpoint: Url,
}

impl AppConfig {
    /// Port the HTTP listener binds to.
    pub const fn port(&self) -> u16 {
        self.port
    }

    /// Value of `NODE_ENV`.
    pub const fn environment(&self) -> Environment {
        self.environment
    }

    /// Primary (read/write) database.
    pub const fn database_url_primary(&self) -> &Url {
        &self.database_url_primary
    }

    /// Read replica database.
    pub const fn database_url_replica(&self) -> &Url {
        &self.database_url_replica
    }

    /// Cache endpoint.
    pub const fn redis_url(&self) -> &Url {
        &self.redis_url
    }

    /// Kafka bootstrap brokers, in the order they were configured.
    pub fn kafka_brokers(&self) -> &[BrokerAddress] {
        &self.kafka_brokers
    }

    /// Work-queue endpoint.
    pub const fn rabbitmq_url(&self) -> &Url {
        &self.rabbitmq_url
    }

    /// OpenTelemetry collector endpoint.
    pub const fn otel_collector_endpoint(&self) -> &Url {
        &self.otel_collector_endpoint
    }

    /// Printable view with credentials masked.
    pub fn summary(&self) -> ConfigSummary {
        ConfigSummary {
            port: self.port,
            environment: self.environment,
            database_url_primary: redact_url(&self.database_url_primary),
            database_url_replica: redact_url(&self.database_url_replica),
            redis_url: redact_url(&self.redis_url),
            kafka_brokers: self.kafka_brokers.clone(),
            rabbitmq_url: redact_url(&self.rabbitmq_url),
            otel_collector_endpoint: redact_url(&self.otel_collector_endpoint),
        }
    }
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.summary(), f)
    }
}

/// Credential-free rendering of an [`AppConfig`], safe to log or print.
///
/// URL fields have their password replaced by `****`.
#[derive(Debug, Clone, Serialize)]
pub struct ConfigSummary {
    /// HTTP listener port.
    pub port: u16,
    /// Runtime environment.
    pub environment: Environment,
    /// Primary database URL, redacted.
    pub database_url_primary: String,
    /// Replica database URL, redacted.
    pub database_url_replica: String,
    /// Redis URL, redacted.
    pub redis_url: String,
    /// Validated brokers in their first-seen order.
    pub kafka_brokers: Vec<BrokerAddress>,
    /// RabbitMQ URL, redacted.
    pub rabbitmq_url: String,
    /// OpenTelemetry collector endpoint, redacted.
    pub otel_collector_endpoint: String,
}

/// Mask the password component of a URL.
pub fn redact_url(url: &Url) -> String {
    if url.password().is_none() {
        return url.to_string();
    }
    let mut masked = url.clone();
    // Only fails for cannot-be-a-base URLs, which never carry a password.
    if masked.set_password(Some("****")).is_err() {
        return url.to_string();
    }
    masked.to_string()
}
