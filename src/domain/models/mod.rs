//! Domain models.

pub mod config;

pub use config::{redact_url, AppConfig, BrokerAddress, ConfigSummary, Environment};
