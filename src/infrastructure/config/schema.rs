//! Environment schema: raw snapshot in, [`AppConfig`] out.

use url::Url;

use super::brokers::{coerce_port, validate_broker_list};
use super::issues::{Issues, ValidationErrors};
use super::snapshot::EnvSnapshot;
use crate::domain::models::{AppConfig, Environment};

/// Recognised variable names.
pub mod vars {
    /// HTTP listener port.
    pub const PORT: &str = "PORT";
    /// One of `development`, `production`, `test`.
    pub const NODE_ENV: &str = "NODE_ENV";
    /// Primary database URL.
    pub const DATABASE_URL_PRIMARY: &str = "DATABASE_URL_PRIMARY";
    /// Read replica database URL.
    pub const DATABASE_URL_REPLICA: &str = "DATABASE_URL_REPLICA";
    /// Redis URL.
    pub const REDIS_URL: &str = "REDIS_URL";
    /// Comma-separated `host:port` list.
    pub const KAFKA_BROKERS: &str = "KAFKA_BROKERS";
    /// RabbitMQ URL.
    pub const RABBITMQ_URL: &str = "RABBITMQ_URL";
    /// OpenTelemetry collector endpoint.
    pub const OTEL_COLLECTOR_ENDPOINT: &str = "OTEL_COLLECTOR_ENDPOINT";

    /// Every variable the schema reads, in validation order.
    pub const ALL: [&str; 8] = [
        PORT,
        NODE_ENV,
        DATABASE_URL_PRIMARY,
        DATABASE_URL_REPLICA,
        REDIS_URL,
        KAFKA_BROKERS,
        RABBITMQ_URL,
        OTEL_COLLECTOR_ENDPOINT,
    ];
}

/// Validates an [`EnvSnapshot`] into an [`AppConfig`].
///
/// Every field validator runs regardless of earlier failures, so one call
/// reports every problem in the environment. Variables the schema does not
/// know are ignored.
pub struct EnvSchema;

impl EnvSchema {
    /// Validate `env` into an [`AppConfig`], or report every issue found.
    pub fn validate(env: &EnvSnapshot) -> Result<AppConfig, ValidationErrors> {
        let mut issues = Issues::default();

        let port = port_field(env, vars::PORT, &mut issues);
        let environment = environment_field(env, vars::NODE_ENV, &mut issues);
        let database_url_primary = url_field(env, vars::DATABASE_URL_PRIMARY, &mut issues);
        let database_url_replica = url_field(env, vars::DATABASE_URL_REPLICA, &mut issues);
        let redis_url = url_field(env, vars::REDIS_URL, &mut issues);
        let kafka_brokers =
            validate_broker_list(vars::KAFKA_BROKERS, env.get(vars::KAFKA_BROKERS), &mut issues);
        let rabbitmq_url = url_field(env, vars::RABBITMQ_URL, &mut issues);
        let otel_collector_endpoint = url_field(env, vars::OTEL_COLLECTOR_ENDPOINT, &mut issues);

        match (
            port,
            environment,
            database_url_primary,
            database_url_replica,
            redis_url,
            kafka_brokers,
            rabbitmq_url,
            otel_collector_endpoint,
        ) {
            (
                Some(port),
                Some(environment),
                Some(database_url_primary),
                Some(database_url_replica),
                Some(redis_url),
                Some(kafka_brokers),
                Some(rabbitmq_url),
                Some(otel_collector_endpoint),
            ) if issues.is_empty() => Ok(AppConfig {
                port,
                environment,
                database_url_primary,
                database_url_replica,
                redis_url,
                kafka_brokers,
                rabbitmq_url,
                otel_collector_endpoint,
            }),
            _ => Err(issues.into_errors()),
        }
    }
}

fn required<'a>(env: &'a EnvSnapshot, key: &str, issues: &mut Issues) -> Option<&'a str> {
    let value = env.get(key);
    if value.is_none() {
        issues.field(key, format!("{key} is required"));
    }
    value
}

fn port_field(env: &EnvSnapshot, key: &str, issues: &mut Issues) -> Option<u16> {
    let raw = required(env, key, issues)?;
    match coerce_port(raw) {
        Ok(port) => Some(port),
        Err(err) => {
            issues.field(key, err.to_string());
            None
        }
    }
}

fn environment_field(env: &EnvSnapshot, key: &str, issues: &mut Issues) -> Option<Environment> {
    let raw = required(env, key, issues)?;
    let environment = Environment::from_name(raw.trim());
    if environment.is_none() {
        issues.field(
            key,
            format!("{key} must be one of: {}", Environment::NAMES.join(", ")),
        );
    }
    environment
}

/// The raw value is left out of messages: connection URLs carry credentials.
fn url_field(env: &EnvSnapshot, key: &str, issues: &mut Issues) -> Option<Url> {
    let raw = required(env, key, issues)?;
    match Url::parse(raw) {
        Ok(url) if url.host_str().is_some_and(|host| !host.is_empty()) => Some(url),
        Ok(_) => {
            issues.field(key, "Invalid URL: a host is required");
            None
        }
        Err(err) => {
            issues.field(key, format!("Invalid URL: {err}"));
            None
        }
    }
}
