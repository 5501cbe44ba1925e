//! Environment validation through the public API.

mod common;

use common::{snapshot_with, snapshot_without, valid_vars};
use stock_service::infrastructure::config::vars;
use stock_service::{EnvSchema, EnvSnapshot, Environment, ValidationErrors};

fn messages(errors: &ValidationErrors, path: &str) -> Vec<String> {
    errors.at(path).map(|issue| issue.message.clone()).collect()
}

fn paths(errors: &ValidationErrors) -> Vec<String> {
    errors.issues().iter().map(|issue| issue.path_string()).collect()
}

#[test]
fn test_valid_environment_builds_config() {
    let config = EnvSchema::validate(&snapshot_with(&[])).unwrap();

    assert_eq!(config.port(), 3000);
    assert_eq!(config.environment(), Environment::Production);
    assert!(config.environment().is_production());
    assert_eq!(config.database_url_primary().host_str(), Some("db-primary"));
    assert_eq!(config.database_url_replica().host_str(), Some("db-replica"));
    assert_eq!(config.redis_url().scheme(), "redis");
    assert_eq!(config.rabbitmq_url().scheme(), "amqp");
    assert_eq!(config.otel_collector_endpoint().port(), Some(4318));
}

#[test]
fn test_brokers_parse_in_order() {
    let config = EnvSchema::validate(&snapshot_with(&[(vars::KAFKA_BROKERS, "h1:1,h2:2")])).unwrap();

    let brokers: Vec<(&str, u16)> = config
        .kafka_brokers()
        .iter()
        .map(|broker| (broker.host(), broker.port()))
        .collect();
    assert_eq!(brokers, vec![("h1", 1), ("h2", 2)]);
}

#[test]
fn test_duplicate_broker_anchored_at_second_index() {
    let errors =
        EnvSchema::validate(&snapshot_with(&[(vars::KAFKA_BROKERS, "h1:1,h1:1")])).unwrap_err();

    assert_eq!(paths(&errors), vec!["KAFKA_BROKERS.1"]);
    assert_eq!(
        messages(&errors, "KAFKA_BROKERS.1"),
        vec!["Duplicate broker found: h1:1"]
    );
}

#[test]
fn test_blank_broker_lists_rejected() {
    for raw in ["", "   ", ",", " , , "] {
        let errors =
            EnvSchema::validate(&snapshot_with(&[(vars::KAFKA_BROKERS, raw)])).unwrap_err();
        assert_eq!(
            messages(&errors, "KAFKA_BROKERS"),
            vec!["At least one Kafka broker is required"],
            "{raw:?}"
        );
    }

    let errors = EnvSchema::validate(&snapshot_without(&[vars::KAFKA_BROKERS])).unwrap_err();
    assert_eq!(
        messages(&errors, "KAFKA_BROKERS"),
        vec!["At least one Kafka broker is required"]
    );
}

#[test]
fn test_every_bad_broker_reported_together() {
    let errors = EnvSchema::validate(&snapshot_with(&[(
        vars::KAFKA_BROKERS,
        "h1,h1:abc,h1:70000,:9092",
    )]))
    .unwrap_err();

    assert_eq!(
        paths(&errors),
        vec![
            "KAFKA_BROKERS.0",
            "KAFKA_BROKERS.1",
            "KAFKA_BROKERS.2",
            "KAFKA_BROKERS.3",
        ]
    );
    assert_eq!(
        messages(&errors, "KAFKA_BROKERS.0"),
        vec!["Broker must be in format 'host:port', got: h1"]
    );
    assert_eq!(
        messages(&errors, "KAFKA_BROKERS.1"),
        vec!["Port must be a number, got: abc"]
    );
    assert_eq!(
        messages(&errors, "KAFKA_BROKERS.2"),
        vec!["Port must be between 1 and 65535, got: 70000"]
    );
    assert_eq!(
        messages(&errors, "KAFKA_BROKERS.3"),
        vec!["Broker host cannot be empty: :9092"]
    );
}

#[test]
fn test_port_boundaries_inclusive() {
    for accepted in ["1", "65535"] {
        assert!(EnvSchema::validate(&snapshot_with(&[(vars::PORT, accepted)])).is_ok());
    }
    for (integral, expected) in [("8080.0", 8080), ("1e3", 1000)] {
        let config = EnvSchema::validate(&snapshot_with(&[(vars::PORT, integral)])).unwrap();
        assert_eq!(config.port(), expected, "{integral}");
    }
    for rejected in ["0", "65536", "abc"] {
        let errors = EnvSchema::validate(&snapshot_with(&[(vars::PORT, rejected)])).unwrap_err();
        assert_eq!(paths(&errors), vec!["PORT"], "{rejected}");
    }
}

#[test]
fn test_issues_collected_across_fields() {
    let errors = EnvSchema::validate(&snapshot_with(&[
        (vars::PORT, "0"),
        (vars::NODE_ENV, "staging"),
        (vars::REDIS_URL, "::nope::"),
        (vars::KAFKA_BROKERS, "ok:9092,bad"),
    ]))
    .unwrap_err();

    assert_eq!(
        paths(&errors),
        vec!["PORT", "NODE_ENV", "REDIS_URL", "KAFKA_BROKERS.1"]
    );
    assert_eq!(errors.under(vars::KAFKA_BROKERS).count(), 1);
}

#[test]
fn test_missing_variables_reported_as_required() {
    let errors = EnvSchema::validate(&snapshot_without(&[
        vars::DATABASE_URL_REPLICA,
        vars::OTEL_COLLECTOR_ENDPOINT,
    ]))
    .unwrap_err();

    assert_eq!(
        messages(&errors, "DATABASE_URL_REPLICA"),
        vec!["DATABASE_URL_REPLICA is required"]
    );
    assert_eq!(
        messages(&errors, "OTEL_COLLECTOR_ENDPOINT"),
        vec!["OTEL_COLLECTOR_ENDPOINT is required"]
    );
}

#[test]
fn test_empty_snapshot_reports_every_variable() {
    let errors = EnvSchema::validate(&EnvSnapshot::default()).unwrap_err();

    let mut reported: Vec<String> = paths(&errors);
    reported.dedup();
    assert_eq!(reported, vars::ALL.to_vec());
}

#[test]
fn test_report_lists_each_issue_on_its_own_line() {
    let errors = EnvSchema::validate(&snapshot_with(&[
        (vars::PORT, "abc"),
        (vars::KAFKA_BROKERS, "a:1,a:1"),
    ]))
    .unwrap_err();

    assert_eq!(
        errors.report(),
        "Environment validation failed:\n  \
         [PORT] Port must be a number, got: abc\n  \
         [KAFKA_BROKERS.1] Duplicate broker found: a:1\n"
    );
}

#[test]
fn test_credentials_never_in_messages() {
    let errors = EnvSchema::validate(&snapshot_with(&[(
        vars::DATABASE_URL_PRIMARY,
        "postgres://app:hunter2@/stock",
    )]))
    .unwrap_err();

    assert!(!errors.report().contains("hunter2"));
    assert_eq!(paths(&errors), vec!["DATABASE_URL_PRIMARY"]);
}

#[test]
fn test_config_debug_masks_passwords() {
    let snapshot: EnvSnapshot = valid_vars().into_iter().collect();
    let config = EnvSchema::validate(&snapshot).unwrap();
    let rendered = format!("{config:?}");

    assert!(!rendered.contains("s3cr3t-pw"));
    assert!(rendered.contains("db-primary"));
}
