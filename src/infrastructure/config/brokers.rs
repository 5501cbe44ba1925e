//! Kafka broker list validation.
//!
//! Input is a single comma-separated string of `host:port` pairs, for example
//! `kafka1:9092,kafka2:9092`. This is the only place in the service that reads
//! broker strings; the output is typed [`BrokerAddress`] values.

use std::collections::HashSet;
use thiserror::Error;

use super::issues::Issues;
use crate::domain::models::BrokerAddress;

pub(crate) const AT_LEAST_ONE_BROKER: &str = "At least one Kafka broker is required";

/// Why a port string was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub(crate) enum PortError {
    #[error("Port must be a number, got: {0}")]
    NotANumber(String),

    #[error("Port must be an integer, got: {0}")]
    NotAnInteger(String),

    #[error("Port must be between 1 and 65535, got: {0}")]
    OutOfRange(String),
}

/// Parse a TCP port, distinguishing garbage from fractions from range errors.
pub(crate) fn parse_port(raw: &str) -> Result<u16, PortError> {
    let text = raw.trim();
    let digits = text.strip_prefix(['+', '-']).unwrap_or(text);

    if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
        return text
            .parse::<u16>()
            .ok()
            .filter(|port| *port != 0)
            .ok_or_else(|| PortError::OutOfRange(text.to_string()));
    }

    match text.parse::<f64>() {
        Ok(value) if value.is_finite() => Err(PortError::NotAnInteger(text.to_string())),
        _ => Err(PortError::NotANumber(text.to_string())),
    }
}

/// Coerce the service port like any numeric setting.
///
/// Unlike [`parse_port`], any finite integral value is a port, so `8080.0` and
/// `1e3` are accepted. A blank value counts as 0.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub(crate) fn coerce_port(raw: &str) -> Result<u16, PortError> {
    let text = raw.trim();
    if text.is_empty() {
        return Err(PortError::OutOfRange("0".to_string()));
    }

    match parse_port(text) {
        Err(PortError::NotAnInteger(_)) => {}
        parsed => return parsed,
    }

    let value: f64 = text
        .parse()
        .map_err(|_| PortError::NotANumber(text.to_string()))?;
    if value.fract() != 0.0 {
        return Err(PortError::NotAnInteger(text.to_string()));
    }
    if !(1.0..=65535.0).contains(&value) {
        return Err(PortError::OutOfRange(text.to_string()));
    }

    Ok(value as u16)
}

/// Validate `raw` and build the broker list, recording issues under `key`.
///
/// Returns `None` if any issue was recorded for this variable.
pub(crate) fn validate_broker_list(
    key: &str,
    raw: Option<&str>,
    issues: &mut Issues,
) -> Option<Vec<BrokerAddress>> {
    let Some(trimmed) = raw.map(str::trim).filter(|value| !value.is_empty()) else {
        issues.field(key, AT_LEAST_ONE_BROKER);
        return None;
    };

    let entries: Vec<&str> = trimmed
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .collect();

    if entries.is_empty() {
        issues.field(key, AT_LEAST_ONE_BROKER);
        return None;
    }

    let recorded_before = issues.len();
    let mut seen = HashSet::with_capacity(entries.len());
    let mut brokers = Vec::with_capacity(entries.len());

    for (index, entry) in entries.into_iter().enumerate() {
        if !seen.insert(entry) {
            issues.entry(key, index, format!("Duplicate broker found: {entry}"));
            continue;
        }

        match check_entry(entry) {
            Ok(broker) => brokers.push(broker),
            Err(problems) => {
                for problem in problems {
                    issues.entry(key, index, problem);
                }
            }
        }
    }

    (issues.len() == recorded_before).then_some(brokers)
}

/// Check one `host:port` entry. Host and port problems are both reported.
fn check_entry(entry: &str) -> Result<BrokerAddress, Vec<String>> {
    let parts: Vec<&str> = entry.split(':').collect();
    let [host, port] = parts.as_slice() else {
        return Err(vec![format!(
            "Broker must be in format 'host:port', got: {entry}"
        )]);
    };

    let host = host.trim();
    let mut problems = Vec::new();
    if host.is_empty() {
        problems.push(format!("Broker host cannot be empty: {entry}"));
    }

    match parse_port(port) {
        Ok(port) if problems.is_empty() => return Ok(BrokerAddress::new(host.to_string(), port)),
        Ok(_) => {}
        Err(err) => problems.push(err.to_string()),
    }

    Err(problems)
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: &str = "KAFKA_BROKERS";

    fn run(raw: Option<&str>) -> (Option<Vec<BrokerAddress>>, Vec<(String, String)>) {
        let mut issues = Issues::default();
        let brokers = validate_broker_list(KEY, raw, &mut issues);
        let recorded = issues
            .into_errors()
            .issues()
            .iter()
            .map(|issue| (issue.path_string(), issue.message.clone()))
            .collect();
        (brokers, recorded)
    }

    #[test]
    fn test_parses_brokers_in_order() {
        let (brokers, issues) = run(Some("h1:1,h2:2"));
        assert!(issues.is_empty());

        let brokers = brokers.unwrap();
        assert_eq!(brokers.len(), 2);
        assert_eq!((brokers[0].host(), brokers[0].port()), ("h1", 1));
        assert_eq!((brokers[1].host(), brokers[1].port()), ("h2", 2));
    }

    #[test]
    fn test_trims_entries_and_drops_empty_tokens() {
        let (brokers, issues) = run(Some("  kafka1:9092 , ,kafka2:9093,  "));
        assert!(issues.is_empty());

        let rendered: Vec<String> = brokers.unwrap().iter().map(ToString::to_string).collect();
        assert_eq!(rendered, vec!["kafka1:9092", "kafka2:9093"]);
    }

    #[test]
    fn test_host_is_trimmed_inside_entry() {
        let (brokers, _) = run(Some(" kafka1 :9092"));
        // entry trim drops the leading space, host trim the one before ':'
        assert_eq!(brokers.unwrap()[0].host(), "kafka1");
    }

    #[test]
    fn test_missing_and_blank_values_require_a_broker() {
        for raw in [None, Some(""), Some("   "), Some(" , ,")] {
            let (brokers, issues) = run(raw);
            assert!(brokers.is_none());
            assert_eq!(issues, vec![(KEY.to_string(), AT_LEAST_ONE_BROKER.to_string())]);
        }
    }

    #[test]
    fn test_duplicate_reported_at_second_index() {
        let (brokers, issues) = run(Some("h1:1,h1:1"));
        assert!(brokers.is_none());
        assert_eq!(
            issues,
            vec![("KAFKA_BROKERS.1".to_string(), "Duplicate broker found: h1:1".to_string())]
        );
    }

    #[test]
    fn test_duplicate_skips_further_checks() {
        let (_, issues) = run(Some("h1,h1"));
        assert_eq!(issues.len(), 2);
        assert!(issues[0].1.starts_with("Broker must be in format"));
        assert_eq!(issues[1], ("KAFKA_BROKERS.1".to_string(), "Duplicate broker found: h1".to_string()));
    }

    #[test]
    fn test_reports_every_bad_entry() {
        let (brokers, issues) = run(Some("h1,h2:abc,h3:70000,:9092,good:9092"));
        assert!(brokers.is_none());
        assert_eq!(
            issues,
            vec![
                (
                    "KAFKA_BROKERS.0".to_string(),
                    "Broker must be in format 'host:port', got: h1".to_string()
                ),
                (
                    "KAFKA_BROKERS.1".to_string(),
                    "Port must be a number, got: abc".to_string()
                ),
                (
                    "KAFKA_BROKERS.2".to_string(),
                    "Port must be between 1 and 65535, got: 70000".to_string()
                ),
                (
                    "KAFKA_BROKERS.3".to_string(),
                    "Broker host cannot be empty: :9092".to_string()
                ),
            ]
        );
    }

    #[test]
    fn test_empty_host_and_bad_port_both_reported() {
        let (_, issues) = run(Some(":0"));
        assert_eq!(issues.len(), 2);
        assert_eq!(issues[0].1, "Broker host cannot be empty: :0");
        assert_eq!(issues[1].1, "Port must be between 1 and 65535, got: 0");
    }

    #[test]
    fn test_too_many_colons_is_a_format_error() {
        let (_, issues) = run(Some("h1:1:2"));
        assert_eq!(
            issues,
            vec![(
                "KAFKA_BROKERS.0".to_string(),
                "Broker must be in format 'host:port', got: h1:1:2".to_string()
            )]
        );
    }

    #[test]
    fn test_parse_port_classification() {
        assert_eq!(parse_port("1"), Ok(1));
        assert_eq!(parse_port("65535"), Ok(65535));
        assert_eq!(parse_port(" 9092 "), Ok(9092));
        assert_eq!(parse_port("0"), Err(PortError::OutOfRange("0".to_string())));
        assert_eq!(parse_port("65536"), Err(PortError::OutOfRange("65536".to_string())));
        assert_eq!(parse_port("-1"), Err(PortError::OutOfRange("-1".to_string())));
        assert_eq!(
            parse_port("99999999999999999999999"),
            Err(PortError::OutOfRange("99999999999999999999999".to_string()))
        );
        assert_eq!(parse_port("90.5"), Err(PortError::NotAnInteger("90.5".to_string())));
        assert_eq!(parse_port("1e3"), Err(PortError::NotAnInteger("1e3".to_string())));
        assert_eq!(parse_port("abc"), Err(PortError::NotANumber("abc".to_string())));
        assert_eq!(parse_port(""), Err(PortError::NotANumber(String::new())));
        assert_eq!(parse_port("inf"), Err(PortError::NotANumber("inf".to_string())));
        assert_eq!(parse_port("9092abc"), Err(PortError::NotANumber("9092abc".to_string())));
    }

    #[test]
    fn test_coerce_port_accepts_integral_numbers() {
        assert_eq!(coerce_port("8080"), Ok(8080));
        assert_eq!(coerce_port(" 8080.0 "), Ok(8080));
        assert_eq!(coerce_port("1e3"), Ok(1000));
        assert_eq!(coerce_port("+65535"), Ok(65535));

        assert_eq!(coerce_port("30.5"), Err(PortError::NotAnInteger("30.5".to_string())));
        assert_eq!(coerce_port("7e4"), Err(PortError::OutOfRange("7e4".to_string())));
        assert_eq!(coerce_port("0.0"), Err(PortError::OutOfRange("0.0".to_string())));
        assert_eq!(coerce_port("  "), Err(PortError::OutOfRange("0".to_string())));
        assert_eq!(coerce_port("abc"), Err(PortError::NotANumber("abc".to_string())));
        assert_eq!(coerce_port("inf"), Err(PortError::NotANumber("inf".to_string())));
    }
}
