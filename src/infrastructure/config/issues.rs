//! Accumulated validation issues.
//!
//! Field validators never return early with an error. They push every problem
//! they find into an [`Issues`] accumulator, and the schema turns a non-empty
//! accumulator into a single [`ValidationErrors`] once all fields ran.

use std::fmt;
use thiserror::Error;

/// One step of an issue path: a variable name or a list position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    /// Environment variable name.
    Key(String),
    /// Zero-based position inside a list value.
    Index(usize),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Key(key) => f.write_str(key),
            Self::Index(index) => write!(f, "{index}"),
        }
    }
}

/// A single problem found in the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    /// Where the problem is, outermost segment first.
    pub path: Vec<PathSegment>,
    /// Operator-facing description of the problem.
    pub message: String,
}

impl Issue {
    /// Dotted rendering of the path, e.g. `KAFKA_BROKERS.1`.
    pub fn path_string(&self) -> String {
        self.path
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(".")
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            f.write_str(&self.message)
        } else {
            write!(f, "[{}] {}", self.path_string(), self.message)
        }
    }
}

/// Every issue found while validating one environment snapshot.
#[derive(Debug, Clone, Error)]
#[error("environment validation failed with {} issue(s)", .issues.len())]
pub struct ValidationErrors {
    issues: Vec<Issue>,
}

impl ValidationErrors {
    /// Issues in the order the validators found them.
    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    /// Issues whose dotted path equals `path`.
    pub fn at<'a>(&'a self, path: &'a str) -> impl Iterator<Item = &'a Issue> + 'a {
        self.issues
            .iter()
            .filter(move |issue| issue.path_string() == path)
    }

    /// Issues for a variable, including those on its list entries.
    pub fn under<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a Issue> + 'a {
        self.issues
            .iter()
            .filter(move |issue| matches!(issue.path.first(), Some(PathSegment::Key(k)) if k == key))
    }

    /// Operator-facing report, one issue per line.
    pub fn report(&self) -> String {
        let mut report = String::from("Environment validation failed:\n");
        for issue in &self.issues {
            report.push_str("  ");
            report.push_str(&issue.to_string());
            report.push('\n');
        }
        report
    }
}

#[derive(Debug, Default)]
pub(crate) struct Issues {
    issues: Vec<Issue>,
}

impl Issues {
    /// Record a problem with a whole variable.
    pub(crate) fn field(&mut self, key: &str, message: impl Into<String>) {
        self.issues.push(Issue {
            path: vec![PathSegment::Key(key.to_string())],
            message: message.into(),
        });
    }

    /// Record a problem with one entry of a list-valued variable.
    pub(crate) fn entry(&mut self, key: &str, index: usize, message: impl Into<String>) {
        self.issues.push(Issue {
            path: vec![PathSegment::Key(key.to_string()), PathSegment::Index(index)],
            message: message.into(),
        });
    }

    pub(crate) fn len(&self) -> usize {
        self.issues.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    pub(crate) fn into_errors(self) -> ValidationErrors {
        ValidationErrors {
            issues: self.issues,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_path_is_dotted() {
        let mut issues = Issues::default();
        issues.entry("KAFKA_BROKERS", 1, "Duplicate broker found: a:1");
        let errors = issues.into_errors();

        assert_eq!(errors.issues()[0].path_string(), "KAFKA_BROKERS.1");
        assert_eq!(
            errors.issues()[0].to_string(),
            "[KAFKA_BROKERS.1] Duplicate broker found: a:1"
        );
    }

    #[test]
    fn test_under_includes_entries() {
        let mut issues = Issues::default();
        issues.field("PORT", "bad");
        issues.entry("KAFKA_BROKERS", 0, "bad");
        issues.entry("KAFKA_BROKERS", 2, "bad");
        let errors = issues.into_errors();

        assert_eq!(errors.under("KAFKA_BROKERS").count(), 2);
        assert_eq!(errors.at("KAFKA_BROKERS.2").count(), 1);
        assert_eq!(errors.at("KAFKA_BROKERS").count(), 0);
    }

    #[test]
    fn test_report_lists_every_issue() {
        let mut issues = Issues::default();
        issues.field("PORT", "Port must be a number, got: abc");
        issues.field("NODE_ENV", "NODE_ENV must be one of: development, production, test");
        let report = issues.into_errors().report();

        assert!(report.starts_with("Environment validation failed:\n"));
        assert!(report.contains("  [PORT] Port must be a number, got: abc\n"));
        assert!(report.contains("  [NODE_ENV] NODE_ENV must be one of"));
    }
}
