//! Infrastructure layer module
//!
//! - Configuration: environment snapshot, schema validation, settings layering
//! - Logging: subscriber wiring and redaction

pub mod config;
pub mod logging;
