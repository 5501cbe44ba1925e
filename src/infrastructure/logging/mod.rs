//! Logging infrastructure
//!
//! Structured logging using tracing and tracing-subscriber:
//! - JSON or pretty stdout output, optional rolling JSON files
//! - Level derived from the environment, overridable by settings or `RUST_LOG`
//! - Credential scrubbing on every written line

pub mod config;
pub mod logger;
pub mod secret_scrubbing;

pub use config::{LogConfig, LogFormat, RotationPolicy};
pub use logger::{service_span, LoggerImpl};
pub use secret_scrubbing::{redact_headers, RedactingMakeWriter, SecretScrubber};
