//! Stock Service - API bootstrap
//!
//! Start-up for the stock management API: the environment is validated into an
//! immutable [`AppConfig`] before anything else is constructed, then logging
//! and the HTTP listener are wired from it.
//!
//! # Architecture
//!
//! - **Domain Layer** (`domain`): the validated configuration and broker values
//! - **Infrastructure Layer** (`infrastructure`): env snapshot, schema,
//!   settings, logging
//! - **Adapters** (`adapters`): HTTP listener, request pipeline, exception
//!   boundary
//! - **CLI Layer** (`cli`): `serve` and `check`
//!
//! # Example
//!
//! ```no_run
//! use stock_service::{EnvSchema, EnvSnapshot};
//!
//! let snapshot = EnvSnapshot::from_process(None)?;
//! match EnvSchema::validate(&snapshot) {
//!     Ok(config) => println!("listening on {}", config.port()),
//!     Err(errors) => eprint!("{}", errors.report()),
//! }
//! # Ok::<(), stock_service::LoadError>(())
//! ```

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod infrastructure;

/// Name attached to every log record.
pub const SERVICE_NAME: &str = "stock-management-service";

// Re-export commonly used types for convenience
pub use domain::models::{AppConfig, BrokerAddress, ConfigSummary, Environment};
pub use infrastructure::config::{
    EnvSchema, EnvSnapshot, Issue, LoadError, Settings, SettingsLoader, ValidationErrors,
};
