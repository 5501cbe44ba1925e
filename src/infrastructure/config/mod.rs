//! Configuration management infrastructure
//!
//! Two layers, loaded in this order at start-up:
//! - Environment contract: a raw [`EnvSnapshot`] (process environment over an
//!   optional dotenv file) validated by [`EnvSchema`] into an immutable
//!   [`AppConfig`](crate::domain::models::AppConfig), collecting every issue
//! - Operational settings: figment layering of defaults, YAML and `STOCK_*`
//!   overrides into [`Settings`]

mod brokers;
pub mod issues;
pub mod loader;
pub mod schema;
pub mod settings;
pub mod snapshot;

pub use issues::{Issue, PathSegment, ValidationErrors};
pub use loader::{SettingsError, SettingsLoader};
pub use schema::{vars, EnvSchema};
pub use settings::{HttpSettings, Settings};
pub use snapshot::{EnvSnapshot, LoadError};
