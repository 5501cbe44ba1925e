//! Layered loading and validation of operational settings.

use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use std::path::Path;
use thiserror::Error;

use super::settings::Settings;

/// Project settings file, merged when present.
pub const DEFAULT_SETTINGS_PATH: &str = "config/settings.yaml";

/// Prefix for settings overrides in the environment.
pub const SETTINGS_ENV_PREFIX: &str = "STOCK_";

/// Settings validation error types
#[derive(Error, Debug)]
pub enum SettingsError {
    /// `--settings` names a file that does not exist.
    #[error("Settings file not found: {0}")]
    FileNotFound(String),

    /// `http.host` is blank.
    #[error("HTTP host cannot be empty")]
    EmptyHost,

    /// `http.request_timeout_secs` is zero.
    #[error("Invalid request_timeout_secs: {0}. Must be at least 1")]
    InvalidRequestTimeout(u64),

    /// `logging.level` is not a tracing level.
    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    /// Both stdout and file output are disabled.
    #[error("No log output: enable_stdout is false and log_dir is unset")]
    NoLogOutput,
}

/// Settings loader with hierarchical merging
pub struct SettingsLoader;

impl SettingsLoader {
    /// Load settings with hierarchical merging
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. config/settings.yaml (optional)
    /// 3. `explicit` file, if given (must exist)
    /// 4. Environment variables (STOCK_* prefix, `__` separates nesting)
    pub fn load(explicit: Option<&Path>) -> Result<Settings> {
        let mut figment = Figment::new()
            .merge(Serialized::defaults(Settings::default()))
            .merge(Yaml::file(DEFAULT_SETTINGS_PATH));

        if let Some(path) = explicit {
            if !path.exists() {
                return Err(SettingsError::FileNotFound(path.display().to_string()).into());
            }
            figment = figment.merge(Yaml::file(path));
        }

        let settings: Settings = figment
            .merge(Env::prefixed(SETTINGS_ENV_PREFIX).split("__"))
            .extract()
            .context("Failed to extract settings from figment")?;

        Self::validate(&settings)?;
        Ok(settings)
    }

    /// Load settings from a specific file, without environment overrides
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Settings> {
        let settings: Settings = Figment::new()
            .merge(Serialized::defaults(Settings::default()))
            .merge(Yaml::file(path.as_ref()))
            .extract()
            .with_context(|| format!("Failed to load settings from {}", path.as_ref().display()))?;

        Self::validate(&settings)?;
        Ok(settings)
    }

    /// Validate settings after loading
    pub fn validate(settings: &Settings) -> Result<(), SettingsError> {
        if settings.http.host.trim().is_empty() {
            return Err(SettingsError::EmptyHost);
        }

        if settings.http.request_timeout_secs == 0 {
            return Err(SettingsError::InvalidRequestTimeout(
                settings.http.request_timeout_secs,
            ));
        }

        if let Some(level) = &settings.logging.level {
            let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
            if !valid_log_levels.contains(&level.to_lowercase().as_str()) {
                return Err(SettingsError::InvalidLogLevel(level.clone()));
            }
        }

        if !settings.logging.enable_stdout && settings.logging.log_dir.is_none() {
            return Err(SettingsError::NoLogOutput);
        }

        Ok(())
    }
}
