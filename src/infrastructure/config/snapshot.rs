//! Raw environment snapshot fed to the schema.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Dotenv file read when none is given explicitly.
pub const DEFAULT_ENV_FILE: &str = ".env";

/// Failure to read the dotenv file.
#[derive(Debug, Error)]
pub enum LoadError {
    /// An explicitly requested file does not exist.
    #[error("env file not found: {}", .0.display())]
    EnvFileNotFound(PathBuf),

    /// The file exists but could not be read or parsed.
    #[error("failed to read env file {}: {source}", .path.display())]
    EnvFile {
        /// File that failed.
        path: PathBuf,
        /// Underlying dotenv error.
        #[source]
        source: dotenvy::Error,
    },
}

/// Variable name to raw value. Absent keys are missing, never empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvSnapshot {
    vars: BTreeMap<String, String>,
}

impl EnvSnapshot {
    /// Snapshot of the process environment layered over a dotenv file.
    ///
    /// With `env_file` unset, `.env` in the working directory is read if it
    /// exists. An explicit file must exist. Process variables win over file
    /// entries, and the process environment itself is left untouched.
    pub fn from_process(env_file: Option<&Path>) -> Result<Self, LoadError> {
        let mut snapshot = match env_file {
            Some(path) if !path.exists() => {
                return Err(LoadError::EnvFileNotFound(path.to_path_buf()));
            }
            Some(path) => Self::from_env_file(path)?,
            None if Path::new(DEFAULT_ENV_FILE).exists() => {
                Self::from_env_file(Path::new(DEFAULT_ENV_FILE))?
            }
            None => Self::default(),
        };

        snapshot.overlay(
            std::env::vars_os()
                .filter_map(|(key, value)| Some((key.into_string().ok()?, value.into_string().ok()?))),
        );
        Ok(snapshot)
    }

    /// Parse a dotenv file without exporting anything into the process.
    pub fn from_env_file(path: &Path) -> Result<Self, LoadError> {
        let to_error = |source| LoadError::EnvFile {
            path: path.to_path_buf(),
            source,
        };

        let vars = dotenvy::from_path_iter(path)
            .map_err(to_error)?
            .collect::<Result<BTreeMap<_, _>, _>>()
            .map_err(to_error)?;

        debug!(path = %path.display(), count = vars.len(), "loaded env file");
        Ok(Self { vars })
    }

    /// Insert `vars`, replacing existing entries with the same name.
    pub fn overlay<K, V>(&mut self, vars: impl IntoIterator<Item = (K, V)>)
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.vars
            .extend(vars.into_iter().map(|(key, value)| (key.into(), value.into())));
    }

    /// Raw value of `key`, if set.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    /// Number of variables.
    pub fn len(&self) -> usize {
        self.vars.len()
    }

    /// Whether no variables are set.
    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for EnvSnapshot
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut snapshot = Self::default();
        snapshot.overlay(iter);
        snapshot
    }
}
