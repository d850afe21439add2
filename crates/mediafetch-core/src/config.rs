//! JSON configuration files.
//!
//! Configuration structs live in the crates that own them; this module only
//! knows how to read and write them. Missing fields are the struct's
//! business (use `#[serde(default)]`).

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;

/// Errors that can occur while reading or writing a configuration file.
#[derive(Debug)]
pub enum ConfigError {
    /// The file could not be read or written.
    Io {
        /// The file involved.
        path: PathBuf,
        /// The underlying IO error.
        source: std::io::Error,
    },

    /// The contents are not valid JSON for the requested type.
    Parse {
        /// Where the text came from (a path or a label).
        origin: String,
        /// Parser diagnostic, including line and column.
        message: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io { path, source } => {
                write!(f, "IO error on config '{}': {}", path.display(), source)
            }
            ConfigError::Parse { origin, message } => {
                write!(f, "Invalid config '{}': {}", origin, message)
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io { source, .. } => Some(source),
            ConfigError::Parse { .. } => None,
        }
    }
}

/// Parse a configuration value from JSON text.
///
/// `origin` only shows up in error messages.
pub fn from_json_str<T: DeserializeOwned>(text: &str, origin: &str) -> Result<T, ConfigError> {
    serde_json::from_str(text).map_err(|e| ConfigError::Parse {
        origin: origin.to_string(),
        message: e.to_string(),
    })
}

/// Read and parse a JSON configuration file.
pub fn load_json<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T, ConfigError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let value = from_json_str(&text, &path.display().to_string())?;
    tracing::debug!("Loaded config from {}", path.display());
    Ok(value)
}

/// Write a configuration value as pretty-printed JSON.
pub fn save_json<T: Serialize>(value: &T, path: impl AsRef<Path>) -> Result<(), ConfigError> {
    let path = path.as_ref();
    let text = serde_json::to_string_pretty(value).map_err(|e| ConfigError::Parse {
        origin: path.display().to_string(),
        message: e.to_string(),
    })?;

    std::fs::write(path, text).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}
