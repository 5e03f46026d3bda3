//! Error types for configuration operations.

use std::path::PathBuf;

use patchbay_core::GraphError;
use thiserror::Error;

/// Errors that can occur during configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read a file
    #[error("failed to read file '{path}': {source}")]
    ReadFile {
        /// Path of the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to write a file
    #[error("failed to write file '{path}': {source}")]
    WriteFile {
        /// Path of the file that could not be written.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse or serialize JSON
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Failed to parse TOML
    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Failed to serialize TOML
    #[error("failed to serialize TOML: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// File extension is neither `.json` nor `.toml`
    #[error("unsupported graph format for '{0}' (expected .json or .toml)")]
    UnsupportedFormat(PathBuf),

    /// Factory patch not found
    #[error("factory patch not found: {0}")]
    PatchNotFound(String),

    /// A settings value is out of range
    #[error("invalid setting '{key}': {reason}")]
    InvalidSetting {
        /// Dotted key, e.g. `engine.sample_rate`.
        key: &'static str,
        /// Description of why the value was rejected.
        reason: String,
    },

    /// The graph parsed but does not compile
    #[error("graph does not compile: {0}")]
    Compile(#[from] GraphError),
}

impl ConfigError {
    /// Create a read file error.
    pub fn read_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::ReadFile {
            path: path.into(),
            source,
        }
    }

    /// Create a write file error.
    pub fn write_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::WriteFile {
            path: path.into(),
            source,
        }
    }
}
