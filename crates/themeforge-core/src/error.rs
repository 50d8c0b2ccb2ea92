//! Error types for the Themeforge core library.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using `CoreError`.
pub type Result<T> = std::result::Result<T, CoreError>;

/// Core error types for Themeforge.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration loading or parsing error.
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Blueprint file could not be read or decoded.
    #[error("Blueprint error in {path}: {message}")]
    Blueprint { path: PathBuf, message: String },

    /// Blueprint decoded but is structurally invalid.
    #[error("Invalid blueprint: {}", .0.join("; "))]
    InvalidBlueprint(Vec<String>),

    /// Unsupported file format for a blueprint or content snapshot.
    #[error("Unsupported format for {0}: expected .json, .yaml, .yml or .toml")]
    UnsupportedFormat(PathBuf),

    /// File system I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// YAML parsing error.
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON parsing error.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic configuration crate error.
    #[error("Config crate error: {0}")]
    ConfigCrate(#[from] config::ConfigError),
}

impl CoreError {
    /// Create a new configuration error with a message.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            source: None,
        }
    }

    /// Create a new configuration error with source.
    pub fn config_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Config {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a new blueprint decoding error.
    pub fn blueprint(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Blueprint {
            path: path.into(),
            message: message.into(),
        }
    }
}
