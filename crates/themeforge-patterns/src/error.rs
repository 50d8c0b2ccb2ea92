//! Registry error types.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using `RegistryError`.
pub type Result<T> = std::result::Result<T, RegistryError>;

/// Pattern registry errors.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// No pattern with this id in the snapshot.
    #[error("pattern not found: {0}")]
    NotFound(String),

    /// Catalog file could not be read.
    #[error("failed to read catalog {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Catalog is not valid TOML or does not match the catalog schema.
    #[error("failed to parse catalog: {0}")]
    Parse(#[from] toml::de::Error),

    /// Catalog parsed but breaks registry rules.
    #[error("invalid catalog: {}", .0.join("; "))]
    Invalid(Vec<String>),
}
