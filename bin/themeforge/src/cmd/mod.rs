//! CLI command implementations.

pub mod check;
pub mod generate;
pub mod patterns;

use std::path::Path;

use color_eyre::eyre::{Result, WrapErr};
use themeforge_core::Config;
use themeforge_patterns::PatternRegistry;

/// Load the config file, or defaults when it does not exist.
///
/// `THEMEFORGE__*` environment variables override file values.
pub fn load_config(path: &Path) -> Result<Config> {
    if !path.exists() {
        tracing::info!(path = %path.display(), "no config file; using defaults");
        return Ok(Config::default());
    }
    Config::load_with_env(path)
        .wrap_err_with(|| format!("Failed to load configuration from {}", path.display()))
}

/// Load the configured pattern catalog, falling back to the built-in one.
pub fn load_registry(config: &Config) -> Result<PatternRegistry> {
    match &config.registry.path {
        Some(path) => PatternRegistry::load(Path::new(path))
            .wrap_err_with(|| format!("Failed to load pattern catalog {path}")),
        None => PatternRegistry::builtin().wrap_err("Built-in pattern catalog is invalid"),
    }
}
