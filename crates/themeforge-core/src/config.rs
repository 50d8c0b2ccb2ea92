//! Generator configuration management.

use std::{collections::BTreeMap, path::Path};

use serde::{Deserialize, Serialize};

use crate::{
    blueprint::SectionType,
    error::{CoreError, Result},
};

/// Main configuration structure for Themeforge.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Theme identity settings.
    #[serde(default)]
    pub theme: ThemeConfig,

    /// Pipeline settings.
    #[serde(default)]
    pub generation: GenerationConfig,

    /// Missing-slot policy.
    #[serde(default)]
    pub policy: ContentPolicy,

    /// Pattern catalog settings.
    #[serde(default)]
    pub registry: RegistryConfig,
}

/// Theme identity configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThemeConfig {
    /// Human-readable theme name. Defaults to the client's company name.
    #[serde(default)]
    pub name: Option<String>,

    /// Theme slug used in pattern slugs and the text domain.
    #[serde(default)]
    pub slug: Option<String>,

    /// Translation text domain. Defaults to the slug.
    #[serde(default)]
    pub text_domain: Option<String>,

    /// Theme author shown in the stylesheet header.
    #[serde(default = "default_author")]
    pub author: String,

    /// Theme version written to the stylesheet header.
    #[serde(default = "default_version")]
    pub version: String,
}

/// Pipeline configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Timeout for a single content fetch, in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub content_timeout_ms: u64,

    /// Maximum number of content fetches in flight.
    #[serde(default = "default_max_fetches")]
    pub max_concurrent_fetches: usize,

    /// Render worker threads (0 uses the rayon default).
    #[serde(default)]
    pub workers: usize,

    /// Placeholder for unresolved text slots under lenient policy.
    #[serde(default = "default_placeholder_text")]
    pub placeholder_text: String,

    /// Placeholder for unresolved image slots under lenient policy.
    #[serde(default = "default_placeholder_image")]
    pub placeholder_image: String,
}

/// What to do when a content slot resolves from no source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotPolicy {
    /// Drop the owning section and record an error.
    Strict,
    /// Substitute a placeholder and record a warning.
    Lenient,
}

/// Run-level missing-slot policy with per-slot overrides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentPolicy {
    /// Policy for slots declared `required`.
    #[serde(default = "default_required_policy")]
    pub required: SlotPolicy,

    /// Policy for optional slots.
    #[serde(default = "default_optional_policy")]
    pub optional: SlotPolicy,

    /// Overrides keyed by `slot` or `section-type.slot`.
    #[serde(default)]
    pub slots: BTreeMap<String, SlotPolicy>,
}

/// Pattern catalog configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Custom catalog file replacing the built-in one.
    #[serde(default)]
    pub path: Option<String>,
}

fn default_author() -> String {
    "Themeforge".to_string()
}

fn default_version() -> String {
    "1.0.0".to_string()
}

fn default_timeout_ms() -> u64 {
    8_000
}

fn default_max_fetches() -> usize {
    8
}

fn default_placeholder_text() -> String {
    "Content coming soon.".to_string()
}

fn default_placeholder_image() -> String {
    "assets/images/placeholder.svg".to_string()
}

fn default_required_policy() -> SlotPolicy {
    SlotPolicy::Strict
}

fn default_optional_policy() -> SlotPolicy {
    SlotPolicy::Lenient
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            name: None,
            slug: None,
            text_domain: None,
            author: default_author(),
            version: default_version(),
        }
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            content_timeout_ms: default_timeout_ms(),
            max_concurrent_fetches: default_max_fetches(),
            workers: 0,
            placeholder_text: default_placeholder_text(),
            placeholder_image: default_placeholder_image(),
        }
    }
}

impl Default for ContentPolicy {
    fn default() -> Self {
        Self {
            required: default_required_policy(),
            optional: default_optional_policy(),
            slots: BTreeMap::new(),
        }
    }
}

impl ContentPolicy {
    /// Every slot, required or not, drops its section when unresolved.
    #[must_use]
    pub fn strict() -> Self {
        Self {
            required: SlotPolicy::Strict,
            optional: SlotPolicy::Strict,
            slots: BTreeMap::new(),
        }
    }

    /// Every slot falls back to a placeholder when unresolved.
    #[must_use]
    pub fn lenient() -> Self {
        Self {
            required: SlotPolicy::Lenient,
            optional: SlotPolicy::Lenient,
            slots: BTreeMap::new(),
        }
    }

    /// Override the policy for one slot (`slot` or `section-type.slot`).
    #[must_use]
    pub fn with_slot(mut self, key: impl Into<String>, policy: SlotPolicy) -> Self {
        self.slots.insert(key.into(), policy);
        self
    }

    /// Effective policy for a slot. The qualified key wins over the bare slot name.
    #[must_use]
    pub fn policy_for(&self, section: SectionType, slot: &str, required: bool) -> SlotPolicy {
        let qualified = format!("{}.{slot}", section.as_str());
        if let Some(policy) = self.slots.get(&qualified) {
            return *policy;
        }
        if let Some(policy) = self.slots.get(slot) {
            return *policy;
        }
        if required { self.required } else { self.optional }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(CoreError::config(format!(
                "Configuration file not found: {}",
                path.display()
            )));
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content).map_err(|e| {
            CoreError::config_with_source(
                format!("Failed to parse config file: {}", path.display()),
                e,
            )
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration layering `THEMEFORGE__*` environment variables over the file.
    pub fn load_with_env(path: &Path) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::from(path))
            .add_source(config::Environment::with_prefix("THEMEFORGE").separator("__"))
            .build()?;

        let config: Config = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.generation.content_timeout_ms == 0 {
            return Err(CoreError::config(
                "generation.content_timeout_ms must be greater than zero",
            ));
        }

        if self.generation.max_concurrent_fetches == 0 {
            return Err(CoreError::config(
                "generation.max_concurrent_fetches must be greater than zero",
            ));
        }

        if self.generation.placeholder_text.trim().is_empty() {
            return Err(CoreError::config(
                "generation.placeholder_text cannot be empty",
            ));
        }

        if let Some(slug) = &self.theme.slug {
            if !crate::path::is_safe_segment(slug) {
                return Err(CoreError::config(format!(
                    "theme.slug '{slug}' may only contain lowercase letters, digits, '-' and '_'"
                )));
            }
        }

        if let Some(domain) = &self.theme.text_domain {
            if !crate::path::is_safe_segment(domain) {
                return Err(CoreError::config(format!(
                    "theme.text_domain '{domain}' may only contain lowercase letters, digits, '-' and '_'"
                )));
            }
        }

        if self.generation.workers > 256 {
            tracing::warn!(
                workers = self.generation.workers,
                "generation.workers is unusually high"
            );
        }

        Ok(())
    }

    /// Content fetch timeout as a `Duration`.
    #[must_use]
    pub fn content_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.generation.content_timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn create_test_config() -> String {
        r#"
[theme]
name = "Acme Builders"
slug = "acme-builders"
author = "Acme Web Team"

[generation]
content_timeout_ms = 2500
max_concurrent_fetches = 4
workers = 2
placeholder_text = "Coming soon"

[policy]
required = "strict"
optional = "lenient"

[policy.slots]
"hero.subheadline" = "strict"
items = "lenient"

[registry]
path = "catalog/custom.toml"
"#
        .to_string()
    }

    #[test]
    fn test_load_config() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let config_path = dir.path().join("themeforge.toml");
        let mut file = std::fs::File::create(&config_path).expect("create file");
        file.write_all(create_test_config().as_bytes())
            .expect("write");

        let config = Config::load(&config_path).expect("load config");

        assert_eq!(config.theme.name.as_deref(), Some("Acme Builders"));
        assert_eq!(config.theme.slug.as_deref(), Some("acme-builders"));
        assert_eq!(config.theme.author, "Acme Web Team");
        assert_eq!(config.generation.content_timeout_ms, 2500);
        assert_eq!(config.generation.max_concurrent_fetches, 4);
        assert_eq!(config.generation.workers, 2);
        assert_eq!(config.generation.placeholder_text, "Coming soon");
        assert_eq!(config.registry.path.as_deref(), Some("catalog/custom.toml"));
        assert_eq!(
            config.policy.slots.get("hero.subheadline"),
            Some(&SlotPolicy::Strict)
        );
    }

    #[test]
    fn test_config_defaults() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let config_path = dir.path().join("themeforge.toml");
        std::fs::write(&config_path, "").expect("write");

        let config = Config::load(&config_path).expect("load config");

        assert!(config.theme.name.is_none());
        assert_eq!(config.theme.version, "1.0.0");
        assert_eq!(config.generation.content_timeout_ms, 8000);
        assert_eq!(config.generation.max_concurrent_fetches, 8);
        assert_eq!(config.generation.workers, 0);
        assert_eq!(config.policy.required, SlotPolicy::Strict);
        assert_eq!(config.policy.optional, SlotPolicy::Lenient);
        assert!(config.registry.path.is_none());
    }

    #[test]
    fn test_policy_lookup_prefers_qualified_key() {
        let policy = ContentPolicy::default()
            .with_slot("headline", SlotPolicy::Lenient)
            .with_slot("hero.headline", SlotPolicy::Strict);

        assert_eq!(
            policy.policy_for(SectionType::Hero, "headline", true),
            SlotPolicy::Strict
        );
        assert_eq!(
            policy.policy_for(SectionType::CallToAction, "headline", true),
            SlotPolicy::Lenient
        );
        assert_eq!(
            policy.policy_for(SectionType::About, "image", false),
            SlotPolicy::Lenient
        );
        assert_eq!(
            policy.policy_for(SectionType::About, "body", true),
            SlotPolicy::Strict
        );
    }

    #[test]
    fn test_config_validation_zero_timeout() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let config_path = dir.path().join("themeforge.toml");
        std::fs::write(&config_path, "[generation]\ncontent_timeout_ms = 0\n").expect("write");

        let result = Config::load(&config_path);
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("content_timeout_ms")
        );
    }

    #[test]
    fn test_config_validation_unsafe_slug() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let config_path = dir.path().join("themeforge.toml");
        std::fs::write(&config_path, "[theme]\nslug = \"../escape\"\n").expect("write");

        assert!(Config::load(&config_path).is_err());
    }

    #[test]
    fn test_config_not_found() {
        let result = Config::load(Path::new("/nonexistent/themeforge.toml"));
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("not found"));
    }
}
