//! Immutable pattern registry built from a validated catalog.

use std::{collections::BTreeMap, path::Path};

use sha2::{Digest, Sha256};
use themeforge_core::{
    blueprint::{ConfigMap, SectionType},
    pattern::PatternDefinition,
};
use tracing::{debug, info, warn};

use crate::{
    catalog::{self, Catalog, GENERIC_PRESET, IndustryDefinition, PresetDefinition},
    error::{RegistryError, Result},
};

/// Catalog compiled into the binary.
const BUILTIN_CATALOG: &str = include_str!("../catalog/builtin.toml");

/// Outcome of preset resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresetResolution {
    /// Preset actually served.
    pub preset: String,

    /// True when the requested preset was not registered.
    pub fell_back: bool,
}

/// Read-only catalog of patterns, presets and industries.
#[derive(Debug, Clone)]
pub struct PatternRegistry {
    patterns: BTreeMap<String, PatternDefinition>,
    presets: BTreeMap<String, PresetDefinition>,
    industries: BTreeMap<String, IndustryDefinition>,
    digest: String,
}

impl PatternRegistry {
    /// Registry over the built-in catalog.
    pub fn builtin() -> Result<Self> {
        Self::from_toml_str(BUILTIN_CATALOG)
    }

    /// Parse and validate a catalog from TOML text.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let catalog: Catalog = toml::from_str(source)?;
        Self::from_catalog(catalog)
    }

    /// Load a catalog file.
    pub fn load(path: &Path) -> Result<Self> {
        let source = std::fs::read_to_string(path).map_err(|source| RegistryError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let registry = Self::from_toml_str(&source)?;
        info!(
            path = %path.display(),
            patterns = registry.patterns.len(),
            presets = registry.presets.len(),
            "loaded pattern catalog"
        );
        Ok(registry)
    }

    /// Validate a parsed catalog and index it.
    pub fn from_catalog(catalog: Catalog) -> Result<Self> {
        let problems = catalog::problems(&catalog);
        if !problems.is_empty() {
            return Err(RegistryError::Invalid(problems));
        }

        let canonical =
            serde_json::to_vec(&catalog).map_err(|e| RegistryError::Invalid(vec![e.to_string()]))?;
        let digest = hex::encode(Sha256::digest(&canonical));

        Ok(Self {
            patterns: catalog
                .patterns
                .into_iter()
                .map(|p| (p.id.clone(), p))
                .collect(),
            presets: catalog
                .presets
                .into_iter()
                .map(|p| (p.id.clone(), p))
                .collect(),
            industries: catalog.industries,
            digest,
        })
    }

    /// Hex sha256 of the canonical catalog.
    #[must_use]
    pub fn digest(&self) -> &str {
        &self.digest
    }

    /// Pick the preset to serve: the requested one, else the industry default, else `generic`.
    #[must_use]
    pub fn resolve_preset(&self, industry: &str, preset: &str) -> PresetResolution {
        if self.presets.contains_key(preset) {
            return PresetResolution {
                preset: preset.to_string(),
                fell_back: false,
            };
        }

        let fallback = self
            .industries
            .get(industry)
            .map(|i| i.default_preset.as_str())
            .filter(|p| self.presets.contains_key(*p))
            .unwrap_or(GENERIC_PRESET);

        warn!(industry, requested = preset, fallback, "preset not registered");
        PresetResolution {
            preset: fallback.to_string(),
            fell_back: true,
        }
    }

    /// Ordered candidates for a section type, most preferred first.
    #[must_use]
    pub fn lookup_candidates(
        &self,
        industry: &str,
        preset: &str,
        section: SectionType,
    ) -> Vec<&PatternDefinition> {
        let resolution = self.resolve_preset(industry, preset);
        self.candidates(&resolution.preset, section)
    }

    /// Candidates of an already-resolved preset followed by the generic ones.
    #[must_use]
    pub fn candidates(&self, preset: &str, section: SectionType) -> Vec<&PatternDefinition> {
        let own = self.presets.get(preset).map(|p| p.candidates(section));
        let generic = self.presets.get(GENERIC_PRESET).map(|p| p.candidates(section));

        let mut out: Vec<&PatternDefinition> = Vec::new();
        for id in own.into_iter().chain(generic).flatten() {
            if out.iter().any(|p| &p.id == id) {
                continue;
            }
            if let Some(pattern) = self.patterns.get(id) {
                out.push(pattern);
            }
        }

        debug!(preset, %section, candidates = out.len(), "looked up candidates");
        out
    }

    /// Fetch a pattern by id.
    pub fn get_definition(&self, id: &str) -> Result<&PatternDefinition> {
        self.patterns
            .get(id)
            .ok_or_else(|| RegistryError::NotFound(id.to_string()))
    }

    /// Preset-level config layer for a pattern: the section-type entry, then the pattern entry.
    #[must_use]
    pub fn preset_overrides(&self, preset: &str, pattern: &PatternDefinition) -> ConfigMap {
        let mut layer = ConfigMap::new();
        let Some(preset) = self.presets.get(preset) else {
            return layer;
        };

        for key in [pattern.section.as_str(), pattern.id.as_str()] {
            if let Some(values) = preset.overrides.get(key) {
                layer.extend(values.iter().map(|(k, v)| (k.clone(), v.clone())));
            }
        }
        layer
    }

    /// All patterns in id order.
    pub fn patterns(&self) -> impl Iterator<Item = &PatternDefinition> {
        self.patterns.values()
    }

    /// All presets in id order.
    pub fn presets(&self) -> impl Iterator<Item = &PresetDefinition> {
        self.presets.values()
    }

    #[must_use]
    pub fn preset(&self, id: &str) -> Option<&PresetDefinition> {
        self.presets.get(id)
    }

    /// Registered industries with their definitions.
    pub fn industries(&self) -> impl Iterator<Item = (&str, &IndustryDefinition)> {
        self.industries.iter().map(|(k, v)| (k.as_str(), v))
    }
}
