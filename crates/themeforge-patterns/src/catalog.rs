//! Catalog file schema and load-time validation.
//!
//! A catalog is a TOML document with three tables:
//!
//! ```toml
//! [industries.construction]
//! default_preset = "industrial-modern"
//!
//! [[patterns]]
//! id = "hero-centered"
//! section = "hero"
//! variant = "centered"
//! options = [{ name = "background", kind = "color", default = "#1d3557", token = "colors.primary" }]
//! slots = [{ name = "headline", kind = "text", required = true }]
//!
//! [[presets]]
//! id = "generic"
//! [presets.sections]
//! hero = ["hero-centered"]
//! ```

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use themeforge_core::{
    blueprint::{ConfigMap, SectionType},
    pattern::{OptionKind, PatternDefinition},
    schema::{choice_values, required_options},
};

/// Id of the preset every lookup falls back to.
pub const GENERIC_PRESET: &str = "generic";

/// Token namespaces an option may bind to.
const TOKEN_NAMESPACES: [&str; 2] = ["colors.", "typography."];

/// Parsed catalog document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub industries: BTreeMap<String, IndustryDefinition>,

    #[serde(default)]
    pub patterns: Vec<PatternDefinition>,

    #[serde(default)]
    pub presets: Vec<PresetDefinition>,
}

/// Industry entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndustryDefinition {
    /// Preset served when a blueprint names an unregistered one.
    pub default_preset: String,

    #[serde(default)]
    pub label: Option<String>,
}

/// A named, ordered selection of patterns per section type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresetDefinition {
    pub id: String,

    /// Owning industry, if the preset is industry-specific.
    #[serde(default)]
    pub industry: Option<String>,

    #[serde(default)]
    pub label: Option<String>,

    /// Candidate pattern ids keyed by section type, most preferred first.
    #[serde(default)]
    pub sections: BTreeMap<String, Vec<String>>,

    /// Config layers keyed by section type or pattern id.
    #[serde(default)]
    pub overrides: BTreeMap<String, ConfigMap>,
}

impl PresetDefinition {
    /// Candidate ids for one section type.
    #[must_use]
    pub fn candidates(&self, section: SectionType) -> &[String] {
        self.sections
            .get(section.as_str())
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

/// Collect every rule the catalog breaks.
pub(crate) fn problems(catalog: &Catalog) -> Vec<String> {
    let mut problems = Vec::new();
    let mut ids = BTreeSet::new();
    let mut variants = BTreeSet::new();

    for pattern in &catalog.patterns {
        if !ids.insert(pattern.id.as_str()) {
            problems.push(format!("duplicate pattern id '{}'", pattern.id));
        }
        if !variants.insert((pattern.section, pattern.variant.as_str())) {
            problems.push(format!(
                "duplicate variant '{}' for section type {}",
                pattern.variant, pattern.section
            ));
        }
        check_pattern(pattern, &mut problems);
    }

    let by_id: BTreeMap<&str, &PatternDefinition> = catalog
        .patterns
        .iter()
        .map(|p| (p.id.as_str(), p))
        .collect();
    let mut preset_ids = BTreeSet::new();

    for preset in &catalog.presets {
        if !preset_ids.insert(preset.id.as_str()) {
            problems.push(format!("duplicate preset id '{}'", preset.id));
        }
        for (key, pattern_ids) in &preset.sections {
            let section = match key.parse::<SectionType>() {
                Ok(section) => section,
                Err(e) => {
                    problems.push(format!("preset '{}': {e}", preset.id));
                    continue;
                }
            };
            for id in pattern_ids {
                match by_id.get(id.as_str()) {
                    None => problems.push(format!(
                        "preset '{}' references unknown pattern '{id}'",
                        preset.id
                    )),
                    Some(p) if p.section != section => problems.push(format!(
                        "preset '{}' lists {} pattern '{id}' under {section}",
                        preset.id, p.section
                    )),
                    Some(_) => {}
                }
            }
        }
        for key in preset.overrides.keys() {
            if key.parse::<SectionType>().is_err() && !by_id.contains_key(key.as_str()) {
                problems.push(format!(
                    "preset '{}' overrides unknown section type or pattern '{key}'",
                    preset.id
                ));
            }
        }
    }

    if !preset_ids.contains(GENERIC_PRESET) {
        problems.push(format!("catalog has no '{GENERIC_PRESET}' preset"));
    }

    for (industry, def) in &catalog.industries {
        if !preset_ids.contains(def.default_preset.as_str()) {
            problems.push(format!(
                "industry '{industry}' defaults to unknown preset '{}'",
                def.default_preset
            ));
        }
    }

    problems
}

fn check_pattern(pattern: &PatternDefinition, problems: &mut Vec<String>) {
    let id = &pattern.id;

    for option in &pattern.options {
        if option.kind == OptionKind::Choice && option.choices.is_empty() {
            problems.push(format!("{id}: choice option '{}' has no choices", option.name));
        }
        if !option.accepts(&option.default) {
            problems.push(format!(
                "{id}: default of '{}' is not a valid {}",
                option.name, option.kind
            ));
        }
        if let Some(token) = &option.token {
            if !TOKEN_NAMESPACES.iter().any(|ns| token.starts_with(ns)) {
                problems.push(format!(
                    "{id}: option '{}' binds to '{token}' outside colors.* and typography.*",
                    option.name
                ));
            }
        }
    }

    for (name, kind) in required_options(pattern.section) {
        let Some(option) = pattern.option(name) else {
            problems.push(format!("{id}: missing required option '{name}'"));
            continue;
        };
        if option.kind != *kind {
            problems.push(format!("{id}: option '{name}' must be declared as {kind}"));
            continue;
        }
        if let Some(allowed) = choice_values(pattern.section, name) {
            for choice in &option.choices {
                if !allowed.contains(&choice.as_str()) {
                    problems.push(format!("{id}: option '{name}' has unsupported choice '{choice}'"));
                }
            }
        }
    }

    let mut slots = BTreeSet::new();
    for slot in &pattern.slots {
        if !slots.insert(slot.name.as_str()) {
            problems.push(format!("{id}: duplicate slot '{}'", slot.name));
        }
        if let Some(fallback) = &slot.fallback {
            if !slot.kind.accepts(fallback) || fallback.is_blank() {
                problems.push(format!(
                    "{id}: fallback of slot '{}' is not a usable {}",
                    slot.name, slot.kind
                ));
            }
        }
    }
}
