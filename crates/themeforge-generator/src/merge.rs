//! Layered config merge.
//!
//! Layers apply lowest to highest: pattern defaults, preset overrides, design
//! tokens, section config. Keys are last-writer-wins and list values replace
//! wholesale. Undeclared keys pass through with a warning; values that break
//! their declared kind are dropped with a warning and the lower value stays.

use themeforge_core::{
    blueprint::{ConfigMap, DesignTokens},
    output::{SectionRef, Warning, WarningKind},
    pattern::{OptionValue, PatternDefinition},
};

/// Named config layer above the pattern defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layer {
    Preset,
    Tokens,
    Section,
}

impl Layer {
    fn name(self) -> &'static str {
        match self {
            Self::Preset => "preset",
            Self::Tokens => "design token",
            Self::Section => "section",
        }
    }
}

/// Pattern defaults in key order.
#[must_use]
pub fn defaults(pattern: &PatternDefinition) -> ConfigMap {
    pattern
        .options
        .iter()
        .map(|o| (o.name.clone(), o.default.clone()))
        .collect()
}

/// Values of token-bound options that the blueprint's tokens define.
#[must_use]
pub fn token_layer(pattern: &PatternDefinition, tokens: &DesignTokens) -> ConfigMap {
    pattern
        .options
        .iter()
        .filter_map(|option| {
            let token = option.token.as_deref()?;
            let value = tokens.get(token)?;
            Some((option.name.clone(), OptionValue::from(value)))
        })
        .collect()
}

/// Apply one layer onto `merged`.
pub fn apply_layer(
    pattern: &PatternDefinition,
    merged: &mut ConfigMap,
    layer: &ConfigMap,
    kind: Layer,
    at: &SectionRef,
    warnings: &mut Vec<Warning>,
) {
    for (key, value) in layer {
        match pattern.option(key) {
            None => {
                warnings.push(Warning::section(
                    WarningKind::UndeclaredConfigKey,
                    at,
                    key,
                    format!(
                        "{} config key '{key}' is not declared by pattern '{}'",
                        kind.name(),
                        pattern.id
                    ),
                ));
                merged.insert(key.clone(), value.clone());
            }
            Some(spec) if spec.accepts(value) => {
                merged.insert(key.clone(), value.clone());
            }
            Some(spec) => {
                let allowed = if spec.choices.is_empty() {
                    String::new()
                } else {
                    format!(" (one of: {})", spec.choices.join(", "))
                };
                let kept = merged
                    .get(key)
                    .map_or_else(|| "nothing".to_string(), |v| format!("'{v}'"));
                warnings.push(Warning::section(
                    WarningKind::InvalidConfigValue,
                    at,
                    key,
                    format!(
                        "{} value '{value}' for '{key}' is not a valid {}{allowed}; keeping {kept}",
                        kind.name(),
                        spec.kind
                    ),
                ));
            }
        }
    }
}

/// Merge all layers for one section.
#[must_use]
pub fn merge_config(
    pattern: &PatternDefinition,
    preset: &ConfigMap,
    tokens: &DesignTokens,
    section: &ConfigMap,
    at: &SectionRef,
) -> (ConfigMap, Vec<Warning>) {
    let mut merged = defaults(pattern);
    let mut warnings = Vec::new();

    apply_layer(pattern, &mut merged, preset, Layer::Preset, at, &mut warnings);
    apply_layer(
        pattern,
        &mut merged,
        &token_layer(pattern, tokens),
        Layer::Tokens,
        at,
        &mut warnings,
    );
    apply_layer(pattern, &mut merged, section, Layer::Section, at, &mut warnings);

    (merged, warnings)
}
