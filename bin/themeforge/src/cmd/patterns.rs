//! Patterns command - inspect the pattern catalog

use std::path::Path;

use color_eyre::eyre::{Result, eyre};
use themeforge_core::SectionType;
use themeforge_patterns::{GENERIC_PRESET, PatternRegistry};

use super::{load_config, load_registry};

/// Catalog query of one patterns invocation.
#[derive(Debug, Clone, Default)]
pub struct Query {
    pub industry: Option<String>,
    pub preset: Option<String>,
    pub section: Option<String>,
}

/// Run the patterns command.
///
/// Without a section, lists industries, presets and patterns. With one,
/// prints the ordered candidates the selector would consider.
pub fn run(config_path: &Path, query: &Query) -> Result<()> {
    let config = load_config(config_path)?;
    let registry = load_registry(&config)?;

    match &query.section {
        Some(section) => {
            let section: SectionType = section.parse().map_err(|e: String| eyre!(e))?;
            for line in candidate_lines(&registry, query, section) {
                println!("{line}");
            }
        }
        None => print_catalog(&registry),
    }

    Ok(())
}

fn candidate_lines(registry: &PatternRegistry, query: &Query, section: SectionType) -> Vec<String> {
    let industry = query.industry.as_deref().unwrap_or_default();
    let preset = query.preset.as_deref().unwrap_or(GENERIC_PRESET);
    let resolution = registry.resolve_preset(industry, preset);

    let mut lines = Vec::new();
    if resolution.fell_back {
        lines.push(format!(
            "⚠ preset '{preset}' unavailable, using '{}'",
            resolution.preset
        ));
    }
    lines.push(format!("{} candidates in '{}':", section.label(), resolution.preset));
    for (rank, pattern) in registry
        .candidates(&resolution.preset, section)
        .into_iter()
        .enumerate()
    {
        lines.push(format!(
            "  {}. {} ({}) [{}]",
            rank + 1,
            pattern.id,
            pattern.variant,
            pattern.tags.join(", ")
        ));
    }
    lines
}

fn print_catalog(registry: &PatternRegistry) {
    println!("Industries:");
    for (id, industry) in registry.industries() {
        println!(
            "  {id:<16} {} (default preset: {})",
            industry.label.as_deref().unwrap_or(id),
            industry.default_preset
        );
    }

    println!("\nPresets:");
    for preset in registry.presets() {
        println!(
            "  {:<20} {}{}",
            preset.id,
            preset.label.as_deref().unwrap_or(&preset.id),
            preset
                .industry
                .as_deref()
                .map(|i| format!(" [{i}]"))
                .unwrap_or_default()
        );
    }

    println!("\nPatterns:");
    for pattern in registry.patterns() {
        println!(
            "  {:<20} {:<14} {}",
            pattern.id,
            pattern.section.as_str(),
            pattern.variant
        );
    }
    println!("\nCatalog digest: {}", registry.digest());
}
