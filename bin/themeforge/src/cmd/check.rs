//! Check command - validate a blueprint without generating anything

use std::path::Path;

use color_eyre::eyre::{Result, bail};
use themeforge_core::Blueprint;
use themeforge_generator::plan;

use super::{load_config, load_registry};

/// Run the check command.
///
/// Loads config and catalog, then runs selection and path planning.
/// Warnings are fatal when `strict` is set.
pub fn run(config_path: &Path, blueprint_path: &Path, strict: bool) -> Result<()> {
    tracing::info!(?config_path, ?blueprint_path, strict, "Checking blueprint");

    println!("Checking configuration...");
    let config = load_config(config_path)?;
    println!("  ✓ Configuration valid");

    let registry = load_registry(&config)?;
    println!(
        "  ✓ Pattern catalog loaded ({} patterns, {} presets)",
        registry.patterns().count(),
        registry.presets().count()
    );

    println!("\nChecking blueprint...");
    let blueprint = match Blueprint::load(blueprint_path) {
        Ok(b) => {
            println!("  ✓ Blueprint parsed ({} pages)", b.pages.len());
            b
        }
        Err(e) => {
            println!("  ✗ Blueprint invalid: {e}");
            bail!("Validation failed");
        }
    };

    let plan = plan(&blueprint, &registry);

    println!("\nSelecting patterns...");
    if plan.preset.fell_back {
        println!(
            "  ⚠ Preset '{}' unavailable, using '{}'",
            blueprint.preset, plan.preset.preset
        );
    } else {
        println!("  ✓ Preset '{}'", plan.preset.preset);
    }
    for section in &plan.sections {
        println!("  ✓ {} -> {}", section.at, section.pattern.id);
    }

    println!("\n{}", "=".repeat(50));
    println!("Summary:");
    println!("  Sections: {}", plan.sections.len());
    println!("  Errors:   {}", plan.errors.len());
    println!("  Warnings: {}", plan.warnings.len());

    for error in &plan.errors {
        println!("  ✗ {error}");
    }
    for warning in &plan.warnings {
        println!("  ⚠ {warning}");
    }

    if !plan.is_ok() {
        bail!("Validation failed with {} error(s)", plan.errors.len());
    }
    if strict && !plan.warnings.is_empty() {
        bail!(
            "Validation failed: {} warning(s) in strict mode",
            plan.warnings.len()
        );
    }

    println!("\n✓ Blueprint is ready to generate");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(dir: &Path, name: &str, body: &str) -> std::path::PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, body).expect("write");
        path
    }

    const VALID: &str = r#"
industry: construction
preset: industrial-modern
pages:
  - slug: home
    title: Home
    front: true
    sections:
      - type: hero
      - type: services
"#;

    #[test]
    fn test_check_valid_blueprint() {
        let dir = tempfile::tempdir().expect("tempdir");
        let blueprint = write(dir.path(), "site.yaml", VALID);
        run(&dir.path().join("none.toml"), &blueprint, false).expect("valid");
    }

    #[test]
    fn test_check_unknown_variant_fails() {
        let dir = tempfile::tempdir().expect("tempdir");
        let blueprint = write(
            dir.path(),
            "site.yaml",
            "industry: construction\npreset: industrial-modern\npages:\n  - slug: home\n    title: Home\n    sections:\n      - type: hero\n        variant: nonexistent\n",
        );
        assert!(run(&dir.path().join("none.toml"), &blueprint, false).is_err());
    }

    #[test]
    fn test_check_strict_rejects_preset_fallback() {
        let dir = tempfile::tempdir().expect("tempdir");
        let blueprint = write(
            dir.path(),
            "site.yaml",
            &VALID.replace("industrial-modern", "no-such-preset"),
        );
        let config = dir.path().join("none.toml");

        run(&config, &blueprint, false).expect("fallback is only a warning");
        assert!(run(&config, &blueprint, true).is_err());
    }
}
