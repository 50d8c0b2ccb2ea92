//! Generate command - compile a blueprint into a theme directory.

use std::{
    path::{Path, PathBuf},
    sync::Arc,
    time::Instant,
};

use color_eyre::eyre::{Result, WrapErr, bail};
use themeforge_core::{Blueprint, ContentPolicy, GeneratedFile, GenerationResult};
use themeforge_generator::{Generator, StaticContentProvider};
use themeforge_patterns::RegistryHandle;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use super::{load_config, load_registry};

/// Options of one generate invocation.
#[derive(Debug, Clone, Default)]
pub struct Options {
    /// Directory the theme is written into.
    pub output: PathBuf,

    /// Pre-fetched content snapshot served as AI content.
    pub content: Option<PathBuf>,

    /// Replaces the configured content policy.
    pub policy: Option<ContentPolicy>,

    /// Print the full result as JSON instead of a summary.
    pub json: bool,
}

/// Run the generate command.
pub async fn run(config_path: &Path, blueprint_path: &Path, options: &Options) -> Result<()> {
    let start = Instant::now();

    let config = load_config(config_path)?;
    let registry = load_registry(&config)?;
    let blueprint = Blueprint::load(blueprint_path)
        .wrap_err_with(|| format!("Failed to load blueprint {}", blueprint_path.display()))?;

    let mut generator = Generator::new(config, RegistryHandle::new(registry))
        .wrap_err("Failed to set up generator")?;
    if let Some(policy) = &options.policy {
        generator = generator.with_policy(policy.clone());
    }
    if let Some(path) = &options.content {
        let provider = StaticContentProvider::load(path)
            .wrap_err_with(|| format!("Failed to load content snapshot {}", path.display()))?;
        generator = generator.with_provider(Arc::new(provider));
    }

    let cancel = cancel_on_ctrl_c();
    let result = generator
        .generate_with_cancel(&blueprint, cancel)
        .await
        .wrap_err("Generation failed")?;

    let written = write_files(&options.output, &result.files)?;

    if options.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_summary(&result, &options.output, written);
    }

    info!(
        files = written,
        duration_ms = start.elapsed().as_millis() as u64,
        "generate finished"
    );

    if !result.metadata.complete {
        warn!("generation was cancelled; output is incomplete");
    }
    if !result.success {
        bail!("Generation failed with {} error(s)", result.errors.len());
    }

    Ok(())
}

/// Token cancelled on the first interrupt signal.
fn cancel_on_ctrl_c() -> CancellationToken {
    let token = CancellationToken::new();
    let child = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupt received; abandoning content fetches");
            child.cancel();
        }
    });
    token
}

/// Write files under `root`, creating directories as needed.
///
/// Returns the number of files written.
pub fn write_files(root: &Path, files: &[GeneratedFile]) -> Result<usize> {
    for file in files {
        let target = root.join(&file.path);
        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent)
                .wrap_err_with(|| format!("Failed to create {}", parent.display()))?;
        }
        std::fs::write(&target, &file.content)
            .wrap_err_with(|| format!("Failed to write {}", target.display()))?;

        #[cfg(unix)]
        if let Some(meta) = &file.metadata {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&target, std::fs::Permissions::from_mode(meta.mode))
                .wrap_err_with(|| format!("Failed to set mode on {}", target.display()))?;
        }
    }
    Ok(files.len())
}

fn print_summary(result: &GenerationResult, output: &Path, written: usize) {
    println!();
    println!("Summary:");
    println!(
        "  Preset: {}{}",
        result.metadata.preset_used,
        if result.metadata.preset_used == result.metadata.preset {
            String::new()
        } else {
            format!(" (requested '{}')", result.metadata.preset)
        }
    );
    println!("  Files:    {written} written to {}", output.display());
    println!("  Warnings: {}", result.warnings.len());
    println!("  Errors:   {}", result.errors.len());
    println!("  Fingerprint: {}", result.metadata.fingerprint);

    for warning in &result.warnings {
        println!("  ⚠ {warning}");
    }
    for error in &result.errors {
        println!("  ✗ {error}");
    }

    if result.success {
        println!();
        println!("✓ Theme generated");
    }
}

#[cfg(test)]
mod tests {
    use themeforge_core::FileMetadata;

    use super::*;

    #[test]
    fn test_write_files_creates_directories() {
        let dir = tempfile::tempdir().expect("tempdir");
        let files = vec![
            GeneratedFile::new("style.css", "/* theme */"),
            GeneratedFile::new("patterns/home--hero-1.php", "<?php ?>").with_metadata(FileMetadata {
                encoding: "utf-8".to_string(),
                mode: 0o644,
                sha256: String::new(),
            }),
        ];

        let written = write_files(dir.path(), &files).expect("write");
        assert_eq!(written, 2);
        let hero = std::fs::read_to_string(dir.path().join("patterns/home--hero-1.php"))
            .expect("read");
        assert_eq!(hero, "<?php ?>");
    }

    #[cfg(unix)]
    #[test]
    fn test_write_files_applies_mode() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().expect("tempdir");
        let file = GeneratedFile::new("readme.txt", "hi").with_metadata(FileMetadata {
            encoding: "utf-8".to_string(),
            mode: 0o600,
            sha256: String::new(),
        });
        write_files(dir.path(), &[file]).expect("write");

        let mode = std::fs::metadata(dir.path().join("readme.txt"))
            .expect("metadata")
            .permissions()
            .mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[tokio::test]
    async fn test_generate_writes_theme() {
        let dir = tempfile::tempdir().expect("tempdir");
        let blueprint = dir.path().join("site.json");
        std::fs::write(
            &blueprint,
            r#"{
                "industry": "construction",
                "preset": "industrial-modern",
                "use_ai_content": false,
                "client": { "company": "Acme Builders" },
                "pages": [
                    {
                        "slug": "home",
                        "title": "Home",
                        "front": true,
                        "sections": [
                            { "type": "hero", "content": { "headline": "We build" } }
                        ]
                    }
                ]
            }"#,
        )
        .expect("write blueprint");

        let options = Options {
            output: dir.path().join("theme"),
            ..Default::default()
        };
        run(&dir.path().join("missing.toml"), &blueprint, &options)
            .await
            .expect("generate");

        assert!(dir.path().join("theme/style.css").exists());
        assert!(dir.path().join("theme/templates/front-page.html").exists());
        let hero = std::fs::read_to_string(dir.path().join("theme/patterns/home--hero-1.php"))
            .expect("hero pattern");
        assert!(hero.contains("We build"));
    }
}
