//! Themeforge CLI
//!
//! Compiles site blueprints into block themes.
//!
//! This is the binary entry point. The library functionality is in `lib.rs`.

use clap::Parser;
use color_eyre::eyre::Result;
use themeforge_core::ContentPolicy;

/// Command-line interface for Themeforge.
#[derive(Parser)]
#[command(
    name = "themeforge",
    version,
    about = "Compile site blueprints into block themes"
)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "themeforge.toml", env = "THEMEFORGE_CONFIG")]
    config: std::path::PathBuf,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Available CLI commands.
#[derive(clap::Subcommand)]
enum Commands {
    /// Generate a theme from a blueprint
    Generate {
        /// Blueprint file (json, yaml or toml)
        blueprint: std::path::PathBuf,
        /// Output directory
        #[arg(short, long, default_value = "theme")]
        output: std::path::PathBuf,
        /// Content snapshot (json) served as AI content
        #[arg(long)]
        content: Option<std::path::PathBuf>,
        /// Drop sections with any unresolved slot
        #[arg(long, conflicts_with = "lenient")]
        strict: bool,
        /// Fill every unresolved slot with a placeholder
        #[arg(long)]
        lenient: bool,
        /// Print the full result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Validate a blueprint and show the selected patterns
    Check {
        /// Blueprint file (json, yaml or toml)
        blueprint: std::path::PathBuf,
        /// Treat warnings as errors
        #[arg(long)]
        strict: bool,
    },
    /// List catalog entries or the candidates for one section type
    Patterns {
        /// Industry used for preset fallback
        #[arg(long)]
        industry: Option<String>,
        /// Preset to inspect
        #[arg(long)]
        preset: Option<String>,
        /// Section type (hero, services, about, ...)
        #[arg(long)]
        section: Option<String>,
    },
}

fn policy_override(strict: bool, lenient: bool) -> Option<ContentPolicy> {
    match (strict, lenient) {
        (true, _) => Some(ContentPolicy::strict()),
        (_, true) => Some(ContentPolicy::lenient()),
        _ => None,
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    themeforge::init_tracing(cli.verbose);

    match cli.command {
        Commands::Generate {
            blueprint,
            output,
            content,
            strict,
            lenient,
            json,
        } => {
            let options = themeforge::cmd::generate::Options {
                output,
                content,
                policy: policy_override(strict, lenient),
                json,
            };
            themeforge::cmd::generate::run(&cli.config, &blueprint, &options).await?;
        }
        Commands::Check { blueprint, strict } => {
            themeforge::cmd::check::run(&cli.config, &blueprint, strict)?;
        }
        Commands::Patterns {
            industry,
            preset,
            section,
        } => {
            let query = themeforge::cmd::patterns::Query {
                industry,
                preset,
                section,
            };
            themeforge::cmd::patterns::run(&cli.config, &query)?;
        }
    }

    Ok(())
}
