//! Themeforge CLI Library
//!
//! Command implementations behind the `themeforge` binary. The binary is a
//! thin caller of the generator: it loads inputs, runs the pipeline and
//! persists the returned files.
//!
//! # Modules
//!
//! - [`cmd`] - Command implementations (generate, check, patterns)
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//!
//! use themeforge::cmd;
//!
//! # async fn example() -> color_eyre::eyre::Result<()> {
//! let options = cmd::generate::Options {
//!     output: Path::new("build/theme").to_path_buf(),
//!     ..Default::default()
//! };
//! cmd::generate::run(Path::new("themeforge.toml"), Path::new("site.yaml"), &options).await?;
//! # Ok(())
//! # }
//! ```

pub mod cmd;

pub use themeforge_core::{Blueprint, Config, GenerationResult};
pub use themeforge_generator::Generator;

/// Initialize tracing with the specified verbosity level.
///
/// `verbose` maps 0 to WARN, 1 to INFO, 2 to DEBUG and anything higher to TRACE.
/// `RUST_LOG` directives are honored on top.
pub fn init_tracing(verbose: u8) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();
}
