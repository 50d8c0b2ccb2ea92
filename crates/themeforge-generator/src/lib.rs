//! Themeforge Generator Library
//!
//! Blueprint-to-theme generation pipeline.
//!
//! # Modules
//!
//! - [`select`] - Pattern selection per section descriptor
//! - [`merge`] - Layered config merge
//! - [`fetch`] - Bounded, cancellable content fetching
//! - [`resolve`] - Content slot resolution under a missing-content policy
//! - [`render`] - Block markup rendering, one renderer per section type
//! - [`sanitize`] - Context-aware output escaping
//! - [`base`] - Base theme files
//! - [`assemble`] - Output path planning and file assembly
//! - [`pipeline`] - Generation orchestration

pub mod assemble;
pub mod base;
pub mod clock;
pub mod fetch;
pub mod fingerprint;
pub mod merge;
pub mod pipeline;
pub mod provider;
pub mod render;
pub mod resolve;
pub mod sanitize;
pub mod select;
pub mod template;

pub use base::{BaseThemeGenerator, BlockThemeBase, SiteContext, ThemeIdentity};
pub use clock::{Clock, FixedClock, SystemClock};
pub use fingerprint::fingerprint;
pub use pipeline::{GenerationError, Generator, Plan, PlannedSection, Result, plan};
pub use provider::{
    ContentProvider, NoContentProvider, PromptContext, ProviderError, StaticContentProvider,
};
pub use render::{render, render_pattern_file};
pub use sanitize::{HtmlSanitizer, Sanitizer};
pub use template::{Template, TemplateContext, TemplateRegistry};
