//! Themeforge Core Library
//!
//! Blueprint model, pattern definitions, section schemas, configuration and
//! generation output types shared by the Themeforge crates.

pub mod blueprint;
pub mod config;
pub mod error;
pub mod output;
pub mod path;
pub mod pattern;
pub mod schema;

pub use blueprint::{
    Blueprint, ClientProfile, ConfigMap, ContactInfo, ContentMap, ContentValue, DesignTokens,
    ListItem, PageSpec, SectionDescriptor, SectionType,
};
pub use config::{Config, ContentPolicy, SlotPolicy};
pub use error::{CoreError, Result};
pub use output::{
    ContentSource, ErrorKind, FileMetadata, FileType, GeneratedFile, GenerationMetadata,
    GenerationResult, Issue, ResolvedSection, SectionRef, Warning, WarningKind,
};
pub use pattern::{OptionKind, OptionSpec, OptionValue, PatternDefinition, SlotKind, SlotSpec};
pub use schema::{SchemaError, SectionConfig};
