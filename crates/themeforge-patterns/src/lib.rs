//! Themeforge Pattern Registry
//!
//! Catalog of section patterns grouped into industry presets, with preset
//! fallback and an atomically replaceable snapshot handle.

pub mod catalog;
pub mod error;
pub mod handle;
pub mod registry;

pub use catalog::{Catalog, GENERIC_PRESET, IndustryDefinition, PresetDefinition};
pub use error::{RegistryError, Result};
pub use handle::RegistryHandle;
pub use registry::{PatternRegistry, PresetResolution};
