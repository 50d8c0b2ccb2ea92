//! Content provider interface and built-in providers.

use std::{collections::BTreeMap, path::Path};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use themeforge_core::{
    blueprint::{ContentMap, SectionType},
    error::CoreError,
    pattern::SlotKind,
};
use thiserror::Error;

/// What the provider is asked to write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PromptContext {
    pub industry: String,
    pub preset: String,
    pub company: String,
    pub page: String,
    pub section_id: String,
    /// Slot being requested.
    pub slot: String,
    pub slot_kind: SlotKind,
}

/// Provider failures.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProviderError {
    /// The provider could not be reached.
    #[error("content provider unavailable: {0}")]
    Unavailable(String),

    /// The provider answered with an error.
    #[error("content provider failed: {0}")]
    Failed(String),
}

/// Source of AI-written section content.
///
/// One call per (section, slot). The returned map may carry more slots than
/// the one requested; only the requested slot is used.
#[async_trait]
pub trait ContentProvider: Send + Sync {
    async fn fetch_content(
        &self,
        section_type: SectionType,
        context: &PromptContext,
    ) -> Result<ContentMap, ProviderError>;
}

/// Provider that never supplies content.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoContentProvider;

#[async_trait]
impl ContentProvider for NoContentProvider {
    async fn fetch_content(
        &self,
        _section_type: SectionType,
        _context: &PromptContext,
    ) -> Result<ContentMap, ProviderError> {
        Ok(ContentMap::new())
    }
}

/// Provider serving a pre-fetched content snapshot.
///
/// Entries are keyed by section id (`page/section` or bare section id) or by
/// section type; the most specific key present wins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StaticContentProvider {
    entries: BTreeMap<String, ContentMap>,
}

impl StaticContentProvider {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add content under a key.
    #[must_use]
    pub fn with_entry(mut self, key: impl Into<String>, content: ContentMap) -> Self {
        self.entries.insert(key.into(), content);
        self
    }

    /// Load a JSON snapshot file: an object of key to slot map.
    pub fn load(path: &Path) -> Result<Self, CoreError> {
        let content = std::fs::read_to_string(path)?;
        let provider: Self = serde_json::from_str(&content)
            .map_err(|e| CoreError::blueprint(path, format!("invalid content snapshot: {e}")))?;
        tracing::debug!(path = %path.display(), entries = provider.entries.len(), "loaded content snapshot");
        Ok(provider)
    }

    fn lookup(&self, section_type: SectionType, context: &PromptContext) -> Option<&ContentMap> {
        let qualified = format!("{}/{}", context.page, context.section_id);
        [
            qualified.as_str(),
            context.section_id.as_str(),
            section_type.as_str(),
        ]
        .into_iter()
        .find_map(|key| self.entries.get(key))
    }
}

#[async_trait]
impl ContentProvider for StaticContentProvider {
    async fn fetch_content(
        &self,
        section_type: SectionType,
        context: &PromptContext,
    ) -> Result<ContentMap, ProviderError> {
        Ok(self
            .lookup(section_type, context)
            .and_then(|entry| entry.get(&context.slot))
            .map(|value| ContentMap::from([(context.slot.clone(), value.clone())]))
            .unwrap_or_default())
    }
}
