//! Generation output: files, issues, warnings and run metadata.

use std::{collections::BTreeMap, fmt};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    blueprint::{ConfigMap, ContentMap, SectionType},
    pattern::PatternDefinition,
};

/// Coarse classification of a generated file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    Markup,
    Style,
    Script,
    Config,
    Doc,
    Other,
}

impl FileType {
    /// Classify by extension.
    #[must_use]
    pub fn from_path(path: &str) -> Self {
        let ext = path.rsplit_once('.').map(|(_, ext)| ext.to_ascii_lowercase());
        match ext.as_deref() {
            Some("php" | "html" | "htm") => Self::Markup,
            Some("css") => Self::Style,
            Some("js" | "mjs") => Self::Script,
            Some("json" | "toml" | "yaml" | "yml") => Self::Config,
            Some("txt" | "md") => Self::Doc,
            _ => Self::Other,
        }
    }
}

/// Integrity and permission data attached to a file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileMetadata {
    /// Text encoding, always `utf-8` for generated sources.
    pub encoding: String,

    /// Unix permission bits.
    pub mode: u32,

    /// Lowercase hex sha256 of the content.
    pub sha256: String,
}

/// One output file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedFile {
    /// Relative slash-separated path, unique within a result.
    pub path: String,

    /// Literal file content.
    pub content: String,

    pub file_type: FileType,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<FileMetadata>,
}

impl GeneratedFile {
    /// Create a file, classifying it by extension.
    pub fn new(path: impl Into<String>, content: impl Into<String>) -> Self {
        let path = path.into();
        let file_type = FileType::from_path(&path);
        Self {
            path,
            content: content.into(),
            file_type,
            metadata: None,
        }
    }

    #[must_use]
    pub fn with_metadata(mut self, metadata: FileMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }
}

/// Position of a section within the blueprint.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SectionRef {
    /// Owning page slug.
    pub page: String,

    /// Effective section id.
    pub section: String,

    pub section_type: SectionType,

    /// Zero-based page position.
    pub page_index: usize,

    /// Zero-based position within the page.
    pub section_index: usize,
}

impl SectionRef {
    /// Blueprint ordering key.
    #[must_use]
    pub fn order_key(&self) -> (usize, usize) {
        (self.page_index, self.section_index)
    }
}

impl fmt::Display for SectionRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.page, self.section)
    }
}

/// Classification of a recorded error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorKind {
    UnknownPreset,
    PatternNotFound,
    DuplicatePath,
    MissingRequiredSlot,
    ContentProviderTimeout,
    ContentProviderFailure,
    InvalidBlueprint,
    /// Work abandoned after cancellation.
    Cancelled,
    /// A required page was left without sections.
    EmptyPage,
    /// A collaborator produced a path outside the theme root.
    UnsafePath,
    /// A merged config did not fit its section schema.
    InvalidPattern,
}

impl ErrorKind {
    /// Whether this kind discards the whole run.
    #[must_use]
    pub fn is_run_aborting(&self) -> bool {
        matches!(
            self,
            Self::DuplicatePath | Self::InvalidBlueprint | Self::PatternNotFound | Self::UnsafePath
        )
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// An error recorded during generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub kind: ErrorKind,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,

    pub message: String,
}

impl Issue {
    /// A run-level issue not tied to any page.
    pub fn run(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            page: None,
            section: None,
            message: message.into(),
        }
    }

    /// An issue about a whole page.
    pub fn page(kind: ErrorKind, page: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            page: Some(page.into()),
            section: None,
            message: message.into(),
        }
    }

    /// An issue about one section.
    pub fn section(kind: ErrorKind, at: &SectionRef, message: impl Into<String>) -> Self {
        Self {
            kind,
            page: Some(at.page.clone()),
            section: Some(at.section.clone()),
            message: message.into(),
        }
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.page, &self.section) {
            (Some(page), Some(section)) => {
                write!(f, "[{}] {page}/{section}: {}", self.kind, self.message)
            }
            (Some(page), None) => write!(f, "[{}] {page}: {}", self.kind, self.message),
            _ => write!(f, "[{}] {}", self.kind, self.message),
        }
    }
}

/// Classification of a recovered fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WarningKind {
    UnknownPreset,
    UndeclaredConfigKey,
    InvalidConfigValue,
    ContentTypeMismatch,
    PlaceholderContent,
    ContentProviderTimeout,
    ContentProviderFailure,
}

impl fmt::Display for WarningKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// A warning recorded during generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Warning {
    pub kind: WarningKind,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,

    /// Slot or option the warning is about.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,

    pub message: String,
}

impl Warning {
    pub fn run(kind: WarningKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            page: None,
            section: None,
            key: None,
            message: message.into(),
        }
    }

    pub fn section(
        kind: WarningKind,
        at: &SectionRef,
        key: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            page: Some(at.page.clone()),
            section: Some(at.section.clone()),
            key: Some(key.into()),
            message: message.into(),
        }
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] ", self.kind)?;
        if let (Some(page), Some(section)) = (&self.page, &self.section) {
            write!(f, "{page}/{section}: ")?;
        }
        f.write_str(&self.message)
    }
}

/// Where a resolved slot value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentSource {
    Ai,
    Blueprint,
    Fallback,
    Placeholder,
}

/// A section ready for rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedSection {
    pub section: SectionRef,

    /// Chosen pattern, taken from the registry snapshot of the run.
    pub pattern: PatternDefinition,

    /// Merged config in key order.
    pub config: ConfigMap,

    /// Resolved raw content in slot order.
    pub content: ContentMap,

    /// Source of each resolved slot.
    pub sources: BTreeMap<String, ContentSource>,

    pub warnings: Vec<Warning>,
}

/// Run-level metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationMetadata {
    pub industry: String,

    /// Preset requested by the blueprint.
    pub preset: String,

    /// Preset the registry actually served.
    pub preset_used: String,

    /// Page slugs in blueprint order.
    pub pages: Vec<String>,

    /// Whether any slot resolved from AI content.
    pub ai_content_used: bool,

    pub generated_at: DateTime<Utc>,

    /// Cache key over blueprint and registry catalog.
    pub fingerprint: String,

    /// False when cancellation abandoned work.
    pub complete: bool,
}

/// Outcome of one generation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationResult {
    pub success: bool,
    pub files: Vec<GeneratedFile>,
    pub errors: Vec<Issue>,
    pub warnings: Vec<Warning>,
    pub metadata: GenerationMetadata,
}

impl GenerationResult {
    /// A failed run carrying no files.
    #[must_use]
    pub fn aborted(metadata: GenerationMetadata, errors: Vec<Issue>, warnings: Vec<Warning>) -> Self {
        Self {
            success: false,
            files: Vec::new(),
            errors,
            warnings,
            metadata,
        }
    }

    /// Find a file by path.
    #[must_use]
    pub fn file(&self, path: &str) -> Option<&GeneratedFile> {
        self.files.iter().find(|f| f.path == path)
    }

    /// File paths in output order.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.files.iter().map(|f| f.path.as_str())
    }

    /// Errors of one kind.
    pub fn errors_of(&self, kind: ErrorKind) -> impl Iterator<Item = &Issue> {
        self.errors.iter().filter(move |e| e.kind == kind)
    }

    /// Warnings of one kind.
    pub fn warnings_of(&self, kind: WarningKind) -> impl Iterator<Item = &Warning> {
        self.warnings.iter().filter(move |w| w.kind == kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hero_ref() -> SectionRef {
        SectionRef {
            page: "home".to_string(),
            section: "hero-1".to_string(),
            section_type: SectionType::Hero,
            page_index: 0,
            section_index: 0,
        }
    }

    #[test]
    fn test_file_type_from_path() {
        assert_eq!(FileType::from_path("patterns/home-hero-1.php"), FileType::Markup);
        assert_eq!(FileType::from_path("style.css"), FileType::Style);
        assert_eq!(FileType::from_path("theme.json"), FileType::Config);
        assert_eq!(FileType::from_path("readme.txt"), FileType::Doc);
        assert_eq!(FileType::from_path("assets/logo.svg"), FileType::Other);
        assert_eq!(FileType::from_path("LICENSE"), FileType::Other);
    }

    #[test]
    fn test_issue_display() {
        let issue = Issue::section(ErrorKind::MissingRequiredSlot, &hero_ref(), "slot 'headline'");
        assert_eq!(
            issue.to_string(),
            "[MissingRequiredSlot] home/hero-1: slot 'headline'"
        );
        assert_eq!(
            Issue::run(ErrorKind::DuplicatePath, "x").to_string(),
            "[DuplicatePath] x"
        );
    }

    #[test]
    fn test_run_aborting_kinds() {
        assert!(ErrorKind::DuplicatePath.is_run_aborting());
        assert!(ErrorKind::PatternNotFound.is_run_aborting());
        assert!(!ErrorKind::MissingRequiredSlot.is_run_aborting());
        assert!(!ErrorKind::Cancelled.is_run_aborting());
    }

    #[test]
    fn test_result_serializes_kinds() {
        let warning = Warning::section(
            WarningKind::PlaceholderContent,
            &hero_ref(),
            "headline",
            "placeholder used",
        );
        let json = serde_json::to_value(&warning).expect("serialize");
        assert_eq!(json["kind"], "PlaceholderContent");
        assert_eq!(json["key"], "headline");
    }
}
