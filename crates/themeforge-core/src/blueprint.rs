//! Blueprint model: the structured project description fed into generation.

use std::{collections::BTreeMap, fmt, path::Path, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{
    error::{CoreError, Result},
    path::is_safe_segment,
    pattern::OptionValue,
};

/// Per-section configuration overrides, keyed by option name.
pub type ConfigMap = BTreeMap<String, OptionValue>;

/// Content values keyed by slot name.
pub type ContentMap = BTreeMap<String, ContentValue>;

/// Closed set of section types a pattern can implement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SectionType {
    Hero,
    Services,
    About,
    Testimonials,
    Gallery,
    Contact,
    CallToAction,
}

impl SectionType {
    /// Every section type, in catalog order.
    pub const ALL: [SectionType; 7] = [
        Self::Hero,
        Self::Services,
        Self::About,
        Self::Testimonials,
        Self::Gallery,
        Self::Contact,
        Self::CallToAction,
    ];

    /// Stable identifier used in catalogs, paths and policy keys.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hero => "hero",
            Self::Services => "services",
            Self::About => "about",
            Self::Testimonials => "testimonials",
            Self::Gallery => "gallery",
            Self::Contact => "contact",
            Self::CallToAction => "call-to-action",
        }
    }

    /// Human-readable label.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Hero => "Hero",
            Self::Services => "Services",
            Self::About => "About",
            Self::Testimonials => "Testimonials",
            Self::Gallery => "Gallery",
            Self::Contact => "Contact",
            Self::CallToAction => "Call to Action",
        }
    }
}

impl fmt::Display for SectionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SectionType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| format!("unknown section type '{s}'"))
    }
}

/// One element of a list-valued content slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ListItem {
    /// A bare string, treated as the item's title.
    Text(String),
    /// Named fields such as `title`, `description`, `url`.
    Fields(BTreeMap<String, String>),
}

impl ListItem {
    /// Look up a field. A bare string answers to `title` and `text`.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&str> {
        match self {
            Self::Text(text) if matches!(name, "title" | "text") => Some(text),
            Self::Text(_) => None,
            Self::Fields(fields) => fields.get(name).map(String::as_str),
        }
    }

    fn is_blank(&self) -> bool {
        match self {
            Self::Text(text) => text.trim().is_empty(),
            Self::Fields(fields) => fields.values().all(|v| v.trim().is_empty()),
        }
    }
}

/// A raw content value as supplied by a content source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ContentValue {
    Text(String),
    List(Vec<ListItem>),
}

impl ContentValue {
    /// Convenience constructor for text values.
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    /// Convenience constructor for a list of bare strings.
    pub fn list<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::List(items.into_iter().map(|s| ListItem::Text(s.into())).collect())
    }

    /// Text content, if this is a text value.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::List(_) => None,
        }
    }

    /// List items, if this is a list value.
    #[must_use]
    pub fn as_list(&self) -> Option<&[ListItem]> {
        match self {
            Self::List(items) => Some(items),
            Self::Text(_) => None,
        }
    }

    /// Whether the value carries no usable content.
    ///
    /// Text must contain non-whitespace; lists need at least one non-blank item.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Text(text) => text.trim().is_empty(),
            Self::List(items) => items.iter().all(ListItem::is_blank),
        }
    }
}

/// Contact details of the client business.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactInfo {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
}

/// Business profile of the client.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientProfile {
    /// Company name.
    #[serde(default)]
    pub company: String,

    /// Short tagline, used in the theme description.
    #[serde(default)]
    pub tagline: Option<String>,

    /// Contact details.
    #[serde(default)]
    pub contact: ContactInfo,
}

/// Design tokens: colors and typography.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DesignTokens {
    /// Color palette, e.g. `primary = "#1d3557"`.
    #[serde(default)]
    pub colors: BTreeMap<String, String>,

    /// Typography, e.g. `heading = "Oswald, sans-serif"`.
    #[serde(default)]
    pub typography: BTreeMap<String, String>,
}

impl DesignTokens {
    /// Look up a dotted token key such as `colors.primary`.
    ///
    /// Only the `colors` and `typography` namespaces exist.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        let (namespace, name) = key.split_once('.')?;
        let table = match namespace {
            "colors" => &self.colors,
            "typography" => &self.typography,
            _ => return None,
        };
        table.get(name).map(String::as_str)
    }
}

/// One requested section on a page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionDescriptor {
    /// Section type.
    #[serde(rename = "type")]
    pub section_type: SectionType,

    /// Identifier used in the output path. Defaults to `{type}-{position}`.
    #[serde(default)]
    pub id: Option<String>,

    /// Explicit pattern id or variant name.
    #[serde(default)]
    pub variant: Option<String>,

    /// Tags steering variant selection.
    #[serde(default)]
    pub hints: Vec<String>,

    /// Section-level config overrides.
    #[serde(default)]
    pub config: ConfigMap,

    /// Literal content supplied by the blueprint author.
    #[serde(default)]
    pub content: ContentMap,
}

impl SectionDescriptor {
    /// Create a descriptor with no overrides.
    #[must_use]
    pub fn new(section_type: SectionType) -> Self {
        Self {
            section_type,
            id: None,
            variant: None,
            hints: Vec::new(),
            config: ConfigMap::new(),
            content: ContentMap::new(),
        }
    }

    /// Set an explicit id.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Request an explicit pattern id or variant name.
    #[must_use]
    pub fn with_variant(mut self, variant: impl Into<String>) -> Self {
        self.variant = Some(variant.into());
        self
    }

    /// Add a selection hint.
    #[must_use]
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hints.push(hint.into());
        self
    }

    /// Set one config override.
    #[must_use]
    pub fn with_config(mut self, key: impl Into<String>, value: impl Into<OptionValue>) -> Self {
        self.config.insert(key.into(), value.into());
        self
    }

    /// Set one literal content value.
    #[must_use]
    pub fn with_content(mut self, slot: impl Into<String>, value: ContentValue) -> Self {
        self.content.insert(slot.into(), value);
        self
    }

    /// Id of this section given its zero-based position on the page.
    #[must_use]
    pub fn effective_id(&self, position: usize) -> String {
        self.id
            .clone()
            .unwrap_or_else(|| format!("{}-{}", self.section_type.as_str(), position + 1))
    }
}

/// One page of the site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageSpec {
    /// URL slug, also used in output paths.
    pub slug: String,

    /// Page title.
    pub title: String,

    /// Whether the run fails when this page ends up empty.
    #[serde(default = "default_true")]
    pub required: bool,

    /// Whether this page is the site's front page.
    #[serde(default)]
    pub front: bool,

    /// Sections in display order.
    #[serde(default)]
    pub sections: Vec<SectionDescriptor>,
}

impl PageSpec {
    /// Create an empty required page.
    #[must_use]
    pub fn new(slug: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            slug: slug.into(),
            title: title.into(),
            required: true,
            front: false,
            sections: Vec::new(),
        }
    }

    /// Append a section.
    #[must_use]
    pub fn with_section(mut self, section: SectionDescriptor) -> Self {
        self.sections.push(section);
        self
    }

    /// Mark as the front page.
    #[must_use]
    pub fn as_front(mut self) -> Self {
        self.front = true;
        self
    }

    /// Mark as optional.
    #[must_use]
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }
}

/// Structured project description consumed by the generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Blueprint {
    /// Industry key, e.g. `construction`.
    pub industry: String,

    /// Preset id, e.g. `industrial-modern`.
    pub preset: String,

    /// Client business profile.
    #[serde(default)]
    pub client: ClientProfile,

    /// Design tokens.
    #[serde(default)]
    pub tokens: DesignTokens,

    /// Whether to request AI content for slots.
    #[serde(default = "default_true")]
    pub use_ai_content: bool,

    /// Pages in navigation order.
    #[serde(default)]
    pub pages: Vec<PageSpec>,
}

fn default_true() -> bool {
    true
}

impl Blueprint {
    /// Create an empty blueprint.
    #[must_use]
    pub fn new(industry: impl Into<String>, preset: impl Into<String>) -> Self {
        Self {
            industry: industry.into(),
            preset: preset.into(),
            client: ClientProfile::default(),
            tokens: DesignTokens::default(),
            use_ai_content: true,
            pages: Vec::new(),
        }
    }

    /// Append a page.
    #[must_use]
    pub fn with_page(mut self, page: PageSpec) -> Self {
        self.pages.push(page);
        self
    }

    /// Load a blueprint from a JSON, YAML or TOML file, chosen by extension.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);

        let blueprint: Blueprint = match ext.as_deref() {
            Some("json") => serde_json::from_str(&content)
                .map_err(|e| CoreError::blueprint(path, e.to_string()))?,
            Some("yaml" | "yml") => serde_yaml::from_str(&content)
                .map_err(|e| CoreError::blueprint(path, e.to_string()))?,
            Some("toml") => {
                toml::from_str(&content).map_err(|e| CoreError::blueprint(path, e.to_string()))?
            }
            _ => return Err(CoreError::UnsupportedFormat(path.to_path_buf())),
        };

        tracing::debug!(
            path = %path.display(),
            pages = blueprint.pages.len(),
            "loaded blueprint"
        );
        Ok(blueprint)
    }

    /// Structural problems that make the blueprint unusable.
    #[must_use]
    pub fn problems(&self) -> Vec<String> {
        let mut problems = Vec::new();

        if self.industry.trim().is_empty() {
            problems.push("industry is empty".to_string());
        }
        if self.preset.trim().is_empty() {
            problems.push("preset is empty".to_string());
        }
        if self.pages.is_empty() {
            problems.push("blueprint has no pages".to_string());
        }
        if self.pages.iter().filter(|p| p.front).count() > 1 {
            problems.push("more than one page is marked as front page".to_string());
        }

        for (page_index, page) in self.pages.iter().enumerate() {
            if !is_safe_segment(&page.slug) {
                problems.push(format!(
                    "page #{} has invalid slug '{}'",
                    page_index + 1,
                    page.slug
                ));
            }
            if page.title.trim().is_empty() {
                problems.push(format!("page '{}' has an empty title", page.slug));
            }
            for (position, section) in page.sections.iter().enumerate() {
                if let Some(id) = &section.id {
                    if !is_safe_segment(id) {
                        problems.push(format!(
                            "section #{} on page '{}' has invalid id '{}'",
                            position + 1,
                            page.slug,
                            id
                        ));
                    }
                }
            }
        }

        problems
    }

    /// Validate the blueprint, reporting every problem at once.
    pub fn validate(&self) -> Result<()> {
        let problems = self.problems();
        if problems.is_empty() {
            Ok(())
        } else {
            Err(CoreError::InvalidBlueprint(problems))
        }
    }
}
