//! Pattern definitions: declared config options and content slots.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::blueprint::{ContentValue, SectionType};

/// A config option value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionValue {
    Bool(bool),
    Int(i64),
    Text(String),
    List(Vec<String>),
}

impl OptionValue {
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }
}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Text(s) => f.write_str(s),
            Self::List(items) => write!(f, "[{}]", items.join(", ")),
        }
    }
}

impl From<&str> for OptionValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for OptionValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<bool> for OptionValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for OptionValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<Vec<String>> for OptionValue {
    fn from(value: Vec<String>) -> Self {
        Self::List(value)
    }
}

/// Declared type of a config option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionKind {
    /// One of the option's `choices`.
    Choice,
    /// Free text.
    Text,
    /// A CSS color: `#rgb`, `#rrggbb`, `#rrggbbaa` or a plain color keyword.
    Color,
    Bool,
    Int,
    /// A list of strings, always replaced wholesale when merged.
    List,
}

impl fmt::Display for OptionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Choice => "choice",
            Self::Text => "text",
            Self::Color => "color",
            Self::Bool => "bool",
            Self::Int => "int",
            Self::List => "list",
        };
        f.write_str(name)
    }
}

/// A declared config option of a pattern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionSpec {
    /// Option name.
    pub name: String,

    /// Value type.
    pub kind: OptionKind,

    /// Allowed values for `choice` options.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub choices: Vec<String>,

    /// Hard default.
    pub default: OptionValue,

    /// Design-token binding such as `colors.primary`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl OptionSpec {
    /// Whether `value` is valid for this option.
    #[must_use]
    pub fn accepts(&self, value: &OptionValue) -> bool {
        match (self.kind, value) {
            (OptionKind::Choice, OptionValue::Text(s)) => self.choices.iter().any(|c| c == s),
            (OptionKind::Text, OptionValue::Text(_)) => true,
            (OptionKind::Color, OptionValue::Text(s)) => is_css_color(s),
            (OptionKind::Bool, OptionValue::Bool(_)) => true,
            (OptionKind::Int, OptionValue::Int(_)) => true,
            (OptionKind::List, OptionValue::List(_)) => true,
            _ => false,
        }
    }
}

/// Check for a hex color or a plain alphabetic color keyword.
#[must_use]
pub fn is_css_color(s: &str) -> bool {
    if let Some(hex) = s.strip_prefix('#') {
        return matches!(hex.len(), 3 | 4 | 6 | 8) && hex.chars().all(|c| c.is_ascii_hexdigit());
    }
    !s.is_empty() && s.len() <= 32 && s.chars().all(|c| c.is_ascii_alphabetic())
}

/// Declared type of a content slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SlotKind {
    Text,
    #[serde(rename = "richtext")]
    RichText,
    ImageUrl,
    List,
}

impl SlotKind {
    /// Whether the value's shape fits this slot.
    #[must_use]
    pub fn accepts(&self, value: &ContentValue) -> bool {
        match self {
            Self::Text | Self::RichText | Self::ImageUrl => matches!(value, ContentValue::Text(_)),
            Self::List => matches!(value, ContentValue::List(_)),
        }
    }
}

impl fmt::Display for SlotKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Text => "text",
            Self::RichText => "richtext",
            Self::ImageUrl => "image-url",
            Self::List => "list",
        };
        f.write_str(name)
    }
}

/// A declared content slot of a pattern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotSpec {
    pub name: String,
    pub kind: SlotKind,
    #[serde(default)]
    pub required: bool,
    /// Value used when neither AI nor blueprint content supplies one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback: Option<ContentValue>,
}

/// A reusable, parametrized template for one section type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternDefinition {
    /// Stable pattern id.
    pub id: String,

    /// Section type implemented.
    pub section: SectionType,

    /// Variant name, unique among patterns of the same section type.
    pub variant: String,

    /// Tags matched against section hints.
    #[serde(default)]
    pub tags: Vec<String>,

    /// Declared config options.
    #[serde(default)]
    pub options: Vec<OptionSpec>,

    /// Declared content slots.
    #[serde(default)]
    pub slots: Vec<SlotSpec>,
}

impl PatternDefinition {
    /// Find a declared option.
    #[must_use]
    pub fn option(&self, name: &str) -> Option<&OptionSpec> {
        self.options.iter().find(|o| o.name == name)
    }

    /// Find a declared slot.
    #[must_use]
    pub fn slot(&self, name: &str) -> Option<&SlotSpec> {
        self.slots.iter().find(|s| s.name == name)
    }

    /// Whether the pattern matches an explicit variant request by id or variant name.
    #[must_use]
    pub fn answers_to(&self, requested: &str) -> bool {
        self.id == requested || self.variant == requested
    }

    /// Whether any tag matches any of the hints.
    #[must_use]
    pub fn matches_hints(&self, hints: &[String]) -> bool {
        hints.iter().any(|h| self.tags.iter().any(|t| t == h))
    }
}
