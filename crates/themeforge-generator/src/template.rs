//! String templates for the base theme files.
//!
//! Placeholders are written `{{ name }}`; `{{ name? }}` renders as empty when
//! the variable is unset. Templates are parsed once, so syntax errors surface
//! at registration time rather than per render.

use std::collections::BTreeMap;

use thiserror::Error;

/// Template errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemplateError {
    #[error("template '{template}' needs variable '{variable}'")]
    MissingVariable { template: String, variable: String },

    #[error("template not found: {0}")]
    NotFound(String),

    #[error("invalid template syntax in '{template}': {message}")]
    InvalidSyntax { template: String, message: String },
}

pub type Result<T> = std::result::Result<T, TemplateError>;

/// Variables available to a render.
#[derive(Debug, Clone, Default)]
pub struct TemplateContext {
    variables: BTreeMap<String, String>,
}

impl TemplateContext {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.variables.insert(key.into(), value.into());
    }

    #[must_use]
    pub fn with_var(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.variables.get(key).map(String::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Variable { name: String, optional: bool },
}

/// A parsed template.
#[derive(Debug, Clone)]
pub struct Template {
    name: String,
    segments: Vec<Segment>,
}

impl Template {
    /// Parse `source` into a template.
    pub fn parse(name: impl Into<String>, source: &str) -> Result<Self> {
        let name = name.into();
        let mut segments = Vec::new();
        let mut rest = source;

        while let Some(start) = rest.find("{{") {
            if start > 0 {
                segments.push(Segment::Literal(rest[..start].to_string()));
            }
            let after = &rest[start + 2..];
            let end = after.find("}}").ok_or_else(|| TemplateError::InvalidSyntax {
                template: name.clone(),
                message: "unclosed {{ delimiter".to_string(),
            })?;

            let inner = after[..end].trim();
            let (var, optional) = match inner.strip_suffix('?') {
                Some(stripped) => (stripped.trim(), true),
                None => (inner, false),
            };
            if var.is_empty() || !var.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
                return Err(TemplateError::InvalidSyntax {
                    template: name,
                    message: format!("bad variable name '{inner}'"),
                });
            }
            segments.push(Segment::Variable {
                name: var.to_string(),
                optional,
            });
            rest = &after[end + 2..];
        }
        if !rest.is_empty() {
            segments.push(Segment::Literal(rest.to_string()));
        }

        Ok(Self { name, segments })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Render with the given context. Values are inserted verbatim.
    pub fn render(&self, context: &TemplateContext) -> Result<String> {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Variable { name, optional } => match context.get(name) {
                    Some(value) => out.push_str(value),
                    None if *optional => {}
                    None => {
                        return Err(TemplateError::MissingVariable {
                            template: self.name.clone(),
                            variable: name.clone(),
                        });
                    }
                },
            }
        }
        Ok(out)
    }
}

/// Named templates.
#[derive(Debug, Clone, Default)]
pub struct TemplateRegistry {
    templates: BTreeMap<String, Template>,
}

impl TemplateRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and register a template, replacing any with the same name.
    pub fn register(&mut self, name: &str, source: &str) -> Result<()> {
        let template = Template::parse(name, source)?;
        self.templates.insert(template.name.clone(), template);
        Ok(())
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Template> {
        self.templates.get(name)
    }

    pub fn render(&self, name: &str, context: &TemplateContext) -> Result<String> {
        self.get(name)
            .ok_or_else(|| TemplateError::NotFound(name.to_string()))?
            .render(context)
    }
}
