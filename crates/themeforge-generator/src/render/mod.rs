//! Section rendering.
//!
//! [`render`] is a pure function of pattern, merged config and resolved
//! content: the same inputs always give the same bytes. Dispatch happens on
//! the typed section config, one module per section type.

mod about;
mod contact;
mod cta;
mod gallery;
mod hero;
pub(crate) mod markup;
mod services;
mod testimonials;

use themeforge_core::{
    blueprint::{ConfigMap, ContentMap},
    output::ResolvedSection,
    path::join_segments,
    pattern::PatternDefinition,
    schema::{SchemaError, SectionConfig},
};

use self::markup::Slots;
use crate::sanitize::{Sanitizer, comment_safe};

/// Render a section's block markup.
pub fn render(
    pattern: &PatternDefinition,
    config: &ConfigMap,
    content: &ContentMap,
    sanitizer: &dyn Sanitizer,
) -> Result<String, SchemaError> {
    let typed = SectionConfig::from_merged(pattern.section, config)?;
    let slots = Slots(content);

    Ok(match &typed {
        SectionConfig::Hero(c) => hero::render(c, &slots, sanitizer),
        SectionConfig::Services(c) => services::render(c, &slots, sanitizer),
        SectionConfig::About(c) => about::render(c, &slots, sanitizer),
        SectionConfig::Testimonials(c) => testimonials::render(c, &slots, sanitizer),
        SectionConfig::Gallery(c) => gallery::render(c, &slots, sanitizer),
        SectionConfig::Contact(c) => contact::render(c, &slots, sanitizer),
        SectionConfig::CallToAction(c) => cta::render(c, &slots, sanitizer),
    })
}

/// Pattern registration slug of a section.
#[must_use]
pub fn pattern_slug(theme_slug: &str, section: &ResolvedSection) -> String {
    format!(
        "{theme_slug}/{}",
        join_segments(&section.section.page, &section.section.section)
    )
}

/// Render a complete pattern file: PHP header comment, then block markup.
pub fn render_pattern_file(
    section: &ResolvedSection,
    theme_slug: &str,
    sanitizer: &dyn Sanitizer,
) -> Result<String, SchemaError> {
    let body = render(&section.pattern, &section.config, &section.content, sanitizer)?;
    let at = &section.section;

    let mut out = String::from("<?php\n/**\n");
    out.push_str(&format!(
        " * Title: {}\n",
        comment_safe(&format!("{} ({}/{})", at.section_type.label(), at.page, at.section))
    ));
    out.push_str(&format!(
        " * Slug: {}\n",
        comment_safe(&pattern_slug(theme_slug, section))
    ));
    out.push_str(&format!(
        " * Categories: {}, {}\n",
        comment_safe(theme_slug),
        at.section_type.as_str()
    ));
    out.push_str(&format!(
        " * Description: {} pattern, {} variant.\n",
        comment_safe(&section.pattern.id),
        comment_safe(&section.pattern.variant)
    ));
    out.push_str(" * Inserter: no\n */\n?>\n");
    out.push_str(&body);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use themeforge_core::{
        blueprint::{ContentValue, SectionType},
        output::SectionRef,
        pattern::OptionValue,
    };
    use themeforge_patterns::PatternRegistry;

    use super::*;
    use crate::{merge, sanitize::HtmlSanitizer};

    fn hero_section(variant: &str) -> ResolvedSection {
        let registry = PatternRegistry::builtin().expect("builtin");
        let pattern = registry.get_definition("hero-centered").expect("pattern").clone();
        let mut config = merge::defaults(&pattern);
        config.insert("variant".to_string(), OptionValue::from(variant));

        ResolvedSection {
            section: SectionRef {
                page: "home".to_string(),
                section: "hero-1".to_string(),
                section_type: SectionType::Hero,
                page_index: 0,
                section_index: 0,
            },
            pattern,
            config,
            content: ContentMap::from([
                ("headline".to_string(), ContentValue::text("Built <to> last")),
                ("cta_label".to_string(), ContentValue::text("Call us")),
                ("cta_url".to_string(), ContentValue::text("tel:+15550100")),
            ]),
            sources: BTreeMap::new(),
            warnings: vec![],
        }
    }

    #[test]
    fn test_pattern_file_header() {
        let out = render_pattern_file(&hero_section("centered"), "acme-builders", &HtmlSanitizer)
            .expect("render");

        assert!(out.starts_with("<?php\n/**\n * Title: Hero (home/hero-1)\n"));
        assert!(out.contains(" * Slug: acme-builders/home--hero-1\n"));
        assert!(out.contains(" * Categories: acme-builders, hero\n"));
        assert!(out.contains("Built &lt;to&gt; last"));
        assert!(out.contains("href=\"tel:+15550100\""));
    }

    #[test]
    fn test_render_is_deterministic() {
        let section = hero_section("split");
        let a = render_pattern_file(&section, "acme", &HtmlSanitizer).expect("render");
        let b = render_pattern_file(&section, "acme", &HtmlSanitizer).expect("render");
        assert_eq!(a, b);
    }

    #[test]
    fn test_bad_config_is_schema_error() {
        let mut section = hero_section("centered");
        section.config.remove("min_height");
        assert!(render_pattern_file(&section, "acme", &HtmlSanitizer).is_err());
    }
}
