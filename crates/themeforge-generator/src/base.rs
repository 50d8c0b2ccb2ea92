//! Base theme files.
//!
//! Everything a block theme needs besides its section patterns: stylesheet
//! header, `theme.json`, PHP bootstrap, header and footer parts, the fallback
//! index template and the readme. Produced by a [`BaseThemeGenerator`] so the
//! pipeline can be pointed at a different starter theme.

use serde_json::{Value, json};
use thiserror::Error;
use themeforge_core::{
    blueprint::{ClientProfile, DesignTokens},
    config::ThemeConfig,
    output::GeneratedFile,
    path::{is_safe_segment, slugify},
    pattern::is_css_color,
};
use tracing::{debug, warn};

use crate::{
    render::markup::Attrs,
    sanitize::{Sanitizer, block_attrs, comment_safe},
    template::{TemplateContext, TemplateError, TemplateRegistry},
};

/// Base file paths in output order.
pub const BASE_FILE_ORDER: [&str; 7] = [
    "style.css",
    "theme.json",
    "functions.php",
    "parts/header.html",
    "parts/footer.html",
    "templates/index.html",
    "readme.txt",
];

/// Base theme generation errors.
#[derive(Debug, Error)]
pub enum BaseThemeError {
    #[error("template error: {0}")]
    Template(#[from] TemplateError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, BaseThemeError>;

/// Identity of the generated theme.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeIdentity {
    pub name: String,
    pub slug: String,
    pub text_domain: String,
    pub author: String,
    pub version: String,
    pub description: String,
}

impl ThemeIdentity {
    /// Fill unset theme settings from the client profile.
    #[must_use]
    pub fn resolve(theme: &ThemeConfig, client: &ClientProfile) -> Self {
        let company = client.company.trim();
        let name = theme
            .name
            .clone()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| {
                if company.is_empty() {
                    "Themeforge Theme".to_string()
                } else {
                    company.to_string()
                }
            });

        let slug = theme.slug.clone().unwrap_or_else(|| {
            let slug = slugify(&name);
            if is_safe_segment(&slug) {
                slug
            } else {
                "themeforge-theme".to_string()
            }
        });
        let text_domain = theme.text_domain.clone().unwrap_or_else(|| slug.clone());
        let description = client
            .tagline
            .clone()
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| format!("Block theme for {name}."));

        Self {
            name,
            slug,
            text_domain,
            author: theme.author.clone(),
            version: theme.version.clone(),
            description,
        }
    }

    /// Prefix for PHP function names.
    #[must_use]
    pub fn function_prefix(&self) -> String {
        let prefix = self.slug.replace('-', "_");
        if prefix.starts_with(|c: char| c.is_ascii_digit()) {
            format!("theme_{prefix}")
        } else {
            prefix
        }
    }
}

/// A page that ends up with a template, for navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageLink {
    pub slug: String,
    pub title: String,
    pub front: bool,
}

impl PageLink {
    #[must_use]
    pub fn url(&self) -> String {
        if self.front {
            "/".to_string()
        } else {
            format!("/{}/", self.slug)
        }
    }
}

/// Inputs available to a base theme generator.
pub struct SiteContext<'a> {
    pub theme: &'a ThemeIdentity,
    pub industry: &'a str,
    pub client: &'a ClientProfile,
    pub tokens: &'a DesignTokens,
    pub pages: &'a [PageLink],
    pub sanitizer: &'a dyn Sanitizer,
}

/// Produces the files every theme carries regardless of its sections.
pub trait BaseThemeGenerator: Send + Sync {
    fn generate(&self, site: &SiteContext<'_>) -> Result<Vec<GeneratedFile>>;
}

/// Default block theme skeleton.
#[derive(Debug, Clone)]
pub struct BlockThemeBase {
    templates: TemplateRegistry,
}

impl BlockThemeBase {
    /// Create the generator with its built-in templates.
    pub fn new() -> Result<Self> {
        let mut templates = TemplateRegistry::new();
        templates.register("style", STYLE_TEMPLATE)?;
        templates.register("functions", FUNCTIONS_TEMPLATE)?;
        templates.register("header", HEADER_TEMPLATE)?;
        templates.register("footer", FOOTER_TEMPLATE)?;
        templates.register("index", INDEX_TEMPLATE)?;
        templates.register("readme", README_TEMPLATE)?;
        Ok(Self { templates })
    }

    /// Replace one of the built-in templates.
    pub fn with_template(mut self, name: &str, source: &str) -> Result<Self> {
        self.templates.register(name, source)?;
        Ok(self)
    }

    fn context(site: &SiteContext<'_>) -> TemplateContext {
        let theme = site.theme;
        let s = site.sanitizer;

        let mut ctx = TemplateContext::new()
            .with_var("name", comment_safe(&theme.name))
            .with_var("slug", theme.slug.as_str())
            .with_var("text_domain", theme.text_domain.as_str())
            .with_var("author", comment_safe(&theme.author))
            .with_var("version", comment_safe(&theme.version))
            .with_var("description", comment_safe(&theme.description))
            .with_var("prefix", theme.function_prefix())
            .with_var("name_php", php_string(&theme.name))
            .with_var("version_php", php_string(&theme.version))
            .with_var("company_html", s.text(&site.client.company))
            .with_var("industry", comment_safe(site.industry))
            .with_var("navigation", navigation(site))
            .with_var("page_list", page_list(site.pages));

        let contact = footer_contact(site);
        if !contact.is_empty() {
            ctx.insert("contact", contact);
        }
        ctx
    }
}

impl BaseThemeGenerator for BlockThemeBase {
    fn generate(&self, site: &SiteContext<'_>) -> Result<Vec<GeneratedFile>> {
        let ctx = Self::context(site);
        let files = vec![
            GeneratedFile::new("style.css", self.templates.render("style", &ctx)?),
            GeneratedFile::new("theme.json", theme_json(site)?),
            GeneratedFile::new("functions.php", self.templates.render("functions", &ctx)?),
            GeneratedFile::new("parts/header.html", self.templates.render("header", &ctx)?),
            GeneratedFile::new("parts/footer.html", self.templates.render("footer", &ctx)?),
            GeneratedFile::new("templates/index.html", self.templates.render("index", &ctx)?),
            GeneratedFile::new("readme.txt", self.templates.render("readme", &ctx)?),
        ];
        debug!(theme = %site.theme.slug, files = files.len(), "generated base theme files");
        Ok(files)
    }
}

/// Escape a value for a single-quoted PHP string.
fn php_string(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('\'', "\\'")
        .chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect()
}

fn title_case(key: &str) -> String {
    key.split(['_', '-'])
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn theme_json(site: &SiteContext<'_>) -> Result<String> {
    let palette: Vec<Value> = site
        .tokens
        .colors
        .iter()
        .filter(|(key, color)| {
            let ok = is_css_color(color);
            if !ok {
                warn!(token = %key, value = %color, "skipping invalid color token in theme.json");
            }
            ok
        })
        .map(|(key, color)| {
            json!({
                "slug": slugify(key),
                "name": title_case(key),
                "color": color,
            })
        })
        .collect();

    let fonts: Vec<Value> = site
        .tokens
        .typography
        .iter()
        .map(|(key, family)| {
            json!({
                "slug": slugify(key),
                "name": title_case(key),
                "fontFamily": site.sanitizer.css(family),
            })
        })
        .collect();

    let custom_templates: Vec<Value> = site
        .pages
        .iter()
        .filter(|p| !p.front)
        .map(|p| {
            json!({
                "name": format!("page-{}", p.slug),
                "title": p.title,
                "postTypes": ["page"],
            })
        })
        .collect();

    let color = |key: &str| {
        site.tokens
            .colors
            .get(key)
            .filter(|c| is_css_color(c))
            .map(|c| json!(c))
    };
    let mut styles = serde_json::Map::new();
    let mut style_color = serde_json::Map::new();
    if let Some(bg) = color("background") {
        style_color.insert("background".to_string(), bg);
    }
    if let Some(text) = color("text") {
        style_color.insert("text".to_string(), text);
    }
    if !style_color.is_empty() {
        styles.insert("color".to_string(), Value::Object(style_color));
    }
    if let Some(primary) = color("primary") {
        styles.insert(
            "elements".to_string(),
            json!({ "link": { "color": { "text": primary } } }),
        );
    }

    let doc = json!({
        "$schema": "https://schemas.wp.org/trunk/theme.json",
        "version": 3,
        "settings": {
            "appearanceTools": true,
            "color": { "palette": palette },
            "typography": { "fontFamilies": fonts },
            "layout": { "contentSize": "760px", "wideSize": "1200px" },
        },
        "styles": Value::Object(styles),
        "templateParts": [
            { "name": "header", "title": "Header", "area": "header" },
            { "name": "footer", "title": "Footer", "area": "footer" },
        ],
        "customTemplates": custom_templates,
    });

    let mut out = serde_json::to_string_pretty(&doc)?;
    out.push('\n');
    Ok(out)
}

fn navigation(site: &SiteContext<'_>) -> String {
    let mut out = String::new();
    for page in site.pages {
        let mut attrs = Attrs::new();
        attrs.insert("kind", json!("custom"));
        attrs.insert("label", json!(page.title));
        attrs.insert("url", json!(page.url()));
        out.push_str(&format!("<!-- wp:navigation-link {} /-->\n", block_attrs(&attrs)));
    }
    out
}

fn footer_contact(site: &SiteContext<'_>) -> String {
    let s = site.sanitizer;
    let contact = &site.client.contact;
    let mut parts = Vec::new();
    if let Some(email) = contact.email.as_deref().filter(|e| !e.trim().is_empty()) {
        parts.push(format!(
            "<a href=\"{}\">{}</a>",
            s.url(&format!("mailto:{}", email.trim())),
            s.text(email)
        ));
    }
    if let Some(phone) = contact.phone.as_deref().filter(|p| !p.trim().is_empty()) {
        parts.push(s.text(phone));
    }
    if let Some(address) = contact.address.as_deref().filter(|a| !a.trim().is_empty()) {
        parts.push(s.text(address));
    }
    if parts.is_empty() {
        return String::new();
    }
    format!(
        "<!-- wp:paragraph {{\"className\":\"site-contact\"}} -->\n<p class=\"site-contact\">{}</p>\n<!-- /wp:paragraph -->\n",
        parts.join(" · ")
    )
}

fn page_list(pages: &[PageLink]) -> String {
    pages
        .iter()
        .map(|p| format!("* {} ({})\n", comment_safe(&p.title), p.url()))
        .collect()
}

const STYLE_TEMPLATE: &str = "/*
Theme Name: {{ name }}
Author: {{ author }}
Description: {{ description }}
Version: {{ version }}
Requires at least: 6.4
Requires PHP: 7.4
License: GNU General Public License v2 or later
License URI: https://www.gnu.org/licenses/gpl-2.0.html
Text Domain: {{ text_domain }}
*/
";

const FUNCTIONS_TEMPLATE: &str = "<?php
/**
 * {{ name }} functions.
 *
 * @package {{ slug }}
 */

if ( ! defined( 'ABSPATH' ) ) {
	exit;
}

function {{ prefix }}_setup() {
	add_theme_support( 'wp-block-styles' );
	add_editor_style( 'style.css' );
}
add_action( 'after_setup_theme', '{{ prefix }}_setup' );

function {{ prefix }}_enqueue_styles() {
	wp_enqueue_style( '{{ slug }}-style', get_stylesheet_uri(), array(), '{{ version_php }}' );
}
add_action( 'wp_enqueue_scripts', '{{ prefix }}_enqueue_styles' );

function {{ prefix }}_pattern_category() {
	register_block_pattern_category(
		'{{ slug }}',
		array( 'label' => __( '{{ name_php }}', '{{ text_domain }}' ) )
	);
}
add_action( 'init', '{{ prefix }}_pattern_category' );
";

const HEADER_TEMPLATE: &str = "<!-- wp:group {\"align\":\"full\",\"className\":\"site-header\",\"layout\":{\"type\":\"flex\",\"justifyContent\":\"space-between\"}} -->
<div class=\"wp-block-group alignfull site-header\">
<!-- wp:site-title {\"level\":0} /-->
<!-- wp:navigation {\"overlayMenu\":\"mobile\"} -->
{{ navigation }}<!-- /wp:navigation -->
</div>
<!-- /wp:group -->
";

const FOOTER_TEMPLATE: &str = "<!-- wp:group {\"align\":\"full\",\"className\":\"site-footer\",\"layout\":{\"type\":\"constrained\"}} -->
<div class=\"wp-block-group alignfull site-footer\">
{{ contact? }}<!-- wp:paragraph {\"align\":\"center\"} -->
<p class=\"has-text-align-center\">&copy; {{ company_html }}</p>
<!-- /wp:paragraph -->
</div>
<!-- /wp:group -->
";

const INDEX_TEMPLATE: &str = "<!-- wp:template-part {\"slug\":\"header\",\"tagName\":\"header\"} /-->
<!-- wp:group {\"tagName\":\"main\",\"layout\":{\"type\":\"constrained\"}} -->
<main class=\"wp-block-group\">
<!-- wp:post-title /-->
<!-- wp:post-content /-->
</main>
<!-- /wp:group -->
<!-- wp:template-part {\"slug\":\"footer\",\"tagName\":\"footer\"} /-->
";

const README_TEMPLATE: &str = "=== {{ name }} ===
Contributors: {{ author }}
Requires at least: 6.4
Tested up to: 6.6
Requires PHP: 7.4
Stable tag: {{ version }}
License: GPLv2 or later

{{ description }}

== Description ==

Block theme for the {{ industry }} industry.

== Pages ==

{{ page_list }}";

#[cfg(test)]
mod tests {
    use themeforge_core::blueprint::ContactInfo;

    use super::*;
    use crate::sanitize::HtmlSanitizer;

    fn client() -> ClientProfile {
        ClientProfile {
            company: "Acme & Sons Builders".to_string(),
            tagline: Some("Built to last.".to_string()),
            contact: ContactInfo {
                email: Some("hello@acme.test".to_string()),
                phone: Some("+1 555 0100".to_string()),
                ..ContactInfo::default()
            },
        }
    }

    fn tokens() -> DesignTokens {
        let mut tokens = DesignTokens::default();
        tokens.colors.insert("primary".to_string(), "#1d3557".to_string());
        tokens.colors.insert("background".to_string(), "#ffffff".to_string());
        tokens.colors.insert("broken".to_string(), "url(evil)".to_string());
        tokens.typography.insert("heading".to_string(), "Oswald, sans-serif".to_string());
        tokens
    }

    fn pages() -> Vec<PageLink> {
        vec![
            PageLink {
                slug: "home".to_string(),
                title: "Home".to_string(),
                front: true,
            },
            PageLink {
                slug: "services".to_string(),
                title: "Our Services".to_string(),
                front: false,
            },
        ]
    }

    fn generate(theme: &ThemeIdentity) -> Vec<GeneratedFile> {
        let client = client();
        let tokens = tokens();
        let pages = pages();
        let site = SiteContext {
            theme,
            industry: "construction",
            client: &client,
            tokens: &tokens,
            pages: &pages,
            sanitizer: &HtmlSanitizer,
        };
        BlockThemeBase::new().expect("templates").generate(&site).expect("generate")
    }

    #[test]
    fn test_identity_defaults_from_client() {
        let theme = ThemeIdentity::resolve(&ThemeConfig::default(), &client());
        assert_eq!(theme.name, "Acme & Sons Builders");
        assert_eq!(theme.slug, "acme-sons-builders");
        assert_eq!(theme.text_domain, "acme-sons-builders");
        assert_eq!(theme.description, "Built to last.");
        assert_eq!(theme.function_prefix(), "acme_sons_builders");
    }

    #[test]
    fn test_identity_prefers_config() {
        let config = ThemeConfig {
            name: Some("Acme".to_string()),
            slug: Some("9acme".to_string()),
            text_domain: Some("acme-td".to_string()),
            ..ThemeConfig::default()
        };
        let theme = ThemeIdentity::resolve(&config, &ClientProfile::default());
        assert_eq!(theme.slug, "9acme");
        assert_eq!(theme.text_domain, "acme-td");
        assert_eq!(theme.function_prefix(), "theme_9acme");
        assert_eq!(theme.description, "Block theme for Acme.");
    }

    #[test]
    fn test_base_files_in_order() {
        let theme = ThemeIdentity::resolve(&ThemeConfig::default(), &client());
        let files = generate(&theme);
        let paths: Vec<_> = files.iter().map(|f| f.path.as_str()).collect();
        assert_eq!(paths, BASE_FILE_ORDER);
    }

    #[test]
    fn test_style_header_and_functions() {
        let theme = ThemeIdentity::resolve(&ThemeConfig::default(), &client());
        let files = generate(&theme);

        let style = &files[0].content;
        assert!(style.starts_with("/*\nTheme Name: Acme & Sons Builders\n"));
        assert!(style.contains("Text Domain: acme-sons-builders\n"));

        let functions = &files[2].content;
        assert!(functions.contains("function acme_sons_builders_setup()"));
        assert!(functions.contains("'acme-sons-builders-style'"));
    }

    #[test]
    fn test_theme_json_palette() {
        let theme = ThemeIdentity::resolve(&ThemeConfig::default(), &client());
        let files = generate(&theme);
        let doc: Value = serde_json::from_str(&files[1].content).expect("valid json");

        let palette = doc["settings"]["color"]["palette"].as_array().expect("palette");
        assert_eq!(palette.len(), 2);
        assert_eq!(palette[1]["slug"], "primary");
        assert_eq!(doc["styles"]["elements"]["link"]["color"]["text"], "#1d3557");
        assert_eq!(doc["customTemplates"][0]["name"], "page-services");
        assert_eq!(doc["customTemplates"].as_array().map(Vec::len), Some(1));
    }

    #[test]
    fn test_header_and_footer_markup() {
        let theme = ThemeIdentity::resolve(&ThemeConfig::default(), &client());
        let files = generate(&theme);

        let header = &files[3].content;
        assert!(header.contains(r#"{"kind":"custom","label":"Our Services","url":"/services/"}"#));
        let footer = &files[4].content;
        assert!(footer.contains("&copy; Acme &amp; Sons Builders"));
        assert!(footer.contains("href=\"mailto:hello@acme.test\""));
    }

    #[test]
    fn test_php_string_escaping() {
        assert_eq!(php_string(r"O'Brien \ Co"), r"O\'Brien \\ Co");
    }
}
