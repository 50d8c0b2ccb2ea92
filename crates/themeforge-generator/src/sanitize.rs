//! Output sanitization.
//!
//! Renderers never write raw content; every value passes through a
//! [`Sanitizer`] matching its output context.

use std::collections::BTreeMap;

use serde_json::Value;

/// URL schemes allowed in generated links.
const ALLOWED_SCHEMES: [&str; 4] = ["http", "https", "mailto", "tel"];

/// Replacement for rejected URLs.
const REJECTED_URL: &str = "#";

/// Context-aware escaping for generated markup.
pub trait Sanitizer: Send + Sync {
    /// Escape visible text content.
    fn text(&self, value: &str) -> String;

    /// Escape a double-quoted attribute value.
    fn attr(&self, value: &str) -> String;

    /// Validate and escape a URL for an `href` or `src` attribute.
    fn url(&self, value: &str) -> String;

    /// Reduce a value to characters safe inside an inline `style` declaration.
    fn css(&self, value: &str) -> String {
        value
            .chars()
            .filter(|c| c.is_ascii_alphanumeric() || matches!(c, ' ' | ',' | '-' | '#' | '.' | '_' | '%'))
            .collect::<String>()
            .trim()
            .to_string()
    }
}

/// Default sanitizer built on `html-escape`.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlSanitizer;

impl Sanitizer for HtmlSanitizer {
    fn text(&self, value: &str) -> String {
        html_escape::encode_text(value).into_owned()
    }

    fn attr(&self, value: &str) -> String {
        html_escape::encode_double_quoted_attribute(value).into_owned()
    }

    fn url(&self, value: &str) -> String {
        if is_allowed_url(value) {
            self.attr(value.trim())
        } else {
            REJECTED_URL.to_string()
        }
    }
}

/// Check a URL against the scheme allow-list. Scheme-less relative URLs pass.
#[must_use]
pub fn is_allowed_url(value: &str) -> bool {
    let value = value.trim();
    if value.is_empty() || value.starts_with("//") {
        return false;
    }
    if value.chars().any(|c| c.is_control() || c.is_whitespace()) {
        return false;
    }

    let scheme_end = value.find(':');
    let path_start = value.find(['/', '?', '#']);
    match (scheme_end, path_start) {
        (Some(colon), Some(path)) if path < colon => true,
        (Some(colon), _) => {
            let scheme = value[..colon].to_ascii_lowercase();
            ALLOWED_SCHEMES.contains(&scheme.as_str())
        }
        (None, _) => true,
    }
}

/// Serialize block attributes for a block delimiter comment.
///
/// Keys come out sorted. Sequences that could end the surrounding HTML
/// comment or open markup are unicode-escaped.
#[must_use]
pub fn block_attrs(attrs: &BTreeMap<&str, Value>) -> String {
    let json = Value::Object(
        attrs
            .iter()
            .map(|(k, v)| ((*k).to_string(), v.clone()))
            .collect(),
    )
    .to_string();

    json.replace("--", "\\u002d\\u002d")
        .replace('<', "\\u003c")
        .replace('>', "\\u003e")
        .replace('&', "\\u0026")
}

/// Make a value safe inside a PHP doc comment.
#[must_use]
pub fn comment_safe(value: &str) -> String {
    value
        .replace("*/", "* /")
        .chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_text_escapes_markup() {
        let s = HtmlSanitizer;
        assert_eq!(s.text("<script>alert(1)</script>"), "&lt;script&gt;alert(1)&lt;/script&gt;");
        assert_eq!(s.text("Smith & Sons"), "Smith &amp; Sons");
    }

    #[test]
    fn test_attr_escapes_quotes() {
        let s = HtmlSanitizer;
        assert_eq!(s.attr(r#"" onload="x"#), "&quot; onload=&quot;x");
    }

    #[test]
    fn test_url_allow_list() {
        let s = HtmlSanitizer;
        assert_eq!(s.url("https://acme.test/a?b=1&c=2"), "https://acme.test/a?b=1&amp;c=2");
        assert_eq!(s.url("mailto:hello@acme.test"), "mailto:hello@acme.test");
        assert_eq!(s.url("tel:+15550100"), "tel:+15550100");
        assert_eq!(s.url("#contact"), "#contact");
        assert_eq!(s.url("assets/images/hero.jpg"), "assets/images/hero.jpg");
        assert_eq!(s.url("/about?x=a:b"), "/about?x=a:b");
        assert_eq!(s.url("javascript:alert(1)"), "#");
        assert_eq!(s.url("JavaScript:alert(1)"), "#");
        assert_eq!(s.url("java\tscript:alert(1)"), "#");
        assert_eq!(s.url("data:text/html;base64,AAAA"), "#");
        assert_eq!(s.url("//evil.test/x"), "#");
        assert_eq!(s.url(""), "#");
    }

    #[test]
    fn test_css_strips_declaration_breakers() {
        let s = HtmlSanitizer;
        assert_eq!(s.css("Oswald, sans-serif"), "Oswald, sans-serif");
        assert_eq!(s.css("red;background:url(x)"), "redbackgroundurlx");
    }

    #[test]
    fn test_block_attrs_cannot_close_comment() {
        let mut attrs = BTreeMap::new();
        attrs.insert("className", json!("a--><script>"));
        attrs.insert("align", json!("full"));
        let out = block_attrs(&attrs);

        assert!(out.starts_with(r#"{"align":"full","#));
        assert!(!out.contains("-->"));
        assert!(!out.contains('<'));
    }

    #[test]
    fn test_comment_safe() {
        assert_eq!(comment_safe("Title */ <?php"), "Title * / <?php");
    }
}
