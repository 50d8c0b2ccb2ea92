//! Call-to-action section.

use themeforge_core::schema::{ButtonStyle, CallToActionConfig, CtaLayout};

use super::markup::{Colors, Markup, Slots};
use crate::sanitize::Sanitizer;

pub(super) fn render(c: &CallToActionConfig, slots: &Slots<'_>, s: &dyn Sanitizer) -> String {
    let mut m = Markup::new(s);
    let full = c.layout == CtaLayout::Banner;
    let class = format!("themeforge-cta is-layout-{}", c.layout.as_str());
    let style = if full { "" } else { "border-radius:12px;" };

    m.open_group(&class, full, Colors::both(&c.background, &c.text_color), style);
    if let Some(headline) = slots.text("headline") {
        m.heading(2, headline, Some("center"), &c.heading_font);
    }
    if let Some(body) = slots.text("body") {
        m.paragraph(body, Some("center"), None);
    }
    if let (Some(label), Some(url)) = (slots.text("button_label"), slots.text("button_url")) {
        m.buttons(label, url, c.button_style == ButtonStyle::Outline, Some("center"));
    }
    m.close_group();
    m.finish()
}

#[cfg(test)]
mod tests {
    use themeforge_core::blueprint::{ContentMap, ContentValue};

    use super::*;
    use crate::sanitize::HtmlSanitizer;

    fn content() -> ContentMap {
        ContentMap::from([
            ("headline".to_string(), ContentValue::text("Ready to build?")),
            ("button_label".to_string(), ContentValue::text("Get a quote")),
            ("button_url".to_string(), ContentValue::text("https://acme.test/quote")),
        ])
    }

    #[test]
    fn test_banner_outline_vs_boxed_fill() {
        let content = content();
        let banner = render(
            &CallToActionConfig {
                layout: CtaLayout::Banner,
                background: "#1d3557".to_string(),
                text_color: "#ffffff".to_string(),
                button_style: ButtonStyle::Outline,
                heading_font: "inherit".to_string(),
            },
            &Slots(&content),
            &HtmlSanitizer,
        );
        let boxed = render(
            &CallToActionConfig {
                layout: CtaLayout::Boxed,
                background: "#f1f5f9".to_string(),
                text_color: "#111827".to_string(),
                button_style: ButtonStyle::Fill,
                heading_font: "inherit".to_string(),
            },
            &Slots(&content),
            &HtmlSanitizer,
        );

        assert!(banner.contains("alignfull"));
        assert!(banner.contains("is-style-outline"));
        assert!(!boxed.contains("alignfull"));
        assert!(!boxed.contains("is-style-outline"));
        assert!(boxed.contains("border-radius:12px"));
        assert!(boxed.contains("href=\"https://acme.test/quote\""));
    }
}
