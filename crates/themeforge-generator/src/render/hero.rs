//! Hero section.

use themeforge_core::schema::{HeroConfig, HeroVariant};

use super::markup::{Colors, Markup, Slots};
use crate::sanitize::Sanitizer;

pub(super) fn render(c: &HeroConfig, slots: &Slots<'_>, s: &dyn Sanitizer) -> String {
    let mut m = Markup::new(s);
    let headline = slots.text("headline").unwrap_or_default();
    let style = format!(
        "min-height:{}vh;--themeforge-accent:{};",
        c.min_height.clamp(0, 100),
        s.css(&c.accent_color)
    );
    let class = format!("themeforge-hero is-variant-{}", c.variant.as_str());

    m.open_group(&class, true, Colors::both(&c.background, &c.text_color), &style);
    match c.variant {
        HeroVariant::Centered | HeroVariant::LeftAligned => {
            let align = if c.variant == HeroVariant::Centered {
                "center"
            } else {
                "left"
            };
            m.heading(1, headline, Some(align), &c.heading_font);
            if let Some(sub) = slots.text("subheadline") {
                m.paragraph(sub, Some(align), Some("hero-subheadline"));
            }
            call_to_action(&mut m, c, slots, align);
        }
        HeroVariant::Split => {
            m.open_columns();
            m.open_column(None);
            m.heading(1, headline, None, &c.heading_font);
            if let Some(sub) = slots.text("subheadline") {
                m.paragraph(sub, None, Some("hero-subheadline"));
            }
            call_to_action(&mut m, c, slots, "left");
            m.close_column();
            m.open_column(Some("hero-media"));
            if let Some(image) = slots.text("background_image") {
                m.image(image, headline, None);
            }
            m.close_column();
            m.close_columns();
        }
    }
    m.close_group();
    m.finish()
}

fn call_to_action(m: &mut Markup<'_>, c: &HeroConfig, slots: &Slots<'_>, justify: &str) {
    if !c.show_cta {
        return;
    }
    if let (Some(label), Some(url)) = (slots.text("cta_label"), slots.text("cta_url")) {
        m.buttons(label, url, false, Some(justify));
    }
}

#[cfg(test)]
mod tests {
    use themeforge_core::blueprint::{ContentMap, ContentValue};

    use super::*;
    use crate::sanitize::HtmlSanitizer;

    fn config(variant: HeroVariant) -> HeroConfig {
        HeroConfig {
            variant,
            background: "#1d3557".to_string(),
            text_color: "#ffffff".to_string(),
            accent_color: "#e63946".to_string(),
            heading_font: "inherit".to_string(),
            show_cta: true,
            min_height: 70,
        }
    }

    fn content() -> ContentMap {
        ContentMap::from([
            ("headline".to_string(), ContentValue::text("Built to last")),
            ("subheadline".to_string(), ContentValue::text("Since 1982")),
            ("cta_label".to_string(), ContentValue::text("Quote")),
            ("cta_url".to_string(), ContentValue::text("#contact")),
            ("background_image".to_string(), ContentValue::text("assets/images/hero.jpg")),
        ])
    }

    #[test]
    fn test_centered_and_left_aligned_differ() {
        let content = content();
        let centered = render(&config(HeroVariant::Centered), &Slots(&content), &HtmlSanitizer);
        let left = render(&config(HeroVariant::LeftAligned), &Slots(&content), &HtmlSanitizer);

        assert!(centered.contains("is-variant-centered"));
        assert!(centered.contains("has-text-align-center"));
        assert!(!centered.contains("has-text-align-left"));
        assert!(left.contains("is-variant-left-aligned"));
        assert!(left.contains("has-text-align-left"));
        assert!(!left.contains("has-text-align-center"));
    }

    #[test]
    fn test_split_uses_columns_and_image() {
        let content = content();
        let out = render(&config(HeroVariant::Split), &Slots(&content), &HtmlSanitizer);
        assert!(out.contains("<!-- wp:columns -->"));
        assert!(out.contains("src=\"assets/images/hero.jpg\""));
    }

    #[test]
    fn test_hidden_cta() {
        let content = content();
        let mut c = config(HeroVariant::Centered);
        c.show_cta = false;
        let out = render(&c, &Slots(&content), &HtmlSanitizer);
        assert!(!out.contains("wp:buttons"));
        assert!(out.contains("min-height:70vh"));
    }
}
