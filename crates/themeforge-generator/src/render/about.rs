//! About section.

use themeforge_core::schema::{AboutConfig, AboutLayout};

use super::markup::{Colors, Markup, Slots};
use crate::sanitize::Sanitizer;

pub(super) fn render(c: &AboutConfig, slots: &Slots<'_>, s: &dyn Sanitizer) -> String {
    let mut m = Markup::new(s);
    let class = format!("themeforge-about is-layout-{}", c.layout.as_str());
    let heading = slots.text("heading").unwrap_or_default();

    m.open_group(&class, true, Colors::both(&c.background, &c.text_color), "");
    match c.layout {
        AboutLayout::Stacked => {
            if let Some(image) = slots.text("image") {
                m.image(image, heading, Some("about-image"));
            }
            text(&mut m, c, slots);
        }
        AboutLayout::ImageLeft | AboutLayout::ImageRight => {
            m.open_columns();
            if c.layout == AboutLayout::ImageLeft {
                image_column(&mut m, slots, heading);
                text_column(&mut m, c, slots);
            } else {
                text_column(&mut m, c, slots);
                image_column(&mut m, slots, heading);
            }
            m.close_columns();
        }
    }
    m.close_group();
    m.finish()
}

fn text(m: &mut Markup<'_>, c: &AboutConfig, slots: &Slots<'_>) {
    if let Some(heading) = slots.text("heading") {
        m.heading(2, heading, None, &c.heading_font);
    }
    if let Some(body) = slots.text("body") {
        m.rich_text(body);
    }
}

fn text_column(m: &mut Markup<'_>, c: &AboutConfig, slots: &Slots<'_>) {
    m.open_column(None);
    text(m, c, slots);
    m.close_column();
}

fn image_column(m: &mut Markup<'_>, slots: &Slots<'_>, alt: &str) {
    m.open_column(Some("about-media"));
    if let Some(image) = slots.text("image") {
        m.image(image, alt, None);
    }
    m.close_column();
}
