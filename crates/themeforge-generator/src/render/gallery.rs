//! Gallery section.

use serde_json::json;
use themeforge_core::{
    blueprint::ListItem,
    schema::{GalleryConfig, GalleryLayout},
};

use super::markup::{Attrs, Colors, Markup, Slots, column_count};
use crate::sanitize::Sanitizer;

pub(super) fn render(c: &GalleryConfig, slots: &Slots<'_>, s: &dyn Sanitizer) -> String {
    let mut m = Markup::new(s);
    let class = format!("themeforge-gallery is-layout-{}", c.layout.as_str());

    m.open_group(&class, true, Colors::background(&c.background), "");
    if let Some(heading) = slots.text("heading") {
        m.heading(2, heading, Some("center"), "inherit");
    }

    let columns = column_count(c.columns);
    let gap = c.gap.clamp(0, 128);
    let mut attrs = Attrs::new();
    attrs.insert("columns", json!(columns));
    attrs.insert("linkTo", json!("none"));
    attrs.insert("style", json!({ "spacing": { "blockGap": format!("{gap}px") } }));
    let mut classes = format!("wp-block-gallery has-nested-images columns-{columns}");
    if c.layout == GalleryLayout::Masonry {
        attrs.insert("className", json!("is-style-masonry"));
        classes.push_str(" is-style-masonry");
    }

    m.open(
        "gallery",
        &attrs,
        &format!("<figure class=\"{classes}\" style=\"gap:{gap}px\">"),
    );
    let image_class = c.rounded.then_some("is-style-rounded");
    for item in slots.list("images") {
        if let Some((src, alt)) = image_of(item) {
            m.image(src, alt, image_class);
        }
    }
    m.close("gallery", "</figure>");

    m.close_group();
    m.finish()
}

fn image_of(item: &ListItem) -> Option<(&str, &str)> {
    let src = match item {
        ListItem::Text(url) => Some(url.as_str()),
        ListItem::Fields(_) => item.field("url").or_else(|| item.field("src")),
    }
    .filter(|s| !s.trim().is_empty())?;
    let alt = item
        .field("alt")
        .or_else(|| item.field("caption"))
        .unwrap_or_default();
    Some((src, alt))
}
