//! Services section.

use themeforge_core::{
    blueprint::ListItem,
    schema::{ServicesConfig, ServicesLayout},
};

use super::markup::{Colors, Markup, Slots, column_count};
use crate::sanitize::Sanitizer;

pub(super) fn render(c: &ServicesConfig, slots: &Slots<'_>, s: &dyn Sanitizer) -> String {
    let mut m = Markup::new(s);
    let class = format!("themeforge-services is-layout-{}", c.layout.as_str());
    let style = format!("--themeforge-accent:{};", s.css(&c.accent_color));

    m.open_group(&class, true, Colors::background(&c.background), &style);
    if let Some(heading) = slots.text("heading") {
        m.heading(2, heading, Some("center"), &c.heading_font);
    }
    if let Some(intro) = slots.text("intro") {
        m.rich_text(intro);
    }

    let items: Vec<&ListItem> = slots
        .list("items")
        .iter()
        .filter(|item| item.field("title").is_some_and(|t| !t.trim().is_empty()))
        .collect();

    match c.layout {
        ServicesLayout::List => {
            m.open("list", &Default::default(), "<ul class=\"wp-block-list\">");
            for item in &items {
                let title = item.field("title").unwrap_or_default();
                let line = match item.field("description") {
                    Some(desc) => format!(
                        "<li><strong>{}</strong> {}</li>",
                        s.text(title),
                        s.text(desc)
                    ),
                    None => format!("<li>{}</li>", s.text(title)),
                };
                m.open("list-item", &Default::default(), "");
                m.line(&line);
                m.close("list-item", "");
            }
            m.close("list", "</ul>");
        }
        ServicesLayout::Grid | ServicesLayout::Cards => {
            let per_row = column_count(c.columns);
            let card = c.layout == ServicesLayout::Cards;
            for row in items.chunks(per_row) {
                m.open_columns();
                for item in row {
                    m.open_column(card.then_some("is-style-card"));
                    service(&mut m, c, item);
                    m.close_column();
                }
                m.close_columns();
            }
        }
    }

    m.close_group();
    m.finish()
}

fn service(m: &mut Markup<'_>, c: &ServicesConfig, item: &ListItem) {
    if c.show_icons {
        let icon = item.field("icon").unwrap_or("◆");
        m.paragraph(icon, Some("center"), Some("service-icon"));
    }
    m.heading(3, item.field("title").unwrap_or_default(), None, &c.heading_font);
    if let Some(desc) = item.field("description") {
        m.paragraph(desc, None, None);
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use themeforge_core::blueprint::{ContentMap, ContentValue};

    use super::*;
    use crate::sanitize::HtmlSanitizer;

    fn config(layout: ServicesLayout, columns: i64) -> ServicesConfig {
        ServicesConfig {
            layout,
            columns,
            background: "#ffffff".to_string(),
            accent_color: "#2563eb".to_string(),
            heading_font: "inherit".to_string(),
            show_icons: false,
        }
    }

    fn content() -> ContentMap {
        let framing = ListItem::Fields(BTreeMap::from([
            ("title".to_string(), "Framing".to_string()),
            ("description".to_string(), "Timber & steel".to_string()),
        ]));
        ContentMap::from([(
            "items".to_string(),
            ContentValue::List(vec![
                ListItem::Text("Roofing".to_string()),
                framing,
                ListItem::Text("Decks".to_string()),
                ListItem::Text("  ".to_string()),
            ]),
        )])
    }

    #[test]
    fn test_grid_rows_follow_columns() {
        let content = content();
        let out = render(&config(ServicesLayout::Grid, 2), &Slots(&content), &HtmlSanitizer);
        assert_eq!(out.matches("<!-- wp:columns -->").count(), 2);
        assert_eq!(out.matches("<!-- wp:column -->").count(), 3);
        assert!(out.contains("Timber &amp; steel"));
    }

    #[test]
    fn test_cards_mark_columns() {
        let content = content();
        let out = render(&config(ServicesLayout::Cards, 3), &Slots(&content), &HtmlSanitizer);
        assert_eq!(out.matches("is-style-card").count(), 6);
    }

    #[test]
    fn test_list_layout() {
        let content = content();
        let out = render(&config(ServicesLayout::List, 1), &Slots(&content), &HtmlSanitizer);
        assert!(out.contains("<li>Roofing</li>"));
        assert!(out.contains("<li><strong>Framing</strong> Timber &amp; steel</li>"));
        assert!(!out.contains("wp:columns"));
    }
}
