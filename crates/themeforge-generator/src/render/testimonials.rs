//! Testimonials section.

use themeforge_core::{
    blueprint::ListItem,
    schema::{TestimonialsConfig, TestimonialsLayout},
};

use super::markup::{Colors, Markup, Slots, column_count};
use crate::sanitize::Sanitizer;

pub(super) fn render(c: &TestimonialsConfig, slots: &Slots<'_>, s: &dyn Sanitizer) -> String {
    let mut m = Markup::new(s);
    let class = format!("themeforge-testimonials is-layout-{}", c.layout.as_str());
    let style = format!("--themeforge-accent:{};", s.css(&c.accent_color));

    m.open_group(&class, true, Colors::background(&c.background), &style);
    if let Some(heading) = slots.text("heading") {
        m.heading(2, heading, Some("center"), &c.heading_font);
    }

    let items: Vec<&ListItem> = slots
        .list("items")
        .iter()
        .filter(|item| quote_text(item).is_some())
        .collect();

    match c.layout {
        TestimonialsLayout::Single => {
            if let Some(item) = items.first() {
                quote(&mut m, item);
            }
        }
        TestimonialsLayout::Carousel => {
            m.open_group("testimonial-track", false, Colors::default(), "");
            for item in &items {
                quote(&mut m, item);
            }
            m.close_group();
        }
        TestimonialsLayout::Grid => {
            for row in items.chunks(column_count(c.columns)) {
                m.open_columns();
                for item in row {
                    m.open_column(None);
                    quote(&mut m, item);
                    m.close_column();
                }
                m.close_columns();
            }
        }
    }

    m.close_group();
    m.finish()
}

fn quote_text(item: &ListItem) -> Option<&str> {
    item.field("quote")
        .or_else(|| item.field("text"))
        .filter(|q| !q.trim().is_empty())
}

fn quote(m: &mut Markup<'_>, item: &ListItem) {
    let Some(text) = quote_text(item) else {
        return;
    };
    let cite = match (item.field("author"), item.field("role")) {
        (Some(author), Some(role)) => format!("{author}, {role}"),
        (Some(author), None) => author.to_string(),
        _ => String::new(),
    };

    m.open("quote", &Default::default(), "<blockquote class=\"wp-block-quote\">");
    m.paragraph(text, None, None);
    if !cite.is_empty() {
        let cite = m.s.text(&cite);
        m.line(&format!("<cite>{cite}</cite>"));
    }
    m.close("quote", "</blockquote>");
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use themeforge_core::blueprint::{ContentMap, ContentValue};

    use super::*;
    use crate::sanitize::HtmlSanitizer;

    fn config(layout: TestimonialsLayout) -> TestimonialsConfig {
        TestimonialsConfig {
            layout,
            columns: 2,
            background: "#f8fafc".to_string(),
            accent_color: "#2563eb".to_string(),
            heading_font: "inherit".to_string(),
        }
    }

    fn content() -> ContentMap {
        let fields = |quote: &str, author: &str| {
            ListItem::Fields(BTreeMap::from([
                ("quote".to_string(), quote.to_string()),
                ("author".to_string(), author.to_string()),
                ("role".to_string(), "Homeowner".to_string()),
            ]))
        };
        ContentMap::from([(
            "items".to_string(),
            ContentValue::List(vec![
                fields("On time and on budget.", "Dana"),
                fields("Great crew.", "Lee"),
                ListItem::Text("Would hire again.".to_string()),
            ]),
        )])
    }

    #[test]
    fn test_single_shows_first_quote() {
        let content = content();
        let out = render(&config(TestimonialsLayout::Single), &Slots(&content), &HtmlSanitizer);
        assert_eq!(out.matches("<!-- wp:quote -->").count(), 1);
        assert!(out.contains("<cite>Dana, Homeowner</cite>"));
    }

    #[test]
    fn test_grid_and_carousel_show_all() {
        let content = content();
        let grid = render(&config(TestimonialsLayout::Grid), &Slots(&content), &HtmlSanitizer);
        let carousel = render(&config(TestimonialsLayout::Carousel), &Slots(&content), &HtmlSanitizer);

        assert_eq!(grid.matches("<!-- wp:quote -->").count(), 3);
        assert_eq!(grid.matches("<!-- wp:columns -->").count(), 2);
        assert_eq!(carousel.matches("<!-- wp:quote -->").count(), 3);
        assert!(carousel.contains("testimonial-track"));
    }
}
