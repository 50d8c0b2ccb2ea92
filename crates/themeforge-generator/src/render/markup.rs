//! Block markup building blocks shared by the section renderers.

use std::collections::BTreeMap;

use serde_json::{Value, json};
use themeforge_core::blueprint::{ContentMap, ListItem};

use crate::sanitize::{Sanitizer, block_attrs};

pub(crate) type Attrs = BTreeMap<&'static str, Value>;

/// Read access to resolved slot values.
pub(crate) struct Slots<'a>(pub(crate) &'a ContentMap);

impl<'a> Slots<'a> {
    pub(crate) fn text(&self, name: &str) -> Option<&'a str> {
        self.0
            .get(name)
            .and_then(|v| v.as_text())
            .filter(|s| !s.trim().is_empty())
    }

    pub(crate) fn list(&self, name: &str) -> &'a [ListItem] {
        self.0
            .get(name)
            .and_then(|v| v.as_list())
            .unwrap_or_default()
    }
}

/// Accumulates block markup line by line.
pub(crate) struct Markup<'s> {
    out: String,
    pub(crate) s: &'s dyn Sanitizer,
}

impl<'s> Markup<'s> {
    pub(crate) fn new(sanitizer: &'s dyn Sanitizer) -> Self {
        Self {
            out: String::new(),
            s: sanitizer,
        }
    }

    pub(crate) fn line(&mut self, text: &str) {
        self.out.push_str(text);
        self.out.push('\n');
    }

    /// Opening block delimiter followed by the wrapper element.
    pub(crate) fn open(&mut self, block: &str, attrs: &Attrs, element: &str) {
        if attrs.is_empty() {
            self.line(&format!("<!-- wp:{block} -->"));
        } else {
            self.line(&format!("<!-- wp:{block} {} -->", block_attrs(attrs)));
        }
        if !element.is_empty() {
            self.line(element);
        }
    }

    /// Closing wrapper element followed by the block delimiter.
    pub(crate) fn close(&mut self, block: &str, element: &str) {
        if !element.is_empty() {
            self.line(element);
        }
        self.line(&format!("<!-- /wp:{block} -->"));
    }

    /// Group block with optional background and text colors.
    pub(crate) fn open_group(&mut self, class: &str, full: bool, colors: Colors<'_>, extra_style: &str) {
        let mut attrs = Attrs::new();
        let mut classes = vec!["wp-block-group".to_string()];
        if full {
            attrs.insert("align", json!("full"));
            classes.push("alignfull".to_string());
        }
        if !class.is_empty() {
            attrs.insert("className", json!(class));
            classes.push(class.to_string());
        }

        let mut style = String::new();
        let mut color = serde_json::Map::new();
        if let Some(text) = colors.text {
            let text = self.s.css(text);
            color.insert("text".to_string(), json!(text));
            classes.push("has-text-color".to_string());
            style.push_str(&format!("color:{text};"));
        }
        if let Some(bg) = colors.background {
            let bg = self.s.css(bg);
            color.insert("background".to_string(), json!(bg));
            classes.push("has-background".to_string());
            style.push_str(&format!("background-color:{bg};"));
        }
        if !color.is_empty() {
            attrs.insert("style", json!({ "color": color }));
        }
        attrs.insert("layout", json!({ "type": "constrained" }));
        style.push_str(extra_style);

        let element = if style.is_empty() {
            format!("<div class=\"{}\">", self.s.attr(&classes.join(" ")))
        } else {
            format!(
                "<div class=\"{}\" style=\"{}\">",
                self.s.attr(&classes.join(" ")),
                self.s.attr(&style)
            )
        };
        self.open("group", &attrs, &element);
    }

    pub(crate) fn close_group(&mut self) {
        self.close("group", "</div>");
    }

    pub(crate) fn heading(&mut self, level: u8, text: &str, align: Option<&str>, font: &str) {
        let mut attrs = Attrs::new();
        let mut classes = vec!["wp-block-heading".to_string()];
        if level != 2 {
            attrs.insert("level", json!(level));
        }
        if let Some(align) = align {
            attrs.insert("textAlign", json!(align));
            classes.push(format!("has-text-align-{align}"));
        }
        let font = self.s.css(font);
        let style = if font.is_empty() || font == "inherit" {
            String::new()
        } else {
            attrs.insert("style", json!({ "typography": { "fontFamily": font } }));
            format!(" style=\"font-family:{}\"", self.s.attr(&font))
        };

        self.open("heading", &attrs, "");
        self.line(&format!(
            "<h{level} class=\"{}\"{style}>{}</h{level}>",
            self.s.attr(&classes.join(" ")),
            self.s.text(text)
        ));
        self.close("heading", "");
    }

    pub(crate) fn paragraph(&mut self, text: &str, align: Option<&str>, class: Option<&str>) {
        let mut attrs = Attrs::new();
        let mut classes = Vec::new();
        if let Some(align) = align {
            attrs.insert("align", json!(align));
            classes.push(format!("has-text-align-{align}"));
        }
        if let Some(class) = class {
            attrs.insert("className", json!(class));
            classes.push(class.to_string());
        }
        let class_attr = if classes.is_empty() {
            String::new()
        } else {
            format!(" class=\"{}\"", self.s.attr(&classes.join(" ")))
        };

        self.open("paragraph", &attrs, "");
        self.line(&format!("<p{class_attr}>{}</p>", self.s.text(text)));
        self.close("paragraph", "");
    }

    /// Rich text: one paragraph block per blank-line-separated chunk.
    pub(crate) fn rich_text(&mut self, text: &str) {
        for chunk in text.split("\n\n").map(str::trim).filter(|c| !c.is_empty()) {
            self.paragraph(chunk, None, None);
        }
    }

    pub(crate) fn buttons(&mut self, label: &str, url: &str, outline: bool, justify: Option<&str>) {
        let mut attrs = Attrs::new();
        if let Some(justify) = justify {
            attrs.insert("layout", json!({ "type": "flex", "justifyContent": justify }));
        }
        self.open("buttons", &attrs, "<div class=\"wp-block-buttons\">");

        let mut button = Attrs::new();
        let class = if outline {
            button.insert("className", json!("is-style-outline"));
            "wp-block-button is-style-outline"
        } else {
            "wp-block-button"
        };
        self.open("button", &button, "");
        self.line(&format!(
            "<div class=\"{class}\"><a class=\"wp-block-button__link wp-element-button\" href=\"{}\">{}</a></div>",
            self.s.url(url),
            self.s.text(label)
        ));
        self.close("button", "");
        self.close("buttons", "</div>");
    }

    pub(crate) fn image(&mut self, url: &str, alt: &str, class: Option<&str>) {
        let mut attrs = Attrs::new();
        attrs.insert("sizeSlug", json!("large"));
        let mut classes = "wp-block-image size-large".to_string();
        if let Some(class) = class {
            attrs.insert("className", json!(class));
            classes.push(' ');
            classes.push_str(class);
        }
        self.open("image", &attrs, "");
        self.line(&format!(
            "<figure class=\"{}\"><img src=\"{}\" alt=\"{}\"/></figure>",
            self.s.attr(&classes),
            self.s.url(url),
            self.s.attr(alt)
        ));
        self.close("image", "");
    }

    pub(crate) fn open_columns(&mut self) {
        self.open("columns", &Attrs::new(), "<div class=\"wp-block-columns\">");
    }

    pub(crate) fn close_columns(&mut self) {
        self.close("columns", "</div>");
    }

    pub(crate) fn open_column(&mut self, class: Option<&str>) {
        let mut attrs = Attrs::new();
        let element = match class {
            Some(class) => {
                attrs.insert("className", json!(class));
                format!("<div class=\"wp-block-column {}\">", self.s.attr(class))
            }
            None => "<div class=\"wp-block-column\">".to_string(),
        };
        self.open("column", &attrs, &element);
    }

    pub(crate) fn close_column(&mut self) {
        self.close("column", "</div>");
    }

    pub(crate) fn finish(self) -> String {
        self.out
    }
}

/// Optional color pair for a group.
#[derive(Clone, Copy, Default)]
pub(crate) struct Colors<'a> {
    pub(crate) background: Option<&'a str>,
    pub(crate) text: Option<&'a str>,
}

impl<'a> Colors<'a> {
    pub(crate) fn background(background: &'a str) -> Self {
        Self {
            background: Some(background),
            text: None,
        }
    }

    pub(crate) fn both(background: &'a str, text: &'a str) -> Self {
        Self {
            background: Some(background),
            text: Some(text),
        }
    }
}

/// Clamp a configured column count to what a block layout can show.
pub(crate) fn column_count(columns: i64) -> usize {
    usize::try_from(columns.clamp(1, 6)).unwrap_or(1)
}
