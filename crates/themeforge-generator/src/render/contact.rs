//! Contact section.

use themeforge_core::schema::{ContactConfig, ContactLayout};

use super::markup::{Colors, Markup, Slots};
use crate::sanitize::Sanitizer;

pub(super) fn render(c: &ContactConfig, slots: &Slots<'_>, s: &dyn Sanitizer) -> String {
    let mut m = Markup::new(s);
    let class = format!("themeforge-contact is-layout-{}", c.layout.as_str());
    let style = format!("--themeforge-accent:{};", s.css(&c.accent_color));

    m.open_group(&class, true, Colors::background(&c.background), &style);
    if let Some(heading) = slots.text("heading") {
        m.heading(2, heading, None, &c.heading_font);
    }
    if let Some(intro) = slots.text("intro") {
        m.rich_text(intro);
    }

    match c.layout {
        ContactLayout::Split => {
            m.open_columns();
            m.open_column(Some("contact-details"));
            details(&mut m, slots);
            m.close_column();
            if c.show_form || c.show_map {
                m.open_column(Some("contact-extras"));
                extras(&mut m, c, slots);
                m.close_column();
            }
            m.close_columns();
        }
        ContactLayout::Stacked => {
            details(&mut m, slots);
            extras(&mut m, c, slots);
        }
    }

    m.close_group();
    m.finish()
}

fn details(m: &mut Markup<'_>, slots: &Slots<'_>) {
    let s = m.s;
    let mut lines = Vec::new();
    if let Some(email) = slots.text("email") {
        lines.push(format!(
            "<li class=\"contact-email\"><a href=\"{}\">{}</a></li>",
            s.url(&format!("mailto:{}", email.trim())),
            s.text(email)
        ));
    }
    if let Some(phone) = slots.text("phone") {
        let dial: String = phone
            .chars()
            .filter(|c| c.is_ascii_digit() || *c == '+')
            .collect();
        if dial.is_empty() {
            lines.push(format!("<li class=\"contact-phone\">{}</li>", s.text(phone)));
        } else {
            lines.push(format!(
                "<li class=\"contact-phone\"><a href=\"{}\">{}</a></li>",
                s.url(&format!("tel:{dial}")),
                s.text(phone)
            ));
        }
    }
    if let Some(address) = slots.text("address") {
        lines.push(format!("<li class=\"contact-address\">{}</li>", s.text(address)));
    }
    if lines.is_empty() {
        return;
    }

    m.open("list", &Default::default(), "<ul class=\"wp-block-list contact-details\">");
    for line in &lines {
        m.open("list-item", &Default::default(), "");
        m.line(line);
        m.close("list-item", "");
    }
    m.close("list", "</ul>");
}

fn extras(m: &mut Markup<'_>, c: &ContactConfig, slots: &Slots<'_>) {
    let s = m.s;
    if c.show_form {
        m.open("html", &Default::default(), "");
        m.line("<form class=\"themeforge-contact-form\" method=\"post\">");
        m.line("<label>Name <input type=\"text\" name=\"name\" required></label>");
        m.line("<label>Email <input type=\"email\" name=\"email\" required></label>");
        m.line("<label>Message <textarea name=\"message\" rows=\"5\" required></textarea></label>");
        m.line("<button type=\"submit\">Send</button>");
        m.line("</form>");
        m.close("html", "");
    }
    if c.show_map {
        if let Some(address) = slots.text("address") {
            m.open("html", &Default::default(), "");
            m.line(&format!(
                "<div class=\"themeforge-map\" data-address=\"{}\"></div>",
                s.attr(address)
            ));
            m.close("html", "");
        }
    }
}

#[cfg(test)]
mod tests {
    use themeforge_core::blueprint::{ContentMap, ContentValue};

    use super::*;
    use crate::sanitize::HtmlSanitizer;

    fn config(layout: ContactLayout) -> ContactConfig {
        ContactConfig {
            layout,
            show_map: true,
            show_form: true,
            background: "#ffffff".to_string(),
            accent_color: "#2563eb".to_string(),
            heading_font: "inherit".to_string(),
        }
    }

    fn content() -> ContentMap {
        ContentMap::from([
            ("heading".to_string(), ContentValue::text("Get in Touch")),
            ("email".to_string(), ContentValue::text("hello@acme.test")),
            ("phone".to_string(), ContentValue::text("+1 (555) 010-0100")),
            ("address".to_string(), ContentValue::text("1 Main St \"Unit\" 4")),
        ])
    }

    #[test]
    fn test_contact_links() {
        let content = content();
        let out = render(&config(ContactLayout::Split), &Slots(&content), &HtmlSanitizer);

        assert!(out.contains("href=\"mailto:hello@acme.test\""));
        assert!(out.contains("href=\"tel:+15550100100\""));
        assert!(out.contains("data-address=\"1 Main St &quot;Unit&quot; 4\""));
        assert!(out.contains("themeforge-contact-form"));
        assert!(out.contains("contact-extras"));
    }

    #[test]
    fn test_stacked_without_extras() {
        let content = content();
        let mut c = config(ContactLayout::Stacked);
        c.show_form = false;
        c.show_map = false;
        let out = render(&c, &Slots(&content), &HtmlSanitizer);

        assert!(!out.contains("wp:columns"));
        assert!(!out.contains("<form"));
        assert!(!out.contains("themeforge-map"));
    }

    #[test]
    fn test_placeholder_email_does_not_become_link() {
        let content = ContentMap::from([(
            "email".to_string(),
            ContentValue::text("Content coming soon."),
        )]);
        let out = render(&config(ContactLayout::Stacked), &Slots(&content), &HtmlSanitizer);
        assert!(out.contains("href=\"#\""));
    }
}
