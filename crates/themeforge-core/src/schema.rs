//! Typed config schemas, one per section type.
//!
//! Every pattern of a section type must declare the option set listed by
//! [`required_options`]; the registry enforces this at load time, so a merged
//! config always converts into its typed view.

use std::str::FromStr;

use thiserror::Error;

use crate::{
    blueprint::{ConfigMap, SectionType},
    pattern::{OptionKind, OptionValue},
};

/// Typed view construction errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchemaError {
    /// Declared option missing from the merged config.
    #[error("{section}: missing option '{option}'")]
    Missing {
        section: SectionType,
        option: &'static str,
    },

    /// Option present with the wrong value type.
    #[error("{section}: option '{option}' must be {expected}")]
    WrongType {
        section: SectionType,
        option: &'static str,
        expected: OptionKind,
    },

    /// Choice value outside the typed enumeration.
    #[error("{section}: option '{option}' has unknown value '{value}'")]
    UnknownChoice {
        section: SectionType,
        option: &'static str,
        value: String,
    },
}

macro_rules! choice_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            /// Accepted spellings, in declaration order.
            pub const VALUES: &'static [&'static str] = &[$($text),+];

            #[must_use]
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $text),+
                }
            }
        }

        impl FromStr for $name {
            type Err = ();

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok(Self::$variant),)+
                    _ => Err(()),
                }
            }
        }
    };
}

choice_enum!(
    /// Hero layout.
    HeroVariant { Centered => "centered", LeftAligned => "left-aligned", Split => "split" }
);
choice_enum!(
    /// Services layout.
    ServicesLayout { Grid => "grid", List => "list", Cards => "cards" }
);
choice_enum!(
    /// About layout.
    AboutLayout { ImageLeft => "image-left", ImageRight => "image-right", Stacked => "stacked" }
);
choice_enum!(
    /// Testimonials layout.
    TestimonialsLayout { Grid => "grid", Carousel => "carousel", Single => "single" }
);
choice_enum!(
    /// Gallery layout.
    GalleryLayout { Grid => "grid", Masonry => "masonry" }
);
choice_enum!(
    /// Contact layout.
    ContactLayout { Split => "split", Stacked => "stacked" }
);
choice_enum!(
    /// Call-to-action layout.
    CtaLayout { Banner => "banner", Boxed => "boxed" }
);
choice_enum!(
    /// Button appearance.
    ButtonStyle { Fill => "fill", Outline => "outline" }
);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeroConfig {
    pub variant: HeroVariant,
    pub background: String,
    pub text_color: String,
    pub accent_color: String,
    pub heading_font: String,
    pub show_cta: bool,
    /// Minimum height in viewport-height units.
    pub min_height: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServicesConfig {
    pub layout: ServicesLayout,
    pub columns: i64,
    pub background: String,
    pub accent_color: String,
    pub heading_font: String,
    pub show_icons: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AboutConfig {
    pub layout: AboutLayout,
    pub background: String,
    pub text_color: String,
    pub heading_font: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestimonialsConfig {
    pub layout: TestimonialsLayout,
    pub columns: i64,
    pub background: String,
    pub accent_color: String,
    pub heading_font: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GalleryConfig {
    pub layout: GalleryLayout,
    pub columns: i64,
    /// Gap between images in pixels.
    pub gap: i64,
    pub rounded: bool,
    pub background: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactConfig {
    pub layout: ContactLayout,
    pub show_map: bool,
    pub show_form: bool,
    pub background: String,
    pub accent_color: String,
    pub heading_font: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallToActionConfig {
    pub layout: CtaLayout,
    pub background: String,
    pub text_color: String,
    pub button_style: ButtonStyle,
    pub heading_font: String,
}

/// Strongly-typed config of one section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SectionConfig {
    Hero(HeroConfig),
    Services(ServicesConfig),
    About(AboutConfig),
    Testimonials(TestimonialsConfig),
    Gallery(GalleryConfig),
    Contact(ContactConfig),
    CallToAction(CallToActionConfig),
}

/// Options every pattern of `section` must declare, with their kinds.
#[must_use]
pub fn required_options(section: SectionType) -> &'static [(&'static str, OptionKind)] {
    use OptionKind::{Bool, Choice, Color, Int, Text};

    match section {
        SectionType::Hero => &[
            ("variant", Choice),
            ("background", Color),
            ("text_color", Color),
            ("accent_color", Color),
            ("heading_font", Text),
            ("show_cta", Bool),
            ("min_height", Int),
        ],
        SectionType::Services => &[
            ("layout", Choice),
            ("columns", Int),
            ("background", Color),
            ("accent_color", Color),
            ("heading_font", Text),
            ("show_icons", Bool),
        ],
        SectionType::About => &[
            ("layout", Choice),
            ("background", Color),
            ("text_color", Color),
            ("heading_font", Text),
        ],
        SectionType::Testimonials => &[
            ("layout", Choice),
            ("columns", Int),
            ("background", Color),
            ("accent_color", Color),
            ("heading_font", Text),
        ],
        SectionType::Gallery => &[
            ("layout", Choice),
            ("columns", Int),
            ("gap", Int),
            ("rounded", Bool),
            ("background", Color),
        ],
        SectionType::Contact => &[
            ("layout", Choice),
            ("show_map", Bool),
            ("show_form", Bool),
            ("background", Color),
            ("accent_color", Color),
            ("heading_font", Text),
        ],
        SectionType::CallToAction => &[
            ("layout", Choice),
            ("background", Color),
            ("text_color", Color),
            ("button_style", Choice),
            ("heading_font", Text),
        ],
    }
}

/// Values a choice option of `section` may take, if `option` is a choice.
#[must_use]
pub fn choice_values(section: SectionType, option: &str) -> Option<&'static [&'static str]> {
    match (section, option) {
        (SectionType::Hero, "variant") => Some(HeroVariant::VALUES),
        (SectionType::Services, "layout") => Some(ServicesLayout::VALUES),
        (SectionType::About, "layout") => Some(AboutLayout::VALUES),
        (SectionType::Testimonials, "layout") => Some(TestimonialsLayout::VALUES),
        (SectionType::Gallery, "layout") => Some(GalleryLayout::VALUES),
        (SectionType::Contact, "layout") => Some(ContactLayout::VALUES),
        (SectionType::CallToAction, "layout") => Some(CtaLayout::VALUES),
        (SectionType::CallToAction, "button_style") => Some(ButtonStyle::VALUES),
        _ => None,
    }
}

struct Reader<'a> {
    section: SectionType,
    config: &'a ConfigMap,
}

impl<'a> Reader<'a> {
    fn get(&self, option: &'static str) -> Result<&'a OptionValue, SchemaError> {
        self.config.get(option).ok_or(SchemaError::Missing {
            section: self.section,
            option,
        })
    }

    fn wrong(&self, option: &'static str, expected: OptionKind) -> SchemaError {
        SchemaError::WrongType {
            section: self.section,
            option,
            expected,
        }
    }

    fn text(&self, option: &'static str) -> Result<String, SchemaError> {
        self.get(option)?
            .as_text()
            .map(str::to_string)
            .ok_or_else(|| self.wrong(option, OptionKind::Text))
    }

    fn color(&self, option: &'static str) -> Result<String, SchemaError> {
        self.get(option)?
            .as_text()
            .map(str::to_string)
            .ok_or_else(|| self.wrong(option, OptionKind::Color))
    }

    fn int(&self, option: &'static str) -> Result<i64, SchemaError> {
        self.get(option)?
            .as_int()
            .ok_or_else(|| self.wrong(option, OptionKind::Int))
    }

    fn flag(&self, option: &'static str) -> Result<bool, SchemaError> {
        self.get(option)?
            .as_bool()
            .ok_or_else(|| self.wrong(option, OptionKind::Bool))
    }

    fn choice<T: FromStr>(&self, option: &'static str) -> Result<T, SchemaError> {
        let value = self
            .get(option)?
            .as_text()
            .ok_or_else(|| self.wrong(option, OptionKind::Choice))?;
        value.parse().map_err(|_| SchemaError::UnknownChoice {
            section: self.section,
            option,
            value: value.to_string(),
        })
    }
}

impl SectionConfig {
    /// Build the typed view of a merged config.
    pub fn from_merged(section: SectionType, config: &ConfigMap) -> Result<Self, SchemaError> {
        let r = Reader { section, config };

        Ok(match section {
            SectionType::Hero => Self::Hero(HeroConfig {
                variant: r.choice("variant")?,
                background: r.color("background")?,
                text_color: r.color("text_color")?,
                accent_color: r.color("accent_color")?,
                heading_font: r.text("heading_font")?,
                show_cta: r.flag("show_cta")?,
                min_height: r.int("min_height")?,
            }),
            SectionType::Services => Self::Services(ServicesConfig {
                layout: r.choice("layout")?,
                columns: r.int("columns")?,
                background: r.color("background")?,
                accent_color: r.color("accent_color")?,
                heading_font: r.text("heading_font")?,
                show_icons: r.flag("show_icons")?,
            }),
            SectionType::About => Self::About(AboutConfig {
                layout: r.choice("layout")?,
                background: r.color("background")?,
                text_color: r.color("text_color")?,
                heading_font: r.text("heading_font")?,
            }),
            SectionType::Testimonials => Self::Testimonials(TestimonialsConfig {
                layout: r.choice("layout")?,
                columns: r.int("columns")?,
                background: r.color("background")?,
                accent_color: r.color("accent_color")?,
                heading_font: r.text("heading_font")?,
            }),
            SectionType::Gallery => Self::Gallery(GalleryConfig {
                layout: r.choice("layout")?,
                columns: r.int("columns")?,
                gap: r.int("gap")?,
                rounded: r.flag("rounded")?,
                background: r.color("background")?,
            }),
            SectionType::Contact => Self::Contact(ContactConfig {
                layout: r.choice("layout")?,
                show_map: r.flag("show_map")?,
                show_form: r.flag("show_form")?,
                background: r.color("background")?,
                accent_color: r.color("accent_color")?,
                heading_font: r.text("heading_font")?,
            }),
            SectionType::CallToAction => Self::CallToAction(CallToActionConfig {
                layout: r.choice("layout")?,
                background: r.color("background")?,
                text_color: r.color("text_color")?,
                button_style: r.choice("button_style")?,
                heading_font: r.text("heading_font")?,
            }),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hero_config() -> ConfigMap {
        let mut config = ConfigMap::new();
        config.insert("variant".into(), OptionValue::from("left-aligned"));
        config.insert("background".into(), OptionValue::from("#1d3557"));
        config.insert("text_color".into(), OptionValue::from("#ffffff"));
        config.insert("accent_color".into(), OptionValue::from("#e63946"));
        config.insert("heading_font".into(), OptionValue::from("Oswald"));
        config.insert("show_cta".into(), OptionValue::Bool(true));
        config.insert("min_height".into(), OptionValue::Int(70));
        config
    }

    #[test]
    fn test_hero_view() {
        let SectionConfig::Hero(hero) =
            SectionConfig::from_merged(SectionType::Hero, &hero_config()).expect("view")
        else {
            panic!("expected hero config");
        };
        assert_eq!(hero.variant, HeroVariant::LeftAligned);
        assert_eq!(hero.min_height, 70);
        assert!(hero.show_cta);
    }

    #[test]
    fn test_missing_option() {
        let mut config = hero_config();
        config.remove("min_height");
        assert_eq!(
            SectionConfig::from_merged(SectionType::Hero, &config),
            Err(SchemaError::Missing {
                section: SectionType::Hero,
                option: "min_height"
            })
        );
    }

    #[test]
    fn test_unknown_choice() {
        let mut config = hero_config();
        config.insert("variant".into(), OptionValue::from("diagonal"));
        assert!(matches!(
            SectionConfig::from_merged(SectionType::Hero, &config),
            Err(SchemaError::UnknownChoice { .. })
        ));
    }

    #[test]
    fn test_every_choice_option_has_values() {
        for section in SectionType::ALL {
            for (name, kind) in required_options(section) {
                if *kind == OptionKind::Choice {
                    assert!(
                        choice_values(section, name).is_some(),
                        "{section}.{name} has no typed values"
                    );
                }
            }
        }
    }
}
