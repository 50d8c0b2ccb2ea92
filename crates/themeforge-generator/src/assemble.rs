//! Site assembly.
//!
//! Turns rendered sections and base theme files into the final ordered file
//! list: base files in [`BASE_FILE_ORDER`], then one template per page in page
//! order, then section patterns in blueprint order.

use std::collections::{BTreeMap, BTreeSet};

use serde_json::json;
use themeforge_core::{
    blueprint::PageSpec,
    output::{ErrorKind, FileMetadata, GeneratedFile, Issue, ResolvedSection, SectionRef},
    path::{is_safe_relative_path, join_segments},
};
use tracing::debug;

use crate::{
    base::BASE_FILE_ORDER,
    fingerprint::content_sha256,
    render::{markup::Attrs, pattern_slug},
    sanitize::block_attrs,
};

/// Permission bits of generated files.
const FILE_MODE: u32 = 0o644;

/// A section with its rendered pattern file.
#[derive(Debug, Clone)]
pub struct RenderedSection {
    pub resolved: ResolvedSection,
    pub file: String,
}

/// Output path of a section's pattern file.
#[must_use]
pub fn section_path(at: &SectionRef) -> String {
    format!("patterns/{}.php", join_segments(&at.page, &at.section))
}

/// Output path of a page's template.
#[must_use]
pub fn page_template_path(page: &PageSpec) -> String {
    if page.front {
        "templates/front-page.html".to_string()
    } else {
        format!("templates/page-{}.html", page.slug)
    }
}

/// Check every path the run will produce before any work is done.
///
/// Returns one issue per colliding or unsafe path.
#[must_use]
pub fn plan_paths(pages: &[PageSpec], sections: &[SectionRef]) -> Vec<Issue> {
    let mut issues = Vec::new();
    let mut owners: BTreeMap<String, String> = BASE_FILE_ORDER
        .iter()
        .map(|p| ((*p).to_string(), "base theme".to_string()))
        .collect();

    let planned = pages
        .iter()
        .map(|page| (page_template_path(page), format!("page '{}'", page.slug), None))
        .chain(
            sections
                .iter()
                .map(|at| (section_path(at), format!("section '{at}'"), Some(at))),
        );

    for (path, owner, at) in planned {
        if !is_safe_relative_path(&path) {
            let message = format!("{owner} maps to unsafe path '{path}'");
            issues.push(match at {
                Some(at) => Issue::section(ErrorKind::UnsafePath, at, message),
                None => Issue::run(ErrorKind::UnsafePath, message),
            });
            continue;
        }
        if let Some(first) = owners.get(&path) {
            let message = format!("{owner} and {first} both map to '{path}'");
            issues.push(match at {
                Some(at) => Issue::section(ErrorKind::DuplicatePath, at, message),
                None => Issue::run(ErrorKind::DuplicatePath, message),
            });
            continue;
        }
        owners.insert(path, owner);
    }

    issues
}

/// Page template referencing the page's patterns in order.
#[must_use]
pub fn page_template(theme_slug: &str, sections: &[&ResolvedSection]) -> String {
    let mut out = String::new();
    out.push_str("<!-- wp:template-part {\"slug\":\"header\",\"tagName\":\"header\"} /-->\n");
    out.push_str("<!-- wp:group {\"tagName\":\"main\",\"layout\":{\"type\":\"default\"}} -->\n");
    out.push_str("<main class=\"wp-block-group\">\n");
    for section in sections {
        let mut attrs = Attrs::new();
        attrs.insert("slug", json!(pattern_slug(theme_slug, section)));
        out.push_str(&format!("<!-- wp:pattern {} /-->\n", block_attrs(&attrs)));
    }
    out.push_str("</main>\n<!-- /wp:group -->\n");
    out.push_str("<!-- wp:template-part {\"slug\":\"footer\",\"tagName\":\"footer\"} /-->\n");
    out
}

fn with_metadata(file: GeneratedFile) -> GeneratedFile {
    let metadata = FileMetadata {
        encoding: "utf-8".to_string(),
        mode: FILE_MODE,
        sha256: content_sha256(&file.content),
    };
    file.with_metadata(metadata)
}

fn base_rank(path: &str) -> usize {
    BASE_FILE_ORDER
        .iter()
        .position(|p| *p == path)
        .unwrap_or(BASE_FILE_ORDER.len())
}

/// Assemble the final file list.
///
/// Pages without surviving sections get no template. A path collision
/// anywhere in the output fails the whole assembly.
pub fn assemble(
    theme_slug: &str,
    mut base: Vec<GeneratedFile>,
    pages: &[PageSpec],
    mut sections: Vec<RenderedSection>,
) -> Result<Vec<GeneratedFile>, Vec<Issue>> {
    sections.sort_by_key(|s| s.resolved.section.order_key());

    base.sort_by_key(|f| base_rank(&f.path));
    let mut files = base;

    for (page_index, page) in pages.iter().enumerate() {
        let on_page: Vec<&ResolvedSection> = sections
            .iter()
            .map(|s| &s.resolved)
            .filter(|r| r.section.page_index == page_index)
            .collect();
        if on_page.is_empty() {
            debug!(page = %page.slug, "page has no sections; no template written");
            continue;
        }
        files.push(GeneratedFile::new(
            page_template_path(page),
            page_template(theme_slug, &on_page),
        ));
    }

    for section in sections {
        files.push(GeneratedFile::new(section_path(&section.resolved.section), section.file));
    }

    let mut seen = BTreeSet::new();
    let mut issues = Vec::new();
    for file in &files {
        if !is_safe_relative_path(&file.path) {
            issues.push(Issue::run(
                ErrorKind::UnsafePath,
                format!("refusing to write unsafe path '{}'", file.path),
            ));
        } else if !seen.insert(file.path.as_str()) {
            issues.push(Issue::run(
                ErrorKind::DuplicatePath,
                format!("more than one file maps to '{}'", file.path),
            ));
        }
    }
    if !issues.is_empty() {
        return Err(issues);
    }

    Ok(files.into_iter().map(with_metadata).collect())
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use themeforge_core::{blueprint::SectionType, pattern::PatternDefinition};

    use super::*;

    fn at(page: &str, page_index: usize, section: &str, section_index: usize) -> SectionRef {
        SectionRef {
            page: page.to_string(),
            section: section.to_string(),
            section_type: SectionType::Hero,
            page_index,
            section_index,
        }
    }

    fn rendered(at: SectionRef) -> RenderedSection {
        RenderedSection {
            file: format!("<?php /* {at} */ ?>\n"),
            resolved: ResolvedSection {
                section: at,
                pattern: PatternDefinition {
                    id: "hero-test".to_string(),
                    section: SectionType::Hero,
                    variant: "test".to_string(),
                    tags: vec![],
                    options: vec![],
                    slots: vec![],
                },
                config: BTreeMap::new(),
                content: BTreeMap::new(),
                sources: BTreeMap::new(),
                warnings: vec![],
            },
        }
    }

    fn pages() -> Vec<PageSpec> {
        vec![
            PageSpec::new("home", "Home").as_front(),
            PageSpec::new("about", "About"),
            PageSpec::new("empty", "Empty").optional(),
        ]
    }

    #[test]
    fn test_paths() {
        let home = PageSpec::new("home", "Home").as_front();
        assert_eq!(page_template_path(&home), "templates/front-page.html");
        assert_eq!(page_template_path(&PageSpec::new("about", "About")), "templates/page-about.html");
        assert_eq!(section_path(&at("home", 0, "hero-1", 0)), "patterns/home--hero-1.php");
    }

    #[test]
    fn test_plan_detects_collisions() {
        let sections = vec![
            at("home", 0, "hero-1", 0),
            at("home", 0, "hero-1", 1),
            at("home", 0, "services-2", 2),
        ];
        let issues = plan_paths(&pages(), &sections);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].kind, ErrorKind::DuplicatePath);
        assert_eq!(issues[0].section.as_deref(), Some("hero-1"));
    }

    #[test]
    fn test_plan_keeps_cross_page_sections_apart() {
        let pages = vec![PageSpec::new("home", "Home"), PageSpec::new("home-hero", "Home Hero")];
        let sections = vec![at("home", 0, "hero-1", 0), at("home-hero", 1, "1", 0)];
        assert!(plan_paths(&pages, &sections).is_empty());
        assert_ne!(section_path(&sections[0]), section_path(&sections[1]));
    }

    #[test]
    fn test_assemble_orders_output() {
        let sections = vec![
            rendered(at("about", 1, "about-1", 0)),
            rendered(at("home", 0, "services-2", 1)),
            rendered(at("home", 0, "hero-1", 0)),
        ];
        let base = vec![
            GeneratedFile::new("readme.txt", "readme"),
            GeneratedFile::new("style.css", "/* */"),
        ];

        let files = assemble("acme", base, &pages(), sections).expect("assemble");
        let paths: Vec<_> = files.iter().map(|f| f.path.as_str()).collect();
        assert_eq!(
            paths,
            [
                "style.css",
                "readme.txt",
                "templates/front-page.html",
                "templates/page-about.html",
                "patterns/home--hero-1.php",
                "patterns/home--services-2.php",
                "patterns/about--about-1.php",
            ]
        );

        let front = &files[2].content;
        let hero = front.find("acme/home--hero-1").expect("hero ref");
        let services = front.find("acme/home--services-2").expect("services ref");
        assert!(hero < services);

        let meta = files[0].metadata.as_ref().expect("metadata");
        assert_eq!(meta.mode, 0o644);
        assert_eq!(meta.encoding, "utf-8");
        assert_eq!(meta.sha256, content_sha256("/* */"));
    }

    #[test]
    fn test_assemble_rejects_duplicate_base_file() {
        let base = vec![
            GeneratedFile::new("style.css", "a"),
            GeneratedFile::new("style.css", "b"),
        ];
        let issues = assemble("acme", base, &pages(), vec![]).expect_err("should fail");
        assert_eq!(issues[0].kind, ErrorKind::DuplicatePath);
    }

    #[test]
    fn test_assemble_rejects_unsafe_base_file() {
        let base = vec![GeneratedFile::new("../escape.php", "x")];
        let issues = assemble("acme", base, &pages(), vec![]).expect_err("should fail");
        assert_eq!(issues[0].kind, ErrorKind::UnsafePath);
    }
}
