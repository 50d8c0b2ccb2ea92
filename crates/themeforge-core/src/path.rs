//! Output path helpers.
//!
//! Generated paths are relative, slash-separated and confined to the theme root.

/// Maximum length of a single path segment.
const MAX_SEGMENT_LEN: usize = 96;

/// Separator between a page slug and a section id in output names.
///
/// Never occurs inside a safe segment, so joined names stay unambiguous.
pub const SEGMENT_JOIN: &str = "--";

/// Check that `s` is usable as one path segment without an extension.
///
/// Accepts lowercase ASCII letters, digits, `-` and `_`, and must start with a
/// letter or digit. A segment may not end in `-` or contain [`SEGMENT_JOIN`].
#[must_use]
pub fn is_safe_segment(s: &str) -> bool {
    let Some(first) = s.chars().next() else {
        return false;
    };
    s.len() <= MAX_SEGMENT_LEN
        && (first.is_ascii_lowercase() || first.is_ascii_digit())
        && !s.ends_with('-')
        && !s.contains(SEGMENT_JOIN)
        && s.chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_')
}

/// Join a page slug and a section id into one output name.
#[must_use]
pub fn join_segments(page: &str, section: &str) -> String {
    format!("{page}{SEGMENT_JOIN}{section}")
}

/// Check that `path` is a relative, slash-separated path with no traversal.
#[must_use]
pub fn is_safe_relative_path(path: &str) -> bool {
    if path.is_empty() || path.starts_with('/') || path.contains('\\') {
        return false;
    }

    path.split('/').all(|segment| {
        !segment.is_empty()
            && segment != "."
            && segment != ".."
            && segment.len() <= MAX_SEGMENT_LEN
            && segment
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
    })
}

/// Generate a path-safe slug from arbitrary text.
#[must_use]
pub fn slugify(s: &str) -> String {
    s.to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}
