//! Pattern selection for a section descriptor.

use themeforge_core::{
    blueprint::{SectionDescriptor, SectionType},
    pattern::PatternDefinition,
};
use thiserror::Error;

/// Why no pattern could be chosen.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SelectError {
    #[error("no {0} patterns are registered for this preset")]
    NoCandidates(SectionType),

    #[error("{section} variant '{requested}' not found (available: {})", .available.join(", "))]
    UnknownVariant {
        section: SectionType,
        requested: String,
        available: Vec<String>,
    },
}

/// Choose a pattern from `candidates`, which are ordered most preferred first.
///
/// An explicit variant must name a candidate by id or variant name. Otherwise
/// the first candidate tagged with any hint wins, else the first candidate.
pub fn select_pattern<'r>(
    descriptor: &SectionDescriptor,
    candidates: &[&'r PatternDefinition],
) -> Result<&'r PatternDefinition, SelectError> {
    let Some(first) = candidates.first() else {
        return Err(SelectError::NoCandidates(descriptor.section_type));
    };

    if let Some(requested) = &descriptor.variant {
        return candidates
            .iter()
            .find(|p| p.answers_to(requested))
            .copied()
            .ok_or_else(|| SelectError::UnknownVariant {
                section: descriptor.section_type,
                requested: requested.clone(),
                available: candidates.iter().map(|p| p.variant.clone()).collect(),
            });
    }

    Ok(candidates
        .iter()
        .find(|p| p.matches_hints(&descriptor.hints))
        .copied()
        .unwrap_or(*first))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pattern(id: &str, variant: &str, tags: &[&str]) -> PatternDefinition {
        PatternDefinition {
            id: id.to_string(),
            section: SectionType::Hero,
            variant: variant.to_string(),
            tags: tags.iter().map(ToString::to_string).collect(),
            options: vec![],
            slots: vec![],
        }
    }

    #[test]
    fn test_first_candidate_by_default() {
        let a = pattern("hero-a", "a", &["bold"]);
        let b = pattern("hero-b", "b", &["minimal"]);
        let picked = select_pattern(&SectionDescriptor::new(SectionType::Hero), &[&a, &b]).expect("select");
        assert_eq!(picked.id, "hero-a");
    }

    #[test]
    fn test_hints_pick_first_matching() {
        let a = pattern("hero-a", "a", &["bold"]);
        let b = pattern("hero-b", "b", &["minimal", "photo"]);
        let c = pattern("hero-c", "c", &["photo"]);

        let descriptor = SectionDescriptor::new(SectionType::Hero).with_hint("photo");
        assert_eq!(select_pattern(&descriptor, &[&a, &b, &c]).expect("select").id, "hero-b");

        let descriptor = SectionDescriptor::new(SectionType::Hero).with_hint("none-match");
        assert_eq!(select_pattern(&descriptor, &[&a, &b, &c]).expect("select").id, "hero-a");
    }

    #[test]
    fn test_explicit_variant_by_id_or_name() {
        let a = pattern("hero-a", "a", &[]);
        let b = pattern("hero-b", "split", &[]);

        let by_name = SectionDescriptor::new(SectionType::Hero)
            .with_variant("split")
            .with_hint("ignored");
        assert_eq!(select_pattern(&by_name, &[&a, &b]).expect("select").id, "hero-b");

        let by_id = SectionDescriptor::new(SectionType::Hero).with_variant("hero-a");
        assert_eq!(select_pattern(&by_id, &[&a, &b]).expect("select").id, "hero-a");
    }

    #[test]
    fn test_unknown_variant_is_error() {
        let a = pattern("hero-a", "a", &[]);
        let descriptor = SectionDescriptor::new(SectionType::Hero).with_variant("diagonal");
        let err = select_pattern(&descriptor, &[&a]).expect_err("should fail");
        assert!(err.to_string().contains("diagonal"));
    }

    #[test]
    fn test_no_candidates() {
        assert_eq!(
            select_pattern(&SectionDescriptor::new(SectionType::Gallery), &[]),
            Err(SelectError::NoCandidates(SectionType::Gallery))
        );
    }
}
