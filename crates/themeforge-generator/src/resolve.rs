//! Content slot resolution.
//!
//! Each declared slot takes the first usable value from AI content, then
//! blueprint literal content, then the pattern fallback. What happens when
//! none applies is decided by the run's [`ContentPolicy`].

use std::collections::BTreeMap;

use themeforge_core::{
    blueprint::{ContentMap, ContentValue},
    config::{ContentPolicy, SlotPolicy},
    output::{ContentSource, SectionRef, Warning, WarningKind},
    pattern::{PatternDefinition, SlotKind, SlotSpec},
};
use tracing::debug;

use crate::fetch::SlotFetch;

/// Values substituted for unresolved slots under lenient policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholders {
    pub text: String,
    pub image: String,
}

impl Placeholders {
    fn for_kind(&self, kind: SlotKind) -> ContentValue {
        match kind {
            SlotKind::Text | SlotKind::RichText => ContentValue::text(&self.text),
            SlotKind::ImageUrl => ContentValue::text(&self.image),
            SlotKind::List => ContentValue::list([self.text.as_str()]),
        }
    }
}

/// Resolution result for one section.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedContent {
    pub content: ContentMap,
    pub sources: BTreeMap<String, ContentSource>,
    pub warnings: Vec<Warning>,
    /// First slot left unresolved under strict policy; the section must be dropped.
    pub missing: Option<String>,
}

/// Resolve every declared slot of `pattern`.
pub fn resolve_content(
    pattern: &PatternDefinition,
    at: &SectionRef,
    ai: &BTreeMap<String, SlotFetch>,
    literal: &ContentMap,
    policy: &ContentPolicy,
    placeholders: &Placeholders,
) -> ResolvedContent {
    let mut out = ResolvedContent::default();

    for name in literal.keys() {
        if pattern.slot(name).is_none() {
            debug!(section = %at, slot = %name, pattern = %pattern.id, "ignoring undeclared content key");
        }
    }

    for slot in &pattern.slots {
        if let Some((value, source)) = first_usable(slot, at, ai.get(&slot.name), literal, &mut out.warnings)
        {
            out.content.insert(slot.name.clone(), value);
            out.sources.insert(slot.name.clone(), source);
            continue;
        }

        match policy.policy_for(at.section_type, &slot.name, slot.required) {
            SlotPolicy::Strict => {
                out.missing = Some(slot.name.clone());
                break;
            }
            SlotPolicy::Lenient => {
                out.warnings.push(Warning::section(
                    WarningKind::PlaceholderContent,
                    at,
                    &slot.name,
                    format!("slot '{}' has no content; placeholder used", slot.name),
                ));
                out.content
                    .insert(slot.name.clone(), placeholders.for_kind(slot.kind));
                out.sources
                    .insert(slot.name.clone(), ContentSource::Placeholder);
            }
        }
    }

    out
}

fn first_usable(
    slot: &SlotSpec,
    at: &SectionRef,
    ai: Option<&SlotFetch>,
    literal: &ContentMap,
    warnings: &mut Vec<Warning>,
) -> Option<(ContentValue, ContentSource)> {
    match ai {
        Some(SlotFetch::Content(value)) => {
            if let Some(value) = usable(slot, at, value, "AI", warnings) {
                return Some((value, ContentSource::Ai));
            }
        }
        Some(SlotFetch::TimedOut) => warnings.push(Warning::section(
            WarningKind::ContentProviderTimeout,
            at,
            &slot.name,
            format!("content provider timed out for slot '{}'", slot.name),
        )),
        Some(SlotFetch::Failed(message)) => warnings.push(Warning::section(
            WarningKind::ContentProviderFailure,
            at,
            &slot.name,
            format!("slot '{}': {message}", slot.name),
        )),
        Some(SlotFetch::Empty | SlotFetch::Cancelled) | None => {}
    }

    if let Some(value) = literal.get(&slot.name) {
        if let Some(value) = usable(slot, at, value, "blueprint", warnings) {
            return Some((value, ContentSource::Blueprint));
        }
    }

    slot.fallback
        .as_ref()
        .filter(|v| slot.kind.accepts(v) && !v.is_blank())
        .map(|v| (v.clone(), ContentSource::Fallback))
}

fn usable(
    slot: &SlotSpec,
    at: &SectionRef,
    value: &ContentValue,
    source: &str,
    warnings: &mut Vec<Warning>,
) -> Option<ContentValue> {
    if !slot.kind.accepts(value) {
        let got = if value.as_list().is_some() { "list" } else { "text" };
        warnings.push(Warning::section(
            WarningKind::ContentTypeMismatch,
            at,
            &slot.name,
            format!(
                "{source} content for slot '{}' is {got}, expected {}",
                slot.name, slot.kind
            ),
        ));
        return None;
    }
    (!value.is_blank()).then(|| value.clone())
}
