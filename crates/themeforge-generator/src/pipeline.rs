//! Generation orchestration.
//!
//! Runs a blueprint through selection, content fetching, merge, resolution,
//! rendering and assembly against one registry snapshot.

use std::{collections::BTreeMap, sync::Arc, time::Instant};

use rayon::prelude::*;
use thiserror::Error;
use themeforge_core::{
    blueprint::{Blueprint, ContentMap, ContentValue, SectionDescriptor, SectionType},
    config::{Config, ContentPolicy},
    output::{
        ContentSource, ErrorKind, GenerationMetadata, GenerationResult, Issue, ResolvedSection,
        SectionRef, Warning, WarningKind,
    },
    pattern::PatternDefinition,
};
use themeforge_patterns::{PatternRegistry, PresetResolution, RegistryHandle};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::{
    assemble::{RenderedSection, assemble, plan_paths},
    base::{BaseThemeError, BaseThemeGenerator, BlockThemeBase, PageLink, SiteContext, ThemeIdentity},
    clock::{Clock, SystemClock},
    fetch::{FetchLimits, FetchRequest, SlotFetch, fetch_all},
    fingerprint::fingerprint,
    merge::merge_config,
    provider::{ContentProvider, NoContentProvider, PromptContext},
    render::render_pattern_file,
    resolve::{Placeholders, resolve_content},
    sanitize::{HtmlSanitizer, Sanitizer},
    select::select_pattern,
};

/// Failures that prevent producing any result.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// Base theme generation failed.
    #[error("base theme error: {0}")]
    BaseTheme(#[from] BaseThemeError),

    /// Worker pool could not be built.
    #[error("worker pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    /// Blueprint could not be serialized for fingerprinting.
    #[error("fingerprint error: {0}")]
    Fingerprint(#[from] serde_json::Error),
}

/// Result type for generation.
pub type Result<T> = std::result::Result<T, GenerationError>;

/// A section with its chosen pattern.
#[derive(Debug, Clone)]
pub struct PlannedSection {
    pub at: SectionRef,
    pub pattern: PatternDefinition,
}

/// Outcome of selection and path planning.
#[derive(Debug, Clone)]
pub struct Plan {
    pub preset: PresetResolution,
    pub sections: Vec<PlannedSection>,
    pub errors: Vec<Issue>,
    pub warnings: Vec<Warning>,
}

impl Plan {
    /// Whether generation may proceed.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Validate a blueprint, select a pattern for every section and check output paths.
#[must_use]
pub fn plan(blueprint: &Blueprint, registry: &PatternRegistry) -> Plan {
    let preset = registry.resolve_preset(&blueprint.industry, &blueprint.preset);
    let mut plan = Plan {
        preset,
        sections: Vec::new(),
        errors: Vec::new(),
        warnings: Vec::new(),
    };

    let problems = blueprint.problems();
    if !problems.is_empty() {
        plan.errors = problems
            .into_iter()
            .map(|p| Issue::run(ErrorKind::InvalidBlueprint, p))
            .collect();
        return plan;
    }

    if plan.preset.fell_back {
        plan.warnings.push(Warning::run(
            WarningKind::UnknownPreset,
            format!(
                "preset '{}' is not registered; using '{}'",
                blueprint.preset, plan.preset.preset
            ),
        ));
    }

    for (page_index, page) in blueprint.pages.iter().enumerate() {
        for (section_index, descriptor) in page.sections.iter().enumerate() {
            let at = SectionRef {
                page: page.slug.clone(),
                section: descriptor.effective_id(section_index),
                section_type: descriptor.section_type,
                page_index,
                section_index,
            };
            let candidates = registry.candidates(&plan.preset.preset, descriptor.section_type);
            match select_pattern(descriptor, &candidates) {
                Ok(pattern) => {
                    debug!(section = %at, pattern = %pattern.id, "selected pattern");
                    plan.sections.push(PlannedSection {
                        at,
                        pattern: pattern.clone(),
                    });
                }
                Err(e) => plan
                    .errors
                    .push(Issue::section(ErrorKind::PatternNotFound, &at, e.to_string())),
            }
        }
    }
    if !plan.errors.is_empty() {
        return plan;
    }

    let refs: Vec<SectionRef> = plan.sections.iter().map(|s| s.at.clone()).collect();
    plan.errors = plan_paths(&blueprint.pages, &refs);
    plan
}

/// Blueprint literal content for a section, with client contact details
/// filled into contact sections.
fn literal_content(blueprint: &Blueprint, descriptor: &SectionDescriptor) -> ContentMap {
    let mut content = descriptor.content.clone();
    if descriptor.section_type == SectionType::Contact {
        let contact = &blueprint.client.contact;
        for (slot, value) in [
            ("email", &contact.email),
            ("phone", &contact.phone),
            ("address", &contact.address),
        ] {
            if let Some(value) = value.as_deref().filter(|v| !v.trim().is_empty()) {
                content
                    .entry(slot.to_string())
                    .or_insert_with(|| ContentValue::text(value));
            }
        }
    }
    content
}

struct SectionOutcome {
    order: (usize, usize),
    warnings: Vec<Warning>,
    rendered: std::result::Result<RenderedSection, Issue>,
}

/// Blueprint-to-theme generator.
pub struct Generator {
    registry: RegistryHandle,
    config: Config,
    policy: ContentPolicy,
    provider: Arc<dyn ContentProvider>,
    base: Arc<dyn BaseThemeGenerator>,
    sanitizer: Arc<dyn Sanitizer>,
    clock: Arc<dyn Clock>,
    pool: rayon::ThreadPool,
}

impl Generator {
    /// Create a generator with the default collaborators: no content
    /// provider, the block theme base, HTML sanitizer and system clock.
    pub fn new(config: Config, registry: RegistryHandle) -> Result<Self> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.generation.workers)
            .thread_name(|i| format!("themeforge-render-{i}"))
            .build()?;

        Ok(Self {
            registry,
            policy: config.policy.clone(),
            config,
            provider: Arc::new(NoContentProvider),
            base: Arc::new(BlockThemeBase::new()?),
            sanitizer: Arc::new(HtmlSanitizer),
            clock: Arc::new(SystemClock),
            pool,
        })
    }

    #[must_use]
    pub fn with_provider(mut self, provider: Arc<dyn ContentProvider>) -> Self {
        self.provider = provider;
        self
    }

    #[must_use]
    pub fn with_base_theme(mut self, base: Arc<dyn BaseThemeGenerator>) -> Self {
        self.base = base;
        self
    }

    #[must_use]
    pub fn with_sanitizer(mut self, sanitizer: Arc<dyn Sanitizer>) -> Self {
        self.sanitizer = sanitizer;
        self
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Override the missing-content policy taken from the config.
    #[must_use]
    pub fn with_policy(mut self, policy: ContentPolicy) -> Self {
        self.policy = policy;
        self
    }

    #[must_use]
    pub fn registry(&self) -> &RegistryHandle {
        &self.registry
    }

    /// Run selection and path planning only.
    #[must_use]
    pub fn check(&self, blueprint: &Blueprint) -> Plan {
        plan(blueprint, &self.registry.snapshot())
    }

    /// Generate a theme.
    pub async fn generate(&self, blueprint: &Blueprint) -> Result<GenerationResult> {
        self.generate_with_cancel(blueprint, CancellationToken::new())
            .await
    }

    /// Generate a theme, abandoning outstanding content fetches when `cancel` fires.
    pub async fn generate_with_cancel(
        &self,
        blueprint: &Blueprint,
        cancel: CancellationToken,
    ) -> Result<GenerationResult> {
        let start = Instant::now();
        let registry = self.registry.snapshot();

        info!(
            industry = %blueprint.industry,
            preset = %blueprint.preset,
            pages = blueprint.pages.len(),
            "starting generation"
        );

        let plan = plan(blueprint, &registry);
        let mut metadata = GenerationMetadata {
            industry: blueprint.industry.clone(),
            preset: blueprint.preset.clone(),
            preset_used: plan.preset.preset.clone(),
            pages: blueprint.pages.iter().map(|p| p.slug.clone()).collect(),
            ai_content_used: false,
            generated_at: self.clock.now(),
            fingerprint: fingerprint(blueprint, &registry)?,
            complete: true,
        };

        if !plan.is_ok() {
            warn!(errors = plan.errors.len(), "generation aborted during planning");
            return Ok(GenerationResult::aborted(metadata, plan.errors, plan.warnings));
        }
        let Plan {
            preset,
            sections,
            mut warnings,
            ..
        } = plan;
        let mut errors = Vec::new();

        let fetched = self.fetch(blueprint, &preset.preset, &sections, &cancel).await;

        let mut work = Vec::with_capacity(sections.len());
        for (planned, ai) in sections.into_iter().zip(fetched) {
            if ai.values().any(|f| *f == SlotFetch::Cancelled) {
                errors.push(Issue::section(
                    ErrorKind::Cancelled,
                    &planned.at,
                    "content fetch was cancelled; section omitted",
                ));
                metadata.complete = false;
                continue;
            }
            work.push((planned, ai));
        }

        let placeholders = Placeholders {
            text: self.config.generation.placeholder_text.clone(),
            image: self.config.generation.placeholder_image.clone(),
        };
        let theme = ThemeIdentity::resolve(&self.config.theme, &blueprint.client);

        let mut outcomes: Vec<SectionOutcome> = self.pool.install(|| {
            work.par_iter()
                .map(|(planned, ai)| {
                    self.process_section(blueprint, &registry, &preset.preset, planned, ai, &placeholders, &theme)
                })
                .collect()
        });
        outcomes.sort_by_key(|o| o.order);

        let mut rendered = Vec::new();
        let mut section_errors = Vec::new();
        for outcome in outcomes {
            warnings.extend(outcome.warnings);
            match outcome.rendered {
                Ok(section) => rendered.push(section),
                Err(issue) => section_errors.push(issue),
            }
        }
        errors.extend(section_errors);

        metadata.ai_content_used = rendered
            .iter()
            .any(|r| r.resolved.sources.values().any(|s| *s == ContentSource::Ai));

        let mut links = Vec::new();
        for (page_index, page) in blueprint.pages.iter().enumerate() {
            let count = rendered
                .iter()
                .filter(|r| r.resolved.section.page_index == page_index)
                .count();
            if count > 0 {
                links.push(PageLink {
                    slug: page.slug.clone(),
                    title: page.title.clone(),
                    front: page.front,
                });
            } else if page.required {
                errors.push(Issue::page(
                    ErrorKind::EmptyPage,
                    &page.slug,
                    format!("required page '{}' has no sections left", page.slug),
                ));
            } else {
                warn!(page = %page.slug, "optional page has no sections left; skipped");
            }
        }

        let site = SiteContext {
            theme: &theme,
            industry: &blueprint.industry,
            client: &blueprint.client,
            tokens: &blueprint.tokens,
            pages: &links,
            sanitizer: self.sanitizer.as_ref(),
        };
        let base = self.base.generate(&site)?;

        let files = match assemble(&theme.slug, base, &blueprint.pages, rendered) {
            Ok(files) => files,
            Err(issues) => {
                errors.extend(issues);
                warn!(errors = errors.len(), "generation aborted during assembly");
                return Ok(GenerationResult::aborted(metadata, errors, warnings));
            }
        };

        let success = !errors
            .iter()
            .any(|e| e.kind.is_run_aborting() || e.kind == ErrorKind::EmptyPage);

        info!(
            files = files.len(),
            errors = errors.len(),
            warnings = warnings.len(),
            success,
            complete = metadata.complete,
            duration_ms = start.elapsed().as_millis() as u64,
            "generation finished"
        );

        Ok(GenerationResult {
            success,
            files,
            errors,
            warnings,
            metadata,
        })
    }

    /// Fetch AI content for every slot of every planned section.
    async fn fetch(
        &self,
        blueprint: &Blueprint,
        preset: &str,
        sections: &[PlannedSection],
        cancel: &CancellationToken,
    ) -> Vec<BTreeMap<String, SlotFetch>> {
        let mut fetched = vec![BTreeMap::new(); sections.len()];
        if !blueprint.use_ai_content {
            return fetched;
        }

        let requests: Vec<FetchRequest> = sections
            .iter()
            .enumerate()
            .flat_map(|(index, planned)| {
                planned.pattern.slots.iter().map(move |slot| FetchRequest {
                    section: index,
                    section_type: planned.at.section_type,
                    context: PromptContext {
                        industry: blueprint.industry.clone(),
                        preset: preset.to_string(),
                        company: blueprint.client.company.clone(),
                        page: planned.at.page.clone(),
                        section_id: planned.at.section.clone(),
                        slot: slot.name.clone(),
                        slot_kind: slot.kind,
                    },
                })
            })
            .collect();

        let limits = FetchLimits {
            max_in_flight: self.config.generation.max_concurrent_fetches,
            timeout: self.config.content_timeout(),
        };
        info!(requests = requests.len(), max_in_flight = limits.max_in_flight, "fetching content");

        for (request, outcome) in fetch_all(self.provider.as_ref(), requests, limits, cancel).await {
            if let Some(slots) = fetched.get_mut(request.section) {
                slots.insert(request.context.slot, outcome);
            }
        }
        fetched
    }

    #[allow(clippy::too_many_arguments)]
    fn process_section(
        &self,
        blueprint: &Blueprint,
        registry: &PatternRegistry,
        preset: &str,
        planned: &PlannedSection,
        ai: &BTreeMap<String, SlotFetch>,
        placeholders: &Placeholders,
        theme: &ThemeIdentity,
    ) -> SectionOutcome {
        let at = &planned.at;
        let pattern = &planned.pattern;
        let page = &blueprint.pages[at.page_index];
        let descriptor = &page.sections[at.section_index];

        let (config, mut warnings) = merge_config(
            pattern,
            &registry.preset_overrides(preset, pattern),
            &blueprint.tokens,
            &descriptor.config,
            at,
        );

        let literal = literal_content(blueprint, descriptor);
        let resolved = resolve_content(pattern, at, ai, &literal, &self.policy, placeholders);
        warnings.extend(resolved.warnings.iter().cloned());

        if let Some(slot) = resolved.missing {
            debug!(section = %at, slot = %slot, "dropping section with unresolved slot");
            return SectionOutcome {
                order: at.order_key(),
                warnings,
                rendered: Err(Issue::section(
                    ErrorKind::MissingRequiredSlot,
                    at,
                    format!("slot '{slot}' of pattern '{}' has no content", pattern.id),
                )),
            };
        }

        let section = ResolvedSection {
            section: at.clone(),
            pattern: pattern.clone(),
            config,
            content: resolved.content,
            sources: resolved.sources,
            warnings: warnings.clone(),
        };

        let rendered = match render_pattern_file(&section, &theme.slug, self.sanitizer.as_ref()) {
            Ok(file) => {
                debug!(section = %at, pattern = %pattern.id, bytes = file.len(), "rendered section");
                Ok(RenderedSection {
                    resolved: section,
                    file,
                })
            }
            Err(e) => {
                warn!(section = %at, pattern = %pattern.id, error = %e, "pattern could not be rendered");
                Err(Issue::section(
                    ErrorKind::InvalidPattern,
                    at,
                    format!("pattern '{}': {e}", pattern.id),
                ))
            }
        };

        SectionOutcome {
            order: at.order_key(),
            warnings,
            rendered,
        }
    }
}
