//! Concurrent content fetching.
//!
//! One provider call per (section, slot), bounded by a semaphore, each under
//! its own timeout, all abandoned when the cancellation token fires.

use std::time::Duration;

use futures::future::join_all;
use themeforge_core::blueprint::{ContentValue, SectionType};
use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::provider::{ContentProvider, PromptContext};

/// A single slot request.
#[derive(Debug, Clone)]
pub struct FetchRequest {
    /// Index of the owning section in the run's section plan.
    pub section: usize,
    pub section_type: SectionType,
    pub context: PromptContext,
}

/// Outcome of one slot request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotFetch {
    Content(ContentValue),
    /// The provider had nothing for this slot.
    Empty,
    TimedOut,
    Failed(String),
    Cancelled,
}

/// Limits applied to a fetch round.
#[derive(Debug, Clone, Copy)]
pub struct FetchLimits {
    pub max_in_flight: usize,
    pub timeout: Duration,
}

/// Run every request, returning outcomes in request order.
pub async fn fetch_all(
    provider: &dyn ContentProvider,
    requests: Vec<FetchRequest>,
    limits: FetchLimits,
    cancel: &CancellationToken,
) -> Vec<(FetchRequest, SlotFetch)> {
    let semaphore = Semaphore::new(limits.max_in_flight.max(1));
    let total = requests.len();

    let tasks = requests.into_iter().map(|request| {
        let semaphore = &semaphore;
        async move {
            let outcome = fetch_one(provider, &request, semaphore, limits.timeout, cancel).await;
            (request, outcome)
        }
    });
    let results = join_all(tasks).await;

    debug!(
        total,
        cancelled = results.iter().filter(|(_, o)| *o == SlotFetch::Cancelled).count(),
        "content fetch round finished"
    );
    results
}

async fn fetch_one(
    provider: &dyn ContentProvider,
    request: &FetchRequest,
    semaphore: &Semaphore,
    timeout: Duration,
    cancel: &CancellationToken,
) -> SlotFetch {
    let _permit = tokio::select! {
        biased;
        () = cancel.cancelled() => return SlotFetch::Cancelled,
        permit = semaphore.acquire() => match permit {
            Ok(permit) => permit,
            Err(e) => return SlotFetch::Failed(e.to_string()),
        },
    };

    let ctx = &request.context;
    let call = tokio::time::timeout(timeout, provider.fetch_content(request.section_type, ctx));

    tokio::select! {
        biased;
        () = cancel.cancelled() => SlotFetch::Cancelled,
        result = call => match result {
            Err(_) => {
                warn!(page = %ctx.page, section = %ctx.section_id, slot = %ctx.slot, ?timeout, "content fetch timed out");
                SlotFetch::TimedOut
            }
            Ok(Err(e)) => {
                warn!(page = %ctx.page, section = %ctx.section_id, slot = %ctx.slot, error = %e, "content fetch failed");
                SlotFetch::Failed(e.to_string())
            }
            Ok(Ok(mut content)) => match content.remove(&ctx.slot) {
                Some(value) => SlotFetch::Content(value),
                None => SlotFetch::Empty,
            },
        },
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    };

    use async_trait::async_trait;
    use themeforge_core::{blueprint::ContentMap, pattern::SlotKind};

    use super::*;
    use crate::provider::ProviderError;

    /// Echoes the slot name back, sleeping on `slow` slots and failing on `broken` ones.
    struct EchoProvider {
        in_flight: AtomicUsize,
        peak: AtomicUsize,
    }

    impl EchoProvider {
        fn new() -> Self {
            Self {
                in_flight: AtomicUsize::new(0),
                peak: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl ContentProvider for EchoProvider {
        async fn fetch_content(
            &self,
            _section_type: SectionType,
            context: &PromptContext,
        ) -> Result<ContentMap, ProviderError> {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);

            let delay = if context.slot == "slow" { 60_000 } else { 10 };
            tokio::time::sleep(Duration::from_millis(delay)).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);

            if context.slot == "broken" {
                return Err(ProviderError::Failed("upstream 500".to_string()));
            }
            Ok(ContentMap::from([(
                context.slot.clone(),
                ContentValue::text(format!("{} text", context.slot)),
            )]))
        }
    }

    fn request(section: usize, slot: &str) -> FetchRequest {
        FetchRequest {
            section,
            section_type: SectionType::Hero,
            context: PromptContext {
                industry: "construction".to_string(),
                preset: "generic".to_string(),
                company: "Acme".to_string(),
                page: "home".to_string(),
                section_id: format!("hero-{section}"),
                slot: slot.to_string(),
                slot_kind: SlotKind::Text,
            },
        }
    }

    fn limits(max_in_flight: usize) -> FetchLimits {
        FetchLimits {
            max_in_flight,
            timeout: Duration::from_millis(500),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_outcomes_keep_request_order() {
        let provider = EchoProvider::new();
        let requests = vec![
            request(0, "headline"),
            request(0, "slow"),
            request(1, "broken"),
            request(1, "headline"),
        ];

        let results = fetch_all(&provider, requests, limits(4), &CancellationToken::new()).await;
        let outcomes: Vec<_> = results.into_iter().map(|(_, o)| o).collect();

        assert_eq!(
            outcomes,
            vec![
                SlotFetch::Content(ContentValue::text("headline text")),
                SlotFetch::TimedOut,
                SlotFetch::Failed("content provider failed: upstream 500".to_string()),
                SlotFetch::Content(ContentValue::text("headline text")),
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_semaphore_bounds_concurrency() {
        let provider = Arc::new(EchoProvider::new());
        let requests = (0..10).map(|i| request(i, "headline")).collect();

        fetch_all(provider.as_ref(), requests, limits(3), &CancellationToken::new()).await;
        assert!(provider.peak.load(Ordering::SeqCst) <= 3);
    }

    #[tokio::test]
    async fn test_cancelled_before_start() {
        let provider = EchoProvider::new();
        let cancel = CancellationToken::new();
        cancel.cancel();

        let results = fetch_all(&provider, vec![request(0, "headline")], limits(1), &cancel).await;
        assert_eq!(results[0].1, SlotFetch::Cancelled);
        assert_eq!(provider.peak.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_mid_flight() {
        let provider = EchoProvider::new();
        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(100)).await;
            trigger.cancel();
        });

        let slow_limits = FetchLimits {
            max_in_flight: 2,
            timeout: Duration::from_secs(3600),
        };
        let results = fetch_all(
            &provider,
            vec![request(0, "headline"), request(1, "slow")],
            slow_limits,
            &cancel,
        )
        .await;

        assert!(matches!(results[0].1, SlotFetch::Content(_)));
        assert_eq!(results[1].1, SlotFetch::Cancelled);
    }
}
