use crate::app::ports::PageFetcher;
use crate::metrics::{DEADLINES_TOTAL, FETCH_DURATION_SECONDS, RUN_DURATION_SECONDS};
use crate::normalize::{normalize, ZoneTable};
use crate::types::{ConferenceDeadlines, ConferenceSource, DateTarget, DeadlineStatus, NormalizedDeadline};
use metrics::{counter, histogram};
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, instrument, warn};

/// Result of one run over all sources, sorted by deadline.
#[derive(Debug, Default)]
pub struct PipelineResult {
    pub rows: Vec<ConferenceDeadlines>,
    pub ok: usize,
    pub parse_failed: usize,
    pub fetch_failed: usize,
    pub locator_failed: usize,
}

impl PipelineResult {
    fn from_rows(rows: Vec<ConferenceDeadlines>) -> Self {
        let mut result = Self::default();
        for row in &rows {
            match row.deadline.status {
                DeadlineStatus::Ok => result.ok += 1,
                DeadlineStatus::ParseFailed { .. } => result.parse_failed += 1,
                DeadlineStatus::FetchFailed { .. } => result.fetch_failed += 1,
                DeadlineStatus::LocatorFailed { .. } => result.locator_failed += 1,
            }
        }
        result.rows = rows;
        result
    }

    pub fn failed(&self) -> usize {
        self.parse_failed + self.fetch_failed + self.locator_failed
    }
}

pub struct Pipeline;

impl Pipeline {
    /// Fetches and normalizes every source concurrently, one task each.
    ///
    /// All tasks are awaited before anything is sorted; a failing source
    /// becomes a placeholder row instead of aborting the run.
    #[instrument(skip_all, fields(sources = sources.len()))]
    pub async fn run(
        sources: Vec<ConferenceSource>,
        fetcher: Arc<dyn PageFetcher>,
        zones: Arc<ZoneTable>,
    ) -> PipelineResult {
        info!("🚀 Fetching {} conferences", sources.len());
        let t_run = Instant::now();

        let handles: Vec<_> = sources
            .into_iter()
            .map(|source| {
                let fetcher = fetcher.clone();
                let zones = zones.clone();
                let name = source.name.clone();
                let handle = tokio::spawn(async move {
                    Self::process_source(&source, fetcher.as_ref(), &zones).await
                });
                (name, handle)
            })
            .collect();

        let mut rows = Vec::with_capacity(handles.len());
        for (name, handle) in handles {
            match handle.await {
                Ok(row) => rows.push(row),
                Err(e) => {
                    error!("Task for {} did not complete: {}", name, e);
                    let status = DeadlineStatus::FetchFailed {
                        reason: format!("task failed: {e}"),
                    };
                    rows.push(ConferenceDeadlines {
                        name,
                        deadline: NormalizedDeadline::failed(status, zones.canonical_zone()),
                        notification: None,
                    });
                }
            }
        }

        rows.sort_by(ConferenceDeadlines::cmp_by_deadline);
        let result = PipelineResult::from_rows(rows);

        histogram!(RUN_DURATION_SECONDS).record(t_run.elapsed().as_secs_f64());
        info!(
            "✅ {} deadlines normalized ({} parse failures, {} fetch failures, {} locator failures)",
            result.ok, result.parse_failed, result.fetch_failed, result.locator_failed
        );
        result
    }

    /// Runs the deadline and, when configured, the notification target.
    #[instrument(skip(source, fetcher, zones), fields(conference = %source.name))]
    pub async fn process_source(
        source: &ConferenceSource,
        fetcher: &dyn PageFetcher,
        zones: &ZoneTable,
    ) -> ConferenceDeadlines {
        let deadline = Self::resolve_target(&source.url, &source.deadline, fetcher, zones).await;
        let notification = match &source.notification {
            Some(target) => Some(Self::resolve_target(&source.url, target, fetcher, zones).await),
            None => None,
        };
        ConferenceDeadlines {
            name: source.name.clone(),
            deadline,
            notification,
        }
    }

    async fn resolve_target(
        url: &str,
        target: &DateTarget,
        fetcher: &dyn PageFetcher,
        zones: &ZoneTable,
    ) -> NormalizedDeadline {
        let t_fetch = Instant::now();
        let fetched = fetcher.fetch_text(url, &target.locator).await;
        histogram!(FETCH_DURATION_SECONDS).record(t_fetch.elapsed().as_secs_f64());

        let deadline = match fetched {
            Ok(text) => normalize(&text, &target.pattern, zones),
            Err(e) => {
                warn!("{}: {}", url, e);
                NormalizedDeadline::failed(e.into(), zones.canonical_zone())
            }
        };
        if let DeadlineStatus::ParseFailed { reason, .. } = &deadline.status {
            warn!("No '{}' date in text: {}", target.pattern, reason);
        }
        counter!(DEADLINES_TOTAL, "status" => deadline.status.label()).increment(1);
        deadline
    }
}
