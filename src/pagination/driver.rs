//! The paginated fetch driver
//!
//! Turns one logical query into a bounded, strictly sequential series of
//! page requests. Failures and stops before the first page are returned as
//! errors; after it they are carried in [`PageRunResult::partial_error`]
//! next to the data recovered so far.

use super::accumulator::{ResponseMetaAggregator, ResultAccumulator};
use super::types::{PageFetcher, PageRunResult, PaginationParams, StopCause};
use crate::assets::{Asset, Classifier};
use crate::cancel::StopSignal;
use crate::error::{Error, Result};
use crate::progress::{ProgressSink, Stage};
use std::time::Instant;
use tracing::{debug, warn};

/// Mutable state scoped to one `run` call
#[derive(Debug, Default)]
struct RunState {
    cursor: Option<String>,
    pages_processed: u32,
    deferred_error: Option<Error>,
}

/// Drives a [`PageFetcher`] until the results, the page bound, the stop
/// signal or a failure ends the run
pub struct PaginationDriver<'a> {
    params: PaginationParams,
    progress: &'a dyn ProgressSink,
    classifier: &'a dyn Classifier,
}

impl<'a> PaginationDriver<'a> {
    /// Create a driver
    pub fn new(
        params: PaginationParams,
        progress: &'a dyn ProgressSink,
        classifier: &'a dyn Classifier,
    ) -> Self {
        Self {
            params,
            progress,
            classifier,
        }
    }

    /// The bounds this driver enforces
    pub fn params(&self) -> PaginationParams {
        self.params
    }

    /// Run one traversal.
    ///
    /// Returns `Err` only when no usable data exists: invalid bounds, a stop
    /// requested before the first page, or a failed first page.
    pub async fn run<F>(&self, stop: &StopSignal, fetcher: &mut F) -> Result<PageRunResult>
    where
        F: PageFetcher + ?Sized,
    {
        self.params.validate()?;

        let started = Instant::now();
        let mut state = RunState::default();
        let mut acc = ResultAccumulator::new();
        let mut meta = ResponseMetaAggregator::new();

        let cause = loop {
            if self.params.limit_reached(state.pages_processed) {
                break StopCause::MaxPages;
            }

            if let Some(reason) = stop.check() {
                let error = stop.classify(reason);
                if state.pages_processed == 0 {
                    return Err(error);
                }
                state.deferred_error = Some(error);
                break StopCause::Stopped;
            }

            if state.pages_processed > 0 {
                self.progress.notify(
                    Stage::Fetch,
                    &format!(
                        "Fetching page {} ({} of {} hits so far)",
                        state.pages_processed + 1,
                        acc.len(),
                        acc.total()
                    ),
                );
            }

            let page = match fetcher
                .fetch_page(stop, state.cursor.as_deref(), self.params.page_size)
                .await
            {
                Ok(page) => page,
                Err(error) => {
                    if state.pages_processed == 0 {
                        return Err(error);
                    }
                    self.progress.notify_error(Stage::Fetch, &error);
                    state.deferred_error = Some(error);
                    break StopCause::FetchFailed;
                }
            };

            meta.record(page.meta);

            let Some(body) = page.body else {
                state.pages_processed += 1;
                break StopCause::EmptyBody;
            };

            let raw_count = body.hits.len();
            let items: Vec<Asset> = body
                .hits
                .iter()
                .filter_map(|raw| self.classifier.classify(raw))
                .collect();
            let parsed = items.len();
            let dropped = raw_count - parsed;
            if dropped > 0 {
                warn!(
                    page = state.pages_processed + 1,
                    dropped, "records matched no known asset type"
                );
                self.progress.notify(
                    Stage::Classify,
                    &format!("Skipped {dropped} unrecognized record(s)"),
                );
            }

            acc.push_page(items, body.total, dropped);
            state.pages_processed += 1;

            let Some(next) = body.next_cursor.filter(|cursor| !cursor.is_empty()) else {
                break StopCause::Exhausted;
            };
            // A cursor with no items is treated as the end to avoid polling forever.
            if parsed == 0 {
                break StopCause::EmptyPage;
            }
            if self.params.limit_reached(state.pages_processed) {
                break StopCause::MaxPages;
            }
            state.cursor = Some(next);
        };

        debug!(
            ?cause,
            pages = state.pages_processed,
            hits = acc.len(),
            partial = state.deferred_error.is_some(),
            "pagination finished"
        );

        let meta = meta.finalize(started, state.pages_processed);
        let (hits, total_hits, dropped_hits) = acc.into_parts();

        Ok(PageRunResult {
            meta,
            hits,
            total_hits,
            partial_error: state.deferred_error,
            dropped_hits,
            stop_cause: Some(cause),
        })
    }
}
