//! Run bookkeeping: items, totals and transport metadata

use crate::assets::Asset;
use crate::http::ResponseMeta;
use std::time::Instant;

/// Append-only item list with a last-write-wins total
#[derive(Debug, Default)]
pub struct ResultAccumulator {
    hits: Vec<Asset>,
    total: i64,
    dropped: usize,
}

impl ResultAccumulator {
    /// Create an empty accumulator
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one page's items and overwrite the running total
    pub fn push_page(&mut self, items: Vec<Asset>, total: i64, dropped: usize) {
        self.hits.extend(items);
        self.total = total;
        self.dropped += dropped;
    }

    /// Items accumulated so far
    pub fn len(&self) -> usize {
        self.hits.len()
    }

    /// Check if nothing was accumulated
    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }

    /// Latest reported total
    pub fn total(&self) -> i64 {
        self.total
    }

    /// Records dropped so far
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    /// Consume into `(hits, total, dropped)`
    pub fn into_parts(self) -> (Vec<Asset>, i64, usize) {
        (self.hits, self.total, self.dropped)
    }
}

/// Keeps the metadata of the most recent page that had any
#[derive(Debug, Default)]
pub struct ResponseMetaAggregator {
    last: Option<ResponseMeta>,
}

impl ResponseMetaAggregator {
    /// Create an empty aggregator
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a page's metadata; pages without metadata keep the previous value
    pub fn record(&mut self, meta: Option<ResponseMeta>) {
        if meta.is_some() {
            self.last = meta;
        }
    }

    /// Latest recorded metadata
    pub fn last(&self) -> Option<&ResponseMeta> {
        self.last.as_ref()
    }

    /// Stamp the run latency and page count
    pub fn finalize(self, started: Instant, page_count: u32) -> Option<ResponseMeta> {
        self.last.map(|mut meta| {
            meta.latency = Some(started.elapsed());
            meta.page_count = Some(page_count);
            meta
        })
    }
}
