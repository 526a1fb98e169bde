//! Pagination types and traits
//!
//! Defines the page-fetch abstraction the driver consumes and the aggregate
//! result it produces.

use crate::assets::Asset;
use crate::cancel::StopSignal;
use crate::error::{Error, Result};
use crate::http::ResponseMeta;
use crate::types::JsonValue;
use async_trait::async_trait;
use serde::Serialize;

/// Caller-supplied bounds for one run.
///
/// `None` means unset; an explicit `Some(0)` is invalid rather than
/// "unbounded".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PaginationParams {
    /// Items per page; `None` lets the remote service pick
    pub page_size: Option<u32>,
    /// Maximum page requests; `None` means until the cursor runs out
    pub max_pages: Option<u32>,
}

impl PaginationParams {
    /// Create params from optional bounds
    pub fn new(page_size: Option<u32>, max_pages: Option<u32>) -> Self {
        Self {
            page_size,
            max_pages,
        }
    }

    /// No bounds at all
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// Reject explicit zero bounds
    pub fn validate(&self) -> Result<()> {
        if self.page_size == Some(0) {
            return Err(Error::invalid_pagination("page size"));
        }
        if self.max_pages == Some(0) {
            return Err(Error::invalid_pagination("max pages"));
        }
        Ok(())
    }

    /// Check if `pages` has reached `max_pages`
    pub fn limit_reached(&self, pages: u32) -> bool {
        self.max_pages.is_some_and(|max| pages >= max)
    }
}

/// The data object of one page
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageBody {
    /// Raw hit records, in delivery order
    pub hits: Vec<JsonValue>,
    /// Total matching items as reported by this page
    pub total: i64,
    /// Continuation cursor; `None` or empty means exhausted
    pub next_cursor: Option<String>,
}

impl PageBody {
    /// Create a page body
    pub fn new(hits: Vec<JsonValue>, total: i64, next_cursor: Option<String>) -> Self {
        Self {
            hits,
            total,
            next_cursor,
        }
    }
}

/// One page response: an optional data object plus transport metadata
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FetchedPage {
    /// `None` when the remote call returned no data object
    pub body: Option<PageBody>,
    /// Transport metadata for the request
    pub meta: Option<ResponseMeta>,
}

impl FetchedPage {
    /// A page with a data object
    pub fn new(body: PageBody, meta: Option<ResponseMeta>) -> Self {
        Self {
            body: Some(body),
            meta,
        }
    }

    /// A page without a data object
    pub fn empty(meta: Option<ResponseMeta>) -> Self {
        Self { body: None, meta }
    }
}

/// Performs one page round trip
#[async_trait]
pub trait PageFetcher: Send {
    /// Fetch the page at `cursor` (`None` for the first page)
    async fn fetch_page(
        &mut self,
        stop: &StopSignal,
        cursor: Option<&str>,
        page_size: Option<u32>,
    ) -> Result<FetchedPage>;
}

/// Why a run stopped requesting pages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StopCause {
    /// The last page carried no continuation cursor
    Exhausted,
    /// The last page parsed to zero items
    EmptyPage,
    /// The last page carried no data object
    EmptyBody,
    /// `max_pages` was reached
    MaxPages,
    /// A page after the first failed
    FetchFailed,
    /// Cancellation or deadline after the first page
    Stopped,
}

/// Aggregate result of one run
#[derive(Debug, Default)]
pub struct PageRunResult {
    /// Metadata of the last attempted page, stamped with run latency and page count
    pub meta: Option<ResponseMeta>,
    /// Items from every successful page, in request order
    pub hits: Vec<Asset>,
    /// Total reported by the last successful page
    pub total_hits: i64,
    /// Why the run ended early, when it did after at least one page
    pub partial_error: Option<Error>,
    /// Raw records the classifier could not map to an asset
    pub dropped_hits: usize,
    /// Why the run stopped; `None` only on the zero value
    pub stop_cause: Option<StopCause>,
}

impl PageRunResult {
    /// Check if the run stopped early after recovering some data
    pub fn is_partial(&self) -> bool {
        self.partial_error.is_some()
    }

    /// Pages processed, from the finalized metadata
    pub fn page_count(&self) -> Option<u32> {
        self.meta.as_ref().and_then(|meta| meta.page_count)
    }
}
