//! Search and lookup operations
//!
//! The operations the CLI exposes: each builds the right page fetcher for
//! its parameters and runs it through one [`PaginationDriver`].

use crate::api::{LookupFetcher, PlatformClient, SearchFetcher};
use crate::assets::{AssetClassifier, AssetType};
use crate::cancel::StopSignal;
use crate::error::{Error, Result};
use crate::pagination::{PageRunResult, PaginationDriver, PaginationParams};
use crate::progress::ProgressSink;
use chrono::{DateTime, Utc};
use std::collections::HashSet;
use tracing::info;

/// Result of a search or lookup run
pub type SearchResult = PageRunResult;

/// Parameters of one search
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchParams {
    /// Query expression
    pub query: String,
    /// Field projection (empty = all fields)
    pub fields: Vec<String>,
    /// Items per page
    pub page_size: Option<u32>,
    /// Maximum page requests
    pub max_pages: Option<u32>,
    /// Collection to search instead of the global dataset
    pub collection_id: Option<String>,
}

impl SearchParams {
    /// Search for `query` with no bounds
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Default::default()
        }
    }

    /// Pagination bounds
    pub fn pagination(&self) -> PaginationParams {
        PaginationParams::new(self.page_size, self.max_pages)
    }
}

/// Parameters of one bulk lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupParams {
    /// Kind of every requested asset
    pub asset_type: AssetType,
    /// Identifiers, in the order results should come back
    pub asset_ids: Vec<String>,
    /// Identifiers per request
    pub page_size: Option<u32>,
    /// Maximum requests
    pub max_pages: Option<u32>,
    /// Point in time to view the assets at
    pub at_time: Option<DateTime<Utc>>,
}

impl LookupParams {
    /// Look up `asset_ids` with no bounds
    pub fn new(asset_type: AssetType, asset_ids: Vec<String>) -> Self {
        Self {
            asset_type,
            asset_ids,
            page_size: None,
            max_pages: None,
            at_time: None,
        }
    }

    /// Pagination bounds
    pub fn pagination(&self) -> PaginationParams {
        PaginationParams::new(self.page_size, self.max_pages)
    }
}

/// Run a paginated search
pub async fn search(
    client: &PlatformClient,
    params: &SearchParams,
    stop: &StopSignal,
    progress: &dyn ProgressSink,
) -> Result<SearchResult> {
    if params.query.trim().is_empty() {
        return Err(Error::invalid_argument("query", "query must not be empty"));
    }

    info!(query = %params.query, "starting search");
    let classifier = AssetClassifier::new();
    let mut fetcher = SearchFetcher::new(client, params.query.as_str())
        .fields(params.fields.clone())
        .collection(params.collection_id.clone());

    PaginationDriver::new(params.pagination(), progress, &classifier)
        .run(stop, &mut fetcher)
        .await
}

/// Run a bulk lookup. Duplicate identifiers are requested once.
pub async fn lookup(
    client: &PlatformClient,
    params: &LookupParams,
    stop: &StopSignal,
    progress: &dyn ProgressSink,
) -> Result<SearchResult> {
    let mut seen = HashSet::new();
    let ids: Vec<String> = params
        .asset_ids
        .iter()
        .map(|id| id.trim())
        .filter(|id| !id.is_empty() && seen.insert(id.to_string()))
        .map(String::from)
        .collect();

    if ids.is_empty() {
        return Err(Error::invalid_argument(
            "asset ids",
            "at least one asset id is required",
        ));
    }

    info!(asset_type = %params.asset_type, count = ids.len(), "starting lookup");
    let classifier = AssetClassifier::only(params.asset_type);
    let mut fetcher = LookupFetcher::new(client, params.asset_type, ids).at_time(params.at_time);

    PaginationDriver::new(params.pagination(), progress, &classifier)
        .run(stop, &mut fetcher)
        .await
}
