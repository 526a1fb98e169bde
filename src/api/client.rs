//! Platform API client

use super::types::{Envelope, LookupRequest, SearchRequest, SearchResultBody};
use crate::cancel::StopSignal;
use crate::error::Result;
use crate::http::{HttpClient, ResponseMeta};
use crate::pagination::{FetchedPage, PageBody};
use crate::types::JsonValue;
use tracing::debug;

/// Default platform endpoint
pub const DEFAULT_BASE_URL: &str = "https://api.platform.censys.io";

/// Typed client for the search and lookup endpoints
#[derive(Debug)]
pub struct PlatformClient {
    http: HttpClient,
}

impl PlatformClient {
    /// Wrap a configured HTTP client
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    /// Search endpoint path, scoped to a collection when one is given
    pub fn search_path(collection_id: Option<&str>) -> String {
        match collection_id {
            Some(id) => format!("/v3/collections/{id}/search/query"),
            None => "/v3/global/search/query".to_string(),
        }
    }

    /// Lookup endpoint path for one asset type
    pub fn lookup_path(request: &LookupRequest) -> String {
        format!("/v3/global/asset/{}", request.asset_type.api_path())
    }

    /// Fetch one search page.
    ///
    /// A response without a `result` object yields a page with no body.
    pub async fn search_page(
        &self,
        request: &SearchRequest,
        collection_id: Option<&str>,
        stop: &StopSignal,
    ) -> Result<FetchedPage> {
        let body = serde_json::to_value(request)?;
        let response = self
            .http
            .post(&Self::search_path(collection_id), body, stop)
            .await?;

        let envelope: Envelope<SearchResultBody> = response.json()?;
        let Some(result) = envelope.result else {
            debug!("search response carried no result object");
            return Ok(FetchedPage::empty(Some(response.meta)));
        };

        debug!(
            hits = result.hits.len(),
            total = result.total_hits,
            "search page received"
        );
        Ok(FetchedPage::new(
            PageBody::new(result.hits, result.total_hits, result.next_page_token),
            Some(response.meta),
        ))
    }

    /// Look up one batch of assets.
    ///
    /// Returns `None` records when the response carried no `result` array.
    pub async fn lookup_batch(
        &self,
        request: &LookupRequest,
        stop: &StopSignal,
    ) -> Result<(Option<Vec<JsonValue>>, ResponseMeta)> {
        let response = self
            .http
            .post(&Self::lookup_path(request), request.to_body(), stop)
            .await?;

        let envelope: Envelope<Vec<JsonValue>> = response.json()?;
        Ok((envelope.result, response.meta))
    }
}
