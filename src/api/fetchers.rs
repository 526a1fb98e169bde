//! Page fetchers for search and bulk lookup

use super::client::PlatformClient;
use super::types::{LookupRequest, SearchRequest};
use crate::assets::AssetType;
use crate::cancel::StopSignal;
use crate::error::{Error, Result};
use crate::pagination::{FetchedPage, PageBody, PageFetcher};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Identifiers per lookup request when no page size is given
pub const DEFAULT_LOOKUP_BATCH: u32 = 100;

/// Pages through a search query by remote continuation token
#[derive(Debug)]
pub struct SearchFetcher<'a> {
    client: &'a PlatformClient,
    query: String,
    fields: Vec<String>,
    collection_id: Option<String>,
}

impl<'a> SearchFetcher<'a> {
    /// Create a fetcher for one query
    pub fn new(client: &'a PlatformClient, query: impl Into<String>) -> Self {
        Self {
            client,
            query: query.into(),
            fields: Vec::new(),
            collection_id: None,
        }
    }

    /// Restrict returned fields
    #[must_use]
    pub fn fields(mut self, fields: Vec<String>) -> Self {
        self.fields = fields;
        self
    }

    /// Search inside a collection instead of the global dataset
    #[must_use]
    pub fn collection(mut self, collection_id: Option<String>) -> Self {
        self.collection_id = collection_id;
        self
    }
}

#[async_trait]
impl PageFetcher for SearchFetcher<'_> {
    async fn fetch_page(
        &mut self,
        stop: &StopSignal,
        cursor: Option<&str>,
        page_size: Option<u32>,
    ) -> Result<FetchedPage> {
        let request = SearchRequest {
            query: self.query.clone(),
            fields: self.fields.clone(),
            page_size,
            page_token: cursor.map(String::from),
        };
        self.client
            .search_page(&request, self.collection_id.as_deref(), stop)
            .await
    }
}

/// Pages through a list of identifiers in fixed-size batches.
///
/// The cursor is the index of the first identifier of the next batch and the
/// reported total is the number of identifiers requested.
#[derive(Debug)]
pub struct LookupFetcher<'a> {
    client: &'a PlatformClient,
    asset_type: AssetType,
    asset_ids: Vec<String>,
    at_time: Option<DateTime<Utc>>,
}

impl<'a> LookupFetcher<'a> {
    /// Create a fetcher for a list of identifiers
    pub fn new(client: &'a PlatformClient, asset_type: AssetType, asset_ids: Vec<String>) -> Self {
        Self {
            client,
            asset_type,
            asset_ids,
            at_time: None,
        }
    }

    /// View the assets as they were at a point in time
    #[must_use]
    pub fn at_time(mut self, at_time: Option<DateTime<Utc>>) -> Self {
        self.at_time = at_time;
        self
    }

    fn batch_start(cursor: Option<&str>) -> Result<usize> {
        match cursor {
            None => Ok(0),
            Some(cursor) => cursor
                .parse()
                .map_err(|_| Error::decode(format!("invalid lookup cursor '{cursor}'"))),
        }
    }
}

#[async_trait]
impl PageFetcher for LookupFetcher<'_> {
    async fn fetch_page(
        &mut self,
        stop: &StopSignal,
        cursor: Option<&str>,
        page_size: Option<u32>,
    ) -> Result<FetchedPage> {
        let total = self.asset_ids.len() as i64;
        let start = Self::batch_start(cursor)?;
        if start >= self.asset_ids.len() {
            return Ok(FetchedPage::new(PageBody::new(Vec::new(), total, None), None));
        }

        let batch = page_size.unwrap_or(DEFAULT_LOOKUP_BATCH) as usize;
        let end = start.saturating_add(batch).min(self.asset_ids.len());
        let request = LookupRequest {
            asset_type: self.asset_type,
            asset_ids: self.asset_ids[start..end].to_vec(),
            at_time: self.at_time,
        };

        let (records, meta) = self.client.lookup_batch(&request, stop).await?;
        let Some(records) = records else {
            return Ok(FetchedPage::empty(Some(meta)));
        };

        let next_cursor = (end < self.asset_ids.len()).then(|| end.to_string());
        Ok(FetchedPage::new(
            PageBody::new(records, total, next_cursor),
            Some(meta),
        ))
    }
}
