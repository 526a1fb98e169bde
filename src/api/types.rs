//! Request and response bodies of the platform API

use crate::assets::AssetType;
use crate::types::JsonValue;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Body of a search query request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SearchRequest {
    /// Query expression
    pub query: String,
    /// Field projection
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<String>,
    /// Requested page size
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
    /// Continuation cursor
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_token: Option<String>,
}

/// Body of a bulk asset lookup request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupRequest {
    /// Kind of the requested assets
    pub asset_type: AssetType,
    /// Identifiers in this batch
    pub asset_ids: Vec<String>,
    /// Point in time to view the assets at
    pub at_time: Option<DateTime<Utc>>,
}

impl LookupRequest {
    /// JSON body; the id list key depends on the asset type
    pub fn to_body(&self) -> JsonValue {
        let key = match self.asset_type {
            AssetType::Host => "host_ids",
            AssetType::Certificate => "certificate_ids",
            AssetType::WebProperty => "webproperty_ids",
        };
        let mut body = serde_json::Map::new();
        body.insert(key.to_string(), JsonValue::from(self.asset_ids.clone()));
        if let Some(at_time) = self.at_time {
            body.insert("at_time".to_string(), JsonValue::String(at_time.to_rfc3339()));
        }
        JsonValue::Object(body)
    }
}

/// `{"result": ...}` wrapper every endpoint answers with
#[derive(Debug, Deserialize)]
pub(crate) struct Envelope<T> {
    pub result: Option<T>,
}

/// Search result data object
#[derive(Debug, Deserialize)]
pub(crate) struct SearchResultBody {
    #[serde(default)]
    pub hits: Vec<JsonValue>,
    #[serde(default)]
    pub total_hits: i64,
    #[serde(default)]
    pub next_page_token: Option<String>,
}
