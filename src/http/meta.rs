//! Transport metadata attached to every response

use serde::{Serialize, Serializer};
use std::time::Duration;

/// Header the platform uses to identify a request in its logs
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// What was sent
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RequestInfo {
    /// HTTP method
    pub method: String,
    /// Fully resolved URL
    pub url: String,
}

/// What came back
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResponseInfo {
    /// HTTP status code
    pub status: u16,
    /// Platform request id, if the response carried one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

/// Transport-level metadata for one request, optionally stamped with
/// run-level latency and page count once a paginated run finishes
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResponseMeta {
    /// Request descriptor
    pub request: RequestInfo,
    /// Response descriptor
    pub response: ResponseInfo,
    /// Number of attempts the HTTP layer made (1 = no retries)
    pub attempts: u32,
    /// Wall-clock duration of the whole run
    #[serde(
        rename = "latency_ms",
        serialize_with = "serialize_latency",
        skip_serializing_if = "Option::is_none"
    )]
    pub latency: Option<Duration>,
    /// Pages processed by the run
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_count: Option<u32>,
}

impl ResponseMeta {
    /// Metadata for a single request
    pub fn new(
        method: impl Into<String>,
        url: impl Into<String>,
        status: u16,
        attempts: u32,
    ) -> Self {
        Self {
            request: RequestInfo {
                method: method.into(),
                url: url.into(),
            },
            response: ResponseInfo {
                status,
                request_id: None,
            },
            attempts,
            latency: None,
            page_count: None,
        }
    }

    /// Attach a request id
    #[must_use]
    pub fn with_request_id(mut self, request_id: Option<String>) -> Self {
        self.response.request_id = request_id;
        self
    }
}

#[allow(clippy::ref_option)]
fn serialize_latency<S: Serializer>(latency: &Option<Duration>, s: S) -> Result<S::Ok, S::Error> {
    match latency {
        Some(d) => s.serialize_u64(d.as_millis() as u64),
        None => s.serialize_none(),
    }
}
