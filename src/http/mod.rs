//! HTTP client module
//!
//! Provides the HTTP client the platform API is built on.
//!
//! # Features
//!
//! - **Automatic Retries**: Configurable retry logic with backoff
//! - **Rate Limiting**: Token bucket rate limiter using governor
//! - **Cancellation**: Every wait and in-flight request races a
//!   [`StopSignal`](crate::cancel::StopSignal)
//! - **Response Metadata**: Request/response descriptors and attempt counts

mod client;
mod meta;
mod rate_limit;

pub use client::{HttpClient, HttpClientConfig, HttpClientConfigBuilder, HttpResponse};
pub use meta::{RequestInfo, ResponseInfo, ResponseMeta, REQUEST_ID_HEADER};
pub use rate_limit::{RateLimiter, RateLimiterConfig};

#[cfg(test)]
mod tests;
