//! Platform API module
//!
//! Typed access to the search and asset lookup endpoints, and the
//! [`PageFetcher`](crate::pagination::PageFetcher) implementations the
//! pagination driver runs against them.

mod client;
mod fetchers;
mod types;

pub use client::{PlatformClient, DEFAULT_BASE_URL};
pub use fetchers::{LookupFetcher, SearchFetcher, DEFAULT_LOOKUP_BATCH};
pub use types::{LookupRequest, SearchRequest};

#[cfg(test)]
mod tests;
