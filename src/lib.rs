// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::needless_pass_by_value)]

//! # assetq
//!
//! Search and bulk lookup client for an internet asset intelligence
//! platform (hosts, certificates, web properties).
//!
//! ## Features
//!
//! - **Resilient pagination**: one query becomes a bounded series of page
//!   requests; failures after the first page keep the data already fetched
//! - **Cancellation and deadlines**: a shared [`StopSignal`] is checked
//!   between pages and raced against every in-flight request
//! - **Typed results**: raw records are classified into [`Asset`] values
//! - **Retry and rate limiting**: exponential backoff, `Retry-After`, and a
//!   client-side token bucket
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use assetq::{config::AppConfig, service, progress::NoopProgress, StopSignal};
//!
//! #[tokio::main]
//! async fn main() -> assetq::Result<()> {
//!     let client = AppConfig::load(None)?.platform_client()?;
//!     let params = service::SearchParams::new("services.port: 22");
//!     let result = service::search(&client, &params, &StopSignal::new(), &NoopProgress).await?;
//!
//!     for asset in &result.hits {
//!         println!("{}", asset.summary());
//!     }
//!     if let Some(err) = &result.partial_error {
//!         eprintln!("incomplete: {err}");
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │            CLI  (search / lookup / config)                  │
//! └──────────────────────────────┬──────────────────────────────┘
//!                        service::search / lookup
//!                                │
//! ┌──────────────────────────────┴──────────────────────────────┐
//! │  PaginationDriver   ── ProgressSink, Classifier, StopSignal │
//! └──────────────────────────────┬──────────────────────────────┘
//!                         PageFetcher (api)
//!                                │
//! ┌──────────┬───────────────────┴──────┬───────────────────────┐
//! │   Auth   │        HTTP client       │     Rate limiter      │
//! │ Bearer   │ retry, backoff, meta     │ governor              │
//! │ Org ID   │ stop-aware               │                       │
//! └──────────┴──────────────────────────┴───────────────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]
#![allow(missing_docs)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// Cancellation and deadlines
pub mod cancel;

/// Authentication
pub mod auth;

/// HTTP client with retry and rate limiting
pub mod http;

/// Platform API endpoints and page fetchers
pub mod api;

/// Asset types and record classification
pub mod assets;

/// Progress reporting
pub mod progress;

/// Paginated fetch driver
pub mod pagination;

/// Search and lookup operations
pub mod service;

/// Application configuration
pub mod config;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use assets::{Asset, AssetType};
pub use cancel::{StopReason, StopSignal};
pub use error::{Error, ErrorKind, Result};
pub use pagination::{PageRunResult, PaginationDriver, PaginationParams};
pub use types::*;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
