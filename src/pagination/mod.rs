//! Pagination module
//!
//! The resilient paginated fetch driver shared by search and bulk lookup.
//!
//! # Overview
//!
//! A [`PaginationDriver`] validates the caller's bounds, then loops:
//! check the page bound, poll the [`StopSignal`](crate::cancel::StopSignal),
//! report progress, fetch one page through a [`PageFetcher`], classify and
//! accumulate its hits, and decide whether to continue. Errors after the
//! first successful page are returned as data in
//! [`PageRunResult::partial_error`] rather than as `Err`.

mod accumulator;
mod driver;
mod types;

pub use accumulator::{ResponseMetaAggregator, ResultAccumulator};
pub use driver::PaginationDriver;
pub use types::{
    FetchedPage, PageBody, PageFetcher, PageRunResult, PaginationParams, StopCause,
};
