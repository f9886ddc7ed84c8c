//! Aggregation, re-pagination, sorting and view state.
//!
//! The pipeline: a [`worker`] thread runs [`aggregate`] over a
//! character source, [`pages`] re-slices the aggregated set into local
//! display pages, [`sort`] reorders the visible page, and [`state`]
//! ties it together behind the UI event surface.

mod aggregate;
mod pages;
mod sort;
mod state;
mod worker;

pub use aggregate::{Aggregation, Aggregator, DEFAULT_CONCURRENCY};
pub use pages::{AggregationResult, PageSize, paginate, slice_local_page, total_local_pages};
pub use sort::{SortDirection, SortError, collate, sort_records};
pub use state::{FETCH_FAILED_MESSAGE, Phase, Session};
pub use worker::{FetchHandle, FetchOutcome};
