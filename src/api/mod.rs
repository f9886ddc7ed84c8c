//! Character sources: upstream data model plus the trait the rest of
//! the application fetches through.
//!
//! The `CharacterSource` trait allows the session to work with the real
//! HTTP endpoint or with an in-memory mock for tests and demo mode.

mod http;
pub mod mock;
mod types;

pub use http::HttpCharacterSource;
pub use mock::MockSource;
pub use types::{
    Character, CharacterPage, FilterSet, GenderFilter, NamedRef, PageInfo, StatusFilter,
};

/// Error type for upstream fetch failures.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Transport-level failure (connect, timeout, TLS).
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Upstream reported no matching records (HTTP 404).
    ///
    /// On the first page of an aggregation this means an empty result
    /// set, not a failure; everywhere else it is a failure.
    #[error("no matching records upstream")]
    NotFound,

    /// Upstream answered with a non-success status other than 404.
    #[error("upstream returned HTTP {0}")]
    Upstream(u16),

    /// Response body did not match the expected envelope.
    #[error("malformed upstream response: {0}")]
    Malformed(String),
}

/// Abstraction over a paginated character endpoint.
///
/// Implementations:
/// - `HttpCharacterSource`: the real REST endpoint
/// - `MockSource`: scripted in-memory pages for tests and `--demo`
///
/// One upstream page per call; page numbers are 1-based. The trait is
/// object-safe and shared across fetch threads, so implementations must
/// be `Send + Sync`.
pub trait CharacterSource: Send + Sync {
    /// Fetches one upstream page of records matching `filters`.
    fn fetch_page(&self, filters: &FilterSet, page: u32) -> Result<CharacterPage, ApiError>;
}
