//! HTTP character source backed by the public REST endpoint.

use std::time::Duration;

use reqwest::StatusCode;
use reqwest::blocking::Client;

use super::{ApiError, CharacterPage, CharacterSource, FilterSet};

/// Default timeout for upstream requests.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Character source for the live REST API.
pub struct HttpCharacterSource {
    client: Client,
    base_url: String,
}

impl HttpCharacterSource {
    /// Creates a source for `base_url` (no trailing slash) with the
    /// default request timeout.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ApiError> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    /// Creates a source with an explicit request timeout.
    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ApiError> {
        let client = Client::builder().timeout(timeout).build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { client, base_url })
    }

    fn endpoint(&self) -> String {
        format!("{}/character/", self.base_url)
    }
}

impl CharacterSource for HttpCharacterSource {
    fn fetch_page(&self, filters: &FilterSet, page: u32) -> Result<CharacterPage, ApiError> {
        let mut params = filters.query_params();
        params.push(("page", page.to_string()));

        tracing::debug!(page, ?params, "requesting upstream page");

        let response = self.client.get(self.endpoint()).query(&params).send()?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound);
        }
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), page, "upstream request failed");
            return Err(ApiError::Upstream(status.as_u16()));
        }

        response
            .json::<CharacterPage>()
            .map_err(|e| ApiError::Malformed(e.to_string()))
    }
}
