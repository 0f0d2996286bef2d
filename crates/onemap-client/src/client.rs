use std::time::Duration;

use tracing::{debug, warn};

use crate::error::OneMapError;
use crate::types::SearchResponse;

pub const DEFAULT_BASE_URL: &str = "https://www.onemap.gov.sg/api/common/elastic/search";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const USER_AGENT: &str = "onemap-client-rs/0.1";

/// OneMap elastic search client
///
/// Every call maps to exactly one outbound GET. There is no caching and no
/// retry; callers decide what to do with a failure.
#[derive(Debug, Clone)]
pub struct OneMapClient {
    client: reqwest::Client,
    base_url: String,
}

impl OneMapClient {
    /// Create a client for the public OneMap endpoint
    pub fn new() -> crate::Result<Self> {
        Self::with_config(DEFAULT_BASE_URL, DEFAULT_TIMEOUT)
    }

    /// Create a client for a custom search endpoint
    pub fn with_base_url(base_url: &str) -> crate::Result<Self> {
        Self::with_config(base_url, DEFAULT_TIMEOUT)
    }

    /// Create a client for a custom search endpoint and request timeout
    pub fn with_config(base_url: &str, timeout: Duration) -> crate::Result<Self> {
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(OneMapError::InvalidBaseUrl(base_url.to_string()));
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Search OneMap for `search_val`, requesting geometry and address details
    pub async fn search(&self, search_val: &str) -> crate::Result<SearchResponse> {
        let url = format!(
            "{}?searchVal={}&returnGeom=Y&getAddrDetails=Y",
            self.base_url,
            urlencoding::encode(search_val)
        );

        debug!(url = %url, "Querying OneMap");

        let response = self
            .client
            .get(&url)
            .header("Accept", "application/json")
            .send()
            .await?;

        if !response.status().is_success() {
            warn!(status = %response.status(), search_val, "OneMap returned error status");
            return Err(OneMapError::ApiError(format!(
                "OneMap returned status {}",
                response.status()
            )));
        }

        let data: SearchResponse = response.json().await?;

        debug!(
            search_val,
            found = data.found,
            results = data.results.len(),
            "OneMap search complete"
        );

        Ok(data)
    }
}
