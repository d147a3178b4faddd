//! Album artwork from the iTunes Search API.
//!
//! See: <https://performance-partners.apple.com/search-api>

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::{Result, USER_AGENT, VibeError};

/// Default base URL for the iTunes Search API.
pub const DEFAULT_ITUNES_BASE_URL: &str = "https://itunes.apple.com";

/// Default per-request timeout for artwork lookups.
pub const DEFAULT_ITUNES_TIMEOUT: Duration = Duration::from_secs(8);

/// Size token in the thumbnail URLs the API returns, and its replacement.
const THUMBNAIL_SIZE: &str = "100x100bb";
const ARTWORK_SIZE: &str = "600x600bb";

/// Looks up album artwork by artist and album title. Needs no API key.
#[derive(Clone)]
pub struct ItunesClient {
    http: Client,
    base_url: String,
    timeout: Duration,
}

impl ItunesClient {
    /// Create a client against the public iTunes Search API.
    pub fn new() -> Result<Self> {
        Self::with_base_url(DEFAULT_ITUNES_BASE_URL)
    }

    /// Create a client with a custom base URL (for testing with wiremock).
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| VibeError::Http(e.to_string()))?;
        Ok(Self::with_http_client(http, base_url))
    }

    /// Create a client sharing an existing HTTP client.
    pub fn with_http_client(http: Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout: DEFAULT_ITUNES_TIMEOUT,
        }
    }

    /// Set the per-request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// 600px artwork URL of the best album match, if any.
    ///
    /// Any failure (transport, status, body) is reported as no artwork.
    #[instrument(skip(self))]
    pub async fn artwork_url(&self, artist: &str, album: &str) -> Option<String> {
        let term = format!("{artist} {album}");
        let url = format!("{}/search", self.base_url);

        let response = match self
            .http
            .get(&url)
            .query(&[
                ("term", term.trim()),
                ("media", "music"),
                ("entity", "album"),
                ("limit", "1"),
            ])
            .timeout(self.timeout)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                debug!(error = %e, "iTunes search failed");
                return None;
            }
        };

        let status = response.status();
        if !status.is_success() {
            debug!(%status, "iTunes search rejected");
            return None;
        }

        let page: SearchPage = match response.json().await {
            Ok(page) => page,
            Err(e) => {
                debug!(error = %e, "unreadable iTunes response");
                return None;
            }
        };

        page.results
            .into_iter()
            .next()
            .and_then(|hit| hit.artwork_url_100)
            .filter(|art| !art.is_empty())
            .map(|art| art.replace(THUMBNAIL_SIZE, ARTWORK_SIZE))
    }
}

#[derive(Deserialize)]
struct SearchPage {
    #[serde(default)]
    results: Vec<SearchHit>,
}

#[derive(Deserialize)]
struct SearchHit {
    #[serde(rename = "artworkUrl100", default)]
    artwork_url_100: Option<String>,
}
