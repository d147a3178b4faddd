//! Cover Art Archive client implementing the fetch cascade.

use std::time::Duration;

use async_trait::async_trait;
use image::RgbImage;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, instrument};

use super::cascade::{
    DEFAULT_ARCHIVE_BASE_URL, first_success, release_candidates, release_group_candidates,
};
use crate::catalog::MusicBrainzClient;
use crate::telemetry;
use crate::types::{AttemptOutcome, CascadeLevel, FetchAttempt, ItemDiagnostics};
use crate::{Result, USER_AGENT, VibeError};

/// Default per-request timeout for artwork downloads.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(12);

/// Default number of releases tried after the release-group level fails.
pub const DEFAULT_RELEASE_FALLBACK_LIMIT: usize = 10;

/// A decoded cover image.
#[derive(Debug, Clone)]
pub struct FetchedImage {
    /// URL the bytes were served from, after redirects.
    pub source_url: String,
    pub pixels: RgbImage,
    pub width: u32,
    pub height: u32,
}

impl FetchedImage {
    /// Decode raw bytes into an RGB raster.
    pub fn decode(source_url: impl Into<String>, bytes: &[u8]) -> Result<Self> {
        let decoded = image::load_from_memory(bytes).map_err(|e| VibeError::Decode(e.to_string()))?;
        let pixels = decoded.to_rgb8();
        let (width, height) = pixels.dimensions();
        if width == 0 || height == 0 {
            return Err(VibeError::Decode("image has no pixels".to_string()));
        }
        Ok(Self {
            source_url: source_url.into(),
            pixels,
            width,
            height,
        })
    }
}

/// Result of running the cascade for one release group.
///
/// `image` is `None` when every candidate failed, which is a normal outcome.
#[derive(Debug, Clone, Default)]
pub struct CoverOutcome {
    pub image: Option<FetchedImage>,
    pub attempts: Vec<FetchAttempt>,
}

impl CoverOutcome {
    pub fn absent(attempts: Vec<FetchAttempt>) -> Self {
        Self {
            image: None,
            attempts,
        }
    }

    /// Record a hit, stamping the winning attempt with the image's final URL.
    pub fn found(image: FetchedImage, mut attempts: Vec<FetchAttempt>) -> Self {
        if let Some(winner) = attempts.iter_mut().rev().find(|a| a.outcome.is_success()) {
            winner.resolved_url = Some(image.source_url.clone());
        }
        Self {
            image: Some(image),
            attempts,
        }
    }

    /// URL the image was served from, after redirects.
    pub fn chosen_url(&self) -> Option<&str> {
        self.image.as_ref().map(|image| image.source_url.as_str())
    }

    pub fn diagnostics(&self) -> ItemDiagnostics {
        ItemDiagnostics {
            attempts: self.attempts.clone(),
            chosen_url: self.chosen_url().map(str::to_string),
        }
    }

    /// Split into the image or an `ImageUnavailable` error, keeping the attempts.
    pub fn into_result(
        self,
        release_group_id: &str,
    ) -> (Result<FetchedImage>, Vec<FetchAttempt>) {
        match self.image {
            Some(image) => (Ok(image), self.attempts),
            None => (
                Err(VibeError::ImageUnavailable(release_group_id.to_string())),
                self.attempts,
            ),
        }
    }
}

/// Source of cover images for release groups.
#[async_trait]
pub trait CoverSource: Send + Sync {
    /// Source name for logging/debugging.
    fn name(&self) -> &str;

    /// Run the cascade for a release group. Never fails: exhaustion is
    /// reported as an absent image.
    async fn fetch_cover(&self, release_group_id: &str) -> CoverOutcome;
}

/// Fetches covers from the Cover Art Archive.
///
/// Release-group artwork is tried first; if none of its variants decode, the
/// group's releases are listed through MusicBrainz (when a client is
/// configured) and each release's artwork is tried in turn.
#[derive(Clone)]
pub struct CoverArtFetcher {
    http: Client,
    base_url: String,
    timeout: Duration,
    releases: Option<MusicBrainzClient>,
    release_limit: usize,
}

impl CoverArtFetcher {
    /// Create a fetcher against the public Cover Art Archive.
    pub fn new() -> Result<Self> {
        Self::with_base_url(DEFAULT_ARCHIVE_BASE_URL)
    }

    /// Create a fetcher with a custom base URL (for testing with wiremock).
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| VibeError::Http(e.to_string()))?;
        Ok(Self::with_http_client(http, base_url))
    }

    /// Create a fetcher sharing an existing HTTP client.
    pub fn with_http_client(http: Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            timeout: DEFAULT_FETCH_TIMEOUT,
            releases: None,
            release_limit: DEFAULT_RELEASE_FALLBACK_LIMIT,
        }
    }

    /// Set the per-request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Enable the release-level fallback using this MusicBrainz client.
    pub fn release_fallback(mut self, client: MusicBrainzClient) -> Self {
        self.releases = Some(client);
        self
    }

    /// Maximum number of releases tried in the release-level fallback.
    pub fn release_limit(mut self, limit: usize) -> Self {
        self.release_limit = limit;
        self
    }

    /// GET one candidate URL and decode it.
    async fn try_url(&self, url: String) -> std::result::Result<FetchedImage, AttemptOutcome> {
        let response = self
            .http
            .get(&url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(transport_outcome)?;

        let status = response.status();
        if !status.is_success() {
            return Err(AttemptOutcome::Status(status.as_u16()));
        }

        let final_url = response.url().to_string();
        let bytes = response.bytes().await.map_err(transport_outcome)?;
        if bytes.is_empty() {
            return Err(AttemptOutcome::EmptyBody);
        }

        FetchedImage::decode(final_url, &bytes)
            .map_err(|e| AttemptOutcome::Undecodable(e.to_string()))
    }

    /// Front image listed in the release group's archive index.
    ///
    /// `None` when the index is missing or unreadable, or has no front image.
    #[instrument(skip(self))]
    pub async fn front_image_url(&self, release_group_id: &str) -> Option<String> {
        let url = format!(
            "{}/release-group/{release_group_id}",
            self.base_url.trim_end_matches('/')
        );
        let response = match self
            .http
            .get(&url)
            .header("Accept", "application/json")
            .timeout(self.timeout)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                debug!(error = %e, "archive index request failed");
                return None;
            }
        };

        let status = response.status();
        if !status.is_success() {
            debug!(%status, "no archive index");
            return None;
        }

        match response.json::<ArchiveIndex>().await {
            Ok(index) => index.front_image(),
            Err(e) => {
                debug!(error = %e, "unreadable archive index");
                None
            }
        }
    }

    async fn scan(
        &self,
        urls: &[String],
        level: CascadeLevel,
        log: &mut Vec<FetchAttempt>,
    ) -> Option<FetchedImage> {
        let start = log.len();
        let found = first_success(urls, &level, |url| self.try_url(url), log).await;

        let level_label = match level {
            CascadeLevel::ReleaseGroup => "release_group",
            CascadeLevel::Release(_) => "release",
        };
        for attempt in &log[start..] {
            metrics::counter!(telemetry::COVER_ATTEMPTS_TOTAL,
                "level" => level_label,
                "outcome" => attempt.outcome.as_str(),
            )
            .increment(1);
        }

        found.map(|(_, image)| image)
    }
}

/// Listing returned by `GET /release-group/{id}`.
#[derive(Deserialize)]
struct ArchiveIndex {
    #[serde(default)]
    images: Vec<ArchiveImage>,
}

#[derive(Deserialize)]
struct ArchiveImage {
    #[serde(default)]
    front: bool,
    #[serde(default)]
    image: Option<String>,
}

impl ArchiveIndex {
    fn front_image(self) -> Option<String> {
        self.images
            .into_iter()
            .filter(|img| img.front)
            .find_map(|img| img.image.filter(|url| !url.is_empty()))
    }
}

fn transport_outcome(err: reqwest::Error) -> AttemptOutcome {
    if err.is_timeout() {
        AttemptOutcome::Timeout
    } else {
        AttemptOutcome::Transport(err.to_string())
    }
}

#[async_trait]
impl CoverSource for CoverArtFetcher {
    fn name(&self) -> &str {
        "coverartarchive"
    }

    #[instrument(skip(self), fields(source = "coverartarchive"))]
    async fn fetch_cover(&self, release_group_id: &str) -> CoverOutcome {
        let mut attempts = Vec::new();

        let urls = release_group_candidates(&self.base_url, release_group_id);
        if let Some(image) = self
            .scan(&urls, CascadeLevel::ReleaseGroup, &mut attempts)
            .await
        {
            metrics::counter!(telemetry::COVERS_TOTAL, "status" => "hit").increment(1);
            return CoverOutcome::found(image, attempts);
        }

        if let Some(client) = &self.releases {
            let release_ids = match client
                .releases_for_group(release_group_id, self.release_limit)
                .await
            {
                Ok(ids) => ids,
                Err(e) => {
                    debug!(error = %e, "release listing failed, skipping release fallback");
                    Vec::new()
                }
            };

            for release_id in release_ids {
                let urls = release_candidates(&self.base_url, &release_id);
                if let Some(image) = self
                    .scan(&urls, CascadeLevel::Release(release_id), &mut attempts)
                    .await
                {
                    metrics::counter!(telemetry::COVERS_TOTAL, "status" => "hit").increment(1);
                    return CoverOutcome::found(image, attempts);
                }
            }
        }

        debug!(attempts = attempts.len(), "no cover art found");
        metrics::counter!(telemetry::COVERS_TOTAL, "status" => "miss").increment(1);
        CoverOutcome::absent(attempts)
    }
}
