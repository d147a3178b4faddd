//! MusicBrainz web service client.
//!
//! See: <https://musicbrainz.org/doc/MusicBrainz_API>

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use super::Catalog;
use super::router::{QueryRoute, route};
use crate::telemetry;
use crate::types::CandidateItem;
use crate::{Result, USER_AGENT, VibeError};

/// Default base URL for the MusicBrainz web service.
const DEFAULT_BASE_URL: &str = "https://musicbrainz.org/ws/2";

/// Release groups requested per artist are clamped to this range.
const MAX_RELEASE_GROUPS: usize = 24;

/// Client for the MusicBrainz JSON web service.
#[derive(Clone)]
pub struct MusicBrainzClient {
    http: Client,
    base_url: String,
    timeout: Duration,
}

impl MusicBrainzClient {
    /// Create a client against the public MusicBrainz service.
    pub fn new() -> Result<Self> {
        Self::with_base_url(DEFAULT_BASE_URL)
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
            timeout: Duration::from_secs(20),
        }
    }

    /// Set the per-request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        params: &[(&str, String)],
    ) -> Result<T> {
        let url = format!("{}/{}", self.base_url, endpoint);
        debug!(%url, "querying MusicBrainz");

        let result = self.send_json(&url, params).await;
        let status = if result.is_ok() { "ok" } else { "error" };
        metrics::counter!(telemetry::CATALOG_REQUESTS_TOTAL,
            "endpoint" => endpoint,
            "status" => status,
        )
        .increment(1);
        result
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        url: &str,
        params: &[(&str, String)],
    ) -> Result<T> {
        let response = self
            .http
            .get(url)
            .query(params)
            .query(&[("fmt", "json")])
            .header("Accept", "application/json")
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| VibeError::CatalogLookupFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(VibeError::CatalogLookupFailed(format!(
                "MusicBrainz returned {status} for {url}"
            )));
        }

        response
            .json()
            .await
            .map_err(|e| VibeError::CatalogLookupFailed(e.to_string()))
    }

    /// Search artists by name. Lucene syntax in `name` is escaped.
    pub async fn search_artists(&self, name: &str, limit: usize) -> Result<Vec<MbArtist>> {
        self.artist_query(escape_lucene(name), limit).await
    }

    /// Search artists carrying a genre tag.
    pub async fn search_artists_by_tag(&self, tag: &str, limit: usize) -> Result<Vec<MbArtist>> {
        self.artist_query(format!("tag:{tag}"), limit).await
    }

    async fn artist_query(&self, query: String, limit: usize) -> Result<Vec<MbArtist>> {
        let page: ArtistSearch = self
            .get_json("artist", &[("query", query), ("limit", limit.to_string())])
            .await?;
        Ok(page.artists)
    }

    /// Albums and EPs of an artist.
    pub async fn release_groups_for_artist(
        &self,
        artist_id: &str,
        limit: usize,
    ) -> Result<Vec<MbReleaseGroup>> {
        let page: ReleaseGroupBrowse = self
            .get_json(
                "release-group",
                &[
                    ("artist", artist_id.to_string()),
                    ("type", "album|ep".to_string()),
                    ("limit", limit.to_string()),
                ],
            )
            .await?;
        Ok(page.release_groups)
    }

    /// IDs of the releases belonging to a release group.
    pub async fn releases_for_group(
        &self,
        release_group_id: &str,
        limit: usize,
    ) -> Result<Vec<String>> {
        let page: ReleaseBrowse = self
            .get_json(
                "release",
                &[
                    ("release-group", release_group_id.to_string()),
                    ("limit", limit.to_string()),
                ],
            )
            .await?;
        Ok(page
            .releases
            .into_iter()
            .map(|r| r.id)
            .filter(|id| !id.is_empty())
            .collect())
    }
}

/// Characters with meaning in Lucene query syntax.
const LUCENE_SPECIAL: &[char] = &[
    '+', '-', '&', '|', '!', '(', ')', '{', '}', '[', ']', '^', '"', '~', '*', '?', ':', '\\',
    '/',
];

/// Backslash-escape Lucene syntax so text is searched literally.
pub fn escape_lucene(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if LUCENE_SPECIAL.contains(&c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// MusicBrainz artist search hit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MbArtist {
    pub id: String,
    #[serde(default)]
    pub name: String,
}

/// MusicBrainz release group.
#[derive(Debug, Clone, Deserialize)]
pub struct MbReleaseGroup {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(rename = "first-release-date", default)]
    pub first_release_date: Option<String>,
}

impl MbReleaseGroup {
    pub fn title_or_untitled(&self) -> String {
        self.title.clone().unwrap_or_else(|| "Untitled".to_string())
    }
}

#[derive(Deserialize)]
struct ArtistSearch {
    #[serde(default)]
    artists: Vec<MbArtist>,
}

#[derive(Deserialize)]
struct ReleaseGroupBrowse {
    #[serde(rename = "release-groups", default)]
    release_groups: Vec<MbReleaseGroup>,
}

#[derive(Deserialize)]
struct ReleaseBrowse {
    #[serde(default)]
    releases: Vec<MbRelease>,
}

#[derive(Deserialize)]
struct MbRelease {
    #[serde(default)]
    id: String,
}

// ============================================================================
// Catalog implementation
// ============================================================================

/// Catalog lookup backed by MusicBrainz.
///
/// Resolves a prompt to exactly one artist and returns that artist's albums
/// and EPs, so results never mix artists.
#[derive(Clone)]
pub struct MusicBrainzCatalog {
    client: MusicBrainzClient,
}

impl MusicBrainzCatalog {
    pub fn new(client: MusicBrainzClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &MusicBrainzClient {
        &self.client
    }

    /// Pick the single artist a prompt refers to.
    async fn resolve_artist(&self, query: &str, routed: &QueryRoute) -> Result<Option<MbArtist>> {
        if let QueryRoute::ForcedArtist(name) = routed {
            let matches = self.client.search_artists(name, 5).await?;
            let exact = matches
                .iter()
                .find(|a| a.name.eq_ignore_ascii_case(name))
                .cloned();
            return Ok(exact.or_else(|| matches.into_iter().next()));
        }

        if let Some(artist) = self.client.search_artists(query, 3).await?.into_iter().next() {
            return Ok(Some(artist));
        }

        match routed {
            QueryRoute::Artist(value) if value != query => Ok(self
                .client
                .search_artists(value, 3)
                .await?
                .into_iter()
                .next()),
            QueryRoute::Tag(genre) | QueryRoute::ForcedTag(genre) => Ok(self
                .client
                .search_artists_by_tag(genre, 5)
                .await?
                .into_iter()
                .next()),
            _ => Ok(None),
        }
    }
}

/// An artist resolved from a query, with that artist's albums and EPs.
#[derive(Debug, Clone)]
pub struct CatalogMatch {
    pub routed: QueryRoute,
    /// `None` when no artist matched; `release_groups` is then empty.
    pub artist: Option<MbArtist>,
    pub release_groups: Vec<MbReleaseGroup>,
}

impl MusicBrainzCatalog {
    /// Route a query, pick one artist and list up to `limit` of its release groups.
    #[instrument(skip(self), fields(catalog = "musicbrainz"))]
    pub async fn resolve(&self, query: &str, limit: usize) -> Result<CatalogMatch> {
        let routed = route(query);
        debug!(?routed, "routed query");

        let Some(artist) = self.resolve_artist(query, &routed).await? else {
            debug!("no artist matched");
            return Ok(CatalogMatch {
                routed,
                artist: None,
                release_groups: Vec::new(),
            });
        };

        let mut release_groups = self
            .client
            .release_groups_for_artist(&artist.id, limit.clamp(1, MAX_RELEASE_GROUPS))
            .await?;
        release_groups.truncate(limit);

        Ok(CatalogMatch {
            routed,
            artist: Some(artist),
            release_groups,
        })
    }
}

#[async_trait]
impl Catalog for MusicBrainzCatalog {
    fn name(&self) -> &str {
        "musicbrainz"
    }

    async fn search(&self, query: &str, limit: usize) -> Result<Vec<CandidateItem>> {
        let matched = self.resolve(query, limit).await?;
        Ok(matched
            .release_groups
            .into_iter()
            .map(|rg| {
                let title = rg.title_or_untitled();
                CandidateItem::release_group(rg.id, title)
            })
            .collect())
    }
}
