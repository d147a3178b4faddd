//! Cover search: cover art URLs for one artist's albums and EPs.
//!
//! Unlike a board, nothing is downloaded or analyzed. Each release group's
//! front cover comes from the Cover Art Archive index, with the iTunes Search
//! API as a fallback. Release groups without any cover are left out.

use std::time::Instant;

use futures_util::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::catalog::{MbArtist, MbReleaseGroup, MusicBrainzCatalog, QueryRoute};
use crate::cover::{CoverArtFetcher, ItunesClient};
use crate::service::{DEFAULT_LIMIT, MAX_LIMIT};
use crate::telemetry;
use crate::{Result, VibeError};

/// Default bound on simultaneous cover lookups.
pub const DEFAULT_MAX_CONCURRENT_LOOKUPS: usize = 6;

/// A cover search request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverSearchRequest {
    pub query: String,
    #[serde(default)]
    pub limit: Option<usize>,
    #[serde(default)]
    pub debug: bool,
}

impl CoverSearchRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Self::default()
        }
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn debug(mut self, enabled: bool) -> Self {
        self.debug = enabled;
        self
    }

    /// Requested limit, defaulted and clamped to `1..=MAX_LIMIT`.
    pub fn effective_limit(&self) -> usize {
        self.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT)
    }
}

/// One release group with a cover.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverHit {
    pub artist: String,
    pub release_title: String,
    pub release_date: Option<String>,
    pub cover_url: String,
}

/// How the query was interpreted, returned in debug mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchDebug {
    pub routed: QueryRoute,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artist: Option<MbArtist>,
}

/// Cover search results, in release-group order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverSearchResponse {
    pub results: Vec<CoverHit>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debug: Option<SearchDebug>,
}

/// Finds cover URLs for the artist a query names.
#[derive(Clone)]
pub struct CoverSearch {
    catalog: MusicBrainzCatalog,
    archive: CoverArtFetcher,
    itunes: Option<ItunesClient>,
    max_concurrent_lookups: usize,
}

impl CoverSearch {
    pub fn new(catalog: MusicBrainzCatalog, archive: CoverArtFetcher) -> Self {
        Self {
            catalog,
            archive,
            itunes: None,
            max_concurrent_lookups: DEFAULT_MAX_CONCURRENT_LOOKUPS,
        }
    }

    /// Ask iTunes when the archive has no front cover.
    pub fn itunes_fallback(mut self, client: ItunesClient) -> Self {
        self.itunes = Some(client);
        self
    }

    /// Set the bound on simultaneous lookups (minimum 1).
    pub fn max_concurrent_lookups(mut self, n: usize) -> Self {
        self.max_concurrent_lookups = n.max(1);
        self
    }

    /// Run one search.
    ///
    /// Fails on an empty query or a catalog failure. Missing covers only
    /// shorten the result list.
    #[instrument(skip(self, request), fields(query = %request.query))]
    pub async fn search(&self, request: &CoverSearchRequest) -> Result<CoverSearchResponse> {
        let query = request.query.trim();
        if query.is_empty() {
            return Err(VibeError::InvalidInput("query must not be empty".to_string()));
        }
        let limit = request.effective_limit();
        let start = Instant::now();

        let matched = self.catalog.resolve(query, limit).await?;
        let results: Vec<CoverHit> = match &matched.artist {
            Some(artist) => {
                stream::iter(matched.release_groups.iter().take(limit))
                    .map(|rg| self.lookup(artist, rg))
                    .buffered(self.max_concurrent_lookups)
                    .filter_map(|hit| async move { hit })
                    .collect()
                    .await
            }
            None => Vec::new(),
        };

        info!(
            results = results.len(),
            release_groups = matched.release_groups.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "cover search complete"
        );

        Ok(CoverSearchResponse {
            results,
            debug: request.debug.then(|| SearchDebug {
                routed: matched.routed,
                artist: matched.artist,
            }),
        })
    }

    async fn lookup(&self, artist: &MbArtist, rg: &MbReleaseGroup) -> Option<CoverHit> {
        let title = rg.title_or_untitled();

        let cover_url = match self.archive.front_image_url(&rg.id).await {
            Some(url) => {
                record_lookup("coverartarchive", true);
                Some(url)
            }
            None => {
                record_lookup("coverartarchive", false);
                match &self.itunes {
                    Some(itunes) => {
                        let url = itunes.artwork_url(&artist.name, &title).await;
                        record_lookup("itunes", url.is_some());
                        url
                    }
                    None => None,
                }
            }
        };

        let Some(cover_url) = cover_url else {
            debug!(release_group = %rg.id, "no cover, leaving out");
            return None;
        };

        Some(CoverHit {
            artist: artist.name.clone(),
            release_title: title,
            release_date: rg.first_release_date.clone().filter(|d| !d.is_empty()),
            cover_url,
        })
    }
}

fn record_lookup(source: &'static str, hit: bool) {
    let status = if hit { "hit" } else { "miss" };
    metrics::counter!(telemetry::COVER_LOOKUPS_TOTAL,
        "source" => source,
        "status" => status,
    )
    .increment(1);
}
