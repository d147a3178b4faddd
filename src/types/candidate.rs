//! Catalog candidates

use serde::{Deserialize, Serialize};

/// Base URL for release-group pages on MusicBrainz.
pub const RELEASE_GROUP_PAGE_BASE: &str = "https://musicbrainz.org/release-group";

/// A release group returned by the catalog lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateItem {
    /// Release-group MBID.
    pub id: String,
    pub title: String,
    /// Metadata page for the release group.
    pub url: String,
}

impl CandidateItem {
    pub fn new(id: impl Into<String>, title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            url: url.into(),
        }
    }

    /// Build a candidate whose URL points at the MusicBrainz release-group page.
    pub fn release_group(id: impl Into<String>, title: impl Into<String>) -> Self {
        let id = id.into();
        let url = format!("{RELEASE_GROUP_PAGE_BASE}/{id}");
        Self {
            id,
            title: title.into(),
            url,
        }
    }
}
