//! Cover image acquisition.
//!
//! Covers are found by walking an ordered list of candidate URLs
//! (release-group artwork, then artwork of individual releases) and keeping
//! the first one that downloads and decodes. Any failure along the way just
//! moves on to the next candidate; exhausting the list yields an absent image.
//!
//! Cover search only needs a URL, so it reads the archive's JSON index and
//! falls back to the iTunes Search API.

pub mod cascade;
pub mod fetcher;
pub mod itunes;

pub use cascade::{DEFAULT_ARCHIVE_BASE_URL, release_candidates, release_group_candidates};
pub use fetcher::{
    CoverArtFetcher, CoverOutcome, CoverSource, DEFAULT_FETCH_TIMEOUT,
    DEFAULT_RELEASE_FALLBACK_LIMIT, FetchedImage,
};
pub use itunes::{DEFAULT_ITUNES_BASE_URL, DEFAULT_ITUNES_TIMEOUT, ItunesClient};
