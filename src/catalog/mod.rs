//! Catalog lookup: turning a free-form query into candidate release groups.

pub mod musicbrainz;
pub mod router;

use async_trait::async_trait;

use crate::Result;
use crate::types::CandidateItem;

pub use musicbrainz::{
    CatalogMatch, MbArtist, MbReleaseGroup, MusicBrainzCatalog, MusicBrainzClient, escape_lucene,
};
pub use router::{KNOWN_GENRES, QueryRoute, route};

/// Source of candidate release groups.
///
/// Finding nothing is `Ok(vec![])`; only transport-level failures are errors
/// (`CatalogLookupFailed`).
#[async_trait]
pub trait Catalog: Send + Sync {
    /// Catalog name for logging/debugging.
    fn name(&self) -> &str;

    /// Up to `limit` candidates for the query, in relevance order.
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<CandidateItem>>;
}
