//! vibeboard - cover-art mood boards for music release groups
//!
//! Given a free-form query ("moody jazz", "albums by Portishead"), vibeboard
//! looks up release groups in MusicBrainz, downloads their cover art from the
//! Cover Art Archive, extracts a dominant-color palette from each cover, and
//! groups the release groups into labeled mood clusters. A narrative
//! paragraph describing the board can optionally be requested from an
//! OpenAI-compatible or Ollama backend.
//!
//! [`CoverSearch`] answers the simpler question of where an artist's covers
//! live: it returns cover art URLs with release titles and dates, without
//! downloading anything.
//!
//! # Board Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use vibeboard::{BoardRequest, CoverArtFetcher, MusicBrainzCatalog, MusicBrainzClient,
//!     NarrativeBridge, VibePipeline, VibeService};
//!
//! #[tokio::main]
//! async fn main() -> vibeboard::Result<()> {
//!     let musicbrainz = MusicBrainzClient::new()?;
//!     let fetcher = CoverArtFetcher::new()?.release_fallback(musicbrainz.clone());
//!     let service = VibeService::new(
//!         Arc::new(MusicBrainzCatalog::new(musicbrainz)),
//!         VibePipeline::new(Arc::new(fetcher)),
//!         NarrativeBridge::unconfigured(),
//!     );
//!
//!     let response = service.run(&BoardRequest::new("albums by Portishead").limit(6)).await?;
//!     for group in &response.board.groups {
//!         println!("{} ({}): {}", group.label, group.len(), group.summary);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Narrative Example
//!
//! ```rust,ignore
//! use vibeboard::{NarrativeBridge, NarrativeConfig, NarrativeStyle, OllamaSettings};
//!
//! let config = NarrativeConfig::resolve(None, Some(OllamaSettings {
//!     host: "http://localhost:11434".into(),
//!     model: "llama3.2".into(),
//! }))?;
//! let bridge = NarrativeBridge::from_config(&config)?;
//! let text = bridge.narrate(&board, &NarrativeStyle::Poetic).await?;
//! ```

pub mod analysis;
pub mod board;
pub mod catalog;
#[cfg(feature = "cli")]
pub mod config;
pub mod cover;
pub mod error;
pub mod mood;
pub mod narrative;
pub mod search;
pub mod service;
pub mod telemetry;
pub mod types;

/// Package version from Cargo.toml.
pub const PKG_VERSION: &str = env!("CARGO_PKG_VERSION");

/// User agent sent to MusicBrainz, the Cover Art Archive and narrative backends.
///
/// MusicBrainz asks clients to identify themselves with a name and version.
pub const USER_AGENT: &str = concat!("vibeboard/", env!("CARGO_PKG_VERSION"));

// Re-export main types at crate root
pub use error::{Result, VibeError};

pub use analysis::ColorAnalyzer;
pub use board::{BuildOptions, VibePipeline, assemble};
pub use catalog::{
    Catalog, CatalogMatch, MusicBrainzCatalog, MusicBrainzClient, QueryRoute, route,
};
pub use cover::{CoverArtFetcher, CoverOutcome, CoverSource, FetchedImage, ItunesClient};
pub use mood::classify;
pub use narrative::{
    NarrativeBackend, NarrativeBackendConfig, NarrativeBridge, NarrativeConfig, NarrativeStyle,
    OllamaBackend, OllamaSettings, OpenAiBackend, OpenAiSettings,
};
pub use search::{CoverHit, CoverSearch, CoverSearchRequest, CoverSearchResponse, SearchDebug};
pub use service::{BoardRequest, BoardResponse, NarrativeFailure, VibeService};

// Re-export all types
pub use types::{
    AnalyzedItem, AttemptOutcome, BrightnessClass, CandidateItem, CascadeLevel, ColorStats,
    CoverAnalysis, FetchAttempt, HueFamily, ItemDiagnostics, MoodLabel, NO_COVER_CAPTION,
    NO_COVER_LABEL, Palette, PaletteEntry, SaturationClass, VibeBoard, VibeGroup,
};
