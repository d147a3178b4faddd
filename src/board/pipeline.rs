//! Fetch → analyze → classify over a candidate list.

use std::sync::Arc;
use std::time::Instant;

use futures_util::stream::{self, StreamExt};
use tracing::{debug, info, instrument};

use super::assemble;
use super::caption::item_caption;
use crate::analysis::ColorAnalyzer;
use crate::cover::CoverSource;
use crate::mood::classify;
use crate::telemetry;
use crate::types::{AnalyzedItem, CandidateItem, CoverAnalysis, NO_COVER_CAPTION, VibeBoard};

/// Default bound on simultaneous cover fetches.
pub const DEFAULT_MAX_CONCURRENT_FETCHES: usize = 6;

/// Per-build options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildOptions {
    /// Maximum number of candidates processed, taken from the front.
    pub limit: usize,
    /// Attach fetch attempts and the chosen URL to each item.
    pub debug: bool,
}

impl BuildOptions {
    pub fn new(limit: usize) -> Self {
        Self {
            limit,
            debug: false,
        }
    }

    pub fn debug(mut self, enabled: bool) -> Self {
        self.debug = enabled;
        self
    }
}

/// Builds vibe boards from candidate release groups.
///
/// Holds no per-build state; one pipeline can serve concurrent builds.
/// Dropping a build future stops it from starting further fetches.
///
/// # Example
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use vibeboard::{CandidateItem, CoverArtFetcher, VibePipeline};
///
/// # async fn demo() -> vibeboard::Result<()> {
/// let pipeline = VibePipeline::new(Arc::new(CoverArtFetcher::new()?));
/// let candidates = vec![CandidateItem::release_group("b1392450-e666-3926-a536-22c65f834433", "OK Computer")];
/// let board = pipeline.build_board("radiohead", &candidates, 8).await;
/// println!("{}", serde_json::to_string_pretty(&board)?);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct VibePipeline {
    covers: Arc<dyn CoverSource>,
    analyzer: ColorAnalyzer,
    max_concurrent_fetches: usize,
}

impl VibePipeline {
    pub fn new(covers: Arc<dyn CoverSource>) -> Self {
        Self {
            covers,
            analyzer: ColorAnalyzer::default(),
            max_concurrent_fetches: DEFAULT_MAX_CONCURRENT_FETCHES,
        }
    }

    /// Set the palette analyzer.
    pub fn analyzer(mut self, analyzer: ColorAnalyzer) -> Self {
        self.analyzer = analyzer;
        self
    }

    /// Set the bound on simultaneous cover fetches (minimum 1).
    pub fn max_concurrent_fetches(mut self, n: usize) -> Self {
        self.max_concurrent_fetches = n.max(1);
        self
    }

    /// Build a board from the first `limit` candidates.
    pub async fn build_board(
        &self,
        query: &str,
        candidates: &[CandidateItem],
        limit: usize,
    ) -> VibeBoard {
        self.build(query, candidates, BuildOptions::new(limit))
            .await
    }

    /// Build a board with explicit options.
    ///
    /// Per-candidate failures never abort the build: candidates without a
    /// usable cover go to the no-cover group.
    #[instrument(skip(self, candidates), fields(candidates = candidates.len(), limit = options.limit))]
    pub async fn build(
        &self,
        query: &str,
        candidates: &[CandidateItem],
        options: BuildOptions,
    ) -> VibeBoard {
        let start = Instant::now();

        // `buffered` yields results in input order; grouping happens after
        // everything is collected.
        let items: Vec<AnalyzedItem> = stream::iter(candidates.iter().take(options.limit))
            .map(|candidate| self.process(candidate, options.debug))
            .buffered(self.max_concurrent_fetches)
            .collect()
            .await;

        let board = assemble(query, items);

        metrics::histogram!(telemetry::BOARD_BUILD_DURATION_SECONDS)
            .record(start.elapsed().as_secs_f64());
        info!(
            groups = board.groups.len(),
            items = board.item_count(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "vibe board built"
        );
        board
    }

    async fn process(&self, candidate: &CandidateItem, debug: bool) -> AnalyzedItem {
        let outcome = self.covers.fetch_cover(&candidate.id).await;
        let diagnostics = debug.then(|| outcome.diagnostics());

        let (image, _) = outcome.into_result(&candidate.id);
        let image = match image {
            Ok(image) => image,
            Err(e) => {
                debug!(id = %candidate.id, error = %e, "candidate has no usable cover");
                return AnalyzedItem {
                    candidate: candidate.clone(),
                    cover_url: None,
                    palette_hex: Vec::new(),
                    mini_caption: NO_COVER_CAPTION.to_string(),
                    analysis: None,
                    debug: diagnostics,
                };
            }
        };

        let (palette, stats) = self.analyzer.analyze(&image.pixels);
        let mood = classify(&stats);
        debug!(id = %candidate.id, %mood, colors = palette.len(), "cover analyzed");

        AnalyzedItem {
            candidate: candidate.clone(),
            cover_url: Some(image.source_url),
            palette_hex: palette.hex_codes(),
            mini_caption: item_caption(&palette, mood),
            analysis: Some(CoverAnalysis {
                mood,
                palette,
                stats,
            }),
            debug: diagnostics,
        }
    }
}
