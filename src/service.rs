//! Request entry point: catalog lookup, board build, optional narrative.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use crate::board::{BuildOptions, VibePipeline};
use crate::catalog::Catalog;
use crate::narrative::{NarrativeBridge, NarrativeStyle};
use crate::types::VibeBoard;
use crate::{Result, VibeError};

/// Candidates considered when a request gives no limit.
pub const DEFAULT_LIMIT: usize = 8;

/// Upper bound on candidates per request.
pub const MAX_LIMIT: usize = 50;

/// A board request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardRequest {
    pub query: String,
    #[serde(default)]
    pub limit: Option<usize>,
    #[serde(default)]
    pub debug: bool,
    /// Style hint; `Some` requests a narrative.
    #[serde(default)]
    pub narrative_style: Option<String>,
}

impl BoardRequest {
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

    pub fn narrate(mut self, style: impl Into<String>) -> Self {
        self.narrative_style = Some(style.into());
        self
    }

    /// Requested limit, defaulted and clamped to `1..=MAX_LIMIT`.
    pub fn effective_limit(&self) -> usize {
        self.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT)
    }
}

/// Narrative failure reported next to a board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NarrativeFailure {
    pub kind: String,
    pub message: String,
}

impl From<&VibeError> for NarrativeFailure {
    fn from(e: &VibeError) -> Self {
        Self {
            kind: e.kind().to_string(),
            message: e.to_string(),
        }
    }
}

/// A board plus the outcome of the narrative request, if one was made.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardResponse {
    #[serde(flatten)]
    pub board: VibeBoard,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub narrative: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub narrative_error: Option<NarrativeFailure>,
}

/// Ties the catalog, the board pipeline and the narrative bridge together.
#[derive(Clone)]
pub struct VibeService {
    catalog: Arc<dyn Catalog>,
    pipeline: VibePipeline,
    narrative: NarrativeBridge,
}

impl VibeService {
    pub fn new(catalog: Arc<dyn Catalog>, pipeline: VibePipeline, narrative: NarrativeBridge) -> Self {
        Self {
            catalog,
            pipeline,
            narrative,
        }
    }

    pub fn pipeline(&self) -> &VibePipeline {
        &self.pipeline
    }

    pub fn narrative(&self) -> &NarrativeBridge {
        &self.narrative
    }

    /// Run one request.
    ///
    /// Fails only on invalid input or a catalog failure. Once candidates are
    /// known the board is always returned; narrative failures are reported in
    /// `narrative_error`.
    #[instrument(skip(self, request), fields(query = %request.query, catalog = self.catalog.name()))]
    pub async fn run(&self, request: &BoardRequest) -> Result<BoardResponse> {
        let query = request.query.trim();
        if query.is_empty() {
            return Err(VibeError::InvalidInput("query must not be empty".to_string()));
        }
        let limit = request.effective_limit();

        let candidates = self.catalog.search(query, limit).await?;
        info!(candidates = candidates.len(), limit, "catalog lookup complete");

        let board = self
            .pipeline
            .build(query, &candidates, BuildOptions::new(limit).debug(request.debug))
            .await;

        let (narrative, narrative_error) = match &request.narrative_style {
            None => (None, None),
            Some(hint) => {
                let style = NarrativeStyle::parse(hint);
                match self.narrative.narrate(&board, &style).await {
                    Ok(text) => (Some(text), None),
                    Err(e) => {
                        warn!(error = %e, "board returned without narrative");
                        (None, Some(NarrativeFailure::from(&e)))
                    }
                }
            }
        };

        Ok(BoardResponse {
            board,
            narrative,
            narrative_error,
        })
    }
}
