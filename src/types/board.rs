//! Vibe board output types

use serde::{Deserialize, Serialize};

use super::candidate::CandidateItem;
use super::color::{ColorStats, Palette};
use super::mood::MoodLabel;

/// Label of the reserved group holding items without usable cover art.
pub const NO_COVER_LABEL: &str = "no cover art found";

/// Caption given to items without usable cover art.
pub const NO_COVER_CAPTION: &str = "no cover art found";

/// Which level of the cover-art cascade a URL belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CascadeLevel {
    ReleaseGroup,
    Release(String),
}

/// Result of a single URL attempt in the cascade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "detail")]
pub enum AttemptOutcome {
    Success,
    /// Non-2xx HTTP status.
    Status(u16),
    Timeout,
    /// Connection or other transport failure.
    Transport(String),
    EmptyBody,
    /// Bytes fetched but not a decodable image.
    Undecodable(String),
}

impl AttemptOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, AttemptOutcome::Success)
    }

    /// Short label used for metrics.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Status(_) => "status",
            Self::Timeout => "timeout",
            Self::Transport(_) => "transport",
            Self::EmptyBody => "empty_body",
            Self::Undecodable(_) => "undecodable",
        }
    }
}

/// One URL tried while looking for a cover.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchAttempt {
    pub url: String,
    pub level: CascadeLevel,
    pub outcome: AttemptOutcome,
    /// Where a successful attempt ended up after redirects.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolved_url: Option<String>,
}

impl FetchAttempt {
    pub fn new(url: impl Into<String>, level: CascadeLevel, outcome: AttemptOutcome) -> Self {
        Self {
            url: url.into(),
            level,
            outcome,
            resolved_url: None,
        }
    }
}

/// Per-item diagnostics, only present when a board is built in debug mode.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemDiagnostics {
    pub attempts: Vec<FetchAttempt>,
    /// Same as the item's `cover_url`: the resolved URL of the winning attempt.
    pub chosen_url: Option<String>,
}

/// Palette, statistics and mood of a successfully fetched cover.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoverAnalysis {
    pub mood: MoodLabel,
    pub palette: Palette,
    pub stats: ColorStats,
}

/// A candidate after the fetch/analyze/classify pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzedItem {
    #[serde(flatten)]
    pub candidate: CandidateItem,
    /// URL that yielded the cover, `None` when every candidate failed.
    pub cover_url: Option<String>,
    pub palette_hex: Vec<String>,
    pub mini_caption: String,
    #[serde(flatten)]
    pub analysis: Option<CoverAnalysis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debug: Option<ItemDiagnostics>,
}

impl AnalyzedItem {
    pub fn id(&self) -> &str {
        &self.candidate.id
    }

    pub fn mood(&self) -> Option<MoodLabel> {
        self.analysis.as_ref().map(|a| a.mood)
    }

    pub fn has_cover(&self) -> bool {
        self.analysis.is_some()
    }
}

/// Items sharing one mood label (or the reserved no-cover group).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VibeGroup {
    pub label: String,
    pub summary: String,
    pub items: Vec<AnalyzedItem>,
}

impl VibeGroup {
    pub fn is_no_cover(&self) -> bool {
        self.label == NO_COVER_LABEL
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// The grouped, labeled result of one board build.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VibeBoard {
    pub query: String,
    pub groups: Vec<VibeGroup>,
}

impl VibeBoard {
    pub fn group(&self, label: &str) -> Option<&VibeGroup> {
        self.groups.iter().find(|g| g.label == label)
    }

    pub fn item_count(&self) -> usize {
        self.groups.iter().map(|g| g.items.len()).sum()
    }

    /// Groups holding analyzed covers, excluding the no-cover group.
    pub fn analyzed_groups(&self) -> impl Iterator<Item = &VibeGroup> {
        self.groups.iter().filter(|g| !g.is_no_cover())
    }
}
