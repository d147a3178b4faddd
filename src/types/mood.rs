//! Mood labels

use serde::{Deserialize, Serialize};

/// Discrete vibe assigned to an analyzed cover.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoodLabel {
    #[serde(rename = "dark & moody")]
    DarkMoody,
    #[serde(rename = "dark & intense")]
    DarkIntense,
    #[serde(rename = "muted & melancholic")]
    MutedMelancholic,
    #[serde(rename = "soft & dreamy")]
    SoftDreamy,
    #[serde(rename = "bright & energetic")]
    BrightEnergetic,
    #[serde(rename = "vivid & playful")]
    VividPlayful,
    /// Neutral fallback for middling covers.
    #[serde(rename = "balanced & neutral")]
    BalancedNeutral,
}

impl MoodLabel {
    /// Tie-break order for groups of equal size (earlier wins).
    pub const PRIORITY: [MoodLabel; 7] = [
        Self::DarkMoody,
        Self::DarkIntense,
        Self::MutedMelancholic,
        Self::SoftDreamy,
        Self::BrightEnergetic,
        Self::VividPlayful,
        Self::BalancedNeutral,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DarkMoody => "dark & moody",
            Self::DarkIntense => "dark & intense",
            Self::MutedMelancholic => "muted & melancholic",
            Self::SoftDreamy => "soft & dreamy",
            Self::BrightEnergetic => "bright & energetic",
            Self::VividPlayful => "vivid & playful",
            Self::BalancedNeutral => "balanced & neutral",
        }
    }

    /// Position in [`MoodLabel::PRIORITY`].
    pub fn priority(&self) -> usize {
        Self::PRIORITY
            .iter()
            .position(|m| m == self)
            .unwrap_or(Self::PRIORITY.len())
    }
}

impl std::fmt::Display for MoodLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
