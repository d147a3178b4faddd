//! Public types for the vibeboard API.

mod board;
mod candidate;
mod color;
mod mood;

pub use board::{
    AnalyzedItem, AttemptOutcome, CascadeLevel, CoverAnalysis, FetchAttempt, ItemDiagnostics,
    NO_COVER_CAPTION, NO_COVER_LABEL, VibeBoard, VibeGroup,
};
pub use candidate::{CandidateItem, RELEASE_GROUP_PAGE_BASE};
pub use color::{
    BrightnessClass, ColorStats, HueFamily, Palette, PaletteEntry, SaturationClass, rgb_to_hex,
};
pub use mood::MoodLabel;
