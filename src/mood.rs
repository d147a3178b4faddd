//! Mood classification from color statistics.
//!
//! The mapping is an explicit table over every
//! (brightness class, saturation class) pair, so it is total by construction
//! and can be inspected or extended without touching control flow.

use crate::types::{BrightnessClass, ColorStats, MoodLabel, SaturationClass};

/// Label used if a key is ever missing from the table.
pub const FALLBACK_MOOD: MoodLabel = MoodLabel::BalancedNeutral;

/// Every (brightness, saturation) pair and its mood.
pub const MOOD_TABLE: [((BrightnessClass, SaturationClass), MoodLabel); 9] = [
    ((BrightnessClass::Dark, SaturationClass::Muted), MoodLabel::DarkMoody),
    ((BrightnessClass::Dark, SaturationClass::Moderate), MoodLabel::DarkMoody),
    ((BrightnessClass::Dark, SaturationClass::Vivid), MoodLabel::DarkIntense),
    ((BrightnessClass::Medium, SaturationClass::Muted), MoodLabel::MutedMelancholic),
    ((BrightnessClass::Medium, SaturationClass::Moderate), MoodLabel::BalancedNeutral),
    ((BrightnessClass::Medium, SaturationClass::Vivid), MoodLabel::VividPlayful),
    ((BrightnessClass::Bright, SaturationClass::Muted), MoodLabel::SoftDreamy),
    ((BrightnessClass::Bright, SaturationClass::Moderate), MoodLabel::BrightEnergetic),
    ((BrightnessClass::Bright, SaturationClass::Vivid), MoodLabel::BrightEnergetic),
];

/// Look up the mood for a pair of classes.
pub fn mood_for(brightness: BrightnessClass, saturation: SaturationClass) -> MoodLabel {
    MOOD_TABLE
        .iter()
        .find(|(key, _)| *key == (brightness, saturation))
        .map(|(_, mood)| *mood)
        .unwrap_or(FALLBACK_MOOD)
}

/// Classify a cover's statistics into a mood label.
pub fn classify(stats: &ColorStats) -> MoodLabel {
    mood_for(stats.brightness_class, stats.saturation_class)
}
