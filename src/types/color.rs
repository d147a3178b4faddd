//! Palette and color statistics types

use serde::{Deserialize, Serialize};

/// One dominant color of a cover.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaletteEntry {
    /// Lowercase `#rrggbb`.
    pub hex: String,
    /// Fraction of sampled pixels assigned to this color.
    pub weight: f64,
    pub rgb: [u8; 3],
}

impl PaletteEntry {
    pub fn new(rgb: [u8; 3], weight: f64) -> Self {
        Self {
            hex: rgb_to_hex(rgb),
            weight,
            rgb,
        }
    }
}

/// Format an RGB triple as `#rrggbb`.
pub fn rgb_to_hex(rgb: [u8; 3]) -> String {
    format!("#{:02x}{:02x}{:02x}", rgb[0], rgb[1], rgb[2])
}

/// Dominant colors sorted by descending weight, ties by ascending hex.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Palette(pub Vec<PaletteEntry>);

impl Palette {
    /// Build a palette from unsorted entries, applying the canonical ordering.
    pub fn from_entries(mut entries: Vec<PaletteEntry>) -> Self {
        entries.sort_by(|a, b| {
            b.weight
                .partial_cmp(&a.weight)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.hex.cmp(&b.hex))
        });
        Self(entries)
    }

    pub fn entries(&self) -> &[PaletteEntry] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The heaviest color, if any.
    pub fn dominant(&self) -> Option<&PaletteEntry> {
        self.0.first()
    }

    pub fn hex_codes(&self) -> Vec<String> {
        self.0.iter().map(|e| e.hex.clone()).collect()
    }

    pub fn total_weight(&self) -> f64 {
        self.0.iter().map(|e| e.weight).sum()
    }
}

/// Brightness bucket of a cover, from mean HSV value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BrightnessClass {
    Dark,
    Medium,
    Bright,
}

impl BrightnessClass {
    pub const ALL: [BrightnessClass; 3] = [Self::Dark, Self::Medium, Self::Bright];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Dark => "dark",
            Self::Medium => "medium",
            Self::Bright => "bright",
        }
    }
}

/// Saturation bucket of a cover, from mean HSV saturation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SaturationClass {
    Muted,
    Moderate,
    Vivid,
}

impl SaturationClass {
    pub const ALL: [SaturationClass; 3] = [Self::Muted, Self::Moderate, Self::Vivid];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Muted => "muted",
            Self::Moderate => "moderate",
            Self::Vivid => "vivid",
        }
    }
}

/// Coarse hue temperature of a cover.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HueFamily {
    Warm,
    Cool,
    Neutral,
}

impl HueFamily {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Warm => "warm",
            Self::Cool => "cool",
            Self::Neutral => "neutral",
        }
    }

    /// Phrase used in group summaries.
    pub fn tone_phrase(&self) -> &'static str {
        match self {
            Self::Warm => "reds and oranges",
            Self::Cool => "blues and greens",
            Self::Neutral => "balanced hues",
        }
    }
}

/// Aggregate HSV statistics over a cover's sampled pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorStats {
    /// Circular mean hue in degrees, `[0, 360)`.
    pub mean_hue: f64,
    pub mean_saturation: f64,
    pub mean_value: f64,
    pub brightness_class: BrightnessClass,
    pub saturation_class: SaturationClass,
    pub hue_family: HueFamily,
}
