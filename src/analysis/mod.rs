//! Color analysis of decoded covers.
//!
//! [`ColorAnalyzer::analyze`] samples a bounded, uniform subset of pixels,
//! clusters them into a ranked [`Palette`] and computes [`ColorStats`] over the
//! same samples.
//!
//! ```rust
//! use image::{Rgb, RgbImage};
//! use vibeboard::analysis::ColorAnalyzer;
//!
//! let cover = RgbImage::from_pixel(32, 32, Rgb([20, 20, 60]));
//! let (palette, stats) = ColorAnalyzer::default().analyze(&cover);
//! assert_eq!(palette.len(), 1);
//! assert_eq!(stats.brightness_class.as_str(), "dark");
//! ```

pub mod hsv;
pub mod kmeans;
pub mod sample;
pub mod stats;

use std::collections::BTreeMap;

use image::RgbImage;

use crate::types::{ColorStats, Palette, PaletteEntry};

pub use hsv::{circular_mean_degrees, color_name, rgb_to_hsv, weighted_circular_mean_degrees};
pub use kmeans::{Cluster, KMeans};
pub use sample::DEFAULT_SAMPLE_BUDGET;
pub use stats::color_stats;

/// Palette extraction settings.
#[derive(Debug, Clone, Copy)]
pub struct ColorAnalyzer {
    /// Maximum number of pixels sampled per image.
    pub sample_budget: usize,
    pub kmeans: KMeans,
}

impl Default for ColorAnalyzer {
    fn default() -> Self {
        Self {
            sample_budget: DEFAULT_SAMPLE_BUDGET,
            kmeans: KMeans::default(),
        }
    }
}

impl ColorAnalyzer {
    /// Set the number of palette clusters.
    pub fn clusters(mut self, k: usize) -> Self {
        self.kmeans.k = k.max(1);
        self
    }

    /// Set the pixel sample budget.
    pub fn sample_budget(mut self, budget: usize) -> Self {
        self.sample_budget = budget.max(1);
        self
    }

    /// Extract the palette and HSV statistics of an image.
    pub fn analyze(&self, image: &RgbImage) -> (Palette, ColorStats) {
        let samples = sample::sample_pixels(image, self.sample_budget);
        let clusters = self.kmeans.cluster(&samples);
        (palette_from_clusters(&clusters), color_stats(&samples))
    }
}

/// Convert clusters into a palette. Clusters that round to the same hex color
/// are merged.
pub fn palette_from_clusters(clusters: &[Cluster]) -> Palette {
    let total: usize = clusters.iter().map(|c| c.count).sum();
    if total == 0 {
        return Palette::default();
    }

    let mut merged: BTreeMap<[u8; 3], usize> = BTreeMap::new();
    for cluster in clusters {
        *merged.entry(cluster.rgb()).or_insert(0) += cluster.count;
    }

    let entries = merged
        .into_iter()
        .map(|(rgb, count)| PaletteEntry::new(rgb, count as f64 / total as f64))
        .collect();
    Palette::from_entries(entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clusters_rounding_to_same_hex_are_merged() {
        let clusters = [
            Cluster {
                centroid: [10.2, 10.2, 10.2],
                count: 3,
            },
            Cluster {
                centroid: [9.8, 9.8, 9.8],
                count: 1,
            },
        ];
        let palette = palette_from_clusters(&clusters);
        assert_eq!(palette.len(), 1);
        assert_eq!(palette.hex_codes(), vec!["#0a0a0a"]);
        assert!((palette.total_weight() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn no_clusters_give_empty_palette() {
        assert!(palette_from_clusters(&[]).is_empty());
    }
}
