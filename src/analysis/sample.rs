//! Uniform pixel sampling under a fixed budget.

use image::RgbImage;
use image::imageops::{self, FilterType};

/// Default upper bound on sampled pixels per cover.
pub const DEFAULT_SAMPLE_BUDGET: usize = 10_000;

/// Dimensions that fit `width * height` within `budget`, preserving aspect ratio.
///
/// Returns the input dimensions unchanged when they already fit.
pub fn sample_dimensions(width: u32, height: u32, budget: usize) -> (u32, u32) {
    let total = u64::from(width) * u64::from(height);
    let budget = budget.max(1) as u64;
    if total <= budget {
        return (width, height);
    }

    let scale = (budget as f64 / total as f64).sqrt();
    let mut w = ((f64::from(width) * scale + 1e-6).floor() as u32).clamp(1, width);
    let mut h = ((f64::from(height) * scale + 1e-6).floor() as u32).clamp(1, height);

    // Very thin images can still overshoot after clamping to one pixel.
    while u64::from(w) * u64::from(h) > budget {
        if w >= h && w > 1 {
            w -= 1;
        } else if h > 1 {
            h -= 1;
        } else {
            break;
        }
    }
    (w, h)
}

/// Sample pixels uniformly across the whole image.
///
/// Nearest-neighbour scaling keeps every sampled color identical to a source
/// pixel, so flat artwork keeps its exact palette.
pub fn sample_pixels(image: &RgbImage, budget: usize) -> Vec<[u8; 3]> {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return Vec::new();
    }

    let (w, h) = sample_dimensions(width, height, budget);
    if (w, h) == (width, height) {
        return image.pixels().map(|p| p.0).collect();
    }

    let scaled = imageops::resize(image, w, h, FilterType::Nearest);
    scaled.pixels().map(|p| p.0).collect()
}
