//! Aggregate HSV statistics and class thresholds.

use crate::types::{BrightnessClass, ColorStats, HueFamily, SaturationClass};

use super::hsv::{rgb_to_hsv, weighted_circular_mean_degrees};

/// Mean value below this is dark.
pub const DARK_VALUE_MAX: f64 = 0.35;
/// Mean value above this is bright.
pub const BRIGHT_VALUE_MIN: f64 = 0.60;
/// Mean saturation below this is muted.
pub const MUTED_SATURATION_MAX: f64 = 0.25;
/// Mean saturation above this is vivid.
pub const VIVID_SATURATION_MIN: f64 = 0.50;

pub fn brightness_class(mean_value: f64) -> BrightnessClass {
    if mean_value < DARK_VALUE_MAX {
        BrightnessClass::Dark
    } else if mean_value > BRIGHT_VALUE_MIN {
        BrightnessClass::Bright
    } else {
        BrightnessClass::Medium
    }
}

pub fn saturation_class(mean_saturation: f64) -> SaturationClass {
    if mean_saturation < MUTED_SATURATION_MAX {
        SaturationClass::Muted
    } else if mean_saturation > VIVID_SATURATION_MIN {
        SaturationClass::Vivid
    } else {
        SaturationClass::Moderate
    }
}

pub fn hue_family(mean_hue: f64) -> HueFamily {
    if !(54.0..=306.0).contains(&mean_hue) {
        HueFamily::Warm
    } else if mean_hue > 162.0 && mean_hue < 270.0 {
        HueFamily::Cool
    } else {
        HueFamily::Neutral
    }
}

/// Compute mean hue (circular), saturation and value over the samples.
///
/// Each hue is weighted by its pixel's saturation, so greys and blacks do not
/// drag the mean toward 0°. A sample set without chroma has a neutral hue family.
pub fn color_stats(samples: &[[u8; 3]]) -> ColorStats {
    let hsv: Vec<_> = samples.iter().map(|px| rgb_to_hsv(*px)).collect();
    let n = hsv.len().max(1) as f64;

    let chromatic_hue = weighted_circular_mean_degrees(hsv.iter().map(|c| (c.hue, c.saturation)));
    let mean_hue = chromatic_hue.unwrap_or(0.0);
    let mean_saturation = hsv.iter().map(|c| c.saturation).sum::<f64>() / n;
    let mean_value = hsv.iter().map(|c| c.value).sum::<f64>() / n;

    ColorStats {
        mean_hue,
        mean_saturation,
        mean_value,
        brightness_class: brightness_class(mean_value),
        saturation_class: saturation_class(mean_saturation),
        hue_family: chromatic_hue.map_or(HueFamily::Neutral, hue_family),
    }
}
