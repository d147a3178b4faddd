//! HSV conversion, circular hue averaging and color naming.

/// HSV triple: hue in degrees `[0, 360)`, saturation and value in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsv {
    pub hue: f64,
    pub saturation: f64,
    pub value: f64,
}

/// Convert an 8-bit RGB triple to HSV.
///
/// Achromatic colors report a hue of 0°.
pub fn rgb_to_hsv(rgb: [u8; 3]) -> Hsv {
    let r = f64::from(rgb[0]) / 255.0;
    let g = f64::from(rgb[1]) / 255.0;
    let b = f64::from(rgb[2]) / 255.0;

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let chroma = max - min;

    let value = max;
    let saturation = if max > 0.0 { chroma / max } else { 0.0 };

    let hue = if chroma == 0.0 {
        0.0
    } else if max == r {
        60.0 * ((g - b) / chroma).rem_euclid(6.0)
    } else if max == g {
        60.0 * ((b - r) / chroma + 2.0)
    } else {
        60.0 * ((r - g) / chroma + 4.0)
    };

    Hsv {
        hue: normalize_degrees(hue),
        saturation,
        value,
    }
}

/// Mean of angles in degrees via unit-vector averaging.
///
/// Returns 0° for an empty input or when the vectors cancel out.
pub fn circular_mean_degrees<I>(angles: I) -> f64
where
    I: IntoIterator<Item = f64>,
{
    weighted_circular_mean_degrees(angles.into_iter().map(|angle| (angle, 1.0))).unwrap_or(0.0)
}

/// Mean of `(angle, weight)` pairs, each angle a unit vector scaled by its weight.
///
/// `None` when the total weight is zero or the vectors cancel out.
pub fn weighted_circular_mean_degrees<I>(angles: I) -> Option<f64>
where
    I: IntoIterator<Item = (f64, f64)>,
{
    let (mut sin_sum, mut cos_sum, mut total) = (0.0f64, 0.0f64, 0.0f64);
    for (angle, weight) in angles {
        let rad = angle.to_radians();
        sin_sum += weight * rad.sin();
        cos_sum += weight * rad.cos();
        total += weight;
    }
    if total <= 0.0 {
        return None;
    }
    let (sin_mean, cos_mean) = (sin_sum / total, cos_sum / total);
    if sin_mean.hypot(cos_mean) < 1e-9 {
        return None;
    }
    Some(normalize_degrees(sin_mean.atan2(cos_mean).to_degrees()))
}

/// Wrap an angle into `[0, 360)`, snapping float noise just below 360 to 0.
fn normalize_degrees(deg: f64) -> f64 {
    let wrapped = deg.rem_euclid(360.0);
    if (360.0 - wrapped) < 1e-9 { 0.0 } else { wrapped }
}

/// Hue names by upper bound in degrees.
const HUE_NAMES: &[(f64, &str)] = &[
    (15.0, "red"),
    (45.0, "orange"),
    (70.0, "yellow"),
    (165.0, "green"),
    (195.0, "teal"),
    (240.0, "blue"),
    (275.0, "indigo"),
    (320.0, "violet"),
    (345.0, "magenta"),
    (360.0, "red"),
];

/// Plain-language name for a color, e.g. "deep indigo" or "pale yellow".
pub fn color_name(rgb: [u8; 3]) -> String {
    let hsv = rgb_to_hsv(rgb);

    if hsv.value < 0.12 {
        return "black".to_string();
    }
    if hsv.saturation < 0.15 {
        let name = match hsv.value {
            v if v < 0.3 => "charcoal",
            v if v < 0.75 => "grey",
            _ => "white",
        };
        return name.to_string();
    }

    let hue_name = HUE_NAMES
        .iter()
        .find(|(upper, _)| hsv.hue < *upper)
        .map(|(_, name)| *name)
        .unwrap_or("red");

    if hsv.value < 0.4 {
        format!("deep {hue_name}")
    } else if hsv.value > 0.8 && hsv.saturation < 0.45 {
        format!("pale {hue_name}")
    } else {
        hue_name.to_string()
    }
}
