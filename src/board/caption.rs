//! Item captions and group summaries.

use std::collections::HashMap;
use std::hash::Hash;

use crate::analysis::color_name;
use crate::types::{BrightnessClass, ColorStats, HueFamily, MoodLabel, Palette, SaturationClass};

/// Caption for one cover, e.g. "deep indigo tones, dark & moody".
pub fn item_caption(palette: &Palette, mood: MoodLabel) -> String {
    match palette.dominant() {
        Some(entry) => format!("{} tones, {}", color_name(entry.rgb), mood),
        None => mood.to_string(),
    }
}

/// Most frequent value; ties go to the smallest value in `Ord` order.
fn most_common<T: Copy + Eq + Hash + Ord>(values: impl IntoIterator<Item = T>) -> Option<T> {
    let mut counts: HashMap<T, usize> = HashMap::new();
    for v in values {
        *counts.entry(v).or_insert(0) += 1;
    }
    counts
        .into_iter()
        .max_by(|(va, ca), (vb, cb)| ca.cmp(cb).then_with(|| vb.cmp(va)))
        .map(|(v, _)| v)
}

/// Shared traits of a group's members.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupTraits {
    pub brightness: BrightnessClass,
    pub saturation: SaturationClass,
    pub hue_family: HueFamily,
}

impl GroupTraits {
    /// Most common classes among `stats`, or `None` for an empty slice.
    pub fn dominant<'a>(stats: impl IntoIterator<Item = &'a ColorStats> + Clone) -> Option<Self> {
        Some(Self {
            brightness: most_common(stats.clone().into_iter().map(|s| s.brightness_class))?,
            saturation: most_common(stats.clone().into_iter().map(|s| s.saturation_class))?,
            hue_family: most_common(stats.into_iter().map(|s| s.hue_family))?,
        })
    }
}

/// Summary for a mood group.
pub fn group_summary(mood: MoodLabel, count: usize, traits: Option<GroupTraits>) -> String {
    let Some(traits) = traits else {
        return format!("No covers with a {mood} vibe.");
    };
    if count == 1 {
        format!(
            "1 cover with a {mood} vibe: a {}, {} palette leaning toward {}.",
            traits.brightness.as_str(),
            traits.saturation.as_str(),
            traits.hue_family.tone_phrase()
        )
    } else {
        format!(
            "{count} covers with a {mood} vibe: mostly {}, {} palettes leaning toward {}.",
            traits.brightness.as_str(),
            traits.saturation.as_str(),
            traits.hue_family.tone_phrase()
        )
    }
}

/// Summary for the no-cover group.
pub fn no_cover_summary(count: usize) -> String {
    if count == 1 {
        "1 release group without retrievable cover art.".to_string()
    } else {
        format!("{count} release groups without retrievable cover art.")
    }
}
