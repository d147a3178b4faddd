//! Vibe board assembly.
//!
//! [`VibePipeline`] runs the fetch → analyze → classify pass over a list of
//! candidates; [`assemble`] turns the resulting items into ordered groups.
//!
//! # Group ordering
//!
//! Groups are sorted by descending size. Equal sizes fall back to the fixed
//! [`MoodLabel::PRIORITY`] order, with the no-cover group ranked after every
//! mood. Ordering only looks at the collected items, never at the order in
//! which fetches completed.

pub mod caption;
mod pipeline;

pub use pipeline::{BuildOptions, DEFAULT_MAX_CONCURRENT_FETCHES, VibePipeline};

use crate::types::{AnalyzedItem, MoodLabel, NO_COVER_LABEL, VibeBoard, VibeGroup};
use caption::{GroupTraits, group_summary, no_cover_summary};

/// Grouping key: a mood, or the reserved no-cover bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GroupKey {
    Mood(MoodLabel),
    NoCover,
}

impl GroupKey {
    fn of(item: &AnalyzedItem) -> Self {
        item.mood().map_or(GroupKey::NoCover, GroupKey::Mood)
    }

    fn rank(&self) -> usize {
        match self {
            GroupKey::Mood(mood) => mood.priority(),
            GroupKey::NoCover => MoodLabel::PRIORITY.len(),
        }
    }
}

/// Group items by mood and order the groups.
///
/// Items keep their relative input order inside each group. Every item lands
/// in exactly one group.
pub fn assemble(query: impl Into<String>, items: Vec<AnalyzedItem>) -> VibeBoard {
    let mut buckets: Vec<(GroupKey, Vec<AnalyzedItem>)> = Vec::new();
    for item in items {
        let key = GroupKey::of(&item);
        match buckets.iter_mut().find(|(k, _)| *k == key) {
            Some((_, members)) => members.push(item),
            None => buckets.push((key, vec![item])),
        }
    }

    buckets.sort_by(|(ka, a), (kb, b)| b.len().cmp(&a.len()).then(ka.rank().cmp(&kb.rank())));

    let groups = buckets
        .into_iter()
        .map(|(key, members)| match key {
            GroupKey::Mood(mood) => {
                let traits = GroupTraits::dominant(
                    members
                        .iter()
                        .filter_map(|i| i.analysis.as_ref().map(|a| &a.stats)),
                );
                VibeGroup {
                    label: mood.to_string(),
                    summary: group_summary(mood, members.len(), traits),
                    items: members,
                }
            }
            GroupKey::NoCover => VibeGroup {
                label: NO_COVER_LABEL.to_string(),
                summary: no_cover_summary(members.len()),
                items: members,
            },
        })
        .collect();

    VibeBoard {
        query: query.into(),
        groups,
    }
}
