//! Free-form query routing.
//!
//! Decides whether a prompt names an artist or a genre tag:
//!
//! - `"... by <artist>"` / `"... from <artist>"` forces artist mode
//! - a known genre plus "band"/"covers" forces tag mode
//! - a plain genre mention selects tag mode
//! - anything else is treated as an artist name

use serde::{Deserialize, Serialize};

/// Genres recognised in prompts, matched on word boundaries.
pub const KNOWN_GENRES: &[&str] = &[
    "metal",
    "death metal",
    "black metal",
    "thrash metal",
    "doom metal",
    "rock",
    "punk",
    "hip hop",
    "jazz",
    "electronic",
    "classical",
    "pop",
];

/// How a query should be looked up in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type", content = "value")]
pub enum QueryRoute {
    /// Look up an artist by name.
    Artist(String),
    /// Artist named explicitly with "by"/"from".
    ForcedArtist(String),
    /// Look up artists by genre tag.
    Tag(String),
    /// Genre named together with "band"/"covers".
    ForcedTag(String),
}

impl QueryRoute {
    pub fn value(&self) -> &str {
        match self {
            Self::Artist(v) | Self::ForcedArtist(v) | Self::Tag(v) | Self::ForcedTag(v) => v,
        }
    }

    pub fn is_tag(&self) -> bool {
        matches!(self, Self::Tag(_) | Self::ForcedTag(_))
    }
}

fn is_artist_char(c: char) -> bool {
    c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, ' ' | '.' | '\'' | '-')
}

/// Split on anything that is not alphanumeric.
fn words(text: &str) -> Vec<&str> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect()
}

fn contains_phrase(haystack: &[&str], phrase: &str) -> bool {
    let needle = words(phrase);
    !needle.is_empty() && haystack.windows(needle.len()).any(|w| w == needle.as_slice())
}

/// "metal bands", "black metal band": a genre description, not an artist.
fn names_genre_bands(text: &str) -> bool {
    let tokens = words(text);
    tokens.iter().any(|w| *w == "band" || *w == "bands")
        && KNOWN_GENRES.iter().any(|g| contains_phrase(&tokens, g))
}

/// Find a trailing `by <artist>` / `from <artist>` clause.
fn explicit_artist(prompt: &str) -> Option<String> {
    let mut offset = 0;
    for token in prompt.split(' ') {
        offset += token.len() + 1;
        if token != "by" && token != "from" {
            continue;
        }
        let rest = prompt.get(offset..).unwrap_or("").trim();
        if names_genre_bands(rest) {
            continue;
        }
        if !rest.is_empty() && rest.chars().all(is_artist_char) {
            return Some(rest.to_string());
        }
    }
    None
}

/// Route a free-form prompt.
pub fn route(prompt: &str) -> QueryRoute {
    let lowered = prompt.trim().to_lowercase();

    if let Some(artist) = explicit_artist(&lowered) {
        return QueryRoute::ForcedArtist(artist);
    }

    let tokens = words(&lowered);
    let wants_covers = lowered.contains("band") || lowered.contains("covers");

    if wants_covers {
        if let Some(genre) = KNOWN_GENRES.iter().find(|g| contains_phrase(&tokens, g)) {
            return QueryRoute::ForcedTag(genre.to_string());
        }
    }

    if let Some(genre) = KNOWN_GENRES.iter().find(|g| contains_phrase(&tokens, g)) {
        return QueryRoute::Tag(genre.to_string());
    }

    QueryRoute::Artist(prompt.to_string())
}
