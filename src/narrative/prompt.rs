//! Prompt construction for narrative requests.
//!
//! The board is reduced to a compact JSON digest: labels, summaries, counts,
//! a few titles and dominant hex codes per group. Raw pixel data and full
//! palettes never reach the backend.

use std::fmt;

use serde::Serialize;

use crate::Result;
use crate::types::VibeBoard;

/// System instructions shared by both backends.
pub const SYSTEM_PROMPT: &str = "You are a concise, evocative curator of album-art mood boards. \
Given clustered groups with color palettes and short captions, write a single paragraph \
(80-140 words) that captures the overall vibe. Mention contrasts between groups when relevant. \
Avoid track lists; focus on atmosphere, palette, and era feelings.";

/// Upper bound on the serialized board digest, in characters.
pub const MAX_DIGEST_CHARS: usize = 6_000;

const MAX_TITLES_PER_GROUP: usize = 3;
const MAX_HEXES_PER_GROUP: usize = 5;
const MAX_QUERY_CHARS: usize = 200;
const MAX_STYLE_CHARS: usize = 120;

/// Tone requested for the narrative.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum NarrativeStyle {
    Poetic,
    Plain,
    #[default]
    Neutral,
    /// Free-text style hint, passed through (length-capped).
    Custom(String),
}

impl NarrativeStyle {
    /// Parse a style hint. Blank input means neutral.
    pub fn parse(hint: &str) -> Self {
        let hint = hint.trim();
        match hint.to_ascii_lowercase().as_str() {
            "" | "neutral" => NarrativeStyle::Neutral,
            "poetic" => NarrativeStyle::Poetic,
            "plain" => NarrativeStyle::Plain,
            _ => NarrativeStyle::Custom(truncate_chars(hint, MAX_STYLE_CHARS).to_string()),
        }
    }

    /// Instruction line placed at the top of the user prompt.
    pub fn instruction(&self) -> String {
        match self {
            NarrativeStyle::Poetic => "Write in a poetic, image-rich style.".to_string(),
            NarrativeStyle::Plain => "Write in a plain, direct style.".to_string(),
            NarrativeStyle::Neutral => "Write in a neutral, evocative style.".to_string(),
            NarrativeStyle::Custom(hint) => format!("Write in a {hint} style."),
        }
    }
}

impl fmt::Display for NarrativeStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NarrativeStyle::Poetic => write!(f, "poetic"),
            NarrativeStyle::Plain => write!(f, "plain"),
            NarrativeStyle::Neutral => write!(f, "neutral"),
            NarrativeStyle::Custom(hint) => write!(f, "{hint}"),
        }
    }
}

impl From<&str> for NarrativeStyle {
    fn from(hint: &str) -> Self {
        Self::parse(hint)
    }
}

#[derive(Debug, Serialize)]
struct BoardDigest<'a> {
    query: &'a str,
    groups: Vec<GroupDigest<'a>>,
    truncated: bool,
}

#[derive(Debug, Serialize)]
struct GroupDigest<'a> {
    label: &'a str,
    summary: &'a str,
    count: usize,
    titles: Vec<&'a str>,
    dominant_hexes: Vec<&'a str>,
}

impl<'a> GroupDigest<'a> {
    fn new(group: &'a crate::types::VibeGroup) -> Self {
        let mut hexes: Vec<&str> = Vec::new();
        for hex in group.items.iter().filter_map(|i| i.palette_hex.first()) {
            if hexes.len() == MAX_HEXES_PER_GROUP {
                break;
            }
            if !hexes.contains(&hex.as_str()) {
                hexes.push(hex);
            }
        }
        Self {
            label: &group.label,
            summary: &group.summary,
            count: group.items.len(),
            titles: group
                .items
                .iter()
                .take(MAX_TITLES_PER_GROUP)
                .map(|i| i.candidate.title.as_str())
                .collect(),
            dominant_hexes: hexes,
        }
    }
}

/// JSON digest of a board, at most `max_chars` characters.
///
/// Groups are dropped from the end until the digest fits; the digest is then
/// marked `truncated`.
pub fn board_digest(board: &VibeBoard, max_chars: usize) -> Result<String> {
    let mut digest = BoardDigest {
        query: truncate_chars(&board.query, MAX_QUERY_CHARS),
        groups: board.groups.iter().map(GroupDigest::new).collect(),
        truncated: false,
    };

    let mut json = serde_json::to_string(&digest)?;
    while json.chars().count() > max_chars && !digest.groups.is_empty() {
        digest.groups.pop();
        digest.truncated = true;
        json = serde_json::to_string(&digest)?;
    }
    Ok(json)
}

/// User message for a board: style line, bounded digest, output instructions.
pub fn user_prompt(board: &VibeBoard, style: &NarrativeStyle) -> Result<String> {
    let digest = board_digest(board, MAX_DIGEST_CHARS)?;
    Ok(format!(
        "{}\n\nInput JSON (vibe_board):\n{digest}\n\nReturn only the paragraph, no preamble, no markdown headers.",
        style.instruction()
    ))
}

/// Prefix of `text` holding at most `max` characters.
pub(crate) fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
