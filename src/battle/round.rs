//! Structured round replies and the fence-stripping recovery transform
//!
//! The narration service answers in free text. The only transformation
//! applied before parsing is removing a single markdown fence line from the
//! top and bottom; a fenced and an unfenced reply carrying the same payload
//! must parse identically.

use serde::{Deserialize, Deserializer, Serialize};

/// The structured payload expected once per round.
///
/// `damage_1` is dealt BY Player1 TO Player2, and vice versa - the engine
/// applies each to the receiver, never the mover. Numeric fields tolerate
/// being encoded as JSON strings; models do that routinely.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RoundReply {
    #[serde(deserialize_with = "flexible_u32")]
    pub effectiveness_1: u32,
    #[serde(deserialize_with = "flexible_u32")]
    pub damage_1: u32,
    pub narrative_1: String,
    #[serde(deserialize_with = "flexible_u32")]
    pub effectiveness_2: u32,
    #[serde(deserialize_with = "flexible_u32")]
    pub damage_2: u32,
    pub narrative_2: String,
    /// Carry-over effects for the next round; replaces the rolling summary verbatim
    pub summary: String,
}

/// Accept either a JSON number or the same number wrapped in a string
fn flexible_u32<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Num(u32),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Num(n) => Ok(n),
        Raw::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

/// Strip one leading and one trailing markdown fence line, if present.
///
/// Handles replies that wrap the JSON payload between a fence line on top
/// (with or without a language tag) and one on the bottom. Lines are removed
/// only from the outermost edges; interior content is left untouched.
pub fn strip_code_fences(reply: &str) -> String {
    let mut lines: Vec<&str> = reply.trim().lines().collect();

    if lines.first().is_some_and(|l| l.trim_start().starts_with("```")) {
        lines.remove(0);
    }
    if lines.last().is_some_and(|l| l.trim_start().starts_with("```")) {
        lines.pop();
    }

    lines.join("\n")
}

/// One parse attempt over a raw reply: fence-strip, then deserialize.
pub fn parse_round_reply(raw: &str) -> serde_json::Result<RoundReply> {
    serde_json::from_str(&strip_code_fences(raw))
}
