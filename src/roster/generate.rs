//! Topic-driven roster generation
//!
//! One exchange with the text-generation service turns a free-form topic
//! ("rappers in 2025") into the structured roster document. The reply may
//! bury the JSON in prose or fences; extraction takes the outermost object.

use crate::core::config::{ROSTER_DAMAGE_MAX, ROSTER_DAMAGE_MIN, ROSTER_HP_MAX, ROSTER_HP_MIN};
use crate::core::error::{ArenaError, Result};
use crate::llm::Narrator;
use crate::roster::RosterFile;

/// System prompt for the roster exchange
pub const ROSTER_SYSTEM_PROMPT: &str = "\
You are a game master preparing a themed battle simulation. Use what you \
know about the topic to pick two recognizable characters and stat them \
faithfully: strengths and weaknesses belong in the summary, and move names \
should fit each character. Respond with a single JSON document and nothing \
else.";

/// Build the topic query, quoting the stat bounds the roster must respect
pub fn roster_query(topic: &str) -> String {
    format!(
        r#"The topic is: "{topic}". Identify 2 characters to simulate interactions. Each character has an HP total ranging from {hp_min}-{hp_max}, 4 moves with damage ranging from {dmg_min}-{dmg_max}, and a character summary describing its strengths and weaknesses. Select a background that they would battle in. Format the response as JSON in the following format:
{{
    "Character_1": {{
        "Name": "",
        "HP": 0,
        "Character_Summary": "",
        "Moves": {{
            "Move_1": {{"Move_name": "", "Description": "", "Damage": 0}},
            "Move_2": {{"Move_name": "", "Description": "", "Damage": 0}},
            "Move_3": {{"Move_name": "", "Description": "", "Damage": 0}},
            "Move_4": {{"Move_name": "", "Description": "", "Damage": 0}}
        }}
    }},
    "Character_2": {{
        "Name": "",
        "HP": 0,
        "Character_Summary": "",
        "Moves": {{
            "Move_1": {{"Move_name": "", "Description": "", "Damage": 0}},
            "Move_2": {{"Move_name": "", "Description": "", "Damage": 0}},
            "Move_3": {{"Move_name": "", "Description": "", "Damage": 0}},
            "Move_4": {{"Move_name": "", "Description": "", "Damage": 0}}
        }}
    }},
    "Background": ""
}}"#,
        topic = topic,
        hp_min = ROSTER_HP_MIN,
        hp_max = ROSTER_HP_MAX,
        dmg_min = ROSTER_DAMAGE_MIN,
        dmg_max = ROSTER_DAMAGE_MAX,
    )
}

/// Generate a roster for the topic through the narrator seam.
///
/// Not retried: a reply without usable JSON is an error the operator sees,
/// unlike round narration where retrying the identical request is cheap and
/// the battle is already in flight.
pub async fn generate_roster(narrator: &dyn Narrator, topic: &str) -> Result<RosterFile> {
    tracing::info!(topic, "generating roster");
    let response = narrator.generate(ROSTER_SYSTEM_PROMPT, &roster_query(topic)).await?;
    let json = extract_json(&response)?;
    Ok(serde_json::from_str(json)?)
}

/// Extract the JSON object from an LLM response (handles surrounding text)
fn extract_json(response: &str) -> Result<&str> {
    let start = response
        .find('{')
        .ok_or_else(|| ArenaError::Roster("no JSON found in response".into()))?;
    let end = response
        .rfind('}')
        .ok_or_else(|| ArenaError::Roster("no closing brace found in response".into()))?;
    Ok(&response[start..=end])
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct CannedNarrator {
        reply: String,
    }

    #[async_trait]
    impl Narrator for CannedNarrator {
        async fn generate(&self, _system: &str, _user: &str) -> Result<String> {
            Ok(self.reply.clone())
        }
    }

    fn roster_json() -> String {
        let character = |name: &str| {
            format!(
                r#"{{"Name": "{name}", "HP": 200, "Character_Summary": "{name} summary", "Moves": {{
                    "Move_1": {{"Move_name": "A", "Description": "d", "Damage": 10}},
                    "Move_2": {{"Move_name": "B", "Description": "d", "Damage": 20}},
                    "Move_3": {{"Move_name": "C", "Description": "d", "Damage": 30}},
                    "Move_4": {{"Move_name": "D", "Description": "d", "Damage": 40}}
                }}}}"#
            )
        };
        format!(
            r#"{{"Character_1": {}, "Character_2": {}, "Background": "An old pier"}}"#,
            character("Ajax"),
            character("Briar"),
        )
    }

    #[test]
    fn test_query_embeds_topic_and_bounds() {
        let query = roster_query("street magicians");
        assert!(query.contains("street magicians"));
        assert!(query.contains("1-500"));
        assert!(query.contains("1-150"));
        assert!(query.contains("Character_1"));
        assert!(query.contains("Move_4"));
    }

    #[test]
    fn test_extract_json_with_surrounding_text() {
        let response = format!("Here is your battle!\n{}\nEnjoy.", roster_json());
        let json = extract_json(&response).unwrap();
        assert!(json.starts_with('{'));
        assert!(json.ends_with('}'));
    }

    #[test]
    fn test_extract_json_no_json() {
        assert!(extract_json("I cannot help with that.").is_err());
    }

    #[tokio::test]
    async fn test_generate_roster_parses_fenced_reply() {
        let narrator = CannedNarrator {
            reply: format!("```json\n{}\n```", roster_json()),
        };
        let roster = generate_roster(&narrator, "pier brawlers").await.unwrap();
        assert_eq!(roster.character_1.name, "Ajax");
        assert_eq!(roster.background, "An old pier");
    }

    #[tokio::test]
    async fn test_generate_roster_rejects_prose() {
        let narrator = CannedNarrator {
            reply: "Two characters walk into a bar.".into(),
        };
        assert!(generate_roster(&narrator, "bar").await.is_err());
    }
}
