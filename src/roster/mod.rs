//! Character-generation data
//!
//! The roster document is the JSON produced by the topic-generation step:
//! two characters (name, HP, summary, four moves) and a battle background.
//! Field spellings follow the generators that have emitted this format, so
//! both `Character_1` and `Character 1` are accepted and numeric fields
//! tolerate string encodings.

pub mod generate;

pub use generate::generate_roster;

use crate::battle::character::{Character, Move};
use crate::core::config::DEFAULT_STARTING_HP;
use crate::core::error::Result;
use serde::{Deserialize, Deserializer, Serialize};
use std::path::Path;

/// Persisted battle-generation output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterFile {
    #[serde(rename = "Character_1", alias = "Character 1")]
    pub character_1: RosterCharacter,
    #[serde(rename = "Character_2", alias = "Character 2")]
    pub character_2: RosterCharacter,
    #[serde(rename = "Background")]
    pub background: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterCharacter {
    #[serde(rename = "Name")]
    pub name: String,
    /// Some generator variants omit HP; conversion falls back to
    /// [`DEFAULT_STARTING_HP`]
    #[serde(rename = "HP", default, deserialize_with = "flexible_opt_i64")]
    pub hp: Option<i64>,
    #[serde(rename = "Character_Summary")]
    pub summary: String,
    #[serde(rename = "Moves")]
    pub moves: RosterMoves,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterMoves {
    #[serde(rename = "Move_1")]
    pub move_1: RosterMove,
    #[serde(rename = "Move_2")]
    pub move_2: RosterMove,
    #[serde(rename = "Move_3")]
    pub move_3: RosterMove,
    #[serde(rename = "Move_4")]
    pub move_4: RosterMove,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterMove {
    #[serde(rename = "Move_name")]
    pub name: String,
    #[serde(rename = "Description")]
    pub description: String,
    #[serde(rename = "Damage", deserialize_with = "flexible_u32")]
    pub damage: u32,
}

impl RosterFile {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let text = serde_json::to_string_pretty(self)?;
        std::fs::write(path, text)?;
        Ok(())
    }

    /// Build the two battle-ready combatants from the roster records
    pub fn into_characters(self) -> (Character, Character) {
        (self.character_1.into_character(), self.character_2.into_character())
    }
}

impl RosterCharacter {
    fn into_character(self) -> Character {
        let hp = self.hp.unwrap_or(DEFAULT_STARTING_HP);
        let m = self.moves;
        Character::new(
            self.name,
            self.summary,
            hp,
            [
                m.move_1.into_move(),
                m.move_2.into_move(),
                m.move_3.into_move(),
                m.move_4.into_move(),
            ],
        )
    }
}

impl RosterMove {
    fn into_move(self) -> Move {
        Move {
            name: self.name,
            description: self.description,
            base_damage: self.damage,
        }
    }
}

fn flexible_u32<'de, D>(deserializer: D) -> std::result::Result<u32, D::Error>
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

fn flexible_opt_i64<'de, D>(deserializer: D) -> std::result::Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Num(i64),
        Text(String),
    }

    match Option::<Raw>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Raw::Num(n)) => Ok(Some(n)),
        Some(Raw::Text(s)) => s.trim().parse().map(Some).map_err(serde::de::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn move_json(name: &str, damage: &str) -> String {
        format!(
            r#"{{"Move_name": "{}", "Description": "{} description", "Damage": {}}}"#,
            name, name, damage
        )
    }

    fn character_json(name: &str, hp: Option<&str>) -> String {
        let hp_field = hp.map(|v| format!(r#""HP": {},"#, v)).unwrap_or_default();
        format!(
            r#"{{
                "Name": "{}",
                {}
                "Character_Summary": "{} is bold but reckless.",
                "Moves": {{
                    "Move_1": {},
                    "Move_2": {},
                    "Move_3": {},
                    "Move_4": {}
                }}
            }}"#,
            name,
            hp_field,
            name,
            move_json("Alpha", "45"),
            move_json("Beta", "\"30\""),
            move_json("Gamma", "25"),
            move_json("Delta", "40"),
        )
    }

    #[test]
    fn test_parse_underscore_key_spelling() {
        let doc = format!(
            r#"{{"Character_1": {}, "Character_2": {}, "Background": "A neon rooftop"}}"#,
            character_json("Ajax", Some("160")),
            character_json("Briar", Some("\"150\"")),
        );
        let roster: RosterFile = serde_json::from_str(&doc).unwrap();
        assert_eq!(roster.character_1.name, "Ajax");
        assert_eq!(roster.character_1.hp, Some(160));
        assert_eq!(roster.character_2.hp, Some(150));
        assert_eq!(roster.background, "A neon rooftop");
    }

    #[test]
    fn test_parse_space_key_spelling() {
        let doc = format!(
            r#"{{"Character 1": {}, "Character 2": {}, "Background": "A swamp"}}"#,
            character_json("Ajax", Some("160")),
            character_json("Briar", Some("150")),
        );
        let roster: RosterFile = serde_json::from_str(&doc).unwrap();
        assert_eq!(roster.character_2.name, "Briar");
    }

    #[test]
    fn test_string_encoded_damage_accepted() {
        let doc = format!(
            r#"{{"Character_1": {}, "Character_2": {}, "Background": "B"}}"#,
            character_json("Ajax", Some("160")),
            character_json("Briar", Some("150")),
        );
        let roster: RosterFile = serde_json::from_str(&doc).unwrap();
        assert_eq!(roster.character_1.moves.move_2.damage, 30);
    }

    #[test]
    fn test_missing_hp_falls_back_to_default() {
        let doc = format!(
            r#"{{"Character_1": {}, "Character_2": {}, "Background": "B"}}"#,
            character_json("Ajax", None),
            character_json("Briar", Some("150")),
        );
        let roster: RosterFile = serde_json::from_str(&doc).unwrap();
        assert_eq!(roster.character_1.hp, None);

        let (a, _) = roster.into_characters();
        assert_eq!(a.health(), DEFAULT_STARTING_HP);
    }

    #[test]
    fn test_missing_move_key_is_rejected() {
        let incomplete = r#"{
            "Name": "Ajax",
            "HP": 100,
            "Character_Summary": "s",
            "Moves": {
                "Move_1": {"Move_name": "A", "Description": "d", "Damage": 10},
                "Move_2": {"Move_name": "B", "Description": "d", "Damage": 10},
                "Move_4": {"Move_name": "D", "Description": "d", "Damage": 10}
            }
        }"#;
        assert!(serde_json::from_str::<RosterCharacter>(incomplete).is_err());
    }

    #[test]
    fn test_into_characters_builds_full_catalogs() {
        let doc = format!(
            r#"{{"Character_1": {}, "Character_2": {}, "Background": "B"}}"#,
            character_json("Ajax", Some("160")),
            character_json("Briar", Some("150")),
        );
        let roster: RosterFile = serde_json::from_str(&doc).unwrap();
        let (a, b) = roster.into_characters();

        assert_eq!(a.health(), 160);
        assert_eq!(b.health(), 150);
        assert_eq!(a.moves().len(), 4);
        assert_eq!(a.moves()[0].name, "Alpha");
        assert_eq!(a.moves()[3].base_damage, 40);
        assert!(b.persona.contains("Briar"));
    }

    #[test]
    fn test_save_load_round_trip() {
        let doc = format!(
            r#"{{"Character_1": {}, "Character_2": {}, "Background": "A canyon"}}"#,
            character_json("Ajax", Some("160")),
            character_json("Briar", Some("150")),
        );
        let roster: RosterFile = serde_json::from_str(&doc).unwrap();

        let dir = std::env::temp_dir().join("mythos-arena-roster-test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("roster.json");

        roster.save(&path).unwrap();
        let loaded = RosterFile::load(&path).unwrap();

        assert_eq!(loaded.character_1.name, roster.character_1.name);
        assert_eq!(loaded.background, roster.background);
    }
}
