//! Combatants and their fixed move catalogs

use crate::core::config::MOVES_PER_CHARACTER;
use serde::{Deserialize, Serialize};

/// A single attack in a character's catalog. Static for the whole battle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Move {
    pub name: String,
    /// Flavor text handed to the narration service
    pub description: String,
    pub base_damage: u32,
}

/// One combatant: immutable identity plus health that only ever goes down.
///
/// Health and the move catalog are private so the rest of the crate cannot
/// heal a character or swap moves mid-battle; damage flows through
/// [`Character::apply_damage`] alone.
#[derive(Debug, Clone)]
pub struct Character {
    pub name: String,
    /// Summary of strengths and weaknesses, fed into every round's prompt
    pub persona: String,
    health: i64,
    moves: [Move; MOVES_PER_CHARACTER],
}

impl Character {
    pub fn new(
        name: impl Into<String>,
        persona: impl Into<String>,
        health: i64,
        moves: [Move; MOVES_PER_CHARACTER],
    ) -> Self {
        Self {
            name: name.into(),
            persona: persona.into(),
            health,
            moves,
        }
    }

    /// Current health. May be negative once the character is defeated.
    pub fn health(&self) -> i64 {
        self.health
    }

    /// The fixed four-move catalog
    pub fn moves(&self) -> &[Move] {
        &self.moves
    }

    /// Subtract incoming damage. The only mutation a battle performs.
    pub fn apply_damage(&mut self, damage: u32) {
        self.health -= damage as i64;
    }

    pub fn is_defeated(&self) -> bool {
        self.health <= 0
    }
}
