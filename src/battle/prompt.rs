//! Round narration prompts
//!
//! Fixes the contract the narration service replies under: the 0-200
//! effectiveness scale, numeric damage for both sides, and a one-round
//! carry-over summary that must not leak raw HP numbers.

use crate::battle::character::{Character, Move};

/// System prompt for round narration
pub const NARRATION_SYSTEM_PROMPT: &str = "\
You are an immersive battle simulator, similar to Pokemon battles but adapted \
for a variety of imaginative scenarios and characters.\n\n\
There are two combatants: Player1 and Player2. Each has chosen one unique move \
for this round. Your task is to vividly narrate the battle, clearly explaining \
how each player's chosen move impacts their opponent.\n\n\
Each move has an effectiveness score ranging from 0 to 200 (inclusive):\n\n\
An effectiveness of 0 indicates a complete miss or failure, causing no damage.\n\n\
An effectiveness of 200 represents maximum damage and optimal impact.\n\n\
Provide detailed context and storytelling that incorporates each player's \
background, chosen moves, and the resulting effectiveness. Consider effects \
from the previous round when determining effectiveness. Clearly illustrate the \
dynamics and drama of the exchange.";

/// Build the user payload for one round: both combatants, their chosen
/// moves, and the prior round's carry-over summary.
pub fn round_request(
    player1: &Character,
    player2: &Character,
    move1: &Move,
    move2: &Move,
    summary: &str,
) -> String {
    let mut prompt = String::new();

    prompt.push_str("Context for Player1:\n");
    push_combatant(&mut prompt, player1);
    prompt.push_str("Move chosen by Player1:\n");
    push_move(&mut prompt, move1);
    prompt.push('\n');

    prompt.push_str("Context for Player2:\n");
    push_combatant(&mut prompt, player2);
    prompt.push_str("Move chosen by Player2:\n");
    push_move(&mut prompt, move2);
    prompt.push('\n');

    prompt.push_str("Effects from the previous round:\n");
    prompt.push_str(summary);
    prompt.push_str("\n\n");

    prompt.push_str(
        "Narrate the consequences of each player's move and describe how each \
player is affected. If either player's health falls below 0, declare the other \
player the victor and conclude with a compelling and dramatic story about \
their triumph. Your response must follow the format\n\
{\n\
   \"effectiveness_1\": effectiveness of move chosen by Player1,\n\
   \"damage_1\": damage done by Player1's move to Player2,\n\
   \"narrative_1\": your narration of Player1's move,\n\
   \"effectiveness_2\": effectiveness of move chosen by Player2,\n\
   \"damage_2\": damage done by Player2's move to Player1,\n\
   \"narrative_2\": your narration of Player2's move,\n\
   \"summary\": summary of the effects from this round that may affect \
effectiveness in the next round. Do not include HP of players.\n\
}\n",
    );

    prompt
}

fn push_combatant(prompt: &mut String, character: &Character) {
    prompt.push_str(&format!("Name: {}\n", character.name));
    prompt.push_str(&format!("Persona: {}\n", character.persona));
    prompt.push_str(&format!("HP: {}\n", character.health()));
}

fn push_move(prompt: &mut String, mv: &Move) {
    prompt.push_str(&format!("Name: {}\n", mv.name));
    prompt.push_str(&format!("Description: {}\n", mv.description));
    prompt.push_str(&format!("Damage: {}\n", mv.base_damage));
}
