//! Round execution and outer battle loop
//!
//! Strictly sequential: each round's request embeds the previous round's
//! summary, so no two rounds can ever be in flight at once. The engine owns
//! nothing shared - characters and state belong to the single battle run.

use crate::battle::character::Character;
use crate::battle::prompt::{round_request, NARRATION_SYSTEM_PROMPT};
use crate::battle::recovery::{recover_reply, RecoveryOutcome};
use crate::battle::round::RoundReply;
use crate::core::config::MOVES_PER_CHARACTER;
use crate::core::error::{ArenaError, Result};
use crate::llm::Narrator;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Mutable aggregate carried across rounds
#[derive(Debug, Clone)]
pub struct BattleState {
    /// Carry-over effects from the just-completed round, replaced verbatim
    /// each round
    pub summary: String,
    /// Starts at 1, increments by exactly 1 per completed round
    pub round_number: u32,
}

impl BattleState {
    pub fn new() -> Self {
        Self {
            summary: "None".into(),
            round_number: 1,
        }
    }
}

impl Default for BattleState {
    fn default() -> Self {
        Self::new()
    }
}

/// Everything a caller needs to display one completed round
#[derive(Debug, Clone)]
pub struct RoundReport {
    pub round_number: u32,
    /// Name of the move Player1 drew this round
    pub move_1: String,
    /// Name of the move Player2 drew this round
    pub move_2: String,
    pub reply: RoundReply,
    /// Player1 health after this round's damage
    pub health_1: i64,
    /// Player2 health after this round's damage
    pub health_2: i64,
    pub continues: bool,
}

/// Final classification of a finished battle
#[derive(Debug, Clone, PartialEq)]
pub enum BattleOutcome {
    Winner { winner: String, loser: String },
    Tie,
}

impl BattleOutcome {
    /// Display label: the winner's name, or "TIE"
    pub fn label(&self) -> &str {
        match self {
            BattleOutcome::Winner { winner, .. } => winner,
            BattleOutcome::Tie => "TIE",
        }
    }
}

/// Result of a whole battle run
#[derive(Debug)]
pub struct BattleReport {
    pub outcome: BattleOutcome,
    /// Number of completed rounds
    pub rounds: u32,
    pub reports: Vec<RoundReport>,
}

/// The battle engine: a narrator handle plus a seeded RNG for move draws.
///
/// The RNG is injected so battle sequences are reproducible - same seed and
/// same narrator replies means the same move draws every run.
pub struct BattleEngine<'a> {
    narrator: &'a dyn Narrator,
    rng: ChaCha8Rng,
}

impl<'a> BattleEngine<'a> {
    /// Create an engine with a specific RNG seed for deterministic move draws
    pub fn with_seed(narrator: &'a dyn Narrator, seed: u64) -> Self {
        Self {
            narrator,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Draw one move index uniformly. Memoryless: no history weighting.
    fn draw_move(&mut self) -> usize {
        self.rng.gen_range(0..MOVES_PER_CHARACTER)
    }

    /// Run one round: draw moves, narrate, apply damage, roll the summary.
    ///
    /// Both combatants must be standing on entry; starting a round with a
    /// defeated character is a caller bug.
    ///
    /// Damage flows to the receiver: Player1 takes `damage_2` and Player2
    /// takes `damage_1`.
    pub async fn run_round(
        &mut self,
        player1: &mut Character,
        player2: &mut Character,
        state: &mut BattleState,
    ) -> Result<RoundReport> {
        debug_assert!(
            !player1.is_defeated() && !player2.is_defeated(),
            "round started with a defeated combatant"
        );

        let (move_1, move_2, user) = {
            let m1 = &player1.moves()[self.draw_move()];
            let m2 = &player2.moves()[self.draw_move()];
            (
                m1.name.clone(),
                m2.name.clone(),
                round_request(player1, player2, m1, m2, &state.summary),
            )
        };

        let reply = match recover_reply(self.narrator, NARRATION_SYSTEM_PROMPT, &user).await? {
            RecoveryOutcome::Parsed(reply) => reply,
            RecoveryOutcome::Exhausted { attempts } => {
                return Err(ArenaError::RecoveryExhausted { attempts });
            }
        };

        player1.apply_damage(reply.damage_2);
        player2.apply_damage(reply.damage_1);
        state.summary = reply.summary.clone();

        let continues = !player1.is_defeated() && !player2.is_defeated();
        let report = RoundReport {
            round_number: state.round_number,
            move_1,
            move_2,
            health_1: player1.health(),
            health_2: player2.health(),
            continues,
            reply,
        };

        tracing::info!(
            round = report.round_number,
            health_1 = report.health_1,
            health_2 = report.health_2,
            continues = report.continues,
            "round complete"
        );

        Ok(report)
    }

    /// Run rounds until one side falls, reporting each round as it completes.
    ///
    /// `on_round` fires after every completed round so a caller watching a
    /// long battle sees incremental progress rather than a batch at the end.
    pub async fn run_battle(
        &mut self,
        player1: &mut Character,
        player2: &mut Character,
        mut on_round: impl FnMut(&RoundReport),
    ) -> Result<BattleReport> {
        let mut state = BattleState::new();
        let mut reports = Vec::new();

        while !player1.is_defeated() && !player2.is_defeated() {
            let report = self.run_round(player1, player2, &mut state).await?;
            on_round(&report);
            state.round_number += 1;
            reports.push(report);
        }

        let outcome = match (player1.is_defeated(), player2.is_defeated()) {
            (true, true) => BattleOutcome::Tie,
            (true, false) => BattleOutcome::Winner {
                winner: player2.name.clone(),
                loser: player1.name.clone(),
            },
            (false, true) => BattleOutcome::Winner {
                winner: player1.name.clone(),
                loser: player2.name.clone(),
            },
            // the loop cannot exit with both combatants standing
            (false, false) => unreachable!("battle loop exited with both combatants standing"),
        };

        Ok(BattleReport {
            outcome,
            rounds: state.round_number - 1,
            reports,
        })
    }
}
