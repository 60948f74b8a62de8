//! Mythos Arena - Entry Point
//!
//! Generates (or loads) a themed two-character roster, runs the narrated
//! battle printing each round as it completes, then renders pixel-art
//! sprites for both fighters.

use clap::Parser;
use mythos_arena::battle::{BattleEngine, RoundReport};
use mythos_arena::core::error::Result;
use mythos_arena::llm::LlmClient;
use mythos_arena::roster::{generate_roster, RosterFile};
use mythos_arena::sprite::ImageClient;
use std::path::PathBuf;

/// Themed LLM battle simulator
#[derive(Parser, Debug)]
#[command(name = "mythos-arena")]
#[command(about = "Generate a themed battle simulation and character sprites")]
struct Args {
    /// Topic for the battle
    #[arg(long, default_value = "rappers in 2025")]
    topic: String,

    /// Reuse a saved roster file instead of generating one
    #[arg(long)]
    roster: Option<PathBuf>,

    /// Where to save the generated roster (default: <topic>_battle.json)
    #[arg(long)]
    output: Option<PathBuf>,

    /// Random seed for deterministic move draws
    #[arg(long)]
    seed: Option<u64>,

    /// Skip sprite generation
    #[arg(long)]
    skip_images: bool,

    /// Directory for generated sprites
    #[arg(long, default_value = "./images")]
    images_dir: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter("mythos_arena=info")
        .init();

    let args = Args::parse();
    let client = LlmClient::from_env()?;

    // Load or generate the roster
    let roster = match &args.roster {
        Some(path) => {
            tracing::info!(path = %path.display(), "loading roster");
            RosterFile::load(path)?
        }
        None => {
            println!("Generating battle for topic: {}", args.topic);
            let roster = generate_roster(&client, &args.topic).await?;
            let path = args
                .output
                .clone()
                .unwrap_or_else(|| default_roster_path(&args.topic));
            roster.save(&path)?;
            println!("Roster saved to {}", path.display());
            roster
        }
    };

    println!();
    println!("=== {} vs {} ===", roster.character_1.name, roster.character_2.name);
    println!("Background: {}", roster.background);

    let sprite_subjects = [
        (roster.character_1.name.clone(), roster.character_1.summary.clone()),
        (roster.character_2.name.clone(), roster.character_2.summary.clone()),
    ];
    let (mut player1, mut player2) = roster.into_characters();

    let seed = args.seed.unwrap_or_else(rand::random);
    tracing::info!(seed, "battle seed");

    let mut engine = BattleEngine::with_seed(&client, seed);
    let report = engine
        .run_battle(&mut player1, &mut player2, print_round)
        .await?;

    println!();
    println!("============= RESULT =============");
    match &report.outcome {
        mythos_arena::battle::BattleOutcome::Winner { winner, loser } => {
            println!("{} defeated {} after {} rounds!", winner, loser, report.rounds);
        }
        mythos_arena::battle::BattleOutcome::Tie => {
            println!("It is a TIE after {} rounds!", report.rounds);
        }
    }

    if args.skip_images {
        println!("Sprite generation skipped as requested.");
        return Ok(());
    }

    // Sprite failures are reported but never undo a finished battle
    match ImageClient::from_env() {
        Ok(images) => {
            for (name, summary) in &sprite_subjects {
                match images.render_character(name, summary, &args.images_dir).await {
                    Ok(path) => println!("Sprite for {} saved to {}", name, path.display()),
                    Err(e) => tracing::warn!(name = %name, error = %e, "sprite generation failed"),
                }
            }
        }
        Err(e) => {
            tracing::warn!(error = %e, "sprite generation skipped");
        }
    }

    Ok(())
}

fn print_round(report: &RoundReport) {
    println!();
    println!("============= Round {} =============", report.round_number);
    println!();
    println!(
        "Player1 used {} (effectiveness {}):",
        report.move_1, report.reply.effectiveness_1
    );
    println!("{}", report.reply.narrative_1);
    println!();
    println!(
        "Player2 used {} (effectiveness {}):",
        report.move_2, report.reply.effectiveness_2
    );
    println!("{}", report.reply.narrative_2);
    println!();
    println!(
        "Health: Player1 {} | Player2 {}",
        report.health_1, report.health_2
    );
}

fn default_roster_path(topic: &str) -> PathBuf {
    PathBuf::from(format!(
        "{}_battle.json",
        topic.to_lowercase().replace(' ', "_")
    ))
}
