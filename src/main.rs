//! Headless match runner
//!
//! Pits the CPU policy against itself on a chosen stage and prints the
//! outcome. Useful for soak-testing the simulation and for tuning
//! experiments via a TOML config.

use std::path::PathBuf;

use clap::Parser;

use spellduel::core::config::Tuning;
use spellduel::core::error::Result;
use spellduel::core::types::PlayerSide;
use spellduel::sim::ai;
use spellduel::sim::registry::MatchSignal;
use spellduel::sim::world::World;
use spellduel::stage::{Stage, StageId};

#[derive(Parser, Debug)]
#[command(name = "spellduel")]
#[command(about = "Run a headless AI vs AI wizard duel")]
struct Args {
    /// Stage to fight on
    #[arg(long, default_value = "forest", value_parser = ["forest", "volcano"])]
    stage: String,

    /// Random seed for deterministic runs
    #[arg(long)]
    seed: Option<u64>,

    /// Maximum frames before a match is called a draw
    #[arg(long, default_value_t = 36_000)]
    max_frames: u64,

    /// Number of matches in the series
    #[arg(long, default_value_t = 1)]
    matches: u32,

    /// TOML file overriding the default tuning values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Disable spell cooldowns
    #[arg(long)]
    no_cooldowns: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "spellduel=info".to_string()),
        )
        .init();

    let args = Args::parse();
    let seed = args.seed.unwrap_or_else(rand::random);

    let mut tuning = match &args.config {
        Some(path) => Tuning::from_toml_str(&std::fs::read_to_string(path)?)?,
        None => Tuning::default(),
    };
    if args.no_cooldowns {
        tuning.no_cooldowns = true;
    }

    let stage_id = match args.stage.as_str() {
        "volcano" => StageId::Volcano,
        _ => StageId::Forest,
    };
    let stage = Stage::load(stage_id);
    tracing::info!(?stage_id, seed, "match starting");

    let mut world = World::new(tuning, seed)?;
    world.spawn_players(&stage);

    let mut wins = [0u32; 2];
    for round in 1..=args.matches {
        let mut loser = None;
        for _ in 0..args.max_frames {
            ai::take_cpu_action(&mut world, PlayerSide::P0);
            ai::take_cpu_action(&mut world, PlayerSide::P1);
            if let MatchSignal::Defeated(side) = world.step(&stage.terrain) {
                loser = Some(side);
                break;
            }
        }

        match loser {
            Some(side) => {
                let winner = side.opponent();
                wins[winner.index()] += 1;
                println!(
                    "round {round}: {winner:?} wins on frame {} with {} HP remaining (seed {seed})",
                    world.frame(),
                    world.health(winner),
                );
            }
            None => {
                println!(
                    "round {round}: draw after {} frames, {} HP vs {} HP (seed {seed})",
                    world.frame(),
                    world.health(PlayerSide::P0),
                    world.health(PlayerSide::P1),
                );
            }
        }
        world.reset_players(&stage);
    }

    if args.matches > 1 {
        println!("series: P0 {} - {} P1", wins[0], wins[1]);
    }
    Ok(())
}
