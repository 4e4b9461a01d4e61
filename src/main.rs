//! Dotfield headless runner
//!
//! Plays the game with the built-in autopilot against a synthetic clock and
//! prints a JSON summary. Handy for soak-testing configs and seeds without a
//! renderer.

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use serde::Serialize;

use dotfield::sim::{GameEvent, GameState, Snapshot, TickInput, tick};
use dotfield::{GameConfig, HighScores};

#[derive(Debug, Parser)]
#[command(name = "dotfield", about = "Run the dotfield simulation headless")]
struct Args {
    /// Rule preset (classic or arcade)
    #[arg(long, default_value = "arcade")]
    preset: String,
    /// JSON config file; overrides the preset entirely
    #[arg(long)]
    config: Option<std::path::PathBuf>,
    /// RNG seed
    #[arg(long, default_value_t = 1)]
    seed: u64,
    /// Host frames to run
    #[arg(long, default_value_t = 3600)]
    frames: u32,
    /// Simulated host frame length in milliseconds
    #[arg(long, default_value_t = 1000.0 / 60.0)]
    frame_ms: f32,
}

#[derive(Debug, Serialize)]
struct RunSummary {
    seed: u64,
    frames: u32,
    obstacles: usize,
    points_collected: u32,
    level_ups: u32,
    hits: u32,
    game_overs: u32,
    final_state: Snapshot,
    high_scores: HighScores,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => GameConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => GameConfig::preset(&args.preset)
            .ok_or_else(|| anyhow!("unknown preset '{}'", args.preset))?,
    };
    config.validate().context("invalid configuration")?;
    if args.frames == 0 {
        return Err(anyhow!("frames must be > 0"));
    }

    log::info!(
        "Dotfield (headless) starting: seed {}, {} frames, {} progression",
        args.seed,
        args.frames,
        config.progression.as_str()
    );

    let mut state = GameState::new(config, args.seed);
    let input = TickInput {
        idle_mode: true,
        ..Default::default()
    };

    let mut summary = RunSummary {
        seed: args.seed,
        frames: args.frames,
        obstacles: state.terrain.obstacles.len(),
        points_collected: 0,
        level_ups: 0,
        hits: 0,
        game_overs: 0,
        final_state: Snapshot::capture(&state),
        high_scores: HighScores::new(),
    };

    for _ in 0..args.frames {
        summary.final_state = tick(&mut state, &input, args.frame_ms);
        for event in &state.events {
            match event {
                GameEvent::PointCollected { .. } => summary.points_collected += 1,
                GameEvent::LevelUp { level } => {
                    summary.level_ups += 1;
                    log::info!("Level {} at tick {}", level, state.time_ticks);
                }
                GameEvent::PlayerHit { .. } => summary.hits += 1,
                GameEvent::GameOver { score, level } => {
                    summary.game_overs += 1;
                    log::info!("Run over: score {} (level {})", score, level);
                }
                _ => {}
            }
        }
    }

    summary.high_scores = state.high_scores.clone();
    let json = serde_json::to_string_pretty(&summary).context("serializing run summary")?;
    println!("{json}");
    Ok(())
}
