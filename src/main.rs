//! Eight-ball exhibition entry point
//!
//! Runs two computer opponents against each other on a headless table and
//! logs every turn. Set `RUST_LOG=debug` (or `trace` for every impact) to see
//! more.
//!
//! ```text
//! eight-ball [--config table.json] [--seed N] [--matches N]
//! ```

#[cfg(not(target_arch = "wasm32"))]
use eight_ball::{AiOpponent, GameConfig, InputSource, SoundEffect, SoundSink, World};
#[cfg(not(target_arch = "wasm32"))]
use clap::Parser;
#[cfg(not(target_arch = "wasm32"))]
use std::path::PathBuf;

/// Logs impacts instead of playing them
#[cfg(not(target_arch = "wasm32"))]
struct LogSink;

#[cfg(not(target_arch = "wasm32"))]
impl SoundSink for LogSink {
    fn play(&mut self, effect: SoundEffect, volume: f32) {
        log::trace!("{effect:?} at volume {volume:.2}");
    }
}

#[cfg(not(target_arch = "wasm32"))]
#[derive(Parser, Debug)]
#[command(name = "eight-ball")]
#[command(about = "Two computer players face off on a headless 8-ball table", long_about = None)]
struct Cli {
    /// JSON config file (missing fields use the stock values)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed for both AI opponents
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Matches to play before exiting
    #[arg(long, default_value_t = 1)]
    matches: u32,
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();

    let args = Cli::parse();

    let config = match &args.config {
        Some(path) => match GameConfig::load(path) {
            Ok(config) => config,
            Err(e) => {
                log::error!("Could not load config: {e}");
                std::process::exit(1);
            }
        },
        None => GameConfig::default(),
    };
    if let Err(e) = config.validate() {
        log::error!("{e}");
        std::process::exit(1);
    }

    log::info!("Eight-ball exhibition starting (seed {})", args.seed);

    let mut world = World::new(config);
    let mut players = [
        AiOpponent::new(args.seed),
        AiOpponent::new(args.seed.wrapping_add(1)),
    ];
    let mut sink = LogSink;
    let mut turns = 0u32;

    while world.matches_played() < args.matches {
        if !world.is_balls_moving() {
            let shooter = world.current_player();
            let Some(command) = players[shooter].next_command(&world) else {
                continue;
            };
            log::debug!("Player {shooter}: {command:?}");
            if let Err(e) = world.apply(command) {
                log::warn!("Player {shooter} command rejected: {e}");
            }
            continue;
        }

        if let Some(outcome) = world.tick(&mut sink) {
            turns += 1;
            log::info!(
                "Turn {turns}: player {} {} ({} pocketed), player {} to play",
                outcome.shooter,
                if outcome.is_foul() { "foul" } else { "valid" },
                outcome.pocketed,
                outcome.next_player
            );
        }
    }

    let [a, b] = world.players();
    log::info!(
        "Finished {} match(es) in {turns} turns, overall {}-{}",
        world.matches_played(),
        a.overall_score,
        b.overall_score
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The library is the wasm surface; there is no wasm binary
}
