use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use arena_snake::config::EngineConfig;
use arena_snake::engine::{GameEvent, GameStatus, SimulationEngine};
use arena_snake::input::{GameInput, InputHandler};
use arena_snake::logging::{default_log_path, init_file_logger};
use arena_snake::renderer::{self, ViewState};
use arena_snake::score::{BestRecord, load_best_record, save_best_record};
use arena_snake::terminal_runtime::TerminalSession;
use arena_snake::ui::popup::LevelUpQueue;
use clap::Parser;
use log::{LevelFilter, info, warn};

const FRAME_POLL: Duration = Duration::from_millis(16);

#[derive(Debug, Parser)]
#[command(version, about = "Snake arena against a greedy AI snake")]
struct Cli {
    /// JSON file overriding engine defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed for food placement, for reproducible games.
    #[arg(long)]
    seed: Option<u64>,

    /// Die when the player's head runs into its own body.
    #[arg(long = "player-self-collision")]
    player_self_collision: bool,

    /// Where to write the log file.
    #[arg(long = "log-file")]
    log_file: Option<PathBuf>,

    /// Log verbosity (off, error, warn, info, debug, trace).
    #[arg(long = "log-level", default_value = "info")]
    log_level: LevelFilter,
}

fn main() -> io::Result<()> {
    let cli = Cli::parse();

    let log_path = cli.log_file.clone().unwrap_or_else(default_log_path);
    if let Err(error) = init_file_logger(&log_path, cli.log_level) {
        eprintln!("Logging disabled, cannot open {}: {error}", log_path.display());
    }

    let mut config = match &cli.config {
        Some(path) => EngineConfig::from_json_file(path).map_err(io::Error::other)?,
        None => EngineConfig::default(),
    };
    config.player_self_collision |= cli.player_self_collision;

    let engine = match cli.seed {
        Some(seed) => SimulationEngine::new_with_seed(config, seed),
        None => SimulationEngine::new(config),
    }
    .map_err(io::Error::other)?;

    let best = load_best_record().unwrap_or_else(|error| {
        eprintln!("Ignoring unreadable best score: {error}");
        BestRecord::default()
    });

    info!("starting arena-snake, best score {}", best.score);
    let mut session = TerminalSession::enter()?;
    run(&mut session, engine, best)
}

fn run(
    session: &mut TerminalSession,
    mut engine: SimulationEngine,
    mut best: BestRecord,
) -> io::Result<()> {
    let mut input = InputHandler::new();
    let mut popups = LevelUpQueue::new(engine.config().level_up_popup());
    let tick_interval = engine.config().tick_interval();

    // Best score when the current game began; the game-over screen compares against it.
    let mut reference_best = best.score;
    let mut started = false;
    let mut paused = false;
    let mut game_time = Duration::ZERO;
    let mut last_tick_at = Duration::ZERO;
    let mut last_frame = Instant::now();

    loop {
        session.draw(|frame| {
            renderer::render(
                frame,
                &engine,
                ViewState {
                    started,
                    paused,
                    best_score: reference_best,
                    now: game_time,
                    level_up: popups.current(),
                },
            );
        })?;

        if let Some(game_input) = input.poll_input(FRAME_POLL)? {
            match game_input {
                GameInput::Quit => break,
                GameInput::Confirm if !started => started = true,
                GameInput::Confirm if engine.status() != GameStatus::Running => {
                    engine.restart().map_err(io::Error::other)?;
                    popups.clear();
                    reference_best = best.score;
                    game_time = Duration::ZERO;
                    last_tick_at = Duration::ZERO;
                }
                GameInput::Pause if started => paused = !paused,
                other if started && !paused => engine.apply_input(other, game_time),
                _ => {}
            }
        }

        let frame_elapsed = last_frame.elapsed();
        last_frame = Instant::now();
        if !started || paused || engine.status() != GameStatus::Running {
            continue;
        }

        game_time += frame_elapsed;
        popups.update(game_time);
        if game_time - last_tick_at < tick_interval {
            continue;
        }
        last_tick_at = game_time;

        let events = match engine.advance(game_time) {
            Ok(events) => events,
            Err(error) => {
                warn!("game stopped: {error}");
                record_best(&mut best, engine.score(), engine.tile_count());
                continue;
            }
        };

        for event in events {
            match event {
                GameEvent::LevelUp { threshold } => popups.push(threshold),
                GameEvent::GameOver { final_score } => {
                    record_best(&mut best, final_score, engine.tile_count());
                }
                _ => {}
            }
        }
    }

    info!("quitting with score {}", engine.score());
    Ok(())
}

fn record_best(best: &mut BestRecord, score: u32, tile_count: u16) {
    let updated = best.merged(score, tile_count);
    if updated == *best {
        return;
    }

    *best = updated;
    if let Err(error) = save_best_record(*best) {
        warn!("failed to save best score: {error}");
    }
}
