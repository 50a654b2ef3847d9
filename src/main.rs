//! Pegfall entry point
//!
//! Headless demo shell: loads a layout, then lets the zen-shot heuristic
//! play the level at a fixed ~60 Hz while logging what happens. The loop is
//! gated on elapsed time rather than a blocking sleep, matching the
//! simulation's frame-stepped model.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use glam::Vec2;

use pegfall::level::LevelLayout;
use pegfall::sim::{GameEvent, GamePhase, GameState, TickInput, tick};

/// One simulation tick at 60 Hz
const TICK: Duration = Duration::from_micros(16_667);

/// Hard stop for a stuck session, in ticks
const MAX_TICKS: u64 = 200_000;

struct Args {
    level: Option<PathBuf>,
    seed: u64,
    turbo: bool,
    dump: Option<PathBuf>,
}

impl Args {
    fn parse(mut argv: impl Iterator<Item = String>) -> Result<Self, String> {
        let mut args = Self {
            level: None,
            seed: default_seed(),
            turbo: false,
            dump: None,
        };

        while let Some(arg) = argv.next() {
            match arg.as_str() {
                "--seed" => {
                    let value = argv.next().ok_or("--seed needs a value")?;
                    args.seed = value.parse().map_err(|_| format!("bad seed: {value}"))?;
                }
                "--turbo" => args.turbo = true,
                "--dump" => {
                    let value = argv.next().ok_or("--dump needs a path")?;
                    args.dump = Some(PathBuf::from(value));
                }
                "--help" | "-h" => {
                    println!("usage: pegfall [LAYOUT.png] [--seed N] [--turbo] [--dump STATE.json]");
                    std::process::exit(0);
                }
                other if !other.starts_with('-') => args.level = Some(PathBuf::from(other)),
                other => return Err(format!("unknown flag: {other}")),
            }
        }
        Ok(args)
    }
}

fn default_seed() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse(std::env::args().skip(1))?;
    let layout = match &args.level {
        Some(path) => LevelLayout::from_image(path)?,
        None => LevelLayout::staggered(5, 8),
    };
    let mut state = GameState::new(&layout, args.seed)?;
    log::info!("pegfall starting: seed {}, {} pegs", args.seed, state.pegs.len());

    // Every launch asks the zen heuristic to aim; the pointer target is only
    // the fallback when the heuristic finds nothing
    let input = TickInput {
        aim_point: Some(Vec2::new(state.bounds.width / 2.0, state.bounds.height / 2.0)),
        launch: true,
        zen: true,
    };

    let mut last = Instant::now();
    while state.outcome.is_none() && state.time_ticks < MAX_TICKS {
        if !args.turbo {
            // Time-elapsed gate, no sleep
            if last.elapsed() < TICK {
                std::hint::spin_loop();
                continue;
            }
            last += TICK;
        }

        let launch = matches!(state.phase, GamePhase::Aiming);
        tick(&mut state, &TickInput { launch, ..input });

        for event in state.drain_events() {
            match event {
                GameEvent::Launched { angle, zen } => {
                    log::debug!("launched at {angle:.3} rad (zen: {zen})");
                }
                GameEvent::PegHit { index, kind } => {
                    log::debug!("peg {index} hit ({kind:?}), score {}", state.score);
                }
                other => log::debug!("{other:?}"),
            }
        }
    }

    match state.outcome {
        Some(outcome) => log::info!(
            "{outcome:?} after {} ticks: score {}, bonus {}, {} pegs left",
            state.time_ticks,
            state.score,
            state.bonus_collected,
            state.pegs.len()
        ),
        None => log::warn!("gave up after {} ticks", state.time_ticks),
    }

    if let Some(path) = &args.dump {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(file, &state)?;
        log::info!("state dumped to {path:?}");
    }

    Ok(())
}
