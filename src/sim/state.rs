//! Game state and core simulation types
//!
//! Everything that must survive a save/replay lives here; transient frame
//! data (events) is skipped during serialization.

use glam::Vec2;
use rand::seq::SliceRandom;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::level::{LevelError, LevelLayout};

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Indicator visible, cannon tracks the pointer, waiting for launch input
    Aiming,
    /// Ball simulated each tick
    InFlight,
    /// Ball drained off the bottom; short pause before pegs start vanishing
    Settling,
    /// Hit pegs removed one-by-one on a fixed cadence
    Clearing,
}

/// How a level session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LevelOutcome {
    Won,
    Lost,
}

/// Peg varieties, behavior carried as data rather than sprite-array indices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PegKind {
    #[default]
    Normal,
    /// Increments the visible bonus counter on first hit
    Bonus,
    /// Banks one extra auto-aimed (zen) shot on first hit
    Special,
    /// The level goal; clearing it wins the level
    Critical,
}

impl PegKind {
    /// Score awarded when a peg of this kind is first hit
    pub fn score(self) -> u32 {
        match self {
            PegKind::Normal => 100,
            PegKind::Bonus => 500,
            PegKind::Special => 300,
            PegKind::Critical => 1000,
        }
    }
}

/// A circular peg. `pos` is the CENTER; the level loader converts the
/// raster's top-left anchors once at load.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Peg {
    pub pos: Vec2,
    pub radius: f32,
    pub kind: PegKind,
    /// Flips false -> true at most once, on the first real (non-predictive)
    /// contact; removal happens later, in the clearing phase.
    pub hit: bool,
}

impl Peg {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            radius: BALL_RADIUS,
            kind: PegKind::Normal,
            hit: false,
        }
    }
}

/// The ball in flight. Exists only between launch and shot resolution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
}

impl Ball {
    /// A ball leaving the cannon muzzle
    pub fn launched(cannon: Vec2, params: LaunchParams) -> Self {
        Self {
            pos: cannon,
            vel: params.velocity(),
            radius: BALL_RADIUS,
        }
    }
}

/// Ephemeral launch parameters, produced by the aiming subsystem and
/// consumed once to spawn a ball
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LaunchParams {
    /// Radians from straight down, positive toward +x
    pub angle: f32,
    /// Muzzle speed, pixels per tick
    pub speed: f32,
}

impl LaunchParams {
    pub fn aimed(angle: f32) -> Self {
        Self {
            angle,
            speed: LAUNCH_SPEED,
        }
    }

    /// Initial velocity; +y points down the screen
    pub fn velocity(&self) -> Vec2 {
        Vec2::new(self.speed * self.angle.sin(), self.speed * self.angle.cos())
    }
}

/// Playfield extent; origin at the top-left, +y downward
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub width: f32,
    pub height: f32,
}

/// Things outer layers (renderer, audio, logs) may care about.
/// Accumulated per tick, drained by the shell.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Launched { angle: f32, zen: bool },
    PegHit { index: usize, kind: PegKind },
    BallDrained,
    BallSettled,
    PegRemoved { kind: PegKind },
    CriticalPromoted { index: usize },
    LevelWon,
    LevelLost,
}

/// Serializable RNG bookkeeping: a fresh PCG stream per draw site keeps
/// replays byte-identical without persisting generator internals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
    pub stream: u64,
}

impl RngState {
    pub fn new(seed: u64) -> Self {
        Self { seed, stream: 0 }
    }

    /// Next derived generator; every call advances the stream
    pub fn next_rng(&mut self) -> Pcg32 {
        self.stream += 1;
        Pcg32::new(self.seed, self.stream)
    }
}

/// Complete session state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: RngState,
    pub bounds: Bounds,
    /// Muzzle position; shots originate here
    pub cannon: Vec2,
    /// The live obstacle set, in level insertion order
    pub pegs: Vec<Peg>,
    /// Present only while a shot is in flight
    pub ball: Option<Ball>,
    pub phase: GamePhase,
    /// Top-boundary guard; armed at launch, dropped once the ball has fully
    /// separated from play (see `physics::step`)
    pub ceiling_armed: bool,
    /// Consecutive in-flight ticks at or below the settle speed
    pub low_speed_ticks: u32,
    /// Remaining drain delay while settling
    pub drain_ticks: u32,
    /// Cooldown until the next peg removal while clearing
    pub clear_cooldown: u32,
    pub shots_left: u32,
    /// Banked auto-aimed shots from Special pegs
    pub zen_shots: u32,
    /// Set when a Critical peg has been removed this session
    pub critical_cleared: bool,
    pub score: u64,
    /// The visible Bonus counter
    pub bonus_collected: u32,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Set exactly once, when the level resolves
    pub outcome: Option<LevelOutcome>,
    #[serde(skip)]
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Build a session from a level layout. Fails fast when the layout
    /// supplies fewer pegs than kind assignment needs.
    pub fn new(layout: &LevelLayout, seed: u64) -> Result<Self, LevelError> {
        layout.validate()?;

        let mut rng_state = RngState::new(seed);
        let mut pegs: Vec<Peg> = layout.pegs.iter().map(|&pos| Peg::new(pos)).collect();
        let mut rng = rng_state.next_rng();
        assign_kinds(&mut pegs, &mut rng);

        let bounds = layout.bounds;
        log::info!("level loaded: {} pegs, seed {}", pegs.len(), seed);

        Ok(Self {
            seed,
            rng: rng_state,
            bounds,
            cannon: Vec2::new(bounds.width / 2.0, 0.0),
            pegs,
            ball: None,
            phase: GamePhase::Aiming,
            ceiling_armed: false,
            low_speed_ticks: 0,
            drain_ticks: 0,
            clear_cooldown: 0,
            shots_left: SHOT_BUDGET,
            zen_shots: 0,
            critical_cleared: false,
            score: 0,
            bonus_collected: 0,
            time_ticks: 0,
            outcome: None,
            events: Vec::new(),
        })
    }

    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Hand accumulated events to the shell and reset the buffer
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

/// Designate Bonus and Special pegs among the seeds; the rest stay Normal.
/// Critical is promoted later, near the end of a session.
fn assign_kinds(pegs: &mut [Peg], rng: &mut Pcg32) {
    let mut order: Vec<usize> = (0..pegs.len()).collect();
    order.shuffle(rng);

    for &i in order.iter().take(BONUS_PEGS) {
        pegs[i].kind = PegKind::Bonus;
    }
    for &i in order.iter().skip(BONUS_PEGS).take(SPECIAL_PEGS) {
        pegs[i].kind = PegKind::Special;
    }
}
