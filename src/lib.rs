//! Pegfall - a Peggle-style peg shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, collisions, aiming, game state)
//! - `level`: Level layouts (raster scan or procedural)
//!
//! Rendering, input devices and audio are deliberately absent: the simulation
//! consumes launch/aim commands and emits geometry and events, and whatever
//! shell hosts it decides how to present them.

pub mod level;
pub mod sim;

pub use level::{LevelError, LevelLayout};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Playfield width in pixels
    pub const PLAYFIELD_WIDTH: f32 = 800.0;
    /// Playfield height in pixels
    pub const PLAYFIELD_HEIGHT: f32 = 800.0;

    /// Gravity, pixels per tick squared
    pub const GRAVITY: f32 = 0.4;
    /// Muzzle speed of the cannon, pixels per tick
    pub const LAUNCH_SPEED: f32 = 10.0;
    /// Widest launch angle, radians from straight down
    pub const ANGLE_LIMIT: f32 = std::f32::consts::FRAC_PI_2 + 0.1;

    /// Ball and peg radius; every round body in the game shares one size
    pub const BALL_RADIUS: f32 = 16.0;
    /// Fraction of speed kept after a bounce
    pub const RESTITUTION: f32 = 0.7;

    /// Trajectory prediction horizon in ticks
    pub const MAX_PREDICT_STEPS: usize = 600;
    /// Candidate angles sampled per zen shot
    pub const ZEN_SAMPLES: usize = 300;

    /// Speed at or below which the ball counts as resting, pixels per tick
    pub const SETTLE_SPEED: f32 = 2.0;
    /// Consecutive resting ticks before the shot is considered over
    pub const SETTLE_TICKS: u32 = 60;
    /// Drain delay after the ball leaves the playfield, in ticks
    pub const DRAIN_TICKS: u32 = 30;
    /// Ticks between peg removals during the clearing phase
    pub const CLEAR_INTERVAL_TICKS: u32 = 6;

    /// Shots the player starts a level with
    pub const SHOT_BUDGET: u32 = 10;
    /// Bonus pegs designated at level load
    pub const BONUS_PEGS: usize = 4;
    /// Special pegs designated at level load
    pub const SPECIAL_PEGS: usize = 2;
    /// Fewest pegs a layout may supply: kind assignment must succeed and at
    /// least one Normal peg must remain promotable to Critical
    pub const MIN_PEGS: usize = BONUS_PEGS + SPECIAL_PEGS + 1;
    /// Board size at or below which a Critical peg gets promoted
    pub const CRITICAL_PROMOTION_AT: usize = 10;
}

/// Squared euclidean distance between two points
#[inline]
pub fn squared_distance(a: Vec2, b: Vec2) -> f32 {
    let d = b - a;
    d.x * d.x + d.y * d.y
}

/// True iff two circles overlap (touching counts)
#[inline]
pub fn circles_overlap(c1: Vec2, r1: f32, c2: Vec2, r2: f32) -> bool {
    let reach = r1 + r2;
    squared_distance(c1, c2) <= reach * reach
}
