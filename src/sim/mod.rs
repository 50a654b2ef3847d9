//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - No rendering or platform dependencies
//!
//! The controller in `tick` owns the peg set; the integrator and predictor
//! borrow it read-only, so speculative flights (aim guide, zen-shot search)
//! can never leak into the real game.

pub mod aim;
pub mod collision;
pub mod physics;
pub mod predict;
pub mod state;
pub mod tick;

pub use aim::{aim_guide, select_zen_shot, solve_launch_angle};
pub use collision::{Contact, ContactKind, detect};
pub use physics::{StepOutcome, reflect, step};
pub use predict::{PredictedPath, Snapshot, Trajectory, predict_path};
pub use state::{
    Ball, Bounds, GameEvent, GamePhase, GameState, LaunchParams, LevelOutcome, Peg, PegKind,
    RngState,
};
pub use tick::{TickInput, tick};
