//! Fixed timestep controller
//!
//! Orchestrates the shot lifecycle: aiming, flight, settling and peg
//! clearing. This is the only place peg state mutates - the integrator and
//! predictor just report contacts, and the controller decides what they
//! mean.

use glam::Vec2;
use rand::Rng;

use crate::consts::*;

use super::aim::{select_zen_shot, solve_launch_angle};
use super::collision::ContactKind;
use super::physics::step;
use super::state::{
    Ball, GameEvent, GamePhase, GameState, LaunchParams, LevelOutcome, PegKind,
};

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    /// Where the player is pointing, in playfield coordinates
    pub aim_point: Option<Vec2>,
    /// Fire the cannon (click/tap/space)
    pub launch: bool,
    /// Ask the zen heuristic to aim this launch
    pub zen: bool,
}

/// Advance the game state by one fixed timestep.
/// Launch input is honored only while aiming; a resolved level ignores
/// everything.
pub fn tick(state: &mut GameState, input: &TickInput) {
    if state.outcome.is_some() {
        return;
    }
    state.time_ticks += 1;

    match state.phase {
        GamePhase::Aiming => aiming(state, input),
        GamePhase::InFlight => in_flight(state),
        GamePhase::Settling => settling(state),
        GamePhase::Clearing => clearing(state),
    }
}

fn aiming(state: &mut GameState, input: &TickInput) {
    // A banked zen shot fires itself as soon as the field is ready, and
    // costs nothing from the budget
    if state.zen_shots > 0 {
        state.zen_shots -= 1;
        let angle = zen_angle(state).unwrap_or_else(|| player_angle(state, input));
        launch(state, LaunchParams::aimed(angle), true);
        return;
    }

    if !input.launch || state.shots_left == 0 {
        return;
    }
    state.shots_left -= 1;

    let angle = if input.zen { zen_angle(state) } else { None }
        .unwrap_or_else(|| player_angle(state, input));
    launch(state, LaunchParams::aimed(angle), input.zen);
}

/// The zen heuristic's pick for the current field, if it found one
fn zen_angle(state: &mut GameState) -> Option<f32> {
    let mut rng = state.rng.next_rng();
    select_zen_shot(state.cannon, &state.pegs, state.bounds, &mut rng, ZEN_SAMPLES)
}

/// The player's aim, straight down when the pointer has no solution
fn player_angle(state: &GameState, input: &TickInput) -> f32 {
    input
        .aim_point
        .and_then(|p| solve_launch_angle(state.cannon, p))
        .unwrap_or(0.0)
}

fn launch(state: &mut GameState, params: LaunchParams, zen: bool) {
    state.ball = Some(Ball::launched(state.cannon, params));
    state.ceiling_armed = true;
    state.low_speed_ticks = 0;
    state.phase = GamePhase::InFlight;
    log::info!(
        "launch: angle {:.3} rad{}, {} shots left",
        params.angle,
        if zen { " (zen)" } else { "" },
        state.shots_left
    );
    state.push_event(GameEvent::Launched {
        angle: params.angle,
        zen,
    });
}

fn in_flight(state: &mut GameState) {
    let Some(ball) = state.ball else {
        // No ball to fly; resolve the shot
        state.phase = GamePhase::Clearing;
        return;
    };

    let out = step(ball, &state.pegs, state.bounds, state.ceiling_armed, true);
    state.ceiling_armed = out.ceiling_armed;

    // First real contact flips a peg's hit flag, exactly once per peg;
    // predictive flights never reach this code
    for contact in &out.contacts {
        if let ContactKind::Peg { index } = contact.kind {
            apply_hit(state, index);
        }
    }

    state.ball = Some(out.ball);

    // Bottom exit: the ball is gone, give it a moment to drain
    if out.ball.pos.y - out.ball.radius > state.bounds.height {
        state.ball = None;
        state.ceiling_armed = false;
        state.drain_ticks = DRAIN_TICKS;
        state.phase = GamePhase::Settling;
        state.push_event(GameEvent::BallDrained);
        return;
    }

    // Rest detection: sustained low speed ends the shot in place
    if out.ball.vel.length() <= SETTLE_SPEED {
        state.low_speed_ticks += 1;
        if state.low_speed_ticks >= SETTLE_TICKS {
            state.ball = None;
            state.ceiling_armed = false;
            state.clear_cooldown = 0;
            state.phase = GamePhase::Clearing;
            state.push_event(GameEvent::BallSettled);
        }
    } else {
        state.low_speed_ticks = 0;
    }
}

/// Score and side effects for a peg's first contact
fn apply_hit(state: &mut GameState, index: usize) {
    let peg = &mut state.pegs[index];
    if peg.hit {
        return;
    }
    peg.hit = true;
    let kind = peg.kind;

    state.score += kind.score() as u64;
    match kind {
        PegKind::Bonus => state.bonus_collected += 1,
        PegKind::Special => state.zen_shots += 1,
        _ => {}
    }
    state.push_event(GameEvent::PegHit { index, kind });
}

fn settling(state: &mut GameState) {
    state.drain_ticks = state.drain_ticks.saturating_sub(1);
    if state.drain_ticks == 0 {
        state.clear_cooldown = 0;
        state.phase = GamePhase::Clearing;
    }
}

fn clearing(state: &mut GameState) {
    if state.clear_cooldown > 0 {
        state.clear_cooldown -= 1;
        return;
    }

    // Hit pegs leave one at a time, oldest first
    if let Some(index) = state.pegs.iter().position(|p| p.hit) {
        let peg = state.pegs.remove(index);
        state.clear_cooldown = CLEAR_INTERVAL_TICKS;
        if peg.kind == PegKind::Critical {
            state.critical_cleared = true;
        }
        state.push_event(GameEvent::PegRemoved { kind: peg.kind });
        return;
    }

    finish_shot(state);
}

/// End-of-shot bookkeeping once the board is swept
fn finish_shot(state: &mut GameState) {
    if state.critical_cleared || state.pegs.is_empty() {
        state.outcome = Some(LevelOutcome::Won);
        state.push_event(GameEvent::LevelWon);
        log::info!("level won: score {}, {} pegs left", state.score, state.pegs.len());
        return;
    }

    promote_critical(state);

    if state.shots_left == 0 && state.zen_shots == 0 {
        state.outcome = Some(LevelOutcome::Lost);
        state.push_event(GameEvent::LevelLost);
        log::info!("level lost: score {}, {} pegs left", state.score, state.pegs.len());
        return;
    }

    state.phase = GamePhase::Aiming;
}

/// Late-game goal: once the board is small and no Critical peg is alive,
/// exactly one surviving Normal peg becomes the level-ender
fn promote_critical(state: &mut GameState) {
    if state.pegs.len() > CRITICAL_PROMOTION_AT {
        return;
    }
    if state.pegs.iter().any(|p| p.kind == PegKind::Critical) {
        return;
    }

    let normals: Vec<usize> = state
        .pegs
        .iter()
        .enumerate()
        .filter(|(_, p)| p.kind == PegKind::Normal)
        .map(|(i, _)| i)
        .collect();
    if normals.is_empty() {
        return;
    }

    let mut rng = state.rng.next_rng();
    let index = normals[rng.random_range(0..normals.len())];
    state.pegs[index].kind = PegKind::Critical;
    state.push_event(GameEvent::CriticalPromoted { index });
    log::info!("peg {} promoted to critical, {} pegs left", index, state.pegs.len());
}
