//! Aiming: the closed-form launch solver and the zen-shot search
//!
//! The solver inverts the unpowered parabola so the cannon can point at
//! whatever the pointer hovers over; the zen selector samples near-peg
//! targets and keeps whichever launch angle the predictor scores highest.
//! Both report "no solution" through `Option`, never through errors.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use crate::consts::{ANGLE_LIMIT, BALL_RADIUS, GRAVITY, LAUNCH_SPEED, MAX_PREDICT_STEPS};

use super::predict::predict_path;
use super::state::{Ball, Bounds, GameState, LaunchParams, Peg};

/// Launch angle that sends the unpowered parabola through `target`.
///
/// Angles are radians from straight down, positive toward +x. `None` when
/// the target is out of reach of the muzzle speed, outside the firing cone,
/// or level with the cannon (the solver's degenerate row - a normal
/// outcome, callers fall back to their previous aim).
pub fn solve_launch_angle(cannon: Vec2, target: Vec2) -> Option<f32> {
    let mut dx = target.x - cannon.x;
    let dy = target.y - cannon.y;
    if dy == 0.0 {
        return None;
    }

    // Solve in the +x half plane and mirror the result back
    let mirrored = dx < 0.0;
    if mirrored {
        dx = -dx;
    }

    let reach = dy - GRAVITY * dx * dx / (LAUNCH_SPEED * LAUNCH_SPEED);
    let ratio = reach / (dx * dx + dy * dy).sqrt();
    if !(-1.0..=1.0).contains(&ratio) {
        return None;
    }

    let angle = (ratio.acos() + (dx / dy).atan()) / 2.0;
    if angle > ANGLE_LIMIT {
        return None;
    }

    Some(if mirrored { -angle } else { angle })
}

/// Pick the launch angle whose predicted flight strikes the most distinct
/// pegs.
///
/// Samples `samples` candidate targets, each jittered uniformly inside a
/// ball-diameter square around a randomly chosen live peg, and scores every
/// solvable candidate with a full-horizon prediction. Ties keep the first
/// find, so a given RNG state always yields the same shot. `None` when
/// there is nothing to sample or no candidate is reachable - the caller
/// falls back to the player's aim.
pub fn select_zen_shot(
    cannon: Vec2,
    pegs: &[Peg],
    bounds: Bounds,
    rng: &mut Pcg32,
    samples: usize,
) -> Option<f32> {
    if pegs.is_empty() {
        return None;
    }

    let mut best: Option<(f32, usize)> = None;
    for _ in 0..samples {
        let peg = &pegs[rng.random_range(0..pegs.len())];
        let target = peg.pos
            + Vec2::new(
                rng.random_range(-BALL_RADIUS..BALL_RADIUS),
                rng.random_range(-BALL_RADIUS..BALL_RADIUS),
            );

        let Some(angle) = solve_launch_angle(cannon, target) else {
            continue;
        };

        let ball = Ball::launched(cannon, LaunchParams::aimed(angle));
        let path = predict_path(ball, pegs, bounds, MAX_PREDICT_STEPS, |_| false);
        let count = path.pegs_hit.len();

        if best.is_none_or(|(_, best_count)| count > best_count) {
            best = Some((angle, count));
        }
    }

    best.map(|(angle, _)| angle)
}

/// Aim-guide polyline for the renderer: the predicted flight toward the
/// pointer, cut at the pointer's height or at the first contact. Falls back
/// to a straight drop when the pointer has no solution.
pub fn aim_guide(state: &GameState, pointer: Vec2) -> Vec<Vec2> {
    let angle = solve_launch_angle(state.cannon, pointer).unwrap_or(0.0);
    let ball = Ball::launched(state.cannon, LaunchParams::aimed(angle));

    predict_path(ball, &state.pegs, state.bounds, MAX_PREDICT_STEPS, |s| {
        s.pos.y >= pointer.y || !s.contacts.is_empty()
    })
    .points
}
