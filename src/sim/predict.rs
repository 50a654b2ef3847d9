//! Shot trajectory prediction
//!
//! Speculative flight for the aim-guide overlay and the zen-shot search.
//! Runs the same integrator as real flight against a borrowed peg set, so
//! a prediction can never mark a peg hit; the horizon bound is what keeps
//! a trajectory that never satisfies its stop condition from looping
//! forever.

use glam::Vec2;

use super::collision::{Contact, ContactKind};
use super::physics::step;
use super::state::{Ball, Bounds, Peg};

/// Lazy iterator over future ball snapshots.
///
/// Each `next` advances one simulated tick and yields the post-step
/// position together with the obstacles touched on the way. Every
/// `Trajectory` is independent: restarting a prediction is just building a
/// new one.
pub struct Trajectory<'a> {
    ball: Ball,
    pegs: &'a [Peg],
    bounds: Bounds,
    ceiling_armed: bool,
    remaining: usize,
}

impl<'a> Trajectory<'a> {
    /// Predict from a launch state, at most `max_steps` ticks.
    /// The ceiling guard starts armed, exactly as a real launch does.
    pub fn new(ball: Ball, pegs: &'a [Peg], bounds: Bounds, max_steps: usize) -> Self {
        Self {
            ball,
            pegs,
            bounds,
            ceiling_armed: true,
            remaining: max_steps,
        }
    }
}

/// One predicted tick
#[derive(Debug, Clone)]
pub struct Snapshot {
    /// Ball position after the tick
    pub pos: Vec2,
    /// Obstacles touched during the tick
    pub contacts: Vec<Contact>,
}

impl Iterator for Trajectory<'_> {
    type Item = Snapshot;

    fn next(&mut self) -> Option<Snapshot> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;

        let out = step(self.ball, self.pegs, self.bounds, self.ceiling_armed, true);
        self.ball = out.ball;
        self.ceiling_armed = out.ceiling_armed;

        Some(Snapshot {
            pos: out.ball.pos,
            contacts: out.contacts,
        })
    }
}

/// A collected prediction
#[derive(Debug, Clone, Default)]
pub struct PredictedPath {
    /// Future positions, one per tick, in order
    pub points: Vec<Vec2>,
    /// Distinct pegs touched, in first-contact order
    pub pegs_hit: Vec<usize>,
}

/// Run the predictor until `stop` is satisfied or the horizon runs out.
/// The stopping snapshot is included, so a guide polyline reaches its
/// terminal point.
pub fn predict_path(
    ball: Ball,
    pegs: &[Peg],
    bounds: Bounds,
    max_steps: usize,
    mut stop: impl FnMut(&Snapshot) -> bool,
) -> PredictedPath {
    let mut path = PredictedPath::default();

    for snapshot in Trajectory::new(ball, pegs, bounds, max_steps) {
        for contact in &snapshot.contacts {
            if let ContactKind::Peg { index } = contact.kind {
                if !path.pegs_hit.contains(&index) {
                    path.pegs_hit.push(index);
                }
            }
        }
        let done = stop(&snapshot);
        path.points.push(snapshot.pos);
        if done {
            break;
        }
    }

    path
}
