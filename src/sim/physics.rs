//! One-step ball physics
//!
//! Position integration under constant gravity, with contact response
//! resolved in place before the integration applies. The response is the
//! other tricky half of Pegfall: simultaneous overlaps collapse into one
//! averaged contact, the ball gets pushed out to exact touch, and the
//! velocity reflects specularly about the contact normal with a fixed
//! restitution.

use glam::Vec2;

use crate::consts::{GRAVITY, RESTITUTION};

use super::collision::{Contact, detect};
use super::state::{Ball, Bounds, Peg};

/// Result of advancing the ball one tick
#[derive(Debug, Clone)]
pub struct StepOutcome {
    pub ball: Ball,
    /// Obstacles the ball was touching at the start of the step
    pub contacts: Vec<Contact>,
    /// Ceiling guard state after this step
    pub ceiling_armed: bool,
}

/// Advance one fixed timestep.
///
/// Order matters and is pinned by tests: detect at the current position,
/// resolve any contact (nudge + reflect) in place, update the ceiling
/// guard, then integrate unconditionally (`pos += vel; vel.y += G`).
pub fn step(
    mut ball: Ball,
    pegs: &[Peg],
    bounds: Bounds,
    ceiling_armed: bool,
    in_flight: bool,
) -> StepOutcome {
    let contacts = detect(ball.pos, ball.radius, pegs, bounds, ceiling_armed);

    if !contacts.is_empty() {
        let (pos, vel) = resolve(ball.pos, ball.vel, ball.radius, &contacts);
        ball.pos = pos;
        ball.vel = vel;
    }

    // The guard stays up only while a shot is live and was already armed or
    // contact is ongoing; one clean step outside a live shot drops it.
    let ceiling_armed = in_flight && (ceiling_armed || !contacts.is_empty());

    ball.pos += ball.vel;
    ball.vel.y += GRAVITY;

    StepOutcome {
        ball,
        contacts,
        ceiling_armed,
    }
}

/// Specular reflection about a unit normal: `v' = v - 2(v.n)n`
#[inline]
pub fn reflect(vel: Vec2, normal: Vec2) -> Vec2 {
    vel - 2.0 * vel.dot(normal) * normal
}

/// Collapse simultaneous contacts into one averaged contact and resolve it.
///
/// The ball lands on the averaged surface at exact touch (no residual
/// penetration, no gap) and leaves with the reflected velocity scaled by
/// the restitution.
fn resolve(pos: Vec2, vel: Vec2, ball_radius: f32, contacts: &[Contact]) -> (Vec2, Vec2) {
    let n = contacts.len() as f32;
    let centroid = contacts.iter().map(|c| c.center).sum::<Vec2>() / n;
    let mean_radius = contacts.iter().map(|c| c.radius).sum::<f32>() / n;

    let normal = contact_normal(pos, vel, centroid);

    let nudged = centroid + normal * (ball_radius + mean_radius);
    let reflected = reflect(vel, normal) * RESTITUTION;

    (nudged, reflected)
}

/// Unit normal from the averaged contact toward the ball center.
///
/// A coincident centroid has no usable direction: oppose the velocity
/// instead, or point straight up when the ball is also motionless. Keeps
/// the response finite for every input.
fn contact_normal(pos: Vec2, vel: Vec2, centroid: Vec2) -> Vec2 {
    let d = pos - centroid;
    if d.length_squared() > f32::EPSILON {
        d.normalize()
    } else if vel.length_squared() > f32::EPSILON {
        -vel.normalize()
    } else {
        Vec2::NEG_Y
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::BALL_RADIUS;
    use crate::sim::collision::ContactKind;
    use crate::sim::state::Peg;

    fn bounds() -> Bounds {
        Bounds {
            width: 800.0,
            height: 800.0,
        }
    }

    fn ball(pos: Vec2, vel: Vec2) -> Ball {
        Ball {
            pos,
            vel,
            radius: BALL_RADIUS,
        }
    }

    #[test]
    fn test_free_fall_is_exact() {
        let b = ball(Vec2::new(400.0, 100.0), Vec2::new(3.0, 0.0));
        let out = step(b, &[], bounds(), false, true);

        assert!(out.contacts.is_empty());
        // Position integrates the pre-gravity velocity
        assert_eq!(out.ball.pos, b.pos + b.vel);
        assert_eq!(out.ball.vel.x, b.vel.x);
        assert_eq!(out.ball.vel.y - b.vel.y, GRAVITY);

        // And again with an already-falling ball (float rounding tolerated)
        let b = ball(Vec2::new(400.0, 100.0), Vec2::new(3.0, 5.0));
        let out = step(b, &[], bounds(), false, true);
        assert_eq!(out.ball.pos, b.pos + b.vel);
        assert!((out.ball.vel.y - b.vel.y - GRAVITY).abs() < 1e-6);
    }

    #[test]
    fn test_drop_onto_peg_bounces_up_at_restitution() {
        // Ball at (400, 0) falling at 10 px/tick onto a peg at (400, 100)
        let pegs = vec![Peg::new(Vec2::new(400.0, 100.0))];
        let mut b = ball(Vec2::new(400.0, 0.0), Vec2::new(0.0, 10.0));
        let mut armed = true;

        let mut bounced = None;
        for _ in 0..64 {
            let incoming = b.vel.length();
            let out = step(b, &pegs, bounds(), armed, true);
            if !out.contacts.is_empty() {
                bounced = Some((incoming, out.ball.vel));
                break;
            }
            b = out.ball;
            armed = out.ceiling_armed;
        }

        let (incoming, vel) = bounced.expect("ball never reached the peg");
        // Vertical component flips upward; speed lands near restitution x
        // incoming (the step folds one gravity increment in afterwards)
        assert!(vel.y < 0.0);
        assert!((vel.length() - RESTITUTION * incoming).abs() <= GRAVITY + 1e-3);
    }

    #[test]
    fn test_nudge_restores_exact_touch() {
        // Motionless overlapping ball: the post-step position is exactly the
        // nudged one, two radii from the peg center
        let pegs = vec![Peg::new(Vec2::new(400.0, 400.0))];
        let b = ball(Vec2::new(400.0, 380.0), Vec2::ZERO);

        let out = step(b, &pegs, bounds(), false, true);
        assert_eq!(out.contacts.len(), 1);
        let dist = (out.ball.pos - pegs[0].pos).length();
        assert!((dist - 2.0 * BALL_RADIUS).abs() < 1e-3);
    }

    #[test]
    fn test_multi_contact_averages_centers() {
        // Two pegs symmetric about x = 400; the averaged normal is vertical
        let pegs = vec![
            Peg::new(Vec2::new(390.0, 400.0)),
            Peg::new(Vec2::new(410.0, 400.0)),
        ];
        let b = ball(Vec2::new(400.0, 378.0), Vec2::new(0.0, 6.0));

        let out = step(b, &pegs, bounds(), false, true);
        assert_eq!(out.contacts.len(), 2);
        // Reflected velocity is vertical (tangential x stays zero), pointing up
        assert!(out.ball.vel.x.abs() < 1e-3);
        assert!(out.ball.vel.y < GRAVITY);
    }

    #[test]
    fn test_wall_contact_pushes_back_inside() {
        let b = ball(Vec2::new(-2.0, 300.0), Vec2::new(-4.0, 2.0));
        let out = step(b, &[], bounds(), false, true);

        assert_eq!(out.contacts.len(), 1);
        assert_eq!(out.contacts[0].kind, ContactKind::Wall);
        // Horizontal velocity reverses off the vertical wall
        assert!(out.ball.vel.x > 0.0);
    }

    #[test]
    fn test_degenerate_centroid_stays_finite() {
        // Ball center exactly on the peg center: no direction to the contact
        let pegs = vec![Peg::new(Vec2::new(400.0, 400.0))];

        let moving = ball(Vec2::new(400.0, 400.0), Vec2::new(0.0, 8.0));
        let out = step(moving, &pegs, bounds(), false, true);
        assert!(out.ball.pos.is_finite());
        assert!(out.ball.vel.is_finite());
        // Normal opposes the velocity, so the ball backs out upward
        assert!(out.ball.vel.y < 0.0);

        let still = ball(Vec2::new(400.0, 400.0), Vec2::ZERO);
        let out = step(still, &pegs, bounds(), false, true);
        assert!(out.ball.pos.is_finite());
        // Straight-up fallback
        assert!(out.ball.pos.y < 400.0);
    }

    #[test]
    fn test_ceiling_guard_drops_after_clean_step() {
        let b = ball(Vec2::new(400.0, 300.0), Vec2::new(0.0, 5.0));

        // In flight, no contact: stays armed
        let out = step(b, &[], bounds(), true, true);
        assert!(out.ceiling_armed);

        // Not in flight: disarms even without contact
        let out = step(b, &[], bounds(), true, false);
        assert!(!out.ceiling_armed);

        // Unarmed and untouched stays unarmed
        let out = step(b, &[], bounds(), false, true);
        assert!(!out.ceiling_armed);
    }

    #[test]
    fn test_ceiling_reflects_downward_when_armed() {
        let b = ball(Vec2::new(400.0, -3.0), Vec2::new(1.0, -9.0));
        let out = step(b, &[], bounds(), true, true);

        assert_eq!(out.contacts.len(), 1);
        assert!(out.ball.vel.y > 0.0);
    }

    #[test]
    fn test_reflect_identities() {
        // Head-on against a vertical wall
        let v = reflect(Vec2::new(10.0, 0.0), Vec2::new(-1.0, 0.0));
        assert!((v.x + 10.0).abs() < 1e-6 && v.y.abs() < 1e-6);

        // Grazing contact leaves the tangential component alone
        let v = reflect(Vec2::new(3.0, 4.0), Vec2::new(0.0, -1.0));
        assert!((v.x - 3.0).abs() < 1e-6);
        assert!((v.y + 4.0).abs() < 1e-6);
    }
}
