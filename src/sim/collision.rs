//! Collision detection for the peg field
//!
//! The tricky part of Pegfall: a moving ball against a field of circular
//! pegs, plus flat boundaries that have to speak the same circle contract so
//! the response code never branches on obstacle shape.
//!
//! Detection is PURE. Hit-marking is a controller action applied afterwards,
//! which is what lets the predictor share this exact code path safely.

use glam::Vec2;

use crate::circles_overlap;

use super::state::{Bounds, Peg};

/// What the ball is touching
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactKind {
    /// A live peg, by index into the obstacle set
    Peg { index: usize },
    /// A side wall, synthesized per-check
    Wall,
    /// The top boundary, only while the ceiling guard is armed
    Ceiling,
}

/// A single overlap found at a candidate position
#[derive(Debug, Clone, Copy)]
pub struct Contact {
    pub center: Vec2,
    pub radius: f32,
    pub kind: ContactKind,
}

/// Find every obstacle overlapping a ball at `pos`.
///
/// Pegs are reported in insertion order, then at most one side wall, then
/// the ceiling. Hit pegs keep colliding until the controller removes them.
/// Simultaneous overlaps are all returned; the integrator averages them
/// into a single contact.
pub fn detect(
    pos: Vec2,
    ball_radius: f32,
    pegs: &[Peg],
    bounds: Bounds,
    ceiling_armed: bool,
) -> Vec<Contact> {
    let mut contacts = Vec::new();

    for (index, peg) in pegs.iter().enumerate() {
        if circles_overlap(pos, ball_radius, peg.pos, peg.radius) {
            contacts.push(Contact {
                center: peg.pos,
                radius: peg.radius,
                kind: ContactKind::Peg { index },
            });
        }
    }

    // Side walls engage once the ball's center has crossed the boundary;
    // only the crossed side is checked. The virtual circle sits mirrored
    // behind the wall so the averaged response pushes the ball back to edge
    // contact with the flat boundary.
    if pos.x < 0.0 {
        contacts.push(Contact {
            center: Vec2::new(-ball_radius, pos.y),
            radius: ball_radius,
            kind: ContactKind::Wall,
        });
    } else if pos.x > bounds.width {
        contacts.push(Contact {
            center: Vec2::new(bounds.width + ball_radius, pos.y),
            radius: ball_radius,
            kind: ContactKind::Wall,
        });
    }

    if ceiling_armed && pos.y < 0.0 {
        contacts.push(Contact {
            center: Vec2::new(pos.x, -ball_radius),
            radius: ball_radius,
            kind: ContactKind::Ceiling,
        });
    }

    contacts
}
