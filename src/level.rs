//! Level layouts
//!
//! A level is a finite list of peg anchor points plus playfield bounds,
//! nothing more. The canonical source is a raster image scanned for the
//! magenta marker color, one pixel per peg (the marker names the peg
//! sprite's top-left corner, so the scan converts anchors to centers); a
//! procedural layout covers headless runs and tests.

use std::fmt;
use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::{BALL_RADIUS, MIN_PEGS, PLAYFIELD_HEIGHT, PLAYFIELD_WIDTH};
use crate::sim::Bounds;

/// Marker color for a peg anchor in a layout raster
pub const PEG_MARKER: [u8; 3] = [255, 0, 255];

/// Why a layout could not be used
#[derive(Debug)]
pub enum LevelError {
    /// Fewer pegs than kind assignment requires; fatal at load time
    TooFewPegs { found: usize, required: usize },
    /// The layout raster could not be read or decoded
    Image(image::ImageError),
}

impl fmt::Display for LevelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LevelError::TooFewPegs { found, required } => write!(
                f,
                "layout supplies {found} pegs but the simulation needs at least {required}"
            ),
            LevelError::Image(err) => write!(f, "could not read layout raster: {err}"),
        }
    }
}

impl std::error::Error for LevelError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LevelError::Image(err) => Some(err),
            _ => None,
        }
    }
}

impl From<image::ImageError> for LevelError {
    fn from(err: image::ImageError) -> Self {
        LevelError::Image(err)
    }
}

/// Peg seed positions and the playfield they live in
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelLayout {
    pub bounds: Bounds,
    /// Peg centers, in scan order
    pub pegs: Vec<Vec2>,
}

impl LevelLayout {
    /// Scan a raster for marker pixels. The image dimensions become the
    /// playfield bounds; each marker becomes a peg centered one radius in
    /// from its anchor.
    pub fn from_image(path: &Path) -> Result<Self, LevelError> {
        let raster = image::open(path)?.to_rgb8();
        let (width, height) = raster.dimensions();

        let mut pegs = Vec::new();
        for (x, y, pixel) in raster.enumerate_pixels() {
            if pixel.0 == PEG_MARKER {
                pegs.push(Vec2::new(x as f32 + BALL_RADIUS, y as f32 + BALL_RADIUS));
            }
        }
        log::info!("scanned {path:?}: {}x{}, {} pegs", width, height, pegs.len());

        let layout = Self {
            bounds: Bounds {
                width: width as f32,
                height: height as f32,
            },
            pegs,
        };
        layout.validate()?;
        Ok(layout)
    }

    /// Staggered grid on the default playfield, for headless runs and tests
    pub fn staggered(rows: usize, cols: usize) -> Self {
        let bounds = Bounds {
            width: PLAYFIELD_WIDTH,
            height: PLAYFIELD_HEIGHT,
        };

        let spacing_x = 80.0;
        let spacing_y = 90.0;
        let top = 250.0;
        let left = (bounds.width - spacing_x * (cols.saturating_sub(1)) as f32) / 2.0;

        let mut pegs = Vec::with_capacity(rows * cols);
        for row in 0..rows {
            let offset = if row % 2 == 0 { 0.0 } else { spacing_x / 2.0 };
            for col in 0..cols {
                pegs.push(Vec2::new(
                    left + offset + spacing_x * col as f32,
                    top + spacing_y * row as f32,
                ));
            }
        }

        Self { bounds, pegs }
    }

    /// The simulation's load-time precondition: enough pegs for kind
    /// assignment plus one promotable Normal peg
    pub fn validate(&self) -> Result<(), LevelError> {
        if self.pegs.len() < MIN_PEGS {
            return Err(LevelError::TooFewPegs {
                found: self.pegs.len(),
                required: MIN_PEGS,
            });
        }
        Ok(())
    }
}
