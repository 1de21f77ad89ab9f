//! Instanton seed profiles.
//!
//! A seed is a localized bump added into the field around a centre cell.
//! All shapes share one amplitude and one radius; only the radial (or, for
//! the spiral, angular) profile differs.

use instanton_core::error::EngineError;
use instanton_core::field::Field;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Peak contribution of every seed shape.
pub const SEED_AMPLITUDE: f64 = 1.0;
/// Characteristic radius of every seed shape, in cells.
pub const SEED_RADIUS: f64 = 15.0;
/// Half-width of the `ring` band around [`SEED_RADIUS`], in cells.
pub const RING_WIDTH: f64 = 5.0;

/// Seed shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeedShape {
    /// `A exp(-d² / 2R²)`
    Gaussian,
    /// `A / cosh(d / R)`, the soliton profile.
    Sech,
    /// `A` inside `d < R`, 0 outside.
    Tophat,
    /// `A` where `|d - R| < ring width`, 0 elsewhere.
    Ring,
    /// `A exp(-d/R) sin(3φ + 0.1 d)`
    SpiralSeed,
}

impl SeedShape {
    /// Every shape, in menu order.
    pub const ALL: [SeedShape; 5] = [
        SeedShape::Gaussian,
        SeedShape::Sech,
        SeedShape::Tophat,
        SeedShape::Ring,
        SeedShape::SpiralSeed,
    ];

    /// The snake_case tag of this shape.
    pub fn name(self) -> &'static str {
        match self {
            SeedShape::Gaussian => "gaussian",
            SeedShape::Sech => "sech",
            SeedShape::Tophat => "tophat",
            SeedShape::Ring => "ring",
            SeedShape::SpiralSeed => "spiral_seed",
        }
    }

    /// Parses a snake_case tag.
    ///
    /// Returns `EngineError::UnsupportedVariant` for anything else.
    pub fn from_name(name: &str) -> Result<Self, EngineError> {
        Self::ALL
            .into_iter()
            .find(|shape| shape.name() == name)
            .ok_or_else(|| EngineError::UnsupportedVariant {
                kind: "seed shape",
                name: name.to_string(),
            })
    }

    /// Contribution at offset `(dx, dy)` cells from the seed centre.
    pub fn contribution(self, dx: f64, dy: f64) -> f64 {
        let dist = (dx * dx + dy * dy).sqrt();
        match self {
            SeedShape::Gaussian => {
                SEED_AMPLITUDE * (-dist * dist / (2.0 * SEED_RADIUS * SEED_RADIUS)).exp()
            }
            SeedShape::Sech => SEED_AMPLITUDE / (dist / SEED_RADIUS).cosh(),
            SeedShape::Tophat => {
                if dist < SEED_RADIUS {
                    SEED_AMPLITUDE
                } else {
                    0.0
                }
            }
            SeedShape::Ring => {
                if (dist - SEED_RADIUS).abs() < RING_WIDTH {
                    SEED_AMPLITUDE
                } else {
                    0.0
                }
            }
            SeedShape::SpiralSeed => {
                let angle = dy.atan2(dx);
                SEED_AMPLITUDE * (-dist / SEED_RADIUS).exp() * (3.0 * angle + dist * 0.1).sin()
            }
        }
    }
}

impl fmt::Display for SeedShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SeedShape {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s)
    }
}

/// Adds the `shape` profile centred on `(cx, cy)` into every cell of `field`.
///
/// The centre may lie outside the grid; only cells inside the array receive
/// a contribution.
pub fn superpose(field: &mut Field, shape: SeedShape, cx: isize, cy: isize) {
    let w = field.width();
    for (idx, value) in field.data_mut().iter_mut().enumerate() {
        let dx = (idx % w) as f64 - cx as f64;
        let dy = (idx / w) as f64 - cy as f64;
        *value += shape.contribution(dx, dy);
    }
}
