//! Static potential landscapes.
//!
//! Each grid cell `(i, j)` is mapped into a square of side [`POTENTIAL_SCALE`]
//! centred on the grid:
//!
//! ```text
//! x = (i / W - 0.5) * S
//! y = (j / H - 0.5) * S
//! r = sqrt(x² + y²)
//! ```
//!
//! and the selected [`PotentialFamily`] is evaluated there.

use instanton_core::error::EngineError;
use instanton_core::field::Field;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

/// Side length of the continuous coordinate square the grid is mapped onto.
pub const POTENTIAL_SCALE: f64 = 4.0;
/// Below this radius `ripple` evaluates to 0 instead of `sin(3r)/r`.
const RIPPLE_CORE_RADIUS: f64 = 0.1;

/// Analytic potential families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PotentialFamily {
    /// `0.5 r² - 0.25 r⁴`
    MexicanHat,
    /// `0.5 r²`
    Harmonic,
    /// `(x² - 1)²`
    DoubleWell,
    /// `sin(2πx) + sin(2πy)`
    Sinusoidal,
    /// `sin(3r) / r`, zero inside `r <= 0.1`
    Ripple,
    /// `r sin(3θ)`
    Spiral,
}

impl PotentialFamily {
    /// Every family, in menu order.
    pub const ALL: [PotentialFamily; 6] = [
        PotentialFamily::MexicanHat,
        PotentialFamily::Harmonic,
        PotentialFamily::DoubleWell,
        PotentialFamily::Sinusoidal,
        PotentialFamily::Ripple,
        PotentialFamily::Spiral,
    ];

    /// The snake_case tag of this family.
    pub fn name(self) -> &'static str {
        match self {
            PotentialFamily::MexicanHat => "mexican_hat",
            PotentialFamily::Harmonic => "harmonic",
            PotentialFamily::DoubleWell => "double_well",
            PotentialFamily::Sinusoidal => "sinusoidal",
            PotentialFamily::Ripple => "ripple",
            PotentialFamily::Spiral => "spiral",
        }
    }

    /// Parses a snake_case tag.
    ///
    /// Returns `EngineError::UnsupportedVariant` for anything else.
    pub fn from_name(name: &str) -> Result<Self, EngineError> {
        Self::ALL
            .into_iter()
            .find(|family| family.name() == name)
            .ok_or_else(|| EngineError::UnsupportedVariant {
                kind: "potential family",
                name: name.to_string(),
            })
    }

    /// Evaluates the potential at continuous coordinates `(x, y)`.
    pub fn evaluate(self, x: f64, y: f64) -> f64 {
        let r = (x * x + y * y).sqrt();
        match self {
            PotentialFamily::MexicanHat => 0.5 * r * r - 0.25 * r * r * r * r,
            PotentialFamily::Harmonic => 0.5 * r * r,
            PotentialFamily::DoubleWell => (x * x - 1.0).powi(2),
            PotentialFamily::Sinusoidal => (2.0 * PI * x).sin() + (2.0 * PI * y).sin(),
            PotentialFamily::Ripple => {
                if r > RIPPLE_CORE_RADIUS {
                    (3.0 * r).sin() / r
                } else {
                    0.0
                }
            }
            PotentialFamily::Spiral => r * (3.0 * y.atan2(x)).sin(),
        }
    }
}

impl fmt::Display for PotentialFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PotentialFamily {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s)
    }
}

/// Continuous coordinates of grid cell `(i, j)` on a `width × height` grid.
pub fn cell_coordinates(i: usize, j: usize, width: usize, height: usize) -> (f64, f64) {
    let x = (i as f64 / width as f64 - 0.5) * POTENTIAL_SCALE;
    let y = (j as f64 / height as f64 - 0.5) * POTENTIAL_SCALE;
    (x, y)
}

/// Overwrites every cell of `potential` with `family` evaluated at that cell.
pub fn fill_potential(potential: &mut Field, family: PotentialFamily) {
    let w = potential.width();
    let h = potential.height();
    for (idx, value) in potential.data_mut().iter_mut().enumerate() {
        let (x, y) = cell_coordinates(idx % w, idx / w, w, h);
        *value = family.evaluate(x, y);
    }
}
