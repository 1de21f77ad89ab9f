#![deny(unsafe_code)]
//! Turns simulation layers into 8-bit images.
//!
//! A single layer is normalized to its own finite min/max and written as
//! grayscale. The composite view packs phi, gradient and potential into the
//! red, green and blue channels and marks every instanton. The conversion in
//! [`pixel`] is always available; PNG output in [`snapshot`] sits behind the
//! `png` feature (default on).

pub mod pixel;

#[cfg(feature = "png")]
pub mod snapshot;

use instanton_core::error::EngineError;
use instanton_core::field::Field;
use instanton_core::Engine;
use std::fmt;
use std::str::FromStr;

/// What to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Layer {
    /// RGB view of all three arrays plus instanton markers.
    #[default]
    Composite,
    /// The evolving field amplitude.
    Phi,
    Gradient,
    Potential,
}

impl Layer {
    pub const ALL: [Layer; 4] = [Layer::Composite, Layer::Phi, Layer::Gradient, Layer::Potential];

    pub fn name(self) -> &'static str {
        match self {
            Layer::Composite => "composite",
            Layer::Phi => "phi",
            Layer::Gradient => "gradient",
            Layer::Potential => "potential",
        }
    }

    /// Returns `EngineError::UnsupportedVariant` for an unknown tag.
    pub fn from_name(name: &str) -> Result<Self, EngineError> {
        Layer::ALL
            .into_iter()
            .find(|layer| layer.name() == name)
            .ok_or_else(|| EngineError::UnsupportedVariant {
                kind: "layer",
                name: name.to_string(),
            })
    }

    /// Picks this layer from `engine`, or `None` if the engine lacks it.
    /// `Composite` is not a single array and always gives `None`.
    pub fn select<E: Engine + ?Sized>(self, engine: &E) -> Option<&Field> {
        match self {
            Layer::Composite => None,
            Layer::Phi => Some(engine.field()),
            Layer::Gradient => engine.gradient_field(),
            Layer::Potential => engine.potential_field(),
        }
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Layer {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Layer::from_name(s)
    }
}
