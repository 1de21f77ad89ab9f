#![deny(unsafe_code)]
//! Core types and traits for the instanton lab.
//!
//! Provides the `Engine` trait, the `Field` grid type, `EngineError`, the
//! injectable `UniformSource` noise seam with its seeded ChaCha generator,
//! and JSON parameter helpers.

pub mod engine;
pub mod error;
pub mod field;
pub mod params;
pub mod prng;

pub use engine::Engine;
pub use error::EngineError;
pub use field::Field;
pub use prng::{seeded_rng, ConstantSource, NoiseRng, UniformSource};
