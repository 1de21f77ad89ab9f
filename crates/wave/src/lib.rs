#![deny(unsafe_code)]
//! Nonlinear wave-field simulation.
//!
//! A scalar field `phi` evolves on a rectangular grid under
//!
//! ```text
//! ∂²φ/∂t² = ∇²φ - V(x, y) φ - 0.1 φ³ + noise
//! ```
//!
//! integrated with an explicit leapfrog scheme. `V` is one of six analytic
//! potential landscapes. Localized seeds ("instantons") are superposed onto
//! the field at rest and recorded in a registry. Edge cells are damped each
//! step so energy leaves the domain instead of reflecting.
//!
//! [`FieldGrid`] plus [`integrator::step`] is the bare model. [`InstantonLab`]
//! wraps both with a run configuration, a seeded noise generator and a
//! [`StabilityPolicy`], and implements [`instanton_core::Engine`].

pub mod clock;
pub mod gradient;
pub mod grid;
pub mod integrator;
pub mod lab;
pub mod potential;
pub mod profile;
pub mod scenario;
pub mod stability;
pub mod stats;

pub use clock::SimulationClock;
pub use grid::{FieldGrid, InstantonRecord};
pub use lab::{InstantonLab, LabParams};
pub use potential::PotentialFamily;
pub use profile::SeedShape;
pub use scenario::{Placement, Scenario};
pub use stability::{StabilityCheck, StabilityPolicy};
pub use stats::FieldStats;
