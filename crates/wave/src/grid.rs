//! Mutable simulation state: field, previous field, potential, gradient,
//! placed instantons and the clock.

use crate::clock::SimulationClock;
use crate::potential::{fill_potential, PotentialFamily};
use crate::profile::{superpose, SeedShape, SEED_AMPLITUDE};
use instanton_core::error::EngineError;
use instanton_core::field::Field;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Overlay annotation for one placed seed. Never replayed into the dynamics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstantonRecord {
    pub center_x: isize,
    pub center_y: isize,
    /// Clock step at which the seed was placed.
    pub birth_step: u64,
    /// Simulated time at which the seed was placed.
    pub birth_time: f64,
    pub shape: SeedShape,
    pub amplitude: f64,
}

/// The state of one simulation session.
///
/// `phi`, `phi_prev`, `potential` and `gradient` all have `width × height`
/// cells in the same row-major layout. `phi_prev` holds the field of the
/// previous step, which the leapfrog update needs.
#[derive(Debug, Clone)]
pub struct FieldGrid {
    pub(crate) phi: Field,
    pub(crate) phi_prev: Field,
    pub(crate) potential: Field,
    pub(crate) gradient: Field,
    /// Integrator output buffer, reused across steps.
    pub(crate) scratch: Field,
    pub(crate) instantons: Vec<InstantonRecord>,
    pub(crate) clock: SimulationClock,
    family: Option<PotentialFamily>,
}

impl FieldGrid {
    /// Creates a grid with every array zero-filled and no potential family.
    ///
    /// Returns `EngineError::InvalidDimensions` if either dimension is zero.
    pub fn new(width: usize, height: usize) -> Result<Self, EngineError> {
        let zero = Field::new(width, height)?;
        Ok(Self {
            phi: zero.clone(),
            phi_prev: zero.clone(),
            potential: zero.clone(),
            gradient: zero.clone(),
            scratch: zero,
            instantons: Vec::new(),
            clock: SimulationClock::new(),
            family: None,
        })
    }

    /// Creates a zeroed grid and fills its potential with `family`.
    pub fn with_potential(
        width: usize,
        height: usize,
        family: PotentialFamily,
    ) -> Result<Self, EngineError> {
        let mut grid = Self::new(width, height)?;
        grid.generate_potential(family);
        Ok(grid)
    }

    /// Grid width in cells.
    pub fn width(&self) -> usize {
        self.phi.width()
    }

    /// Grid height in cells.
    pub fn height(&self) -> usize {
        self.phi.height()
    }

    /// Recomputes the potential from `family`. The field itself is untouched.
    pub fn generate_potential(&mut self, family: PotentialFamily) {
        fill_potential(&mut self.potential, family);
        self.family = Some(family);
        debug!(family = %family, "generated potential");
    }

    /// Recomputes the potential from a family tag.
    ///
    /// An unrecognized tag returns `EngineError::UnsupportedVariant` and
    /// leaves the current potential in place.
    pub fn generate_potential_named(&mut self, name: &str) -> Result<(), EngineError> {
        let family = PotentialFamily::from_name(name)?;
        self.generate_potential(family);
        Ok(())
    }

    /// The family the potential was last generated from.
    pub fn family(&self) -> Option<PotentialFamily> {
        self.family
    }

    /// Adds a `shape` seed centred on cell `(center_x, center_y)`.
    ///
    /// The profile is superposed onto `phi`, then `phi_prev` is set equal to
    /// `phi` so the new perturbation starts at rest. A record is appended
    /// to the instanton registry. Centres outside the grid are allowed.
    pub fn place_seed(&mut self, shape: SeedShape, center_x: isize, center_y: isize) {
        superpose(&mut self.phi, shape, center_x, center_y);
        self.phi_prev.data_mut().copy_from_slice(self.phi.data());
        self.instantons.push(InstantonRecord {
            center_x,
            center_y,
            birth_step: self.clock.step(),
            birth_time: self.clock.time(),
            shape,
            amplitude: SEED_AMPLITUDE,
        });
        debug!(
            shape = %shape,
            x = center_x,
            y = center_y,
            step = self.clock.step(),
            "placed seed"
        );
    }

    /// Places a seed from a shape tag.
    ///
    /// An unrecognized tag returns `EngineError::UnsupportedVariant` and
    /// leaves the grid unchanged.
    pub fn place_seed_named(
        &mut self,
        name: &str,
        center_x: isize,
        center_y: isize,
    ) -> Result<(), EngineError> {
        let shape = SeedShape::from_name(name)?;
        self.place_seed(shape, center_x, center_y);
        Ok(())
    }

    /// Zeroes the field arrays, clears the registry and the clock, and
    /// regenerates the potential from the last family used.
    pub fn reset(&mut self) {
        self.phi.fill(0.0);
        self.phi_prev.fill(0.0);
        self.gradient.fill(0.0);
        self.scratch.fill(0.0);
        self.instantons.clear();
        self.clock.reset();
        match self.family {
            Some(family) => fill_potential(&mut self.potential, family),
            None => self.potential.fill(0.0),
        }
        debug!(family = ?self.family.map(PotentialFamily::name), "reset grid");
    }

    /// Current field amplitude.
    pub fn phi(&self) -> &Field {
        &self.phi
    }

    /// Field amplitude one step in the past.
    pub fn phi_prev(&self) -> &Field {
        &self.phi_prev
    }

    /// Static per-cell potential coefficient.
    pub fn potential(&self) -> &Field {
        &self.potential
    }

    /// Gradient magnitude of `phi`, derived after each step.
    pub fn gradient(&self) -> &Field {
        &self.gradient
    }

    /// Every seed placed since creation or the last reset, oldest first.
    pub fn instantons(&self) -> &[InstantonRecord] {
        &self.instantons
    }

    /// Simulated time and step count.
    pub fn clock(&self) -> &SimulationClock {
        &self.clock
    }
}
