//! `InstantonLab`: an owned simulation session behind the [`Engine`] trait.
//!
//! The session bundles a [`FieldGrid`] with the run configuration (potential
//! family, time step, noise level, stability policy) and its own seeded noise
//! generator, so the surrounding application only has to call `step()` on
//! whatever schedule it likes.

use crate::gradient::derive_gradient;
use crate::grid::FieldGrid;
use crate::integrator::advance;
use crate::potential::PotentialFamily;
use crate::profile::SeedShape;
use crate::stability::{StabilityPolicy, DEFAULT_CLAMP_LIMIT};
use instanton_core::error::EngineError;
use instanton_core::field::Field;
use instanton_core::params::{param_f64, param_f64_any, param_string};
use instanton_core::prng::{seeded_rng, NoiseRng};
use instanton_core::Engine;
use serde_json::{json, Value};
use tracing::{debug, warn};

/// Default potential family.
const DEFAULT_FAMILY: PotentialFamily = PotentialFamily::MexicanHat;
/// Default time step (the "growth rate").
const DEFAULT_DT: f64 = 0.02;
/// Default stochastic forcing amplitude.
const DEFAULT_NOISE_LEVEL: f64 = 0.1;
const DT_RANGE: (f64, f64) = (0.005, 0.1);
const NOISE_RANGE: (f64, f64) = (0.0, 0.5);

/// Run configuration of an [`InstantonLab`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabParams {
    pub family: PotentialFamily,
    /// Time step per `step()` call.
    pub dt: f64,
    /// Amplitude of the stochastic forcing.
    pub noise_level: f64,
    pub stability: StabilityPolicy,
}

impl Default for LabParams {
    fn default() -> Self {
        Self {
            family: DEFAULT_FAMILY,
            dt: DEFAULT_DT,
            noise_level: DEFAULT_NOISE_LEVEL,
            stability: StabilityPolicy::default(),
        }
    }
}

impl LabParams {
    /// Extracts parameters from a JSON object, falling back to defaults.
    ///
    /// Recognized keys: `field_type`, `dt` (or `growth_rate`), `noise_level`,
    /// `stability`, `clamp_limit`. Unknown tags and non-finite or negative
    /// numbers are rejected.
    pub fn from_json(params: &Value) -> Result<Self, EngineError> {
        let family =
            PotentialFamily::from_name(&param_string(params, "field_type", DEFAULT_FAMILY.name()))?;
        let stability = StabilityPolicy::from_name(
            &param_string(params, "stability", StabilityPolicy::default().name()),
            param_f64(params, "clamp_limit", DEFAULT_CLAMP_LIMIT),
        )?;
        let parsed = Self {
            family,
            dt: param_f64_any(params, &["dt", "growth_rate"], DEFAULT_DT),
            noise_level: param_f64(params, "noise_level", DEFAULT_NOISE_LEVEL),
            stability,
        };
        parsed.validate()?;
        Ok(parsed)
    }

    /// Checks that `dt` and `noise_level` are finite and non-negative.
    pub fn validate(&self) -> Result<(), EngineError> {
        for (name, value) in [("dt", self.dt), ("noise_level", self.noise_level)] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(EngineError::InvalidParameter {
                    name: name.into(),
                    reason: format!("must be finite and non-negative, got {value}"),
                });
            }
        }
        self.stability.validate()
    }
}

/// A simulation session: grid, configuration and noise generator.
pub struct InstantonLab {
    grid: FieldGrid,
    params: LabParams,
    seed: u64,
    rng: NoiseRng,
    diverged: bool,
}

impl InstantonLab {
    /// Creates a session on a `width × height` grid with its potential
    /// generated from `params.family`. `seed` drives the forcing noise.
    pub fn new(
        width: usize,
        height: usize,
        seed: u64,
        params: LabParams,
    ) -> Result<Self, EngineError> {
        params.validate()?;
        let grid = FieldGrid::with_potential(width, height, params.family)?;
        Ok(Self {
            grid,
            params,
            seed,
            rng: seeded_rng(seed),
            diverged: false,
        })
    }

    /// Creates a session from a JSON params object. See [`LabParams::from_json`].
    pub fn from_json(
        width: usize,
        height: usize,
        seed: u64,
        json_params: &Value,
    ) -> Result<Self, EngineError> {
        Self::new(width, height, seed, LabParams::from_json(json_params)?)
    }

    /// Read-only access to the grid.
    pub fn grid(&self) -> &FieldGrid {
        &self.grid
    }

    /// Current configuration.
    pub fn lab_params(&self) -> &LabParams {
        &self.params
    }

    /// Seed of the noise generator.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// True once a checked step has seen a non-finite cell.
    pub fn is_diverged(&self) -> bool {
        self.diverged
    }

    /// Adds a seed at cell `(x, y)`. See [`FieldGrid::place_seed`].
    pub fn place_seed(&mut self, shape: SeedShape, x: isize, y: isize) {
        self.grid.place_seed(shape, x, y);
    }

    /// Changes the time step.
    pub fn set_dt(&mut self, dt: f64) -> Result<(), EngineError> {
        let next = LabParams { dt, ..self.params };
        next.validate()?;
        self.params = next;
        Ok(())
    }

    /// Changes the noise level.
    pub fn set_noise_level(&mut self, noise_level: f64) -> Result<(), EngineError> {
        let next = LabParams {
            noise_level,
            ..self.params
        };
        next.validate()?;
        self.params = next;
        Ok(())
    }

    /// Changes the stability policy. A halted session resumes when the
    /// new policy is not `Halt`.
    pub fn set_stability(&mut self, stability: StabilityPolicy) -> Result<(), EngineError> {
        stability.validate()?;
        self.params.stability = stability;
        Ok(())
    }

    /// Switches the potential family. The grid is recreated: field,
    /// registry and clock start over on the new landscape.
    pub fn set_family(&mut self, family: PotentialFamily) {
        self.params.family = family;
        self.grid.generate_potential(family);
        self.reset();
    }

    /// Clears field, registry and clock and regenerates the potential.
    /// The noise generator is re-seeded so a reset run replays exactly.
    pub fn reset(&mut self) {
        self.grid.reset();
        self.rng = seeded_rng(self.seed);
        self.diverged = false;
        debug!(seed = self.seed, "reset session");
    }

    fn halted(&self) -> bool {
        self.diverged && self.params.stability == StabilityPolicy::Halt
    }
}

impl Engine for InstantonLab {
    /// One checked step: update, stability policy, then gradient.
    ///
    /// Under `Halt`, the diverging step is committed and reported as
    /// `EngineError::Diverged`; every later step fails the same way until
    /// [`InstantonLab::reset`].
    fn step(&mut self) -> Result<(), EngineError> {
        if self.halted() {
            return Err(EngineError::Diverged {
                step: self.grid.clock().step(),
                cells: self.grid.phi().count_non_finite(),
            });
        }

        advance(
            &mut self.grid,
            self.params.dt,
            self.params.noise_level,
            &mut self.rng,
        );
        let check = self.params.stability.inspect(&mut self.grid.phi);
        derive_gradient(&self.grid.phi, &mut self.grid.gradient);

        let step = self.grid.clock().step();
        match self.params.stability {
            StabilityPolicy::Clamp { limit } if check.adjusted > 0 => {
                warn!(step, cells = check.adjusted, limit, "clamped field");
            }
            StabilityPolicy::Report if check.diverged() && !self.diverged => {
                self.diverged = true;
                warn!(step, cells = check.non_finite, "field diverged");
            }
            StabilityPolicy::Halt if check.diverged() => {
                self.diverged = true;
                warn!(step, cells = check.non_finite, "field diverged, halting");
                return Err(EngineError::Diverged {
                    step,
                    cells: check.non_finite,
                });
            }
            _ => {}
        }
        Ok(())
    }

    fn field(&self) -> &Field {
        self.grid.phi()
    }

    fn params(&self) -> Value {
        let mut params = json!({
            "field_type": self.params.family.name(),
            "dt": self.params.dt,
            "noise_level": self.params.noise_level,
            "stability": self.params.stability.name(),
        });
        if let StabilityPolicy::Clamp { limit } = self.params.stability {
            params["clamp_limit"] = json!(limit);
        }
        params
    }

    fn param_schema(&self) -> Value {
        let families: Vec<&str> = PotentialFamily::ALL.iter().map(|f| f.name()).collect();
        json!({
            "field_type": {
                "type": "string",
                "default": DEFAULT_FAMILY.name(),
                "enum": families,
                "description": "Potential landscape the field evolves in"
            },
            "dt": {
                "type": "number",
                "default": DEFAULT_DT,
                "min": DT_RANGE.0,
                "max": DT_RANGE.1,
                "description": "Time step per step() call (growth rate)"
            },
            "noise_level": {
                "type": "number",
                "default": DEFAULT_NOISE_LEVEL,
                "min": NOISE_RANGE.0,
                "max": NOISE_RANGE.1,
                "description": "Amplitude of the spatially correlated stochastic forcing"
            },
            "stability": {
                "type": "string",
                "default": StabilityPolicy::default().name(),
                "enum": StabilityPolicy::NAMES,
                "description": "What a step does when the field becomes non-finite"
            },
            "clamp_limit": {
                "type": "number",
                "default": DEFAULT_CLAMP_LIMIT,
                "description": "Magnitude bound used by the clamp policy"
            }
        })
    }

    fn gradient_field(&self) -> Option<&Field> {
        Some(self.grid.gradient())
    }

    fn potential_field(&self) -> Option<&Field> {
        Some(self.grid.potential())
    }
}
