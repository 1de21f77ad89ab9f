//! Simulated time and step counter.

use serde::{Deserialize, Serialize};

/// Elapsed simulated time and number of committed steps.
///
/// Only the integrator's commit phase and an explicit reset move the clock.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SimulationClock {
    time: f64,
    step: u64,
}

impl SimulationClock {
    /// A clock at time 0, step 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulated time: the sum of every committed `dt`.
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Number of committed steps.
    pub fn step(&self) -> u64 {
        self.step
    }

    pub(crate) fn advance(&mut self, dt: f64) {
        self.time += dt;
        self.step += 1;
    }

    pub(crate) fn reset(&mut self) {
        *self = Self::default();
    }
}
