//! Injectable uniform random source for stochastic forcing.
//!
//! The integrator never reaches for a global generator. It draws from a
//! [`UniformSource`] handed in by the caller, so a run with the same seed
//! replays the same noise, and a noise-free run can pin the draws.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Generator used by simulation sessions: ChaCha8, seeded from a `u64`.
pub type NoiseRng = ChaCha8Rng;

/// Builds the session generator for `seed`.
pub fn seeded_rng(seed: u64) -> NoiseRng {
    ChaCha8Rng::seed_from_u64(seed)
}

/// A source of uniform draws in `[0, 1)`.
pub trait UniformSource {
    /// Next uniform value in `[0, 1)`.
    fn next_unit(&mut self) -> f64;
}

impl UniformSource for ChaCha8Rng {
    fn next_unit(&mut self) -> f64 {
        self.random::<f64>()
    }
}

impl<S: UniformSource + ?Sized> UniformSource for &mut S {
    fn next_unit(&mut self) -> f64 {
        (**self).next_unit()
    }
}

/// Returns the same value on every draw.
///
/// `ConstantSource(0.5)` cancels the `(U - 0.5)` factor of the forcing term,
/// which makes noisy configurations deterministic and force-free.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstantSource(pub f64);

impl UniformSource for ConstantSource {
    fn next_unit(&mut self) -> f64 {
        if self.0.is_nan() {
            return 0.0;
        }
        self.0.clamp(0.0, 1.0 - f64::EPSILON)
    }
}
