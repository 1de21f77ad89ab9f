//! The `Engine` trait implemented by every simulation session.
//!
//! The trait is object-safe so a harness can drive `dyn Engine` without
//! knowing which simulation sits behind it.

use crate::error::EngineError;
use crate::field::Field;
use serde_json::Value;

/// A step-based simulation exposing its state as scalar [`Field`]s.
///
/// The primary field is what the simulation evolves. Secondary fields are
/// derived or static layers a renderer may overlay; they never feed back
/// into the dynamics.
pub trait Engine {
    /// Advance the simulation by one step.
    ///
    /// Returns an `EngineError` if the step is refused (for example because
    /// the state diverged under a halting policy).
    fn step(&mut self) -> Result<(), EngineError>;

    /// The primary evolving field.
    fn field(&self) -> &Field;

    /// Current parameter values as a JSON object.
    fn params(&self) -> Value;

    /// Schema describing all available parameters, their types, ranges, and defaults.
    fn param_schema(&self) -> Value;

    /// Derived gradient-magnitude layer, if the engine computes one.
    fn gradient_field(&self) -> Option<&Field> {
        None
    }

    /// Static potential layer, if the engine has one.
    fn potential_field(&self) -> Option<&Field> {
        None
    }
}
