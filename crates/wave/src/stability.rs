//! What a checked step does when the field stops being finite.
//!
//! The cubic term bounds growth for moderate amplitudes only. Large `dt`,
//! strong noise or the unbounded mexican-hat potential can still push cells
//! to infinity or NaN. A [`StabilityPolicy`] decides whether that is
//! ignored, reported, repaired or treated as fatal.

use instanton_core::error::EngineError;
use instanton_core::field::Field;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default magnitude bound for [`StabilityPolicy::Clamp`].
pub const DEFAULT_CLAMP_LIMIT: f64 = 1e3;

/// Post-step finiteness policy.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum StabilityPolicy {
    /// Never scan the field.
    Unchecked,
    /// Scan and log the first divergence; keep stepping.
    #[default]
    Report,
    /// Replace NaN with 0 and clamp every cell into `[-limit, limit]`.
    Clamp { limit: f64 },
    /// Refuse further steps once the field diverges.
    Halt,
}

/// Outcome of inspecting one step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StabilityCheck {
    /// Cells that were NaN or infinite after the update.
    pub non_finite: usize,
    /// Cells the policy rewrote.
    pub adjusted: usize,
}

impl StabilityCheck {
    pub fn diverged(&self) -> bool {
        self.non_finite > 0
    }
}

impl StabilityPolicy {
    /// Every policy tag, in menu order.
    pub const NAMES: [&'static str; 4] = ["unchecked", "report", "clamp", "halt"];

    /// Builds a policy from its tag. `clamp_limit` is only read for `clamp`.
    pub fn from_name(name: &str, clamp_limit: f64) -> Result<Self, EngineError> {
        let policy = match name {
            "unchecked" => StabilityPolicy::Unchecked,
            "report" => StabilityPolicy::Report,
            "clamp" => StabilityPolicy::Clamp { limit: clamp_limit },
            "halt" => StabilityPolicy::Halt,
            _ => {
                return Err(EngineError::UnsupportedVariant {
                    kind: "stability policy",
                    name: name.to_string(),
                })
            }
        };
        policy.validate()?;
        Ok(policy)
    }

    /// The tag of this policy.
    pub fn name(&self) -> &'static str {
        match self {
            StabilityPolicy::Unchecked => "unchecked",
            StabilityPolicy::Report => "report",
            StabilityPolicy::Clamp { .. } => "clamp",
            StabilityPolicy::Halt => "halt",
        }
    }

    /// Rejects a clamp limit that is not a positive finite number.
    pub fn validate(&self) -> Result<(), EngineError> {
        if let StabilityPolicy::Clamp { limit } = self {
            if !(limit.is_finite() && *limit > 0.0) {
                return Err(EngineError::InvalidParameter {
                    name: "clamp_limit".into(),
                    reason: format!("must be positive and finite, got {limit}"),
                });
            }
        }
        Ok(())
    }

    /// Scans `phi` and, for `Clamp`, repairs it in place.
    pub fn inspect(&self, phi: &mut Field) -> StabilityCheck {
        match *self {
            StabilityPolicy::Unchecked => StabilityCheck::default(),
            StabilityPolicy::Report | StabilityPolicy::Halt => StabilityCheck {
                non_finite: phi.count_non_finite(),
                adjusted: 0,
            },
            StabilityPolicy::Clamp { limit } => {
                let mut check = StabilityCheck::default();
                for v in phi.data_mut() {
                    if v.is_nan() {
                        check.non_finite += 1;
                        check.adjusted += 1;
                        *v = 0.0;
                    } else if v.abs() > limit {
                        if v.is_infinite() {
                            check.non_finite += 1;
                        }
                        check.adjusted += 1;
                        *v = v.clamp(-limit, limit);
                    }
                }
                check
            }
        }
    }
}

impl fmt::Display for StabilityPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StabilityPolicy::Clamp { limit } => write!(f, "clamp({limit})"),
            other => f.write_str(other.name()),
        }
    }
}
