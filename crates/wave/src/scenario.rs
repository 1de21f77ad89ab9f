//! Headless run description: grid size, parameters and a schedule of seeds.
//!
//! ```json
//! {
//!   "width": 120, "height": 90, "seed": 7, "steps": 300,
//!   "params": { "field_type": "double_well", "noise_level": 0.05 },
//!   "placements": [
//!     { "shape": "gaussian", "x": 60, "y": 45, "at_step": 0 },
//!     { "shape": "ring", "x": 30, "y": 30, "at_step": 150 }
//!   ]
//! }
//! ```

use crate::lab::InstantonLab;
use crate::profile::SeedShape;
use instanton_core::error::EngineError;
use instanton_core::Engine;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

/// One scheduled seed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub shape: SeedShape,
    pub x: isize,
    pub y: isize,
    /// Step counter value at which the seed is added. `0` means before the
    /// first step; values `>= steps` fire after the last one.
    #[serde(default)]
    pub at_step: u64,
}

impl Placement {
    /// Converts unit-square coordinates (`u` across, `v` down) into a cell
    /// with `floor(u * width)`, `floor(v * height)`.
    pub fn from_normalized(
        shape: SeedShape,
        u: f64,
        v: f64,
        width: usize,
        height: usize,
        at_step: u64,
    ) -> Self {
        Self {
            shape,
            x: (u * width as f64).floor() as isize,
            y: (v * height as f64).floor() as isize,
            at_step,
        }
    }
}

fn default_params() -> Value {
    Value::Object(Default::default())
}

/// A complete, replayable run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub width: usize,
    pub height: usize,
    #[serde(default)]
    pub seed: u64,
    pub steps: u64,
    /// Session parameters in the JSON form accepted by
    /// [`InstantonLab::from_json`].
    #[serde(default = "default_params")]
    pub params: Value,
    #[serde(default)]
    pub placements: Vec<Placement>,
}

impl Scenario {
    pub fn from_json_str(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Rejects zero or overflowing dimensions.
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.width == 0 || self.height == 0 || self.width.checked_mul(self.height).is_none() {
            return Err(EngineError::InvalidDimensions);
        }
        Ok(())
    }

    /// Builds a session and plays the schedule on it.
    ///
    /// Placements sharing an `at_step` fire in document order. Errors from a
    /// step (a halted divergence) abort the run.
    pub fn run(&self) -> Result<InstantonLab, EngineError> {
        self.validate()?;
        let mut lab = InstantonLab::from_json(self.width, self.height, self.seed, &self.params)?;

        let mut schedule = self.placements.clone();
        schedule.sort_by_key(|p| p.at_step);
        let mut pending = schedule.iter().peekable();

        for step in 0..self.steps {
            while let Some(p) = pending.next_if(|p| p.at_step <= step) {
                lab.place_seed(p.shape, p.x, p.y);
            }
            lab.step()?;
        }
        for p in pending {
            lab.place_seed(p.shape, p.x, p.y);
        }

        debug!(
            steps = self.steps,
            placements = self.placements.len(),
            "scenario finished"
        );
        Ok(lab)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn scenario(steps: u64, placements: Vec<Placement>) -> Scenario {
        Scenario {
            width: 24,
            height: 20,
            seed: 3,
            steps,
            params: json!({"field_type": "harmonic"}),
            placements,
        }
    }

    fn at(shape: SeedShape, x: isize, y: isize, at_step: u64) -> Placement {
        Placement {
            shape,
            x,
            y,
            at_step,
        }
    }

    #[test]
    fn parses_minimal_document_with_defaults() {
        let s = Scenario::from_json_str(r#"{"width": 10, "height": 8, "steps": 5}"#).unwrap();
        assert_eq!(s.seed, 0);
        assert_eq!(s.params, json!({}));
        assert!(s.placements.is_empty());
    }

    #[test]
    fn parses_placements_with_shape_tags() {
        let s = Scenario::from_json_str(
            r#"{"width": 10, "height": 8, "steps": 5,
                "placements": [{"shape": "ring", "x": 3, "y": -2}]}"#,
        )
        .unwrap();
        assert_eq!(s.placements, vec![at(SeedShape::Ring, 3, -2, 0)]);
    }

    #[test]
    fn unknown_shape_tag_fails_to_parse() {
        let result = Scenario::from_json_str(
            r#"{"width": 10, "height": 8, "steps": 5,
                "placements": [{"shape": "star", "x": 3, "y": 2}]}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn zero_dimension_is_rejected() {
        let mut s = scenario(1, vec![]);
        s.height = 0;
        assert!(matches!(s.validate(), Err(EngineError::InvalidDimensions)));
        assert!(s.run().is_err());
    }

    #[test]
    fn overflowing_dimensions_are_rejected() {
        let mut s = scenario(1, vec![]);
        s.width = usize::MAX;
        s.height = 2;
        assert!(matches!(s.validate(), Err(EngineError::InvalidDimensions)));
    }

    #[test]
    fn run_advances_the_clock() {
        let lab = scenario(12, vec![]).run().unwrap();
        assert_eq!(lab.grid().clock().step(), 12);
    }

    #[test]
    fn placements_fire_at_their_step() {
        let lab = scenario(
            10,
            vec![
                at(SeedShape::Ring, 5, 5, 7),
                at(SeedShape::Gaussian, 12, 10, 0),
            ],
        )
        .run()
        .unwrap();
        let records = lab.grid().instantons();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].shape, SeedShape::Gaussian);
        assert_eq!(records[0].birth_step, 0);
        assert_eq!(records[1].shape, SeedShape::Ring);
        assert_eq!(records[1].birth_step, 7);
    }

    #[test]
    fn late_placements_fire_after_last_step() {
        let lab = scenario(4, vec![at(SeedShape::Sech, 12, 10, 99)])
            .run()
            .unwrap();
        let records = lab.grid().instantons();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].birth_step, 4);
        // The seed was added after the final step, so phi equals phi_prev.
        assert_eq!(lab.grid().phi(), lab.grid().phi_prev());
    }

    #[test]
    fn same_step_placements_keep_document_order() {
        let lab = scenario(
            2,
            vec![
                at(SeedShape::Tophat, 1, 1, 1),
                at(SeedShape::Ring, 2, 2, 1),
            ],
        )
        .run()
        .unwrap();
        let shapes: Vec<_> = lab.grid().instantons().iter().map(|r| r.shape).collect();
        assert_eq!(shapes, vec![SeedShape::Tophat, SeedShape::Ring]);
    }

    #[test]
    fn run_is_replayable() {
        let s = scenario(30, vec![at(SeedShape::Gaussian, 12, 10, 0)]);
        let a = s.run().unwrap();
        let b = s.run().unwrap();
        assert_eq!(a.field(), b.field());
    }

    #[test]
    fn invalid_params_abort_run() {
        let mut s = scenario(1, vec![]);
        s.params = json!({"field_type": "saddle"});
        assert!(matches!(
            s.run(),
            Err(EngineError::UnsupportedVariant { .. })
        ));
    }

    #[test]
    fn from_normalized_floors_into_cells() {
        let p = Placement::from_normalized(SeedShape::Gaussian, 0.5, 0.25, 400, 300, 3);
        assert_eq!((p.x, p.y, p.at_step), (200, 75, 3));
        let p = Placement::from_normalized(SeedShape::Gaussian, 0.999, 0.001, 10, 10, 0);
        assert_eq!((p.x, p.y), (9, 0));
    }

    #[test]
    fn scenario_round_trips_through_json() {
        let s = scenario(5, vec![at(SeedShape::SpiralSeed, 4, 6, 2)]);
        let text = serde_json::to_string(&s).unwrap();
        assert_eq!(Scenario::from_json_str(&text).unwrap(), s);
    }
}
