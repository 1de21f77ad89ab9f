//! Summary statistics of a field layer.

use instanton_core::field::Field;
use serde::{Deserialize, Serialize};

/// Min, max and mean over the finite cells of a field, plus a count of the
/// cells that are not finite. All three are `None` when no cell is finite.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldStats {
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub mean: Option<f64>,
    pub non_finite: usize,
}

impl FieldStats {
    pub fn of(field: &Field) -> Self {
        let mut sum = 0.0;
        let mut finite = 0usize;
        for &v in field.data().iter().filter(|v| v.is_finite()) {
            sum += v;
            finite += 1;
        }
        let (min, max) = field.min_max().unzip();
        Self {
            min,
            max,
            mean: (finite > 0).then(|| sum / finite as f64),
            non_finite: field.len() - finite,
        }
    }
}
