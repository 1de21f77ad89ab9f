//! PNG output of a layer or of the composite view. Feature-gated behind `png`.

use instanton_core::error::EngineError;
use instanton_core::field::Field;
use instanton_wave::{FieldGrid, InstantonLab};
use std::path::Path;

use crate::pixel::{composite, field_to_gray};
use crate::Layer;

fn dimensions(width: usize, height: usize) -> Result<(u32, u32), EngineError> {
    let w = u32::try_from(width).map_err(|_| EngineError::InvalidDimensions)?;
    let h = u32::try_from(height).map_err(|_| EngineError::InvalidDimensions)?;
    Ok((w, h))
}

/// Writes `field` as an 8-bit grayscale PNG.
///
/// Returns `EngineError::InvalidDimensions` if the field dimensions overflow
/// `u32`, or `EngineError::Io` on write failure.
pub fn write_png(field: &Field, path: &Path) -> Result<(), EngineError> {
    let (w, h) = dimensions(field.width(), field.height())?;
    let img = image::GrayImage::from_raw(w, h, field_to_gray(field))
        .ok_or_else(|| EngineError::Io("grayscale buffer size mismatch".into()))?;
    img.save(path).map_err(|e| EngineError::Io(e.to_string()))
}

/// Writes the RGB composite of `grid` (see [`composite`]) as a PNG.
pub fn write_composite_png(grid: &FieldGrid, path: &Path) -> Result<(), EngineError> {
    let (w, h) = dimensions(grid.width(), grid.height())?;
    let img = image::RgbImage::from_raw(w, h, composite(grid))
        .ok_or_else(|| EngineError::Io("RGB buffer size mismatch".into()))?;
    img.save(path).map_err(|e| EngineError::Io(e.to_string()))
}

/// Writes `layer` of `lab` to `path`.
pub fn write_layer_png(lab: &InstantonLab, layer: Layer, path: &Path) -> Result<(), EngineError> {
    match layer.select(lab) {
        Some(field) => write_png(field, path),
        None => write_composite_png(lab.grid(), path),
    }
}
