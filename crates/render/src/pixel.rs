//! Pixel buffer conversion: single layers as grayscale, the full grid as an
//! RGB composite with instanton markers.
//!
//! Always available (no feature gate) so callers that ship pixels elsewhere
//! do not need the `image` crate.

use instanton_core::field::Field;
use instanton_wave::FieldGrid;

/// Gradient magnitude is shown as `min(gradient * GRADIENT_GAIN, 1)`.
pub const GRADIENT_GAIN: f64 = 5.0;
/// Radius of the filled marker disc, in cells.
pub const MARKER_RADIUS: f64 = 3.0;
/// Width of the marker outline, centred on the disc edge.
pub const MARKER_OUTLINE: f64 = 1.0;
const MARKER_FILL_RGB: [u8; 3] = [255, 255, 0];
const MARKER_OUTLINE_RGB: [u8; 3] = [255, 255, 255];

/// Scales `t` in [0, 1] to a byte with `floor(255 t)`. NaN maps to 0.
fn unit_to_byte(t: f64) -> u8 {
    (255.0 * t).floor().clamp(0.0, 255.0) as u8
}

/// Normalizes `v` to `[0, 1]` over `range`. Flat ranges and non-finite
/// values give 0.
fn normalize(v: f64, range: Option<(f64, f64)>) -> f64 {
    match range {
        Some((lo, hi)) if v.is_finite() => (v - lo) / (hi - lo),
        _ => 0.0,
    }
}

/// The finite min/max of `field`, or `None` when the layer is flat.
fn stretch(field: &Field) -> Option<(f64, f64)> {
    field.min_max().filter(|(lo, hi)| hi > lo)
}

/// Maps each cell to `floor(255 * (v - min) / (max - min))`.
///
/// `min` and `max` are taken over finite cells. A flat layer, a layer with
/// no finite cell, and every non-finite cell map to 0. The buffer length is
/// `width * height`, row-major.
pub fn field_to_gray(field: &Field) -> Vec<u8> {
    let range = stretch(field);
    field
        .data()
        .iter()
        .map(|&v| unit_to_byte(normalize(v, range)))
        .collect()
}

/// Packs three layers into an RGB8 buffer (`width * height * 3` bytes).
///
/// - red: `phi` stretched to its own range
/// - green: `min(gradient * GRADIENT_GAIN, 1)`, not stretched
/// - blue: `potential` stretched to its own range
///
/// All three fields must share dimensions.
pub fn field_to_rgb(phi: &Field, gradient: &Field, potential: &Field) -> Vec<u8> {
    debug_assert_eq!(phi.len(), gradient.len());
    debug_assert_eq!(phi.len(), potential.len());
    let phi_range = stretch(phi);
    let pot_range = stretch(potential);
    phi.data()
        .iter()
        .zip(gradient.data())
        .zip(potential.data())
        .flat_map(|((&p, &g), &v)| {
            let grad = if g.is_finite() {
                (g * GRADIENT_GAIN).min(1.0)
            } else {
                0.0
            };
            [
                unit_to_byte(normalize(p, phi_range)),
                unit_to_byte(grad),
                unit_to_byte(normalize(v, pot_range)),
            ]
        })
        .collect()
}

/// Draws a yellow disc with a white rim at each centre onto an RGB8 buffer.
///
/// Cells closer than `MARKER_RADIUS - MARKER_OUTLINE / 2` are filled,
/// cells up to `MARKER_RADIUS + MARKER_OUTLINE / 2` form the rim. Centres
/// off the grid are clipped, not rejected.
pub fn draw_markers<I>(rgb: &mut [u8], width: usize, height: usize, centers: I)
where
    I: IntoIterator<Item = (isize, isize)>,
{
    debug_assert_eq!(rgb.len(), width * height * 3);
    let inner = MARKER_RADIUS - MARKER_OUTLINE / 2.0;
    let outer = MARKER_RADIUS + MARKER_OUTLINE / 2.0;
    let reach = outer.ceil() as isize;
    for (cx, cy) in centers {
        for y in cy - reach..=cy + reach {
            for x in cx - reach..=cx + reach {
                if x < 0 || y < 0 || x as usize >= width || y as usize >= height {
                    continue;
                }
                let dist = (((x - cx).pow(2) + (y - cy).pow(2)) as f64).sqrt();
                let color = if dist < inner {
                    MARKER_FILL_RGB
                } else if dist <= outer {
                    MARKER_OUTLINE_RGB
                } else {
                    continue;
                };
                let idx = (y as usize * width + x as usize) * 3;
                rgb[idx..idx + 3].copy_from_slice(&color);
            }
        }
    }
}

/// The full view of a grid: [`field_to_rgb`] plus a marker per instanton.
pub fn composite(grid: &FieldGrid) -> Vec<u8> {
    let mut rgb = field_to_rgb(grid.phi(), grid.gradient(), grid.potential());
    draw_markers(
        &mut rgb,
        grid.width(),
        grid.height(),
        grid.instantons().iter().map(|r| (r.center_x, r.center_y)),
    );
    rgb
}
