//! Central-difference gradient magnitude of the field, for visualization.

use instanton_core::field::Field;

/// Writes `|∇phi|` into the interior cells of `gradient`.
///
/// ```text
/// gx = (phi[x+1, y] - phi[x-1, y]) / 2
/// gy = (phi[x, y+1] - phi[x, y-1]) / 2
/// gradient[x, y] = sqrt(gx² + gy²)
/// ```
///
/// Boundary cells of `gradient` keep whatever they held before. Both fields
/// must share dimensions.
pub fn derive_gradient(phi: &Field, gradient: &mut Field) {
    debug_assert_eq!(phi.width(), gradient.width());
    debug_assert_eq!(phi.height(), gradient.height());
    let w = phi.width();
    let h = phi.height();
    if w < 3 || h < 3 {
        return;
    }
    let src = phi.data();
    let out = gradient.data_mut();
    for y in 1..h - 1 {
        for x in 1..w - 1 {
            let idx = y * w + x;
            let gx = (src[idx + 1] - src[idx - 1]) / 2.0;
            let gy = (src[idx + w] - src[idx - w]) / 2.0;
            out[idx] = (gx * gx + gy * gy).sqrt();
        }
    }
}
