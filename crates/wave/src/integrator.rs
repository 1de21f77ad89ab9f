//! Leapfrog time stepping of the driven, damped nonlinear wave equation.
//!
//! For every interior cell:
//!
//! ```text
//! lap     = phi[x+1,y] + phi[x-1,y] + phi[x,y+1] + phi[x,y-1] - 4 phi[x,y]
//! force   = lap - V[x,y] phi[x,y] - 0.1 phi[x,y]³
//!         + noise_level (U - 0.5) sin(0.1 t + 0.1 x + 0.1 y)
//! phi_new = 2 phi - phi_prev + dt² force
//! ```
//!
//! `phi_new` starts zeroed and the stencil never writes edge cells, so after
//! the edge pass (scaling by [`BOUNDARY_ABSORPTION`]) every edge cell is 0:
//! energy reaching the border leaves the domain. The commit shifts `phi` into `phi_prev`, moves
//! `phi_new` into `phi` and advances the clock. The gradient is derived last.

use crate::gradient::derive_gradient;
use crate::grid::FieldGrid;
use instanton_core::field::Field;
use instanton_core::prng::UniformSource;

/// Coefficient of the cubic self-interaction `-g phi³`.
pub const NONLINEAR_COUPLING: f64 = 0.1;
/// Factor applied to every edge cell after the interior update.
pub const BOUNDARY_ABSORPTION: f64 = 0.9;
/// Spatial and temporal frequency of the forcing phase `sin(k t + k x + k y)`.
const NOISE_PHASE: f64 = 0.1;
/// Grid spacing of the stencil.
const DX: f64 = 1.0;

/// Advances `grid` by one step of size `dt`.
///
/// Draws one uniform value per interior cell from `rng` when
/// `noise_level != 0`. No finiteness check is made; see
/// [`StabilityPolicy`](crate::stability::StabilityPolicy) for a checked step.
pub fn step<R: UniformSource + ?Sized>(
    grid: &mut FieldGrid,
    dt: f64,
    noise_level: f64,
    rng: &mut R,
) {
    advance(grid, dt, noise_level, rng);
    derive_gradient(&grid.phi, &mut grid.gradient);
}

/// Interior update, boundary damping and commit. Leaves the gradient stale.
pub(crate) fn advance<R: UniformSource + ?Sized>(
    grid: &mut FieldGrid,
    dt: f64,
    noise_level: f64,
    rng: &mut R,
) {
    let w = grid.phi.width();
    let h = grid.phi.height();
    let time = grid.clock.time();
    let dt2 = dt * dt;

    grid.scratch.fill(0.0);
    {
        let phi = grid.phi.data();
        let prev = grid.phi_prev.data();
        let pot = grid.potential.data();
        let next = grid.scratch.data_mut();

        for y in 1..h.saturating_sub(1) {
            for x in 1..w - 1 {
                let idx = y * w + x;
                let p = phi[idx];
                let lap = laplacian_5pt(phi, idx, w);
                let potential_force = -pot[idx] * p;
                let nonlinear_force = -NONLINEAR_COUPLING * p * p * p;
                let noise = if noise_level != 0.0 {
                    noise_level
                        * (rng.next_unit() - 0.5)
                        * (NOISE_PHASE * time + NOISE_PHASE * x as f64 + NOISE_PHASE * y as f64)
                            .sin()
                } else {
                    0.0
                };
                next[idx] =
                    2.0 * p - prev[idx] + dt2 * (lap + potential_force + nonlinear_force + noise);
            }
        }
    }
    damp_boundary(&mut grid.scratch, BOUNDARY_ABSORPTION);

    std::mem::swap(&mut grid.phi_prev, &mut grid.phi);
    std::mem::swap(&mut grid.phi, &mut grid.scratch);
    grid.clock.advance(dt);
}

/// 5-point Laplacian at flat index `idx` of a row-major buffer of width `w`.
///
/// The caller guarantees `idx` is an interior cell.
#[inline]
pub(crate) fn laplacian_5pt(data: &[f64], idx: usize, w: usize) -> f64 {
    (data[idx + 1] + data[idx - 1] + data[idx + w] + data[idx - w] - 4.0 * data[idx]) / (DX * DX)
}

/// Multiplies every edge cell (row 0, row H-1, column 0, column W-1) by
/// `factor`, once per cell.
pub fn damp_boundary(field: &mut Field, factor: f64) {
    let w = field.width();
    let h = field.height();
    let data = field.data_mut();
    for x in 0..w {
        data[x] *= factor;
        if h > 1 {
            data[(h - 1) * w + x] *= factor;
        }
    }
    for y in 1..h.saturating_sub(1) {
        data[y * w] *= factor;
        if w > 1 {
            data[y * w + w - 1] *= factor;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::potential::PotentialFamily;
    use crate::profile::SeedShape;
    use instanton_core::prng::{seeded_rng, ConstantSource};

    fn quiet() -> ConstantSource {
        ConstantSource(0.5)
    }

    fn bits(field: &Field) -> Vec<u64> {
        field.data().iter().map(|v| v.to_bits()).collect()
    }

    // ---- Stencil ----

    #[test]
    fn laplacian_of_uniform_field_is_zero() {
        let data = vec![0.5; 6 * 6];
        for y in 1..5 {
            for x in 1..5 {
                assert_eq!(laplacian_5pt(&data, y * 6 + x, 6), 0.0);
            }
        }
    }

    #[test]
    fn laplacian_of_spike_is_minus_four_at_centre() {
        let mut data = vec![0.0; 5 * 5];
        data[2 * 5 + 2] = 1.0;
        assert_eq!(laplacian_5pt(&data, 12, 5), -4.0);
        assert_eq!(laplacian_5pt(&data, 11, 5), 1.0);
        assert_eq!(laplacian_5pt(&data, 6, 5), 0.0);
    }

    // ---- Boundary damping ----

    #[test]
    fn damp_boundary_scales_edges_once_and_spares_interior() {
        let mut field = Field::filled(5, 4, 2.0).unwrap();
        damp_boundary(&mut field, BOUNDARY_ABSORPTION);
        for (x, y, v) in field.iter() {
            let edge = x == 0 || y == 0 || x == 4 || y == 3;
            let expected = if edge { 2.0 * 0.9 } else { 2.0 };
            assert_eq!(v, expected, "cell ({x}, {y})");
        }
    }

    #[test]
    fn damp_boundary_handles_single_row_and_column() {
        let mut row = Field::filled(4, 1, 1.0).unwrap();
        damp_boundary(&mut row, 0.5);
        assert!(row.data().iter().all(|&v| v == 0.5));

        let mut col = Field::filled(1, 4, 1.0).unwrap();
        damp_boundary(&mut col, 0.5);
        assert!(col.data().iter().all(|&v| v == 0.5));
    }

    #[test]
    fn step_zeroes_every_edge_cell() {
        let mut grid = FieldGrid::new(6, 6).unwrap();
        grid.phi.set(0, 3, 2.0).unwrap();
        grid.phi.set(5, 2, -1.0).unwrap();
        grid.phi.set(3, 5, 0.5).unwrap();
        grid.phi.set(0, 0, 4.0).unwrap();
        step(&mut grid, 0.02, 0.0, &mut quiet());
        for (x, y, v) in grid.phi().iter() {
            if x == 0 || y == 0 || x == 5 || y == 5 {
                assert_eq!(v, 0.0, "edge cell ({x}, {y})");
            }
        }
        // The old edge values still act as stencil neighbours.
        let expected = 0.02 * 0.02 * 2.0;
        assert!((grid.phi().get(1, 3) - expected).abs() < 1e-15);
    }

    #[test]
    fn seed_on_the_border_loses_its_edge_cells_after_one_step() {
        let mut grid = FieldGrid::new(40, 40).unwrap();
        grid.place_seed(SeedShape::Tophat, 0, 20);
        assert_eq!(grid.phi().get(0, 20), 1.0);
        step(&mut grid, 0.02, 0.0, &mut quiet());
        assert_eq!(grid.phi().get(0, 20), 0.0);
        assert_eq!(grid.phi_prev().get(0, 20), 1.0);
    }

    // ---- Energy and commit ----

    #[test]
    fn zero_field_without_noise_stays_zero() {
        let mut grid = FieldGrid::with_potential(16, 12, PotentialFamily::MexicanHat).unwrap();
        let mut rng = seeded_rng(3);
        for _ in 0..20 {
            step(&mut grid, 0.05, 0.0, &mut rng);
        }
        assert!(grid.phi().data().iter().all(|&v| v == 0.0));
        assert!(grid.phi_prev().data().iter().all(|&v| v == 0.0));
        assert!(grid.gradient().data().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn commit_shifts_phi_into_phi_prev() {
        let mut grid = FieldGrid::with_potential(20, 20, PotentialFamily::Harmonic).unwrap();
        grid.place_seed(SeedShape::Gaussian, 10, 10);
        let mut rng = seeded_rng(11);
        for _ in 0..5 {
            let before = bits(grid.phi());
            step(&mut grid, 0.02, 0.2, &mut rng);
            assert_eq!(bits(grid.phi_prev()), before);
        }
    }

    #[test]
    fn potential_is_never_mutated() {
        let mut grid = FieldGrid::with_potential(20, 16, PotentialFamily::Sinusoidal).unwrap();
        grid.place_seed(SeedShape::Sech, 10, 8);
        let before = bits(grid.potential());
        let mut rng = seeded_rng(5);
        for _ in 0..10 {
            step(&mut grid, 0.05, 0.3, &mut rng);
        }
        assert_eq!(bits(grid.potential()), before);
    }

    #[test]
    fn clock_advances_by_n_dt_and_n_steps() {
        let mut grid = FieldGrid::new(8, 8).unwrap();
        let dt = 0.25;
        for _ in 0..12 {
            step(&mut grid, dt, 0.0, &mut quiet());
        }
        assert_eq!(grid.clock().step(), 12);
        assert_eq!(grid.clock().time(), 12.0 * dt);
    }

    #[test]
    fn zero_dt_with_matching_history_is_stationary() {
        let mut grid = FieldGrid::with_potential(24, 24, PotentialFamily::Ripple).unwrap();
        grid.place_seed(SeedShape::Gaussian, 12, 12);
        let interior_before: Vec<f64> = grid
            .phi()
            .iter()
            .filter(|&(x, y, _)| x > 0 && y > 0 && x < 23 && y < 23)
            .map(|(_, _, v)| v)
            .collect();
        step(&mut grid, 0.0, 0.5, &mut seeded_rng(1));
        let interior_after: Vec<f64> = grid
            .phi()
            .iter()
            .filter(|&(x, y, _)| x > 0 && y > 0 && x < 23 && y < 23)
            .map(|(_, _, v)| v)
            .collect();
        assert_eq!(interior_before, interior_after);
    }

    // ---- Physics sanity ----

    #[test]
    fn single_step_matches_hand_computed_update() {
        let mut grid = FieldGrid::new(5, 5).unwrap();
        grid.potential.fill(2.0);
        grid.phi.set(2, 2, 1.0).unwrap();
        grid.phi.set(1, 2, 0.5).unwrap();
        grid.phi_prev.copy_from(&grid.phi).unwrap();
        let dt = 0.1;
        step(&mut grid, dt, 0.0, &mut quiet());

        // centre: lap = 0.5 - 4 = -3.5, V phi = 2, g phi³ = 0.1
        let expected_centre = 2.0 * 1.0 - 1.0 + dt * dt * (-3.5 - 2.0 - 0.1);
        assert!((grid.phi().get(2, 2) - expected_centre).abs() < 1e-12);

        // (1, 2): lap = 1.0 + 0 + 0 + 0 - 2.0 = -1.0, V phi = 1.0, g phi³ = 0.0125
        let expected_left = 2.0 * 0.5 - 0.5 + dt * dt * (-1.0 - 1.0 - 0.0125);
        assert!((grid.phi().get(1, 2) - expected_left).abs() < 1e-12);
    }

    #[test]
    fn gaussian_peak_stays_above_neighbours_after_one_step() {
        let mut grid = FieldGrid::with_potential(10, 10, PotentialFamily::Harmonic).unwrap();
        grid.place_seed(SeedShape::Gaussian, 5, 5);
        let peak_before = grid.phi().get(5, 5);
        step(&mut grid, 0.02, 0.0, &mut quiet());

        let phi = grid.phi();
        let centre = phi.get(5, 5);
        for (x, y) in [(4, 5), (6, 5), (5, 4), (5, 6)] {
            assert!(
                centre.abs() > phi.get(x, y).abs(),
                "centre {centre} not above neighbour ({x}, {y}) = {}",
                phi.get(x, y)
            );
        }
        // Negative curvature at the peak pulls it down.
        assert!(centre < peak_before);

        // Off-centre, where V > 0, the restoring force lowers the bump
        // further than a free step does.
        let mut free = FieldGrid::new(10, 10).unwrap();
        free.place_seed(SeedShape::Gaussian, 5, 5);
        step(&mut free, 0.02, 0.0, &mut quiet());
        assert!(phi.get(4, 5) < free.phi().get(4, 5));
    }

    #[test]
    fn gradient_is_derived_after_commit() {
        let mut grid = FieldGrid::new(12, 12).unwrap();
        grid.place_seed(SeedShape::Gaussian, 6, 6);
        step(&mut grid, 0.02, 0.0, &mut quiet());
        let mut expected = Field::new(12, 12).unwrap();
        derive_gradient(grid.phi(), &mut expected);
        assert_eq!(bits(grid.gradient()), bits(&expected));
    }

    // ---- Noise ----

    #[test]
    fn constant_half_draw_cancels_noise() {
        let mut noisy = FieldGrid::with_potential(16, 16, PotentialFamily::Spiral).unwrap();
        let mut silent = noisy.clone();
        noisy.place_seed(SeedShape::Ring, 8, 8);
        silent.place_seed(SeedShape::Ring, 8, 8);
        for _ in 0..5 {
            step(&mut noisy, 0.05, 0.5, &mut ConstantSource(0.5));
            step(&mut silent, 0.05, 0.0, &mut ConstantSource(0.5));
        }
        assert_eq!(noisy.phi().data(), silent.phi().data());
    }

    #[test]
    fn forcing_uses_clock_time_before_the_step() {
        let (w, h) = (8, 7);
        let mut grid = FieldGrid::new(w, h).unwrap();
        grid.clock.advance(2.5);
        let (dt, noise_level, u) = (0.1, 0.4, 0.8);
        step(&mut grid, dt, noise_level, &mut ConstantSource(u));

        for (x, y, v) in grid.phi().iter() {
            let expected = if x == 0 || y == 0 || x == w - 1 || y == h - 1 {
                0.0
            } else {
                let phase = 0.1 * 2.5 + 0.1 * x as f64 + 0.1 * y as f64;
                dt * dt * (noise_level * (u - 0.5) * phase.sin())
            };
            assert!((v - expected).abs() < 1e-15, "cell ({x}, {y}): {v} vs {expected}");
        }
        assert!((grid.phi().get(3, 5) - 0.01 * 0.4 * 0.3 * 1.05_f64.sin()).abs() < 1e-12);
        assert!((grid.clock().time() - 2.6).abs() < 1e-12);
    }

    #[test]
    fn noise_excites_a_zero_field() {
        let mut grid = FieldGrid::new(16, 16).unwrap();
        step(&mut grid, 0.1, 0.5, &mut seeded_rng(9));
        assert!(grid.phi().data().iter().any(|&v| v != 0.0));
    }

    #[test]
    fn same_seed_same_trajectory() {
        let run = |seed| {
            let mut grid =
                FieldGrid::with_potential(20, 20, PotentialFamily::DoubleWell).unwrap();
            grid.place_seed(SeedShape::SpiralSeed, 10, 10);
            let mut rng = seeded_rng(seed);
            for _ in 0..25 {
                step(&mut grid, 0.05, 0.3, &mut rng);
            }
            bits(grid.phi())
        };
        assert_eq!(run(42), run(42));
        assert_ne!(run(42), run(43));
    }

    #[test]
    fn tiny_grid_steps_without_interior() {
        let mut grid = FieldGrid::new(2, 2).unwrap();
        grid.phi.fill(1.0);
        step(&mut grid, 0.1, 0.5, &mut seeded_rng(0));
        assert!(grid.phi().data().iter().all(|&v| v == 0.0));
        assert_eq!(grid.clock().step(), 1);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn dimension() -> impl Strategy<Value = usize> {
            3_usize..=24
        }

        proptest! {
            #[test]
            fn zero_field_stays_zero_for_any_family(
                w in dimension(),
                h in dimension(),
                family_idx in 0_usize..6,
                dt in 0.0_f64..0.1,
            ) {
                let family = PotentialFamily::ALL[family_idx];
                let mut grid = FieldGrid::with_potential(w, h, family).unwrap();
                for _ in 0..5 {
                    step(&mut grid, dt, 0.0, &mut ConstantSource(0.5));
                }
                prop_assert!(grid.phi().data().iter().all(|&v| v == 0.0));
            }

            #[test]
            fn small_steps_keep_harmonic_field_finite(
                seed: u64,
                shape_idx in 0_usize..5,
                noise in 0.0_f64..0.5,
            ) {
                let shape = SeedShape::ALL[shape_idx];
                let mut grid =
                    FieldGrid::with_potential(24, 24, PotentialFamily::Harmonic).unwrap();
                grid.place_seed(shape, 12, 12);
                let mut rng = seeded_rng(seed);
                for _ in 0..20 {
                    step(&mut grid, 0.02, noise, &mut rng);
                }
                prop_assert!(grid.phi().is_finite());
                prop_assert!(grid.gradient().is_finite());
            }
        }
    }
}
