//! Landscape comparison and transferability metrics.
//!
//! All functions take raw `Array2<f64>` grids so they work on landscapes
//! sampled here as well as on grids loaded from elsewhere.

use ndarray::{Array2, Zip};
use tracing::debug;

use crate::config::TransferThresholds;
use crate::error::{LandscapeError, Result};

/// Slack subtracted from thresholds so the exact maximum is never excluded.
pub const THRESHOLD_EPSILON: f64 = 1e-5;

/// Tolerance for "at the maximum" in [`transferability_coeff`].
pub const MAXIMUM_ATOL: f64 = 1e-5;

/// Share of donor-good cells that must also be acceptor-good.
pub const DEFAULT_MIN_OVERLAP: f64 = 0.8;

fn max_of(grid: &Array2<f64>) -> f64 {
    grid.iter().copied().fold(f64::NEG_INFINITY, f64::max)
}

fn min_of(grid: &Array2<f64>) -> f64 {
    grid.iter().copied().fold(f64::INFINITY, f64::min)
}

fn check_non_empty(grid: &Array2<f64>) -> Result<()> {
    if grid.is_empty() {
        return Err(LandscapeError::EmptyGrid);
    }
    Ok(())
}

fn check_same_shape(left: &Array2<f64>, right: &Array2<f64>) -> Result<()> {
    if left.dim() != right.dim() {
        return Err(LandscapeError::ShapeMismatch {
            left: left.dim(),
            right: right.dim(),
        });
    }
    check_non_empty(left)
}

/// Min-max scale `grid` to `[0, 1]`.
pub fn normalize(grid: &Array2<f64>, name: &'static str) -> Result<Array2<f64>> {
    check_non_empty(grid)?;
    let (min, max) = (min_of(grid), max_of(grid));
    let range = max - min;
    if !(range > 0.0) {
        return Err(LandscapeError::DegenerateRange { grid: name, value: min });
    }
    Ok(grid.mapv(|v| (v - min) / range))
}

/// Parameter coordinates of every cell within `atol` of the grid maximum.
///
/// Cell `(i, j)` maps to `(i * gamma_max / rows, j * beta_max / cols)`. With
/// `centered` the coordinates point at the cell centre instead of its left
/// edge, which is what a heat-map overlay wants; use `centered = false` when
/// the parameters are consumed numerically. Results are in row-major order.
pub fn maximizing_parameters(
    grid: &Array2<f64>,
    gamma_max: f64,
    beta_max: f64,
    centered: bool,
    atol: f64,
) -> Result<Vec<(f64, f64)>> {
    check_non_empty(grid)?;
    let (rows, cols) = grid.dim();
    let threshold = max_of(grid) - atol;
    let offset = if centered { 0.5 } else { 0.0 };
    let gamma_scale = gamma_max / rows as f64;
    let beta_scale = beta_max / cols as f64;

    Ok(grid
        .indexed_iter()
        .filter(|&(_, &v)| v >= threshold)
        .map(|((i, j), _)| {
            (
                (i as f64 + offset) * gamma_scale,
                (j as f64 + offset) * beta_scale,
            )
        })
        .collect())
}

/// Fraction of the cells where `e1` is near its optimum (relative level `a`)
/// at which `e2` is also near its optimum (relative level `b`).
pub fn transfer_fraction(e1: &Array2<f64>, e2: &Array2<f64>, a: f64, b: f64) -> Result<f64> {
    check_same_shape(e1, e2)?;
    let threshold1 = a * max_of(e1) + (1.0 - a) * min_of(e1) - THRESHOLD_EPSILON;
    let threshold2 = b * max_of(e2) + (1.0 - b) * min_of(e2) - THRESHOLD_EPSILON;

    let mut selected = 0usize;
    let mut aligned = 0usize;
    Zip::from(e1).and(e2).for_each(|&v1, &v2| {
        if v1 >= threshold1 {
            selected += 1;
            if v2 >= threshold2 {
                aligned += 1;
            }
        }
    });

    if selected == 0 {
        return Err(LandscapeError::EmptyThresholdSet { threshold: threshold1 });
    }
    Ok(aligned as f64 / selected as f64)
}

/// `true` when at least 80% of `e1`'s good region is also good in `e2`.
pub fn param_transferable(e1: &Array2<f64>, e2: &Array2<f64>, a: f64, b: f64) -> Result<bool> {
    param_transferable_with(
        e1,
        e2,
        &TransferThresholds {
            a,
            b,
            min_overlap: DEFAULT_MIN_OVERLAP,
        },
    )
}

/// [`param_transferable`] with every threshold taken from `thresholds`.
pub fn param_transferable_with(
    e1: &Array2<f64>,
    e2: &Array2<f64>,
    thresholds: &TransferThresholds,
) -> Result<bool> {
    let fraction = transfer_fraction(e1, e2, thresholds.a, thresholds.b)?;
    debug!(fraction, min_overlap = thresholds.min_overlap, "transfer overlap");
    Ok(fraction >= thresholds.min_overlap)
}

/// Mean normalized acceptor energy at the donor's maxima.
///
/// 1.0 means the donor's optimal parameters are also optimal for the acceptor.
pub fn transferability_coeff(donor: &Array2<f64>, acceptor: &Array2<f64>) -> Result<f64> {
    check_same_shape(donor, acceptor)?;
    let acceptor = normalize(acceptor, "acceptor")?;
    let threshold = max_of(donor) - MAXIMUM_ATOL;

    let mut sum = 0.0;
    let mut count = 0usize;
    Zip::from(donor).and(&acceptor).for_each(|&d, &a| {
        if d >= threshold {
            sum += a;
            count += 1;
        }
    });
    if count == 0 {
        return Err(LandscapeError::EmptyThresholdSet { threshold });
    }
    Ok(sum / count as f64)
}

/// Mean absolute difference of the two grids after scaling each to `[0, 1]`.
pub fn average_difference(donor: &Array2<f64>, acceptor: &Array2<f64>) -> Result<f64> {
    check_same_shape(donor, acceptor)?;
    let donor = normalize(donor, "donor")?;
    let acceptor = normalize(acceptor, "acceptor")?;
    (&donor - &acceptor)
        .mapv(f64::abs)
        .mean()
        .ok_or(LandscapeError::EmptyGrid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    #[test]
    fn test_maximizing_parameters_left_edge_and_centered() {
        let grid = array![[0.0, 1.0], [3.0, 2.0]];
        let left = maximizing_parameters(&grid, 2.0, 1.0, false, 0.0).unwrap();
        assert_eq!(left, vec![(1.0, 0.0)]);
        let centered = maximizing_parameters(&grid, 2.0, 1.0, true, 0.0).unwrap();
        assert_eq!(centered, vec![(1.5, 0.25)]);
    }

    #[test]
    fn test_maximizing_parameters_tolerance_collects_ties() {
        let grid = array![[1.0, 0.999_999], [0.0, 1.0]];
        let all = maximizing_parameters(&grid, 1.0, 1.0, false, 1e-5).unwrap();
        assert_eq!(all.len(), 3);
    }

    #[test]
    fn test_transfer_fraction_partial_overlap() {
        let e1 = array![[1.0, 1.0], [0.0, 0.0]];
        let e2 = array![[1.0, 0.0], [0.0, 0.0]];
        assert_relative_eq!(transfer_fraction(&e1, &e2, 0.8, 0.7).unwrap(), 0.5);
        assert!(!param_transferable(&e1, &e2, 0.8, 0.7).unwrap());
    }

    #[test]
    fn test_transfer_empty_threshold_set() {
        let e1 = array![[f64::NAN, f64::NAN]];
        let e2 = array![[0.0, 1.0]];
        assert!(matches!(
            transfer_fraction(&e1, &e2, 0.5, 0.5),
            Err(LandscapeError::EmptyThresholdSet { .. })
        ));
        assert!(matches!(
            transferability_coeff(&e1, &e2),
            Err(LandscapeError::EmptyThresholdSet { .. })
        ));
    }

    #[test]
    fn test_shape_mismatch() {
        let a = Array2::<f64>::zeros((2, 2));
        let b = Array2::<f64>::zeros((2, 3));
        assert_eq!(
            transferability_coeff(&a, &b),
            Err(LandscapeError::ShapeMismatch { left: (2, 2), right: (2, 3) })
        );
        assert!(average_difference(&a, &b).is_err());
        assert!(param_transferable(&a, &b, 0.5, 0.5).is_err());
    }

    #[test]
    fn test_degenerate_range() {
        let donor = array![[0.0, 1.0]];
        let flat = array![[2.0, 2.0]];
        assert_eq!(
            transferability_coeff(&donor, &flat),
            Err(LandscapeError::DegenerateRange { grid: "acceptor", value: 2.0 })
        );
        assert!(matches!(
            average_difference(&flat, &donor),
            Err(LandscapeError::DegenerateRange { grid: "donor", .. })
        ));
    }

    #[test]
    fn test_transferability_coeff() {
        let donor = array![[0.0, 5.0], [5.0, 1.0]];
        let acceptor = array![[0.0, 1.0], [0.5, 0.25]];
        // donor maxima at (0,1) and (1,0): acceptor normalized 1.0 and 0.5
        assert_relative_eq!(transferability_coeff(&donor, &acceptor).unwrap(), 0.75);
    }

    #[test]
    fn test_average_difference() {
        let donor = array![[0.0, 2.0]];
        let acceptor = array![[10.0, 0.0]];
        assert_relative_eq!(average_difference(&donor, &acceptor).unwrap(), 1.0);
        assert_relative_eq!(average_difference(&donor, &donor).unwrap(), 0.0);
    }
}
