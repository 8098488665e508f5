//! Dense linear algebra primitives
//!
//! Thin wrappers over `nalgebra` for the few operations the model
//! statistics need: smoothing a Gram matrix by a rank-one update, offsetting
//! a diagonal, and a symmetric positive-definite solve.

use nalgebra::{DMatrix, DVector};

use crate::math::smooth;

/// `A ← A + γ(z zᵗ - A)` where `z_i = f(i)` for `i < A.nrows()`
///
/// Takes an index function so callers can smooth augmented vectors without
/// materialising them.
pub(crate) fn smooth_rank_one<F>(a: &mut DMatrix<f64>, z: F, gamma: f64)
where
    F: Fn(usize) -> f64,
{
    let n = a.nrows();
    for j in 0..n {
        let zj = z(j);
        for i in 0..n {
            a[(i, j)] = smooth(a[(i, j)], z(i) * zj, gamma);
        }
    }
}

/// Element-wise `A ← A + γ(B - A)`
pub(crate) fn smooth_matrix(a: &mut DMatrix<f64>, b: &DMatrix<f64>, gamma: f64) {
    a.zip_apply(b, |x, y| *x = smooth(*x, y, gamma));
}

/// Add `offset[i]` to `m[(i, i)]`
pub fn add_diagonal(m: &mut DMatrix<f64>, offset: &[f64]) {
    for (i, &d) in offset.iter().enumerate() {
        m[(i, i)] += d;
    }
}

/// Solve `m x = rhs` for symmetric positive-definite `m`
///
/// Returns `None` when `m` is not numerically positive-definite: the
/// Cholesky factorisation fails or leaves a pivot that is zero relative to
/// the largest one.
pub fn solve_spd(m: DMatrix<f64>, rhs: &DVector<f64>) -> Option<DVector<f64>> {
    let chol = m.cholesky()?;
    let pivots = chol.l_dirty().diagonal();
    let scale = pivots.iter().fold(0.0_f64, |acc, d| acc.max(d.abs()));
    let tol = scale * PIVOT_TOLERANCE;
    if !pivots.iter().all(|d| d.is_finite() && *d > tol) {
        return None;
    }
    Some(chol.solve(rhs))
}

const PIVOT_TOLERANCE: f64 = 1e-10;
