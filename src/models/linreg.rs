//! Ridge regression from smoothed cross-products

use nalgebra::{DMatrix, DVector};

use crate::linalg;
use crate::traits::{ConfigError, MergeError, Paired, Statistic};

#[cfg(feature = "std")]
use std::vec::Vec;

#[cfg(not(feature = "std"))]
use alloc::{vec, vec::Vec};

/// Online ridge regression with an unpenalised intercept
///
/// Accumulates the smoothed outer product of the augmented vector
/// `[x, 1, y]`. The coefficients solve
/// `(XᵗX/n + diag(λ, 0)) β = Xᵗy/n` over the `(p+1)×(p+1)` block for `[x, 1]`.
/// [`value`](Statistic::value) returns `p + 1` coefficients, the intercept
/// last. When the regularised system is not positive-definite it returns the
/// last valid estimate instead of failing.
///
/// Smoothing with `γ < 1` keeps a positive-definite system positive-definite,
/// so the estimate can only be lost to an update or merge with `γ = 1`. Those
/// store the current solution before overwriting the state.
///
/// # Example
///
/// ```
/// use flowseries::models::LinReg;
/// use flowseries::weights::EqualWeight;
/// use flowseries::Series;
///
/// let mut s = Series::new((LinReg::new(1).unwrap(),), EqualWeight::new()).unwrap();
/// for x in 0..20 {
///     let x = x as f64;
///     s.update((&[x][..], 2.0 * x + 1.0)).unwrap();
/// }
/// let (beta,) = s.value();
/// assert!((beta[0] - 2.0).abs() < 1e-8);
/// assert!((beta[1] - 1.0).abs() < 1e-8);
/// ```
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LinReg {
    /// Smoothed `[x, 1, y][x, 1, y]ᵗ`, `(p+2)×(p+2)`
    a: DMatrix<f64>,
    lambda: Vec<f64>,
    beta: Vec<f64>,
    nobs: u64,
}

impl LinReg {
    /// Ordinary least squares over `p >= 1` predictors
    pub fn new(p: usize) -> Result<Self, ConfigError> {
        Self::ridge(vec![0.0; p])
    }

    /// Ridge regression with one non-negative penalty per predictor
    pub fn ridge(lambda: Vec<f64>) -> Result<Self, ConfigError> {
        if lambda.is_empty() {
            return Err(ConfigError::new("p", 0.0, "must be at least 1"));
        }
        if let Some(&bad) = lambda.iter().find(|&&l| !(l >= 0.0 && l.is_finite())) {
            return Err(ConfigError::new(
                "lambda",
                bad,
                "must be finite and non-negative",
            ));
        }
        let p = lambda.len();
        Ok(Self {
            a: DMatrix::zeros(p + 2, p + 2),
            beta: vec![0.0; p + 1],
            lambda,
            nobs: 0,
        })
    }

    /// Number of predictors
    pub fn dim(&self) -> usize {
        self.lambda.len()
    }

    pub fn lambda(&self) -> &[f64] {
        &self.lambda
    }

    /// Solve for the coefficients and store them as the fallback estimate
    pub fn coef(&mut self) -> &[f64] {
        self.remember();
        &self.beta
    }

    /// Predicted response for predictors `x`
    pub fn predict(&self, x: &[f64]) -> f64 {
        let beta = self.value();
        let p = self.dim();
        x.iter().zip(&beta[..p]).map(|(a, b)| a * b).sum::<f64>() + beta[p]
    }

    /// Weighted mean squared residual of the current fit
    pub fn mse(&self) -> f64 {
        let q = self.dim() + 1;
        let beta = DVector::from_vec(self.value());
        let gram = self.a.view((0, 0), (q, q));
        let xty = self.a.view((0, q), (q, 1));
        let yy = self.a[(q, q)];
        yy - 2.0 * beta.dot(&xty.column(0)) + (beta.transpose() * gram * &beta)[(0, 0)]
    }

    fn solve(&self) -> Option<Vec<f64>> {
        let q = self.dim() + 1;
        let mut gram = self.a.view((0, 0), (q, q)).into_owned();
        linalg::add_diagonal(&mut gram, &self.lambda);
        let rhs: DVector<f64> = self.a.view((0, q), (q, 1)).column(0).into_owned();
        linalg::solve_spd(gram, &rhs).map(|b| b.as_slice().to_vec())
    }

    fn remember(&mut self) {
        if let Some(beta) = self.solve() {
            self.beta = beta;
        }
    }
}

impl Statistic for LinReg {
    type Kind = Paired;
    type Output = Vec<f64>;

    fn update(&mut self, (x, y): (&[f64], f64), gamma: f64) {
        if gamma >= 1.0 {
            self.remember();
        }
        self.nobs += 1;
        let p = self.dim();
        let z = |i: usize| match i.cmp(&p) {
            core::cmp::Ordering::Less => x[i],
            core::cmp::Ordering::Equal => 1.0,
            core::cmp::Ordering::Greater => y,
        };
        linalg::smooth_rank_one(&mut self.a, z, gamma);
    }

    fn value(&self) -> Vec<f64> {
        match self.solve() {
            Some(beta) => beta,
            None => {
                tracing::trace!(
                    nobs = self.nobs,
                    "LinReg system not positive-definite, keeping last estimate"
                );
                self.beta.clone()
            }
        }
    }

    fn check_merge(&self, other: &Self) -> Result<(), MergeError> {
        if self.lambda != other.lambda {
            return Err(MergeError::incompatible(
                "lambda",
                &self.lambda,
                &other.lambda,
            ));
        }
        Ok(())
    }

    fn merge(&mut self, other: &Self, gamma: f64) -> Result<(), MergeError> {
        self.check_merge(other)?;
        if gamma >= 1.0 {
            self.remember();
        }
        self.nobs += other.nobs;
        linalg::smooth_matrix(&mut self.a, &other.a, gamma);
        Ok(())
    }

    fn nobs(&self) -> u64 {
        self.nobs
    }

    fn width(&self) -> Option<usize> {
        Some(self.dim())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn fit(o: &mut LinReg, rows: &[([f64; 2], f64)]) {
        for (i, (x, y)) in rows.iter().enumerate() {
            o.update((&x[..], *y), 1.0 / (i + 1) as f64);
        }
    }

    fn plane() -> Vec<([f64; 2], f64)> {
        (0..30)
            .map(|i| {
                let x1 = i as f64;
                let x2 = ((i * 7) % 11) as f64;
                ([x1, x2], 3.0 * x1 - 2.0 * x2 + 5.0)
            })
            .collect()
    }

    #[test]
    fn test_exact_fit() {
        let mut o = LinReg::new(2).unwrap();
        fit(&mut o, &plane());

        let beta = o.value();
        assert_relative_eq!(beta[0], 3.0, epsilon = 1e-6);
        assert_relative_eq!(beta[1], -2.0, epsilon = 1e-6);
        assert_relative_eq!(beta[2], 5.0, epsilon = 1e-6);
        assert_relative_eq!(o.predict(&[1.0, 1.0]), 6.0, epsilon = 1e-6);
        assert!(o.mse().abs() < 1e-6);
    }

    #[test]
    fn test_ridge_shrinks() {
        let mut ols = LinReg::new(2).unwrap();
        let mut ridge = LinReg::ridge(vec![10.0, 10.0]).unwrap();
        fit(&mut ols, &plane());
        fit(&mut ridge, &plane());

        let b_ols = ols.value();
        let b_ridge = ridge.value();
        assert!(b_ridge[0].abs() < b_ols[0].abs());
    }

    #[test]
    fn test_rank_deficient_keeps_last_estimate() {
        let mut o = LinReg::new(1).unwrap();
        assert_eq!(o.value(), vec![0.0, 0.0]);

        // a constant predictor is collinear with the intercept
        o.update((&[2.0][..], 1.0), 1.0);
        o.update((&[2.0][..], 3.0), 0.5);
        assert_eq!(o.value(), vec![0.0, 0.0]);

        o.update((&[4.0][..], 5.0), 1.0 / 3.0);
        let fitted = o.coef().to_vec();
        assert_relative_eq!(fitted[0], 1.5, epsilon = 1e-9);

        // collapse back to a singular system; the stored fit survives
        o.merge(&LinReg::new(1).unwrap(), 1.0).unwrap();
        assert_eq!(o.value(), fitted);
    }

    #[test]
    fn test_reset_keeps_last_estimate_without_coef() {
        let mut o = LinReg::new(2).unwrap();
        fit(&mut o, &plane());

        // a unit coefficient replaces the state with one observation
        o.update((&[1.0, 1.0][..], 0.0), 1.0);
        let beta = o.value();
        assert_relative_eq!(beta[0], 3.0, epsilon = 1e-6);
        assert_relative_eq!(beta[1], -2.0, epsilon = 1e-6);
        assert_relative_eq!(beta[2], 5.0, epsilon = 1e-6);
    }

    #[test]
    fn test_merge_matches_full_fit() {
        let data = plane();
        let mut a = LinReg::new(2).unwrap();
        let mut b = LinReg::new(2).unwrap();
        fit(&mut a, &data[..12]);
        fit(&mut b, &data[12..]);
        a.merge(&b, 18.0 / 30.0).unwrap();

        let mut all = LinReg::new(2).unwrap();
        fit(&mut all, &data);
        for (x, y) in a.value().iter().zip(all.value().iter()) {
            assert_relative_eq!(x, y, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_merge_different_lambda_fails() {
        let mut a = LinReg::ridge(vec![0.1]).unwrap();
        let b = LinReg::ridge(vec![0.2]).unwrap();
        assert!(a.merge(&b, 0.5).is_err());
    }

    #[test]
    fn test_invalid_config() {
        assert!(LinReg::new(0).is_err());
        assert!(LinReg::ridge(vec![-1.0]).is_err());
        assert!(LinReg::ridge(vec![f64::NAN]).is_err());
    }
}
