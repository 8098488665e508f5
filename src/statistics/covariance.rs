//! Covariance and correlation matrices

use nalgebra::{DMatrix, DVector};

use crate::linalg;
use crate::math::{self, smooth};
use crate::traits::{ConfigError, MergeError, Statistic, Vector};

/// Running covariance matrix of `p`-dimensional observations
///
/// Maintains the smoothed column means `b` and the smoothed second-moment
/// matrix `A = mean(x xᵗ)`. The covariance is `n/(n-1) · (A - b bᵗ)`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CovMatrix {
    a: DMatrix<f64>,
    b: DVector<f64>,
    nobs: u64,
}

impl CovMatrix {
    /// Create an accumulator for observations of width `p >= 1`
    pub fn new(p: usize) -> Result<Self, ConfigError> {
        if p == 0 {
            return Err(ConfigError::new("p", 0.0, "must be at least 1"));
        }
        Ok(Self {
            a: DMatrix::zeros(p, p),
            b: DVector::zeros(p),
            nobs: 0,
        })
    }

    pub fn dim(&self) -> usize {
        self.b.len()
    }

    pub fn mean(&self) -> &DVector<f64> {
        &self.b
    }

    /// Diagonal of the covariance matrix
    pub fn var(&self) -> DVector<f64> {
        self.value().diagonal()
    }

    pub fn std(&self) -> DVector<f64> {
        self.var().map(math::sqrt)
    }

    /// Correlation matrix: the covariance scaled by inverse standard deviations
    pub fn cor(&self) -> DMatrix<f64> {
        let cov = self.value();
        let inv_std = cov.diagonal().map(|v| 1.0 / math::sqrt(v));
        DMatrix::from_fn(cov.nrows(), cov.ncols(), |i, j| {
            cov[(i, j)] * inv_std[i] * inv_std[j]
        })
    }

    fn unbias(&self) -> f64 {
        if self.nobs < 2 {
            0.0
        } else {
            self.nobs as f64 / (self.nobs - 1) as f64
        }
    }
}

impl Statistic for CovMatrix {
    type Kind = Vector;
    type Output = DMatrix<f64>;

    fn update(&mut self, x: &[f64], gamma: f64) {
        self.nobs += 1;
        for (b, &y) in self.b.iter_mut().zip(x) {
            *b = smooth(*b, y, gamma);
        }
        linalg::smooth_rank_one(&mut self.a, |i| x[i], gamma);
    }

    fn value(&self) -> DMatrix<f64> {
        (&self.a - &self.b * self.b.transpose()) * self.unbias()
    }

    fn check_merge(&self, other: &Self) -> Result<(), MergeError> {
        if self.dim() != other.dim() {
            return Err(MergeError::incompatible("p", self.dim(), other.dim()));
        }
        Ok(())
    }

    fn merge(&mut self, other: &Self, gamma: f64) -> Result<(), MergeError> {
        self.check_merge(other)?;
        self.nobs += other.nobs;
        linalg::smooth_matrix(&mut self.a, &other.a, gamma);
        self.b.zip_apply(&other.b, |a, b| *a = smooth(*a, b, gamma));
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

    fn rows() -> Vec<[f64; 2]> {
        vec![[1.0, 2.0], [2.0, 4.1], [3.0, 5.9], [4.0, 8.2], [5.0, 9.8]]
    }

    fn fit(c: &mut CovMatrix, data: &[[f64; 2]]) {
        for (i, row) in data.iter().enumerate() {
            c.update(row, 1.0 / (i + 1) as f64);
        }
    }

    #[test]
    fn test_covariance() {
        let mut c = CovMatrix::new(2).unwrap();
        fit(&mut c, &rows());

        let cov = c.value();
        assert_relative_eq!(cov[(0, 0)], 2.5, epsilon = 1e-10);
        assert_relative_eq!(cov[(0, 1)], cov[(1, 0)], epsilon = 1e-12);
        assert_relative_eq!(c.mean()[0], 3.0, epsilon = 1e-12);

        let xs: Vec<f64> = rows().iter().map(|r| r[1]).collect();
        let mean_y = xs.iter().sum::<f64>() / 5.0;
        let var_y = xs.iter().map(|y| (y - mean_y).powi(2)).sum::<f64>() / 4.0;
        assert_relative_eq!(cov[(1, 1)], var_y, epsilon = 1e-10);
    }

    #[test]
    fn test_correlation() {
        let mut c = CovMatrix::new(2).unwrap();
        fit(&mut c, &rows());
        let cor = c.cor();
        assert_relative_eq!(cor[(0, 0)], 1.0, epsilon = 1e-12);
        assert_relative_eq!(cor[(1, 1)], 1.0, epsilon = 1e-12);
        assert!(cor[(0, 1)] > 0.99 && cor[(0, 1)] <= 1.0);
    }

    #[test]
    fn test_merge() {
        let data = rows();
        let mut a = CovMatrix::new(2).unwrap();
        let mut b = CovMatrix::new(2).unwrap();
        fit(&mut a, &data[..2]);
        fit(&mut b, &data[2..]);
        a.merge(&b, 3.0 / 5.0).unwrap();

        let mut all = CovMatrix::new(2).unwrap();
        fit(&mut all, &data);
        assert_relative_eq!(a.value(), all.value(), epsilon = 1e-10);
    }

    #[test]
    fn test_merge_incompatible() {
        let mut a = CovMatrix::new(2).unwrap();
        let b = CovMatrix::new(3).unwrap();
        assert!(a.merge(&b, 0.5).is_err());
    }

    #[test]
    fn test_invalid_dimension() {
        assert!(CovMatrix::new(0).is_err());
    }
}
