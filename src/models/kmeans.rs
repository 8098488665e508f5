//! Sequential k-means clustering

use nalgebra::DMatrix;

use crate::linalg;
use crate::math::smooth;
use crate::traits::{ConfigError, MergeError, Statistic, Vector};

/// Online k-means over `p`-dimensional observations
///
/// The first `k` observations seed the centers in arrival order. Each later
/// observation moves its nearest center (squared Euclidean distance, ties to
/// the lowest index) towards itself by the decay coefficient. The value is
/// the `p×k` matrix of centers, one per column.
///
/// # Example
///
/// ```
/// use flowseries::models::KMeans;
/// use flowseries::Statistic;
///
/// let mut km = KMeans::new(1, 2).unwrap();
/// for y in [0.0, 10.0, 0.2, 9.8, 0.1, 10.1] {
///     km.update(&[y][..], 0.5);
/// }
/// let centers = km.value();
/// assert!(centers[(0, 0)] < 1.0);
/// assert!(centers[(0, 1)] > 9.0);
/// ```
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct KMeans {
    centers: DMatrix<f64>,
    nobs: u64,
}

impl KMeans {
    /// `k >= 1` clusters in `p >= 1` dimensions
    pub fn new(p: usize, k: usize) -> Result<Self, ConfigError> {
        if p == 0 {
            return Err(ConfigError::new("p", 0.0, "must be at least 1"));
        }
        if k == 0 {
            return Err(ConfigError::new("k", 0.0, "must be at least 1"));
        }
        Ok(Self {
            centers: DMatrix::zeros(p, k),
            nobs: 0,
        })
    }

    pub fn dim(&self) -> usize {
        self.centers.nrows()
    }

    pub fn clusters(&self) -> usize {
        self.centers.ncols()
    }

    pub fn centers(&self) -> &DMatrix<f64> {
        &self.centers
    }

    /// Index of the center nearest to `x`
    pub fn nearest(&self, x: &[f64]) -> usize {
        let mut best = 0;
        let mut best_dist = f64::INFINITY;
        for (j, center) in self.centers.column_iter().enumerate() {
            let dist: f64 = center
                .iter()
                .zip(x)
                .map(|(c, y)| (c - y) * (c - y))
                .sum();
            if dist < best_dist {
                best = j;
                best_dist = dist;
            }
        }
        best
    }
}

impl Statistic for KMeans {
    type Kind = Vector;
    type Output = DMatrix<f64>;

    fn update(&mut self, x: &[f64], gamma: f64) {
        self.nobs += 1;
        let seeded = self.nobs as usize;
        if seeded <= self.clusters() {
            self.centers.column_mut(seeded - 1).copy_from_slice(x);
            return;
        }
        let j = self.nearest(x);
        for (c, &y) in self.centers.column_mut(j).iter_mut().zip(x) {
            *c = smooth(*c, y, gamma);
        }
    }

    fn value(&self) -> DMatrix<f64> {
        self.centers.clone()
    }

    fn check_merge(&self, other: &Self) -> Result<(), MergeError> {
        if self.centers.shape() != other.centers.shape() {
            return Err(MergeError::incompatible(
                "(p, k)",
                self.centers.shape(),
                other.centers.shape(),
            ));
        }
        Ok(())
    }

    /// Centers are smoothed column by column, without matching clusters
    fn merge(&mut self, other: &Self, gamma: f64) -> Result<(), MergeError> {
        self.check_merge(other)?;
        self.nobs += other.nobs;
        linalg::smooth_matrix(&mut self.centers, &other.centers, gamma);
        Ok(())
    }

    fn nobs(&self) -> u64 {
        self.nobs
    }

    fn width(&self) -> Option<usize> {
        Some(self.dim())
    }
}
