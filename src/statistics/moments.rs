//! Central tendency, spread and extremes
//!
//! Weighted generalisations of Welford's online algorithm. Under
//! [`EqualWeight`](crate::weights::EqualWeight) these reproduce the exact
//! sample statistics, and merging two partitions with the coefficient
//! `n2 / (n1 + n2)` reproduces the statistics of the concatenated stream.

use crate::math::{self, smooth};
use crate::traits::{MergeError, Scalar, Statistic};

/// Bias correction `n / (n - 1)`, zero below two observations
fn unbias(nobs: u64) -> f64 {
    if nobs < 2 {
        0.0
    } else {
        nobs as f64 / (nobs - 1) as f64
    }
}

/// Weighted running mean: `μ ← μ + γ(y - μ)`
///
/// # Example
///
/// ```
/// use flowseries::statistics::Mean;
/// use flowseries::Statistic;
///
/// let mut m = Mean::new();
/// m.update(1.0, 1.0);
/// m.update(3.0, 0.5);
/// assert_eq!(m.value(), 2.0);
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Mean {
    mu: f64,
    nobs: u64,
}

impl Mean {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Statistic for Mean {
    type Kind = Scalar;
    type Output = f64;

    fn update(&mut self, y: f64, gamma: f64) {
        self.nobs += 1;
        self.mu = smooth(self.mu, y, gamma);
    }

    fn value(&self) -> f64 {
        self.mu
    }

    fn merge(&mut self, other: &Self, gamma: f64) -> Result<(), MergeError> {
        self.nobs += other.nobs;
        self.mu = smooth(self.mu, other.mu, gamma);
        Ok(())
    }

    fn nobs(&self) -> u64 {
        self.nobs
    }
}

/// Weighted running variance
///
/// Keeps the mean and the biased second central moment; [`value`] applies
/// the `n / (n - 1)` correction.
///
/// [`value`]: Statistic::value
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Variance {
    mu: f64,
    sigma2: f64,
    nobs: u64,
}

impl Variance {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mean(&self) -> f64 {
        self.mu
    }

    /// Unbiased standard deviation
    pub fn std(&self) -> f64 {
        math::sqrt(self.value())
    }
}

impl Statistic for Variance {
    type Kind = Scalar;
    type Output = f64;

    fn update(&mut self, y: f64, gamma: f64) {
        self.nobs += 1;
        let mu_old = self.mu;
        self.mu = smooth(self.mu, y, gamma);
        self.sigma2 = smooth(self.sigma2, (y - self.mu) * (y - mu_old), gamma);
    }

    fn value(&self) -> f64 {
        self.sigma2 * unbias(self.nobs)
    }

    fn merge(&mut self, other: &Self, gamma: f64) -> Result<(), MergeError> {
        // between-group term from the law of total variance
        let delta = other.mu - self.mu;
        self.nobs += other.nobs;
        self.sigma2 = smooth(self.sigma2, other.sigma2, gamma) + delta * delta * gamma * (1.0 - gamma);
        self.mu = smooth(self.mu, other.mu, gamma);
        Ok(())
    }

    fn nobs(&self) -> u64 {
        self.nobs
    }
}

/// First four non-central moments
///
/// Smooths `y, y², y³, y⁴`; skewness and kurtosis are derived from them.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Moments {
    m: [f64; 4],
    nobs: u64,
}

impl Moments {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mean(&self) -> f64 {
        self.m[0]
    }

    /// Unbiased variance
    pub fn var(&self) -> f64 {
        (self.m[1] - self.m[0] * self.m[0]) * unbias(self.nobs)
    }

    pub fn std(&self) -> f64 {
        math::sqrt(self.var())
    }

    pub fn skewness(&self) -> f64 {
        let [m1, m2, m3, _] = self.m;
        let central3 = m3 - 3.0 * m1 * m2 + 2.0 * math::powi(m1, 3);
        central3 / math::powf(self.var(), 1.5)
    }

    /// Excess kurtosis
    pub fn kurtosis(&self) -> f64 {
        let [m1, m2, m3, m4] = self.m;
        let v = self.var();
        (m4 - 4.0 * m1 * m3 + 6.0 * m1 * m1 * m2 - 3.0 * math::powi(m1, 4)) / (v * v) - 3.0
    }
}

impl Statistic for Moments {
    type Kind = Scalar;
    type Output = [f64; 4];

    fn update(&mut self, y: f64, gamma: f64) {
        self.nobs += 1;
        let y2 = y * y;
        self.m[0] = smooth(self.m[0], y, gamma);
        self.m[1] = smooth(self.m[1], y2, gamma);
        self.m[2] = smooth(self.m[2], y * y2, gamma);
        self.m[3] = smooth(self.m[3], y2 * y2, gamma);
    }

    fn value(&self) -> [f64; 4] {
        self.m
    }

    fn merge(&mut self, other: &Self, gamma: f64) -> Result<(), MergeError> {
        self.nobs += other.nobs;
        math::smooth_slice(&mut self.m, &other.m, gamma);
        Ok(())
    }

    fn nobs(&self) -> u64 {
        self.nobs
    }
}

/// Running minimum and maximum
///
/// Ignores the decay coefficient. Starts at `(+∞, -∞)`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Extrema {
    min: f64,
    max: f64,
    nobs: u64,
}

impl Default for Extrema {
    fn default() -> Self {
        Self::new()
    }
}

impl Extrema {
    pub fn new() -> Self {
        Self {
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
            nobs: 0,
        }
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    /// `max - min`, or `None` before any observation
    pub fn range(&self) -> Option<f64> {
        if self.nobs == 0 {
            None
        } else {
            Some(self.max - self.min)
        }
    }
}

impl Statistic for Extrema {
    type Kind = Scalar;
    type Output = (f64, f64);

    fn update(&mut self, y: f64, _gamma: f64) {
        self.nobs += 1;
        self.min = self.min.min(y);
        self.max = self.max.max(y);
    }

    fn value(&self) -> (f64, f64) {
        (self.min, self.max)
    }

    fn merge(&mut self, other: &Self, _gamma: f64) -> Result<(), MergeError> {
        self.nobs += other.nobs;
        self.min = self.min.min(other.min);
        self.max = self.max.max(other.max);
        Ok(())
    }

    fn nobs(&self) -> u64 {
        self.nobs
    }
}
