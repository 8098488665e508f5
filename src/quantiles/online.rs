//! Online quantile estimators
//!
//! Three stochastic approaches to minimising the weighted pinball loss, one
//! estimate per tracked level. All of them reset every estimate to the
//! observation when `γ == 1`, which every schedule produces for its first
//! observation.

use crate::math::{self, smooth, smooth_slice};
use crate::traits::{ConfigError, MergeError, Scalar, Statistic};

#[cfg(feature = "std")]
use std::vec::Vec;

#[cfg(not(feature = "std"))]
use alloc::{vec, vec::Vec};

/// Guards the inverse-distance weight when `y` equals the current estimate
const EPSILON: f64 = 1e-7;

const DEFAULT_LEVELS: [f64; 3] = [0.25, 0.5, 0.75];

fn validate_levels(tau: &[f64]) -> Result<Vec<f64>, ConfigError> {
    if tau.is_empty() {
        return Err(ConfigError::new(
            "tau",
            0.0,
            "at least one quantile level is required",
        ));
    }
    if let Some(&bad) = tau.iter().find(|&&t| !(t > 0.0 && t < 1.0)) {
        return Err(ConfigError::new("tau", bad, "must be in (0, 1)"));
    }
    Ok(tau.to_vec())
}

fn check_levels(a: &[f64], b: &[f64]) -> Result<(), MergeError> {
    if a != b {
        return Err(MergeError::incompatible("tau", a, b));
    }
    Ok(())
}

/// Inverse distance between `y` and an estimate
#[inline]
fn inverse_distance(y: f64, estimate: f64) -> f64 {
    1.0 / (math::abs(y - estimate) + EPSILON)
}

/// Majorize-minimize quantile estimator (online MM / OMAS)
///
/// Keeps weighted sums `s_j = mean(w·y)` and `t_j = mean(w)` with
/// `w = 1 / (|y - q_j| + ε)` and sets `q_j = (s_j + 2τ_j - 1) / t_j`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct QuantileMM {
    value: Vec<f64>,
    tau: Vec<f64>,
    s: Vec<f64>,
    t: Vec<f64>,
    nobs: u64,
}

impl QuantileMM {
    /// Track the levels `tau`, each in `(0, 1)`
    pub fn new(tau: &[f64]) -> Result<Self, ConfigError> {
        validate_levels(tau).map(Self::with_levels)
    }

    fn with_levels(tau: Vec<f64>) -> Self {
        let k = tau.len();
        Self {
            value: vec![0.0; k],
            tau,
            s: vec![0.0; k],
            t: vec![0.0; k],
            nobs: 0,
        }
    }

    pub fn levels(&self) -> &[f64] {
        &self.tau
    }
}

impl Default for QuantileMM {
    fn default() -> Self {
        Self::with_levels(DEFAULT_LEVELS.to_vec())
    }
}

impl Statistic for QuantileMM {
    type Kind = Scalar;
    type Output = Vec<f64>;

    fn update(&mut self, y: f64, gamma: f64) {
        self.nobs += 1;
        if gamma == 1.0 {
            self.value.fill(y);
        }
        for j in 0..self.tau.len() {
            let w = inverse_distance(y, self.value[j]);
            self.s[j] = smooth(self.s[j], w * y, gamma);
            self.t[j] = smooth(self.t[j], w, gamma);
            self.value[j] = (self.s[j] + (2.0 * self.tau[j] - 1.0)) / self.t[j];
        }
    }

    fn value(&self) -> Vec<f64> {
        self.value.clone()
    }

    fn check_merge(&self, other: &Self) -> Result<(), MergeError> {
        check_levels(&self.tau, &other.tau)
    }

    fn merge(&mut self, other: &Self, gamma: f64) -> Result<(), MergeError> {
        self.check_merge(other)?;
        self.nobs += other.nobs;
        smooth_slice(&mut self.value, &other.value, gamma);
        smooth_slice(&mut self.s, &other.s, gamma);
        smooth_slice(&mut self.t, &other.t, gamma);
        Ok(())
    }

    fn nobs(&self) -> u64 {
        self.nobs
    }
}

/// Majorized stochastic proximal iteration quantile estimator
///
/// Per level: `b = τ - ½(1 - y·w)`, then `q ← (q + γb) / (1 + ½γw)`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct QuantileMSPI {
    value: Vec<f64>,
    tau: Vec<f64>,
    nobs: u64,
}

impl QuantileMSPI {
    /// Track the levels `tau`, each in `(0, 1)`
    pub fn new(tau: &[f64]) -> Result<Self, ConfigError> {
        validate_levels(tau).map(Self::with_levels)
    }

    fn with_levels(tau: Vec<f64>) -> Self {
        Self {
            value: vec![0.0; tau.len()],
            tau,
            nobs: 0,
        }
    }

    pub fn levels(&self) -> &[f64] {
        &self.tau
    }
}

impl Default for QuantileMSPI {
    fn default() -> Self {
        Self::with_levels(DEFAULT_LEVELS.to_vec())
    }
}

impl Statistic for QuantileMSPI {
    type Kind = Scalar;
    type Output = Vec<f64>;

    fn update(&mut self, y: f64, gamma: f64) {
        self.nobs += 1;
        if gamma == 1.0 {
            self.value.fill(y);
        }
        for (q, &tau) in self.value.iter_mut().zip(self.tau.iter()) {
            let w = inverse_distance(y, *q);
            let b = tau - 0.5 * (1.0 - y * w);
            *q = (*q + gamma * b) / (1.0 + 0.5 * gamma * w);
        }
    }

    fn value(&self) -> Vec<f64> {
        self.value.clone()
    }

    fn check_merge(&self, other: &Self) -> Result<(), MergeError> {
        check_levels(&self.tau, &other.tau)
    }

    fn merge(&mut self, other: &Self, gamma: f64) -> Result<(), MergeError> {
        self.check_merge(other)?;
        self.nobs += other.nobs;
        smooth_slice(&mut self.value, &other.value, gamma);
        Ok(())
    }

    fn nobs(&self) -> u64 {
        self.nobs
    }
}

/// Stochastic subgradient descent quantile estimator
///
/// Per level: `q ← q - γ(𝟙[q > y] - τ)`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct QuantileSGD {
    value: Vec<f64>,
    tau: Vec<f64>,
    nobs: u64,
}

impl QuantileSGD {
    /// Track the levels `tau`, each in `(0, 1)`
    pub fn new(tau: &[f64]) -> Result<Self, ConfigError> {
        validate_levels(tau).map(Self::with_levels)
    }

    fn with_levels(tau: Vec<f64>) -> Self {
        Self {
            value: vec![0.0; tau.len()],
            tau,
            nobs: 0,
        }
    }

    pub fn levels(&self) -> &[f64] {
        &self.tau
    }
}

impl Default for QuantileSGD {
    fn default() -> Self {
        Self::with_levels(DEFAULT_LEVELS.to_vec())
    }
}

impl Statistic for QuantileSGD {
    type Kind = Scalar;
    type Output = Vec<f64>;

    fn update(&mut self, y: f64, gamma: f64) {
        self.nobs += 1;
        if gamma == 1.0 {
            self.value.fill(y);
        }
        for (q, &tau) in self.value.iter_mut().zip(self.tau.iter()) {
            let above = if *q > y { 1.0 } else { 0.0 };
            *q -= gamma * (above - tau);
        }
    }

    fn value(&self) -> Vec<f64> {
        self.value.clone()
    }

    fn check_merge(&self, other: &Self) -> Result<(), MergeError> {
        check_levels(&self.tau, &other.tau)
    }

    fn merge(&mut self, other: &Self, gamma: f64) -> Result<(), MergeError> {
        self.check_merge(other)?;
        self.nobs += other.nobs;
        smooth_slice(&mut self.value, &other.value, gamma);
        Ok(())
    }

    fn nobs(&self) -> u64 {
        self.nobs
    }
}
