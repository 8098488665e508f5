//! Fixed-width histogram adapter
//!
//! [`Hist`] only maps an observation to a bucket index. Counting and merging
//! counts are delegated to a [`Bins`] implementation.

use crate::math;
use crate::traits::{ConfigError, MergeError, Scalar, Statistic};

#[cfg(feature = "std")]
use std::vec::Vec;

#[cfg(not(feature = "std"))]
use alloc::{vec, vec::Vec};

/// Bucket storage driven by [`Hist`]
pub trait Bins: Clone + core::fmt::Debug {
    /// Number of buckets
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Count one observation in bucket `idx < len()`
    fn increment(&mut self, idx: usize);

    /// Add the counts of `other` into `self`
    fn merge(&mut self, other: &Self) -> Result<(), MergeError>;

    /// Count per bucket
    fn counts(&self) -> Vec<u64>;
}

/// Plain vector of counters
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FixedBins {
    counts: Vec<u64>,
}

impl FixedBins {
    pub fn new(nbins: usize) -> Self {
        Self {
            counts: vec![0; nbins],
        }
    }
}

impl Bins for FixedBins {
    fn len(&self) -> usize {
        self.counts.len()
    }

    fn increment(&mut self, idx: usize) {
        self.counts[idx] = self.counts[idx].saturating_add(1);
    }

    fn merge(&mut self, other: &Self) -> Result<(), MergeError> {
        if self.counts.len() != other.counts.len() {
            return Err(MergeError::incompatible(
                "nbins",
                self.counts.len(),
                other.counts.len(),
            ));
        }
        for (a, &b) in self.counts.iter_mut().zip(&other.counts) {
            *a = a.saturating_add(b);
        }
        Ok(())
    }

    fn counts(&self) -> Vec<u64> {
        self.counts.clone()
    }
}

/// Histogram over equal-width, left-closed bins
///
/// Bucket `i` covers `[start + i·step, start + (i+1)·step)`. Observations
/// outside every bucket, and NaN, are dropped but still counted by
/// [`nobs`](Statistic::nobs). Counts ignore the decay coefficient.
///
/// # Example
///
/// ```
/// use flowseries::frequency::Hist;
/// use flowseries::Statistic;
///
/// let mut h = Hist::new(0.0, 1.0, 3).unwrap();
/// for y in [0.0, 0.5, 1.0, 2.9, 3.0, -0.1] {
///     h.update(y, 1.0);
/// }
/// assert_eq!(h.value(), vec![2, 1, 1]);
/// ```
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Hist<B = FixedBins> {
    start: f64,
    step: f64,
    bins: B,
    nobs: u64,
}

impl Hist<FixedBins> {
    /// `nbins >= 1` buckets of width `step > 0` starting at `start`
    pub fn new(start: f64, step: f64, nbins: usize) -> Result<Self, ConfigError> {
        if nbins == 0 {
            return Err(ConfigError::new("nbins", 0.0, "must be at least 1"));
        }
        Self::with_bins(start, step, FixedBins::new(nbins))
    }
}

impl<B: Bins> Hist<B> {
    /// Drive caller-supplied bucket storage
    pub fn with_bins(start: f64, step: f64, bins: B) -> Result<Self, ConfigError> {
        if !start.is_finite() {
            return Err(ConfigError::new("start", start, "must be finite"));
        }
        if !(step > 0.0 && step.is_finite()) {
            return Err(ConfigError::new("step", step, "must be finite and positive"));
        }
        if bins.is_empty() {
            return Err(ConfigError::new("nbins", 0.0, "must be at least 1"));
        }
        Ok(Self {
            start,
            step,
            bins,
            nobs: 0,
        })
    }

    pub fn bins(&self) -> &B {
        &self.bins
    }

    /// Bucket boundaries, `len() + 1` of them
    pub fn edges(&self) -> Vec<f64> {
        (0..=self.bins.len())
            .map(|i| self.start + i as f64 * self.step)
            .collect()
    }

    /// Bucket holding `y`, if any
    pub fn index(&self, y: f64) -> Option<usize> {
        let pos = math::floor((y - self.start) / self.step);
        if pos >= 0.0 && pos < self.bins.len() as f64 {
            Some(pos as usize)
        } else {
            None
        }
    }
}

impl<B: Bins> Statistic for Hist<B> {
    type Kind = Scalar;
    type Output = Vec<u64>;

    fn update(&mut self, y: f64, _gamma: f64) {
        self.nobs += 1;
        if let Some(idx) = self.index(y) {
            self.bins.increment(idx);
        }
    }

    fn value(&self) -> Vec<u64> {
        self.bins.counts()
    }

    fn check_merge(&self, other: &Self) -> Result<(), MergeError> {
        if self.start != other.start || self.step != other.step {
            return Err(MergeError::incompatible(
                "(start, step)",
                (self.start, self.step),
                (other.start, other.step),
            ));
        }
        if self.bins.len() != other.bins.len() {
            return Err(MergeError::incompatible(
                "nbins",
                self.bins.len(),
                other.bins.len(),
            ));
        }
        Ok(())
    }

    fn merge(&mut self, other: &Self, _gamma: f64) -> Result<(), MergeError> {
        self.check_merge(other)?;
        self.bins.merge(&other.bins)?;
        self.nobs += other.nobs;
        Ok(())
    }

    fn nobs(&self) -> u64 {
        self.nobs
    }
}
