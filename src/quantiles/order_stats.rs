//! Averaged order statistics over fixed-size blocks

use crate::math::smooth_slice;
use crate::traits::{ConfigError, MergeError, Scalar, Statistic};

#[cfg(feature = "std")]
use std::vec::Vec;

#[cfg(not(feature = "std"))]
use alloc::{vec, vec::Vec};

/// Running average of the order statistics of blocks of `b` observations
///
/// Observations are buffered until a block is complete; the sorted block is
/// then folded into the running vector with coefficient `1 / blocks`. The
/// decay coefficient of the schedule is ignored on update.
///
/// # Example
///
/// ```
/// use flowseries::quantiles::OrderStats;
/// use flowseries::Statistic;
///
/// let mut o = OrderStats::new(3).unwrap();
/// for y in [3.0, 1.0, 2.0, 6.0, 4.0, 5.0] {
///     o.update(y, 1.0);
/// }
/// assert_eq!(o.value(), vec![2.5, 3.5, 4.5]);
/// ```
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OrderStats {
    value: Vec<f64>,
    buffer: Vec<f64>,
    nreps: u64,
    nobs: u64,
}

impl OrderStats {
    /// Create an accumulator with block size `b >= 1`
    pub fn new(b: usize) -> Result<Self, ConfigError> {
        if b == 0 {
            return Err(ConfigError::new("b", 0.0, "must be at least 1"));
        }
        Ok(Self {
            value: vec![0.0; b],
            buffer: Vec::with_capacity(b),
            nreps: 0,
            nobs: 0,
        })
    }

    pub fn block_size(&self) -> usize {
        self.value.len()
    }

    /// Completed blocks
    pub fn blocks(&self) -> u64 {
        self.nreps
    }

    /// Observations waiting for their block to complete
    pub fn pending(&self) -> &[f64] {
        &self.buffer
    }

    /// Quantile `q` in `[0, 1]` by linear interpolation between the
    /// averaged order statistics
    pub fn quantile(&self, q: f64) -> Option<f64> {
        if self.nreps == 0 || !(0.0..=1.0).contains(&q) {
            return None;
        }
        let pos = q * (self.value.len() - 1) as f64;
        let lo = pos as usize;
        let hi = (lo + 1).min(self.value.len() - 1);
        let frac = pos - lo as f64;
        Some(self.value[lo] + frac * (self.value[hi] - self.value[lo]))
    }

    fn push(&mut self, y: f64) {
        self.buffer.push(y);
        if self.buffer.len() == self.value.len() {
            self.buffer.sort_by(|a, b| a.total_cmp(b));
            self.nreps += 1;
            let gamma = 1.0 / self.nreps as f64;
            smooth_slice(&mut self.value, &self.buffer, gamma);
            self.buffer.clear();
        }
    }
}

impl Statistic for OrderStats {
    type Kind = Scalar;
    type Output = Vec<f64>;

    fn update(&mut self, y: f64, _gamma: f64) {
        self.nobs += 1;
        self.push(y);
    }

    fn value(&self) -> Vec<f64> {
        self.value.clone()
    }

    fn check_merge(&self, other: &Self) -> Result<(), MergeError> {
        if self.block_size() != other.block_size() {
            return Err(MergeError::incompatible(
                "b",
                self.block_size(),
                other.block_size(),
            ));
        }
        Ok(())
    }

    fn merge(&mut self, other: &Self, gamma: f64) -> Result<(), MergeError> {
        self.check_merge(other)?;
        if other.nreps > 0 {
            if self.nreps == 0 {
                self.value.copy_from_slice(&other.value);
            } else {
                smooth_slice(&mut self.value, &other.value, gamma);
            }
            self.nreps += other.nreps;
        }
        self.nobs += other.nobs;
        for &y in &other.buffer {
            self.push(y);
        }
        Ok(())
    }

    fn nobs(&self) -> u64 {
        self.nobs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blocks() {
        let mut o = OrderStats::new(4).unwrap();
        for y in [4.0, 2.0, 3.0, 1.0] {
            o.update(y, 0.3);
        }
        assert_eq!(o.value(), vec![1.0, 2.0, 3.0, 4.0]);
        assert_eq!(o.blocks(), 1);
        assert!(o.pending().is_empty());
    }

    #[test]
    fn test_partial_block_keeps_zero_value() {
        let mut o = OrderStats::new(5).unwrap();
        for y in [1.0, 2.0, 3.0] {
            o.update(y, 1.0);
        }
        assert_eq!(o.value(), vec![0.0; 5]);
        assert_eq!(o.pending(), &[1.0, 2.0, 3.0]);
        assert_eq!(o.quantile(0.5), None);
    }

    #[test]
    fn test_merge_completes_partial_block() {
        let mut a = OrderStats::new(5).unwrap();
        let mut b = OrderStats::new(5).unwrap();
        for y in [5.0, 1.0, 3.0] {
            a.update(y, 1.0);
        }
        for y in [4.0, 2.0] {
            b.update(y, 1.0);
        }

        a.merge(&b, 0.4).unwrap();
        assert_eq!(a.value(), vec![1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_eq!(a.nobs(), 5);
        assert!(a.pending().is_empty());
    }

    #[test]
    fn test_merge_smooths_blocks() {
        let mut a = OrderStats::new(2).unwrap();
        let mut b = OrderStats::new(2).unwrap();
        for y in [1.0, 3.0] {
            a.update(y, 1.0);
        }
        for y in [5.0, 7.0] {
            b.update(y, 1.0);
        }

        a.merge(&b, 0.5).unwrap();
        assert_eq!(a.value(), vec![3.0, 5.0]);
        assert_eq!(a.blocks(), 2);
    }

    #[test]
    fn test_quantile_interpolates() {
        let mut o = OrderStats::new(5).unwrap();
        for y in [10.0, 20.0, 30.0, 40.0, 50.0] {
            o.update(y, 1.0);
        }
        assert_eq!(o.quantile(0.0), Some(10.0));
        assert_eq!(o.quantile(0.5), Some(30.0));
        assert_eq!(o.quantile(1.0), Some(50.0));
        assert_eq!(o.quantile(0.625), Some(35.0));
        assert_eq!(o.quantile(1.5), None);
    }

    #[test]
    fn test_merge_incompatible() {
        let mut a = OrderStats::new(3).unwrap();
        let b = OrderStats::new(4).unwrap();
        assert!(a.merge(&b, 0.5).is_err());
        assert!(OrderStats::new(0).is_err());
    }
}
