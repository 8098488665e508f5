//! Reservoir sampling for uniform random sampling from streams
//!
//! Reservoir sampling maintains a fixed-size uniform random sample from
//! a stream of unknown length. Each observation has equal probability
//! of being in the final sample.

use crate::traits::{ConfigError, MergeError, Scalar, Statistic};

#[cfg(feature = "std")]
use std::vec::Vec;

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

const DEFAULT_SEED: u64 = 0x12345678;

/// Simple xorshift64 PRNG for no_std compatibility
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
struct Xorshift64 {
    state: u64,
}

impl Xorshift64 {
    fn new(seed: u64) -> Self {
        Self {
            state: if seed == 0 { 0x853c49e6748fea9b } else { seed },
        }
    }

    fn next(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }

    /// Uniform u64 in `[0, bound)`, rejection-sampled to avoid modulo bias
    fn next_bounded(&mut self, bound: u64) -> u64 {
        let threshold = bound.wrapping_neg() % bound;
        loop {
            let r = self.next();
            if r >= threshold {
                return r % bound;
            }
        }
    }

    /// `m` distinct entries of `items` by partial Fisher-Yates
    fn choose(&mut self, items: &[f64], m: usize) -> Vec<f64> {
        let mut pool = items.to_vec();
        let m = m.min(pool.len());
        for i in 0..m {
            let j = i + self.next_bounded((pool.len() - i) as u64) as usize;
            pool.swap(i, j);
        }
        pool.truncate(m);
        pool
    }
}

/// Reservoir sampler using Algorithm R
///
/// The first `k` observations fill the reservoir. Observation number `n`
/// after that draws `j` uniformly from `[1, n]` and replaces slot `j` when
/// `j <= k`. The decay coefficient is ignored.
///
/// # Example
///
/// ```
/// use flowseries::sampling::ReservoirSample;
/// use flowseries::Statistic;
///
/// let mut r = ReservoirSample::new(5).unwrap();
///
/// for i in 0..100 {
///     r.update(i as f64, 1.0);
/// }
///
/// assert_eq!(r.value().len(), 5);
/// ```
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReservoirSample {
    capacity: usize,
    reservoir: Vec<f64>,
    nobs: u64,
    rng: Xorshift64,
}

impl ReservoirSample {
    /// Create a sampler holding up to `k >= 1` observations
    pub fn new(k: usize) -> Result<Self, ConfigError> {
        Self::with_seed(k, DEFAULT_SEED)
    }

    /// Create a sampler with an explicit PRNG seed, for reproducibility
    pub fn with_seed(k: usize, seed: u64) -> Result<Self, ConfigError> {
        if k == 0 {
            return Err(ConfigError::new("k", 0.0, "must be at least 1"));
        }
        Ok(Self {
            capacity: k,
            reservoir: Vec::with_capacity(k),
            nobs: 0,
            rng: Xorshift64::new(seed),
        })
    }

    pub fn sample(&self) -> &[f64] {
        &self.reservoir
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_full(&self) -> bool {
        self.reservoir.len() >= self.capacity
    }

    /// Probability that any given observation is in the current sample
    pub fn sampling_probability(&self) -> f64 {
        if self.nobs == 0 {
            0.0
        } else {
            ((self.capacity as f64) / (self.nobs as f64)).min(1.0)
        }
    }
}

impl Statistic for ReservoirSample {
    type Kind = Scalar;
    type Output = Vec<f64>;

    fn update(&mut self, y: f64, _gamma: f64) {
        self.nobs += 1;

        if self.reservoir.len() < self.capacity {
            self.reservoir.push(y);
        } else {
            let j = self.rng.next_bounded(self.nobs) + 1;
            if j <= self.capacity as u64 {
                self.reservoir[(j - 1) as usize] = y;
            }
        }
    }

    fn value(&self) -> Vec<f64> {
        self.reservoir.clone()
    }

    fn check_merge(&self, other: &Self) -> Result<(), MergeError> {
        if self.capacity != other.capacity {
            return Err(MergeError::incompatible(
                "k",
                self.capacity,
                other.capacity,
            ));
        }
        Ok(())
    }

    fn merge(&mut self, other: &Self, _gamma: f64) -> Result<(), MergeError> {
        self.check_merge(other)?;

        if other.nobs == 0 {
            return Ok(());
        }

        if self.nobs == 0 {
            self.reservoir = other.reservoir.clone();
            self.nobs = other.nobs;
            return Ok(());
        }

        let total = self.nobs + other.nobs;
        let self_len = self.reservoir.len();
        let other_len = other.reservoir.len();

        if self_len + other_len <= self.capacity {
            // both underfilled: every observation fits
            self.reservoir.extend_from_slice(&other.reservoir);
        } else {
            // draw k of the total observations without replacement, then take
            // that many distinct entries from each side
            let mut from_self = 0;
            let mut left_self = self.nobs;
            let mut left_total = total;
            for _ in 0..self.capacity {
                if self.rng.next_bounded(left_total) < left_self {
                    from_self += 1;
                    left_self -= 1;
                }
                left_total -= 1;
            }

            let mut merged = self.rng.choose(&self.reservoir, from_self);
            merged.extend(self.rng.choose(&other.reservoir, self.capacity - from_self));
            self.reservoir = merged;
        }

        self.nobs = total;
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
    fn test_basic() {
        let mut r = ReservoirSample::new(5).unwrap();

        for i in 0..10 {
            r.update(i as f64, 1.0);
        }

        assert_eq!(r.sample().len(), 5);
        assert_eq!(r.nobs(), 10);
        assert!(r.is_full());
    }

    #[test]
    fn test_exact_fill_is_deterministic() {
        for seed in [1, 2, 3, 99] {
            let mut r = ReservoirSample::with_seed(3, seed).unwrap();
            for y in [1.0, 2.0, 3.0] {
                r.update(y, 1.0);
            }
            assert_eq!(r.value(), vec![1.0, 2.0, 3.0]);
        }
    }

    #[test]
    fn test_reproducibility() {
        let mut r1 = ReservoirSample::with_seed(5, 42).unwrap();
        let mut r2 = ReservoirSample::with_seed(5, 42).unwrap();

        for i in 0..100 {
            r1.update(i as f64, 1.0);
            r2.update(i as f64, 1.0);
        }

        assert_eq!(r1.sample(), r2.sample());
    }

    #[test]
    fn test_uniformity() {
        let mut counts = [0usize; 10];
        let iterations = 10000;

        for i in 0..iterations {
            let seed = (i as u64)
                .wrapping_mul(0x9e3779b97f4a7c15)
                .wrapping_add(0x853c49e6748fea9b);
            let mut r = ReservoirSample::with_seed(1, seed).unwrap();
            for y in 0..10 {
                r.update(y as f64, 1.0);
            }
            counts[r.sample()[0] as usize] += 1;
        }

        let expected = iterations / 10;
        for (i, &count) in counts.iter().enumerate() {
            let deviation = (count as i64 - expected as i64).abs() as f64 / expected as f64;
            assert!(
                deviation < 0.1,
                "Item {} appeared {} times (expected ~{})",
                i,
                count,
                expected
            );
        }
    }

    #[test]
    fn test_merge_underfilled_keeps_everything() {
        let mut a = ReservoirSample::with_seed(10, 1).unwrap();
        let mut b = ReservoirSample::with_seed(10, 2).unwrap();
        for y in 0..4 {
            a.update(y as f64, 1.0);
        }
        for y in 4..9 {
            b.update(y as f64, 1.0);
        }

        a.merge(&b, 0.5).unwrap();
        assert_eq!(a.nobs(), 9);
        assert_eq!(a.value(), (0..9).map(|y| y as f64).collect::<Vec<_>>());
    }

    #[test]
    fn test_merge_full() {
        let mut a = ReservoirSample::with_seed(10, 1).unwrap();
        let mut b = ReservoirSample::with_seed(10, 2).unwrap();
        for y in 0..1000 {
            a.update(y as f64, 1.0);
            b.update((y + 1000) as f64, 1.0);
        }

        a.merge(&b, 0.5).unwrap();
        assert_eq!(a.nobs(), 2000);
        assert_eq!(a.sample().len(), 10);
        assert!((a.sampling_probability() - 0.005).abs() < 1e-12);
    }

    #[test]
    fn test_merge_full_has_no_duplicates() {
        for seed in 1..50u64 {
            let mut a = ReservoirSample::with_seed(10, seed).unwrap();
            let mut b = ReservoirSample::with_seed(10, seed + 1000).unwrap();
            for y in 0..100 {
                a.update(y as f64, 1.0);
                b.update((y + 100) as f64, 1.0);
            }

            a.merge(&b, 0.5).unwrap();
            let mut sample = a.value();
            sample.sort_by(|x, y| x.partial_cmp(y).unwrap());
            sample.dedup();
            assert_eq!(sample.len(), 10, "seed {} produced duplicates", seed);
        }
    }

    #[test]
    fn test_merge_partially_filled_side() {
        let mut a = ReservoirSample::with_seed(5, 7).unwrap();
        let mut b = ReservoirSample::with_seed(5, 8).unwrap();
        for y in 0..50 {
            a.update(y as f64, 1.0);
        }
        for y in [100.0, 101.0] {
            b.update(y, 1.0);
        }

        a.merge(&b, 0.5).unwrap();
        assert_eq!(a.nobs(), 52);
        let mut sample = a.value();
        assert_eq!(sample.len(), 5);
        sample.sort_by(|x, y| x.partial_cmp(y).unwrap());
        sample.dedup();
        assert_eq!(sample.len(), 5);
    }

    #[test]
    fn test_merge_incompatible() {
        let mut a = ReservoirSample::new(3).unwrap();
        let b = ReservoirSample::new(4).unwrap();
        assert!(a.merge(&b, 0.5).is_err());
        assert!(ReservoirSample::new(0).is_err());
    }
}
