//! HyperLogLog cardinality estimator
//!
//! Flajolet et al.'s estimator over a 32-bit hash, with the classic small-
//! and large-range corrections.

use xxhash_rust::xxh32::xxh32;

use crate::math;
use crate::traits::{ConfigError, MergeError, Scalar, Statistic};

#[cfg(feature = "std")]
use std::vec::Vec;

#[cfg(not(feature = "std"))]
use alloc::{vec, vec::Vec};

/// 2^32, the size of the hash space
const HASH_SPACE: f64 = 4_294_967_296.0;

/// HyperLogLog cardinality estimator
///
/// Estimates the number of distinct values with `2^b` one-byte registers.
/// Numeric observations are hashed by bit pattern (`0.0` and `-0.0` are the
/// same value). The decay coefficient is ignored.
///
/// # Error Rate
///
/// The relative standard error is approximately 1.04 / sqrt(m) where m = 2^b.
///
/// | b | Registers | Error |
/// |---|-----------|-------|
/// | 4 | 16 | ~26% |
/// | 10 | 1024 | ~3.25% |
/// | 12 | 4096 | ~1.63% |
/// | 14 | 16384 | ~0.81% |
/// | 16 | 65536 | ~0.41% |
///
/// # Example
///
/// ```
/// use flowseries::cardinality::HyperLogLog;
/// use flowseries::Statistic;
///
/// let mut hll = HyperLogLog::new(12).unwrap();
///
/// for i in 0..10000 {
///     hll.update((i % 500) as f64, 1.0);
/// }
///
/// let count = hll.value();
/// assert!(count > 450.0 && count < 550.0);
/// ```
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HyperLogLog {
    /// Register bits (4-16)
    b: u8,
    /// One byte per register
    registers: Vec<u8>,
    /// Number of items inserted
    nobs: u64,
}

impl HyperLogLog {
    /// Create a HyperLogLog with `2^b` registers
    ///
    /// Fails unless `4 <= b <= 16`.
    pub fn new(b: u8) -> Result<Self, ConfigError> {
        if !(4..=16).contains(&b) {
            return Err(ConfigError::new(
                "b",
                b as f64,
                "must be between 4 and 16",
            ));
        }
        Ok(Self {
            b,
            registers: vec![0u8; 1usize << b],
            nobs: 0,
        })
    }

    /// Create a HyperLogLog targeting a relative standard error
    pub fn with_error(target_error: f64) -> Result<Self, ConfigError> {
        Self::new(super::bits_for_error(target_error))
    }

    /// Register bits `b`
    pub fn bits(&self) -> u8 {
        self.b
    }

    /// Number of registers (m = 2^b)
    pub fn num_registers(&self) -> usize {
        self.registers.len()
    }

    pub fn registers(&self) -> &[u8] {
        &self.registers
    }

    /// Insert a string key
    pub fn insert(&mut self, item: &str) {
        self.insert_bytes(item.as_bytes());
    }

    /// Insert raw bytes
    pub fn insert_bytes(&mut self, bytes: &[u8]) {
        self.insert_hash(xxh32(bytes, 0));
    }

    /// Insert a pre-computed 32-bit hash
    pub fn insert_hash(&mut self, hash: u32) {
        self.nobs += 1;

        // low b bits select the register
        let mask = (1u32 << self.b) - 1;
        let idx = (hash & mask) as usize;

        // leading zeros of the remaining bits + 1
        let rho = (hash & !mask).leading_zeros() as u8 + 1;

        if rho > self.registers[idx] {
            self.registers[idx] = rho;
        }
    }

    /// Relative standard error, 1.04 / sqrt(m)
    pub fn relative_error(&self) -> f64 {
        1.04 / math::sqrt(self.registers.len() as f64)
    }

    /// Alpha constant for given m
    fn alpha_m(&self) -> f64 {
        let m = self.registers.len();
        match m {
            16 => 0.673,
            32 => 0.697,
            64 => 0.709,
            _ => 0.7213 / (1.0 + 1.079 / m as f64),
        }
    }

    /// Raw estimate using harmonic mean
    fn raw_estimate(&self) -> f64 {
        let m = self.registers.len() as f64;
        let sum: f64 = self
            .registers
            .iter()
            .map(|&r| math::powi(2.0, -(r as i32)))
            .sum();
        self.alpha_m() * m * m / sum
    }

    /// Count registers with value 0
    fn count_zeros(&self) -> usize {
        self.registers.iter().filter(|&&r| r == 0).count()
    }
}

impl Statistic for HyperLogLog {
    type Kind = Scalar;
    type Output = f64;

    fn update(&mut self, y: f64, _gamma: f64) {
        let y = if y == 0.0 { 0.0 } else { y };
        self.insert_bytes(&y.to_bits().to_le_bytes());
    }

    fn value(&self) -> f64 {
        let m = self.registers.len() as f64;
        let estimate = self.raw_estimate();

        if estimate <= 2.5 * m {
            // small range: linear counting
            let zeros = self.count_zeros();
            if zeros > 0 {
                m * math::ln(m / zeros as f64)
            } else {
                estimate
            }
        } else if estimate <= HASH_SPACE / 30.0 {
            estimate
        } else {
            // large range: hash collisions saturate near 2^32
            -HASH_SPACE * math::ln(1.0 - estimate / HASH_SPACE)
        }
    }

    fn check_merge(&self, other: &Self) -> Result<(), MergeError> {
        if self.b != other.b {
            return Err(MergeError::incompatible("b", self.b, other.b));
        }
        Ok(())
    }

    fn merge(&mut self, other: &Self, _gamma: f64) -> Result<(), MergeError> {
        self.check_merge(other)?;

        // Take element-wise max
        for (a, &b) in self.registers.iter_mut().zip(other.registers.iter()) {
            *a = (*a).max(b);
        }

        self.nobs += other.nobs;
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
        let mut hll = HyperLogLog::new(12).unwrap();

        for i in 0..10000 {
            hll.insert(&format!("item_{}", i));
        }

        let estimate = hll.value();
        // Should be within 10% of actual
        assert!(estimate > 9000.0 && estimate < 11000.0, "{}", estimate);
    }

    #[test]
    fn test_empty() {
        let hll = HyperLogLog::new(12).unwrap();
        assert_eq!(hll.value(), 0.0);
    }

    #[test]
    fn test_duplicates() {
        let mut hll = HyperLogLog::new(12).unwrap();

        for _ in 0..10000 {
            hll.update(42.0, 1.0);
        }

        let estimate = hll.value();
        assert!((0.5..=2.0).contains(&estimate));
        assert_eq!(hll.nobs(), 10000);
    }

    #[test]
    fn test_signed_zero_is_one_value() {
        let mut hll = HyperLogLog::new(8).unwrap();
        hll.update(0.0, 1.0);
        hll.update(-0.0, 1.0);
        assert!(hll.value() < 1.5);
    }

    #[test]
    fn test_register_selection() {
        let mut hll = HyperLogLog::new(4).unwrap();
        // low 4 bits = 3, remaining bits start at bit 31
        hll.insert_hash(0x8000_0003);
        assert_eq!(hll.registers()[3], 1);
        // only bit 4 set above the mask: 27 leading zeros
        hll.insert_hash(0x0000_0015);
        assert_eq!(hll.registers()[5], 28);
        // nothing above the mask
        hll.insert_hash(0x0000_0007);
        assert_eq!(hll.registers()[7], 33);
    }

    #[test]
    fn test_merge() {
        let mut hll1 = HyperLogLog::new(12).unwrap();
        let mut hll2 = HyperLogLog::new(12).unwrap();

        for i in 0..5000 {
            hll1.insert(&format!("a_{}", i));
        }
        for i in 0..5000 {
            hll2.insert(&format!("b_{}", i));
        }

        let est1 = hll1.value();
        let est2 = hll2.value();

        hll1.merge(&hll2, 0.5).unwrap();
        let merged_est = hll1.value();

        assert!(merged_est > est1);
        assert!(merged_est > est2);
        assert!(merged_est > 9000.0 && merged_est < 11000.0);
    }

    #[test]
    fn test_merge_incompatible() {
        let mut hll1 = HyperLogLog::new(12).unwrap();
        let hll2 = HyperLogLog::new(14).unwrap();

        assert!(hll1.merge(&hll2, 0.5).is_err());
    }

    #[test]
    fn test_invalid_bits() {
        assert!(HyperLogLog::new(3).is_err());
        assert!(HyperLogLog::new(17).is_err());
        assert_eq!(HyperLogLog::new(14).unwrap().num_registers(), 16384);
    }

    #[test]
    fn test_small_cardinalities() {
        let mut hll = HyperLogLog::new(12).unwrap();

        for i in 0..100 {
            hll.update(i as f64, 1.0);
        }

        let estimate = hll.value();
        assert!(estimate > 80.0 && estimate < 120.0);
    }

    #[test]
    fn test_with_error() {
        let hll = HyperLogLog::with_error(0.01).unwrap();
        assert!(hll.bits() >= 13);
        assert!(hll.relative_error() <= 0.01);
    }
}
