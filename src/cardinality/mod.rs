//! Cardinality (distinct count) estimation algorithms
//!
//! This module provides sketches for estimating the number of distinct
//! elements in a data stream.
//!
//! # Algorithms
//!
//! - [`HyperLogLog`]: register-max sketch with small- and large-range corrections
//!
//! # Example
//!
//! ```
//! use flowseries::cardinality::HyperLogLog;
//! use flowseries::Statistic;
//!
//! let mut hll = HyperLogLog::new(14).unwrap(); // ~0.8% error
//!
//! for i in 0..10000 {
//!     hll.insert(&i.to_string());
//! }
//!
//! let estimate = hll.value();
//! println!("estimated distinct count: {}", estimate);
//! ```

mod hyperloglog;

use crate::math;

pub use hyperloglog::HyperLogLog;

/// Register bits needed for a target relative standard error
///
/// HLL error is approximately 1.04 / sqrt(2^b)
pub fn bits_for_error(target_error: f64) -> u8 {
    // m = (1.04 / error)^2, b = log2(m)
    let m = (1.04 / target_error) * (1.04 / target_error);
    let b = math::ceil(math::log2(m));
    if b.is_nan() {
        return 16;
    }
    b.clamp(4.0, 16.0) as u8
}

/// Expected relative standard error for `b` register bits
pub fn error_for_bits(b: u8) -> f64 {
    let m = (1usize << b) as f64;
    1.04 / math::sqrt(m)
}
