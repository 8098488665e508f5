//! Statistical summaries for streaming data
//!
//! This module provides accumulators for central tendency, spread and
//! extremes, exact totals, covariance, and a complex-number wrapper. All of
//! them consume one observation at a time together with a decay coefficient
//! and can be merged with a peer.
//!
//! # Example
//!
//! ```
//! use flowseries::statistics::{Extrema, Mean, Variance};
//! use flowseries::weights::EqualWeight;
//! use flowseries::Series;
//!
//! let mut s = Series::new((Mean::new(), Variance::new(), Extrema::new()), EqualWeight::new()).unwrap();
//!
//! for value in [1.0, 2.0, 3.0, 4.0, 5.0] {
//!     s.update(value).unwrap();
//! }
//!
//! let (mean, var, (min, max)) = s.value();
//! assert!((mean - 3.0).abs() < 1e-12);
//! assert!((var - 2.5).abs() < 1e-12);
//! assert_eq!((min, max), (1.0, 5.0));
//! ```

mod complex;
mod covariance;
mod moments;
mod summary;

pub use complex::CStat;
pub use covariance::CovMatrix;
pub use moments::{Extrema, Mean, Moments, Variance};
pub use summary::{Diff, Domain, Sum};
