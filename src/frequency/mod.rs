//! Frequency summaries
//!
//! - [`Hist`]: equal-width histogram adapter over a [`Bins`] store
//!
//! # Example
//!
//! ```
//! use flowseries::frequency::Hist;
//! use flowseries::weights::EqualWeight;
//! use flowseries::Series;
//!
//! let mut s = Series::new((Hist::new(0.0, 10.0, 10).unwrap(),), EqualWeight::new()).unwrap();
//! s.fit([3.0, 14.0, 15.0, 99.0, 100.0]).unwrap();
//!
//! let (counts,) = s.value();
//! assert_eq!(counts.iter().sum::<u64>(), 4);
//! assert_eq!(counts[1], 2);
//! ```

mod histogram;

pub use histogram::{Bins, FixedBins, Hist};
