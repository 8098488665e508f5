//! # Flowseries
//!
//! One-pass statistics over data streams under a configurable weighting
//! schedule.
//!
//! Every accumulator consumes one observation at a time together with a
//! decay coefficient γ and smooths its state towards the new data:
//! `new = old + γ(observed - old)`. A [`Weight`](weights::Weight) schedule
//! decides γ from how much data has been seen, and a [`Series`] feeds one
//! schedule's coefficient to a fixed tuple of statistics in lockstep.
//!
//! ## Features
//!
//! - **Weighting schedules**: equal, exponential, learning-rate, harmonic and
//!   McClain schedules, with bounding and scaling decorators
//! - **Summaries**: mean, variance, moments, extrema, exact sums and
//!   differences, covariance matrices, complex-valued wrappers
//! - **Quantiles**: three online estimators plus averaged order statistics
//! - **Sketches**: HyperLogLog cardinality, reservoir sampling, histograms
//! - **Models**: ridge regression and sequential k-means
//! - **Mergeability**: partial results over disjoint partitions combine with
//!   a choice of merge policies; under equal weighting the result is exact
//!
//! ## Quick Start
//!
//! ```rust
//! use flowseries::prelude::*;
//!
//! let mut s = Series::new((Mean::new(), Variance::new()), EqualWeight::new()).unwrap();
//! s.fit([2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
//!
//! let (mean, var) = s.value();
//! assert!((mean - 5.0).abs() < 1e-12);
//! assert!((var - 32.0 / 7.0).abs() < 1e-12);
//! ```
//!
//! ## Distributed Computing
//!
//! Series built with the same statistics merge, so partitions can be fit
//! independently and reduced afterwards:
//!
//! ```rust
//! use flowseries::cardinality::HyperLogLog;
//! use flowseries::prelude::*;
//!
//! let template = Series::new((HyperLogLog::new(12).unwrap(),), EqualWeight::new()).unwrap();
//! let mut worker1 = template.clone();
//! let mut worker2 = template.clone();
//!
//! worker1.fit((0..500).map(|i| i as f64)).unwrap();
//! worker2.fit((250..1000).map(|i| i as f64)).unwrap();
//!
//! worker1.merge(&worker2, MergePolicy::Append).unwrap();
//! let (distinct,) = worker1.value();
//! assert!((distinct - 1000.0).abs() < 100.0);
//! ```
//!
//! ## Feature Flags
//!
//! - `std` (default): standard library support; without it the crate builds
//!   on `alloc` with `libm` math
//! - `serde`: `Serialize`/`Deserialize` for schedules, statistics and series

#![cfg_attr(not(feature = "std"), no_std)]
#![cfg_attr(docsrs, feature(doc_cfg))]

#[cfg(not(feature = "std"))]
extern crate alloc;

pub mod traits;

mod math;

pub mod linalg;

pub mod weights;

pub mod statistics;

pub mod quantiles;

pub mod cardinality;

pub mod sampling;

pub mod models;

pub mod frequency;

pub mod series;

pub mod prelude {
    pub use crate::traits::*;

    pub use crate::series::{MergePolicy, Series, StatGroup};
    pub use crate::weights::{
        Bounded, EqualWeight, ExponentialWeight, HarmonicWeight, LearningRate, LearningRate2,
        McclainWeight, Scaled, Weight,
    };

    pub use crate::statistics::{CStat, CovMatrix, Diff, Extrema, Mean, Moments, Sum, Variance};
}

pub use series::{MergePolicy, Series};
pub use traits::{ConfigError, DimensionMismatch, MergeError, Statistic};
