//! Stream sampling algorithms
//!
//! This module provides algorithms for maintaining random samples from streams.
//! Useful when you need representative samples but can't store all data.
//!
//! # Example
//!
//! ```
//! use flowseries::sampling::ReservoirSample;
//! use flowseries::Statistic;
//!
//! let mut sampler = ReservoirSample::new(10).unwrap();
//!
//! // Stream many observations, keep a uniform sample of 10
//! for i in 0..100_000 {
//!     sampler.update(i as f64, 1.0);
//! }
//!
//! assert_eq!(sampler.sample().len(), 10);
//! ```

mod reservoir;

pub use reservoir::ReservoirSample;
