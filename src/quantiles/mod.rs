//! Quantile estimation algorithms
//!
//! This module provides online estimators for quantiles (percentiles) of a
//! data stream.
//!
//! # Algorithms
//!
//! - [`QuantileMM`]: majorize-minimize over the pinball loss
//! - [`QuantileMSPI`]: majorized stochastic proximal iteration
//! - [`QuantileSGD`]: stochastic subgradient descent
//! - [`OrderStats`]: averaged order statistics of fixed-size blocks
//!
//! The three online estimators follow the decay schedule they are fed;
//! a decreasing schedule such as [`LearningRate`](crate::weights::LearningRate)
//! makes them converge.
//!
//! # Example
//!
//! ```
//! use flowseries::quantiles::QuantileMSPI;
//! use flowseries::weights::LearningRate;
//! use flowseries::Series;
//!
//! let q = QuantileMSPI::new(&[0.5]).unwrap();
//! let mut s = Series::new((q,), LearningRate::default()).unwrap();
//!
//! for _ in 0..100 {
//!     s.update(3.0).unwrap();
//! }
//!
//! let (median,) = s.value();
//! assert!((median[0] - 3.0).abs() < 1e-3);
//! ```

mod online;
mod order_stats;

pub use online::{QuantileMM, QuantileMSPI, QuantileSGD};
pub use order_stats::OrderStats;
