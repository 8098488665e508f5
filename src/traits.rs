//! Core traits and error types
//!
//! Every accumulator implements [`Statistic`]: it consumes one observation
//! together with a decay coefficient `gamma`, reports a decoded value, and
//! folds a same-kind peer into itself. The kind of observation a statistic
//! accepts is fixed at compile time through its [`Input`] marker.

use core::fmt::{self, Debug};

use nalgebra::Complex;

#[cfg(feature = "std")]
use std::string::String;

#[cfg(not(feature = "std"))]
use alloc::{format, string::String};

/// A constructor parameter was outside its domain
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigError {
    /// Name of the offending parameter
    pub parameter: &'static str,
    /// The rejected value
    pub value: f64,
    /// Domain the parameter must satisfy
    pub reason: &'static str,
}

impl ConfigError {
    pub(crate) fn new(parameter: &'static str, value: f64, reason: &'static str) -> Self {
        Self {
            parameter,
            value,
            reason,
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid {} = {}: {}",
            self.parameter, self.value, self.reason
        )
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}

/// An observation or weight vector had the wrong length
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DimensionMismatch {
    pub expected: usize,
    pub found: usize,
}

impl fmt::Display for DimensionMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "dimension mismatch: expected {}, found {}",
            self.expected, self.found
        )
    }
}

#[cfg(feature = "std")]
impl std::error::Error for DimensionMismatch {}

/// Error during a merge
#[derive(Debug, Clone, PartialEq)]
pub enum MergeError {
    /// Statistics have incompatible configurations
    IncompatibleConfig { expected: String, found: String },
    /// Explicit merge coefficient outside `[0, 1]`
    InvalidCoefficient(f64),
}

impl fmt::Display for MergeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MergeError::IncompatibleConfig { expected, found } => {
                write!(f, "incompatible config: expected {}, found {}", expected, found)
            }
            MergeError::InvalidCoefficient(gamma) => {
                write!(f, "merge coefficient {} is outside [0, 1]", gamma)
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for MergeError {}

impl MergeError {
    pub(crate) fn incompatible(
        what: &str,
        expected: impl fmt::Debug,
        found: impl fmt::Debug,
    ) -> Self {
        MergeError::IncompatibleConfig {
            expected: format!("{}={:?}", what, expected),
            found: format!("{}={:?}", what, found),
        }
    }
}

/// The kind of observation a statistic consumes
///
/// Implemented by the uninhabited markers [`Scalar`], [`Vector`], [`Paired`]
/// and [`ComplexScalar`]. Two statistics can share a [`Series`](crate::Series)
/// only when their kinds are the same type.
pub trait Input: 'static {
    /// Borrowed form of one observation
    type Item<'a>: Copy;

    /// Width of a vector-valued observation, `None` for scalars
    fn width(item: Self::Item<'_>) -> Option<usize>;
}

/// One real number per observation
#[derive(Debug, Clone, Copy)]
pub enum Scalar {}

/// A fixed-length real vector per observation
#[derive(Debug, Clone, Copy)]
pub enum Vector {}

/// A predictor vector paired with a real response
#[derive(Debug, Clone, Copy)]
pub enum Paired {}

/// One complex number per observation
#[derive(Debug, Clone, Copy)]
pub enum ComplexScalar {}

impl Input for Scalar {
    type Item<'a> = f64;

    fn width(_: Self::Item<'_>) -> Option<usize> {
        None
    }
}

impl Input for Vector {
    type Item<'a> = &'a [f64];

    fn width(item: Self::Item<'_>) -> Option<usize> {
        Some(item.len())
    }
}

impl Input for Paired {
    type Item<'a> = (&'a [f64], f64);

    fn width(item: Self::Item<'_>) -> Option<usize> {
        Some(item.0.len())
    }
}

impl Input for ComplexScalar {
    type Item<'a> = Complex<f64>;

    fn width(_: Self::Item<'_>) -> Option<usize> {
        None
    }
}

/// Observation type consumed by statistic `S`
pub type Obs<'a, S> = <<S as Statistic>::Kind as Input>::Item<'a>;

/// Core trait for all streaming accumulators
pub trait Statistic: Clone + Debug {
    /// Kind of observation this statistic consumes
    type Kind: Input;

    /// Decoded value
    type Output;

    /// Absorb one observation with decay coefficient `gamma`
    ///
    /// Vector widths are checked by the owning series before this is called.
    fn update(&mut self, obs: Obs<'_, Self>, gamma: f64);

    /// Decode the current value without mutating state
    fn value(&self) -> Self::Output;

    /// Check that `other` has the same configuration as `self`
    fn check_merge(&self, other: &Self) -> Result<(), MergeError> {
        let _ = other;
        Ok(())
    }

    /// Fold `other` into `self` as though its data had been observed with
    /// combined coefficient `gamma`
    ///
    /// Returns an error and leaves both operands untouched if the
    /// configurations differ.
    fn merge(&mut self, other: &Self, gamma: f64) -> Result<(), MergeError>;

    /// Number of observations absorbed
    fn nobs(&self) -> u64;

    /// Configured observation width for vector and paired kinds
    fn width(&self) -> Option<usize> {
        None
    }
}
