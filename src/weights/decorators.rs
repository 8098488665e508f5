//! Schedules that wrap another schedule
//!
//! Both decorators forward counters to the inner weight unchanged and only
//! reshape the coefficient it produces.

use core::fmt;

use super::{check_unit, Weight};
use crate::traits::ConfigError;

/// Lower-bounds the wrapped schedule: `γ = max(w.weight(), λ)`
///
/// Useful to stop a decreasing schedule from freezing an estimate.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Bounded<W> {
    inner: W,
    lambda: f64,
}

impl<W: Weight> Bounded<W> {
    /// Wrap `inner` with floor `lambda` in `(0, 1]`
    pub fn new(inner: W, lambda: f64) -> Result<Self, ConfigError> {
        Ok(Self {
            inner,
            lambda: check_unit("lambda", lambda)?,
        })
    }

    pub fn inner(&self) -> &W {
        &self.inner
    }
}

impl<W: Weight> Weight for Bounded<W> {
    fn nobs(&self) -> u64 {
        self.inner.nobs()
    }

    fn nups(&self) -> u64 {
        self.inner.nups()
    }

    fn weight(&self, n2: u64) -> f64 {
        self.inner.weight(n2).max(self.lambda)
    }

    fn update_counters(&mut self, n2: u64) {
        self.inner.update_counters(n2);
    }
}

impl<W: Weight> fmt::Display for Bounded<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Bounded({}, λ = {})", self.inner, self.lambda)
    }
}

/// Scales the wrapped schedule: `γ = λ · w.weight()`
///
/// The first absorption still gets `γ = 1`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Scaled<W> {
    inner: W,
    lambda: f64,
}

impl<W: Weight> Scaled<W> {
    /// Wrap `inner` with factor `lambda` in `(0, 1]`
    pub fn new(inner: W, lambda: f64) -> Result<Self, ConfigError> {
        Ok(Self {
            inner,
            lambda: check_unit("lambda", lambda)?,
        })
    }

    pub fn inner(&self) -> &W {
        &self.inner
    }
}

impl<W: Weight> Weight for Scaled<W> {
    fn nobs(&self) -> u64 {
        self.inner.nobs()
    }

    fn nups(&self) -> u64 {
        self.inner.nups()
    }

    fn weight(&self, n2: u64) -> f64 {
        if self.inner.nobs() <= n2 {
            1.0
        } else {
            self.lambda * self.inner.weight(n2)
        }
    }

    fn update_counters(&mut self, n2: u64) {
        self.inner.update_counters(n2);
    }
}

impl<W: Weight> fmt::Display for Scaled<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Scaled({}, λ = {})", self.inner, self.lambda)
    }
}
