//! Weighting schedules
//!
//! A [`Weight`] turns "how many observations so far" into the decay
//! coefficient γ applied to the next observation. Every schedule returns
//! exactly `1.0` for the first observation it absorbs, so accumulators that
//! initialise on `γ == 1` do so regardless of the schedule.
//!
//! # Example
//!
//! ```
//! use flowseries::weights::{EqualWeight, Weight};
//!
//! let mut w = EqualWeight::new();
//! assert_eq!(w.next(1), 1.0);
//! assert_eq!(w.next(1), 0.5);
//! assert_eq!(w.next(2), 0.5);
//! assert_eq!(w.nobs(), 4);
//! assert_eq!(w.nups(), 3);
//! ```

mod decorators;
mod schedules;

use core::fmt::{Debug, Display};

pub use decorators::{Bounded, Scaled};
pub use schedules::{
    EqualWeight, ExponentialWeight, HarmonicWeight, LearningRate, LearningRate2, McclainWeight,
};

/// A decay schedule
pub trait Weight: Clone + Debug + Display {
    /// Total observations absorbed
    fn nobs(&self) -> u64;

    /// Total update calls (a batch merge counts once)
    fn nups(&self) -> u64;

    /// Coefficient for `n2` observations arriving now, given current counters
    fn weight(&self, n2: u64) -> f64;

    /// Advance the counters by `n2` observations in one update call
    fn update_counters(&mut self, n2: u64);

    /// Advance the counters then evaluate the schedule
    fn next(&mut self, n2: u64) -> f64 {
        self.update_counters(n2);
        self.weight(n2)
    }
}

/// Observation and update counters shared by every schedule
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub(crate) struct Counters {
    pub(crate) nobs: u64,
    pub(crate) nups: u64,
}

impl Counters {
    pub(crate) fn advance(&mut self, n2: u64) {
        self.nobs += n2;
        self.nups += 1;
    }

    /// True while the latest `n2` observations are all that has been seen
    pub(crate) fn is_first(&self, n2: u64) -> bool {
        self.nobs <= n2
    }
}

pub(crate) fn check_unit(parameter: &'static str, value: f64) -> Result<f64, crate::ConfigError> {
    if value > 0.0 && value <= 1.0 {
        Ok(value)
    } else {
        Err(crate::ConfigError::new(parameter, value, "must be in (0, 1]"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters() {
        let mut c = Counters::default();
        assert!(c.is_first(1));
        c.advance(1);
        assert!(c.is_first(1));
        c.advance(5);
        assert_eq!(c.nobs, 6);
        assert_eq!(c.nups, 2);
        assert!(!c.is_first(5));
        assert!(c.is_first(6));
    }

    #[test]
    fn test_check_unit() {
        assert!(check_unit("lambda", 0.5).is_ok());
        assert!(check_unit("lambda", 1.0).is_ok());
        assert!(check_unit("lambda", 0.0).is_err());
        assert!(check_unit("lambda", 1.5).is_err());
        assert!(check_unit("lambda", f64::NAN).is_err());
    }
}
