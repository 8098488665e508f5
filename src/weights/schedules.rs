//! Concrete weighting schedules

use core::fmt;

use super::{check_unit, Counters, Weight};
use crate::math;
use crate::traits::ConfigError;

/// Equal weighting: `γ = n2 / nobs`
///
/// Every observation carries the same weight, so smoothed accumulators
/// reproduce exact arithmetic averages.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EqualWeight {
    counters: Counters,
}

impl EqualWeight {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Weight for EqualWeight {
    fn nobs(&self) -> u64 {
        self.counters.nobs
    }

    fn nups(&self) -> u64 {
        self.counters.nups
    }

    fn weight(&self, n2: u64) -> f64 {
        if self.counters.is_first(n2) {
            1.0
        } else {
            n2 as f64 / self.counters.nobs as f64
        }
    }

    fn update_counters(&mut self, n2: u64) {
        self.counters.advance(n2);
    }
}

impl fmt::Display for EqualWeight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EqualWeight")
    }
}

/// Exponential weighting: constant `γ = λ` after the first observation
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExponentialWeight {
    lambda: f64,
    counters: Counters,
}

impl ExponentialWeight {
    /// Create a schedule with smoothing constant `lambda` in `(0, 1]`
    pub fn new(lambda: f64) -> Result<Self, ConfigError> {
        Ok(Self {
            lambda: check_unit("lambda", lambda)?,
            counters: Counters::default(),
        })
    }

    /// Create a schedule whose effective window is `lookback` observations
    ///
    /// Uses `λ = 2 / (lookback + 1)`.
    pub fn from_lookback(lookback: u64) -> Result<Self, ConfigError> {
        if lookback == 0 {
            return Err(ConfigError::new(
                "lookback",
                0.0,
                "must be at least 1",
            ));
        }
        Self::new(2.0 / (lookback as f64 + 1.0))
    }

    pub fn lambda(&self) -> f64 {
        self.lambda
    }
}

impl Weight for ExponentialWeight {
    fn nobs(&self) -> u64 {
        self.counters.nobs
    }

    fn nups(&self) -> u64 {
        self.counters.nups
    }

    fn weight(&self, n2: u64) -> f64 {
        if self.counters.is_first(n2) {
            1.0
        } else {
            self.lambda
        }
    }

    fn update_counters(&mut self, n2: u64) {
        self.counters.advance(n2);
    }
}

impl fmt::Display for ExponentialWeight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ExponentialWeight(λ = {})", self.lambda)
    }
}

/// Decreasing learning rate: `γ = nups^(-r)`
///
/// Suited to stochastic-approximation statistics such as the quantile
/// estimators and [`KMeans`](crate::models::KMeans).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LearningRate {
    r: f64,
    counters: Counters,
}

impl LearningRate {
    /// Create a schedule with rate `r` in `(0.5, 1]`
    pub fn new(r: f64) -> Result<Self, ConfigError> {
        if !(r > 0.5 && r <= 1.0) {
            return Err(ConfigError::new("r", r, "must be in (0.5, 1]"));
        }
        Ok(Self {
            r,
            counters: Counters::default(),
        })
    }

    pub fn rate(&self) -> f64 {
        self.r
    }
}

impl Default for LearningRate {
    fn default() -> Self {
        Self {
            r: 0.6,
            counters: Counters::default(),
        }
    }
}

impl Weight for LearningRate {
    fn nobs(&self) -> u64 {
        self.counters.nobs
    }

    fn nups(&self) -> u64 {
        self.counters.nups
    }

    fn weight(&self, _n2: u64) -> f64 {
        if self.counters.nups <= 1 {
            1.0
        } else {
            math::powf(self.counters.nups as f64, -self.r)
        }
    }

    fn update_counters(&mut self, n2: u64) {
        self.counters.advance(n2);
    }
}

impl fmt::Display for LearningRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LearningRate(r = {})", self.r)
    }
}

/// Hyperbolic learning rate: `γ = 1 / (1 + c·(nups - 1))`
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LearningRate2 {
    c: f64,
    counters: Counters,
}

impl LearningRate2 {
    /// Create a schedule with positive, finite `c`
    pub fn new(c: f64) -> Result<Self, ConfigError> {
        if !(c > 0.0 && c.is_finite()) {
            return Err(ConfigError::new("c", c, "must be positive and finite"));
        }
        Ok(Self {
            c,
            counters: Counters::default(),
        })
    }
}

impl Default for LearningRate2 {
    fn default() -> Self {
        Self {
            c: 0.5,
            counters: Counters::default(),
        }
    }
}

impl Weight for LearningRate2 {
    fn nobs(&self) -> u64 {
        self.counters.nobs
    }

    fn nups(&self) -> u64 {
        self.counters.nups
    }

    fn weight(&self, _n2: u64) -> f64 {
        let ups = self.counters.nups.max(1) as f64;
        1.0 / (1.0 + self.c * (ups - 1.0))
    }

    fn update_counters(&mut self, n2: u64) {
        self.counters.advance(n2);
    }
}

impl fmt::Display for LearningRate2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LearningRate2(c = {})", self.c)
    }
}

/// Harmonic weighting: `γ = a / (a + nobs - 1)`
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HarmonicWeight {
    a: f64,
    counters: Counters,
}

impl HarmonicWeight {
    /// Create a schedule with positive, finite `a`
    pub fn new(a: f64) -> Result<Self, ConfigError> {
        if !(a > 0.0 && a.is_finite()) {
            return Err(ConfigError::new("a", a, "must be positive and finite"));
        }
        Ok(Self {
            a,
            counters: Counters::default(),
        })
    }
}

impl Default for HarmonicWeight {
    fn default() -> Self {
        Self {
            a: 10.0,
            counters: Counters::default(),
        }
    }
}

impl Weight for HarmonicWeight {
    fn nobs(&self) -> u64 {
        self.counters.nobs
    }

    fn nups(&self) -> u64 {
        self.counters.nups
    }

    fn weight(&self, n2: u64) -> f64 {
        if self.counters.is_first(n2) {
            1.0
        } else {
            self.a / (self.a + self.counters.nobs as f64 - 1.0)
        }
    }

    fn update_counters(&mut self, n2: u64) {
        self.counters.advance(n2);
    }
}

impl fmt::Display for HarmonicWeight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HarmonicWeight(a = {})", self.a)
    }
}

/// McClain's recursive schedule: `γ_t = γ_{t-1} / (1 + γ_{t-1} - α)`
///
/// Starts at `γ_1 = 1` and decreases toward the floor `α`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct McclainWeight {
    alpha: f64,
    last: f64,
    counters: Counters,
}

impl McclainWeight {
    /// Create a schedule with floor `alpha` in `(0, 1)`
    pub fn new(alpha: f64) -> Result<Self, ConfigError> {
        if !(alpha > 0.0 && alpha < 1.0) {
            return Err(ConfigError::new("alpha", alpha, "must be in (0, 1)"));
        }
        Ok(Self {
            alpha,
            last: 1.0,
            counters: Counters::default(),
        })
    }
}

impl Default for McclainWeight {
    fn default() -> Self {
        Self {
            alpha: 0.1,
            last: 1.0,
            counters: Counters::default(),
        }
    }
}

impl Weight for McclainWeight {
    fn nobs(&self) -> u64 {
        self.counters.nobs
    }

    fn nups(&self) -> u64 {
        self.counters.nups
    }

    fn weight(&self, _n2: u64) -> f64 {
        self.last
    }

    fn update_counters(&mut self, n2: u64) {
        self.counters.advance(n2);
        self.last = if self.counters.is_first(n2) {
            1.0
        } else {
            self.last / (1.0 + self.last - self.alpha)
        };
    }
}

impl fmt::Display for McclainWeight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "McclainWeight(α = {})", self.alpha)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_equal_weight() {
        let mut w = EqualWeight::new();
        let gammas: Vec<f64> = (0..4).map(|_| w.next(1)).collect();
        assert_eq!(gammas, vec![1.0, 0.5, 1.0 / 3.0, 0.25]);
        assert_eq!(w.nobs(), 4);
        assert_eq!(w.nups(), 4);
    }

    #[test]
    fn test_equal_weight_batch() {
        let mut w = EqualWeight::new();
        w.next(1);
        assert_relative_eq!(w.next(3), 0.75);
        assert_eq!(w.nups(), 2);
    }

    #[test]
    fn test_exponential_weight() {
        let mut w = ExponentialWeight::new(0.1).unwrap();
        assert_eq!(w.next(1), 1.0);
        assert_eq!(w.next(1), 0.1);
        assert_eq!(w.next(1), 0.1);

        let lb = ExponentialWeight::from_lookback(19).unwrap();
        assert_relative_eq!(lb.lambda(), 0.1);
    }

    #[test]
    fn test_exponential_weight_invalid() {
        assert!(ExponentialWeight::new(0.0).is_err());
        assert!(ExponentialWeight::new(1.5).is_err());
        assert!(ExponentialWeight::from_lookback(0).is_err());
    }

    #[test]
    fn test_learning_rate() {
        let mut w = LearningRate::new(1.0).unwrap();
        assert_eq!(w.next(1), 1.0);
        assert_relative_eq!(w.next(1), 0.5);
        assert_relative_eq!(w.next(10), 1.0 / 3.0);

        assert!(LearningRate::new(0.5).is_err());
        assert!(LearningRate::new(1.1).is_err());
    }

    #[test]
    fn test_learning_rate2() {
        let mut w = LearningRate2::new(0.5).unwrap();
        assert_eq!(w.next(1), 1.0);
        assert_relative_eq!(w.next(1), 1.0 / 1.5);
        assert_relative_eq!(w.next(1), 0.5);

        assert!(LearningRate2::new(0.0).is_err());
    }

    #[test]
    fn test_harmonic_weight() {
        let mut w = HarmonicWeight::new(2.0).unwrap();
        assert_eq!(w.next(1), 1.0);
        assert_relative_eq!(w.next(1), 2.0 / 3.0);
        assert_relative_eq!(w.next(1), 0.5);

        assert!(HarmonicWeight::new(0.0).is_err());
        assert!(HarmonicWeight::new(-1.0).is_err());
    }

    #[test]
    fn test_mcclain_weight() {
        let mut w = McclainWeight::new(0.1).unwrap();
        assert_eq!(w.next(1), 1.0);
        let g2 = w.next(1);
        assert_relative_eq!(g2, 1.0 / 1.9);
        let g3 = w.next(1);
        assert_relative_eq!(g3, g2 / (1.0 + g2 - 0.1));

        for _ in 0..10_000 {
            w.next(1);
        }
        assert_relative_eq!(w.weight(1), 0.1, epsilon = 1e-3);
    }

    #[test]
    fn test_mcclain_weight_invalid() {
        assert!(McclainWeight::new(0.0).is_err());
        assert!(McclainWeight::new(1.0).is_err());
    }

    #[test]
    fn test_weight_is_pure() {
        let mut w = McclainWeight::new(0.2).unwrap();
        w.next(1);
        w.next(1);
        let before = w.weight(1);
        assert_eq!(w.weight(1), before);
        assert_eq!(w.nobs(), 2);
    }

    #[test]
    fn test_display() {
        assert_eq!(EqualWeight::new().to_string(), "EqualWeight");
        assert_eq!(
            HarmonicWeight::new(3.0).unwrap().to_string(),
            "HarmonicWeight(a = 3)"
        );
    }
}
