//! Complex-valued observations via a pair of real accumulators

use nalgebra::Complex;

use crate::traits::{ComplexScalar, MergeError, Scalar, Statistic};

/// Tracks the real and imaginary parts of a complex stream independently
///
/// Both halves are copies of the same scalar statistic and receive the same
/// decay coefficient.
///
/// # Example
///
/// ```
/// use flowseries::statistics::{CStat, Mean};
/// use flowseries::Statistic;
/// use nalgebra::Complex;
///
/// let mut c = CStat::new(Mean::new());
/// c.update(Complex::new(1.0, -1.0), 1.0);
/// c.update(Complex::new(3.0, 1.0), 0.5);
/// assert_eq!(c.value(), (2.0, 0.0));
/// ```
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CStat<S> {
    re: S,
    im: S,
}

impl<S: Statistic<Kind = Scalar>> CStat<S> {
    /// Track both parts with copies of `stat`
    pub fn new(stat: S) -> Self {
        Self {
            re: stat.clone(),
            im: stat,
        }
    }

    pub fn re(&self) -> &S {
        &self.re
    }

    pub fn im(&self) -> &S {
        &self.im
    }
}

impl<S: Statistic<Kind = Scalar>> Statistic for CStat<S> {
    type Kind = ComplexScalar;
    type Output = (S::Output, S::Output);

    fn update(&mut self, y: Complex<f64>, gamma: f64) {
        self.re.update(y.re, gamma);
        self.im.update(y.im, gamma);
    }

    fn value(&self) -> Self::Output {
        (self.re.value(), self.im.value())
    }

    fn check_merge(&self, other: &Self) -> Result<(), MergeError> {
        self.re.check_merge(&other.re)?;
        self.im.check_merge(&other.im)
    }

    fn merge(&mut self, other: &Self, gamma: f64) -> Result<(), MergeError> {
        self.check_merge(other)?;
        self.re.merge(&other.re, gamma)?;
        self.im.merge(&other.im, gamma)
    }

    fn nobs(&self) -> u64 {
        self.re.nobs()
    }
}
