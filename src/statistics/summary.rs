//! Exact running totals and first differences in a chosen numeric domain

use core::fmt::Debug;

use num_traits::{Bounded as NumBounded, Num, NumCast};

use crate::math;
use crate::traits::{MergeError, Scalar, Statistic};

/// Numeric domain an observation is converted into
///
/// Integer domains round to the nearest integer and saturate at their
/// bounds, in conversion and in arithmetic; NaN converts to zero.
pub trait Domain: Copy + Debug + PartialOrd + Num + NumCast + NumBounded {
    /// Whether observations are rounded before conversion
    const INTEGRAL: bool;

    fn add_saturating(self, rhs: Self) -> Self;

    fn sub_saturating(self, rhs: Self) -> Self;

    fn from_obs(y: f64) -> Self {
        let y = if Self::INTEGRAL { math::round(y) } else { y };
        match <Self as NumCast>::from(y) {
            Some(v) => v,
            None if y.is_nan() => Self::zero(),
            None if y > 0.0 => Self::max_value(),
            None => Self::min_value(),
        }
    }
}

macro_rules! impl_domain {
    (integer => $($t:ty),+) => {
        $(
            impl Domain for $t {
                const INTEGRAL: bool = true;

                fn add_saturating(self, rhs: Self) -> Self {
                    self.saturating_add(rhs)
                }

                fn sub_saturating(self, rhs: Self) -> Self {
                    self.saturating_sub(rhs)
                }
            }
        )+
    };
    (float => $($t:ty),+) => {
        $(
            impl Domain for $t {
                const INTEGRAL: bool = false;

                fn add_saturating(self, rhs: Self) -> Self {
                    self + rhs
                }

                fn sub_saturating(self, rhs: Self) -> Self {
                    self - rhs
                }
            }
        )+
    };
}

impl_domain!(integer => i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);
impl_domain!(float => f32, f64);

/// Exact running total
///
/// Ignores the decay coefficient; merging adds the totals.
///
/// # Example
///
/// ```
/// use flowseries::statistics::Sum;
/// use flowseries::Statistic;
///
/// let mut s = Sum::<i64>::new();
/// for y in [1.0, 2.0, 3.0, 4.0, 5.0] {
///     s.update(y, 1.0);
/// }
/// assert_eq!(s.value(), 15);
/// ```
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Sum<T = f64> {
    sum: T,
    nobs: u64,
}

impl<T: Domain> Default for Sum<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Domain> Sum<T> {
    pub fn new() -> Self {
        Self {
            sum: T::zero(),
            nobs: 0,
        }
    }
}

impl<T: Domain> Statistic for Sum<T> {
    type Kind = Scalar;
    type Output = T;

    fn update(&mut self, y: f64, _gamma: f64) {
        self.nobs += 1;
        self.sum = self.sum.add_saturating(T::from_obs(y));
    }

    fn value(&self) -> T {
        self.sum
    }

    fn merge(&mut self, other: &Self, _gamma: f64) -> Result<(), MergeError> {
        self.nobs += other.nobs;
        self.sum = self.sum.add_saturating(other.sum);
        Ok(())
    }

    fn nobs(&self) -> u64 {
        self.nobs
    }
}

/// Difference between the two most recent observations
///
/// Ignores the decay coefficient. The first difference is taken against
/// zero. Merging adopts the incoming instance's state, which is the
/// latest under append semantics.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Diff<T = f64> {
    diff: T,
    last: T,
    nobs: u64,
}

impl<T: Domain> Default for Diff<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Domain> Diff<T> {
    pub fn new() -> Self {
        Self {
            diff: T::zero(),
            last: T::zero(),
            nobs: 0,
        }
    }

    /// Most recent observation, converted into the domain
    pub fn last(&self) -> T {
        self.last
    }
}

impl<T: Domain> Statistic for Diff<T> {
    type Kind = Scalar;
    type Output = T;

    fn update(&mut self, y: f64, _gamma: f64) {
        self.nobs += 1;
        let v = T::from_obs(y);
        self.diff = v.sub_saturating(self.last);
        self.last = v;
    }

    fn value(&self) -> T {
        self.diff
    }

    fn merge(&mut self, other: &Self, _gamma: f64) -> Result<(), MergeError> {
        self.nobs += other.nobs;
        if other.nobs > 0 {
            self.diff = other.diff;
            self.last = other.last;
        }
        Ok(())
    }

    fn nobs(&self) -> u64 {
        self.nobs
    }
}
