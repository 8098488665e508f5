//! The series engine
//!
//! A [`Series`] binds one [`Weight`] schedule to a fixed tuple of statistics
//! and feeds every observation to all of them with one shared coefficient.
//! Two series holding the same statistics can be merged under a
//! [`MergePolicy`].
//!
//! # Example
//!
//! ```
//! use flowseries::statistics::{Mean, Variance};
//! use flowseries::weights::EqualWeight;
//! use flowseries::{MergePolicy, Series};
//!
//! let mut left = Series::new((Mean::new(), Variance::new()), EqualWeight::new()).unwrap();
//! let mut right = left.clone();
//!
//! left.fit([1.0, 2.0, 3.0]).unwrap();
//! right.fit([4.0, 5.0]).unwrap();
//! left.merge(&right, MergePolicy::Append).unwrap();
//!
//! let (mean, var) = left.value();
//! assert!((mean - 3.0).abs() < 1e-12);
//! assert!((var - 2.5).abs() < 1e-12);
//! assert_eq!(left.nobs(), 5);
//! ```

mod group;

use core::fmt;

use nalgebra::DMatrix;

use crate::traits::{ConfigError, DimensionMismatch, Input, MergeError, Paired, Vector};
use crate::weights::Weight;

pub use group::StatGroup;

#[cfg(feature = "std")]
use std::vec::Vec;

#[cfg(not(feature = "std"))]
use alloc::{vec, vec::Vec};

/// How the coefficient for a series merge is chosen
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MergePolicy {
    /// The other series' data arrives right after this one's:
    /// `γ = weight(n2)` once the counters have advanced by `n2`
    #[default]
    Append,
    /// Both series are equally mature: the average of each side's
    /// single-observation weight
    Mean,
    /// The other series counts as one pseudo-observation: `γ = weight(1)`
    Singleton,
    /// Caller-supplied `γ` in `[0, 1]`
    Coefficient(f64),
}

/// A weighting schedule driving a tuple of statistics
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Series<W, S> {
    weight: W,
    stats: S,
    n: u64,
    width: Option<usize>,
}

impl<W: Weight, S: StatGroup> Series<W, S> {
    /// Bind `stats` to `weight`
    ///
    /// Fails when the statistics are configured with different observation
    /// widths.
    pub fn new(stats: S, weight: W) -> Result<Self, ConfigError> {
        let width = stats.width()?;
        Ok(Self {
            n: weight.nobs(),
            weight,
            stats,
            width,
        })
    }

    /// Absorb one observation with the schedule's next coefficient
    pub fn update(
        &mut self,
        obs: <S::Kind as Input>::Item<'_>,
    ) -> Result<(), DimensionMismatch> {
        self.check_width(<S::Kind as Input>::width(obs))?;
        let gamma = self.weight.next(1);
        self.n += 1;
        self.stats.update_all(obs, gamma);
        Ok(())
    }

    /// Absorb one observation with an explicit coefficient
    ///
    /// The schedule is bypassed but its counters still advance.
    pub fn update_with(
        &mut self,
        obs: <S::Kind as Input>::Item<'_>,
        gamma: f64,
    ) -> Result<(), DimensionMismatch> {
        self.check_width(<S::Kind as Input>::width(obs))?;
        self.weight.update_counters(1);
        self.n += 1;
        self.stats.update_all(obs, gamma);
        Ok(())
    }

    /// Absorb a sequence of observations in order
    ///
    /// Stops at the first observation of the wrong width; the ones before it
    /// stay absorbed.
    pub fn fit<'a, I>(&mut self, observations: I) -> Result<(), DimensionMismatch>
    where
        I: IntoIterator<Item = <S::Kind as Input>::Item<'a>>,
    {
        for obs in observations {
            self.update(obs)?;
        }
        Ok(())
    }

    /// Absorb a sequence of observations, all with coefficient `gamma`
    pub fn fit_with<'a, I>(
        &mut self,
        observations: I,
        gamma: f64,
    ) -> Result<(), DimensionMismatch>
    where
        I: IntoIterator<Item = <S::Kind as Input>::Item<'a>>,
    {
        for obs in observations {
            self.update_with(obs, gamma)?;
        }
        Ok(())
    }

    /// Absorb `(observation, coefficient)` pairs in order
    pub fn fit_weighted<'a, I>(&mut self, pairs: I) -> Result<(), DimensionMismatch>
    where
        I: IntoIterator<Item = (<S::Kind as Input>::Item<'a>, f64)>,
    {
        for (obs, gamma) in pairs {
            self.update_with(obs, gamma)?;
        }
        Ok(())
    }

    /// Merge `other` into `self`
    ///
    /// Every statistic pair is checked before anything is mutated, so a
    /// failed merge leaves both series unchanged. Merging an empty series
    /// is a no-op.
    pub fn merge(&mut self, other: &Self, policy: MergePolicy) -> Result<(), MergeError> {
        if let MergePolicy::Coefficient(gamma) = policy {
            if !(0.0..=1.0).contains(&gamma) {
                return Err(MergeError::InvalidCoefficient(gamma));
            }
        }
        self.stats.check_merge_all(&other.stats)?;

        let n2 = other.n;
        if n2 == 0 {
            tracing::debug!(nobs = self.n, "skipping merge of an empty series");
            return Ok(());
        }

        self.weight.update_counters(n2);
        let gamma = match policy {
            MergePolicy::Append => self.weight.weight(n2),
            MergePolicy::Mean => 0.5 * (self.weight.weight(1) + other.weight.weight(1)),
            MergePolicy::Singleton => self.weight.weight(1),
            MergePolicy::Coefficient(gamma) => gamma,
        };
        tracing::debug!(?policy, gamma, n2, "merging series");

        self.n += n2;
        self.stats.merge_all(&other.stats, gamma)
    }

    /// Tuple of every statistic's value
    pub fn value(&self) -> S::Output {
        self.stats.values()
    }

    pub fn stats(&self) -> &S {
        &self.stats
    }

    pub fn weight(&self) -> &W {
        &self.weight
    }

    pub fn nobs(&self) -> u64 {
        self.n
    }

    /// Observation width, `None` when every statistic accepts any
    pub fn width(&self) -> Option<usize> {
        self.width
    }

    fn check_width(&self, found: Option<usize>) -> Result<(), DimensionMismatch> {
        match (self.width, found) {
            (Some(expected), Some(found)) if expected != found => {
                Err(DimensionMismatch { expected, found })
            }
            _ => Ok(()),
        }
    }
}

fn check_len(expected: usize, found: usize) -> Result<(), DimensionMismatch> {
    if expected == found {
        Ok(())
    } else {
        Err(DimensionMismatch { expected, found })
    }
}

/// Rows of `m`, copied into a reused buffer
fn for_each_row<F>(m: &DMatrix<f64>, mut f: F) -> Result<(), DimensionMismatch>
where
    F: FnMut(usize, &[f64]) -> Result<(), DimensionMismatch>,
{
    let mut row = vec![0.0; m.ncols()];
    for (i, r) in m.row_iter().enumerate() {
        for (dst, src) in row.iter_mut().zip(r.iter()) {
            *dst = *src;
        }
        f(i, &row)?;
    }
    Ok(())
}

/// Columns of `m`, copied into a reused buffer
fn for_each_col<F>(m: &DMatrix<f64>, mut f: F) -> Result<(), DimensionMismatch>
where
    F: FnMut(usize, &[f64]) -> Result<(), DimensionMismatch>,
{
    let mut col: Vec<f64> = vec![0.0; m.nrows()];
    for (j, c) in m.column_iter().enumerate() {
        for (dst, src) in col.iter_mut().zip(c.iter()) {
            *dst = *src;
        }
        f(j, &col)?;
    }
    Ok(())
}

/// Matrix ingestion for vector-valued statistics
///
/// The whole batch is shape-checked before the first row or column is
/// absorbed.
impl<W: Weight, S: StatGroup<Kind = Vector>> Series<W, S> {
    /// Absorb each row of `m` as one observation
    pub fn fit_rows(&mut self, m: &DMatrix<f64>) -> Result<(), DimensionMismatch> {
        self.check_width(Some(m.ncols()))?;
        for_each_row(m, |_, row| self.update(row))
    }

    /// Absorb each column of `m` as one observation
    pub fn fit_cols(&mut self, m: &DMatrix<f64>) -> Result<(), DimensionMismatch> {
        self.check_width(Some(m.nrows()))?;
        for_each_col(m, |_, col| self.update(col))
    }

    /// Absorb each row of `m` with the same coefficient `gamma`
    pub fn fit_rows_with(
        &mut self,
        m: &DMatrix<f64>,
        gamma: f64,
    ) -> Result<(), DimensionMismatch> {
        self.check_width(Some(m.ncols()))?;
        for_each_row(m, |_, row| self.update_with(row, gamma))
    }

    /// Absorb each column of `m` with the same coefficient `gamma`
    pub fn fit_cols_with(
        &mut self,
        m: &DMatrix<f64>,
        gamma: f64,
    ) -> Result<(), DimensionMismatch> {
        self.check_width(Some(m.nrows()))?;
        for_each_col(m, |_, col| self.update_with(col, gamma))
    }

    /// Absorb each row of `m` with its own coefficient from `gammas`
    pub fn fit_rows_weighted(
        &mut self,
        m: &DMatrix<f64>,
        gammas: &[f64],
    ) -> Result<(), DimensionMismatch> {
        check_len(m.nrows(), gammas.len())?;
        self.check_width(Some(m.ncols()))?;
        for_each_row(m, |i, row| self.update_with(row, gammas[i]))
    }

    /// Absorb each column of `m` with its own coefficient from `gammas`
    pub fn fit_cols_weighted(
        &mut self,
        m: &DMatrix<f64>,
        gammas: &[f64],
    ) -> Result<(), DimensionMismatch> {
        check_len(m.ncols(), gammas.len())?;
        self.check_width(Some(m.nrows()))?;
        for_each_col(m, |j, col| self.update_with(col, gammas[j]))
    }
}

impl<W: Weight, S: StatGroup<Kind = Paired>> Series<W, S> {
    /// Absorb row `i` of `x` paired with response `y[i]`
    pub fn fit_xy(&mut self, x: &DMatrix<f64>, y: &[f64]) -> Result<(), DimensionMismatch> {
        check_len(x.nrows(), y.len())?;
        self.check_width(Some(x.ncols()))?;
        for_each_row(x, |i, row| self.update((row, y[i])))
    }
}

impl<W: Weight, S> fmt::Display for Series<W, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Series | nobs={} | {}", self.n, self.weight)
    }
}
