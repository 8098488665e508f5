//! Fixed heterogeneous collections of statistics

use core::fmt::Debug;

use crate::traits::{ConfigError, Input, MergeError, Statistic};

/// A tuple of statistics that share one observation kind
///
/// Implemented for tuples of one to eight [`Statistic`]s. Every member is
/// fed the same observation and coefficient, in tuple order.
pub trait StatGroup: Clone + Debug {
    /// Observation kind shared by every member
    type Kind: Input;

    /// Tuple of member values
    type Output;

    fn update_all(&mut self, obs: <Self::Kind as Input>::Item<'_>, gamma: f64);

    fn values(&self) -> Self::Output;

    /// Check every pair before any of them is merged
    fn check_merge_all(&self, other: &Self) -> Result<(), MergeError>;

    fn merge_all(&mut self, other: &Self, gamma: f64) -> Result<(), MergeError>;

    /// Observation width agreed on by the members
    ///
    /// Members without a configured width accept any. Fails when two members
    /// are configured with different widths.
    fn width(&self) -> Result<Option<usize>, ConfigError>;
}

fn agree(acc: Option<usize>, next: Option<usize>) -> Result<Option<usize>, ConfigError> {
    match (acc, next) {
        (Some(a), Some(b)) if a != b => Err(ConfigError::new(
            "width",
            b as f64,
            "statistics in one series must share an observation width",
        )),
        (Some(a), _) => Ok(Some(a)),
        (None, b) => Ok(b),
    }
}

macro_rules! impl_stat_group {
    ($head:ident $(, $tail:ident)*; $($idx:tt),+) => {
        impl<$head: Statistic $(, $tail: Statistic<Kind = $head::Kind>)*> StatGroup
            for ($head, $($tail,)*)
        {
            type Kind = $head::Kind;
            type Output = ($head::Output, $($tail::Output,)*);

            fn update_all(&mut self, obs: <Self::Kind as Input>::Item<'_>, gamma: f64) {
                $( self.$idx.update(obs, gamma); )+
            }

            fn values(&self) -> Self::Output {
                ($( self.$idx.value(), )+)
            }

            fn check_merge_all(&self, other: &Self) -> Result<(), MergeError> {
                $( self.$idx.check_merge(&other.$idx)?; )+
                Ok(())
            }

            fn merge_all(&mut self, other: &Self, gamma: f64) -> Result<(), MergeError> {
                $( self.$idx.merge(&other.$idx, gamma)?; )+
                Ok(())
            }

            fn width(&self) -> Result<Option<usize>, ConfigError> {
                let width = None;
                $( let width = agree(width, self.$idx.width())?; )+
                Ok(width)
            }
        }
    };
}

impl_stat_group!(A; 0);
impl_stat_group!(A, B; 0, 1);
impl_stat_group!(A, B, C; 0, 1, 2);
impl_stat_group!(A, B, C, D; 0, 1, 2, 3);
impl_stat_group!(A, B, C, D, E; 0, 1, 2, 3, 4);
impl_stat_group!(A, B, C, D, E, F; 0, 1, 2, 3, 4, 5);
impl_stat_group!(A, B, C, D, E, F, G; 0, 1, 2, 3, 4, 5, 6);
impl_stat_group!(A, B, C, D, E, F, G, H; 0, 1, 2, 3, 4, 5, 6, 7);
