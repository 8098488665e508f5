//! Online models over paired and multivariate observations
//!
//! - [`LinReg`]: ridge regression solved from a smoothed Gram matrix
//! - [`KMeans`]: sequential k-means with nearest-center updates

mod kmeans;
mod linreg;

pub use kmeans::KMeans;
pub use linreg::LinReg;
