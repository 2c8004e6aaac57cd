//! Error types for rank-based hypothesis testing.

use thiserror::Error;

use crate::distributions::DistributionError;

/// Errors raised while loading observations or running a test.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// The omnibus test was invoked before any observations were supplied.
    #[error("no data provided: call add_data before running the test")]
    NoData,

    /// The post-hoc test was requested but the omnibus test did not reject H₀.
    #[error("post-hoc test requires a rejected omnibus test")]
    NotRejected,

    #[error("label/value length mismatch: {labels} labels, {values} values")]
    LengthMismatch { labels: usize, values: usize },

    #[error("observation set is empty")]
    EmptyObservations,

    #[error("value at position {index} is not finite")]
    NonFiniteValue { index: usize },

    #[error("at least 2 groups are required, found {found}")]
    TooFewGroups { found: usize },

    #[error("significance level must lie in (0, 1), got {0}")]
    InvalidAlpha(f64),

    /// Pairwise residual degrees of freedom `n_i + n_j − k` is not positive.
    #[error("no residual degrees of freedom for pair ({first}, {second}): n - k = {df}")]
    NoResidualDegreesOfFreedom {
        first: String,
        second: String,
        df: i64,
    },

    #[error(transparent)]
    Distribution(#[from] DistributionError),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
