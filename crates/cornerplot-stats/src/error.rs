//! Error types for cornerplot-stats

use thiserror::Error;

/// Errors raised by the statistical primitives
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StatsError {
    /// Quantile outside of [0, 1]
    #[error("Quantiles must be between 0 and 1, got {0}")]
    InvalidQuantile(f64),

    /// Two inputs that must line up do not
    #[error("Dimension mismatch: {what} has length {actual}, expected {expected}")]
    LengthMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    /// No finite samples to work with
    #[error("Sample contains no finite values")]
    EmptySample,

    /// Histogram with zero total mass
    #[error("It looks like the provided 'range' is not valid or the sample is empty.")]
    EmptyHistogram,

    /// Bin edge request that cannot be satisfied
    #[error("Invalid bin edges: {0}")]
    InvalidEdges(String),
}

/// Result type alias for statistics operations
pub type StatsResult<T> = Result<T, StatsError>;
