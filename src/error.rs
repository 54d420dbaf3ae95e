//! Error types for meas

use thiserror::Error;

/// Result type for metric computations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for metric computations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Not enough records for the requested computation
    #[error("insufficient data: need at least {required} records, got {actual}")]
    InsufficientData {
        /// Minimum number of records
        required: usize,
        /// Records supplied
        actual: usize,
    },

    /// Labels do not contain both classes, so the ROC curve is undefined
    #[error("degenerate labels: {0}")]
    DegenerateLabels(String),

    /// No relevant items were supplied for a rank-based metric
    #[error("relevant item set is empty")]
    EmptyRelevantSet,

    /// Item count too small for the rank probability proxy
    #[error("invalid item count: {0} (need more than 1 item)")]
    InvalidItemCount(usize),

    /// Rank outside `1..=n_items`
    #[error("rank {rank} out of range 1..={n_items}")]
    RankOutOfRange {
        /// Offending rank
        rank: usize,
        /// Number of items
        n_items: usize,
    },

    /// Vector or row length mismatch
    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Expected length
        expected: usize,
        /// Actual length
        actual: usize,
    },

    /// Item index outside of the item range
    #[error("index {index} out of bounds for {len} items")]
    IndexOutOfBounds {
        /// Offending index
        index: usize,
        /// Number of items
        len: usize,
    },

    /// Order is not a permutation of `0..n`
    #[error("invalid permutation: {0}")]
    InvalidPermutation(String),

    /// Invalid configuration
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Metric declared but not specified yet
    #[error("metric not implemented: {0}")]
    NotImplemented(&'static str),
}
