//! Error type shared by the tree, its parameters and the dataset helpers.

use thiserror::Error;

/// Errors raised while configuring, fitting or querying a decision tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    /// A feature type tag or a stopping parameter is not acceptable.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Rows, labels or feature types don't fit together.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// `predict` was called on a tree that was never fitted.
    #[error("tree wasn't built yet")]
    NotFitted,

    /// A count or a category code can't be represented in the feature type.
    #[error("numeric conversion failed: {0}")]
    NumericConversion(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, TreeError>;
