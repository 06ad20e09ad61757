//! Error types for roballoc.

use thiserror::Error;

/// Error type for roballoc operations.
#[derive(Debug, Error)]
pub enum AllocError {
    /// Argument outside its valid domain (non-positive scale, negative weight, ...).
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Shape mismatch between covariance, returns, and allocation.
    #[error("Shape mismatch: expected {expected}, got {got}")]
    ShapeMismatch { expected: String, got: String },

    /// Simplex projection produced a non-positive or non-finite total.
    #[error("Projection failed: {0}")]
    ProjectionFailure(String),

    /// Exact reference solver error.
    #[error("Solver error: {0}")]
    SolverError(String),

    /// Numerical error.
    #[error("Numerical error: {0}")]
    NumericalError(String),
}

impl AllocError {
    pub(crate) fn shape(expected: impl Into<String>, got: impl Into<String>) -> Self {
        AllocError::ShapeMismatch {
            expected: expected.into(),
            got: got.into(),
        }
    }
}

/// Result type for roballoc operations.
pub type Result<T> = std::result::Result<T, AllocError>;
