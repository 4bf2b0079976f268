//! Error types for the optimization layer.
//!
//! Only misuse of the API surfaces as an [`OptimizerError`]: invalid
//! configurations and vectors that do not belong to the expected space.
//! Numerical failures of a run (bad preconditioner, line search failure,
//! exhausted budgets) are reported through task and status codes, see
//! [`crate::task`].

use crate::task::OptimTask;
use shapedopt_linalg::LinalgError;
use thiserror::Error;

/// Errors that can occur when configuring or driving an optimizer.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum OptimizerError {
    /// Invalid optimizer configuration.
    ///
    /// This error occurs when a parameter is out of its admissible range
    /// (e.g. a negative tolerance or an empty L-BFGS memory).
    #[error("Invalid optimizer configuration: {reason} ({parameter} = {value})")]
    InvalidConfiguration {
        /// Description of the configuration error
        reason: String,
        /// Name of the invalid parameter
        parameter: String,
        /// Value that was invalid
        value: String,
    },

    /// Invalid bounds for a projector.
    #[error("Invalid bounds: {reason}")]
    InvalidBounds {
        /// Description of the inconsistency
        reason: String,
    },

    /// The optimizer was driven past a final task.
    ///
    /// `FinalX`, `Warning` and `Error` end a run; only `start` or `restart`
    /// resume it.
    #[error("Optimizer is not running: last task was {task}")]
    NotRunning {
        /// Final task of the run
        task: OptimTask,
    },

    /// Propagated vector space error.
    #[error("Vector operation failed: {0}")]
    Linalg(#[from] LinalgError),
}

impl OptimizerError {
    /// Create an InvalidConfiguration error.
    pub fn invalid_configuration<S1, S2, S3>(reason: S1, parameter: S2, value: S3) -> Self
    where
        S1: Into<String>,
        S2: Into<String>,
        S3: Into<String>,
    {
        Self::InvalidConfiguration {
            reason: reason.into(),
            parameter: parameter.into(),
            value: value.into(),
        }
    }

    /// Create an InvalidBounds error with a custom reason.
    pub fn invalid_bounds<S: Into<String>>(reason: S) -> Self {
        Self::InvalidBounds {
            reason: reason.into(),
        }
    }
}

/// Result type alias for optimizer operations.
pub type OptimizerResult<T> = std::result::Result<T, OptimizerError>;
