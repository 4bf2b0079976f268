//! Error types for vector space operations.

use shapedopt_core::ArrayError;
use thiserror::Error;

/// Errors that can occur during vector space operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LinalgError {
    /// Operands do not belong to the same vector space.
    ///
    /// Vectors are only combined with vectors created by the same space
    /// instance; two spaces of equal shape are still distinct.
    #[error("Incorrect vector space: {reason}")]
    IncorrectSpace {
        /// Description of the mismatch
        reason: String,
    },

    /// Invalid argument passed to a vector space operation.
    #[error("Invalid argument: {reason}")]
    InvalidArgument {
        /// Description of the invalid argument
        reason: String,
    },

    /// Propagated array error.
    #[error("Array operation failed: {0}")]
    Array(#[from] ArrayError),
}

impl LinalgError {
    /// Create an IncorrectSpace error with a custom reason.
    pub fn incorrect_space<S: Into<String>>(reason: S) -> Self {
        Self::IncorrectSpace {
            reason: reason.into(),
        }
    }

    /// Create an InvalidArgument error with a custom reason.
    pub fn invalid_argument<S: Into<String>>(reason: S) -> Self {
        Self::InvalidArgument {
            reason: reason.into(),
        }
    }
}

/// Result type alias for vector space operations.
pub type Result<T> = std::result::Result<T, LinalgError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_propagation() {
        fn inner() -> std::result::Result<(), ArrayError> {
            Err(ArrayError::illegal_type("int"))
        }

        fn outer() -> Result<()> {
            inner()?;
            Ok(())
        }

        let err = outer().unwrap_err();
        assert!(matches!(err, LinalgError::Array(ArrayError::IllegalType { .. })));
        assert!(err.to_string().starts_with("Array operation failed"));
    }

    #[test]
    fn test_error_display() {
        let err = LinalgError::incorrect_space("vector does not belong to this space");
        assert_eq!(
            err.to_string(),
            "Incorrect vector space: vector does not belong to this space"
        );
    }
}
