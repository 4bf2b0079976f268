//! Error types for shaped array operations.
//!
//! This module defines the error type shared by shapes, ranges, views and
//! element-wise array operations.

use thiserror::Error;

/// Errors that can occur while building or manipulating shaped arrays.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ArrayError {
    /// Array storage does not conform to the requested shape.
    ///
    /// This error occurs when a wrapped buffer is too small for the number
    /// of elements of its shape, or when a strided layout would address
    /// memory outside the buffer.
    #[error("Non-conformable array: {reason}")]
    NonConformable {
        /// Description of why the storage does not conform
        reason: String,
    },

    /// Source and destination shapes differ.
    #[error("Shape mismatch: expected {expected}, got {actual}")]
    ShapeMismatch {
        /// Expected dimensions
        expected: String,
        /// Actual dimensions
        actual: String,
    },

    /// Operation requested on an unsupported element type.
    #[error("Illegal element type: {reason}")]
    IllegalType {
        /// Description of the type restriction
        reason: String,
    },

    /// Index outside of a dimension after relative-index resolution.
    #[error("Index {index} out of bounds for dimension of length {length}")]
    IndexOutOfBounds {
        /// Index as given by the caller (possibly negative)
        index: isize,
        /// Length of the indexed dimension
        length: usize,
    },

    /// Range with a zero step, or selecting no element.
    #[error("Invalid range: {reason}")]
    InvalidRange {
        /// Description of the range problem
        reason: String,
    },

    /// Dimension list rejected (rank too large, bad dimension index, ...).
    #[error("Invalid shape: {reason}")]
    InvalidShape {
        /// Description of the shape problem
        reason: String,
    },
}

impl ArrayError {
    /// Create a NonConformable error with a custom reason.
    pub fn non_conformable<S: Into<String>>(reason: S) -> Self {
        Self::NonConformable {
            reason: reason.into(),
        }
    }

    /// Create a ShapeMismatch error.
    pub fn shape_mismatch<S1, S2>(expected: S1, actual: S2) -> Self
    where
        S1: std::fmt::Display,
        S2: std::fmt::Display,
    {
        Self::ShapeMismatch {
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
    }

    /// Create an IllegalType error with a custom reason.
    pub fn illegal_type<S: Into<String>>(reason: S) -> Self {
        Self::IllegalType {
            reason: reason.into(),
        }
    }

    /// Create an IndexOutOfBounds error.
    pub fn index_out_of_bounds(index: isize, length: usize) -> Self {
        Self::IndexOutOfBounds { index, length }
    }

    /// Create an InvalidRange error with a custom reason.
    pub fn invalid_range<S: Into<String>>(reason: S) -> Self {
        Self::InvalidRange {
            reason: reason.into(),
        }
    }

    /// Create an InvalidShape error with a custom reason.
    pub fn invalid_shape<S: Into<String>>(reason: S) -> Self {
        Self::InvalidShape {
            reason: reason.into(),
        }
    }
}

/// Result type alias for array operations.
pub type Result<T> = std::result::Result<T, ArrayError>;
