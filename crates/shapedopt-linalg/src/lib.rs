//! Vector spaces over shaped arrays.
//!
//! This crate provides the linear algebra layer used by the optimizers of
//! the `shapedopt` workspace:
//!
//! - [`vector`]: the [`Vector`] and [`VectorSpace`] traits
//! - [`shaped`]: spaces of real shaped arrays
//! - [`euclidean`]: `R^n` backed by `nalgebra`
//! - [`preconditioner`]: linear operators applied to vectors
//! - [`error`]: error type for vector space operations
//!
//! # Example
//!
//! ```
//! use shapedopt_linalg::prelude::*;
//!
//! let space = ShapedVectorSpace::<f64>::from_dims(&[2, 2]).unwrap();
//! let x = space.create_filled(1.0);
//! let mut y = space.create();
//! y.combine(2.0, &x, 0.0, &x).unwrap();
//! assert_eq!(y.dot(&x).unwrap(), 8.0);
//! ```

pub mod error;
pub mod euclidean;
pub mod preconditioner;
pub mod shaped;
pub mod vector;

pub use error::{LinalgError, Result};
pub use euclidean::{EuclideanSpace, EuclideanVector};
pub use preconditioner::{
    DiagonalPreconditioner, IdentityPreconditioner, Preconditioner, ScaledPreconditioner,
};
pub use shaped::{AnyVectorSpace, ShapedVector, ShapedVectorSpace};
pub use vector::{Vector, VectorSpace};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::error::{LinalgError, Result};
    pub use crate::euclidean::{EuclideanSpace, EuclideanVector};
    pub use crate::preconditioner::{
        DiagonalPreconditioner, IdentityPreconditioner, Preconditioner, ScaledPreconditioner,
    };
    pub use crate::shaped::{AnyVectorSpace, ShapedVector, ShapedVectorSpace};
    pub use crate::vector::{Vector, VectorSpace};
}
