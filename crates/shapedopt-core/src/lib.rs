//! Shaped N-dimensional arrays.
//!
//! This crate provides typed, shaped arrays of primitive elements with
//! zero-copy views. It is the storage layer on which vector spaces and
//! optimizers of the `shapedopt` workspace are built.
//!
//! # Key Concepts
//!
//! - **Shapes**: ordered dimension lists with a storage order
//! - **Layouts**: flat, strided or index-selected addressing of a buffer
//! - **Views**: slices, ranges and selections sharing their parent's storage
//! - **Element types**: bytes, integers and floating point values, with
//!   conversions between them
//!
//! # Modules
//!
//! - [`array`]: arrays, views and element-wise operations
//! - [`buffer`]: shared element storage
//! - [`error`]: error type for array operations
//! - [`range`]: index ranges
//! - [`shape`]: shapes and storage orders
//! - [`types`]: element types
//!
//! # Example
//!
//! ```
//! use shapedopt_core::prelude::*;
//!
//! let a = Array::from_vec((0..12).map(f64::from).collect(), &[3, 4]).unwrap();
//! let mut column = a.slice(-1).unwrap();
//! column.fill(0.0);
//! assert_eq!(a.get(&[2, 3]).unwrap(), 0.0);
//! assert_eq!(a.sum(), 0.0 + 1.0 + 2.0 + 3.0 + 4.0 + 5.0 + 6.0 + 7.0 + 8.0);
//! ```

pub mod array;
pub mod buffer;
pub mod error;
pub mod range;
pub mod shape;
pub mod types;

pub use array::any::AnyArray;
pub use array::{Array, Layout, ShapedArray};
pub use buffer::Buffer;
pub use error::{ArrayError, Result};
pub use range::Range;
pub use shape::{Order, Shape};
pub use types::{Element, ElementType, Real};

/// Prelude module for convenient imports.
///
/// # Example
/// ```
/// use shapedopt_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::array::any::AnyArray;
    pub use crate::array::ops::{MinMaxScanner, Scanner};
    pub use crate::array::{Array, Layout, ShapedArray};
    pub use crate::buffer::Buffer;
    pub use crate::error::{ArrayError, Result};
    pub use crate::range::Range;
    pub use crate::shape::{Order, Shape};
    pub use crate::types::{Element, ElementType, Real};
}
