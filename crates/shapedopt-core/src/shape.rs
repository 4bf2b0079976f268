//! Array shapes and storage orders.
//!
//! A [`Shape`] is an ordered list of dimensions together with the storage
//! [`Order`] used to lay out elements contiguously. Rank `0` (a single
//! element) up to [`Shape::MAX_RANK`] is supported.
//!
//! # Storage orders
//!
//! For dimensions `(n_1, ..., n_r)` the contiguous offset of the multi-index
//! `(i_1, ..., i_r)` is
//!
//! - column-major: `i_1 + n_1 * (i_2 + n_2 * (... + n_{r-1} * i_r))`,
//! - row-major: `i_r + n_r * (i_{r-1} + n_{r-1} * (... + n_2 * i_1))`.
//!
//! Column-major is the default: the first index varies fastest.
//!
//! # Relative indices
//!
//! Wherever an index is given by the caller as an `isize`, negative values
//! count from the end of the dimension: `-1` is the last element.

use crate::error::{ArrayError, Result};
use std::fmt::{self, Display};

/// Storage order of contiguous arrays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Order {
    /// First index varies fastest.
    #[default]
    ColumnMajor,
    /// Last index varies fastest.
    RowMajor,
}

/// Dimensions of an array and its storage order.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Shape {
    dims: Vec<usize>,
    order: Order,
    number: usize,
}

impl Shape {
    /// Maximum supported rank.
    pub const MAX_RANK: usize = 9;

    /// Create a column-major shape.
    pub fn new(dims: &[usize]) -> Result<Self> {
        Self::with_order(dims, Order::ColumnMajor)
    }

    /// Create a shape with an explicit storage order.
    pub fn with_order(dims: &[usize], order: Order) -> Result<Self> {
        if dims.len() > Self::MAX_RANK {
            return Err(ArrayError::invalid_shape(format!(
                "rank {} exceeds the maximum rank {}",
                dims.len(),
                Self::MAX_RANK
            )));
        }
        if let Some(k) = dims.iter().position(|&d| d == 0) {
            return Err(ArrayError::invalid_shape(format!(
                "dimension {} has zero length",
                k + 1
            )));
        }
        let number = dims.iter().try_fold(1usize, |acc, &d| acc.checked_mul(d));
        let number = number
            .ok_or_else(|| ArrayError::invalid_shape("number of elements overflows"))?;
        Ok(Self {
            dims: dims.to_vec(),
            order,
            number,
        })
    }

    /// Shape of rank 0 (a single element).
    pub fn scalar() -> Self {
        Self {
            dims: Vec::new(),
            order: Order::ColumnMajor,
            number: 1,
        }
    }

    /// Number of dimensions.
    #[inline]
    pub fn rank(&self) -> usize {
        self.dims.len()
    }

    /// List of dimensions.
    #[inline]
    pub fn dims(&self) -> &[usize] {
        &self.dims
    }

    /// Length of the `k`-th dimension.
    ///
    /// # Panics
    ///
    /// Panics if `k >= rank`.
    #[inline]
    pub fn dimension(&self, k: usize) -> usize {
        self.dims[k]
    }

    /// Storage order.
    #[inline]
    pub fn order(&self) -> Order {
        self.order
    }

    /// Total number of elements.
    #[inline]
    pub fn number(&self) -> usize {
        self.number
    }

    /// Same dimensions with another storage order.
    pub fn reordered(&self, order: Order) -> Self {
        Self {
            dims: self.dims.clone(),
            order,
            number: self.number,
        }
    }

    /// Whether both shapes have the same list of dimensions.
    ///
    /// Storage order is ignored: two arrays are conformable element by
    /// element whatever their layout.
    pub fn same_dims(&self, other: &Shape) -> bool {
        self.dims == other.dims
    }

    /// Contiguous strides of each dimension for this shape's order.
    pub fn strides(&self) -> Vec<usize> {
        let rank = self.rank();
        let mut strides = vec![0usize; rank];
        let mut step = 1usize;
        match self.order {
            Order::ColumnMajor => {
                for k in 0..rank {
                    strides[k] = step;
                    step *= self.dims[k];
                }
            }
            Order::RowMajor => {
                for k in (0..rank).rev() {
                    strides[k] = step;
                    step *= self.dims[k];
                }
            }
        }
        strides
    }

    /// Contiguous offset of a multi-index.
    ///
    /// The index is not bounds checked; see [`Shape::contains`].
    pub fn offset(&self, index: &[usize]) -> usize {
        debug_assert_eq!(index.len(), self.rank());
        match self.order {
            Order::ColumnMajor => index
                .iter()
                .zip(&self.dims)
                .rev()
                .fold(0, |acc, (&i, &n)| acc * n + i),
            Order::RowMajor => index
                .iter()
                .zip(&self.dims)
                .fold(0, |acc, (&i, &n)| acc * n + i),
        }
    }

    /// Whether a multi-index lies inside the shape.
    pub fn contains(&self, index: &[usize]) -> bool {
        index.len() == self.rank() && index.iter().zip(&self.dims).all(|(&i, &n)| i < n)
    }

    /// Shape with the `k`-th dimension removed (same order).
    pub(crate) fn without_dimension(&self, k: usize) -> Self {
        let mut dims = self.dims.clone();
        dims.remove(k);
        let number = dims.iter().product();
        Self {
            dims,
            order: self.order,
            number,
        }
    }

    /// Same order, new dimensions.
    pub(crate) fn with_dims(&self, dims: Vec<usize>) -> Self {
        let number = dims.iter().product();
        Self {
            dims,
            order: self.order,
            number,
        }
    }

    /// Visit every multi-index of the shape.
    ///
    /// Column-major traversal makes the first index vary fastest, row-major
    /// traversal the last one. Shapes of rank 0 yield the empty index once.
    pub fn for_each_index<F>(&self, order: Order, mut visit: F)
    where
        F: FnMut(&[usize]),
    {
        let rank = self.rank();
        let mut index = vec![0usize; rank];
        for _ in 0..self.number {
            visit(&index);
            match order {
                Order::ColumnMajor => {
                    for k in 0..rank {
                        index[k] += 1;
                        if index[k] < self.dims[k] {
                            break;
                        }
                        index[k] = 0;
                    }
                }
                Order::RowMajor => {
                    for k in (0..rank).rev() {
                        index[k] += 1;
                        if index[k] < self.dims[k] {
                            break;
                        }
                        index[k] = 0;
                    }
                }
            }
        }
    }
}

impl Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (k, d) in self.dims.iter().enumerate() {
            if k > 0 {
                write!(f, ",")?;
            }
            write!(f, "{}", d)?;
        }
        write!(f, ")")
    }
}

/// Resolve a possibly relative index into `0..length`.
///
/// Negative indices count from the end: `-1` is `length - 1`.
pub fn fix_index(index: isize, length: usize) -> Result<usize> {
    let resolved = if index < 0 {
        index + length as isize
    } else {
        index
    };
    if resolved < 0 || resolved as usize >= length {
        return Err(ArrayError::index_out_of_bounds(index, length));
    }
    Ok(resolved as usize)
}

/// Resolve a possibly relative dimension index into `0..rank`.
pub fn fix_dimension(dim: isize, rank: usize) -> Result<usize> {
    let resolved = if dim < 0 { dim + rank as isize } else { dim };
    if resolved < 0 || resolved as usize >= rank {
        return Err(ArrayError::invalid_shape(format!(
            "dimension index {} out of range for rank {}",
            dim, rank
        )));
    }
    Ok(resolved as usize)
}
