//! Index ranges used to build strided views.
//!
//! A [`Range`] is an inclusive `first..=last` index interval with a non-zero
//! step. Bounds may be relative (negative values count from the end of the
//! dimension), and a negative step walks the dimension backward. Ranges are
//! resolved against a concrete dimension length with [`Range::compile`].

use crate::error::{ArrayError, Result};
use crate::shape::fix_index;
use std::fmt::{self, Display};

/// Inclusive range of indices with a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Range {
    first: isize,
    last: isize,
    step: isize,
}

impl Range {
    /// Range `first..=last` with unit step.
    pub const fn new(first: isize, last: isize) -> Self {
        Self {
            first,
            last,
            step: 1,
        }
    }

    /// Range `first..=last` walked by `step`.
    ///
    /// Returns an error if `step` is zero.
    pub fn with_step(first: isize, last: isize, step: isize) -> Result<Self> {
        if step == 0 {
            return Err(ArrayError::invalid_range("step must be non-zero"));
        }
        Ok(Self { first, last, step })
    }

    /// Whole dimension, forward.
    pub const fn all() -> Self {
        Self::new(0, -1)
    }

    /// Whole dimension, backward.
    pub const fn reversed() -> Self {
        Self {
            first: -1,
            last: 0,
            step: -1,
        }
    }

    /// Single index.
    pub const fn single(index: isize) -> Self {
        Self::new(index, index)
    }

    /// First index (possibly relative).
    pub fn first(&self) -> isize {
        self.first
    }

    /// Last index (possibly relative).
    pub fn last(&self) -> isize {
        self.last
    }

    /// Step between selected indices.
    pub fn step(&self) -> isize {
        self.step
    }

    /// Resolve the range against a dimension of the given length.
    ///
    /// Fails if a bound lies outside the dimension or if the step walks away
    /// from `last` (the range would be empty).
    pub fn compile(&self, length: usize) -> Result<CompiledRange> {
        let first = fix_index(self.first, length)? as isize;
        let last = fix_index(self.last, length)? as isize;
        let span = last - first;
        if span != 0 && (span > 0) != (self.step > 0) {
            return Err(ArrayError::invalid_range(format!(
                "range {} selects no element",
                self
            )));
        }
        Ok(CompiledRange {
            start: first as usize,
            step: self.step,
            count: (span / self.step) as usize + 1,
        })
    }
}

impl Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.step == 1 {
            write!(f, "{}:{}", self.first, self.last)
        } else {
            write!(f, "{}:{}:{}", self.first, self.last, self.step)
        }
    }
}

/// A range resolved against a dimension length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompiledRange {
    /// First selected index.
    pub start: usize,
    /// Step between selected indices.
    pub step: isize,
    /// Number of selected indices (at least one).
    pub count: usize,
}

impl CompiledRange {
    /// Whether the range selects the whole dimension in natural order.
    pub fn is_identity(&self, length: usize) -> bool {
        self.start == 0 && self.step == 1 && self.count == length
    }

    /// `j`-th selected index.
    #[inline]
    pub fn index(&self, j: usize) -> usize {
        (self.start as isize + j as isize * self.step) as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compile_forward() {
        let r = Range::with_step(1, -1, 2).unwrap().compile(6).unwrap();
        assert_eq!(r.start, 1);
        assert_eq!(r.count, 3);
        assert_eq!((0..r.count).map(|j| r.index(j)).collect::<Vec<_>>(), vec![1, 3, 5]);
    }

    #[test]
    fn test_compile_backward() {
        let r = Range::reversed().compile(4).unwrap();
        assert_eq!((0..r.count).map(|j| r.index(j)).collect::<Vec<_>>(), vec![3, 2, 1, 0]);
        assert!(!r.is_identity(4));
        assert!(Range::all().compile(4).unwrap().is_identity(4));
    }

    #[test]
    fn test_invalid_ranges() {
        assert!(matches!(
            Range::with_step(0, 3, 0),
            Err(ArrayError::InvalidRange { .. })
        ));
        assert!(matches!(
            Range::new(3, 1).compile(5),
            Err(ArrayError::InvalidRange { .. })
        ));
        assert!(matches!(
            Range::new(0, 5).compile(5),
            Err(ArrayError::IndexOutOfBounds { .. })
        ));
        // A single index is valid whatever the step direction.
        let r = Range::with_step(2, 2, -3).unwrap().compile(5).unwrap();
        assert_eq!(r.count, 1);
    }
}
