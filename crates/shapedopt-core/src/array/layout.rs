//! Memory layouts of shaped arrays.
//!
//! A layout maps a multi-index `(i_1, ..., i_r)` to an offset in the shared
//! buffer:
//!
//! - `Flat`: contiguous in the shape's storage order, starting at offset 0,
//! - `Strided`: `offset + sum_k i_k * stride_k`, strides may be negative,
//! - `Selected`: `offset + sum_k map_k[i_k]`, with one explicit lookup
//!   table per dimension.
//!
//! Every view of an array is expressed in one of these three forms, so the
//! cost of an element access never depends on how many views were stacked
//! to build it.

use crate::error::{ArrayError, Result};
use crate::shape::Shape;

/// How the elements of an array are placed in its buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Layout {
    /// Contiguous storage starting at offset 0.
    Flat,
    /// Affine addressing.
    Strided {
        /// Offset of the first element.
        offset: usize,
        /// Signed stride of each dimension.
        strides: Vec<isize>,
    },
    /// Per-dimension index tables.
    Selected {
        /// Base offset.
        offset: usize,
        /// Signed contribution of each index along each dimension.
        maps: Vec<Vec<isize>>,
    },
}

/// Addressing of a layout, with flat layouts expanded to explicit strides.
pub(crate) enum Addressing<'a> {
    Affine { offset: usize, strides: Vec<isize> },
    Mapped { offset: usize, maps: &'a [Vec<isize>] },
}

impl Layout {
    /// Strided layout, normalized to `Flat` when it is contiguous.
    pub(crate) fn strided(shape: &Shape, offset: usize, strides: Vec<isize>) -> Layout {
        if offset == 0 && is_contiguous(shape, &strides) {
            Layout::Flat
        } else {
            Layout::Strided { offset, strides }
        }
    }

    /// Whether the layout is flat.
    #[inline]
    pub fn is_flat(&self) -> bool {
        matches!(self, Layout::Flat)
    }

    /// Buffer offset of a multi-index.
    #[inline]
    pub fn offset_of(&self, shape: &Shape, index: &[usize]) -> usize {
        match self {
            Layout::Flat => shape.offset(index),
            Layout::Strided { offset, strides } => {
                let delta: isize = index
                    .iter()
                    .zip(strides)
                    .map(|(&i, &s)| i as isize * s)
                    .sum();
                (*offset as isize + delta) as usize
            }
            Layout::Selected { offset, maps } => {
                let delta: isize = index.iter().zip(maps).map(|(&i, map)| map[i]).sum();
                (*offset as isize + delta) as usize
            }
        }
    }

    /// Visit the buffer offsets of all elements, in the shape's order.
    pub fn for_each_offset<F>(&self, shape: &Shape, mut visit: F)
    where
        F: FnMut(usize),
    {
        match self {
            Layout::Flat => (0..shape.number()).for_each(visit),
            _ => shape.for_each_index(shape.order(), |index| visit(self.offset_of(shape, index))),
        }
    }

    pub(crate) fn addressing(&self, shape: &Shape) -> Addressing<'_> {
        match self {
            Layout::Flat => Addressing::Affine {
                offset: 0,
                strides: shape.strides().into_iter().map(|s| s as isize).collect(),
            },
            Layout::Strided { offset, strides } => Addressing::Affine {
                offset: *offset,
                strides: strides.clone(),
            },
            Layout::Selected { offset, maps } => Addressing::Mapped {
                offset: *offset,
                maps,
            },
        }
    }
}

/// Whether strides address the elements contiguously in the shape's order.
///
/// Strides of dimensions of length 1 are irrelevant.
pub(crate) fn is_contiguous(shape: &Shape, strides: &[isize]) -> bool {
    strides
        .iter()
        .zip(shape.strides())
        .zip(shape.dims())
        .all(|((&s, c), &n)| n <= 1 || s == c as isize)
}

/// Check that a strided layout stays inside a buffer of `len` elements.
pub(crate) fn check_strided(
    shape: &Shape,
    offset: usize,
    strides: &[isize],
    len: usize,
) -> Result<()> {
    if strides.len() != shape.rank() {
        return Err(ArrayError::non_conformable(format!(
            "{} strides given for an array of rank {}",
            strides.len(),
            shape.rank()
        )));
    }
    if shape.number() == 0 {
        return Ok(());
    }
    let mut lowest = offset as isize;
    let mut highest = offset as isize;
    for (&s, &n) in strides.iter().zip(shape.dims()) {
        let reach = (n as isize - 1) * s;
        if reach < 0 {
            lowest += reach;
        } else {
            highest += reach;
        }
    }
    if lowest < 0 || highest >= len as isize {
        return Err(ArrayError::non_conformable(format!(
            "strided layout addresses offsets {}..={} outside a buffer of {} elements",
            lowest, highest, len
        )));
    }
    Ok(())
}
