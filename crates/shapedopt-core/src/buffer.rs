//! Shared element storage.
//!
//! Several arrays (a flat array and any number of views on it) may address
//! the same elements, and a write through any of them is visible through
//! all the others. [`Buffer`] provides this with reference-counted cells:
//! cloning a buffer yields another handle on the same storage.
//!
//! Buffers are single-threaded (`!Send`, `!Sync`).

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

/// Reference-counted, interior-mutable element storage.
pub struct Buffer<T: Copy> {
    cells: Rc<[Cell<T>]>,
}

impl<T: Copy> Buffer<T> {
    /// Take ownership of a vector of values.
    pub fn from_vec(values: Vec<T>) -> Self {
        Self {
            cells: values.into_iter().map(Cell::new).collect(),
        }
    }

    /// Storage of `len` copies of `value`.
    pub fn filled(len: usize, value: T) -> Self {
        Self {
            cells: (0..len).map(|_| Cell::new(value)).collect(),
        }
    }

    /// Number of stored elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether the storage is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Read the element at `offset`.
    #[inline]
    pub fn get(&self, offset: usize) -> T {
        self.cells[offset].get()
    }

    /// Write the element at `offset`.
    #[inline]
    pub fn set(&self, offset: usize, value: T) {
        self.cells[offset].set(value)
    }

    /// Access to the cells.
    #[inline]
    pub fn cells(&self) -> &[Cell<T>] {
        &self.cells
    }

    /// Copy the elements into a vector.
    pub fn to_vec(&self) -> Vec<T> {
        self.cells.iter().map(Cell::get).collect()
    }

    /// Whether both handles refer to the same storage.
    #[inline]
    pub fn ptr_eq(&self, other: &Buffer<T>) -> bool {
        Rc::ptr_eq(&self.cells, &other.cells)
    }
}

impl<T: Copy> Clone for Buffer<T> {
    fn clone(&self) -> Self {
        Self {
            cells: Rc::clone(&self.cells),
        }
    }
}

impl<T: Copy> From<Vec<T>> for Buffer<T> {
    fn from(values: Vec<T>) -> Self {
        Self::from_vec(values)
    }
}

impl<T: Copy + fmt::Debug> fmt::Debug for Buffer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Buffer")
            .field("len", &self.len())
            .field("handles", &Rc::strong_count(&self.cells))
            .finish()
    }
}
