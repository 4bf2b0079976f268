//! Shaped N-dimensional arrays and zero-copy views.
//!
//! An [`Array`] is a typed handle on a shared [`Buffer`] together with a
//! [`Shape`] and a [`Layout`]. Slicing, range views and index selections
//! never copy elements: they return new handles on the same buffer, and a
//! write through any handle is visible through all of them.
//!
//! # Views
//!
//! - [`Array::slice`] / [`Array::slice_along`] fix one index and drop a
//!   dimension,
//! - [`Array::view`] keeps a [`Range`] of indices along each dimension,
//! - [`Array::select`] keeps an arbitrary list of indices along each
//!   dimension,
//! - [`Array::as_1d`] reinterprets a contiguous array as a vector.
//!
//! A view that selects every index in natural order is the array itself:
//! `view`/`select` then return a handle equal to `self` (see
//! [`Array::is_same`]).
//!
//! # Handles and copies
//!
//! `Clone` on an array yields another handle on the same elements, like
//! cloning an `Rc`. Use [`Array::copy`] for an independent flat copy.
//!
//! # Element-wise operations
//!
//! Fill, map, scan and reductions are available as inherent methods on
//! arrays and, for any type implementing [`ShapedArray`], as free functions
//! in [`ops`].

pub mod any;
pub mod layout;
pub mod ops;

use crate::buffer::Buffer;
use crate::error::{ArrayError, Result};
use crate::range::{CompiledRange, Range};
use crate::shape::{fix_dimension, fix_index, Order, Shape};
use crate::types::{Element, ElementType};
use layout::{check_strided, is_contiguous, Addressing};
use rand::distributions::Distribution;
use rand::Rng;
use std::any::Any;
use std::fmt::{self, Display};

pub use layout::Layout;

/// Element access shared by all shaped containers.
///
/// Indices passed to [`ShapedArray::get_at`] and [`ShapedArray::set_at`]
/// must lie inside the shape; they are only checked in debug builds.
pub trait ShapedArray<T: Element> {
    /// Shape of the container.
    fn shape(&self) -> &Shape;

    /// Read an element.
    fn get_at(&self, index: &[usize]) -> T;

    /// Write an element.
    fn set_at(&mut self, index: &[usize], value: T);

    /// Preferred traversal order.
    fn order(&self) -> Order {
        self.shape().order()
    }

    /// Number of dimensions.
    fn rank(&self) -> usize {
        self.shape().rank()
    }

    /// Number of elements.
    fn number(&self) -> usize {
        self.shape().number()
    }

    /// Element type tag.
    fn element_type(&self) -> ElementType {
        T::TYPE
    }
}

/// Shaped array of primitive elements.
#[derive(Debug, Clone)]
pub struct Array<T: Element> {
    buffer: Buffer<T>,
    shape: Shape,
    layout: Layout,
}

impl<T: Element> Array<T> {
    /// Flat column-major array filled with zeros.
    pub fn zeros(dims: &[usize]) -> Result<Self> {
        Self::filled(dims, T::ZERO)
    }

    /// Flat column-major array filled with `value`.
    pub fn filled(dims: &[usize], value: T) -> Result<Self> {
        Ok(Self::from_shape(Shape::new(dims)?, value))
    }

    /// Flat array of the given shape (and storage order) filled with `value`.
    pub fn from_shape(shape: Shape, value: T) -> Self {
        Self {
            buffer: Buffer::filled(shape.number(), value),
            shape,
            layout: Layout::Flat,
        }
    }

    /// Rank-0 array holding one value.
    pub fn scalar(value: T) -> Self {
        Self::from_shape(Shape::scalar(), value)
    }

    /// Flat column-major array taking ownership of `values`.
    ///
    /// Fails if `values` holds fewer elements than the shape; extra
    /// trailing values are kept in the buffer but not addressed.
    pub fn from_vec(values: Vec<T>, dims: &[usize]) -> Result<Self> {
        Self::wrap(Buffer::from_vec(values), Shape::new(dims)?)
    }

    /// Flat array sharing an existing buffer.
    pub fn wrap(buffer: Buffer<T>, shape: Shape) -> Result<Self> {
        if buffer.len() < shape.number() {
            return Err(ArrayError::non_conformable(format!(
                "Wrapped array is too small: {} elements for shape {}",
                buffer.len(),
                shape
            )));
        }
        Ok(Self {
            buffer,
            shape,
            layout: Layout::Flat,
        })
    }

    /// Strided array sharing an existing buffer.
    ///
    /// Element `(i_1, ..., i_r)` lives at `offset + sum_k i_k * strides[k]`.
    /// Fails if some element would fall outside the buffer.
    pub fn wrap_strided(
        buffer: Buffer<T>,
        shape: Shape,
        offset: usize,
        strides: &[isize],
    ) -> Result<Self> {
        check_strided(&shape, offset, strides, buffer.len())?;
        let layout = Layout::strided(&shape, offset, strides.to_vec());
        Ok(Self {
            buffer,
            shape,
            layout,
        })
    }

    /// Shape of the array.
    #[inline]
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// List of dimensions.
    #[inline]
    pub fn dims(&self) -> &[usize] {
        self.shape.dims()
    }

    /// Number of dimensions.
    #[inline]
    pub fn rank(&self) -> usize {
        self.shape.rank()
    }

    /// Number of elements.
    #[inline]
    pub fn number(&self) -> usize {
        self.shape.number()
    }

    /// Storage order.
    #[inline]
    pub fn order(&self) -> Order {
        self.shape.order()
    }

    /// Element type tag.
    #[inline]
    pub fn element_type(&self) -> ElementType {
        T::TYPE
    }

    /// Memory layout.
    #[inline]
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Whether the array is flat (contiguous from offset 0).
    #[inline]
    pub fn is_flat(&self) -> bool {
        self.layout.is_flat()
    }

    /// Underlying storage.
    #[inline]
    pub fn buffer(&self) -> &Buffer<T> {
        &self.buffer
    }

    /// Whether both handles address the same elements in the same way.
    pub fn is_same(&self, other: &Array<T>) -> bool {
        self.buffer.ptr_eq(&other.buffer)
            && self.shape == other.shape
            && self.layout == other.layout
    }

    fn check_index(&self, index: &[usize]) -> Result<()> {
        if index.len() != self.rank() {
            return Err(ArrayError::invalid_shape(format!(
                "index of rank {} for an array of rank {}",
                index.len(),
                self.rank()
            )));
        }
        match index.iter().zip(self.dims()).find(|(&i, &n)| i >= n) {
            Some((&i, &n)) => Err(ArrayError::index_out_of_bounds(i as isize, n)),
            None => Ok(()),
        }
    }

    /// Read the element at a multi-index.
    pub fn get(&self, index: &[usize]) -> Result<T> {
        self.check_index(index)?;
        Ok(self.buffer.get(self.layout.offset_of(&self.shape, index)))
    }

    /// Write the element at a multi-index.
    pub fn set(&mut self, index: &[usize], value: T) -> Result<()> {
        self.check_index(index)?;
        self.buffer
            .set(self.layout.offset_of(&self.shape, index), value);
        Ok(())
    }

    /// Slice along the last dimension.
    pub fn slice(&self, index: isize) -> Result<Array<T>> {
        self.slice_along(index, -1)
    }

    /// Fix index `index` along dimension `dim`, dropping that dimension.
    ///
    /// Both arguments may be relative (`-1` is the last one).
    pub fn slice_along(&self, index: isize, dim: isize) -> Result<Array<T>> {
        if self.rank() == 0 {
            return Err(ArrayError::invalid_shape("cannot slice an array of rank 0"));
        }
        let k = fix_dimension(dim, self.rank())?;
        let i = fix_index(index, self.shape.dimension(k))?;
        let shape = self.shape.without_dimension(k);
        let layout = match self.layout.addressing(&self.shape) {
            Addressing::Affine {
                offset,
                mut strides,
            } => {
                let stride = strides.remove(k);
                let offset = (offset as isize + i as isize * stride) as usize;
                Layout::strided(&shape, offset, strides)
            }
            Addressing::Mapped { offset, maps } => {
                let mut maps = maps.to_vec();
                let map = maps.remove(k);
                Layout::Selected {
                    offset: (offset as isize + map[i]) as usize,
                    maps,
                }
            }
        };
        Ok(self.derive(shape, layout))
    }

    /// Sub-array keeping a range of indices along each dimension.
    ///
    /// `ranges` holds one entry per dimension; `None` keeps the whole
    /// dimension.
    pub fn view(&self, ranges: &[Option<Range>]) -> Result<Array<T>> {
        if ranges.len() != self.rank() {
            return Err(ArrayError::invalid_range(format!(
                "{} ranges given for an array of rank {}",
                ranges.len(),
                self.rank()
            )));
        }
        let compiled = ranges
            .iter()
            .zip(self.dims())
            .map(|(range, &n)| range.map(|r| r.compile(n)).transpose())
            .collect::<Result<Vec<Option<CompiledRange>>>>()?;
        let identity = compiled
            .iter()
            .zip(self.dims())
            .all(|(c, &n)| c.map_or(true, |c| c.is_identity(n)));
        if identity {
            return Ok(self.clone());
        }

        let dims = compiled
            .iter()
            .zip(self.dims())
            .map(|(c, &n)| c.map_or(n, |c| c.count))
            .collect();
        let shape = self.shape.with_dims(dims);
        let layout = match self.layout.addressing(&self.shape) {
            Addressing::Affine { offset, strides } => {
                let mut offset = offset as isize;
                let strides = compiled
                    .iter()
                    .zip(strides)
                    .map(|(c, s)| match c {
                        Some(c) => {
                            offset += c.start as isize * s;
                            s * c.step
                        }
                        None => s,
                    })
                    .collect();
                Layout::strided(&shape, offset as usize, strides)
            }
            Addressing::Mapped { offset, maps } => Layout::Selected {
                offset,
                maps: compiled
                    .iter()
                    .zip(maps)
                    .map(|(c, map)| match c {
                        Some(c) => (0..c.count).map(|j| map[c.index(j)]).collect(),
                        None => map.clone(),
                    })
                    .collect(),
            },
        };
        Ok(self.derive(shape, layout))
    }

    /// Sub-array keeping an explicit list of indices along each dimension.
    ///
    /// `indices` holds one entry per dimension; `None` keeps the whole
    /// dimension. Indices may be relative and may repeat.
    pub fn select(&self, indices: &[Option<&[isize]>]) -> Result<Array<T>> {
        if indices.len() != self.rank() {
            return Err(ArrayError::invalid_range(format!(
                "{} index lists given for an array of rank {}",
                indices.len(),
                self.rank()
            )));
        }
        let resolved = indices
            .iter()
            .zip(self.dims())
            .map(|(list, &n)| match list {
                Some([]) => Err(ArrayError::invalid_range("empty index list")),
                Some(list) => list
                    .iter()
                    .map(|&i| fix_index(i, n))
                    .collect::<Result<Vec<usize>>>()
                    .map(Some),
                None => Ok(None),
            })
            .collect::<Result<Vec<Option<Vec<usize>>>>>()?;
        if resolved.iter().all(Option::is_none) {
            return Ok(self.clone());
        }

        let dims = resolved
            .iter()
            .zip(self.dims())
            .map(|(list, &n)| list.as_ref().map_or(n, Vec::len))
            .collect();
        let shape = self.shape.with_dims(dims);
        let layout = match self.layout.addressing(&self.shape) {
            Addressing::Affine { offset, strides } => Layout::Selected {
                offset,
                maps: resolved
                    .iter()
                    .zip(strides)
                    .zip(self.dims())
                    .map(|((list, s), &n)| match list {
                        Some(list) => list.iter().map(|&i| i as isize * s).collect(),
                        None => (0..n).map(|i| i as isize * s).collect(),
                    })
                    .collect(),
            },
            Addressing::Mapped { offset, maps } => Layout::Selected {
                offset,
                maps: resolved
                    .iter()
                    .zip(maps)
                    .map(|(list, map)| match list {
                        Some(list) => list.iter().map(|&i| map[i]).collect(),
                        None => map.clone(),
                    })
                    .collect(),
            },
        };
        Ok(self.derive(shape, layout))
    }

    /// Rank-1 array of all elements in storage order.
    ///
    /// Shares the buffer when the elements are contiguous, copies them
    /// otherwise.
    pub fn as_1d(&self) -> Array<T> {
        if self.rank() == 1 && self.is_flat() {
            return self.clone();
        }
        let shape = self.shape.with_dims(vec![self.number()]);
        if let Addressing::Affine { offset, strides } = self.layout.addressing(&self.shape) {
            if is_contiguous(&self.shape, &strides) {
                let layout = Layout::strided(&shape, offset, vec![1]);
                return self.derive(shape, layout);
            }
        }
        Array {
            buffer: self.copy().buffer,
            shape,
            layout: Layout::Flat,
        }
    }

    /// Independent flat copy with the same shape and storage order.
    pub fn copy(&self) -> Array<T> {
        Array {
            buffer: Buffer::from_vec(self.flatten()),
            shape: self.shape.clone(),
            layout: Layout::Flat,
        }
    }

    /// All elements in storage order.
    pub fn flatten(&self) -> Vec<T> {
        let mut values = Vec::with_capacity(self.number());
        self.layout
            .for_each_offset(&self.shape, |offset| values.push(self.buffer.get(offset)));
        values
    }

    /// Copy the elements of `source`, converting them to this array's type.
    ///
    /// Both arrays must have the same dimensions; storage orders may differ.
    pub fn assign<U: Element>(&mut self, source: &Array<U>) -> Result<()> {
        if !self.shape.same_dims(&source.shape) {
            return Err(ArrayError::shape_mismatch(&self.shape, &source.shape));
        }
        if let Some(same) = (source as &dyn Any).downcast_ref::<Array<T>>() {
            if same.is_same(self) {
                return Ok(());
            }
        }
        if self.is_flat() && source.is_flat() && self.order() == source.order() {
            for i in 0..self.number() {
                self.buffer.set(i, source.buffer.get(i).cast());
            }
        } else {
            let (shape, layout, buffer) = (&self.shape, &self.layout, &self.buffer);
            shape.for_each_index(shape.order(), |index| {
                buffer.set(layout.offset_of(shape, index), source.get_at(index).cast());
            });
        }
        Ok(())
    }

    /// Convert to another element type.
    ///
    /// Returns a handle on `self` when the type already matches, a new flat
    /// array otherwise.
    pub fn convert<U: Element>(&self) -> Array<U> {
        if let Some(same) = (self as &dyn Any).downcast_ref::<Array<U>>() {
            return same.clone();
        }
        let mut values = Vec::with_capacity(self.number());
        self.layout.for_each_offset(&self.shape, |offset| {
            values.push(self.buffer.get(offset).cast::<U>())
        });
        Array {
            buffer: Buffer::from_vec(values),
            shape: self.shape.clone(),
            layout: Layout::Flat,
        }
    }

    /// Convert to a byte array.
    pub fn to_byte(&self) -> Array<u8> {
        self.convert()
    }

    /// Convert to a short array.
    pub fn to_short(&self) -> Array<i16> {
        self.convert()
    }

    /// Convert to an int array.
    pub fn to_int(&self) -> Array<i32> {
        self.convert()
    }

    /// Convert to a long array.
    pub fn to_long(&self) -> Array<i64> {
        self.convert()
    }

    /// Convert to a float array.
    pub fn to_float(&self) -> Array<f32> {
        self.convert()
    }

    /// Convert to a double array.
    pub fn to_double(&self) -> Array<f64> {
        self.convert()
    }

    /// Set every element to `value`.
    pub fn fill(&mut self, value: T) {
        if self.is_flat() {
            for cell in &self.buffer.cells()[..self.number()] {
                cell.set(value);
            }
        } else {
            ops::fill(self, value);
        }
    }

    /// Set every element from a generator, in storage order.
    pub fn fill_with<G: FnMut() -> T>(&mut self, generator: G) {
        ops::fill_with(self, generator);
    }

    /// Fill with random samples of `distribution`.
    pub fn fill_random<R, D>(&mut self, rng: &mut R, distribution: &D)
    where
        R: Rng + ?Sized,
        D: Distribution<T>,
    {
        self.fill_with(|| distribution.sample(&mut *rng));
    }

    /// Replace every element `x` by `f(x)`.
    pub fn map<F: FnMut(T) -> T>(&mut self, mut f: F) {
        if self.is_flat() {
            for cell in &self.buffer.cells()[..self.number()] {
                cell.set(f(cell.get()));
            }
        } else {
            ops::map(self, f);
        }
    }

    /// Add `value` to every element.
    pub fn increment(&mut self, value: T) {
        self.map(|x| x.plus(value));
    }

    /// Subtract `value` from every element.
    pub fn decrement(&mut self, value: T) {
        self.map(|x| x.minus(value));
    }

    /// Multiply every element by `value`.
    pub fn scale(&mut self, value: T) {
        self.map(|x| x.times(value));
    }

    /// Visit all elements with a scanner (see [`ops::scan`]).
    pub fn scan<S: ops::Scanner<T>>(&self, scanner: &mut S) -> bool {
        ops::scan(self, scanner)
    }

    /// Smallest element.
    pub fn min(&self) -> T::Wide {
        self.min_max().0
    }

    /// Largest element.
    pub fn max(&self) -> T::Wide {
        self.min_max().1
    }

    /// Smallest and largest elements.
    pub fn min_max(&self) -> (T::Wide, T::Wide) {
        // Shapes have no zero-length dimension, so the scan always starts.
        let mut scanner = ops::MinMaxScanner::<T>::default();
        ops::scan(self, &mut scanner);
        (scanner.min.widen(), scanner.max.widen())
    }

    /// Sum of all elements in the widened type.
    pub fn sum(&self) -> T::Wide {
        if self.is_flat() {
            self.buffer.cells()[..self.number()]
                .iter()
                .fold(T::wide_zero(), |acc, cell| T::accumulate(acc, cell.get()))
        } else {
            ops::sum(self)
        }
    }

    /// Average of all elements.
    pub fn average(&self) -> f64 {
        T::wide_to_double(self.sum()) / self.number() as f64
    }

    fn derive(&self, shape: Shape, layout: Layout) -> Array<T> {
        Array {
            buffer: self.buffer.clone(),
            shape,
            layout,
        }
    }
}

impl<T: Element> ShapedArray<T> for Array<T> {
    fn shape(&self) -> &Shape {
        &self.shape
    }

    #[inline]
    fn get_at(&self, index: &[usize]) -> T {
        debug_assert!(self.shape.contains(index));
        self.buffer.get(self.layout.offset_of(&self.shape, index))
    }

    #[inline]
    fn set_at(&mut self, index: &[usize], value: T) {
        debug_assert!(self.shape.contains(index));
        self.buffer
            .set(self.layout.offset_of(&self.shape, index), value);
    }
}

impl<T: Element> Display for Array<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} array {} ", T::TYPE, self.shape)?;
        write_abbreviated(f, &self.flatten())
    }
}

/// Write a list of values, eliding the middle of long lists.
pub fn write_abbreviated<T: Display>(f: &mut fmt::Formatter<'_>, values: &[T]) -> fmt::Result {
    const EDGE: usize = 3;
    let n = values.len();
    write!(f, "[")?;
    if n >= 3 * EDGE {
        for v in &values[..EDGE] {
            write!(f, "{}, ", v)?;
        }
        write!(f, "...")?;
        for v in &values[n - EDGE..] {
            write!(f, ", {}", v)?;
        }
    } else {
        for (k, v) in values.iter().enumerate() {
            if k > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", v)?;
        }
    }
    write!(f, "]")
}
