//! Vector spaces of shaped arrays.
//!
//! A [`ShapedVectorSpace`] is the space of real arrays of a given shape.
//! Its vectors ([`ShapedVector`]) store their coefficients contiguously in
//! the shape's storage order, and can be seen as arrays without copying
//! ([`ShapedVector::as_shaped_array`]).
//!
//! # Space identity
//!
//! A vector belongs to the space instance that created it. Cloning a space
//! yields the same space; creating a second space with an equal shape
//! yields a distinct one, and vectors of the two cannot be combined.

use crate::error::{LinalgError, Result};
use crate::vector::{Vector, VectorSpace};
use shapedopt_core::array::write_abbreviated;
use shapedopt_core::{Array, ArrayError, Buffer, Element, ElementType, Real, Shape, ShapedArray};
use std::any::Any;
use std::cell::Cell;
use std::fmt::{self, Display};
use std::marker::PhantomData;
use std::rc::Rc;

/// Space of real arrays of a fixed shape.
#[derive(Debug)]
pub struct ShapedVectorSpace<T: Real> {
    shape: Rc<Shape>,
    _marker: PhantomData<T>,
}

impl<T: Real> Clone for ShapedVectorSpace<T> {
    fn clone(&self) -> Self {
        Self {
            shape: Rc::clone(&self.shape),
            _marker: PhantomData,
        }
    }
}

impl<T: Real> ShapedVectorSpace<T> {
    /// New space of arrays of the given shape.
    pub fn new(shape: Shape) -> Self {
        Self {
            shape: Rc::new(shape),
            _marker: PhantomData,
        }
    }

    /// New space of column-major arrays of the given dimensions.
    pub fn from_dims(dims: &[usize]) -> Result<Self> {
        Ok(Self::new(Shape::new(dims)?))
    }

    /// Shape of the vectors.
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Element type of the vectors.
    pub fn element_type(&self) -> ElementType {
        T::TYPE
    }

    /// Whether both handles denote the same space.
    pub fn same_as(&self, other: &ShapedVectorSpace<T>) -> bool {
        Rc::ptr_eq(&self.shape, &other.shape)
    }

    /// Vector owning `values` (in storage order).
    pub fn wrap(&self, values: Vec<T>) -> Result<ShapedVector<T>> {
        if values.len() != self.shape.number() {
            return Err(ArrayError::non_conformable(format!(
                "{} values for a space of dimension {}",
                values.len(),
                self.shape.number()
            ))
            .into());
        }
        Ok(ShapedVector {
            space: self.clone(),
            array: Array::wrap(Buffer::from_vec(values), self.shape.as_ref().clone())?,
        })
    }

    /// Vector of this space holding the elements of `array`.
    ///
    /// When `array` is a flat array of this space's element type, shape and
    /// order, the vector shares its storage; otherwise the elements are
    /// converted and copied.
    pub fn vector_from<U: Element>(&self, array: &Array<U>) -> Result<ShapedVector<T>> {
        if let Some(same) = (array as &dyn Any).downcast_ref::<Array<T>>() {
            if same.is_flat() && same.shape() == &*self.shape {
                return Ok(ShapedVector {
                    space: self.clone(),
                    array: same.clone(),
                });
            }
        }
        let mut v = self.create();
        v.assign(array)?;
        Ok(v)
    }
}

impl<T: Real> VectorSpace for ShapedVectorSpace<T> {
    type Vector = ShapedVector<T>;

    fn number(&self) -> usize {
        self.shape.number()
    }

    fn create(&self) -> ShapedVector<T> {
        ShapedVector {
            space: self.clone(),
            array: Array::from_shape(self.shape.as_ref().clone(), T::ZERO),
        }
    }

    fn owns(&self, v: &ShapedVector<T>) -> bool {
        self.same_as(&v.space)
    }
}

/// Vector of a [`ShapedVectorSpace`].
#[derive(Debug)]
pub struct ShapedVector<T: Real> {
    space: ShapedVectorSpace<T>,
    array: Array<T>,
}

impl<T: Real> ShapedVector<T> {
    /// Owning space.
    pub fn space(&self) -> &ShapedVectorSpace<T> {
        &self.space
    }

    /// Shape of the vector seen as an array.
    pub fn shape(&self) -> &Shape {
        self.space.shape()
    }

    /// Number of coefficients.
    pub fn number(&self) -> usize {
        self.array.number()
    }

    /// Flat array view of the coefficients, sharing storage.
    pub fn as_shaped_array(&self) -> Array<T> {
        self.array.clone()
    }

    /// Copy the elements of `array`, converting them to `T`.
    ///
    /// The array must have the vector's dimensions. Nothing is copied when
    /// the array already is a flat view of this vector's storage.
    pub fn assign<U: Element>(&mut self, array: &Array<U>) -> Result<()> {
        let shape = self.space.shape();
        if !shape.same_dims(array.shape()) {
            return Err(ArrayError::shape_mismatch(shape, array.shape()).into());
        }
        if let Some(same) = (array as &dyn Any).downcast_ref::<Array<T>>() {
            if same.is_same(&self.array) {
                return Ok(());
            }
        }
        self.array.assign(array)?;
        Ok(())
    }

    /// Copy the coefficients into `array`, converting them to its type.
    pub fn copy_into<U: Element>(&self, array: &mut Array<U>) -> Result<()> {
        array.assign(&self.as_shaped_array())?;
        Ok(())
    }

    /// Coefficients in storage order.
    pub fn to_vec(&self) -> Vec<T> {
        self.array.flatten()
    }

    fn storage(&self) -> &[Cell<T>] {
        &self.array.buffer().cells()[..self.array.number()]
    }

    fn cells(&self) -> impl Iterator<Item = f64> + '_ {
        self.storage().iter().map(|c| c.get().to_double())
    }
}

impl<T: Real> Vector for ShapedVector<T> {
    type Elem = T;

    #[inline]
    fn number(&self) -> usize {
        self.array.number()
    }

    #[inline]
    fn get(&self, i: usize) -> T {
        self.storage()[i].get()
    }

    #[inline]
    fn set(&mut self, i: usize, value: T) {
        self.storage()[i].set(value);
    }

    fn same_space(&self, other: &Self) -> bool {
        self.space.same_as(&other.space)
    }

    fn create(&self) -> Self {
        self.space.create()
    }

    fn dot(&self, other: &Self) -> Result<f64> {
        self.check_space(other)?;
        Ok(self.cells().zip(other.cells()).map(|(a, b)| a * b).sum())
    }

    fn weighted_dot(&self, x: &Self, y: &Self) -> Result<f64> {
        self.check_space(x)?;
        self.check_space(y)?;
        Ok(self
            .cells()
            .zip(x.cells())
            .zip(y.cells())
            .map(|((w, a), b)| w * a * b)
            .sum())
    }

    fn norm2(&self) -> f64 {
        self.cells().map(|a| a * a).sum::<f64>().sqrt()
    }

    fn norm1(&self) -> f64 {
        self.cells().map(f64::abs).sum()
    }

    fn norm_inf(&self) -> f64 {
        self.cells().map(f64::abs).fold(0.0, f64::max)
    }

    fn combine(&mut self, alpha: f64, x: &Self, beta: f64, y: &Self) -> Result<()> {
        self.check_space(x)?;
        self.check_space(y)?;
        for (dst, (a, b)) in self.storage().iter().zip(x.cells().zip(y.cells())) {
            dst.set(T::from_double(alpha * a + beta * b));
        }
        Ok(())
    }

    fn add(&mut self, alpha: f64, x: &Self) -> Result<()> {
        self.check_space(x)?;
        for (dst, a) in self.storage().iter().zip(x.cells()) {
            dst.set(T::from_double(dst.get().to_double() + alpha * a));
        }
        Ok(())
    }

    fn multiply(&mut self, x: &Self) -> Result<()> {
        self.check_space(x)?;
        for (dst, a) in self.storage().iter().zip(x.cells()) {
            dst.set(T::from_double(dst.get().to_double() * a));
        }
        Ok(())
    }

    fn copy_from(&mut self, other: &Self) -> Result<()> {
        self.check_space(other)?;
        if !self.array.is_same(&other.array) {
            for (dst, src) in self.storage().iter().zip(other.storage()) {
                dst.set(src.get());
            }
        }
        Ok(())
    }

    fn scale(&mut self, alpha: f64) {
        for dst in self.storage() {
            dst.set(T::from_double(alpha * dst.get().to_double()));
        }
    }

    fn fill(&mut self, value: f64) {
        let value = T::from_double(value);
        for dst in self.storage() {
            dst.set(value);
        }
    }
}

impl<T: Real> ShapedArray<T> for ShapedVector<T> {
    fn shape(&self) -> &Shape {
        self.space.shape()
    }

    fn get_at(&self, index: &[usize]) -> T {
        self.array.get_at(index)
    }

    fn set_at(&mut self, index: &[usize], value: T) {
        self.array.set_at(index, value);
    }
}

impl<T: Real> Display for ShapedVector<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} vector {} ", T::TYPE, self.shape())?;
        write_abbreviated(f, &self.to_vec())
    }
}

/// Shaped vector space of a floating point type chosen at runtime.
#[derive(Debug, Clone)]
pub enum AnyVectorSpace {
    /// Single precision space.
    Float(ShapedVectorSpace<f32>),
    /// Double precision space.
    Double(ShapedVectorSpace<f64>),
}

impl AnyVectorSpace {
    /// New space for the given element type and shape.
    ///
    /// Only floating point types are supported.
    pub fn for_type(element_type: ElementType, shape: Shape) -> Result<Self> {
        match element_type {
            ElementType::Float => Ok(AnyVectorSpace::Float(ShapedVectorSpace::new(shape))),
            ElementType::Double => Ok(AnyVectorSpace::Double(ShapedVectorSpace::new(shape))),
            other => Err(LinalgError::from(ArrayError::illegal_type(format!(
                "vector spaces require a floating point type, not {}",
                other
            )))),
        }
    }

    /// Element type of the space.
    pub fn element_type(&self) -> ElementType {
        match self {
            AnyVectorSpace::Float(_) => ElementType::Float,
            AnyVectorSpace::Double(_) => ElementType::Double,
        }
    }

    /// Shape of the vectors.
    pub fn shape(&self) -> &Shape {
        match self {
            AnyVectorSpace::Float(space) => space.shape(),
            AnyVectorSpace::Double(space) => space.shape(),
        }
    }
}
