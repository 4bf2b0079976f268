//! Arrays whose element type is only known at runtime.

use super::Array;
use crate::error::Result;
use crate::shape::Shape;
use crate::types::ElementType;
use std::fmt::{self, Display};

/// Array of any supported element type.
#[derive(Debug, Clone)]
pub enum AnyArray {
    /// Unsigned bytes.
    Byte(Array<u8>),
    /// 16-bit integers.
    Short(Array<i16>),
    /// 32-bit integers.
    Int(Array<i32>),
    /// 64-bit integers.
    Long(Array<i64>),
    /// Single precision values.
    Float(Array<f32>),
    /// Double precision values.
    Double(Array<f64>),
}

macro_rules! dispatch {
    ($self:expr, $a:ident => $body:expr) => {
        match $self {
            AnyArray::Byte($a) => $body,
            AnyArray::Short($a) => $body,
            AnyArray::Int($a) => $body,
            AnyArray::Long($a) => $body,
            AnyArray::Float($a) => $body,
            AnyArray::Double($a) => $body,
        }
    };
}

impl AnyArray {
    /// Zero-filled flat array of the given type and shape.
    pub fn zeros(element_type: ElementType, shape: Shape) -> Self {
        match element_type {
            ElementType::Byte => AnyArray::Byte(Array::from_shape(shape, 0)),
            ElementType::Short => AnyArray::Short(Array::from_shape(shape, 0)),
            ElementType::Int => AnyArray::Int(Array::from_shape(shape, 0)),
            ElementType::Long => AnyArray::Long(Array::from_shape(shape, 0)),
            ElementType::Float => AnyArray::Float(Array::from_shape(shape, 0.0)),
            ElementType::Double => AnyArray::Double(Array::from_shape(shape, 0.0)),
        }
    }

    /// Element type tag.
    pub fn element_type(&self) -> ElementType {
        dispatch!(self, a => a.element_type())
    }

    /// Shape of the array.
    pub fn shape(&self) -> &Shape {
        dispatch!(self, a => a.shape())
    }

    /// Number of elements.
    pub fn number(&self) -> usize {
        dispatch!(self, a => a.number())
    }

    /// Independent flat copy.
    pub fn copy(&self) -> AnyArray {
        dispatch!(self, a => AnyArray::from(a.copy()))
    }

    /// Copy the elements of `source`, converting them to this array's type.
    pub fn assign(&mut self, source: &AnyArray) -> Result<()> {
        dispatch!(self, dst => dispatch!(source, src => dst.assign(src)))
    }

    /// Convert to a byte array (no copy if already bytes).
    pub fn to_byte(&self) -> Array<u8> {
        dispatch!(self, a => a.convert())
    }

    /// Convert to a short array (no copy if already shorts).
    pub fn to_short(&self) -> Array<i16> {
        dispatch!(self, a => a.convert())
    }

    /// Convert to an int array (no copy if already ints).
    pub fn to_int(&self) -> Array<i32> {
        dispatch!(self, a => a.convert())
    }

    /// Convert to a long array (no copy if already longs).
    pub fn to_long(&self) -> Array<i64> {
        dispatch!(self, a => a.convert())
    }

    /// Convert to a float array (no copy if already floats).
    pub fn to_float(&self) -> Array<f32> {
        dispatch!(self, a => a.convert())
    }

    /// Convert to a double array (no copy if already doubles).
    pub fn to_double(&self) -> Array<f64> {
        dispatch!(self, a => a.convert())
    }

    /// Sum of all elements as `f64`.
    pub fn sum(&self) -> f64 {
        dispatch!(self, a => a.to_double().sum())
    }

    /// Average of all elements.
    pub fn average(&self) -> f64 {
        dispatch!(self, a => a.average())
    }
}

macro_rules! impl_from_array {
    ($t:ty, $variant:ident) => {
        impl From<Array<$t>> for AnyArray {
            fn from(array: Array<$t>) -> Self {
                AnyArray::$variant(array)
            }
        }
    };
}

impl_from_array!(u8, Byte);
impl_from_array!(i16, Short);
impl_from_array!(i32, Int);
impl_from_array!(i64, Long);
impl_from_array!(f32, Float);
impl_from_array!(f64, Double);

impl Display for AnyArray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        dispatch!(self, a => Display::fmt(a, f))
    }
}
