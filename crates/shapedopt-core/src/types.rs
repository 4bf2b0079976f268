//! Element types of shaped arrays.
//!
//! Arrays store one of six primitive element types: unsigned bytes, 16, 32
//! and 64-bit signed integers, and single or double precision floating
//! point values. The [`Element`] trait gathers what array code needs from
//! these types:
//!
//! - a runtime tag ([`ElementType`]) for dynamically typed containers,
//! - lossy conversions to and from `f64` and `i64`,
//! - wrapping arithmetic for integer types,
//! - a widened accumulator type used by reductions.
//!
//! # Conversions
//!
//! Conversions between element types follow the usual primitive cast rules:
//! bytes are unsigned (a stored `0xFF` reads as `255`), integer narrowing
//! truncates, and floating point values converted to an integer type are
//! rounded toward zero and saturate at the bounds of the target type
//! (`NaN` becomes zero).
//!
//! # Reductions
//!
//! Minimum, maximum and sum of small integer arrays are reported in a wider
//! type ([`Element::Wide`]): bytes and shorts accumulate into `i32`. Averages
//! are always `f64`.

use num_traits::Float;
use std::fmt::{Debug, Display};

/// Runtime tag of an array element type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ElementType {
    /// Unsigned 8-bit integer.
    Byte,
    /// Signed 16-bit integer.
    Short,
    /// Signed 32-bit integer.
    Int,
    /// Signed 64-bit integer.
    Long,
    /// Single precision floating point.
    Float,
    /// Double precision floating point.
    Double,
}

impl ElementType {
    /// Human readable name of the type.
    pub fn name(&self) -> &'static str {
        match self {
            ElementType::Byte => "byte",
            ElementType::Short => "short",
            ElementType::Int => "int",
            ElementType::Long => "long",
            ElementType::Float => "float",
            ElementType::Double => "double",
        }
    }

    /// Size of one element in bytes.
    pub fn size(&self) -> usize {
        match self {
            ElementType::Byte => 1,
            ElementType::Short => 2,
            ElementType::Int | ElementType::Float => 4,
            ElementType::Long | ElementType::Double => 8,
        }
    }

    /// Whether the type is a floating point type.
    pub fn is_floating_point(&self) -> bool {
        matches!(self, ElementType::Float | ElementType::Double)
    }
}

impl Display for ElementType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Trait for the primitive types an array may hold.
pub trait Element:
    Copy + Debug + Display + Default + PartialEq + PartialOrd + 'static
{
    /// Runtime tag of this type.
    const TYPE: ElementType;

    /// Additive identity.
    const ZERO: Self;

    /// Multiplicative identity.
    const ONE: Self;

    /// Accumulator type for sums and extrema.
    type Wide: Copy + Debug + Display + PartialEq + PartialOrd;

    /// Convert to `f64`.
    fn to_double(self) -> f64;

    /// Convert to `i64` (floating point values saturate).
    fn to_long(self) -> i64;

    /// Convert from `f64` (saturating for integer types).
    fn from_double(value: f64) -> Self;

    /// Convert from `i64` (truncating for narrower integer types).
    fn from_long(value: i64) -> Self;

    /// Widen to the accumulator type.
    fn widen(self) -> Self::Wide;

    /// Add `value` to the accumulator `acc`.
    fn accumulate(acc: Self::Wide, value: Self) -> Self::Wide;

    /// Convert an accumulator to `f64`.
    fn wide_to_double(acc: Self::Wide) -> f64;

    /// Zero of the accumulator type.
    fn wide_zero() -> Self::Wide;

    /// Addition (wrapping for integers).
    fn plus(self, other: Self) -> Self;

    /// Subtraction (wrapping for integers).
    fn minus(self, other: Self) -> Self;

    /// Multiplication (wrapping for integers).
    fn times(self, other: Self) -> Self;

    /// Convert to another element type.
    #[inline]
    fn cast<U: Element>(self) -> U {
        if Self::TYPE.is_floating_point() {
            U::from_double(self.to_double())
        } else {
            U::from_long(self.to_long())
        }
    }
}

macro_rules! impl_integer_element {
    ($t:ty, $tag:ident, $wide:ty) => {
        impl Element for $t {
            const TYPE: ElementType = ElementType::$tag;
            const ZERO: Self = 0;
            const ONE: Self = 1;
            type Wide = $wide;

            #[inline]
            fn to_double(self) -> f64 {
                self as f64
            }

            #[inline]
            fn to_long(self) -> i64 {
                self as i64
            }

            #[inline]
            fn from_double(value: f64) -> Self {
                value as $t
            }

            #[inline]
            fn from_long(value: i64) -> Self {
                value as $t
            }

            #[inline]
            fn widen(self) -> $wide {
                self as $wide
            }

            #[inline]
            fn accumulate(acc: $wide, value: Self) -> $wide {
                acc.wrapping_add(value as $wide)
            }

            #[inline]
            fn wide_to_double(acc: $wide) -> f64 {
                acc as f64
            }

            #[inline]
            fn wide_zero() -> $wide {
                0
            }

            #[inline]
            fn plus(self, other: Self) -> Self {
                self.wrapping_add(other)
            }

            #[inline]
            fn minus(self, other: Self) -> Self {
                self.wrapping_sub(other)
            }

            #[inline]
            fn times(self, other: Self) -> Self {
                self.wrapping_mul(other)
            }
        }
    };
}

macro_rules! impl_float_element {
    ($t:ty, $tag:ident) => {
        impl Element for $t {
            const TYPE: ElementType = ElementType::$tag;
            const ZERO: Self = 0.0;
            const ONE: Self = 1.0;
            type Wide = $t;

            #[inline]
            fn to_double(self) -> f64 {
                self as f64
            }

            #[inline]
            fn to_long(self) -> i64 {
                self as i64
            }

            #[inline]
            fn from_double(value: f64) -> Self {
                value as $t
            }

            #[inline]
            fn from_long(value: i64) -> Self {
                value as $t
            }

            #[inline]
            fn widen(self) -> $t {
                self
            }

            #[inline]
            fn accumulate(acc: $t, value: Self) -> $t {
                acc + value
            }

            #[inline]
            fn wide_to_double(acc: $t) -> f64 {
                acc as f64
            }

            #[inline]
            fn wide_zero() -> $t {
                0.0
            }

            #[inline]
            fn plus(self, other: Self) -> Self {
                self + other
            }

            #[inline]
            fn minus(self, other: Self) -> Self {
                self - other
            }

            #[inline]
            fn times(self, other: Self) -> Self {
                self * other
            }
        }
    };
}

impl_integer_element!(u8, Byte, i32);
impl_integer_element!(i16, Short, i32);
impl_integer_element!(i32, Int, i32);
impl_integer_element!(i64, Long, i64);
impl_float_element!(f32, Float);
impl_float_element!(f64, Double);

/// Floating point element types (`f32` or `f64`).
///
/// Vector spaces and optimizers only operate on these types.
pub trait Real: Element + Float {}

impl Real for f32 {}
impl Real for f64 {}
