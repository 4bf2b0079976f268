//! Element-wise operations on any [`ShapedArray`].
//!
//! All functions traverse elements in the container's preferred order
//! ([`ShapedArray::order`]), so generators and scanners see elements in
//! storage order.

use super::ShapedArray;
use crate::types::Element;

/// Visitor accumulating a result over all elements of an array.
///
/// [`scan`] calls [`Scanner::initialize`] with the first element and
/// [`Scanner::update`] with every following one.
pub trait Scanner<T> {
    /// Start the scan with the first element.
    fn initialize(&mut self, value: T);

    /// Account for one more element.
    fn update(&mut self, value: T);
}

/// Scanner tracking the smallest and largest elements.
#[derive(Debug, Clone, Copy, Default)]
pub struct MinMaxScanner<T> {
    /// Smallest element seen so far.
    pub min: T,
    /// Largest element seen so far.
    pub max: T,
}

impl<T: Element> Scanner<T> for MinMaxScanner<T> {
    fn initialize(&mut self, value: T) {
        self.min = value;
        self.max = value;
    }

    fn update(&mut self, value: T) {
        if value < self.min {
            self.min = value;
        }
        if value > self.max {
            self.max = value;
        }
    }
}

/// Set every element to `value`.
pub fn fill<T, A>(array: &mut A, value: T)
where
    T: Element,
    A: ShapedArray<T> + ?Sized,
{
    let shape = array.shape().clone();
    shape.for_each_index(array.order(), |index| array.set_at(index, value));
}

/// Set every element from a generator called in traversal order.
pub fn fill_with<T, A, G>(array: &mut A, mut generator: G)
where
    T: Element,
    A: ShapedArray<T> + ?Sized,
    G: FnMut() -> T,
{
    let shape = array.shape().clone();
    shape.for_each_index(array.order(), |index| array.set_at(index, generator()));
}

/// Replace every element `x` by `f(x)`.
pub fn map<T, A, F>(array: &mut A, mut f: F)
where
    T: Element,
    A: ShapedArray<T> + ?Sized,
    F: FnMut(T) -> T,
{
    let shape = array.shape().clone();
    shape.for_each_index(array.order(), |index| {
        let value = f(array.get_at(index));
        array.set_at(index, value);
    });
}

/// Feed all elements to a scanner.
///
/// Returns `false` (and leaves the scanner untouched) if the container
/// yields no element.
pub fn scan<T, A, S>(array: &A, scanner: &mut S) -> bool
where
    T: Element,
    A: ShapedArray<T> + ?Sized,
    S: Scanner<T> + ?Sized,
{
    let mut first = true;
    array.shape().for_each_index(array.order(), |index| {
        let value = array.get_at(index);
        if first {
            scanner.initialize(value);
            first = false;
        } else {
            scanner.update(value);
        }
    });
    !first
}

/// Smallest and largest elements in the widened type.
pub fn min_max<T, A>(array: &A) -> Option<(T::Wide, T::Wide)>
where
    T: Element,
    A: ShapedArray<T> + ?Sized,
{
    let mut scanner = MinMaxScanner::<T>::default();
    scan(array, &mut scanner).then(|| (scanner.min.widen(), scanner.max.widen()))
}

/// Smallest element in the widened type.
pub fn min<T, A>(array: &A) -> Option<T::Wide>
where
    T: Element,
    A: ShapedArray<T> + ?Sized,
{
    min_max(array).map(|(lo, _)| lo)
}

/// Largest element in the widened type.
pub fn max<T, A>(array: &A) -> Option<T::Wide>
where
    T: Element,
    A: ShapedArray<T> + ?Sized,
{
    min_max(array).map(|(_, hi)| hi)
}

/// Sum of all elements in the widened type.
pub fn sum<T, A>(array: &A) -> T::Wide
where
    T: Element,
    A: ShapedArray<T> + ?Sized,
{
    let mut acc = T::wide_zero();
    array
        .shape()
        .for_each_index(array.order(), |index| acc = T::accumulate(acc, array.get_at(index)));
    acc
}

/// Average of all elements.
pub fn average<T, A>(array: &A) -> f64
where
    T: Element,
    A: ShapedArray<T> + ?Sized,
{
    T::wide_to_double(sum(array)) / array.number() as f64
}
