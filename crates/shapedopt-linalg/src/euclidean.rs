//! Dense Euclidean vector space backed by `nalgebra`.
//!
//! [`EuclideanSpace`] is the plain `R^n` with vectors stored as
//! `nalgebra::DVector<f64>`. Unlike shaped spaces, membership is
//! structural: two vectors of the same length belong to the same space.

use crate::error::{LinalgError, Result};
use crate::vector::{Vector, VectorSpace};
use nalgebra::DVector;

/// The space `R^n`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EuclideanSpace {
    dim: usize,
}

impl EuclideanSpace {
    /// Space of dimension `dim`.
    pub fn new(dim: usize) -> Self {
        Self { dim }
    }

    /// Vector holding the given coefficients.
    pub fn vector(&self, values: &[f64]) -> Result<EuclideanVector> {
        if values.len() != self.dim {
            return Err(LinalgError::invalid_argument(format!(
                "{} coefficients for a space of dimension {}",
                values.len(),
                self.dim
            )));
        }
        Ok(EuclideanVector(DVector::from_column_slice(values)))
    }
}

impl VectorSpace for EuclideanSpace {
    type Vector = EuclideanVector;

    fn number(&self) -> usize {
        self.dim
    }

    fn create(&self) -> EuclideanVector {
        EuclideanVector(DVector::zeros(self.dim))
    }

    fn owns(&self, v: &EuclideanVector) -> bool {
        v.0.len() == self.dim
    }
}

/// Vector of an [`EuclideanSpace`].
#[derive(Debug, Clone, PartialEq)]
pub struct EuclideanVector(DVector<f64>);

impl EuclideanVector {
    /// Underlying `nalgebra` vector.
    pub fn as_dvector(&self) -> &DVector<f64> {
        &self.0
    }

    /// Consume into the underlying `nalgebra` vector.
    pub fn into_inner(self) -> DVector<f64> {
        self.0
    }

    /// Coefficients as a slice.
    pub fn as_slice(&self) -> &[f64] {
        self.0.as_slice()
    }
}

impl From<DVector<f64>> for EuclideanVector {
    fn from(v: DVector<f64>) -> Self {
        Self(v)
    }
}

impl Vector for EuclideanVector {
    type Elem = f64;

    #[inline]
    fn number(&self) -> usize {
        self.0.len()
    }

    #[inline]
    fn get(&self, i: usize) -> f64 {
        self.0[i]
    }

    #[inline]
    fn set(&mut self, i: usize, value: f64) {
        self.0[i] = value;
    }

    fn same_space(&self, other: &Self) -> bool {
        self.0.len() == other.0.len()
    }

    fn create(&self) -> Self {
        EuclideanVector(DVector::zeros(self.0.len()))
    }

    fn dot(&self, other: &Self) -> Result<f64> {
        self.check_space(other)?;
        Ok(self.0.dot(&other.0))
    }

    fn weighted_dot(&self, x: &Self, y: &Self) -> Result<f64> {
        self.check_space(x)?;
        self.check_space(y)?;
        Ok(self.0.component_mul(&x.0).dot(&y.0))
    }

    fn norm2(&self) -> f64 {
        self.0.norm()
    }

    fn norm1(&self) -> f64 {
        self.0.lp_norm(1)
    }

    fn norm_inf(&self) -> f64 {
        self.0.amax()
    }

    fn combine(&mut self, alpha: f64, x: &Self, beta: f64, y: &Self) -> Result<()> {
        self.check_space(x)?;
        self.check_space(y)?;
        self.0.copy_from(&y.0);
        self.0.axpy(alpha, &x.0, beta);
        Ok(())
    }

    fn add(&mut self, alpha: f64, x: &Self) -> Result<()> {
        self.check_space(x)?;
        self.0.axpy(alpha, &x.0, 1.0);
        Ok(())
    }

    fn multiply(&mut self, x: &Self) -> Result<()> {
        self.check_space(x)?;
        self.0.component_mul_assign(&x.0);
        Ok(())
    }

    fn copy_from(&mut self, other: &Self) -> Result<()> {
        self.check_space(other)?;
        self.0.copy_from(&other.0);
        Ok(())
    }

    fn scale(&mut self, alpha: f64) {
        self.0.scale_mut(alpha);
    }

    fn fill(&mut self, value: f64) {
        self.0.fill(value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_euclidean_operations() {
        let space = EuclideanSpace::new(3);
        let x = space.vector(&[1.0, -2.0, 2.0]).unwrap();
        let y = space.vector(&[3.0, 0.0, -1.0]).unwrap();

        assert_relative_eq!(x.dot(&y).unwrap(), 1.0);
        assert_relative_eq!(x.norm2(), 3.0);
        assert_relative_eq!(x.norm1(), 5.0);
        assert_relative_eq!(x.norm_inf(), 2.0);

        let mut z = space.create();
        z.combine(2.0, &x, -1.0, &y).unwrap();
        assert_eq!(z.as_slice(), &[-1.0, -4.0, 5.0]);
        z.add(1.0, &y).unwrap();
        assert_eq!(z.as_slice(), &[2.0, -4.0, 4.0]);
        assert_relative_eq!(z.weighted_dot(&x, &y).unwrap(), 6.0 - 8.0);
    }

    #[test]
    fn test_euclidean_membership() {
        let space = EuclideanSpace::new(2);
        assert!(space.vector(&[1.0]).is_err());
        let x = space.create();
        assert!(space.owns(&x));
        assert!(!EuclideanSpace::new(3).owns(&x));
        let clone = space.clone_vector(&space.create_filled(4.0)).unwrap();
        assert_eq!(clone.as_slice(), &[4.0, 4.0]);
    }
}
