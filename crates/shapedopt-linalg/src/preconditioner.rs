//! Preconditioners: linear operators applied to vectors.
//!
//! A preconditioner approximates the inverse Hessian of an objective; the
//! optimizer uses it as the initial inverse Hessian of its quasi-Newton
//! model. Implementations only need to provide the in-place application.

use crate::error::Result;
use crate::vector::Vector;
use std::fmt::Debug;

/// Linear operator mapping a vector space into itself.
pub trait Preconditioner<V: Vector>: Debug {
    /// Apply the operator in place: `v = H0 v`.
    fn apply_in_place(&self, v: &mut V) -> Result<()>;

    /// Apply the operator out of place: `dst = H0 src`.
    fn apply(&self, src: &V, dst: &mut V) -> Result<()> {
        dst.copy_from(src)?;
        self.apply_in_place(dst)
    }

    /// Returns the name of this preconditioner.
    fn name(&self) -> &str {
        "Generic Preconditioner"
    }
}

/// Identity preconditioner (no preconditioning).
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityPreconditioner;

impl<V: Vector> Preconditioner<V> for IdentityPreconditioner {
    fn apply_in_place(&self, _v: &mut V) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &str {
        "Identity"
    }
}

/// Uniform scaling `H0 = factor * I`.
#[derive(Debug, Clone, Copy)]
pub struct ScaledPreconditioner {
    factor: f64,
}

impl ScaledPreconditioner {
    /// Creates a scaling preconditioner.
    pub fn new(factor: f64) -> Self {
        Self { factor }
    }

    /// Scaling factor.
    pub fn factor(&self) -> f64 {
        self.factor
    }
}

impl<V: Vector> Preconditioner<V> for ScaledPreconditioner {
    fn apply_in_place(&self, v: &mut V) -> Result<()> {
        v.scale(self.factor);
        Ok(())
    }

    fn name(&self) -> &str {
        "Scaled"
    }
}

/// Diagonal preconditioner.
///
/// Scales each component by the matching coefficient of a diagonal vector
/// of the same space.
#[derive(Debug)]
pub struct DiagonalPreconditioner<V: Vector> {
    diagonal: V,
}

impl<V: Vector> DiagonalPreconditioner<V> {
    /// Creates a new diagonal preconditioner with the given diagonal.
    pub fn new(diagonal: V) -> Self {
        Self { diagonal }
    }

    /// Diagonal coefficients.
    pub fn diagonal(&self) -> &V {
        &self.diagonal
    }
}

impl<V: Vector> Preconditioner<V> for DiagonalPreconditioner<V> {
    fn apply_in_place(&self, v: &mut V) -> Result<()> {
        v.multiply(&self.diagonal)
    }

    fn name(&self) -> &str {
        "Diagonal"
    }
}
