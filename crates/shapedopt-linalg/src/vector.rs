//! Abstract vectors and vector spaces.
//!
//! This module defines the linear algebra interface used by optimizers: a
//! [`Vector`] is a finite sequence of real coefficients that belongs to a
//! [`VectorSpace`], and operations only combine vectors of the same space.
//!
//! # Precision
//!
//! Coefficients are stored as `f32` or `f64` ([`Vector::Elem`]), but all
//! inner products, norms and linear combinations are evaluated in `f64`
//! and rounded once when stored.
//!
//! # Provided methods
//!
//! Everything except element access and space membership has a default
//! implementation in terms of [`Vector::get`] and [`Vector::set`].
//! Implementations backed by contiguous storage override them with faster
//! loops.

use crate::error::{LinalgError, Result};
use shapedopt_core::{Element, Real};
use std::fmt::Debug;

/// Vector of real coefficients belonging to a vector space.
pub trait Vector: Debug + Sized {
    /// Storage type of the coefficients.
    type Elem: Real;

    /// Number of coefficients.
    fn number(&self) -> usize;

    /// Read coefficient `i`.
    fn get(&self, i: usize) -> Self::Elem;

    /// Write coefficient `i`.
    fn set(&mut self, i: usize, value: Self::Elem);

    /// Whether `other` belongs to the same vector space.
    fn same_space(&self, other: &Self) -> bool;

    /// New zero vector of the same space.
    fn create(&self) -> Self;

    /// Fail with [`LinalgError::IncorrectSpace`] unless `other` belongs to
    /// the same space.
    fn check_space(&self, other: &Self) -> Result<()> {
        if self.same_space(other) {
            Ok(())
        } else {
            Err(LinalgError::incorrect_space(
                "vector does not belong to this space",
            ))
        }
    }

    /// Read coefficient `i` as `f64`.
    fn get_double(&self, i: usize) -> f64 {
        self.get(i).to_double()
    }

    /// Write coefficient `i` from an `f64` value.
    fn set_double(&mut self, i: usize, value: f64) {
        self.set(i, Self::Elem::from_double(value));
    }

    /// Inner product `<self, other>`.
    fn dot(&self, other: &Self) -> Result<f64> {
        self.check_space(other)?;
        Ok((0..self.number())
            .map(|i| self.get_double(i) * other.get_double(i))
            .sum())
    }

    /// Weighted inner product `sum_i self_i * x_i * y_i`, `self` holding the
    /// weights.
    fn weighted_dot(&self, x: &Self, y: &Self) -> Result<f64> {
        self.check_space(x)?;
        self.check_space(y)?;
        Ok((0..self.number())
            .map(|i| self.get_double(i) * x.get_double(i) * y.get_double(i))
            .sum())
    }

    /// Euclidean norm.
    fn norm2(&self) -> f64 {
        (0..self.number())
            .map(|i| self.get_double(i).powi(2))
            .sum::<f64>()
            .sqrt()
    }

    /// Sum of absolute values.
    fn norm1(&self) -> f64 {
        (0..self.number()).map(|i| self.get_double(i).abs()).sum()
    }

    /// Largest absolute value.
    fn norm_inf(&self) -> f64 {
        (0..self.number())
            .map(|i| self.get_double(i).abs())
            .fold(0.0, f64::max)
    }

    /// `self = alpha * x + beta * y`.
    fn combine(&mut self, alpha: f64, x: &Self, beta: f64, y: &Self) -> Result<()> {
        self.check_space(x)?;
        self.check_space(y)?;
        for i in 0..self.number() {
            let value = alpha * x.get_double(i) + beta * y.get_double(i);
            self.set_double(i, value);
        }
        Ok(())
    }

    /// `self += alpha * x`.
    fn add(&mut self, alpha: f64, x: &Self) -> Result<()> {
        self.check_space(x)?;
        for i in 0..self.number() {
            let value = self.get_double(i) + alpha * x.get_double(i);
            self.set_double(i, value);
        }
        Ok(())
    }

    /// Component-wise product `self_i *= x_i`.
    fn multiply(&mut self, x: &Self) -> Result<()> {
        self.check_space(x)?;
        for i in 0..self.number() {
            let value = self.get_double(i) * x.get_double(i);
            self.set_double(i, value);
        }
        Ok(())
    }

    /// `self = other`.
    fn copy_from(&mut self, other: &Self) -> Result<()> {
        self.check_space(other)?;
        for i in 0..self.number() {
            self.set(i, other.get(i));
        }
        Ok(())
    }

    /// `self *= alpha`.
    fn scale(&mut self, alpha: f64) {
        for i in 0..self.number() {
            let value = alpha * self.get_double(i);
            self.set_double(i, value);
        }
    }

    /// Set every coefficient to `value`.
    fn fill(&mut self, value: f64) {
        for i in 0..self.number() {
            self.set_double(i, value);
        }
    }

    /// Set every coefficient to zero.
    fn zero(&mut self) {
        self.fill(0.0);
    }
}

/// Factory and owner of vectors.
pub trait VectorSpace: Debug {
    /// Type of the vectors of this space.
    type Vector: Vector;

    /// Dimension of the space.
    fn number(&self) -> usize;

    /// New zero vector.
    fn create(&self) -> Self::Vector;

    /// Whether `v` belongs to this space.
    fn owns(&self, v: &Self::Vector) -> bool;

    /// New vector with all coefficients equal to `value`.
    fn create_filled(&self, value: f64) -> Self::Vector {
        let mut v = self.create();
        v.fill(value);
        v
    }

    /// Fail with [`LinalgError::IncorrectSpace`] unless `v` belongs to
    /// this space.
    fn check(&self, v: &Self::Vector) -> Result<()> {
        if self.owns(v) {
            Ok(())
        } else {
            Err(LinalgError::incorrect_space(
                "vector does not belong to this space",
            ))
        }
    }

    /// New vector holding a copy of `v`.
    fn clone_vector(&self, v: &Self::Vector) -> Result<Self::Vector> {
        self.check(v)?;
        let mut copy = self.create();
        copy.copy_from(v)?;
        Ok(copy)
    }
}
