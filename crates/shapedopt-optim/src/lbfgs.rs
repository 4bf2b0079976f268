//! Limited-memory BFGS approximation of the inverse Hessian.
//!
//! The operator memorizes the last `m` pairs of variable and gradient
//! differences and applies the approximation with Strang's two-loop
//! recursion (Nocedal, 1980):
//!
//! ```text
//! q = v
//! for i = newest .. oldest:
//!     alpha_i = rho_i * <s_i, q>
//!     q = q - alpha_i * y_i
//! r = H0 q                      // preconditioner, or gamma * q
//! for i = oldest .. newest:
//!     beta = rho_i * <y_i, r>
//!     r = r + (alpha_i - beta) * s_i
//! ```
//!
//! Pairs live in a fixed ring of `m` slots. `slot(0)` is the slot the next
//! update writes to, `slot(1)` the newest pair and `slot(mp)` the oldest
//! valid one. Resetting only forgets the pairs (`mp = 0`); the ring position
//! is kept.
//!
//! # References
//!
//! - Nocedal, "Updating quasi-Newton matrices with limited storage" (1980)
//! - Gilbert & Lemaréchal, "Some numerical experiments with variable-storage
//!   quasi-Newton algorithms" (1989)

use crate::error::{OptimizerError, OptimizerResult};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use shapedopt_linalg::{Preconditioner, Vector, VectorSpace};

/// Scaling of the initial inverse Hessian approximation `H0 = gamma * I`.
///
/// Only used when no preconditioner is given.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ScalingRule {
    /// Keep `gamma` as is (initially 1).
    None,
    /// `gamma = <s,y> / <y,y>` at every update.
    #[default]
    OrenSpedicato,
    /// `gamma = <s,s> / <s,y>` at every update.
    BarzilaiBorwein,
    /// Fixed `gamma`.
    Constant(f64),
    /// Oren-Spedicato scaling computed once, at the first update.
    InitialOrenSpedicato,
    /// Barzilai-Borwein scaling computed once, at the first update.
    InitialBarzilaiBorwein,
}

/// L-BFGS operator over vectors of type `V`.
#[derive(Debug)]
pub struct LbfgsOperator<V: Vector> {
    s: Vec<V>,
    y: Vec<V>,
    rho: Vec<f64>,
    alpha: Vec<f64>,
    m: usize,
    mp: usize,
    updates: usize,
    gamma: f64,
    rule: ScalingRule,
    preconditioner: Option<Box<dyn Preconditioner<V>>>,
}

impl<V: Vector> LbfgsOperator<V> {
    /// Operator memorizing `m` pairs of vectors of `space`.
    pub fn new<S>(space: &S, m: usize) -> OptimizerResult<Self>
    where
        S: VectorSpace<Vector = V>,
    {
        if m < 1 {
            return Err(OptimizerError::invalid_configuration(
                "L-BFGS memory must hold at least one pair",
                "memory",
                m.to_string(),
            ));
        }
        Ok(Self {
            s: (0..m).map(|_| space.create()).collect(),
            y: (0..m).map(|_| space.create()).collect(),
            rho: vec![0.0; m],
            alpha: vec![0.0; m],
            m,
            mp: 0,
            updates: 0,
            gamma: 1.0,
            rule: ScalingRule::default(),
            preconditioner: None,
        })
    }

    /// Operator using `h0` as initial inverse Hessian approximation.
    ///
    /// `h0` is applied in place. With bound constraints it should be a
    /// diagonal operator.
    pub fn with_preconditioner<S>(
        space: &S,
        h0: Box<dyn Preconditioner<V>>,
        m: usize,
    ) -> OptimizerResult<Self>
    where
        S: VectorSpace<Vector = V>,
    {
        let mut op = Self::new(space, m)?;
        op.preconditioner = Some(h0);
        Ok(op)
    }

    /// Replace (or remove) the preconditioner.
    pub fn set_preconditioner(&mut self, h0: Option<Box<dyn Preconditioner<V>>>) {
        self.preconditioner = h0;
    }

    /// Preconditioner, if any.
    pub fn preconditioner(&self) -> Option<&dyn Preconditioner<V>> {
        self.preconditioner.as_deref()
    }

    /// Maximum number of memorized pairs.
    pub fn memory(&self) -> usize {
        self.m
    }

    /// Number of pairs currently memorized.
    pub fn pairs(&self) -> usize {
        self.mp
    }

    /// Number of successful updates since creation.
    pub fn updates(&self) -> usize {
        self.updates
    }

    /// Current scaling `gamma` of the initial approximation.
    pub fn scale(&self) -> f64 {
        self.gamma
    }

    /// Current scaling rule.
    pub fn rule(&self) -> ScalingRule {
        self.rule
    }

    /// Select the scaling rule.
    pub fn set_rule(&mut self, rule: ScalingRule) -> OptimizerResult<()> {
        match rule {
            ScalingRule::Constant(gamma) => self.set_scale(gamma),
            _ => {
                self.rule = rule;
                Ok(())
            }
        }
    }

    /// Fix the scaling to `gamma > 0` (switches to [`ScalingRule::Constant`]).
    pub fn set_scale(&mut self, gamma: f64) -> OptimizerResult<()> {
        if !(gamma > 0.0) {
            return Err(OptimizerError::invalid_configuration(
                "scale factor must be strictly positive",
                "gamma",
                gamma.to_string(),
            ));
        }
        self.gamma = gamma;
        self.rule = ScalingRule::Constant(gamma);
        Ok(())
    }

    /// Forget all memorized pairs.
    pub fn reset(&mut self) {
        self.mp = 0;
    }

    /// Ring index of the `j`-th pair, `0 <= j <= mp`.
    #[inline]
    fn slot(&self, j: usize) -> usize {
        debug_assert!(j <= self.mp);
        (self.updates + self.m - j) % self.m
    }

    /// Memorize the pair `s = x1 - x0`, `y = g1 - g0`.
    ///
    /// A pair with `<s,y> <= 0` violates the curvature condition: it is
    /// left inactive and the update is not counted. With `partial`, the pair
    /// is stored without computing its curvature; only the weighted
    /// application can use it.
    pub fn update(&mut self, x1: &V, x0: &V, g1: &V, g0: &V, partial: bool) -> OptimizerResult<()> {
        let k = self.slot(0);
        self.s[k].combine(1.0, x1, -1.0, x0)?;
        self.y[k].combine(1.0, g1, -1.0, g0)?;

        if partial {
            self.rho[k] = 0.0;
            self.gamma = 0.0;
        } else {
            let sty = self.s[k].dot(&self.y[k])?;
            if !(sty > 0.0) {
                log::debug!("L-BFGS pair skipped: <s,y> = {sty:e}");
                self.rho[k] = 0.0;
                return Ok(());
            }
            self.rho[k] = 1.0 / sty;
            let first = self.updates == 0;
            match self.rule {
                ScalingRule::OrenSpedicato => self.gamma = oren_spedicato(sty, &self.y[k]),
                ScalingRule::InitialOrenSpedicato if first => {
                    self.gamma = oren_spedicato(sty, &self.y[k])
                }
                ScalingRule::BarzilaiBorwein => self.gamma = barzilai_borwein(sty, &self.s[k]),
                ScalingRule::InitialBarzilaiBorwein if first => {
                    self.gamma = barzilai_borwein(sty, &self.s[k])
                }
                _ => {}
            }
        }

        self.updates += 1;
        if self.mp < self.m {
            self.mp += 1;
        }
        Ok(())
    }

    /// Apply the approximation to `src`, storing the result in `dst`.
    ///
    /// Returns `false` (leaving `dst` untouched) when no pair is memorized,
    /// in which case the caller should fall back to the steepest descent.
    /// With a `weight`, every inner product is weighted and the curvature
    /// and scaling are recomputed; `false` is then also returned if no pair
    /// has a positive weighted curvature and no preconditioner is set. In
    /// that case `dst` has already been partly overwritten and its content
    /// is unspecified.
    pub fn apply(&mut self, weight: Option<&V>, src: &V, dst: &mut V) -> OptimizerResult<bool> {
        let reference = &self.s[0];
        if let Some(w) = weight {
            reference.check_space(w)?;
        }
        reference.check_space(src)?;
        reference.check_space(dst)?;
        if self.mp < 1 {
            return Ok(false);
        }
        dst.copy_from(src)?;
        match weight {
            None => {
                self.apply_in_place(dst)?;
                Ok(true)
            }
            Some(w) => self.apply_weighted_in_place(w, dst),
        }
    }

    /// Apply the approximation unconditionally: `dst = H src`.
    ///
    /// With an empty memory this is `H0 src` (or `gamma * src`).
    pub fn apply_operator(&mut self, src: &V, dst: &mut V) -> OptimizerResult<()> {
        dst.copy_from(src)?;
        self.apply_in_place(dst)
    }

    fn apply_in_place(&mut self, v: &mut V) -> OptimizerResult<()> {
        for j in 1..=self.mp {
            let k = self.slot(j);
            if self.rho[k] > 0.0 {
                self.alpha[k] = self.rho[k] * v.dot(&self.s[k])?;
                v.add(-self.alpha[k], &self.y[k])?;
            }
        }
        self.apply_initial(v)?;
        for j in (1..=self.mp).rev() {
            let k = self.slot(j);
            if self.rho[k] > 0.0 {
                let beta = self.rho[k] * v.dot(&self.y[k])?;
                v.add(self.alpha[k] - beta, &self.s[k])?;
            }
        }
        Ok(())
    }

    fn apply_weighted_in_place(&mut self, w: &V, v: &mut V) -> OptimizerResult<bool> {
        let mut needs_scale = self.preconditioner.is_none();
        self.gamma = 0.0;
        for j in 1..=self.mp {
            let k = self.slot(j);
            let sty = w.weighted_dot(&self.y[k], &self.s[k])?;
            if !(sty > 0.0) {
                self.rho[k] = 0.0;
                continue;
            }
            self.rho[k] = 1.0 / sty;
            self.alpha[k] = self.rho[k] * w.weighted_dot(v, &self.s[k])?;
            v.add(-self.alpha[k], &self.y[k])?;
            if needs_scale {
                let yty = w.weighted_dot(&self.y[k], &self.y[k])?;
                if yty > 0.0 {
                    self.gamma = sty / yty;
                    needs_scale = false;
                }
            }
        }
        if needs_scale {
            return Ok(false);
        }
        self.apply_initial(v)?;
        for j in (1..=self.mp).rev() {
            let k = self.slot(j);
            if self.rho[k] > 0.0 {
                let beta = self.rho[k] * w.weighted_dot(v, &self.y[k])?;
                v.add(self.alpha[k] - beta, &self.s[k])?;
            }
        }
        Ok(true)
    }

    fn apply_initial(&self, v: &mut V) -> OptimizerResult<()> {
        match &self.preconditioner {
            Some(h0) => h0.apply_in_place(v)?,
            None if self.gamma != 1.0 => v.scale(self.gamma),
            None => {}
        }
        Ok(())
    }
}

fn oren_spedicato<V: Vector>(sty: f64, y: &V) -> f64 {
    let ynorm = y.norm2();
    (sty / ynorm) / ynorm
}

fn barzilai_borwein<V: Vector>(sty: f64, s: &V) -> f64 {
    let snorm = s.norm2();
    (snorm / sty) * snorm
}
