//! Projection onto box constraints.
//!
//! A [`BoundProjector`] keeps variables inside a convex feasible set and
//! restricts search directions to the feasible ones. The optimizer moves the
//! variables along `x - alpha * d` when `d` is an ascent direction (e.g. the
//! gradient) and along `x + alpha * d` when `d` is a descent direction.
//!
//! # Direction projection
//!
//! A component of `d` is zeroed when moving along it would push a variable
//! that already lies on a bound further outside. A variable exactly on its
//! bound counts as bound. When requested, the projection also computes the
//! range of step lengths `[amin, amax]` over which the free variables hit
//! their bounds (see [`StepBounds`]).
//!
//! Comparisons against infinite bounds are plain IEEE comparisons.

use crate::error::{OptimizerError, OptimizerResult};
use shapedopt_core::Element;
use shapedopt_linalg::Vector;
use std::fmt::Debug;

/// Range of step lengths along a projected direction.
///
/// `amin` is the smallest step for which a free variable reaches its bound
/// (`+inf` if none can), `amax` the largest (`+inf` if some free variable
/// has an infinite bound in its direction of motion).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepBounds {
    /// Smallest step hitting a bound.
    pub amin: f64,
    /// Largest step hitting a bound.
    pub amax: f64,
}

impl StepBounds {
    /// Empty range, ready to be accumulated by a projection.
    pub fn new() -> Self {
        Self {
            amin: f64::INFINITY,
            amax: 0.0,
        }
    }

    fn account(&mut self, step: f64) {
        if step < self.amin {
            self.amin = step;
        }
        if step > self.amax {
            self.amax = step;
        }
    }
}

impl Default for StepBounds {
    fn default() -> Self {
        Self::new()
    }
}

/// Projection of variables and directions onto a feasible set.
pub trait BoundProjector<V: Vector>: Debug {
    /// Clamp the variables in place.
    fn project_variables_in_place(&self, x: &mut V) -> OptimizerResult<()>;

    /// Zero the components of `d` that would leave the feasible set from
    /// `x`.
    ///
    /// With `ascent` the variables move along `-d`, otherwise along `d`.
    /// If `bounds` is given it is reset and filled with the step length
    /// range of the projected direction.
    fn project_direction_in_place(
        &self,
        x: &V,
        d: &mut V,
        ascent: bool,
        bounds: Option<&mut StepBounds>,
    ) -> OptimizerResult<()>;

    /// Clamp `src` into `dst`.
    fn project_variables(&self, src: &V, dst: &mut V) -> OptimizerResult<()> {
        dst.copy_from(src)?;
        self.project_variables_in_place(dst)
    }

    /// Project direction `d` into `dp`, see
    /// [`BoundProjector::project_direction_in_place`].
    fn project_direction(
        &self,
        x: &V,
        d: &V,
        ascent: bool,
        dp: &mut V,
        bounds: Option<&mut StepBounds>,
    ) -> OptimizerResult<()> {
        dp.copy_from(d)?;
        self.project_direction_in_place(x, dp, ascent, bounds)
    }

    /// Returns the name of this projector.
    fn name(&self) -> &str {
        "Generic Projector"
    }
}

#[inline]
fn clamp(x: f64, lower: f64, upper: f64) -> f64 {
    if x < lower {
        lower
    } else if x > upper {
        upper
    } else {
        x
    }
}

/// Projected component of a direction for one variable.
fn restrict(
    x: f64,
    d: f64,
    lower: f64,
    upper: f64,
    ascent: bool,
    bounds: Option<&mut StepBounds>,
) -> f64 {
    let motion = if ascent { -d } else { d };
    let (free, limit) = if motion > 0.0 {
        (x < upper, upper)
    } else if motion < 0.0 {
        (x > lower, lower)
    } else {
        return 0.0;
    };
    if !free {
        return 0.0;
    }
    if let Some(bounds) = bounds {
        if limit == f64::INFINITY || limit == f64::NEG_INFINITY {
            bounds.amax = f64::INFINITY;
        } else {
            bounds.account((limit - x) / motion);
        }
    }
    d
}

fn check_pair(lower: f64, upper: f64) -> OptimizerResult<()> {
    if lower <= upper {
        Ok(())
    } else {
        Err(OptimizerError::invalid_bounds(format!(
            "lower bound {} is not below upper bound {}",
            lower, upper
        )))
    }
}

/// The same lower and upper bound for every variable.
///
/// Bounds are given in double precision and rounded to the element type of
/// the vectors they are applied to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimpleBounds {
    lower: f64,
    upper: f64,
}

impl SimpleBounds {
    /// Bounds `lower <= x <= upper`; infinite values disable a side.
    pub fn new(lower: f64, upper: f64) -> OptimizerResult<Self> {
        check_pair(lower, upper)?;
        Ok(Self { lower, upper })
    }

    /// Lower bound only: `x >= lower`.
    pub fn at_least(lower: f64) -> OptimizerResult<Self> {
        Self::new(lower, f64::INFINITY)
    }

    /// Upper bound only: `x <= upper`.
    pub fn at_most(upper: f64) -> OptimizerResult<Self> {
        Self::new(f64::NEG_INFINITY, upper)
    }

    /// Lower bound.
    pub fn lower(&self) -> f64 {
        self.lower
    }

    /// Upper bound.
    pub fn upper(&self) -> f64 {
        self.upper
    }

    /// Bounds rounded to the element type of `V`.
    fn limits<V: Vector>(&self) -> (f64, f64) {
        (
            V::Elem::from_double(self.lower).to_double(),
            V::Elem::from_double(self.upper).to_double(),
        )
    }
}

impl<V: Vector> BoundProjector<V> for SimpleBounds {
    fn project_variables_in_place(&self, x: &mut V) -> OptimizerResult<()> {
        let (lower, upper) = self.limits::<V>();
        for j in 0..x.number() {
            let value = x.get_double(j);
            let projected = clamp(value, lower, upper);
            if projected != value {
                x.set_double(j, projected);
            }
        }
        Ok(())
    }

    fn project_direction_in_place(
        &self,
        x: &V,
        d: &mut V,
        ascent: bool,
        mut bounds: Option<&mut StepBounds>,
    ) -> OptimizerResult<()> {
        x.check_space(d)?;
        let (lower, upper) = self.limits::<V>();
        if let Some(b) = bounds.as_deref_mut() {
            *b = StepBounds::new();
        }
        for j in 0..x.number() {
            let dj = d.get_double(j);
            let projected = restrict(
                x.get_double(j),
                dj,
                lower,
                upper,
                ascent,
                bounds.as_deref_mut(),
            );
            if projected != dj {
                d.set_double(j, projected);
            }
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "Simple Bounds"
    }
}

/// Per-variable bounds given as vectors of the optimized space.
///
/// A missing vector means no bound on that side.
#[derive(Debug)]
pub struct BoxBounds<V: Vector> {
    lower: Option<V>,
    upper: Option<V>,
}

impl<V: Vector> BoxBounds<V> {
    /// Bounds `lower[j] <= x[j] <= upper[j]`.
    pub fn new(lower: Option<V>, upper: Option<V>) -> OptimizerResult<Self> {
        if let (Some(lo), Some(hi)) = (&lower, &upper) {
            lo.check_space(hi)?;
            for j in 0..lo.number() {
                check_pair(lo.get_double(j), hi.get_double(j))?;
            }
        }
        for v in lower.iter().chain(upper.iter()) {
            if (0..v.number()).any(|j| v.get_double(j).is_nan()) {
                return Err(OptimizerError::invalid_bounds("bound vector holds NaN"));
            }
        }
        Ok(Self { lower, upper })
    }

    /// Lower bounds, if any.
    pub fn lower(&self) -> Option<&V> {
        self.lower.as_ref()
    }

    /// Upper bounds, if any.
    pub fn upper(&self) -> Option<&V> {
        self.upper.as_ref()
    }

    fn limits(&self, j: usize) -> (f64, f64) {
        (
            self.lower
                .as_ref()
                .map_or(f64::NEG_INFINITY, |v| v.get_double(j)),
            self.upper.as_ref().map_or(f64::INFINITY, |v| v.get_double(j)),
        )
    }

    fn check(&self, x: &V) -> OptimizerResult<()> {
        for v in self.lower.iter().chain(self.upper.iter()) {
            v.check_space(x)?;
        }
        Ok(())
    }
}

impl<V: Vector> BoundProjector<V> for BoxBounds<V> {
    fn project_variables_in_place(&self, x: &mut V) -> OptimizerResult<()> {
        self.check(x)?;
        for j in 0..x.number() {
            let (lower, upper) = self.limits(j);
            let value = x.get_double(j);
            let projected = clamp(value, lower, upper);
            if projected != value {
                x.set_double(j, projected);
            }
        }
        Ok(())
    }

    fn project_direction_in_place(
        &self,
        x: &V,
        d: &mut V,
        ascent: bool,
        mut bounds: Option<&mut StepBounds>,
    ) -> OptimizerResult<()> {
        self.check(x)?;
        x.check_space(d)?;
        if let Some(b) = bounds.as_deref_mut() {
            *b = StepBounds::new();
        }
        for j in 0..x.number() {
            let (lower, upper) = self.limits(j);
            let dj = d.get_double(j);
            let projected = restrict(
                x.get_double(j),
                dj,
                lower,
                upper,
                ascent,
                bounds.as_deref_mut(),
            );
            if projected != dj {
                d.set_double(j, projected);
            }
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "Box Bounds"
    }
}
