//! Reverse-communication line searches.
//!
//! A line search looks for a step `stp > 0` along a descent direction that
//! sufficiently reduces the univariate function `phi(stp) = f(x0 + stp * d)`.
//! It never evaluates `phi` itself:
//!
//! ```text
//! task = ls.start(phi(0), phi'(0), stp, stpmin, stpmax)
//! while task == Search:
//!     stp = ls.step()
//!     task = ls.iterate(phi(stp), phi'(stp))
//! ```
//!
//! # Algorithms
//!
//! - [`BacktrackingLineSearch`]: Armijo condition only, safeguarded
//!   quadratic interpolation between trials. Derivatives at trial steps are
//!   ignored.
//! - [`MoreThuenteLineSearch`]: strong Wolfe conditions with the safeguarded
//!   cubic/quadratic steps of Moré & Thuente.
//!
//! # References
//!
//! - Moré & Thuente, "Line search algorithms with guaranteed sufficient
//!   decrease", ACM TOMS 20 (1994)
//! - Nocedal & Wright, "Numerical Optimization" (2006), chapter 3

use crate::error::{OptimizerError, OptimizerResult};
use crate::task::{LineSearchTask, OptimStatus};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// Line search driven by the caller.
pub trait LineSearch: Debug {
    /// Start a new search from `phi(0) = f0` with slope `g0 < 0`, first trial
    /// step `stp` and admissible steps `[stpmin, stpmax]`.
    ///
    /// Returns [`LineSearchTask::Search`] or, for invalid arguments,
    /// [`LineSearchTask::Error`] with the reason in [`LineSearch::status`].
    fn start(&mut self, f0: f64, g0: f64, stp: f64, stpmin: f64, stpmax: f64) -> LineSearchTask;

    /// Account for `phi(step()) = f` and `phi'(step()) = g`.
    fn iterate(&mut self, f: f64, g: f64) -> LineSearchTask;

    /// Current trial step.
    fn step(&self) -> f64;

    /// Pending task.
    fn task(&self) -> LineSearchTask;

    /// Status of the last transition.
    fn status(&self) -> OptimStatus;

    /// Whether the derivative at trial steps is used.
    fn use_derivative(&self) -> bool;

    /// Returns the name of this line search.
    fn name(&self) -> &str;

    /// Human readable status.
    fn reason(&self) -> &'static str {
        self.status().reason()
    }
}

/// Bookkeeping shared by all line searches.
#[derive(Debug, Clone, Copy)]
struct Trial {
    stp: f64,
    stpmin: f64,
    stpmax: f64,
    finit: f64,
    ginit: f64,
    task: LineSearchTask,
    status: OptimStatus,
}

impl Trial {
    fn new() -> Self {
        Self {
            stp: 0.0,
            stpmin: 0.0,
            stpmax: 0.0,
            finit: 0.0,
            ginit: 0.0,
            task: LineSearchTask::Error,
            status: OptimStatus::NotStarted,
        }
    }

    fn start(&mut self, f0: f64, g0: f64, stp: f64, stpmin: f64, stpmax: f64) -> LineSearchTask {
        self.stp = stp;
        self.stpmin = stpmin;
        self.stpmax = stpmax;
        self.finit = f0;
        self.ginit = g0;
        let rejected = if !(stp > 0.0) {
            Some(OptimStatus::StpLeZero)
        } else if !(stpmin >= 0.0) {
            Some(OptimStatus::StpminLtZero)
        } else if !(stpmax >= stpmin) {
            Some(OptimStatus::StpmaxLtStpmin)
        } else if stp < stpmin {
            Some(OptimStatus::StpLtStpmin)
        } else if stp > stpmax {
            Some(OptimStatus::StpGtStpmax)
        } else if !(g0 < 0.0) {
            Some(OptimStatus::NotADescent)
        } else {
            None
        };
        match rejected {
            Some(status) => self.finish(LineSearchTask::Error, status),
            None => self.finish(LineSearchTask::Search, OptimStatus::Success),
        }
    }

    fn finish(&mut self, task: LineSearchTask, status: OptimStatus) -> LineSearchTask {
        self.task = task;
        self.status = status;
        task
    }
}

fn check_fraction(value: f64, parameter: &str) -> OptimizerResult<()> {
    if value > 0.0 && value < 1.0 {
        Ok(())
    } else {
        Err(OptimizerError::invalid_configuration(
            "must be in (0, 1)",
            parameter,
            value.to_string(),
        ))
    }
}

/// Parameters of [`BacktrackingLineSearch`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BacktrackingConfig {
    /// Armijo parameter: accept `stp` if `f <= f0 + ftol * stp * g0`.
    pub ftol: f64,
    /// Smallest reduction of the step between trials, in `(0, 1/2]`.
    pub amin: f64,
}

impl Default for BacktrackingConfig {
    fn default() -> Self {
        Self {
            ftol: 1e-4,
            amin: 0.1,
        }
    }
}

impl BacktrackingConfig {
    /// Creates a new configuration with default parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the Armijo parameter.
    pub fn with_ftol(mut self, ftol: f64) -> Self {
        self.ftol = ftol;
        self
    }

    /// Sets the smallest step reduction.
    pub fn with_amin(mut self, amin: f64) -> Self {
        self.amin = amin;
        self
    }

    /// Checks the parameters.
    pub fn validate(&self) -> OptimizerResult<()> {
        check_fraction(self.ftol, "ftol")?;
        if !(self.amin > 0.0 && self.amin <= 0.5) {
            return Err(OptimizerError::invalid_configuration(
                "must be in (0, 0.5]",
                "amin",
                self.amin.to_string(),
            ));
        }
        Ok(())
    }
}

/// Backtracking line search enforcing the Armijo condition.
///
/// A rejected step is replaced by the minimizer of the quadratic
/// interpolating `phi(0)`, `phi'(0)` and `phi(stp)`, safeguarded to
/// `[amin * stp, stp / 2]`.
#[derive(Debug, Clone)]
pub struct BacktrackingLineSearch {
    config: BacktrackingConfig,
    trial: Trial,
}

impl BacktrackingLineSearch {
    /// Creates a backtracking line search.
    pub fn new(config: BacktrackingConfig) -> OptimizerResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            trial: Trial::new(),
        })
    }

    /// Returns the configuration.
    pub fn config(&self) -> &BacktrackingConfig {
        &self.config
    }
}

impl Default for BacktrackingLineSearch {
    fn default() -> Self {
        Self {
            config: BacktrackingConfig::default(),
            trial: Trial::new(),
        }
    }
}

impl LineSearch for BacktrackingLineSearch {
    fn start(&mut self, f0: f64, g0: f64, stp: f64, stpmin: f64, stpmax: f64) -> LineSearchTask {
        self.trial.start(f0, g0, stp, stpmin, stpmax)
    }

    fn iterate(&mut self, f: f64, _g: f64) -> LineSearchTask {
        let t = &mut self.trial;
        if t.task != LineSearchTask::Search {
            return t.task;
        }
        if f <= t.finit + self.config.ftol * t.stp * t.ginit {
            return t.finish(LineSearchTask::Convergence, OptimStatus::Success);
        }
        if t.stp <= t.stpmin {
            return t.finish(LineSearchTask::Warning, OptimStatus::StpEqualsStpmin);
        }

        let lower = self.config.amin * t.stp;
        let upper = 0.5 * t.stp;
        let q = -t.ginit * t.stp * t.stp / (2.0 * (f - t.finit - t.ginit * t.stp));
        let next = if !(q >= lower) {
            lower
        } else if q > upper {
            upper
        } else {
            q
        };
        let next = next.max(t.stpmin);
        if next == t.stp {
            return t.finish(
                LineSearchTask::Warning,
                OptimStatus::RoundingErrorsPreventProgress,
            );
        }
        t.stp = next;
        t.finish(LineSearchTask::Search, OptimStatus::Success)
    }

    fn step(&self) -> f64 {
        self.trial.stp
    }

    fn task(&self) -> LineSearchTask {
        self.trial.task
    }

    fn status(&self) -> OptimStatus {
        self.trial.status
    }

    fn use_derivative(&self) -> bool {
        false
    }

    fn name(&self) -> &str {
        "Backtracking"
    }
}

/// Parameters of [`MoreThuenteLineSearch`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MoreThuenteConfig {
    /// Sufficient decrease parameter.
    pub ftol: f64,
    /// Curvature parameter: accept when `|phi'(stp)| <= gtol * |phi'(0)|`.
    pub gtol: f64,
    /// Relative width of the bracket below which the search stops.
    pub xtol: f64,
}

impl Default for MoreThuenteConfig {
    fn default() -> Self {
        Self {
            ftol: 1e-3,
            gtol: 0.9,
            xtol: 0.1,
        }
    }
}

impl MoreThuenteConfig {
    /// Creates a new configuration with default parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the sufficient decrease parameter.
    pub fn with_ftol(mut self, ftol: f64) -> Self {
        self.ftol = ftol;
        self
    }

    /// Sets the curvature parameter.
    pub fn with_gtol(mut self, gtol: f64) -> Self {
        self.gtol = gtol;
        self
    }

    /// Sets the relative bracket tolerance.
    pub fn with_xtol(mut self, xtol: f64) -> Self {
        self.xtol = xtol;
        self
    }

    /// Checks the parameters: `0 < ftol < gtol < 1` and `xtol >= 0`.
    pub fn validate(&self) -> OptimizerResult<()> {
        check_fraction(self.ftol, "ftol")?;
        check_fraction(self.gtol, "gtol")?;
        if self.gtol <= self.ftol {
            return Err(OptimizerError::invalid_configuration(
                "must be greater than ftol",
                "gtol",
                self.gtol.to_string(),
            ));
        }
        if !(self.xtol >= 0.0) {
            return Err(OptimizerError::invalid_configuration(
                "must be nonnegative",
                "xtol",
                self.xtol.to_string(),
            ));
        }
        Ok(())
    }
}

const XTRAPL: f64 = 1.1;
const XTRAPU: f64 = 4.0;

/// Best step so far (`stx`) and the other end of the interval (`sty`).
#[derive(Debug, Clone, Copy)]
struct Bracket {
    stx: f64,
    fx: f64,
    gx: f64,
    sty: f64,
    fy: f64,
    gy: f64,
}

impl Bracket {
    /// Bracket of `phi(stp) - stp * slope`.
    fn shifted(self, slope: f64) -> Self {
        Self {
            fx: self.fx - self.stx * slope,
            fy: self.fy - self.sty * slope,
            gx: self.gx - slope,
            gy: self.gy - slope,
            ..self
        }
    }
}

/// Line search enforcing the strong Wolfe conditions (Moré & Thuente).
#[derive(Debug, Clone)]
pub struct MoreThuenteLineSearch {
    config: MoreThuenteConfig,
    trial: Trial,
    bracketed: bool,
    stage: u8,
    gtest: f64,
    width: f64,
    width1: f64,
    stmin: f64,
    stmax: f64,
    bracket: Bracket,
}

impl MoreThuenteLineSearch {
    /// Creates a Moré-Thuente line search.
    pub fn new(config: MoreThuenteConfig) -> OptimizerResult<Self> {
        config.validate()?;
        Ok(Self::with_valid_config(config))
    }

    fn with_valid_config(config: MoreThuenteConfig) -> Self {
        Self {
            config,
            trial: Trial::new(),
            bracketed: false,
            stage: 1,
            gtest: 0.0,
            width: 0.0,
            width1: 0.0,
            stmin: 0.0,
            stmax: 0.0,
            bracket: Bracket {
                stx: 0.0,
                fx: 0.0,
                gx: 0.0,
                sty: 0.0,
                fy: 0.0,
                gy: 0.0,
            },
        }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &MoreThuenteConfig {
        &self.config
    }

    /// Whether the minimizer has been bracketed.
    pub fn is_bracketed(&self) -> bool {
        self.bracketed
    }
}

impl Default for MoreThuenteLineSearch {
    fn default() -> Self {
        Self::with_valid_config(MoreThuenteConfig::default())
    }
}

impl LineSearch for MoreThuenteLineSearch {
    fn start(&mut self, f0: f64, g0: f64, stp: f64, stpmin: f64, stpmax: f64) -> LineSearchTask {
        let task = self.trial.start(f0, g0, stp, stpmin, stpmax);
        if task != LineSearchTask::Search {
            return task;
        }
        self.bracketed = false;
        self.stage = 1;
        self.gtest = self.config.ftol * g0;
        self.width = stpmax - stpmin;
        self.width1 = 2.0 * self.width;
        self.bracket = Bracket {
            stx: 0.0,
            fx: f0,
            gx: g0,
            sty: 0.0,
            fy: f0,
            gy: g0,
        };
        self.stmin = 0.0;
        self.stmax = stp + XTRAPU * stp;
        task
    }

    fn iterate(&mut self, f: f64, g: f64) -> LineSearchTask {
        if self.trial.task != LineSearchTask::Search {
            return self.trial.task;
        }
        let MoreThuenteConfig { gtol, xtol, .. } = self.config;
        let stp = self.trial.stp;
        let (stpmin, stpmax) = (self.trial.stpmin, self.trial.stpmax);
        let ginit = self.trial.ginit;
        let ftest = self.trial.finit + stp * self.gtest;

        if self.stage == 1 && f <= ftest && g >= 0.0 {
            self.stage = 2;
        }

        // Later tests take precedence.
        let mut outcome = None;
        if self.bracketed && (stp <= self.stmin || stp >= self.stmax) {
            outcome = Some((
                LineSearchTask::Warning,
                OptimStatus::RoundingErrorsPreventProgress,
            ));
        }
        if self.bracketed && self.stmax - self.stmin <= xtol * self.stmax {
            outcome = Some((LineSearchTask::Warning, OptimStatus::XtolTestSatisfied));
        }
        if stp == stpmax && f <= ftest && g <= self.gtest {
            outcome = Some((LineSearchTask::Warning, OptimStatus::StpEqualsStpmax));
        }
        if stp == stpmin && (f > ftest || g >= self.gtest) {
            outcome = Some((LineSearchTask::Warning, OptimStatus::StpEqualsStpmin));
        }
        if f <= ftest && g.abs() <= gtol * (-ginit) {
            outcome = Some((LineSearchTask::Convergence, OptimStatus::Success));
        }
        if let Some((task, status)) = outcome {
            return self.trial.finish(task, status);
        }

        // In the first stage, a lower function value without sufficient
        // decrease is handled with the modified function
        // psi(stp) = phi(stp) - phi(0) - stp * gtest.
        let mut next = if self.stage == 1 && f <= self.bracket.fx && f > ftest {
            let mut modified = self.bracket.shifted(self.gtest);
            let next = safeguarded_step(
                &mut modified,
                stp,
                f - stp * self.gtest,
                g - self.gtest,
                &mut self.bracketed,
                self.stmin,
                self.stmax,
            );
            self.bracket = modified.shifted(-self.gtest);
            next
        } else {
            safeguarded_step(
                &mut self.bracket,
                stp,
                f,
                g,
                &mut self.bracketed,
                self.stmin,
                self.stmax,
            )
        };

        let Bracket { stx, sty, .. } = self.bracket;
        if self.bracketed {
            if (sty - stx).abs() >= 0.66 * self.width1 {
                next = stx + 0.5 * (sty - stx);
            }
            self.width1 = self.width;
            self.width = (sty - stx).abs();
            self.stmin = stx.min(sty);
            self.stmax = stx.max(sty);
        } else {
            self.stmin = next + XTRAPL * (next - stx);
            self.stmax = next + XTRAPU * (next - stx);
        }

        next = next.max(stpmin).min(stpmax);
        if self.bracketed
            && (next <= self.stmin
                || next >= self.stmax
                || self.stmax - self.stmin <= xtol * self.stmax)
        {
            next = stx;
        }
        self.trial.stp = next;
        self.trial.finish(LineSearchTask::Search, OptimStatus::Success)
    }

    fn step(&self) -> f64 {
        self.trial.stp
    }

    fn task(&self) -> LineSearchTask {
        self.trial.task
    }

    fn status(&self) -> OptimStatus {
        self.trial.status
    }

    fn use_derivative(&self) -> bool {
        true
    }

    fn name(&self) -> &str {
        "Moré-Thuente"
    }
}

/// Safeguarded step of Moré & Thuente, updating the bracket with the trial
/// `(stp, fp, dp)`; returns the next trial step.
fn safeguarded_step(
    b: &mut Bracket,
    stp: f64,
    fp: f64,
    dp: f64,
    bracketed: &mut bool,
    stpmin: f64,
    stpmax: f64,
) -> f64 {
    let Bracket {
        stx,
        fx,
        gx: dx,
        sty,
        fy,
        gy: dy,
    } = *b;
    let sgnd = dp * dx.signum();

    let stpf = if fp > fx {
        // Higher function value: the minimum is bracketed.
        let theta = 3.0 * (fx - fp) / (stp - stx) + dx + dp;
        let s = theta.abs().max(dx.abs()).max(dp.abs());
        let mut gamma = s * ((theta / s).powi(2) - (dx / s) * (dp / s)).sqrt();
        if stp < stx {
            gamma = -gamma;
        }
        let p = (gamma - dx) + theta;
        let q = ((gamma - dx) + gamma) + dp;
        let stpc = stx + (p / q) * (stp - stx);
        let stpq = stx + ((dx / ((fx - fp) / (stp - stx) + dx)) / 2.0) * (stp - stx);
        *bracketed = true;
        if (stpc - stx).abs() < (stpq - stx).abs() {
            stpc
        } else {
            stpc + (stpq - stpc) / 2.0
        }
    } else if sgnd < 0.0 {
        // Derivatives of opposite signs: the minimum is bracketed.
        let theta = 3.0 * (fx - fp) / (stp - stx) + dx + dp;
        let s = theta.abs().max(dx.abs()).max(dp.abs());
        let mut gamma = s * ((theta / s).powi(2) - (dx / s) * (dp / s)).sqrt();
        if stp > stx {
            gamma = -gamma;
        }
        let p = (gamma - dp) + theta;
        let q = ((gamma - dp) + gamma) + dx;
        let stpc = stp + (p / q) * (stx - stp);
        let stpq = stp + (dp / (dp - dx)) * (stx - stp);
        *bracketed = true;
        if (stpc - stp).abs() > (stpq - stp).abs() {
            stpc
        } else {
            stpq
        }
    } else if dp.abs() < dx.abs() {
        // Same sign, decreasing derivative magnitude.
        let theta = 3.0 * (fx - fp) / (stp - stx) + dx + dp;
        let s = theta.abs().max(dx.abs()).max(dp.abs());
        let mut gamma = s * ((theta / s).powi(2) - (dx / s) * (dp / s)).max(0.0).sqrt();
        if stp > stx {
            gamma = -gamma;
        }
        let p = (gamma - dp) + theta;
        let q = (gamma + (dx - dp)) + gamma;
        let r = p / q;
        let stpc = if r < 0.0 && gamma != 0.0 {
            stp + r * (stx - stp)
        } else if stp > stx {
            stpmax
        } else {
            stpmin
        };
        let stpq = stp + (dp / (dp - dx)) * (stx - stp);
        if *bracketed {
            let stpf = if (stpc - stp).abs() < (stpq - stp).abs() {
                stpc
            } else {
                stpq
            };
            if stp > stx {
                stpf.min(stp + 0.66 * (sty - stp))
            } else {
                stpf.max(stp + 0.66 * (sty - stp))
            }
        } else {
            let stpf = if (stpc - stp).abs() > (stpq - stp).abs() {
                stpc
            } else {
                stpq
            };
            stpf.min(stpmax).max(stpmin)
        }
    } else if *bracketed {
        // Same sign, derivative magnitude not decreasing: cubic step
        // towards the other end of the bracket.
        let theta = 3.0 * (fp - fy) / (sty - stp) + dy + dp;
        let s = theta.abs().max(dy.abs()).max(dp.abs());
        let mut gamma = s * ((theta / s).powi(2) - (dy / s) * (dp / s)).sqrt();
        if stp > sty {
            gamma = -gamma;
        }
        let p = (gamma - dp) + theta;
        let q = ((gamma - dp) + gamma) + dy;
        stp + (p / q) * (sty - stp)
    } else if stp > stx {
        stpmax
    } else {
        stpmin
    };

    if fp > fx {
        b.sty = stp;
        b.fy = fp;
        b.gy = dp;
    } else {
        if sgnd < 0.0 {
            b.sty = stx;
            b.fy = fx;
            b.gy = dx;
        }
        b.stx = stp;
        b.fx = fp;
        b.gx = dp;
    }
    stpf
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    /// `phi(a) = (a - 1)^2` and its derivative.
    fn parabola(a: f64) -> (f64, f64) {
        ((a - 1.0).powi(2), 2.0 * (a - 1.0))
    }

    #[test]
    fn test_start_rejects_invalid_arguments() {
        let mut ls = BacktrackingLineSearch::default();
        assert_eq!(ls.task(), LineSearchTask::Error);
        assert_eq!(ls.status(), OptimStatus::NotStarted);

        let cases = [
            ((1.0, -1.0, 0.0, 0.0, 1.0), OptimStatus::StpLeZero),
            ((1.0, 1.0, 0.5, 0.0, 1.0), OptimStatus::NotADescent),
            ((1.0, -1.0, 0.5, -1.0, 1.0), OptimStatus::StpminLtZero),
            ((1.0, -1.0, 0.5, 1.0, 0.1), OptimStatus::StpmaxLtStpmin),
            ((1.0, -1.0, 2.0, 0.0, 1.0), OptimStatus::StpGtStpmax),
            ((1.0, -1.0, 0.1, 0.5, 1.0), OptimStatus::StpLtStpmin),
        ];
        for ((f0, g0, stp, stpmin, stpmax), status) in cases {
            assert_eq!(ls.start(f0, g0, stp, stpmin, stpmax), LineSearchTask::Error);
            assert_eq!(ls.status(), status);
            // Errors are absorbing.
            assert_eq!(ls.iterate(0.0, 0.0), LineSearchTask::Error);
        }
    }

    #[test]
    fn test_backtracking_interpolates() {
        let mut ls = BacktrackingLineSearch::default();
        let (f0, g0) = parabola(0.0);
        assert_eq!(ls.start(f0, g0, 4.0, 0.0, 10.0), LineSearchTask::Search);

        let (f, g) = parabola(ls.step());
        assert_eq!(ls.iterate(f, g), LineSearchTask::Search);
        assert_relative_eq!(ls.step(), 1.0);

        let (f, g) = parabola(ls.step());
        assert_eq!(ls.iterate(f, g), LineSearchTask::Convergence);
        assert_eq!(ls.status(), OptimStatus::Success);
        assert_relative_eq!(ls.step(), 1.0);
    }

    #[test]
    fn test_backtracking_safeguards() {
        let config = BacktrackingConfig::new().with_amin(0.25);
        let mut ls = BacktrackingLineSearch::new(config).unwrap();
        // A huge value pushes the quadratic minimizer to the lower safeguard.
        ls.start(0.0, -1.0, 1.0, 0.0, 1.0);
        assert_eq!(ls.iterate(1e12, 0.0), LineSearchTask::Search);
        assert_relative_eq!(ls.step(), 0.25);
        // A non-finite value as well.
        assert_eq!(ls.iterate(f64::NAN, 0.0), LineSearchTask::Search);
        assert_relative_eq!(ls.step(), 0.0625);

        // The lower step bound is reached.
        ls.start(0.0, -1.0, 1.0, 1.0, 1.0);
        assert_eq!(ls.iterate(1.0, 0.0), LineSearchTask::Warning);
        assert_eq!(ls.status(), OptimStatus::StpEqualsStpmin);

        assert!(BacktrackingLineSearch::new(BacktrackingConfig::new().with_ftol(1.5)).is_err());
        assert!(BacktrackingLineSearch::new(BacktrackingConfig::new().with_amin(0.0)).is_err());
    }

    #[test]
    fn test_more_thuente_accepts_exact_step() {
        let mut ls = MoreThuenteLineSearch::default();
        let (f0, g0) = parabola(0.0);
        assert_eq!(ls.start(f0, g0, 1.0, 0.0, 10.0), LineSearchTask::Search);
        let (f, g) = parabola(1.0);
        assert_eq!(ls.iterate(f, g), LineSearchTask::Convergence);
        assert_eq!(ls.step(), 1.0);
    }

    #[test]
    fn test_more_thuente_extrapolates() {
        let config = MoreThuenteConfig::new().with_gtol(0.1);
        let mut ls = MoreThuenteLineSearch::new(config).unwrap();
        let (f0, g0) = parabola(0.0);
        assert_eq!(ls.start(f0, g0, 0.25, 0.0, 10.0), LineSearchTask::Search);

        // Sufficient decrease but the slope is still too steep.
        let (f, g) = parabola(ls.step());
        assert_eq!(ls.iterate(f, g), LineSearchTask::Search);
        assert!(!ls.is_bracketed());
        assert_relative_eq!(ls.step(), 1.0, epsilon = 1e-12);

        let (f, g) = parabola(ls.step());
        assert_eq!(ls.iterate(f, g), LineSearchTask::Convergence);
    }

    #[test]
    fn test_more_thuente_brackets_overshoot() {
        let config = MoreThuenteConfig::new().with_gtol(0.1);
        let mut ls = MoreThuenteLineSearch::new(config).unwrap();
        let (f0, g0) = parabola(0.0);
        ls.start(f0, g0, 3.0, 0.0, 10.0);

        let mut task = LineSearchTask::Search;
        for _ in 0..20 {
            let (f, g) = parabola(ls.step());
            task = ls.iterate(f, g);
            if task != LineSearchTask::Search {
                break;
            }
            assert!(ls.is_bracketed());
        }
        assert_eq!(task, LineSearchTask::Convergence);
        let (_, g) = parabola(ls.step());
        assert!(g.abs() <= 0.1 * 2.0);
    }

    #[test]
    fn test_more_thuente_config_validation() {
        assert!(MoreThuenteConfig::default().validate().is_ok());
        assert!(MoreThuenteConfig::new().with_gtol(1e-4).validate().is_err());
        assert!(MoreThuenteConfig::new().with_xtol(-1.0).validate().is_err());
        assert!(matches!(
            MoreThuenteLineSearch::new(MoreThuenteConfig::new().with_ftol(0.0)),
            Err(OptimizerError::InvalidConfiguration { .. })
        ));
    }
}
