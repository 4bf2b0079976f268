//! VMLMB: variable metric, limited memory, bound constrained optimization.
//!
//! [`Vmlmb`] minimizes a smooth function `f(x)`, possibly subject to bound
//! constraints, with an L-BFGS model of the inverse Hessian and a line
//! search. It is driven by reverse communication: the caller evaluates the
//! function and its gradient whenever [`Vmlmb::iterate`] returns
//! [`OptimTask::ComputeFg`].
//!
//! ```text
//! task = opt.start()
//! loop:
//!     if task == ComputeFg: f, g = fg(x)
//!     else if task != NewX: break
//!     task = opt.iterate(x, f, g)
//! ```
//!
//! # Transitions
//!
//! - `ComputeFg`: the gradient is projected onto the feasible directions.
//!   During a line search, the new point is either accepted or replaced by
//!   another trial (`ComputeFg`). Once accepted, the gradient norm is
//!   compared with the convergence threshold: `FinalX` or `NewX`.
//! - `NewX`: the L-BFGS memory is updated with the last step, a new search
//!   direction is computed and a line search started (`ComputeFg`).
//! - `FinalX`, `Warning` and `Error` end the run: they are emitted once and
//!   further calls to [`Vmlmb::iterate`] fail with
//!   [`OptimizerError::NotRunning`] until [`Vmlmb::start`] or
//!   [`Vmlmb::restart`].
//! - When a run stops before evaluating its next trial point (evaluation
//!   cap, failed projection or line search start), the variables and the
//!   gradient are restored to the last accepted point.
//!
//! # References
//!
//! - Thiébaut, "Optimization issues in blind deconvolution algorithms",
//!   SPIE 4847 (2002)

use crate::bounds::BoundProjector;
use crate::error::{OptimizerError, OptimizerResult};
use crate::lbfgs::{LbfgsOperator, ScalingRule};
use crate::line_search::{BacktrackingLineSearch, LineSearch};
use crate::task::{LineSearchTask, OptimStatus, OptimTask};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use shapedopt_linalg::{Preconditioner, Vector, VectorSpace};
use std::fmt;
use std::time::{Duration, Instant};

/// Configuration of the VMLMB driver.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct VmlmbConfig {
    /// Number of memorized L-BFGS pairs.
    pub memory: usize,
    /// Scaling of the initial inverse Hessian when no preconditioner is set.
    pub scaling: ScalingRule,
    /// Sufficient descent: require `<p,g> >= epsilon * |p| * |g|`.
    pub epsilon: f64,
    /// First step length relative to the variables, used when the memory is
    /// empty: `delta * |x| / |p|` for `0 < delta < 1`, else `1 / |p|`.
    pub delta: f64,
    /// Absolute gradient tolerance.
    pub gatol: f64,
    /// Gradient tolerance relative to the initial gradient norm.
    pub grtol: f64,
    /// Relative lower bound of the line search step.
    pub stpmin: f64,
    /// Relative upper bound of the line search step.
    pub stpmax: f64,
    /// Maximum number of accepted steps.
    pub max_iterations: Option<usize>,
    /// Maximum number of function and gradient evaluations.
    pub max_evaluations: Option<usize>,
    /// Maximum number of reductions of a projected first step.
    pub max_projection_backtracks: usize,
}

impl Default for VmlmbConfig {
    fn default() -> Self {
        Self {
            memory: 5,
            scaling: ScalingRule::OrenSpedicato,
            epsilon: 0.0,
            delta: 0.05,
            gatol: 0.0,
            grtol: 1e-6,
            stpmin: 1e-20,
            stpmax: 1e20,
            max_iterations: None,
            max_evaluations: None,
            max_projection_backtracks: 60,
        }
    }
}

impl VmlmbConfig {
    /// Creates a new configuration with default parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the number of memorized pairs.
    pub fn with_memory(mut self, memory: usize) -> Self {
        self.memory = memory;
        self
    }

    /// Sets the scaling rule.
    pub fn with_scaling(mut self, scaling: ScalingRule) -> Self {
        self.scaling = scaling;
        self
    }

    /// Sets the sufficient descent parameter.
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Sets the relative size of the first step.
    pub fn with_delta(mut self, delta: f64) -> Self {
        self.delta = delta;
        self
    }

    /// Sets the absolute and relative gradient tolerances.
    pub fn with_gradient_tolerances(mut self, gatol: f64, grtol: f64) -> Self {
        self.gatol = gatol;
        self.grtol = grtol;
        self
    }

    /// Sets the relative bounds of the line search step.
    pub fn with_step_bounds(mut self, stpmin: f64, stpmax: f64) -> Self {
        self.stpmin = stpmin;
        self.stpmax = stpmax;
        self
    }

    /// Sets the maximum number of iterations.
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = Some(max_iterations);
        self
    }

    /// Sets the maximum number of evaluations.
    pub fn with_max_evaluations(mut self, max_evaluations: usize) -> Self {
        self.max_evaluations = Some(max_evaluations);
        self
    }

    /// Sets the maximum number of projected step reductions.
    pub fn with_max_projection_backtracks(mut self, backtracks: usize) -> Self {
        self.max_projection_backtracks = backtracks;
        self
    }

    /// Gradient norm below which the variables are accepted:
    /// `max(0, gatol, grtol * ginit)`.
    pub fn gradient_threshold(&self, ginit: f64) -> f64 {
        0.0f64.max(self.gatol).max(self.grtol * ginit)
    }

    /// Checks the parameters.
    pub fn validate(&self) -> OptimizerResult<()> {
        let invalid = |reason: &str, parameter: &str, value: String| {
            Err(OptimizerError::invalid_configuration(reason, parameter, value))
        };
        if self.memory < 1 {
            return invalid("must be at least 1", "memory", self.memory.to_string());
        }
        if let ScalingRule::Constant(gamma) = self.scaling {
            if !(gamma > 0.0) {
                return invalid("must be positive", "scaling", gamma.to_string());
            }
        }
        if !(self.epsilon >= 0.0 && self.epsilon < 1.0) {
            return invalid("must be in [0, 1)", "epsilon", self.epsilon.to_string());
        }
        if !(self.delta >= 0.0) {
            return invalid("must be nonnegative", "delta", self.delta.to_string());
        }
        if !(self.gatol >= 0.0) {
            return invalid("must be nonnegative", "gatol", self.gatol.to_string());
        }
        if !(self.grtol >= 0.0) {
            return invalid("must be nonnegative", "grtol", self.grtol.to_string());
        }
        if !(self.stpmin >= 0.0 && self.stpmin < 1.0) {
            return invalid("must be in [0, 1)", "stpmin", self.stpmin.to_string());
        }
        if !(self.stpmax > 1.0) {
            return invalid("must be greater than 1", "stpmax", self.stpmax.to_string());
        }
        if self.max_evaluations == Some(0) {
            return invalid("must be at least 1", "max_evaluations", "0".to_string());
        }
        Ok(())
    }
}

/// Summary of a [`Vmlmb::minimize`] run.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct VmlmbReport {
    /// Final task (`FinalX`, `Warning` or `Error`).
    pub task: OptimTask,
    /// Final status.
    pub status: OptimStatus,
    /// Function value of the last evaluation.
    pub value: f64,
    /// Norm of the projected gradient at the last accepted point.
    pub gradient_norm: f64,
    /// Number of accepted steps.
    pub iterations: usize,
    /// Number of function and gradient evaluations.
    pub evaluations: usize,
    /// Number of L-BFGS memory resets.
    pub restarts: usize,
    /// Wall-clock time of the run.
    pub duration: Duration,
    /// Whether the convergence test was satisfied.
    pub converged: bool,
}

impl VmlmbReport {
    /// Human readable final status.
    pub fn reason(&self) -> &'static str {
        self.status.reason()
    }
}

type GradientThreshold = Box<dyn Fn(f64) -> f64>;

/// Bound constrained limited memory quasi-Newton optimizer.
pub struct Vmlmb<V: Vector, L: LineSearch = BacktrackingLineSearch> {
    config: VmlmbConfig,
    lbfgs: LbfgsOperator<V>,
    line_search: L,
    projector: Option<Box<dyn BoundProjector<V>>>,
    threshold: Option<GradientThreshold>,
    x0: V,
    g0: V,
    p: V,
    tmp: V,
    f0: f64,
    // value at the variables last handed back to the caller
    fx: f64,
    alpha: f64,
    dg0: f64,
    gnorm: f64,
    g0norm: f64,
    ginit: f64,
    pnorm: f64,
    iterations: usize,
    evaluations: usize,
    restarts: usize,
    task: OptimTask,
    status: OptimStatus,
    previous: bool,
    searching: bool,
}

impl<V: Vector> Vmlmb<V, BacktrackingLineSearch> {
    /// Optimizer over `space` with a backtracking line search.
    pub fn new<S>(space: &S, config: VmlmbConfig) -> OptimizerResult<Self>
    where
        S: VectorSpace<Vector = V>,
    {
        Self::with_line_search(space, config, BacktrackingLineSearch::default())
    }
}

impl<V: Vector, L: LineSearch> Vmlmb<V, L> {
    /// Optimizer over `space` with the given line search.
    pub fn with_line_search<S>(space: &S, config: VmlmbConfig, line_search: L) -> OptimizerResult<Self>
    where
        S: VectorSpace<Vector = V>,
    {
        config.validate()?;
        let mut lbfgs = LbfgsOperator::new(space, config.memory)?;
        lbfgs.set_rule(config.scaling)?;
        Ok(Self {
            config,
            lbfgs,
            line_search,
            projector: None,
            threshold: None,
            x0: space.create(),
            g0: space.create(),
            p: space.create(),
            tmp: space.create(),
            f0: 0.0,
            fx: 0.0,
            alpha: 0.0,
            dg0: 0.0,
            gnorm: 0.0,
            g0norm: 0.0,
            ginit: 0.0,
            pnorm: 0.0,
            iterations: 0,
            evaluations: 0,
            restarts: 0,
            task: OptimTask::ComputeFg,
            status: OptimStatus::Success,
            previous: false,
            searching: false,
        })
    }

    /// Constrain the variables with a projector.
    pub fn with_bounds<P>(mut self, projector: P) -> Self
    where
        P: BoundProjector<V> + 'static,
    {
        self.projector = Some(Box::new(projector));
        self
    }

    /// Use `h0` as initial inverse Hessian approximation.
    ///
    /// With bound constraints `h0` should be diagonal.
    pub fn with_preconditioner<P>(mut self, h0: P) -> Self
    where
        P: Preconditioner<V> + 'static,
    {
        self.lbfgs.set_preconditioner(Some(Box::new(h0)));
        self
    }

    /// Replace the convergence threshold `max(0, gatol, grtol * ginit)` by
    /// `threshold(ginit)`.
    pub fn with_gradient_threshold<F>(mut self, threshold: F) -> Self
    where
        F: Fn(f64) -> f64 + 'static,
    {
        self.threshold = Some(Box::new(threshold));
        self
    }

    /// Returns the configuration.
    pub fn config(&self) -> &VmlmbConfig {
        &self.config
    }

    /// Returns the L-BFGS operator.
    pub fn lbfgs(&self) -> &LbfgsOperator<V> {
        &self.lbfgs
    }

    /// Returns the line search.
    pub fn line_search(&self) -> &L {
        &self.line_search
    }

    /// Pending task.
    pub fn task(&self) -> OptimTask {
        self.task
    }

    /// Status of the last transition.
    pub fn status(&self) -> OptimStatus {
        self.status
    }

    /// Human readable status.
    pub fn reason(&self) -> &'static str {
        self.status.reason()
    }

    /// Number of accepted steps.
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// Number of function and gradient evaluations.
    pub fn evaluations(&self) -> usize {
        self.evaluations
    }

    /// Number of L-BFGS memory resets.
    pub fn restarts(&self) -> usize {
        self.restarts
    }

    /// Length of the current step along the search direction.
    pub fn step(&self) -> f64 {
        self.alpha
    }

    /// Norm of the last projected gradient.
    pub fn gradient_norm(&self) -> f64 {
        self.gnorm
    }

    /// Norm of the projected gradient at the start of the current step.
    pub fn previous_gradient_norm(&self) -> f64 {
        self.g0norm
    }

    /// Norm of the first projected gradient since [`Vmlmb::start`].
    pub fn initial_gradient_norm(&self) -> f64 {
        self.ginit
    }

    /// Norm of the current search direction.
    pub fn direction_norm(&self) -> f64 {
        self.pnorm
    }

    /// Function value at the start of the current step.
    pub fn start_value(&self) -> f64 {
        self.f0
    }

    /// Function value at the last evaluated point.
    pub fn value(&self) -> f64 {
        self.fx
    }

    /// Start a new optimization; the caller must evaluate the function at
    /// its initial variables.
    pub fn start(&mut self) -> OptimTask {
        self.iterations = 0;
        self.evaluations = 0;
        self.restarts = 0;
        self.ginit = 0.0;
        self.gnorm = 0.0;
        self.fx = 0.0;
        self.previous = false;
        self.searching = false;
        self.lbfgs.reset();
        self.finish(OptimTask::ComputeFg, OptimStatus::Success)
    }

    /// Forget the L-BFGS memory and resume from the next evaluation.
    ///
    /// Counters and the initial gradient norm are kept.
    pub fn restart(&mut self) -> OptimTask {
        self.restarts += 1;
        self.previous = false;
        self.searching = false;
        self.lbfgs.reset();
        self.finish(OptimTask::ComputeFg, OptimStatus::Success)
    }

    /// Advance the state machine.
    ///
    /// `f` and `g` must hold the function value and gradient at `x` after a
    /// `ComputeFg` request; `g` is projected in place when bounds are set.
    /// `x` is overwritten with the next point to evaluate.
    ///
    /// # Errors
    ///
    /// Vectors foreign to the optimizer's space, and calls made after the
    /// run has ended ([`OptimizerError::NotRunning`]). Algorithmic failures
    /// are reported by the returned task.
    pub fn iterate(&mut self, x: &mut V, f: f64, g: &mut V) -> OptimizerResult<OptimTask> {
        match self.task {
            OptimTask::ComputeFg => self.accept_evaluation(x, f, g),
            OptimTask::NewX => {
                if self.previous {
                    self.lbfgs.update(x, &self.x0, g, &self.g0, false)?;
                }
                self.next_direction(x, f, g)
            }
            task => Err(OptimizerError::NotRunning { task }),
        }
    }

    /// Minimize with `fg(x, g)` returning `f(x)` and storing the gradient
    /// in `g`.
    ///
    /// The variables are first projected onto the feasible set. On return
    /// `x` holds the last evaluated point; the value and gradient norm of the
    /// report belong to it.
    pub fn minimize<F>(&mut self, x: &mut V, mut fg: F) -> OptimizerResult<VmlmbReport>
    where
        F: FnMut(&V, &mut V) -> f64,
    {
        let timer = Instant::now();
        if let Some(projector) = &self.projector {
            projector.project_variables_in_place(x)?;
        }
        let mut g = x.create();
        let mut f = 0.0;
        let mut task = self.start();
        loop {
            match task {
                OptimTask::ComputeFg => f = fg(x, &mut g),
                OptimTask::NewX => log::debug!(
                    "iteration {}: f = {:e}, |g| = {:e}, evaluations = {}",
                    self.iterations,
                    f,
                    self.gnorm,
                    self.evaluations
                ),
                _ => break,
            }
            task = self.iterate(x, f, &mut g)?;
        }
        Ok(VmlmbReport {
            task,
            status: self.status,
            value: self.fx,
            gradient_norm: self.gnorm,
            iterations: self.iterations,
            evaluations: self.evaluations,
            restarts: self.restarts,
            duration: timer.elapsed(),
            converged: task == OptimTask::FinalX,
        })
    }

    fn finish(&mut self, task: OptimTask, status: OptimStatus) -> OptimTask {
        match task {
            OptimTask::Warning => log::warn!("VMLMB stopped: {}", status.reason()),
            OptimTask::Error => log::warn!("VMLMB failed: {}", status.reason()),
            _ => log::trace!("VMLMB task {task}"),
        }
        self.task = task;
        self.status = status;
        task
    }

    fn gradient_threshold(&self) -> f64 {
        match &self.threshold {
            Some(threshold) => threshold(self.ginit),
            None => self.config.gradient_threshold(self.ginit),
        }
    }

    fn request_evaluation(&mut self, x: &mut V, g: &mut V) -> OptimizerResult<OptimTask> {
        match self.config.max_evaluations {
            Some(max) if self.evaluations >= max => {
                self.stop(x, g, OptimTask::Warning, OptimStatus::TooManyEvaluations)
            }
            _ => Ok(self.finish(OptimTask::ComputeFg, OptimStatus::Success)),
        }
    }

    /// End the run at the last accepted point `x0`.
    fn stop(
        &mut self,
        x: &mut V,
        g: &mut V,
        task: OptimTask,
        status: OptimStatus,
    ) -> OptimizerResult<OptimTask> {
        x.copy_from(&self.x0)?;
        g.copy_from(&self.g0)?;
        self.fx = self.f0;
        self.gnorm = self.g0norm;
        self.searching = false;
        Ok(self.finish(task, status))
    }

    fn accept_evaluation(&mut self, x: &mut V, f: f64, g: &mut V) -> OptimizerResult<OptimTask> {
        if let Some(projector) = &self.projector {
            projector.project_direction_in_place(x, g, true, None)?;
        }
        self.evaluations += 1;
        self.fx = f;

        if self.searching {
            let dg = -self.p.dot(g)?;
            match self.line_search.iterate(f, dg) {
                LineSearchTask::Search => return self.next_step(x, g),
                LineSearchTask::Convergence => {}
                LineSearchTask::Warning
                    if self.line_search.status() == OptimStatus::RoundingErrorsPreventProgress =>
                {
                    log::warn!(
                        "VMLMB: line search step accepted despite: {}",
                        self.line_search.reason()
                    );
                }
                _ => {
                    let status = self.line_search.status();
                    return self.stop(x, g, OptimTask::Error, status);
                }
            }
            self.searching = false;
            self.iterations += 1;
        }

        self.gnorm = g.norm2();
        if self.evaluations == 1 {
            self.ginit = self.gnorm;
        }
        if self.gnorm <= self.gradient_threshold() {
            return Ok(self.finish(OptimTask::FinalX, OptimStatus::Success));
        }
        match self.config.max_iterations {
            Some(max) if self.iterations >= max => Ok(self.finish(
                OptimTask::Warning,
                OptimStatus::TooManyIterations,
            )),
            _ => Ok(self.finish(OptimTask::NewX, OptimStatus::Success)),
        }
    }

    fn next_step(&mut self, x: &mut V, g: &mut V) -> OptimizerResult<OptimTask> {
        self.alpha = self.line_search.step();
        x.combine(1.0, &self.x0, -self.alpha, &self.p)?;
        if let Some(projector) = &self.projector {
            projector.project_variables_in_place(x)?;
        }
        self.request_evaluation(x, g)
    }

    fn next_direction(&mut self, x: &mut V, f: f64, g: &mut V) -> OptimizerResult<OptimTask> {
        // Anti-search direction p = H g with sufficient descent.
        loop {
            self.lbfgs.apply_operator(g, &mut self.p)?;
            self.pnorm = self.p.norm2();
            let pg = self.p.dot(g)?;
            if pg >= self.config.epsilon * self.pnorm * self.gnorm {
                self.dg0 = -pg;
                break;
            }
            if self.lbfgs.pairs() < 1 {
                return Ok(self.finish(OptimTask::Error, OptimStatus::BadPreconditioner));
            }
            log::warn!("VMLMB: not a sufficient descent direction, L-BFGS memory reset");
            self.lbfgs.reset();
            self.restarts += 1;
        }

        self.x0.copy_from(x)?;
        self.g0.copy_from(g)?;
        self.g0norm = self.gnorm;
        self.f0 = f;
        self.previous = true;

        self.alpha = if self.lbfgs.pairs() >= 1 || self.lbfgs.rule() == ScalingRule::None {
            1.0
        } else {
            initial_step(self.config.delta, &self.x0, &self.p)
        };
        x.combine(1.0, &self.x0, -self.alpha, &self.p)?;

        let (stpmin, stpmax) = match &self.projector {
            None => (
                self.config.stpmin * self.alpha,
                self.config.stpmax * self.alpha,
            ),
            Some(projector) => {
                // Shorten the step until the projected move is a descent.
                let mut backtracks = 0;
                loop {
                    projector.project_variables_in_place(x)?;
                    self.tmp.combine(1.0, &self.x0, -1.0, x)?;
                    self.dg0 = -self.tmp.dot(&self.g0)?;
                    if self.dg0 < 0.0 {
                        break;
                    }
                    if self.dg0 == 0.0 && self.lbfgs.pairs() < 1 {
                        // No feasible move: x0 is a constrained minimum.
                        x.copy_from(&self.x0)?;
                        return Ok(self.finish(OptimTask::FinalX, OptimStatus::Success));
                    }
                    if backtracks >= self.config.max_projection_backtracks {
                        return self.stop(x, g, OptimTask::Error, OptimStatus::ProjectionFailed);
                    }
                    backtracks += 1;
                    if self.lbfgs.pairs() >= 1 {
                        log::warn!("VMLMB: projected step is not a descent, L-BFGS memory reset");
                        self.lbfgs.reset();
                        self.restarts += 1;
                        self.lbfgs.apply_operator(g, &mut self.p)?;
                        self.pnorm = self.p.norm2();
                        self.alpha = initial_step(self.config.delta, &self.x0, &self.p);
                    } else {
                        self.alpha *= 0.5;
                    }
                    x.combine(1.0, &self.x0, -self.alpha, &self.p)?;
                }
                // Search along the projected step: x = x0 - stp * (x0 - xp).
                self.p.copy_from(&self.tmp)?;
                self.alpha = 1.0;
                (self.config.stpmin, 1.0)
            }
        };

        match self
            .line_search
            .start(self.f0, self.dg0, self.alpha, stpmin, stpmax)
        {
            LineSearchTask::Search => {
                self.searching = true;
                self.request_evaluation(x, g)
            }
            _ => {
                let status = self.line_search.status();
                self.stop(x, g, OptimTask::Error, status)
            }
        }
    }
}

/// Length of the first step along `d` from `x` when nothing is known about
/// the scale of the problem.
fn initial_step<V: Vector>(delta: f64, x: &V, d: &V) -> f64 {
    let dnorm = d.norm2();
    if delta > 0.0 && delta < 1.0 {
        let xnorm = x.norm2();
        if xnorm > 0.0 {
            return (xnorm / dnorm) * delta;
        }
    }
    1.0 / dnorm
}

impl<V: Vector, L: LineSearch> fmt::Debug for Vmlmb<V, L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Vmlmb")
            .field("config", &self.config)
            .field("task", &self.task)
            .field("status", &self.status)
            .field("iterations", &self.iterations)
            .field("evaluations", &self.evaluations)
            .field("restarts", &self.restarts)
            .field("line_search", &self.line_search)
            .field("projector", &self.projector)
            .field("custom_threshold", &self.threshold.is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bounds::SimpleBounds;
    use approx::assert_relative_eq;
    use shapedopt_linalg::{EuclideanSpace, EuclideanVector, ScaledPreconditioner};

    /// f(x) = sum_i w_i x_i^2 / 2
    fn weighted_quadratic(w: &[f64]) -> impl Fn(&EuclideanVector, &mut EuclideanVector) -> f64 + '_ {
        move |x: &EuclideanVector, g: &mut EuclideanVector| {
            let mut f = 0.0;
            for (i, &wi) in w.iter().enumerate() {
                let xi = x.get(i);
                g.set(i, wi * xi);
                f += 0.5 * wi * xi * xi;
            }
            f
        }
    }

    #[test]
    fn test_config_defaults_and_validation() {
        let config = VmlmbConfig::default();
        assert_eq!(config.memory, 5);
        assert_eq!(config.scaling, ScalingRule::OrenSpedicato);
        assert_eq!(config.max_projection_backtracks, 60);
        assert!(config.validate().is_ok());
        assert_relative_eq!(config.gradient_threshold(10.0), 1e-5);
        assert_relative_eq!(
            config.clone().with_gradient_tolerances(1e-3, 1e-6).gradient_threshold(10.0),
            1e-3
        );

        let bad = [
            config.clone().with_memory(0),
            config.clone().with_epsilon(1.0),
            config.clone().with_delta(-1.0),
            config.clone().with_gradient_tolerances(-1.0, 0.0),
            config.clone().with_step_bounds(0.0, 0.5),
            config.clone().with_max_evaluations(0),
            config.clone().with_scaling(ScalingRule::Constant(0.0)),
        ];
        for c in bad {
            assert!(matches!(
                c.validate(),
                Err(OptimizerError::InvalidConfiguration { .. })
            ));
        }
        let space = EuclideanSpace::new(2);
        assert!(Vmlmb::new(&space, VmlmbConfig::new().with_memory(0)).is_err());
    }

    #[test]
    fn test_initial_step() {
        let space = EuclideanSpace::new(2);
        let x = space.vector(&[3.0, 4.0]).unwrap();
        let d = space.vector(&[6.0, 8.0]).unwrap();
        assert_relative_eq!(initial_step(0.05, &x, &d), 0.025);
        assert_relative_eq!(initial_step(0.0, &x, &d), 0.1);
        assert_relative_eq!(initial_step(0.05, &space.create(), &d), 0.1);
    }

    #[test]
    fn test_first_iterations_by_hand() {
        let space = EuclideanSpace::new(2);
        let fg = weighted_quadratic(&[2.0, 2.0]);
        let mut opt = Vmlmb::new(&space, VmlmbConfig::default()).unwrap();
        let mut x = space.vector(&[3.0, 4.0]).unwrap();
        let mut g = space.create();

        assert_eq!(opt.task(), OptimTask::ComputeFg);
        assert_eq!(opt.start(), OptimTask::ComputeFg);
        let f = fg(&x, &mut g);
        assert_eq!(opt.iterate(&mut x, f, &mut g).unwrap(), OptimTask::NewX);
        assert_relative_eq!(opt.initial_gradient_norm(), 10.0);

        // Steepest descent with the relative first step.
        assert_eq!(opt.iterate(&mut x, f, &mut g).unwrap(), OptimTask::ComputeFg);
        assert_relative_eq!(opt.step(), 0.025);
        assert_relative_eq!(x.get(0), 2.85, epsilon = 1e-12);
        assert_relative_eq!(x.get(1), 3.8, epsilon = 1e-12);

        let f = fg(&x, &mut g);
        assert_eq!(opt.iterate(&mut x, f, &mut g).unwrap(), OptimTask::NewX);
        assert_eq!(opt.iterations(), 1);

        // The quasi-Newton step is exact for this quadratic.
        assert_eq!(opt.iterate(&mut x, f, &mut g).unwrap(), OptimTask::ComputeFg);
        assert_eq!(opt.lbfgs().pairs(), 1);
        assert_relative_eq!(opt.lbfgs().scale(), 0.5, epsilon = 1e-12);
        assert_relative_eq!(x.get(0), 0.0, epsilon = 1e-12);
        assert_relative_eq!(x.get(1), 0.0, epsilon = 1e-12);

        let f = fg(&x, &mut g);
        assert_eq!(opt.iterate(&mut x, f, &mut g).unwrap(), OptimTask::FinalX);
        assert_eq!(opt.iterations(), 2);
        assert_eq!(opt.evaluations(), 3);

        // Emitted once; the run must be restarted to go on.
        assert_eq!(
            opt.iterate(&mut x, f, &mut g),
            Err(OptimizerError::NotRunning {
                task: OptimTask::FinalX
            })
        );
        assert_eq!(opt.task(), OptimTask::FinalX);
        assert_eq!(opt.evaluations(), 3);
        assert_eq!(opt.restart(), OptimTask::ComputeFg);
        assert_eq!(opt.restarts(), 1);
        assert_eq!(opt.lbfgs().pairs(), 0);
    }

    #[test]
    fn test_restart_on_insufficient_descent() {
        let space = EuclideanSpace::new(2);
        let fg = weighted_quadratic(&[1.0, 10.0]);
        let config = VmlmbConfig::new().with_epsilon(0.999);
        let mut opt = Vmlmb::new(&space, config).unwrap();
        let mut x = space.vector(&[1.0, 1.0]).unwrap();
        let mut g = space.create();

        opt.start();
        let f = fg(&x, &mut g);
        assert_eq!(opt.iterate(&mut x, f, &mut g).unwrap(), OptimTask::NewX);
        assert_eq!(opt.iterate(&mut x, f, &mut g).unwrap(), OptimTask::ComputeFg);
        let f = fg(&x, &mut g);
        assert_eq!(opt.iterate(&mut x, f, &mut g).unwrap(), OptimTask::NewX);
        assert_eq!(opt.restarts(), 0);

        // The L-BFGS direction deviates from the gradient by more than the
        // tolerated angle; the memory is dropped.
        assert_eq!(opt.iterate(&mut x, f, &mut g).unwrap(), OptimTask::ComputeFg);
        assert_eq!(opt.restarts(), 1);
        assert_eq!(opt.lbfgs().pairs(), 0);
    }

    #[test]
    fn test_bad_preconditioner() {
        let space = EuclideanSpace::new(2);
        let fg = weighted_quadratic(&[1.0, 1.0]);
        let mut opt = Vmlmb::new(&space, VmlmbConfig::default())
            .unwrap()
            .with_preconditioner(ScaledPreconditioner::new(-1.0));
        let mut x = space.vector(&[1.0, 1.0]).unwrap();
        let mut g = space.create();
        let f = fg(&x, &mut g);
        assert_eq!(opt.iterate(&mut x, f, &mut g).unwrap(), OptimTask::NewX);
        assert_eq!(opt.iterate(&mut x, f, &mut g).unwrap(), OptimTask::Error);
        assert_eq!(opt.status(), OptimStatus::BadPreconditioner);
        assert_eq!(x.as_slice(), &[1.0, 1.0]);
        assert!(matches!(
            opt.iterate(&mut x, f, &mut g),
            Err(OptimizerError::NotRunning {
                task: OptimTask::Error
            })
        ));
    }

    #[test]
    fn test_no_feasible_move_is_final() {
        let space = EuclideanSpace::new(2);
        // Minimum outside the box, the start point is the constrained one.
        let fg = |x: &EuclideanVector, g: &mut EuclideanVector| {
            g.set(0, 2.0 * (x.get(0) + 1.0));
            g.set(1, 2.0 * (x.get(1) - 2.0));
            (x.get(0) + 1.0).powi(2) + (x.get(1) - 2.0).powi(2)
        };
        let mut opt = Vmlmb::new(&space, VmlmbConfig::default())
            .unwrap()
            .with_bounds(SimpleBounds::new(0.0, 1.0).unwrap());
        let mut x = space.vector(&[0.0, 1.0]).unwrap();
        let report = opt.minimize(&mut x, fg).unwrap();
        assert_eq!(report.task, OptimTask::FinalX);
        assert!(report.converged);
        assert_eq!(report.gradient_norm, 0.0);
        assert_eq!(x.as_slice(), &[0.0, 1.0]);
    }

    #[test]
    fn test_custom_gradient_threshold() {
        let space = EuclideanSpace::new(2);
        let mut opt = Vmlmb::new(&space, VmlmbConfig::default())
            .unwrap()
            .with_gradient_threshold(|ginit| 0.99 * ginit);
        let mut x = space.vector(&[3.0, 4.0]).unwrap();
        let report = opt.minimize(&mut x, weighted_quadratic(&[2.0, 2.0])).unwrap();
        assert!(report.converged);
        assert_eq!(report.iterations, 1);
        assert!(format!("{opt:?}").contains("custom_threshold: true"));
    }
}
