//! Task and status codes of reverse-communication algorithms.
//!
//! Optimizers and line searches do not call the objective function
//! themselves. Each call returns a task telling the caller what to do next,
//! and a status explaining the last transition:
//!
//! ```text
//! ComputeFg -> (evaluate f and g at x) -> iterate -> NewX | ComputeFg | ...
//! ```
//!
//! `FinalX`, `Warning` and `Error` are terminal for the driver.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::fmt;

/// What the caller of an optimizer must do next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum OptimTask {
    /// Compute the function value and gradient at the current variables.
    ComputeFg,
    /// A new iterate is available for inspection.
    NewX,
    /// The current variables satisfy the convergence criteria.
    FinalX,
    /// The algorithm stopped early; the status tells why.
    Warning,
    /// The algorithm failed; the status tells why.
    Error,
}

impl OptimTask {
    /// Whether further calls to `iterate` leave the state unchanged.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::FinalX | Self::Warning | Self::Error)
    }
}

impl fmt::Display for OptimTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::ComputeFg => "COMPUTE_FG",
            Self::NewX => "NEW_X",
            Self::FinalX => "FINAL_X",
            Self::Warning => "WARNING",
            Self::Error => "ERROR",
        };
        f.write_str(name)
    }
}

/// What the caller of a line search must do next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum LineSearchTask {
    /// Evaluate the function and its directional derivative at the new step.
    Search,
    /// The step satisfies the acceptance conditions.
    Convergence,
    /// The search stopped without meeting its conditions; the step may
    /// still be usable.
    Warning,
    /// Invalid arguments or an unrecoverable failure.
    Error,
}

/// Detailed status of an optimizer or a line search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum OptimStatus {
    /// Nothing to report.
    Success,
    /// A line search was iterated before being started.
    NotStarted,
    /// Initial step is not strictly positive.
    StpLeZero,
    /// Initial step is below the lower step bound.
    StpLtStpmin,
    /// Initial step is above the upper step bound.
    StpGtStpmax,
    /// Lower step bound is negative.
    StpminLtZero,
    /// Upper step bound is below the lower step bound.
    StpmaxLtStpmin,
    /// Directional derivative at the start of a line search is not negative.
    NotADescent,
    /// The search interval is too small to make progress.
    XtolTestSatisfied,
    /// The step reached its upper bound.
    StpEqualsStpmax,
    /// The step reached its lower bound.
    StpEqualsStpmin,
    /// Rounding errors prevent further progress of the line search.
    RoundingErrorsPreventProgress,
    /// No sufficient descent direction, even with an empty memory.
    BadPreconditioner,
    /// The projected first step never became a descent step.
    ProjectionFailed,
    /// Iteration budget exhausted.
    TooManyIterations,
    /// Evaluation budget exhausted.
    TooManyEvaluations,
}

impl OptimStatus {
    /// Human readable explanation.
    pub fn reason(self) -> &'static str {
        match self {
            Self::Success => "Success",
            Self::NotStarted => "Line search not started",
            Self::StpLeZero => "Initial step <= 0",
            Self::StpLtStpmin => "Initial step < STPMIN",
            Self::StpGtStpmax => "Initial step > STPMAX",
            Self::StpminLtZero => "STPMIN < 0",
            Self::StpmaxLtStpmin => "STPMAX < STPMIN",
            Self::NotADescent => "Initial derivative >= 0 (not a descent direction)",
            Self::XtolTestSatisfied => "XTOL test satisfied",
            Self::StpEqualsStpmax => "Step at upper bound",
            Self::StpEqualsStpmin => "Step at lower bound",
            Self::RoundingErrorsPreventProgress => "Rounding errors prevent progress",
            Self::BadPreconditioner => {
                "Preconditioner is not positive definite (no descent direction)"
            }
            Self::ProjectionFailed => "Projected step is not a descent step",
            Self::TooManyIterations => "Too many iterations",
            Self::TooManyEvaluations => "Too many evaluations",
        }
    }
}

impl fmt::Display for OptimStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.reason())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_tasks() {
        assert!(!OptimTask::ComputeFg.is_terminal());
        assert!(!OptimTask::NewX.is_terminal());
        assert!(OptimTask::FinalX.is_terminal());
        assert!(OptimTask::Warning.is_terminal());
        assert!(OptimTask::Error.is_terminal());
    }

    #[test]
    fn test_display() {
        assert_eq!(OptimTask::ComputeFg.to_string(), "COMPUTE_FG");
        assert_eq!(
            OptimStatus::RoundingErrorsPreventProgress.to_string(),
            "Rounding errors prevent progress"
        );
    }
}
