//! Bound constrained quasi-Newton optimization over vector spaces.
//!
//! This crate provides the optimization layer of the `shapedopt` workspace.
//! Algorithms work on any [`shapedopt_linalg::Vector`] and communicate with
//! the caller through task codes, so the objective function can live
//! anywhere: a closure, a simulation loop or a remote process.
//!
//! # Components
//!
//! - **VMLMB**: limited-memory variable metric method with bound constraints
//! - **L-BFGS operator**: compact inverse Hessian approximation
//! - **Line searches**: Armijo backtracking and Moré-Thuente
//! - **Bound projectors**: scalar and per-variable box constraints
//!
//! # Examples
//!
//! ```rust
//! use shapedopt_linalg::{EuclideanSpace, EuclideanVector, Vector};
//! use shapedopt_optim::{SimpleBounds, Vmlmb, VmlmbConfig};
//!
//! let space = EuclideanSpace::new(2);
//! let mut optimizer = Vmlmb::new(&space, VmlmbConfig::default())
//!     .unwrap()
//!     .with_bounds(SimpleBounds::at_least(1.0).unwrap());
//!
//! // f(x) = |x|^2, minimized over x >= 1
//! let mut x = space.vector(&[3.0, 4.0]).unwrap();
//! let report = optimizer
//!     .minimize(&mut x, |x: &EuclideanVector, g: &mut EuclideanVector| {
//!         g.copy_from(x).unwrap();
//!         g.scale(2.0);
//!         x.dot(x).unwrap()
//!     })
//!     .unwrap();
//!
//! assert!(report.converged);
//! assert_eq!(x.as_slice(), &[1.0, 1.0]);
//! ```

pub mod bounds;
pub mod error;
pub mod lbfgs;
pub mod line_search;
pub mod task;
pub mod vmlmb;

pub use bounds::{BoundProjector, BoxBounds, SimpleBounds, StepBounds};
pub use error::{OptimizerError, OptimizerResult};
pub use lbfgs::{LbfgsOperator, ScalingRule};
pub use line_search::{
    BacktrackingConfig, BacktrackingLineSearch, LineSearch, MoreThuenteConfig,
    MoreThuenteLineSearch,
};
pub use task::{LineSearchTask, OptimStatus, OptimTask};
pub use vmlmb::{Vmlmb, VmlmbConfig, VmlmbReport};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::bounds::{BoundProjector, BoxBounds, SimpleBounds, StepBounds};
    pub use crate::error::{OptimizerError, OptimizerResult};
    pub use crate::lbfgs::{LbfgsOperator, ScalingRule};
    pub use crate::line_search::{
        BacktrackingConfig, BacktrackingLineSearch, LineSearch, MoreThuenteConfig,
        MoreThuenteLineSearch,
    };
    pub use crate::task::{LineSearchTask, OptimStatus, OptimTask};
    pub use crate::vmlmb::{Vmlmb, VmlmbConfig, VmlmbReport};
}
