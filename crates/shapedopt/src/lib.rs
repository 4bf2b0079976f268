//! # ShapedOpt
//!
//! Shaped N-dimensional arrays and bound-constrained quasi-Newton
//! optimization in Rust.
//!
//! This crate re-exports the components of the workspace:
//!
//! - [`arrays`]: typed shaped arrays with zero-copy views (`shapedopt-core`)
//! - [`linalg`]: vector spaces over shaped arrays (`shapedopt-linalg`)
//! - [`optim`]: VMLMB, L-BFGS, line searches and bounds (`shapedopt-optim`)
//!
//! # Example
//!
//! Nonnegative denoising of a small image: the closest nonnegative array
//! to the data is the data with its negative pixels set to zero.
//!
//! ```
//! use shapedopt::prelude::*;
//!
//! let data = Array::from_vec(vec![1.0, -2.0, 3.0, -4.0, 5.0, -6.0], &[2, 3]).unwrap();
//! let space = ShapedVectorSpace::<f64>::new(data.shape().clone());
//! let target = space.vector_from(&data).unwrap();
//!
//! let mut optimizer = Vmlmb::new(&space, VmlmbConfig::default())
//!     .unwrap()
//!     .with_bounds(SimpleBounds::at_least(0.0).unwrap());
//! let mut x = space.create();
//! let report = optimizer
//!     .minimize(&mut x, |x, g| {
//!         g.combine(1.0, x, -1.0, &target).unwrap();
//!         0.5 * g.norm2().powi(2)
//!     })
//!     .unwrap();
//! assert!(report.converged);
//!
//! let mut image = Array::<f64>::zeros(&[2, 3]).unwrap();
//! x.copy_into(&mut image).unwrap();
//! assert!((image.get(&[0, 2]).unwrap() - 5.0).abs() < 1e-8);
//! assert_eq!(image.get(&[1, 1]).unwrap(), 0.0);
//! ```

pub use shapedopt_core as arrays;
pub use shapedopt_linalg as linalg;
pub use shapedopt_optim as optim;

// Re-export key dependencies
pub use nalgebra;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use shapedopt_core::{
        AnyArray, Array, ArrayError, Buffer, Element, ElementType, Layout, Order, Range, Real,
        Shape, ShapedArray,
    };
    pub use shapedopt_linalg::{
        AnyVectorSpace, DiagonalPreconditioner, EuclideanSpace, EuclideanVector,
        IdentityPreconditioner, LinalgError, Preconditioner, ScaledPreconditioner, ShapedVector,
        ShapedVectorSpace, Vector, VectorSpace,
    };
    pub use shapedopt_optim::{
        BacktrackingConfig, BacktrackingLineSearch, BoundProjector, BoxBounds, LbfgsOperator,
        LineSearch, LineSearchTask, MoreThuenteConfig, MoreThuenteLineSearch, OptimStatus,
        OptimTask, OptimizerError, OptimizerResult, ScalingRule, SimpleBounds, StepBounds, Vmlmb,
        VmlmbConfig, VmlmbReport,
    };
}
