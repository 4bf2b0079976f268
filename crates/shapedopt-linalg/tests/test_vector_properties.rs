//! Property tests for vector space operations.
//!
//! Shaped vectors and nalgebra-backed Euclidean vectors must agree on every
//! operation, and basic inner product identities must hold.

use approx::assert_relative_eq;
use proptest::prelude::*;
use shapedopt_core::ShapedArray;
use shapedopt_linalg::prelude::*;

fn coefficients() -> impl Strategy<Value = (Vec<f64>, Vec<f64>)> {
    (1usize..16).prop_flat_map(|n| {
        (
            prop::collection::vec(-10.0f64..10.0, n),
            prop::collection::vec(-10.0f64..10.0, n),
        )
    })
}

proptest! {
    #[test]
    fn shaped_and_euclidean_agree((a, b) in coefficients(), alpha in -3.0f64..3.0, beta in -3.0f64..3.0) {
        let n = a.len();
        let shaped = ShapedVectorSpace::<f64>::from_dims(&[n]).unwrap();
        let dense = EuclideanSpace::new(n);

        let (sx, sy) = (shaped.wrap(a.clone()).unwrap(), shaped.wrap(b.clone()).unwrap());
        let (dx, dy) = (dense.vector(&a).unwrap(), dense.vector(&b).unwrap());

        assert_relative_eq!(sx.dot(&sy).unwrap(), dx.dot(&dy).unwrap(), epsilon = 1e-9);
        assert_relative_eq!(sx.norm2(), dx.norm2(), epsilon = 1e-9);
        assert_relative_eq!(sx.norm1(), dx.norm1(), epsilon = 1e-9);
        assert_relative_eq!(sx.norm_inf(), dx.norm_inf(), epsilon = 1e-12);
        assert_relative_eq!(
            sx.weighted_dot(&sy, &sy).unwrap(),
            dx.weighted_dot(&dy, &dy).unwrap(),
            epsilon = 1e-8
        );

        let mut sz = shaped.create();
        let mut dz = dense.create();
        sz.combine(alpha, &sx, beta, &sy).unwrap();
        dz.combine(alpha, &dx, beta, &dy).unwrap();
        for i in 0..n {
            assert_relative_eq!(sz.get(i), dz.get(i), epsilon = 1e-12);
        }

        sz.add(-alpha, &sx).unwrap();
        dz.add(-alpha, &dx).unwrap();
        sz.multiply(&sx).unwrap();
        dz.multiply(&dx).unwrap();
        for i in 0..n {
            assert_relative_eq!(sz.get(i), dz.get(i), epsilon = 1e-9);
        }
    }

    #[test]
    fn cauchy_schwarz((a, b) in coefficients()) {
        let space = ShapedVectorSpace::<f32>::from_dims(&[a.len()]).unwrap();
        let x = space.wrap(a.iter().map(|&v| v as f32).collect()).unwrap();
        let y = space.wrap(b.iter().map(|&v| v as f32).collect()).unwrap();
        let bound = x.norm2() * y.norm2();
        prop_assert!(x.dot(&y).unwrap().abs() <= bound * (1.0 + 1e-12) + 1e-12);
    }
}

#[test]
fn vectors_of_distinct_spaces_never_mix() {
    let first = ShapedVectorSpace::<f64>::from_dims(&[3]).unwrap();
    let second = ShapedVectorSpace::<f64>::from_dims(&[3]).unwrap();
    let x = first.create_filled(1.0);
    let mut y = second.create();

    assert!(matches!(y.copy_from(&x), Err(LinalgError::IncorrectSpace { .. })));
    assert!(matches!(second.clone_vector(&x), Err(LinalgError::IncorrectSpace { .. })));
    assert!(first.clone_vector(&x).is_ok());
}

#[test]
fn shaped_vector_as_array_of_rank_two() {
    let space = ShapedVectorSpace::<f64>::from_dims(&[2, 3]).unwrap();
    let mut v = space.wrap(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
    assert_eq!(v.get_at(&[1, 2]), 6.0);
    v.set_at(&[0, 1], -3.0);
    let column = v.as_shaped_array().slice(1).unwrap();
    assert_eq!(column.flatten(), vec![-3.0, 4.0]);
}
