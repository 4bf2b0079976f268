//! Integration tests for shapedopt-optim
//!
//! These tests drive VMLMB through its public interface on Euclidean and
//! shaped vector spaces, with and without bound constraints.

use approx::assert_relative_eq;
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use shapedopt_linalg::prelude::*;
use shapedopt_optim::prelude::*;

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// f(x) = sum_i w_i (x_i - c_i)^2 / 2 on any vector space.
fn separable<'a, V: Vector + 'a>(w: &'a [f64], c: &'a [f64]) -> impl FnMut(&V, &mut V) -> f64 + 'a {
    move |x: &V, g: &mut V| {
        let mut f = 0.0;
        for i in 0..w.len() {
            let r = x.get_double(i) - c[i];
            g.set_double(i, w[i] * r);
            f += 0.5 * w[i] * r * r;
        }
        f
    }
}

/// Check that the report describes the variables handed back.
fn assert_report_matches<F>(report: &VmlmbReport, x: &EuclideanVector, mut fg: F)
where
    F: FnMut(&EuclideanVector, &mut EuclideanVector) -> f64,
{
    let mut g = x.create();
    let f = fg(x, &mut g);
    assert_relative_eq!(report.value, f, epsilon = 1e-12);
    assert_relative_eq!(report.gradient_norm, g.norm2(), epsilon = 1e-12);
}

fn rosenbrock(x: &EuclideanVector, g: &mut EuclideanVector) -> f64 {
    let (x1, x2) = (x.get(0), x.get(1));
    let t = x2 - x1 * x1;
    g.set(0, -400.0 * x1 * t - 2.0 * (1.0 - x1));
    g.set(1, 200.0 * t);
    100.0 * t * t + (1.0 - x1) * (1.0 - x1)
}

#[test]
fn test_unconstrained_quadratic() {
    init_logger();
    let space = EuclideanSpace::new(2);
    let mut opt = Vmlmb::new(&space, VmlmbConfig::default()).unwrap();
    let mut x = space.vector(&[3.0, 4.0]).unwrap();

    let report = opt
        .minimize(&mut x, separable::<EuclideanVector>(&[2.0, 2.0], &[0.0, 0.0]))
        .unwrap();

    assert_eq!(report.task, OptimTask::FinalX);
    assert_eq!(report.status, OptimStatus::Success);
    assert!(report.converged);
    assert_eq!(report.iterations, 2);
    assert_eq!(report.evaluations, 3);
    assert_eq!(report.restarts, 0);
    assert_relative_eq!(x.get(0), 0.0, epsilon = 1e-10);
    assert_relative_eq!(x.get(1), 0.0, epsilon = 1e-10);
    assert_eq!(report.reason(), "Success");
}

#[test]
fn test_lower_bound_is_reached_exactly() {
    init_logger();
    let space = EuclideanSpace::new(2);
    let mut opt = Vmlmb::new(&space, VmlmbConfig::default())
        .unwrap()
        .with_bounds(SimpleBounds::at_least(1.0).unwrap());
    let mut x = space.vector(&[3.0, 4.0]).unwrap();

    let report = opt
        .minimize(&mut x, separable::<EuclideanVector>(&[2.0, 2.0], &[0.0, 0.0]))
        .unwrap();

    assert!(report.converged);
    assert_eq!(report.gradient_norm, 0.0);
    assert_eq!(x.as_slice(), &[1.0, 1.0]);
    assert_relative_eq!(report.value, 2.0);
}

#[test]
fn test_single_precision_shaped_variables() {
    init_logger();
    let space = ShapedVectorSpace::<f32>::from_dims(&[2]).unwrap();
    let mut opt = Vmlmb::new(&space, VmlmbConfig::default())
        .unwrap()
        .with_bounds(SimpleBounds::at_least(1.0).unwrap());
    let mut x = space.wrap(vec![3.0, 4.0]).unwrap();

    let report = opt
        .minimize(&mut x, separable::<ShapedVector<f32>>(&[2.0, 2.0], &[0.0, 0.0]))
        .unwrap();

    assert!(report.converged);
    assert_eq!(x.to_vec(), vec![1.0f32, 1.0]);
}

#[test]
fn test_box_bounds_on_matrix_variables() {
    init_logger();
    let space = ShapedVectorSpace::<f64>::from_dims(&[2, 2]).unwrap();
    let bounds = BoxBounds::new(Some(space.create_filled(0.0)), Some(space.create_filled(1.0))).unwrap();
    let mut opt = Vmlmb::new(&space, VmlmbConfig::default())
        .unwrap()
        .with_bounds(bounds);
    let mut x = space.create_filled(0.5);

    let c = [2.0, -1.0, 0.5, 3.0];
    let report = opt.minimize(&mut x, separable::<ShapedVector<f64>>(&[2.0; 4], &c)).unwrap();

    assert!(report.converged, "stopped with {}", report.reason());
    let solution = x.to_vec();
    for (xi, expected) in solution.iter().zip([1.0, 0.0, 0.5, 1.0]) {
        assert_relative_eq!(*xi, expected, epsilon = 1e-10);
    }
}

#[test]
fn test_rosenbrock_with_backtracking() {
    init_logger();
    let space = EuclideanSpace::new(2);
    let config = VmlmbConfig::new()
        .with_gradient_tolerances(0.0, 1e-8)
        .with_max_iterations(500);
    let mut opt = Vmlmb::new(&space, config).unwrap();
    let mut x = space.vector(&[-1.2, 1.0]).unwrap();

    let report = opt.minimize(&mut x, rosenbrock).unwrap();

    assert!(report.converged, "stopped with {}", report.reason());
    assert!(report.evaluations >= report.iterations);
    assert_relative_eq!(x.get(0), 1.0, epsilon = 1e-4);
    assert_relative_eq!(x.get(1), 1.0, epsilon = 1e-4);
}

#[test]
fn test_more_thuente_line_search() {
    init_logger();
    let space = EuclideanSpace::new(5);
    let mut opt = Vmlmb::with_line_search(
        &space,
        VmlmbConfig::default(),
        MoreThuenteLineSearch::default(),
    )
    .unwrap();
    assert_eq!(opt.line_search().name(), "Moré-Thuente");
    let mut x = space.create_filled(1.0);

    let w = [1.0, 2.0, 3.0, 4.0, 5.0];
    let report = opt.minimize(&mut x, separable::<EuclideanVector>(&w, &[0.0; 5])).unwrap();

    assert!(report.converged, "stopped with {}", report.reason());
    assert!(x.norm_inf() < 1e-4);
}

#[test]
fn test_exact_preconditioner() {
    init_logger();
    let space = EuclideanSpace::new(3);
    let w = [1.0, 10.0, 100.0];
    let h0 = DiagonalPreconditioner::new(space.vector(&[1.0, 0.1, 0.01]).unwrap());
    let mut opt = Vmlmb::new(&space, VmlmbConfig::default())
        .unwrap()
        .with_preconditioner(h0);
    let mut x = space.create_filled(1.0);

    let report = opt.minimize(&mut x, separable::<EuclideanVector>(&w, &[0.0; 3])).unwrap();

    assert!(report.converged);
    assert!(report.iterations <= 3);
    assert!(x.norm_inf() < 1e-8);
}

#[test]
fn test_iteration_limit() {
    init_logger();
    let space = EuclideanSpace::new(2);
    let mut opt = Vmlmb::new(&space, VmlmbConfig::new().with_max_iterations(1)).unwrap();
    let mut x = space.vector(&[3.0, 4.0]).unwrap();

    let report = opt
        .minimize(&mut x, separable::<EuclideanVector>(&[2.0, 2.0], &[0.0, 0.0]))
        .unwrap();

    assert_eq!(report.task, OptimTask::Warning);
    assert_eq!(report.status, OptimStatus::TooManyIterations);
    assert!(!report.converged);
    assert_eq!(report.iterations, 1);
    assert_eq!(report.evaluations, 2);
    assert_relative_eq!(x.get(0), 2.85, epsilon = 1e-12);
    assert_relative_eq!(x.get(1), 3.8, epsilon = 1e-12);
    assert_report_matches(&report, &x, separable::<EuclideanVector>(&[2.0, 2.0], &[0.0, 0.0]));
}

#[test]
fn test_evaluation_limit() {
    init_logger();
    let space = EuclideanSpace::new(2);
    let mut opt = Vmlmb::new(&space, VmlmbConfig::new().with_max_evaluations(2)).unwrap();
    let mut x = space.vector(&[3.0, 4.0]).unwrap();

    let report = opt
        .minimize(&mut x, separable::<EuclideanVector>(&[2.0, 2.0], &[0.0, 0.0]))
        .unwrap();

    assert_eq!(report.task, OptimTask::Warning);
    assert_eq!(report.status, OptimStatus::TooManyEvaluations);
    assert_eq!(report.evaluations, 2);
    assert_eq!(report.iterations, 1);

    // The next trial point (the minimum) was never evaluated: the last
    // accepted point is returned instead.
    assert_relative_eq!(x.get(0), 2.85, epsilon = 1e-12);
    assert_relative_eq!(x.get(1), 3.8, epsilon = 1e-12);
    assert_relative_eq!(report.value, 22.5625, epsilon = 1e-12);
    assert_relative_eq!(report.gradient_norm, 9.5, epsilon = 1e-12);
    assert_relative_eq!(opt.value(), report.value);
    assert_report_matches(&report, &x, separable::<EuclideanVector>(&[2.0, 2.0], &[0.0, 0.0]));
}

#[test]
fn test_budget_stops_return_evaluated_point() {
    init_logger();
    let space = EuclideanSpace::new(2);
    for max in 1..=20 {
        let config = VmlmbConfig::new().with_max_evaluations(max);
        let mut opt = Vmlmb::new(&space, config).unwrap();
        let mut x = space.vector(&[-1.2, 1.0]).unwrap();

        let report = opt.minimize(&mut x, rosenbrock).unwrap();

        assert!(report.evaluations <= max);
        assert_report_matches(&report, &x, rosenbrock);
    }
    for max in 1..=10 {
        let config = VmlmbConfig::new().with_max_iterations(max);
        let mut opt = Vmlmb::new(&space, config).unwrap();
        let mut x = space.vector(&[-1.2, 1.0]).unwrap();

        let report = opt.minimize(&mut x, rosenbrock).unwrap();

        assert!(report.iterations <= max);
        assert_report_matches(&report, &x, rosenbrock);
    }
}

#[test]
fn test_task_sequence() {
    init_logger();
    let space = EuclideanSpace::new(2);
    let mut opt = Vmlmb::new(&space, VmlmbConfig::new().with_max_iterations(200)).unwrap();
    let mut x = space.vector(&[-1.2, 1.0]).unwrap();
    let mut g = space.create();

    let mut tasks = vec![opt.start()];
    let mut f = 0.0;
    while !tasks[tasks.len() - 1].is_terminal() {
        if tasks[tasks.len() - 1] == OptimTask::ComputeFg {
            f = rosenbrock(&x, &mut g);
        }
        tasks.push(opt.iterate(&mut x, f, &mut g).unwrap());
    }

    assert_eq!(tasks[0], OptimTask::ComputeFg);
    for pair in tasks.windows(2) {
        if pair[1] == OptimTask::NewX {
            assert_eq!(pair[0], OptimTask::ComputeFg);
        }
    }
    let evaluations = tasks[..tasks.len() - 1]
        .iter()
        .filter(|&&task| task == OptimTask::ComputeFg)
        .count();
    assert_eq!(evaluations, opt.evaluations());

    // A final task is emitted once.
    let last = opt.task();
    assert_eq!(tasks.iter().filter(|&&task| task == last).count(), 1);
    let before = x.clone();
    assert!(matches!(
        opt.iterate(&mut x, f, &mut g),
        Err(OptimizerError::NotRunning { task }) if task == last
    ));
    assert_eq!(opt.task(), last);
    assert_eq!(x, before);
    assert_eq!(opt.evaluations(), evaluations);
}

#[test]
fn test_restart_resumes_from_current_point() {
    init_logger();
    let space = EuclideanSpace::new(2);
    let mut opt = Vmlmb::new(&space, VmlmbConfig::default()).unwrap();
    let mut x = space.vector(&[3.0, 4.0]).unwrap();
    let mut g = space.create();
    let mut fg = separable::<EuclideanVector>(&[2.0, 2.0], &[0.0, 0.0]);

    let report = opt.minimize(&mut x, &mut fg).unwrap();
    assert!(report.converged);

    assert_eq!(opt.restart(), OptimTask::ComputeFg);
    let f = fg(&x, &mut g);
    assert_eq!(opt.iterate(&mut x, f, &mut g).unwrap(), OptimTask::FinalX);
    assert_eq!(opt.restarts(), 1);
    assert_eq!(opt.evaluations(), report.evaluations + 1);
    assert_relative_eq!(opt.initial_gradient_norm(), 10.0);
}

#[test]
fn test_foreign_vectors_are_errors() {
    let space = EuclideanSpace::new(2);
    let other = EuclideanSpace::new(3);
    let mut opt = Vmlmb::new(&space, VmlmbConfig::default()).unwrap();
    let mut x = other.create_filled(1.0);
    let mut g = other.create_filled(1.0);
    opt.start();
    assert!(matches!(
        opt.iterate(&mut x, 1.0, &mut g),
        Err(OptimizerError::Linalg(_))
    ));
}

fn bounded_problem() -> impl Strategy<Value = (Vec<f64>, Vec<f64>, Vec<f64>, Vec<f64>)> {
    (1usize..8).prop_flat_map(|n| {
        (
            prop::collection::vec(0.5f64..5.0, n),
            prop::collection::vec(-5.0f64..5.0, n),
            prop::collection::vec(-3.0f64..0.0, n),
            prop::collection::vec(0.0f64..3.0, n),
        )
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn bounded_quadratic_solution_is_clamped_center((w, c, lower, upper) in bounded_problem()) {
        let n = w.len();
        let space = EuclideanSpace::new(n);
        let bounds = BoxBounds::new(
            Some(space.vector(&lower).unwrap()),
            Some(space.vector(&upper).unwrap()),
        )
        .unwrap();
        let config = VmlmbConfig::new().with_max_iterations(200);
        let mut opt = Vmlmb::new(&space, config).unwrap().with_bounds(bounds);
        let mut x = space.create();

        let report = opt.minimize(&mut x, separable::<EuclideanVector>(&w, &c)).unwrap();

        prop_assert!(report.converged, "stopped with {}", report.reason());
        for i in 0..n {
            let expected = c[i].clamp(lower[i], upper[i]);
            prop_assert!((x.get(i) - expected).abs() < 1e-3);
            prop_assert!(x.get(i) >= lower[i] && x.get(i) <= upper[i]);
        }
    }
}
