//! Property tests for array views.
//!
//! Views never copy: every element of a view must read back the parent
//! element it maps to, and writes through a view must land in the parent.

use proptest::prelude::*;
use shapedopt_core::prelude::*;

fn iota(dims: &[usize]) -> Array<i64> {
    let n: usize = dims.iter().product();
    Array::from_vec((0..n as i64).collect(), dims).unwrap()
}

/// Dimensions of rank 1 to 4 with small extents.
fn small_dims() -> impl Strategy<Value = Vec<usize>> {
    prop::collection::vec(1usize..5, 1..5)
}

/// Range over a dimension of length `n`, possibly reversed and strided.
fn range_for(n: usize) -> impl Strategy<Value = (usize, usize, isize)> {
    (0..n, 0..n, 1isize..3, any::<bool>()).prop_map(|(a, b, step, backward)| {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        if backward {
            (hi, lo, -step)
        } else {
            (lo, hi, step)
        }
    })
}

proptest! {
    #[test]
    fn slice_matches_parent(dims in small_dims(), seed in any::<usize>()) {
        let a = iota(&dims);
        let k = seed % dims.len();
        let i = (seed / 7) % dims[k];
        let s = a.slice_along(i as isize, k as isize).unwrap();
        prop_assert_eq!(s.rank(), dims.len() - 1);

        let mut parent = vec![0usize; dims.len()];
        s.shape().for_each_index(Order::ColumnMajor, |index| {
            let mut p = 0;
            for (d, slot) in parent.iter_mut().enumerate() {
                *slot = if d == k { i } else { p += 1; index[p - 1] };
            }
            assert_eq!(s.get(index).unwrap(), a.get(&parent).unwrap());
        });
    }

    #[test]
    fn ranged_view_matches_parent(
        (dims, ranges) in small_dims().prop_flat_map(|dims| {
            let ranges: Vec<_> = dims.iter().map(|&n| range_for(n)).collect();
            (Just(dims), ranges)
        })
    ) {
        let a = iota(&dims);
        let specs: Vec<Option<Range>> = ranges
            .iter()
            .map(|&(first, last, step)| {
                Some(Range::with_step(first as isize, last as isize, step).unwrap())
            })
            .collect();
        let v = a.view(&specs).unwrap();

        v.shape().for_each_index(Order::ColumnMajor, |index| {
            let parent: Vec<usize> = index
                .iter()
                .zip(&ranges)
                .map(|(&j, &(first, _, step))| (first as isize + j as isize * step) as usize)
                .collect();
            assert_eq!(v.get(index).unwrap(), a.get(&parent).unwrap());
        });

        // A view of a view is still a single flat, strided or selected layout.
        let vv = v.view(&vec![Some(Range::reversed()); v.rank()]).unwrap();
        prop_assert_eq!(vv.number(), v.number());
        prop_assert_eq!(vv.sum(), v.sum());
    }

    #[test]
    fn selection_writes_reach_parent(dims in small_dims(), value in -50i64..50) {
        let a = iota(&dims);
        let lists: Vec<Vec<isize>> = dims.iter().map(|&n| vec![-1, 0, (n / 2) as isize]).collect();
        let specs: Vec<Option<&[isize]>> = lists.iter().map(|l| Some(l.as_slice())).collect();
        let mut s = a.select(&specs).unwrap();
        s.fill(value);

        let mut corner: Vec<usize> = dims.iter().map(|&n| n - 1).collect();
        prop_assert_eq!(a.get(&corner).unwrap(), value);
        corner.iter_mut().for_each(|c| *c = 0);
        prop_assert_eq!(a.get(&corner).unwrap(), value);
    }

    #[test]
    fn copy_is_independent(dims in small_dims()) {
        let a = iota(&dims);
        let c = a.copy();
        prop_assert_eq!(c.flatten(), a.flatten());
        let mut c2 = c.clone();
        c2.fill(-1);
        prop_assert_eq!(a.sum(), ((a.number() as i64 - 1) * a.number() as i64) / 2);
        prop_assert!(c.flatten().iter().all(|&x| x == -1));
    }

    #[test]
    fn conversion_round_trips_small_integers(values in prop::collection::vec(0u8..=255, 1..20)) {
        let n = values.len();
        let a = Array::from_vec(values.clone(), &[n]).unwrap();
        let back = a.to_double().to_int().to_byte();
        prop_assert_eq!(back.flatten(), values);
    }
}

#[test]
fn row_major_and_column_major_agree_elementwise() {
    let cm = iota(&[3, 4, 2]);
    let shape = Shape::with_order(&[3, 4, 2], Order::RowMajor).unwrap();
    let mut rm = Array::from_shape(shape, 0i64);
    rm.assign(&cm).unwrap();
    cm.shape().for_each_index(Order::RowMajor, |index| {
        assert_eq!(rm.get(index).unwrap(), cm.get(index).unwrap());
    });
    let a = rm.as_1d();
    assert!(a.buffer().ptr_eq(rm.buffer()));
    assert_eq!(a.get(&[1]).unwrap(), cm.get(&[0, 0, 1]).unwrap());
}
