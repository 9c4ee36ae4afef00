use std::sync::Arc;

use approx::assert_abs_diff_eq;
use fuzzy_control::{and_of, or_of, Engine, FuzzySet, Membership, Rules, SharedSet};
use proptest::prelude::*;

/// Ordered corner points spread over a bounded range.
fn corners(n: usize) -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(-100.0..100.0f64, n).prop_map(|mut v| {
        v.sort_by(f64::total_cmp);
        v
    })
}

fn interval() -> impl Strategy<Value = (f64, f64)> {
    (-100.0..100.0f64, 0.001..50.0f64).prop_map(|(a, width)| (a, a + width))
}

/// Between one and eight points with distinct, increasing x.
fn points() -> impl Strategy<Value = Vec<(f64, f64)>> {
    prop::collection::vec((-100.0..100.0f64, 0.0..=1.0f64), 1..8).prop_map(|mut points| {
        points.sort_by(|l, r| l.0.total_cmp(&r.0));
        points.dedup_by(|next, prev| next.0 == prev.0);
        points
    })
}

fn any_set() -> impl Strategy<Value = SharedSet> {
    prop_oneof![
        corners(3).prop_map(|c| Arc::new(FuzzySet::triangular(c[0], c[1], c[2]).unwrap()) as SharedSet),
        corners(4).prop_map(|c| Arc::new(FuzzySet::trapezoidal(c[0], c[1], c[2], c[3]).unwrap()) as SharedSet),
        interval().prop_map(|(a, b)| Arc::new(FuzzySet::z_shape(a, b).unwrap()) as SharedSet),
        interval().prop_map(|(a, b)| Arc::new(FuzzySet::s_shape(a, b).unwrap()) as SharedSet),
        (-100.0..100.0f64).prop_map(|v| Arc::new(FuzzySet::constant(v).unwrap()) as SharedSet),
        points().prop_map(|p| Arc::new(FuzzySet::piecewise(p).unwrap()) as SharedSet),
    ]
}

proptest! {
    #[test]
    fn membership_stays_in_unit_interval(set in any_set(), x in -200.0..200.0f64) {
        let degree = set.membership(x);

        prop_assert!((0. ..=1.).contains(&degree), "{} gave {degree} at {x}", set.name());
    }

    #[test]
    fn triangle_corners_are_exact(c in corners(3)) {
        prop_assume!(c[0] < c[1] && c[1] < c[2]);

        let tri = FuzzySet::triangular(c[0], c[1], c[2]).unwrap();

        prop_assert_eq!(tri.membership(c[0]), 0.);
        prop_assert_eq!(tri.membership(c[1]), 1.);
        prop_assert_eq!(tri.membership(c[2]), 0.);
    }

    #[test]
    fn trapezoid_plateau_is_full(c in corners(4), t in 0.0..=1.0f64) {
        let trap = FuzzySet::trapezoidal(c[0], c[1], c[2], c[3]).unwrap();
        let x = c[1] + t * (c[2] - c[1]);

        prop_assert_eq!(trap.membership(x.clamp(c[1], c[2])), 1.);
    }

    #[test]
    fn piecewise_passes_through_its_points(knots in points(), x in -200.0..200.0f64) {
        let set = FuzzySet::piecewise(knots.clone()).unwrap();
        let (first, last) = (knots[0], knots[knots.len() - 1]);

        for &(px, py) in &knots {
            prop_assert_eq!(set.membership(px), py);
        }
        if x <= first.0 {
            prop_assert_eq!(set.membership(x), first.1);
        }
        if x >= last.0 {
            prop_assert_eq!(set.membership(x), last.1);
        }
    }

    #[test]
    fn z_and_s_are_complements((a, b) in interval(), x in -200.0..200.0f64) {
        let z = FuzzySet::z_shape(a, b).unwrap();
        let s = FuzzySet::s_shape(a, b).unwrap();

        assert_abs_diff_eq!(z.membership(x) + s.membership(x), 1., epsilon = 1e-12);
    }

    #[test]
    fn composites_are_min_and_max(lhs in any_set(), rhs in any_set(), x in -200.0..200.0f64) {
        let both = and_of(lhs.clone(), rhs.clone());
        let both_swapped = and_of(rhs.clone(), lhs.clone());
        let either = or_of(lhs.clone(), rhs.clone());
        let either_swapped = or_of(rhs.clone(), lhs.clone());
        let (l, r) = (lhs.membership(x), rhs.membership(x));

        prop_assert_eq!(both.membership(x), l.min(r));
        prop_assert_eq!(either.membership(x), l.max(r));
        prop_assert_eq!(both.membership(x), both_swapped.membership(x));
        prop_assert_eq!(either.membership(x), either_swapped.membership(x));
    }

    #[test]
    fn lone_firing_rule_gives_its_value(x in 0.0001..1.0f64, value in -10.0..10.0f64) {
        let mut rules = Rules::new();

        rules.add(Arc::new(FuzzySet::s_shape(0., 1.).unwrap()), Arc::new(FuzzySet::constant(value).unwrap()));
        rules.add(Arc::new(FuzzySet::z_shape(-3., -2.).unwrap()), Arc::new(FuzzySet::constant(99.).unwrap()));

        let engine = Engine::new(rules).unwrap();

        assert_abs_diff_eq!(engine.output(&[x]).unwrap(), value, epsilon = 1e-9);
    }

    #[test]
    fn equal_strengths_average(x in 0.0001..1.0f64, v1 in -10.0..10.0f64, v2 in -10.0..10.0f64) {
        let mut rules = Rules::new();

        rules.add(Arc::new(FuzzySet::s_shape(0., 1.).unwrap()), Arc::new(FuzzySet::constant(v1).unwrap()));
        rules.add(Arc::new(FuzzySet::s_shape(0., 1.).unwrap()), Arc::new(FuzzySet::constant(v2).unwrap()));

        let engine = Engine::new(rules).unwrap();

        assert_abs_diff_eq!(engine.output(&[x]).unwrap(), (v1 + v2) / 2., epsilon = 1e-9);
    }

    #[test]
    fn output_is_idempotent(input in prop::collection::vec(-2.0..2.0f64, 4)) {
        let engine = fuzzy_control::EngineConfig::cart_pole().build().unwrap();
        let first = engine.output(&input).unwrap();

        for _ in 0..5 {
            prop_assert_eq!(engine.output(&input).unwrap().to_bits(), first.to_bits());
        }
    }
}
