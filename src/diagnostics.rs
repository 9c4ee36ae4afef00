//! Sampling membership functions for plotting.

use std::ops::RangeInclusive;

use crate::linspace::Linspace;
use crate::set::Membership;

/// Grid size used when the caller has no preference.
pub const DEFAULT_POINTS: usize = 100;

/// `(x, membership(x))` samples of one set.
#[derive(Clone, Debug, PartialEq)]
pub struct Samples {
    pub name: String,
    pub points: Vec<(f64, f64)>,
}

/// Evenly spaced grid over `range`, end point included, with the points of
/// interest merged in and the result sorted.
pub fn grid(range: RangeInclusive<f64>, n_points: usize, points_of_interest: &[f64]) -> Vec<f64> {
    let mut xs: Vec<f64> = Linspace::new(*range.start(), *range.end(), n_points)
        .chain(points_of_interest.iter().copied())
        .collect();

    xs.sort_unstable_by(f64::total_cmp);

    xs
}

/// Samples every set over the same grid.
///
/// Points of interest make narrow features such as singletons show up even
/// when they fall between grid points.
pub fn sample(
    sets: &[&dyn Membership],
    range: RangeInclusive<f64>,
    n_points: usize,
    points_of_interest: &[f64],
) -> Vec<Samples> {
    let xs = grid(range, n_points, points_of_interest);

    sets.iter()
        .map(|set| Samples {
            name: set.name().to_owned(),
            points: xs.iter().map(|&x| (x, set.membership(x))).collect(),
        })
        .collect()
}

#[test]
fn test_grid() {
    assert_eq!(grid(-1. ..=1., 3, &[]), vec![-1., 0., 1.]);
    assert_eq!(grid(-1. ..=1., 3, &[0.5, -2.]), vec![-2., -1., 0., 0.5, 1.]);
    assert_eq!(grid(0. ..=1., DEFAULT_POINTS, &[]).len(), 100);
}

#[test]
fn test_singletons_need_points_of_interest() {
    use crate::set::FuzzySet;

    let left = FuzzySet::constant(-1.25).unwrap().named("force_med_left");
    let right = FuzzySet::constant(1.25).unwrap().named("force_med_right");
    let sets: [&dyn Membership; 2] = [&left, &right];

    let coarse = sample(&sets, -4. ..=4., 5, &[]);

    assert!(coarse.iter().all(|s| s.points.iter().all(|&(_, y)| y == 0.)));

    let fine = sample(&sets, -4. ..=4., 5, &[-1.25, 1.25]);

    assert_eq!(fine[0].name, "force_med_left");
    assert_eq!(fine[0].points.len(), 7);
    assert!(fine[0].points.contains(&(-1.25, 1.)));
    assert!(fine[1].points.contains(&(1.25, 1.)));
    assert!(fine[1].points.contains(&(-1.25, 0.)));
}
