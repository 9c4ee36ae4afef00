use num::Float;

/// Similar to numpy.interp for a single sample: linear interpolation between
/// `coords`, holding the end values constant outside of them.
///
/// `coords` must be non-empty and sorted by strictly increasing x.
pub(crate) fn interp<F: Float>(x: F, coords: &[(F, F)]) -> F {
    let (Some(&(x_first, y_first)), Some(&(x_last, y_last))) = (coords.first(), coords.last()) else {
        return F::zero();
    };

    // Base cases
    if x <= x_first {
        return y_first;
    }
    if x >= x_last {
        return y_last;
    }

    for window in coords.windows(2) {
        let (x1, y1) = window[0];
        let (x2, y2) = window[1];

        // Actual interpolation
        if x1 <= x && x <= x2 {
            return y1 + (x - x1) * (y2 - y1) / (x2 - x1);
        }
    }

    // Only reachable for NaN input
    F::zero()
}

/// Linear ramp from 0 at `from` to 1 at `to`. Works for falling ramps too (`from > to`).
pub(crate) fn ramp<F: Float>(x: F, from: F, to: F) -> F {
    clamp_unit((x - from) / (to - from))
}

/// Clamps a membership degree into `[0, 1]`. NaN maps to 0.
pub(crate) fn clamp_unit<F: Float>(degree: F) -> F {
    if degree.is_nan() {
        return F::zero();
    }

    degree.max(F::zero()).min(F::one())
}

#[test]
fn test_interp() {
    let xs = [(1., 3.), (2., 2.), (3., 0.)];
    let got: Vec<f64> = [0., 1., 1.5, 2.72, 3.24].iter().map(|x| interp(*x, &xs)).collect();

    assert_eq!(got[0], 3.);
    assert_eq!(got[1], 3.);
    assert_eq!(got[2], 2.5);
    approx::assert_relative_eq!(got[3], 0.56, epsilon = 1e-12);
    assert_eq!(got[4], 0.);

    let xs = [(0., 0.), (1., 2.), (2., 5.), (3., 3.), (4.5, 2.)];

    assert_eq!(interp(2.5, &xs), 4.);
    assert_eq!(interp(-1., &xs), 0.);
    assert_eq!(interp(7.5, &xs), 2.);
}

#[test]
fn test_ramp_and_clamp() {
    assert_eq!(ramp(0.5, 0., 1.), 0.5);
    assert_eq!(ramp(0.25, 1., 0.), 0.75);
    assert_eq!(ramp(-3., 0., 1.), 0.);
    assert_eq!(ramp(3., 0., 1.), 1.);
    assert_eq!(clamp_unit(f64::NAN), 0.);
    assert_eq!(clamp_unit(1.5f32), 1.);
}
