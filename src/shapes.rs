//! Membership function shapes.
//!
//! Every shape is a pure function from a crisp scalar to a membership degree
//! in `[0, 1]`. Shape parameters are validated once, when the shape is built;
//! evaluation never re-checks them.

use std::fmt;

use crate::error::{Error, Result};
use crate::math::{clamp_unit, interp, ramp};

/// A membership function over a single crisp variable.
pub trait Shape: fmt::Debug + fmt::Display + Send + Sync {
    /// Membership degree of `x`, always within `[0, 1]`.
    fn degree(&self, x: f64) -> f64;
}

/// A shape that can map a firing strength back to a representative crisp value.
///
/// Only shapes implementing this can be used as rule consequents.
pub trait InverseShape: Shape {
    /// `None` stands for an unspecified strength, read as full truth by
    /// strength dependent shapes.
    fn x_value(&self, strength: Option<f64>) -> f64;
}

fn ensure_finite(shape: &'static str, params: &[f64]) -> Result<()> {
    match params.iter().find(|p| !p.is_finite()) {
        Some(p) => Err(Error::shape(shape, format!("parameter {p} is not finite"))),
        None => Ok(()),
    }
}

fn ensure_ordered(shape: &'static str, names: &str, params: &[f64]) -> Result<()> {
    if params.windows(2).all(|w| w[0] <= w[1]) {
        Ok(())
    } else {
        Err(Error::shape(shape, format!("expected {names}, got {params:?}")))
    }
}

/// Crisp singleton: full membership at exactly one value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Constant {
    value: f64,
}

impl Constant {
    pub fn new(value: f64) -> Result<Self> {
        ensure_finite("constant", &[value])?;

        Ok(Constant { value })
    }

    pub fn value(&self) -> f64 {
        self.value
    }
}

impl Shape for Constant {
    fn degree(&self, x: f64) -> f64 {
        if x == self.value {
            1.
        } else {
            0.
        }
    }
}

impl InverseShape for Constant {
    fn x_value(&self, _strength: Option<f64>) -> f64 {
        self.value
    }
}

impl fmt::Display for Constant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Constant({})", self.value)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Triangular {
    a: f64,
    b: f64,
    c: f64,
}

impl Triangular {
    /// Requires `a <= b <= c`.
    pub fn new(a: f64, b: f64, c: f64) -> Result<Self> {
        ensure_finite("triangular", &[a, b, c])?;
        ensure_ordered("triangular", "a <= b <= c", &[a, b, c])?;

        Ok(Triangular { a, b, c })
    }

    pub fn corners(&self) -> (f64, f64, f64) {
        (self.a, self.b, self.c)
    }
}

impl Shape for Triangular {
    fn degree(&self, x: f64) -> f64 {
        let Triangular { a, b, c } = *self;

        if x < a || x > c {
            0.
        } else if x == b {
            1.
        } else if x < b {
            ramp(x, a, b)
        } else {
            ramp(x, c, b)
        }
    }
}

impl fmt::Display for Triangular {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Triangular({}, {}, {})", self.a, self.b, self.c)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Trapezoidal {
    a: f64,
    b: f64,
    c: f64,
    d: f64,
}

impl Trapezoidal {
    /// Requires `a <= b <= c <= d`.
    pub fn new(a: f64, b: f64, c: f64, d: f64) -> Result<Self> {
        ensure_finite("trapezoidal", &[a, b, c, d])?;
        ensure_ordered("trapezoidal", "a <= b <= c <= d", &[a, b, c, d])?;

        Ok(Trapezoidal { a, b, c, d })
    }

    pub fn corners(&self) -> (f64, f64, f64, f64) {
        (self.a, self.b, self.c, self.d)
    }

    /// Geometric intersection: the trapezoid spanned by the innermost corners.
    ///
    /// This is an interval approximation for analysis and plotting, not the
    /// pointwise minimum used when rules fire. Fails when the two plateaus do
    /// not overlap.
    pub fn overlap(&self, other: &Self) -> Result<Self> {
        let overlap = Trapezoidal {
            a: self.a.max(other.a),
            b: self.b.max(other.b),
            c: self.c.min(other.c),
            d: self.d.min(other.d),
        };

        if overlap.b > overlap.c {
            return Err(Error::NoOverlap {
                lhs: self.to_string(),
                rhs: other.to_string(),
            });
        }

        Ok(overlap)
    }

    /// Geometric union: the trapezoid spanned by the outermost corners.
    pub fn hull(&self, other: &Self) -> Self {
        Trapezoidal {
            a: self.a.min(other.a),
            b: self.b.min(other.b),
            c: self.c.max(other.c),
            d: self.d.max(other.d),
        }
    }

    /// Flank based size measure: both flank widths plus twice the narrower
    /// one. Not the area under the curve, see [`Trapezoidal::geometric_area`].
    pub fn area(&self) -> f64 {
        let (rise, fall) = (self.b - self.a, self.d - self.c);

        rise + fall + 2. * rise.min(fall)
    }

    /// Area under the membership function.
    pub fn geometric_area(&self) -> f64 {
        ((self.d - self.a) + (self.c - self.b)) / 2.
    }

    /// Center of the plateau.
    pub fn midpoint(&self) -> f64 {
        (self.b + self.c) / 2.
    }
}

impl Shape for Trapezoidal {
    fn degree(&self, x: f64) -> f64 {
        let Trapezoidal { a, b, c, d } = *self;

        if x < a || x > d {
            0.
        } else if b <= x && x <= c {
            1.
        } else if x < b {
            ramp(x, a, b)
        } else {
            ramp(x, d, c)
        }
    }
}

impl fmt::Display for Trapezoidal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Trapezoidal({}, {}, {}, {})", self.a, self.b, self.c, self.d)
    }
}

/// Open ended linear shoulder. Falls from 1 at `a` to 0 at `b` (Z shape), or
/// rises from 0 at `a` to 1 at `b` when inverted (S shape).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ZShape {
    a: f64,
    b: f64,
    inverted: bool,
}

impl ZShape {
    /// Requires `a < b`.
    pub fn new(a: f64, b: f64, inverted: bool) -> Result<Self> {
        ensure_finite("z-shape", &[a, b])?;
        if a >= b {
            return Err(Error::shape("z-shape", format!("expected a < b, got a = {a}, b = {b}")));
        }

        Ok(ZShape { a, b, inverted })
    }

    pub fn bounds(&self) -> (f64, f64) {
        (self.a, self.b)
    }

    pub fn is_inverted(&self) -> bool {
        self.inverted
    }
}

impl Shape for ZShape {
    fn degree(&self, x: f64) -> f64 {
        let rising = ramp(x, self.a, self.b);

        if self.inverted {
            rising
        } else {
            1. - rising
        }
    }
}

impl InverseShape for ZShape {
    fn x_value(&self, strength: Option<f64>) -> f64 {
        let s = clamp_unit(strength.unwrap_or(1.));
        let width = self.b - self.a;

        if self.inverted {
            self.a + s * width
        } else {
            self.b - s * width
        }
    }
}

impl fmt::Display for ZShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = if self.inverted { "SShape" } else { "ZShape" };

        write!(f, "{kind}({}, {})", self.a, self.b)
    }
}

/// Membership given as `(x, degree)` points, linearly interpolated.
#[derive(Clone, Debug, PartialEq)]
pub struct Piecewise {
    points: Vec<(f64, f64)>,
}

impl Piecewise {
    /// Points must be non-empty, sorted by strictly increasing x, with
    /// degrees inside `[0, 1]`.
    pub fn new(points: Vec<(f64, f64)>) -> Result<Self> {
        if points.is_empty() {
            return Err(Error::shape("piecewise", "at least one point is required"));
        }
        for &(x, y) in &points {
            ensure_finite("piecewise", &[x, y])?;
            if !(0. ..=1.).contains(&y) {
                return Err(Error::shape("piecewise", format!("degree {y} at x = {x} is outside [0, 1]")));
            }
        }
        if points.windows(2).any(|w| w[0].0 >= w[1].0) {
            return Err(Error::shape("piecewise", "x coordinates must be strictly increasing"));
        }

        Ok(Piecewise { points })
    }

    pub fn points(&self) -> &[(f64, f64)] {
        &self.points
    }
}

impl Shape for Piecewise {
    fn degree(&self, x: f64) -> f64 {
        clamp_unit(interp(x, &self.points))
    }
}

impl fmt::Display for Piecewise {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Piecewise({} points)", self.points.len())
    }
}

#[test]
fn test_triangular_corners() {
    let tri = Triangular::new(0., 1., 2.).unwrap();

    assert_eq!(tri.degree(0.), 0.);
    assert_eq!(tri.degree(1.), 1.);
    assert_eq!(tri.degree(2.), 0.);
    assert_eq!(tri.degree(0.5), 0.5);
    assert_eq!(tri.degree(1.5), 0.5);
    assert_eq!(tri.degree(-7.), 0.);
    assert_eq!(tri.degree(7.), 0.);
}

#[test]
fn test_degenerate_triangles() {
    let right = Triangular::new(0., 0., 2.).unwrap();
    let left = Triangular::new(0., 2., 2.).unwrap();

    assert_eq!(right.degree(0.), 1.);
    assert_eq!(right.degree(1.), 0.5);
    assert_eq!(left.degree(2.), 1.);
    assert_eq!(left.degree(1.), 0.5);

    let point = Triangular::new(3., 3., 3.).unwrap();

    assert_eq!(point.degree(3.), 1.);
    assert_eq!(point.degree(3.1), 0.);
}

#[test]
fn test_malformed_shapes() {
    assert!(matches!(
        Triangular::new(1., 0., 2.),
        Err(Error::InvalidShape { shape: "triangular", .. })
    ));
    assert!(Trapezoidal::new(0., 2., 1., 3.).is_err());
    assert!(ZShape::new(1., 1., false).is_err());
    assert!(ZShape::new(2., 1., true).is_err());
    assert!(Constant::new(f64::NAN).is_err());
    assert!(Triangular::new(0., 1., f64::INFINITY).is_err());
    assert!(Piecewise::new(vec![]).is_err());
    assert!(Piecewise::new(vec![(1., 0.), (1., 1.)]).is_err());
    assert!(Piecewise::new(vec![(0., 0.), (1., 1.5)]).is_err());
}

#[test]
fn test_trapezoidal() {
    let trap = Trapezoidal::new(0., 1., 3., 4.).unwrap();

    assert_eq!(trap.degree(0.), 0.);
    assert_eq!(trap.degree(0.5), 0.5);
    assert_eq!(trap.degree(1.), 1.);
    assert_eq!(trap.degree(2.), 1.);
    assert_eq!(trap.degree(3.), 1.);
    assert_eq!(trap.degree(3.75), 0.25);
    assert_eq!(trap.degree(4.), 0.);
}

#[test]
fn test_trapezoid_geometry() {
    let lhs = Trapezoidal::new(0., 1., 3., 4.).unwrap();
    let rhs = Trapezoidal::new(2., 2.5, 5., 6.).unwrap();

    assert_eq!(lhs.overlap(&rhs).unwrap().corners(), (2., 2.5, 3., 4.));
    assert_eq!(lhs.hull(&rhs).corners(), (0., 1., 5., 6.));
    assert_eq!(lhs.midpoint(), 2.);

    let far = Trapezoidal::new(10., 11., 12., 13.).unwrap();
    let touching = Trapezoidal::new(3., 3., 5., 6.).unwrap();

    assert!(matches!(lhs.overlap(&far), Err(Error::NoOverlap { .. })));
    assert_eq!(lhs.overlap(&touching).unwrap().corners(), (3., 3., 3., 4.));
}

#[test]
fn test_trapezoid_area() {
    let symmetric = Trapezoidal::new(0., 1., 3., 4.).unwrap();
    let lopsided = Trapezoidal::new(2., 2.5, 5., 6.).unwrap();
    let rectangle = Trapezoidal::new(1., 1., 2., 2.).unwrap();

    // 1 + 1 + 2 * min(1, 1)
    assert_eq!(symmetric.area(), 4.);
    // 0.5 + 1 + 2 * min(0.5, 1)
    assert_eq!(lopsided.area(), 2.5);
    assert_eq!(rectangle.area(), 0.);

    assert_eq!(symmetric.geometric_area(), 3.);
    assert_eq!(lopsided.geometric_area(), 3.25);
    assert_eq!(rectangle.geometric_area(), 1.);
}

#[test]
fn test_z_and_s_shapes() {
    use approx::assert_relative_eq;

    let z = ZShape::new(-0.5, 0.5, false).unwrap();
    let s = ZShape::new(-0.5, 0.5, true).unwrap();

    assert_eq!(z.degree(-0.5), 1.);
    assert_eq!(z.degree(0.5), 0.);
    assert_eq!(z.degree(0.), 0.5);
    assert_eq!(s.degree(-0.6), 0.);
    assert_eq!(s.degree(0.6), 1.);
    assert_relative_eq!(s.degree(0.25), 0.75);
}

#[test]
fn test_inverse_mappings() {
    let constant = Constant::new(-2.5).unwrap();

    assert_eq!(constant.x_value(None), -2.5);
    assert_eq!(constant.x_value(Some(0.3)), -2.5);

    let z = ZShape::new(0., 10., false).unwrap();
    let s = ZShape::new(0., 10., true).unwrap();

    assert_eq!(z.x_value(None), 0.);
    assert_eq!(z.x_value(Some(0.25)), 7.5);
    assert_eq!(s.x_value(None), 10.);
    assert_eq!(s.x_value(Some(0.25)), 2.5);
    assert_eq!(s.x_value(Some(4.)), 10.);
}

#[test]
fn test_piecewise() {
    use approx::assert_relative_eq;

    let high = Piecewise::new(vec![(175., 0.), (180., 0.2), (185., 0.7), (190., 1.)]).unwrap();

    assert_eq!(high.degree(150.), 0.);
    assert_relative_eq!(high.degree(182.5), 0.45);
    assert_eq!(high.degree(200.), 1.);
}

#[test]
fn test_display_names() {
    assert_eq!(Triangular::new(0., 1., 2.).unwrap().to_string(), "Triangular(0, 1, 2)");
    assert_eq!(ZShape::new(-1., 1., true).unwrap().to_string(), "SShape(-1, 1)");
    assert_eq!(Constant::new(2.5).unwrap().to_string(), "Constant(2.5)");
}
