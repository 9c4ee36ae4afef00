//! Named fuzzy sets and their lazy logical composition.

use std::fmt;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::math::clamp_unit;
use crate::ops::LogicOp;
use crate::shapes::{Constant, InverseShape, Piecewise, Shape, Trapezoidal, Triangular, ZShape};

/// Anything that yields a membership degree, either for a bare scalar or for
/// a full input vector.
pub trait Membership: fmt::Debug + Send + Sync {
    /// Diagnostic name, carries no semantics.
    fn name(&self) -> &str;

    /// Membership degree of a bare scalar.
    fn membership(&self, x: f64) -> f64;

    /// Membership degree of an input vector, reading the channel(s) this set
    /// was built for.
    fn membership_at(&self, input: &[f64]) -> Result<f64>;
}

/// A membership function which can also serve as a rule consequent.
pub trait Consequent: Membership {
    /// Crisp value represented by the set at the given firing strength.
    fn x_value(&self, strength: Option<f64>) -> f64;
}

pub type SharedSet = Arc<dyn Membership>;
pub type SharedConsequent = Arc<dyn Consequent>;

/// A membership shape bound to an input channel and a name.
#[derive(Clone, Debug)]
pub struct FuzzySet<S> {
    name: String,
    channel: usize,
    shape: S,
}

impl<S: Shape> FuzzySet<S> {
    /// Reads channel 0 and is named after its shape until told otherwise.
    pub fn new(shape: S) -> Self {
        FuzzySet {
            name: shape.to_string(),
            channel: 0,
            shape,
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn on_channel(mut self, channel: usize) -> Self {
        self.channel = channel;
        self
    }

    pub fn channel(&self) -> usize {
        self.channel
    }

    pub fn shape(&self) -> &S {
        &self.shape
    }
}

impl FuzzySet<Constant> {
    pub fn constant(value: f64) -> Result<Self> {
        Ok(Self::new(Constant::new(value)?))
    }
}

impl FuzzySet<Triangular> {
    pub fn triangular(a: f64, b: f64, c: f64) -> Result<Self> {
        Ok(Self::new(Triangular::new(a, b, c)?))
    }
}

impl FuzzySet<Trapezoidal> {
    pub fn trapezoidal(a: f64, b: f64, c: f64, d: f64) -> Result<Self> {
        Ok(Self::new(Trapezoidal::new(a, b, c, d)?))
    }
}

impl FuzzySet<ZShape> {
    pub fn z_shape(a: f64, b: f64) -> Result<Self> {
        Ok(Self::new(ZShape::new(a, b, false)?))
    }

    pub fn s_shape(a: f64, b: f64) -> Result<Self> {
        Ok(Self::new(ZShape::new(a, b, true)?))
    }
}

impl FuzzySet<Piecewise> {
    pub fn piecewise(points: Vec<(f64, f64)>) -> Result<Self> {
        Ok(Self::new(Piecewise::new(points)?))
    }
}

impl<S: Shape> Membership for FuzzySet<S> {
    fn name(&self) -> &str {
        &self.name
    }

    fn membership(&self, x: f64) -> f64 {
        if x.is_nan() {
            return 0.;
        }

        clamp_unit(self.shape.degree(x))
    }

    fn membership_at(&self, input: &[f64]) -> Result<f64> {
        let x = input.get(self.channel).ok_or(Error::ChannelOutOfRange {
            channel: self.channel,
            len: input.len(),
        })?;

        Ok(self.membership(*x))
    }
}

impl<S: InverseShape> Consequent for FuzzySet<S> {
    fn x_value(&self, strength: Option<f64>) -> f64 {
        self.shape.x_value(strength)
    }
}

/// Lazy pointwise combination of two shared membership functions.
#[derive(Clone, Debug)]
pub struct Composite {
    name: String,
    op: LogicOp,
    lhs: SharedSet,
    rhs: SharedSet,
}

/// Fuzzy intersection: the minimum of both operands' degrees.
pub fn and_of(lhs: SharedSet, rhs: SharedSet) -> Composite {
    Composite::new(LogicOp::And, lhs, rhs)
}

/// Fuzzy union: the maximum of both operands' degrees.
pub fn or_of(lhs: SharedSet, rhs: SharedSet) -> Composite {
    Composite::new(LogicOp::Or, lhs, rhs)
}

impl Composite {
    pub fn new(op: LogicOp, lhs: SharedSet, rhs: SharedSet) -> Self {
        Composite {
            name: format!("({} {} {})", lhs.name(), op.symbol(), rhs.name()),
            op,
            lhs,
            rhs,
        }
    }

    pub fn op(&self) -> LogicOp {
        self.op
    }

    pub fn operands(&self) -> (&SharedSet, &SharedSet) {
        (&self.lhs, &self.rhs)
    }
}

impl Membership for Composite {
    fn name(&self) -> &str {
        &self.name
    }

    fn membership(&self, x: f64) -> f64 {
        self.op.call(self.lhs.membership(x), self.rhs.membership(x))
    }

    fn membership_at(&self, input: &[f64]) -> Result<f64> {
        Ok(self.op.call(self.lhs.membership_at(input)?, self.rhs.membership_at(input)?))
    }
}

#[test]
fn test_vector_reads_own_channel() {
    let set = FuzzySet::z_shape(-0.5, 0.5).unwrap().on_channel(1);

    assert_eq!(set.membership_at(&[10., -0.6, 10.]).unwrap(), 1.);
    assert_eq!(set.membership_at(&[-10., 0.6]).unwrap(), 0.);
    assert_eq!(set.membership(-0.6), 1.);
}

#[test]
fn test_short_vector() {
    let set = FuzzySet::s_shape(0., 1.).unwrap().on_channel(3);
    let err = set.membership_at(&[0., 0., 0.]).unwrap_err();

    assert!(matches!(err, Error::ChannelOutOfRange { channel: 3, len: 3 }));
}

#[test]
fn test_names() {
    let neg: SharedSet = Arc::new(FuzzySet::z_shape(-1., 1.).unwrap().named("neg"));
    let tri: SharedSet = Arc::new(FuzzySet::triangular(0., 1., 2.).unwrap());
    let both = and_of(neg.clone(), tri.clone());
    let either = or_of(Arc::new(both), neg);

    assert_eq!(tri.name(), "Triangular(0, 1, 2)");
    assert_eq!(either.name(), "((neg and Triangular(0, 1, 2)) or neg)");
}

#[test]
fn test_composite_operators() {
    let low: SharedSet = Arc::new(FuzzySet::triangular(0., 1., 2.).unwrap());
    let high: SharedSet = Arc::new(FuzzySet::triangular(1., 2., 3.).unwrap());
    let both = and_of(low.clone(), high.clone());
    let either = or_of(low, high);

    assert_eq!(both.membership(1.5), 0.5);
    assert_eq!(both.membership(1.), 0.);
    assert_eq!(either.membership(1.), 1.);
    assert_eq!(either.membership(2.5), 0.5);
    assert_eq!(both.op(), LogicOp::And);
}

#[test]
fn test_composite_over_channels() {
    let angle: SharedSet = Arc::new(FuzzySet::z_shape(-0.01, 0.01).unwrap());
    let rate: SharedSet = Arc::new(FuzzySet::z_shape(-0.5, 0.5).unwrap().on_channel(1));
    let both = and_of(angle, rate);

    assert_eq!(both.membership_at(&[-0.02, -0.6, 0., 0.]).unwrap(), 1.);
    assert_eq!(both.membership_at(&[-0.02, 0.6, 0., 0.]).unwrap(), 0.);
    assert!(both.membership_at(&[-0.02]).is_err());
}

#[test]
fn test_nan_is_not_a_member() {
    let set = FuzzySet::z_shape(0., 1.).unwrap();

    assert_eq!(set.membership(f64::NAN), 0.);
}
