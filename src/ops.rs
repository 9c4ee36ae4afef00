use num::Float;

/// Operator combining the membership degrees of the two operands of a
/// composite fuzzy set.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogicOp {
    /// Intersection, the minimum t-norm
    And,
    /// Union, the maximum t-conorm
    Or,
}

impl LogicOp {
    pub fn call<F: Float>(self, u: F, v: F) -> F {
        match self {
            Self::And => F::min(u, v),
            Self::Or => F::max(u, v),
        }
    }

    pub(crate) fn symbol(self) -> &'static str {
        match self {
            Self::And => "and",
            Self::Or => "or",
        }
    }
}

/// How the (strength, value) pairs of all rules are merged into one crisp output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Defuzzification {
    /// Strength weighted average of every consequent's default crisp value.
    #[default]
    WeightedAverage,
    /// Strength weighted average of every consequent's inverse mapping taken
    /// at that rule's own firing strength.
    Tsukamoto,
}

#[test]
fn test_logic_ops() {
    assert_eq!(LogicOp::And.call(0.2, 0.7), 0.2);
    assert_eq!(LogicOp::Or.call(0.2, 0.7), 0.7);
    assert_eq!(LogicOp::And.call(1.0f32, 0.), 0.);
    assert_eq!(LogicOp::Or.call(0.0f32, 0.), 0.);
}
