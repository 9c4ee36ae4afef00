use std::fmt;

use crate::error::Result;
use crate::set::{SharedConsequent, SharedSet};

/// `if antecedent then consequent`.
///
/// Rules hold no mutable state; evaluating one is a pure function of the input.
#[derive(Clone)]
pub struct Rule {
    antecedent: SharedSet,
    consequent: SharedConsequent,
}

impl Rule {
    pub fn new(antecedent: SharedSet, consequent: SharedConsequent) -> Self {
        Rule { antecedent, consequent }
    }

    pub fn antecedent(&self) -> &SharedSet {
        &self.antecedent
    }

    pub fn consequent(&self) -> &SharedConsequent {
        &self.consequent
    }

    /// Firing strength of the rule for an input vector.
    pub fn evaluate(&self, input: &[f64]) -> Result<f64> {
        self.antecedent.membership_at(input)
    }

    /// Crisp value proposed by the rule. Without an input the consequent is
    /// asked for its default value, otherwise for its value at the firing
    /// strength for that input.
    pub fn get_output(&self, input: Option<&[f64]>) -> Result<f64> {
        let strength = input.map(|input| self.evaluate(input)).transpose()?;

        Ok(self.consequent.x_value(strength))
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "if {} then {}", self.antecedent.name(), self.consequent.name())
    }
}

/// Ordered rule collection.
#[derive(Clone, Debug, Default)]
pub struct Rules(pub(crate) Vec<Rule>);

impl Rules {
    pub fn new() -> Self {
        Rules(Vec::new())
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Rules(Vec::with_capacity(capacity))
    }

    pub fn add(&mut self, antecedent: SharedSet, consequent: SharedConsequent) {
        self.0.push(Rule::new(antecedent, consequent));
    }

    pub fn push(&mut self, rule: Rule) {
        self.0.push(rule);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Rule> {
        self.0.iter()
    }
}

impl FromIterator<Rule> for Rules {
    fn from_iter<T: IntoIterator<Item = Rule>>(iter: T) -> Self {
        Rules(iter.into_iter().collect())
    }
}

impl Extend<Rule> for Rules {
    fn extend<T: IntoIterator<Item = Rule>>(&mut self, iter: T) {
        self.0.extend(iter);
    }
}

#[test]
fn test_rule_strength_and_output() {
    use std::sync::Arc;
    use crate::set::FuzzySet;

    let rule = Rule::new(
        Arc::new(FuzzySet::s_shape(0., 1.).unwrap()),
        Arc::new(FuzzySet::constant(1.25).unwrap()),
    );

    assert_eq!(rule.evaluate(&[0.25]).unwrap(), 0.25);
    assert_eq!(rule.get_output(None).unwrap(), 1.25);
    assert_eq!(rule.get_output(Some(&[0.25][..])).unwrap(), 1.25);
    assert_eq!(format!("{rule:?}"), "if SShape(0, 1) then Constant(1.25)");
}

#[test]
fn test_output_at_strength() {
    use std::sync::Arc;
    use crate::set::FuzzySet;

    let rule = Rule::new(
        Arc::new(FuzzySet::s_shape(0., 1.).unwrap()),
        Arc::new(FuzzySet::s_shape(0., 10.).unwrap()),
    );

    assert_eq!(rule.get_output(None).unwrap(), 10.);
    assert_eq!(rule.get_output(Some(&[0.5][..])).unwrap(), 5.);
    assert!(rule.get_output(Some(&[][..])).is_err());
}

#[test]
fn test_idempotent() {
    use std::sync::Arc;
    use crate::set::FuzzySet;

    let rule = Rule::new(
        Arc::new(FuzzySet::triangular(0., 1., 2.).unwrap()),
        Arc::new(FuzzySet::constant(-0.6).unwrap()),
    );
    let first = rule.evaluate(&[0.3]).unwrap();

    for _ in 0..10 {
        assert_eq!(rule.evaluate(&[0.3]).unwrap(), first);
    }
}
