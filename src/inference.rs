use tracing::{debug, trace};

use crate::error::{Error, Result};
use crate::ops::Defuzzification;
use crate::rules::{Rule, Rules};

/// What a single rule contributed to one evaluation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Firing {
    pub strength: f64,
    pub value: f64,
}

/// Immutable rule base producing one crisp output per input vector.
///
/// Rules are always visited in the order they were added so the floating
/// point sums are reproducible.
#[derive(Clone, Debug)]
pub struct Engine {
    rules: Vec<Rule>,
    defuzz_op: Defuzzification,
}

impl Engine {
    /// Weighted average over the rules' default consequent values.
    pub fn new(rules: Rules) -> Result<Self> {
        Self::with_defuzzification(rules, Defuzzification::default())
    }

    pub fn with_defuzzification(rules: Rules, defuzz_op: Defuzzification) -> Result<Self> {
        if rules.is_empty() {
            return Err(Error::EmptyRuleBase);
        }

        debug!(rules = rules.len(), ?defuzz_op, "built inference engine");

        Ok(Engine {
            rules: rules.0,
            defuzz_op,
        })
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn defuzzification(&self) -> Defuzzification {
        self.defuzz_op
    }

    /// Strength and candidate value of every rule, in rule order.
    pub fn firings(&self, input: &[f64]) -> Result<Vec<Firing>> {
        self.rules
            .iter()
            .map(|rule| -> Result<Firing> {
                let strength = rule.evaluate(input)?;
                let value = match self.defuzz_op {
                    Defuzzification::WeightedAverage => rule.consequent().x_value(None),
                    Defuzzification::Tsukamoto => rule.consequent().x_value(Some(strength)),
                };

                Ok(Firing { strength, value })
            })
            .collect()
    }

    /// Crisp output for an input vector. Exactly 0 when no rule fires.
    pub fn output(&self, input: &[f64]) -> Result<f64> {
        let firings = self.firings(input)?;
        let max_strength = firings.iter().map(|f| f.strength).fold(0., f64::max);

        if max_strength == 0. {
            trace!(?input, ?firings, "no rule fired");
            return Ok(0.);
        }

        let mut numerator = 0.;
        let mut denominator = 0.;

        for firing in &firings {
            numerator += firing.strength * firing.value;
            denominator += firing.strength;
        }

        let output = numerator / denominator;

        trace!(?input, ?firings, max_strength, output, "defuzzified");

        Ok(output)
    }
}

#[cfg(test)]
fn constant(value: f64) -> crate::set::SharedConsequent {
    std::sync::Arc::new(crate::set::FuzzySet::constant(value).unwrap())
}

#[test]
fn test_empty_rule_base() {
    assert!(matches!(Engine::new(Rules::new()), Err(Error::EmptyRuleBase)));
}

#[test]
fn test_single_firing_rule() {
    use std::sync::Arc;
    use crate::set::{and_of, FuzzySet, SharedSet};

    let angle_neg: SharedSet = Arc::new(FuzzySet::z_shape(-0.01, 0.01).unwrap().named("theta_neg"));
    let rate_neg: SharedSet = Arc::new(
        FuzzySet::z_shape(-0.5, 0.5)
            .unwrap()
            .named("theta_dot_neg")
            .on_channel(1),
    );
    let mut rules = Rules::new();

    rules.add(Arc::new(and_of(angle_neg, rate_neg)), constant(-2.5));

    let engine = Engine::new(rules).unwrap();

    assert_eq!(engine.output(&[-0.02, -0.6, 0., 0.]).unwrap(), -2.5);
}

#[test]
fn test_one_rule_fires_partially() {
    use std::sync::Arc;
    use crate::set::FuzzySet;

    let mut rules = Rules::new();

    rules.add(Arc::new(FuzzySet::s_shape(0., 1.).unwrap()), constant(4.));
    rules.add(Arc::new(FuzzySet::z_shape(-2., -1.).unwrap()), constant(-9.));

    let engine = Engine::new(rules).unwrap();

    assert_eq!(engine.output(&[0.1]).unwrap(), 4.);
    assert_eq!(engine.output(&[0.9]).unwrap(), 4.);
}

#[test]
fn test_nothing_fires() {
    use std::sync::Arc;
    use crate::set::FuzzySet;

    let mut rules = Rules::new();

    rules.add(Arc::new(FuzzySet::triangular(0., 1., 2.).unwrap()), constant(3.));

    let engine = Engine::new(rules).unwrap();

    assert_eq!(engine.output(&[5.]).unwrap(), 0.);
}

#[test]
fn test_equal_strengths_average() {
    use std::sync::Arc;
    use approx::assert_relative_eq;
    use crate::set::FuzzySet;

    let mut rules = Rules::new();

    rules.add(Arc::new(FuzzySet::triangular(0., 1., 2.).unwrap()), constant(1.25));
    rules.add(Arc::new(FuzzySet::triangular(0., 1., 2.).unwrap()), constant(-0.6));

    let engine = Engine::new(rules).unwrap();

    for x in [0.1, 0.5, 1., 1.7] {
        assert_relative_eq!(engine.output(&[x]).unwrap(), (1.25 - 0.6) / 2., epsilon = 1e-12);
    }
}

#[test]
fn test_weighted_average() {
    use std::sync::Arc;
    use approx::assert_relative_eq;
    use crate::set::FuzzySet;

    let mut rules = Rules::new();

    rules.add(Arc::new(FuzzySet::s_shape(0., 1.).unwrap()), constant(10.));
    rules.add(Arc::new(FuzzySet::z_shape(0., 1.).unwrap()), constant(-10.));

    let engine = Engine::new(rules).unwrap();

    // 0.75 * 10 + 0.25 * -10
    assert_relative_eq!(engine.output(&[0.75]).unwrap(), 5.);
}

#[test]
fn test_tsukamoto_uses_strength() {
    use std::sync::Arc;
    use approx::assert_relative_eq;
    use crate::set::FuzzySet;

    let rules = || {
        let mut rules = Rules::new();
        rules.add(
            Arc::new(FuzzySet::s_shape(0., 1.).unwrap()),
            Arc::new(FuzzySet::s_shape(0., 10.).unwrap()),
        );
        rules
    };
    let average = Engine::new(rules()).unwrap();
    let tsukamoto = Engine::with_defuzzification(rules(), Defuzzification::Tsukamoto).unwrap();

    assert_eq!(average.output(&[0.3]).unwrap(), 10.);
    assert_relative_eq!(tsukamoto.output(&[0.3]).unwrap(), 3., epsilon = 1e-12);
    assert_eq!(tsukamoto.defuzzification(), Defuzzification::Tsukamoto);
}

#[test]
fn test_modes_agree_on_singletons() {
    use std::sync::Arc;
    use crate::set::FuzzySet;

    let rules = || {
        let mut rules = Rules::new();
        rules.add(Arc::new(FuzzySet::s_shape(0., 1.).unwrap()), constant(2.5));
        rules.add(Arc::new(FuzzySet::z_shape(0., 1.).unwrap()), constant(-1.25));
        rules
    };
    let average = Engine::new(rules()).unwrap();
    let tsukamoto = Engine::with_defuzzification(rules(), Defuzzification::Tsukamoto).unwrap();

    for x in [-1., 0.2, 0.5, 0.8, 2.] {
        assert_eq!(average.output(&[x]).unwrap(), tsukamoto.output(&[x]).unwrap());
    }
}

#[test]
fn test_firings_in_rule_order() {
    use std::sync::Arc;
    use crate::set::FuzzySet;

    let mut rules = Rules::new();

    rules.add(Arc::new(FuzzySet::s_shape(0., 1.).unwrap()), constant(1.));
    rules.add(Arc::new(FuzzySet::z_shape(0., 1.).unwrap().on_channel(1)), constant(2.));

    let engine = Engine::new(rules).unwrap();
    let firings = engine.firings(&[0.25, 0.25]).unwrap();

    assert_eq!(
        firings,
        vec![
            Firing {
                strength: 0.25,
                value: 1.
            },
            Firing {
                strength: 0.75,
                value: 2.
            },
        ]
    );
    assert!(matches!(
        engine.output(&[0.25]),
        Err(Error::ChannelOutOfRange { channel: 1, len: 1 })
    ));
}

#[test]
fn test_engine_is_shareable() {
    fn assert_send_sync<T: Send + Sync>() {}

    assert_send_sync::<Engine>();
}
