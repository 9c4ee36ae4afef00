//! Declarative engine configuration.
//!
//! An [`EngineConfig`] names every fuzzy set once and refers to sets by name
//! from the rules, so a set used by several rules is built once and shared.
//! It deserializes from TOML:
//!
//! ```toml
//! defuzzification = "weighted_average"
//!
//! [[set]]
//! name = "theta_neg"
//! shape = "z"
//! a = -0.01
//! b = 0.01
//!
//! [[set]]
//! name = "force_large_left"
//! shape = "constant"
//! value = -2.5
//!
//! [[rule]]
//! when = { is = "theta_neg" }
//! then = "force_large_left"
//! ```

use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::dsl::Expr;
use crate::error::{Error, Result};
use crate::inference::Engine;
use crate::ops::Defuzzification;
use crate::rules::Rules;
use crate::set::{FuzzySet, SharedConsequent, SharedSet};
use crate::shapes::{InverseShape, Shape};

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub defuzzification: Defuzzification,
    #[serde(default, rename = "set")]
    pub sets: Vec<SetConfig>,
    #[serde(default, rename = "rule")]
    pub rules: Vec<RuleConfig>,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct SetConfig {
    pub name: String,
    /// Input vector channel the set reads.
    #[serde(default)]
    pub channel: usize,
    #[serde(flatten)]
    pub shape: ShapeConfig,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum ShapeConfig {
    Constant { value: f64 },
    Triangular { a: f64, b: f64, c: f64 },
    Trapezoidal { a: f64, b: f64, c: f64, d: f64 },
    Z { a: f64, b: f64 },
    S { a: f64, b: f64 },
    Piecewise { points: Vec<(f64, f64)> },
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct RuleConfig {
    pub when: Expr,
    /// Name of the consequent set.
    pub then: String,
}

impl SetConfig {
    pub fn new(name: impl Into<String>, channel: usize, shape: ShapeConfig) -> Self {
        SetConfig {
            name: name.into(),
            channel,
            shape,
        }
    }
}

impl RuleConfig {
    pub fn new(when: Expr, then: impl Into<String>) -> Self {
        RuleConfig {
            when,
            then: then.into(),
        }
    }
}

/// Sets by name, split by what they may be used for.
#[derive(Default)]
struct Registry {
    antecedents: HashMap<String, SharedSet>,
    consequents: HashMap<String, SharedConsequent>,
}

impl Registry {
    fn insert_antecedent<S: Shape + 'static>(&mut self, set: FuzzySet<S>, config: &SetConfig) -> Result<()> {
        if self.antecedents.contains_key(&config.name) {
            return Err(Error::DuplicateSet(config.name.clone()));
        }

        let set = Arc::new(set.named(config.name.as_str()).on_channel(config.channel));
        self.antecedents.insert(config.name.clone(), set);

        Ok(())
    }

    fn insert_consequent<S: InverseShape + 'static>(&mut self, set: FuzzySet<S>, config: &SetConfig) -> Result<()> {
        if self.antecedents.contains_key(&config.name) {
            return Err(Error::DuplicateSet(config.name.clone()));
        }

        let set = Arc::new(set.named(config.name.as_str()).on_channel(config.channel));
        self.antecedents.insert(config.name.clone(), set.clone());
        self.consequents.insert(config.name.clone(), set);

        Ok(())
    }

    fn consequent(&self, name: &str) -> Result<SharedConsequent> {
        match self.consequents.get(name) {
            Some(set) => Ok(set.clone()),
            None if self.antecedents.contains_key(name) => Err(Error::NotAConsequent(name.to_owned())),
            None => Err(Error::UnknownSet(name.to_owned())),
        }
    }
}

impl EngineConfig {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    /// Builds every set, resolves rule conditions and consequents by name and
    /// hands the rule base to a new [`Engine`].
    pub fn build(&self) -> Result<Engine> {
        let mut registry = Registry::default();

        for config in &self.sets {
            match &config.shape {
                ShapeConfig::Constant { value } => registry.insert_consequent(FuzzySet::constant(*value)?, config)?,
                ShapeConfig::Triangular { a, b, c } => {
                    registry.insert_antecedent(FuzzySet::triangular(*a, *b, *c)?, config)?
                },
                ShapeConfig::Trapezoidal { a, b, c, d } => {
                    registry.insert_antecedent(FuzzySet::trapezoidal(*a, *b, *c, *d)?, config)?
                },
                ShapeConfig::Z { a, b } => registry.insert_consequent(FuzzySet::z_shape(*a, *b)?, config)?,
                ShapeConfig::S { a, b } => registry.insert_consequent(FuzzySet::s_shape(*a, *b)?, config)?,
                ShapeConfig::Piecewise { points } => {
                    registry.insert_antecedent(FuzzySet::piecewise(points.clone())?, config)?
                },
            }
        }

        let mut rules = Rules::with_capacity(self.rules.len());

        for rule in &self.rules {
            let antecedent = rule.when.resolve(&registry.antecedents)?;
            let consequent = registry.consequent(&rule.then)?;

            rules.add(antecedent, consequent);
        }

        debug!(
            sets = self.sets.len(),
            rules = rules.len(),
            "resolved engine configuration"
        );

        Engine::with_defuzzification(rules, self.defuzzification)
    }

    /// Rule base balancing a pole on a cart.
    ///
    /// Inputs are `[angle, angular velocity, cart position error, cart velocity]`
    /// in radians, radians per second, meters and meters per second. The
    /// output is a force in newtons, positive to the right.
    pub fn cart_pole() -> Self {
        let pair = |name: &str, channel: usize, a: f64, b: f64| {
            [
                SetConfig::new(format!("{name}_neg"), channel, ShapeConfig::Z { a, b }),
                SetConfig::new(format!("{name}_pos"), channel, ShapeConfig::S { a, b }),
            ]
        };
        let force = |name: &str, value: f64| {
            SetConfig::new(format!("force_{name}"), 0, ShapeConfig::Constant { value })
        };
        let both = |lhs: &str, rhs: &str| Expr::is(lhs).and(Expr::is(rhs));

        let sets = [
            pair("theta", 0, -0.01, 0.01),
            pair("theta_dot", 1, -0.5, 0.5),
            pair("cart_position", 2, -0.3, 0.3),
            pair("cart_velocity", 3, -0.5, 0.5),
        ]
        .into_iter()
        .flatten()
        .chain([
            force("med_left", -1.25),
            force("med_right", 1.25),
            force("large_left", -2.5),
            force("large_right", 2.5),
            force("small_left", -0.6),
            force("small_right", 0.6),
        ])
        .collect();

        let rules = vec![
            RuleConfig::new(both("theta_neg", "theta_dot_neg"), "force_large_left"),
            RuleConfig::new(both("theta_pos", "theta_dot_neg"), "force_med_left"),
            RuleConfig::new(both("theta_pos", "theta_dot_pos"), "force_large_right"),
            RuleConfig::new(both("theta_neg", "theta_dot_pos"), "force_med_right"),
            RuleConfig::new(Expr::is("cart_position_neg"), "force_small_left"),
            RuleConfig::new(Expr::is("cart_position_pos"), "force_small_right"),
            RuleConfig::new(Expr::is("cart_velocity_neg"), "force_med_left"),
            RuleConfig::new(Expr::is("cart_velocity_pos"), "force_med_right"),
        ];

        EngineConfig {
            defuzzification: Defuzzification::WeightedAverage,
            sets,
            rules,
        }
    }
}

impl FromStr for EngineConfig {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_toml_str(s)
    }
}

#[cfg(test)]
const TWO_RULES: &str = r#"
    [[set]]
    name = "low"
    shape = "triangular"
    a = 0.0
    b = 1.0
    c = 2.0

    [[set]]
    name = "high"
    shape = "trapezoidal"
    channel = 1
    a = 1.0
    b = 2.0
    c = 3.0
    d = 4.0

    [[set]]
    name = "down"
    shape = "constant"
    value = -1.0

    [[set]]
    name = "up"
    shape = "constant"
    value = 3.0

    [[rule]]
    when = { is = "low" }
    then = "down"

    [[rule]]
    when = { or = [{ is = "high" }, { and = [{ is = "low" }, { is = "high" }] }] }
    then = "up"
"#;

#[test]
fn test_parse_and_build() {
    let config: EngineConfig = TWO_RULES.parse().unwrap();

    assert_eq!(config.defuzzification, Defuzzification::WeightedAverage);
    assert_eq!(config.sets.len(), 4);
    assert_eq!(config.sets[1].channel, 1);
    assert_eq!(
        config.sets[1].shape,
        ShapeConfig::Trapezoidal {
            a: 1.,
            b: 2.,
            c: 3.,
            d: 4.
        }
    );
    assert_eq!(config.rules[1].when.propositions(), vec!["high", "low", "high"]);

    let engine = config.build().unwrap();

    assert_eq!(engine.rules().len(), 2);
    // low fires fully, high not at all
    assert_eq!(engine.output(&[1., 0.]).unwrap(), -1.);
    // both fire fully
    assert_eq!(engine.output(&[1., 2.5]).unwrap(), 1.);
}

#[test]
fn test_consequent_must_be_invertible() {
    let mut config: EngineConfig = TWO_RULES.parse().unwrap();

    config.rules[0].then = "low".into();

    assert!(matches!(config.build(), Err(Error::NotAConsequent(name)) if name == "low"));
}

#[test]
fn test_unknown_and_duplicate_sets() {
    let mut config: EngineConfig = TWO_RULES.parse().unwrap();

    config.rules[0].then = "sideways".into();

    assert!(matches!(config.build(), Err(Error::UnknownSet(name)) if name == "sideways"));

    let mut config: EngineConfig = TWO_RULES.parse().unwrap();

    config.sets[3].name = "down".into();

    assert!(matches!(config.build(), Err(Error::DuplicateSet(name)) if name == "down"));
}

#[test]
fn test_invalid_configs() {
    let empty = EngineConfig::default();

    assert!(matches!(empty.build(), Err(Error::EmptyRuleBase)));

    let mut config: EngineConfig = TWO_RULES.parse().unwrap();

    config.sets[0].shape = ShapeConfig::Triangular { a: 2., b: 1., c: 0. };

    assert!(matches!(config.build(), Err(Error::InvalidShape { .. })));
    assert!(matches!(
        EngineConfig::from_toml_str("[[set]]\nname = 1"),
        Err(Error::Config(_))
    ));
}

#[test]
fn test_cart_pole_preset() {
    let config = EngineConfig::cart_pole();

    assert_eq!(config.sets.len(), 14);
    assert_eq!(config.rules.len(), 8);

    let engine = config.build().unwrap();

    assert_eq!(engine.output(&[0., 0., 0., 0.]).unwrap(), 0.);
}
