use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::set::{and_of, or_of, SharedSet};

/// Rule condition over named fuzzy sets, resolved into composites when an
/// engine is built from configuration.
///
/// In TOML: `{ is = "theta_neg" }`, `{ and = [cond, cond] }` or
/// `{ or = [cond, cond] }`.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Expr {
    Is(String),
    And(Box<Expr>, Box<Expr>),
    Or(Box<Expr>, Box<Expr>),
}

impl Expr {
    pub fn is(name: impl Into<String>) -> Self {
        Expr::Is(name.into())
    }

    pub fn and(self, rhs: Expr) -> Self {
        Expr::And(Box::new(self), Box::new(rhs))
    }

    pub fn or(self, rhs: Expr) -> Self {
        Expr::Or(Box::new(self), Box::new(rhs))
    }

    /// Names of every set the condition refers to, left to right.
    pub fn propositions(&self) -> Vec<&str> {
        let mut props = Vec::new();

        fn parse<'p>(expr: &'p Expr, out: &mut Vec<&'p str>) {
            match expr {
                Expr::Is(name) => out.push(name),
                Expr::And(lhs, rhs) | Expr::Or(lhs, rhs) => {
                    parse(lhs, out);
                    parse(rhs, out);
                },
            }
        }

        parse(self, &mut props);

        props
    }

    pub(crate) fn resolve(&self, sets: &HashMap<String, SharedSet>) -> Result<SharedSet> {
        match self {
            Expr::Is(name) => sets.get(name).cloned().ok_or_else(|| Error::UnknownSet(name.clone())),
            Expr::And(lhs, rhs) => Ok(Arc::new(and_of(lhs.resolve(sets)?, rhs.resolve(sets)?))),
            Expr::Or(lhs, rhs) => Ok(Arc::new(or_of(lhs.resolve(sets)?, rhs.resolve(sets)?))),
        }
    }
}

#[test]
fn test_propositions() {
    let expr = Expr::is("a").and(Expr::is("b").or(Expr::is("c")));

    assert_eq!(expr.propositions(), vec!["a", "b", "c"]);
}

#[test]
fn test_resolve_shares_sets() {
    use crate::set::{FuzzySet, Membership};

    let mut sets: HashMap<String, SharedSet> = HashMap::new();
    let neg: SharedSet = Arc::new(FuzzySet::z_shape(-1., 1.).unwrap().named("neg"));

    sets.insert("neg".into(), neg.clone());
    sets.insert("pos".into(), Arc::new(FuzzySet::s_shape(-1., 1.).unwrap().named("pos")));

    let either = Expr::is("neg").or(Expr::is("pos")).resolve(&sets).unwrap();
    let plain = Expr::is("neg").resolve(&sets).unwrap();

    assert_eq!(either.name(), "(neg or pos)");
    assert_eq!(either.membership(0.), 0.5);
    assert!(Arc::ptr_eq(&plain, &neg));
    assert!(matches!(
        Expr::is("nope").resolve(&sets),
        Err(Error::UnknownSet(name)) if name == "nope"
    ));
}
