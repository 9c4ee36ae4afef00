//! Fuzzy inference with crisp singleton consequents.
//!
//! Fuzzy sets read one channel of an input vector, composites combine them
//! with min/max, and an [`Engine`] merges every rule's firing strength and
//! consequent value into one weighted average.
//!
//! ```
//! use std::sync::Arc;
//!
//! use fuzzy_control::{and_of, Engine, FuzzySet, Rules, SharedSet};
//!
//! # fn main() -> fuzzy_control::Result<()> {
//! let angle_neg: SharedSet = Arc::new(FuzzySet::z_shape(-0.01, 0.01)?.named("theta_neg"));
//! let rate_neg: SharedSet = Arc::new(FuzzySet::z_shape(-0.5, 0.5)?.named("theta_dot_neg").on_channel(1));
//! let push_left = Arc::new(FuzzySet::constant(-2.5)?.named("force_large_left"));
//!
//! let mut rules = Rules::new();
//! rules.add(Arc::new(and_of(angle_neg, rate_neg)), push_left);
//!
//! let engine = Engine::new(rules)?;
//!
//! assert_eq!(engine.output(&[-0.02, -0.6, 0., 0.])?, -2.5);
//! # Ok(())
//! # }
//! ```

mod dsl;
mod linspace;
mod math;

pub mod config;
pub mod controller;
pub mod diagnostics;
pub mod error;
pub mod inference;
pub mod ops;
pub mod rules;
pub mod set;
pub mod shapes;

pub use config::{EngineConfig, RuleConfig, SetConfig, ShapeConfig};
pub use controller::{CartPoleController, Observation, Thrust, Trace};
pub use dsl::Expr;
pub use error::{Error, Result};
pub use inference::{Engine, Firing};
pub use linspace::Linspace;
pub use ops::{Defuzzification, LogicOp};
pub use rules::{Rule, Rules};
pub use set::{and_of, or_of, Composite, Consequent, FuzzySet, Membership, SharedConsequent, SharedSet};
pub use shapes::{Constant, InverseShape, Piecewise, Shape, Trapezoidal, Triangular, ZShape};
