use thiserror::Error;

/// Errors raised while building or evaluating a fuzzy system.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid {shape} shape: {reason}")]
    InvalidShape { shape: &'static str, reason: String },

    #[error("trapezoids {lhs} and {rhs} have disjoint plateaus")]
    NoOverlap { lhs: String, rhs: String },

    #[error("channel {channel} is out of range for an input vector of length {len}")]
    ChannelOutOfRange { channel: usize, len: usize },

    #[error("an inference engine needs at least one rule")]
    EmptyRuleBase,

    #[error("no fuzzy set named `{0}`")]
    UnknownSet(String),

    #[error("fuzzy set `{0}` is defined more than once")]
    DuplicateSet(String),

    #[error("fuzzy set `{0}` has no inverse mapping and cannot be a rule consequent")]
    NotAConsequent(String),

    #[error("malformed configuration: {0}")]
    Config(#[from] toml::de::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl Error {
    pub(crate) fn shape(shape: &'static str, reason: impl Into<String>) -> Self {
        Error::InvalidShape {
            shape,
            reason: reason.into(),
        }
    }
}
