use thiserror::Error;

/// Errors produced by type operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid hex string: {0}")]
    InvalidHex(String),

    #[error("invalid digest length: expected {expected} hex chars, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("digest contains uppercase hex; digests are lowercase")]
    UppercaseHex,

    #[error("invalid identifier: {0}")]
    InvalidId(String),

    #[error("unknown transaction kind: {0}")]
    UnknownKind(String),
}
