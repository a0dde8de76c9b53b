use std::fmt;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// The filter parameter two operands disagree on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mismatch {
    Size,
    HashCount,
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mismatch::Size => f.write_str("size"),
            Mismatch::HashCount => f.write_str("hash_count"),
        }
    }
}

#[derive(Error, Clone, Debug, PartialEq)]
pub enum Error {
    /// A filter was requested with parameters it cannot be built from.
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    /// Two filters cannot be combined because their layouts differ.
    #[error("incompatible filters: {field} differs ({left} vs {right})")]
    Incompatible {
        field: Mismatch,
        left: u64,
        right: u64,
    },

    /// The bytes handed to the decoder are not a valid encoded filter.
    #[error("malformed filter encoding: {0}")]
    Malformed(String),
}

impl Error {
    pub(crate) fn invalid_parameter(name: &'static str, reason: impl Into<String>) -> Self {
        Error::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }

    pub(crate) fn malformed(msg: impl fmt::Display) -> Self {
        Error::Malformed(msg.to_string())
    }
}
