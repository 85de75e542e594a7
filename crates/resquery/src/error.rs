//! Error types for the resquery crate.
//!
//! Listing itself never fails: malformed parameters degrade to defaults.
//! Errors only come from parsing label selectors directly.

use thiserror::Error;

/// Errors that can occur when parsing a label selector.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectorError {
    /// A comma produced an empty requirement.
    #[error("empty requirement in selector '{0}'")]
    EmptyRequirement(String),

    /// Key is not a valid label key.
    #[error("invalid label key '{0}'")]
    InvalidKey(String),

    /// Value is not a valid label value.
    #[error("invalid label value '{value}' for key '{key}'")]
    InvalidValue { key: String, value: String },

    /// `in`/`notin` with an empty set.
    #[error("set requirement for key '{0}' has no values")]
    EmptyValueSet(String),

    /// Parentheses do not balance.
    #[error("unbalanced parentheses in selector '{0}'")]
    UnbalancedParens(String),
}

/// Result type for selector parsing.
pub type Result<T> = std::result::Result<T, SelectorError>;
