//! Error types for cql-builder

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The result type for builder operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while composing a statement.
///
/// Every error is raised synchronously by the call that introduces the
/// violation; rendering itself never fails.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum Error {
    /// An invalid combination of selectors (e.g. the star selector inside a
    /// bulk selector list, or an aliased selector nested in a collection).
    #[error("Invalid selector: {0}")]
    InvalidSelector(String),

    /// An alias was attached where none is allowed (star, count(*), raw
    /// snippets, bind markers and ranges cannot be aliased), or there was
    /// nothing to alias.
    #[error("Invalid alias: {0}")]
    InvalidAlias(String),

    /// An argument failed validation at the setter (e.g. a non-positive
    /// LIMIT, or a non-marker term passed to a bind-marker slot).
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A value could not be rendered as a CQL literal.
    #[error("No CQL literal mapping: {0}")]
    NoLiteralMapping(String),
}

impl Error {
    /// Create an invalid-selector error
    pub fn invalid_selector(message: impl Into<String>) -> Self {
        Error::InvalidSelector(message.into())
    }

    /// Create an invalid-alias error
    pub fn invalid_alias(message: impl Into<String>) -> Self {
        Error::InvalidAlias(message.into())
    }

    /// Create an invalid-argument error
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Error::InvalidArgument(message.into())
    }

    /// Create a no-literal-mapping error
    pub fn no_literal_mapping(message: impl Into<String>) -> Self {
        Error::NoLiteralMapping(message.into())
    }
}
