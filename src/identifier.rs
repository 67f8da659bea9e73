//! CQL identifiers.
//!
//! An [`Identifier`] names a keyspace, table, column, field or function. CQL
//! identifiers are case-insensitive unless double-quoted, so this type keeps
//! a normalized internal form: unquoted names are folded to lowercase at
//! construction, quoted names are stored verbatim. Equality is by normalized
//! form.

use serde::{Deserialize, Serialize};
use std::fmt;
#[cfg(feature = "bindings")]
use ts_rs::TS;

/// A CQL identifier, normalized at construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "bindings", derive(TS))]
#[cfg_attr(feature = "bindings", ts(export))]
pub struct Identifier {
    /// The internal (normalized) text, without quoting characters.
    name: String,
    /// Whether the identifier must render double-quoted.
    quoted: bool,
}

fn is_safe_identifier_name(name: &str) -> bool {
    if name.is_empty() {
        return false;
    }

    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };

    if !(first == '_' || first.is_ascii_alphabetic()) {
        return false;
    }

    chars.all(|c| c == '_' || c.is_ascii_alphanumeric())
}

impl Identifier {
    /// Parse an identifier from its CQL form.
    ///
    /// If `name` is wrapped in double quotes, the quotes are stripped and the
    /// inner text is kept case-sensitive (embedded `""` pairs are unescaped).
    /// Otherwise the name is folded to lowercase, matching how CQL treats
    /// unquoted identifiers.
    ///
    /// # Examples
    ///
    /// ```
    /// use cql_builder::Identifier;
    ///
    /// assert_eq!(Identifier::new("Foo").as_cql(), "foo");
    /// assert_eq!(Identifier::new("\"Foo\"").as_cql(), "\"Foo\"");
    /// ```
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        if name.len() >= 2 && name.starts_with('"') && name.ends_with('"') {
            Self {
                name: name[1..name.len() - 1].replace("\"\"", "\""),
                quoted: true,
            }
        } else {
            Self {
                name: name.to_lowercase(),
                quoted: false,
            }
        }
    }

    /// Create an identifier from its exact internal form, forcing quoting.
    pub fn quoted(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            quoted: true,
        }
    }

    /// The internal (unquoted, normalized) form.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Render the identifier as it must appear in a statement.
    ///
    /// Quotes are added when the identifier was quoted at construction or
    /// when its internal form would not survive a round trip unquoted
    /// (uppercase characters, symbols, leading digit). Embedded quotes are
    /// doubled.
    pub fn as_cql(&self) -> String {
        if !self.quoted && is_safe_identifier_name(&self.name) {
            self.name.clone()
        } else {
            format!("\"{}\"", self.name.replace('"', "\"\""))
        }
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_cql())
    }
}

impl From<&str> for Identifier {
    fn from(name: &str) -> Self {
        Identifier::new(name)
    }
}

impl From<String> for Identifier {
    fn from(name: String) -> Self {
        Identifier::new(name)
    }
}
