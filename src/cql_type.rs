//! CQL data types.
//!
//! [`CqlType`] is the type vocabulary used by casts, type hints, typed map
//! literals and CREATE TABLE column definitions. It only carries what the
//! renderer needs: a name and, for parameterized types, the element types.

use crate::identifier::Identifier;
use serde::{Deserialize, Serialize};
use std::fmt;
#[cfg(feature = "bindings")]
use ts_rs::TS;

/// A CQL data type reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "bindings", derive(TS))]
#[cfg_attr(feature = "bindings", ts(export))]
#[serde(rename_all = "snake_case")]
pub enum CqlType {
    Ascii,
    Bigint,
    Blob,
    Boolean,
    Counter,
    Date,
    Decimal,
    Double,
    Duration,
    Float,
    Inet,
    Int,
    Smallint,
    Text,
    Time,
    Timestamp,
    Timeuuid,
    Tinyint,
    Uuid,
    Varint,
    List(Box<CqlType>),
    Set(Box<CqlType>),
    Map(Box<CqlType>, Box<CqlType>),
    Tuple(Vec<CqlType>),
    /// A frozen wrapper, as in `frozen<list<int>>`.
    Frozen(Box<CqlType>),
    /// A user-defined type referenced by name, optionally frozen.
    Udt { name: Identifier, frozen: bool },
    /// An escape hatch for types this enum does not model; rendered verbatim.
    Custom(String),
}

impl CqlType {
    /// Shortcut for a list type.
    pub fn list_of(element: CqlType) -> Self {
        CqlType::List(Box::new(element))
    }

    /// Shortcut for a set type.
    pub fn set_of(element: CqlType) -> Self {
        CqlType::Set(Box::new(element))
    }

    /// Shortcut for a map type.
    pub fn map_of(key: CqlType, value: CqlType) -> Self {
        CqlType::Map(Box::new(key), Box::new(value))
    }

    /// Shortcut for a user-defined type reference.
    pub fn udt(name: impl Into<Identifier>, frozen: bool) -> Self {
        CqlType::Udt {
            name: name.into(),
            frozen,
        }
    }

    /// Render the type as it appears in CQL.
    pub fn as_cql(&self) -> String {
        match self {
            CqlType::Ascii => "ascii".into(),
            CqlType::Bigint => "bigint".into(),
            CqlType::Blob => "blob".into(),
            CqlType::Boolean => "boolean".into(),
            CqlType::Counter => "counter".into(),
            CqlType::Date => "date".into(),
            CqlType::Decimal => "decimal".into(),
            CqlType::Double => "double".into(),
            CqlType::Duration => "duration".into(),
            CqlType::Float => "float".into(),
            CqlType::Inet => "inet".into(),
            CqlType::Int => "int".into(),
            CqlType::Smallint => "smallint".into(),
            CqlType::Text => "text".into(),
            CqlType::Time => "time".into(),
            CqlType::Timestamp => "timestamp".into(),
            CqlType::Timeuuid => "timeuuid".into(),
            CqlType::Tinyint => "tinyint".into(),
            CqlType::Uuid => "uuid".into(),
            CqlType::Varint => "varint".into(),
            CqlType::List(element) => format!("list<{}>", element.as_cql()),
            CqlType::Set(element) => format!("set<{}>", element.as_cql()),
            CqlType::Map(key, value) => format!("map<{},{}>", key.as_cql(), value.as_cql()),
            CqlType::Tuple(components) => {
                let inner: Vec<String> = components.iter().map(CqlType::as_cql).collect();
                format!("tuple<{}>", inner.join(","))
            }
            CqlType::Frozen(inner) => format!("frozen<{}>", inner.as_cql()),
            CqlType::Udt { name, frozen } => {
                if *frozen {
                    format!("frozen<{}>", name.as_cql())
                } else {
                    name.as_cql()
                }
            }
            CqlType::Custom(raw) => raw.clone(),
        }
    }
}

impl fmt::Display for CqlType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_cql())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_parameterized_types() {
        assert_eq!(CqlType::map_of(CqlType::Text, CqlType::Int).as_cql(), "map<text,int>");
        assert_eq!(
            CqlType::Frozen(Box::new(CqlType::list_of(CqlType::Uuid))).as_cql(),
            "frozen<list<uuid>>"
        );
        assert_eq!(
            CqlType::Tuple(vec![CqlType::Int, CqlType::Text]).as_cql(),
            "tuple<int,text>"
        );
    }

    #[test]
    fn renders_udt_references() {
        assert_eq!(CqlType::udt("category", true).as_cql(), "frozen<category>");
        assert_eq!(CqlType::udt("category", false).as_cql(), "category");
    }
}
