//! The `WITH k=v AND ...` option serializer used by the DDL builders.
//!
//! Two wire formats exist side by side: CREATE TABLE writes `k=v` and nests
//! maps as `{'k':v,...}`, while CREATE KEYSPACE writes `k = v` and nests as
//! `{ 'k' : v, ... }`. The two are inconsistent with each other but both are
//! long-established outputs, so each is reproduced verbatim.

use serde::{Deserialize, Serialize};
use std::fmt;
#[cfg(feature = "bindings")]
use ts_rs::TS;

/// A table or keyspace option value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "bindings", derive(TS))]
#[cfg_attr(feature = "bindings", ts(export))]
#[serde(rename_all = "snake_case")]
pub enum PropertyValue {
    /// Rendered single-quoted.
    String(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    /// A nested option map, rendered recursively. Order is preserved.
    Map(Vec<(String, PropertyValue)>),
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        PropertyValue::String(value.into())
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        PropertyValue::String(value)
    }
}

impl From<i32> for PropertyValue {
    fn from(value: i32) -> Self {
        PropertyValue::Int(value.into())
    }
}

impl From<i64> for PropertyValue {
    fn from(value: i64) -> Self {
        PropertyValue::Int(value)
    }
}

impl From<f64> for PropertyValue {
    fn from(value: f64) -> Self {
        PropertyValue::Float(value)
    }
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        PropertyValue::Bool(value)
    }
}

impl From<Vec<(String, PropertyValue)>> for PropertyValue {
    fn from(entries: Vec<(String, PropertyValue)>) -> Self {
        PropertyValue::Map(entries)
    }
}

fn write_scalar(value: &PropertyValue, out: &mut String) {
    match value {
        PropertyValue::String(s) => {
            out.push('\'');
            out.push_str(s);
            out.push('\'');
        }
        PropertyValue::Int(i) => out.push_str(&i.to_string()),
        PropertyValue::Float(f) => {
            if f.fract() == 0.0 && f.is_finite() {
                out.push_str(&format!("{f:.1}"));
            } else {
                out.push_str(&f.to_string());
            }
        }
        PropertyValue::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        // Maps are matched by the callers before they get here.
        PropertyValue::Map(entries) => write_table_map(entries, out),
    }
}

fn write_table_map(entries: &[(String, PropertyValue)], out: &mut String) {
    out.push('{');
    for (i, (key, value)) in entries.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push('\'');
        out.push_str(key);
        out.push_str("':");
        write_table_value(value, out);
    }
    out.push('}');
}

fn write_table_value(value: &PropertyValue, out: &mut String) {
    match value {
        PropertyValue::Map(entries) => write_table_map(entries, out),
        other => write_scalar(other, out),
    }
}

fn write_keyspace_value(value: &PropertyValue, out: &mut String) {
    match value {
        PropertyValue::Map(entries) => {
            out.push_str("{ ");
            for (i, (key, value)) in entries.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                out.push('\'');
                out.push_str(key);
                out.push_str("' : ");
                write_keyspace_value(value, out);
            }
            out.push_str(" }");
        }
        other => write_scalar(other, out),
    }
}

/// Append `" WITH k=v AND ..."` in the table format.
///
/// `first` is false when a `WITH` clause was already opened (COMPACT
/// STORAGE, clustering order), in which case every entry joins with `AND`.
pub(crate) fn append_table_properties(
    properties: &[(String, PropertyValue)],
    mut first: bool,
    out: &mut String,
) {
    for (name, value) in properties {
        out.push_str(if first { " WITH " } else { " AND " });
        first = false;
        out.push_str(name);
        out.push('=');
        write_table_value(value, out);
    }
}

/// Append `" WITH k = v AND ..."` in the keyspace format.
pub(crate) fn append_keyspace_properties(
    properties: &[(String, PropertyValue)],
    out: &mut String,
) {
    for (i, (name, value)) in properties.iter().enumerate() {
        out.push_str(if i == 0 { " WITH " } else { " AND " });
        out.push_str(name);
        out.push_str(" = ");
        write_keyspace_value(value, out);
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        write_table_value(self, &mut out);
        f.write_str(&out)
    }
}
