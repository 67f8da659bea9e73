//! CREATE KEYSPACE statement builder.
//!
//! ```
//! use cql_builder::schema::CreateKeyspace;
//!
//! let cql = CreateKeyspace::keyspace("foo").with_simple_strategy(5).build();
//! assert_eq!(
//!     cql,
//!     "CREATE KEYSPACE foo WITH replication = \
//!      { 'class' : 'SimpleStrategy', 'replication_factor' : 5 }"
//! );
//! ```

use super::properties::{append_keyspace_properties, PropertyValue};
use crate::identifier::Identifier;
use serde::{Deserialize, Serialize};
use std::fmt;
#[cfg(feature = "bindings")]
use ts_rs::TS;

/// An immutable CREATE KEYSPACE statement under construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "bindings", derive(TS))]
#[cfg_attr(feature = "bindings", ts(export))]
pub struct CreateKeyspace {
    name: Identifier,
    if_not_exists: bool,
    properties: Vec<(String, PropertyValue)>,
}

impl CreateKeyspace {
    /// Start a CREATE KEYSPACE.
    pub fn keyspace(name: impl Into<Identifier>) -> Self {
        CreateKeyspace {
            name: name.into(),
            if_not_exists: false,
            properties: Vec::new(),
        }
    }

    /// Add `IF NOT EXISTS`.
    pub fn if_not_exists(mut self) -> Self {
        self.if_not_exists = true;
        self
    }

    /// Add an arbitrary keyspace option.
    pub fn with_property(
        mut self,
        name: impl Into<String>,
        value: impl Into<PropertyValue>,
    ) -> Self {
        self.properties.push((name.into(), value.into()));
        self
    }

    /// Set `replication` to `SimpleStrategy` with the given factor.
    pub fn with_simple_strategy(self, replication_factor: i32) -> Self {
        self.with_property(
            "replication",
            PropertyValue::Map(vec![
                ("class".to_string(), "SimpleStrategy".into()),
                (
                    "replication_factor".to_string(),
                    replication_factor.into(),
                ),
            ]),
        )
    }

    /// Set `replication` to `NetworkTopologyStrategy` with per-datacenter
    /// factors, in the given order.
    pub fn with_network_topology_strategy<N>(
        self,
        datacenter_factors: impl IntoIterator<Item = (N, i32)>,
    ) -> Self
    where
        N: Into<String>,
    {
        let mut entries = vec![(
            "class".to_string(),
            PropertyValue::from("NetworkTopologyStrategy"),
        )];
        for (datacenter, factor) in datacenter_factors {
            entries.push((datacenter.into(), factor.into()));
        }
        self.with_property("replication", PropertyValue::Map(entries))
    }

    /// Set the `durable_writes` option.
    pub fn with_durable_writes(self, durable_writes: bool) -> Self {
        self.with_property("durable_writes", durable_writes)
    }

    /// Render the statement.
    pub fn build(&self) -> String {
        let mut out = String::from("CREATE KEYSPACE ");
        if self.if_not_exists {
            out.push_str("IF NOT EXISTS ");
        }
        out.push_str(&self.name.as_cql());
        append_keyspace_properties(&self.properties, &mut out);
        out
    }
}

impl fmt::Display for CreateKeyspace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.build())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_bare_keyspace() {
        assert_eq!(
            CreateKeyspace::keyspace("foo").build(),
            "CREATE KEYSPACE foo"
        );
        assert_eq!(
            CreateKeyspace::keyspace("foo").if_not_exists().build(),
            "CREATE KEYSPACE IF NOT EXISTS foo"
        );
    }

    #[test]
    fn renders_simple_strategy() {
        let cql = CreateKeyspace::keyspace("foo").with_simple_strategy(5).build();
        assert_eq!(
            cql,
            "CREATE KEYSPACE foo WITH replication = \
             { 'class' : 'SimpleStrategy', 'replication_factor' : 5 }"
        );
    }

    #[test]
    fn renders_simple_strategy_with_durable_writes() {
        let cql = CreateKeyspace::keyspace("foo")
            .with_simple_strategy(5)
            .with_durable_writes(true)
            .build();
        assert_eq!(
            cql,
            "CREATE KEYSPACE foo WITH replication = \
             { 'class' : 'SimpleStrategy', 'replication_factor' : 5 } \
             AND durable_writes = true"
        );
    }

    #[test]
    fn renders_network_topology_strategy() {
        let cql = CreateKeyspace::keyspace("foo")
            .with_network_topology_strategy([("dc1", 3), ("dc2", 4)])
            .build();
        assert_eq!(
            cql,
            "CREATE KEYSPACE foo WITH replication = \
             { 'class' : 'NetworkTopologyStrategy', 'dc1' : 3, 'dc2' : 4 }"
        );
    }

    #[test]
    fn renders_custom_properties() {
        let cql = CreateKeyspace::keyspace("foo")
            .with_property("awesome_feature", true)
            .with_property("wow_factor", 11)
            .with_property("random_string", "hi")
            .build();
        assert_eq!(
            cql,
            "CREATE KEYSPACE foo WITH awesome_feature = true \
             AND wow_factor = 11 AND random_string = 'hi'"
        );
    }
}
