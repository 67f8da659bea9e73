//! CQL Builder - programmatic CQL statement construction library
//!
//! This library assembles syntactically valid, deterministically formatted
//! CQL statements from typed builder calls, without ever executing them. It
//! covers SELECT, DELETE and UPDATE statements plus the CREATE TABLE and
//! CREATE KEYSPACE DDL forms, with WHERE relations, IF conditions and a
//! precedence-aware arithmetic expression model.
//!
//! # Architecture
//!
//! The library is layered bottom-up:
//! 1. **Terms** - the expression model (columns, literals, arithmetic,
//!    function calls, collections), each node rendering itself
//! 2. **Relations / Conditions** - `lhs operator rhs` predicates for WHERE
//!    and IF clauses
//! 3. **Statement builders** - immutable accumulators that validate each
//!    transition and render the final string on `build()`
//!
//! Builders are value types: every call consumes the builder and returns a
//! new one, so a snapshot can be cloned and extended independently.
//!
//! # Example
//!
//! ```
//! use cql_builder::{bind_marker, is_column, select_from};
//!
//! let cql = select_from("sensor_data")
//!     .column("reading")
//!     .where_(is_column("id").eq(bind_marker()).unwrap())
//!     .limit(10)
//!     .unwrap()
//!     .build();
//! assert_eq!(cql, "SELECT reading FROM sensor_data WHERE id=? LIMIT 10");
//! ```

pub mod condition;
pub mod cql_type;
pub mod delete;
pub mod error;
pub mod identifier;
pub mod literal;
pub mod operator;
pub mod relation;
pub mod schema;
pub mod script;
pub mod select;
pub mod term;
pub mod update;

pub use condition::{if_column, if_element, if_field, Condition, ConditionBuilder, IfClause};
pub use cql_type::CqlType;
pub use delete::Delete;
pub use error::{Error, Result};
pub use identifier::Identifier;
pub use literal::ToCqlLiteral;
pub use operator::{ArithmeticOperator, Operator};
pub use relation::{
    is_column, is_custom_index, is_element, is_field, is_token, is_tuple, LeftHandSide, Relation,
    RelationBuilder,
};
pub use schema::{
    CompactionStrategy, CreateKeyspace, CreateTable, KeyCaching, LeveledCompaction, PropertyValue,
    RowsPerPartition, SizeTieredCompaction, TimeWindowCompaction,
};
pub use select::{ClusteringOrder, Select};
pub use term::{
    bind_marker, cast, column, count_all, difference, element, field, function, keyspace_function,
    list_of, literal, map_of, named_bind_marker, opposite, product, quotient, range, raw,
    remainder, set_of, star, sum, ttl, tuple_of, type_hint, typed_map_of, write_time, Term,
};
pub use update::{Assignment, AssignmentTarget, Update};

/// Start a SELECT on a table in the session's current keyspace.
pub fn select_from(table: impl Into<Identifier>) -> Select {
    Select::from(table)
}

/// Start a SELECT on a keyspace-qualified table.
pub fn select_from_keyspace(
    keyspace: impl Into<Identifier>,
    table: impl Into<Identifier>,
) -> Select {
    Select::from_keyspace(Some(keyspace), table)
}

/// Start a DELETE on a table in the session's current keyspace.
pub fn delete_from(table: impl Into<Identifier>) -> Delete {
    Delete::from(table)
}

/// Start a DELETE on a keyspace-qualified table.
pub fn delete_from_keyspace(
    keyspace: impl Into<Identifier>,
    table: impl Into<Identifier>,
) -> Delete {
    Delete::from_keyspace(Some(keyspace), table)
}

/// Start an UPDATE on a table in the session's current keyspace.
pub fn update(table: impl Into<Identifier>) -> Update {
    Update::table(table)
}

/// Start an UPDATE on a keyspace-qualified table.
pub fn update_keyspace(keyspace: impl Into<Identifier>, table: impl Into<Identifier>) -> Update {
    Update::keyspace_table(Some(keyspace), table)
}

/// Start a CREATE TABLE in the session's current keyspace.
pub fn create_table(table: impl Into<Identifier>) -> CreateTable {
    CreateTable::table(table)
}

/// Start a CREATE TABLE on a keyspace-qualified name.
pub fn create_table_in_keyspace(
    keyspace: impl Into<Identifier>,
    table: impl Into<Identifier>,
) -> CreateTable {
    CreateTable::keyspace_table(Some(keyspace), table)
}

/// Start a CREATE KEYSPACE.
pub fn create_keyspace(name: impl Into<Identifier>) -> CreateKeyspace {
    CreateKeyspace::keyspace(name)
}
