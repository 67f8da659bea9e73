//! DELETE statement builder.
//!
//! Deletions target either the whole row (empty selector list) or specific
//! columns, UDT fields and collection elements. The IF clause is tracked as
//! a single [`IfClause`] value, so `IF EXISTS` and column conditions can
//! never render together.
//!
//! ```
//! use cql_builder::delete::Delete;
//! use cql_builder::relation::is_column;
//! use cql_builder::term::bind_marker;
//!
//! let cql = Delete::from("foo")
//!     .where_(is_column("k").eq(bind_marker()).unwrap())
//!     .if_exists()
//!     .build();
//! assert_eq!(cql, "DELETE FROM foo WHERE k=? IF EXISTS");
//! ```

use crate::condition::{Condition, IfClause};
use crate::error::Result;
use crate::identifier::Identifier;
use crate::relation::Relation;
use crate::script::ScriptBuilder;
use crate::select::require_bind_marker;
use crate::term::{self, Term};
use serde::{Deserialize, Serialize};
use std::fmt;
#[cfg(feature = "bindings")]
use ts_rs::TS;

/// An immutable DELETE statement under construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "bindings", derive(TS))]
#[cfg_attr(feature = "bindings", ts(export))]
pub struct Delete {
    keyspace: Option<Identifier>,
    table: Identifier,
    /// Empty means a whole-row delete.
    selectors: Vec<Term>,
    relations: Vec<Relation>,
    timestamp: Option<Term>,
    if_clause: IfClause,
}

impl Delete {
    /// Start a DELETE on a table in the session's current keyspace.
    pub fn from(table: impl Into<Identifier>) -> Self {
        Self::from_keyspace(None::<Identifier>, table)
    }

    /// Start a DELETE on a keyspace-qualified table.
    pub fn from_keyspace(
        keyspace: Option<impl Into<Identifier>>,
        table: impl Into<Identifier>,
    ) -> Self {
        Delete {
            keyspace: keyspace.map(Into::into),
            table: table.into(),
            selectors: Vec::new(),
            relations: Vec::new(),
            timestamp: None,
            if_clause: IfClause::None,
        }
    }

    // -- deleted selectors --------------------------------------------------
    //
    // Only columns, UDT fields and collection elements can be deleted, so
    // the selector list grows through these three methods alone.

    /// Delete a column.
    pub fn column(mut self, name: impl Into<Identifier>) -> Self {
        self.selectors.push(term::column(name));
        self
    }

    /// Delete a field inside a UDT column.
    pub fn field(mut self, column: impl Into<Identifier>, field: impl Into<Identifier>) -> Self {
        self.selectors.push(Term::Field {
            base: Box::new(term::column(column)),
            field: field.into(),
        });
        self
    }

    /// Delete an element inside a collection column. Fails if the index is
    /// aliased.
    pub fn element(mut self, column: impl Into<Identifier>, index: Term) -> Result<Self> {
        self.selectors
            .push(term::element(term::column(column), index)?);
        Ok(self)
    }

    // -- clauses ------------------------------------------------------------

    /// Set the write timestamp (`USING TIMESTAMP n`). Last write wins.
    pub fn using_timestamp(mut self, timestamp: i64) -> Self {
        self.timestamp = Some(Term::Literal(timestamp.to_string()));
        self
    }

    /// Set the write timestamp from a bind marker. Last write wins.
    pub fn using_timestamp_bind_marker(mut self, marker: Term) -> Result<Self> {
        self.timestamp = Some(require_bind_marker(marker, "USING TIMESTAMP")?);
        Ok(self)
    }

    /// Append a WHERE relation. Relations are AND-joined in call order.
    pub fn where_(mut self, relation: Relation) -> Self {
        self.relations.push(relation);
        self
    }

    /// Append several WHERE relations at once.
    pub fn where_all(mut self, relations: impl IntoIterator<Item = Relation>) -> Self {
        self.relations.extend(relations);
        self
    }

    /// Make the deletion conditional on the row existing.
    ///
    /// Drops any previously accumulated column conditions.
    pub fn if_exists(mut self) -> Self {
        self.if_clause.set_exists();
        self
    }

    /// Append an IF condition. Drops a previously requested `IF EXISTS`.
    pub fn if_(mut self, condition: Condition) -> Self {
        self.if_clause.add(condition);
        self
    }

    /// Append several IF conditions at once.
    pub fn if_all(mut self, conditions: impl IntoIterator<Item = Condition>) -> Self {
        for condition in conditions {
            self.if_clause.add(condition);
        }
        self
    }

    // -- rendering ----------------------------------------------------------

    /// Render the statement compactly, on a single line.
    pub fn build(&self) -> String {
        self.render(false)
    }

    /// Render the statement with one clause per indented line.
    pub fn build_pretty(&self) -> String {
        self.render(true)
    }

    fn render(&self, pretty: bool) -> String {
        let mut script = ScriptBuilder::new(pretty);
        script.append("DELETE");

        if !self.selectors.is_empty() {
            script.increase_indent();
            for (i, selector) in self.selectors.iter().enumerate() {
                script.new_line().append(&selector.as_cql());
                if i < self.selectors.len() - 1 {
                    script.append(",");
                }
            }
            script.decrease_indent();
        }

        script.new_line().append("FROM ");
        if let Some(keyspace) = &self.keyspace {
            script.append(&keyspace.as_cql()).append(".");
        }
        script.append(&self.table.as_cql());

        if let Some(timestamp) = &self.timestamp {
            script
                .new_line()
                .append("USING TIMESTAMP ")
                .append(&timestamp.as_cql());
        }

        if !self.relations.is_empty() {
            script.new_line().append("WHERE ");
            for (i, relation) in self.relations.iter().enumerate() {
                if i > 0 {
                    script.append(" AND ");
                }
                script.append(&relation.as_cql());
            }
        }

        self.if_clause.write_cql(&mut script);
        script.build()
    }
}

impl fmt::Display for Delete {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.build())
    }
}
