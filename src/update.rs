//! UPDATE statement builder.
//!
//! An UPDATE accumulates [`Assignment`]s plus the same WHERE and IF
//! machinery DELETE uses. Assignments cover plain writes (`c=?`), counter
//! arithmetic (`c+=1`) and the collection concatenation forms (`l+=[?]`,
//! `l=[?]+l`, `m+={?:?}`).
//!
//! ```
//! use cql_builder::update::{Assignment, Update};
//! use cql_builder::relation::is_column;
//! use cql_builder::term::{bind_marker, literal};
//!
//! let cql = Update::table("foo")
//!     .set(Assignment::set_column("v", bind_marker()).unwrap())
//!     .where_(is_column("k").eq(literal(1).unwrap()).unwrap())
//!     .build();
//! assert_eq!(cql, "UPDATE foo SET v=? WHERE k=1");
//! ```

use crate::condition::{Condition, IfClause};
use crate::error::Result;
use crate::identifier::Identifier;
use crate::relation::Relation;
use crate::script::ScriptBuilder;
use crate::select::require_bind_marker;
use crate::term::{reject_alias, Term};
use serde::{Deserialize, Serialize};
use std::fmt;
#[cfg(feature = "bindings")]
use ts_rs::TS;

/// Where a plain assignment writes to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "bindings", derive(TS))]
#[cfg_attr(feature = "bindings", ts(export))]
#[serde(rename_all = "snake_case")]
pub enum AssignmentTarget {
    /// A column, rendered `c`.
    Column(Identifier),
    /// A UDT field, rendered `c.field`.
    Field { column: Identifier, field: Identifier },
    /// A map entry, rendered `c[key]`.
    MapValue { column: Identifier, key: Term },
}

impl AssignmentTarget {
    fn write_cql(&self, out: &mut String) {
        match self {
            AssignmentTarget::Column(column) => out.push_str(&column.as_cql()),
            AssignmentTarget::Field { column, field } => {
                out.push_str(&column.as_cql());
                out.push('.');
                out.push_str(&field.as_cql());
            }
            AssignmentTarget::MapValue { column, key } => {
                out.push_str(&column.as_cql());
                out.push('[');
                key.write_cql(out);
                out.push(']');
            }
        }
    }
}

/// A single SET clause entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "bindings", derive(TS))]
#[cfg_attr(feature = "bindings", ts(export))]
#[serde(rename_all = "snake_case")]
pub enum Assignment {
    /// `target=value`.
    Set { target: AssignmentTarget, value: Term },
    /// `c+=value`. Covers counter increments and whole-collection appends.
    Append { column: Identifier, value: Term },
    /// `c-=value`.
    Subtract { column: Identifier, value: Term },
    /// `l+=[value]`.
    AppendListElement { column: Identifier, value: Term },
    /// `s+={value}`.
    AppendSetElement { column: Identifier, value: Term },
    /// `m+={key:value}`.
    AppendMapEntry {
        column: Identifier,
        key: Term,
        value: Term,
    },
    /// `c=value+c`. The value must be a collection of the column's type.
    Prepend { column: Identifier, value: Term },
    /// `l=[value]+l`.
    PrependListElement { column: Identifier, value: Term },
    /// `s={value}+s`.
    PrependSetElement { column: Identifier, value: Term },
    /// `m={key:value}+m`.
    PrependMapEntry {
        column: Identifier,
        key: Term,
        value: Term,
    },
}

impl Assignment {
    /// Assign a value to a column, as in `SET c=?`.
    ///
    /// Like every assignment constructor taking terms, fails if a term is
    /// aliased; aliases only belong on top-level selectors.
    pub fn set_column(column: impl Into<Identifier>, value: Term) -> Result<Self> {
        reject_alias(&value, "an assignment value")?;
        Ok(Assignment::Set {
            target: AssignmentTarget::Column(column.into()),
            value,
        })
    }

    /// Assign a value to a UDT field, as in `SET address.zip=?`.
    pub fn set_field(
        column: impl Into<Identifier>,
        field: impl Into<Identifier>,
        value: Term,
    ) -> Result<Self> {
        reject_alias(&value, "an assignment value")?;
        Ok(Assignment::Set {
            target: AssignmentTarget::Field {
                column: column.into(),
                field: field.into(),
            },
            value,
        })
    }

    /// Assign a value to a map entry, as in `SET m[?]=?`.
    pub fn set_map_value(column: impl Into<Identifier>, key: Term, value: Term) -> Result<Self> {
        reject_alias(&key, "a map entry key")?;
        reject_alias(&value, "an assignment value")?;
        Ok(Assignment::Set {
            target: AssignmentTarget::MapValue {
                column: column.into(),
                key,
            },
            value,
        })
    }

    /// Increment a counter by one, as in `SET c+=1`.
    pub fn increment(column: impl Into<Identifier>) -> Self {
        Assignment::Append {
            column: column.into(),
            value: Term::Literal("1".into()),
        }
    }

    /// Increment a counter, as in `SET c+=?`.
    pub fn increment_by(column: impl Into<Identifier>, amount: Term) -> Result<Self> {
        reject_alias(&amount, "an assignment value")?;
        Ok(Assignment::Append {
            column: column.into(),
            value: amount,
        })
    }

    /// Decrement a counter by one, as in `SET c-=1`.
    pub fn decrement(column: impl Into<Identifier>) -> Self {
        Assignment::Subtract {
            column: column.into(),
            value: Term::Literal("1".into()),
        }
    }

    /// Decrement a counter, as in `SET c-=?`.
    pub fn decrement_by(column: impl Into<Identifier>, amount: Term) -> Result<Self> {
        reject_alias(&amount, "an assignment value")?;
        Ok(Assignment::Subtract {
            column: column.into(),
            value: amount,
        })
    }

    /// Append a collection to a collection column, as in `SET l+=?`.
    pub fn append(column: impl Into<Identifier>, suffix: Term) -> Result<Self> {
        reject_alias(&suffix, "an assignment value")?;
        Ok(Assignment::Append {
            column: column.into(),
            value: suffix,
        })
    }

    /// Append one element to a list column, as in `SET l+=[?]`.
    pub fn append_list_element(column: impl Into<Identifier>, element: Term) -> Result<Self> {
        reject_alias(&element, "an assignment value")?;
        Ok(Assignment::AppendListElement {
            column: column.into(),
            value: element,
        })
    }

    /// Append one element to a set column, as in `SET s+={?}`.
    pub fn append_set_element(column: impl Into<Identifier>, element: Term) -> Result<Self> {
        reject_alias(&element, "an assignment value")?;
        Ok(Assignment::AppendSetElement {
            column: column.into(),
            value: element,
        })
    }

    /// Append one entry to a map column, as in `SET m+={?:?}`.
    pub fn append_map_entry(column: impl Into<Identifier>, key: Term, value: Term) -> Result<Self> {
        reject_alias(&key, "a map entry key")?;
        reject_alias(&value, "an assignment value")?;
        Ok(Assignment::AppendMapEntry {
            column: column.into(),
            key,
            value,
        })
    }

    /// Prepend a collection to a collection column, as in `SET l=[1,2,3]+l`.
    pub fn prepend(column: impl Into<Identifier>, prefix: Term) -> Result<Self> {
        reject_alias(&prefix, "an assignment value")?;
        Ok(Assignment::Prepend {
            column: column.into(),
            value: prefix,
        })
    }

    /// Prepend one element to a list column, as in `SET l=[?]+l`.
    pub fn prepend_list_element(column: impl Into<Identifier>, element: Term) -> Result<Self> {
        reject_alias(&element, "an assignment value")?;
        Ok(Assignment::PrependListElement {
            column: column.into(),
            value: element,
        })
    }

    /// Prepend one element to a set column, as in `SET s={?}+s`.
    pub fn prepend_set_element(column: impl Into<Identifier>, element: Term) -> Result<Self> {
        reject_alias(&element, "an assignment value")?;
        Ok(Assignment::PrependSetElement {
            column: column.into(),
            value: element,
        })
    }

    /// Prepend one entry to a map column, as in `SET m={?:?}+m`.
    pub fn prepend_map_entry(column: impl Into<Identifier>, key: Term, value: Term) -> Result<Self> {
        reject_alias(&key, "a map entry key")?;
        reject_alias(&value, "an assignment value")?;
        Ok(Assignment::PrependMapEntry {
            column: column.into(),
            key,
            value,
        })
    }

    /// Render the assignment's exact CQL form.
    pub fn as_cql(&self) -> String {
        let mut out = String::new();
        self.write_cql(&mut out);
        out
    }

    fn write_cql(&self, out: &mut String) {
        match self {
            Assignment::Set { target, value } => {
                target.write_cql(out);
                out.push('=');
                value.write_cql(out);
            }
            Assignment::Append { column, value } => {
                out.push_str(&column.as_cql());
                out.push_str("+=");
                value.write_cql(out);
            }
            Assignment::Subtract { column, value } => {
                out.push_str(&column.as_cql());
                out.push_str("-=");
                value.write_cql(out);
            }
            Assignment::AppendListElement { column, value } => {
                out.push_str(&column.as_cql());
                out.push_str("+=[");
                value.write_cql(out);
                out.push(']');
            }
            Assignment::AppendSetElement { column, value } => {
                out.push_str(&column.as_cql());
                out.push_str("+={");
                value.write_cql(out);
                out.push('}');
            }
            Assignment::AppendMapEntry { column, key, value } => {
                out.push_str(&column.as_cql());
                out.push_str("+={");
                key.write_cql(out);
                out.push(':');
                value.write_cql(out);
                out.push('}');
            }
            Assignment::Prepend { column, value } => {
                let column = column.as_cql();
                out.push_str(&column);
                out.push('=');
                value.write_cql(out);
                out.push('+');
                out.push_str(&column);
            }
            Assignment::PrependListElement { column, value } => {
                let column = column.as_cql();
                out.push_str(&column);
                out.push_str("=[");
                value.write_cql(out);
                out.push_str("]+");
                out.push_str(&column);
            }
            Assignment::PrependSetElement { column, value } => {
                let column = column.as_cql();
                out.push_str(&column);
                out.push_str("={");
                value.write_cql(out);
                out.push_str("}+");
                out.push_str(&column);
            }
            Assignment::PrependMapEntry { column, key, value } => {
                let column = column.as_cql();
                out.push_str(&column);
                out.push_str("={");
                key.write_cql(out);
                out.push(':');
                value.write_cql(out);
                out.push_str("}+");
                out.push_str(&column);
            }
        }
    }
}

impl fmt::Display for Assignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_cql())
    }
}

/// An immutable UPDATE statement under construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "bindings", derive(TS))]
#[cfg_attr(feature = "bindings", ts(export))]
pub struct Update {
    keyspace: Option<Identifier>,
    table: Identifier,
    timestamp: Option<Term>,
    assignments: Vec<Assignment>,
    relations: Vec<Relation>,
    if_clause: IfClause,
}

impl Update {
    /// Start an UPDATE on a table in the session's current keyspace.
    pub fn table(table: impl Into<Identifier>) -> Self {
        Self::keyspace_table(None::<Identifier>, table)
    }

    /// Start an UPDATE on a keyspace-qualified table.
    pub fn keyspace_table(
        keyspace: Option<impl Into<Identifier>>,
        table: impl Into<Identifier>,
    ) -> Self {
        Update {
            keyspace: keyspace.map(Into::into),
            table: table.into(),
            timestamp: None,
            assignments: Vec::new(),
            relations: Vec::new(),
            if_clause: IfClause::None,
        }
    }

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

    /// Append an assignment to the SET clause.
    pub fn set(mut self, assignment: Assignment) -> Self {
        self.assignments.push(assignment);
        self
    }

    /// Append several assignments at once.
    pub fn set_all(mut self, assignments: impl IntoIterator<Item = Assignment>) -> Self {
        self.assignments.extend(assignments);
        self
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

    /// Make the update conditional on the row existing.
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
        script.append("UPDATE ");
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

        if !self.assignments.is_empty() {
            script.new_line().append("SET");
            script.increase_indent();
            for (i, assignment) in self.assignments.iter().enumerate() {
                script.new_line().append(&assignment.as_cql());
                if i < self.assignments.len() - 1 {
                    script.append(",");
                }
            }
            script.decrease_indent();
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

impl fmt::Display for Update {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.build())
    }
}
