//! SELECT statement builder.
//!
//! [`Select`] is an immutable accumulator: every transition consumes the
//! builder and returns a new value, so a snapshot can be cloned and extended
//! down two branches without either observing the other. Transitions that can
//! violate a selector invariant return [`Result`] and leave no partial state
//! behind on failure.
//!
//! ```
//! use cql_builder::select::Select;
//! use cql_builder::relation::is_column;
//! use cql_builder::term::literal;
//!
//! let cql = Select::from("user")
//!     .all()
//!     .where_(is_column("id").eq(literal(1).unwrap()).unwrap())
//!     .build();
//! assert_eq!(cql, "SELECT * FROM user WHERE id=1");
//! ```

use crate::error::{Error, Result};
use crate::identifier::Identifier;
use crate::literal::ToCqlLiteral;
use crate::relation::Relation;
use crate::script::ScriptBuilder;
use crate::term::{self, Term};
use serde::{Deserialize, Serialize};
use std::fmt;
#[cfg(feature = "bindings")]
use ts_rs::TS;

/// A clustering direction in an ORDER BY clause (and in table clustering
/// order declarations).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "bindings", derive(TS))]
#[cfg_attr(feature = "bindings", ts(export))]
#[serde(rename_all = "snake_case")]
pub enum ClusteringOrder {
    Asc,
    Desc,
}

impl ClusteringOrder {
    pub fn as_cql(self) -> &'static str {
        match self {
            ClusteringOrder::Asc => "ASC",
            ClusteringOrder::Desc => "DESC",
        }
    }
}

/// What the statement projects. The star form and an explicit list are
/// mutually exclusive by construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "bindings", derive(TS))]
#[cfg_attr(feature = "bindings", ts(export))]
#[serde(rename_all = "snake_case")]
enum Selection {
    Star,
    List(Vec<Term>),
}

/// An immutable SELECT statement under construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "bindings", derive(TS))]
#[cfg_attr(feature = "bindings", ts(export))]
pub struct Select {
    keyspace: Option<Identifier>,
    table: Identifier,
    json: bool,
    distinct: bool,
    selection: Selection,
    relations: Vec<Relation>,
    group_by: Vec<Term>,
    orderings: Vec<(Identifier, ClusteringOrder)>,
    limit: Option<Term>,
    per_partition_limit: Option<Term>,
    allow_filtering: bool,
}

impl Select {
    /// Start a SELECT on a table in the session's current keyspace.
    pub fn from(table: impl Into<Identifier>) -> Self {
        Self::from_keyspace(None::<Identifier>, table)
    }

    /// Start a SELECT on a keyspace-qualified table.
    pub fn from_keyspace(
        keyspace: Option<impl Into<Identifier>>,
        table: impl Into<Identifier>,
    ) -> Self {
        Select {
            keyspace: keyspace.map(Into::into),
            table: table.into(),
            json: false,
            distinct: false,
            selection: Selection::List(Vec::new()),
            relations: Vec::new(),
            group_by: Vec::new(),
            orderings: Vec::new(),
            limit: None,
            per_partition_limit: None,
            allow_filtering: false,
        }
    }

    /// Request JSON-encoded rows (`SELECT JSON ...`).
    pub fn json(mut self) -> Self {
        self.json = true;
        self
    }

    /// Request distinct partition rows (`SELECT DISTINCT ...`).
    pub fn distinct(mut self) -> Self {
        self.distinct = true;
        self
    }

    // -- selectors ----------------------------------------------------------

    /// Select the whole row (`*`), discarding any previously added selectors.
    pub fn all(mut self) -> Self {
        self.selection = Selection::Star;
        self
    }

    /// Add one selector.
    ///
    /// A star selector replaces the whole list (same as [`Select::all`]); any
    /// other selector added after a star discards the star.
    pub fn selector(mut self, selector: Term) -> Self {
        if matches!(selector, Term::Star) {
            return self.all();
        }
        match &mut self.selection {
            Selection::Star => self.selection = Selection::List(vec![selector]),
            Selection::List(list) => list.push(selector),
        }
        self
    }

    /// Add several selectors at once.
    ///
    /// Fails without touching the builder if the list contains a star
    /// selector; a star may only be added alone, via [`Select::all`].
    pub fn selectors(mut self, selectors: impl IntoIterator<Item = Term>) -> Result<Self> {
        let selectors: Vec<Term> = selectors.into_iter().collect();
        if selectors.iter().any(|s| matches!(s, Term::Star)) {
            return Err(Error::invalid_selector(
                "can't add the * selector as part of a list, use all() instead",
            ));
        }
        for selector in selectors {
            self = self.selector(selector);
        }
        Ok(self)
    }

    /// Alias the last added selector, as in `SELECT count(c) AS total`.
    ///
    /// Fails when no selector has been added, when the selection is the star,
    /// or when the last selector cannot carry an alias. Aliasing twice in a
    /// row keeps only the last alias.
    pub fn as_alias(mut self, alias: impl Into<Identifier>) -> Result<Self> {
        match &mut self.selection {
            Selection::Star => Err(Error::invalid_alias("can't alias the * selector")),
            Selection::List(list) => {
                // The last selector is only replaced once the alias is known
                // to be legal, so a failure leaves the selection untouched.
                let aliased = list
                    .last()
                    .cloned()
                    .ok_or_else(|| Error::invalid_alias("no selector to alias"))?
                    .alias(alias)?;
                list.pop();
                list.push(aliased);
                Ok(self)
            }
        }
    }

    /// Shortcut for selecting a single column.
    pub fn column(self, name: impl Into<Identifier>) -> Self {
        self.selector(term::column(name))
    }

    /// Shortcut for selecting several columns.
    pub fn columns<I>(mut self, names: impl IntoIterator<Item = I>) -> Self
    where
        I: Into<Identifier>,
    {
        for name in names {
            self = self.column(name);
        }
        self
    }

    /// Shortcut for selecting `count(*)`.
    pub fn count_all(self) -> Self {
        self.selector(term::count_all())
    }

    /// Shortcut for selecting an inlined literal.
    pub fn literal(self, value: impl ToCqlLiteral) -> Result<Self> {
        Ok(self.selector(term::literal(value)?))
    }

    /// Shortcut for selecting a raw CQL snippet, appended verbatim.
    pub fn raw(self, snippet: impl Into<String>) -> Self {
        self.selector(term::raw(snippet))
    }

    /// Shortcut for selecting a function call.
    pub fn function(
        self,
        name: impl Into<Identifier>,
        args: impl IntoIterator<Item = Term>,
    ) -> Result<Self> {
        Ok(self.selector(term::function(name, args)?))
    }

    /// Shortcut for selecting `writetime(column)`.
    pub fn write_time(self, column: impl Into<Identifier>) -> Self {
        self.selector(term::write_time(column))
    }

    /// Shortcut for selecting `ttl(column)`.
    pub fn ttl(self, column: impl Into<Identifier>) -> Self {
        self.selector(term::ttl(column))
    }

    // -- clauses ------------------------------------------------------------

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

    /// Append a GROUP BY expression. Fails if the expression is aliased.
    pub fn group_by(mut self, grouping: Term) -> Result<Self> {
        term::reject_alias(&grouping, "a grouping expression")?;
        self.group_by.push(grouping);
        Ok(self)
    }

    /// Shortcut for grouping by a column.
    pub fn group_by_column(mut self, name: impl Into<Identifier>) -> Self {
        self.group_by.push(term::column(name));
        self
    }

    /// Append an ORDER BY entry for a column.
    ///
    /// Re-ordering an already-present column removes its old entry and
    /// appends the new one at the end; iteration order is insertion order
    /// and is significant in the rendered clause.
    pub fn order_by(mut self, column: impl Into<Identifier>, order: ClusteringOrder) -> Self {
        let column = column.into();
        self.orderings.retain(|(existing, _)| *existing != column);
        self.orderings.push((column, order));
        self
    }

    /// Set a literal LIMIT. Overwrites any previous limit.
    ///
    /// Fails at call time on a non-positive value.
    pub fn limit(mut self, limit: i64) -> Result<Self> {
        self.limit = Some(positive_limit(limit, "LIMIT")?);
        Ok(self)
    }

    /// Set the LIMIT from a bind marker. Overwrites any previous limit.
    pub fn limit_bind_marker(mut self, marker: Term) -> Result<Self> {
        self.limit = Some(require_bind_marker(marker, "LIMIT")?);
        Ok(self)
    }

    /// Set a literal PER PARTITION LIMIT. Overwrites any previous value.
    pub fn per_partition_limit(mut self, limit: i64) -> Result<Self> {
        self.per_partition_limit = Some(positive_limit(limit, "PER PARTITION LIMIT")?);
        Ok(self)
    }

    /// Set the PER PARTITION LIMIT from a bind marker.
    pub fn per_partition_limit_bind_marker(mut self, marker: Term) -> Result<Self> {
        self.per_partition_limit = Some(require_bind_marker(marker, "PER PARTITION LIMIT")?);
        Ok(self)
    }

    /// Add ALLOW FILTERING. Idempotent.
    pub fn allow_filtering(mut self) -> Self {
        self.allow_filtering = true;
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
        script.append("SELECT");
        if self.json {
            script.append(" JSON");
        }
        if self.distinct {
            script.append(" DISTINCT");
        }

        script.increase_indent();
        match &self.selection {
            Selection::Star => {
                script.new_line().append("*");
            }
            // An empty list selects the whole row, same as the star.
            Selection::List(list) if list.is_empty() => {
                script.new_line().append("*");
            }
            Selection::List(list) => {
                for (i, selector) in list.iter().enumerate() {
                    script.new_line().append(&selector.as_cql());
                    if i < list.len() - 1 {
                        script.append(",");
                    }
                }
            }
        }
        script.decrease_indent();

        script.new_line().append("FROM ");
        if let Some(keyspace) = &self.keyspace {
            script.append(&keyspace.as_cql()).append(".");
        }
        script.append(&self.table.as_cql());

        if !self.relations.is_empty() {
            script.new_line().append("WHERE ");
            for (i, relation) in self.relations.iter().enumerate() {
                if i > 0 {
                    script.append(" AND ");
                }
                script.append(&relation.as_cql());
            }
        }

        if !self.group_by.is_empty() {
            script.new_line().append("GROUP BY ");
            for (i, grouping) in self.group_by.iter().enumerate() {
                if i > 0 {
                    script.append(",");
                }
                script.append(&grouping.as_cql());
            }
        }

        if !self.orderings.is_empty() {
            script.new_line().append("ORDER BY ");
            for (i, (column, order)) in self.orderings.iter().enumerate() {
                if i > 0 {
                    script.append(",");
                }
                script.append(&column.as_cql()).append(" ").append(order.as_cql());
            }
        }

        if let Some(limit) = &self.limit {
            script.new_line().append("LIMIT ").append(&limit.as_cql());
        }
        if let Some(limit) = &self.per_partition_limit {
            script
                .new_line()
                .append("PER PARTITION LIMIT ")
                .append(&limit.as_cql());
        }
        if self.allow_filtering {
            script.new_line().append("ALLOW FILTERING");
        }

        script.build()
    }
}

impl fmt::Display for Select {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.build())
    }
}

pub(crate) fn positive_limit(limit: i64, clause: &str) -> Result<Term> {
    if limit <= 0 {
        return Err(Error::invalid_argument(format!(
            "{clause} must be strictly positive, got {limit}"
        )));
    }
    Ok(Term::Literal(limit.to_string()))
}

pub(crate) fn require_bind_marker(marker: Term, clause: &str) -> Result<Term> {
    if !marker.is_bind_marker() {
        return Err(Error::invalid_argument(format!(
            "{clause} only accepts a literal or a bind marker"
        )));
    }
    Ok(marker)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::relation::is_column;
    use crate::term::{bind_marker, column, literal, star};

    #[test]
    fn star_replaces_and_is_replaced() {
        let base = Select::from("foo");
        assert_eq!(
            base.clone().columns(["a", "b"]).all().build(),
            "SELECT * FROM foo"
        );
        assert_eq!(
            base.clone().all().column("a").build(),
            "SELECT a FROM foo"
        );
        // The single-selector path treats a star like all().
        assert_eq!(
            base.columns(["a", "b"]).selector(star()).build(),
            "SELECT * FROM foo"
        );
    }

    #[test]
    fn bulk_add_rejects_star_without_mutation() {
        let base = Select::from("foo").column("a");
        let result = base.clone().selectors([column("b"), star()]);
        assert!(result.is_err());
        assert_eq!(base.build(), "SELECT a FROM foo");
    }

    #[test]
    fn alias_applies_to_last_selector() {
        let select = Select::from("foo")
            .column("a")
            .write_time("v")
            .as_alias("total")
            .unwrap();
        assert_eq!(select.build(), "SELECT a,writetime(v) AS total FROM foo");
    }

    #[test]
    fn alias_fails_on_star_or_empty_selection() {
        assert!(Select::from("foo").as_alias("x").is_err());
        assert!(Select::from("foo").all().as_alias("x").is_err());
    }

    #[test]
    fn failed_alias_leaves_selection_intact() {
        // A raw snippet can never carry an alias.
        let base = Select::from("foo").column("a").raw("b + c");
        assert!(base.clone().as_alias("x").is_err());
        assert_eq!(base.build(), "SELECT a,b + c FROM foo");
    }

    #[test]
    fn alias_twice_keeps_last() {
        let select = Select::from("foo")
            .count_all()
            .as_alias("allthethings");
        // count(*) cannot be aliased at all.
        assert!(select.is_err());

        let select = Select::from("foo")
            .column("bar")
            .as_alias("c1")
            .unwrap()
            .as_alias("c2")
            .unwrap();
        assert_eq!(select.build(), "SELECT bar AS c2 FROM foo");
    }

    #[test]
    fn renders_clauses_in_fixed_order() {
        let select = Select::from_keyspace(Some("ks"), "foo")
            .json()
            .distinct()
            .column("a")
            .where_(is_column("k").eq(bind_marker()).unwrap())
            .group_by_column("a")
            .order_by("c", ClusteringOrder::Asc)
            .order_by("d", ClusteringOrder::Desc)
            .limit(10)
            .unwrap()
            .per_partition_limit(2)
            .unwrap()
            .allow_filtering();
        assert_eq!(
            select.build(),
            "SELECT JSON DISTINCT a FROM ks.foo WHERE k=? GROUP BY a \
             ORDER BY c ASC,d DESC LIMIT 10 PER PARTITION LIMIT 2 ALLOW FILTERING"
        );
    }

    #[test]
    fn reordering_a_column_moves_it_to_the_end() {
        let select = Select::from("foo")
            .all()
            .order_by("c1", ClusteringOrder::Asc)
            .order_by("c2", ClusteringOrder::Desc)
            .order_by("c1", ClusteringOrder::Desc);
        assert_eq!(
            select.build(),
            "SELECT * FROM foo ORDER BY c2 DESC,c1 DESC"
        );
    }

    #[test]
    fn limit_validation_and_overwrite() {
        assert!(Select::from("foo").all().limit(0).is_err());
        assert!(Select::from("foo").all().limit(-5).is_err());
        let select = Select::from("foo")
            .all()
            .limit(10)
            .unwrap()
            .limit(20)
            .unwrap();
        assert_eq!(select.build(), "SELECT * FROM foo LIMIT 20");

        let select = Select::from("foo")
            .all()
            .limit(10)
            .unwrap()
            .limit_bind_marker(bind_marker())
            .unwrap();
        assert_eq!(select.build(), "SELECT * FROM foo LIMIT ?");
        assert!(Select::from("foo")
            .all()
            .limit_bind_marker(column("l"))
            .is_err());
    }

    #[test]
    fn end_to_end_examples() {
        let cql = Select::from("user")
            .all()
            .where_(is_column("id").eq(literal(1).unwrap()).unwrap())
            .build();
        assert_eq!(cql, "SELECT * FROM user WHERE id=1");

        let cql = Select::from("sensor_data")
            .column("reading")
            .where_(is_column("id").eq(bind_marker()).unwrap())
            .limit(10)
            .unwrap()
            .build();
        assert_eq!(cql, "SELECT reading FROM sensor_data WHERE id=? LIMIT 10");
    }

    #[test]
    fn snapshot_branching_is_independent() {
        let base = Select::from("foo").column("a");
        let left = base.clone().column("b");
        let right = base.clone().where_(is_column("k").eq(bind_marker()).unwrap());
        assert_eq!(base.build(), "SELECT a FROM foo");
        assert_eq!(left.build(), "SELECT a,b FROM foo");
        assert_eq!(right.build(), "SELECT a FROM foo WHERE k=?");
    }

    #[test]
    fn pretty_mode_puts_clauses_on_indented_lines() {
        let select = Select::from("foo")
            .columns(["a", "b"])
            .where_(is_column("k").eq(bind_marker()).unwrap());
        assert_eq!(
            select.build_pretty(),
            "SELECT\n  a,\n  b\nFROM foo\nWHERE k=?"
        );
    }
}
