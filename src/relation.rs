//! WHERE clause predicates.
//!
//! A [`Relation`] is the triple `lhs operator rhs`; the right-hand side is
//! absent for `IS NOT NULL`. [`LeftHandSide`] enumerates everything a
//! relation can test, so a nested left-hand side is unrepresentable.
//!
//! Relations start from one of the `is_*` functions and finish with a
//! comparison method:
//!
//! ```
//! use cql_builder::relation::{is_column, is_token};
//! use cql_builder::term::{bind_marker, literal};
//!
//! let r = is_column("k").eq(literal(1).unwrap()).unwrap();
//! assert_eq!(r.as_cql(), "k=1");
//!
//! let r = is_token(["pk1", "pk2"]).gt(bind_marker()).unwrap();
//! assert_eq!(r.as_cql(), "token(pk1,pk2)>?");
//! ```
//!
//! Completing a relation fails if the right-hand side (or an element index on
//! the left) carries an alias; aliases only belong on top-level selectors.

use crate::error::{Error, Result};
use crate::identifier::Identifier;
use crate::operator::Operator;
use crate::term::{reject_alias, tuple_of, Term};
use serde::{Deserialize, Serialize};
use std::fmt;
#[cfg(feature = "bindings")]
use ts_rs::TS;

/// The tested side of a relation or condition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "bindings", derive(TS))]
#[cfg_attr(feature = "bindings", ts(export))]
#[serde(rename_all = "snake_case")]
pub enum LeftHandSide {
    /// A plain column, rendered `c`.
    Column(Identifier),
    /// A UDT field, rendered `c.field`.
    Field { column: Identifier, field: Identifier },
    /// A collection element, rendered `c[index]`.
    Element { column: Identifier, index: Term },
    /// A token of one or more columns, rendered `token(c1,c2)`.
    Token(Vec<Identifier>),
    /// A column tuple, rendered `(c1,c2,c3)`.
    Tuple(Vec<Identifier>),
    /// A named custom-index probe, rendered `expr(index,expression)`.
    ///
    /// The expression is an unvalidated escape hatch, like a raw snippet.
    CustomIndex { index: Identifier, expression: Term },
}

impl LeftHandSide {
    pub(crate) fn write_cql(&self, out: &mut String) {
        match self {
            LeftHandSide::Column(column) => out.push_str(&column.as_cql()),
            LeftHandSide::Field { column, field } => {
                out.push_str(&column.as_cql());
                out.push('.');
                out.push_str(&field.as_cql());
            }
            LeftHandSide::Element { column, index } => {
                out.push_str(&column.as_cql());
                out.push('[');
                out.push_str(&index.as_cql());
                out.push(']');
            }
            LeftHandSide::Token(columns) => {
                out.push_str("token(");
                write_identifiers(columns, out);
                out.push(')');
            }
            LeftHandSide::Tuple(columns) => {
                out.push('(');
                write_identifiers(columns, out);
                out.push(')');
            }
            LeftHandSide::CustomIndex { index, expression } => {
                out.push_str("expr(");
                out.push_str(&index.as_cql());
                out.push(',');
                expression.write_cql(out);
                out.push(')');
            }
        }
    }
}

fn write_identifiers(identifiers: &[Identifier], out: &mut String) {
    for (i, id) in identifiers.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push_str(&id.as_cql());
    }
}

/// A single WHERE predicate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "bindings", derive(TS))]
#[cfg_attr(feature = "bindings", ts(export))]
pub struct Relation {
    pub lhs: LeftHandSide,
    /// Absent only for the custom-index probe, which is its own predicate.
    pub operator: Option<Operator>,
    /// Absent when the operator takes no right-hand side.
    pub rhs: Option<Term>,
}

impl Relation {
    /// Render the predicate's exact CQL form.
    pub fn as_cql(&self) -> String {
        let mut out = String::new();
        self.write_cql(&mut out);
        out
    }

    pub(crate) fn write_cql(&self, out: &mut String) {
        self.lhs.write_cql(out);
        if let Some(operator) = self.operator {
            out.push_str(operator.as_cql());
        }
        if let Some(rhs) = &self.rhs {
            rhs.write_cql(out);
        }
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_cql())
    }
}

/// An in-progress relation: a left-hand side waiting for its operator.
#[derive(Debug, Clone)]
pub struct RelationBuilder {
    lhs: LeftHandSide,
}

/// Start a relation on a plain column.
pub fn is_column(name: impl Into<Identifier>) -> RelationBuilder {
    RelationBuilder {
        lhs: LeftHandSide::Column(name.into()),
    }
}

/// Start a relation on a UDT field.
pub fn is_field(column: impl Into<Identifier>, field: impl Into<Identifier>) -> RelationBuilder {
    RelationBuilder {
        lhs: LeftHandSide::Field {
            column: column.into(),
            field: field.into(),
        },
    }
}

/// Start a relation on a collection element.
pub fn is_element(column: impl Into<Identifier>, index: Term) -> RelationBuilder {
    RelationBuilder {
        lhs: LeftHandSide::Element {
            column: column.into(),
            index,
        },
    }
}

/// Start a relation on a token computed from partition columns.
pub fn is_token<I>(columns: impl IntoIterator<Item = I>) -> RelationBuilder
where
    I: Into<Identifier>,
{
    RelationBuilder {
        lhs: LeftHandSide::Token(columns.into_iter().map(Into::into).collect()),
    }
}

/// Start a relation on a tuple of columns.
pub fn is_tuple<I>(columns: impl IntoIterator<Item = I>) -> RelationBuilder
where
    I: Into<Identifier>,
{
    RelationBuilder {
        lhs: LeftHandSide::Tuple(columns.into_iter().map(Into::into).collect()),
    }
}

/// A relation on a custom index: `expr(index,expression)`.
///
/// The expression is passed through unvalidated; malformed contents surface
/// only when the statement is executed.
pub fn is_custom_index(index: impl Into<Identifier>, expression: Term) -> Relation {
    Relation {
        lhs: LeftHandSide::CustomIndex {
            index: index.into(),
            expression,
        },
        operator: None,
        rhs: None,
    }
}

impl RelationBuilder {
    fn finish(self, operator: Operator, rhs: Option<Term>) -> Result<Relation> {
        if let LeftHandSide::Element { index, .. } = &self.lhs {
            reject_alias(index, "an element index")?;
        }
        if let Some(rhs) = &rhs {
            reject_alias(rhs, "a relation right-hand side")?;
        }
        Ok(Relation {
            lhs: self.lhs,
            operator: Some(operator),
            rhs,
        })
    }

    pub fn eq(self, rhs: Term) -> Result<Relation> {
        self.finish(Operator::Eq, Some(rhs))
    }

    pub fn lt(self, rhs: Term) -> Result<Relation> {
        self.finish(Operator::Lt, Some(rhs))
    }

    pub fn lte(self, rhs: Term) -> Result<Relation> {
        self.finish(Operator::Lte, Some(rhs))
    }

    pub fn gt(self, rhs: Term) -> Result<Relation> {
        self.finish(Operator::Gt, Some(rhs))
    }

    pub fn gte(self, rhs: Term) -> Result<Relation> {
        self.finish(Operator::Gte, Some(rhs))
    }

    pub fn ne(self, rhs: Term) -> Result<Relation> {
        self.finish(Operator::Ne, Some(rhs))
    }

    pub fn like(self, rhs: Term) -> Result<Relation> {
        self.finish(Operator::Like, Some(rhs))
    }

    pub fn contains(self, rhs: Term) -> Result<Relation> {
        self.finish(Operator::Contains, Some(rhs))
    }

    pub fn contains_key(self, rhs: Term) -> Result<Relation> {
        self.finish(Operator::ContainsKey, Some(rhs))
    }

    /// `lhs IS NOT NULL`. The only operator with no right-hand side.
    pub fn is_not_null(self) -> Result<Relation> {
        self.finish(Operator::IsNotNull, None)
    }

    /// `lhs IN (a1,a2,...)` with explicit alternatives.
    ///
    /// Fails if any alternative is aliased.
    pub fn in_(self, alternatives: impl IntoIterator<Item = Term>) -> Result<Relation> {
        let alternatives = tuple_of(alternatives)?;
        self.finish(Operator::In, Some(alternatives))
    }

    /// `lhs IN ?` with the whole alternative list bound at execution time.
    ///
    /// The right-hand side must be a bind marker; a plain term would render
    /// an `IN` with no parenthesized alternatives.
    pub fn in_bind_marker(self, marker: Term) -> Result<Relation> {
        if !marker.is_bind_marker() {
            return Err(Error::invalid_argument(
                "the right-hand side of a bare IN must be a bind marker",
            ));
        }
        self.finish(Operator::In, Some(marker))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::term::{bind_marker, column, literal, named_bind_marker};

    #[test]
    fn renders_simple_relations() {
        assert_eq!(
            is_column("k").eq(literal(1).unwrap()).unwrap().as_cql(),
            "k=1"
        );
        assert_eq!(is_column("k").lt(bind_marker()).unwrap().as_cql(), "k<?");
        assert_eq!(is_column("k").lte(bind_marker()).unwrap().as_cql(), "k<=?");
        assert_eq!(is_column("k").gt(bind_marker()).unwrap().as_cql(), "k>?");
        assert_eq!(is_column("k").gte(bind_marker()).unwrap().as_cql(), "k>=?");
        assert_eq!(is_column("k").ne(bind_marker()).unwrap().as_cql(), "k!=?");
        assert_eq!(
            is_column("k").like(literal("a%").unwrap()).unwrap().as_cql(),
            "k LIKE 'a%'"
        );
        assert_eq!(
            is_column("k").is_not_null().unwrap().as_cql(),
            "k IS NOT NULL"
        );
    }

    #[test]
    fn renders_component_left_hand_sides() {
        assert_eq!(
            is_field("address", "city")
                .eq(literal("Berlin").unwrap())
                .unwrap()
                .as_cql(),
            "address.city='Berlin'"
        );
        assert_eq!(
            is_element("m", literal(1).unwrap())
                .eq(bind_marker())
                .unwrap()
                .as_cql(),
            "m[1]=?"
        );
    }

    #[test]
    fn renders_token_and_tuple_relations() {
        assert_eq!(
            is_token(["pk1", "pk2"]).gt(bind_marker()).unwrap().as_cql(),
            "token(pk1,pk2)>?"
        );
        let tuple_rhs = tuple_of([literal(1).unwrap(), literal(2).unwrap()]).unwrap();
        assert_eq!(
            is_tuple(["c1", "c2"]).eq(tuple_rhs).unwrap().as_cql(),
            "(c1,c2)=(1,2)"
        );
    }

    #[test]
    fn rejects_aliased_right_hand_sides() {
        let aliased = || column("v").alias("x").unwrap();
        assert!(is_column("k").eq(aliased()).is_err());
        assert!(is_column("k").gt(aliased()).is_err());
        assert!(is_column("tags").contains(aliased()).is_err());
        assert!(is_element("m", aliased()).eq(bind_marker()).is_err());
    }

    #[test]
    fn renders_in_relations() {
        let r = is_column("k")
            .in_([literal(1).unwrap(), literal(2).unwrap()])
            .unwrap();
        assert_eq!(r.as_cql(), "k IN (1,2)");

        let r = is_column("k").in_bind_marker(bind_marker()).unwrap();
        assert_eq!(r.as_cql(), "k IN ?");

        let r = is_column("k")
            .in_bind_marker(named_bind_marker("keys"))
            .unwrap();
        assert_eq!(r.as_cql(), "k IN :keys");

        assert!(is_column("k").in_bind_marker(literal(1).unwrap()).is_err());
    }

    #[test]
    fn renders_custom_index_probe() {
        let r = is_custom_index("my_idx", literal("a value").unwrap());
        assert_eq!(r.as_cql(), "expr(my_idx,'a value')");
    }

    #[test]
    fn contains_operators_are_spaced() {
        assert_eq!(
            is_column("tags")
                .contains(literal("cql").unwrap())
                .unwrap()
                .as_cql(),
            "tags CONTAINS 'cql'"
        );
        assert_eq!(
            is_column("m")
                .contains_key(literal("k").unwrap())
                .unwrap()
                .as_cql(),
            "m CONTAINS KEY 'k'"
        );
    }
}
