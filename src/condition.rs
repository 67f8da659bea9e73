//! IF clause predicates for lightweight transactions.
//!
//! A [`Condition`] has the same triple shape as a WHERE relation but a
//! narrower left-hand side: only plain columns, UDT fields and collection
//! elements can be tested, and token/tuple forms do not exist here. The
//! starts are [`if_column`], [`if_field`] and [`if_element`].

use crate::error::{Error, Result};
use crate::identifier::Identifier;
use crate::operator::Operator;
use crate::relation::LeftHandSide;
use crate::term::{reject_alias, tuple_of, Term};
use serde::{Deserialize, Serialize};
use std::fmt;
#[cfg(feature = "bindings")]
use ts_rs::TS;

/// A single IF predicate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "bindings", derive(TS))]
#[cfg_attr(feature = "bindings", ts(export))]
pub struct Condition {
    pub lhs: LeftHandSide,
    pub operator: Operator,
    pub rhs: Option<Term>,
}

impl Condition {
    /// Render the predicate's exact CQL form.
    pub fn as_cql(&self) -> String {
        let mut out = String::new();
        self.write_cql(&mut out);
        out
    }

    pub(crate) fn write_cql(&self, out: &mut String) {
        self.lhs.write_cql(out);
        out.push_str(self.operator.as_cql());
        if let Some(rhs) = &self.rhs {
            rhs.write_cql(out);
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_cql())
    }
}

/// The IF clause of a conditional statement.
///
/// `IF EXISTS` and a condition list are mutually exclusive states of one
/// value, so they can never both be set. Requesting `IF EXISTS` drops any
/// accumulated conditions and vice versa.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "bindings", derive(TS))]
#[cfg_attr(feature = "bindings", ts(export))]
#[serde(rename_all = "snake_case")]
pub enum IfClause {
    /// Unconditional.
    #[default]
    None,
    /// `IF EXISTS`.
    Exists,
    /// `IF c1 AND c2 AND ...`, in call order.
    Conditions(Vec<Condition>),
}

impl IfClause {
    pub(crate) fn set_exists(&mut self) {
        *self = IfClause::Exists;
    }

    pub(crate) fn add(&mut self, condition: Condition) {
        match self {
            IfClause::Conditions(conditions) => conditions.push(condition),
            _ => *self = IfClause::Conditions(vec![condition]),
        }
    }

    pub(crate) fn write_cql(&self, script: &mut crate::script::ScriptBuilder) {
        match self {
            IfClause::None => {}
            IfClause::Exists => {
                script.new_line().append("IF EXISTS");
            }
            IfClause::Conditions(conditions) => {
                script.new_line().append("IF ");
                for (i, condition) in conditions.iter().enumerate() {
                    if i > 0 {
                        script.append(" AND ");
                    }
                    script.append(&condition.as_cql());
                }
            }
        }
    }
}

/// An in-progress condition: a left-hand side waiting for its operator.
#[derive(Debug, Clone)]
pub struct ConditionBuilder {
    lhs: LeftHandSide,
}

/// Start a condition on a plain column.
pub fn if_column(name: impl Into<Identifier>) -> ConditionBuilder {
    ConditionBuilder {
        lhs: LeftHandSide::Column(name.into()),
    }
}

/// Start a condition on a UDT field.
pub fn if_field(column: impl Into<Identifier>, field: impl Into<Identifier>) -> ConditionBuilder {
    ConditionBuilder {
        lhs: LeftHandSide::Field {
            column: column.into(),
            field: field.into(),
        },
    }
}

/// Start a condition on a collection element.
pub fn if_element(column: impl Into<Identifier>, index: Term) -> ConditionBuilder {
    ConditionBuilder {
        lhs: LeftHandSide::Element {
            column: column.into(),
            index,
        },
    }
}

impl ConditionBuilder {
    fn finish(self, operator: Operator, rhs: Option<Term>) -> Result<Condition> {
        if let LeftHandSide::Element { index, .. } = &self.lhs {
            reject_alias(index, "an element index")?;
        }
        if let Some(rhs) = &rhs {
            reject_alias(rhs, "a condition right-hand side")?;
        }
        Ok(Condition {
            lhs: self.lhs,
            operator,
            rhs,
        })
    }

    pub fn eq(self, rhs: Term) -> Result<Condition> {
        self.finish(Operator::Eq, Some(rhs))
    }

    pub fn lt(self, rhs: Term) -> Result<Condition> {
        self.finish(Operator::Lt, Some(rhs))
    }

    pub fn lte(self, rhs: Term) -> Result<Condition> {
        self.finish(Operator::Lte, Some(rhs))
    }

    pub fn gt(self, rhs: Term) -> Result<Condition> {
        self.finish(Operator::Gt, Some(rhs))
    }

    pub fn gte(self, rhs: Term) -> Result<Condition> {
        self.finish(Operator::Gte, Some(rhs))
    }

    pub fn ne(self, rhs: Term) -> Result<Condition> {
        self.finish(Operator::Ne, Some(rhs))
    }

    /// `lhs IN (a1,a2,...)` with explicit alternatives.
    pub fn in_(self, alternatives: impl IntoIterator<Item = Term>) -> Result<Condition> {
        let alternatives = tuple_of(alternatives)?;
        self.finish(Operator::In, Some(alternatives))
    }

    /// `lhs IN ?` with the whole alternative list bound at execution time.
    pub fn in_bind_marker(self, marker: Term) -> Result<Condition> {
        if !marker.is_bind_marker() {
            return Err(Error::invalid_argument(
                "the right-hand side of a bare IN must be a bind marker",
            ));
        }
        self.finish(Operator::In, Some(marker))
    }
}
