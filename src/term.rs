//! The CQL expression model.
//!
//! [`Term`] is the single sum type behind everything that can appear in a
//! SELECT list, on either side of a relation or condition, inside a function
//! call, or as an UPDATE assignment value. Each variant knows its textual
//! template; binary arithmetic consults the operator catalog to decide
//! operand parenthesization.
//!
//! # Construction
//!
//! One canonical constructor exists per variant ([`column`], [`literal`],
//! [`sum`], [`function`], ...). Constructors that can violate a composition
//! rule (an aliased child anywhere below the top level, a range with no
//! bounds, a value with no literal mapping) return [`Result`] and fail
//! eagerly, so rendering itself never fails.
//!
//! # Aliases
//!
//! A term used as a top-level selector may carry an alias via
//! [`Term::alias`]. The star and `count(*)` pseudo-selectors, raw snippets,
//! bind markers and ranges cannot be named; aliasing one is an error.
//!
//! # Examples
//!
//! ```
//! use cql_builder::term::{column, literal, product, opposite, sum};
//!
//! let term = product(
//!     opposite(column("bar")).unwrap(),
//!     sum(column("baz"), literal(1).unwrap()).unwrap(),
//! )
//! .unwrap();
//! assert_eq!(term.as_cql(), "-bar*(baz+1)");
//! ```

use crate::cql_type::CqlType;
use crate::error::{Error, Result};
use crate::identifier::Identifier;
use crate::literal::ToCqlLiteral;
use crate::operator::ArithmeticOperator;
use serde::{Deserialize, Serialize};
use std::fmt;
#[cfg(feature = "bindings")]
use ts_rs::TS;

/// A CQL expression node.
///
/// Non-trivial variants box their payload to keep the enum small; the whole
/// model is an immutable value type, so sharing a subtree means cloning it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "bindings", derive(TS))]
#[cfg_attr(feature = "bindings", ts(export))]
#[serde(rename_all = "snake_case")]
pub enum Term {
    /// A column reference.
    Column(Identifier),
    /// An inlined literal, already rendered by a [`ToCqlLiteral`] capability.
    Literal(String),
    /// An opaque CQL snippet, appended verbatim with no escaping.
    Raw(String),
    /// An anonymous (`?`) or named (`:id`) bind marker.
    BindMarker(Option<Identifier>),
    /// A binary arithmetic expression.
    Arithmetic {
        operator: ArithmeticOperator,
        left: Box<Term>,
        right: Box<Term>,
    },
    /// Unary negation.
    Opposite(Box<Term>),
    /// A cast of an already-typed expression, rendered `(type)expr`.
    Cast { inner: Box<Term>, target: CqlType },
    /// A type hint disambiguating an untyped literal, rendered `(type)expr`.
    TypeHint { inner: Box<Term>, target: CqlType },
    /// UDT field projection, rendered `base.field`.
    Field { base: Box<Term>, field: Identifier },
    /// Collection/map element access, rendered `base[index]`.
    Element { base: Box<Term>, index: Box<Term> },
    /// Collection slice, rendered `base[left..right]`; at least one bound is
    /// always present.
    Range {
        base: Box<Term>,
        left: Option<Box<Term>>,
        right: Option<Box<Term>>,
    },
    /// A function call, rendered `[keyspace.]name(arg1,arg2,...)`.
    FunctionCall {
        keyspace: Option<Identifier>,
        name: Identifier,
        args: Vec<Term>,
    },
    /// A list construction, rendered `[e1,e2,...]`.
    ListLiteral(Vec<Term>),
    /// A set construction, rendered `{e1,e2,...}`.
    SetLiteral(Vec<Term>),
    /// A tuple construction, rendered `(e1,e2,...)`.
    TupleLiteral(Vec<Term>),
    /// A map construction, rendered `{k1:v1,...}`, optionally prefixed with
    /// an explicit `(map<k,v>)` type.
    MapLiteral {
        entries: Vec<(Term, Term)>,
        entry_type: Option<(CqlType, CqlType)>,
    },
    /// The `*` pseudo-selector. Cannot be aliased.
    Star,
    /// The `count(*)` pseudo-selector. Cannot be aliased.
    CountAll,
    /// A term carrying a selector alias, rendered `inner AS alias`.
    Aliased { inner: Box<Term>, alias: Identifier },
}

// ---------------------------------------------------------------------------
// Canonical constructors
// ---------------------------------------------------------------------------

/// A column reference.
pub fn column(name: impl Into<Identifier>) -> Term {
    Term::Column(name.into())
}

/// An inlined literal value.
///
/// Fails with [`Error::NoLiteralMapping`] when the value cannot be rendered;
/// the failure surfaces here, at construction, never at render time.
pub fn literal(value: impl ToCqlLiteral) -> Result<Term> {
    Ok(Term::Literal(value.to_cql_literal()?))
}

/// A raw CQL snippet, appended as-is.
///
/// Nothing is validated or escaped; malformed contents surface only when the
/// built statement is executed. Useful for CQL features the builder does not
/// cover yet.
pub fn raw(snippet: impl Into<String>) -> Term {
    Term::Raw(snippet.into())
}

/// An anonymous bind marker (`?`).
pub fn bind_marker() -> Term {
    Term::BindMarker(None)
}

/// A named bind marker (`:id`).
pub fn named_bind_marker(name: impl Into<Identifier>) -> Term {
    Term::BindMarker(Some(name.into()))
}

fn arithmetic(operator: ArithmeticOperator, left: Term, right: Term) -> Result<Term> {
    reject_alias(&left, "an arithmetic operand")?;
    reject_alias(&right, "an arithmetic operand")?;
    Ok(Term::Arithmetic {
        operator,
        left: Box::new(left),
        right: Box::new(right),
    })
}

/// The sum of two terms, as in `left+right`.
///
/// Like every composing constructor, fails if an operand is aliased; an
/// alias is only meaningful on a top-level selector.
pub fn sum(left: Term, right: Term) -> Result<Term> {
    arithmetic(ArithmeticOperator::Sum, left, right)
}

/// The difference of two terms, as in `left-right`.
pub fn difference(left: Term, right: Term) -> Result<Term> {
    arithmetic(ArithmeticOperator::Difference, left, right)
}

/// The product of two terms, as in `left*right`.
pub fn product(left: Term, right: Term) -> Result<Term> {
    arithmetic(ArithmeticOperator::Product, left, right)
}

/// The quotient of two terms, as in `left/right`.
pub fn quotient(left: Term, right: Term) -> Result<Term> {
    arithmetic(ArithmeticOperator::Quotient, left, right)
}

/// The remainder of two terms, as in `left%right`.
pub fn remainder(left: Term, right: Term) -> Result<Term> {
    arithmetic(ArithmeticOperator::Remainder, left, right)
}

/// The opposite of a term, as in `-argument`. Fails if the argument is
/// aliased.
pub fn opposite(argument: Term) -> Result<Term> {
    reject_alias(&argument, "a negation operand")?;
    Ok(Term::Opposite(Box::new(argument)))
}

/// A cast of an already-typed expression, as in `(bigint)1`.
pub fn cast(inner: Term, target: CqlType) -> Result<Term> {
    reject_alias(&inner, "a cast operand")?;
    Ok(Term::Cast {
        inner: Box::new(inner),
        target,
    })
}

/// A type hint for an untyped literal, as in `(double)1/3`.
pub fn type_hint(inner: Term, target: CqlType) -> Result<Term> {
    reject_alias(&inner, "a type hint operand")?;
    Ok(Term::TypeHint {
        inner: Box::new(inner),
        target,
    })
}

/// A field inside a UDT expression, as in `user.name`. Fails if the base is
/// aliased.
pub fn field(base: Term, field: impl Into<Identifier>) -> Result<Term> {
    reject_alias(&base, "a field access base")?;
    Ok(Term::Field {
        base: Box::new(base),
        field: field.into(),
    })
}

/// An element in a collection expression, as in `m['key']`. Fails if the
/// base or the index is aliased.
pub fn element(base: Term, index: Term) -> Result<Term> {
    reject_alias(&base, "an element access base")?;
    reject_alias(&index, "an element index")?;
    Ok(Term::Element {
        base: Box::new(base),
        index: Box::new(index),
    })
}

/// A slice of a collection expression, as in `s[4..8]`.
///
/// Either bound can be omitted (`s[4..]`, `s[..8]`), but not both.
pub fn range(base: Term, left: Option<Term>, right: Option<Term>) -> Result<Term> {
    if left.is_none() && right.is_none() {
        return Err(Error::invalid_argument(
            "a range must have at least one bound",
        ));
    }
    reject_alias(&base, "a range base")?;
    for bound in left.iter().chain(right.iter()) {
        reject_alias(bound, "a range bound")?;
    }
    Ok(Term::Range {
        base: Box::new(base),
        left: left.map(Box::new),
        right: right.map(Box::new),
    })
}

/// A function call, as in `f(a,b)`.
///
/// Fails if any argument is aliased.
pub fn function(
    name: impl Into<Identifier>,
    args: impl IntoIterator<Item = Term>,
) -> Result<Term> {
    keyspace_function(None::<Identifier>, name, args)
}

/// A keyspace-qualified function call, as in `ks.f(a,b)`.
pub fn keyspace_function(
    keyspace: Option<impl Into<Identifier>>,
    name: impl Into<Identifier>,
    args: impl IntoIterator<Item = Term>,
) -> Result<Term> {
    let args: Vec<Term> = args.into_iter().collect();
    for arg in &args {
        reject_alias(arg, "a function argument")?;
    }
    Ok(Term::FunctionCall {
        keyspace: keyspace.map(Into::into),
        name: name.into(),
        args,
    })
}

/// The built-in `writetime(column)` function.
pub fn write_time(column_name: impl Into<Identifier>) -> Term {
    Term::FunctionCall {
        keyspace: None,
        name: Identifier::new("writetime"),
        args: vec![column(column_name)],
    }
}

/// The built-in `ttl(column)` function.
pub fn ttl(column_name: impl Into<Identifier>) -> Term {
    Term::FunctionCall {
        keyspace: None,
        name: Identifier::new("ttl"),
        args: vec![column(column_name)],
    }
}

fn collect_unaliased(
    elements: impl IntoIterator<Item = Term>,
    context: &str,
) -> Result<Vec<Term>> {
    let elements: Vec<Term> = elements.into_iter().collect();
    for element in &elements {
        reject_alias(element, context)?;
    }
    Ok(elements)
}

/// A list of terms, as in `[a,b,c]`. Fails if any element is aliased.
pub fn list_of(elements: impl IntoIterator<Item = Term>) -> Result<Term> {
    Ok(Term::ListLiteral(collect_unaliased(
        elements,
        "a list element",
    )?))
}

/// A set of terms, as in `{a,b,c}`. Fails if any element is aliased.
pub fn set_of(elements: impl IntoIterator<Item = Term>) -> Result<Term> {
    Ok(Term::SetLiteral(collect_unaliased(
        elements,
        "a set element",
    )?))
}

/// A tuple of terms, as in `(a,b,c)`. Fails if any component is aliased.
///
/// Also used as a relation right-hand side: `IN (e1,e2)` and tuple equality
/// `(c1,c2)=(1,2)` both take this shape.
pub fn tuple_of(components: impl IntoIterator<Item = Term>) -> Result<Term> {
    Ok(Term::TupleLiteral(collect_unaliased(
        components,
        "a tuple component",
    )?))
}

/// A map of terms, as in `{k1:v1,k2:v2}`. Fails if any key or value is
/// aliased.
pub fn map_of(entries: impl IntoIterator<Item = (Term, Term)>) -> Result<Term> {
    typed_map_of(entries, None)
}

/// A map of terms with an explicit type, as in `(map<text,int>){k1:v1}`.
pub fn typed_map_of(
    entries: impl IntoIterator<Item = (Term, Term)>,
    entry_type: Option<(CqlType, CqlType)>,
) -> Result<Term> {
    let entries: Vec<(Term, Term)> = entries.into_iter().collect();
    for (key, value) in &entries {
        reject_alias(key, "a map key")?;
        reject_alias(value, "a map value")?;
    }
    Ok(Term::MapLiteral {
        entries,
        entry_type,
    })
}

/// The `*` pseudo-selector.
pub fn star() -> Term {
    Term::Star
}

/// The `count(*)` pseudo-selector.
pub fn count_all() -> Term {
    Term::CountAll
}

pub(crate) fn reject_alias(term: &Term, context: &str) -> Result<()> {
    if term.is_aliased() {
        Err(Error::invalid_selector(format!(
            "aliased selectors are not allowed as {context}"
        )))
    } else {
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Methods
// ---------------------------------------------------------------------------

impl Term {
    /// Attach a selector alias, as in `count(c) AS total`.
    ///
    /// Star, `count(*)`, raw snippets, bind markers and ranges cannot carry
    /// an alias. Aliasing an already-aliased term keeps only the new alias.
    pub fn alias(self, alias: impl Into<Identifier>) -> Result<Term> {
        match self {
            Term::Star => Err(Error::invalid_alias("can't alias the * selector")),
            Term::CountAll => Err(Error::invalid_alias("can't alias the count(*) selector")),
            Term::Raw(_) => Err(Error::invalid_alias("can't alias a raw snippet")),
            Term::BindMarker(_) => Err(Error::invalid_alias("can't alias a bind marker")),
            Term::Range { .. } => Err(Error::invalid_alias("can't alias a range")),
            Term::Aliased { inner, .. } => Ok(Term::Aliased {
                inner,
                alias: alias.into(),
            }),
            other => Ok(Term::Aliased {
                inner: Box::new(other),
                alias: alias.into(),
            }),
        }
    }

    /// Whether this term carries a selector alias.
    pub fn is_aliased(&self) -> bool {
        matches!(self, Term::Aliased { .. })
    }

    /// Whether this term is a bind marker (`?` or `:id`).
    pub fn is_bind_marker(&self) -> bool {
        matches!(self, Term::BindMarker(_))
    }

    /// Render the term's exact CQL form.
    pub fn as_cql(&self) -> String {
        let mut out = String::new();
        self.write_cql(&mut out);
        out
    }

    /// The binding level of this node when it appears as an arithmetic
    /// operand, or `None` for non-arithmetic nodes (which never get
    /// parenthesized by a parent).
    fn arithmetic_precedence(&self) -> Option<u8> {
        match self {
            Term::Arithmetic { operator, .. } => Some(operator.precedence()),
            Term::Opposite(_) => Some(ArithmeticOperator::Opposite.precedence()),
            _ => None,
        }
    }

    fn write_operand(&self, threshold: u8, out: &mut String) {
        let parenthesize = self
            .arithmetic_precedence()
            .is_some_and(|level| level < threshold);
        if parenthesize {
            out.push('(');
            self.write_cql(out);
            out.push(')');
        } else {
            self.write_cql(out);
        }
    }

    pub(crate) fn write_cql(&self, out: &mut String) {
        match self {
            Term::Column(id) => out.push_str(&id.as_cql()),
            Term::Literal(cql) | Term::Raw(cql) => out.push_str(cql),
            Term::BindMarker(None) => out.push('?'),
            Term::BindMarker(Some(id)) => {
                out.push(':');
                out.push_str(&id.as_cql());
            }
            Term::Arithmetic {
                operator,
                left,
                right,
            } => {
                left.write_operand(operator.precedence_left(), out);
                out.push_str(operator.symbol());
                right.write_operand(operator.precedence_right(), out);
            }
            Term::Opposite(argument) => {
                out.push_str(ArithmeticOperator::Opposite.symbol());
                argument.write_operand(ArithmeticOperator::Opposite.precedence_right(), out);
            }
            Term::Cast { inner, target } | Term::TypeHint { inner, target } => {
                out.push('(');
                out.push_str(&target.as_cql());
                out.push(')');
                inner.write_cql(out);
            }
            Term::Field { base, field } => {
                base.write_cql(out);
                out.push('.');
                out.push_str(&field.as_cql());
            }
            Term::Element { base, index } => {
                base.write_cql(out);
                out.push('[');
                index.write_cql(out);
                out.push(']');
            }
            Term::Range { base, left, right } => {
                base.write_cql(out);
                out.push('[');
                if let Some(left) = left {
                    left.write_cql(out);
                }
                out.push_str("..");
                if let Some(right) = right {
                    right.write_cql(out);
                }
                out.push(']');
            }
            Term::FunctionCall {
                keyspace,
                name,
                args,
            } => {
                if let Some(keyspace) = keyspace {
                    out.push_str(&keyspace.as_cql());
                    out.push('.');
                }
                out.push_str(&name.as_cql());
                out.push('(');
                write_comma_joined(args, out);
                out.push(')');
            }
            Term::ListLiteral(elements) => {
                out.push('[');
                write_comma_joined(elements, out);
                out.push(']');
            }
            Term::SetLiteral(elements) => {
                out.push('{');
                write_comma_joined(elements, out);
                out.push('}');
            }
            Term::TupleLiteral(components) => {
                out.push('(');
                write_comma_joined(components, out);
                out.push(')');
            }
            Term::MapLiteral {
                entries,
                entry_type,
            } => {
                if let Some((key_type, value_type)) = entry_type {
                    out.push_str(&format!(
                        "(map<{},{}>)",
                        key_type.as_cql(),
                        value_type.as_cql()
                    ));
                }
                out.push('{');
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        out.push(',');
                    }
                    key.write_cql(out);
                    out.push(':');
                    value.write_cql(out);
                }
                out.push('}');
            }
            Term::Star => out.push('*'),
            Term::CountAll => out.push_str("count(*)"),
            Term::Aliased { inner, alias } => {
                inner.write_cql(out);
                out.push_str(" AS ");
                out.push_str(&alias.as_cql());
            }
        }
    }
}

fn write_comma_joined(terms: &[Term], out: &mut String) {
    for (i, term) in terms.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        term.write_cql(out);
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_cql())
    }
}
