//! Operator catalog.
//!
//! Two closed enums: [`ArithmeticOperator`] for term arithmetic and
//! [`Operator`] for relation/condition comparisons. The rendered symbol is a
//! derived property of the tag, so the operator sets are exhaustively
//! checkable.

use serde::{Deserialize, Serialize};
#[cfg(feature = "bindings")]
use ts_rs::TS;

/// An arithmetic operator, with the precedence data the renderer needs to
/// decide parenthesization.
///
/// Precedence is asymmetric around non-commutative operators: `a-b-c` needs
/// no parentheses while `a-(b-c)` does, so each operator carries a separate
/// threshold for its left and right operand slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "bindings", derive(TS))]
#[cfg_attr(feature = "bindings", ts(export))]
#[serde(rename_all = "snake_case")]
pub enum ArithmeticOperator {
    /// Unary negation (`-a`). Binds tighter than any binary operator.
    Opposite,
    Sum,
    Difference,
    Product,
    Quotient,
    Remainder,
}

impl ArithmeticOperator {
    /// The rendered symbol.
    pub fn symbol(self) -> &'static str {
        match self {
            ArithmeticOperator::Opposite | ArithmeticOperator::Difference => "-",
            ArithmeticOperator::Sum => "+",
            ArithmeticOperator::Product => "*",
            ArithmeticOperator::Quotient => "/",
            ArithmeticOperator::Remainder => "%",
        }
    }

    /// This operator's own binding level. An operand is parenthesized when
    /// its level is strictly below the threshold its parent demands.
    pub fn precedence(self) -> u8 {
        match self {
            ArithmeticOperator::Sum | ArithmeticOperator::Difference => 1,
            ArithmeticOperator::Product
            | ArithmeticOperator::Quotient
            | ArithmeticOperator::Remainder => 2,
            ArithmeticOperator::Opposite => 3,
        }
    }

    /// The threshold demanded of the left operand.
    pub fn precedence_left(self) -> u8 {
        match self {
            ArithmeticOperator::Sum | ArithmeticOperator::Difference => 1,
            ArithmeticOperator::Product
            | ArithmeticOperator::Quotient
            | ArithmeticOperator::Remainder => 2,
            // Unary: single operand, handled by precedence_right.
            ArithmeticOperator::Opposite => 2,
        }
    }

    /// The threshold demanded of the right operand (or the sole operand of
    /// unary negation: `-(a+b)` parenthesizes, `-a*b` does not).
    pub fn precedence_right(self) -> u8 {
        match self {
            ArithmeticOperator::Sum => 1,
            ArithmeticOperator::Difference | ArithmeticOperator::Opposite => 2,
            ArithmeticOperator::Product
            | ArithmeticOperator::Quotient
            | ArithmeticOperator::Remainder => 3,
        }
    }
}

/// A comparison operator usable in WHERE relations and IF conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "bindings", derive(TS))]
#[cfg_attr(feature = "bindings", ts(export))]
#[serde(rename_all = "snake_case")]
pub enum Operator {
    Eq,
    Lt,
    Lte,
    Gt,
    Gte,
    Ne,
    Like,
    In,
    Contains,
    ContainsKey,
    IsNotNull,
}

impl Operator {
    /// The operator's exact rendered form, including the surrounding spaces
    /// keyword operators carry on the wire.
    pub fn as_cql(self) -> &'static str {
        match self {
            Operator::Eq => "=",
            Operator::Lt => "<",
            Operator::Lte => "<=",
            Operator::Gt => ">",
            Operator::Gte => ">=",
            Operator::Ne => "!=",
            Operator::Like => " LIKE ",
            Operator::In => " IN ",
            Operator::Contains => " CONTAINS ",
            Operator::ContainsKey => " CONTAINS KEY ",
            Operator::IsNotNull => " IS NOT NULL",
        }
    }

    /// Whether the operator takes a right-hand side at all.
    pub fn takes_right_hand_side(self) -> bool {
        !matches!(self, Operator::IsNotNull)
    }
}
