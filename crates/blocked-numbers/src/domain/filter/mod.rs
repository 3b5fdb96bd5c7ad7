//! Row filters for delete and query.
//!
//! Filters come from two places: typed construction (`Predicate::eq`) and
//! caller-supplied selection text with positional `?` arguments. Text is
//! parsed against a small allow-listed grammar:
//!
//! ```text
//! expr     := and ("OR" and)*
//! and      := not ("AND" not)*
//! not      := "NOT" not | primary
//! primary  := "(" expr ")" | operand (cmp operand | "IS" ["NOT"] "NULL")
//! cmp      := "=" | "==" | "!=" | "<>"
//! operand  := column | "?" | 'string' | integer
//! ```
//!
//! Anything outside that grammar is a [`FilterError`]. Evaluation follows SQL
//! three-valued logic: comparisons with an absent value are unknown, and
//! only rows that evaluate to true are selected.

mod parser;

use super::record::{BlockedNumber, Column};
use std::fmt;
use thiserror::Error;

/// Maximum nesting of parentheses and `NOT` in selection text.
pub const MAX_FILTER_DEPTH: usize = 32;

/// Maximum number of comparison and `IS NULL` terms in selection text.
pub const MAX_FILTER_TERMS: usize = 256;

/// Errors from parsing selection text.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FilterError {
    #[error("unexpected character '{ch}' at offset {offset}")]
    UnexpectedCharacter { ch: char, offset: usize },

    #[error("unknown identifier '{0}'")]
    UnknownIdentifier(String),

    #[error("unterminated string literal starting at offset {offset}")]
    UnterminatedString { offset: usize },

    #[error("integer literal out of range: {0}")]
    InvalidInteger(String),

    #[error("unexpected {found} at offset {offset}")]
    UnexpectedToken { found: String, offset: usize },

    #[error("unexpected end of selection")]
    UnexpectedEnd,

    #[error("selection nested deeper than {max} levels")]
    TooDeep { max: usize },

    #[error("selection has more than {max} terms")]
    TooManyTerms { max: usize },

    #[error("selection has {placeholders} placeholders but {supplied} arguments were supplied")]
    ArgumentCount { placeholders: usize, supplied: usize },
}

/// A value a filter can compare.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Null,
    Integer(i64),
    Text(String),
}

impl Value {
    fn render(&self) -> Option<String> {
        match self {
            Value::Null => None,
            Value::Integer(n) => Some(n.to_string()),
            Value::Text(s) => Some(s.clone()),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

/// Either side of a comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operand {
    Column(Column),
    Literal(Value),
}

impl Operand {
    fn resolve(&self, record: &BlockedNumber) -> Value {
        match self {
            Operand::Column(column) => column_value(record, *column),
            Operand::Literal(value) => value.clone(),
        }
    }
}

/// Comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Ne,
}

/// Parsed or constructed row filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    Compare {
        left: Operand,
        op: CompareOp,
        right: Operand,
    },
    IsNull {
        operand: Operand,
        negated: bool,
    },
    And(Box<Predicate>, Box<Predicate>),
    Or(Box<Predicate>, Box<Predicate>),
    Not(Box<Predicate>),
}

impl Predicate {
    /// Parse selection text, binding `?` placeholders to `args` in order.
    pub fn parse(selection: &str, args: &[&str]) -> Result<Predicate, FilterError> {
        parser::parse(selection, args)
    }

    /// `column = value`
    pub fn eq(column: Column, value: impl Into<Value>) -> Predicate {
        Predicate::Compare {
            left: Operand::Column(column),
            op: CompareOp::Eq,
            right: Operand::Literal(value.into()),
        }
    }

    /// `column != value`
    pub fn ne(column: Column, value: impl Into<Value>) -> Predicate {
        Predicate::Compare {
            left: Operand::Column(column),
            op: CompareOp::Ne,
            right: Operand::Literal(value.into()),
        }
    }

    /// `column IS NULL`
    pub fn is_null(column: Column) -> Predicate {
        Predicate::IsNull {
            operand: Operand::Column(column),
            negated: false,
        }
    }

    pub fn and(self, other: Predicate) -> Predicate {
        Predicate::And(Box::new(self), Box::new(other))
    }

    pub fn or(self, other: Predicate) -> Predicate {
        Predicate::Or(Box::new(self), Box::new(other))
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(self) -> Predicate {
        Predicate::Not(Box::new(self))
    }

    /// Three-valued evaluation: `None` is SQL `UNKNOWN`.
    pub fn evaluate(&self, record: &BlockedNumber) -> Option<bool> {
        match self {
            Predicate::Compare { left, op, right } => {
                let equal = values_equal(&left.resolve(record), &right.resolve(record))?;
                Some(match op {
                    CompareOp::Eq => equal,
                    CompareOp::Ne => !equal,
                })
            }
            Predicate::IsNull { operand, negated } => {
                let is_null = operand.resolve(record) == Value::Null;
                Some(is_null != *negated)
            }
            Predicate::And(a, b) => match (a.evaluate(record), b.evaluate(record)) {
                (Some(false), _) | (_, Some(false)) => Some(false),
                (Some(true), Some(true)) => Some(true),
                _ => None,
            },
            Predicate::Or(a, b) => match (a.evaluate(record), b.evaluate(record)) {
                (Some(true), _) | (_, Some(true)) => Some(true),
                (Some(false), Some(false)) => Some(false),
                _ => None,
            },
            Predicate::Not(inner) => inner.evaluate(record).map(|v| !v),
        }
    }

    /// Whether the row is selected (evaluates to true).
    pub fn matches(&self, record: &BlockedNumber) -> bool {
        self.evaluate(record) == Some(true)
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::Compare { left, op, right } => {
                let op = match op {
                    CompareOp::Eq => "=",
                    CompareOp::Ne => "!=",
                };
                write!(f, "{left} {op} {right}")
            }
            Predicate::IsNull { operand, negated } => {
                let not = if *negated { " NOT" } else { "" };
                write!(f, "{operand} IS{not} NULL")
            }
            Predicate::And(a, b) => write!(f, "({a} AND {b})"),
            Predicate::Or(a, b) => write!(f, "({a} OR {b})"),
            Predicate::Not(inner) => write!(f, "NOT {inner}"),
        }
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Column(column) => write!(f, "{column}"),
            Operand::Literal(Value::Null) => f.write_str("NULL"),
            Operand::Literal(Value::Integer(n)) => write!(f, "{n}"),
            Operand::Literal(Value::Text(s)) => write!(f, "'{}'", s.replace('\'', "''")),
        }
    }
}

fn column_value(record: &BlockedNumber, column: Column) -> Value {
    match column {
        Column::Id => i64::try_from(record.id.value())
            .map_or_else(|_| Value::Text(record.id.to_string()), Value::Integer),
        Column::OriginalNumber => Value::Text(record.original_number.clone()),
        Column::E164Number => record.e164_number.clone().into(),
        Column::StrippedNumber => Value::Text(record.stripped_number.clone()),
    }
}

/// Integers compare numerically with integers; anything else compares as text.
fn values_equal(left: &Value, right: &Value) -> Option<bool> {
    match (left, right) {
        (Value::Integer(a), Value::Integer(b)) => Some(a == b),
        _ => Some(left.render()? == right.render()?),
    }
}
