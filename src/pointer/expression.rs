//! Conditional-expression keys: `prop==value` and `prop!=value`.
//!
//! When a literal key lookup misses during resolution, the segment is tried as
//! an expression against the current container. A satisfied `==` descends into
//! `prop`; a `!=` on a container without `prop` is satisfied without descending.

use serde_json::Value;

use super::container::{array_index, has_key};
use crate::types::is_empty;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Equal,
    NotEqual,
}

impl Operator {
    fn token(self) -> &'static str {
        match self {
            Operator::Equal => "==",
            Operator::NotEqual => "!=",
        }
    }
}

/// A parsed `property<op>operand` key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Expression<'k> {
    pub property: &'k str,
    pub operator: Operator,
    pub operand: &'k str,
}

impl<'k> Expression<'k> {
    /// Parse an expression key. Both sides must be non-empty.
    pub fn parse(key: &'k str) -> Option<Self> {
        let operator = [Operator::NotEqual, Operator::Equal]
            .into_iter()
            .find(|op| key.contains(op.token()))?;
        let (property, operand) = key.split_once(operator.token())?;
        if property.is_empty() || operand.is_empty() {
            return None;
        }
        Some(Self {
            property,
            operator,
            operand: strip_quotes(operand),
        })
    }
}

/// Outcome of evaluating an expression key against a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Evaluation<'k> {
    /// Satisfied; resolution continues into this property.
    Matched(&'k str),
    /// Satisfied because the property is absent (`!=` only); stay in place.
    MatchedNoKey,
    /// Not satisfied, or not an expression at all.
    NoMatch,
}

/// Evaluate `key` as a conditional expression against `subject`.
///
/// Comparison is strict: only string values can equal the operand.
pub fn evaluate<'k>(subject: &Value, key: &'k str) -> Evaluation<'k> {
    if key.is_empty() || is_empty(subject) {
        return Evaluation::NoMatch;
    }
    let Some(expr) = Expression::parse(key) else {
        return Evaluation::NoMatch;
    };

    if !has_key(subject, expr.property) {
        return match expr.operator {
            Operator::Equal => Evaluation::NoMatch,
            Operator::NotEqual => Evaluation::MatchedNoKey,
        };
    }

    let actual = match subject {
        Value::Object(map) => map.get(expr.property),
        Value::Array(items) => array_index(expr.property).and_then(|i| items.get(i)),
        _ => None,
    };
    let equal = matches!(actual, Some(Value::String(s)) if s == expr.operand);
    let satisfied = match expr.operator {
        Operator::Equal => equal,
        Operator::NotEqual => !equal,
    };

    if satisfied {
        Evaluation::Matched(expr.property)
    } else {
        Evaluation::NoMatch
    }
}

fn strip_quotes(operand: &str) -> &str {
    for quote in ['"', '\''] {
        if operand.len() >= 2 && operand.starts_with(quote) && operand.ends_with(quote) {
            return &operand[1..operand.len() - 1];
        }
    }
    operand
}
