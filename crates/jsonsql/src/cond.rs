//! Constructors for WHERE-condition trees.
//!
//! Every condition is a one-key object whose value is a fixed-position
//! operand list: field name(s) first, then operand value(s). Composites
//! (`and`, `or`, `not`) nest arbitrarily and preserve input order.

use serde::Serialize;
use serde_json::{Map, Value};

/// A boolean condition tree in wire form.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Condition(Value);

impl Condition {
    #[must_use]
    pub fn into_value(self) -> Value {
        self.0
    }

    #[must_use]
    pub fn as_value(&self) -> &Value {
        &self.0
    }
}

impl From<Condition> for Value {
    fn from(cond: Condition) -> Self {
        cond.0
    }
}

fn node(op: &str, operands: Vec<Value>) -> Condition {
    let mut map = Map::with_capacity(1);
    map.insert(op.to_owned(), Value::Array(operands));
    Condition(Value::Object(map))
}

fn binary(op: &str, field: impl Into<String>, operand: impl Into<Value>) -> Condition {
    node(op, vec![Value::String(field.into()), operand.into()])
}

/// `field = value`
pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Condition {
    binary("eq", field, value)
}

/// `field != value`
pub fn neq(field: impl Into<String>, value: impl Into<Value>) -> Condition {
    binary("neq", field, value)
}

/// `field > value`
pub fn gt(field: impl Into<String>, value: impl Into<Value>) -> Condition {
    binary("gt", field, value)
}

/// `field >= value`
pub fn gte(field: impl Into<String>, value: impl Into<Value>) -> Condition {
    binary("gte", field, value)
}

/// `field < value`
pub fn lt(field: impl Into<String>, value: impl Into<Value>) -> Condition {
    binary("lt", field, value)
}

/// `field <= value`
pub fn lte(field: impl Into<String>, value: impl Into<Value>) -> Condition {
    binary("lte", field, value)
}

/// `field IN (values)`. The operand may be a value list or a
/// [`Subquery`](crate::query::Subquery).
pub fn in_(field: impl Into<String>, values: impl Into<Value>) -> Condition {
    binary("in", field, values)
}

/// `field LIKE pattern`
pub fn like(field: impl Into<String>, pattern: impl Into<String>) -> Condition {
    binary("like", field, Value::String(pattern.into()))
}

/// `field ILIKE pattern` (case-insensitive)
pub fn ilike(field: impl Into<String>, pattern: impl Into<String>) -> Condition {
    binary("ilike", field, Value::String(pattern.into()))
}

/// `field IS value` (NULL tests)
pub fn is(field: impl Into<String>, value: impl Into<Value>) -> Condition {
    binary("is", field, value)
}

/// `field IS NOT value`
pub fn is_not(field: impl Into<String>, value: impl Into<Value>) -> Condition {
    binary("is_not", field, value)
}

/// `c1 AND c2 AND ...`
pub fn and(conditions: impl IntoIterator<Item = Condition>) -> Condition {
    node("and", conditions.into_iter().map(Value::from).collect())
}

/// `c1 OR c2 OR ...`
pub fn or(conditions: impl IntoIterator<Item = Condition>) -> Condition {
    node("or", conditions.into_iter().map(Value::from).collect())
}

/// `NOT condition`
pub fn not(condition: Condition) -> Condition {
    node("not", vec![condition.into()])
}
