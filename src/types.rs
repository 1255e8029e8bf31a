//! Predicate utilities shared by the pointer engine and the schema merger.

use serde_json::Value;

/// Returns the JSON type name for error messages.
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Returns true for `null`, `false`, zero, and empty strings, arrays and objects.
pub fn is_empty(value: &Value) -> bool {
    match value {
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        other => !is_truthy(other),
    }
}

/// Loose truthiness: everything except `null`, `false`, zero and `""`.
///
/// Containers are always truthy, even when empty.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Returns true for arrays and objects.
pub fn is_container(value: &Value) -> bool {
    matches!(value, Value::Array(_) | Value::Object(_))
}

/// Collects values in first-seen order, dropping structural duplicates.
pub fn unique_items<'a>(values: impl IntoIterator<Item = &'a Value>) -> Vec<Value> {
    let mut unique: Vec<Value> = Vec::new();
    for value in values {
        if !unique.contains(value) {
            unique.push(value.clone());
        }
    }
    unique
}

/// Values of `left` that also appear in `right`, in `left` order.
pub fn common_items(left: &[Value], right: &[Value]) -> Vec<Value> {
    left.iter()
        .filter(|item| right.contains(item))
        .cloned()
        .collect()
}
