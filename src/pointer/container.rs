//! Container view over `serde_json::Value`.
//!
//! Only arrays and objects can be walked. Objects double as the keyed map
//! container: with `preserve_order` they keep insertion order.

use serde_json::{Map, Value};

/// Where one pointer segment lands inside a container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Target {
    /// Array element.
    Index(usize),
    /// Object member.
    Key(String),
    /// The container itself (a conditional expression that only filtered).
    Current,
}

/// Parse an array index segment: decimal digits without leading zeros.
pub fn array_index(key: &str) -> Option<usize> {
    if key.is_empty() || !key.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if key.len() > 1 && key.starts_with('0') {
        return None;
    }
    key.parse().ok()
}

/// True for segments that address array positions when creating containers.
pub(crate) fn is_index_like(key: &str) -> bool {
    key == "-" || array_index(key).is_some()
}

/// Literal own-key lookup. `-` on a non-empty array is its last element.
pub(crate) fn own_target(value: &Value, key: &str) -> Option<Target> {
    match value {
        Value::Array(items) if key == "-" => items.len().checked_sub(1).map(Target::Index),
        Value::Array(items) => array_index(key)
            .filter(|i| *i < items.len())
            .map(Target::Index),
        Value::Object(map) if map.contains_key(key) => Some(Target::Key(key.to_string())),
        _ => None,
    }
}

pub(crate) fn has_key(value: &Value, key: &str) -> bool {
    own_target(value, key).is_some()
}

pub(crate) fn child<'a>(value: &'a Value, target: &Target) -> Option<&'a Value> {
    match (value, target) {
        (_, Target::Current) => Some(value),
        (Value::Array(items), Target::Index(i)) => items.get(*i),
        (Value::Object(map), Target::Key(k)) => map.get(k),
        _ => None,
    }
}

pub(crate) fn child_mut<'a>(value: &'a mut Value, target: &Target) -> Option<&'a mut Value> {
    match (value, target) {
        (value, Target::Current) => Some(value),
        (Value::Array(items), Target::Index(i)) => items.get_mut(*i),
        (Value::Object(map), Target::Key(k)) => map.get_mut(k),
        _ => None,
    }
}

/// Fresh container for a missing intermediate segment.
pub(crate) fn empty_for(next_key: &str) -> Value {
    if is_index_like(next_key) {
        Value::Array(Vec::new())
    } else {
        Value::Object(Map::new())
    }
}
