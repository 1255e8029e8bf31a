//! Deep traversal with a visitor.
//!
//! Every node is visited with its pointer. Containers are recursed into through
//! their own keys in enumeration order, either before (`bottom_up = false`) or
//! after (`bottom_up = true`) the node itself is visited.

use serde_json::{Map, Value};

use super::escape;
use crate::types::is_container;

/// Visit every node reachable from `root` with `(value, pointer, root)`.
pub fn for_each_deep<F>(root: &Value, bottom_up: bool, mut visit: F)
where
    F: FnMut(&Value, &str, &Value),
{
    walk(root, "", root, bottom_up, &mut visit);
}

fn walk<F>(value: &Value, pointer: &str, root: &Value, bottom_up: bool, visit: &mut F)
where
    F: FnMut(&Value, &str, &Value),
{
    if !bottom_up {
        visit(value, pointer, root);
    }
    match value {
        Value::Array(items) => {
            for (i, item) in items.iter().enumerate() {
                walk(item, &format!("{}/{}", pointer, i), root, bottom_up, visit);
            }
        }
        Value::Object(map) => {
            for (key, item) in map {
                walk(item, &child_pointer(pointer, key), root, bottom_up, visit);
            }
        }
        _ => {}
    }
    if bottom_up {
        visit(value, pointer, root);
    }
}

/// Visit every node in place, letting the visitor modify it.
///
/// Top-down, children are taken from the value the visitor leaves behind.
pub fn for_each_deep_mut<F>(root: &mut Value, bottom_up: bool, mut visit: F)
where
    F: FnMut(&mut Value, &str),
{
    walk_mut(root, "", bottom_up, &mut visit);
}

fn walk_mut<F>(value: &mut Value, pointer: &str, bottom_up: bool, visit: &mut F)
where
    F: FnMut(&mut Value, &str),
{
    if !bottom_up {
        visit(value, pointer);
    }
    match value {
        Value::Array(items) => {
            for (i, item) in items.iter_mut().enumerate() {
                walk_mut(item, &format!("{}/{}", pointer, i), bottom_up, visit);
            }
        }
        Value::Object(map) => {
            for (key, item) in map.iter_mut() {
                walk_mut(item, &child_pointer(pointer, key), bottom_up, visit);
            }
        }
        _ => {}
    }
    if bottom_up {
        visit(value, pointer);
    }
}

/// Build a transformed copy of `root`; `root` itself is never modified.
///
/// The visitor receives each node (by value), its pointer, and the original
/// root, and returns the node to keep. Containers are copied before their
/// children are replaced by the transformed children.
pub fn for_each_deep_copy<F>(root: &Value, bottom_up: bool, mut visit: F) -> Value
where
    F: FnMut(Value, &str, &Value) -> Value,
{
    copy_walk(root, "", root, bottom_up, &mut visit)
}

fn copy_walk<F>(value: &Value, pointer: &str, root: &Value, bottom_up: bool, visit: &mut F) -> Value
where
    F: FnMut(Value, &str, &Value) -> Value,
{
    if !is_container(value) {
        return visit(value.clone(), pointer, root);
    }

    if bottom_up {
        let node = match value {
            Value::Array(items) => Value::Array(
                items
                    .iter()
                    .enumerate()
                    .map(|(i, item)| {
                        copy_walk(item, &format!("{}/{}", pointer, i), root, bottom_up, visit)
                    })
                    .collect(),
            ),
            Value::Object(map) => {
                let mut copy = Map::new();
                for (key, item) in map {
                    let child = copy_walk(item, &child_pointer(pointer, key), root, bottom_up, visit);
                    copy.insert(key.clone(), child);
                }
                Value::Object(copy)
            }
            other => other.clone(),
        };
        return visit(node, pointer, root);
    }

    let mut node = visit(value.clone(), pointer, root);
    match &mut node {
        Value::Array(items) => {
            for (i, item) in items.iter_mut().enumerate() {
                *item = copy_walk(item, &format!("{}/{}", pointer, i), root, bottom_up, visit);
            }
        }
        Value::Object(map) => {
            for (key, item) in map.iter_mut() {
                *item = copy_walk(item, &child_pointer(pointer, key), root, bottom_up, visit);
            }
        }
        _ => {}
    }
    node
}

/// Flat map from every leaf pointer to its value.
///
/// Leaves are all non-container values, `null` included. Empty containers have
/// no leaves and do not appear.
pub fn dict(root: &Value) -> Map<String, Value> {
    let mut leaves = Map::new();
    for_each_deep(root, false, |value, pointer, _| {
        if !is_container(value) {
            leaves.insert(pointer.to_string(), value.clone());
        }
    });
    leaves
}

fn child_pointer(pointer: &str, key: &str) -> String {
    format!("{}/{}", pointer, escape(key))
}
