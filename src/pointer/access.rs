//! Pointer resolution and mutation.

use std::ops::Range;

use serde_json::Value;

use super::container::{array_index, child, child_mut, empty_for, is_index_like, own_target, Target};
use super::expression::{evaluate, Evaluation};
use super::{join, ToPointer};
use crate::error::PointerError;
use crate::types::{is_container, is_truthy, json_type_name};

/// Resolve a pointer against `root`.
///
/// Each segment is looked up as an own key first (`-` meaning the last array
/// element), then as a conditional expression (`prop==value`, `prop!=value`).
///
/// # Errors
///
/// `Invalid` for malformed pointer text, `NotAContainer` when `root` is a
/// scalar, `Unresolved` when a segment matches nothing.
pub fn get<'a, P: ToPointer + ?Sized>(root: &'a Value, pointer: &P) -> Result<&'a Value, PointerError> {
    get_slice(root, pointer, 0, None)
}

/// Resolve only the segments in `[start, end)` of the pointer.
///
/// Negative bounds count from the end, as with array slices. A `start` past the
/// last segment, or an `end` at or before `-len`, resolves to `root` itself.
pub fn get_slice<'a, P: ToPointer + ?Sized>(
    root: &'a Value,
    pointer: &P,
    start: isize,
    end: Option<isize>,
) -> Result<&'a Value, PointerError> {
    let segments = pointer.to_segments()?;
    if !is_container(root) {
        return Err(PointerError::NotAContainer {
            pointer: join(&segments),
            actual: json_type_name(root).to_string(),
        });
    }
    let Some(range) = slice_range(segments.len(), start, end) else {
        return Ok(root);
    };

    let mut cursor = root;
    for key in &segments[range] {
        cursor = locate(cursor, key)
            .and_then(|target| child(cursor, &target))
            .ok_or_else(|| PointerError::Unresolved {
                pointer: join(&segments),
                key: key.clone(),
            })?;
    }
    Ok(cursor)
}

/// Mutable counterpart of [`get`].
pub fn get_mut<'a, P: ToPointer + ?Sized>(
    root: &'a mut Value,
    pointer: &P,
) -> Result<&'a mut Value, PointerError> {
    let segments = pointer.to_segments()?;
    resolve_mut(root, &segments)
}

/// Resolve and deep-copy the result.
pub fn get_copy<P: ToPointer + ?Sized>(root: &Value, pointer: &P) -> Result<Value, PointerError> {
    get(root, pointer).cloned()
}

/// True if the pointer resolves against `root`.
pub fn has<P: ToPointer + ?Sized>(root: &Value, pointer: &P) -> bool {
    get(root, pointer).is_ok()
}

/// First truthy value among `(root, pointer)` candidates.
///
/// Candidates that fail to resolve, or resolve to `null`, `false`, `0` or `""`,
/// are skipped.
pub fn get_first<'a, P: ToPointer + ?Sized>(candidates: &[(&'a Value, &P)]) -> Option<&'a Value> {
    candidates
        .iter()
        .filter_map(|(root, pointer)| get(*root, *pointer).ok())
        .find(|value| is_truthy(value))
}

/// Most `null`s a single write may pad an array with.
pub const MAX_ARRAY_GAP: usize = 1024;

/// Write `value` at `pointer`, creating missing intermediate containers.
///
/// A missing intermediate becomes an array when the next segment is numeric or
/// `-`, an object otherwise. A final `-` on an array appends. An index past the
/// end pads with `null`, at most [`MAX_ARRAY_GAP`] of them; a larger gap is
/// `InvalidIndex`.
///
/// # Errors
///
/// On error `root` is left unchanged.
pub fn set<P: ToPointer + ?Sized>(root: &mut Value, pointer: &P, value: Value) -> Result<(), PointerError> {
    write(root, pointer, value, false)
}

/// Like [`set`], but a numeric final segment on an array inserts before that
/// position instead of overwriting it.
pub fn insert<P: ToPointer + ?Sized>(
    root: &mut Value,
    pointer: &P,
    value: Value,
) -> Result<(), PointerError> {
    write(root, pointer, value, true)
}

/// [`set`] on a deep copy of `root`; the original is untouched.
pub fn set_copy<P: ToPointer + ?Sized>(
    root: &Value,
    pointer: &P,
    value: Value,
) -> Result<Value, PointerError> {
    let mut copy = root.clone();
    set(&mut copy, pointer, value)?;
    Ok(copy)
}

/// [`insert`] on a deep copy of `root`; the original is untouched.
pub fn insert_copy<P: ToPointer + ?Sized>(
    root: &Value,
    pointer: &P,
    value: Value,
) -> Result<Value, PointerError> {
    let mut copy = root.clone();
    insert(&mut copy, pointer, value)?;
    Ok(copy)
}

/// Remove the value at `pointer` and return it.
///
/// The parent is resolved like [`get`]. A final `-` removes the last array
/// element. Returns `Ok(None)` when the parent exists but has no such member.
pub fn remove<P: ToPointer + ?Sized>(root: &mut Value, pointer: &P) -> Result<Option<Value>, PointerError> {
    let segments = pointer.to_segments()?;
    let Some((last, parent)) = segments.split_last() else {
        return Err(PointerError::RootWrite);
    };

    let container = resolve_mut(root, parent)?;
    match container {
        Value::Array(items) => {
            let index = if last == "-" {
                items.len().checked_sub(1)
            } else {
                array_index(last)
            };
            Ok(index
                .filter(|i| *i < items.len())
                .map(|i| items.remove(i)))
        }
        Value::Object(map) => Ok(map.shift_remove(last.as_str())),
        other => Err(PointerError::NotAContainer {
            pointer: join(parent),
            actual: json_type_name(other).to_string(),
        }),
    }
}

/// Where `key` lands inside `cursor`: own key first, then expression.
fn locate(cursor: &Value, key: &str) -> Option<Target> {
    if let Some(target) = own_target(cursor, key) {
        return Some(target);
    }
    match evaluate(cursor, key) {
        Evaluation::Matched(property) => own_target(cursor, property),
        Evaluation::MatchedNoKey => Some(Target::Current),
        Evaluation::NoMatch => None,
    }
}

fn resolve_mut<'a>(root: &'a mut Value, segments: &[String]) -> Result<&'a mut Value, PointerError> {
    if !is_container(root) {
        return Err(PointerError::NotAContainer {
            pointer: join(segments),
            actual: json_type_name(root).to_string(),
        });
    }
    let mut cursor = root;
    for key in segments {
        let unresolved = || PointerError::Unresolved {
            pointer: join(segments),
            key: key.clone(),
        };
        let target = locate(cursor, key).ok_or_else(unresolved)?;
        cursor = child_mut(cursor, &target).ok_or_else(unresolved)?;
    }
    Ok(cursor)
}

fn write<P: ToPointer + ?Sized>(
    root: &mut Value,
    pointer: &P,
    value: Value,
    insert_mode: bool,
) -> Result<(), PointerError> {
    let segments = pointer.to_segments()?;
    let Some((last, parents)) = segments.split_last() else {
        return Err(PointerError::RootWrite);
    };
    check_write(root, &segments)?;

    let mut cursor = root;
    for (i, key) in parents.iter().enumerate() {
        cursor = descend_or_create(cursor, key, &segments[i + 1])
            .map_err(|fault| fault.into_error(&segments, key))?;
    }
    assign(cursor, last, value, insert_mode).map_err(|fault| fault.into_error(&segments, last))
}

/// Why a single write step failed; turned into a `PointerError` by the caller.
enum Fault {
    Scalar(&'static str),
    BadIndex,
}

impl Fault {
    fn into_error(self, segments: &[String], key: &str) -> PointerError {
        match self {
            Fault::Scalar(actual) => PointerError::NotAContainer {
                pointer: join(segments),
                actual: actual.to_string(),
            },
            Fault::BadIndex => PointerError::InvalidIndex {
                pointer: join(segments),
                key: key.to_string(),
            },
        }
    }
}

/// Walk the write path read-only, so that a failing write leaves `root` as it was.
fn check_write(root: &Value, segments: &[String]) -> Result<(), PointerError> {
    // `None` once the path runs into containers this write creates
    let mut cursor = Some(root);
    for key in segments {
        let fail = |fault: Fault| fault.into_error(segments, key);
        cursor = match cursor {
            Some(Value::Object(map)) => map.get(key.as_str()),
            Some(Value::Array(items)) => {
                let index = write_slot(items.len(), key).map_err(fail)?;
                items.get(index)
            }
            Some(other) => return Err(fail(Fault::Scalar(json_type_name(other)))),
            None if is_index_like(key) => {
                write_slot(0, key).map_err(fail)?;
                None
            }
            None => None,
        };
    }
    Ok(())
}

/// Position a write lands at in an array of `len` items.
fn write_slot(len: usize, key: &str) -> Result<usize, Fault> {
    if key == "-" {
        return Ok(len);
    }
    let index = array_index(key).ok_or(Fault::BadIndex)?;
    if index.saturating_sub(len) > MAX_ARRAY_GAP {
        return Err(Fault::BadIndex);
    }
    Ok(index)
}

fn descend_or_create<'a>(cursor: &'a mut Value, key: &str, next_key: &str) -> Result<&'a mut Value, Fault> {
    match cursor {
        Value::Object(map) => Ok(map
            .entry(key.to_string())
            .or_insert_with(|| empty_for(next_key))),
        Value::Array(items) => {
            let index = write_slot(items.len(), key)?;
            if index >= items.len() {
                items.resize(index, Value::Null);
                items.push(empty_for(next_key));
            }
            Ok(&mut items[index])
        }
        other => Err(Fault::Scalar(json_type_name(other))),
    }
}

fn assign(cursor: &mut Value, key: &str, value: Value, insert_mode: bool) -> Result<(), Fault> {
    match cursor {
        Value::Array(items) => {
            if key == "-" {
                items.push(value);
                return Ok(());
            }
            let index = write_slot(items.len(), key)?;
            if insert_mode {
                items.insert(index.min(items.len()), value);
            } else if index < items.len() {
                items[index] = value;
            } else {
                items.resize(index, Value::Null);
                items.push(value);
            }
            Ok(())
        }
        Value::Object(map) => {
            map.insert(key.to_string(), value);
            Ok(())
        }
        other => Err(Fault::Scalar(json_type_name(other))),
    }
}

/// Clamp `[start, end)` against `len` segments. `None` means "use the root".
fn slice_range(len: usize, start: isize, end: Option<isize>) -> Option<Range<usize>> {
    let len = len as isize;
    if start >= len || end.is_some_and(|e| e <= -len) {
        return None;
    }
    let start = if start < 0 { (len + start).max(0) } else { start };
    let end = match end {
        None => len,
        Some(e) if e >= len => len,
        Some(e) if e < 0 => len + e,
        Some(e) => e,
    };
    Some(start as usize..end.max(start) as usize)
}
