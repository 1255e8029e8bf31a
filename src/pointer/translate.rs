//! Pointer translation: generic vs. indexed pointers, and data vs. schema
//! pointers.
//!
//! A generic pointer uses `-` for "any position" in a list array. The
//! [`ArrayMap`] records, per generic array location, how many leading tuple
//! positions the schema describes individually; those stay numeric.

use std::collections::{BTreeMap, HashMap};

use serde_json::Value;

use super::container::{array_index, child, own_target};
use super::{compile, escape, get, is_sub_pointer, join, ToPointer};
use crate::error::PointerError;
use crate::types::is_truthy;

/// Generic array pointer -> number of tuple items at that location.
pub type ArrayMap = HashMap<String, usize>;

/// Recursive `$ref` loops: pointer where the loop starts -> pointer it returns to.
pub type RecursiveRefMap = BTreeMap<String, String>;

/// Keywords whose sub-schemas have no single data location.
const AMBIGUOUS_KEYWORDS: &[&str] = &[
    "$defs",
    "additionalProperties",
    "contains",
    "definitions",
    "dependencies",
    "patternProperties",
    "propertyNames",
];

static NULL: Value = Value::Null;

/// Substitute `indices`, left to right, for the `-` segments of a generic pointer.
///
/// With an `array_map`, only wildcards whose prefix is a known array location
/// are substituted. Wildcards left over when `indices` runs out stay as `-`.
pub fn to_indexed_pointer<P: ToPointer + ?Sized>(
    generic: &P,
    indices: &[usize],
    array_map: Option<&ArrayMap>,
) -> Result<String, PointerError> {
    let segments = generic.to_segments()?;
    let mut remaining = indices.iter();
    let mut indexed = Vec::with_capacity(segments.len());

    for (i, segment) in segments.iter().enumerate() {
        let known_array = array_map.map_or(true, |map| map.contains_key(&join(&segments[..i])));
        if segment == "-" && known_array {
            if let Some(index) = remaining.next() {
                indexed.push(index.to_string());
                continue;
            }
        }
        indexed.push(segment.clone());
    }
    Ok(join(&indexed))
}

/// Replace list positions with `-`, keeping tuple positions numeric.
///
/// A numeric segment becomes `-` when its (already generic) prefix is in
/// `array_map` and the position is at or past the tuple count recorded there.
pub fn to_generic_pointer<P: ToPointer + ?Sized>(
    pointer: &P,
    array_map: &ArrayMap,
) -> Result<String, PointerError> {
    let mut segments = pointer.to_segments()?.into_owned();
    for i in 0..segments.len() {
        let Some(position) = array_index(&segments[i]) else {
            continue;
        };
        if let Some(tuple_count) = array_map.get(&join(&segments[..i])) {
            if position >= *tuple_count {
                segments[i] = "-".to_string();
            }
        }
    }
    Ok(join(&segments))
}

/// Collapse a pointer that runs through recursive `$ref` loops.
///
/// Every `from -> to` entry where `to` is a prefix of `from` rewrites a pointer
/// below `from` to the equivalent pointer below `to`, until nothing changes.
/// The result is generic.
pub fn remove_recursive_references<P: ToPointer + ?Sized>(
    pointer: &P,
    recursive_refs: &RecursiveRefMap,
    array_map: &ArrayMap,
) -> Result<String, PointerError> {
    let mut generic = to_generic_pointer(pointer, array_map)?;
    if generic.is_empty() {
        return Ok(generic);
    }

    let loops = recursive_refs
        .iter()
        .map(|(from, to)| Ok((compile(from)?, compile(to)?)))
        .collect::<Result<Vec<_>, PointerError>>()?;

    let mut changed = true;
    while changed {
        changed = false;
        for (from, to) in &loops {
            if !is_sub_pointer(to, from, false) {
                continue;
            }
            while is_sub_pointer(from, &generic, true) {
                let rewritten = format!("{}{}", to, &generic[from.len()..]);
                generic = to_generic_pointer(&rewritten, array_map)?;
                changed = true;
            }
        }
    }
    Ok(generic)
}

/// Translate a pointer into a data instance to the schema location that
/// describes it.
///
/// `/a/0` against `{"properties": {"a": {"items": {...}}}}` becomes
/// `/properties/a/items`. Tuple items map to `/items/<n>`, extra items and
/// unknown members to `additionalItems`/`additionalProperties`. When nothing
/// matches directly, `allOf`/`anyOf`/`oneOf` branches are tried in order.
///
/// # Errors
///
/// `NotDescribed` when the schema does not describe the data location.
pub fn to_schema_pointer<P: ToPointer + ?Sized>(
    data_pointer: &P,
    schema: &Value,
) -> Result<String, PointerError> {
    let segments = data_pointer.to_segments()?;
    schema_location(&segments, schema).ok_or_else(|| PointerError::NotDescribed {
        pointer: join(&segments),
    })
}

fn schema_location(segments: &[String], schema: &Value) -> Option<String> {
    let Some((first, rest)) = segments.split_first() else {
        return Some(String::new());
    };
    let keyword = |name: &str| schema.get(name).filter(|v| is_truthy(v));

    if allows_type(schema, "object") || keyword("properties").is_some() || keyword("additionalProperties").is_some() {
        if let Some(property) = keyword("properties").and_then(|p| p.get(first.as_str())).filter(|p| is_truthy(p)) {
            return schema_location(rest, property)
                .map(|tail| format!("/properties/{}{}", escape(first), tail));
        }
        if let Some(additional) = keyword("additionalProperties") {
            return schema_location(rest, additional).map(|tail| format!("/additionalProperties{}", tail));
        }
    }

    let item_key = first == "-" || first.bytes().all(|b| b.is_ascii_digit());
    if item_key && (allows_type(schema, "array") || keyword("items").is_some()) {
        // an index too large for usize lies past any tuple
        let position: Option<usize> = match first.as_str() {
            "-" | "" => Some(0),
            digits => digits.parse().ok(),
        };
        match schema.get("items") {
            Some(Value::Array(tuple)) => {
                if let Some(position) = position.filter(|p| *p < tuple.len()) {
                    return schema_location(rest, &tuple[position])
                        .map(|tail| format!("/items/{}{}", position, tail));
                }
                if let Some(additional) = keyword("additionalItems") {
                    return schema_location(rest, additional).map(|tail| format!("/additionalItems{}", tail));
                }
            }
            Some(items @ Value::Object(_)) => {
                return schema_location(rest, items).map(|tail| format!("/items{}", tail));
            }
            _ => {
                if let Some(additional @ Value::Object(_)) = schema.get("additionalItems") {
                    return schema_location(rest, additional).map(|tail| format!("/additionalItems{}", tail));
                }
            }
        }
    }

    for combinator in ["allOf", "anyOf", "oneOf"] {
        let Some(branches) = schema.get(combinator).and_then(Value::as_array) else {
            continue;
        };
        for (i, branch) in branches.iter().enumerate() {
            if let Some(tail) = schema_location(segments, branch) {
                return Some(format!("/{}/{}{}", combinator, i, tail));
            }
        }
    }
    None
}

fn allows_type(schema: &Value, name: &str) -> bool {
    match schema.get("type") {
        Some(Value::String(t)) => t == name,
        Some(Value::Array(types)) => types.iter().any(|t| t == name),
        _ => false,
    }
}

/// Translate a pointer into a schema to the data location it describes.
///
/// `properties/<key>` and tuple `items/<n>` become `<key>` and `<n>`; a single
/// `items` schema and `additionalItems` become `-`; `allOf`, `anyOf`, `oneOf`
/// and `not` are passed through. Keywords that do not describe data (`type`,
/// `minimum`, ...) end the walk at the enclosing location.
///
/// # Errors
///
/// `Unresolved` when the pointer does not exist in the schema, `Ambiguous`
/// when it crosses `definitions`, `dependencies`, `patternProperties`,
/// `propertyNames`, `additionalProperties` or `contains`.
pub fn to_data_pointer<P: ToPointer + ?Sized>(
    schema_pointer: &P,
    schema: &Value,
) -> Result<String, PointerError> {
    let segments = schema_pointer.to_segments()?;
    get(schema, segments.as_ref())?;
    data_location(&segments, schema).map_err(|keyword| PointerError::Ambiguous {
        pointer: join(&segments),
        keyword,
    })
}

/// Err carries the keyword that makes the location ambiguous.
fn data_location(segments: &[String], schema: &Value) -> Result<String, String> {
    let Some((first, rest)) = segments.split_first() else {
        return Ok(String::new());
    };
    let keyword = first.as_str();

    match keyword {
        "properties" => {
            let (name, rest) = rest.split_first().ok_or_else(|| first.clone())?;
            let property = member(member(schema, keyword), name);
            Ok(format!("/{}{}", escape(name), data_location(rest, property)?))
        }
        "items" if schema.get("items").is_some_and(Value::is_array) => {
            let (position, rest) = rest.split_first().ok_or_else(|| first.clone())?;
            let item = member(member(schema, keyword), position);
            Ok(format!("/{}{}", position, data_location(rest, item)?))
        }
        "additionalItems" => Ok(format!("/-{}", data_location(rest, member(schema, keyword))?)),
        "items" if schema.get("items").is_some_and(Value::is_object) => {
            Ok(format!("/-{}", data_location(rest, member(schema, keyword))?))
        }
        "allOf" | "anyOf" | "oneOf" => {
            let (branch, rest) = rest.split_first().ok_or_else(|| first.clone())?;
            data_location(rest, member(member(schema, keyword), branch))
        }
        "not" => data_location(rest, member(schema, keyword)),
        _ if AMBIGUOUS_KEYWORDS.contains(&keyword) => Err(first.clone()),
        _ => Ok(String::new()),
    }
}

fn member<'a>(value: &'a Value, key: &str) -> &'a Value {
    own_target(value, key)
        .and_then(|target| child(value, &target))
        .unwrap_or(&NULL)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn array_map(entries: &[(&str, usize)]) -> ArrayMap {
        entries.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn indexed_pointers() {
        assert_eq!(to_indexed_pointer("/a/-/b/-", &[2, 5], None).unwrap(), "/a/2/b/5");
        assert_eq!(to_indexed_pointer("/a/-/b/-", &[2], None).unwrap(), "/a/2/b/-");

        let map = array_map(&[("/a", 0)]);
        assert_eq!(
            to_indexed_pointer("/a/-/b/-", &[3, 4], Some(&map)).unwrap(),
            "/a/3/b/-"
        );
    }

    #[test]
    fn generic_pointers() {
        let map = array_map(&[("/list", 0), ("/tuple", 2), ("/list/-/inner", 0)]);
        assert_eq!(to_generic_pointer("/list/4", &map).unwrap(), "/list/-");
        assert_eq!(to_generic_pointer("/tuple/1", &map).unwrap(), "/tuple/1");
        assert_eq!(to_generic_pointer("/tuple/2", &map).unwrap(), "/tuple/-");
        assert_eq!(
            to_generic_pointer("/list/3/inner/7", &map).unwrap(),
            "/list/-/inner/-"
        );
        assert_eq!(to_generic_pointer("/other/3", &map).unwrap(), "/other/3");
        assert!(to_generic_pointer("nope", &map).is_err());
    }

    #[test]
    fn recursive_references_collapse() {
        let mut refs = RecursiveRefMap::new();
        refs.insert("/children/-/children".into(), "/children".into());
        let map = array_map(&[("/children", 0)]);

        let collapsed =
            remove_recursive_references("/children/0/children/1/children/2/name", &refs, &map)
                .unwrap();
        assert_eq!(collapsed, "/children/-/name");
        assert_eq!(remove_recursive_references("", &refs, &map).unwrap(), "");
    }

    fn person_schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "name": { "type": "string" },
                "tags": { "type": "array", "items": { "type": "string" } },
                "pair": {
                    "type": "array",
                    "items": [{ "type": "string" }, { "type": "number" }],
                    "additionalItems": { "type": "boolean" }
                },
                "a/b": { "type": "string" }
            },
            "additionalProperties": { "type": "integer" },
            "definitions": { "id": { "type": "string" } }
        })
    }

    #[test]
    fn data_to_schema() {
        let schema = person_schema();
        assert_eq!(to_schema_pointer("/name", &schema).unwrap(), "/properties/name");
        assert_eq!(to_schema_pointer("/tags/3", &schema).unwrap(), "/properties/tags/items");
        assert_eq!(to_schema_pointer("/tags/-", &schema).unwrap(), "/properties/tags/items");
        assert_eq!(to_schema_pointer("/pair/1", &schema).unwrap(), "/properties/pair/items/1");
        assert_eq!(
            to_schema_pointer("/pair/5", &schema).unwrap(),
            "/properties/pair/additionalItems"
        );
        assert_eq!(
            to_schema_pointer("/pair/99999999999999999999", &schema).unwrap(),
            "/properties/pair/additionalItems"
        );
        assert_eq!(to_schema_pointer("/pair/-", &schema).unwrap(), "/properties/pair/items/0");
        assert_eq!(to_schema_pointer("/extra", &schema).unwrap(), "/additionalProperties");
        assert_eq!(to_schema_pointer("/a~1b", &schema).unwrap(), "/properties/a~1b");
        assert_eq!(to_schema_pointer("", &schema).unwrap(), "");
    }

    #[test]
    fn data_to_schema_not_described() {
        let schema = json!({ "properties": { "name": { "type": "string" } } });
        assert!(matches!(
            to_schema_pointer("/age", &schema),
            Err(PointerError::NotDescribed { .. })
        ));
        assert!(to_schema_pointer("/name/0", &schema).is_err());
    }

    #[test]
    fn data_to_schema_through_combinators() {
        let schema = json!({
            "allOf": [
                { "properties": { "a": { "type": "string" } } },
                { "properties": { "b": { "type": "number" } } }
            ]
        });
        assert_eq!(to_schema_pointer("/b", &schema).unwrap(), "/allOf/1/properties/b");
    }

    #[test]
    fn schema_to_data() {
        let schema = person_schema();
        assert_eq!(to_data_pointer("/properties/name", &schema).unwrap(), "/name");
        assert_eq!(to_data_pointer("/properties/tags/items", &schema).unwrap(), "/tags/-");
        assert_eq!(to_data_pointer("/properties/pair/items/1", &schema).unwrap(), "/pair/1");
        assert_eq!(
            to_data_pointer("/properties/pair/additionalItems", &schema).unwrap(),
            "/pair/-"
        );
        assert_eq!(to_data_pointer("/properties/name/type", &schema).unwrap(), "/name");
        assert_eq!(to_data_pointer("/properties/a~1b", &schema).unwrap(), "/a~1b");
    }

    #[test]
    fn schema_to_data_ambiguous() {
        let schema = person_schema();
        assert!(matches!(
            to_data_pointer("/definitions/id", &schema),
            Err(PointerError::Ambiguous { keyword, .. }) if keyword == "definitions"
        ));
        assert!(matches!(
            to_data_pointer("/additionalProperties", &schema),
            Err(PointerError::Ambiguous { .. })
        ));
        assert!(matches!(
            to_data_pointer("/properties/missing", &schema),
            Err(PointerError::Unresolved { .. })
        ));
    }

    #[test]
    fn schema_to_data_through_combinators() {
        let schema = json!({
            "anyOf": [{ "properties": { "x": { "not": { "properties": { "y": {} } } } } }]
        });
        assert_eq!(
            to_data_pointer("/anyOf/0/properties/x/not/properties/y", &schema).unwrap(),
            "/x/y"
        );
    }
}
