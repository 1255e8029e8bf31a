//! Keyword-aware merging of JSON Schema fragments.
//!
//! Fragments are folded left to right. A keyword present in only one fragment,
//! or with equal values everywhere, is copied. Conflicting values go through a
//! keyword-specific combinator; when any keyword cannot be combined without
//! changing what the schema accepts, the whole merge becomes
//! `{"allOf": [fragments...]}`.

use serde_json::{Map, Number, Value};

use crate::error::MergeError;
use crate::types::{common_items, is_empty, is_truthy, json_type_name, unique_items};

const LOG_TARGET: &str = "schema_kit::merge";

/// Merge schema fragments into one equivalent schema.
///
/// Empty fragments (`{}`, `null`, `false`) are skipped. If the fragments
/// conflict on a keyword that has no lossless combination, the result is the
/// `allOf` conjunction of the non-empty fragments, which is always sound.
///
/// # Errors
///
/// `MergeError::NotAnObject` if a non-empty fragment is not a JSON object.
///
/// # Example
///
/// ```
/// use schema_kit::merge_schemas;
/// use serde_json::json;
///
/// let merged = merge_schemas(&[json!({"minimum": 1}), json!({"minimum": 5, "type": "integer"})]).unwrap();
/// assert_eq!(merged, json!({"minimum": 5, "type": "integer"}));
/// ```
pub fn merge_schemas(schemas: &[Value]) -> Result<Value, MergeError> {
    let fragments: Vec<&Value> = schemas.iter().collect();
    merge_refs(&fragments).map(Merged::into_value)
}

/// Result of merging borrowed fragments.
enum Merged {
    Schema(Map<String, Value>),
    AllOf(Vec<Value>),
}

impl Merged {
    fn into_value(self) -> Value {
        match self {
            Merged::Schema(schema) => Value::Object(schema),
            Merged::AllOf(fragments) => {
                let mut wrapper = Map::new();
                wrapper.insert("allOf".to_string(), Value::Array(fragments));
                Value::Object(wrapper)
            }
        }
    }
}

/// A keyword whose values cannot be combined.
#[derive(Debug)]
struct Unmergeable {
    keyword: String,
}

impl Unmergeable {
    fn new(keyword: &str) -> Self {
        Self {
            keyword: keyword.to_string(),
        }
    }
}

fn merge_refs(schemas: &[&Value]) -> Result<Merged, MergeError> {
    let mut fragments = Vec::with_capacity(schemas.len());
    for (index, schema) in schemas.iter().enumerate() {
        if is_empty(schema) {
            continue;
        }
        match schema {
            Value::Object(map) => fragments.push(map),
            other => {
                tracing::warn!(
                    target: LOG_TARGET,
                    index,
                    actual = json_type_name(other),
                    "schema fragment is not an object"
                );
                return Err(MergeError::NotAnObject {
                    index,
                    actual: json_type_name(other).to_string(),
                });
            }
        }
    }

    match fold(&fragments) {
        Ok(schema) => Ok(Merged::Schema(schema)),
        Err(Unmergeable { keyword }) => {
            tracing::debug!(
                target: LOG_TARGET,
                keyword = %keyword,
                fragments = fragments.len(),
                "keyword cannot be merged, falling back to allOf"
            );
            Ok(Merged::AllOf(
                fragments.into_iter().map(|f| Value::Object(f.clone())).collect(),
            ))
        }
    }
}

fn fold(fragments: &[&Map<String, Value>]) -> Result<Map<String, Value>, Unmergeable> {
    let mut merged = Map::new();
    for fragment in fragments {
        // properties of this fragment are reconciled against what came before it
        let prior_additional = merged.get("additionalProperties").cloned();
        for (key, incoming) in fragment.iter() {
            let value = match merged.get(key) {
                Some(existing) if existing != incoming => {
                    let context = Context {
                        incoming_additional: fragment.get("additionalProperties"),
                        prior_additional: prior_additional.as_ref(),
                    };
                    combine(key, existing, incoming, &context)?
                }
                _ => incoming.clone(),
            };
            merged.insert(key.clone(), value);
        }
    }
    Ok(merged)
}

/// `additionalProperties` on either side of a `properties` conflict.
struct Context<'a> {
    incoming_additional: Option<&'a Value>,
    prior_additional: Option<&'a Value>,
}

fn combine(key: &str, existing: &Value, incoming: &Value, context: &Context<'_>) -> Result<Value, Unmergeable> {
    let conflict = || Unmergeable::new(key);

    match key {
        "allOf" => {
            let (Value::Array(left), Value::Array(right)) = (existing, incoming) else {
                return Err(conflict());
            };
            let items: Vec<&Value> = left.iter().chain(right).collect();
            match merge_refs(&items).map_err(|_| conflict())? {
                Merged::Schema(schema) => Ok(Value::Array(vec![Value::Object(schema)])),
                Merged::AllOf(_) => Ok(Value::Array(items.into_iter().cloned().collect())),
            }
        }
        "additionalProperties" if existing == &Value::Bool(false) || incoming == &Value::Bool(false) => {
            Ok(Value::Bool(false))
        }
        "additionalItems" | "additionalProperties" | "contains" | "propertyNames" => {
            if is_schema(existing) && is_schema(incoming) {
                merge_values(key, existing, incoming)
            } else {
                Err(conflict())
            }
        }
        "anyOf" | "oneOf" | "enum" => intersect(key, existing, incoming),
        "definitions" => {
            let (Value::Object(left), Value::Object(right)) = (existing, incoming) else {
                return Err(conflict());
            };
            let mut union = left.clone();
            for (name, schema) in right {
                match union.get(name) {
                    Some(current) if current != schema => return Err(conflict()),
                    _ => {
                        union.insert(name.clone(), schema.clone());
                    }
                }
            }
            Ok(Value::Object(union))
        }
        "dependencies" => {
            let (Value::Object(left), Value::Object(right)) = (existing, incoming) else {
                return Err(conflict());
            };
            let mut union = left.clone();
            for (name, dependency) in right {
                let combined = match union.get(name) {
                    None => dependency.clone(),
                    Some(current) if current == dependency => continue,
                    Some(Value::Array(a)) if dependency.is_array() => {
                        Value::Array(unique_items(a.iter().chain(array_items(dependency))))
                    }
                    Some(current) => match (current, dependency) {
                        (Value::Object(_), Value::Array(_)) => {
                            merge_values(key, current, &required_schema(dependency))?
                        }
                        (Value::Array(_), Value::Object(_)) => {
                            merge_values(key, &required_schema(current), dependency)?
                        }
                        _ => return Err(conflict()),
                    },
                };
                union.insert(name.clone(), combined);
            }
            Ok(Value::Object(union))
        }
        "items" => match (existing, incoming) {
            (Value::Array(_), Value::Array(_)) => intersect(key, existing, incoming),
            (Value::Object(_), Value::Object(_)) => merge_values(key, existing, incoming),
            (Value::Array(tuple), Value::Object(_)) => tuple
                .iter()
                .map(|item| merge_values(key, item, incoming))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array),
            (Value::Object(_), Value::Array(tuple)) => tuple
                .iter()
                .map(|item| merge_values(key, existing, item))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array),
            _ => Err(conflict()),
        },
        "multipleOf" => least_common_multiple(existing, incoming).ok_or_else(conflict),
        "maximum" | "exclusiveMaximum" | "maxLength" | "maxItems" | "maxProperties" => {
            tighter(existing, incoming, |a, b| a <= b).ok_or_else(conflict)
        }
        "minimum" | "exclusiveMinimum" | "minLength" | "minItems" | "minProperties" => {
            tighter(existing, incoming, |a, b| a >= b).ok_or_else(conflict)
        }
        "not" => {
            if !existing.is_object() || !incoming.is_object() {
                return Err(conflict());
            }
            let alternatives = unique_items(negated_alternatives(existing).chain(negated_alternatives(incoming)));
            let mut any_of = Map::new();
            any_of.insert("anyOf".to_string(), Value::Array(alternatives));
            Ok(Value::Object(any_of))
        }
        "patternProperties" => {
            let (Value::Object(left), Value::Object(right)) = (existing, incoming) else {
                return Err(conflict());
            };
            let mut union = left.clone();
            for (pattern, schema) in right {
                let combined = match union.get(pattern) {
                    None => schema.clone(),
                    Some(current) if current == schema => continue,
                    Some(current) if is_schema(current) && is_schema(schema) => {
                        merge_values(key, current, schema)?
                    }
                    Some(_) => return Err(conflict()),
                };
                union.insert(pattern.clone(), combined);
            }
            Ok(Value::Object(union))
        }
        "properties" => {
            let (Value::Object(left), Value::Object(right)) = (existing, incoming) else {
                return Err(conflict());
            };
            combine_properties(left, right, context).map(Value::Object)
        }
        "required" => match (existing, incoming) {
            (Value::Array(left), Value::Array(right)) => Ok(Value::Array(unique_items(left.iter().chain(right)))),
            (Value::Bool(left), Value::Bool(right)) => Ok(Value::Bool(*left || *right)),
            _ => Err(conflict()),
        },
        "$schema" | "$id" | "id" => Ok(existing.clone()),
        "title" | "description" | "$comment" => Ok(incoming.clone()),
        "type" => {
            let common = unique_items(&common_items(&type_set(existing), &type_set(incoming)));
            match common.len() {
                0 => Err(conflict()),
                1 => Ok(common.into_iter().next().unwrap_or_default()),
                _ => Ok(Value::Array(common)),
            }
        }
        "uniqueItems" => Ok(Value::Bool(is_truthy(existing) || is_truthy(incoming))),
        _ => Err(conflict()),
    }
}

/// Merge two sub-schemas. A nested fallback is a valid combined value.
///
/// `false` accepts nothing, so it absorbs the other side; `true` accepts
/// everything and yields to it.
fn merge_values(keyword: &str, left: &Value, right: &Value) -> Result<Value, Unmergeable> {
    match (left, right) {
        _ if left == right => return Ok(left.clone()),
        (Value::Bool(false), _) | (_, Value::Bool(false)) => return Ok(Value::Bool(false)),
        (Value::Bool(true), other) | (other, Value::Bool(true)) => return Ok(other.clone()),
        _ => {}
    }
    merge_refs(&[left, right])
        .map(Merged::into_value)
        .map_err(|_| Unmergeable::new(keyword))
}

fn combine_properties(
    existing: &Map<String, Value>,
    incoming: &Map<String, Value>,
    context: &Context<'_>,
) -> Result<Map<String, Value>, Unmergeable> {
    let mut merged = Map::new();

    for (name, schema) in existing {
        let value = match (incoming.get(name), context.incoming_additional) {
            (Some(other), _) => merge_values("properties", schema, other)?,
            (None, Some(Value::Bool(false))) => continue,
            (None, Some(additional @ Value::Object(_))) => merge_values("properties", schema, additional)?,
            (None, _) => schema.clone(),
        };
        merged.insert(name.clone(), value);
    }

    for (name, schema) in incoming {
        if existing.contains_key(name) {
            continue;
        }
        let value = match context.prior_additional {
            Some(Value::Bool(false)) => continue,
            Some(additional @ Value::Object(_)) => merge_values("properties", additional, schema)?,
            _ => schema.clone(),
        };
        merged.insert(name.clone(), value);
    }

    Ok(merged)
}

/// Object and boolean schemas.
fn is_schema(value: &Value) -> bool {
    matches!(value, Value::Object(_) | Value::Bool(_))
}

fn intersect(keyword: &str, left: &Value, right: &Value) -> Result<Value, Unmergeable> {
    let (Value::Array(left), Value::Array(right)) = (left, right) else {
        return Err(Unmergeable::new(keyword));
    };
    let common = common_items(left, right);
    if common.is_empty() {
        return Err(Unmergeable::new(keyword));
    }
    Ok(Value::Array(common))
}

fn array_items(value: &Value) -> impl Iterator<Item = &Value> {
    value.as_array().into_iter().flatten()
}

fn required_schema(required: &Value) -> Value {
    let mut schema = Map::new();
    schema.insert("required".to_string(), required.clone());
    Value::Object(schema)
}

/// Operands of a `not`, with a bare `{"anyOf": [...]}` flattened into its items.
fn negated_alternatives(schema: &Value) -> Box<dyn Iterator<Item = &Value> + '_> {
    match schema.as_object() {
        Some(map) if map.len() == 1 => match map.get("anyOf") {
            Some(Value::Array(items)) => Box::new(items.iter()),
            _ => Box::new(std::iter::once(schema)),
        },
        _ => Box::new(std::iter::once(schema)),
    }
}

fn type_set(value: &Value) -> Vec<Value> {
    match value {
        Value::String(_) => vec![value.clone()],
        Value::Array(types) => types.iter().filter(|t| t.is_string()).cloned().collect(),
        _ => Vec::new(),
    }
}

/// Pick whichever bound `keep_left` prefers.
fn tighter(left: &Value, right: &Value, keep_left: impl Fn(f64, f64) -> bool) -> Option<Value> {
    let (a, b) = (left.as_f64()?, right.as_f64()?);
    Some(if keep_left(a, b) { left.clone() } else { right.clone() })
}

fn least_common_multiple(left: &Value, right: &Value) -> Option<Value> {
    if let (Some(a), Some(b)) = (left.as_u64(), right.as_u64()) {
        if a == 0 || b == 0 {
            return None;
        }
        return (a / gcd(a, b)).checked_mul(b).map(Value::from);
    }

    let (a, b) = (left.as_f64()?, right.as_f64()?);
    if a <= 0.0 || b <= 0.0 {
        return None;
    }
    let mut lcm = a * b / gcd_f64(a, b);
    let rounded = lcm.round();
    if (lcm - rounded).abs() < FLOAT_TOLERANCE {
        lcm = rounded;
    }
    Number::from_f64(lcm).map(Value::Number)
}

const FLOAT_TOLERANCE: f64 = 1e-9;

fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

fn gcd_f64(mut a: f64, mut b: f64) -> f64 {
    while b > FLOAT_TOLERANCE {
        (a, b) = (b, a % b);
    }
    a
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn merge(schemas: &[Value]) -> Value {
        merge_schemas(schemas).unwrap()
    }

    #[test]
    fn single_fragment_is_identity() {
        let schema = json!({"type": "object", "properties": {"a": {"type": "string"}}});
        assert_eq!(merge(&[schema.clone()]), schema);
    }

    #[test]
    fn empty_fragments_are_skipped() {
        assert_eq!(merge(&[json!({}), json!(null), json!({"minimum": 2})]), json!({"minimum": 2}));
        assert_eq!(merge(&[]), json!({}));
    }

    #[test]
    fn non_object_fragment_is_an_error() {
        let err = merge_schemas(&[json!({"type": "string"}), json!("oops")]).unwrap_err();
        assert_eq!(
            err,
            MergeError::NotAnObject {
                index: 1,
                actual: "string".into()
            }
        );
    }

    #[test]
    fn bounds_take_tightest() {
        assert_eq!(merge(&[json!({"minimum": 1}), json!({"minimum": 5})]), json!({"minimum": 5}));
        assert_eq!(merge(&[json!({"maxLength": 10}), json!({"maxLength": 3})]), json!({"maxLength": 3}));
        assert_eq!(
            merge(&[json!({"exclusiveMaximum": 2.5}), json!({"exclusiveMaximum": 7})]),
            json!({"exclusiveMaximum": 2.5})
        );
    }

    #[test]
    fn multiple_of_uses_lcm() {
        assert_eq!(merge(&[json!({"multipleOf": 4}), json!({"multipleOf": 6})]), json!({"multipleOf": 12}));
        assert_eq!(
            merge(&[json!({"multipleOf": 1.5}), json!({"multipleOf": 2})]),
            json!({"multipleOf": 6.0})
        );
    }

    #[test]
    fn type_intersection() {
        assert_eq!(
            merge(&[json!({"type": ["string", "null"]}), json!({"type": ["null", "string", "number"]})]),
            json!({"type": ["string", "null"]})
        );
        assert_eq!(
            merge(&[json!({"type": ["string", "null"]}), json!({"type": "null"})]),
            json!({"type": "null"})
        );
    }

    #[test]
    fn conflict_falls_back_for_whole_schema() {
        let a = json!({"type": "string", "minLength": 1});
        let b = json!({"type": "number", "minLength": 4});
        assert_eq!(merge(&[a.clone(), b.clone()]), json!({"allOf": [a, b]}));
    }

    #[test]
    fn unknown_keyword_conflict_falls_back() {
        let a = json!({"const": 1});
        let b = json!({"const": 2});
        assert_eq!(merge(&[a.clone(), b.clone()]), json!({"allOf": [a, b]}));
        assert_eq!(merge(&[a.clone(), a.clone()]), a);
    }

    #[test]
    fn enum_and_any_of_intersect() {
        assert_eq!(
            merge(&[json!({"enum": ["a", "b", "c"]}), json!({"enum": ["c", "b", "z"]})]),
            json!({"enum": ["b", "c"]})
        );
        let a = json!({"enum": ["a"]});
        let b = json!({"enum": ["b"]});
        assert_eq!(merge(&[a.clone(), b.clone()]), json!({"allOf": [a, b]}));
    }

    #[test]
    fn required_and_unique_items() {
        assert_eq!(
            merge(&[json!({"required": ["a", "b"]}), json!({"required": ["b", "c"]})]),
            json!({"required": ["a", "b", "c"]})
        );
        assert_eq!(
            merge(&[json!({"uniqueItems": false}), json!({"uniqueItems": true})]),
            json!({"uniqueItems": true})
        );
    }

    #[test]
    fn annotations() {
        assert_eq!(
            merge(&[json!({"title": "A", "$id": "one"}), json!({"title": "B", "$id": "two"})]),
            json!({"title": "B", "$id": "one"})
        );
    }

    #[test]
    fn additional_properties_false_wins() {
        assert_eq!(
            merge(&[json!({"additionalProperties": {"type": "string"}}), json!({"additionalProperties": false})]),
            json!({"additionalProperties": false})
        );
        assert_eq!(
            merge(&[
                json!({"additionalProperties": {"type": "string"}}),
                json!({"additionalProperties": {"maxLength": 3}})
            ]),
            json!({"additionalProperties": {"type": "string", "maxLength": 3}})
        );
    }

    #[test]
    fn properties_union_and_nested_merge() {
        assert_eq!(
            merge(&[
                json!({"properties": {"a": {"type": "string"}, "b": {"minimum": 1}}}),
                json!({"properties": {"b": {"minimum": 3}, "c": {"type": "boolean"}}})
            ]),
            json!({"properties": {
                "a": {"type": "string"},
                "b": {"minimum": 3},
                "c": {"type": "boolean"}
            }})
        );
    }

    #[test]
    fn properties_respect_incoming_additional_properties() {
        let merged = merge(&[
            json!({"properties": {"a": {"type": "string"}, "b": {"type": "number"}}}),
            json!({"properties": {"a": {"minLength": 1}}, "additionalProperties": false}),
        ]);
        assert_eq!(
            merged,
            json!({
                "properties": {"a": {"type": "string", "minLength": 1}},
                "additionalProperties": false
            })
        );

        let merged = merge(&[
            json!({"properties": {"a": {"type": "string"}, "b": {"type": "number"}}}),
            json!({"properties": {"a": {"minLength": 1}}, "additionalProperties": {"minimum": 0}}),
        ]);
        assert_eq!(
            merged["properties"]["b"],
            json!({"type": "number", "minimum": 0})
        );
    }

    #[test]
    fn properties_respect_prior_additional_properties() {
        let merged = merge(&[
            json!({"properties": {"a": {"type": "string"}}, "additionalProperties": false}),
            json!({"properties": {"a": {"maxLength": 4}, "z": {"type": "string"}}}),
        ]);
        assert_eq!(
            merged,
            json!({
                "properties": {"a": {"type": "string", "maxLength": 4}},
                "additionalProperties": false
            })
        );
    }

    #[test]
    fn nested_conflict_wraps_only_that_property() {
        let merged = merge(&[
            json!({"properties": {"a": {"type": "string"}}}),
            json!({"properties": {"a": {"type": "number"}}}),
        ]);
        assert_eq!(
            merged,
            json!({"properties": {"a": {"allOf": [{"type": "string"}, {"type": "number"}]}}})
        );
    }

    #[test]
    fn all_of_concatenates_and_merges() {
        assert_eq!(
            merge(&[json!({"allOf": [{"minimum": 1}]}), json!({"allOf": [{"minimum": 4}]})]),
            json!({"allOf": [{"minimum": 4}]})
        );
        assert_eq!(
            merge(&[json!({"allOf": [{"type": "string"}]}), json!({"allOf": [{"type": "number"}]})]),
            json!({"allOf": [{"type": "string"}, {"type": "number"}]})
        );
    }

    #[test]
    fn items_combinations() {
        assert_eq!(
            merge(&[json!({"items": {"type": "string"}}), json!({"items": {"maxLength": 2}})]),
            json!({"items": {"type": "string", "maxLength": 2}})
        );
        assert_eq!(
            merge(&[
                json!({"items": [{"type": "string"}, {"type": "number"}]}),
                json!({"items": {"minimum": 0}})
            ]),
            json!({"items": [{"type": "string", "minimum": 0}, {"type": "number", "minimum": 0}]})
        );
    }

    #[test]
    fn not_collects_alternatives() {
        assert_eq!(
            merge(&[
                json!({"not": {"anyOf": [{"const": 1}, {"const": 2}]}}),
                json!({"not": {"const": 3}})
            ]),
            json!({"not": {"anyOf": [{"const": 1}, {"const": 2}, {"const": 3}]}})
        );
    }

    #[test]
    fn dependencies_merge() {
        assert_eq!(
            merge(&[
                json!({"dependencies": {"a": ["b"], "x": ["y"]}}),
                json!({"dependencies": {"a": ["c", "b"], "x": {"properties": {"y": {"type": "string"}}}}})
            ]),
            json!({"dependencies": {
                "a": ["b", "c"],
                "x": {"required": ["y"], "properties": {"y": {"type": "string"}}}
            }})
        );
    }

    #[test]
    fn definitions_and_pattern_properties() {
        let a = json!({"definitions": {"id": {"type": "string"}}});
        let b = json!({"definitions": {"id": {"type": "number"}}});
        assert_eq!(merge(&[a.clone(), b.clone()]), json!({"allOf": [a, b]}));

        assert_eq!(
            merge(&[
                json!({"patternProperties": {"^x-": {"type": "string"}}}),
                json!({"patternProperties": {"^x-": {"maxLength": 9}, "^y-": {}}})
            ]),
            json!({"patternProperties": {"^x-": {"type": "string", "maxLength": 9}, "^y-": {}}})
        );
    }

    #[test]
    fn multiple_of_without_a_common_multiple_falls_back() {
        let huge = json!({"multipleOf": u64::MAX});
        let even = json!({"multipleOf": 2});
        assert_eq!(merge(&[huge.clone(), even.clone()]), json!({"allOf": [huge, even]}));

        let zero = json!({"multipleOf": 0});
        let three = json!({"multipleOf": 3});
        assert_eq!(merge(&[zero.clone(), three.clone()]), json!({"allOf": [zero, three]}));

        let negative = json!({"multipleOf": -2});
        assert_eq!(merge(&[negative.clone(), three.clone()]), json!({"allOf": [negative, three]}));
    }

    #[test]
    fn duplicate_types_collapse() {
        assert_eq!(
            merge(&[json!({"type": ["string", "string"]}), json!({"type": ["string"]})]),
            json!({"type": "string"})
        );
        assert_eq!(
            merge(&[json!({"type": ["null", "string", "null"]}), json!({"type": ["string", "null"]})]),
            json!({"type": ["null", "string"]})
        );
    }

    #[test]
    fn required_flags_or_together() {
        assert_eq!(
            merge(&[json!({"required": false}), json!({"required": true})]),
            json!({"required": true})
        );
        let list = json!({"required": ["a"]});
        let flag = json!({"required": true});
        assert_eq!(merge(&[list.clone(), flag.clone()]), json!({"allOf": [list, flag]}));
    }

    #[test]
    fn single_sub_schema_keywords_merge_recursively() {
        for keyword in ["contains", "propertyNames", "additionalItems"] {
            assert_eq!(
                merge(&[json!({keyword: {"maxLength": 5}}), json!({keyword: {"minLength": 1}})]),
                json!({keyword: {"maxLength": 5, "minLength": 1}})
            );
            // a nested conflict only wraps the sub-schema
            assert_eq!(
                merge(&[json!({keyword: {"type": "string"}}), json!({keyword: {"type": "number"}})]),
                json!({keyword: {"allOf": [{"type": "string"}, {"type": "number"}]}})
            );
            let a = json!({keyword: {"type": "string"}});
            let b = json!({keyword: 3});
            assert_eq!(merge(&[a.clone(), b.clone()]), json!({"allOf": [a, b]}));
        }
    }

    #[test]
    fn boolean_sub_schemas() {
        assert_eq!(
            merge(&[json!({"properties": {"a": false}}), json!({"properties": {"a": {"type": "string"}}})]),
            json!({"properties": {"a": false}})
        );
        assert_eq!(
            merge(&[json!({"properties": {"a": {"type": "string"}}}), json!({"properties": {"a": false}})]),
            json!({"properties": {"a": false}})
        );
        assert_eq!(
            merge(&[json!({"properties": {"a": true}}), json!({"properties": {"a": {"type": "string"}}})]),
            json!({"properties": {"a": {"type": "string"}}})
        );
        assert_eq!(
            merge(&[json!({"additionalItems": false}), json!({"additionalItems": {"type": "string"}})]),
            json!({"additionalItems": false})
        );
        assert_eq!(
            merge(&[
                json!({"patternProperties": {"^x-": {"type": "string"}}}),
                json!({"patternProperties": {"^x-": false}})
            ]),
            json!({"patternProperties": {"^x-": false}})
        );
    }

    #[test]
    fn items_object_then_tuple() {
        assert_eq!(
            merge(&[
                json!({"items": {"minimum": 0}}),
                json!({"items": [{"type": "number"}, {"type": "integer"}]})
            ]),
            json!({"items": [{"minimum": 0, "type": "number"}, {"minimum": 0, "type": "integer"}]})
        );
        let a = json!({"items": [{"type": "string"}]});
        let b = json!({"items": [{"type": "number"}]});
        assert_eq!(merge(&[a.clone(), b.clone()]), json!({"allOf": [a, b]}));

        let c = json!({"items": {"minimum": 0}});
        let d = json!({"items": 3});
        assert_eq!(merge(&[c.clone(), d.clone()]), json!({"allOf": [c, d]}));
    }

    #[test]
    fn inputs_are_not_mutated() {
        let a = json!({"properties": {"a": {"minimum": 1}}});
        let b = json!({"properties": {"a": {"minimum": 2}}});
        let before = (a.clone(), b.clone());
        let _ = merge(&[a.clone(), b.clone()]);
        assert_eq!((a, b), before);
    }
}
