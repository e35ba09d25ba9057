//! Encoding of conditional field visibility in JSON Schema `dependencies`.
//!
//! A dependency group lives at `dependencies[parent].oneOf` of the object
//! that owns both the parent and its children. Each branch is one
//! [`Possibility`]:
//!
//! - **Definition-based** (any value): `{properties: {child: {}, ...}}`. The
//!   branch applies whenever the parent is present.
//! - **Value-based**: `{properties: {parent: {enum: [...]}, child: {}, ...}}`.
//!   The branch applies only when the parent's value is listed.
//!
//! Groups are never mixed: a group is value-based when every possibility
//! carries a `value`, and the editor rewrites whole groups when switching.
//! A value with an empty `enum` is a value-based branch whose filter has not
//! been filled in yet.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::error::{Document, EditorError};
use crate::schema_utils::{rename_entry, string_list};
use crate::warning::Warning;

// ---------------------------------------------------------------------------
// Model
// ---------------------------------------------------------------------------

/// One branch of a dependency group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Possibility {
    /// Sibling property names shown when the branch applies.
    pub children: Vec<String>,
    /// Value filter on the parent; `None` for definition-based branches.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<PossibilityValue>,
}

/// Parent values selecting a branch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PossibilityValue {
    #[serde(rename = "enum")]
    pub values: Vec<Value>,
}

impl Possibility {
    pub fn any_value(children: Vec<String>) -> Self {
        Self {
            children,
            value: None,
        }
    }

    pub fn with_values(children: Vec<String>, values: Vec<Value>) -> Self {
        Self {
            children,
            value: Some(PossibilityValue { values }),
        }
    }
}

/// How the branches of a group decide whether they apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DependencyMode {
    Definition,
    Value,
}

/// Mode of a group. Empty groups count as definition-based.
pub fn dependency_mode(possibilities: &[Possibility]) -> DependencyMode {
    if !possibilities.is_empty() && possibilities.iter().all(|p| p.value.is_some()) {
        DependencyMode::Value
    } else {
        DependencyMode::Definition
    }
}

// ---------------------------------------------------------------------------
// Decode / encode
// ---------------------------------------------------------------------------

/// A possibility together with the index of the raw `oneOf` branch it was
/// decoded from. `source` is `None` for branches created by an edit.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct SourcedPossibility {
    pub possibility: Possibility,
    pub source: Option<usize>,
}

impl SourcedPossibility {
    pub(crate) fn fresh(possibility: Possibility) -> Self {
        Self {
            possibility,
            source: None,
        }
    }
}

/// Decode `dependencies[parent]` into possibilities.
///
/// Branches that are not objects are skipped. Child order follows the
/// branch's `properties` order.
pub fn decode_possibilities(parent: &str, group: &Value) -> Vec<Possibility> {
    decode_sourced(parent, group)
        .into_iter()
        .map(|sourced| sourced.possibility)
        .collect()
}

pub(crate) fn decode_sourced(parent: &str, group: &Value) -> Vec<SourcedPossibility> {
    let Some(branches) = group.get("oneOf").and_then(Value::as_array) else {
        return Vec::new();
    };
    branches
        .iter()
        .enumerate()
        .filter_map(|(i, branch)| branch.as_object().map(|b| (i, b)))
        .map(|(i, branch)| {
            let props = branch.get("properties").and_then(Value::as_object);
            let children = props
                .map(|p| p.keys().filter(|k| *k != parent).cloned().collect())
                .unwrap_or_default();
            let value = props
                .and_then(|p| p.get(parent))
                .and_then(|constraint| constraint.get("enum"))
                .and_then(Value::as_array)
                .map(|values| PossibilityValue {
                    values: values.clone(),
                });
            SourcedPossibility {
                possibility: Possibility { children, value },
                source: Some(i),
            }
        })
        .collect()
}

/// Encode possibilities as a `{oneOf: [...]}` group.
pub fn encode_possibilities(parent: &str, possibilities: &[Possibility]) -> Value {
    let fresh: Vec<SourcedPossibility> = possibilities
        .iter()
        .cloned()
        .map(SourcedPossibility::fresh)
        .collect();
    encode_sourced(parent, &fresh, None)
}

/// Encode possibilities, carrying over what each one's source branch in
/// `previous` held beyond the possibility model: child sub-schemas, extra
/// keywords on the parent constraint, `required` entries for kept children
/// and any other branch keywords.
pub(crate) fn encode_sourced(
    parent: &str,
    possibilities: &[SourcedPossibility],
    previous: Option<&Value>,
) -> Value {
    let previous_branches = previous
        .and_then(|g| g.get("oneOf"))
        .and_then(Value::as_array);

    let branches: Vec<Value> = possibilities
        .iter()
        .map(|SourcedPossibility { possibility, source }| {
            let old = source
                .and_then(|i| previous_branches.and_then(|b| b.get(i)))
                .and_then(Value::as_object);
            let old_props = old
                .and_then(|b| b.get("properties"))
                .and_then(Value::as_object);

            let mut props = Map::new();
            if let Some(value) = &possibility.value {
                let mut constraint = old_props
                    .and_then(|p| p.get(parent))
                    .and_then(Value::as_object)
                    .cloned()
                    .unwrap_or_default();
                constraint.insert("enum".to_string(), json!(value.values));
                props.insert(parent.to_string(), Value::Object(constraint));
            }
            for child in &possibility.children {
                if child == parent {
                    continue;
                }
                let schema = old_props
                    .and_then(|p| p.get(child))
                    .cloned()
                    .unwrap_or_else(|| json!({}));
                props.insert(child.clone(), schema);
            }

            let mut branch = Map::new();
            branch.insert("properties".to_string(), Value::Object(props));
            if let Some(old) = old {
                for (key, value) in old {
                    if key != "properties" && key != "required" {
                        branch.insert(key.clone(), value.clone());
                    }
                }
            }
            let required: Vec<String> = string_list(old.and_then(|b| b.get("required")))
                .into_iter()
                .filter(|name| possibility.children.contains(name))
                .collect();
            if !required.is_empty() {
                branch.insert("required".to_string(), json!(required));
            }
            Value::Object(branch)
        })
        .collect();

    json!({ "oneOf": branches })
}

// ---------------------------------------------------------------------------
// Owner-level operations
// ---------------------------------------------------------------------------

/// Possibilities of `parent` inside `owner` (the object holding both).
pub fn dependents_of(owner: &Map<String, Value>, parent: &str) -> Vec<Possibility> {
    owner
        .get("dependencies")
        .and_then(|deps| deps.get(parent))
        .map(|group| decode_possibilities(parent, group))
        .unwrap_or_default()
}

pub(crate) fn sourced_dependents_of(owner: &Map<String, Value>, parent: &str) -> Vec<SourcedPossibility> {
    owner
        .get("dependencies")
        .and_then(|deps| deps.get(parent))
        .map(|group| decode_sourced(parent, group))
        .unwrap_or_default()
}

/// Names whose dependency groups list `child` in some branch.
pub fn parents_of(owner: &Map<String, Value>, child: &str) -> Vec<String> {
    let Some(deps) = owner.get("dependencies").and_then(Value::as_object) else {
        return Vec::new();
    };
    deps.iter()
        .filter(|(parent, group)| {
            decode_possibilities(parent, group)
                .iter()
                .any(|p| p.children.iter().any(|c| c == child))
        })
        .map(|(parent, _)| parent.clone())
        .collect()
}

/// Replace the group of `parent`; an empty list removes it.
pub(crate) fn set_dependents(
    owner: &mut Map<String, Value>,
    parent: &str,
    possibilities: &[SourcedPossibility],
) {
    if possibilities.is_empty() {
        if let Some(Value::Object(deps)) = owner.get_mut("dependencies") {
            deps.shift_remove(parent);
        }
        return;
    }
    let previous = owner
        .get("dependencies")
        .and_then(|deps| deps.get(parent))
        .cloned();
    let encoded = encode_sourced(parent, possibilities, previous.as_ref());
    crate::schema_utils::object_entry(owner, "dependencies").insert(parent.to_string(), encoded);
}

/// Remove every dependency edge touching `name`: its own group, and its
/// appearances as a child in other groups.
///
/// Definition-based branches left without children are dropped, and groups
/// left without branches are removed.
pub(crate) fn remove_references(owner: &mut Map<String, Value>, name: &str) {
    let Some(Value::Object(deps)) = owner.get_mut("dependencies") else {
        return;
    };
    deps.shift_remove(name);

    let parents: Vec<String> = deps.keys().cloned().collect();
    for parent in parents {
        let Some(group) = deps.get(&parent) else {
            continue;
        };
        let possibilities = decode_sourced(&parent, group);
        if !possibilities
            .iter()
            .any(|p| p.possibility.children.iter().any(|c| c == name))
        {
            continue;
        }
        let kept: Vec<SourcedPossibility> = possibilities
            .into_iter()
            .map(|mut p| {
                p.possibility.children.retain(|c| c != name);
                p
            })
            .filter(|p| p.possibility.value.is_some() || !p.possibility.children.is_empty())
            .collect();
        if kept.is_empty() {
            deps.shift_remove(&parent);
        } else {
            let encoded = encode_sourced(&parent, &kept, deps.get(&parent));
            deps.insert(parent, encoded);
        }
    }
}

/// Rename `old` to `new` everywhere in `dependencies`: the group key, the
/// parent constraint inside its own branches, and child entries elsewhere.
pub(crate) fn rename_references(owner: &mut Map<String, Value>, old: &str, new: &str) {
    let Some(Value::Object(deps)) = owner.get_mut("dependencies") else {
        return;
    };
    rename_entry(deps, old, new);
    for group in deps.values_mut() {
        let Some(Value::Array(branches)) = group.get_mut("oneOf") else {
            continue;
        };
        for branch in branches.iter_mut().filter_map(Value::as_object_mut) {
            if let Some(Value::Object(props)) = branch.get_mut("properties") {
                rename_entry(props, old, new);
            }
            crate::schema_utils::rename_in_list(branch, "required", old, new);
        }
    }
}

// ---------------------------------------------------------------------------
// Coverage warnings
// ---------------------------------------------------------------------------

/// Values of `parent_node.enum` not selected by any branch.
///
/// Only meaningful for value-based groups; returns nothing otherwise.
pub fn uncovered_values(parent_node: &Map<String, Value>, possibilities: &[Possibility]) -> Vec<Value> {
    if dependency_mode(possibilities) != DependencyMode::Value {
        return Vec::new();
    }
    let Some(domain) = parent_node.get("enum").and_then(Value::as_array) else {
        return Vec::new();
    };
    let covered: Vec<&Value> = possibilities
        .iter()
        .filter_map(|p| p.value.as_ref())
        .flat_map(|v| v.values.iter())
        .collect();
    domain
        .iter()
        .filter(|value| !covered.contains(value))
        .cloned()
        .collect()
}

/// Coverage warnings for every value-based group of `owner`.
///
/// `owner_path` is the element path of `owner`, used to build warning paths.
pub fn dependency_warnings(owner: &Map<String, Value>, owner_path: &crate::ElementPath) -> Vec<Warning> {
    let Some(deps) = owner.get("dependencies").and_then(Value::as_object) else {
        return Vec::new();
    };
    let props = owner.get("properties").and_then(Value::as_object);
    let mut warnings = Vec::new();
    for (parent, group) in deps {
        let Some(parent_node) = props.and_then(|p| p.get(parent)).and_then(Value::as_object) else {
            continue;
        };
        let possibilities = decode_possibilities(parent, group);
        let path = owner_path.child(parent).to_string();
        for value in uncovered_values(parent_node, &possibilities) {
            warnings.push(Warning::uncovered_value(&path, parent, &value));
        }
    }
    warnings
}

// ---------------------------------------------------------------------------
// Object-parent combination inputs
// ---------------------------------------------------------------------------

/// Widget used to type one field of an object-parent value combination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CombinationInput {
    Numeric,
    JsonArray,
    JsonObject,
    Text,
}

impl CombinationInput {
    /// Pick the input for a field from its declared schema.
    pub fn for_schema(node: &Map<String, Value>) -> Self {
        match node.get("type").and_then(Value::as_str) {
            Some("number") | Some("integer") => CombinationInput::Numeric,
            Some("array") => CombinationInput::JsonArray,
            _ if node.contains_key("enum") => CombinationInput::JsonArray,
            Some("object") => CombinationInput::JsonObject,
            _ if node.contains_key("properties") => CombinationInput::JsonObject,
            _ => CombinationInput::Text,
        }
    }

    /// Convert typed text into the stored value.
    pub fn parse(self, text: &str) -> Result<Value, EditorError> {
        match self {
            CombinationInput::Text => Ok(Value::String(text.to_string())),
            CombinationInput::Numeric => {
                let trimmed = text.trim();
                if let Ok(int) = trimmed.parse::<i64>() {
                    return Ok(Value::from(int));
                }
                trimmed
                    .parse::<f64>()
                    .ok()
                    .and_then(serde_json::Number::from_f64)
                    .map(Value::Number)
                    .ok_or_else(|| {
                        EditorError::parse(Document::InputValue, format!("'{text}' is not a number"))
                    })
            }
            CombinationInput::JsonArray => parse_json(text, Value::is_array, "a JSON array"),
            CombinationInput::JsonObject => parse_json(text, Value::is_object, "a JSON object"),
        }
    }
}

fn parse_json(text: &str, accept: fn(&Value) -> bool, expected: &str) -> Result<Value, EditorError> {
    let value: Value =
        serde_json::from_str(text).map_err(|e| EditorError::parse(Document::InputValue, e))?;
    if accept(&value) {
        Ok(value)
    } else {
        Err(EditorError::parse(
            Document::InputValue,
            format!("expected {expected}, found {value}"),
        ))
    }
}

/// One field of an object-typed parent and the input used to type it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombinationField {
    pub name: String,
    pub input: CombinationInput,
}

/// Inputs for each field of an object-typed parent, in declaration order.
pub fn combination_inputs(parent_node: &Map<String, Value>) -> Vec<CombinationField> {
    parent_node
        .get("properties")
        .and_then(Value::as_object)
        .map(|props| {
            props
                .iter()
                .map(|(name, schema)| CombinationField {
                    name: name.clone(),
                    input: schema
                        .as_object()
                        .map(CombinationInput::for_schema)
                        .unwrap_or(CombinationInput::Text),
                })
                .collect()
        })
        .unwrap_or_default()
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ElementPath;
    use pretty_assertions::assert_eq;

    fn obj(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_encode_definition_based() {
        let encoded = encode_possibilities(
            "pet",
            &[Possibility::any_value(vec!["name".into(), "age".into()])],
        );
        assert_eq!(
            encoded,
            json!({ "oneOf": [ { "properties": { "name": {}, "age": {} } } ] })
        );
    }

    #[test]
    fn test_encode_value_based_puts_parent_first() {
        let encoded = encode_possibilities(
            "status",
            &[Possibility::with_values(vec!["note".into()], vec![json!("a")])],
        );
        assert_eq!(
            encoded,
            json!({ "oneOf": [ { "properties": { "status": { "enum": ["a"] }, "note": {} } } ] })
        );
    }

    #[test]
    fn test_decode_round_trip() {
        let possibilities = vec![
            Possibility::any_value(vec!["a".into()]),
            Possibility::any_value(vec!["b".into(), "c".into()]),
        ];
        let encoded = encode_possibilities("p", &possibilities);
        assert_eq!(decode_possibilities("p", &encoded), possibilities);
    }

    #[test]
    fn test_mode_requires_every_branch_valued() {
        let mixed = vec![
            Possibility::with_values(vec![], vec![json!(1)]),
            Possibility::any_value(vec![]),
        ];
        assert_eq!(dependency_mode(&mixed), DependencyMode::Definition);
        let seeded = vec![Possibility::with_values(vec!["x".into()], vec![])];
        assert_eq!(dependency_mode(&seeded), DependencyMode::Value);
        assert_eq!(dependency_mode(&[]), DependencyMode::Definition);
    }

    #[test]
    fn test_encode_sourced_keeps_branch_schemas() {
        let previous = json!({
            "oneOf": [ { "properties": { "extra": { "type": "string" } }, "required": ["extra"] } ]
        });
        let mut possibilities = decode_sourced("p", &previous);
        possibilities[0].possibility.children.push("more".into());
        let encoded = encode_sourced("p", &possibilities, Some(&previous));
        assert_eq!(
            encoded,
            json!({
                "oneOf": [ {
                    "properties": { "extra": { "type": "string" }, "more": {} },
                    "required": ["extra"]
                } ]
            })
        );
    }

    #[test]
    fn test_encode_sourced_follows_source_index() {
        let previous = json!({
            "oneOf": [
                {
                    "properties": { "s": { "enum": ["a"] }, "note": { "type": "string", "minLength": 5 } },
                    "required": ["note"]
                },
                { "properties": { "s": { "enum": ["b"], "type": "string" }, "note": {} }, "title": "B" }
            ]
        });
        let mut possibilities = decode_sourced("s", &previous);
        possibilities.remove(0);
        possibilities.push(SourcedPossibility::fresh(Possibility::with_values(
            vec!["note".into()],
            vec![json!("c")],
        )));
        let encoded = encode_sourced("s", &possibilities, Some(&previous));
        assert_eq!(
            encoded,
            json!({
                "oneOf": [
                    { "properties": { "s": { "enum": ["b"], "type": "string" }, "note": {} }, "title": "B" },
                    { "properties": { "s": { "enum": ["c"] }, "note": {} } }
                ]
            })
        );
    }

    #[test]
    fn test_decode_sourced_skips_non_object_branches() {
        let group = json!({ "oneOf": [ true, { "properties": { "x": {} } } ] });
        let decoded = decode_sourced("p", &group);
        assert_eq!(decoded.len(), 1);
        assert_eq!(decoded[0].source, Some(1));
    }

    #[test]
    fn test_remove_references_strips_children() {
        let mut owner = obj(json!({
            "properties": { "a": {}, "b": {}, "c": {} },
            "dependencies": {
                "a": { "oneOf": [ { "properties": { "b": {} } }, { "properties": { "c": {} } } ] },
                "b": { "oneOf": [ { "properties": { "c": {} } } ] }
            }
        }));
        remove_references(&mut owner, "c");
        assert_eq!(
            owner["dependencies"],
            json!({ "a": { "oneOf": [ { "properties": { "b": {} } } ] } })
        );
    }

    #[test]
    fn test_remove_references_keeps_later_branch_data() {
        let mut owner = obj(json!({
            "properties": { "s": {}, "c": {}, "d": {} },
            "dependencies": {
                "s": { "oneOf": [
                    { "properties": { "c": { "minLength": 5 } }, "required": ["c"] },
                    { "properties": { "d": { "type": "integer", "minimum": 1 } }, "required": ["d"] }
                ] }
            }
        }));
        remove_references(&mut owner, "c");
        assert_eq!(
            owner["dependencies"],
            json!({
                "s": { "oneOf": [
                    { "properties": { "d": { "type": "integer", "minimum": 1 } }, "required": ["d"] }
                ] }
            })
        );
    }

    #[test]
    fn test_rename_references_everywhere() {
        let mut owner = obj(json!({
            "dependencies": {
                "status": { "oneOf": [ { "properties": { "status": { "enum": ["x"] }, "note": {} } } ] },
                "other": { "oneOf": [ { "properties": { "status": {} }, "required": ["status"] } ] }
            }
        }));
        rename_references(&mut owner, "status", "state");
        assert_eq!(
            owner["dependencies"],
            json!({
                "state": { "oneOf": [ { "properties": { "state": { "enum": ["x"] }, "note": {} } } ] },
                "other": { "oneOf": [ { "properties": { "state": {} }, "required": ["state"] } ] }
            })
        );
    }

    #[test]
    fn test_uncovered_values_reported() {
        let owner = obj(json!({
            "properties": {
                "status": { "type": "string", "enum": ["a", "b", "c"] },
                "note": { "type": "string" }
            },
            "dependencies": {
                "status": { "oneOf": [ { "properties": { "status": { "enum": ["a"] }, "note": {} } } ] }
            }
        }));
        let warnings = dependency_warnings(&owner, &ElementPath::root());
        let values: Vec<Value> = warnings
            .iter()
            .map(|w| match &w.kind {
                crate::WarningKind::UncoveredDependencyValue { value, .. } => value.clone(),
                other => panic!("unexpected warning {other:?}"),
            })
            .collect();
        assert_eq!(values, vec![json!("b"), json!("c")]);
        assert_eq!(warnings[0].path, "status");
    }

    #[test]
    fn test_parents_of_child() {
        let owner = obj(json!({
            "dependencies": { "a": { "oneOf": [ { "properties": { "b": {} } } ] } }
        }));
        assert_eq!(parents_of(&owner, "b"), vec!["a".to_string()]);
        assert!(parents_of(&owner, "a").is_empty());
    }

    #[test]
    fn test_combination_inputs_by_type() {
        let parent = obj(json!({
            "type": "object",
            "properties": {
                "count": { "type": "integer" },
                "tags": { "type": "array" },
                "kind": { "enum": ["x"] },
                "meta": { "properties": {} },
                "name": { "type": "string" }
            }
        }));
        let inputs: Vec<CombinationInput> =
            combination_inputs(&parent).into_iter().map(|f| f.input).collect();
        assert_eq!(
            inputs,
            vec![
                CombinationInput::Numeric,
                CombinationInput::JsonArray,
                CombinationInput::JsonArray,
                CombinationInput::JsonObject,
                CombinationInput::Text,
            ]
        );
    }

    #[test]
    fn test_combination_input_parse() {
        assert_eq!(CombinationInput::Numeric.parse(" 42 ").unwrap(), json!(42));
        assert_eq!(CombinationInput::Numeric.parse("1.5").unwrap(), json!(1.5));
        assert!(CombinationInput::Numeric.parse("abc").is_err());
        assert_eq!(CombinationInput::JsonArray.parse("[1,2]").unwrap(), json!([1, 2]));
        assert!(CombinationInput::JsonObject.parse("[1]").is_err());
        assert_eq!(CombinationInput::Text.parse("hi").unwrap(), json!("hi"));
    }
}
