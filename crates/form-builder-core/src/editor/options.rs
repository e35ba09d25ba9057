//! Per-card edits issued from a card's settings: keyword values, UI
//! options, required status and reference targets.

use serde_json::{json, Map, Value};

use crate::order::UI_ORDER;
use crate::pair::{schema_node_mut, ElementPath, SchemaPair};
use crate::resolver::definition_ref;
use crate::schema_utils::{remove_from_list, string_list};

/// Keys owned by the structural editor; option updates never touch them.
const STRUCTURAL_KEYS: &[&str] = &["properties", "dependencies", "required"];

/// Merge keyword values into the element's schema node.
///
/// A `null` value removes the keyword. Structural keys (`properties`,
/// `dependencies`, `required`) are ignored.
pub fn update_data_options(pair: &SchemaPair, path: &ElementPath, options: &Map<String, Value>) -> SchemaPair {
    if path.is_root() {
        return pair.clone();
    }
    let mut next = pair.clone();
    let Some(node) = schema_node_mut(&mut next.schema, path) else {
        tracing::debug!(path = %path, "update data options: element not found");
        return pair.clone();
    };
    for (key, value) in options {
        if STRUCTURAL_KEYS.contains(&key.as_str()) {
            tracing::debug!(path = %path, key = %key, "update data options: skipping structural key");
            continue;
        }
        if value.is_null() {
            node.shift_remove(key);
        } else {
            node.insert(key.clone(), value.clone());
        }
    }
    tracing::debug!(path = %path, keys = options.len(), "updated data options");
    next
}

/// Merge `ui:*` options into the element's UI node.
///
/// A `null` value removes the option. Keys without the `ui:` prefix and
/// `ui:order` are ignored.
pub fn update_ui_options(pair: &SchemaPair, path: &ElementPath, options: &Map<String, Value>) -> SchemaPair {
    if pair.schema_node(path).is_none() {
        tracing::debug!(path = %path, "update ui options: element not found");
        return pair.clone();
    }
    let mut next = pair.clone();
    let Some((_, ui)) = next.nodes_mut(path) else {
        return pair.clone();
    };
    for (key, value) in options {
        if !key.starts_with("ui:") || key == UI_ORDER {
            continue;
        }
        if value.is_null() {
            ui.shift_remove(key);
        } else {
            ui.insert(key.clone(), value.clone());
        }
    }
    next.prune_created_ui(&pair.uischema, path);
    tracing::debug!(path = %path, keys = options.len(), "updated ui options");
    next
}

/// Add the element to, or remove it from, its owner's `required` list.
pub fn set_required(pair: &SchemaPair, path: &ElementPath, required: bool) -> SchemaPair {
    let Some(name) = path.name() else {
        return pair.clone();
    };
    let parent = path.parent();
    let Some(owner) = pair.schema_node(&parent) else {
        return pair.clone();
    };
    if !super::properties(owner).is_some_and(|props| props.contains_key(name)) {
        return pair.clone();
    }
    let listed = string_list(owner.get("required")).iter().any(|n| n == name);
    if listed == required {
        return pair.clone();
    }

    let mut next = pair.clone();
    let Some(owner) = schema_node_mut(&mut next.schema, &parent) else {
        return pair.clone();
    };
    if required {
        match owner.get_mut("required") {
            Some(Value::Array(items)) => items.push(Value::String(name.to_string())),
            _ => {
                owner.insert("required".to_string(), json!([name]));
            }
        }
    } else {
        remove_from_list(owner, "required", name, false);
    }
    tracing::debug!(path = %path, required, "updated required");
    next
}

/// Point a reference card at the definition named `definition`.
///
/// Unknown definitions are ignored.
pub fn set_reference(pair: &SchemaPair, path: &ElementPath, definition: &str) -> SchemaPair {
    if !pair.definitions().is_some_and(|defs| defs.contains_key(definition)) {
        tracing::debug!(path = %path, definition = %definition, "set reference: unknown definition");
        return pair.clone();
    }
    if path.is_root() {
        return pair.clone();
    }
    let mut next = pair.clone();
    let Some(node) = schema_node_mut(&mut next.schema, path) else {
        return pair.clone();
    };
    node.insert("$ref".to_string(), Value::String(definition_ref(definition)));
    tracing::debug!(path = %path, definition = %definition, "updated reference");
    next
}

// ===========================================================================
// Tests
// ===========================================================================
