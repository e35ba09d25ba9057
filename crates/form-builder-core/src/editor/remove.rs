//! Deleting elements.

use super::properties_mut;
use crate::dependency::remove_references;
use crate::order::UI_ORDER;
use crate::pair::{ElementPath, SchemaPair};
use crate::schema_utils::remove_from_list;

/// Remove the element at `path` from its owner.
///
/// The name disappears from `properties`, `required`, `ui:order`, the UI
/// schema, and every dependency group of the owner (as a group key and as a
/// child of other groups).
pub fn delete_element(pair: &SchemaPair, path: &ElementPath) -> SchemaPair {
    let Some(name) = path.name() else {
        return pair.clone();
    };
    let exists = pair
        .schema_node(&path.parent())
        .and_then(super::properties)
        .is_some_and(|props| props.contains_key(name));
    if !exists {
        tracing::debug!(path = %path, "delete: element not found");
        return pair.clone();
    }

    let mut next = pair.clone();
    let Some((owner, ui)) = next.nodes_mut(&path.parent()) else {
        return pair.clone();
    };
    if let Some(props) = properties_mut(owner) {
        props.shift_remove(name);
    }
    remove_from_list(owner, "required", name, false);
    remove_references(owner, name);
    remove_from_list(ui, UI_ORDER, name, false);
    ui.shift_remove(name);
    next.prune_created_ui(&pair.uischema, &path.parent());

    tracing::debug!(path = %path, "deleted element");
    next
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_delete_removes_every_trace() {
        let pair = SchemaPair::new(
            json!({
                "type": "object",
                "required": ["a", "b"],
                "properties": { "a": { "type": "string" }, "b": { "type": "string" }, "c": {} },
                "dependencies": {
                    "a": { "oneOf": [ { "properties": { "b": {}, "c": {} } } ] },
                    "b": { "oneOf": [ { "properties": { "c": {} } } ] }
                }
            }),
            json!({ "ui:order": ["b", "a", "c"], "b": { "ui:widget": "textarea" } }),
        );
        let next = delete_element(&pair, &ElementPath::parse("b"));
        assert_eq!(
            next.schema,
            json!({
                "type": "object",
                "required": ["a"],
                "properties": { "a": { "type": "string" }, "c": {} },
                "dependencies": {
                    "a": { "oneOf": [ { "properties": { "c": {} } } ] }
                }
            })
        );
        assert_eq!(next.uischema, json!({ "ui:order": ["a", "c"] }));
    }

    #[test]
    fn test_delete_nested_element() {
        let pair = SchemaPair::new(
            json!({ "properties": { "s": { "type": "object", "properties": { "x": {}, "y": {} } } } }),
            json!({ "s": { "ui:order": ["y", "x"] } }),
        );
        let next = delete_element(&pair, &ElementPath::parse("s/y"));
        assert_eq!(next.schema["properties"]["s"]["properties"], json!({ "x": {} }));
        assert_eq!(next.uischema["s"]["ui:order"], json!(["x"]));
    }

    #[test]
    fn test_delete_nested_element_without_ui_node() {
        let pair = SchemaPair::new(
            json!({ "properties": { "s": { "type": "object", "properties": { "x": {}, "y": {} } } } }),
            json!({}),
        );
        let next = delete_element(&pair, &ElementPath::parse("s/y"));
        assert_eq!(next.schema["properties"]["s"]["properties"], json!({ "x": {} }));
        assert_eq!(next.uischema, json!({}));
    }

    #[test]
    fn test_delete_keeps_other_branch_data() {
        let pair = SchemaPair::new(
            json!({
                "type": "object",
                "properties": { "s": { "type": "string" }, "c": {}, "d": {} },
                "dependencies": {
                    "s": { "oneOf": [
                        { "properties": { "c": { "minLength": 5 } }, "required": ["c"] },
                        { "properties": { "d": { "type": "integer", "minimum": 1 } }, "required": ["d"] }
                    ] }
                }
            }),
            json!({}),
        );
        let next = delete_element(&pair, &ElementPath::parse("c"));
        assert_eq!(
            next.schema["dependencies"]["s"],
            json!({ "oneOf": [
                { "properties": { "d": { "type": "integer", "minimum": 1 } }, "required": ["d"] }
            ] })
        );
        assert_eq!(next.uischema, json!({}));
    }

    #[test]
    fn test_delete_missing_or_root_is_noop() {
        let pair = SchemaPair::empty();
        assert_eq!(delete_element(&pair, &ElementPath::parse("ghost")), pair);
        assert_eq!(delete_element(&pair, &ElementPath::root()), pair);
    }
}
