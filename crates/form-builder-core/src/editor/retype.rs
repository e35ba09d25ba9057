//! Switching a card to another category.

use serde_json::{Map, Value};

use crate::category::{CategoryId, JsonType};
use crate::pair::{ElementPath, SchemaPair};
use crate::registry::CategoryRegistry;
use crate::resolver::{definition_ref, EMPTY_REFERENCE};

/// Keywords carried over from the old node when the new defaults lack them.
const PRESERVED_KEYWORDS: &[&str] = &["title", "default"];

/// Replace the element at `path` with the defaults of `category`.
///
/// The node's own keywords are replaced by the category's default data
/// schema; `title` and `default` survive unless the defaults set them. The UI
/// node is replaced by the category's default UI schema. Required status and
/// the property name are unchanged. A `ref` card with no `$ref` in its
/// defaults points at the first definition, or at `"empty"` when there is none.
///
/// Unknown or deactivated categories leave the pair unchanged.
pub fn retype(
    registry: &CategoryRegistry,
    pair: &SchemaPair,
    path: &ElementPath,
    category: &CategoryId,
) -> SchemaPair {
    let Some(input) = registry.input(category) else {
        tracing::debug!(path = %path, category = %category, "retype: category not active");
        return pair.clone();
    };
    let Some(name) = path.name() else {
        return pair.clone();
    };
    let Some(old) = pair.schema_node(path) else {
        tracing::debug!(path = %path, "retype: element not found");
        return pair.clone();
    };

    let defaults = input
        .default_data_schema
        .as_object()
        .cloned()
        .unwrap_or_default();
    let mut node = Map::new();
    for keyword in PRESERVED_KEYWORDS {
        if defaults.contains_key(*keyword) {
            continue;
        }
        if let Some(value) = old.get(*keyword) {
            node.insert(keyword.to_string(), value.clone());
        }
    }
    // Defaults win over preserved keywords they also define.
    for (key, value) in defaults {
        node.insert(key, value);
    }
    if !node.contains_key("type") && input.input_type != JsonType::Null {
        node.insert(
            "type".to_string(),
            Value::String(input.input_type.as_str().to_string()),
        );
    }
    if *category == CategoryId::Ref && !node.contains_key("$ref") {
        let reference = pair
            .definitions()
            .and_then(|defs| defs.keys().next())
            .map(|first| definition_ref(first))
            .unwrap_or_else(|| EMPTY_REFERENCE.to_string());
        node.insert("$ref".to_string(), Value::String(reference));
    }

    let ui_defaults = input
        .default_ui_schema
        .as_object()
        .cloned()
        .unwrap_or_default();

    let mut next = pair.clone();
    let Some((owner, ui)) = next.nodes_mut(&path.parent()) else {
        return pair.clone();
    };
    if let Some(props) = super::properties_mut(owner) {
        props.insert(name.to_string(), Value::Object(node));
    }
    if ui_defaults.is_empty() {
        ui.shift_remove(name);
    } else {
        ui.insert(name.to_string(), Value::Object(ui_defaults));
    }
    next.prune_created_ui(&pair.uischema, &path.parent());

    tracing::debug!(path = %path, category = %category, "retyped element");
    next
}

// ===========================================================================
// Tests
// ===========================================================================
