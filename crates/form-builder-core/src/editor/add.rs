//! Adding cards and sections.

use serde_json::{json, Map, Value};

use super::{fresh_name, properties, NEW_ELEMENT_PREFIX};
use crate::category::{resolved_type, JsonType};
use crate::config::Mods;
use crate::order::{effective_order, write_order};
use crate::pair::{ElementPath, SchemaPair};
use crate::schema_utils::object_entry;

/// Append a new short-answer card to the object at `parent`.
pub fn add_card(pair: &SchemaPair, parent: &ElementPath) -> SchemaPair {
    add_card_with(pair, parent, &Mods::default())
}

/// Append a new card using the host's new-element defaults.
pub fn add_card_with(pair: &SchemaPair, parent: &ElementPath, mods: &Mods) -> SchemaPair {
    insert_element(pair, parent, |index| {
        (mods.new_element_data(index), mods.new_element_ui().cloned())
    })
}

/// Append a new, empty section to the object at `parent`.
pub fn add_section(pair: &SchemaPair, parent: &ElementPath) -> SchemaPair {
    insert_element(pair, parent, |_| {
        (
            json!({ "type": "object", "properties": {}, "dependencies": {}, "required": [] }),
            None,
        )
    })
}

fn insert_element<F>(pair: &SchemaPair, parent: &ElementPath, build: F) -> SchemaPair
where
    F: FnOnce(usize) -> (Value, Option<Map<String, Value>>),
{
    let mut next = pair.clone();
    let Some(owner) = pair.schema_node(parent) else {
        tracing::debug!(parent = %parent, "add: parent not found");
        return next;
    };
    if owner.contains_key("$ref") {
        tracing::debug!(parent = %parent, "add: parent is a reference");
        return next;
    }
    let (name, index) = fresh_name(properties(owner), NEW_ELEMENT_PREFIX);
    let order = effective_order(owner, pair.ui_node(parent));

    let Some((owner, ui)) = next.nodes_mut(parent) else {
        return pair.clone();
    };
    if resolved_type(owner) != JsonType::Object {
        owner.insert("type".to_string(), json!("object"));
        owner.entry("dependencies").or_insert_with(|| json!({}));
        owner.entry("required").or_insert_with(|| json!([]));
    }

    let (schema, element_ui) = build(index);
    object_entry(owner, "properties").insert(name.clone(), schema);
    if let Some(element_ui) = element_ui {
        ui.insert(name.clone(), Value::Object(element_ui));
    }

    let mut order = order;
    order.push(name.clone());
    write_order(ui, &order);

    tracing::debug!(parent = %parent, name = %name, "added element");
    next
}

// ===========================================================================
// Tests
// ===========================================================================
