//! Moving elements: neighbor swaps, drag reordering, cross-section moves.
//!
//! Positions always refer to the effective display order of the parent
//! (see [`effective_order`]), never to `properties` key order.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::{properties, properties_mut, unique_name};
use crate::category::{resolved_type, JsonType};
use crate::dependency::remove_references;
use crate::order::{effective_order, write_order, UI_ORDER};
use crate::pair::{ElementPath, SchemaPair};
use crate::schema_utils::{object_entry, remove_from_list, string_list};

/// One end of a drag: a parent object and a position in its display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DragLocation {
    pub parent: ElementPath,
    pub index: usize,
}

impl DragLocation {
    pub fn new(parent: ElementPath, index: usize) -> Self {
        Self { parent, index }
    }
}

/// Swap the element with its predecessor. No-op on the first element.
pub fn move_up(pair: &SchemaPair, path: &ElementPath) -> SchemaPair {
    swap_with_neighbor(pair, path, Direction::Up)
}

/// Swap the element with its successor. No-op on the last element.
pub fn move_down(pair: &SchemaPair, path: &ElementPath) -> SchemaPair {
    swap_with_neighbor(pair, path, Direction::Down)
}

#[derive(Debug, Clone, Copy)]
enum Direction {
    Up,
    Down,
}

fn swap_with_neighbor(pair: &SchemaPair, path: &ElementPath, direction: Direction) -> SchemaPair {
    let Some(name) = path.name() else {
        return pair.clone();
    };
    let parent = path.parent();
    let Some(owner) = pair.schema_node(&parent) else {
        return pair.clone();
    };
    let mut order = effective_order(owner, pair.ui_node(&parent));
    let Some(position) = order.iter().position(|n| n == name) else {
        tracing::debug!(path = %path, "move: element not found");
        return pair.clone();
    };
    let neighbor = match direction {
        Direction::Up if position > 0 => position - 1,
        Direction::Down if position + 1 < order.len() => position + 1,
        _ => return pair.clone(),
    };
    order.swap(position, neighbor);
    store_order(pair, &parent, &order)
}

/// Move the element at `source_index` of `parent`'s display order to
/// `destination_index`. Out-of-range indices are no-ops.
pub fn reorder_by_drag(
    pair: &SchemaPair,
    parent: &ElementPath,
    source_index: usize,
    destination_index: usize,
) -> SchemaPair {
    let Some(owner) = pair.schema_node(parent) else {
        return pair.clone();
    };
    let mut order = effective_order(owner, pair.ui_node(parent));
    if source_index >= order.len() || destination_index >= order.len() {
        tracing::debug!(
            parent = %parent,
            source_index,
            destination_index,
            "reorder: index out of range"
        );
        return pair.clone();
    }
    if source_index == destination_index {
        return pair.clone();
    }
    let moved = order.remove(source_index);
    order.insert(destination_index, moved);
    store_order(pair, parent, &order)
}

fn store_order(pair: &SchemaPair, parent: &ElementPath, order: &[String]) -> SchemaPair {
    let mut next = pair.clone();
    if let Some((_, ui)) = next.nodes_mut(parent) {
        write_order(ui, order);
    }
    tracing::debug!(parent = %parent, "reordered elements");
    next
}

/// Move an element from one parent to another.
///
/// Within one parent this is [`reorder_by_drag`]. Across parents the element
/// leaves every list of its old owner (`properties`, `required`, `ui:order`,
/// `dependencies`) and is inserted into the new owner at `destination.index`
/// of its display order, keeping its UI node and required status. A name
/// already used in the destination gets the smallest free numeric suffix.
///
/// Moving a section into itself or one of its descendants is a no-op, as is
/// moving into a `$ref` node or a missing parent.
pub fn move_across_sections(
    pair: &SchemaPair,
    source: &DragLocation,
    destination: &DragLocation,
) -> SchemaPair {
    if source.parent == destination.parent {
        return reorder_by_drag(pair, &source.parent, source.index, destination.index);
    }
    let Some(source_owner) = pair.schema_node(&source.parent) else {
        return pair.clone();
    };
    let source_order = effective_order(source_owner, pair.ui_node(&source.parent));
    let Some(name) = source_order.get(source.index).cloned() else {
        tracing::debug!(parent = %source.parent, index = source.index, "move: source index out of range");
        return pair.clone();
    };
    let element_path = source.parent.child(&name);
    if destination.parent.starts_with(&element_path) {
        tracing::debug!(path = %element_path, "move: refusing to move a section into itself");
        return pair.clone();
    }
    let Some(dest_owner) = pair.schema_node(&destination.parent) else {
        tracing::debug!(parent = %destination.parent, "move: destination not found");
        return pair.clone();
    };
    if dest_owner.contains_key("$ref") {
        return pair.clone();
    }
    let new_name = unique_name(properties(dest_owner), &name);
    let mut dest_order = effective_order(dest_owner, pair.ui_node(&destination.parent));

    let mut next = pair.clone();

    // Detach from the source owner.
    let Some((owner, ui)) = next.nodes_mut(&source.parent) else {
        return pair.clone();
    };
    let Some(schema) = properties_mut(owner).and_then(|props| props.shift_remove(&name)) else {
        return pair.clone();
    };
    let was_required = string_list(owner.get("required")).contains(&name);
    remove_from_list(owner, "required", &name, false);
    remove_references(owner, &name);
    remove_from_list(ui, UI_ORDER, &name, false);
    let element_ui = ui.shift_remove(&name);
    next.prune_created_ui(&pair.uischema, &source.parent);

    // Attach to the destination owner.
    let Some((owner, ui)) = next.nodes_mut(&destination.parent) else {
        return pair.clone();
    };
    if resolved_type(owner) != JsonType::Object {
        owner.insert("type".to_string(), json!("object"));
        owner.entry("dependencies").or_insert_with(|| json!({}));
        owner.entry("required").or_insert_with(|| json!([]));
    }
    object_entry(owner, "properties").insert(new_name.clone(), schema);
    if was_required {
        match owner.get_mut("required") {
            Some(Value::Array(required)) => required.push(Value::String(new_name.clone())),
            _ => {
                owner.insert("required".to_string(), json!([new_name]));
            }
        }
    }
    if let Some(element_ui) = element_ui {
        ui.insert(new_name.clone(), element_ui);
    }
    let at = destination.index.min(dest_order.len());
    dest_order.insert(at, new_name.clone());
    write_order(ui, &dest_order);

    tracing::debug!(
        from = %element_path,
        to = %destination.parent.child(&new_name),
        "moved element across sections"
    );
    next
}

// ===========================================================================
// Tests
// ===========================================================================
