//! Structural editor: pure transformations of a schema pair.
//!
//! Every operation takes the pair by reference and returns a new pair, even
//! when only one leaf changed, so the caller's previous snapshot stays valid
//! for undo. Operations keep `properties`, `required`, `ui:order` and
//! `dependencies` consistent with one another.
//!
//! Malformed targets (a path that names nothing, an index out of range) are
//! no-ops that return an unchanged copy. The only explicit failure is
//! [`EditorError::NameCollision`](crate::EditorError::NameCollision) from
//! [`rename_key`].

mod add;
mod definitions;
mod dependents;
mod options;
mod remove;
mod rename;
mod reorder;
mod retype;

pub use add::{add_card, add_card_with, add_section};
pub use definitions::{definitions_view, rename_definition, with_definitions_view};
pub use dependents::{
    attach_dependency, clear_dependencies, detach_dependency, set_dependency_children,
    set_dependency_value,
};
pub use options::{set_reference, set_required, update_data_options, update_ui_options};
pub use remove::delete_element;
pub use rename::rename_key;
pub use reorder::{move_across_sections, move_down, move_up, reorder_by_drag, DragLocation};
pub use retype::retype;

use serde_json::{Map, Value};

/// Prefix of generated property names (`newInput1`, `newInput2`, ...).
pub const NEW_ELEMENT_PREFIX: &str = "newInput";

/// Smallest `prefix{N}` (N ≥ 1) that is not already a key of `props`.
pub(crate) fn fresh_name(props: Option<&Map<String, Value>>, prefix: &str) -> (String, usize) {
    let mut index = 1;
    loop {
        let name = format!("{prefix}{index}");
        if !props.is_some_and(|p| p.contains_key(&name)) {
            return (name, index);
        }
        index += 1;
    }
}

/// `base` itself when free, otherwise `base{N}` with the smallest free N ≥ 1.
pub(crate) fn unique_name(props: Option<&Map<String, Value>>, base: &str) -> String {
    if !props.is_some_and(|p| p.contains_key(base)) {
        return base.to_string();
    }
    fresh_name(props, base).0
}

/// The `properties` map of an owner node.
pub(crate) fn properties(owner: &Map<String, Value>) -> Option<&Map<String, Value>> {
    owner.get("properties").and_then(Value::as_object)
}

pub(crate) fn properties_mut(owner: &mut Map<String, Value>) -> Option<&mut Map<String, Value>> {
    owner.get_mut("properties").and_then(Value::as_object_mut)
}
