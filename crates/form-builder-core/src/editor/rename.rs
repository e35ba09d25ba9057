//! Renaming an element's property key.

use super::{properties, properties_mut};
use crate::dependency::rename_references;
use crate::error::EditorError;
use crate::order::UI_ORDER;
use crate::pair::{ElementPath, SchemaPair};
use crate::schema_utils::{rename_entry, rename_in_list};

/// Rename the element at `path` to `new_name`.
///
/// Fails with [`EditorError::NameCollision`] when a sibling already uses
/// `new_name`; the input pair is never modified. Renaming to the same name,
/// to an empty name, or renaming a missing element returns an unchanged copy.
pub fn rename_key(pair: &SchemaPair, path: &ElementPath, new_name: &str) -> Result<SchemaPair, EditorError> {
    let Some(old) = path.name() else {
        return Ok(pair.clone());
    };
    if old == new_name {
        return Ok(pair.clone());
    }
    if new_name.is_empty() {
        tracing::warn!(path = %path, "rename: refusing empty name");
        return Ok(pair.clone());
    }
    let parent = path.parent();
    let Some(props) = pair.schema_node(&parent).and_then(properties) else {
        return Ok(pair.clone());
    };
    if !props.contains_key(old) {
        tracing::debug!(path = %path, "rename: element not found");
        return Ok(pair.clone());
    }
    if props.contains_key(new_name) {
        tracing::warn!(path = %path, name = %new_name, "rename: name already taken");
        return Err(EditorError::NameCollision {
            parent: parent.to_string(),
            name: new_name.to_string(),
        });
    }

    let mut next = pair.clone();
    let Some((owner, ui)) = next.nodes_mut(&parent) else {
        return Ok(pair.clone());
    };
    if let Some(props) = properties_mut(owner) {
        rename_entry(props, old, new_name);
    }
    rename_in_list(owner, "required", old, new_name);
    rename_references(owner, old, new_name);
    rename_in_list(ui, UI_ORDER, old, new_name);
    rename_entry(ui, old, new_name);
    next.prune_created_ui(&pair.uischema, &parent);

    tracing::debug!(path = %path, name = %new_name, "renamed element");
    Ok(next)
}

// ===========================================================================
// Tests
// ===========================================================================
