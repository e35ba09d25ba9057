//! Editing the dependency group of an element.
//!
//! The element at `path` is the parent of the group; its children are
//! siblings in the same owner object. Groups are rewritten whole, so a group
//! never ends up half definition-based and half value-based.

use serde_json::{Map, Value};

use super::properties;
use crate::dependency::{
    dependency_mode, set_dependents, sourced_dependents_of, DependencyMode, Possibility,
    PossibilityValue, SourcedPossibility,
};
use crate::pair::{schema_node_mut, ElementPath, SchemaPair};

/// Append a possibility to the element's dependency group.
///
/// Children that are not siblings of the element, the element itself and
/// duplicates are dropped. The possibility is made to match the group: it
/// gets an empty value filter in a value-based group and loses its filter in
/// a definition-based one. An empty group takes the possibility's mode.
pub fn attach_dependency(pair: &SchemaPair, path: &ElementPath, possibility: Possibility) -> SchemaPair {
    edit_group(pair, path, |owner, name, mut group| {
        let mut possibility = possibility;
        possibility.children = sibling_children(owner, name, &possibility.children);
        if !group.is_empty() {
            let current: Vec<Possibility> = group.iter().map(|p| p.possibility.clone()).collect();
            match dependency_mode(&current) {
                DependencyMode::Value if possibility.value.is_none() => {
                    possibility.value = Some(PossibilityValue { values: Vec::new() });
                }
                DependencyMode::Definition => possibility.value = None,
                DependencyMode::Value => {}
            }
        }
        group.push(SourcedPossibility::fresh(possibility));
        Some(group)
    })
}

/// Remove the possibility at `index`. The group disappears with its last branch.
pub fn detach_dependency(pair: &SchemaPair, path: &ElementPath, index: usize) -> SchemaPair {
    edit_group(pair, path, |_, _, mut group| {
        if index >= group.len() {
            return None;
        }
        group.remove(index);
        Some(group)
    })
}

/// Replace the children of the possibility at `index`.
pub fn set_dependency_children(
    pair: &SchemaPair,
    path: &ElementPath,
    index: usize,
    children: &[String],
) -> SchemaPair {
    edit_group(pair, path, |owner, name, mut group| {
        let children = sibling_children(owner, name, children);
        let sourced = group.get_mut(index)?;
        sourced.possibility.children = children;
        Some(group)
    })
}

/// Set or clear the value filter of the possibility at `index`.
///
/// `None` turns the whole group definition-based. `Some(values)` sets the
/// filter of that branch; when the group was definition-based every other
/// branch is seeded with an empty filter so the group becomes value-based.
pub fn set_dependency_value(
    pair: &SchemaPair,
    path: &ElementPath,
    index: usize,
    values: Option<Vec<Value>>,
) -> SchemaPair {
    edit_group(pair, path, |_, _, mut group| {
        if index >= group.len() {
            return None;
        }
        match values {
            None => {
                for sourced in &mut group {
                    sourced.possibility.value = None;
                }
            }
            Some(values) => {
                for sourced in &mut group {
                    sourced
                        .possibility
                        .value
                        .get_or_insert_with(|| PossibilityValue { values: Vec::new() });
                }
                group[index].possibility.value = Some(PossibilityValue { values });
            }
        }
        Some(group)
    })
}

/// Drop the element's dependency group.
pub fn clear_dependencies(pair: &SchemaPair, path: &ElementPath) -> SchemaPair {
    edit_group(pair, path, |_, _, _| Some(Vec::new()))
}

/// Decode the group of the element at `path`, let `edit` rewrite it, and
/// store the result. `edit` returning `None` means "nothing to do".
///
/// Each branch keeps the index of the raw branch it was decoded from, so
/// removing or adding branches never moves one branch's extra data onto
/// another.
fn edit_group<F>(pair: &SchemaPair, path: &ElementPath, edit: F) -> SchemaPair
where
    F: FnOnce(&Map<String, Value>, &str, Vec<SourcedPossibility>) -> Option<Vec<SourcedPossibility>>,
{
    let Some(name) = path.name() else {
        return pair.clone();
    };
    let parent = path.parent();
    let Some(owner) = pair.schema_node(&parent) else {
        return pair.clone();
    };
    if !properties(owner).is_some_and(|props| props.contains_key(name)) {
        tracing::debug!(path = %path, "dependency edit: element not found");
        return pair.clone();
    }
    let current = sourced_dependents_of(owner, name);
    let Some(updated) = edit(owner, name, current.clone()) else {
        tracing::debug!(path = %path, "dependency edit: nothing to change");
        return pair.clone();
    };
    if updated == current {
        return pair.clone();
    }

    let mut next = pair.clone();
    if let Some(owner) = schema_node_mut(&mut next.schema, &parent) {
        set_dependents(owner, name, &updated);
    }
    tracing::debug!(path = %path, branches = updated.len(), "updated dependency group");
    next
}

fn sibling_children(owner: &Map<String, Value>, name: &str, children: &[String]) -> Vec<String> {
    let props = properties(owner);
    let mut kept: Vec<String> = Vec::with_capacity(children.len());
    for child in children {
        if child == name || kept.contains(child) {
            continue;
        }
        if props.is_some_and(|p| p.contains_key(child)) {
            kept.push(child.clone());
        }
    }
    kept
}

// ===========================================================================
// Tests
// ===========================================================================
