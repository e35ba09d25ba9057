//! Read-only resolution of `$ref` nodes against top-level `definitions`.
//!
//! A property can "be" a definition by carrying `$ref: "#/definitions/<name>"`.
//! Resolution merges the definition under the node's own keywords for display
//! and never rewrites the stored node: the `$ref` stays where it is.

use std::borrow::Cow;

use serde_json::{Map, Value};

use crate::category::{resolved_type, JsonType};
use crate::schema_utils::{escape_pointer_segment, unescape_pointer_segment};

const DEFINITIONS_PREFIX: &str = "#/definitions/";

/// Placeholder stored in `$ref` when a card becomes a reference while the
/// document has no definitions to point at.
pub const EMPTY_REFERENCE: &str = "empty";

/// Structural shape of a property node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// `$ref` node, carrying the raw reference string.
    Reference(String),
    /// Object-typed node with nested properties.
    Section,
    /// Any other field.
    Card(JsonType),
}

/// Classify the shape of a node without consulting categories.
pub fn node_kind(node: &Map<String, Value>) -> NodeKind {
    if let Some(reference) = node.get("$ref").and_then(Value::as_str) {
        return NodeKind::Reference(reference.to_string());
    }
    match resolved_type(node) {
        JsonType::Object => NodeKind::Section,
        other => NodeKind::Card(other),
    }
}

/// Outcome of resolving a node's `$ref`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefStatus {
    NotAReference,
    /// Resolved to the named definition.
    Resolved(String),
    /// The raw reference names no existing definition.
    Unresolved(String),
}

/// Definition name targeted by a `#/definitions/<name>` reference.
pub fn definition_name(reference: &str) -> Option<String> {
    reference
        .strip_prefix(DEFINITIONS_PREFIX)
        .filter(|name| !name.is_empty() && !name.contains('/'))
        .map(|name| unescape_pointer_segment(name).into_owned())
}

/// The `$ref` string pointing at a definition.
pub fn definition_ref(name: &str) -> String {
    format!("{DEFINITIONS_PREFIX}{}", escape_pointer_segment(name))
}

/// Resolve a node for display.
///
/// For a resolvable reference the result holds the definition's keywords
/// overlaid with the node's own (so a local `title` wins), `$ref` included.
/// Anything else is returned borrowed and unchanged.
pub fn resolve<'a>(
    node: &'a Map<String, Value>,
    definitions: Option<&Map<String, Value>>,
) -> (Cow<'a, Map<String, Value>>, RefStatus) {
    let NodeKind::Reference(reference) = node_kind(node) else {
        return (Cow::Borrowed(node), RefStatus::NotAReference);
    };
    let target = definition_name(&reference).and_then(|name| {
        definitions
            .and_then(|defs| defs.get(&name))
            .and_then(Value::as_object)
            .map(|def| (name, def))
    });
    match target {
        Some((name, definition)) => {
            let mut merged = definition.clone();
            for (key, value) in node {
                merged.insert(key.clone(), value.clone());
            }
            (Cow::Owned(merged), RefStatus::Resolved(name))
        }
        None => (Cow::Borrowed(node), RefStatus::Unresolved(reference)),
    }
}

/// Merge a definition's UI schema under a node's own UI schema.
pub fn resolve_ui<'a>(
    ui: Option<&'a Map<String, Value>>,
    status: &RefStatus,
    definitions_ui: Option<&Map<String, Value>>,
) -> Option<Cow<'a, Map<String, Value>>> {
    let RefStatus::Resolved(name) = status else {
        return ui.map(Cow::Borrowed);
    };
    let Some(definition_ui) = definitions_ui
        .and_then(|defs| defs.get(name))
        .and_then(Value::as_object)
    else {
        return ui.map(Cow::Borrowed);
    };
    let mut merged = definition_ui.clone();
    if let Some(own) = ui {
        for (key, value) in own {
            merged.insert(key.clone(), value.clone());
        }
    }
    Some(Cow::Owned(merged))
}

// ===========================================================================
// Tests
// ===========================================================================
