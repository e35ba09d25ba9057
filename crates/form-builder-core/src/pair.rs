//! The schema pair (JSON Schema + UI Schema) and element paths into it.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::schema_utils::{build_path, object_entry, split_path};

// ---------------------------------------------------------------------------
// ElementPath
// ---------------------------------------------------------------------------

/// Location of an element as the chain of property names from the root.
///
/// Serialized as a `/`-joined string (`"address/street"`), with RFC 6901
/// escaping for names containing `/` or `~`. The empty path is the root object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct ElementPath(Vec<String>);

impl ElementPath {
    pub fn root() -> Self {
        Self(Vec::new())
    }

    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(segments.into_iter().map(Into::into).collect())
    }

    pub fn parse(path: &str) -> Self {
        Self(split_path(path))
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// The element's own property name; `None` for the root.
    pub fn name(&self) -> Option<&str> {
        self.0.last().map(String::as_str)
    }

    /// Path of the object that owns this element. The root is its own parent.
    pub fn parent(&self) -> ElementPath {
        let mut segments = self.0.clone();
        segments.pop();
        Self(segments)
    }

    pub fn child(&self, name: &str) -> ElementPath {
        let mut segments = self.0.clone();
        segments.push(name.to_string());
        Self(segments)
    }

    /// Whether `self` equals `ancestor` or lies underneath it.
    pub fn starts_with(&self, ancestor: &ElementPath) -> bool {
        self.0.starts_with(&ancestor.0)
    }
}

impl fmt::Display for ElementPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&build_path(&self.0))
    }
}

impl From<String> for ElementPath {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<&str> for ElementPath {
    fn from(value: &str) -> Self {
        Self::parse(value)
    }
}

impl From<ElementPath> for String {
    fn from(value: ElementPath) -> Self {
        value.to_string()
    }
}

// ---------------------------------------------------------------------------
// SchemaPair
// ---------------------------------------------------------------------------

/// The unit of truth: a JSON Schema document and its UI Schema, always
/// edited together.
///
/// Editor operations never mutate a pair they were handed; they clone it and
/// return the edited copy, so a caller can keep earlier snapshots for undo.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaPair {
    pub schema: Value,
    pub uischema: Value,
}

impl SchemaPair {
    pub fn new(schema: Value, uischema: Value) -> Self {
        Self { schema, uischema }
    }

    /// An empty object form: `{type: object, properties: {}}` with an empty UI schema.
    pub fn empty() -> Self {
        Self {
            schema: json!({ "type": "object", "properties": {} }),
            uischema: json!({}),
        }
    }

    /// The schema node at `path` (the root object for the empty path).
    pub fn schema_node(&self, path: &ElementPath) -> Option<&Map<String, Value>> {
        schema_node(&self.schema, path)
    }

    /// The UI schema node at `path`, if one has been written.
    pub fn ui_node(&self, path: &ElementPath) -> Option<&Map<String, Value>> {
        let mut current = self.uischema.as_object()?;
        for segment in path.segments() {
            current = current.get(segment)?.as_object()?;
        }
        Some(current)
    }

    /// Top-level `definitions`, if present.
    pub fn definitions(&self) -> Option<&Map<String, Value>> {
        self.schema.get("definitions").and_then(Value::as_object)
    }

    /// UI schema counterpart of `definitions`, if present.
    pub fn ui_definitions(&self) -> Option<&Map<String, Value>> {
        self.uischema.get("definitions").and_then(Value::as_object)
    }

    /// Mutable access to the schema object at `path` and its UI object,
    /// creating the UI side on demand.
    ///
    /// Returns `None` when the schema side does not exist, in which case the
    /// UI schema is left untouched. Callers that may leave the UI side empty
    /// follow up with [`SchemaPair::prune_created_ui`].
    pub(crate) fn nodes_mut(
        &mut self,
        path: &ElementPath,
    ) -> Option<(&mut Map<String, Value>, &mut Map<String, Value>)> {
        let schema = schema_node_mut(&mut self.schema, path)?;
        let ui = ui_node_mut(&mut self.uischema, path);
        Some((schema, ui))
    }

    /// Remove UI objects along `path` that are empty now and were absent
    /// from `before`, deepest first.
    pub(crate) fn prune_created_ui(&mut self, before: &Value, path: &ElementPath) {
        let segments = path.segments();
        for depth in (1..=segments.len()).rev() {
            if ui_lookup(before, &segments[..depth]).is_some() {
                return;
            }
            let Some(parent) = ui_lookup_mut(&mut self.uischema, &segments[..depth - 1]) else {
                return;
            };
            let name = &segments[depth - 1];
            if !parent
                .get(name)
                .and_then(Value::as_object)
                .is_some_and(Map::is_empty)
            {
                return;
            }
            parent.shift_remove(name);
        }
    }
}

fn ui_lookup<'a>(root: &'a Value, segments: &[String]) -> Option<&'a Value> {
    segments
        .iter()
        .try_fold(root, |current, segment| current.as_object()?.get(segment))
}

fn ui_lookup_mut<'a>(root: &'a mut Value, segments: &[String]) -> Option<&'a mut Map<String, Value>> {
    let mut current = root.as_object_mut()?;
    for segment in segments {
        current = current.get_mut(segment)?.as_object_mut()?;
    }
    Some(current)
}

impl Default for SchemaPair {
    fn default() -> Self {
        Self::empty()
    }
}

pub(crate) fn schema_node<'a>(root: &'a Value, path: &ElementPath) -> Option<&'a Map<String, Value>> {
    let mut current = root.as_object()?;
    for segment in path.segments() {
        current = current
            .get("properties")?
            .as_object()?
            .get(segment)?
            .as_object()?;
    }
    Some(current)
}

pub(crate) fn schema_node_mut<'a>(
    root: &'a mut Value,
    path: &ElementPath,
) -> Option<&'a mut Map<String, Value>> {
    let mut current = root.as_object_mut()?;
    for segment in path.segments() {
        current = current
            .get_mut("properties")?
            .as_object_mut()?
            .get_mut(segment)?
            .as_object_mut()?;
    }
    Some(current)
}

pub(crate) fn ui_node_mut<'a>(root: &'a mut Value, path: &ElementPath) -> &'a mut Map<String, Value> {
    if !root.is_object() {
        *root = Value::Object(Map::new());
    }
    let mut current = match root {
        Value::Object(obj) => obj,
        _ => unreachable!("root was just replaced with an object"),
    };
    for segment in path.segments() {
        current = object_entry(current, segment);
    }
    current
}

// ===========================================================================
// Tests
// ===========================================================================
