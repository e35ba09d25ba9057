//! Tree walker: projects a schema pair onto an ordered tree of elements.
//!
//! The tree is a rendering projection only. It is recomputed from the pair on
//! every call and never written back. Each element is keyed by its full path,
//! so reordering siblings does not change any element's identity.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::category::{resolved_type, CategoryId, JsonType};
use crate::dependency::{
    combination_inputs, dependents_of, parents_of, CombinationField, Possibility,
};
use crate::editor::definitions_view;
use crate::order::effective_order;
use crate::pair::{ElementPath, SchemaPair};
use crate::registry::CategoryRegistry;
use crate::resolver::{node_kind, resolve, resolve_ui, NodeKind, RefStatus};
use crate::schema_utils::string_list;
use crate::warning::Warning;

/// One card or section in display order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementDescriptor {
    /// Stable identity: the element path as a string.
    pub key: String,
    pub path: ElementPath,
    /// Category of a card; `None` for sections.
    pub category: Option<CategoryId>,
    pub is_section: bool,
    pub component_props: ElementProps,
    /// Nested elements of a section, in display order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ElementDescriptor>,
}

/// Data handed to the host's card and section components.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementProps {
    pub name: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub required: bool,
    /// The schema node, resolved through `$ref` for display. Sections omit
    /// their `properties`, `required` and `dependencies`.
    pub data_options: Value,
    /// The `ui:*` keys of the element's UI node.
    pub ui_options: Value,
    /// Definition name a reference card points at.
    pub reference: Option<String>,
    pub unresolved_reference: bool,
    /// This element's own dependency group.
    pub dependents: Vec<Possibility>,
    /// Per-field inputs for typing value combinations when this element is
    /// an object-typed dependency parent; empty otherwise.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub combination_inputs: Vec<CombinationField>,
    /// Whether this element is a child in a sibling's dependency group.
    pub dependent: bool,
    /// Sibling names in display order, excluding this element.
    pub neighbor_names: Vec<String>,
}

/// Elements plus any advisory warnings raised while walking.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WalkResult {
    pub elements: Vec<ElementDescriptor>,
    pub warnings: Vec<Warning>,
}

/// Number of cards and sections in a tree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ElementCount {
    pub cards: usize,
    pub sections: usize,
}

pub struct TreeWalker<'r> {
    registry: &'r CategoryRegistry,
}

struct Definitions<'a> {
    data: Option<&'a Map<String, Value>>,
    ui: Option<&'a Map<String, Value>>,
}

const SECTION_STRUCTURE_KEYS: &[&str] = &["properties", "required", "dependencies"];

impl<'r> TreeWalker<'r> {
    pub fn new(registry: &'r CategoryRegistry) -> Self {
        Self { registry }
    }

    /// Walk the root object of a pair.
    pub fn walk_pair(&self, pair: &SchemaPair) -> WalkResult {
        let Some(root) = pair.schema.as_object() else {
            return WalkResult::default();
        };
        self.walk(
            root,
            pair.uischema.as_object(),
            &ElementPath::root(),
            pair.definitions(),
            pair.ui_definitions(),
        )
    }

    /// Walk the children of `schema` located at `path`.
    pub fn walk(
        &self,
        schema: &Map<String, Value>,
        ui: Option<&Map<String, Value>>,
        path: &ElementPath,
        definitions: Option<&Map<String, Value>>,
        definitions_ui: Option<&Map<String, Value>>,
    ) -> WalkResult {
        let defs = Definitions {
            data: definitions,
            ui: definitions_ui,
        };
        let mut warnings = Vec::new();
        let elements = self.walk_object(schema, ui, path, &defs, &mut warnings);
        WalkResult { elements, warnings }
    }

    /// Walk `definitions` as if they were the properties of one object.
    ///
    /// Definitions are resolved against themselves, so a definition may
    /// reference another.
    pub fn walk_definitions(&self, pair: &SchemaPair) -> WalkResult {
        let view = definitions_view(pair);
        let Some(root) = view.schema.as_object() else {
            return WalkResult::default();
        };
        self.walk(
            root,
            view.uischema.as_object(),
            &ElementPath::root(),
            pair.definitions(),
            pair.ui_definitions(),
        )
    }

    fn walk_object(
        &self,
        owner: &Map<String, Value>,
        ui: Option<&Map<String, Value>>,
        path: &ElementPath,
        defs: &Definitions<'_>,
        warnings: &mut Vec<Warning>,
    ) -> Vec<ElementDescriptor> {
        let Some(props) = owner.get("properties").and_then(Value::as_object) else {
            return Vec::new();
        };
        let order = effective_order(owner, ui);
        let required = string_list(owner.get("required"));

        let mut elements = Vec::with_capacity(order.len());
        for name in &order {
            let child_path = path.child(name);
            let Some(node) = props.get(name).and_then(Value::as_object) else {
                tracing::debug!(path = %child_path, "skipping non-object property schema");
                continue;
            };
            let child_ui = ui.and_then(|u| u.get(name)).and_then(Value::as_object);

            let (resolved, status) = resolve(node, defs.data);
            if let RefStatus::Unresolved(reference) = &status {
                tracing::warn!(path = %child_path, reference = %reference, "unresolved $ref");
                warnings.push(Warning::unresolved_reference(&child_path.to_string(), reference));
            }
            let resolved_ui = resolve_ui(child_ui, &status, defs.ui);

            let is_section = node_kind(node) == NodeKind::Section;
            let (category, children) = if is_section {
                let nested = self.walk_object(node, child_ui, &child_path, defs, warnings);
                (None, nested)
            } else {
                (Some(self.registry.classify(node, child_ui)), Vec::new())
            };

            let dependents = dependents_of(owner, name);
            let combination_inputs =
                if !dependents.is_empty() && resolved_type(&resolved) == JsonType::Object {
                    combination_inputs(&resolved)
                } else {
                    Vec::new()
                };

            let mut data_options = resolved.into_owned();
            if is_section {
                for key in SECTION_STRUCTURE_KEYS {
                    data_options.shift_remove(*key);
                }
            }
            let ui_options: Map<String, Value> = resolved_ui
                .map(|u| {
                    u.iter()
                        .filter(|(k, _)| k.starts_with("ui:"))
                        .map(|(k, v)| (k.clone(), v.clone()))
                        .collect()
                })
                .unwrap_or_default();

            let component_props = ElementProps {
                name: name.clone(),
                title: data_options
                    .get("title")
                    .and_then(Value::as_str)
                    .map(str::to_string),
                description: data_options
                    .get("description")
                    .and_then(Value::as_str)
                    .map(str::to_string),
                required: required.contains(name),
                reference: match &status {
                    RefStatus::Resolved(definition) => Some(definition.clone()),
                    _ => None,
                },
                unresolved_reference: matches!(status, RefStatus::Unresolved(_)),
                dependents,
                combination_inputs,
                dependent: !parents_of(owner, name).is_empty(),
                neighbor_names: order.iter().filter(|n| *n != name).cloned().collect(),
                data_options: Value::Object(data_options),
                ui_options: Value::Object(ui_options),
            };

            elements.push(ElementDescriptor {
                key: child_path.to_string(),
                path: child_path,
                category,
                is_section,
                component_props,
                children,
            });
        }
        elements
    }
}

/// Count cards and sections of the main tree, recursively.
pub fn count_elements(registry: &CategoryRegistry, pair: &SchemaPair) -> ElementCount {
    fn tally(elements: &[ElementDescriptor], count: &mut ElementCount) {
        for element in elements {
            if element.is_section {
                count.sections += 1;
                tally(&element.children, count);
            } else {
                count.cards += 1;
            }
        }
    }
    let mut count = ElementCount::default();
    tally(&TreeWalker::new(registry).walk_pair(pair).elements, &mut count);
    count
}

// ===========================================================================
// Tests
// ===========================================================================
