//! User intents: the plain-data edit events a host UI sends to the engine.
//!
//! An [`Intent`] is serialized with a `type` tag (`{"type": "add_card",
//! "parent": ""}`) so hosts in other languages can build them as JSON.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::category::CategoryId;
use crate::config::Mods;
use crate::dependency::Possibility;
use crate::editor::{self, DragLocation};
use crate::error::EditorError;
use crate::pair::{ElementPath, SchemaPair};
use crate::registry::CategoryRegistry;

/// One structural or per-card edit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Intent {
    AddCard {
        #[serde(default)]
        parent: ElementPath,
    },
    AddSection {
        #[serde(default)]
        parent: ElementPath,
    },
    Delete {
        path: ElementPath,
    },
    Rename {
        path: ElementPath,
        name: String,
    },
    Retype {
        path: ElementPath,
        category: CategoryId,
    },
    MoveUp {
        path: ElementPath,
    },
    MoveDown {
        path: ElementPath,
    },
    Reorder {
        #[serde(default)]
        parent: ElementPath,
        source_index: usize,
        destination_index: usize,
    },
    MoveAcross {
        source: DragLocation,
        destination: DragLocation,
    },
    AttachDependency {
        path: ElementPath,
        possibility: Possibility,
    },
    DetachDependency {
        path: ElementPath,
        index: usize,
    },
    SetDependencyChildren {
        path: ElementPath,
        index: usize,
        children: Vec<String>,
    },
    SetDependencyValue {
        path: ElementPath,
        index: usize,
        /// `null` turns the group definition-based.
        #[serde(default)]
        values: Option<Vec<Value>>,
    },
    ClearDependencies {
        path: ElementPath,
    },
    UpdateDataOptions {
        path: ElementPath,
        options: Map<String, Value>,
    },
    UpdateUiOptions {
        path: ElementPath,
        options: Map<String, Value>,
    },
    SetRequired {
        path: ElementPath,
        required: bool,
    },
    SetReference {
        path: ElementPath,
        definition: String,
    },
    RenameDefinition {
        name: String,
        new_name: String,
    },
    /// Apply the inner intent to the definitions view instead of the main tree.
    Definitions {
        intent: Box<Intent>,
    },
}

impl Intent {
    /// Parse an intent from JSON text.
    pub fn from_json(text: &str) -> Result<Self, EditorError> {
        serde_json::from_str(text).map_err(|e| EditorError::InvalidIntent(e.to_string()))
    }

    /// The snake_case tag of this intent, for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Intent::AddCard { .. } => "add_card",
            Intent::AddSection { .. } => "add_section",
            Intent::Delete { .. } => "delete",
            Intent::Rename { .. } => "rename",
            Intent::Retype { .. } => "retype",
            Intent::MoveUp { .. } => "move_up",
            Intent::MoveDown { .. } => "move_down",
            Intent::Reorder { .. } => "reorder",
            Intent::MoveAcross { .. } => "move_across",
            Intent::AttachDependency { .. } => "attach_dependency",
            Intent::DetachDependency { .. } => "detach_dependency",
            Intent::SetDependencyChildren { .. } => "set_dependency_children",
            Intent::SetDependencyValue { .. } => "set_dependency_value",
            Intent::ClearDependencies { .. } => "clear_dependencies",
            Intent::UpdateDataOptions { .. } => "update_data_options",
            Intent::UpdateUiOptions { .. } => "update_ui_options",
            Intent::SetRequired { .. } => "set_required",
            Intent::SetReference { .. } => "set_reference",
            Intent::RenameDefinition { .. } => "rename_definition",
            Intent::Definitions { .. } => "definitions",
        }
    }
}

/// Apply one intent and return the edited pair.
///
/// Only renames can fail; every other intent is total and degrades to an
/// unchanged copy when its target does not exist.
pub fn apply_intent(
    registry: &CategoryRegistry,
    mods: &Mods,
    pair: &SchemaPair,
    intent: &Intent,
) -> Result<SchemaPair, EditorError> {
    tracing::debug!(intent = intent.name(), "applying intent");
    let next = match intent {
        Intent::AddCard { parent } => editor::add_card_with(pair, parent, mods),
        Intent::AddSection { parent } => editor::add_section(pair, parent),
        Intent::Delete { path } => editor::delete_element(pair, path),
        Intent::Rename { path, name } => editor::rename_key(pair, path, name)?,
        Intent::Retype { path, category } => editor::retype(registry, pair, path, category),
        Intent::MoveUp { path } => editor::move_up(pair, path),
        Intent::MoveDown { path } => editor::move_down(pair, path),
        Intent::Reorder {
            parent,
            source_index,
            destination_index,
        } => editor::reorder_by_drag(pair, parent, *source_index, *destination_index),
        Intent::MoveAcross {
            source,
            destination,
        } => editor::move_across_sections(pair, source, destination),
        Intent::AttachDependency { path, possibility } => {
            editor::attach_dependency(pair, path, possibility.clone())
        }
        Intent::DetachDependency { path, index } => editor::detach_dependency(pair, path, *index),
        Intent::SetDependencyChildren {
            path,
            index,
            children,
        } => editor::set_dependency_children(pair, path, *index, children),
        Intent::SetDependencyValue {
            path,
            index,
            values,
        } => editor::set_dependency_value(pair, path, *index, values.clone()),
        Intent::ClearDependencies { path } => editor::clear_dependencies(pair, path),
        Intent::UpdateDataOptions { path, options } => {
            editor::update_data_options(pair, path, options)
        }
        Intent::UpdateUiOptions { path, options } => editor::update_ui_options(pair, path, options),
        Intent::SetRequired { path, required } => editor::set_required(pair, path, *required),
        Intent::SetReference { path, definition } => {
            editor::set_reference(pair, path, definition)
        }
        Intent::RenameDefinition { name, new_name } => {
            editor::rename_definition(pair, name, new_name)?
        }
        Intent::Definitions { intent } => {
            if matches!(**intent, Intent::Definitions { .. } | Intent::RenameDefinition { .. }) {
                return Err(EditorError::InvalidIntent(format!(
                    "'{}' cannot be applied inside the definitions scope",
                    intent.name()
                )));
            }
            let view = editor::definitions_view(pair);
            let edited = apply_intent(registry, mods, &view, intent)?;
            editor::with_definitions_view(pair, &edited)
        }
    };
    Ok(next)
}

// ===========================================================================
// Tests
// ===========================================================================
