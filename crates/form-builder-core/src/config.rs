//! Host-supplied configuration ("mods") for the form builder.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::category::FormInput;

/// Title prefix used for new cards when no default data options are given.
pub const DEFAULT_NEW_ELEMENT_TITLE: &str = "New Input";

/// Customizations supplied by the host application.
///
/// ## Serialization Format
///
/// Fields are serialized in `camelCase` (e.g. `customFormInputs`) so a
/// JavaScript host can pass its mods object through unchanged. Keys the core
/// does not know are kept in [`Mods::passthrough`] and never interpreted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Mods {
    /// Additional or overriding categories, in precedence order.
    pub custom_form_inputs: IndexMap<String, FormInput>,
    /// Category keys removed from classification and retyping.
    pub deactivated_form_inputs: Vec<String>,
    /// Schema fragment for new cards. Its `title` gets ` N` appended.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_element_default_data_options: Option<Value>,
    /// UI fragment stored for new cards.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_element_default_ui_schema: Option<Value>,
    /// Display labels, passed through to presentation.
    pub labels: Map<String, Value>,
    /// Tooltip texts, passed through to presentation.
    pub tooltips: Map<String, Value>,
    #[serde(flatten)]
    pub passthrough: Map<String, Value>,
}

impl Mods {
    /// Whether the host switched off the category with this key.
    pub fn is_deactivated(&self, key: &str) -> bool {
        self.deactivated_form_inputs.iter().any(|k| k == key)
    }

    /// Schema for the `index`-th new card (`newInput{index}`).
    ///
    /// Defaults to `{title: "New Input N", type: "string"}`.
    pub fn new_element_data(&self, index: usize) -> Value {
        let mut data = match &self.new_element_default_data_options {
            Some(Value::Object(obj)) => obj.clone(),
            _ => {
                let mut obj = Map::new();
                obj.insert("type".to_string(), Value::String("string".to_string()));
                obj
            }
        };
        let prefix = data
            .get("title")
            .and_then(Value::as_str)
            .unwrap_or(DEFAULT_NEW_ELEMENT_TITLE)
            .to_string();
        // `title` goes first so encoded documents read naturally.
        let mut ordered = Map::new();
        ordered.insert("title".to_string(), Value::String(format!("{prefix} {index}")));
        data.shift_remove("title");
        ordered.extend(data);
        Value::Object(ordered)
    }

    /// UI fragment for new cards, when the host configured a non-empty one.
    pub fn new_element_ui(&self) -> Option<&Map<String, Value>> {
        self.new_element_default_ui_schema
            .as_ref()
            .and_then(Value::as_object)
            .filter(|ui| !ui.is_empty())
    }
}
