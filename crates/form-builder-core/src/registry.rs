//! Category registry: ordered lookup from schema nodes to categories.
//!
//! [`CategoryRegistry`] is built once from the built-in descriptors plus the
//! host's [`Mods`] and is immutable afterwards. Classification walks the
//! active descriptors in precedence order and returns the first match.
//!
//! ## Precedence
//!
//! 1. Custom categories with new keys, in the order the host listed them.
//! 2. Built-ins in [`CategoryId::BUILTIN`] order. A custom descriptor that
//!    reuses a built-in key replaces that built-in in its slot.
//!
//! Deactivated keys are dropped from the list entirely, so classification
//! falls through to the next matching category.

use serde_json::{Map, Value};

use crate::category::{builtin_inputs, CategoryId, FormInput};
use crate::config::Mods;

/// Category used when no rule matches.
pub const FALLBACK_CATEGORY: CategoryId = CategoryId::ShortAnswer;

#[derive(Debug, Clone)]
pub struct CategoryRegistry {
    inputs: Vec<(CategoryId, FormInput)>,
}

impl CategoryRegistry {
    /// Registry with only the built-in categories.
    pub fn builtin() -> Self {
        Self {
            inputs: builtin_inputs(),
        }
    }

    /// Registry with the built-ins merged with the host's mods.
    pub fn new(mods: &Mods) -> Self {
        let mut builtins = builtin_inputs();
        let mut inputs = Vec::with_capacity(builtins.len() + mods.custom_form_inputs.len());

        for (key, input) in &mods.custom_form_inputs {
            let id = CategoryId::from_key(key);
            if let Some(slot) = builtins.iter_mut().find(|(existing, _)| *existing == id) {
                tracing::debug!(category = %id, "custom form input overrides built-in");
                slot.1 = input.clone();
            } else {
                inputs.push((id, input.clone()));
            }
        }
        inputs.extend(builtins);
        inputs.retain(|(id, _)| !mods.is_deactivated(id.as_str()));

        Self { inputs }
    }

    /// Classify a node, falling back to [`FALLBACK_CATEGORY`].
    pub fn classify(&self, node: &Map<String, Value>, ui: Option<&Map<String, Value>>) -> CategoryId {
        self.try_classify(node, ui).unwrap_or(FALLBACK_CATEGORY)
    }

    /// Classify a node; `None` when no active category matches.
    pub fn try_classify(
        &self,
        node: &Map<String, Value>,
        ui: Option<&Map<String, Value>>,
    ) -> Option<CategoryId> {
        self.inputs
            .iter()
            .find(|(_, input)| input.matches(node, ui))
            .map(|(id, _)| id.clone())
    }

    pub fn input(&self, id: &CategoryId) -> Option<&FormInput> {
        self.inputs
            .iter()
            .find(|(existing, _)| existing == id)
            .map(|(_, input)| input)
    }

    pub fn contains(&self, id: &CategoryId) -> bool {
        self.input(id).is_some()
    }

    pub fn default_data_schema(&self, id: &CategoryId) -> Option<&Value> {
        self.input(id).map(|input| &input.default_data_schema)
    }

    pub fn default_ui_schema(&self, id: &CategoryId) -> Option<&Value> {
        self.input(id).map(|input| &input.default_ui_schema)
    }

    pub fn display_name(&self, id: &CategoryId) -> Option<&str> {
        self.input(id).map(|input| input.display_name.as_str())
    }

    /// Active categories in precedence order.
    pub fn categories(&self) -> impl Iterator<Item = &CategoryId> {
        self.inputs.iter().map(|(id, _)| id)
    }
}

impl Default for CategoryRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

// ===========================================================================
// Tests
// ===========================================================================
