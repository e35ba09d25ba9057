//! Host facade: decode, edit, re-encode, hand the texts back.
//!
//! [`FormBuilder`] holds the immutable configuration (registry and mods) and
//! runs the control flow a host UI performs on every user action. It keeps no
//! document state between calls; the caller owns the texts.

use crate::codec::{decode_pair, encode_pair, CodecFormat};
use crate::config::Mods;
use crate::detect::detect;
use crate::error::EditorError;
use crate::intent::{apply_intent, Intent};
use crate::pair::SchemaPair;
use crate::registry::CategoryRegistry;
use crate::walker::{count_elements, ElementCount, TreeWalker, WalkResult};
use crate::warning::Warning;

#[derive(Debug, Clone)]
pub struct FormBuilder {
    registry: CategoryRegistry,
    mods: Mods,
}

impl FormBuilder {
    pub fn new(mods: Mods) -> Self {
        Self {
            registry: CategoryRegistry::new(&mods),
            mods,
        }
    }

    pub fn registry(&self) -> &CategoryRegistry {
        &self.registry
    }

    pub fn mods(&self) -> &Mods {
        &self.mods
    }

    /// Apply an intent to a decoded pair.
    pub fn apply(&self, pair: &SchemaPair, intent: &Intent) -> Result<SchemaPair, EditorError> {
        apply_intent(&self.registry, &self.mods, pair, intent)
    }

    /// Decode both texts, apply `intent`, and pass the re-encoded texts to
    /// `on_change`.
    ///
    /// On any error the callback is not invoked, so the caller's texts stay
    /// the last known-good state.
    pub fn apply_text<F>(
        &self,
        schema_text: &str,
        ui_text: &str,
        format: CodecFormat,
        intent: &Intent,
        on_change: F,
    ) -> Result<(), EditorError>
    where
        F: FnOnce(String, String),
    {
        let pair = decode_pair(schema_text, ui_text, format)?;
        let next = self.apply(&pair, intent)?;
        let (schema, uischema) = encode_pair(&next, format)?;
        on_change(schema, uischema);
        Ok(())
    }

    /// The element tree of a decoded pair.
    pub fn elements(&self, pair: &SchemaPair) -> WalkResult {
        TreeWalker::new(&self.registry).walk_pair(pair)
    }

    /// The element tree of the definitions of a decoded pair.
    pub fn definition_elements(&self, pair: &SchemaPair) -> WalkResult {
        TreeWalker::new(&self.registry).walk_definitions(pair)
    }

    pub fn elements_text(&self, schema_text: &str, ui_text: &str, format: CodecFormat) -> Result<WalkResult, EditorError> {
        Ok(self.elements(&decode_pair(schema_text, ui_text, format)?))
    }

    pub fn count(&self, pair: &SchemaPair) -> ElementCount {
        count_elements(&self.registry, pair)
    }

    /// Advisory warnings for a decoded pair.
    pub fn check(&self, pair: &SchemaPair) -> Vec<Warning> {
        detect(&self.registry, pair)
    }

    pub fn check_text(&self, schema_text: &str, ui_text: &str, format: CodecFormat) -> Result<Vec<Warning>, EditorError> {
        Ok(self.check(&decode_pair(schema_text, ui_text, format)?))
    }
}

impl Default for FormBuilder {
    fn default() -> Self {
        Self::new(Mods::default())
    }
}

// ===========================================================================
// Tests
// ===========================================================================
