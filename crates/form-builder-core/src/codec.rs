//! Text codec for schema pairs (JSON and YAML).
//!
//! Decoding never yields a half-built pair: either both documents parse into
//! objects or the call fails with [`EditorError::Parse`] naming the document
//! at fault. Encoding canonicalizes `properties` into display order so the
//! written text reads in the same order the form shows.

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Document, EditorError};
use crate::order::effective_order;
use crate::pair::SchemaPair;

/// Surface syntax of a schema document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CodecFormat {
    #[default]
    Json,
    Yaml,
}

impl CodecFormat {
    /// Pick the format from a file extension: `.yaml`/`.yml` is YAML,
    /// everything else JSON.
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("yaml") | Some("yml") => CodecFormat::Yaml,
            _ => CodecFormat::Json,
        }
    }
}

// ---------------------------------------------------------------------------
// Decode
// ---------------------------------------------------------------------------

/// Decode one document. Empty or whitespace-only text is the empty object.
pub fn decode_document(text: &str, format: CodecFormat, document: Document) -> Result<Value, EditorError> {
    if text.trim().is_empty() {
        return Ok(Value::Object(Map::new()));
    }
    let value: Value = match format {
        CodecFormat::Json => {
            serde_json::from_str(text).map_err(|e| EditorError::parse(document, e))?
        }
        CodecFormat::Yaml => {
            serde_yaml::from_str(text).map_err(|e| EditorError::parse(document, e))?
        }
    };
    decode_value(value, document)
}

/// Accept an already-parsed document. `null` is the empty object; any other
/// non-object root is a parse error.
pub fn decode_value(value: Value, document: Document) -> Result<Value, EditorError> {
    match value {
        Value::Null => Ok(Value::Object(Map::new())),
        Value::Object(_) => Ok(value),
        other => Err(EditorError::parse(
            document,
            format!("expected an object at the document root, found {}", kind_of(&other)),
        )),
    }
}

/// Decode a schema and its UI schema.
pub fn decode_pair(schema_text: &str, ui_text: &str, format: CodecFormat) -> Result<SchemaPair, EditorError> {
    let schema = decode_document(schema_text, format, Document::Schema)?;
    let uischema = decode_document(ui_text, format, Document::UiSchema)?;
    tracing::debug!(?format, "decoded schema pair");
    Ok(SchemaPair::new(schema, uischema))
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

// ---------------------------------------------------------------------------
// Encode
// ---------------------------------------------------------------------------

/// Serialize one document, pretty-printed.
pub fn encode_document(value: &Value, format: CodecFormat) -> Result<String, EditorError> {
    match format {
        CodecFormat::Json => {
            serde_json::to_string_pretty(value).map_err(|e| EditorError::Encode(e.to_string()))
        }
        CodecFormat::Yaml => {
            serde_yaml::to_string(value).map_err(|e| EditorError::Encode(e.to_string()))
        }
    }
}

/// Canonicalize and serialize a pair as `(schema_text, ui_text)`.
pub fn encode_pair(pair: &SchemaPair, format: CodecFormat) -> Result<(String, String), EditorError> {
    let canonical = canonicalize(pair);
    Ok((
        encode_document(&canonical.schema, format)?,
        encode_document(&canonical.uischema, format)?,
    ))
}

/// Re-emit every `properties` map in effective display order.
///
/// `definitions` are ordered against `uischema.definitions`. The result is
/// equal to the input as a JSON value; only key order changes.
pub fn canonicalize(pair: &SchemaPair) -> SchemaPair {
    let mut next = pair.clone();
    let ui_root = pair.uischema.as_object();
    if let Some(root) = next.schema.as_object_mut() {
        order_properties(root, ui_root);
        if let Some(Value::Object(definitions)) = root.get_mut("definitions") {
            let ui_definitions = ui_root
                .and_then(|ui| ui.get("definitions"))
                .and_then(Value::as_object);
            for (name, definition) in definitions.iter_mut() {
                if let Value::Object(definition) = definition {
                    let ui = ui_definitions
                        .and_then(|defs| defs.get(name))
                        .and_then(Value::as_object);
                    order_properties(definition, ui);
                }
            }
        }
    }
    next
}

fn order_properties(node: &mut Map<String, Value>, ui: Option<&Map<String, Value>>) {
    let order = effective_order(node, ui);
    let Some(Value::Object(props)) = node.get_mut("properties") else {
        return;
    };
    let mut old = std::mem::take(props);
    for name in order {
        if let Some(mut child) = old.shift_remove(&name) {
            if let Value::Object(child_node) = &mut child {
                let child_ui = ui.and_then(|u| u.get(&name)).and_then(Value::as_object);
                order_properties(child_node, child_ui);
            }
            props.insert(name, child);
        }
    }
    // Anything effective_order skipped keeps its relative position at the end.
    props.extend(old);
}

// ===========================================================================
// Tests
// ===========================================================================
