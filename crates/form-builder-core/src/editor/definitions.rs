//! Editing `definitions` with the same operations as the main tree.
//!
//! The definitions of a document are presented as the properties of one
//! synthetic object. Any editor operation can run on that view; writing the
//! view back replaces `definitions` and `uischema.definitions`.

use serde_json::{json, Map, Value};

use super::rename_key;
use crate::error::EditorError;
use crate::pair::{ElementPath, SchemaPair};
use crate::resolver::definition_ref;

const DEFINITIONS: &str = "definitions";

/// The definitions of `pair` as an ordinary object pair.
pub fn definitions_view(pair: &SchemaPair) -> SchemaPair {
    let properties = pair.definitions().cloned().unwrap_or_default();
    let uischema = pair.ui_definitions().cloned().unwrap_or_default();
    SchemaPair::new(
        json!({ "type": "object", "properties": properties }),
        Value::Object(uischema),
    )
}

/// Write an edited definitions view back into `pair`.
///
/// Only the view's `properties` and UI schema are kept. Empty results do not
/// introduce keys the document did not have.
pub fn with_definitions_view(pair: &SchemaPair, view: &SchemaPair) -> SchemaPair {
    let definitions = view
        .schema
        .get("properties")
        .and_then(Value::as_object)
        .cloned()
        .unwrap_or_default();
    let ui_definitions = view.uischema.as_object().cloned().unwrap_or_default();

    let mut next = pair.clone();
    if let Some(schema) = next.schema.as_object_mut() {
        store(schema, definitions);
    }
    if !ui_definitions.is_empty() && !next.uischema.is_object() {
        next.uischema = Value::Object(Map::new());
    }
    if let Some(ui) = next.uischema.as_object_mut() {
        store(ui, ui_definitions);
    }
    next
}

fn store(target: &mut Map<String, Value>, entries: Map<String, Value>) {
    if entries.is_empty() && !target.contains_key(DEFINITIONS) {
        return;
    }
    target.insert(DEFINITIONS.to_string(), Value::Object(entries));
}

/// Rename a definition and every `$ref` pointing at it.
///
/// Fails with [`EditorError::NameCollision`] when `new_name` is already a
/// definition.
pub fn rename_definition(pair: &SchemaPair, old: &str, new_name: &str) -> Result<SchemaPair, EditorError> {
    let view = definitions_view(pair);
    let renamed = rename_key(&view, &ElementPath::new([old]), new_name)?;
    if renamed == view {
        return Ok(pair.clone());
    }
    let mut next = with_definitions_view(pair, &renamed);
    let (from, to) = (definition_ref(old), definition_ref(new_name));
    let rewritten = rewrite_refs(&mut next.schema, &from, &to);
    tracing::debug!(from = %old, to = %new_name, rewritten, "renamed definition");
    Ok(next)
}

/// Replace every `$ref` equal to `from` with `to`. Returns the number of
/// references rewritten.
fn rewrite_refs(value: &mut Value, from: &str, to: &str) -> usize {
    match value {
        Value::Object(map) => {
            let mut count = 0;
            for (key, child) in map.iter_mut() {
                if key == "$ref" && child.as_str() == Some(from) {
                    *child = Value::String(to.to_string());
                    count += 1;
                } else {
                    count += rewrite_refs(child, from, to);
                }
            }
            count
        }
        Value::Array(items) => items.iter_mut().map(|item| rewrite_refs(item, from, to)).sum(),
        _ => 0,
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::add_card;
    use pretty_assertions::assert_eq;

    fn document() -> SchemaPair {
        SchemaPair::new(
            json!({
                "type": "object",
                "definitions": {
                    "address": { "type": "object", "properties": { "street": { "type": "string" } } }
                },
                "properties": {
                    "home": { "$ref": "#/definitions/address" },
                    "work": { "$ref": "#/definitions/address", "title": "Work" }
                }
            }),
            json!({ "definitions": { "address": { "ui:order": ["street"] } } }),
        )
    }

    #[test]
    fn test_view_exposes_definitions_as_properties() {
        let view = definitions_view(&document());
        assert_eq!(
            view.schema["properties"]["address"]["properties"]["street"],
            json!({ "type": "string" })
        );
        assert_eq!(view.uischema, json!({ "address": { "ui:order": ["street"] } }));
    }

    #[test]
    fn test_edit_through_view() {
        let pair = document();
        let view = add_card(&definitions_view(&pair), &ElementPath::parse("address"));
        let next = with_definitions_view(&pair, &view);
        assert_eq!(
            next.schema["definitions"]["address"]["properties"]["newInput1"],
            json!({ "title": "New Input 1", "type": "string" })
        );
        assert_eq!(
            next.uischema["definitions"]["address"]["ui:order"],
            json!(["street", "newInput1"])
        );
        assert_eq!(next.schema["properties"], pair.schema["properties"]);
    }

    #[test]
    fn test_empty_view_adds_nothing() {
        let pair = SchemaPair::empty();
        assert_eq!(with_definitions_view(&pair, &definitions_view(&pair)), pair);
    }

    #[test]
    fn test_rename_definition_rewrites_refs() {
        let next = rename_definition(&document(), "address", "location").unwrap();
        assert!(next.schema["definitions"].get("location").is_some());
        assert_eq!(next.schema["properties"]["home"], json!({ "$ref": "#/definitions/location" }));
        assert_eq!(next.schema["properties"]["work"]["$ref"], json!("#/definitions/location"));
        assert!(next.uischema["definitions"].get("location").is_some());
    }

    #[test]
    fn test_rename_definition_collision() {
        let mut pair = document();
        pair.schema["definitions"]["location"] = json!({});
        let err = rename_definition(&pair, "address", "location").unwrap_err();
        assert!(matches!(err, EditorError::NameCollision { .. }));
    }
}
