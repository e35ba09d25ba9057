//! WASM bindings for form-builder-core.
//!
//! Exposes `elements`, `apply` and `check` via `wasm-bindgen` for use from
//! JavaScript / TypeScript. Uses `serde-wasm-bindgen` for JS ↔
//! serde_json::Value marshalling.
//!
//! ## WASM API Contract
//!
//! - Results are wrapped in an `apiVersion: "1.0"` envelope.
//! - Errors are structured JS objects `{ code, message, path }`.
//! - `schema`/`uischema` may be `undefined` or `null` (treated as `{}`).
//! - The `mods` parameter defaults to `Mods::default()` when omitted.

use serde::Serialize;
use wasm_bindgen::prelude::*;

use serde_wasm_bindgen::Serializer;

use form_builder_core::{
    decode_value, Document, EditorError, ElementDescriptor, FormBuilder, Intent, Mods, SchemaPair,
    Warning,
};

/// Version of the envelope shape returned to JavaScript.
pub const API_VERSION: &str = "1.0";

// ---------------------------------------------------------------------------
// WASM-local DTOs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WasmElementsResult<'a> {
    api_version: &'static str,
    elements: &'a [ElementDescriptor],
    warnings: &'a [Warning],
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WasmApplyResult<'a> {
    api_version: &'static str,
    schema: &'a serde_json::Value,
    uischema: &'a serde_json::Value,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WasmCheckResult<'a> {
    api_version: &'static str,
    warnings: &'a [Warning],
}

// ---------------------------------------------------------------------------
// Error helpers
// ---------------------------------------------------------------------------

/// Map an `EditorError` to a structured JS object `{ code, message, path }`.
fn to_structured_js_error(e: &EditorError) -> JsValue {
    let serializer = Serializer::json_compatible();
    e.to_json().serialize(&serializer).unwrap_or_else(|_| {
        let fallback = serde_json::json!({
            "code": "serialization_error",
            "message": e.to_string(),
            "path": serde_json::Value::Null,
        });
        fallback
            .serialize(&serializer)
            .unwrap_or_else(|_| JsValue::from_str(&e.to_string()))
    })
}

/// Map a `serde_wasm_bindgen` error to `{ code: "json_parse_error", ... }`.
fn to_serde_js_error(e: serde_wasm_bindgen::Error) -> JsValue {
    let error_obj = serde_json::json!({
        "code": "json_parse_error",
        "message": e.to_string(),
        "path": serde_json::Value::Null,
    });
    let serializer = Serializer::json_compatible();
    error_obj
        .serialize(&serializer)
        .unwrap_or_else(|_| JsValue::from_str(&e.to_string()))
}

// ---------------------------------------------------------------------------
// Input decoding
// ---------------------------------------------------------------------------

fn document_from_js(value: JsValue, document: Document) -> Result<serde_json::Value, JsValue> {
    let value: serde_json::Value = if value.is_undefined() || value.is_null() {
        serde_json::Value::Null
    } else {
        serde_wasm_bindgen::from_value(value).map_err(to_serde_js_error)?
    };
    decode_value(value, document).map_err(|e| to_structured_js_error(&e))
}

fn pair_from_js(schema: JsValue, uischema: JsValue) -> Result<SchemaPair, JsValue> {
    Ok(SchemaPair::new(
        document_from_js(schema, Document::Schema)?,
        document_from_js(uischema, Document::UiSchema)?,
    ))
}

fn builder_from_js(mods: JsValue) -> Result<FormBuilder, JsValue> {
    let mods: Mods = if mods.is_undefined() || mods.is_null() {
        Mods::default()
    } else {
        serde_wasm_bindgen::from_value(mods).map_err(to_serde_js_error)?
    };
    Ok(FormBuilder::new(mods))
}

// ---------------------------------------------------------------------------
// Public WASM API
// ---------------------------------------------------------------------------

/// Initialize the WASM module and set up the panic hook for better error messages.
///
/// Called automatically when the WASM module loads (`#[wasm_bindgen(start)]`).
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// Project a schema pair onto its element tree.
///
/// Returns `{ apiVersion, elements, warnings }`.
#[wasm_bindgen(skip_typescript)]
pub fn elements(schema: JsValue, uischema: JsValue, mods: JsValue) -> Result<JsValue, JsValue> {
    let builder = builder_from_js(mods)?;
    let pair = pair_from_js(schema, uischema)?;
    let walked = builder.elements(&pair);

    let bridge = WasmElementsResult {
        api_version: API_VERSION,
        elements: &walked.elements,
        warnings: &walked.warnings,
    };
    let serializer = Serializer::json_compatible();
    bridge.serialize(&serializer).map_err(to_serde_js_error)
}

/// Apply one intent (`{ type: "add_card", ... }`) to a schema pair.
///
/// Returns `{ apiVersion, schema, uischema }` with `properties` in display
/// order. On error, throws a structured JS object `{ code, message, path }`.
#[wasm_bindgen(skip_typescript)]
pub fn apply(
    schema: JsValue,
    uischema: JsValue,
    intent: JsValue,
    mods: JsValue,
) -> Result<JsValue, JsValue> {
    let builder = builder_from_js(mods)?;
    let pair = pair_from_js(schema, uischema)?;
    let intent: Intent = serde_wasm_bindgen::from_value(intent).map_err(|e| {
        to_structured_js_error(&EditorError::InvalidIntent(e.to_string()))
    })?;

    let edited = builder
        .apply(&pair, &intent)
        .map_err(|e| to_structured_js_error(&e))?;
    let edited = form_builder_core::canonicalize(&edited);

    let bridge = WasmApplyResult {
        api_version: API_VERSION,
        schema: &edited.schema,
        uischema: &edited.uischema,
    };
    let serializer = Serializer::json_compatible();
    bridge.serialize(&serializer).map_err(to_serde_js_error)
}

/// Advisory warnings for a schema pair.
///
/// Returns `{ apiVersion, warnings }`.
#[wasm_bindgen(skip_typescript)]
pub fn check(schema: JsValue, uischema: JsValue, mods: JsValue) -> Result<JsValue, JsValue> {
    let builder = builder_from_js(mods)?;
    let pair = pair_from_js(schema, uischema)?;
    let warnings = builder.check(&pair);

    let bridge = WasmCheckResult {
        api_version: API_VERSION,
        warnings: &warnings,
    };
    let serializer = Serializer::json_compatible();
    bridge.serialize(&serializer).map_err(to_serde_js_error)
}

// Hand-authored TypeScript for the shapes produced by serde +
// Serializer::json_compatible(). Keep in sync with ElementDescriptor,
// ElementProps, Warning, WarningKind, Intent and ErrorCode in the core crate.
#[wasm_bindgen(typescript_custom_section)]
const TS_TYPES: &str = r#"
export type Schema = Record<string, unknown>;

export interface ElementProps {
  name: string;
  title?: string | null;
  description?: string | null;
  required: boolean;
  dataOptions: Schema;
  uiOptions: Schema;
  reference?: string | null;
  unresolvedReference: boolean;
  dependents: { children: string[]; value?: { enum: unknown[] } }[];
  combinationInputs?: {
    name: string;
    input: "numeric" | "json_array" | "json_object" | "text";
  }[];
  dependent: boolean;
  neighborNames: string[];
}

export interface ElementDescriptor {
  key: string;
  path: string;
  category: string | null;
  isSection: boolean;
  componentProps: ElementProps;
  children?: ElementDescriptor[];
}

export type WarningKind =
  | { type: "unresolved_reference"; reference: string }
  | { type: "unsupported_feature"; feature: string; category?: string }
  | { type: "uncovered_dependency_value"; parent: string; value: unknown };

export interface Warning {
  path: string;
  kind: WarningKind;
  message: string;
}

export type Intent = { type: string } & Record<string, unknown>;

export type ErrorCode =
  | "parse_error"
  | "name_collision"
  | "encode_error"
  | "invalid_intent"
  | "json_parse_error";

export interface StructuredError {
  code: ErrorCode;
  message: string;
  path: string | null;
}

export interface Mods {
  customFormInputs?: Record<string, unknown>;
  deactivatedFormInputs?: string[];
  newElementDefaultDataOptions?: Schema;
  newElementDefaultUiSchema?: Schema;
  labels?: Record<string, unknown>;
  tooltips?: Record<string, unknown>;
}

export function elements(
  schema: Schema | null | undefined,
  uischema: Schema | null | undefined,
  mods?: Mods | null
): { apiVersion: string; elements: ElementDescriptor[]; warnings: Warning[] };

export function apply(
  schema: Schema | null | undefined,
  uischema: Schema | null | undefined,
  intent: Intent,
  mods?: Mods | null
): { apiVersion: string; schema: Schema; uischema: Schema };

export function check(
  schema: Schema | null | undefined,
  uischema: Schema | null | undefined,
  mods?: Mods | null
): { apiVersion: string; warnings: Warning[] };
"#;
