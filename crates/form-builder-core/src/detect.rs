//! Unsupported-feature detection.
//!
//! Scans a schema pair for constructs the editor cannot round-trip and
//! reports them as [`Warning`]s. Detection is read-only and advisory: nothing
//! here blocks an edit or alters the pair.

use serde_json::{Map, Value};

use crate::category::JsonType;
use crate::dependency::dependency_warnings;
use crate::pair::{ElementPath, SchemaPair};
use crate::registry::{CategoryRegistry, FALLBACK_CATEGORY};
use crate::walker::{ElementDescriptor, TreeWalker};
use crate::warning::Warning;

/// Composition keywords the editor has no representation for.
const COMPOSITION_KEYWORDS: &[&str] = &["allOf", "anyOf", "oneOf", "not"];

/// Keywords an object (root or section) may carry.
const OBJECT_KEYWORDS: &[&str] = &[
    "type",
    "title",
    "description",
    "properties",
    "dependencies",
    "required",
    "default",
    "$comment",
];

/// Extra keywords allowed only at the document root.
const ROOT_KEYWORDS: &[&str] = &["definitions", "$schema", "$id", "meta"];

/// Scan the whole pair.
pub fn detect(registry: &CategoryRegistry, pair: &SchemaPair) -> Vec<Warning> {
    let walked = TreeWalker::new(registry).walk_pair(pair);
    let mut warnings = walked.warnings;
    if let Some(root) = pair.schema.as_object() {
        check_object(root, &ElementPath::root(), &mut warnings);
    }
    check_elements(registry, pair, &walked.elements, &mut warnings);
    tracing::debug!(count = warnings.len(), "detected unsupported features");
    warnings
}

/// Human-readable messages of [`detect`], in report order.
pub fn detect_messages(registry: &CategoryRegistry, pair: &SchemaPair) -> Vec<String> {
    detect(registry, pair).into_iter().map(|w| w.message).collect()
}

fn check_elements(
    registry: &CategoryRegistry,
    pair: &SchemaPair,
    elements: &[ElementDescriptor],
    warnings: &mut Vec<Warning>,
) {
    for element in elements {
        let Some(node) = pair.schema_node(&element.path) else {
            continue;
        };
        if element.is_section {
            check_object(node, &element.path, warnings);
            check_elements(registry, pair, &element.children, warnings);
        } else {
            check_card(registry, pair, node, element, warnings);
        }
    }
}

/// Checks shared by the root and every section.
fn check_object(node: &Map<String, Value>, path: &ElementPath, warnings: &mut Vec<Warning>) {
    let display = path.to_string();
    check_composition(node, &display, warnings);
    check_multi_type(node, &display, warnings);
    for key in node.keys() {
        let known = OBJECT_KEYWORDS.contains(&key.as_str())
            || COMPOSITION_KEYWORDS.contains(&key.as_str())
            || (path.is_root() && ROOT_KEYWORDS.contains(&key.as_str()));
        if !known {
            warnings.push(Warning::unsupported(
                &display,
                key,
                format!("{} has unknown keyword '{}'", display_path(&display), key),
            ));
        }
    }
    warnings.extend(dependency_warnings(node, path));
}

fn check_card(
    registry: &CategoryRegistry,
    pair: &SchemaPair,
    node: &Map<String, Value>,
    element: &ElementDescriptor,
    warnings: &mut Vec<Warning>,
) {
    let display = element.path.to_string();
    check_composition(node, &display, warnings);
    check_multi_type(node, &display, warnings);

    let ui = pair.ui_node(&element.path);
    let category = match registry.try_classify(node, ui) {
        Some(category) => category,
        None => {
            warnings.push(Warning::unsupported_by_category(
                &display,
                "type",
                FALLBACK_CATEGORY.as_str(),
            ));
            FALLBACK_CATEGORY
        }
    };
    let Some(input) = registry.input(&category) else {
        return;
    };
    // Only the card's own keys are checked, not what a `$ref` pulls in.
    for key in node.keys() {
        if COMPOSITION_KEYWORDS.contains(&key.as_str()) {
            continue;
        }
        if !input.supports_keyword(key) {
            warnings.push(Warning::unsupported_by_category(&display, key, category.as_str()));
        }
    }
}

fn check_composition(node: &Map<String, Value>, path: &str, warnings: &mut Vec<Warning>) {
    for keyword in COMPOSITION_KEYWORDS {
        if node.contains_key(*keyword) {
            warnings.push(Warning::unsupported(
                path,
                keyword,
                format!("{} uses unsupported composition keyword '{}'", display_path(path), keyword),
            ));
        }
    }
}

fn check_multi_type(node: &Map<String, Value>, path: &str, warnings: &mut Vec<Warning>) {
    let Some(Value::Array(types)) = node.get("type") else {
        return;
    };
    let concrete = types
        .iter()
        .filter_map(Value::as_str)
        .filter_map(JsonType::from_keyword)
        .filter(|t| *t != JsonType::Null)
        .count();
    if concrete > 1 {
        warnings.push(Warning::unsupported(
            path,
            "type",
            format!("{} declares multiple types", display_path(path)),
        ));
    }
}

fn display_path(path: &str) -> &str {
    if path.is_empty() {
        "<root>"
    } else {
        path
    }
}

// ===========================================================================
// Tests
// ===========================================================================
