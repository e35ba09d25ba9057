//! Advisory diagnostics emitted while walking or checking a schema pair.
//!
//! Warnings never block an edit. They exist so the host can tell the user
//! that part of the document will not round-trip through the editor.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A non-fatal diagnostic attached to an element path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Warning {
    /// Element path the warning refers to (`""` for the root).
    pub path: String,
    /// Classification of the warning.
    pub kind: WarningKind,
    /// Human-readable description.
    pub message: String,
}

/// Classification of advisory warnings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WarningKind {
    /// A `$ref` names a definition that does not exist.
    UnresolvedReference { reference: String },
    /// The node uses a construct the editor cannot represent.
    UnsupportedFeature {
        feature: String,
        /// Category the element was classified as, when the feature is
        /// unsupported only for that category.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        category: Option<String>,
    },
    /// A value of the parent's `enum` is not covered by any dependency branch.
    UncoveredDependencyValue { parent: String, value: Value },
}

impl Warning {
    pub(crate) fn unresolved_reference(path: &str, reference: &str) -> Self {
        Self {
            path: path.to_string(),
            kind: WarningKind::UnresolvedReference {
                reference: reference.to_string(),
            },
            message: format!("{} references missing definition '{}'", display(path), reference),
        }
    }

    pub(crate) fn unsupported(path: &str, feature: &str, message: String) -> Self {
        Self {
            path: path.to_string(),
            kind: WarningKind::UnsupportedFeature {
                feature: feature.to_string(),
                category: None,
            },
            message,
        }
    }

    pub(crate) fn unsupported_by_category(path: &str, feature: &str, category: &str) -> Self {
        Self {
            path: path.to_string(),
            kind: WarningKind::UnsupportedFeature {
                feature: feature.to_string(),
                category: Some(category.to_string()),
            },
            message: format!(
                "{} uses a feature not supported by category {}: {}",
                display(path),
                category,
                feature
            ),
        }
    }

    pub(crate) fn uncovered_value(path: &str, parent: &str, value: &Value) -> Self {
        Self {
            path: path.to_string(),
            kind: WarningKind::UncoveredDependencyValue {
                parent: parent.to_string(),
                value: value.clone(),
            },
            message: format!(
                "Value {} of '{}' is not handled by any dependency branch",
                value, parent
            ),
        }
    }
}

/// Render a path for messages, naming the root explicitly.
fn display(path: &str) -> &str {
    if path.is_empty() {
        "<root>"
    } else {
        path
    }
}
