//! Error types for schema-pair decoding and structural editing.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Stable, machine-readable error codes for FFI consumers.
///
/// These codes form a **stable API contract**: once published, variant names
/// and their serialized `snake_case` strings must never change across versions.
/// The WASM bindings forward them to JavaScript unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum ErrorCode {
    /// Schema or UI schema text could not be decoded into a document.
    ParseError,
    /// A rename or move would duplicate a sibling property name.
    NameCollision,
    /// A document could not be serialized back to text.
    EncodeError,
    /// An intent payload could not be interpreted.
    InvalidIntent,
}

/// Which half of a schema pair an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Document {
    Schema,
    UiSchema,
    /// A single value typed into a dependency combination input.
    InputValue,
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Document::Schema => f.write_str("schema"),
            Document::UiSchema => f.write_str("uischema"),
            Document::InputValue => f.write_str("input value"),
        }
    }
}

#[derive(Debug, Error)]
pub enum EditorError {
    #[error("Failed to parse {document}: {message}")]
    Parse { document: Document, message: String },

    #[error("An element named '{name}' already exists in {parent}")]
    NameCollision { parent: String, name: String },

    #[error("Failed to encode schema pair: {0}")]
    Encode(String),

    #[error("Invalid intent: {0}")]
    InvalidIntent(String),
}

impl EditorError {
    pub(crate) fn parse(document: Document, message: impl fmt::Display) -> Self {
        EditorError::Parse {
            document,
            message: message.to_string(),
        }
    }

    /// Returns the stable error code for this error variant.
    pub fn error_code(&self) -> ErrorCode {
        match self {
            EditorError::Parse { .. } => ErrorCode::ParseError,
            EditorError::NameCollision { .. } => ErrorCode::NameCollision,
            EditorError::Encode(_) => ErrorCode::EncodeError,
            EditorError::InvalidIntent(_) => ErrorCode::InvalidIntent,
        }
    }

    /// Returns the element path context, if available.
    ///
    /// Only `NameCollision` carries one (the parent whose siblings collide).
    pub fn path(&self) -> Option<&str> {
        match self {
            EditorError::NameCollision { parent, .. } => Some(parent),
            EditorError::Parse { .. } | EditorError::Encode(_) | EditorError::InvalidIntent(_) => {
                None
            }
        }
    }

    /// Produces a structured JSON error for FFI consumers.
    ///
    /// Format: `{"code": "...", "message": "...", "path": "..." | null}`
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "code": self.error_code(),
            "message": self.to_string(),
            "path": self.path(),
        })
    }
}

// ===========================================================================
// Tests
// ===========================================================================
