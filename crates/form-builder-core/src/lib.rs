//! # form-builder-core
//!
//! Schema/tree synchronization engine for visual JSON Schema form builders.
//!
//! A form is a [`SchemaPair`]: a JSON Schema document plus its UI Schema.
//! The engine classifies properties into categories ([`CategoryRegistry`]),
//! projects the pair onto an ordered tree of cards and sections
//! ([`TreeWalker`]), applies structural edits as pure transformations
//! ([`editor`], [`apply_intent`]), keeps the JSON Schema `dependencies`
//! encoding of conditional fields consistent ([`dependency`]), and reports
//! constructs it cannot round-trip ([`detect()`]).
//!
//! ## Quick Start
//!
//! ```rust
//! use form_builder_core::{editor, ElementPath, SchemaPair};
//!
//! let pair = SchemaPair::empty();
//! let pair = editor::add_card(&pair, &ElementPath::root());
//! let pair = editor::rename_key(&pair, &ElementPath::parse("newInput1"), "username").unwrap();
//!
//! assert_eq!(pair.schema["properties"]["username"]["title"], "New Input 1");
//! assert_eq!(pair.uischema["ui:order"], serde_json::json!(["username"]));
//! ```

pub mod builder;
pub mod category;
pub mod codec;
pub mod config;
pub mod dependency;
pub mod detect;
pub mod editor;
pub mod error;
pub mod intent;
pub mod order;
pub mod pair;
pub mod registry;
pub mod resolver;
pub mod schema_utils;
pub mod walker;
pub mod warning;

pub use builder::FormBuilder;
pub use category::{CategoryId, FormInput, JsonType, MatchRule};
pub use codec::{canonicalize, decode_pair, decode_value, encode_pair, CodecFormat};
pub use config::Mods;
pub use dependency::{
    combination_inputs, CombinationField, CombinationInput, DependencyMode, Possibility,
    PossibilityValue,
};
pub use detect::{detect, detect_messages};
pub use editor::DragLocation;
pub use error::{Document, EditorError, ErrorCode};
pub use intent::{apply_intent, Intent};
pub use order::effective_order;
pub use pair::{ElementPath, SchemaPair};
pub use registry::CategoryRegistry;
pub use schema_utils::{build_path, split_path};
pub use walker::{count_elements, ElementCount, ElementDescriptor, ElementProps, TreeWalker, WalkResult};
pub use warning::{Warning, WarningKind};
