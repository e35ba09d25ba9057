//! Form input categories, match rules and the built-in descriptors.
//!
//! A category is the editor's name for "what kind of field is this"
//! (short answer, dropdown, reference, ...). Each category is described by a
//! [`FormInput`]: the rules that recognize it in a schema, the fragment written
//! when a card is switched to it, and opaque renderer ids for the host UI.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

// ---------------------------------------------------------------------------
// CategoryId
// ---------------------------------------------------------------------------

/// Identifier of a form input category.
///
/// Built-ins are closed variants; host-supplied categories travel as
/// `Custom(key)`. Serialized as the plain key (`"shortAnswer"`, `"myInput"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CategoryId {
    Time,
    Checkbox,
    Ref,
    Radio,
    Dropdown,
    LongAnswer,
    Password,
    ShortAnswer,
    Integer,
    Number,
    Array,
    Custom(String),
}

impl CategoryId {
    /// Built-in categories in classification precedence order (first match wins).
    pub const BUILTIN: [CategoryId; 11] = [
        CategoryId::Time,
        CategoryId::Checkbox,
        CategoryId::Ref,
        CategoryId::Radio,
        CategoryId::Dropdown,
        CategoryId::LongAnswer,
        CategoryId::Password,
        CategoryId::ShortAnswer,
        CategoryId::Integer,
        CategoryId::Number,
        CategoryId::Array,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            CategoryId::Time => "time",
            CategoryId::Checkbox => "checkbox",
            CategoryId::Ref => "ref",
            CategoryId::Radio => "radio",
            CategoryId::Dropdown => "dropdown",
            CategoryId::LongAnswer => "longAnswer",
            CategoryId::Password => "password",
            CategoryId::ShortAnswer => "shortAnswer",
            CategoryId::Integer => "integer",
            CategoryId::Number => "number",
            CategoryId::Array => "array",
            CategoryId::Custom(key) => key,
        }
    }

    /// Map a key to its category; unknown keys become `Custom`.
    pub fn from_key(key: &str) -> Self {
        match key {
            "time" => CategoryId::Time,
            "checkbox" => CategoryId::Checkbox,
            "ref" => CategoryId::Ref,
            "radio" => CategoryId::Radio,
            "dropdown" => CategoryId::Dropdown,
            "longAnswer" => CategoryId::LongAnswer,
            "password" => CategoryId::Password,
            "shortAnswer" => CategoryId::ShortAnswer,
            "integer" => CategoryId::Integer,
            "number" => CategoryId::Number,
            "array" => CategoryId::Array,
            other => CategoryId::Custom(other.to_string()),
        }
    }

    pub fn is_builtin(&self) -> bool {
        !matches!(self, CategoryId::Custom(_))
    }
}

impl fmt::Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for CategoryId {
    fn from(value: String) -> Self {
        CategoryId::from_key(&value)
    }
}

impl From<CategoryId> for String {
    fn from(value: CategoryId) -> Self {
        match value {
            CategoryId::Custom(key) => key,
            builtin => builtin.as_str().to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// JsonType
// ---------------------------------------------------------------------------

/// A JSON Schema primitive type name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JsonType {
    String,
    Number,
    Integer,
    Boolean,
    Array,
    Object,
    Null,
}

impl JsonType {
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "string" => Some(JsonType::String),
            "number" => Some(JsonType::Number),
            "integer" => Some(JsonType::Integer),
            "boolean" => Some(JsonType::Boolean),
            "array" => Some(JsonType::Array),
            "object" => Some(JsonType::Object),
            "null" => Some(JsonType::Null),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            JsonType::String => "string",
            JsonType::Number => "number",
            JsonType::Integer => "integer",
            JsonType::Boolean => "boolean",
            JsonType::Array => "array",
            JsonType::Object => "object",
            JsonType::Null => "null",
        }
    }
}

/// The type a node is classified by.
///
/// Untyped nodes, `$ref`-only nodes and unknown type names resolve to
/// `Null`. For a type array the first concrete (non-`null`) member wins,
/// so `["string", "null"]` resolves to `String`.
pub fn resolved_type(node: &Map<String, Value>) -> JsonType {
    match node.get("type") {
        Some(Value::String(s)) => JsonType::from_keyword(s).unwrap_or(JsonType::Null),
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .filter_map(JsonType::from_keyword)
            .find(|t| *t != JsonType::Null)
            .unwrap_or(JsonType::Null),
        _ => JsonType::Null,
    }
}

// ---------------------------------------------------------------------------
// MatchRule
// ---------------------------------------------------------------------------

/// One way a schema node can be recognized as belonging to a category.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchRule {
    /// Accepted resolved types. `null` also accepts untyped nodes.
    pub types: Vec<JsonType>,
    /// Required `ui:widget` value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub widget: Option<String>,
    /// Node must carry a non-empty `enum`.
    #[serde(default, rename = "enum", skip_serializing_if = "is_false")]
    pub requires_enum: bool,
    /// Node must carry a `$ref`.
    #[serde(default, rename = "$ref", skip_serializing_if = "is_false")]
    pub requires_ref: bool,
    /// Required `format` value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl MatchRule {
    pub fn of_types(types: &[JsonType]) -> Self {
        Self {
            types: types.to_vec(),
            ..Self::default()
        }
    }

    fn widget(mut self, widget: &str) -> Self {
        self.widget = Some(widget.to_string());
        self
    }

    fn with_enum(mut self) -> Self {
        self.requires_enum = true;
        self
    }

    fn with_ref(mut self) -> Self {
        self.requires_ref = true;
        self
    }

    fn format(mut self, format: &str) -> Self {
        self.format = Some(format.to_string());
        self
    }

    /// Whether `node` (with its UI node, if any) satisfies every clause.
    pub fn matches(&self, node: &Map<String, Value>, ui: Option<&Map<String, Value>>) -> bool {
        if !self.types.contains(&resolved_type(node)) {
            return false;
        }
        if let Some(widget) = &self.widget {
            let actual = ui.and_then(|u| u.get("ui:widget")).and_then(Value::as_str);
            if actual != Some(widget.as_str()) {
                return false;
            }
        }
        if self.requires_enum
            && !node
                .get("enum")
                .and_then(Value::as_array)
                .is_some_and(|e| !e.is_empty())
        {
            return false;
        }
        if self.requires_ref && !node.contains_key("$ref") {
            return false;
        }
        if let Some(format) = &self.format {
            if node.get("format").and_then(Value::as_str) != Some(format.as_str()) {
                return false;
            }
        }
        true
    }
}

// ---------------------------------------------------------------------------
// FormInput
// ---------------------------------------------------------------------------

/// Descriptor of one category, built-in or host-supplied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormInput {
    pub display_name: String,
    pub match_if: Vec<MatchRule>,
    /// Schema fragment written when a card is switched to this category.
    #[serde(default = "empty_object")]
    pub default_data_schema: Value,
    /// UI fragment written when a card is switched to this category.
    #[serde(default = "empty_object")]
    pub default_ui_schema: Value,
    /// The JSON type cards of this category store.
    #[serde(rename = "type")]
    pub input_type: JsonType,
    /// Host renderer id for the card body. Never interpreted by the core.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card_body: Option<String>,
    /// Host renderer id for the settings modal. Never interpreted by the core.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modal_body: Option<String>,
    /// Keywords this category knows how to edit, beyond the common ones.
    /// When empty, the keys of `default_data_schema` are used.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub supported_keywords: Vec<String>,
}

fn empty_object() -> Value {
    Value::Object(Map::new())
}

impl FormInput {
    /// Whether any rule of this descriptor matches the node.
    pub fn matches(&self, node: &Map<String, Value>, ui: Option<&Map<String, Value>>) -> bool {
        self.match_if.iter().any(|rule| rule.matches(node, ui))
    }

    /// Whether the category can edit `keyword` on its cards.
    pub fn supports_keyword(&self, keyword: &str) -> bool {
        if COMMON_KEYWORDS.contains(&keyword) {
            return true;
        }
        if self.supported_keywords.is_empty() {
            return self
                .default_data_schema
                .as_object()
                .is_some_and(|d| d.contains_key(keyword));
        }
        self.supported_keywords.iter().any(|k| k == keyword)
    }
}

/// Keywords every card can carry regardless of its category.
pub const COMMON_KEYWORDS: &[&str] = &[
    "title",
    "description",
    "default",
    "type",
    "$comment",
    "examples",
    "readOnly",
];

/// Keyword sets shared between several built-ins.
const STRING_KEYWORDS: &[&str] = &["minLength", "maxLength", "pattern", "format"];
const NUMBER_KEYWORDS: &[&str] = &[
    "minimum",
    "maximum",
    "exclusiveMinimum",
    "exclusiveMaximum",
    "multipleOf",
];
const ENUM_KEYWORDS: &[&str] = &["enum", "enumNames"];
const ARRAY_KEYWORDS: &[&str] = &["items", "minItems", "maxItems", "uniqueItems"];

/// Types an enum-backed card may hold.
const ENUM_TYPES: &[JsonType] = &[
    JsonType::String,
    JsonType::Number,
    JsonType::Integer,
    JsonType::Array,
    JsonType::Boolean,
    JsonType::Null,
];

fn input(
    display_name: &str,
    match_if: Vec<MatchRule>,
    data: Value,
    ui: Value,
    input_type: JsonType,
    card_body: &str,
    keywords: &[&[&str]],
) -> FormInput {
    FormInput {
        display_name: display_name.to_string(),
        match_if,
        default_data_schema: data,
        default_ui_schema: ui,
        input_type,
        card_body: Some(card_body.to_string()),
        modal_body: None,
        supported_keywords: keywords
            .iter()
            .flat_map(|set| set.iter().map(|k| k.to_string()))
            .collect(),
    }
}

/// The built-in descriptors, in [`CategoryId::BUILTIN`] order.
pub fn builtin_inputs() -> Vec<(CategoryId, FormInput)> {
    use JsonType as T;
    vec![
        (
            CategoryId::Time,
            input(
                "Time",
                vec![MatchRule::of_types(&[T::String]).format("date-time")],
                json!({ "type": "string", "format": "date-time" }),
                json!({}),
                T::String,
                "time",
                &[&["format"]],
            ),
        ),
        (
            CategoryId::Checkbox,
            input(
                "Checkbox",
                vec![MatchRule::of_types(&[T::Boolean])],
                json!({ "type": "boolean" }),
                json!({}),
                T::Boolean,
                "boolean",
                &[],
            ),
        ),
        (
            CategoryId::Ref,
            input(
                "Reference",
                vec![MatchRule::of_types(&[T::Null]).with_ref()],
                json!({}),
                json!({}),
                T::Null,
                "ref",
                &[&["$ref"]],
            ),
        ),
        (
            CategoryId::Radio,
            input(
                "Radio",
                vec![MatchRule::of_types(ENUM_TYPES).with_enum().widget("radio")],
                json!({ "type": "string", "enum": ["a", "b", "c"] }),
                json!({ "ui:widget": "radio" }),
                T::String,
                "enum",
                &[ENUM_KEYWORDS],
            ),
        ),
        (
            CategoryId::Dropdown,
            input(
                "Dropdown",
                vec![MatchRule::of_types(ENUM_TYPES).with_enum()],
                json!({ "type": "string", "enum": ["a", "b", "c"] }),
                json!({}),
                T::String,
                "enum",
                &[ENUM_KEYWORDS],
            ),
        ),
        (
            CategoryId::LongAnswer,
            input(
                "Long Answer",
                vec![MatchRule::of_types(&[T::String]).widget("textarea")],
                json!({ "type": "string" }),
                json!({ "ui:widget": "textarea" }),
                T::String,
                "string",
                &[STRING_KEYWORDS],
            ),
        ),
        (
            CategoryId::Password,
            input(
                "Password",
                vec![MatchRule::of_types(&[T::String]).widget("password")],
                json!({ "type": "string" }),
                json!({ "ui:widget": "password" }),
                T::String,
                "string",
                &[STRING_KEYWORDS],
            ),
        ),
        (
            CategoryId::ShortAnswer,
            input(
                "Short Answer",
                vec![MatchRule::of_types(&[T::String])],
                json!({ "type": "string" }),
                json!({}),
                T::String,
                "string",
                &[STRING_KEYWORDS],
            ),
        ),
        (
            CategoryId::Integer,
            input(
                "Integer",
                vec![MatchRule::of_types(&[T::Integer])],
                json!({ "type": "integer" }),
                json!({}),
                T::Integer,
                "number",
                &[NUMBER_KEYWORDS],
            ),
        ),
        (
            CategoryId::Number,
            input(
                "Number",
                vec![MatchRule::of_types(&[T::Number])],
                json!({ "type": "number" }),
                json!({}),
                T::Number,
                "number",
                &[NUMBER_KEYWORDS],
            ),
        ),
        (
            CategoryId::Array,
            input(
                "Multiple Choice",
                vec![MatchRule::of_types(&[T::Array])],
                json!({ "type": "array", "items": { "type": "string" } }),
                json!({}),
                T::Array,
                "array",
                &[ARRAY_KEYWORDS],
            ),
        ),
    ]
}

// ===========================================================================
// Tests
// ===========================================================================
