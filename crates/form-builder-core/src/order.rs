//! Effective display order of an object's children.
//!
//! `ui:order` is the only source of display order. Declaration order of
//! `properties` is used when `ui:order` is absent or empty. Stale names in
//! `ui:order` are skipped, a `"*"` wildcard stands for every property not
//! listed explicitly, and without a wildcard unlisted properties are appended
//! in declaration order.

use serde_json::{Map, Value};

use crate::schema_utils::{string_list, to_string_array};

pub const UI_ORDER: &str = "ui:order";
const WILDCARD: &str = "*";

/// Property names of `schema` in display order.
pub fn effective_order(schema: &Map<String, Value>, ui: Option<&Map<String, Value>>) -> Vec<String> {
    let declared: Vec<&String> = schema
        .get("properties")
        .and_then(Value::as_object)
        .map(|props| props.keys().collect())
        .unwrap_or_default();

    let listed = string_list(ui.and_then(|u| u.get(UI_ORDER)));
    if listed.is_empty() {
        return declared.into_iter().cloned().collect();
    }

    let mut explicit: Vec<String> = Vec::with_capacity(declared.len());
    let mut wildcard_at = None;
    for name in listed {
        if name == WILDCARD {
            wildcard_at.get_or_insert(explicit.len());
        } else if declared.contains(&&name) && !explicit.contains(&name) {
            explicit.push(name);
        }
    }

    let rest: Vec<String> = declared
        .into_iter()
        .filter(|name| !explicit.contains(*name))
        .cloned()
        .collect();
    let at = wildcard_at.unwrap_or(explicit.len());
    explicit.splice(at..at, rest);
    explicit
}

/// Store an explicit order in a UI node.
pub(crate) fn write_order(ui: &mut Map<String, Value>, order: &[String]) {
    ui.insert(UI_ORDER.to_string(), to_string_array(order));
}
