//! Shared schema utilities for path construction and ordered-map editing.
//!
//! Provides two concerns used across the walker and the editor:
//! 1. **Path escaping** (RFC 6901 rules) for property names containing `/` or `~`
//! 2. **Ordered-map helpers** that keep declaration order intact while
//!    renaming, removing and reading string lists out of schema nodes

use std::borrow::Cow;

use serde_json::{Map, Value};

// ---------------------------------------------------------------------------
// Path escaping (RFC 6901)
// ---------------------------------------------------------------------------

/// Escape a single path segment per RFC 6901.
///
/// - `~` → `~0`
/// - `/` → `~1`
///
/// Returns `Cow::Borrowed` when no escaping is needed (the common case).
pub fn escape_pointer_segment(segment: &str) -> Cow<'_, str> {
    if segment.contains('~') || segment.contains('/') {
        Cow::Owned(segment.replace('~', "~0").replace('/', "~1"))
    } else {
        Cow::Borrowed(segment)
    }
}

/// Unescape a single path segment per RFC 6901.
///
/// Order matters: unescape `~1` first to avoid double-unescaping.
pub fn unescape_pointer_segment(segment: &str) -> Cow<'_, str> {
    if segment.contains("~0") || segment.contains("~1") {
        Cow::Owned(segment.replace("~1", "/").replace("~0", "~"))
    } else {
        Cow::Borrowed(segment)
    }
}

/// Join property names into an element path string.
///
/// # Example
/// ```
/// use form_builder_core::build_path;
/// assert_eq!(build_path(&["address", "a/b"]), "address/a~1b");
/// assert_eq!(build_path::<&str>(&[]), "");
/// ```
pub fn build_path<S: AsRef<str>>(segments: &[S]) -> String {
    let mut path = String::new();
    for (i, segment) in segments.iter().enumerate() {
        if i > 0 {
            path.push('/');
        }
        path.push_str(&escape_pointer_segment(segment.as_ref()));
    }
    path
}

/// Split an element path string into decoded property names.
///
/// A leading `#` and a leading `/` are both accepted and ignored, so JSON
/// Pointer style input (`#/a/b`) and bare paths (`a/b`) decode the same way.
///
/// # Example
/// ```
/// use form_builder_core::split_path;
/// assert_eq!(split_path("address/a~1b"), vec!["address", "a/b"]);
/// assert_eq!(split_path("#/address"), vec!["address"]);
/// assert_eq!(split_path(""), Vec::<String>::new());
/// ```
pub fn split_path(path: &str) -> Vec<String> {
    let stripped = path.strip_prefix('#').unwrap_or(path);
    let stripped = stripped.strip_prefix('/').unwrap_or(stripped);
    if stripped.is_empty() {
        return Vec::new();
    }
    stripped
        .split('/')
        .map(|s| unescape_pointer_segment(s).into_owned())
        .collect()
}

// ---------------------------------------------------------------------------
// Ordered-map helpers
// ---------------------------------------------------------------------------

/// Read an array of strings, ignoring non-string entries.
pub(crate) fn string_list(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .map(|arr| {
            arr.iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// Convert a list of names back into a JSON array.
pub(crate) fn to_string_array(names: &[String]) -> Value {
    Value::Array(names.iter().cloned().map(Value::String).collect())
}

/// Get `map[key]` as an object, inserting `{}` first when it is absent or
/// not an object.
pub(crate) fn object_entry<'a>(map: &'a mut Map<String, Value>, key: &str) -> &'a mut Map<String, Value> {
    let slot = map
        .entry(key.to_string())
        .or_insert_with(|| Value::Object(Map::new()));
    if !slot.is_object() {
        *slot = Value::Object(Map::new());
    }
    match slot {
        Value::Object(obj) => obj,
        _ => unreachable!("slot was just replaced with an object"),
    }
}

/// Rename a key while keeping its position in the map.
///
/// Returns `false` (and leaves the map untouched) when `old` is absent.
pub(crate) fn rename_entry(map: &mut Map<String, Value>, old: &str, new: &str) -> bool {
    if !map.contains_key(old) {
        return false;
    }
    let entries = std::mem::take(map);
    for (key, value) in entries {
        if key == old {
            map.insert(new.to_string(), value);
        } else {
            map.insert(key, value);
        }
    }
    true
}

/// Remove a name from an array of strings stored at `map[key]`.
///
/// Drops the key entirely when `remove_if_empty` is set and nothing is left.
pub(crate) fn remove_from_list(
    map: &mut Map<String, Value>,
    key: &str,
    name: &str,
    remove_if_empty: bool,
) {
    let Some(Value::Array(items)) = map.get_mut(key) else {
        return;
    };
    items.retain(|v| v.as_str() != Some(name));
    if remove_if_empty && items.is_empty() {
        map.shift_remove(key);
    }
}

/// Replace every occurrence of `old` with `new` in an array of strings at `map[key]`.
pub(crate) fn rename_in_list(map: &mut Map<String, Value>, key: &str, old: &str, new: &str) {
    if let Some(Value::Array(items)) = map.get_mut(key) {
        for item in items.iter_mut() {
            if item.as_str() == Some(old) {
                *item = Value::String(new.to_string());
            }
        }
    }
}

// ===========================================================================
// Tests
// ===========================================================================
