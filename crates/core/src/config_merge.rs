//! Structural merge of partial JSON documents over a default shape, and the
//! flat dot-key representation used by the key-value translation store.
//!
//! The merge never treats an explicit empty string as "missing": when an
//! editor clears a field, the cleared value wins over the default.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

/// Separator between path segments in flattened keys.
pub const KEY_SEPARATOR: char = '.';

/// Recursively merge `partial` over `defaults`.
///
/// - Keys present only in `defaults` are kept.
/// - Where both sides hold an object, the merge recurses.
/// - Any other value in `partial` replaces the default wholesale, including
///   `""`, `0`, `false` and arrays (arrays are never merged element-wise).
/// - A `null` or non-object value in `partial` where `defaults` holds an
///   object leaves the default section in place so the shape stays intact.
pub fn merge_with_defaults(defaults: &Value, partial: &Value) -> Value {
    match (defaults, partial) {
        (Value::Object(base), Value::Object(overlay)) => Value::Object(merge_maps(base, overlay)),
        (Value::Object(_), _) => defaults.clone(),
        _ => partial.clone(),
    }
}

fn merge_maps(base: &Map<String, Value>, overlay: &Map<String, Value>) -> Map<String, Value> {
    let mut out = base.clone();
    for (key, value) in overlay {
        let merged = match base.get(key) {
            Some(default_value @ Value::Object(_)) => merge_with_defaults(default_value, value),
            _ => value.clone(),
        };
        out.insert(key.clone(), merged);
    }
    out
}

/// Flatten a nested document into `{ "a.b": "value", "list.0": "x" }`.
///
/// Scalars are stringified (`null` becomes `""`); array elements get their
/// index as a path segment. Empty objects and arrays produce no keys.
pub fn flatten(value: &Value) -> BTreeMap<String, String> {
    let mut out = BTreeMap::new();
    flatten_into(value, String::new(), &mut out);
    out
}

fn flatten_into(value: &Value, prefix: String, out: &mut BTreeMap<String, String>) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                flatten_into(child, join_key(&prefix, key), out);
            }
        }
        Value::Array(items) => {
            for (index, child) in items.iter().enumerate() {
                flatten_into(child, join_key(&prefix, &index.to_string()), out);
            }
        }
        scalar => {
            if !prefix.is_empty() {
                out.insert(prefix, scalar_to_string(scalar));
            }
        }
    }
}

fn join_key(prefix: &str, segment: &str) -> String {
    if prefix.is_empty() {
        segment.to_string()
    } else {
        format!("{prefix}{KEY_SEPARATOR}{segment}")
    }
}

fn scalar_to_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Rebuild a nested document from flattened keys.
///
/// A level becomes an array only when its keys are exactly `0..n` in
/// canonical decimal form; any other numeric keys (`"2024"`, `"01"`, huge
/// indices) stay object keys. The top level is always an object. All leaf
/// values come back as strings.
pub fn unflatten<'a, I>(entries: I) -> Value
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut root = Map::new();
    for (key, value) in entries {
        let segments: Vec<&str> = key.split(KEY_SEPARATOR).filter(|s| !s.is_empty()).collect();
        insert_path(&mut root, &segments, Value::String(value.to_string()));
    }
    Value::Object(
        root.into_iter()
            .map(|(key, child)| (key, restore_arrays(child)))
            .collect(),
    )
}

fn insert_path(map: &mut Map<String, Value>, segments: &[&str], leaf: Value) {
    match segments {
        [] => {}
        [last] => {
            map.insert((*last).to_string(), leaf);
        }
        [head, rest @ ..] => {
            let child = map
                .entry((*head).to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if !child.is_object() {
                *child = Value::Object(Map::new());
            }
            if let Value::Object(inner) = child {
                insert_path(inner, rest, leaf);
            }
        }
    }
}

/// Turn objects keyed `0..n` back into arrays, bottom-up.
fn restore_arrays(value: Value) -> Value {
    let Value::Object(map) = value else {
        return value;
    };
    let map: Map<String, Value> = map
        .into_iter()
        .map(|(key, child)| (key, restore_arrays(child)))
        .collect();

    let len = map.len();
    let dense = len > 0
        && map
            .keys()
            .all(|k| matches!(array_index(k), Some(index) if index < len));
    if !dense {
        return Value::Object(map);
    }

    // Keys are distinct and all below `len`, so they cover `0..len` exactly.
    let mut slots: Vec<(usize, Value)> = map
        .into_iter()
        .filter_map(|(key, child)| array_index(&key).map(|index| (index, child)))
        .collect();
    slots.sort_by_key(|(index, _)| *index);
    Value::Array(slots.into_iter().map(|(_, child)| child).collect())
}

/// Canonical decimal index: digits only, no sign, no leading zero.
fn array_index(segment: &str) -> Option<usize> {
    let canonical = !segment.is_empty()
        && segment.bytes().all(|b| b.is_ascii_digit())
        && (segment == "0" || !segment.starts_with('0'));
    if canonical {
        segment.parse().ok()
    } else {
        None
    }
}
