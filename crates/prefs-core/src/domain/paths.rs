//! Dotted-path translation between flat settings keys and nested objects.
//!
//! Profile-based stores keep structured documents, while the payload format
//! carries flat keys: `"voices.default.rate": 100` addresses the `rate`
//! field of the `default` voice. These helpers translate in both directions:
//!
//! ```text
//! expand_flat   {"voices.default.rate": 100}  →  {"voices":{"default":{"rate":100}}}
//! flatten       {"voices":{"default":{"rate":100}}}  →  {"voices.default.rate": 100}
//! ```
//!
//! A path segment that collides with an existing non-object value overwrites
//! it (last write wins). `flatten` recurses into every non-empty object, so
//! an object-valued leaf comes back as its individual fields; callers that
//! need an object kept whole look it up with [`get_path`] instead.

use serde_json::Value;

use super::payload::SettingsMap;

/// Inserts `value` at dotted `path`, creating intermediate objects as needed.
pub fn set_path(map: &mut SettingsMap, path: &str, value: Value) {
    match path.split_once('.') {
        None => {
            map.insert(path.to_string(), value);
        }
        Some((head, rest)) => {
            let entry = map
                .entry(head.to_string())
                .or_insert_with(|| Value::Object(SettingsMap::new()));
            if !entry.is_object() {
                // A scalar sat where a branch is needed; replace it.
                *entry = Value::Object(SettingsMap::new());
            }
            if let Value::Object(child) = entry {
                set_path(child, rest, value);
            }
        }
    }
}

/// Looks up the value at dotted `path`, or `None` if any segment is missing.
pub fn get_path<'a>(map: &'a SettingsMap, path: &str) -> Option<&'a Value> {
    match path.split_once('.') {
        None => map.get(path),
        Some((head, rest)) => get_path(map.get(head)?.as_object()?, rest),
    }
}

/// Expands a flat dotted-key mapping into a nested object tree.
///
/// Keys are processed in insertion order; later keys merge into branches
/// created by earlier ones.
pub fn expand_flat(flat: &SettingsMap) -> SettingsMap {
    let mut nested = SettingsMap::new();
    for (key, value) in flat {
        set_path(&mut nested, key, value.clone());
    }
    nested
}

/// Collapses a nested object tree into a flat dotted-key mapping.
///
/// Leaf values (scalars, arrays, empty objects) are kept whole.
pub fn flatten(nested: &SettingsMap) -> SettingsMap {
    let mut flat = SettingsMap::new();
    flatten_into(&mut flat, None, nested);
    flat
}

fn flatten_into(flat: &mut SettingsMap, prefix: Option<&str>, obj: &SettingsMap) {
    for (key, value) in obj {
        let path = match prefix {
            Some(p) => format!("{p}.{key}"),
            None => key.clone(),
        };
        match value {
            Value::Object(child) if !child.is_empty() => flatten_into(flat, Some(&path), child),
            _ => {
                flat.insert(path, value.clone());
            }
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
