//! The old/new value envelope recorded for every written key.
//!
//! A write operation replaces each surviving entry of a settings mapping
//! with `{"oldValue": …, "newValue": …}`. Keeping the prior value makes
//! every write reversible: replaying a write with each `newValue` swapped
//! for its paired `oldValue` returns the store to its original state (the
//! logout-restore flow).

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::payload::SettingsMap;

/// Prior and applied value for a single written key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueDelta {
    /// The value the store reported immediately before the write.
    #[serde(rename = "oldValue")]
    pub old_value: Value,
    /// The value that was written.
    #[serde(rename = "newValue")]
    pub new_value: Value,
}

impl ValueDelta {
    /// Creates a delta from the value read before the write and the value written.
    pub fn new(old_value: Value, new_value: Value) -> Self {
        Self {
            old_value,
            new_value,
        }
    }

    /// Parses a delta back out of a result-mapping entry.
    ///
    /// Returns `None` if `value` is not a `{"oldValue", "newValue"}` object.
    pub fn from_value(value: &Value) -> Option<Self> {
        let obj = value.as_object()?;
        Some(Self {
            old_value: obj.get("oldValue")?.clone(),
            new_value: obj.get("newValue")?.clone(),
        })
    }
}

impl From<ValueDelta> for Value {
    fn from(delta: ValueDelta) -> Self {
        let mut obj = SettingsMap::new();
        obj.insert("oldValue".to_string(), delta.old_value);
        obj.insert("newValue".to_string(), delta.new_value);
        Value::Object(obj)
    }
}

/// Converts a write-result mapping back into a replayable settings mapping.
///
/// Every `{"oldValue", "newValue"}` entry collapses to its `oldValue`;
/// entries that are not delta envelopes pass through unchanged. Feeding the
/// returned mapping back into a write restores the state recorded before the
/// original write.
pub fn undo_settings(result: &SettingsMap) -> SettingsMap {
    result
        .iter()
        .map(|(key, value)| {
            let restored = match ValueDelta::from_value(value) {
                Some(delta) => delta.old_value,
                None => value.clone(),
            };
            (key.clone(), restored)
        })
        .collect()
}

// ── Tests ─────────────────────────────────────────────────────────────────────
