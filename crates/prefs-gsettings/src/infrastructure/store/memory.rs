//! In-memory schema store.
//!
//! Keeps schema → key → value state behind a mutex so it can be shared as
//! `Arc<dyn SchemaStore>` like any production accessor. Key order within a
//! schema is the seeding order, which makes "read the whole key-space"
//! results deterministic in tests.
//!
//! Writes are only accepted for keys the schema was seeded with — a store
//! with schema-scoped key-spaces rejects keys outside the schema, and this
//! double mirrors that.

use std::sync::{Mutex, MutexGuard};

use indexmap::IndexMap;
use prefs_core::{SchemaStore, StoreError};
use serde_json::Value;

type SchemaEntries = IndexMap<String, Value>;

/// Mutex-guarded in-memory implementation of [`SchemaStore`].
#[derive(Debug, Default)]
pub struct MemoryStore {
    schemas: Mutex<IndexMap<String, SchemaEntries>>,
}

impl MemoryStore {
    /// Creates an empty store with no schemas installed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a schema with its key-space and initial values, consuming and
    /// returning the store for chained construction.
    pub fn with_schema(self, schema_id: &str, entries: &[(&str, Value)]) -> Self {
        self.insert_schema(schema_id, entries);
        self
    }

    /// Seeds (or replaces) a schema with its key-space and initial values.
    pub fn insert_schema(&self, schema_id: &str, entries: &[(&str, Value)]) {
        let entries: SchemaEntries = entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect();
        self.lock().insert(schema_id.to_string(), entries);
    }

    /// Returns a copy of a schema's current key → value state.
    pub fn snapshot(&self, schema_id: &str) -> Option<SchemaEntries> {
        self.lock().get(schema_id).cloned()
    }

    fn lock(&self) -> MutexGuard<'_, IndexMap<String, SchemaEntries>> {
        // A panicked holder cannot leave the map partially updated; keep going.
        self.schemas
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl SchemaStore for MemoryStore {
    fn list_keys(&self, schema_id: &str) -> Result<Vec<String>, StoreError> {
        let schemas = self.lock();
        let entries = schemas
            .get(schema_id)
            .ok_or_else(|| StoreError::UnknownSchema(schema_id.to_string()))?;
        Ok(entries.keys().cloned().collect())
    }

    fn get_value(&self, schema_id: &str, key: &str) -> Result<Value, StoreError> {
        let schemas = self.lock();
        let entries = schemas
            .get(schema_id)
            .ok_or_else(|| StoreError::UnknownSchema(schema_id.to_string()))?;
        entries
            .get(key)
            .cloned()
            .ok_or_else(|| StoreError::UnknownKey {
                schema: schema_id.to_string(),
                key: key.to_string(),
            })
    }

    fn set_value(&self, schema_id: &str, key: &str, value: &Value) -> Result<(), StoreError> {
        let mut schemas = self.lock();
        let entries = schemas
            .get_mut(schema_id)
            .ok_or_else(|| StoreError::UnknownSchema(schema_id.to_string()))?;
        let slot = entries.get_mut(key).ok_or_else(|| StoreError::UnknownKey {
            schema: schema_id.to_string(),
            key: key.to_string(),
        })?;
        *slot = value.clone();
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_list_keys_returns_seeding_order() {
        let store = MemoryStore::new().with_schema(
            "org.example",
            &[("charlie", json!(1)), ("alpha", json!(2)), ("bravo", json!(3))],
        );

        let keys = store.list_keys("org.example").unwrap();

        assert_eq!(keys, vec!["charlie", "alpha", "bravo"]);
    }

    #[test]
    fn test_list_keys_unknown_schema_errors() {
        let store = MemoryStore::new();

        let err = store.list_keys("org.example").unwrap_err();

        assert_eq!(err, StoreError::UnknownSchema("org.example".to_string()));
    }

    #[test]
    fn test_get_value_returns_seeded_value() {
        let store = MemoryStore::new().with_schema("s", &[("k", json!("v"))]);

        assert_eq!(store.get_value("s", "k"), Ok(json!("v")));
    }

    #[test]
    fn test_set_value_overwrites_and_persists() {
        let store = MemoryStore::new().with_schema("s", &[("k", json!(1))]);

        store.set_value("s", "k", &json!(2)).unwrap();

        assert_eq!(store.get_value("s", "k"), Ok(json!(2)));
    }

    #[test]
    fn test_set_value_rejects_key_outside_schema() {
        let store = MemoryStore::new().with_schema("s", &[("k", json!(1))]);

        let err = store.set_value("s", "other", &json!(2)).unwrap_err();

        assert_eq!(
            err,
            StoreError::UnknownKey {
                schema: "s".to_string(),
                key: "other".to_string(),
            }
        );
    }

    #[test]
    fn test_snapshot_reflects_writes() {
        let store = MemoryStore::new().with_schema("s", &[("k", json!(1))]);
        store.set_value("s", "k", &json!(9)).unwrap();

        let snap = store.snapshot("s").unwrap();

        assert_eq!(snap["k"], json!(9));
    }
}
