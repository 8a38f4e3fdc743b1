//! Key-space accessor contract.
//!
//! The platform's configuration service (a GSettings/dconf daemon or any
//! store with schema-scoped keys) is an external collaborator. This module
//! defines the trait the transformer is written against; the native binding
//! implements it outside this repository, and tests inject doubles.
//!
//! Calls are synchronous and blocking, and every write is applied
//! immediately — there is no batching or transaction at this boundary.

use serde_json::Value;
use thiserror::Error;

/// Error type for key-space accessor operations.
///
/// Accessor errors propagate unmodified through the transformer: no retry,
/// no recovery, no partial-failure bookkeeping.
#[derive(Debug, Error, PartialEq)]
pub enum StoreError {
    /// The schema identifier is not installed in the underlying store.
    #[error("unknown schema: {0}")]
    UnknownSchema(String),

    /// The key does not belong to the schema's key-space.
    #[error("unknown key `{key}` in schema `{schema}`")]
    UnknownKey { schema: String, key: String },

    /// The underlying store reported a failure (unavailable, type mismatch, …).
    #[error("store backend error: {0}")]
    Backend(String),
}

/// Accessor over a schema-scoped configuration key-space.
///
/// Production implementations bind the platform's configuration service;
/// the in-memory store in `prefs-gsettings` and hand-rolled doubles cover
/// tests and embedders without a daemon.
pub trait SchemaStore: Send + Sync {
    /// Returns the set of valid keys for `schema_id`, in the store's order.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::UnknownSchema`] if the schema is not installed.
    fn list_keys(&self, schema_id: &str) -> Result<Vec<String>, StoreError>;

    /// Reads the current value of `key` within `schema_id`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::UnknownSchema`] or [`StoreError::UnknownKey`]
    /// when the target does not exist.
    fn get_value(&self, schema_id: &str, key: &str) -> Result<Value, StoreError>;

    /// Writes `value` to `key` within `schema_id`. The write is persisted by
    /// the underlying store immediately.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::UnknownSchema`] or [`StoreError::UnknownKey`]
    /// when the target does not exist, or [`StoreError::Backend`] when the
    /// store rejects the write.
    fn set_value(&self, schema_id: &str, key: &str, value: &Value) -> Result<(), StoreError>;
}
