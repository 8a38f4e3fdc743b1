//! TransformSettings use case: applies and reads settings payloads.
//!
//! This use case is the heart of the bridge. It walks a
//! [`SettingsPayload`] block by block, resolves each block's schema against
//! the injected [`SchemaStore`], and either reads current values (GET) or
//! writes new ones while recording the prior value of every key (SET).
//!
//! # Architecture
//!
//! The use case depends only on the `SchemaStore` trait and domain types
//! from `prefs-core`. The store implementation is injected at construction
//! time, making the use case fully unit-testable without a configuration
//! daemon.
//!
//! # Unknown keys
//!
//! Keys that do not belong to a block's key-space are dropped from the
//! output on both GET and SET (one uniform policy — every key in a result
//! mapping is guaranteed to be a member of its block's key-space). Dropping
//! is logged at debug level and is never an error; errors from the store
//! itself propagate unmodified.

use std::collections::HashSet;
use std::sync::Arc;

use prefs_core::{
    SchemaStore, SettingBlock, SettingsMap, SettingsPayload, StoreError, ValueDelta,
};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, trace};

/// Error type for payload transformation.
#[derive(Debug, Error, PartialEq)]
pub enum TransformError {
    /// A block carries no `options.schema` reference to resolve.
    #[error("setting block {index} for application `{app_id}` has no schema reference")]
    MissingSchemaRef { app_id: String, index: usize },

    /// The underlying store failed; passed through unmodified.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// The settings bridge use case.
///
/// Transforms payloads between the application-agnostic settings format and
/// the native key space of the injected store, and exposes direct single-key
/// passthrough for callers that bypass the payload envelope.
pub struct SettingsBridge {
    store: Arc<dyn SchemaStore>,
}

impl SettingsBridge {
    /// Creates a bridge over the given store.
    pub fn new(store: Arc<dyn SchemaStore>) -> Self {
        Self { store }
    }

    /// Reads current values for every block of `payload`.
    ///
    /// A block with `settings: None` reads its schema's entire key-space in
    /// the store's reported order; a block with an explicit mapping reads
    /// only the listed keys, dropping those outside the key-space. The input
    /// payload is never mutated; the result preserves application grouping
    /// and block order.
    ///
    /// # Errors
    ///
    /// Returns [`TransformError::MissingSchemaRef`] for a block without a
    /// schema reference, or the store's error unmodified.
    pub fn get(&self, payload: &SettingsPayload) -> Result<SettingsPayload, TransformError> {
        let mut result = SettingsPayload::new();
        for (app_id, blocks) in payload.apps() {
            let mut out = Vec::with_capacity(blocks.len());
            for (index, block) in blocks.iter().enumerate() {
                let schema = schema_ref(app_id, index, block)?;
                out.push(SettingBlock::result(
                    self.read_block(schema, block.settings.as_ref())?,
                ));
            }
            result.insert(app_id, out);
        }
        Ok(result)
    }

    /// Applies every block of `payload`, recording prior values.
    ///
    /// Each surviving key's entry becomes an `{"oldValue", "newValue"}`
    /// envelope; replaying a SET with the old values (see
    /// [`prefs_core::undo_settings`]) restores the store. Keys are written
    /// in insertion order. There is no atomicity: a store failure mid-block
    /// propagates immediately and earlier writes stay applied.
    ///
    /// # Errors
    ///
    /// Returns [`TransformError::MissingSchemaRef`] for a block without a
    /// schema reference, or the store's error unmodified.
    pub fn set(&self, payload: &SettingsPayload) -> Result<SettingsPayload, TransformError> {
        let mut result = SettingsPayload::new();
        for (app_id, blocks) in payload.apps() {
            let mut out = Vec::with_capacity(blocks.len());
            for (index, block) in blocks.iter().enumerate() {
                let schema = schema_ref(app_id, index, block)?;
                out.push(SettingBlock::result(
                    self.write_block(schema, block.settings.as_ref())?,
                ));
            }
            result.insert(app_id, out);
        }
        Ok(result)
    }

    /// Reads one key directly, bypassing the payload envelope.
    ///
    /// # Errors
    ///
    /// Returns the store's error unmodified.
    pub fn get_single(&self, schema_id: &str, key: &str) -> Result<Value, StoreError> {
        self.store.get_value(schema_id, key)
    }

    /// Writes one key directly, bypassing the payload envelope.
    ///
    /// # Errors
    ///
    /// Returns the store's error unmodified.
    pub fn set_single(&self, schema_id: &str, key: &str, value: &Value) -> Result<(), StoreError> {
        self.store.set_value(schema_id, key, value)
    }

    // ── Per-block transformation ──────────────────────────────────────────────

    fn read_block(
        &self,
        schema: &str,
        settings: Option<&SettingsMap>,
    ) -> Result<SettingsMap, TransformError> {
        let keys = self.store.list_keys(schema)?;
        let mut out = SettingsMap::new();

        match settings {
            // "Read everything": the whole key-space, store order.
            None => {
                trace!("reading full key-space of `{schema}` ({} keys)", keys.len());
                for key in &keys {
                    out.insert(key.clone(), self.store.get_value(schema, key)?);
                }
            }
            // Read only the listed keys, in their insertion order.
            Some(requested) => {
                let key_space: HashSet<&str> = keys.iter().map(String::as_str).collect();
                for key in requested.keys() {
                    if !key_space.contains(key.as_str()) {
                        debug!("dropping `{key}`: not in key-space of `{schema}`");
                        continue;
                    }
                    out.insert(key.clone(), self.store.get_value(schema, key)?);
                }
            }
        }
        Ok(out)
    }

    fn write_block(
        &self,
        schema: &str,
        settings: Option<&SettingsMap>,
    ) -> Result<SettingsMap, TransformError> {
        let keys = self.store.list_keys(schema)?;
        let key_space: HashSet<&str> = keys.iter().map(String::as_str).collect();
        let mut out = SettingsMap::new();

        // A SET block with null settings has nothing to write.
        let Some(requested) = settings else {
            return Ok(out);
        };

        trace!("writing {} keys to `{schema}`", requested.len());
        for (key, new_value) in requested {
            if !key_space.contains(key.as_str()) {
                debug!("dropping `{key}`: not in key-space of `{schema}`");
                continue;
            }
            let old_value = self.store.get_value(schema, key)?;
            self.store.set_value(schema, key, new_value)?;
            out.insert(
                key.clone(),
                ValueDelta::new(old_value, new_value.clone()).into(),
            );
        }
        Ok(out)
    }
}

/// Resolves a block's schema reference or reports which block lacks one.
fn schema_ref<'a>(
    app_id: &str,
    index: usize,
    block: &'a SettingBlock,
) -> Result<&'a str, TransformError> {
    block
        .options
        .schema
        .as_deref()
        .ok_or_else(|| TransformError::MissingSchemaRef {
            app_id: app_id.to_string(),
            index,
        })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
