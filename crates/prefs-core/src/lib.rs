//! # prefs-core
//!
//! Shared library for Prefs-Bridge containing the settings payload model,
//! the old/new value envelope, dotted-path translation helpers, and the
//! key-space accessor contract.
//!
//! This crate is used by both the GSettings-side bridge and the Orca profile
//! adapter. It has zero dependencies on OS APIs, configuration daemons, or
//! the filesystem.
//!
//! # Architecture overview (for beginners)
//!
//! Prefs-Bridge translates between an application-agnostic "personalization
//! settings" payload and a desktop configuration store. The payload nests
//! settings by application ID; each entry carries a schema reference and a
//! key → value mapping. Applying a payload records the prior value of every
//! written key, so a later session can restore the desktop to its original
//! state by replaying the recorded old values.
//!
//! This crate (`prefs-core`) is the shared foundation. It defines:
//!
//! - **`domain::payload`** – The payload envelope: [`SettingsPayload`],
//!   [`SettingBlock`], and [`BlockOptions`]. Insertion order is preserved
//!   end to end because write order within a block is part of the contract.
//!
//! - **`domain::delta`** – The [`ValueDelta`] `{oldValue, newValue}` pair
//!   recorded per written key, and the undo helper that turns a result
//!   mapping back into a replayable payload mapping.
//!
//! - **`domain::paths`** – Translation between flat dotted keys
//!   (`"voices.default.rate"`) and nested JSON objects, used by adapters
//!   that expand one flat mapping into store-specific structured state.
//!
//! - **`store`** – The [`SchemaStore`] trait: the injected boundary to the
//!   platform's configuration service (list keys for a schema, get and set
//!   a single key). The native binding itself lives outside this repo.

pub mod domain;
pub mod store;

// Re-export the most-used types at the crate root so callers can write
// `prefs_core::SettingsPayload` instead of the full module path.
pub use domain::delta::{undo_settings, ValueDelta};
pub use domain::payload::{BlockOptions, SettingBlock, SettingsMap, SettingsPayload};
pub use store::{SchemaStore, StoreError};
