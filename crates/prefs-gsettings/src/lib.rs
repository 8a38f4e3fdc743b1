//! prefs-gsettings library entry point.
//!
//! The GSettings side of Prefs-Bridge: [`SettingsBridge`] transforms a
//! settings payload against a schema-scoped key/value store injected as a
//! [`prefs_core::SchemaStore`]. The `infrastructure` module ships an
//! in-memory store for tests and embedders without a configuration daemon.

pub mod application;
pub mod infrastructure;

pub use application::transform_settings::{SettingsBridge, TransformError};
pub use infrastructure::store::memory::MemoryStore;
