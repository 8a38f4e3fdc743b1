//! prefs-orca library entry point.
//!
//! The Orca screen reader does not read GSettings; it keeps a JSON
//! user-settings document with named profiles. This crate adapts the flat
//! settings payload format onto that document: applying a payload
//! synthesizes a profile for the payload's user, marks it as the starting
//! profile, and reports both changes in the same `{oldValue, newValue}`
//! envelope the GSettings bridge uses — so restoring the old values on
//! logout removes the profile again.

pub mod application;
pub mod domain;
pub mod infrastructure;

pub use application::apply_profile::{ProfileAdapter, ProfileError};
pub use domain::document::UserSettingsDoc;
pub use infrastructure::settings_file::{json::JsonFileStore, memory::MemoryDocumentStore};
pub use infrastructure::settings_file::{DocumentError, ProfileDocumentStore};
