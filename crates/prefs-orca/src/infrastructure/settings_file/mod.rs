//! Settings-document persistence for the Orca adapter.
//!
//! The adapter reads and writes the whole user-settings document through the
//! [`ProfileDocumentStore`] trait. The production implementation is the JSON
//! file store (Orca keeps its settings at
//! `~/.local/share/orca/user-settings.conf`); tests and embedders use the
//! in-memory store.

use std::path::PathBuf;

use thiserror::Error;

use crate::domain::document::UserSettingsDoc;

pub mod json;
pub mod memory;

/// Error type for settings-document operations.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// A file system I/O error occurred.
    #[error("I/O error accessing settings document at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The document content could not be parsed or serialized.
    #[error("malformed settings document: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Load/save boundary for the user-settings document.
///
/// `load` of a store with no document yet yields the default document; the
/// adapter then creates it on the first save.
pub trait ProfileDocumentStore: Send + Sync {
    /// Loads the current document.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::Io`] for filesystem failures other than a
    /// missing document, and [`DocumentError::Malformed`] for unparseable
    /// content.
    fn load(&self) -> Result<UserSettingsDoc, DocumentError>;

    /// Persists `doc`, replacing the stored document.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::Io`] or [`DocumentError::Malformed`] when
    /// writing or serializing fails.
    fn save(&self, doc: &UserSettingsDoc) -> Result<(), DocumentError>;
}
