//! JSON file-backed settings-document store.
//!
//! Reads and writes the user-settings document at a caller-supplied path.
//! A missing file loads as the default document (first run); saving creates
//! the parent directory if needed and writes pretty-printed JSON, which is
//! what the screen reader itself produces.

use std::path::{Path, PathBuf};

use tracing::debug;

use super::{DocumentError, ProfileDocumentStore};
use crate::domain::document::UserSettingsDoc;

/// File-backed implementation of [`ProfileDocumentStore`].
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Creates a store over the document at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the path of the backing document.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ProfileDocumentStore for JsonFileStore {
    fn load(&self) -> Result<UserSettingsDoc, DocumentError> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) => {
                let doc: UserSettingsDoc = serde_json::from_str(&content)?;
                Ok(doc)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(
                    "no settings document at {}, starting from defaults",
                    self.path.display()
                );
                Ok(UserSettingsDoc::default())
            }
            Err(source) => Err(DocumentError::Io {
                path: self.path.clone(),
                source,
            }),
        }
    }

    fn save(&self, doc: &UserSettingsDoc) -> Result<(), DocumentError> {
        // Ensure directory exists before writing.
        if let Some(dir) = self.path.parent() {
            std::fs::create_dir_all(dir).map_err(|source| DocumentError::Io {
                path: dir.to_path_buf(),
                source,
            })?;
        }

        let content = serde_json::to_string_pretty(doc)?;
        std::fs::write(&self.path, content).map_err(|source| DocumentError::Io {
            path: self.path.clone(),
            source,
        })
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
