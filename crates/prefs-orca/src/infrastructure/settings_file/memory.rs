//! In-memory settings-document store for tests and embedders.

use std::sync::{Mutex, MutexGuard};

use super::{DocumentError, ProfileDocumentStore};
use crate::domain::document::UserSettingsDoc;

/// Mutex-held document implementing [`ProfileDocumentStore`].
#[derive(Debug, Default)]
pub struct MemoryDocumentStore {
    doc: Mutex<UserSettingsDoc>,
}

impl MemoryDocumentStore {
    /// Creates a store holding the default document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store holding `doc`.
    pub fn with_document(doc: UserSettingsDoc) -> Self {
        Self {
            doc: Mutex::new(doc),
        }
    }

    /// Returns a copy of the current document.
    pub fn snapshot(&self) -> UserSettingsDoc {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, UserSettingsDoc> {
        self.doc
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl ProfileDocumentStore for MemoryDocumentStore {
    fn load(&self) -> Result<UserSettingsDoc, DocumentError> {
        Ok(self.lock().clone())
    }

    fn save(&self, doc: &UserSettingsDoc) -> Result<(), DocumentError> {
        *self.lock() = doc.clone();
        Ok(())
    }
}
