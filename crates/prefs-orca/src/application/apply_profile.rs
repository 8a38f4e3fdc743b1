//! ApplyProfile use case: folds a flat settings payload into a named profile.
//!
//! Applying a block synthesizes a profile for the block's `options.user`:
//! the flat settings (dotted keys expanded to nested objects) become the
//! profile body, the profile is stored in the document's `profiles`
//! collection, and `general.startingProfile` is pointed at it. The result
//! block reports exactly two entries — `profiles` and
//! `general.startingProfile` — as `{oldValue, newValue}` envelopes.
//!
//! # Restore
//!
//! When the incoming settings carry an explicit `profiles` or
//! `general.startingProfile` key, that value wins over synthesis and is
//! written verbatim. Replaying the two recorded old values therefore
//! replaces the whole collection with its prior state: the synthesized
//! profile entry disappears entirely rather than being nulled out, and the
//! starting profile reverts. Any flat keys still present in a restore
//! payload are ignored — the explicit collection is the source of truth.

use std::sync::Arc;

use prefs_core::domain::paths::{expand_flat, flatten, get_path};
use prefs_core::{SettingBlock, SettingsMap, SettingsPayload, ValueDelta};
use serde_json::{json, Value};
use thiserror::Error;
use tracing::debug;

use crate::domain::document::UserSettingsDoc;
use crate::infrastructure::settings_file::{DocumentError, ProfileDocumentStore};

/// Settings key addressing the whole profile collection.
pub const PROFILES_KEY: &str = "profiles";

/// Settings key addressing the starting-profile entry.
pub const STARTING_PROFILE_KEY: &str = "general.startingProfile";

/// Error type for profile application.
#[derive(Debug, Error)]
pub enum ProfileError {
    /// A block carries no `options.user` to name the profile.
    #[error("setting block {index} for application `{app_id}` has no user reference")]
    MissingUser { app_id: String, index: usize },

    /// An explicit `profiles` value was not an object.
    #[error("`profiles` must be an object of named profiles")]
    InvalidProfiles,

    /// The document store failed; passed through unmodified.
    #[error(transparent)]
    Document(#[from] DocumentError),
}

/// The profile adapter use case.
pub struct ProfileAdapter {
    store: Arc<dyn ProfileDocumentStore>,
}

impl ProfileAdapter {
    /// Creates an adapter over the given document store.
    pub fn new(store: Arc<dyn ProfileDocumentStore>) -> Self {
        Self { store }
    }

    /// Applies every block of `payload` to the settings document.
    ///
    /// Each result block carries `profiles` and `general.startingProfile`
    /// deltas; replaying their old values reverses the application (see the
    /// module docs). The input payload is never mutated.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileError::MissingUser`] for a block without a user
    /// reference, [`ProfileError::InvalidProfiles`] for a malformed explicit
    /// collection, or the document store's error unmodified.
    pub fn set(&self, payload: &SettingsPayload) -> Result<SettingsPayload, ProfileError> {
        let mut result = SettingsPayload::new();
        for (app_id, blocks) in payload.apps() {
            let mut out = Vec::with_capacity(blocks.len());
            for (index, block) in blocks.iter().enumerate() {
                let user = user_ref(app_id, index, block)?;
                out.push(SettingBlock::result(
                    self.apply_block(user, block.settings.as_ref())?,
                ));
            }
            result.insert(app_id, out);
        }
        Ok(result)
    }

    /// Reads settings back out of the named profile.
    ///
    /// A block with `settings: None` returns the user's whole profile
    /// flattened to dotted keys; an explicit mapping is answered key by key
    /// via dotted-path lookup, dropping keys the profile does not hold. A
    /// missing profile yields an empty mapping.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileError::MissingUser`] for a block without a user
    /// reference, or the document store's error unmodified.
    pub fn get(&self, payload: &SettingsPayload) -> Result<SettingsPayload, ProfileError> {
        let mut result = SettingsPayload::new();
        for (app_id, blocks) in payload.apps() {
            let mut out = Vec::with_capacity(blocks.len());
            for (index, block) in blocks.iter().enumerate() {
                let user = user_ref(app_id, index, block)?;
                out.push(SettingBlock::result(
                    self.read_block(user, block.settings.as_ref())?,
                ));
            }
            result.insert(app_id, out);
        }
        Ok(result)
    }

    // ── Per-block application ─────────────────────────────────────────────────

    fn apply_block(
        &self,
        user: &str,
        settings: Option<&SettingsMap>,
    ) -> Result<SettingsMap, ProfileError> {
        let empty = SettingsMap::new();
        let requested = settings.unwrap_or(&empty);

        let mut doc = self.store.load()?;
        let old_profiles = Value::Object(doc.profiles.clone());
        let old_starting = doc.starting_profile();

        match requested.get(PROFILES_KEY) {
            // Explicit collection wins: written verbatim (restore path).
            Some(Value::Object(explicit)) => {
                doc.profiles = explicit.clone();
            }
            Some(Value::Null) => {
                doc.profiles = SettingsMap::new();
            }
            Some(_) => return Err(ProfileError::InvalidProfiles),
            // Synthesis path: the flat settings become the user's profile.
            None => {
                let flat: SettingsMap = requested
                    .iter()
                    .filter(|(key, _)| {
                        key.as_str() != PROFILES_KEY && key.as_str() != STARTING_PROFILE_KEY
                    })
                    .map(|(key, value)| (key.clone(), value.clone()))
                    .collect();
                let profile = expand_flat(&flat);
                debug!("synthesized profile `{user}` with {} settings", flat.len());
                doc.profiles
                    .insert(user.to_string(), Value::Object(profile));
            }
        }

        match requested.get(STARTING_PROFILE_KEY) {
            Some(explicit) => doc.set_starting_profile(explicit.clone()),
            None => doc.set_starting_profile(json!([user, user])),
        }

        self.store.save(&doc)?;

        let mut out = SettingsMap::new();
        out.insert(
            PROFILES_KEY.to_string(),
            ValueDelta::new(old_profiles, Value::Object(doc.profiles.clone())).into(),
        );
        out.insert(
            STARTING_PROFILE_KEY.to_string(),
            ValueDelta::new(old_starting, doc.starting_profile()).into(),
        );
        Ok(out)
    }

    fn read_block(
        &self,
        user: &str,
        settings: Option<&SettingsMap>,
    ) -> Result<SettingsMap, ProfileError> {
        let doc = self.store.load()?;
        let profile = doc.profile(user).and_then(Value::as_object);

        let out = match settings {
            None => profile.map(flatten).unwrap_or_default(),
            Some(requested) => {
                let mut out = SettingsMap::new();
                if let Some(profile) = profile {
                    for key in requested.keys() {
                        match get_path(profile, key) {
                            Some(value) => {
                                out.insert(key.clone(), value.clone());
                            }
                            None => {
                                debug!("dropping `{key}`: not present in profile `{user}`");
                            }
                        }
                    }
                } else {
                    debug!("profile `{user}` does not exist; returning empty settings");
                }
                out
            }
        };
        Ok(out)
    }
}

/// Resolves a block's user reference or reports which block lacks one.
fn user_ref<'a>(
    app_id: &str,
    index: usize,
    block: &'a SettingBlock,
) -> Result<&'a str, ProfileError> {
    block
        .options
        .user
        .as_deref()
        .ok_or_else(|| ProfileError::MissingUser {
            app_id: app_id.to_string(),
            index,
        })
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::settings_file::memory::MemoryDocumentStore;

    const ORCA: &str = "org.gnome.orca";

    fn map(pairs: &[(&str, Value)]) -> SettingsMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    fn payload_for(user: &str, settings: Option<SettingsMap>) -> SettingsPayload {
        let mut payload = SettingsPayload::new();
        payload.insert(ORCA, vec![SettingBlock::for_user(user, settings)]);
        payload
    }

    fn result_settings(result: &SettingsPayload) -> &SettingsMap {
        result.get(ORCA).unwrap()[0].settings.as_ref().unwrap()
    }

    // ── SET: profile synthesis ────────────────────────────────────────────────

    #[test]
    fn test_set_stores_profile_under_user_name() {
        // Arrange
        let store = Arc::new(MemoryDocumentStore::new());
        let adapter = ProfileAdapter::new(Arc::clone(&store) as Arc<dyn ProfileDocumentStore>);
        let payload = payload_for("test1", Some(map(&[("enableBraille", json!(true))])));

        // Act
        let result = adapter.set(&payload).unwrap();

        // Assert: the delta's newValue and the document both hold the profile
        let settings = result_settings(&result);
        let profiles = ValueDelta::from_value(&settings[PROFILES_KEY]).unwrap();
        assert_eq!(profiles.new_value["test1"]["enableBraille"], json!(true));
        assert_eq!(
            store.snapshot().profiles["test1"]["enableBraille"],
            json!(true)
        );
    }

    #[test]
    fn test_set_expands_dotted_keys_into_nested_profile() {
        let adapter = ProfileAdapter::new(Arc::new(MemoryDocumentStore::new()));
        let payload = payload_for(
            "test1",
            Some(map(&[
                ("voices.default.rate", json!(100)),
                ("voices.default.family", json!({ "locale": "es" })),
            ])),
        );

        let result = adapter.set(&payload).unwrap();

        let profiles = ValueDelta::from_value(&result_settings(&result)[PROFILES_KEY]).unwrap();
        assert_eq!(
            profiles.new_value["test1"]["voices"]["default"]["rate"],
            json!(100)
        );
        assert_eq!(
            profiles.new_value["test1"]["voices"]["default"]["family"]["locale"],
            json!("es")
        );
    }

    #[test]
    fn test_set_marks_user_as_starting_profile() {
        let adapter = ProfileAdapter::new(Arc::new(MemoryDocumentStore::new()));

        let result = adapter
            .set(&payload_for("test1", Some(SettingsMap::new())))
            .unwrap();

        let starting =
            ValueDelta::from_value(&result_settings(&result)[STARTING_PROFILE_KEY]).unwrap();
        assert_eq!(starting.new_value, json!(["test1", "test1"]));
        assert_eq!(starting.old_value, json!(["Default", "default"]));
    }

    #[test]
    fn test_set_old_values_capture_prior_document_state() {
        // Arrange: a document that already has a profile
        let mut doc = UserSettingsDoc::default();
        doc.profiles
            .insert("existing".to_string(), json!({ "enableBraille": false }));
        let store = Arc::new(MemoryDocumentStore::with_document(doc));
        let adapter = ProfileAdapter::new(Arc::clone(&store) as Arc<dyn ProfileDocumentStore>);

        // Act
        let result = adapter
            .set(&payload_for("test1", Some(SettingsMap::new())))
            .unwrap();

        // Assert: oldValue holds the pre-write collection, newValue adds test1
        let profiles = ValueDelta::from_value(&result_settings(&result)[PROFILES_KEY]).unwrap();
        assert!(profiles.old_value.get("test1").is_none());
        assert!(profiles.old_value.get("existing").is_some());
        assert!(profiles.new_value.get("test1").is_some());
        assert!(profiles.new_value.get("existing").is_some());
    }

    #[test]
    fn test_set_explicit_profiles_value_replaces_collection_verbatim() {
        // Arrange: document holding a synthesized profile
        let mut doc = UserSettingsDoc::default();
        doc.profiles.insert("test1".to_string(), json!({ "a": 1 }));
        let store = Arc::new(MemoryDocumentStore::with_document(doc));
        let adapter = ProfileAdapter::new(Arc::clone(&store) as Arc<dyn ProfileDocumentStore>);

        // Act: explicit (empty) collection wins over the flat keys beside it
        let payload = payload_for(
            "test1",
            Some(map(&[
                ("enableBraille", json!(true)),
                (PROFILES_KEY, json!({})),
            ])),
        );
        let result = adapter.set(&payload).unwrap();

        // Assert: the profile entry is gone, not merely nulled
        let profiles = ValueDelta::from_value(&result_settings(&result)[PROFILES_KEY]).unwrap();
        assert!(profiles.new_value.get("test1").is_none());
        assert!(store.snapshot().profiles.is_empty());
    }

    #[test]
    fn test_set_rejects_non_object_profiles_value() {
        let adapter = ProfileAdapter::new(Arc::new(MemoryDocumentStore::new()));
        let payload = payload_for("test1", Some(map(&[(PROFILES_KEY, json!(42))])));

        let err = adapter.set(&payload).unwrap_err();

        assert!(matches!(err, ProfileError::InvalidProfiles));
    }

    #[test]
    fn test_set_without_user_reference_errors() {
        let adapter = ProfileAdapter::new(Arc::new(MemoryDocumentStore::new()));
        let mut payload = SettingsPayload::new();
        payload.insert(
            ORCA,
            vec![SettingBlock {
                options: Default::default(),
                settings: Some(SettingsMap::new()),
            }],
        );

        let err = adapter.set(&payload).unwrap_err();

        assert!(matches!(
            err,
            ProfileError::MissingUser { index: 0, .. }
        ));
    }

    #[test]
    fn test_set_does_not_mutate_input_payload() {
        let adapter = ProfileAdapter::new(Arc::new(MemoryDocumentStore::new()));
        let payload = payload_for("test1", Some(map(&[("enableBraille", json!(true))])));
        let before = payload.clone();

        adapter.set(&payload).unwrap();

        assert_eq!(payload, before);
    }

    // ── GET ───────────────────────────────────────────────────────────────────

    #[test]
    fn test_get_reads_requested_keys_from_profile() {
        // Arrange
        let mut doc = UserSettingsDoc::default();
        doc.profiles.insert(
            "test1".to_string(),
            json!({ "enableBraille": true, "voices": { "default": { "rate": 100 } } }),
        );
        let adapter = ProfileAdapter::new(Arc::new(MemoryDocumentStore::with_document(doc)));
        let payload = payload_for(
            "test1",
            Some(map(&[
                ("enableBraille", json!(null)),
                ("voices.default.rate", json!(null)),
                ("not-a-setting", json!(null)),
            ])),
        );

        // Act
        let result = adapter.get(&payload).unwrap();

        // Assert: requested keys answered, unknown key dropped
        let settings = result_settings(&result);
        assert_eq!(settings["enableBraille"], json!(true));
        assert_eq!(settings["voices.default.rate"], json!(100));
        assert!(!settings.contains_key("not-a-setting"));
    }

    #[test]
    fn test_get_with_null_settings_flattens_whole_profile() {
        let mut doc = UserSettingsDoc::default();
        doc.profiles.insert(
            "test1".to_string(),
            json!({ "enableBraille": true, "voices": { "default": { "rate": 100 } } }),
        );
        let adapter = ProfileAdapter::new(Arc::new(MemoryDocumentStore::with_document(doc)));

        let result = adapter.get(&payload_for("test1", None)).unwrap();

        let settings = result_settings(&result);
        assert_eq!(settings["enableBraille"], json!(true));
        assert_eq!(settings["voices.default.rate"], json!(100));
    }

    #[test]
    fn test_get_missing_profile_yields_empty_settings() {
        let adapter = ProfileAdapter::new(Arc::new(MemoryDocumentStore::new()));

        let result = adapter.get(&payload_for("nobody", None)).unwrap();

        assert!(result_settings(&result).is_empty());
    }
}
