//! Settings payload domain entities.
//!
//! The external payload format is JSON: a top-level object mapping
//! application IDs to lists of setting blocks. Each block carries an
//! `options` object (schema reference, profile user, arbitrary extra
//! metadata) and a `settings` mapping. A `settings` value of `null` asks a
//! read operation to fetch the entire key-space.
//!
//! ```json
//! {
//!   "org.gnome.desktop.a11y.magnifier": [{
//!     "options": { "schema": "org.gnome.desktop.a11y.magnifier" },
//!     "settings": { "mag-factor": 2.0, "lens-mode": true }
//!   }]
//! }
//! ```
//!
//! Two ordering guarantees are part of the contract and drive the choice of
//! map types:
//!
//! - application grouping and block order in a result equal the input's, so
//!   the top-level map is an [`IndexMap`];
//! - keys within a block are processed (and written) in insertion order, so
//!   the settings mapping is `serde_json::Map` with `preserve_order`.
//!
//! Result blocks drop the options object entirely: they serialize as
//! `{"settings": …}`. That is why `options` is skipped when empty.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Ordered key → value mapping used throughout the payload format.
///
/// `serde_json::Map` preserves insertion order because the workspace enables
/// the `preserve_order` feature.
pub type SettingsMap = serde_json::Map<String, Value>;

/// The full settings payload: application ID → ordered setting blocks.
///
/// Transformations never mutate a payload in place; they borrow it and build
/// an owned result with the same shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SettingsPayload(pub IndexMap<String, Vec<SettingBlock>>);

impl SettingsPayload {
    /// Creates an empty payload.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or replaces) the block list for `app_id`.
    pub fn insert(&mut self, app_id: impl Into<String>, blocks: Vec<SettingBlock>) {
        self.0.insert(app_id.into(), blocks);
    }

    /// Returns the block list for `app_id`, if present.
    pub fn get(&self, app_id: &str) -> Option<&[SettingBlock]> {
        self.0.get(app_id).map(Vec::as_slice)
    }

    /// Iterates applications in payload order.
    pub fn apps(&self) -> impl Iterator<Item = (&str, &[SettingBlock])> {
        self.0.iter().map(|(id, blocks)| (id.as_str(), blocks.as_slice()))
    }

    /// Number of applications in the payload.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the payload has no applications.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, Vec<SettingBlock>)> for SettingsPayload {
    fn from_iter<I: IntoIterator<Item = (String, Vec<SettingBlock>)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// One application's configuration entry: schema reference plus settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SettingBlock {
    /// Block metadata. Empty on result blocks and omitted from their JSON.
    #[serde(default, skip_serializing_if = "BlockOptions::is_empty")]
    pub options: BlockOptions,

    /// Key → value mapping, or `None` (JSON `null`) meaning "read everything".
    #[serde(default)]
    pub settings: Option<SettingsMap>,
}

impl SettingBlock {
    /// Builds an input block targeting `schema` with the given settings.
    pub fn for_schema(schema: impl Into<String>, settings: Option<SettingsMap>) -> Self {
        Self {
            options: BlockOptions {
                schema: Some(schema.into()),
                ..BlockOptions::default()
            },
            settings,
        }
    }

    /// Builds an input block targeting profile `user` with the given settings.
    pub fn for_user(user: impl Into<String>, settings: Option<SettingsMap>) -> Self {
        Self {
            options: BlockOptions {
                user: Some(user.into()),
                ..BlockOptions::default()
            },
            settings,
        }
    }

    /// Builds a result block: settings only, options dropped.
    pub fn result(settings: SettingsMap) -> Self {
        Self {
            options: BlockOptions::default(),
            settings: Some(settings),
        }
    }
}

/// Metadata attached to a setting block.
///
/// `schema` and `user` are the two references the bridge and the profile
/// adapter resolve; anything else a caller sends rides along in `extra` and
/// round-trips unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BlockOptions {
    /// Schema identifier naming the target key-space.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    /// Profile name for profile-based adapters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,

    /// Unrecognized metadata, preserved verbatim.
    #[serde(flatten)]
    pub extra: SettingsMap,
}

impl BlockOptions {
    /// Returns `true` if no metadata is present (result blocks).
    pub fn is_empty(&self) -> bool {
        self.schema.is_none() && self.user.is_none() && self.extra.is_empty()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
