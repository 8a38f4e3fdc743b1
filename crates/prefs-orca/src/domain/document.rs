//! The Orca user-settings document.
//!
//! Orca persists its configuration as one JSON document with a `general`
//! section (global options, including which profile to start with), a
//! `profiles` collection of named setting snapshots, and further sections
//! (`pronunciations`, `keybindings`, …) this adapter does not interpret —
//! those round-trip through `extra` untouched.
//!
//! ```json
//! {
//!   "general": { "startingProfile": ["Default", "default"] },
//!   "profiles": {
//!     "test1": { "enableBraille": true, "voices": { "default": { "rate": 100 } } }
//!   },
//!   "pronunciations": {},
//!   "keybindings": {}
//! }
//! ```
//!
//! `startingProfile` is a `[label, name]` pair; a fresh document starts on
//! the built-in default profile.

use prefs_core::SettingsMap;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Key of the starting-profile entry inside the `general` section.
pub const STARTING_PROFILE: &str = "startingProfile";

/// A parsed Orca user-settings document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSettingsDoc {
    /// Global options; `general.startingProfile` selects the active profile.
    #[serde(default)]
    pub general: SettingsMap,

    /// Named profile snapshots.
    #[serde(default)]
    pub profiles: SettingsMap,

    /// Sections the adapter does not interpret, preserved verbatim.
    #[serde(flatten)]
    pub extra: SettingsMap,
}

impl Default for UserSettingsDoc {
    fn default() -> Self {
        let mut general = SettingsMap::new();
        general.insert(
            STARTING_PROFILE.to_string(),
            json!(["Default", "default"]),
        );
        Self {
            general,
            profiles: SettingsMap::new(),
            extra: SettingsMap::new(),
        }
    }
}

impl UserSettingsDoc {
    /// Returns the current `[label, name]` starting-profile value.
    pub fn starting_profile(&self) -> Value {
        self.general
            .get(STARTING_PROFILE)
            .cloned()
            .unwrap_or(Value::Null)
    }

    /// Replaces the starting-profile value.
    pub fn set_starting_profile(&mut self, value: Value) {
        self.general.insert(STARTING_PROFILE.to_string(), value);
    }

    /// Returns the named profile, if present.
    pub fn profile(&self, name: &str) -> Option<&Value> {
        self.profiles.get(name)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
