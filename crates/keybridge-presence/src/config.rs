use serde::{Deserialize, Serialize};

use crate::PresenceError;

/// Per-rule settings, as handed over by the host from its plugin
/// configuration map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PluginSettings {
    /// When `false` the rule never touches a stanza.
    pub enabled: bool,
}

impl Default for PluginSettings {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl PluginSettings {
    /// Read settings from the host's JSON settings map.
    ///
    /// Unknown keys belong to other rules and are ignored; missing keys take
    /// their defaults.
    pub fn from_json(value: &serde_json::Value) -> Result<Self, PresenceError> {
        Self::deserialize(value).map_err(|e| PresenceError::Config(e.to_string()))
    }

    pub fn from_json_str(input: &str) -> Result<Self, PresenceError> {
        serde_json::from_str(input).map_err(|e| PresenceError::Config(e.to_string()))
    }
}
