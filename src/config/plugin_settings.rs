//! Plugin settings and typed lookups into them.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Why a plugin setting could not be read as the requested type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettingError {
    #[error("no settings for plugin `{0}`")]
    MissingPlugin(String),

    #[error("setting `{key}` not present for plugin `{plugin}`")]
    MissingKey { plugin: String, key: String },

    #[error("setting `{key}` has type {found}, expected {expected}")]
    TypeMismatch {
        key: String,
        expected: &'static str,
        found: &'static str,
    },
}

/// Plugin directory plus free-form per-plugin settings.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct PluginSettings {
    /// Directory plugins are unpacked into.
    pub directory: String,

    /// plugin-id → setting-name → value.
    pub plugins: BTreeMap<String, BTreeMap<String, Value>>,
}

impl Default for PluginSettings {
    fn default() -> Self {
        Self {
            directory: "./plugins".to_string(),
            plugins: BTreeMap::new(),
        }
    }
}

impl PluginSettings {
    /// Insert or replace a single setting for a plugin.
    pub fn set(&mut self, plugin_id: &str, key: &str, value: impl Into<Value>) {
        self.plugins
            .entry(plugin_id.to_string())
            .or_default()
            .insert(key.to_string(), value.into());
    }

    /// Raw lookup of a setting. A JSON `null` counts as missing.
    pub fn lookup(&self, plugin_id: &str, key: &str) -> Result<&Value, SettingError> {
        let settings = self
            .plugins
            .get(plugin_id)
            .ok_or_else(|| SettingError::MissingPlugin(plugin_id.to_string()))?;

        match settings.get(key) {
            Some(Value::Null) | None => Err(SettingError::MissingKey {
                plugin: plugin_id.to_string(),
                key: key.to_string(),
            }),
            Some(value) => Ok(value),
        }
    }

    /// Boolean setting. Only a real boolean is accepted.
    pub fn bool_setting(&self, plugin_id: &str, key: &str) -> Result<bool, SettingError> {
        let value = self.lookup(plugin_id, key)?;
        value.as_bool().ok_or_else(|| SettingError::TypeMismatch {
            key: key.to_string(),
            expected: "boolean",
            found: type_name(value),
        })
    }

    /// Integer setting. Numbers are rounded to the nearest integer since the
    /// host stores numeric settings as floats.
    pub fn int_setting(&self, plugin_id: &str, key: &str) -> Result<i64, SettingError> {
        let value = self.lookup(plugin_id, key)?;
        value
            .as_f64()
            .map(|n| n.round() as i64)
            .ok_or_else(|| SettingError::TypeMismatch {
                key: key.to_string(),
                expected: "number",
                found: type_name(value),
            })
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn settings() -> PluginSettings {
        let mut settings = PluginSettings::default();
        settings.set("focalboard", "Flag", true);
        settings.set("focalboard", "Text", "true");
        settings.set("focalboard", "Freq", 59.6);
        settings.set("focalboard", "Whole", 30);
        settings.set("focalboard", "Nothing", Value::Null);
        settings
    }

    #[test]
    fn test_bool_setting() {
        assert_eq!(settings().bool_setting("focalboard", "Flag"), Ok(true));
    }

    #[test]
    fn test_missing_plugin_and_key() {
        let s = settings();
        assert_eq!(
            s.bool_setting("other", "Flag"),
            Err(SettingError::MissingPlugin("other".into()))
        );
        assert!(matches!(
            s.bool_setting("focalboard", "Absent"),
            Err(SettingError::MissingKey { .. })
        ));
        assert!(matches!(
            s.lookup("focalboard", "Nothing"),
            Err(SettingError::MissingKey { .. })
        ));
    }

    #[test]
    fn test_type_mismatch() {
        let err = settings().bool_setting("focalboard", "Text").unwrap_err();
        assert_eq!(
            err,
            SettingError::TypeMismatch {
                key: "Text".into(),
                expected: "boolean",
                found: "string",
            }
        );
        assert!(settings().int_setting("focalboard", "Flag").is_err());
    }

    #[test]
    fn test_int_setting_rounds() {
        let s = settings();
        assert_eq!(s.int_setting("focalboard", "Freq"), Ok(60));
        assert_eq!(s.int_setting("focalboard", "Whole"), Ok(30));
    }

    #[test]
    fn test_deserialize_nested_values() {
        let s: PluginSettings = serde_json::from_value(json!({
            "Directory": "/opt/plugins",
            "Plugins": { "focalboard": { "EnablePublicSharedBoards": true } }
        }))
        .unwrap();
        assert_eq!(s.directory, "/opt/plugins");
        assert_eq!(s.bool_setting("focalboard", "EnablePublicSharedBoards"), Ok(true));
    }
}
