//! Host configuration schema.
//!
//! Mirrors the subset of the host server's global configuration that the
//! boards adapter reads. Field names follow the host's own `PascalCase`
//! layout so an exported `config.json` deserializes without mapping.
//! Every section defaults when absent; the host is frequently only
//! partially configured while it starts up.
//!
//! The host exports unset settings as `null`. A `null` anywhere inside a
//! section is treated as absent, so the field keeps its default.

use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::config::feature_flags::FeatureFlags;
use crate::config::plugin_settings::PluginSettings;

/// Read-only snapshot of the host configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct HostConfig {
    /// Site URL and other service-level settings.
    #[serde(deserialize_with = "null_as_default")]
    pub service_settings: ServiceSettings,

    /// Plugin directory and per-plugin settings.
    #[serde(deserialize_with = "null_as_default")]
    pub plugin_settings: PluginSettings,

    /// Open-ended feature flag record.
    #[serde(deserialize_with = "null_as_default")]
    pub feature_flags: FeatureFlags,

    #[serde(deserialize_with = "null_as_default")]
    pub data_retention_settings: DataRetentionSettings,

    #[serde(deserialize_with = "null_as_default")]
    pub team_settings: TeamSettings,

    #[serde(deserialize_with = "null_as_default")]
    pub privacy_settings: PrivacySettings,

    /// File storage backend.
    #[serde(deserialize_with = "null_as_default")]
    pub file_settings: FileSettings,

    /// SQL connection settings.
    #[serde(deserialize_with = "null_as_default")]
    pub sql_settings: SqlSettings,

    /// Diagnostics toggle lives here.
    #[serde(deserialize_with = "null_as_default")]
    pub log_settings: LogSettings,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct ServiceSettings {
    /// Public base URL of the host, without trailing slash.
    #[serde(rename = "SiteURL")]
    pub site_url: String,
}

/// Data retention settings.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct DataRetentionSettings {
    /// Whether boards deletion is enabled. `None` when never set.
    pub enable_boards_deletion: Option<bool>,

    /// Days after which boards content is removed.
    pub boards_retention_days: i64,
}

impl Default for DataRetentionSettings {
    fn default() -> Self {
        Self {
            enable_boards_deletion: None,
            boards_retention_days: 365,
        }
    }
}

/// Team display settings.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct TeamSettings {
    /// One of `username`, `nickname_full_name`, `full_name`.
    pub teammate_name_display: String,
}

impl Default for TeamSettings {
    fn default() -> Self {
        Self {
            teammate_name_display: "username".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct PrivacySettings {
    pub show_email_address: Option<bool>,
    pub show_full_name: Option<bool>,
}

/// File storage settings.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct FileSettings {
    /// Storage driver (`local` or `amazons3`).
    pub driver_name: String,

    /// Local storage directory.
    pub directory: String,

    /// Maximum upload size in bytes.
    pub max_file_size: i64,

    pub amazon_s3_access_key_id: String,
    pub amazon_s3_secret_access_key: String,
    pub amazon_s3_bucket: String,
    pub amazon_s3_path_prefix: String,
    pub amazon_s3_region: String,
    pub amazon_s3_endpoint: String,
    #[serde(rename = "AmazonS3SSL")]
    pub amazon_s3_ssl: bool,
    pub amazon_s3_sign_v2: bool,
    #[serde(rename = "AmazonS3SSE")]
    pub amazon_s3_sse: bool,
    pub amazon_s3_trace: bool,
}

impl Default for FileSettings {
    fn default() -> Self {
        Self {
            driver_name: "local".to_string(),
            directory: "./data/".to_string(),
            max_file_size: 100 * 1024 * 1024, // 100MB
            amazon_s3_access_key_id: String::new(),
            amazon_s3_secret_access_key: String::new(),
            amazon_s3_bucket: String::new(),
            amazon_s3_path_prefix: String::new(),
            amazon_s3_region: String::new(),
            amazon_s3_endpoint: "s3.amazonaws.com".to_string(),
            amazon_s3_ssl: true,
            amazon_s3_sign_v2: false,
            amazon_s3_sse: false,
            amazon_s3_trace: false,
        }
    }
}

/// SQL connection settings.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct SqlSettings {
    /// `postgres` or `mysql`.
    pub driver_name: String,

    /// Driver-specific connection string.
    pub data_source: String,
}

impl Default for SqlSettings {
    fn default() -> Self {
        Self {
            driver_name: "postgres".to_string(),
            data_source: String::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct LogSettings {
    /// Diagnostics and telemetry toggle. `None` when never set.
    pub enable_diagnostics: Option<bool>,
}

/// Deserialize a section, treating `null` (for the section or any key inside
/// it) as absent.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    match Option::<Value>::deserialize(deserializer)? {
        None => Ok(T::default()),
        Some(value) => serde_json::from_value(strip_nulls(value)).map_err(D::Error::custom),
    }
}

fn strip_nulls(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .filter(|(_, v)| !v.is_null())
                .map(|(k, v)| (k, strip_nulls(v)))
                .collect(),
        ),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::config::FlagValue;

    #[test]
    fn test_nulls_fall_back_to_defaults() {
        let host: HostConfig = serde_json::from_str(
            r#"{
                "ServiceSettings": null,
                "PluginSettings": {
                    "Directory": null,
                    "Plugins": { "focalboard": null, "other": { "Key": null, "Kept": 1 } }
                },
                "FeatureFlags": { "TestFeature": null, "TestBoolFeature": true },
                "DataRetentionSettings": { "EnableBoardsDeletion": null, "BoardsRetentionDays": null },
                "TeamSettings": { "TeammateNameDisplay": null },
                "FileSettings": { "DriverName": null, "MaxFileSize": null, "AmazonS3SSL": null },
                "SqlSettings": { "DriverName": "mysql", "DataSource": null },
                "LogSettings": { "EnableDiagnostics": null }
            }"#,
        )
        .unwrap();

        let defaults = HostConfig::default();
        assert_eq!(host.service_settings, defaults.service_settings);
        assert_eq!(host.plugin_settings.directory, "./plugins");
        assert!(!host.plugin_settings.plugins.contains_key("focalboard"));
        assert_eq!(host.plugin_settings.int_setting("other", "Kept"), Ok(1));
        assert!(host.plugin_settings.lookup("other", "Key").is_err());
        assert_eq!(host.feature_flags.len(), 1);
        assert_eq!(host.feature_flags.get("TestBoolFeature"), Some(&FlagValue::Bool(true)));
        assert_eq!(host.data_retention_settings, defaults.data_retention_settings);
        assert_eq!(host.team_settings.teammate_name_display, "username");
        assert_eq!(host.file_settings, defaults.file_settings);
        assert_eq!(host.sql_settings.driver_name, "mysql");
        assert_eq!(host.sql_settings.data_source, "");
        assert_eq!(host.log_settings.enable_diagnostics, None);
    }

    #[test]
    fn test_null_root_sections() {
        let host: HostConfig =
            serde_json::from_str(r#"{"PluginSettings": null, "FeatureFlags": null}"#).unwrap();
        assert_eq!(host, HostConfig::default());
    }
}
