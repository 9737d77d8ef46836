//! Host configuration → boards configuration.
//!
//! Translation is total: every missing or malformed input resolves to a
//! default. The host calls this while it is still starting up, so partially
//! populated snapshots are expected.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::boards::{
    AmazonS3Config, BoardsConfig, NOTIFY_FREQ_BOARD_SECONDS_KEY, NOTIFY_FREQ_CARD_SECONDS_KEY,
    PLUGIN_ID, SHARED_BOARDS_NAME,
};
use crate::config::{FeatureFlags, FileSettings, FlagValue, HostConfig, SettingError};

/// Separator for compound flag values, e.g. `"hello_world-myTest"`.
const FLAG_SEPARATOR: char = '-';

const DEFAULT_NOTIFY_FREQ_CARD_SECONDS: i64 = 120;
const DEFAULT_NOTIFY_FREQ_BOARD_SECONDS: i64 = 86_400;

const SESSION_EXPIRE_TIME_SECS: i64 = 60 * 60 * 24 * 30;
const SESSION_REFRESH_TIME_SECS: i64 = 60 * 60 * 5;

/// Auxiliary translation inputs that do not come from the host config.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslateParams {
    /// Replaces the file storage directory when non-empty.
    pub override_directory: String,

    /// Passed through verbatim as the telemetry id.
    pub telemetry_id: String,
}

impl TranslateParams {
    pub fn translate(&self, host: &HostConfig) -> BoardsConfig {
        create_boards_config(host, &self.override_directory, &self.telemetry_id)
    }
}

/// Build the boards configuration from a host snapshot.
pub fn create_boards_config(
    host: &HostConfig,
    override_directory: &str,
    telemetry_id: &str,
) -> BoardsConfig {
    let plugins = &host.plugin_settings;

    let enable_public_shared_boards = plugins
        .bool_setting(PLUGIN_ID, SHARED_BOARDS_NAME)
        .unwrap_or_else(|e| setting_default(e, false));

    let notify_freq_card_seconds = plugins
        .int_setting(PLUGIN_ID, NOTIFY_FREQ_CARD_SECONDS_KEY)
        .unwrap_or_else(|e| setting_default(e, DEFAULT_NOTIFY_FREQ_CARD_SECONDS));

    let notify_freq_board_seconds = plugins
        .int_setting(PLUGIN_ID, NOTIFY_FREQ_BOARD_SECONDS_KEY)
        .unwrap_or_else(|e| setting_default(e, DEFAULT_NOTIFY_FREQ_BOARD_SECONDS));

    let files_path = if override_directory.is_empty() {
        host.file_settings.directory.clone()
    } else {
        override_directory.to_string()
    };

    let web_path = Path::new(&plugins.directory)
        .join(PLUGIN_ID)
        .join("pack")
        .to_string_lossy()
        .into_owned();

    BoardsConfig {
        // A trailing slash on the site URL would otherwise produce `//plugins`.
        server_root: format!(
            "{}/plugins/{}",
            host.service_settings.site_url.trim_end_matches('/'),
            PLUGIN_ID
        ),
        port: -1,
        db_type: host.sql_settings.driver_name.clone(),
        db_config_string: host.sql_settings.data_source.clone(),
        db_table_prefix: "focalboard_".to_string(),
        use_ssl: false,
        secure_cookie: true,
        web_path,
        files_driver: host.file_settings.driver_name.clone(),
        files_path,
        files_s3_config: s3_config(&host.file_settings),
        max_file_size: host.file_settings.max_file_size,
        telemetry: host.log_settings.enable_diagnostics.unwrap_or(false),
        telemetry_id: telemetry_id.to_string(),
        webhook_update: Vec::new(),
        session_expire_time: SESSION_EXPIRE_TIME_SECS,
        session_refresh_time: SESSION_REFRESH_TIME_SECS,
        local_only: false,
        enable_local_mode: false,
        local_mode_socket_location: String::new(),
        auth_mode: "mattermost".to_string(),
        enable_public_shared_boards,
        feature_flags: parse_feature_flags(&host.feature_flags),
        notify_freq_card_seconds,
        notify_freq_board_seconds,
        enable_data_retention: host
            .data_retention_settings
            .enable_boards_deletion
            .unwrap_or(false),
        data_retention_days: host.data_retention_settings.boards_retention_days,
        teammate_name_display: host.team_settings.teammate_name_display.clone(),
        show_email_address: host.privacy_settings.show_email_address.unwrap_or(false),
        show_full_name: host.privacy_settings.show_full_name.unwrap_or(false),
    }
}

/// Flatten the host feature flags into string pairs.
///
/// Booleans become `"true"`/`"false"`. A string containing `-` is split once
/// on the first `-` and each non-empty half becomes its own flag set to
/// `"true"`. Other non-empty strings pass through; empty strings are dropped.
///
/// When a name both comes out of a compound value and exists as a flag of its
/// own, the flag's own value wins, regardless of name order.
pub fn parse_feature_flags(flags: &FeatureFlags) -> BTreeMap<String, String> {
    let mut derived = BTreeMap::new();
    let mut direct = BTreeMap::new();

    for (name, value) in flags.iter() {
        match value {
            FlagValue::Bool(enabled) => {
                direct.insert(name.to_string(), enabled.to_string());
            }
            FlagValue::Text(text) if text.is_empty() => {}
            FlagValue::Text(text) => match text.split_once(FLAG_SEPARATOR) {
                Some((first, second)) => {
                    for flag in [first, second].into_iter().filter(|f| !f.is_empty()) {
                        derived.insert(flag.to_string(), "true".to_string());
                    }
                }
                None => {
                    direct.insert(name.to_string(), text.clone());
                }
            },
        }
    }

    derived.extend(direct);
    derived
}

fn s3_config(files: &FileSettings) -> AmazonS3Config {
    AmazonS3Config {
        access_key_id: files.amazon_s3_access_key_id.clone(),
        secret_access_key: files.amazon_s3_secret_access_key.clone(),
        bucket: files.amazon_s3_bucket.clone(),
        path_prefix: files.amazon_s3_path_prefix.clone(),
        region: files.amazon_s3_region.clone(),
        endpoint: files.amazon_s3_endpoint.clone(),
        ssl: files.amazon_s3_ssl,
        sign_v2: files.amazon_s3_sign_v2,
        sse: files.amazon_s3_sse,
        trace: files.amazon_s3_trace,
    }
}

fn setting_default<T: std::fmt::Debug>(error: SettingError, default: T) -> T {
    if matches!(error, SettingError::TypeMismatch { .. }) {
        tracing::debug!(error = %error, default = ?default, "Ignoring malformed plugin setting");
    }
    default
}
