//! Boards sub-application configuration.
//!
//! # Data Flow
//! ```text
//! HostConfig snapshot + override directory + telemetry id
//!     → translate.rs (pure, total)
//!     → BoardsConfig (fresh value per call)
//!     → handed to the boards app on (re)initialization
//! ```

pub mod translate;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub use translate::{create_boards_config, parse_feature_flags, TranslateParams};

/// Plugin identifier the boards app is registered under.
pub const PLUGIN_ID: &str = "focalboard";

/// Plugin setting that turns on publicly shared boards.
pub const SHARED_BOARDS_NAME: &str = "EnablePublicSharedBoards";

/// Plugin setting: card notification frequency in seconds.
pub const NOTIFY_FREQ_CARD_SECONDS_KEY: &str = "NotifyFreqCardSeconds";

/// Plugin setting: board notification frequency in seconds.
pub const NOTIFY_FREQ_BOARD_SECONDS_KEY: &str = "NotifyFreqBoardSeconds";

/// Configuration consumed by the boards app.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardsConfig {
    pub server_root: String,
    pub port: i32,
    pub db_type: String,
    pub db_config_string: String,
    pub db_table_prefix: String,
    pub use_ssl: bool,
    pub secure_cookie: bool,
    pub web_path: String,
    pub files_driver: String,
    pub files_path: String,
    pub files_s3_config: AmazonS3Config,
    pub max_file_size: i64,
    pub telemetry: bool,
    pub telemetry_id: String,
    pub webhook_update: Vec<String>,
    pub session_expire_time: i64,
    pub session_refresh_time: i64,
    pub local_only: bool,
    pub enable_local_mode: bool,
    pub local_mode_socket_location: String,
    pub auth_mode: String,
    pub enable_public_shared_boards: bool,
    /// Flag name → value. Booleans are rendered as `"true"` / `"false"`.
    pub feature_flags: BTreeMap<String, String>,
    pub notify_freq_card_seconds: i64,
    pub notify_freq_board_seconds: i64,
    pub enable_data_retention: bool,
    pub data_retention_days: i64,
    pub teammate_name_display: String,
    pub show_email_address: bool,
    pub show_full_name: bool,
}

/// S3 settings for the boards file store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmazonS3Config {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub bucket: String,
    pub path_prefix: String,
    pub region: String,
    pub endpoint: String,
    pub ssl: bool,
    pub sign_v2: bool,
    pub sse: bool,
    pub trace: bool,
}
