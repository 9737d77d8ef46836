//! Host configuration subsystem.
//!
//! # Data Flow
//! ```text
//! host config file (TOML / config.json)
//!     → loader.rs (parse & deserialize, missing sections default)
//!     → HostConfig (read-only snapshot)
//!     → boards::translate (HostConfig → BoardsConfig)
//!
//! On file change:
//!     watcher.rs detects change
//!     → loader.rs loads new snapshot
//!     → sent over a channel to the bridge
//!     → bridge re-translates and swaps the published BoardsConfig
//! ```
//!
//! # Design Decisions
//! - Snapshots are never mutated once loaded
//! - All fields have defaults; partial host configs are normal
//! - Feature flags and plugin settings are open-ended maps with typed accessors

pub mod feature_flags;
pub mod loader;
pub mod plugin_settings;
pub mod schema;
pub mod watcher;

pub use feature_flags::{FeatureFlags, FlagValue};
pub use loader::{load_host_config, ConfigError};
pub use plugin_settings::{PluginSettings, SettingError};
pub use schema::{
    DataRetentionSettings, FileSettings, HostConfig, LogSettings, PrivacySettings,
    ServiceSettings, SqlSettings, TeamSettings,
};
pub use watcher::HostConfigWatcher;
