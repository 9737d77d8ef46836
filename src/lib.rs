//! Adapter between a host server and the embedded boards app.
//!
//! Translates the host's global configuration into the boards app
//! configuration and forwards HTTP requests into the boards app handler.

pub mod boards;
pub mod bridge;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod status;

pub use boards::{create_boards_config, BoardsConfig, TranslateParams};
pub use bridge::{BoardsBridge, SubApp};
pub use config::HostConfig;
pub use http::{HttpServer, RequestDelegate};
pub use lifecycle::Shutdown;
