//! Minimal stand-in for the boards app.
//!
//! Serves `/hello` and a redacted view of the config it was last given. The
//! binary runs it when no real boards app is linked in, which is enough to
//! check the host wiring end to end.

use std::sync::Arc;

use arc_swap::ArcSwapOption;
use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router};

use crate::boards::BoardsConfig;
use crate::bridge::SubApp;

const REDACTED: &str = "********";

#[derive(Default)]
pub struct StatusApp {
    config: Arc<ArcSwapOption<BoardsConfig>>,
}

impl StatusApp {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SubApp for StatusApp {
    fn configure(&self, config: &BoardsConfig) {
        self.config.store(Some(Arc::new(config.clone())));
    }

    fn router(&self) -> Router {
        Router::new()
            .route("/hello", get(hello))
            .route("/config", get(current_config))
            .with_state(Arc::clone(&self.config))
    }
}

async fn hello() -> &'static str {
    "Hello"
}

async fn current_config(
    State(config): State<Arc<ArcSwapOption<BoardsConfig>>>,
) -> impl IntoResponse {
    match config.load_full() {
        Some(config) => Json(redact(&config)).into_response(),
        None => (StatusCode::SERVICE_UNAVAILABLE, "not configured").into_response(),
    }
}

/// Copy of the config with connection secrets masked.
pub fn redact(config: &BoardsConfig) -> BoardsConfig {
    let mut redacted = config.clone();
    if !redacted.db_config_string.is_empty() {
        redacted.db_config_string = REDACTED.to_string();
    }
    if !redacted.files_s3_config.secret_access_key.is_empty() {
        redacted.files_s3_config.secret_access_key = REDACTED.to_string();
    }
    redacted
}
