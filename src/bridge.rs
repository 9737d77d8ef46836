//! Glue between the host and the embedded boards app.
//!
//! The bridge owns the translation parameters and the currently published
//! [`BoardsConfig`]. Each host configuration change is translated into a new
//! config, swapped in atomically and handed to the boards app.

use std::sync::Arc;

use arc_swap::ArcSwap;
use axum::Router;
use tokio::sync::{broadcast, mpsc};

use crate::boards::{BoardsConfig, TranslateParams};
use crate::config::HostConfig;
use crate::http::RequestDelegate;
use crate::observability::metrics;

/// The embedded boards application as seen from the host side.
pub trait SubApp: Send + Sync {
    /// Apply a freshly translated configuration.
    fn configure(&self, config: &BoardsConfig);

    /// Root HTTP handler of the app.
    fn router(&self) -> Router;
}

pub struct BoardsBridge {
    params: TranslateParams,
    current: ArcSwap<BoardsConfig>,
    subapp: Arc<dyn SubApp>,
}

impl BoardsBridge {
    /// Translate the initial host snapshot and configure the boards app with it.
    pub fn new(host: &HostConfig, params: TranslateParams, subapp: Arc<dyn SubApp>) -> Self {
        let config = params.translate(host);
        subapp.configure(&config);
        metrics::record_translation();

        tracing::info!(
            server_root = %config.server_root,
            telemetry = config.telemetry,
            feature_flags = config.feature_flags.len(),
            "Boards config initialized"
        );

        Self {
            params,
            current: ArcSwap::from_pointee(config),
            subapp,
        }
    }

    /// Currently published configuration.
    pub fn current(&self) -> Arc<BoardsConfig> {
        self.current.load_full()
    }

    pub fn params(&self) -> &TranslateParams {
        &self.params
    }

    /// Host configuration changed: re-translate, publish and reconfigure.
    ///
    /// When the translated config equals the published one nothing is swapped
    /// and the boards app is not reconfigured.
    pub fn on_configuration_change(&self, host: &HostConfig) -> Arc<BoardsConfig> {
        let current = self.current.load_full();
        let config = self.params.translate(host);
        if config == *current {
            tracing::debug!("Host config change has no effect on boards config");
            return current;
        }

        let config = Arc::new(config);
        self.current.store(Arc::clone(&config));
        self.subapp.configure(&config);
        metrics::record_translation();

        tracing::info!(
            telemetry = config.telemetry,
            public_shared_boards = config.enable_public_shared_boards,
            feature_flags = config.feature_flags.len(),
            "Boards config updated"
        );
        config
    }

    /// Delegate that forwards requests into the boards app.
    pub fn delegate(&self) -> RequestDelegate<Router> {
        RequestDelegate::new(self.subapp.router())
    }

    /// Apply host config updates until the channel closes or shutdown fires.
    pub async fn run_reload_loop(
        &self,
        mut updates: mpsc::UnboundedReceiver<HostConfig>,
        mut shutdown: broadcast::Receiver<()>,
    ) {
        loop {
            tokio::select! {
                update = updates.recv() => match update {
                    Some(host) => {
                        self.on_configuration_change(&host);
                    }
                    None => {
                        tracing::debug!("Host config update channel closed");
                        break;
                    }
                },
                _ = shutdown.recv() => {
                    tracing::info!("Config reload loop stopping");
                    break;
                }
            }
        }
    }
}
