//! Shared helpers for integration tests.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;

use boards_bridge::boards::TranslateParams;
use boards_bridge::bridge::{BoardsBridge, SubApp};
use boards_bridge::config::HostConfig;
use boards_bridge::http::HttpServer;
use boards_bridge::lifecycle::Shutdown;

/// Start the HTTP front for `bridge` on an ephemeral port.
pub async fn start_bridge_server(bridge: &BoardsBridge, shutdown: &Shutdown) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let server = HttpServer::new(bridge.delegate(), Duration::from_secs(5));
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    addr
}

/// Bridge over `subapp` with default host config and a fixed telemetry id.
#[allow(dead_code)]
pub fn bridge_with(subapp: Arc<dyn SubApp>) -> BoardsBridge {
    let params = TranslateParams {
        override_directory: String::new(),
        telemetry_id: "test-server".into(),
    };
    BoardsBridge::new(&HostConfig::default(), params, subapp)
}

/// HTTP client that never pools or proxies.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
