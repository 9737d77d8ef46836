//! HTTP server setup.
//!
//! # Responsibilities
//! - Mount the boards delegate under the plugin prefix
//! - Wire up middleware (tracing, request timeout)
//! - Serve until shutdown is signalled

use std::time::Duration;

use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::boards::PLUGIN_ID;
use crate::http::RequestDelegate;
use crate::lifecycle::Shutdown;

/// Default request timeout applied in front of the boards app.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// URL prefix the boards app is served under.
pub fn plugin_prefix() -> String {
    format!("/plugins/{}", PLUGIN_ID)
}

/// HTTP front for the boards app.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    pub fn new(delegate: RequestDelegate<Router>, request_timeout: Duration) -> Self {
        Self {
            router: Self::build_router(delegate, request_timeout),
        }
    }

    /// The prefix is stripped before the request reaches the delegate.
    #[allow(deprecated)]
    fn build_router(delegate: RequestDelegate<Router>, request_timeout: Duration) -> Router {
        Router::new()
            .nest_service(&plugin_prefix(), delegate)
            .layer(TimeoutLayer::new(request_timeout))
            .layer(TraceLayer::new_for_http())
    }

    /// Router with all layers applied, for serving or in-process tests.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Serve on `listener` until a shutdown notification arrives.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, prefix = %plugin_prefix(), "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(Shutdown::wait(shutdown))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
        routing::get,
    };
    use tower::ServiceExt;

    fn server() -> HttpServer {
        let boards = Router::new()
            .route("/", get(|| async { "root" }))
            .route("/hello", get(|| async { "Hello" }));
        HttpServer::new(RequestDelegate::new(boards), DEFAULT_REQUEST_TIMEOUT)
    }

    async fn get_body(router: Router, uri: &str) -> (StatusCode, String) {
        let response = router
            .oneshot(Request::get(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_prefix_is_stripped() {
        let (status, body) = get_body(server().router(), "/plugins/focalboard/hello").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "Hello");
    }

    #[tokio::test]
    async fn test_outside_prefix_not_found() {
        let (status, _) = get_body(server().router(), "/hello").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_unset_delegate_mounted() {
        let server = HttpServer::new(RequestDelegate::unset(), DEFAULT_REQUEST_TIMEOUT);
        let (status, _) = get_body(server.router(), "/plugins/focalboard/hello").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    }
}
