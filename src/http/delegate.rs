//! Request delegation into the boards app.
//!
//! # Responsibilities
//! - Hand each request to the injected boards handler untouched
//! - Return the handler's status, headers and body unchanged
//! - Refuse with 503 when no handler has been wired in
//!
//! # Design Decisions
//! - No buffering: the body stream is moved straight into the handler
//! - No retries or timeouts here; those belong to the server and handler

use std::convert::Infallible;
use std::task::{Context, Poll};

use axum::{
    body::Body,
    http::{Request, StatusCode},
    response::{IntoResponse, Response},
};
use futures_util::future::BoxFuture;
use tower::{Service, ServiceExt};

use crate::observability::metrics;

/// Body returned when a request arrives before the boards app is wired in.
pub const NOT_INITIALIZED_BODY: &str = "boards app not initialized";

/// Forwards requests to the boards app handler.
#[derive(Clone)]
pub struct RequestDelegate<S> {
    handler: Option<S>,
}

impl<S> RequestDelegate<S> {
    /// Create a delegate around the boards app handler.
    pub fn new(handler: S) -> Self {
        Self {
            handler: Some(handler),
        }
    }

    /// A delegate with no handler. Every request is answered with 503.
    pub fn unset() -> Self {
        Self { handler: None }
    }

    pub fn is_set(&self) -> bool {
        self.handler.is_some()
    }
}

impl<S> RequestDelegate<S>
where
    S: Service<Request<Body>, Response = Response, Error = Infallible> + Clone,
{
    /// Forward one request and return whatever the handler produced.
    pub async fn forward(&self, request: Request<Body>) -> Response {
        let Some(handler) = self.handler.clone() else {
            tracing::error!(
                method = %request.method(),
                path = %request.uri().path(),
                "Request received with no boards handler"
            );
            metrics::record_forward(StatusCode::SERVICE_UNAVAILABLE.as_u16());
            return (StatusCode::SERVICE_UNAVAILABLE, NOT_INITIALIZED_BODY).into_response();
        };

        let response = match handler.oneshot(request).await {
            Ok(response) => response,
            Err(never) => match never {},
        };

        metrics::record_forward(response.status().as_u16());
        response
    }
}

impl<S> Service<Request<Body>> for RequestDelegate<S>
where
    S: Service<Request<Body>, Response = Response, Error = Infallible>
        + Clone
        + Send
        + Sync
        + 'static,
    S::Future: Send,
{
    type Response = Response;
    type Error = Infallible;
    type Future = BoxFuture<'static, Result<Response, Infallible>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        // Readiness is checked per call by `oneshot`.
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, request: Request<Body>) -> Self::Future {
        let delegate = self.clone();
        Box::pin(async move { Ok(delegate.forward(request).await) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        http::{header, HeaderValue, Method},
        routing::{get, post},
        Router,
    };

    async fn read_body(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn boards_router() -> Router {
        Router::new()
            .route("/hello", get(|| async { "Hello" }))
            .route(
                "/echo",
                post(|body: String| async move {
                    (
                        StatusCode::CREATED,
                        [(header::HeaderName::from_static("x-boards"), "echo")],
                        body,
                    )
                }),
            )
            .route(
                "/broken",
                get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
            )
    }

    #[tokio::test]
    async fn test_forward_hello() {
        let delegate = RequestDelegate::new(boards_router());
        let request = Request::builder()
            .method(Method::GET)
            .uri("/hello")
            .body(Body::empty())
            .unwrap();

        let response = delegate.forward(request).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(read_body(response).await, "Hello");
    }

    #[tokio::test]
    async fn test_forward_passes_status_headers_and_body() {
        let delegate = RequestDelegate::new(boards_router());
        let request = Request::builder()
            .method(Method::POST)
            .uri("/echo")
            .header(header::CONTENT_TYPE, "text/plain")
            .body(Body::from("card payload"))
            .unwrap();

        let response = delegate.forward(request).await;
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(
            response.headers().get("x-boards"),
            Some(&HeaderValue::from_static("echo"))
        );
        assert_eq!(read_body(response).await, "card payload");
    }

    #[tokio::test]
    async fn test_handler_errors_pass_through() {
        let delegate = RequestDelegate::new(boards_router());
        let request = Request::get("/broken").body(Body::empty()).unwrap();

        let response = delegate.forward(request).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(read_body(response).await, "boom");

        let request = Request::get("/missing").body(Body::empty()).unwrap();
        let response = delegate.forward(request).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_unset_handler_is_unavailable() {
        let delegate = RequestDelegate::<Router>::unset();
        assert!(!delegate.is_set());

        let request = Request::get("/hello").body(Body::empty()).unwrap();
        let response = delegate.forward(request).await;
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(read_body(response).await, NOT_INITIALIZED_BODY);
    }

    #[tokio::test]
    async fn test_delegate_as_service() {
        let delegate = RequestDelegate::new(boards_router());
        let request = Request::get("/hello").body(Body::empty()).unwrap();

        let response = delegate.oneshot(request).await.unwrap();
        assert_eq!(read_body(response).await, "Hello");
    }
}
