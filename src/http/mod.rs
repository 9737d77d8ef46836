//! HTTP front of the boards app.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (axum, trace + timeout layers, /plugins/focalboard prefix)
//!     → delegate.rs (hand request to the boards app untouched)
//!     → boards app handler
//!     → response returned unchanged
//! ```

pub mod delegate;
pub mod server;

pub use delegate::{RequestDelegate, NOT_INITIALIZED_BODY};
pub use server::HttpServer;
