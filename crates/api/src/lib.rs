//! HTTP API layer for markethall.
//!
//! This crate provides the REST surface of the back office:
//!
//! - **Endpoints**: public submission and directory routes plus the admin
//!   moderation routes
//! - **Extractors**: caller identity from the trusted gateway headers
//! - **Middleware**: caller resolution, logging, CORS
//!
//! Built on Axum 0.8 with Tower middleware stack.

pub mod endpoints;
pub mod extractors;
pub mod middleware;
pub mod response;

pub use endpoints::router;
pub use middleware::AppState;
