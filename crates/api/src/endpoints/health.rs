//! Health check endpoint.

use axum::{Json, Router, routing::get};
use serde::Serialize;

use crate::middleware::AppState;

/// Create health router.
pub fn router() -> Router<AppState> {
    Router::new().route("/healthz", get(healthz))
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
}

async fn healthz() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}
