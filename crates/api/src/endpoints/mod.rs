//! API endpoints.

mod admin_enquiries;
mod admin_orders;
mod admin_professionals;
mod enquiries;
pub mod health;
mod orders;
mod professionals;

use axum::Router;

use crate::middleware::AppState;

/// Create the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .nest("/professionals", professionals::router())
        .nest("/enquiries", enquiries::router())
        .nest("/orders", orders::router())
        .nest("/admin/professionals", admin_professionals::router())
        .nest("/admin/enquiries", admin_enquiries::router())
        .nest("/admin/orders", admin_orders::router())
}
