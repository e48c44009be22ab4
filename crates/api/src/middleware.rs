//! API middleware.

use axum::{body::Body, http::Request, middleware::Next, response::Response};
use markethall_core::{EnquiryService, OrderService, ProfessionalService};

/// Resolved caller identity, set on request extensions by
/// [`caller_middleware`].
#[derive(Debug, Clone)]
pub enum Caller {
    /// Authenticated end user.
    User {
        /// Caller id.
        id: String,
    },
    /// Back-office admin.
    Admin {
        /// Caller id.
        id: String,
    },
}

/// Application state.
#[derive(Clone)]
pub struct AppState {
    /// Professional directory and moderation.
    pub professional_service: ProfessionalService,
    /// Campaign orders.
    pub order_service: OrderService,
    /// Contact enquiries.
    pub enquiry_service: EnquiryService,
}

/// Caller resolution middleware.
///
/// Identity arrives from the upstream gateway as `x-caller-id` and
/// `x-caller-role` headers. The gateway terminates authentication; these
/// headers are trusted as-is and are not reachable from the public edge.
pub async fn caller_middleware(mut req: Request<Body>, next: Next) -> Response {
    let id = req
        .headers()
        .get("x-caller-id")
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .map(ToString::to_string);

    if let Some(id) = id {
        let is_admin = req
            .headers()
            .get("x-caller-role")
            .and_then(|v| v.to_str().ok())
            .is_some_and(|role| role.eq_ignore_ascii_case("admin"));

        let caller = if is_admin {
            Caller::Admin { id }
        } else {
            Caller::User { id }
        };
        req.extensions_mut().insert(caller);
    }

    next.run(req).await
}
