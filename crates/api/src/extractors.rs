//! Request extractors.

use axum::{extract::FromRequestParts, http::request::Parts};
use markethall_common::AppError;

use crate::middleware::Caller;

/// Authenticated end-user extractor. Carries the caller id.
#[derive(Debug, Clone)]
pub struct AuthUser(pub String);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Caller is set by the middleware from the gateway headers
        match parts.extensions.get::<Caller>() {
            Some(Caller::User { id } | Caller::Admin { id }) => Ok(Self(id.clone())),
            None => Err(AppError::Forbidden("Authentication required".to_string())),
        }
    }
}

/// Admin extractor. Rejects non-admin callers.
#[derive(Debug, Clone)]
pub struct AdminUser(pub String);

impl<S> FromRequestParts<S> for AdminUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match parts.extensions.get::<Caller>() {
            Some(Caller::Admin { id }) => Ok(Self(id.clone())),
            _ => Err(AppError::Forbidden("Admin access required".to_string())),
        }
    }
}

/// Optional caller extractor.
#[derive(Debug, Clone)]
pub struct MaybeAuthUser(pub Option<String>);

impl<S> FromRequestParts<S> for MaybeAuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let id = match parts.extensions.get::<Caller>() {
            Some(Caller::User { id } | Caller::Admin { id }) => Some(id.clone()),
            None => None,
        };
        Ok(Self(id))
    }
}
