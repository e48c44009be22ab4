//! Error types for markethall.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use validator::{ValidationError, ValidationErrors};

/// Application result type.
pub type AppResult<T> = Result<T, AppError>;

/// Application error type.
#[derive(Debug, Error)]
pub enum AppError {
    // === Client Errors ===
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Collected field violations. Never fail-fast: every violation in the
    /// request is reported together so the client can fix them in one round
    /// trip.
    #[error("Validation failed")]
    Validation(ValidationErrors),

    /// Anti-abuse verification failed: score below threshold, missing token,
    /// or the verification service was unreachable.
    #[error("Captcha verification failed: {0}")]
    Captcha(String),

    // === Server Errors ===
    /// Persistence failure. The message must never contain raw query text.
    #[error("Database error: {0}")]
    Database(String),

    #[error("External service error: {0}")]
    ExternalService(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            // 4xx Client Errors
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::BadRequest(_) | Self::Validation(_) | Self::Captcha(_) => {
                StatusCode::BAD_REQUEST
            }

            // 5xx Server Errors
            Self::Database(_)
            | Self::ExternalService(_)
            | Self::Config(_)
            | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "NOT_FOUND",
            Self::Forbidden(_) => "FORBIDDEN",
            Self::BadRequest(_) => "BAD_REQUEST",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Captcha(_) => "CAPTCHA_FAILED",
            Self::Database(_) => "DATABASE_ERROR",
            Self::ExternalService(_) => "EXTERNAL_SERVICE_ERROR",
            Self::Config(_) => "CONFIG_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Returns whether this error should be logged at error level.
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        self.status_code().is_server_error()
    }

    /// Build a validation error for a single field.
    #[must_use]
    pub fn validation(field: &'static str, message: &'static str) -> Self {
        let mut errors = ValidationErrors::new();
        let mut violation = ValidationError::new("invalid");
        violation.message = Some(message.into());
        errors.add(field, violation);
        Self::Validation(errors)
    }
}

/// Flatten [`ValidationErrors`] into a `[{field, code, message}]` list.
fn violation_details(errors: &ValidationErrors) -> Vec<serde_json::Value> {
    errors
        .field_errors()
        .iter()
        .flat_map(|(field, violations)| {
            violations.iter().map(move |v| {
                json!({
                    "field": field,
                    "code": v.code,
                    "message": v.message.as_deref().unwrap_or("invalid value"),
                })
            })
        })
        .collect()
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.error_code();

        // Log server errors
        if self.is_server_error() {
            tracing::error!(error = %self, code = code, "Server error occurred");
        } else {
            tracing::debug!(error = %self, code = code, "Client error occurred");
        }

        let body = match &self {
            Self::Validation(errors) => Json(json!({
                "error": {
                    "code": code,
                    "message": "Validation failed",
                    "details": violation_details(errors),
                }
            })),
            _ => Json(json!({
                "error": {
                    "code": code,
                    "message": self.to_string(),
                }
            })),
        };

        (status, body).into_response()
    }
}

// === From implementations ===

impl From<ValidationErrors> for AppError {
    fn from(err: ValidationErrors) -> Self {
        Self::Validation(err)
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_match_taxonomy() {
        assert_eq!(
            AppError::NotFound("x".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::Forbidden("x".into()).status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            AppError::Captcha("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::validation("name", "required").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::Database("x".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn validation_details_carry_every_violation() {
        let mut errors = ValidationErrors::new();
        errors.add("first_name", ValidationError::new("length"));
        errors.add("email", ValidationError::new("email"));
        let details = violation_details(&errors);
        assert_eq!(details.len(), 2);
    }
}
