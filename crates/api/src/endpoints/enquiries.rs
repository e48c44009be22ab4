//! Public enquiry submission endpoint.

use axum::{Json, Router, extract::State, http::StatusCode, routing::post};
use chrono::{DateTime, FixedOffset};
use markethall_common::{AppResult, Pagination};
use markethall_core::EnquiryInput;
use markethall_db::entities::enquiry::EnquiryStatus;
use markethall_db::records::Enquiry;
use serde::{Deserialize, Serialize};
use tracing::info;
use validator::{Validate, ValidationError};

use crate::{extractors::MaybeAuthUser, middleware::AppState};

/// Create public enquiry router.
pub fn router() -> Router<AppState> {
    Router::new().route("/", post(submit_enquiry))
}

/// Enquiry response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnquiryResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub company: Option<String>,
    pub message: Option<String>,
    pub terms_accepted: bool,
    pub status: EnquiryStatus,
    pub viewed_by: Option<String>,
    pub viewed_at: Option<DateTime<FixedOffset>>,
    pub submitted_by: Option<String>,
    pub created_at: DateTime<FixedOffset>,
    pub updated_at: DateTime<FixedOffset>,
}

impl From<Enquiry> for EnquiryResponse {
    fn from(record: Enquiry) -> Self {
        Self {
            id: record.id,
            name: record.name,
            email: record.email,
            company: record.company,
            message: record.message,
            terms_accepted: record.terms_accepted,
            status: record.status,
            viewed_by: record.viewed_by,
            viewed_at: record.viewed_at,
            submitted_by: record.submitted_by,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

/// Enquiry list response.
#[derive(Debug, Serialize)]
pub struct EnquiryListResponse {
    pub enquiries: Vec<EnquiryResponse>,
    pub pagination: Pagination,
}

impl EnquiryListResponse {
    /// Build the envelope from a served page and the total row count.
    #[must_use]
    pub const fn new(enquiries: Vec<EnquiryResponse>, page: u64, limit: u64, total: u64) -> Self {
        Self {
            enquiries,
            pagination: Pagination::new(page, limit, total),
        }
    }
}

fn accepted(value: &bool) -> Result<(), ValidationError> {
    if *value {
        Ok(())
    } else {
        Err(ValidationError::new("accepted"))
    }
}

/// Public enquiry request.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SubmitEnquiryRequest {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    pub company: Option<String>,
    pub message: Option<String>,
    #[validate(custom(function = "accepted"))]
    pub terms_accepted: bool,
    pub captcha_token: Option<String>,
}

/// Submit a contact enquiry.
async fn submit_enquiry(
    MaybeAuthUser(user_id): MaybeAuthUser,
    State(state): State<AppState>,
    Json(req): Json<SubmitEnquiryRequest>,
) -> AppResult<(StatusCode, Json<EnquiryResponse>)> {
    req.validate()?;

    info!("Enquiry received");

    let input = EnquiryInput {
        name: req.name,
        email: req.email,
        company: req.company,
        message: req.message,
        terms_accepted: req.terms_accepted,
    };

    let record = state
        .enquiry_service
        .submit(user_id.as_deref(), input, req.captcha_token.as_deref())
        .await?;

    Ok((StatusCode::CREATED, Json(EnquiryResponse::from(record))))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn terms_must_be_accepted() {
        let req: SubmitEnquiryRequest = serde_json::from_value(serde_json::json!({
            "name": "Omar",
            "email": "omar@example.com",
            "termsAccepted": false
        }))
        .unwrap();

        assert!(req.validate().is_err());
    }

    #[test]
    fn email_must_be_well_formed() {
        let req: SubmitEnquiryRequest = serde_json::from_value(serde_json::json!({
            "name": "Omar",
            "email": "not-an-email",
            "termsAccepted": true
        }))
        .unwrap();

        assert!(req.validate().is_err());
    }
}
