//! Public professional directory endpoints.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
};
use chrono::{DateTime, FixedOffset};
use markethall_common::{AppResult, PageRequest, Pagination, SortDir};
use markethall_core::{LANGUAGES, ProfessionalInput};
use markethall_db::entities::professional::ProfessionalStatus;
use markethall_db::records::Professional;
use markethall_db::repositories::{ProfessionType, ProfessionalFilter};
use serde::{Deserialize, Serialize};
use tracing::info;
use validator::{Validate, ValidationError};

use crate::{extractors::AuthUser, middleware::AppState};

/// Default page size for the public directory.
const PUBLIC_PAGE_SIZE: u64 = 12;

/// Create public professional router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_professionals).post(submit_professional))
        .route("/meta/languages", get(list_languages))
        .route("/{id}", get(get_professional))
}

/// Professional response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfessionalResponse {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub profile_url: Option<String>,
    pub linkedin_url: Option<String>,
    pub tiktok_url: Option<String>,
    pub facebook_url: Option<String>,
    pub youtube_url: Option<String>,
    pub followers_count: Option<i32>,
    pub verified: bool,
    pub agency_owner: bool,
    pub agent: bool,
    pub developer_employee: bool,
    pub gender: Option<String>,
    pub nationality: Option<String>,
    pub city: Option<String>,
    pub languages: Vec<String>,
    pub image_url: Option<String>,
    pub status: ProfessionalStatus,
    pub submitted_by: Option<String>,
    pub submitted_by_admin: Option<String>,
    pub approved_by: Option<String>,
    pub approved_at: Option<DateTime<FixedOffset>>,
    pub rejected_by: Option<String>,
    pub rejected_at: Option<DateTime<FixedOffset>>,
    pub rejection_reason: Option<String>,
    pub admin_comments: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<FixedOffset>,
    pub updated_at: DateTime<FixedOffset>,
}

impl From<Professional> for ProfessionalResponse {
    fn from(record: Professional) -> Self {
        Self {
            id: record.id,
            first_name: record.first_name,
            last_name: record.last_name,
            email: record.email,
            profile_url: record.profile_url,
            linkedin_url: record.linkedin_url,
            tiktok_url: record.tiktok_url,
            facebook_url: record.facebook_url,
            youtube_url: record.youtube_url,
            followers_count: record.followers_count,
            verified: record.verified,
            agency_owner: record.agency_owner,
            agent: record.agent,
            developer_employee: record.developer_employee,
            gender: record.gender,
            nationality: record.nationality,
            city: record.city,
            languages: record.languages,
            image_url: record.image_url,
            status: record.status,
            submitted_by: record.submitted_by,
            submitted_by_admin: record.submitted_by_admin,
            approved_by: record.approved_by,
            approved_at: record.approved_at,
            rejected_by: record.rejected_by,
            rejected_at: record.rejected_at,
            rejection_reason: record.rejection_reason,
            admin_comments: record.admin_comments,
            is_active: record.is_active,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

/// Professional list response.
#[derive(Debug, Serialize)]
pub struct ProfessionalListResponse {
    pub professionals: Vec<ProfessionalResponse>,
    pub pagination: Pagination,
}

impl ProfessionalListResponse {
    /// Build the envelope from a served page and the total row count.
    #[must_use]
    pub const fn new(
        professionals: Vec<ProfessionalResponse>,
        page: u64,
        limit: u64,
        total: u64,
    ) -> Self {
        Self {
            professionals,
            pagination: Pagination::new(page, limit, total),
        }
    }
}

fn known_languages(value: &[String]) -> Result<(), ValidationError> {
    if value.iter().all(|l| LANGUAGES.contains(&l.as_str())) {
        Ok(())
    } else {
        Err(ValidationError::new("unknown_language"))
    }
}

/// Content fields of a professional listing, shared by the public and admin
/// creation requests.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProfessionalFields {
    #[validate(length(min = 1))]
    pub first_name: String,
    #[validate(length(min = 1))]
    pub last_name: String,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(url)]
    pub profile_url: Option<String>,
    #[validate(url)]
    pub linkedin_url: Option<String>,
    #[validate(url)]
    pub tiktok_url: Option<String>,
    #[validate(url)]
    pub facebook_url: Option<String>,
    #[validate(url)]
    pub youtube_url: Option<String>,
    #[validate(range(min = 0))]
    pub followers_count: Option<i32>,
    #[serde(default)]
    pub verified: bool,
    #[serde(default)]
    pub agency_owner: bool,
    #[serde(default)]
    pub agent: bool,
    #[serde(default)]
    pub developer_employee: bool,
    pub gender: Option<String>,
    pub nationality: Option<String>,
    pub city: Option<String>,
    #[serde(default)]
    #[validate(custom(function = "known_languages"))]
    pub languages: Vec<String>,
    pub image_url: Option<String>,
}

impl ProfessionalFields {
    pub fn into_input(self) -> ProfessionalInput {
        ProfessionalInput {
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            profile_url: self.profile_url,
            linkedin_url: self.linkedin_url,
            tiktok_url: self.tiktok_url,
            facebook_url: self.facebook_url,
            youtube_url: self.youtube_url,
            followers_count: self.followers_count,
            verified: self.verified,
            agency_owner: self.agency_owner,
            agent: self.agent,
            developer_employee: self.developer_employee,
            gender: self.gender,
            nationality: self.nationality,
            city: self.city,
            languages: self.languages,
            image_url: self.image_url,
        }
    }
}

/// Public submission request.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SubmitProfessionalRequest {
    #[serde(flatten)]
    #[validate(nested)]
    pub professional: ProfessionalFields,
    pub captcha_token: Option<String>,
}

/// Submit a professional listing for review.
async fn submit_professional(
    AuthUser(user_id): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<SubmitProfessionalRequest>,
) -> AppResult<(StatusCode, Json<ProfessionalResponse>)> {
    req.validate()?;

    info!(user_id = %user_id, "Professional submission received");

    let record = state
        .professional_service
        .submit(
            &user_id,
            req.professional.into_input(),
            req.captcha_token.as_deref(),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(ProfessionalResponse::from(record))))
}

/// Public directory list query.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListProfessionalsQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub sort_by: Option<String>,
    pub sort_order: Option<SortDir>,
    pub gender: Option<String>,
    pub nationality: Option<String>,
    pub city: Option<String>,
    pub profession_type: Option<ProfessionType>,
    pub language: Option<String>,
    pub search: Option<String>,
}

impl ListProfessionalsQuery {
    fn page_request(&self) -> PageRequest {
        PageRequest {
            page: self.page,
            limit: self.limit,
            sort_by: self.sort_by.clone(),
            sort_order: self.sort_order,
        }
    }
}

/// Public directory list. Only approved and active listings are served; the
/// status filter is pinned by the service.
async fn list_professionals(
    State(state): State<AppState>,
    Query(query): Query<ListProfessionalsQuery>,
) -> AppResult<Json<ProfessionalListResponse>> {
    let page = query.page_request();
    let filter = ProfessionalFilter {
        gender: query.gender,
        nationality: query.nationality,
        city: query.city,
        profession_type: query.profession_type,
        language: query.language,
        search: query.search,
        ..ProfessionalFilter::default()
    };

    let (records, total) = state
        .professional_service
        .list_public(
            filter,
            page.sort_by.as_deref(),
            page.sort_dir(),
            page.page(),
            page.limit_or(PUBLIC_PAGE_SIZE),
        )
        .await?;

    Ok(Json(ProfessionalListResponse::new(
        records.into_iter().map(ProfessionalResponse::from).collect(),
        page.page(),
        page.limit_or(PUBLIC_PAGE_SIZE),
        total,
    )))
}

/// Get one public listing. Pending, rejected and deactivated rows read as
/// not found.
async fn get_professional(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ProfessionalResponse>> {
    let record = state.professional_service.get_public(&id).await?;
    Ok(Json(ProfessionalResponse::from(record)))
}

/// Language vocabulary response.
#[derive(Debug, Serialize)]
pub struct LanguagesResponse {
    pub languages: Vec<&'static str>,
}

/// List the language vocabulary offered on the submission form.
async fn list_languages() -> Json<LanguagesResponse> {
    Json(LanguagesResponse {
        languages: LANGUAGES.to_vec(),
    })
}
