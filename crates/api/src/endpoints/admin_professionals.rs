//! Admin professional moderation endpoints.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
};
use markethall_common::{AppResult, PageRequest, SortDir};
use markethall_core::{AdminProfessionalInput, ProfessionalUpdate};
use markethall_db::entities::professional::ProfessionalStatus;
use markethall_db::repositories::{ProfessionType, ProfessionalFilter};
use serde::Deserialize;
use tracing::info;
use validator::Validate;

use super::orders::{OrderListResponse, OrderResponse};
use super::professionals::{ProfessionalFields, ProfessionalListResponse, ProfessionalResponse};
use crate::{extractors::AdminUser, middleware::AppState, response::MessageResponse};

/// Default page size for admin lists.
const ADMIN_PAGE_SIZE: u64 = 10;

/// Default page size for the per-professional order list.
const ORDER_PAGE_SIZE: u64 = 12;

/// Create admin professional router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_professionals).post(create_professional))
        .route(
            "/{id}",
            get(get_professional)
                .put(update_professional)
                .delete(delete_professional),
        )
        .route("/{id}/orders", get(list_professional_orders))
}

/// Admin list query.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub sort_by: Option<String>,
    pub sort_order: Option<SortDir>,
    pub status: Option<ProfessionalStatus>,
    pub is_active: Option<bool>,
    pub gender: Option<String>,
    pub nationality: Option<String>,
    pub city: Option<String>,
    pub profession_type: Option<ProfessionType>,
    pub language: Option<String>,
    pub search: Option<String>,
}

/// Admin list over the full status range.
async fn list_professionals(
    AdminUser(_admin_id): AdminUser,
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<ProfessionalListResponse>> {
    let page = PageRequest {
        page: query.page,
        limit: query.limit,
        sort_by: query.sort_by,
        sort_order: query.sort_order,
    };
    let filter = ProfessionalFilter {
        status: query.status,
        is_active: query.is_active,
        gender: query.gender,
        nationality: query.nationality,
        city: query.city,
        profession_type: query.profession_type,
        language: query.language,
        search: query.search,
    };

    let (records, total) = state
        .professional_service
        .list_admin(
            filter,
            page.sort_by.as_deref(),
            page.sort_dir(),
            page.page(),
            page.limit_or(ADMIN_PAGE_SIZE),
        )
        .await?;

    Ok(Json(ProfessionalListResponse::new(
        records.into_iter().map(ProfessionalResponse::from).collect(),
        page.page(),
        page.limit_or(ADMIN_PAGE_SIZE),
        total,
    )))
}

/// Admin-direct creation request.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateProfessionalRequest {
    #[serde(flatten)]
    #[validate(nested)]
    pub professional: ProfessionalFields,
    /// Defaults to approved when omitted.
    pub status: Option<ProfessionalStatus>,
    pub admin_comments: Option<String>,
}

/// Create a listing directly, bypassing the submission queue.
async fn create_professional(
    AdminUser(admin_id): AdminUser,
    State(state): State<AppState>,
    Json(req): Json<CreateProfessionalRequest>,
) -> AppResult<(StatusCode, Json<ProfessionalResponse>)> {
    req.validate()?;

    info!(admin_id = %admin_id, "Admin creating professional");

    let record = state
        .professional_service
        .admin_create(
            &admin_id,
            AdminProfessionalInput {
                input: req.professional.into_input(),
                status: req.status,
                admin_comments: req.admin_comments,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(ProfessionalResponse::from(record))))
}

/// Get any listing regardless of status.
async fn get_professional(
    AdminUser(_admin_id): AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ProfessionalResponse>> {
    let record = state.professional_service.get_admin(&id).await?;
    Ok(Json(ProfessionalResponse::from(record)))
}

/// Admin update request. Omitted fields are left unchanged.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfessionalRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub profile_url: Option<String>,
    pub linkedin_url: Option<String>,
    pub tiktok_url: Option<String>,
    pub facebook_url: Option<String>,
    pub youtube_url: Option<String>,
    pub followers_count: Option<i32>,
    pub verified: Option<bool>,
    pub agency_owner: Option<bool>,
    pub agent: Option<bool>,
    pub developer_employee: Option<bool>,
    pub gender: Option<String>,
    pub nationality: Option<String>,
    pub city: Option<String>,
    pub languages: Option<Vec<String>>,
    pub image_url: Option<String>,
    pub status: Option<ProfessionalStatus>,
    pub rejection_reason: Option<String>,
    pub admin_comments: Option<String>,
    pub is_active: Option<bool>,
}

/// Update a listing. Status changes run the moderation state machine and
/// restamp the audit trail; the merged record is revalidated on content
/// edits.
async fn update_professional(
    AdminUser(admin_id): AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateProfessionalRequest>,
) -> AppResult<Json<ProfessionalResponse>> {
    info!(admin_id = %admin_id, professional_id = %id, "Admin updating professional");

    let update = ProfessionalUpdate {
        first_name: req.first_name,
        last_name: req.last_name,
        email: req.email,
        profile_url: req.profile_url,
        linkedin_url: req.linkedin_url,
        tiktok_url: req.tiktok_url,
        facebook_url: req.facebook_url,
        youtube_url: req.youtube_url,
        followers_count: req.followers_count,
        verified: req.verified,
        agency_owner: req.agency_owner,
        agent: req.agent,
        developer_employee: req.developer_employee,
        gender: req.gender,
        nationality: req.nationality,
        city: req.city,
        languages: req.languages,
        image_url: req.image_url,
        status: req.status,
        rejection_reason: req.rejection_reason,
        admin_comments: req.admin_comments,
        is_active: req.is_active,
    };

    let record = state
        .professional_service
        .admin_update(&admin_id, &id, update)
        .await?;

    Ok(Json(ProfessionalResponse::from(record)))
}

/// Delete a listing.
async fn delete_professional(
    AdminUser(admin_id): AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<MessageResponse>> {
    info!(admin_id = %admin_id, professional_id = %id, "Admin deleting professional");

    state.professional_service.delete(&id).await?;

    Ok(Json(MessageResponse::new("Professional deleted")))
}

/// Per-professional order list query.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfessionalOrdersQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub sort_order: Option<SortDir>,
}

/// List the orders placed against one professional.
async fn list_professional_orders(
    AdminUser(_admin_id): AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<ProfessionalOrdersQuery>,
) -> AppResult<Json<OrderListResponse>> {
    let page = PageRequest {
        page: query.page,
        limit: query.limit,
        sort_by: None,
        sort_order: query.sort_order,
    };

    let (records, total) = state
        .order_service
        .list_for_professional(
            &id,
            page.sort_dir(),
            page.page(),
            page.limit_or(ORDER_PAGE_SIZE),
        )
        .await?;

    Ok(Json(OrderListResponse::new(
        records.into_iter().map(OrderResponse::from).collect(),
        page.page(),
        page.limit_or(ORDER_PAGE_SIZE),
        total,
    )))
}
