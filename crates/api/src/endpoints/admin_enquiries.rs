//! Admin enquiry endpoints.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, put},
};
use markethall_common::{AppResult, PageRequest, SortDir};
use markethall_db::entities::enquiry::EnquiryStatus;
use markethall_db::repositories::EnquiryFilter;
use serde::Deserialize;
use tracing::info;

use super::enquiries::{EnquiryListResponse, EnquiryResponse};
use crate::{extractors::AdminUser, middleware::AppState, response::MessageResponse};

/// Default page size for admin enquiry lists.
const ADMIN_PAGE_SIZE: u64 = 10;

/// Create admin enquiry router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_enquiries))
        .route("/{id}", get(get_enquiry).delete(delete_enquiry))
        .route("/{id}/status", put(update_enquiry_status))
}

/// Admin enquiry list query.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListEnquiriesQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub sort_by: Option<String>,
    pub sort_order: Option<SortDir>,
    pub status: Option<EnquiryStatus>,
    pub search: Option<String>,
}

/// Admin enquiry list.
async fn list_enquiries(
    AdminUser(_admin_id): AdminUser,
    State(state): State<AppState>,
    Query(query): Query<ListEnquiriesQuery>,
) -> AppResult<Json<EnquiryListResponse>> {
    let page = PageRequest {
        page: query.page,
        limit: query.limit,
        sort_by: query.sort_by,
        sort_order: query.sort_order,
    };
    let filter = EnquiryFilter {
        status: query.status,
        search: query.search,
    };

    let (records, total) = state
        .enquiry_service
        .list(
            filter,
            page.sort_by.as_deref(),
            page.sort_dir(),
            page.page(),
            page.limit_or(ADMIN_PAGE_SIZE),
        )
        .await?;

    Ok(Json(EnquiryListResponse::new(
        records.into_iter().map(EnquiryResponse::from).collect(),
        page.page(),
        page.limit_or(ADMIN_PAGE_SIZE),
        total,
    )))
}

/// Read one enquiry. Opening a new enquiry marks it viewed, stamped with
/// the reading admin.
async fn get_enquiry(
    AdminUser(admin_id): AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<EnquiryResponse>> {
    let record = state.enquiry_service.admin_get(&admin_id, &id).await?;
    Ok(Json(EnquiryResponse::from(record)))
}

/// Status change request.
#[derive(Debug, Deserialize)]
pub struct UpdateEnquiryStatusRequest {
    pub status: EnquiryStatus,
}

/// Explicitly set an enquiry status.
async fn update_enquiry_status(
    AdminUser(admin_id): AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateEnquiryStatusRequest>,
) -> AppResult<Json<EnquiryResponse>> {
    info!(admin_id = %admin_id, enquiry_id = %id, "Admin updating enquiry status");

    let record = state
        .enquiry_service
        .update_status(&admin_id, &id, req.status)
        .await?;

    Ok(Json(EnquiryResponse::from(record)))
}

/// Delete an enquiry.
async fn delete_enquiry(
    AdminUser(admin_id): AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<MessageResponse>> {
    info!(admin_id = %admin_id, enquiry_id = %id, "Admin deleting enquiry");

    state.enquiry_service.delete(&id).await?;

    Ok(Json(MessageResponse::new("Enquiry deleted")))
}
