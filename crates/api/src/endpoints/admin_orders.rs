//! Admin order moderation endpoints.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
};
use markethall_common::{AppResult, PageRequest, SortDir};
use markethall_core::OrderUpdate;
use markethall_db::entities::order::{
    BudgetRange, GenderRequired, InfluencersRequired, OrderStatus,
};
use markethall_db::repositories::OrderFilter;
use serde::Deserialize;
use tracing::info;
use validator::Validate;

use super::orders::{OrderFields, OrderListResponse, OrderResponse};
use crate::{extractors::AdminUser, middleware::AppState, response::MessageResponse};

/// Default page size for admin order lists.
const ADMIN_PAGE_SIZE: u64 = 12;

/// Create admin order router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_orders).post(create_order))
        .route(
            "/{id}",
            get(get_order).put(update_order).delete(delete_order),
        )
}

/// Admin order list query.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListOrdersQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub sort_by: Option<String>,
    pub sort_order: Option<SortDir>,
    pub status: Option<OrderStatus>,
    pub professional_id: Option<String>,
    pub customer_email: Option<String>,
    pub search: Option<String>,
}

/// Admin order list.
async fn list_orders(
    AdminUser(_admin_id): AdminUser,
    State(state): State<AppState>,
    Query(query): Query<ListOrdersQuery>,
) -> AppResult<Json<OrderListResponse>> {
    let page = PageRequest {
        page: query.page,
        limit: query.limit,
        sort_by: query.sort_by,
        sort_order: query.sort_order,
    };
    let filter = OrderFilter {
        status: query.status,
        professional_id: query.professional_id,
        customer_email: query.customer_email,
        search: query.search,
    };

    let (records, total) = state
        .order_service
        .list(
            filter,
            page.sort_by.as_deref(),
            page.sort_dir(),
            page.page(),
            page.limit_or(ADMIN_PAGE_SIZE),
        )
        .await?;

    Ok(Json(OrderListResponse::new(
        records.into_iter().map(OrderResponse::from).collect(),
        page.page(),
        page.limit_or(ADMIN_PAGE_SIZE),
        total,
    )))
}

/// Admin-direct order creation request.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    #[serde(flatten)]
    #[validate(nested)]
    pub order: OrderFields,
    /// Defaults to approved when omitted.
    pub status: Option<OrderStatus>,
}

/// Create an order directly. The professional check still applies.
async fn create_order(
    AdminUser(admin_id): AdminUser,
    State(state): State<AppState>,
    Json(req): Json<CreateOrderRequest>,
) -> AppResult<(StatusCode, Json<OrderResponse>)> {
    req.validate()?;

    info!(admin_id = %admin_id, "Admin creating order");

    let record = state
        .order_service
        .admin_create(&admin_id, req.order.into_input(), req.status)
        .await?;

    Ok((StatusCode::CREATED, Json(OrderResponse::from(record))))
}

/// Get any order.
async fn get_order(
    AdminUser(_admin_id): AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<OrderResponse>> {
    let record = state.order_service.get(&id).await?;
    Ok(Json(OrderResponse::from(record)))
}

/// Admin order update request. Omitted fields are left unchanged.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOrderRequest {
    pub customer_name: Option<String>,
    pub customer_email: Option<String>,
    pub customer_whatsapp: Option<String>,
    pub budget_range: Option<BudgetRange>,
    pub influencers_required: Option<InfluencersRequired>,
    pub gender_required: Option<GenderRequired>,
    pub languages_required: Option<Vec<String>>,
    pub min_followers: Option<i32>,
    pub message: Option<String>,
    pub status: Option<OrderStatus>,
    pub rejection_reason: Option<String>,
    pub admin_comments: Option<String>,
    pub is_active: Option<bool>,
}

/// Update an order. Status changes run the moderation state machine.
async fn update_order(
    AdminUser(admin_id): AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateOrderRequest>,
) -> AppResult<Json<OrderResponse>> {
    info!(admin_id = %admin_id, order_id = %id, "Admin updating order");

    let update = OrderUpdate {
        customer_name: req.customer_name,
        customer_email: req.customer_email,
        customer_whatsapp: req.customer_whatsapp,
        budget_range: req.budget_range,
        influencers_required: req.influencers_required,
        gender_required: req.gender_required,
        languages_required: req.languages_required,
        min_followers: req.min_followers,
        message: req.message,
        status: req.status,
        rejection_reason: req.rejection_reason,
        admin_comments: req.admin_comments,
        is_active: req.is_active,
    };

    let record = state.order_service.admin_update(&admin_id, &id, update).await?;

    Ok(Json(OrderResponse::from(record)))
}

/// Delete an order.
async fn delete_order(
    AdminUser(admin_id): AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<MessageResponse>> {
    info!(admin_id = %admin_id, order_id = %id, "Admin deleting order");

    state.order_service.delete(&id).await?;

    Ok(Json(MessageResponse::new("Order deleted")))
}
