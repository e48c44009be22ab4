//! Public order submission endpoint.

use axum::{Json, Router, extract::State, http::StatusCode, routing::post};
use chrono::{DateTime, FixedOffset};
use markethall_common::{AppResult, Pagination};
use markethall_core::OrderInput;
use markethall_db::entities::order::{
    BudgetRange, GenderRequired, InfluencersRequired, OrderStatus,
};
use markethall_db::records::Order;
use serde::{Deserialize, Serialize};
use tracing::info;
use validator::{Validate, ValidationError};

use crate::{extractors::AuthUser, middleware::AppState};

/// Create public order router.
pub fn router() -> Router<AppState> {
    Router::new().route("/", post(submit_order))
}

/// Order response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    pub id: String,
    pub professional_id: String,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_whatsapp: String,
    pub budget_range: BudgetRange,
    pub influencers_required: InfluencersRequired,
    pub gender_required: GenderRequired,
    pub languages_required: Vec<String>,
    pub min_followers: Option<i32>,
    pub message: Option<String>,
    pub terms_accepted: bool,
    pub status: OrderStatus,
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

impl From<Order> for OrderResponse {
    fn from(record: Order) -> Self {
        Self {
            id: record.id,
            professional_id: record.professional_id,
            customer_name: record.customer_name,
            customer_email: record.customer_email,
            customer_whatsapp: record.customer_whatsapp,
            budget_range: record.budget_range,
            influencers_required: record.influencers_required,
            gender_required: record.gender_required,
            languages_required: record.languages_required,
            min_followers: record.min_followers,
            message: record.message,
            terms_accepted: record.terms_accepted,
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

/// Order list response.
#[derive(Debug, Serialize)]
pub struct OrderListResponse {
    pub orders: Vec<OrderResponse>,
    pub pagination: Pagination,
}

impl OrderListResponse {
    /// Build the envelope from a served page and the total row count.
    #[must_use]
    pub const fn new(orders: Vec<OrderResponse>, page: u64, limit: u64, total: u64) -> Self {
        Self {
            orders,
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

/// Content fields of an order, shared by the public and admin creation
/// requests.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct OrderFields {
    #[validate(length(min = 1))]
    pub professional_id: String,
    #[validate(length(min = 1))]
    pub customer_name: String,
    #[validate(email)]
    pub customer_email: String,
    #[validate(length(min = 1))]
    pub customer_whatsapp: String,
    pub budget_range: BudgetRange,
    pub influencers_required: InfluencersRequired,
    pub gender_required: GenderRequired,
    #[validate(length(min = 1))]
    pub languages_required: Vec<String>,
    #[validate(range(min = 0))]
    pub min_followers: Option<i32>,
    pub message: Option<String>,
    #[validate(custom(function = "accepted"))]
    pub terms_accepted: bool,
}

impl OrderFields {
    pub fn into_input(self) -> OrderInput {
        OrderInput {
            professional_id: self.professional_id,
            customer_name: self.customer_name,
            customer_email: self.customer_email,
            customer_whatsapp: self.customer_whatsapp,
            budget_range: self.budget_range,
            influencers_required: self.influencers_required,
            gender_required: self.gender_required,
            languages_required: self.languages_required,
            min_followers: self.min_followers,
            message: self.message,
            terms_accepted: self.terms_accepted,
        }
    }
}

/// Public order submission request.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SubmitOrderRequest {
    #[serde(flatten)]
    #[validate(nested)]
    pub order: OrderFields,
    pub captcha_token: Option<String>,
}

/// Submit an order against an approved professional.
async fn submit_order(
    AuthUser(user_id): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<SubmitOrderRequest>,
) -> AppResult<(StatusCode, Json<OrderResponse>)> {
    req.validate()?;

    info!(user_id = %user_id, professional_id = %req.order.professional_id, "Order submission received");

    let record = state
        .order_service
        .submit(&user_id, req.order.into_input(), req.captcha_token.as_deref())
        .await?;

    Ok((StatusCode::CREATED, Json(OrderResponse::from(record))))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use chrono::Utc;
    use markethall_core::{CaptchaService, NotificationService, OrderService, ScoreProvider};
    use markethall_db::entities::{order, professional, professional::ProfessionalStatus};
    use sea_orm::{DatabaseBackend, MockDatabase};

    use super::*;

    struct PassingProvider;

    #[async_trait]
    impl ScoreProvider for PassingProvider {
        async fn verify(&self, _token: &str) -> Option<f64> {
            Some(1.0)
        }
    }

    fn approved_professional() -> professional::Model {
        professional::Model {
            id: "p1".to_string(),
            first_name: "Amina".to_string(),
            last_name: "Hassan".to_string(),
            email: None,
            profile_url: None,
            linkedin_url: None,
            tiktok_url: None,
            facebook_url: None,
            youtube_url: None,
            followers_count: None,
            verified: false,
            agency_owner: false,
            agent: true,
            developer_employee: false,
            gender: None,
            nationality: None,
            city: None,
            languages: "[]".to_string(),
            image_url: None,
            status: ProfessionalStatus::Approved,
            submitted_by: None,
            submitted_by_admin: Some("admin1".to_string()),
            approved_by: Some("admin1".to_string()),
            approved_at: Some(Utc::now().into()),
            rejected_by: None,
            rejected_at: None,
            rejection_reason: None,
            admin_comments: None,
            is_active: true,
            created_at: Utc::now().into(),
            updated_at: Utc::now().into(),
        }
    }

    fn pending_order() -> order::Model {
        order::Model {
            id: "o1".to_string(),
            professional_id: "p1".to_string(),
            customer_name: "Sara".to_string(),
            customer_email: "sara@example.com".to_string(),
            customer_whatsapp: "+971500000000".to_string(),
            budget_range: BudgetRange::From26kTo50k,
            influencers_required: InfluencersRequired::From11To25,
            gender_required: GenderRequired::Both,
            languages_required: r#"["english"]"#.to_string(),
            min_followers: None,
            message: None,
            terms_accepted: true,
            status: OrderStatus::Pending,
            submitted_by: Some("user1".to_string()),
            submitted_by_admin: None,
            approved_by: None,
            approved_at: None,
            rejected_by: None,
            rejected_at: None,
            rejection_reason: None,
            admin_comments: None,
            is_active: true,
            created_at: Utc::now().into(),
            updated_at: Utc::now().into(),
        }
    }

    fn payload() -> serde_json::Value {
        serde_json::json!({
            "professionalId": "p1",
            "customerName": "Sara",
            "customerEmail": "sara@example.com",
            "customerWhatsapp": "+971500000000",
            "budgetRange": "26k-50k",
            "influencersRequired": "11-25",
            "genderRequired": "both",
            "languagesRequired": ["english"],
            "termsAccepted": true
        })
    }

    #[test]
    fn terms_must_be_accepted() {
        let mut body = payload();
        body["termsAccepted"] = serde_json::json!(false);
        let req: SubmitOrderRequest = serde_json::from_value(body).unwrap();

        assert!(req.validate().is_err());
    }

    #[test]
    fn languages_required_must_not_be_empty() {
        let mut body = payload();
        body["languagesRequired"] = serde_json::json!([]);
        let req: SubmitOrderRequest = serde_json::from_value(body).unwrap();

        assert!(req.validate().is_err());
    }

    #[tokio::test]
    async fn client_supplied_status_and_attribution_never_reach_the_insert() {
        let mut body = payload();
        body["status"] = serde_json::json!("approved");
        body["submittedByAdmin"] = serde_json::json!("admin9");
        body["captchaToken"] = serde_json::json!("tok");
        let req: SubmitOrderRequest = serde_json::from_value(body).unwrap();
        req.validate().unwrap();

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[approved_professional()]])
                .append_query_results([[pending_order()]])
                .into_connection(),
        );
        let notifications = NotificationService::new();
        let svc = OrderService::new(
            Arc::clone(&db),
            CaptchaService::with_provider(Arc::new(PassingProvider), true, 0.5),
            notifications.sender(),
        );

        let record = svc
            .submit("user1", req.order.into_input(), req.captcha_token.as_deref())
            .await
            .unwrap();
        drop(svc);

        assert_eq!(record.status, OrderStatus::Pending);
        assert!(record.submitted_by_admin.is_none());

        let log = Arc::try_unwrap(db).unwrap().into_transaction_log();
        let insert = format!("{:?}", log[1]);
        assert!(insert.contains("INSERT"));
        assert!(insert.contains("pending"));
        assert!(!insert.contains("admin9"));
    }

    #[test]
    fn bracket_values_deserialize_by_wire_name() {
        let req: SubmitOrderRequest = serde_json::from_value(payload()).unwrap();

        assert!(req.validate().is_ok());
        assert_eq!(req.order.budget_range, BudgetRange::From26kTo50k);
        assert_eq!(req.order.influencers_required, InfluencersRequired::From11To25);
    }
}
