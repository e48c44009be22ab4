//! Order submission service.

use std::sync::Arc;

use chrono::Utc;
use markethall_common::{AppResult, SortDir};
use markethall_db::entities::order::{
    BudgetRange, GenderRequired, InfluencersRequired, OrderStatus,
};
use markethall_db::records::Order;
use markethall_db::repositories::{
    NewOrder, OrderFilter, OrderRepository, ProfessionalRepository,
};
use sea_orm::DatabaseConnection;
use validator::Validate;

use crate::moderation::{self, AuditTrail, ModerationTarget};
use crate::services::captcha::CaptchaService;
use crate::services::notification::{Notification, NotificationSender};

/// Content fields of an order, shared by both creation paths.
#[derive(Debug, Clone)]
pub struct OrderInput {
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
}

/// Admin update payload. `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct OrderUpdate {
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

impl OrderUpdate {
    /// A status-only change, see `ProfessionalUpdate::is_status_only`.
    #[must_use]
    pub const fn is_status_only(&self) -> bool {
        self.status.is_some()
            && self.customer_name.is_none()
            && self.customer_email.is_none()
            && self.customer_whatsapp.is_none()
            && self.budget_range.is_none()
            && self.influencers_required.is_none()
            && self.gender_required.is_none()
            && self.languages_required.is_none()
            && self.min_followers.is_none()
            && self.message.is_none()
            && self.admin_comments.is_none()
            && self.is_active.is_none()
    }
}

/// Field rules re-checked when an update touches content fields.
#[derive(Debug, Validate)]
#[validate(schema(function = "exclusive_attribution"))]
struct OrderRules {
    #[validate(length(min = 1))]
    customer_name: String,
    #[validate(email)]
    customer_email: String,
    #[validate(length(min = 1))]
    customer_whatsapp: String,
    #[validate(length(min = 1))]
    languages_required: Vec<String>,
    #[validate(range(min = 0))]
    min_followers: Option<i32>,
    submitted_by: Option<String>,
    submitted_by_admin: Option<String>,
}

// Exactly one creation path owns the record: end user or admin, never both,
// never neither.
fn exclusive_attribution(rules: &OrderRules) -> Result<(), validator::ValidationError> {
    if rules.submitted_by.is_some() == rules.submitted_by_admin.is_some() {
        return Err(validator::ValidationError::new("exclusive_attribution"));
    }
    Ok(())
}

fn validate_merged(record: &Order) -> AppResult<()> {
    let rules = OrderRules {
        customer_name: record.customer_name.clone(),
        customer_email: record.customer_email.clone(),
        customer_whatsapp: record.customer_whatsapp.clone(),
        languages_required: record.languages_required.clone(),
        min_followers: record.min_followers,
        submitted_by: record.submitted_by.clone(),
        submitted_by_admin: record.submitted_by_admin.clone(),
    };
    rules.validate()?;
    Ok(())
}

fn trail_of(record: &Order) -> AuditTrail {
    AuditTrail {
        approved_by: record.approved_by.clone(),
        approved_at: record.approved_at,
        rejected_by: record.rejected_by.clone(),
        rejected_at: record.rejected_at,
        rejection_reason: record.rejection_reason.clone(),
    }
}

fn apply_trail(record: &mut Order, trail: AuditTrail) {
    record.approved_by = trail.approved_by;
    record.approved_at = trail.approved_at;
    record.rejected_by = trail.rejected_by;
    record.rejected_at = trail.rejected_at;
    record.rejection_reason = trail.rejection_reason;
}

/// Order service.
#[derive(Clone)]
pub struct OrderService {
    repo: OrderRepository,
    professionals: ProfessionalRepository,
    captcha: CaptchaService,
    notifications: NotificationSender,
}

impl OrderService {
    /// Create a new order service.
    #[must_use]
    pub fn new(
        db: Arc<DatabaseConnection>,
        captcha: CaptchaService,
        notifications: NotificationSender,
    ) -> Self {
        Self {
            repo: OrderRepository::new(Arc::clone(&db)),
            professionals: ProfessionalRepository::new(db),
            captcha,
            notifications,
        }
    }

    /// Public submission. The referenced professional must be approved and
    /// active; anything else reads as not found before any row is written.
    pub async fn submit(
        &self,
        user_id: &str,
        input: OrderInput,
        captcha_token: Option<&str>,
    ) -> AppResult<Order> {
        self.captcha.check_submission(captcha_token).await?;

        self.professionals
            .get_approved_active(&input.professional_id)
            .await?;

        let new = NewOrder {
            id: crate::generate_id(),
            professional_id: input.professional_id,
            customer_name: input.customer_name,
            customer_email: input.customer_email,
            customer_whatsapp: input.customer_whatsapp,
            budget_range: input.budget_range,
            influencers_required: input.influencers_required,
            gender_required: input.gender_required,
            languages_required: input.languages_required,
            min_followers: input.min_followers,
            message: input.message,
            terms_accepted: input.terms_accepted,
            status: OrderStatus::Pending,
            submitted_by: Some(user_id.to_string()),
            submitted_by_admin: None,
            approved_by: None,
            approved_at: None,
            admin_comments: None,
        };

        let record = self.repo.create(new).await?;

        self.notifications.dispatch(Notification::OrderSubmitted {
            order: record.clone(),
        });

        Ok(record)
    }

    /// Admin-direct creation. Defaults to approved, stamped by the creating
    /// admin; the professional check still applies.
    pub async fn admin_create(
        &self,
        admin_id: &str,
        input: OrderInput,
        status: Option<OrderStatus>,
    ) -> AppResult<Order> {
        self.professionals
            .get_approved_active(&input.professional_id)
            .await?;

        let status = status.unwrap_or(OrderStatus::Approved);
        let (approved_by, approved_at) = if status == OrderStatus::Approved {
            (Some(admin_id.to_string()), Some(Utc::now().into()))
        } else {
            (None, None)
        };

        let new = NewOrder {
            id: crate::generate_id(),
            professional_id: input.professional_id,
            customer_name: input.customer_name,
            customer_email: input.customer_email,
            customer_whatsapp: input.customer_whatsapp,
            budget_range: input.budget_range,
            influencers_required: input.influencers_required,
            gender_required: input.gender_required,
            languages_required: input.languages_required,
            min_followers: input.min_followers,
            message: input.message,
            terms_accepted: input.terms_accepted,
            status,
            submitted_by: None,
            submitted_by_admin: Some(admin_id.to_string()),
            approved_by,
            approved_at,
            admin_comments: None,
        };

        self.repo.create(new).await
    }

    /// Admin list.
    pub async fn list(
        &self,
        filter: OrderFilter,
        sort_by: Option<&str>,
        sort_dir: SortDir,
        page: u64,
        limit: u64,
    ) -> AppResult<(Vec<Order>, u64)> {
        self.repo.list(filter, sort_by, sort_dir, page, limit).await
    }

    /// Admin list of one professional's orders.
    pub async fn list_for_professional(
        &self,
        professional_id: &str,
        sort_dir: SortDir,
        page: u64,
        limit: u64,
    ) -> AppResult<(Vec<Order>, u64)> {
        let filter = OrderFilter {
            professional_id: Some(professional_id.to_string()),
            ..OrderFilter::default()
        };
        self.repo.list(filter, None, sort_dir, page, limit).await
    }

    /// Admin get.
    pub async fn get(&self, id: &str) -> AppResult<Order> {
        self.repo.get(id).await
    }

    /// Admin update. Mirrors the professional flow: moderation transitions
    /// restamp the audit trail, completion only bumps `updated_at`, and a
    /// notification goes out only for approved, rejected or completed.
    pub async fn admin_update(
        &self,
        admin_id: &str,
        id: &str,
        update: OrderUpdate,
    ) -> AppResult<Order> {
        let mut record = self.repo.get(id).await?;
        let status_only = update.is_status_only();
        let mut notify = false;

        if let Some(target) = update.status {
            if target != record.status {
                let trail = moderation::transition(
                    &trail_of(&record),
                    ModerationTarget::from(target),
                    admin_id,
                    update.rejection_reason.as_deref(),
                    Utc::now(),
                )?;
                apply_trail(&mut record, trail);
                record.status = target;
                notify = moderation::is_notifiable(ModerationTarget::from(target));
            }
        }

        // Amending the reason on a row that stays rejected is a plain field
        // edit, no transition involved.
        if record.status == OrderStatus::Rejected && update.rejection_reason.is_some() {
            record.rejection_reason = update.rejection_reason;
        }

        if let Some(customer_name) = update.customer_name {
            record.customer_name = customer_name;
        }
        if let Some(customer_email) = update.customer_email {
            record.customer_email = customer_email;
        }
        if let Some(customer_whatsapp) = update.customer_whatsapp {
            record.customer_whatsapp = customer_whatsapp;
        }
        if let Some(budget_range) = update.budget_range {
            record.budget_range = budget_range;
        }
        if let Some(influencers_required) = update.influencers_required {
            record.influencers_required = influencers_required;
        }
        if let Some(gender_required) = update.gender_required {
            record.gender_required = gender_required;
        }
        if let Some(languages_required) = update.languages_required {
            record.languages_required = languages_required;
        }
        if let Some(min_followers) = update.min_followers {
            record.min_followers = Some(min_followers);
        }
        if let Some(message) = update.message {
            record.message = Some(message);
        }
        if let Some(admin_comments) = update.admin_comments {
            record.admin_comments = Some(admin_comments);
        }
        if let Some(is_active) = update.is_active {
            record.is_active = is_active;
        }

        if !status_only {
            validate_merged(&record)?;
        }

        let updated = self.repo.update(record).await?;

        if notify {
            self.notifications.dispatch(Notification::OrderStatusChanged {
                order: updated.clone(),
            });
        }

        Ok(updated)
    }

    /// Hard delete.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        self.repo.delete(id).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use markethall_common::AppError;
    use markethall_db::entities::{order, professional, professional::ProfessionalStatus};
    use sea_orm::{DatabaseBackend, MockDatabase};

    use crate::services::captcha::ScoreProvider;
    use crate::services::notification::NotificationService;

    struct PassingProvider;

    #[async_trait]
    impl ScoreProvider for PassingProvider {
        async fn verify(&self, _token: &str) -> Option<f64> {
            Some(1.0)
        }
    }

    fn passing_captcha() -> CaptchaService {
        CaptchaService::with_provider(Arc::new(PassingProvider), true, 0.5)
    }

    fn input() -> OrderInput {
        OrderInput {
            professional_id: "p1".to_string(),
            customer_name: "Sara".to_string(),
            customer_email: "sara@example.com".to_string(),
            customer_whatsapp: "+971500000000".to_string(),
            budget_range: BudgetRange::From26kTo50k,
            influencers_required: InfluencersRequired::From11To25,
            gender_required: GenderRequired::Both,
            languages_required: vec!["english".to_string()],
            min_followers: None,
            message: None,
            terms_accepted: true,
        }
    }

    fn professional_model(status: ProfessionalStatus) -> professional::Model {
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
            status,
            submitted_by: None,
            submitted_by_admin: Some("admin1".to_string()),
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

    fn order_model(status: OrderStatus) -> order::Model {
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
            status,
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

    fn service(db: Arc<DatabaseConnection>) -> OrderService {
        let notifications = NotificationService::new();
        OrderService::new(db, passing_captcha(), notifications.sender())
    }

    #[tokio::test]
    async fn submit_against_pending_professional_is_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[professional_model(ProfessionalStatus::Pending)]])
                .into_connection(),
        );

        let svc = service(Arc::clone(&db));
        let result = svc.submit("user1", input(), Some("tok")).await;
        drop(svc);

        assert!(matches!(result, Err(AppError::NotFound(_))));

        // Only the professional lookup ran; nothing was inserted.
        let log = Arc::try_unwrap(db).unwrap().into_transaction_log();
        assert_eq!(log.len(), 1);
        assert!(!format!("{:?}", log[0]).contains("INSERT"));
    }

    #[tokio::test]
    async fn submit_succeeds_with_dropped_notification_receiver() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[professional_model(ProfessionalStatus::Approved)]])
                .append_query_results([[order_model(OrderStatus::Pending)]])
                .into_connection(),
        );

        let notifications = NotificationService::new();
        let sender = notifications.sender();
        drop(notifications);

        let svc = OrderService::new(db, passing_captcha(), sender);
        let record = svc.submit("user1", input(), Some("tok")).await.unwrap();

        assert_eq!(record.status, OrderStatus::Pending);
        assert_eq!(record.submitted_by.as_deref(), Some("user1"));
    }

    #[tokio::test]
    async fn completing_keeps_the_audit_trail() {
        let mut stored = order_model(OrderStatus::Approved);
        stored.approved_by = Some("admin1".to_string());
        stored.approved_at = Some(Utc::now().into());

        let mut completed = stored.clone();
        completed.status = OrderStatus::Completed;

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[stored]])
                .append_query_results([[completed]])
                .into_connection(),
        );

        let svc = service(db);
        let update = OrderUpdate {
            status: Some(OrderStatus::Completed),
            ..OrderUpdate::default()
        };
        let record = svc.admin_update("admin2", "o1", update).await.unwrap();

        assert_eq!(record.status, OrderStatus::Completed);
        assert_eq!(record.approved_by.as_deref(), Some("admin1"));
    }

    #[tokio::test]
    async fn rejection_reason_can_be_amended_without_a_transition() {
        let mut stored = order_model(OrderStatus::Rejected);
        stored.rejected_by = Some("admin1".to_string());
        stored.rejected_at = Some(Utc::now().into());
        stored.rejection_reason = Some("budget too low".to_string());

        let mut amended = stored.clone();
        amended.rejection_reason = Some("unreachable customer".to_string());

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[stored]])
                .append_query_results([[amended]])
                .into_connection(),
        );

        let svc = service(Arc::clone(&db));
        let update = OrderUpdate {
            rejection_reason: Some("unreachable customer".to_string()),
            ..OrderUpdate::default()
        };
        let record = svc.admin_update("admin2", "o1", update).await.unwrap();
        drop(svc);

        assert_eq!(record.rejection_reason.as_deref(), Some("unreachable customer"));
        assert_eq!(record.rejected_by.as_deref(), Some("admin1"));

        let log = Arc::try_unwrap(db).unwrap().into_transaction_log();
        assert!(format!("{:?}", log[1]).contains("unreachable customer"));
    }

    #[tokio::test]
    async fn attribution_on_both_sides_fails_validation() {
        let mut stored = order_model(OrderStatus::Approved);
        stored.submitted_by_admin = Some("admin1".to_string());

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[stored]])
                .into_connection(),
        );

        let svc = service(db);
        let update = OrderUpdate {
            message: Some("please call first".to_string()),
            ..OrderUpdate::default()
        };
        let result = svc.admin_update("admin1", "o1", update).await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }
}
