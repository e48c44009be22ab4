//! Order repository.

use std::sync::Arc;

use crate::entities::{
    Order as OrderEntity,
    order::{self, BudgetRange, GenderRequired, InfluencersRequired, OrderStatus},
};
use crate::query::ListQuery;
use crate::records::Order;
use crate::repositories::{decode_languages, encode_languages};
use markethall_common::{AppError, AppResult, SortDir};
use sea_orm::sea_query::{Expr, extension::postgres::PgExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, ModelTrait, Set,
};

/// Typed filter for order lists.
#[derive(Debug, Clone, Default)]
pub struct OrderFilter {
    pub status: Option<OrderStatus>,
    pub professional_id: Option<String>,
    pub customer_email: Option<String>,
    /// Case-insensitive substring over customer name and email.
    pub search: Option<String>,
}

impl OrderFilter {
    /// Resolve the filter into a single condition.
    #[must_use]
    pub fn into_condition(self) -> Condition {
        let mut condition = Condition::all();

        if let Some(status) = self.status {
            condition = condition.add(order::Column::Status.eq(status));
        }
        if let Some(professional_id) = self.professional_id {
            condition = condition.add(order::Column::ProfessionalId.eq(professional_id));
        }
        if let Some(customer_email) = self.customer_email {
            condition = condition.add(order::Column::CustomerEmail.eq(customer_email));
        }
        if let Some(search) = self.search {
            let pattern = format!("%{search}%");
            condition = condition.add(
                Condition::any()
                    .add(Expr::col(order::Column::CustomerName).ilike(pattern.clone()))
                    .add(Expr::col(order::Column::CustomerEmail).ilike(pattern)),
            );
        }

        condition
    }

    /// Resolve a requested sort column against the allow list.
    #[must_use]
    pub fn sort_column(name: Option<&str>) -> order::Column {
        match name {
            Some("customer_name") => order::Column::CustomerName,
            Some("status") => order::Column::Status,
            Some("updated_at") => order::Column::UpdatedAt,
            _ => order::Column::CreatedAt,
        }
    }
}

/// Insert payload for an order row. Forced fields are decided by the
/// calling service.
#[derive(Debug, Clone)]
pub struct NewOrder {
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
    pub approved_at: Option<sea_orm::entity::prelude::DateTimeWithTimeZone>,
    pub admin_comments: Option<String>,
}

/// Order repository for database operations.
#[derive(Clone)]
pub struct OrderRepository {
    db: Arc<DatabaseConnection>,
}

impl OrderRepository {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Insert a new order.
    pub async fn create(&self, new: NewOrder) -> AppResult<Order> {
        let now = chrono::Utc::now();

        let model = order::ActiveModel {
            id: Set(new.id),
            professional_id: Set(new.professional_id),
            customer_name: Set(new.customer_name),
            customer_email: Set(new.customer_email),
            customer_whatsapp: Set(new.customer_whatsapp),
            budget_range: Set(new.budget_range),
            influencers_required: Set(new.influencers_required),
            gender_required: Set(new.gender_required),
            languages_required: Set(encode_languages(&new.languages_required)),
            min_followers: Set(new.min_followers),
            message: Set(new.message),
            terms_accepted: Set(new.terms_accepted),
            status: Set(new.status),
            submitted_by: Set(new.submitted_by),
            submitted_by_admin: Set(new.submitted_by_admin),
            approved_by: Set(new.approved_by),
            approved_at: Set(new.approved_at),
            rejected_by: Set(None),
            rejected_at: Set(None),
            rejection_reason: Set(None),
            admin_comments: Set(new.admin_comments),
            is_active: Set(true),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };

        model
            .insert(self.db.as_ref())
            .await
            .map(to_record)
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get an order by ID.
    pub async fn get(&self, id: &str) -> AppResult<Order> {
        OrderEntity::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
            .map(to_record)
            .ok_or_else(|| AppError::NotFound(format!("Order {id} not found")))
    }

    /// List orders matching a filter.
    pub async fn list(
        &self,
        filter: OrderFilter,
        sort_by: Option<&str>,
        sort_dir: SortDir,
        page: u64,
        limit: u64,
    ) -> AppResult<(Vec<Order>, u64)> {
        let query: ListQuery<OrderEntity> = ListQuery::new(
            filter.into_condition(),
            OrderFilter::sort_column(sort_by),
            sort_dir,
            page,
            limit,
        );

        let (models, total) = query.fetch(self.db.as_ref()).await?;
        Ok((models.into_iter().map(to_record).collect(), total))
    }

    /// Persist the full state of a record. `updated_at` is restamped here.
    pub async fn update(&self, record: Order) -> AppResult<Order> {
        let model = order::ActiveModel {
            id: Set(record.id),
            professional_id: Set(record.professional_id),
            customer_name: Set(record.customer_name),
            customer_email: Set(record.customer_email),
            customer_whatsapp: Set(record.customer_whatsapp),
            budget_range: Set(record.budget_range),
            influencers_required: Set(record.influencers_required),
            gender_required: Set(record.gender_required),
            languages_required: Set(encode_languages(&record.languages_required)),
            min_followers: Set(record.min_followers),
            message: Set(record.message),
            terms_accepted: Set(record.terms_accepted),
            status: Set(record.status),
            submitted_by: Set(record.submitted_by),
            submitted_by_admin: Set(record.submitted_by_admin),
            approved_by: Set(record.approved_by),
            approved_at: Set(record.approved_at),
            rejected_by: Set(record.rejected_by),
            rejected_at: Set(record.rejected_at),
            rejection_reason: Set(record.rejection_reason),
            admin_comments: Set(record.admin_comments),
            is_active: Set(record.is_active),
            created_at: Set(record.created_at),
            updated_at: Set(chrono::Utc::now().into()),
        };

        model
            .update(self.db.as_ref())
            .await
            .map(to_record)
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Hard delete an order.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        let model = OrderEntity::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
            .ok_or_else(|| AppError::NotFound(format!("Order {id} not found")))?;

        model
            .delete(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }
}

fn to_record(model: order::Model) -> Order {
    let languages_required =
        decode_languages("campaign_order", &model.id, &model.languages_required);
    Order {
        id: model.id,
        professional_id: model.professional_id,
        customer_name: model.customer_name,
        customer_email: model.customer_email,
        customer_whatsapp: model.customer_whatsapp,
        budget_range: model.budget_range,
        influencers_required: model.influencers_required,
        gender_required: model.gender_required,
        languages_required,
        min_followers: model.min_followers,
        message: model.message,
        terms_accepted: model.terms_accepted,
        status: model.status,
        submitted_by: model.submitted_by,
        submitted_by_admin: model.submitted_by_admin,
        approved_by: model.approved_by,
        approved_at: model.approved_at,
        rejected_by: model.rejected_by,
        rejected_at: model.rejected_at,
        rejection_reason: model.rejection_reason,
        admin_comments: model.admin_comments,
        is_active: model.is_active,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, DbBackend, MockDatabase, QueryFilter, QueryTrait};

    pub(crate) fn test_model(id: &str, status: OrderStatus) -> order::Model {
        order::Model {
            id: id.to_string(),
            professional_id: "p1".to_string(),
            customer_name: "Sara".to_string(),
            customer_email: "sara@example.com".to_string(),
            customer_whatsapp: "+971500000000".to_string(),
            budget_range: BudgetRange::From26kTo50k,
            influencers_required: InfluencersRequired::From11To25,
            gender_required: GenderRequired::Both,
            languages_required: r#"["english"]"#.to_string(),
            min_followers: Some(5000),
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

    #[tokio::test]
    async fn get_decodes_required_languages() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[test_model("o1", OrderStatus::Pending)]])
                .into_connection(),
        );

        let repo = OrderRepository::new(db);
        let record = repo.get("o1").await.unwrap();

        assert_eq!(record.languages_required, vec!["english"]);
    }

    #[test]
    fn filter_binds_professional_and_email() {
        let filter = OrderFilter {
            status: Some(OrderStatus::Pending),
            professional_id: Some("p1".to_string()),
            customer_email: Some("sara@example.com".to_string()),
            ..OrderFilter::default()
        };

        let sql = OrderEntity::find()
            .filter(filter.into_condition())
            .build(DbBackend::Postgres)
            .sql;

        assert!(sql.contains("\"professional_id\" ="));
        assert!(!sql.contains("sara@example.com"), "values must be bound: {sql}");
    }

    #[test]
    fn unknown_sort_falls_back_to_created_at() {
        assert!(matches!(
            OrderFilter::sort_column(Some("budget_range; --")),
            order::Column::CreatedAt
        ));
    }
}
