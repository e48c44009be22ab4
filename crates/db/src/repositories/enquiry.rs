//! Enquiry repository.

use std::sync::Arc;

use crate::entities::{
    Enquiry as EnquiryEntity,
    enquiry::{self, EnquiryStatus},
};
use crate::query::ListQuery;
use crate::records::Enquiry;
use markethall_common::{AppError, AppResult, SortDir};
use sea_orm::sea_query::{Expr, extension::postgres::PgExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, ModelTrait, Set,
};

/// Typed filter for enquiry lists.
#[derive(Debug, Clone, Default)]
pub struct EnquiryFilter {
    pub status: Option<EnquiryStatus>,
    /// Case-insensitive substring over name, email and company.
    pub search: Option<String>,
}

impl EnquiryFilter {
    /// Resolve the filter into a single condition.
    #[must_use]
    pub fn into_condition(self) -> Condition {
        let mut condition = Condition::all();

        if let Some(status) = self.status {
            condition = condition.add(enquiry::Column::Status.eq(status));
        }
        if let Some(search) = self.search {
            let pattern = format!("%{search}%");
            condition = condition.add(
                Condition::any()
                    .add(Expr::col(enquiry::Column::Name).ilike(pattern.clone()))
                    .add(Expr::col(enquiry::Column::Email).ilike(pattern.clone()))
                    .add(Expr::col(enquiry::Column::Company).ilike(pattern)),
            );
        }

        condition
    }

    /// Resolve a requested sort column against the allow list.
    #[must_use]
    pub fn sort_column(name: Option<&str>) -> enquiry::Column {
        match name {
            Some("name") => enquiry::Column::Name,
            Some("email") => enquiry::Column::Email,
            Some("status") => enquiry::Column::Status,
            Some("updated_at") => enquiry::Column::UpdatedAt,
            _ => enquiry::Column::CreatedAt,
        }
    }
}

/// Insert payload for an enquiry row.
#[derive(Debug, Clone)]
pub struct NewEnquiry {
    pub id: String,
    pub name: String,
    pub email: String,
    pub company: Option<String>,
    pub message: Option<String>,
    pub terms_accepted: bool,
    pub submitted_by: Option<String>,
}

/// Enquiry repository for database operations.
#[derive(Clone)]
pub struct EnquiryRepository {
    db: Arc<DatabaseConnection>,
}

impl EnquiryRepository {
    /// Create a new enquiry repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Insert a new enquiry. Enquiries always start in `new`.
    pub async fn create(&self, new: NewEnquiry) -> AppResult<Enquiry> {
        let now = chrono::Utc::now();

        let model = enquiry::ActiveModel {
            id: Set(new.id),
            name: Set(new.name),
            email: Set(new.email),
            company: Set(new.company),
            message: Set(new.message),
            terms_accepted: Set(new.terms_accepted),
            status: Set(EnquiryStatus::New),
            viewed_by: Set(None),
            viewed_at: Set(None),
            submitted_by: Set(new.submitted_by),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };

        model
            .insert(self.db.as_ref())
            .await
            .map(to_record)
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get an enquiry by ID.
    pub async fn get(&self, id: &str) -> AppResult<Enquiry> {
        EnquiryEntity::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
            .map(to_record)
            .ok_or_else(|| AppError::NotFound(format!("Enquiry {id} not found")))
    }

    /// List enquiries matching a filter.
    pub async fn list(
        &self,
        filter: EnquiryFilter,
        sort_by: Option<&str>,
        sort_dir: SortDir,
        page: u64,
        limit: u64,
    ) -> AppResult<(Vec<Enquiry>, u64)> {
        let query: ListQuery<EnquiryEntity> = ListQuery::new(
            filter.into_condition(),
            EnquiryFilter::sort_column(sort_by),
            sort_dir,
            page,
            limit,
        );

        let (models, total) = query.fetch(self.db.as_ref()).await?;
        Ok((models.into_iter().map(to_record).collect(), total))
    }

    /// Persist the full state of a record. `updated_at` is restamped here.
    pub async fn update(&self, record: Enquiry) -> AppResult<Enquiry> {
        let model = enquiry::ActiveModel {
            id: Set(record.id),
            name: Set(record.name),
            email: Set(record.email),
            company: Set(record.company),
            message: Set(record.message),
            terms_accepted: Set(record.terms_accepted),
            status: Set(record.status),
            viewed_by: Set(record.viewed_by),
            viewed_at: Set(record.viewed_at),
            submitted_by: Set(record.submitted_by),
            created_at: Set(record.created_at),
            updated_at: Set(chrono::Utc::now().into()),
        };

        model
            .update(self.db.as_ref())
            .await
            .map(to_record)
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Hard delete an enquiry.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        let model = EnquiryEntity::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
            .ok_or_else(|| AppError::NotFound(format!("Enquiry {id} not found")))?;

        model
            .delete(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }
}

fn to_record(model: enquiry::Model) -> Enquiry {
    Enquiry {
        id: model.id,
        name: model.name,
        email: model.email,
        company: model.company,
        message: model.message,
        terms_accepted: model.terms_accepted,
        status: model.status,
        viewed_by: model.viewed_by,
        viewed_at: model.viewed_at,
        submitted_by: model.submitted_by,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}
