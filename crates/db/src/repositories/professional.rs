//! Professional repository.

use std::sync::Arc;

use crate::entities::{
    Professional as ProfessionalEntity,
    professional::{self, ProfessionalStatus},
};
use crate::query::ListQuery;
use crate::records::Professional;
use crate::repositories::{decode_languages, encode_languages};
use markethall_common::{AppError, AppResult, SortDir};
use sea_orm::sea_query::{Expr, extension::postgres::PgExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, ModelTrait, Set,
};
use serde::Deserialize;

/// Role filter values accepted on the public directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfessionType {
    AgencyOwner,
    Agent,
    DeveloperEmployee,
}

/// Typed filter for professional lists. Every variant maps onto a fixed
/// column; request strings only ever select values.
#[derive(Debug, Clone, Default)]
pub struct ProfessionalFilter {
    pub status: Option<ProfessionalStatus>,
    pub is_active: Option<bool>,
    pub gender: Option<String>,
    pub nationality: Option<String>,
    pub city: Option<String>,
    pub profession_type: Option<ProfessionType>,
    /// Matches rows whose language list contains this value.
    pub language: Option<String>,
    /// Case-insensitive substring over first and last name.
    pub search: Option<String>,
}

impl ProfessionalFilter {
    /// Resolve the filter into a single condition.
    #[must_use]
    pub fn into_condition(self) -> Condition {
        let mut condition = Condition::all();

        if let Some(status) = self.status {
            condition = condition.add(professional::Column::Status.eq(status));
        }
        if let Some(is_active) = self.is_active {
            condition = condition.add(professional::Column::IsActive.eq(is_active));
        }
        if let Some(gender) = self.gender {
            condition = condition.add(professional::Column::Gender.eq(gender));
        }
        if let Some(nationality) = self.nationality {
            condition = condition.add(professional::Column::Nationality.eq(nationality));
        }
        if let Some(city) = self.city {
            condition = condition.add(professional::Column::City.eq(city));
        }
        if let Some(profession_type) = self.profession_type {
            let column = match profession_type {
                ProfessionType::AgencyOwner => professional::Column::AgencyOwner,
                ProfessionType::Agent => professional::Column::Agent,
                ProfessionType::DeveloperEmployee => professional::Column::DeveloperEmployee,
            };
            condition = condition.add(column.eq(true));
        }
        if let Some(language) = self.language {
            // Languages are stored as a JSON array of strings; a quoted
            // substring match selects exact membership.
            condition = condition
                .add(Expr::col(professional::Column::Languages).ilike(format!("%\"{language}\"%")));
        }
        if let Some(search) = self.search {
            let pattern = format!("%{search}%");
            condition = condition.add(
                Condition::any()
                    .add(Expr::col(professional::Column::FirstName).ilike(pattern.clone()))
                    .add(Expr::col(professional::Column::LastName).ilike(pattern)),
            );
        }

        condition
    }

    /// Resolve a requested sort column against the allow list. Unknown names
    /// fall back to the creation timestamp.
    #[must_use]
    pub fn sort_column(name: Option<&str>) -> professional::Column {
        match name {
            Some("first_name") => professional::Column::FirstName,
            Some("last_name") => professional::Column::LastName,
            Some("followers_count") => professional::Column::FollowersCount,
            Some("status") => professional::Column::Status,
            Some("city") => professional::Column::City,
            Some("updated_at") => professional::Column::UpdatedAt,
            _ => professional::Column::CreatedAt,
        }
    }
}

/// Insert payload for a professional row. Forced fields (status, submitter,
/// approval stamp) are decided by the calling service.
#[derive(Debug, Clone)]
pub struct NewProfessional {
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
    pub approved_at: Option<sea_orm::entity::prelude::DateTimeWithTimeZone>,
    pub admin_comments: Option<String>,
}

/// Professional repository for database operations.
#[derive(Clone)]
pub struct ProfessionalRepository {
    db: Arc<DatabaseConnection>,
}

impl ProfessionalRepository {
    /// Create a new professional repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Insert a new professional.
    pub async fn create(&self, new: NewProfessional) -> AppResult<Professional> {
        let now = chrono::Utc::now();

        let model = professional::ActiveModel {
            id: Set(new.id),
            first_name: Set(new.first_name),
            last_name: Set(new.last_name),
            email: Set(new.email),
            profile_url: Set(new.profile_url),
            linkedin_url: Set(new.linkedin_url),
            tiktok_url: Set(new.tiktok_url),
            facebook_url: Set(new.facebook_url),
            youtube_url: Set(new.youtube_url),
            followers_count: Set(new.followers_count),
            verified: Set(new.verified),
            agency_owner: Set(new.agency_owner),
            agent: Set(new.agent),
            developer_employee: Set(new.developer_employee),
            gender: Set(new.gender),
            nationality: Set(new.nationality),
            city: Set(new.city),
            languages: Set(encode_languages(&new.languages)),
            image_url: Set(new.image_url),
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

    /// Get a professional by ID.
    pub async fn get(&self, id: &str) -> AppResult<Professional> {
        ProfessionalEntity::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
            .map(to_record)
            .ok_or_else(|| AppError::NotFound(format!("Professional {id} not found")))
    }

    /// Get a professional by ID, visible only when approved and active.
    pub async fn get_approved_active(&self, id: &str) -> AppResult<Professional> {
        let record = self.get(id).await?;
        if record.is_publicly_visible() {
            Ok(record)
        } else {
            Err(AppError::NotFound(format!("Professional {id} not found")))
        }
    }

    /// List professionals matching a filter, returning the page and the
    /// total match count.
    pub async fn list(
        &self,
        filter: ProfessionalFilter,
        sort_by: Option<&str>,
        sort_dir: SortDir,
        page: u64,
        limit: u64,
    ) -> AppResult<(Vec<Professional>, u64)> {
        let query: ListQuery<ProfessionalEntity> = ListQuery::new(
            filter.into_condition(),
            ProfessionalFilter::sort_column(sort_by),
            sort_dir,
            page,
            limit,
        );

        let (models, total) = query.fetch(self.db.as_ref()).await?;
        Ok((models.into_iter().map(to_record).collect(), total))
    }

    /// Persist the full state of a record. `updated_at` is restamped here.
    pub async fn update(&self, record: Professional) -> AppResult<Professional> {
        let model = professional::ActiveModel {
            id: Set(record.id),
            first_name: Set(record.first_name),
            last_name: Set(record.last_name),
            email: Set(record.email),
            profile_url: Set(record.profile_url),
            linkedin_url: Set(record.linkedin_url),
            tiktok_url: Set(record.tiktok_url),
            facebook_url: Set(record.facebook_url),
            youtube_url: Set(record.youtube_url),
            followers_count: Set(record.followers_count),
            verified: Set(record.verified),
            agency_owner: Set(record.agency_owner),
            agent: Set(record.agent),
            developer_employee: Set(record.developer_employee),
            gender: Set(record.gender),
            nationality: Set(record.nationality),
            city: Set(record.city),
            languages: Set(encode_languages(&record.languages)),
            image_url: Set(record.image_url),
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

    /// Hard delete a professional.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        let model = ProfessionalEntity::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
            .ok_or_else(|| AppError::NotFound(format!("Professional {id} not found")))?;

        model
            .delete(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }
}

fn to_record(model: professional::Model) -> Professional {
    let languages = decode_languages("professional", &model.id, &model.languages);
    Professional {
        id: model.id,
        first_name: model.first_name,
        last_name: model.last_name,
        email: model.email,
        profile_url: model.profile_url,
        linkedin_url: model.linkedin_url,
        tiktok_url: model.tiktok_url,
        facebook_url: model.facebook_url,
        youtube_url: model.youtube_url,
        followers_count: model.followers_count,
        verified: model.verified,
        agency_owner: model.agency_owner,
        agent: model.agent,
        developer_employee: model.developer_employee,
        gender: model.gender,
        nationality: model.nationality,
        city: model.city,
        languages,
        image_url: model.image_url,
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

    pub(crate) fn test_model(id: &str, languages: &str) -> professional::Model {
        professional::Model {
            id: id.to_string(),
            first_name: "Amina".to_string(),
            last_name: "Hassan".to_string(),
            email: Some("amina@example.com".to_string()),
            profile_url: None,
            linkedin_url: None,
            tiktok_url: None,
            facebook_url: None,
            youtube_url: None,
            followers_count: Some(1200),
            verified: false,
            agency_owner: false,
            agent: true,
            developer_employee: false,
            gender: Some("female".to_string()),
            nationality: Some("AE".to_string()),
            city: Some("Dubai".to_string()),
            languages: languages.to_string(),
            image_url: None,
            status: ProfessionalStatus::Approved,
            submitted_by: Some("user1".to_string()),
            submitted_by_admin: None,
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

    #[tokio::test]
    async fn get_decodes_languages() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[test_model("p1", r#"["english","arabic"]"#)]])
                .into_connection(),
        );

        let repo = ProfessionalRepository::new(db);
        let record = repo.get("p1").await.unwrap();

        assert_eq!(record.languages, vec!["english", "arabic"]);
    }

    #[tokio::test]
    async fn malformed_languages_read_as_empty() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[test_model("p1", "not-json")]])
                .into_connection(),
        );

        let repo = ProfessionalRepository::new(db);
        let record = repo.get("p1").await.unwrap();

        assert!(record.languages.is_empty());
    }

    #[tokio::test]
    async fn get_approved_active_hides_pending_rows() {
        let mut model = test_model("p1", "[]");
        model.status = ProfessionalStatus::Pending;

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[model]])
                .into_connection(),
        );

        let repo = ProfessionalRepository::new(db);
        let result = repo.get_approved_active("p1").await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[test]
    fn unknown_sort_falls_back_to_created_at() {
        assert!(matches!(
            ProfessionalFilter::sort_column(Some("robert'); drop table professional;--")),
            professional::Column::CreatedAt
        ));
        assert!(matches!(
            ProfessionalFilter::sort_column(None),
            professional::Column::CreatedAt
        ));
        assert!(matches!(
            ProfessionalFilter::sort_column(Some("first_name")),
            professional::Column::FirstName
        ));
    }

    #[test]
    fn filter_condition_only_selects_values() {
        let filter = ProfessionalFilter {
            status: Some(ProfessionalStatus::Approved),
            is_active: Some(true),
            city: Some("Dubai".to_string()),
            search: Some("ami".to_string()),
            language: Some("english".to_string()),
            ..ProfessionalFilter::default()
        };

        let sql = ProfessionalEntity::find()
            .filter(filter.into_condition())
            .build(DbBackend::Postgres)
            .sql;

        assert!(sql.contains("\"status\" ="));
        assert!(sql.contains("\"is_active\" ="));
        assert!(sql.contains("ILIKE"));
        assert!(!sql.contains("Dubai"), "values must be bound: {sql}");
    }
}
