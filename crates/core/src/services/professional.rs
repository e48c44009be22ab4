//! Professional submission service.

use std::sync::Arc;

use chrono::Utc;
use markethall_common::{AppResult, SortDir};
use markethall_db::entities::professional::ProfessionalStatus;
use markethall_db::records::Professional;
use markethall_db::repositories::{NewProfessional, ProfessionalFilter, ProfessionalRepository};
use sea_orm::DatabaseConnection;
use validator::{Validate, ValidationError};

use crate::moderation::{self, AuditTrail, ModerationTarget};
use crate::services::captcha::CaptchaService;
use crate::services::notification::{Notification, NotificationSender};

/// Languages offered on the public submission form.
pub const LANGUAGES: &[&str] = &[
    "english", "arabic", "hindi", "urdu", "russian", "french", "german", "spanish", "italian",
    "mandarin", "tagalog", "farsi", "turkish",
];

/// Content fields of a professional listing, shared by both creation paths.
#[derive(Debug, Clone)]
pub struct ProfessionalInput {
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
}

/// Admin-direct creation payload. Status defaults to approved when omitted.
#[derive(Debug, Clone)]
pub struct AdminProfessionalInput {
    pub input: ProfessionalInput,
    pub status: Option<ProfessionalStatus>,
    pub admin_comments: Option<String>,
}

/// Admin update payload. `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct ProfessionalUpdate {
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

impl ProfessionalUpdate {
    /// A status-only change. The rejection reason rides along with a
    /// rejection, so it does not count as a field edit.
    #[must_use]
    pub const fn is_status_only(&self) -> bool {
        self.status.is_some()
            && self.first_name.is_none()
            && self.last_name.is_none()
            && self.email.is_none()
            && self.profile_url.is_none()
            && self.linkedin_url.is_none()
            && self.tiktok_url.is_none()
            && self.facebook_url.is_none()
            && self.youtube_url.is_none()
            && self.followers_count.is_none()
            && self.verified.is_none()
            && self.agency_owner.is_none()
            && self.agent.is_none()
            && self.developer_employee.is_none()
            && self.gender.is_none()
            && self.nationality.is_none()
            && self.city.is_none()
            && self.languages.is_none()
            && self.image_url.is_none()
            && self.admin_comments.is_none()
            && self.is_active.is_none()
    }
}

fn non_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("non_blank"));
    }
    Ok(())
}

/// Field rules re-checked when an update touches content fields. Historical
/// rows are exempt on status-only changes.
#[derive(Debug, Validate)]
#[validate(schema(function = "exclusive_attribution"))]
struct ProfessionalRules {
    #[validate(custom(function = "non_blank"))]
    first_name: String,
    #[validate(custom(function = "non_blank"))]
    last_name: String,
    #[validate(email)]
    email: Option<String>,
    #[validate(url)]
    profile_url: Option<String>,
    #[validate(url)]
    linkedin_url: Option<String>,
    #[validate(url)]
    tiktok_url: Option<String>,
    #[validate(url)]
    facebook_url: Option<String>,
    #[validate(url)]
    youtube_url: Option<String>,
    #[validate(range(min = 0))]
    followers_count: Option<i32>,
    submitted_by: Option<String>,
    submitted_by_admin: Option<String>,
}

// Exactly one creation path owns the record: end user or admin, never both,
// never neither.
fn exclusive_attribution(rules: &ProfessionalRules) -> Result<(), ValidationError> {
    if rules.submitted_by.is_some() == rules.submitted_by_admin.is_some() {
        return Err(ValidationError::new("exclusive_attribution"));
    }
    Ok(())
}

fn validate_merged(record: &Professional) -> AppResult<()> {
    let rules = ProfessionalRules {
        first_name: record.first_name.clone(),
        last_name: record.last_name.clone(),
        email: record.email.clone(),
        profile_url: record.profile_url.clone(),
        linkedin_url: record.linkedin_url.clone(),
        tiktok_url: record.tiktok_url.clone(),
        facebook_url: record.facebook_url.clone(),
        youtube_url: record.youtube_url.clone(),
        followers_count: record.followers_count,
        submitted_by: record.submitted_by.clone(),
        submitted_by_admin: record.submitted_by_admin.clone(),
    };
    rules.validate()?;
    Ok(())
}

fn trail_of(record: &Professional) -> AuditTrail {
    AuditTrail {
        approved_by: record.approved_by.clone(),
        approved_at: record.approved_at,
        rejected_by: record.rejected_by.clone(),
        rejected_at: record.rejected_at,
        rejection_reason: record.rejection_reason.clone(),
    }
}

fn apply_trail(record: &mut Professional, trail: AuditTrail) {
    record.approved_by = trail.approved_by;
    record.approved_at = trail.approved_at;
    record.rejected_by = trail.rejected_by;
    record.rejected_at = trail.rejected_at;
    record.rejection_reason = trail.rejection_reason;
}

/// Professional service for submissions, moderation and directory lists.
#[derive(Clone)]
pub struct ProfessionalService {
    repo: ProfessionalRepository,
    captcha: CaptchaService,
    notifications: NotificationSender,
}

impl ProfessionalService {
    /// Create a new professional service.
    #[must_use]
    pub fn new(
        db: Arc<DatabaseConnection>,
        captcha: CaptchaService,
        notifications: NotificationSender,
    ) -> Self {
        Self {
            repo: ProfessionalRepository::new(db),
            captcha,
            notifications,
        }
    }

    /// Public self-submission. Always lands pending, stamped with the
    /// submitting user; client-supplied status or admin attribution never
    /// reaches this path.
    pub async fn submit(
        &self,
        user_id: &str,
        input: ProfessionalInput,
        captcha_token: Option<&str>,
    ) -> AppResult<Professional> {
        self.captcha.check_submission(captcha_token).await?;

        let new = NewProfessional {
            id: crate::generate_id(),
            first_name: input.first_name,
            last_name: input.last_name,
            email: input.email,
            profile_url: input.profile_url,
            linkedin_url: input.linkedin_url,
            tiktok_url: input.tiktok_url,
            facebook_url: input.facebook_url,
            youtube_url: input.youtube_url,
            followers_count: input.followers_count,
            verified: input.verified,
            agency_owner: input.agency_owner,
            agent: input.agent,
            developer_employee: input.developer_employee,
            gender: input.gender,
            nationality: input.nationality,
            city: input.city,
            languages: input.languages,
            image_url: input.image_url,
            status: ProfessionalStatus::Pending,
            submitted_by: Some(user_id.to_string()),
            submitted_by_admin: None,
            approved_by: None,
            approved_at: None,
            admin_comments: None,
        };

        let record = self.repo.create(new).await?;

        self.notifications.dispatch(Notification::ProfessionalSubmitted {
            professional: record.clone(),
        });

        Ok(record)
    }

    /// Admin-direct creation. Defaults to approved, stamped as approved by
    /// the creating admin; no captcha, no notification.
    pub async fn admin_create(
        &self,
        admin_id: &str,
        payload: AdminProfessionalInput,
    ) -> AppResult<Professional> {
        let status = payload.status.unwrap_or(ProfessionalStatus::Approved);
        let (approved_by, approved_at) = if status == ProfessionalStatus::Approved {
            (Some(admin_id.to_string()), Some(Utc::now().into()))
        } else {
            (None, None)
        };

        let input = payload.input;
        let new = NewProfessional {
            id: crate::generate_id(),
            first_name: input.first_name,
            last_name: input.last_name,
            email: input.email,
            profile_url: input.profile_url,
            linkedin_url: input.linkedin_url,
            tiktok_url: input.tiktok_url,
            facebook_url: input.facebook_url,
            youtube_url: input.youtube_url,
            followers_count: input.followers_count,
            verified: input.verified,
            agency_owner: input.agency_owner,
            agent: input.agent,
            developer_employee: input.developer_employee,
            gender: input.gender,
            nationality: input.nationality,
            city: input.city,
            languages: input.languages,
            image_url: input.image_url,
            status,
            submitted_by: None,
            submitted_by_admin: Some(admin_id.to_string()),
            approved_by,
            approved_at,
            admin_comments: payload.admin_comments,
        };

        self.repo.create(new).await
    }

    /// Public directory list. Pins the filter to approved and active rows.
    pub async fn list_public(
        &self,
        mut filter: ProfessionalFilter,
        sort_by: Option<&str>,
        sort_dir: SortDir,
        page: u64,
        limit: u64,
    ) -> AppResult<(Vec<Professional>, u64)> {
        filter.status = Some(ProfessionalStatus::Approved);
        filter.is_active = Some(true);
        self.repo.list(filter, sort_by, sort_dir, page, limit).await
    }

    /// Admin list over the full status range.
    pub async fn list_admin(
        &self,
        filter: ProfessionalFilter,
        sort_by: Option<&str>,
        sort_dir: SortDir,
        page: u64,
        limit: u64,
    ) -> AppResult<(Vec<Professional>, u64)> {
        self.repo.list(filter, sort_by, sort_dir, page, limit).await
    }

    /// Public get: approved and active rows only, anything else reads as
    /// not found.
    pub async fn get_public(&self, id: &str) -> AppResult<Professional> {
        self.repo.get_approved_active(id).await
    }

    /// Admin get: any row.
    pub async fn get_admin(&self, id: &str) -> AppResult<Professional> {
        self.repo.get(id).await
    }

    /// Admin update. Status changes run through the moderation state
    /// machine; status-only payloads skip field revalidation so historical
    /// rows stay editable, while any content edit revalidates the merged
    /// state.
    pub async fn admin_update(
        &self,
        admin_id: &str,
        id: &str,
        update: ProfessionalUpdate,
    ) -> AppResult<Professional> {
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
        if record.status == ProfessionalStatus::Rejected && update.rejection_reason.is_some() {
            record.rejection_reason = update.rejection_reason;
        }

        if let Some(first_name) = update.first_name {
            record.first_name = first_name;
        }
        if let Some(last_name) = update.last_name {
            record.last_name = last_name;
        }
        if let Some(email) = update.email {
            record.email = Some(email);
        }
        if let Some(profile_url) = update.profile_url {
            record.profile_url = Some(profile_url);
        }
        if let Some(linkedin_url) = update.linkedin_url {
            record.linkedin_url = Some(linkedin_url);
        }
        if let Some(tiktok_url) = update.tiktok_url {
            record.tiktok_url = Some(tiktok_url);
        }
        if let Some(facebook_url) = update.facebook_url {
            record.facebook_url = Some(facebook_url);
        }
        if let Some(youtube_url) = update.youtube_url {
            record.youtube_url = Some(youtube_url);
        }
        if let Some(followers_count) = update.followers_count {
            record.followers_count = Some(followers_count);
        }
        if let Some(verified) = update.verified {
            record.verified = verified;
        }
        if let Some(agency_owner) = update.agency_owner {
            record.agency_owner = agency_owner;
        }
        if let Some(agent) = update.agent {
            record.agent = agent;
        }
        if let Some(developer_employee) = update.developer_employee {
            record.developer_employee = developer_employee;
        }
        if let Some(gender) = update.gender {
            record.gender = Some(gender);
        }
        if let Some(nationality) = update.nationality {
            record.nationality = Some(nationality);
        }
        if let Some(city) = update.city {
            record.city = Some(city);
        }
        if let Some(languages) = update.languages {
            record.languages = languages;
        }
        if let Some(image_url) = update.image_url {
            record.image_url = Some(image_url);
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
            self.notifications
                .dispatch(Notification::ProfessionalStatusChanged {
                    professional: updated.clone(),
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
    use markethall_db::entities::professional;
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

    fn input() -> ProfessionalInput {
        ProfessionalInput {
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
            nationality: None,
            city: Some("Dubai".to_string()),
            languages: vec!["english".to_string()],
            image_url: None,
        }
    }

    fn stored_model(status: ProfessionalStatus) -> professional::Model {
        professional::Model {
            id: "01hq3xyz0000000000000000p1".to_string(),
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
            nationality: None,
            city: Some("Dubai".to_string()),
            languages: r#"["english"]"#.to_string(),
            image_url: None,
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

    fn service(db: Arc<DatabaseConnection>) -> ProfessionalService {
        let notifications = NotificationService::new();
        ProfessionalService::new(db, passing_captcha(), notifications.sender())
    }

    #[tokio::test]
    async fn submit_forces_pending_and_submitter() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[stored_model(ProfessionalStatus::Pending)]])
                .into_connection(),
        );

        let svc = service(Arc::clone(&db));
        let record = svc.submit("user1", input(), Some("tok")).await.unwrap();
        drop(svc);

        assert_eq!(record.status, ProfessionalStatus::Pending);

        let log = Arc::try_unwrap(db).unwrap().into_transaction_log();
        let insert = format!("{:?}", log[0]);
        assert!(insert.contains("INSERT"), "first statement must be the insert: {insert}");
        assert!(insert.contains("pending"));
        assert!(insert.contains("user1"));
    }

    #[tokio::test]
    async fn failed_captcha_never_reaches_the_database() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres).into_connection(),
        );

        let notifications = NotificationService::new();
        let svc = ProfessionalService::new(
            Arc::clone(&db),
            passing_captcha(),
            notifications.sender(),
        );

        let result = svc.submit("user1", input(), None).await;
        drop(svc);

        assert!(result.is_err());
        let log = Arc::try_unwrap(db).unwrap().into_transaction_log();
        assert!(log.is_empty());
    }

    #[tokio::test]
    async fn admin_create_defaults_to_approved_with_stamp() {
        let mut returned = stored_model(ProfessionalStatus::Approved);
        returned.submitted_by = None;
        returned.submitted_by_admin = Some("admin1".to_string());
        returned.approved_by = Some("admin1".to_string());
        returned.approved_at = Some(Utc::now().into());

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[returned]])
                .into_connection(),
        );

        let svc = service(Arc::clone(&db));
        let record = svc
            .admin_create(
                "admin1",
                AdminProfessionalInput {
                    input: input(),
                    status: None,
                    admin_comments: None,
                },
            )
            .await
            .unwrap();
        drop(svc);

        assert_eq!(record.status, ProfessionalStatus::Approved);
        assert_eq!(record.submitted_by_admin.as_deref(), Some("admin1"));
        assert!(record.submitted_by.is_none());

        let log = Arc::try_unwrap(db).unwrap().into_transaction_log();
        let insert = format!("{:?}", log[0]);
        assert!(insert.contains("approved"));
        assert!(insert.contains("admin1"));
    }

    #[tokio::test]
    async fn status_only_update_skips_field_revalidation() {
        // Historical row with a malformed URL stays updatable when only the
        // status changes.
        let mut stored = stored_model(ProfessionalStatus::Pending);
        stored.profile_url = Some("not a url".to_string());

        let mut updated = stored.clone();
        updated.status = ProfessionalStatus::Approved;

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[stored]])
                .append_query_results([[updated]])
                .into_connection(),
        );

        let svc = service(db);
        let update = ProfessionalUpdate {
            status: Some(ProfessionalStatus::Approved),
            ..ProfessionalUpdate::default()
        };
        let record = svc.admin_update("admin1", "p1", update).await.unwrap();

        assert_eq!(record.status, ProfessionalStatus::Approved);
    }

    #[tokio::test]
    async fn field_update_revalidates_the_merged_state() {
        let stored = stored_model(ProfessionalStatus::Approved);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[stored]])
                .into_connection(),
        );

        let svc = service(db);
        let update = ProfessionalUpdate {
            profile_url: Some("not a url".to_string()),
            ..ProfessionalUpdate::default()
        };
        let result = svc.admin_update("admin1", "p1", update).await;

        assert!(matches!(result, Err(markethall_common::AppError::Validation(_))));
    }

    #[tokio::test]
    async fn rejection_reason_can_be_amended_without_a_transition() {
        let mut stored = stored_model(ProfessionalStatus::Rejected);
        stored.rejected_by = Some("admin1".to_string());
        stored.rejected_at = Some(Utc::now().into());
        stored.rejection_reason = Some("blurry photo".to_string());

        let mut amended = stored.clone();
        amended.rejection_reason = Some("incomplete profile".to_string());

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[stored]])
                .append_query_results([[amended]])
                .into_connection(),
        );

        let svc = service(Arc::clone(&db));
        let update = ProfessionalUpdate {
            status: Some(ProfessionalStatus::Rejected),
            rejection_reason: Some("incomplete profile".to_string()),
            ..ProfessionalUpdate::default()
        };
        let record = svc.admin_update("admin2", "p1", update).await.unwrap();
        drop(svc);

        // The reason changed; the original rejection stamp did not.
        assert_eq!(record.rejection_reason.as_deref(), Some("incomplete profile"));
        assert_eq!(record.rejected_by.as_deref(), Some("admin1"));

        let log = Arc::try_unwrap(db).unwrap().into_transaction_log();
        assert!(format!("{:?}", log[1]).contains("incomplete profile"));
    }

    #[tokio::test]
    async fn attribution_on_both_sides_fails_validation() {
        let mut stored = stored_model(ProfessionalStatus::Approved);
        stored.submitted_by_admin = Some("admin1".to_string());

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[stored]])
                .into_connection(),
        );

        let svc = service(db);
        let update = ProfessionalUpdate {
            city: Some("Abu Dhabi".to_string()),
            ..ProfessionalUpdate::default()
        };
        let result = svc.admin_update("admin1", "p1", update).await;

        assert!(matches!(result, Err(markethall_common::AppError::Validation(_))));
    }

    #[tokio::test]
    async fn rejecting_requires_a_reason() {
        let stored = stored_model(ProfessionalStatus::Pending);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[stored]])
                .into_connection(),
        );

        let svc = service(db);
        let update = ProfessionalUpdate {
            status: Some(ProfessionalStatus::Rejected),
            ..ProfessionalUpdate::default()
        };
        let result = svc.admin_update("admin1", "p1", update).await;

        assert!(matches!(result, Err(markethall_common::AppError::Validation(_))));
    }
}
