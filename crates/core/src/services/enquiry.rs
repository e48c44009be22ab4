//! Contact enquiry service.

use std::sync::Arc;

use chrono::Utc;
use markethall_common::{AppResult, SortDir};
use markethall_db::entities::enquiry::EnquiryStatus;
use markethall_db::records::Enquiry;
use markethall_db::repositories::{EnquiryFilter, EnquiryRepository, NewEnquiry};
use sea_orm::DatabaseConnection;

use crate::services::captcha::CaptchaService;
use crate::services::notification::{Notification, NotificationSender};

/// Public enquiry payload.
#[derive(Debug, Clone)]
pub struct EnquiryInput {
    pub name: String,
    pub email: String,
    pub company: Option<String>,
    pub message: Option<String>,
    pub terms_accepted: bool,
}

/// Enquiry service.
#[derive(Clone)]
pub struct EnquiryService {
    repo: EnquiryRepository,
    captcha: CaptchaService,
    notifications: NotificationSender,
}

impl EnquiryService {
    /// Create a new enquiry service.
    #[must_use]
    pub fn new(
        db: Arc<DatabaseConnection>,
        captcha: CaptchaService,
        notifications: NotificationSender,
    ) -> Self {
        Self {
            repo: EnquiryRepository::new(db),
            captcha,
            notifications,
        }
    }

    /// Public submission. Enquiries always start in `new`.
    pub async fn submit(
        &self,
        user_id: Option<&str>,
        input: EnquiryInput,
        captcha_token: Option<&str>,
    ) -> AppResult<Enquiry> {
        self.captcha.check_submission(captcha_token).await?;

        let new = NewEnquiry {
            id: crate::generate_id(),
            name: input.name,
            email: input.email,
            company: input.company,
            message: input.message,
            terms_accepted: input.terms_accepted,
            submitted_by: user_id.map(String::from),
        };

        let record = self.repo.create(new).await?;

        self.notifications.dispatch(Notification::EnquiryReceived {
            enquiry: record.clone(),
        });

        Ok(record)
    }

    /// Admin list.
    pub async fn list(
        &self,
        filter: EnquiryFilter,
        sort_by: Option<&str>,
        sort_dir: SortDir,
        page: u64,
        limit: u64,
    ) -> AppResult<(Vec<Enquiry>, u64)> {
        self.repo.list(filter, sort_by, sort_dir, page, limit).await
    }

    /// Admin read. Opening a `new` enquiry marks it viewed, stamped with the
    /// reading admin. Re-reads do not overwrite the original viewer.
    pub async fn admin_get(&self, admin_id: &str, id: &str) -> AppResult<Enquiry> {
        let record = self.repo.get(id).await?;

        if record.status == EnquiryStatus::New {
            let mut record = record;
            record.status = EnquiryStatus::Viewed;
            record.viewed_by = Some(admin_id.to_string());
            record.viewed_at = Some(Utc::now().into());
            return self.repo.update(record).await;
        }

        Ok(record)
    }

    /// Explicit status change.
    pub async fn update_status(
        &self,
        admin_id: &str,
        id: &str,
        status: EnquiryStatus,
    ) -> AppResult<Enquiry> {
        let mut record = self.repo.get(id).await?;

        if status == EnquiryStatus::Viewed && record.status == EnquiryStatus::New {
            record.viewed_by = Some(admin_id.to_string());
            record.viewed_at = Some(Utc::now().into());
        }
        record.status = status;

        self.repo.update(record).await
    }

    /// Hard delete.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        self.repo.delete(id).await
    }
}
