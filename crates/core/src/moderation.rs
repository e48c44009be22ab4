//! Moderation state machine and audit stamping.
//!
//! Every moderated submission carries the same audit trail. Transitions are
//! explicit admin actions; there are no background auto-transitions. The
//! approval and rejection sides of the trail are mutually exclusive: moving
//! into one clears the other, so re-moderation always leaves a single
//! consistent stamp.

use chrono::{DateTime, Utc};
use markethall_common::{AppError, AppResult};
use markethall_db::entities::{order::OrderStatus, professional::ProfessionalStatus};
use sea_orm::entity::prelude::DateTimeWithTimeZone;

/// Target state of a moderation action, shared by every moderated entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModerationTarget {
    Pending,
    Approved,
    Rejected,
    /// Orders only. Marks fulfilment, not a moderation verdict.
    Completed,
}

impl From<ProfessionalStatus> for ModerationTarget {
    fn from(status: ProfessionalStatus) -> Self {
        match status {
            ProfessionalStatus::Pending => Self::Pending,
            ProfessionalStatus::Approved => Self::Approved,
            ProfessionalStatus::Rejected => Self::Rejected,
        }
    }
}

impl From<OrderStatus> for ModerationTarget {
    fn from(status: OrderStatus) -> Self {
        match status {
            OrderStatus::Pending => Self::Pending,
            OrderStatus::Approved => Self::Approved,
            OrderStatus::Rejected => Self::Rejected,
            OrderStatus::Completed => Self::Completed,
        }
    }
}

/// Audit trail fields of a moderated submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuditTrail {
    pub approved_by: Option<String>,
    pub approved_at: Option<DateTimeWithTimeZone>,
    pub rejected_by: Option<String>,
    pub rejected_at: Option<DateTimeWithTimeZone>,
    pub rejection_reason: Option<String>,
}

impl AuditTrail {
    /// A trail stamped as approved by `admin_id` at `now`. Used for
    /// admin-direct creations that start out approved.
    #[must_use]
    pub fn approved(admin_id: &str, now: DateTime<Utc>) -> Self {
        Self {
            approved_by: Some(admin_id.to_string()),
            approved_at: Some(now.into()),
            ..Self::default()
        }
    }
}

/// Whether a status transition produces an outbound notification.
///
/// Only the statuses an end user acts on are notifiable. Returning to
/// pending, soft disables and field edits stay silent.
#[must_use]
pub const fn is_notifiable(target: ModerationTarget) -> bool {
    matches!(
        target,
        ModerationTarget::Approved | ModerationTarget::Rejected | ModerationTarget::Completed
    )
}

/// Apply a moderation transition and return the restamped trail.
///
/// Approving clears the rejection side and vice versa, so
/// `rejected -> approved -> rejected` never accumulates stale stamps.
/// Rejection requires a non-blank reason. `Pending` and `Completed` leave
/// the existing trail untouched.
///
/// Concurrent admin actions are last-write-wins; there is no version check.
pub fn transition(
    current: &AuditTrail,
    target: ModerationTarget,
    admin_id: &str,
    reason: Option<&str>,
    now: DateTime<Utc>,
) -> AppResult<AuditTrail> {
    match target {
        ModerationTarget::Approved => Ok(AuditTrail {
            approved_by: Some(admin_id.to_string()),
            approved_at: Some(now.into()),
            rejected_by: None,
            rejected_at: None,
            rejection_reason: None,
        }),
        ModerationTarget::Rejected => {
            let reason = reason
                .map(str::trim)
                .filter(|r| !r.is_empty())
                .ok_or_else(|| {
                    AppError::validation("rejection_reason", "rejection requires a reason")
                })?;
            Ok(AuditTrail {
                approved_by: None,
                approved_at: None,
                rejected_by: Some(admin_id.to_string()),
                rejected_at: Some(now.into()),
                rejection_reason: Some(reason.to_string()),
            })
        }
        ModerationTarget::Pending | ModerationTarget::Completed => Ok(current.clone()),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn rejected_trail() -> AuditTrail {
        AuditTrail {
            rejected_by: Some("admin1".to_string()),
            rejected_at: Some(Utc::now().into()),
            rejection_reason: Some("incomplete profile".to_string()),
            ..AuditTrail::default()
        }
    }

    #[test]
    fn approving_clears_rejection_side() {
        let now = Utc::now();
        let trail = transition(
            &rejected_trail(),
            ModerationTarget::Approved,
            "admin2",
            None,
            now,
        )
        .unwrap();

        assert_eq!(trail.approved_by.as_deref(), Some("admin2"));
        assert_eq!(trail.approved_at, Some(now.into()));
        assert!(trail.rejected_by.is_none());
        assert!(trail.rejected_at.is_none());
        assert!(trail.rejection_reason.is_none());
    }

    #[test]
    fn rejecting_clears_approval_side() {
        let now = Utc::now();
        let approved = AuditTrail::approved("admin1", now);

        let trail = transition(
            &approved,
            ModerationTarget::Rejected,
            "admin2",
            Some("stale listing"),
            now,
        )
        .unwrap();

        assert!(trail.approved_by.is_none());
        assert!(trail.approved_at.is_none());
        assert_eq!(trail.rejected_by.as_deref(), Some("admin2"));
        assert_eq!(trail.rejection_reason.as_deref(), Some("stale listing"));
    }

    #[test]
    fn rejection_requires_a_reason() {
        let now = Utc::now();
        let result = transition(
            &AuditTrail::default(),
            ModerationTarget::Rejected,
            "admin1",
            None,
            now,
        );
        assert!(matches!(result, Err(AppError::Validation(_))));

        let result = transition(
            &AuditTrail::default(),
            ModerationTarget::Rejected,
            "admin1",
            Some("   "),
            now,
        );
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[test]
    fn completion_keeps_the_existing_trail() {
        let now = Utc::now();
        let approved = AuditTrail::approved("admin1", now);
        let trail = transition(
            &approved,
            ModerationTarget::Completed,
            "admin2",
            None,
            now,
        )
        .unwrap();

        assert_eq!(trail, approved);
    }

    #[test]
    fn notifiable_subset() {
        assert!(is_notifiable(ModerationTarget::Approved));
        assert!(is_notifiable(ModerationTarget::Rejected));
        assert!(is_notifiable(ModerationTarget::Completed));
        assert!(!is_notifiable(ModerationTarget::Pending));
    }
}
