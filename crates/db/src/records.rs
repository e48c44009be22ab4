//! Domain records handed out by the repositories.
//!
//! Records are inert data: the sequence attributes are already decoded
//! (`Vec<String>`), and nothing here touches the database. The sea-orm
//! models with their raw JSON text columns stay inside this crate.

use crate::entities::{
    enquiry::EnquiryStatus,
    order::{BudgetRange, GenderRequired, InfluencersRequired, OrderStatus},
    professional::ProfessionalStatus,
};
use sea_orm::entity::prelude::DateTimeWithTimeZone;
use serde::Serialize;

/// A professional directory listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Professional {
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
    pub approved_at: Option<DateTimeWithTimeZone>,
    pub rejected_by: Option<String>,
    pub rejected_at: Option<DateTimeWithTimeZone>,
    pub rejection_reason: Option<String>,
    pub admin_comments: Option<String>,
    pub is_active: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

impl Professional {
    /// Whether the listing appears on the public surface.
    #[must_use]
    pub fn is_publicly_visible(&self) -> bool {
        self.status == ProfessionalStatus::Approved && self.is_active
    }
}

/// A contact enquiry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Enquiry {
    pub id: String,
    pub name: String,
    pub email: String,
    pub company: Option<String>,
    pub message: Option<String>,
    pub terms_accepted: bool,
    pub status: EnquiryStatus,
    pub viewed_by: Option<String>,
    pub viewed_at: Option<DateTimeWithTimeZone>,
    pub submitted_by: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

/// A campaign order against a professional.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Order {
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
    pub approved_at: Option<DateTimeWithTimeZone>,
    pub rejected_by: Option<String>,
    pub rejected_at: Option<DateTimeWithTimeZone>,
    pub rejection_reason: Option<String>,
    pub admin_comments: Option<String>,
    pub is_active: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}
