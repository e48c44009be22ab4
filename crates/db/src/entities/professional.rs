//! Professional directory entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Moderation status of a professional listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "lowercase")]
#[derive(Default)]
pub enum ProfessionalStatus {
    #[sea_orm(string_value = "pending")]
    #[default]
    Pending,
    #[sea_orm(string_value = "approved")]
    Approved,
    #[sea_orm(string_value = "rejected")]
    Rejected,
}

impl std::fmt::Display for ProfessionalStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        };
        write!(f, "{s}")
    }
}

/// Professional listing model.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "professional")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    /// Contact address for status notifications.
    pub email: Option<String>,
    pub profile_url: Option<String>,
    pub linkedin_url: Option<String>,
    pub tiktok_url: Option<String>,
    pub facebook_url: Option<String>,
    pub youtube_url: Option<String>,
    pub followers_count: Option<i32>,
    pub verified: bool,
    /// Role flags. A professional may carry several.
    pub agency_owner: bool,
    pub agent: bool,
    pub developer_employee: bool,
    pub gender: Option<String>,
    pub nationality: Option<String>,
    pub city: Option<String>,
    /// JSON-encoded language list. Decoded by the repository only.
    pub languages: String,
    /// Opaque URL into blob storage.
    pub image_url: Option<String>,
    /// Current moderation status.
    pub status: ProfessionalStatus,
    /// End user who self-submitted this listing. Mutually exclusive with
    /// `submitted_by_admin`.
    pub submitted_by: Option<String>,
    /// Admin who created this listing directly.
    pub submitted_by_admin: Option<String>,
    pub approved_by: Option<String>,
    pub approved_at: Option<DateTimeWithTimeZone>,
    pub rejected_by: Option<String>,
    pub rejected_at: Option<DateTimeWithTimeZone>,
    pub rejection_reason: Option<String>,
    pub admin_comments: Option<String>,
    /// Soft-disable flag. Inactive rows stay queryable by admins.
    pub is_active: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
