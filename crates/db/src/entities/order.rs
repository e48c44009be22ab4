//! Campaign order entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Moderation status of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "lowercase")]
#[derive(Default)]
pub enum OrderStatus {
    #[sea_orm(string_value = "pending")]
    #[default]
    Pending,
    #[sea_orm(string_value = "approved")]
    Approved,
    #[sea_orm(string_value = "rejected")]
    Rejected,
    #[sea_orm(string_value = "completed")]
    Completed,
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Completed => "completed",
        };
        write!(f, "{s}")
    }
}

/// Campaign budget bracket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
pub enum BudgetRange {
    #[sea_orm(string_value = "15k-25k")]
    #[serde(rename = "15k-25k")]
    From15kTo25k,
    #[sea_orm(string_value = "26k-50k")]
    #[serde(rename = "26k-50k")]
    From26kTo50k,
    #[sea_orm(string_value = "51k-75k")]
    #[serde(rename = "51k-75k")]
    From51kTo75k,
    #[sea_orm(string_value = "76k-100k")]
    #[serde(rename = "76k-100k")]
    From76kTo100k,
    #[sea_orm(string_value = "100k+")]
    #[serde(rename = "100k+")]
    Over100k,
}

/// Requested headcount bracket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
pub enum InfluencersRequired {
    #[sea_orm(string_value = "1-10")]
    #[serde(rename = "1-10")]
    From1To10,
    #[sea_orm(string_value = "11-25")]
    #[serde(rename = "11-25")]
    From11To25,
    #[sea_orm(string_value = "26-50")]
    #[serde(rename = "26-50")]
    From26To50,
    #[sea_orm(string_value = "51-100")]
    #[serde(rename = "51-100")]
    From51To100,
    #[sea_orm(string_value = "100+")]
    #[serde(rename = "100+")]
    Over100,
}

/// Requested gender mix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "lowercase")]
pub enum GenderRequired {
    #[sea_orm(string_value = "male")]
    Male,
    #[sea_orm(string_value = "female")]
    Female,
    #[sea_orm(string_value = "both")]
    Both,
}

/// Campaign order model.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "campaign_order")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// Referenced professional. The approved-and-active rule is enforced at
    /// creation time in the service, not by the schema.
    pub professional_id: String,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_whatsapp: String,
    pub budget_range: BudgetRange,
    pub influencers_required: InfluencersRequired,
    pub gender_required: GenderRequired,
    /// JSON-encoded language list. Decoded by the repository only.
    pub languages_required: String,
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

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::professional::Entity",
        from = "Column::ProfessionalId",
        to = "super::professional::Column::Id"
    )]
    Professional,
}

impl Related<super::professional::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Professional.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
