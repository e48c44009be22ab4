//! Enquiry entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Enquiry status. Enquiries are never moderated, only read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "lowercase")]
#[derive(Default)]
pub enum EnquiryStatus {
    #[sea_orm(string_value = "new")]
    #[default]
    New,
    #[sea_orm(string_value = "viewed")]
    Viewed,
}

/// Contact enquiry model.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "enquiry")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    pub email: String,
    pub company: Option<String>,
    pub message: Option<String>,
    pub terms_accepted: bool,
    pub status: EnquiryStatus,
    /// Admin whose first read marked the enquiry viewed.
    pub viewed_by: Option<String>,
    pub viewed_at: Option<DateTimeWithTimeZone>,
    /// End user who submitted the enquiry.
    pub submitted_by: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
