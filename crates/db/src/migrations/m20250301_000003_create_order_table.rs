//! Create order table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(CampaignOrder::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(CampaignOrder::Id).string_len(32).not_null().primary_key())
                    .col(ColumnDef::new(CampaignOrder::ProfessionalId).string_len(32).not_null())
                    .col(ColumnDef::new(CampaignOrder::CustomerName).string_len(256).not_null())
                    .col(ColumnDef::new(CampaignOrder::CustomerEmail).string_len(256).not_null())
                    .col(ColumnDef::new(CampaignOrder::CustomerWhatsapp).string_len(64).not_null())
                    .col(ColumnDef::new(CampaignOrder::BudgetRange).string_len(32).not_null())
                    .col(ColumnDef::new(CampaignOrder::InfluencersRequired).string_len(32).not_null())
                    .col(ColumnDef::new(CampaignOrder::GenderRequired).string_len(32).not_null())
                    .col(
                        ColumnDef::new(CampaignOrder::LanguagesRequired)
                            .text()
                            .not_null()
                            .default("[]"),
                    )
                    .col(ColumnDef::new(CampaignOrder::MinFollowers).integer())
                    .col(ColumnDef::new(CampaignOrder::Message).text())
                    .col(
                        ColumnDef::new(CampaignOrder::TermsAccepted)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(CampaignOrder::Status)
                            .string_len(32)
                            .not_null()
                            .default("pending"),
                    )
                    .col(ColumnDef::new(CampaignOrder::SubmittedBy).string_len(64))
                    .col(ColumnDef::new(CampaignOrder::SubmittedByAdmin).string_len(64))
                    .col(ColumnDef::new(CampaignOrder::ApprovedBy).string_len(64))
                    .col(ColumnDef::new(CampaignOrder::ApprovedAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(CampaignOrder::RejectedBy).string_len(64))
                    .col(ColumnDef::new(CampaignOrder::RejectedAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(CampaignOrder::RejectionReason).text())
                    .col(ColumnDef::new(CampaignOrder::AdminComments).text())
                    .col(
                        ColumnDef::new(CampaignOrder::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(CampaignOrder::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(CampaignOrder::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Referential integrity only. The approved-and-active rule is a
        // creation-time service check, not a schema constraint.
        manager
            .create_foreign_key(
                ForeignKey::create()
                    .name("fk_campaign_order_professional")
                    .from(CampaignOrder::Table, CampaignOrder::ProfessionalId)
                    .to(Professional::Table, Professional::Id)
                    .to_owned(),
            )
            .await?;

        // Index: professional_id (per-professional order lists)
        manager
            .create_index(
                Index::create()
                    .name("idx_campaign_order_professional_id")
                    .table(CampaignOrder::Table)
                    .col(CampaignOrder::ProfessionalId)
                    .to_owned(),
            )
            .await?;

        // Index: status
        manager
            .create_index(
                Index::create()
                    .name("idx_campaign_order_status")
                    .table(CampaignOrder::Table)
                    .col(CampaignOrder::Status)
                    .to_owned(),
            )
            .await?;

        // Index: created_at
        manager
            .create_index(
                Index::create()
                    .name("idx_campaign_order_created_at")
                    .table(CampaignOrder::Table)
                    .col(CampaignOrder::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CampaignOrder::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum CampaignOrder {
    Table,
    Id,
    ProfessionalId,
    CustomerName,
    CustomerEmail,
    CustomerWhatsapp,
    BudgetRange,
    InfluencersRequired,
    GenderRequired,
    LanguagesRequired,
    MinFollowers,
    Message,
    TermsAccepted,
    Status,
    SubmittedBy,
    SubmittedByAdmin,
    ApprovedBy,
    ApprovedAt,
    RejectedBy,
    RejectedAt,
    RejectionReason,
    AdminComments,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Professional {
    Table,
    Id,
}
