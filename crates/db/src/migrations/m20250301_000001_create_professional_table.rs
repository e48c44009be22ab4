//! Create professional table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Professional::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Professional::Id).string_len(32).not_null().primary_key())
                    .col(ColumnDef::new(Professional::FirstName).string_len(128).not_null())
                    .col(ColumnDef::new(Professional::LastName).string_len(128).not_null())
                    .col(ColumnDef::new(Professional::Email).string_len(256))
                    .col(ColumnDef::new(Professional::ProfileUrl).string_len(1024))
                    .col(ColumnDef::new(Professional::LinkedinUrl).string_len(1024))
                    .col(ColumnDef::new(Professional::TiktokUrl).string_len(1024))
                    .col(ColumnDef::new(Professional::FacebookUrl).string_len(1024))
                    .col(ColumnDef::new(Professional::YoutubeUrl).string_len(1024))
                    .col(ColumnDef::new(Professional::FollowersCount).integer())
                    .col(ColumnDef::new(Professional::Verified).boolean().not_null().default(false))
                    .col(ColumnDef::new(Professional::AgencyOwner).boolean().not_null().default(false))
                    .col(ColumnDef::new(Professional::Agent).boolean().not_null().default(false))
                    .col(ColumnDef::new(Professional::DeveloperEmployee).boolean().not_null().default(false))
                    .col(ColumnDef::new(Professional::Gender).string_len(32))
                    .col(ColumnDef::new(Professional::Nationality).string_len(128))
                    .col(ColumnDef::new(Professional::City).string_len(128))
                    .col(ColumnDef::new(Professional::Languages).text().not_null().default("[]"))
                    .col(ColumnDef::new(Professional::ImageUrl).string_len(1024))
                    .col(
                        ColumnDef::new(Professional::Status)
                            .string_len(32)
                            .not_null()
                            .default("pending"),
                    )
                    .col(ColumnDef::new(Professional::SubmittedBy).string_len(64))
                    .col(ColumnDef::new(Professional::SubmittedByAdmin).string_len(64))
                    .col(ColumnDef::new(Professional::ApprovedBy).string_len(64))
                    .col(ColumnDef::new(Professional::ApprovedAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(Professional::RejectedBy).string_len(64))
                    .col(ColumnDef::new(Professional::RejectedAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(Professional::RejectionReason).text())
                    .col(ColumnDef::new(Professional::AdminComments).text())
                    .col(ColumnDef::new(Professional::IsActive).boolean().not_null().default(true))
                    .col(
                        ColumnDef::new(Professional::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Professional::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: (status, is_active) - the public surface filters on both
        manager
            .create_index(
                Index::create()
                    .name("idx_professional_status_is_active")
                    .table(Professional::Table)
                    .col(Professional::Status)
                    .col(Professional::IsActive)
                    .to_owned(),
            )
            .await?;

        // Index: created_at (default sort)
        manager
            .create_index(
                Index::create()
                    .name("idx_professional_created_at")
                    .table(Professional::Table)
                    .col(Professional::CreatedAt)
                    .to_owned(),
            )
            .await?;

        // Index: city
        manager
            .create_index(
                Index::create()
                    .name("idx_professional_city")
                    .table(Professional::Table)
                    .col(Professional::City)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Professional::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Professional {
    Table,
    Id,
    FirstName,
    LastName,
    Email,
    ProfileUrl,
    LinkedinUrl,
    TiktokUrl,
    FacebookUrl,
    YoutubeUrl,
    FollowersCount,
    Verified,
    AgencyOwner,
    Agent,
    DeveloperEmployee,
    Gender,
    Nationality,
    City,
    Languages,
    ImageUrl,
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
