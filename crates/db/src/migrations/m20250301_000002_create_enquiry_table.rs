//! Create enquiry table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Enquiry::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Enquiry::Id).string_len(32).not_null().primary_key())
                    .col(ColumnDef::new(Enquiry::Name).string_len(256).not_null())
                    .col(ColumnDef::new(Enquiry::Email).string_len(256).not_null())
                    .col(ColumnDef::new(Enquiry::Company).string_len(256))
                    .col(ColumnDef::new(Enquiry::Message).text())
                    .col(ColumnDef::new(Enquiry::TermsAccepted).boolean().not_null().default(false))
                    .col(
                        ColumnDef::new(Enquiry::Status)
                            .string_len(32)
                            .not_null()
                            .default("new"),
                    )
                    .col(ColumnDef::new(Enquiry::ViewedBy).string_len(64))
                    .col(ColumnDef::new(Enquiry::ViewedAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(Enquiry::SubmittedBy).string_len(64))
                    .col(
                        ColumnDef::new(Enquiry::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Enquiry::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: status (admin dashboard filters on new)
        manager
            .create_index(
                Index::create()
                    .name("idx_enquiry_status")
                    .table(Enquiry::Table)
                    .col(Enquiry::Status)
                    .to_owned(),
            )
            .await?;

        // Index: created_at
        manager
            .create_index(
                Index::create()
                    .name("idx_enquiry_created_at")
                    .table(Enquiry::Table)
                    .col(Enquiry::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Enquiry::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Enquiry {
    Table,
    Id,
    Name,
    Email,
    Company,
    Message,
    TermsAccepted,
    Status,
    ViewedBy,
    ViewedAt,
    SubmittedBy,
    CreatedAt,
    UpdatedAt,
}
