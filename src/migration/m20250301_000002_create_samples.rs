//! Create samples table.

use sea_orm_migration::prelude::*;

use super::m20250301_000001_create_users::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Samples::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Samples::Id).uuid().not_null().primary_key())
                    .col(
                        ColumnDef::new(Samples::Barcode)
                            .string_len(100)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Samples::PatientName).string_len(255).not_null())
                    .col(ColumnDef::new(Samples::PatientId).string_len(100).not_null())
                    .col(
                        ColumnDef::new(Samples::Status)
                            .string_len(20)
                            .not_null()
                            .default("REGISTERED"),
                    )
                    .col(ColumnDef::new(Samples::CreatedBy).uuid().not_null())
                    .col(
                        ColumnDef::new(Samples::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Samples::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Samples::Table, Samples::CreatedBy)
                            .to(Users::Table, Users::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_samples_created_at")
                    .table(Samples::Table)
                    .col(Samples::CreatedAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Samples::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Samples {
    Table,
    Id,
    Barcode,
    PatientName,
    PatientId,
    Status,
    CreatedBy,
    CreatedAt,
    UpdatedAt,
}
