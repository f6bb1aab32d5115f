//! Create test_results table.

use sea_orm_migration::prelude::*;

use super::m20250301_000002_create_samples::Samples;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(TestResults::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TestResults::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(TestResults::SampleId).uuid().not_null())
                    .col(ColumnDef::new(TestResults::TestType).string_len(20).not_null())
                    .col(ColumnDef::new(TestResults::RawData).json_binary().not_null())
                    .col(ColumnDef::new(TestResults::AiAnalysis).json_binary())
                    .col(
                        ColumnDef::new(TestResults::Status)
                            .string_len(20)
                            .not_null()
                            .default("PENDING"),
                    )
                    .col(
                        ColumnDef::new(TestResults::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TestResults::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(TestResults::Table, TestResults::SampleId)
                            .to(Samples::Table, Samples::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_test_results_sample_id")
                    .table(TestResults::Table)
                    .col(TestResults::SampleId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_test_results_status")
                    .table(TestResults::Table)
                    .col(TestResults::Status)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(TestResults::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum TestResults {
    Table,
    Id,
    SampleId,
    TestType,
    RawData,
    AiAnalysis,
    Status,
    CreatedAt,
    UpdatedAt,
}
