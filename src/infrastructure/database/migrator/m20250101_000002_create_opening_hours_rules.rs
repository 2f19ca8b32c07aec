//! Create opening_hours_rules table
//!
//! Weekly open/closed windows per resource kind, with optional per-resource
//! overrides. Read-only to the scheduler.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(OpeningHoursRules::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(OpeningHoursRules::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(OpeningHoursRules::Kind).string().not_null())
                    .col(ColumnDef::new(OpeningHoursRules::ResourceId).uuid())
                    .col(
                        ColumnDef::new(OpeningHoursRules::DayOfWeek)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(OpeningHoursRules::OpenTime).time().not_null())
                    .col(
                        ColumnDef::new(OpeningHoursRules::CloseTime)
                            .time()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(OpeningHoursRules::IsClosed)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_opening_hours_kind_day")
                    .table(OpeningHoursRules::Table)
                    .col(OpeningHoursRules::Kind)
                    .col(OpeningHoursRules::DayOfWeek)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(OpeningHoursRules::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum OpeningHoursRules {
    Table,
    Id,
    Kind,
    ResourceId,
    DayOfWeek,
    OpenTime,
    CloseTime,
    IsClosed,
}
