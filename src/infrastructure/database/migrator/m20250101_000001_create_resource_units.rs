//! Create resource_units table
//!
//! One row per bookable thing (library seat, equipment unit, room).
//! Units are soft-retired, never deleted while bookings reference them.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ResourceUnits::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ResourceUnits::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ResourceUnits::Kind).string().not_null())
                    .col(ColumnDef::new(ResourceUnits::ParentId).uuid())
                    .col(
                        ColumnDef::new(ResourceUnits::Status)
                            .string()
                            .not_null()
                            .default("available"),
                    )
                    .col(ColumnDef::new(ResourceUnits::Building).string().not_null())
                    .col(ColumnDef::new(ResourceUnits::RoomCode).string().not_null())
                    .col(ColumnDef::new(ResourceUnits::Floor).integer().not_null())
                    .col(ColumnDef::new(ResourceUnits::Details).string().not_null())
                    .col(
                        ColumnDef::new(ResourceUnits::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ResourceUnits::RetiredAt).timestamp_with_time_zone())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_resource_units_kind")
                    .table(ResourceUnits::Table)
                    .col(ResourceUnits::Kind)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_resource_units_parent")
                    .table(ResourceUnits::Table)
                    .col(ResourceUnits::ParentId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ResourceUnits::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum ResourceUnits {
    Table,
    Id,
    Kind,
    ParentId,
    Status,
    Building,
    RoomCode,
    Floor,
    Details,
    CreatedAt,
    RetiredAt,
}
