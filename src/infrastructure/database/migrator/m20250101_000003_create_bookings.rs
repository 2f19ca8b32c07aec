//! Create bookings table
//!
//! One row per reserved unit; sibling rows of a group booking share
//! group_id. Indexed for the overlap query (unit + time range) and for
//! check-in by attendance code.

use sea_orm_migration::prelude::*;

use super::m20250101_000001_create_resource_units::ResourceUnits;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Bookings::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Bookings::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Bookings::GroupId).uuid().not_null())
                    .col(ColumnDef::new(Bookings::BookedBy).uuid().not_null())
                    .col(ColumnDef::new(Bookings::BookedFor).uuid().not_null())
                    .col(ColumnDef::new(Bookings::ResourceUnitId).uuid().not_null())
                    .col(
                        ColumnDef::new(Bookings::StartTs)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Bookings::EndTs)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Bookings::Status)
                            .string()
                            .not_null()
                            .default("confirmed"),
                    )
                    .col(
                        ColumnDef::new(Bookings::AttendanceCode)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Bookings::Companions).string().not_null())
                    .col(ColumnDef::new(Bookings::Notes).string())
                    .col(
                        ColumnDef::new(Bookings::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_bookings_resource_unit")
                            .from(Bookings::Table, Bookings::ResourceUnitId)
                            .to(ResourceUnits::Table, ResourceUnits::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_bookings_unit_window")
                    .table(Bookings::Table)
                    .col(Bookings::ResourceUnitId)
                    .col(Bookings::StartTs)
                    .col(Bookings::EndTs)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_bookings_status")
                    .table(Bookings::Table)
                    .col(Bookings::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_bookings_booked_by")
                    .table(Bookings::Table)
                    .col(Bookings::BookedBy)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_bookings_group")
                    .table(Bookings::Table)
                    .col(Bookings::GroupId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Bookings::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Bookings {
    Table,
    Id,
    GroupId,
    BookedBy,
    BookedFor,
    ResourceUnitId,
    StartTs,
    EndTs,
    Status,
    AttendanceCode,
    Companions,
    Notes,
    CreatedAt,
}
