//! Create penalties table
//!
//! One penalty per no-show booking, settled by explicit admin action.

use sea_orm_migration::prelude::*;

use super::m20250101_000003_create_bookings::Bookings;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Penalties::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Penalties::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Penalties::UserId).uuid().not_null())
                    .col(
                        ColumnDef::new(Penalties::BookingId)
                            .uuid()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Penalties::Amount)
                            .decimal_len(10, 2)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Penalties::Reason).string().not_null())
                    .col(
                        ColumnDef::new(Penalties::Status)
                            .string()
                            .not_null()
                            .default("pending"),
                    )
                    .col(
                        ColumnDef::new(Penalties::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_penalties_booking")
                            .from(Penalties::Table, Penalties::BookingId)
                            .to(Bookings::Table, Bookings::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_penalties_user")
                    .table(Penalties::Table)
                    .col(Penalties::UserId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_penalties_status")
                    .table(Penalties::Table)
                    .col(Penalties::Status)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Penalties::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Penalties {
    Table,
    Id,
    UserId,
    BookingId,
    Amount,
    Reason,
    Status,
    CreatedAt,
}
