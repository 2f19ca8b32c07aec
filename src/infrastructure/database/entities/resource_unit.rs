//! Resource unit entity

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "resource_units")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Resource kind: library_seat, equipment_unit, room
    pub kind: String,

    /// Table for seats, equipment type for units, none for rooms
    #[sea_orm(nullable)]
    pub parent_id: Option<Uuid>,

    /// Unit status: available, in_use, maintenance, inactive
    pub status: String,

    pub building: String,
    pub room_code: String,
    pub floor: i32,

    /// JSON-encoded per-kind details (seat/equipment/room variant)
    pub details: String,

    pub created_at: DateTimeUtc,

    #[sea_orm(nullable)]
    pub retired_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::booking::Entity")]
    Booking,
}

impl Related<super::booking::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Booking.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
