//! Booking entity

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "bookings")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Siblings of one group booking share this id
    pub group_id: Uuid,

    pub booked_by: Uuid,
    pub booked_for: Uuid,
    pub resource_unit_id: Uuid,

    pub start_ts: DateTimeUtc,
    pub end_ts: DateTimeUtc,

    /// Booking status: pending, confirmed, arrived, completed, cancelled, no_show
    pub status: String,

    #[sea_orm(unique)]
    pub attendance_code: String,

    /// JSON-encoded list of companion identifiers
    pub companions: String,

    #[sea_orm(nullable)]
    pub notes: Option<String>,

    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::resource_unit::Entity",
        from = "Column::ResourceUnitId",
        to = "super::resource_unit::Column::Id"
    )]
    ResourceUnit,
}

impl Related<super::resource_unit::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ResourceUnit.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
