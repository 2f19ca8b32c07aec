//! Opening-hours rule entity

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "opening_hours_rules")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Resource kind: library_seat, equipment_unit, room
    pub kind: String,

    /// Per-resource override; null means the rule applies to the whole kind
    #[sea_orm(nullable)]
    pub resource_id: Option<Uuid>,

    /// 0 = Sunday .. 6 = Saturday
    pub day_of_week: i32,

    pub open_time: Time,
    pub close_time: Time,

    pub is_closed: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
