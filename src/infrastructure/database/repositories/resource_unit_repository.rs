//! SeaORM implementation of ResourceUnitRepository

use async_trait::async_trait;
use chrono::Utc;
use log::debug;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use super::db_err;
use crate::domain::resource::{
    Location, ResourceDetails, ResourceKind, ResourceUnit, ResourceUnitRepository, UnitFilter,
    UnitStatus,
};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::resource_unit;

pub struct SeaOrmResourceUnitRepository {
    db: DatabaseConnection,
}

impl SeaOrmResourceUnitRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn model_to_domain(m: resource_unit::Model) -> DomainResult<ResourceUnit> {
    let kind = ResourceKind::from_str(&m.kind).ok_or_else(|| {
        DomainError::Transient(format!("Corrupt resource kind in storage: {}", m.kind))
    })?;
    let details: ResourceDetails = serde_json::from_str(&m.details).map_err(|e| {
        DomainError::Transient(format!("Corrupt resource details in storage: {}", e))
    })?;
    Ok(ResourceUnit {
        id: m.id,
        kind,
        parent_id: m.parent_id,
        status: UnitStatus::from_str(&m.status),
        location: Location {
            building: m.building,
            room_code: m.room_code,
            floor: m.floor,
        },
        details,
        created_at: m.created_at,
        retired_at: m.retired_at,
    })
}

fn domain_to_active(u: &ResourceUnit) -> DomainResult<resource_unit::ActiveModel> {
    let details = serde_json::to_string(&u.details)
        .map_err(|e| DomainError::Transient(format!("Serialization error: {}", e)))?;
    Ok(resource_unit::ActiveModel {
        id: Set(u.id),
        kind: Set(u.kind.as_str().to_string()),
        parent_id: Set(u.parent_id),
        status: Set(u.status.as_str().to_string()),
        building: Set(u.location.building.clone()),
        room_code: Set(u.location.room_code.clone()),
        floor: Set(u.location.floor),
        details: Set(details),
        created_at: Set(u.created_at),
        retired_at: Set(u.retired_at),
    })
}

// ── ResourceUnitRepository impl ─────────────────────────────────

#[async_trait]
impl ResourceUnitRepository for SeaOrmResourceUnitRepository {
    async fn save(&self, unit: ResourceUnit) -> DomainResult<()> {
        debug!("Saving resource unit: {}", unit.id);
        domain_to_active(&unit)?
            .insert(&self.db)
            .await
            .map_err(db_err)?;
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<ResourceUnit>> {
        let model = resource_unit::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        model.map(model_to_domain).transpose()
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> DomainResult<Vec<ResourceUnit>> {
        if ids.is_empty() {
            return Ok(vec![]);
        }
        let models = resource_unit::Entity::find()
            .filter(resource_unit::Column::Id.is_in(ids.to_vec()))
            .all(&self.db)
            .await
            .map_err(db_err)?;
        models.into_iter().map(model_to_domain).collect()
    }

    async fn list(
        &self,
        kind: ResourceKind,
        filter: UnitFilter,
    ) -> DomainResult<Vec<ResourceUnit>> {
        let mut query =
            resource_unit::Entity::find().filter(resource_unit::Column::Kind.eq(kind.as_str()));

        if let Some(status) = filter.status {
            query = query.filter(resource_unit::Column::Status.eq(status.as_str()));
        }
        if let Some(parent_id) = filter.parent_id {
            query = query.filter(resource_unit::Column::ParentId.eq(parent_id));
        }
        if !filter.include_retired {
            query = query.filter(resource_unit::Column::RetiredAt.is_null());
        }

        let models = query
            .order_by_asc(resource_unit::Column::RoomCode)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        models.into_iter().map(model_to_domain).collect()
    }

    async fn set_status(&self, id: Uuid, status: UnitStatus) -> DomainResult<()> {
        let result = resource_unit::Entity::update_many()
            .col_expr(
                resource_unit::Column::Status,
                Expr::value(status.as_str()),
            )
            .filter(resource_unit::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(db_err)?;
        if result.rows_affected == 0 {
            return Err(DomainError::not_found("ResourceUnit", "id", id));
        }
        Ok(())
    }

    async fn retire(&self, id: Uuid) -> DomainResult<()> {
        let result = resource_unit::Entity::update_many()
            .col_expr(
                resource_unit::Column::RetiredAt,
                Expr::value(Some(Utc::now())),
            )
            .col_expr(
                resource_unit::Column::Status,
                Expr::value(UnitStatus::Inactive.as_str()),
            )
            .filter(resource_unit::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(db_err)?;
        if result.rows_affected == 0 {
            return Err(DomainError::not_found("ResourceUnit", "id", id));
        }
        Ok(())
    }
}
