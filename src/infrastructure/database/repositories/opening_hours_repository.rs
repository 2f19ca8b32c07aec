//! SeaORM implementation of OpeningHoursRepository

use async_trait::async_trait;
use log::debug;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, Set,
};
use uuid::Uuid;

use super::db_err;
use crate::domain::opening_hours::{OpeningHoursRepository, OpeningHoursRule};
use crate::domain::resource::ResourceKind;
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::opening_hours_rule;

pub struct SeaOrmOpeningHoursRepository {
    db: DatabaseConnection,
}

impl SeaOrmOpeningHoursRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn model_to_domain(m: opening_hours_rule::Model) -> DomainResult<OpeningHoursRule> {
    let kind = ResourceKind::from_str(&m.kind).ok_or_else(|| {
        DomainError::Transient(format!("Corrupt resource kind in storage: {}", m.kind))
    })?;
    Ok(OpeningHoursRule {
        id: m.id,
        kind,
        resource_id: m.resource_id,
        day_of_week: m.day_of_week as u8,
        open_time: m.open_time,
        close_time: m.close_time,
        is_closed: m.is_closed,
    })
}

// ── OpeningHoursRepository impl ─────────────────────────────────

#[async_trait]
impl OpeningHoursRepository for SeaOrmOpeningHoursRepository {
    async fn save(&self, rule: OpeningHoursRule) -> DomainResult<()> {
        debug!(
            "Saving opening-hours rule for {} day {}",
            rule.kind, rule.day_of_week
        );

        let model = opening_hours_rule::ActiveModel {
            id: Set(rule.id),
            kind: Set(rule.kind.as_str().to_string()),
            resource_id: Set(rule.resource_id),
            day_of_week: Set(rule.day_of_week as i32),
            open_time: Set(rule.open_time),
            close_time: Set(rule.close_time),
            is_closed: Set(rule.is_closed),
        };
        model.insert(&self.db).await.map_err(db_err)?;
        Ok(())
    }

    async fn find_for_kind(&self, kind: ResourceKind) -> DomainResult<Vec<OpeningHoursRule>> {
        let models = opening_hours_rule::Entity::find()
            .filter(opening_hours_rule::Column::Kind.eq(kind.as_str()))
            .all(&self.db)
            .await
            .map_err(db_err)?;
        models.into_iter().map(model_to_domain).collect()
    }

    async fn find_for_day(
        &self,
        kind: ResourceKind,
        resource_id: Option<Uuid>,
        day_of_week: u8,
    ) -> DomainResult<Vec<OpeningHoursRule>> {
        let mut scope = Condition::any().add(opening_hours_rule::Column::ResourceId.is_null());
        if let Some(rid) = resource_id {
            scope = scope.add(opening_hours_rule::Column::ResourceId.eq(rid));
        }

        let models = opening_hours_rule::Entity::find()
            .filter(opening_hours_rule::Column::Kind.eq(kind.as_str()))
            .filter(opening_hours_rule::Column::DayOfWeek.eq(day_of_week as i32))
            .filter(scope)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        models.into_iter().map(model_to_domain).collect()
    }

    async fn has_rules_for_kind(&self, kind: ResourceKind) -> DomainResult<bool> {
        let count = opening_hours_rule::Entity::find()
            .filter(opening_hours_rule::Column::Kind.eq(kind.as_str()))
            .count(&self.db)
            .await
            .map_err(db_err)?;
        Ok(count > 0)
    }
}
