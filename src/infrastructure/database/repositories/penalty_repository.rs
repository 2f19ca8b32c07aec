//! SeaORM implementation of PenaltyRepository

use async_trait::async_trait;
use log::debug;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use super::db_err;
use crate::domain::penalty::{Penalty, PenaltyRepository, PenaltyStatus};
use crate::domain::DomainResult;
use crate::infrastructure::database::entities::penalty;

pub struct SeaOrmPenaltyRepository {
    db: DatabaseConnection,
}

impl SeaOrmPenaltyRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn model_to_domain(m: penalty::Model) -> Penalty {
    Penalty {
        id: m.id,
        user_id: m.user_id,
        booking_id: m.booking_id,
        amount: m.amount,
        reason: m.reason,
        status: PenaltyStatus::from_str(&m.status),
        created_at: m.created_at,
    }
}

// ── PenaltyRepository impl ──────────────────────────────────────

#[async_trait]
impl PenaltyRepository for SeaOrmPenaltyRepository {
    async fn save(&self, p: Penalty) -> DomainResult<()> {
        debug!("Saving penalty: {} for booking {}", p.id, p.booking_id);

        let model = penalty::ActiveModel {
            id: Set(p.id),
            user_id: Set(p.user_id),
            booking_id: Set(p.booking_id),
            amount: Set(p.amount),
            reason: Set(p.reason),
            status: Set(p.status.as_str().to_string()),
            created_at: Set(p.created_at),
        };
        model.insert(&self.db).await.map_err(db_err)?;
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<Penalty>> {
        let model = penalty::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(model_to_domain))
    }

    async fn exists_for_booking(&self, booking_id: Uuid) -> DomainResult<bool> {
        let count = penalty::Entity::find()
            .filter(penalty::Column::BookingId.eq(booking_id))
            .count(&self.db)
            .await
            .map_err(db_err)?;
        Ok(count > 0)
    }

    async fn list_for_user(&self, user_id: Uuid) -> DomainResult<Vec<Penalty>> {
        let models = penalty::Entity::find()
            .filter(penalty::Column::UserId.eq(user_id))
            .order_by_desc(penalty::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }

    async fn settle_guarded(&self, id: Uuid, to: PenaltyStatus) -> DomainResult<bool> {
        let result = penalty::Entity::update_many()
            .col_expr(penalty::Column::Status, Expr::value(to.as_str()))
            .filter(penalty::Column::Id.eq(id))
            .filter(penalty::Column::Status.eq(PenaltyStatus::Pending.as_str()))
            .exec(&self.db)
            .await
            .map_err(db_err)?;
        Ok(result.rows_affected == 1)
    }
}
