//! SeaORM implementation of BookingRepository

use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::debug;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, DbBackend,
    EntityTrait, IsolationLevel, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use uuid::Uuid;

use super::db_err;
use crate::domain::booking::{Booking, BookingRepository, BookingStatus};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::booking;

pub struct SeaOrmBookingRepository {
    db: DatabaseConnection,
    claim_timeout: Duration,
}

impl SeaOrmBookingRepository {
    pub fn new(db: DatabaseConnection, claim_timeout_ms: u64) -> Self {
        Self {
            db,
            claim_timeout: Duration::from_millis(claim_timeout_ms),
        }
    }

    /// The claim itself: one transaction that re-checks overlap and inserts
    /// every sibling row, or commits nothing.
    async fn claim_group_txn(&self, bookings: &[Booking]) -> DomainResult<()> {
        let unit_ids: Vec<Uuid> = bookings.iter().map(|b| b.resource_unit_id).collect();
        let earliest = bookings.iter().map(|b| b.start_ts).min().unwrap_or_default();
        let latest = bookings.iter().map(|b| b.end_ts).max().unwrap_or_default();
        debug!(
            "Claiming {} unit(s) for [{}, {})",
            unit_ids.len(),
            earliest,
            latest
        );

        // SQLite transactions are serializable already and its driver
        // rejects explicit isolation levels.
        let txn = if self.db.get_database_backend() == DbBackend::Sqlite {
            self.db.begin().await.map_err(db_err)?
        } else {
            self.db
                .begin_with_config(Some(IsolationLevel::Serializable), None)
                .await
                .map_err(db_err)?
        };

        let candidates = booking::Entity::find()
            .filter(booking::Column::ResourceUnitId.is_in(unit_ids.clone()))
            .filter(booking::Column::Status.is_in(BookingStatus::holding_strs()))
            .filter(booking::Column::StartTs.lt(latest))
            .filter(booking::Column::EndTs.gt(earliest))
            .all(&txn)
            .await
            .map_err(db_err)?;

        // Refine the coarse range scan against each sibling's exact window
        let taken: HashSet<Uuid> = candidates
            .iter()
            .filter(|m| {
                bookings.iter().any(|b| {
                    b.resource_unit_id == m.resource_unit_id
                        && m.start_ts < b.end_ts
                        && b.start_ts < m.end_ts
                })
            })
            .map(|m| m.resource_unit_id)
            .collect();

        if !taken.is_empty() {
            txn.rollback().await.map_err(db_err)?;
            let mut losing: Vec<Uuid> = unit_ids.into_iter().filter(|u| taken.contains(u)).collect();
            losing.dedup();
            return Err(DomainError::Conflict { unit_ids: losing });
        }

        for b in bookings {
            domain_to_active(b).insert(&txn).await.map_err(db_err)?;
        }
        txn.commit().await.map_err(db_err)?;
        Ok(())
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn model_to_domain(m: booking::Model) -> Booking {
    Booking {
        id: m.id,
        group_id: m.group_id,
        booked_by: m.booked_by,
        booked_for: m.booked_for,
        resource_unit_id: m.resource_unit_id,
        start_ts: m.start_ts,
        end_ts: m.end_ts,
        status: BookingStatus::from_str(&m.status),
        attendance_code: m.attendance_code,
        companions: serde_json::from_str(&m.companions).unwrap_or_default(),
        notes: m.notes,
        created_at: m.created_at,
    }
}

fn domain_to_active(b: &Booking) -> booking::ActiveModel {
    booking::ActiveModel {
        id: Set(b.id),
        group_id: Set(b.group_id),
        booked_by: Set(b.booked_by),
        booked_for: Set(b.booked_for),
        resource_unit_id: Set(b.resource_unit_id),
        start_ts: Set(b.start_ts),
        end_ts: Set(b.end_ts),
        status: Set(b.status.as_str().to_string()),
        attendance_code: Set(b.attendance_code.clone()),
        companions: Set(serde_json::to_string(&b.companions).unwrap_or_else(|_| "[]".into())),
        notes: Set(b.notes.clone()),
        created_at: Set(b.created_at),
    }
}

// ── BookingRepository impl ──────────────────────────────────────

#[async_trait]
impl BookingRepository for SeaOrmBookingRepository {
    async fn claim_group(&self, bookings: Vec<Booking>) -> DomainResult<Vec<Booking>> {
        if bookings.is_empty() {
            return Ok(bookings);
        }
        match tokio::time::timeout(self.claim_timeout, self.claim_group_txn(&bookings)).await {
            Ok(result) => result.map(|()| bookings),
            Err(_) => Err(DomainError::Transient(
                "claim transaction timed out".to_string(),
            )),
        }
    }

    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<Booking>> {
        let model = booking::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(model_to_domain))
    }

    async fn find_by_code(&self, code: &str) -> DomainResult<Option<Booking>> {
        let model = booking::Entity::find()
            .filter(booking::Column::AttendanceCode.eq(code))
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(model_to_domain))
    }

    async fn find_conflicting_units(
        &self,
        unit_ids: &[Uuid],
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> DomainResult<Vec<Uuid>> {
        if unit_ids.is_empty() {
            return Ok(vec![]);
        }
        let models = booking::Entity::find()
            .filter(booking::Column::ResourceUnitId.is_in(unit_ids.to_vec()))
            .filter(booking::Column::Status.is_in(BookingStatus::holding_strs()))
            .filter(booking::Column::StartTs.lt(end))
            .filter(booking::Column::EndTs.gt(start))
            .all(&self.db)
            .await
            .map_err(db_err)?;

        let taken: HashSet<Uuid> = models.into_iter().map(|m| m.resource_unit_id).collect();
        Ok(unit_ids
            .iter()
            .filter(|id| taken.contains(id))
            .copied()
            .collect())
    }

    async fn list_for_user(&self, user_id: Uuid) -> DomainResult<Vec<Booking>> {
        let models = booking::Entity::find()
            .filter(
                Condition::any()
                    .add(booking::Column::BookedBy.eq(user_id))
                    .add(booking::Column::BookedFor.eq(user_id)),
            )
            .order_by_desc(booking::Column::StartTs)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }

    async fn set_status_guarded(
        &self,
        id: Uuid,
        from: BookingStatus,
        to: BookingStatus,
    ) -> DomainResult<bool> {
        if !from.can_transition_to(to) {
            return Err(DomainError::WrongState {
                entity: "Booking",
                current: from.to_string(),
                attempted: to.as_str(),
            });
        }
        let result = booking::Entity::update_many()
            .col_expr(booking::Column::Status, Expr::value(to.as_str()))
            .filter(booking::Column::Id.eq(id))
            .filter(booking::Column::Status.eq(from.as_str()))
            .exec(&self.db)
            .await
            .map_err(db_err)?;
        Ok(result.rows_affected == 1)
    }

    async fn find_missed_checkins(&self, cutoff: DateTime<Utc>) -> DomainResult<Vec<Booking>> {
        let models = booking::Entity::find()
            .filter(booking::Column::Status.eq(BookingStatus::Confirmed.as_str()))
            .filter(booking::Column::StartTs.lt(cutoff))
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }

    async fn find_finished_arrivals(&self, now: DateTime<Utc>) -> DomainResult<Vec<Booking>> {
        let models = booking::Entity::find()
            .filter(booking::Column::Status.eq(BookingStatus::Arrived.as_str()))
            .filter(booking::Column::EndTs.lt(now))
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }
}
