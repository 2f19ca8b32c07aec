//! Resource catalog repository interface

use async_trait::async_trait;
use uuid::Uuid;

use super::model::{ResourceKind, ResourceUnit, UnitStatus};
use crate::domain::DomainResult;

/// Optional narrowing of `list_units`
#[derive(Debug, Clone, Default)]
pub struct UnitFilter {
    pub status: Option<UnitStatus>,
    pub parent_id: Option<Uuid>,
    /// When false (default), retired units are omitted
    pub include_retired: bool,
}

#[async_trait]
pub trait ResourceUnitRepository: Send + Sync {
    /// Save a new unit (catalog administration)
    async fn save(&self, unit: ResourceUnit) -> DomainResult<()>;

    /// Find unit by ID
    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<ResourceUnit>>;

    /// Find several units at once; missing ids are simply absent from the result
    async fn find_by_ids(&self, ids: &[Uuid]) -> DomainResult<Vec<ResourceUnit>>;

    /// List units of a kind, optionally filtered
    async fn list(&self, kind: ResourceKind, filter: UnitFilter) -> DomainResult<Vec<ResourceUnit>>;

    /// Set a unit's operational status
    async fn set_status(&self, id: Uuid, status: UnitStatus) -> DomainResult<()>;

    /// Soft-retire a unit (kept for historical bookings)
    async fn retire(&self, id: Uuid) -> DomainResult<()>;
}
