//! Resource catalog service
//!
//! Read-heavy registry of bookable units. Status changes and retirement are
//! administrative operations; they hit the store directly so the
//! availability engine sees them immediately (no caching layer).

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::resource::{ResourceKind, ResourceUnit, UnitFilter, UnitStatus};
use crate::domain::{DomainError, DomainResult, RepositoryProvider};

pub struct CatalogService {
    repos: Arc<dyn RepositoryProvider>,
}

impl CatalogService {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    pub async fn list_units(
        &self,
        kind: ResourceKind,
        filter: UnitFilter,
    ) -> DomainResult<Vec<ResourceUnit>> {
        self.repos.units().list(kind, filter).await
    }

    pub async fn get_unit(&self, id: Uuid) -> DomainResult<ResourceUnit> {
        self.repos
            .units()
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("ResourceUnit", "id", id))
    }

    pub async fn add_unit(&self, unit: ResourceUnit) -> DomainResult<()> {
        self.repos.units().save(unit).await
    }

    pub async fn set_unit_status(&self, id: Uuid, status: UnitStatus) -> DomainResult<()> {
        // surface NotFound before mutating
        self.get_unit(id).await?;
        self.repos.units().set_status(id, status).await
    }

    /// Soft retirement; the unit stays referenced by historical bookings.
    pub async fn retire_unit(&self, id: Uuid) -> DomainResult<()> {
        self.get_unit(id).await?;
        self.repos.units().retire(id).await
    }
}
