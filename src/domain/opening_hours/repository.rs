//! Opening-hours repository interface

use async_trait::async_trait;
use uuid::Uuid;

use super::model::OpeningHoursRule;
use crate::domain::resource::ResourceKind;
use crate::domain::DomainResult;

#[async_trait]
pub trait OpeningHoursRepository: Send + Sync {
    /// Save a rule (catalog administration)
    async fn save(&self, rule: OpeningHoursRule) -> DomainResult<()>;

    /// All rules for a kind, kind-level and per-resource alike
    async fn find_for_kind(&self, kind: ResourceKind) -> DomainResult<Vec<OpeningHoursRule>>;

    /// Rules applying to a kind on a given weekday, including per-resource
    /// overrides for `resource_id` when provided
    async fn find_for_day(
        &self,
        kind: ResourceKind,
        resource_id: Option<Uuid>,
        day_of_week: u8,
    ) -> DomainResult<Vec<OpeningHoursRule>>;

    /// Whether any rule exists for the kind at all (policy-missing check)
    async fn has_rules_for_kind(&self, kind: ResourceKind) -> DomainResult<bool>;
}
