//! Domain error taxonomy
//!
//! Every engine operation returns one of these variants. Handlers map them
//! to HTTP status codes; callers can branch on `Conflict`/`Transient` to
//! decide whether a retry makes sense.

use thiserror::Error;
use uuid::Uuid;

use crate::domain::resource::ResourceKind;

#[derive(Debug, Error)]
pub enum DomainError {
    /// Caller-fixable request problem (horizon, duration, hours, capacity).
    #[error("Validation failed on {field}: {reason}")]
    Validation {
        field: &'static str,
        reason: String,
    },

    /// Lost the availability race; lists the units that were claimed first.
    #[error("Units no longer available: {unit_ids:?}")]
    Conflict { unit_ids: Vec<Uuid> },

    #[error("Not found: {entity} with {field}={value}")]
    NotFound {
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    /// Operation not valid for the record's current status.
    #[error("{entity} is {current}, cannot {attempted}")]
    WrongState {
        entity: &'static str,
        current: String,
        attempted: &'static str,
    },

    /// Check-in attempted outside the allowed window around start.
    #[error("Check-in outside the allowed window ({minutes_off} minutes from start)")]
    OutsideWindow { minutes_off: i64 },

    /// No opening-hours rules configured for a resource kind. Operator
    /// misconfiguration, not user error; booking fails closed.
    #[error("No opening-hours policy configured for {kind}")]
    PolicyMissing { kind: ResourceKind },

    /// Storage timeout/deadlock; the request itself may be valid.
    #[error("Transient storage error: {0}")]
    Transient(String),
}

impl DomainError {
    pub fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Validation {
            field,
            reason: reason.into(),
        }
    }

    pub fn not_found(entity: &'static str, field: &'static str, value: impl ToString) -> Self {
        Self::NotFound {
            entity,
            field,
            value: value.to_string(),
        }
    }

    /// Whether the operation may succeed if simply retried.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Transient(_))
    }
}

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;
