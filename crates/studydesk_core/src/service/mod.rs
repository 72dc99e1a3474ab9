//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs, one facade per
//!   engine component.
//! - Validate multi-entity invariants above the repository layer.
//! - Map storage errors into the caller-facing error taxonomy.
//!
//! # Invariants
//! - Cross-owner ids surface as `NotFound`, never as a distinct forbidden
//!   signal.
//! - Cascade failures surface as `Transaction` after rollback; nothing is
//!   retried automatically.

use crate::db::DbError;
use crate::repo::{EntityKind, LimitKind, StoreError};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod focus_service;
pub mod gamification;
pub mod hierarchy_service;
pub mod review_service;
pub mod template_service;
pub mod todo_service;
pub mod workspace_service;

pub type CoreResult<T> = Result<T, CoreError>;

/// Caller-facing error taxonomy of the engine.
#[derive(Debug)]
pub enum CoreError {
    /// Malformed input or invariant violation; nothing was applied.
    Validation(String),
    /// Id does not resolve to an entity owned by the caller (including
    /// entities owned by someone else).
    NotFound { entity: EntityKind, id: String },
    /// A hard cardinality cap was hit; callers can react by removing first.
    LimitExceeded { limit: LimitKind, max: u32 },
    /// A cascading multi-entity operation could not complete atomically;
    /// the store was rolled back to its prior state.
    Transaction(String),
    /// Infrastructure failure below the domain contract.
    Storage(StoreError),
}

impl Display for CoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(message) => write!(f, "validation failed: {message}"),
            Self::NotFound { entity, id } => write!(f, "{entity} not found: {id}"),
            Self::LimitExceeded { limit, max } => {
                write!(f, "limit exceeded: at most {max} {limit}")
            }
            Self::Transaction(message) => write!(f, "transaction failed: {message}"),
            Self::Storage(err) => write!(f, "{err}"),
        }
    }
}

impl Error for CoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Storage(err) => Some(err),
            _ => None,
        }
    }
}

impl From<StoreError> for CoreError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::Validation(message) => Self::Validation(message),
            StoreError::NotFound { entity, id } => Self::NotFound { entity, id },
            StoreError::LimitExceeded { limit, max } => Self::LimitExceeded { limit, max },
            other => Self::Storage(other),
        }
    }
}

impl From<DbError> for CoreError {
    fn from(value: DbError) -> Self {
        Self::Storage(StoreError::Db(value))
    }
}

pub(crate) fn not_found(entity: EntityKind, id: impl Display) -> CoreError {
    CoreError::NotFound {
        entity,
        id: id.to_string(),
    }
}

/// Wraps a cascade failure as `Transaction`, letting semantic errors
/// (`NotFound`, `LimitExceeded`, `Validation`) pass through unchanged.
pub(crate) fn map_cascade_error(operation: &'static str, err: StoreError) -> CoreError {
    match err {
        StoreError::Db(db_err) => CoreError::Transaction(format!("{operation}: {db_err}")),
        other => other.into(),
    }
}
