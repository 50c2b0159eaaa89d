use thiserror::Error;

use crate::domain::ids::{ActorId, RecordId};

#[derive(Error, Debug)]
pub enum GovernanceError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Permission denied for actor {actor_id}: {reason}")]
    Permission { actor_id: ActorId, reason: String },

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Conflict on {entity} {id} (status {status}): {reason}")]
    Conflict {
        entity: String,
        id: String,
        status: String,
        reason: String,
    },

    #[error("Integrity error on {table_name} {record_id}: {reason}")]
    Integrity {
        table_name: String,
        record_id: RecordId,
        reason: String,
    },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl GovernanceError {
    pub fn permission(actor_id: ActorId, reason: impl Into<String>) -> Self {
        GovernanceError::Permission {
            actor_id,
            reason: reason.into(),
        }
    }

    pub fn conflict(
        entity: impl Into<String>,
        id: impl ToString,
        status: impl ToString,
        reason: impl Into<String>,
    ) -> Self {
        GovernanceError::Conflict {
            entity: entity.into(),
            id: id.to_string(),
            status: status.to_string(),
            reason: reason.into(),
        }
    }

    /// Whether the caller should re-read current state before acting again.
    pub fn requires_refresh(&self) -> bool {
        matches!(self, GovernanceError::Conflict { .. })
    }
}

impl From<Box<dyn std::error::Error + Send + Sync>> for GovernanceError {
    fn from(err: Box<dyn std::error::Error + Send + Sync>) -> Self {
        GovernanceError::Storage(err.to_string())
    }
}

impl From<validator::ValidationErrors> for GovernanceError {
    fn from(errors: validator::ValidationErrors) -> Self {
        GovernanceError::Validation(errors.to_string())
    }
}

pub type GovernanceResult<T> = Result<T, GovernanceError>;
