use access_core::error::AppError;
use std::fmt;
use thiserror::Error;

use crate::models::{Role, UserId, WorkflowChain, WorkflowRoleKey};

/// Catalog entry named by a caller that the catalog does not contain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogEntry {
    Module(String),
    Action { module: String, action: String },
    WorkflowRole(String),
}

impl fmt::Display for CatalogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogEntry::Module(module) => write!(f, "module '{}'", module),
            CatalogEntry::Action { module, action } => {
                write!(f, "action '{}' in module '{}'", action, module)
            }
            CatalogEntry::WorkflowRole(key) => write!(f, "workflow role '{}'", key),
        }
    }
}

#[derive(Error, Debug)]
pub enum AccessError {
    #[error("Unknown catalog entry: {0}")]
    UnknownCatalogEntry(CatalogEntry),

    #[error("User {user_id} already signs as {held_stage} in the {chain} chain and cannot also be {requested}")]
    DuplicateSignerConflict {
        user_id: UserId,
        requested: WorkflowRoleKey,
        held_stage: WorkflowRoleKey,
        chain: WorkflowChain,
    },

    #[error("Permissions of the {0} role cannot be edited")]
    PrivilegedRoleImmutable(Role),

    #[error("User {user_id} ({role}) cannot be assigned to workflow stages")]
    IneligibleAssignee { user_id: UserId, role: Role },

    #[error("Invalid catalog: {0}")]
    InvalidCatalog(String),

    #[error("Invalid staff record: {0}")]
    InvalidStaffRecord(#[from] validator::ValidationErrors),

    #[error("Malformed document: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<AccessError> for AppError {
    fn from(err: AccessError) -> Self {
        match err {
            AccessError::UnknownCatalogEntry(_) => AppError::NotFound(anyhow::anyhow!(err)),
            AccessError::DuplicateSignerConflict { .. } => AppError::Conflict(anyhow::anyhow!(err)),
            AccessError::PrivilegedRoleImmutable(_) | AccessError::IneligibleAssignee { .. } => {
                AppError::Forbidden(anyhow::anyhow!(err))
            }
            AccessError::InvalidCatalog(_) => AppError::ConfigError(anyhow::anyhow!(err)),
            AccessError::InvalidStaffRecord(e) => AppError::ValidationError(e),
            AccessError::Serialization(e) => AppError::SerializationError(e),
        }
    }
}
