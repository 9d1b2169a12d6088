use thiserror::Error;

use crate::model::{DatabaseError, ResourceType, SnapshotError};

pub type AcademyResult<T> = std::result::Result<T, AcademyError>;

#[derive(Debug, Error)]
pub enum AcademyError {
    #[error("{resource_type:?} not found: {id}")]
    NotFound {
        resource_type: ResourceType,
        id: String,
    },
    #[error("invalid state: {0}")]
    InvalidState(String),
    #[error("snapshot error: {0}")]
    Snapshot(#[from] SnapshotError),
    #[error("storage error: {0}")]
    Store(#[from] DatabaseError),
}

impl AcademyError {
    pub fn not_found<S: Into<String>>(resource_type: ResourceType, id: S) -> Self {
        Self::NotFound {
            resource_type,
            id: id.into(),
        }
    }

    pub fn invalid_state<S: Into<String>>(reason: S) -> Self {
        Self::InvalidState(reason.into())
    }
}
