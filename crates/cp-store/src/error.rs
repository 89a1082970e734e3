//! Store errors

use cp_core::ValidationErrors;
use cp_db::AdapterError;
use cp_models::ProjectId;
use thiserror::Error;

/// Error type for store operations
#[derive(Debug, Error)]
pub enum StoreError {
    /// Rejected before anything was sent to the collection
    #[error(transparent)]
    Validation(#[from] ValidationErrors),

    #[error("Project not found: {0}")]
    NotFound(ProjectId),

    /// The collection call failed; not retried
    #[error("Adapter error: {0}")]
    Adapter(#[from] AdapterError),
}

impl StoreError {
    pub fn error_code(&self) -> &'static str {
        match self {
            StoreError::Validation(_) => "validation_failed",
            StoreError::NotFound(_) => "not_found",
            StoreError::Adapter(_) => "adapter_error",
        }
    }
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;
