use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    /// A mutation was attempted on a device whose state is `InUse`.
    #[error("Device in use: {0}")]
    InUse(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    /// Connectivity or driver failure in the storage backend.
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Update failed: {0}")]
    UpdateFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),
}

/// Convenience alias for fallible domain and repository operations.
pub type CoreResult<T> = Result<T, CoreError>;
