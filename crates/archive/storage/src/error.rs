use alloy_primitives::B256;
use thiserror::Error;

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors that may occur while interacting with blob storage.
///
/// Every variant except [`StorageError::NotFound`] means the backend itself is unavailable or
/// misbehaving. Callers on the ingestion path treat those as retryable.
#[derive(Debug, Error)]
pub enum StorageError {
    /// No record is stored for the given block root.
    #[error("no record stored for block {0}")]
    NotFound(B256),

    /// Filesystem error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Object store error.
    #[error("object store error: {0}")]
    ObjectStore(#[from] object_store::Error),

    /// A stored record could not be encoded or decoded.
    #[error("failed to (de)serialize record: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The storage configuration is incomplete or inconsistent.
    #[error("invalid storage config: {0}")]
    InvalidConfig(String),
}

impl StorageError {
    /// Returns `true` if the error is [`StorageError::NotFound`].
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}
