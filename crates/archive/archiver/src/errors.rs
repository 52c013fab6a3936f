use kona_archive_beacon::BeaconClientError;
use kona_archive_storage::StorageError;
use thiserror::Error;

/// Result type for archiver operations.
pub type ArchiverResult<T> = Result<T, ArchiverError>;

/// Errors produced by the [`crate::ArchiverService`].
#[derive(Debug, Error)]
pub enum ArchiverError {
    /// Fetching a header or blob sidecars from the beacon node failed.
    #[error("beacon client error: {0}")]
    Beacon(#[from] BeaconClientError),

    /// Checking for or writing a record failed.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// [`crate::ArchiverService::stop`] was called more than once.
    #[error("already stopped")]
    AlreadyStopped,

    /// The archiver configuration is invalid.
    #[error("invalid archiver config: {0}")]
    InvalidConfig(String),
}
