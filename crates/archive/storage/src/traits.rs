use crate::StorageResult;
use alloy_primitives::B256;
use async_trait::async_trait;
use kona_archive_primitives::BlobRecord;
use std::fmt::Debug;

/// Read access to archived blob records.
///
/// Implementations must be safe to share between concurrently running tasks.
#[async_trait]
pub trait BlobStorageReader: Debug + Send + Sync {
    /// Returns whether a record is stored for the block with root `hash`.
    ///
    /// A missing record is `Ok(false)`, never an error.
    async fn exists(&self, hash: B256) -> StorageResult<bool>;

    /// Reads the record stored for the block with root `hash`.
    ///
    /// # Returns
    /// * `Ok(BlobRecord)` if a record is stored.
    /// * `Err(StorageError::NotFound)` if no record is stored.
    /// * `Err(StorageError)` for any other backend failure.
    async fn read(&self, hash: B256) -> StorageResult<BlobRecord>;
}

/// Write access to archived blob records.
#[async_trait]
pub trait BlobStorageWriter: Debug + Send + Sync {
    /// Persists `record` under its block root, replacing any existing record.
    ///
    /// Concurrent writes of the same key must leave one complete record behind, and writes to
    /// different keys must not interfere with each other.
    async fn write(&self, record: &BlobRecord) -> StorageResult<()>;
}

/// Combined read and write access.
pub trait BlobStorage: BlobStorageReader + BlobStorageWriter {}

impl<T> BlobStorage for T where T: BlobStorageReader + BlobStorageWriter {}
