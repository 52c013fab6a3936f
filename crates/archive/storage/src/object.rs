//! Object store backend.

use crate::{BlobStorageReader, BlobStorageWriter, S3Config, S3Credentials, StorageError, StorageResult};
use alloy_primitives::B256;
use async_trait::async_trait;
use kona_archive_primitives::BlobRecord;
use object_store::{ObjectStore, aws::AmazonS3Builder, memory::InMemory, path::Path};
use std::sync::Arc;
use tracing::debug;

/// Stores each [`BlobRecord`] as a JSON object named after its block root.
#[derive(Debug, Clone)]
pub struct ObjectStorage {
    store: Arc<dyn ObjectStore>,
    prefix: Option<Path>,
}

impl ObjectStorage {
    /// Creates a new [`ObjectStorage`] writing to the root of `store`.
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self { store, prefix: None }
    }

    /// Places every object under `prefix`.
    pub fn with_prefix(mut self, prefix: impl Into<Path>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// Creates an [`ObjectStorage`] backed by a process local in-memory store.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemory::new()))
    }

    /// Creates an [`ObjectStorage`] backed by an S3 compatible bucket.
    pub fn s3(config: &S3Config) -> StorageResult<Self> {
        let builder = match &config.credentials {
            S3Credentials::Static { access_key, secret_access_key } => AmazonS3Builder::new()
                .with_access_key_id(access_key)
                .with_secret_access_key(secret_access_key),
            S3Credentials::Environment => AmazonS3Builder::from_env(),
        };

        let mut builder =
            builder.with_bucket_name(&config.bucket).with_allow_http(config.allow_http);
        if let Some(endpoint) = &config.endpoint {
            builder = builder.with_endpoint(endpoint);
        }
        if let Some(region) = &config.region {
            builder = builder.with_region(region);
        }

        let storage = Self::new(Arc::new(builder.build()?));
        Ok(match &config.path {
            Some(path) => storage.with_prefix(path.as_str()),
            None => storage,
        })
    }

    fn location(&self, hash: B256) -> Path {
        let name = hash.to_string();
        match &self.prefix {
            Some(prefix) => prefix.child(name),
            None => Path::from(name),
        }
    }
}

#[async_trait]
impl BlobStorageReader for ObjectStorage {
    async fn exists(&self, hash: B256) -> StorageResult<bool> {
        match self.store.head(&self.location(hash)).await {
            Ok(_) => Ok(true),
            Err(object_store::Error::NotFound { .. }) => Ok(false),
            Err(err) => Err(err.into()),
        }
    }

    async fn read(&self, hash: B256) -> StorageResult<BlobRecord> {
        let result = match self.store.get(&self.location(hash)).await {
            Ok(result) => result,
            Err(object_store::Error::NotFound { .. }) => return Err(StorageError::NotFound(hash)),
            Err(err) => return Err(err.into()),
        };
        let bytes = result.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[async_trait]
impl BlobStorageWriter for ObjectStorage {
    async fn write(&self, record: &BlobRecord) -> StorageResult<()> {
        let hash = record.block_hash();
        let payload = serde_json::to_vec(record)?;
        let result = self.store.put(&self.location(hash), payload.into()).await?;
        debug!(target: "archive_storage", %hash, e_tag = ?result.e_tag, "wrote blob record to object store");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kona_archive_primitives::test_utils::blob_sidecars;

    #[tokio::test]
    async fn test_write_then_read() {
        let storage = ObjectStorage::in_memory();
        let record = BlobRecord::new(B256::repeat_byte(1), blob_sidecars(1, 2));

        assert!(!storage.exists(record.block_hash()).await.unwrap());
        storage.write(&record).await.unwrap();

        assert!(storage.exists(record.block_hash()).await.unwrap());
        assert_eq!(storage.read(record.block_hash()).await.unwrap(), record);
    }

    #[tokio::test]
    async fn test_read_missing_record() {
        let storage = ObjectStorage::in_memory();
        assert!(storage.read(B256::repeat_byte(1)).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_prefix_is_applied() {
        let store = Arc::new(InMemory::new());
        let storage = ObjectStorage::new(store.clone()).with_prefix("blobs");
        let hash = B256::repeat_byte(7);
        storage.write(&BlobRecord::new(hash, blob_sidecars(7, 1))).await.unwrap();

        let location = Path::from("blobs").child(hash.to_string());
        assert!(store.head(&location).await.is_ok());
        assert!(ObjectStorage::new(store).exists(hash).await.is_ok_and(|exists| !exists));
    }

    #[tokio::test]
    async fn test_overwrite_keeps_single_record() {
        let storage = ObjectStorage::in_memory();
        let record = BlobRecord::new(B256::repeat_byte(2), blob_sidecars(2, 2));

        let (a, b) = tokio::join!(storage.write(&record), storage.write(&record));
        a.unwrap();
        b.unwrap();

        assert_eq!(storage.read(record.block_hash()).await.unwrap(), record);
    }
}
