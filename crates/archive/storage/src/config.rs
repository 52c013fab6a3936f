//! Backend selection.

use crate::{
    BlobStorageReader, BlobStorageWriter, FileStorage, ObjectStorage, StorageError, StorageResult,
};
use alloy_primitives::B256;
use async_trait::async_trait;
use kona_archive_primitives::BlobRecord;
use std::path::PathBuf;
use tracing::info;

/// How the S3 client authenticates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum S3Credentials {
    /// A static access key pair.
    Static {
        /// The access key id.
        access_key: String,
        /// The secret access key.
        secret_access_key: String,
    },
    /// Credentials are taken from the standard `AWS_*` environment variables or the instance
    /// metadata service.
    Environment,
}

/// S3 backend configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct S3Config {
    /// Custom endpoint, for S3 compatible services.
    pub endpoint: Option<String>,
    /// The bucket name.
    pub bucket: String,
    /// The bucket region.
    pub region: Option<String>,
    /// Allow plain HTTP endpoints.
    pub allow_http: bool,
    /// Optional key prefix inside the bucket.
    pub path: Option<String>,
    /// How to authenticate.
    pub credentials: S3Credentials,
}

/// Selects the storage backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageConfig {
    /// Store records as files in a local directory.
    File {
        /// The directory records are stored in.
        directory: PathBuf,
    },
    /// Store records as objects in an S3 bucket.
    S3(S3Config),
}

impl StorageConfig {
    /// Validates the configuration.
    pub fn check(&self) -> StorageResult<()> {
        match self {
            Self::File { directory } => {
                if directory.as_os_str().is_empty() {
                    return Err(StorageError::InvalidConfig(
                        "file storage requires a directory".to_string(),
                    ));
                }
            }
            Self::S3(config) => {
                if config.bucket.is_empty() {
                    return Err(StorageError::InvalidConfig(
                        "s3 storage requires a bucket".to_string(),
                    ));
                }
                if let S3Credentials::Static { access_key, secret_access_key } = &config.credentials
                {
                    if access_key.is_empty() || secret_access_key.is_empty() {
                        return Err(StorageError::InvalidConfig(
                            "static s3 credentials require an access key and a secret access key"
                                .to_string(),
                        ));
                    }
                }
            }
        }
        Ok(())
    }

    /// Validates the configuration and builds the selected backend.
    pub fn build(&self) -> StorageResult<StorageBackend> {
        self.check()?;
        match self {
            Self::File { directory } => {
                info!(target: "archive_storage", directory = %directory.display(), "using file storage");
                Ok(StorageBackend::File(FileStorage::new(directory.clone())))
            }
            Self::S3(config) => {
                info!(target: "archive_storage", bucket = %config.bucket, "using s3 storage");
                Ok(StorageBackend::Object(ObjectStorage::s3(config)?))
            }
        }
    }
}

/// A storage backend chosen at runtime.
#[derive(Debug, Clone)]
pub enum StorageBackend {
    /// Local filesystem.
    File(FileStorage),
    /// Object store.
    Object(ObjectStorage),
}

#[async_trait]
impl BlobStorageReader for StorageBackend {
    async fn exists(&self, hash: B256) -> StorageResult<bool> {
        match self {
            Self::File(storage) => storage.exists(hash).await,
            Self::Object(storage) => storage.exists(hash).await,
        }
    }

    async fn read(&self, hash: B256) -> StorageResult<BlobRecord> {
        match self {
            Self::File(storage) => storage.read(hash).await,
            Self::Object(storage) => storage.read(hash).await,
        }
    }
}

#[async_trait]
impl BlobStorageWriter for StorageBackend {
    async fn write(&self, record: &BlobRecord) -> StorageResult<()> {
        match self {
            Self::File(storage) => storage.write(record).await,
            Self::Object(storage) => storage.write(record).await,
        }
    }
}
