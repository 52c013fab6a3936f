//! Local filesystem backend.

use crate::{BlobStorageReader, BlobStorageWriter, StorageError, StorageResult};
use alloy_primitives::B256;
use async_trait::async_trait;
use kona_archive_primitives::BlobRecord;
use std::{
    io::{self, Write},
    path::{Path, PathBuf},
};
use tempfile::NamedTempFile;
use tracing::debug;

/// Stores each [`BlobRecord`] as a JSON file named after its block root.
#[derive(Debug, Clone)]
pub struct FileStorage {
    directory: PathBuf,
}

impl FileStorage {
    /// Creates a new [`FileStorage`] rooted at `directory`.
    ///
    /// The directory is created on the first write if it does not exist yet.
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self { directory: directory.into() }
    }

    /// Returns the directory records are stored in.
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    fn record_path(&self, hash: B256) -> PathBuf {
        self.directory.join(hash.to_string())
    }
}

#[async_trait]
impl BlobStorageReader for FileStorage {
    async fn exists(&self, hash: B256) -> StorageResult<bool> {
        Ok(tokio::fs::try_exists(self.record_path(hash)).await?)
    }

    async fn read(&self, hash: B256) -> StorageResult<BlobRecord> {
        match tokio::fs::read(self.record_path(hash)).await {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Err(StorageError::NotFound(hash)),
            Err(err) => Err(err.into()),
        }
    }
}

#[async_trait]
impl BlobStorageWriter for FileStorage {
    async fn write(&self, record: &BlobRecord) -> StorageResult<()> {
        let hash = record.block_hash();
        let bytes = serde_json::to_vec(record)?;
        let directory = self.directory.clone();
        let path = self.record_path(hash);

        // The record is staged in a temp file and renamed into place, so readers and concurrent
        // writers of the same key only ever observe a complete file.
        tokio::task::spawn_blocking(move || -> io::Result<()> {
            std::fs::create_dir_all(&directory)?;
            let mut staged = NamedTempFile::new_in(&directory)?;
            staged.write_all(&bytes)?;
            staged.as_file().sync_all()?;
            staged.persist(&path).map_err(|err| err.error)?;
            Ok(())
        })
        .await
        .map_err(io::Error::other)??;

        debug!(target: "archive_storage", %hash, "wrote blob record to file");
        Ok(())
    }
}
