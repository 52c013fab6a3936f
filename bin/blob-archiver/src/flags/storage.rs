//! Storage backend flags.

use anyhow::{Result, anyhow};
use clap::{Args, ValueEnum};
use kona_archive_storage::{S3Config, S3Credentials, StorageConfig};
use std::path::PathBuf;

/// The storage backend to use.
#[derive(ValueEnum, Default, Clone, Copy, Debug, PartialEq, Eq)]
pub enum StorageType {
    /// Local filesystem.
    #[default]
    File,
    /// S3 or an S3 compatible object store.
    S3,
}

/// How to authenticate against S3.
#[derive(ValueEnum, Default, Clone, Copy, Debug, PartialEq, Eq)]
pub enum S3CredentialType {
    /// Use `--s3.access-key` and `--s3.secret-access-key`.
    #[default]
    Static,
    /// Read credentials from the environment.
    Env,
}

/// Storage backend flags.
#[derive(Args, Clone, Debug, Default)]
pub struct StorageArgs {
    /// The storage backend.
    #[arg(long = "storage.type", value_enum, default_value_t, env = "STORAGE_TYPE")]
    pub storage_type: StorageType,
    /// Directory for file storage.
    #[arg(long = "storage.file-path", env = "FILE_STORAGE_PATH")]
    pub file_path: Option<PathBuf>,
    /// Custom S3 endpoint.
    #[arg(long = "s3.endpoint", env = "S3_ENDPOINT")]
    pub s3_endpoint: Option<String>,
    /// S3 bucket name.
    #[arg(long = "s3.bucket", env = "S3_BUCKET")]
    pub s3_bucket: Option<String>,
    /// S3 access key, for static credentials.
    #[arg(long = "s3.access-key", env = "S3_ACCESS_KEY")]
    pub s3_access_key: Option<String>,
    /// S3 secret access key, for static credentials.
    #[arg(long = "s3.secret-access-key", env = "S3_SECRET_ACCESS_KEY")]
    pub s3_secret_access_key: Option<String>,
    /// How to authenticate against S3.
    #[arg(long = "s3.credential-type", value_enum, default_value_t, env = "S3_CREDENTIAL_TYPE")]
    pub s3_credential_type: S3CredentialType,
    /// Allow plain HTTP S3 endpoints.
    #[arg(long = "s3.allow-http", env = "S3_ALLOW_HTTP")]
    pub s3_allow_http: bool,
    /// S3 bucket region.
    #[arg(long = "s3.region", env = "S3_REGION")]
    pub s3_region: Option<String>,
    /// Key prefix inside the bucket.
    #[arg(long = "s3.path", env = "S3_PATH")]
    pub s3_path: Option<String>,
}

impl StorageArgs {
    /// Builds and validates the storage config.
    pub fn config(&self) -> Result<StorageConfig> {
        let config = match self.storage_type {
            StorageType::File => StorageConfig::File {
                directory: self
                    .file_path
                    .clone()
                    .ok_or_else(|| anyhow!("--storage.file-path is required for file storage"))?,
            },
            StorageType::S3 => {
                let credentials = match self.s3_credential_type {
                    S3CredentialType::Static => S3Credentials::Static {
                        access_key: self.s3_access_key.clone().unwrap_or_default(),
                        secret_access_key: self.s3_secret_access_key.clone().unwrap_or_default(),
                    },
                    S3CredentialType::Env => S3Credentials::Environment,
                };
                StorageConfig::S3(S3Config {
                    endpoint: self.s3_endpoint.clone(),
                    bucket: self.s3_bucket.clone().unwrap_or_default(),
                    region: self.s3_region.clone(),
                    allow_http: self.s3_allow_http,
                    path: self.s3_path.clone(),
                    credentials,
                })
            }
        };
        config.check()?;
        Ok(config)
    }
}
