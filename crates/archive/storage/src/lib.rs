//! # kona-archive-storage
//!
//! Persistence for archived blob sidecars, keyed by beacon block root.
//!
//! The archiver and the retrieval API only depend on the [`BlobStorageReader`] and
//! [`BlobStorageWriter`] traits. Two backends implement them:
//!
//! - [`FileStorage`]: one JSON file per block in a local directory.
//! - [`ObjectStorage`]: one object per block in any [`object_store::ObjectStore`], S3 in
//!   production.
//!
//! Writes are whole-record overwrites. Writing the same record twice, or from two tasks at once,
//! leaves exactly one well formed record behind.

#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod error;
pub use error::{StorageError, StorageResult};

mod traits;
pub use traits::{BlobStorage, BlobStorageReader, BlobStorageWriter};

mod file;
pub use file::FileStorage;

mod object;
pub use object::ObjectStorage;

mod config;
pub use config::{S3Config, S3Credentials, StorageBackend, StorageConfig};
