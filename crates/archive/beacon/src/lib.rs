//! # kona-archive-beacon
//!
//! The narrow view of a beacon node the blob archiver needs: fetching a block header by
//! [`BlockId`] and fetching the blob sidecars of a block.
//!
//! [`OnlineBeaconClient`] talks to a beacon node over the standard HTTP API. With the
//! `test-utils` feature, `StubBeaconClient` serves deterministic in-memory blocks.
//!
//! [`BlockId`]: kona_archive_primitives::BlockId

#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod errors;
pub use errors::{BeaconClientError, BeaconClientResult};

mod traits;
pub use traits::{BeaconClient, BlobSidecarProvider, BlockHeaderProvider};

mod online;
pub use online::{BeaconConfig, OnlineBeaconClient};

#[cfg(any(test, feature = "test-utils"))]
mod stub;
#[cfg(any(test, feature = "test-utils"))]
pub use stub::StubBeaconClient;
