use crate::BeaconClientResult;
use async_trait::async_trait;
use kona_archive_primitives::{BlobSidecar, BlockHeaderData, BlockId};
use std::fmt::Debug;

/// Resolves block identifiers to beacon block headers.
#[async_trait]
pub trait BlockHeaderProvider: Debug + Send + Sync {
    /// Fetches the header of the block referenced by `block_id`.
    ///
    /// Returns [`crate::BeaconClientError::NotFound`] if the beacon node does not know the block.
    async fn block_header(&self, block_id: &BlockId) -> BeaconClientResult<BlockHeaderData>;
}

/// Provides the blob sidecars of a block.
#[async_trait]
pub trait BlobSidecarProvider: Debug + Send + Sync {
    /// Fetches all blob sidecars of the block referenced by `block_id`, ordered by index.
    async fn blob_sidecars(&self, block_id: &BlockId) -> BeaconClientResult<Vec<BlobSidecar>>;
}

/// The full capability set the archiver needs from a beacon node.
pub trait BeaconClient: BlockHeaderProvider + BlobSidecarProvider {}

impl<T> BeaconClient for T where T: BlockHeaderProvider + BlobSidecarProvider {}
