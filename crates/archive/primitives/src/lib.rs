//! # kona-archive-primitives
//!
//! Core types shared by the blob archiver and the blob retrieval API.
//!
//! - [`BlockId`]: syntactic classification of a client supplied block reference.
//! - [`BlockHeaderData`]: the subset of a beacon block header the archiver walks.
//! - [`BlobSidecar`]: a single archived blob with its commitment and inclusion proof.
//! - [`BlobRecord`]: the unit persisted per beacon block root.
//!
//! Sidecars encode to JSON following the beacon API and to SSZ via [`ssz::Encode`].

#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod codec;

mod block_id;
pub use block_id::{BlockId, BlockIdError, NamedBlock};

mod header;
pub use header::{
    BEACON_BLOCK_HEADER_SSZ_LEN, BeaconBlockHeader, BlockHeaderData, SIGNED_BEACON_BLOCK_HEADER_SSZ_LEN,
    SignedBeaconBlockHeader,
};

mod sidecar;
pub use sidecar::{
    BLOB_SIDECAR_SSZ_LEN, BlobSidecar, BlobSidecars, KZG_COMMITMENT_INCLUSION_PROOF_DEPTH,
};

mod record;
pub use record::{BlobRecord, RecordHeader};

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
