//! Deterministic fixtures for tests.

use crate::{BeaconBlockHeader, BlobSidecar, KZG_COMMITMENT_INCLUSION_PROOF_DEPTH, SignedBeaconBlockHeader};
use alloy_eips::eip4844::Blob;
use alloy_primitives::{B256, FixedBytes};

/// Builds `count` sidecars with indices `0..count`.
///
/// Every byte of the fixture is derived from `seed` and the index, so two calls with the same
/// arguments produce equal sidecars and different seeds produce different blobs.
pub fn blob_sidecars(seed: u8, count: usize) -> Vec<BlobSidecar> {
    (0..count)
        .map(|index| {
            let fill = seed.wrapping_mul(31).wrapping_add(index as u8);
            BlobSidecar {
                index: index as u64,
                blob: Box::new(Blob::repeat_byte(fill)),
                kzg_commitment: FixedBytes::repeat_byte(fill.wrapping_add(1)),
                kzg_proof: FixedBytes::repeat_byte(fill.wrapping_add(2)),
                signed_block_header: SignedBeaconBlockHeader {
                    message: BeaconBlockHeader {
                        slot: seed as u64,
                        proposer_index: index as u64,
                        parent_root: B256::repeat_byte(seed.wrapping_sub(1)),
                        state_root: B256::repeat_byte(fill),
                        body_root: B256::repeat_byte(fill.wrapping_add(3)),
                    },
                    signature: FixedBytes::repeat_byte(seed),
                },
                kzg_commitment_inclusion_proof: [B256::repeat_byte(fill);
                    KZG_COMMITMENT_INCLUSION_PROOF_DEPTH],
            }
        })
        .collect()
}
