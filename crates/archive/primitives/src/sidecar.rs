//! Blob sidecar types and their SSZ encoding.

use crate::{SIGNED_BEACON_BLOCK_HEADER_SSZ_LEN, SignedBeaconBlockHeader, codec::SszCursor};
use alloy_eips::eip4844::{BYTES_PER_BLOB, Blob};
use alloy_primitives::{B256, Bytes, FixedBytes};
use serde::{Deserialize, Deserializer, Serialize, de::Error as _};
use serde_with::{DisplayFromStr, serde_as};
use ssz::{Decode, DecodeError, Encode};

/// Depth of the merkle proof of a KZG commitment in the block body.
pub const KZG_COMMITMENT_INCLUSION_PROOF_DEPTH: usize = 17;

/// SSZ length of a [`BlobSidecar`].
pub const BLOB_SIDECAR_SSZ_LEN: usize = 8 +
    BYTES_PER_BLOB +
    48 +
    48 +
    SIGNED_BEACON_BLOCK_HEADER_SSZ_LEN +
    32 * KZG_COMMITMENT_INCLUSION_PROOF_DEPTH;

/// A blob published alongside a beacon block, together with the data needed to verify it.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlobSidecar {
    /// Position of the blob within the block.
    #[serde_as(as = "DisplayFromStr")]
    pub index: u64,
    /// The blob contents.
    #[serde(deserialize_with = "deserialize_blob")]
    pub blob: Box<Blob>,
    /// The KZG commitment to the blob.
    pub kzg_commitment: FixedBytes<48>,
    /// The KZG proof for the blob.
    pub kzg_proof: FixedBytes<48>,
    /// The header of the block the blob belongs to.
    pub signed_block_header: SignedBeaconBlockHeader,
    /// Merkle proof of the commitment against the block body root.
    pub kzg_commitment_inclusion_proof: [B256; KZG_COMMITMENT_INCLUSION_PROOF_DEPTH],
}

/// Deserializes a hex encoded blob without requiring a stack allocated hex buffer of the full
/// blob size.
fn deserialize_blob<'de, D>(deserializer: D) -> Result<Box<Blob>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Bytes::deserialize(deserializer)?;
    Blob::try_from(raw.as_ref())
        .map(Box::new)
        .map_err(|_| D::Error::invalid_length(raw.len(), &"a 131072 byte blob"))
}

impl Encode for BlobSidecar {
    fn is_ssz_fixed_len() -> bool {
        true
    }

    fn ssz_fixed_len() -> usize {
        BLOB_SIDECAR_SSZ_LEN
    }

    fn ssz_bytes_len(&self) -> usize {
        BLOB_SIDECAR_SSZ_LEN
    }

    fn ssz_append(&self, buf: &mut Vec<u8>) {
        buf.reserve(BLOB_SIDECAR_SSZ_LEN);
        buf.extend_from_slice(&self.index.to_le_bytes());
        buf.extend_from_slice(self.blob.as_slice());
        buf.extend_from_slice(self.kzg_commitment.as_slice());
        buf.extend_from_slice(self.kzg_proof.as_slice());
        self.signed_block_header.ssz_append(buf);
        for node in &self.kzg_commitment_inclusion_proof {
            buf.extend_from_slice(node.as_slice());
        }
    }
}

impl Decode for BlobSidecar {
    fn is_ssz_fixed_len() -> bool {
        true
    }

    fn ssz_fixed_len() -> usize {
        BLOB_SIDECAR_SSZ_LEN
    }

    fn from_ssz_bytes(bytes: &[u8]) -> Result<Self, DecodeError> {
        let mut cursor = SszCursor::new(bytes, BLOB_SIDECAR_SSZ_LEN)?;
        let index = cursor.read_u64()?;
        let blob = Box::new(Blob::from_slice(cursor.take(BYTES_PER_BLOB)));
        let kzg_commitment = cursor.read_fixed();
        let kzg_proof = cursor.read_fixed();
        let signed_block_header = cursor.read()?;

        let mut kzg_commitment_inclusion_proof = [B256::ZERO; KZG_COMMITMENT_INCLUSION_PROOF_DEPTH];
        for node in &mut kzg_commitment_inclusion_proof {
            *node = cursor.read_fixed();
        }

        Ok(Self {
            index,
            blob,
            kzg_commitment,
            kzg_proof,
            signed_block_header,
            kzg_commitment_inclusion_proof,
        })
    }
}

/// An ordered list of [`BlobSidecar`]s, in the `{ "data": [...] }` envelope used by the beacon
/// API.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlobSidecars {
    /// The sidecars.
    pub data: Vec<BlobSidecar>,
}

impl BlobSidecars {
    /// Creates a new [`BlobSidecars`] from a list of sidecars.
    pub const fn new(data: Vec<BlobSidecar>) -> Self {
        Self { data }
    }

    /// Returns the number of sidecars.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if there are no sidecars.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Keeps only the sidecars whose index is contained in `indices`, preserving order.
    ///
    /// Requested indices without a matching sidecar are ignored.
    pub fn retain_indices(&mut self, indices: &[u64]) {
        self.data.retain(|sidecar| indices.contains(&sidecar.index));
    }

    /// Encodes the sidecars as an SSZ list.
    pub fn to_ssz_bytes(&self) -> Vec<u8> {
        self.data.as_ssz_bytes()
    }

    /// Decodes an SSZ list of sidecars.
    pub fn from_ssz_bytes(bytes: &[u8]) -> Result<Self, DecodeError> {
        Vec::<BlobSidecar>::from_ssz_bytes(bytes).map(Self::new)
    }
}

impl From<Vec<BlobSidecar>> for BlobSidecars {
    fn from(data: Vec<BlobSidecar>) -> Self {
        Self::new(data)
    }
}
