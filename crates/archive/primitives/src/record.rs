//! The archived unit persisted per beacon block.

use crate::{BlobSidecar, BlobSidecars};
use alloy_primitives::B256;
use serde::{Deserialize, Serialize};

/// Identifies the block a [`BlobRecord`] belongs to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordHeader {
    /// Root of the beacon block. This is the storage key of the record.
    pub beacon_block_hash: B256,
}

/// All blob sidecars of a single beacon block.
///
/// A record is written whole and never merged with an existing one. Writing the same block twice
/// replaces the previous record with an identical one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlobRecord {
    /// The record header.
    pub header: RecordHeader,
    /// The sidecars, in the order returned by the beacon node.
    pub blob_sidecars: BlobSidecars,
}

impl BlobRecord {
    /// Creates a new record for the block with root `block_hash`.
    pub const fn new(block_hash: B256, sidecars: Vec<BlobSidecar>) -> Self {
        Self {
            header: RecordHeader { beacon_block_hash: block_hash },
            blob_sidecars: BlobSidecars::new(sidecars),
        }
    }

    /// Returns the root of the block, which is the record's storage key.
    pub const fn block_hash(&self) -> B256 {
        self.header.beacon_block_hash
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::blob_sidecars;

    #[test]
    fn test_record_json_layout() {
        let record = BlobRecord::new(B256::repeat_byte(0xab), blob_sidecars(1, 1));
        let value = serde_json::to_value(&record).unwrap();

        assert_eq!(value["header"]["beacon_block_hash"], format!("{}", B256::repeat_byte(0xab)));
        assert_eq!(value["blob_sidecars"]["data"].as_array().unwrap().len(), 1);

        let decoded: BlobRecord = serde_json::from_value(value).unwrap();
        assert_eq!(decoded, record);
    }
}
