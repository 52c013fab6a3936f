//! Beacon block header types.

use crate::codec::SszCursor;
use alloy_primitives::{B256, FixedBytes};
use serde::{Deserialize, Serialize};
use serde_with::{DisplayFromStr, serde_as};
use ssz::{Decode, DecodeError, Encode};

/// SSZ length of a [`BeaconBlockHeader`].
pub const BEACON_BLOCK_HEADER_SSZ_LEN: usize = 8 + 8 + 32 * 3;

/// SSZ length of a [`SignedBeaconBlockHeader`].
pub const SIGNED_BEACON_BLOCK_HEADER_SSZ_LEN: usize = BEACON_BLOCK_HEADER_SSZ_LEN + 96;

/// A beacon block header message.
#[serde_as]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BeaconBlockHeader {
    /// The slot of the block.
    #[serde_as(as = "DisplayFromStr")]
    pub slot: u64,
    /// The index of the validator that proposed the block.
    #[serde_as(as = "DisplayFromStr")]
    pub proposer_index: u64,
    /// The root of the parent block.
    pub parent_root: B256,
    /// The post state root.
    pub state_root: B256,
    /// The root of the block body.
    pub body_root: B256,
}

/// A [`BeaconBlockHeader`] with the proposer's BLS signature.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedBeaconBlockHeader {
    /// The header message.
    pub message: BeaconBlockHeader,
    /// The proposer signature over the message.
    pub signature: FixedBytes<96>,
}

/// A beacon block header as returned by the `headers` beacon API endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockHeaderData {
    /// The root of the block this header belongs to.
    pub root: B256,
    /// Whether the block is part of the canonical chain.
    pub canonical: bool,
    /// The signed header.
    pub header: SignedBeaconBlockHeader,
}

impl BlockHeaderData {
    /// Returns the block root.
    pub const fn root(&self) -> B256 {
        self.root
    }

    /// Returns the root of the parent block.
    pub const fn parent_root(&self) -> B256 {
        self.header.message.parent_root
    }

    /// Returns the slot of the block.
    pub const fn slot(&self) -> u64 {
        self.header.message.slot
    }
}

impl Encode for BeaconBlockHeader {
    fn is_ssz_fixed_len() -> bool {
        true
    }

    fn ssz_fixed_len() -> usize {
        BEACON_BLOCK_HEADER_SSZ_LEN
    }

    fn ssz_bytes_len(&self) -> usize {
        BEACON_BLOCK_HEADER_SSZ_LEN
    }

    fn ssz_append(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(&self.slot.to_le_bytes());
        buf.extend_from_slice(&self.proposer_index.to_le_bytes());
        buf.extend_from_slice(self.parent_root.as_slice());
        buf.extend_from_slice(self.state_root.as_slice());
        buf.extend_from_slice(self.body_root.as_slice());
    }
}

impl Decode for BeaconBlockHeader {
    fn is_ssz_fixed_len() -> bool {
        true
    }

    fn ssz_fixed_len() -> usize {
        BEACON_BLOCK_HEADER_SSZ_LEN
    }

    fn from_ssz_bytes(bytes: &[u8]) -> Result<Self, DecodeError> {
        let mut cursor = SszCursor::new(bytes, BEACON_BLOCK_HEADER_SSZ_LEN)?;
        Ok(Self {
            slot: cursor.read_u64()?,
            proposer_index: cursor.read_u64()?,
            parent_root: cursor.read_fixed(),
            state_root: cursor.read_fixed(),
            body_root: cursor.read_fixed(),
        })
    }
}

impl Encode for SignedBeaconBlockHeader {
    fn is_ssz_fixed_len() -> bool {
        true
    }

    fn ssz_fixed_len() -> usize {
        SIGNED_BEACON_BLOCK_HEADER_SSZ_LEN
    }

    fn ssz_bytes_len(&self) -> usize {
        SIGNED_BEACON_BLOCK_HEADER_SSZ_LEN
    }

    fn ssz_append(&self, buf: &mut Vec<u8>) {
        self.message.ssz_append(buf);
        buf.extend_from_slice(self.signature.as_slice());
    }
}

impl Decode for SignedBeaconBlockHeader {
    fn is_ssz_fixed_len() -> bool {
        true
    }

    fn ssz_fixed_len() -> usize {
        SIGNED_BEACON_BLOCK_HEADER_SSZ_LEN
    }

    fn from_ssz_bytes(bytes: &[u8]) -> Result<Self, DecodeError> {
        let mut cursor = SszCursor::new(bytes, SIGNED_BEACON_BLOCK_HEADER_SSZ_LEN)?;
        Ok(Self { message: cursor.read()?, signature: cursor.read_fixed() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::b256;

    #[test]
    fn test_header_response_json() {
        let raw = r#"{
            "root": "0xcf8e0d4e9587369b2301d0790347320302cc0943d5a1884560367e8208d920f2",
            "canonical": true,
            "header": {
                "message": {
                    "slot": "1",
                    "proposer_index": "1",
                    "parent_root": "0x1f8e0d4e9587369b2301d0790347320302cc0943d5a1884560367e8208d920f2",
                    "state_root": "0x2f8e0d4e9587369b2301d0790347320302cc0943d5a1884560367e8208d920f2",
                    "body_root": "0x3f8e0d4e9587369b2301d0790347320302cc0943d5a1884560367e8208d920f2"
                },
                "signature": "0x1b66ac1fb663c9bc59509846d6ec05345bd908eda73e670af888da41af171505cc411d61252fb6cb3fa0017b679f8bb2305b26a285fa2737f175668d0dff91cc1b66ac1fb663c9bc59509846d6ec05345bd908eda73e670af888da41af171505"
            }
        }"#;

        let header: BlockHeaderData = serde_json::from_str(raw).unwrap();
        assert_eq!(
            header.root(),
            b256!("0xcf8e0d4e9587369b2301d0790347320302cc0943d5a1884560367e8208d920f2")
        );
        assert_eq!(
            header.parent_root(),
            b256!("0x1f8e0d4e9587369b2301d0790347320302cc0943d5a1884560367e8208d920f2")
        );
        assert_eq!(header.slot(), 1);
        assert!(header.canonical);

        let value = serde_json::to_value(header).unwrap();
        assert_eq!(value["header"]["message"]["slot"], "1");
    }

    #[test]
    fn test_signed_header_ssz_layout() {
        let header = SignedBeaconBlockHeader {
            message: BeaconBlockHeader {
                slot: 7,
                proposer_index: 3,
                parent_root: B256::repeat_byte(1),
                state_root: B256::repeat_byte(2),
                body_root: B256::repeat_byte(3),
            },
            signature: FixedBytes::repeat_byte(4),
        };

        let bytes = header.as_ssz_bytes();
        assert_eq!(bytes.len(), SIGNED_BEACON_BLOCK_HEADER_SSZ_LEN);
        assert_eq!(&bytes[..8], &7u64.to_le_bytes());
        assert_eq!(&bytes[16..48], B256::repeat_byte(1).as_slice());
        assert_eq!(SignedBeaconBlockHeader::from_ssz_bytes(&bytes).unwrap(), header);
    }

    #[test]
    fn test_signed_header_ssz_rejects_wrong_length() {
        let err = SignedBeaconBlockHeader::from_ssz_bytes(&[0u8; 10]).unwrap_err();
        assert_eq!(
            err,
            DecodeError::InvalidByteLength { len: 10, expected: SIGNED_BEACON_BLOCK_HEADER_SSZ_LEN }
        );
    }
}
