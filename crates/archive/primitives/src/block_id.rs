//! Classification of client supplied block identifiers.

use alloy_primitives::B256;
use core::{fmt, str::FromStr};
use strum::{Display, EnumString};

/// Length of a `0x` prefixed, hex encoded 32 byte root.
const HEX_ROOT_LEN: usize = 66;

/// A block reference that resolves relative to the current chain state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum NamedBlock {
    /// The current head of the canonical chain.
    Head,
    /// The most recent finalized block.
    Finalized,
    /// The genesis block.
    Genesis,
}

/// An error returned when a string is not a valid [`BlockId`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid block id: {0}")]
pub struct BlockIdError(pub String);

/// A reference to a beacon block.
///
/// Classification is purely syntactic. A [`BlockId`] says nothing about whether the block
/// exists, only which kind of lookup the chain client must perform to find it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockId {
    /// A beacon block root.
    Hash(B256),
    /// A slot number.
    Slot(u64),
    /// A named alias.
    Named(NamedBlock),
}

impl BlockId {
    /// The identifier of the current chain head.
    pub const HEAD: Self = Self::Named(NamedBlock::Head);

    /// Returns a short label for the kind of identifier, used as a metrics label.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Hash(_) => "hash",
            Self::Slot(_) => "slot",
            Self::Named(_) => "named",
        }
    }

    /// Returns the root if this identifier is a [`BlockId::Hash`].
    pub const fn as_hash(&self) -> Option<B256> {
        match self {
            Self::Hash(hash) => Some(*hash),
            _ => None,
        }
    }
}

impl From<B256> for BlockId {
    fn from(hash: B256) -> Self {
        Self::Hash(hash)
    }
}

impl From<NamedBlock> for BlockId {
    fn from(named: NamedBlock) -> Self {
        Self::Named(named)
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hash(hash) => write!(f, "{hash}"),
            Self::Slot(slot) => write!(f, "{slot}"),
            Self::Named(named) => write!(f, "{named}"),
        }
    }
}

impl FromStr for BlockId {
    type Err = BlockIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if is_hash(s) {
            return B256::from_str(s).map(Self::Hash).map_err(|_| BlockIdError(s.to_string()));
        }

        if is_slot(s) {
            // A digit string too large for a slot cannot name a block.
            return s.parse().map(Self::Slot).map_err(|_| BlockIdError(s.to_string()));
        }

        NamedBlock::from_str(s).map(Self::Named).map_err(|_| BlockIdError(s.to_string()))
    }
}

/// Returns `true` if `s` is `0x` followed by exactly 64 hex characters.
fn is_hash(s: &str) -> bool {
    s.len() == HEX_ROOT_LEN &&
        s.starts_with("0x") &&
        s.as_bytes()[2..].iter().all(|b| b.is_ascii_hexdigit())
}

/// Returns `true` if `s` is a non-empty string of decimal digits.
fn is_slot(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::b256;
    use rstest::rstest;

    #[rstest]
    #[case("0x1234567890abcdef1234567890abcdef1234567890abcdef1234567890abcdef")]
    #[case("0x1234567890ABCDEF1234567890abcdef1234567890abcdef1234567890abcdef")]
    #[case("0x0000000000000000000000000000000000000000000000000000000000000000")]
    #[case("0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa")]
    fn test_classifies_hash(#[case] raw: &str) {
        let id: BlockId = raw.parse().unwrap();
        assert!(matches!(id, BlockId::Hash(_)));
        assert_eq!(id.kind(), "hash");
    }

    #[rstest]
    #[case("0", 0)]
    #[case("123", 123)]
    #[case("00042", 42)]
    #[case("18446744073709551615", u64::MAX)]
    fn test_classifies_slot(#[case] raw: &str, #[case] slot: u64) {
        assert_eq!(raw.parse::<BlockId>().unwrap(), BlockId::Slot(slot));
    }

    #[rstest]
    #[case("head", NamedBlock::Head)]
    #[case("finalized", NamedBlock::Finalized)]
    #[case("genesis", NamedBlock::Genesis)]
    fn test_classifies_named(#[case] raw: &str, #[case] named: NamedBlock) {
        assert_eq!(raw.parse::<BlockId>().unwrap(), BlockId::Named(named));
    }

    #[rstest]
    // Missing the 0x prefix.
    #[case("1234567890abcdef1234567890abcdef1234567890abcdef1234567890abcdef")]
    // Invalid trailing hex character.
    #[case("0x1234567890abcdef1234567890abcdef1234567890abcdef1234567890abcdez")]
    // Too short.
    #[case("0x1234567890abcdef123")]
    // Too long.
    #[case("0x1234567890abcdef1234567890abcdef1234567890abcdef1234567890abcdef00")]
    #[case("unknown")]
    #[case("foobar")]
    #[case("Head")]
    #[case("latest")]
    #[case("")]
    #[case("-1")]
    #[case("12a")]
    // Overflows a u64.
    #[case("18446744073709551616")]
    fn test_rejects_invalid(#[case] raw: &str) {
        let err = raw.parse::<BlockId>().unwrap_err();
        assert_eq!(err.to_string(), format!("invalid block id: {raw}"));
    }

    #[test]
    fn test_display_round_trips() {
        let hash = b256!("0x1234567890abcdef1234567890abcdef1234567890abcdef1234567890abcdef");
        for id in [BlockId::Hash(hash), BlockId::Slot(1234), BlockId::HEAD, NamedBlock::Genesis.into()]
        {
            assert_eq!(id.to_string().parse::<BlockId>().unwrap(), id);
        }
        assert_eq!(
            BlockId::Hash(hash).to_string(),
            "0x1234567890abcdef1234567890abcdef1234567890abcdef1234567890abcdef"
        );
    }
}
