//! Helpers for decoding fixed size SSZ containers.

use alloy_primitives::FixedBytes;
use ssz::{Decode, DecodeError};

/// Sequential reader over the bytes of a fixed size SSZ container.
///
/// The total length is checked once on construction, so individual reads never run past the end
/// as long as the field lengths sum to the container length.
#[derive(Debug)]
pub(crate) struct SszCursor<'a> {
    bytes: &'a [u8],
}

impl<'a> SszCursor<'a> {
    /// Creates a cursor, failing if `bytes` is not exactly `expected` bytes long.
    pub(crate) const fn new(bytes: &'a [u8], expected: usize) -> Result<Self, DecodeError> {
        if bytes.len() != expected {
            return Err(DecodeError::InvalidByteLength { len: bytes.len(), expected });
        }
        Ok(Self { bytes })
    }

    /// Consumes the next `len` bytes.
    pub(crate) fn take(&mut self, len: usize) -> &'a [u8] {
        let (head, tail) = self.bytes.split_at(len);
        self.bytes = tail;
        head
    }

    /// Reads a little endian `u64`.
    pub(crate) fn read_u64(&mut self) -> Result<u64, DecodeError> {
        u64::from_ssz_bytes(self.take(8))
    }

    /// Reads an `N` byte vector.
    pub(crate) fn read_fixed<const N: usize>(&mut self) -> FixedBytes<N> {
        FixedBytes::from_slice(self.take(N))
    }

    /// Reads a nested fixed size container.
    pub(crate) fn read<T: Decode>(&mut self) -> Result<T, DecodeError> {
        T::from_ssz_bytes(self.take(<T as Decode>::ssz_fixed_len()))
    }
}
