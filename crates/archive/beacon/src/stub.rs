//! An in-memory beacon client for tests.

use crate::{BeaconClientError, BeaconClientResult, BlobSidecarProvider, BlockHeaderProvider};
use alloy_primitives::B256;
use async_trait::async_trait;
use kona_archive_primitives::{
    BeaconBlockHeader, BlobSidecar, BlockHeaderData, BlockId, SignedBeaconBlockHeader,
    test_utils::blob_sidecars,
};
use std::{
    collections::HashMap,
    sync::{Mutex, MutexGuard, PoisonError},
    time::Duration,
};

#[derive(Debug, Default)]
struct StubState {
    /// Headers keyed by the string form of every identifier that resolves to them.
    headers: HashMap<String, BlockHeaderData>,
    /// Sidecars keyed by block root.
    sidecars: HashMap<B256, Vec<BlobSidecar>>,
    /// Remaining injected failures for header fetches, keyed by identifier.
    header_failures: HashMap<String, usize>,
    /// Remaining injected failures for sidecar fetches, keyed by block root.
    sidecar_failures: HashMap<B256, usize>,
    /// Number of header fetches per identifier.
    header_calls: HashMap<String, usize>,
    /// Number of sidecar fetches per block root.
    sidecar_calls: HashMap<B256, usize>,
    /// Delay applied to every fetch.
    latency: Duration,
}

/// A beacon client serving blocks registered ahead of time.
///
/// Blocks are looked up by the string form of the requested [`BlockId`], so a header registered
/// under `"head"` is returned for [`BlockId::HEAD`] and a block registered with
/// [`StubBeaconClient::insert_block`] is reachable by its root and by its slot.
#[derive(Debug, Default)]
pub struct StubBeaconClient {
    state: Mutex<StubState>,
}

impl StubBeaconClient {
    /// Creates an empty [`StubBeaconClient`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a stub serving a linear chain of `len` blocks and returns their headers, oldest
    /// first.
    ///
    /// Block `i` sits at slot `i`, carries one blob sidecar and has the previous block as parent.
    /// `"genesis"` resolves to the first block, `"head"` and `"finalized"` to the last one.
    pub fn with_chain(len: usize) -> (Self, Vec<BlockHeaderData>) {
        let stub = Self::new();
        let mut parent_root = B256::ZERO;
        let mut chain = Vec::with_capacity(len);

        for slot in 0..len as u64 {
            let header = BlockHeaderData {
                root: B256::left_padding_from(&(slot + 1).to_be_bytes()),
                canonical: true,
                header: SignedBeaconBlockHeader {
                    message: BeaconBlockHeader { slot, parent_root, ..Default::default() },
                    ..Default::default()
                },
            };
            stub.insert_block(header, blob_sidecars(slot as u8, 1));
            parent_root = header.root;
            chain.push(header);
        }

        if let (Some(first), Some(last)) = (chain.first(), chain.last()) {
            stub.insert_header("genesis", *first);
            stub.insert_header("head", *last);
            stub.insert_header("finalized", *last);
        }

        (stub, chain)
    }

    fn state(&self) -> MutexGuard<'_, StubState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Registers `header` under an arbitrary identifier string.
    pub fn insert_header(&self, block_id: impl ToString, header: BlockHeaderData) {
        self.state().headers.insert(block_id.to_string(), header);
    }

    /// Registers a block under its root and slot together with its sidecars.
    pub fn insert_block(&self, header: BlockHeaderData, sidecars: Vec<BlobSidecar>) {
        let mut state = self.state();
        state.headers.insert(header.root.to_string(), header);
        state.headers.insert(header.slot().to_string(), header);
        state.sidecars.insert(header.root, sidecars);
    }

    /// Makes the next `times` header fetches for `block_id` fail.
    pub fn fail_header_fetches(&self, block_id: impl ToString, times: usize) {
        self.state().header_failures.insert(block_id.to_string(), times);
    }

    /// Makes the next `times` sidecar fetches for the block with root `root` fail.
    pub fn fail_sidecar_fetches(&self, root: B256, times: usize) {
        self.state().sidecar_failures.insert(root, times);
    }

    /// Delays every header and sidecar fetch by `latency`.
    pub fn set_latency(&self, latency: Duration) {
        self.state().latency = latency;
    }

    async fn wait(&self) {
        let latency = self.state().latency;
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }
    }

    /// Returns how many times the header of `block_id` was requested.
    pub fn header_calls(&self, block_id: impl ToString) -> usize {
        self.state().header_calls.get(&block_id.to_string()).copied().unwrap_or_default()
    }

    /// Returns how many times the sidecars of the block with root `root` were requested.
    pub fn sidecar_calls(&self, root: B256) -> usize {
        self.state().sidecar_calls.get(&root).copied().unwrap_or_default()
    }

    /// Returns the total number of sidecar fetches across all blocks.
    pub fn total_sidecar_calls(&self) -> usize {
        self.state().sidecar_calls.values().sum()
    }
}

/// Consumes one injected failure for `key`, returning `true` if the call must fail.
fn take_failure<K: std::hash::Hash + Eq>(failures: &mut HashMap<K, usize>, key: &K) -> bool {
    match failures.get_mut(key) {
        Some(remaining) if *remaining > 0 => {
            *remaining -= 1;
            true
        }
        _ => false,
    }
}

#[async_trait]
impl BlockHeaderProvider for StubBeaconClient {
    async fn block_header(&self, block_id: &BlockId) -> BeaconClientResult<BlockHeaderData> {
        self.wait().await;
        let key = block_id.to_string();
        let mut state = self.state();
        *state.header_calls.entry(key.clone()).or_default() += 1;

        if take_failure(&mut state.header_failures, &key) {
            return Err(BeaconClientError::Unavailable(format!("injected failure for {key}")));
        }

        state.headers.get(&key).copied().ok_or(BeaconClientError::NotFound(*block_id))
    }
}

#[async_trait]
impl BlobSidecarProvider for StubBeaconClient {
    async fn blob_sidecars(&self, block_id: &BlockId) -> BeaconClientResult<Vec<BlobSidecar>> {
        self.wait().await;
        let mut state = self.state();
        let root = match block_id.as_hash() {
            Some(root) => root,
            None => state
                .headers
                .get(&block_id.to_string())
                .map(BlockHeaderData::root)
                .ok_or(BeaconClientError::NotFound(*block_id))?,
        };
        *state.sidecar_calls.entry(root).or_default() += 1;

        if take_failure(&mut state.sidecar_failures, &root) {
            return Err(BeaconClientError::Unavailable(format!("injected failure for {root}")));
        }

        state.sidecars.get(&root).cloned().ok_or(BeaconClientError::NotFound(*block_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kona_archive_primitives::NamedBlock;

    #[tokio::test]
    async fn test_chain_links_parents() {
        let (stub, chain) = StubBeaconClient::with_chain(3);

        let head = stub.block_header(&BlockId::HEAD).await.unwrap();
        assert_eq!(head, chain[2]);

        let parent = stub.block_header(&BlockId::Hash(head.parent_root())).await.unwrap();
        assert_eq!(parent, chain[1]);
        assert_eq!(stub.block_header(&BlockId::Slot(0)).await.unwrap(), chain[0]);
        assert_eq!(
            stub.block_header(&NamedBlock::Genesis.into()).await.unwrap().parent_root(),
            B256::ZERO
        );
        assert_eq!(stub.header_calls("head"), 1);
    }

    #[tokio::test]
    async fn test_injected_failures_are_consumed() {
        let (stub, chain) = StubBeaconClient::with_chain(1);
        let id = BlockId::Hash(chain[0].root);
        stub.fail_header_fetches(id, 1);

        assert!(!stub.block_header(&id).await.unwrap_err().is_not_found());
        assert_eq!(stub.block_header(&id).await.unwrap(), chain[0]);
        assert_eq!(stub.header_calls(id), 2);
    }

    #[tokio::test]
    async fn test_unknown_block() {
        let stub = StubBeaconClient::new();
        assert!(stub.block_header(&BlockId::Slot(5)).await.unwrap_err().is_not_found());
        assert!(stub.blob_sidecars(&BlockId::Slot(5)).await.unwrap_err().is_not_found());
    }

    #[tokio::test(start_paused = true)]
    async fn test_latency_delays_fetches() {
        let (stub, chain) = StubBeaconClient::with_chain(1);
        stub.set_latency(Duration::from_millis(500));

        let start = tokio::time::Instant::now();
        stub.block_header(&BlockId::HEAD).await.unwrap();
        stub.blob_sidecars(&BlockId::Hash(chain[0].root)).await.unwrap();
        assert_eq!(start.elapsed(), Duration::from_secs(1));
    }

    #[tokio::test]
    async fn test_sidecars_by_root() {
        let (stub, chain) = StubBeaconClient::with_chain(2);
        let sidecars = stub.blob_sidecars(&BlockId::Hash(chain[1].root)).await.unwrap();
        assert_eq!(sidecars, blob_sidecars(1, 1));
        assert_eq!(stub.sidecar_calls(chain[1].root), 1);
        assert_eq!(stub.total_sidecar_calls(), 1);
    }
}
