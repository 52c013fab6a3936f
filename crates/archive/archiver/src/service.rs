//! The archiver service.

use crate::{ArchiverConfig, ArchiverError, ArchiverResult};
use kona_archive_beacon::BeaconClient;
use kona_archive_primitives::{BlobRecord, BlockHeaderData, BlockId};
use kona_archive_storage::BlobStorage;
use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

/// The outcome of [`ArchiverService::persist_blobs_for_block`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PersistedBlock {
    /// The resolved header of the block.
    pub header: BlockHeaderData,
    /// Whether a record for the block was already stored. If so, nothing was written.
    pub already_existed: bool,
}

/// Archives blob sidecars from a beacon node into a [`BlobStorage`].
///
/// See the crate documentation for an overview of the two traversals.
#[derive(Debug)]
pub struct ArchiverService<B, S> {
    beacon: Arc<B>,
    storage: Arc<S>,
    config: ArchiverConfig,
    cancellation: CancellationToken,
    stopped: AtomicBool,
}

impl<B, S> ArchiverService<B, S>
where
    B: BeaconClient + 'static,
    S: BlobStorage + 'static,
{
    /// Creates a new [`ArchiverService`].
    ///
    /// Cancelling `cancellation` (or calling [`ArchiverService::stop`]) ends both traversals.
    pub const fn new(
        beacon: Arc<B>,
        storage: Arc<S>,
        config: ArchiverConfig,
        cancellation: CancellationToken,
    ) -> Self {
        Self { beacon, storage, config, cancellation, stopped: AtomicBool::new(false) }
    }

    /// Returns the archiver configuration.
    pub const fn config(&self) -> &ArchiverConfig {
        &self.config
    }

    /// Returns the storage backend.
    pub fn storage(&self) -> &Arc<S> {
        &self.storage
    }

    /// Resolves `block_id` to a header and archives the block's blob sidecars, unless a record for
    /// the block is already stored.
    ///
    /// The sidecars are only fetched when a write is going to happen.
    pub async fn persist_blobs_for_block(&self, block_id: &BlockId) -> ArchiverResult<PersistedBlock> {
        let header = self.beacon.block_header(block_id).await?;

        if self.storage.exists(header.root).await? {
            debug!(
                target: "archiver",
                block_id = %block_id,
                root = %header.root,
                "Blob sidecars already archived",
            );
            return Ok(PersistedBlock { header, already_existed: true });
        }

        let sidecars = self.beacon.blob_sidecars(&BlockId::Hash(header.root)).await?;
        let blob_count = sidecars.len();
        let record = BlobRecord::new(header.root, sidecars);
        self.storage.write(&record).await?;

        kona_macros::add!(counter, crate::Metrics::BLOBS_STORED_TOTAL, blob_count as u64);
        info!(
            target: "archiver",
            block_id = %block_id,
            root = %header.root,
            slot = header.slot(),
            blobs = blob_count,
            "Archived blob sidecars",
        );

        Ok(PersistedBlock { header, already_existed: false })
    }

    /// Runs the archiver until it is stopped.
    ///
    /// Seeds the archive from the current head, spawns backfill from the seed in the background and
    /// runs live tracking in the foreground. Returns an error only if seeding fails, in which case
    /// neither traversal is started.
    pub async fn start(self: Arc<Self>) -> ArchiverResult<()> {
        let seed = match self.persist_blobs_for_block(&BlockId::HEAD).await {
            Ok(seed) => seed,
            Err(err) => {
                error!(target: "archiver", %err, "Failed to seed archiver with initial block");
                return Err(err);
            }
        };
        info!(
            target: "archiver",
            root = %seed.header.root,
            slot = seed.header.slot(),
            "Seeded archiver from head",
        );

        let backfill = Arc::clone(&self);
        tokio::spawn(async move { backfill.backfill_blobs(seed.header).await });

        self.track_latest_blocks().await;
        Ok(())
    }

    /// Stops both traversals.
    ///
    /// Returns [`ArchiverError::AlreadyStopped`] if the service was already stopped.
    pub fn stop(&self) -> ArchiverResult<()> {
        if self.stopped.swap(true, Ordering::SeqCst) {
            return Err(ArchiverError::AlreadyStopped);
        }
        info!(target: "archiver", "Stopping archiver");
        self.cancellation.cancel();
        Ok(())
    }

    /// Returns `true` once [`ArchiverService::stop`] has been called.
    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }

    /// Walks parent links from `latest` back to the origin block, archiving every block on the
    /// way, and ends early at the first block that is already stored.
    ///
    /// A block that fails to archive is retried after the configured retry interval until it
    /// succeeds or the service is stopped.
    pub async fn backfill_blobs(&self, latest: BlockHeaderData) {
        let mut current = latest;

        loop {
            if self.cancellation.is_cancelled() {
                info!(target: "archiver::backfill", at = %current.root, "Backfill cancelled");
                return;
            }

            if current.root == self.config.origin_block {
                info!(target: "archiver::backfill", "Reached origin block");
                break;
            }

            let parent = BlockId::Hash(current.parent_root());
            match self.persist_blobs_for_block(&parent).await {
                Ok(PersistedBlock { header, already_existed }) => {
                    current = header;
                    if already_existed {
                        break;
                    }
                    kona_macros::inc!(
                        counter,
                        crate::Metrics::BLOCKS_PROCESSED_TOTAL,
                        "source" => crate::BlockSource::Backfill.as_str()
                    );
                }
                Err(err) => {
                    error!(
                        target: "archiver::backfill",
                        %err,
                        block_id = %parent,
                        "Failed to archive block, retrying",
                    );
                    kona_macros::inc!(counter, crate::Metrics::BACKFILL_RETRIES_TOTAL);

                    tokio::select! {
                        _ = self.cancellation.cancelled() => {
                            info!(target: "archiver::backfill", "Backfill cancelled");
                            return;
                        }
                        _ = tokio::time::sleep(self.config.backfill_retry_interval) => {}
                    }
                }
            }
        }

        info!(
            target: "archiver::backfill",
            start_hash = %latest.root,
            end_hash = %current.root,
            "Backfill complete",
        );
    }

    /// Polls the chain head every poll interval until the service is stopped.
    ///
    /// The first poll happens one interval after the call.
    pub async fn track_latest_blocks(&self) {
        let period = self.config.poll_interval;
        let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;
                _ = self.cancellation.cancelled() => {
                    info!(target: "archiver::live", "Live tracking stopped");
                    return;
                }
                _ = ticker.tick() => {
                    self.process_blocks_until_known_block().await;
                }
            }
        }
    }

    /// Archives blocks from the current head backwards until it reaches a block that is already
    /// stored, and returns how many blocks were newly archived.
    ///
    /// Any failure ends the walk; the next poll starts over from the head.
    pub async fn process_blocks_until_known_block(&self) -> usize {
        debug!(target: "archiver::live", "Refreshing live data");

        let mut block_id = BlockId::HEAD;
        let mut start = None;
        let mut archived = 0;

        loop {
            if self.cancellation.is_cancelled() {
                return archived;
            }

            let PersistedBlock { header, already_existed } =
                match self.persist_blobs_for_block(&block_id).await {
                    Ok(block) => block,
                    Err(err) => {
                        error!(
                            target: "archiver::live",
                            %err,
                            block_id = %block_id,
                            "Failed to archive block, waiting for next poll",
                        );
                        return archived;
                    }
                };
            start.get_or_insert(header.root);

            if already_existed {
                debug!(target: "archiver::live", root = %header.root, "Reached known block");
                break;
            }

            kona_macros::inc!(
                counter,
                crate::Metrics::BLOCKS_PROCESSED_TOTAL,
                "source" => crate::BlockSource::Live.as_str()
            );
            archived += 1;
            block_id = BlockId::Hash(header.parent_root());
        }

        if let Some(start) = start {
            info!(
                target: "archiver::live",
                start_hash = %start,
                end_hash = %block_id,
                archived,
                "Live data refreshed",
            );
        }
        archived
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::B256;
    use kona_archive_beacon::StubBeaconClient;
    use kona_archive_primitives::test_utils::blob_sidecars;
    use kona_archive_storage::{BlobStorageReader, BlobStorageWriter, ObjectStorage};
    use std::time::Duration;

    const POLL_INTERVAL: Duration = Duration::from_secs(6);

    fn service(
        stub: StubBeaconClient,
        origin: B256,
    ) -> Arc<ArchiverService<StubBeaconClient, ObjectStorage>> {
        let config = ArchiverConfig::new(POLL_INTERVAL, origin);
        Arc::new(ArchiverService::new(
            Arc::new(stub),
            Arc::new(ObjectStorage::in_memory()),
            config,
            CancellationToken::new(),
        ))
    }

    async fn stored(
        service: &ArchiverService<StubBeaconClient, ObjectStorage>,
        headers: &[BlockHeaderData],
    ) -> Vec<bool> {
        let mut out = Vec::with_capacity(headers.len());
        for header in headers {
            out.push(service.storage().exists(header.root).await.unwrap());
        }
        out
    }

    #[tokio::test]
    async fn test_persist_new_block() {
        let (stub, chain) = StubBeaconClient::with_chain(2);
        let service = service(stub, chain[0].root);

        let persisted = service.persist_blobs_for_block(&BlockId::HEAD).await.unwrap();
        assert_eq!(persisted, PersistedBlock { header: chain[1], already_existed: false });

        let record = service.storage().read(chain[1].root).await.unwrap();
        assert_eq!(record.block_hash(), chain[1].root);
        assert_eq!(record.blob_sidecars.len(), 1);
        assert_eq!(service.beacon.sidecar_calls(chain[1].root), 1);
    }

    #[tokio::test]
    async fn test_persist_existing_block_skips_sidecar_fetch() {
        let (stub, chain) = StubBeaconClient::with_chain(2);
        let service = service(stub, chain[0].root);

        service.persist_blobs_for_block(&BlockId::HEAD).await.unwrap();
        let persisted = service.persist_blobs_for_block(&BlockId::HEAD).await.unwrap();

        assert!(persisted.already_existed);
        assert_eq!(persisted.header, chain[1]);
        assert_eq!(service.beacon.sidecar_calls(chain[1].root), 1);
    }

    #[tokio::test]
    async fn test_persist_failures_write_nothing() {
        let (stub, chain) = StubBeaconClient::with_chain(2);
        stub.fail_header_fetches(BlockId::HEAD, 1);
        stub.fail_sidecar_fetches(chain[1].root, 1);
        let service = service(stub, chain[0].root);

        let err = service.persist_blobs_for_block(&BlockId::HEAD).await.unwrap_err();
        assert!(matches!(err, ArchiverError::Beacon(_)));
        assert_eq!(service.beacon.sidecar_calls(chain[1].root), 0);

        let err = service.persist_blobs_for_block(&BlockId::HEAD).await.unwrap_err();
        assert!(matches!(err, ArchiverError::Beacon(_)));
        assert_eq!(stored(&service, &chain).await, [false, false]);

        service.persist_blobs_for_block(&BlockId::HEAD).await.unwrap();
        assert_eq!(stored(&service, &chain).await, [false, true]);
    }

    #[tokio::test]
    async fn test_backfill_stops_at_origin() {
        let (stub, chain) = StubBeaconClient::with_chain(6);
        let service = service(stub, chain[2].root);

        service.backfill_blobs(chain[5]).await;

        assert_eq!(stored(&service, &chain).await, [false, false, true, true, true, false]);
        assert_eq!(service.beacon.header_calls(BlockId::Hash(chain[1].root)), 0);
        assert_eq!(service.beacon.total_sidecar_calls(), 3);
    }

    #[tokio::test]
    async fn test_backfill_from_origin_is_noop() {
        let (stub, chain) = StubBeaconClient::with_chain(3);
        let service = service(stub, chain[2].root);

        service.backfill_blobs(chain[2]).await;

        assert_eq!(service.beacon.total_sidecar_calls(), 0);
        assert_eq!(stored(&service, &chain).await, [false, false, false]);
    }

    #[tokio::test]
    async fn test_backfill_stops_at_known_block() {
        let (stub, chain) = StubBeaconClient::with_chain(6);
        let service = service(stub, chain[0].root);
        let known = BlobRecord::new(chain[2].root, Vec::new());
        service.storage().write(&known).await.unwrap();

        service.backfill_blobs(chain[5]).await;

        assert_eq!(stored(&service, &chain).await, [false, false, true, true, true, false]);
        assert_eq!(service.beacon.sidecar_calls(chain[2].root), 0);
        assert_eq!(service.beacon.header_calls(BlockId::Hash(chain[1].root)), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_backfill_retries_failed_block() {
        let (stub, chain) = StubBeaconClient::with_chain(5);
        stub.fail_header_fetches(BlockId::Hash(chain[2].root), 1);
        let service = service(stub, chain[0].root);

        let started = Instant::now();
        service.backfill_blobs(chain[4]).await;

        assert_eq!(started.elapsed(), ArchiverConfig::DEFAULT_BACKFILL_RETRY_INTERVAL);
        assert_eq!(service.beacon.header_calls(BlockId::Hash(chain[2].root)), 2);
        assert_eq!(service.beacon.header_calls(BlockId::Hash(chain[3].root)), 1);
        assert_eq!(stored(&service, &chain).await, [true, true, true, true, false]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_backfill_retry_is_cancellable() {
        let (stub, chain) = StubBeaconClient::with_chain(3);
        stub.fail_header_fetches(BlockId::Hash(chain[1].root), usize::MAX);
        let service = service(stub, chain[0].root);

        let tip = chain[2];
        let backfill = tokio::spawn({
            let service = Arc::clone(&service);
            async move { service.backfill_blobs(tip).await }
        });
        tokio::time::sleep(Duration::from_secs(12)).await;
        service.stop().unwrap();
        backfill.await.unwrap();

        assert_eq!(service.beacon.header_calls(BlockId::Hash(chain[1].root)), 3);
        assert_eq!(stored(&service, &chain).await, [false, false, false]);
    }

    #[tokio::test]
    async fn test_live_tracking_stops_at_known_block() {
        let (stub, chain) = StubBeaconClient::with_chain(4);
        let service = service(stub, chain[0].root);
        service.storage().write(&BlobRecord::new(chain[1].root, Vec::new())).await.unwrap();

        assert_eq!(service.process_blocks_until_known_block().await, 2);

        assert_eq!(stored(&service, &chain).await, [false, true, true, true]);
        assert_eq!(service.beacon.sidecar_calls(chain[1].root), 0);
        assert_eq!(service.beacon.header_calls(BlockId::Hash(chain[0].root)), 0);

        // Nothing new on the next poll.
        assert_eq!(service.process_blocks_until_known_block().await, 0);
        assert_eq!(service.beacon.total_sidecar_calls(), 2);
    }

    #[tokio::test]
    async fn test_live_tracking_aborts_on_error() {
        let (stub, chain) = StubBeaconClient::with_chain(4);
        stub.fail_sidecar_fetches(chain[2].root, 1);
        let service = service(stub, chain[0].root);
        service.storage().write(&BlobRecord::new(chain[0].root, Vec::new())).await.unwrap();

        assert_eq!(service.process_blocks_until_known_block().await, 1);
        assert_eq!(stored(&service, &chain).await, [true, false, false, true]);
        assert_eq!(service.beacon.header_calls(BlockId::Hash(chain[1].root)), 0);
    }

    #[tokio::test]
    async fn test_live_tracking_archives_only_new_head() {
        let (stub, chain) = StubBeaconClient::with_chain(4);
        let service = service(stub, chain[0].root);
        service.storage().write(&BlobRecord::new(chain[2].root, Vec::new())).await.unwrap();

        assert_eq!(service.process_blocks_until_known_block().await, 1);

        assert_eq!(stored(&service, &chain).await, [false, false, true, true]);
        assert_eq!(service.beacon.sidecar_calls(chain[2].root), 0);
        assert_eq!(service.beacon.header_calls(BlockId::Hash(chain[1].root)), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_traversals_racing_on_same_blocks() {
        let (stub, chain) = StubBeaconClient::with_chain(9);
        // Backfill starts above the head, so both walks reach every block at the same time.
        stub.insert_header("head", chain[7]);
        stub.set_latency(Duration::from_secs(1));
        let service = service(stub, chain[0].root);

        let ((), archived) = tokio::join!(
            service.backfill_blobs(chain[8]),
            service.process_blocks_until_known_block()
        );

        // Live tracking never sees a stored block and only ends below the origin.
        assert_eq!(archived, 8);
        let mut expected = vec![true; 8];
        expected.push(false);
        assert_eq!(stored(&service, &chain).await, expected);

        for (slot, header) in chain[..8].iter().enumerate() {
            assert_eq!(service.beacon.sidecar_calls(header.root), 2);
            let record = service.storage().read(header.root).await.unwrap();
            assert_eq!(record.blob_sidecars.data, blob_sidecars(slot as u8, 1));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_live_tracking_stops_at_backfilled_block() {
        let (stub, chain) = StubBeaconClient::with_chain(8);
        stub.set_latency(Duration::from_secs(1));
        let service = service(stub, chain[0].root);

        let ((), archived) = tokio::join!(
            service.backfill_blobs(chain[7]),
            service.process_blocks_until_known_block()
        );

        assert_eq!(archived, 1);
        assert!(stored(&service, &chain).await.into_iter().all(|stored| stored));
        assert_eq!(service.beacon.sidecar_calls(chain[6].root), 1);
        assert_eq!(service.beacon.total_sidecar_calls(), chain.len());
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_archives_chain_and_follows_head() {
        let (stub, chain) = StubBeaconClient::with_chain(4);
        let service = service(stub, chain[0].root);

        let running = tokio::spawn(Arc::clone(&service).start());
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(stored(&service, &chain).await, [true, true, true, true]);

        let mut next = chain[3];
        next.root = B256::repeat_byte(0xaa);
        next.header.message.slot = 4;
        next.header.message.parent_root = chain[3].root;
        service.beacon.insert_block(next, Vec::new());
        service.beacon.insert_header("head", next);

        tokio::time::sleep(POLL_INTERVAL).await;
        assert!(service.storage().exists(next.root).await.unwrap());

        service.stop().unwrap();
        running.await.unwrap().unwrap();
        assert!(matches!(service.stop(), Err(ArchiverError::AlreadyStopped)));
        assert!(service.is_stopped());
    }

    #[tokio::test]
    async fn test_start_fails_without_head() {
        let service = service(StubBeaconClient::new(), B256::repeat_byte(1));
        let err = Arc::clone(&service).start().await.unwrap_err();
        assert!(matches!(err, ArchiverError::Beacon(e) if e.is_not_found()));
    }

    #[test]
    fn test_stop_twice() {
        let service = service(StubBeaconClient::new(), B256::repeat_byte(1));
        assert!(service.stop().is_ok());
        assert!(service.cancellation.is_cancelled());
        assert!(matches!(service.stop(), Err(ArchiverError::AlreadyStopped)));
    }
}
