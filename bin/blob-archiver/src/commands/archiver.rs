//! The `archiver` subcommand.

use crate::flags::{BeaconArgs, StorageArgs};
use alloy_primitives::B256;
use anyhow::Result;
use clap::Parser;
use kona_archive_beacon::OnlineBeaconClient;
use kona_archiver::{ArchiverConfig, ArchiverService};
use std::{sync::Arc, time::Duration};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// The `archiver` subcommand.
///
/// Seeds the archive from the beacon head, backfills towards the origin block and keeps up with
/// new blocks until ctrl-c.
///
/// # Usage
///
/// ```sh
/// kona-blob-archiver archiver [FLAGS] [OPTIONS]
/// ```
#[derive(Parser, Clone, Debug)]
#[command(about = "Archives blob sidecars from a beacon node")]
pub struct ArchiverCommand {
    /// Beacon node flags.
    #[command(flatten)]
    pub beacon: BeaconArgs,
    /// Storage flags.
    #[command(flatten)]
    pub storage: StorageArgs,
    /// How often to poll the beacon node for new blocks, in seconds.
    #[arg(long = "poll-interval", default_value_t = 6, env = "POLL_INTERVAL")]
    pub poll_interval: u64,
    /// Root of the oldest block to archive. Backfill stops once it has archived this block.
    #[arg(long = "origin-block", env = "ORIGIN_BLOCK")]
    pub origin_block: B256,
    /// Delay before backfill retries a block it failed to archive, in seconds.
    #[arg(long = "backfill-retry-interval", default_value_t = 5, env = "BACKFILL_RETRY_INTERVAL")]
    pub backfill_retry_interval: u64,
}

impl ArchiverCommand {
    /// Builds and validates the archiver config.
    pub fn archiver_config(&self) -> Result<ArchiverConfig> {
        let config = ArchiverConfig::new(Duration::from_secs(self.poll_interval), self.origin_block)
            .with_backfill_retry_interval(Duration::from_secs(self.backfill_retry_interval));
        config.check()?;
        Ok(config)
    }

    /// Runs the archiver until `cancellation` fires.
    pub async fn run(self, cancellation: CancellationToken) -> Result<()> {
        let config = self.archiver_config()?;
        let storage = self.storage.config()?.build()?;
        let beacon = OnlineBeaconClient::new(&self.beacon.config())?;

        info!(
            target: "blob_archiver",
            beacon = %self.beacon.l1_beacon,
            origin = %config.origin_block,
            poll_interval = ?config.poll_interval,
            "Starting archiver",
        );

        let service = Arc::new(ArchiverService::new(
            Arc::new(beacon),
            Arc::new(storage),
            config,
            cancellation.clone(),
        ));

        // Route external shutdown through `stop` so the service records it.
        let stopper = Arc::clone(&service);
        tokio::spawn(async move {
            cancellation.cancelled().await;
            if let Err(err) = stopper.stop() {
                warn!(target: "blob_archiver", %err, "Archiver was already stopped");
            }
        });

        service.start().await?;
        info!(target: "blob_archiver", "Archiver stopped");
        Ok(())
    }
}
