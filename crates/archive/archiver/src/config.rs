//! Contains the archiver configuration.

use crate::{ArchiverError, ArchiverResult};
use alloy_primitives::B256;
use std::time::Duration;

/// Archiver configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArchiverConfig {
    /// How often live tracking polls the head of the chain.
    pub poll_interval: Duration,
    /// Root of the oldest block backfill archives. Backfill ends once it has stored this block.
    pub origin_block: B256,
    /// How long backfill waits before retrying a block it failed to archive.
    pub backfill_retry_interval: Duration,
}

impl ArchiverConfig {
    /// The default delay between backfill retries.
    pub const DEFAULT_BACKFILL_RETRY_INTERVAL: Duration = Duration::from_secs(5);

    /// Creates a new [`ArchiverConfig`] with the default backfill retry interval.
    pub const fn new(poll_interval: Duration, origin_block: B256) -> Self {
        Self {
            poll_interval,
            origin_block,
            backfill_retry_interval: Self::DEFAULT_BACKFILL_RETRY_INTERVAL,
        }
    }

    /// Sets the backfill retry interval.
    pub const fn with_backfill_retry_interval(mut self, interval: Duration) -> Self {
        self.backfill_retry_interval = interval;
        self
    }

    /// Validates the configuration.
    pub fn check(&self) -> ArchiverResult<()> {
        if self.origin_block.is_zero() {
            return Err(ArchiverError::InvalidConfig("origin block must be set".to_string()));
        }
        if self.poll_interval.is_zero() {
            return Err(ArchiverError::InvalidConfig(
                "poll interval must be greater than zero".to_string(),
            ));
        }
        if self.backfill_retry_interval.is_zero() {
            return Err(ArchiverError::InvalidConfig(
                "backfill retry interval must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
