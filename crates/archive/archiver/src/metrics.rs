//! Metrics for the archiver.

/// Which traversal archived a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockSource {
    /// The backwards walk towards the origin block.
    Backfill,
    /// The periodic walk from the chain head.
    Live,
}

impl BlockSource {
    /// Returns the metric label of the source.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Backfill => "backfill",
            Self::Live => "live",
        }
    }
}

/// Container for the archiver metric identifiers.
#[derive(Debug, Clone)]
pub struct Metrics;

impl Metrics {
    /// Counter of newly archived blocks, labelled by [`BlockSource`].
    pub const BLOCKS_PROCESSED_TOTAL: &'static str = "kona_archiver_blocks_processed_total";
    /// Counter of archived blob sidecars.
    pub const BLOBS_STORED_TOTAL: &'static str = "kona_archiver_blobs_stored_total";
    /// Counter of failed backfill attempts that were retried.
    pub const BACKFILL_RETRIES_TOTAL: &'static str = "kona_archiver_backfill_retries_total";

    /// Describes and zeroes all archiver metrics.
    ///
    /// Should be called once at startup, after the metrics recorder is installed.
    pub fn init() {
        #[cfg(feature = "metrics")]
        {
            Self::describe();
            Self::zero();
        }
    }

    #[cfg(feature = "metrics")]
    fn describe() {
        metrics::describe_counter!(
            Self::BLOCKS_PROCESSED_TOTAL,
            metrics::Unit::Count,
            "Number of beacon blocks whose blob sidecars were archived"
        );
        metrics::describe_counter!(
            Self::BLOBS_STORED_TOTAL,
            metrics::Unit::Count,
            "Number of blob sidecars archived"
        );
        metrics::describe_counter!(
            Self::BACKFILL_RETRIES_TOTAL,
            metrics::Unit::Count,
            "Number of backfill attempts that failed and were retried"
        );
    }

    #[cfg(feature = "metrics")]
    fn zero() {
        for source in [BlockSource::Backfill, BlockSource::Live] {
            metrics::counter!(Self::BLOCKS_PROCESSED_TOTAL, "source" => source.as_str()).increment(0);
        }
        metrics::counter!(Self::BLOBS_STORED_TOTAL).increment(0);
        metrics::counter!(Self::BACKFILL_RETRIES_TOTAL).increment(0);
    }
}
