//! Metrics for the archive API.

/// Container for the API metric identifiers.
#[derive(Debug, Clone)]
pub struct Metrics;

impl Metrics {
    /// Counter of blob sidecar requests, labelled by the kind of block id.
    pub const BLOCK_ID_REQUESTS_TOTAL: &'static str = "kona_archive_api_block_id_requests_total";
    /// Counter of responses, labelled by status code.
    pub const RESPONSES_TOTAL: &'static str = "kona_archive_api_responses_total";

    /// Describes and zeroes the API metrics.
    pub fn init() {
        #[cfg(feature = "metrics")]
        {
            metrics::describe_counter!(
                Self::BLOCK_ID_REQUESTS_TOTAL,
                metrics::Unit::Count,
                "Blob sidecar requests by block id type"
            );
            metrics::describe_counter!(
                Self::RESPONSES_TOTAL,
                metrics::Unit::Count,
                "API responses by status code"
            );

            for kind in ["hash", "slot", "named", "invalid"] {
                metrics::counter!(Self::BLOCK_ID_REQUESTS_TOTAL, "type" => kind).increment(0);
            }
        }
    }
}
