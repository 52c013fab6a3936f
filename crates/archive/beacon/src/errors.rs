use kona_archive_primitives::BlockId;
use thiserror::Error;

/// Result type for beacon client operations.
pub type BeaconClientResult<T> = Result<T, BeaconClientError>;

/// An error for the beacon client.
#[derive(Debug, Error)]
pub enum BeaconClientError {
    /// The beacon node does not know the requested block.
    #[error("block not found: {0}")]
    NotFound(BlockId),

    /// The request could not be sent or the response body could not be read.
    #[error("beacon request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The beacon node answered with an unexpected status code.
    #[error("unexpected status code {status}: {body}")]
    UnexpectedStatus {
        /// The status code.
        status: u16,
        /// The response body.
        body: String,
    },

    /// The beacon node is unavailable for another reason.
    #[error("beacon node unavailable: {0}")]
    Unavailable(String),
}

impl BeaconClientError {
    /// Returns `true` if the error is [`BeaconClientError::NotFound`].
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}
