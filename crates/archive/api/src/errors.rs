//! Error types for the archive API.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use kona_archive_beacon::BeaconClientError;
use kona_archive_primitives::BlockIdError;
use kona_archive_storage::StorageError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The JSON body of every error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// The HTTP status code.
    pub code: u16,
    /// A human readable message.
    pub message: String,
}

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The block id path segment is not a hash, a slot or a known name.
    #[error("invalid block id: {0}")]
    InvalidBlockId(String),

    /// An entry of the `indices` query parameter is not an integer.
    #[error("invalid index: {0}")]
    InvalidIndex(String),

    /// The beacon node does not know the block, or no record is archived for it.
    #[error("Block not found")]
    BlockNotFound,

    /// The beacon node or the storage backend failed.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Returns the status code of the error.
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::InvalidBlockId(_) | Self::InvalidIndex(_) => StatusCode::BAD_REQUEST,
            Self::BlockNotFound => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<BlockIdError> for ApiError {
    fn from(err: BlockIdError) -> Self {
        Self::InvalidBlockId(err.0)
    }
}

impl From<BeaconClientError> for ApiError {
    fn from(err: BeaconClientError) -> Self {
        if err.is_not_found() { Self::BlockNotFound } else { Self::Internal(err.to_string()) }
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        if err.is_not_found() { Self::BlockNotFound } else { Self::Internal(err.to_string()) }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            Self::Internal(err) => {
                error!(target: "archive_api", %err, "Failed to serve blob sidecars");
                "Internal server error".to_string()
            }
            err => err.to_string(),
        };
        (status, Json(ErrorResponse { code: status.as_u16(), message })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::B256;
    use kona_archive_primitives::BlockId;

    #[test]
    fn test_conversions() {
        let not_found: ApiError = BeaconClientError::NotFound(BlockId::HEAD).into();
        assert!(matches!(not_found, ApiError::BlockNotFound));

        let unavailable: ApiError = BeaconClientError::Unavailable("down".to_string()).into();
        assert_eq!(unavailable.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let missing: ApiError = StorageError::NotFound(B256::ZERO).into();
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);

        let invalid: ApiError = BlockIdError("foo".to_string()).into();
        assert_eq!(invalid.to_string(), "invalid block id: foo");
        assert_eq!(invalid.status(), StatusCode::BAD_REQUEST);
    }
}
