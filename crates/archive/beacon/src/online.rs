//! HTTP beacon API client.

use crate::{BeaconClientError, BeaconClientResult, BlobSidecarProvider, BlockHeaderProvider};
use async_trait::async_trait;
use kona_archive_primitives::{BlobSidecar, BlobSidecars, BlockHeaderData, BlockId};
use reqwest::{Client, StatusCode, header};
use serde::{Deserialize, de::DeserializeOwned};
use std::time::Duration;
use tracing::trace;
use url::Url;

/// The headers endpoint.
const HEADERS_METHOD_PREFIX: &str = "eth/v1/beacon/headers";

/// The blob sidecars endpoint.
const SIDECARS_METHOD_PREFIX: &str = "eth/v1/beacon/blob_sidecars";

/// Beacon client configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BeaconConfig {
    /// Base URL of the beacon node HTTP API.
    pub url: Url,
    /// Timeout applied to every request.
    pub timeout: Duration,
}

/// The `{ "data": ... }` envelope of the headers endpoint.
#[derive(Debug, Deserialize)]
struct HeaderResponse {
    data: BlockHeaderData,
}

/// A beacon client that talks to a beacon node over HTTP.
#[derive(Debug, Clone)]
pub struct OnlineBeaconClient {
    /// The base URL of the beacon API, without trailing slash.
    base: String,
    /// The inner reqwest client.
    inner: Client,
}

impl OnlineBeaconClient {
    /// Creates a new [`OnlineBeaconClient`] from the given config.
    pub fn new(config: &BeaconConfig) -> BeaconClientResult<Self> {
        let inner = Client::builder().timeout(config.timeout).build()?;
        Ok(Self::new_with_client(config.url.as_str(), inner))
    }

    /// Creates a new [`OnlineBeaconClient`] using an existing reqwest client.
    pub fn new_with_client(base: impl AsRef<str>, inner: Client) -> Self {
        Self { base: base.as_ref().trim_end_matches('/').to_string(), inner }
    }

    fn endpoint(&self, prefix: &str, block_id: &BlockId) -> String {
        format!("{}/{prefix}/{block_id}", self.base)
    }

    async fn get<T: DeserializeOwned>(&self, url: String, block_id: &BlockId) -> BeaconClientResult<T> {
        trace!(target: "beacon_client", %url, "sending beacon request");
        let response =
            self.inner.get(&url).header(header::ACCEPT, "application/json").send().await?;

        match response.status() {
            status if status.is_success() => Ok(response.json().await?),
            StatusCode::NOT_FOUND => Err(BeaconClientError::NotFound(*block_id)),
            status => Err(BeaconClientError::UnexpectedStatus {
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            }),
        }
    }
}

#[async_trait]
impl BlockHeaderProvider for OnlineBeaconClient {
    async fn block_header(&self, block_id: &BlockId) -> BeaconClientResult<BlockHeaderData> {
        let response: HeaderResponse =
            self.get(self.endpoint(HEADERS_METHOD_PREFIX, block_id), block_id).await?;
        Ok(response.data)
    }
}

#[async_trait]
impl BlobSidecarProvider for OnlineBeaconClient {
    async fn blob_sidecars(&self, block_id: &BlockId) -> BeaconClientResult<Vec<BlobSidecar>> {
        let response: BlobSidecars =
            self.get(self.endpoint(SIDECARS_METHOD_PREFIX, block_id), block_id).await?;
        Ok(response.data)
    }
}
