//! The HTTP server.

use crate::{
    ApiConfig,
    handlers::{self, BLOB_SIDECARS_ROUTE, HEALTHZ_ROUTE},
};
use axum::{
    Router,
    extract::Request,
    middleware::{self, Next},
    response::Response,
    routing::get,
};
use kona_archive_beacon::BeaconClient;
use kona_archive_storage::BlobStorage;
use std::{fmt, sync::Arc};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

/// Shared handles used by every request.
pub struct ApiState<B, S> {
    /// The beacon client resolving slots and named block ids.
    pub beacon: Arc<B>,
    /// The storage backend holding the archived records.
    pub storage: Arc<S>,
}

impl<B, S> ApiState<B, S> {
    /// Creates a new [`ApiState`].
    pub const fn new(beacon: Arc<B>, storage: Arc<S>) -> Self {
        Self { beacon, storage }
    }
}

impl<B, S> Clone for ApiState<B, S> {
    fn clone(&self) -> Self {
        Self { beacon: Arc::clone(&self.beacon), storage: Arc::clone(&self.storage) }
    }
}

impl<B: fmt::Debug, S: fmt::Debug> fmt::Debug for ApiState<B, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiState").field("beacon", &self.beacon).field("storage", &self.storage).finish()
    }
}

/// Builds the API router.
///
/// Requests to any other route are answered with `404 Not Found`.
pub fn router<B, S>(state: ApiState<B, S>) -> Router
where
    B: BeaconClient + 'static,
    S: BlobStorage + 'static,
{
    Router::new()
        .route(BLOB_SIDECARS_ROUTE, get(handlers::blob_sidecars::<B, S>))
        .route(HEALTHZ_ROUTE, get(handlers::healthz))
        .layer(middleware::from_fn(record_response))
        .with_state(state)
}

async fn record_response(request: Request, next: Next) -> Response {
    let response = next.run(request).await;
    trace!(target: "archive_api", status = %response.status(), "Sent response");
    kona_macros::inc!(
        counter,
        crate::Metrics::RESPONSES_TOTAL,
        "status" => response.status().as_u16().to_string()
    );
    response
}

/// Serves the archive API until cancelled.
#[derive(Debug)]
pub struct ApiServer<B, S> {
    config: ApiConfig,
    state: ApiState<B, S>,
    cancellation: CancellationToken,
}

impl<B, S> ApiServer<B, S>
where
    B: BeaconClient + 'static,
    S: BlobStorage + 'static,
{
    /// Creates a new [`ApiServer`].
    pub const fn new(
        config: ApiConfig,
        state: ApiState<B, S>,
        cancellation: CancellationToken,
    ) -> Self {
        Self { config, state, cancellation }
    }

    /// Binds the configured socket and serves requests until the cancellation token fires.
    pub async fn run(self) -> std::io::Result<()> {
        let listener = TcpListener::bind(self.config.socket).await?;
        self.serve(listener).await
    }

    /// Serves requests on an already bound listener until the cancellation token fires.
    ///
    /// In-flight requests are allowed to complete before this returns.
    pub async fn serve(self, listener: TcpListener) -> std::io::Result<()> {
        info!(target: "archive_api", addr = %listener.local_addr()?, "Serving blob archive API");
        axum::serve(listener, router(self.state))
            .with_graceful_shutdown(self.cancellation.cancelled_owned())
            .await?;
        info!(target: "archive_api", "Blob archive API stopped");
        Ok(())
    }
}
