//! The `api` subcommand.

use crate::flags::{BeaconArgs, StorageArgs};
use anyhow::Result;
use clap::Parser;
use kona_archive_api::{ApiConfig, ApiServer, ApiState};
use kona_archive_beacon::OnlineBeaconClient;
use std::{net::IpAddr, sync::Arc};
use tokio_util::sync::CancellationToken;
use tracing::info;

/// The `api` subcommand.
///
/// Serves archived blob sidecars on the beacon API blob sidecars route until ctrl-c.
///
/// # Usage
///
/// ```sh
/// kona-blob-archiver api [FLAGS] [OPTIONS]
/// ```
#[derive(Parser, Clone, Debug)]
#[command(about = "Serves archived blob sidecars over the beacon API")]
pub struct ApiCommand {
    /// Beacon node flags.
    #[command(flatten)]
    pub beacon: BeaconArgs,
    /// Storage flags.
    #[command(flatten)]
    pub storage: StorageArgs,
    /// Address the API listens on.
    #[arg(long = "api.addr", default_value = "0.0.0.0", env = "API_ADDR")]
    pub addr: IpAddr,
    /// Port the API listens on.
    #[arg(long = "api.port", default_value_t = ApiConfig::DEFAULT_PORT, env = "API_PORT")]
    pub port: u16,
}

impl ApiCommand {
    /// Returns the API server config.
    pub const fn api_config(&self) -> ApiConfig {
        ApiConfig::new(self.addr, self.port)
    }

    /// Runs the API server until `cancellation` fires.
    pub async fn run(self, cancellation: CancellationToken) -> Result<()> {
        let storage = self.storage.config()?.build()?;
        let beacon = OnlineBeaconClient::new(&self.beacon.config())?;
        let config = self.api_config();

        info!(
            target: "blob_archiver",
            beacon = %self.beacon.l1_beacon,
            socket = %config.socket,
            "Starting blob archive API",
        );

        let state = ApiState::new(Arc::new(beacon), Arc::new(storage));
        ApiServer::new(config, state, cancellation).run().await?;
        Ok(())
    }
}
