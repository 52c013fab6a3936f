//! Contains the blob archiver CLI.

use crate::{
    commands::{ApiCommand, ArchiverCommand},
    flags::GlobalArgs,
};
use anyhow::Result;
use clap::{Parser, Subcommand};
use kona_cli::cli_styles;
use std::future::Future;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Subcommands for the CLI.
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Archives blob sidecars from a beacon node.
    #[command(alias = "archive")]
    Archiver(ArchiverCommand),
    /// Serves archived blob sidecars over the beacon API.
    Api(ApiCommand),
}

/// The blob archiver CLI.
#[derive(Parser, Clone, Debug)]
#[command(author, version, about, styles = cli_styles(), long_about = None)]
pub struct Cli {
    /// Global arguments for the CLI.
    #[command(flatten)]
    pub global: GlobalArgs,
    /// The subcommand to run.
    #[command(subcommand)]
    pub subcommand: Commands,
}

impl Cli {
    /// Runs the CLI.
    pub fn run(self) -> Result<()> {
        self.global.log_args.init_tracing()?;

        let Self { global, subcommand } = self;
        Self::run_until_ctrl_c(|cancellation| async move {
            if global.metrics.init_metrics()? {
                kona_archiver::Metrics::init();
                kona_archive_api::Metrics::init();
            }

            match subcommand {
                Commands::Archiver(cmd) => cmd.run(cancellation).await,
                Commands::Api(cmd) => cmd.run(cancellation).await,
            }
        })
    }

    /// Runs the future returned by `f` on a new runtime, cancelling the token passed to it when
    /// ctrl-c is received.
    pub fn run_until_ctrl_c<F, Fut>(f: F) -> Result<()>
    where
        F: FnOnce(CancellationToken) -> Fut,
        Fut: Future<Output = Result<()>>,
    {
        let rt = Self::tokio_runtime()?;
        rt.block_on(async {
            let cancellation = CancellationToken::new();
            let signal = cancellation.clone();
            tokio::spawn(async move {
                match tokio::signal::ctrl_c().await {
                    Ok(()) => {
                        info!(target: "blob_archiver", "Received ctrl-c, shutting down");
                        signal.cancel();
                    }
                    Err(err) => warn!(target: "blob_archiver", %err, "Failed to listen for ctrl-c"),
                }
            });
            f(cancellation).await
        })
    }

    /// Creates a new default tokio multi-thread [Runtime](tokio::runtime::Runtime) with all
    /// features enabled.
    pub fn tokio_runtime() -> Result<tokio::runtime::Runtime, std::io::Error> {
        tokio::runtime::Builder::new_multi_thread().enable_all().build()
    }
}
