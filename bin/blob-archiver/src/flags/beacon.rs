//! Beacon node flags.

use clap::Args;
use kona_archive_beacon::BeaconConfig;
use std::time::Duration;
use url::Url;

/// Beacon node connection flags.
#[derive(Args, Clone, Debug)]
pub struct BeaconArgs {
    /// URL of the L1 beacon API.
    #[arg(long, visible_alias = "l1.beacon", env = "L1_BEACON")]
    pub l1_beacon: Url,
    /// Timeout for beacon API requests, in seconds.
    #[arg(long = "beacon.timeout", default_value_t = 10, env = "BEACON_CLIENT_TIMEOUT")]
    pub timeout: u64,
}

impl BeaconArgs {
    /// Returns the beacon client config.
    pub fn config(&self) -> BeaconConfig {
        BeaconConfig { url: self.l1_beacon.clone(), timeout: Duration::from_secs(self.timeout) }
    }
}
