//! Prometheus metrics arguments.

use crate::{CliResult, init_prometheus_server};
use clap::Args;
use std::net::{IpAddr, Ipv4Addr};

/// Prometheus metrics arguments.
#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct MetricsArgs {
    /// Enables the Prometheus metrics exporter.
    #[arg(long = "metrics.enabled", global = true, default_value_t = false, env = "METRICS_ENABLED")]
    pub enabled: bool,
    /// Address the metrics server listens on.
    #[arg(long = "metrics.addr", global = true, default_value = "0.0.0.0", env = "METRICS_ADDR")]
    pub addr: IpAddr,
    /// Port the metrics server listens on.
    #[arg(long = "metrics.port", global = true, default_value_t = 9090, env = "METRICS_PORT")]
    pub port: u16,
}

impl Default for MetricsArgs {
    fn default() -> Self {
        Self { enabled: false, addr: IpAddr::V4(Ipv4Addr::UNSPECIFIED), port: 9090 }
    }
}

impl MetricsArgs {
    /// Starts the Prometheus exporter if metrics are enabled.
    ///
    /// Returns `true` if the exporter was started.
    pub fn init_metrics(&self) -> CliResult<bool> {
        if !self.enabled {
            return Ok(false);
        }
        init_prometheus_server(self.addr, self.port)?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser, Debug)]
    struct TestCli {
        #[command(flatten)]
        metrics: MetricsArgs,
    }

    #[test]
    fn test_defaults() {
        let cli = TestCli::parse_from(["test"]);
        assert_eq!(cli.metrics, MetricsArgs::default());
    }

    #[test]
    fn test_flags() {
        let cli = TestCli::parse_from([
            "test",
            "--metrics.enabled",
            "--metrics.addr",
            "127.0.0.1",
            "--metrics.port",
            "7300",
        ]);
        assert!(cli.metrics.enabled);
        assert_eq!(cli.metrics.addr, IpAddr::V4(Ipv4Addr::LOCALHOST));
        assert_eq!(cli.metrics.port, 7300);
    }

    #[test]
    fn test_disabled_is_noop() {
        assert!(!MetricsArgs::default().init_metrics().unwrap());
    }
}
