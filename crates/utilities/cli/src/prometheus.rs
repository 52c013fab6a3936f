//! Utilities for spinning up a prometheus metrics server.

use crate::PrometheusError;
use metrics_exporter_prometheus::PrometheusBuilder;
use metrics_process::Collector;
use std::{
    net::{IpAddr, SocketAddr, TcpListener},
    thread::{self, sleep},
    time::Duration,
};
use tracing::info;

/// How often process metrics are refreshed.
const PROCESS_METRICS_INTERVAL: Duration = Duration::from_secs(60);

/// Starts a Prometheus metrics server on `addr:port` and returns the bound address.
///
/// A port of `0` binds an OS assigned port.
pub fn init_prometheus_server(addr: IpAddr, port: u16) -> Result<SocketAddr, PrometheusError> {
    let socket = if port == 0 {
        TcpListener::bind((addr, 0))?.local_addr()?
    } else {
        SocketAddr::new(addr, port)
    };

    PrometheusBuilder::new().with_http_listener(socket).install()?;

    let collector = Collector::default();
    collector.describe();
    thread::spawn(move || {
        loop {
            collector.collect();
            sleep(PROCESS_METRICS_INTERVAL);
        }
    });

    info!(target: "prometheus", "Serving metrics at: http://{socket}");
    Ok(socket)
}
