//! # kona-cli
//!
//! CLI plumbing shared by the blob archiver binaries: logging and metrics flags, tracing
//! subscriber setup, the Prometheus exporter and clap styling.

#![cfg_attr(not(test), warn(unused_crate_dependencies))]

pub mod backtrace;

mod error;
pub use error::{CliError, CliResult, PrometheusError};

pub mod log;
pub use log::LogArgs;

pub mod metrics_args;
pub use metrics_args::MetricsArgs;

mod prometheus;
pub use prometheus::init_prometheus_server;

mod subscriber;
pub use subscriber::{init_tracing_subscriber, verbosity_to_level};

use clap::builder::styling::{AnsiColor, Color, Style, Styles};

/// Returns the clap styles used by every binary.
pub const fn cli_styles() -> Styles {
    Styles::styled()
        .usage(Style::new().bold().underline().fg_color(Some(Color::Ansi(AnsiColor::Yellow))))
        .header(Style::new().bold().underline().fg_color(Some(Color::Ansi(AnsiColor::Yellow))))
        .literal(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Green))))
        .invalid(Style::new().bold().fg_color(Some(Color::Ansi(AnsiColor::Red))))
        .error(Style::new().bold().fg_color(Some(Color::Ansi(AnsiColor::Red))))
        .valid(Style::new().bold().underline().fg_color(Some(Color::Ansi(AnsiColor::Green))))
        .placeholder(Style::new().fg_color(Some(Color::Ansi(AnsiColor::White))))
}
