//! Tracing subscriber setup.

use crate::CliResult;
use tracing::{Level, level_filters::LevelFilter};
use tracing_subscriber::{EnvFilter, prelude::*};

/// Maps a `-v` count to a log level.
///
/// `0` is `WARN`, `1` is `INFO`, `2` is `DEBUG` and anything above is `TRACE`.
pub const fn verbosity_to_level(verbosity: u8) -> Level {
    match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// Installs the global tracing subscriber.
///
/// The level derived from `verbosity` is the default directive. `RUST_LOG` directives, or those of
/// `env_filter` if given, are applied on top of it.
pub fn init_tracing_subscriber(
    verbosity: u8,
    env_filter: Option<impl Into<EnvFilter>>,
) -> CliResult<()> {
    let level: LevelFilter = verbosity_to_level(verbosity).into();
    let filter = match env_filter {
        Some(filter) => filter.into(),
        None => EnvFilter::builder().with_default_directive(level.into()).from_env_lossy(),
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .with(filter)
        .try_init()?;
    Ok(())
}
