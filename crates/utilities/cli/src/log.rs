//! Logging arguments.

use clap::{ArgAction, Args};

/// Logging arguments.
#[derive(Args, Debug, Default, Clone, PartialEq, Eq)]
pub struct LogArgs {
    /// Verbosity level. Repeat to increase (`-v` info, `-vv` debug, `-vvv` trace).
    #[arg(short = 'v', long = "verbosity", action = ArgAction::Count, global = true)]
    pub v: u8,
}

impl LogArgs {
    /// Installs the global tracing subscriber at the configured verbosity.
    pub fn init_tracing(&self) -> crate::CliResult<()> {
        crate::init_tracing_subscriber(self.v, None::<tracing_subscriber::EnvFilter>)
    }
}
