//! Subcommands of the blob archiver.

mod archiver;
pub use archiver::ArchiverCommand;

mod api;
pub use api::ApiCommand;
