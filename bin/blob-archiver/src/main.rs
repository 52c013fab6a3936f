//! Archives beacon chain blob sidecars and serves them over the beacon API.
//!
//! ## Usage
//!
//! ```sh
//! kona-blob-archiver archiver --l1-beacon http://localhost:5052 --origin-block 0x... \
//!     --storage.type file --storage.file-path ./blobs
//! kona-blob-archiver api --l1-beacon http://localhost:5052 \
//!     --storage.type file --storage.file-path ./blobs
//! ```

#![warn(unused_crate_dependencies)]

use clap::Parser;

pub mod cli;
pub mod commands;
pub mod flags;

fn main() {
    kona_cli::backtrace::enable();

    if let Err(err) = cli::Cli::parse().run() {
        eprintln!("Error: {err:?}");
        std::process::exit(1);
    }
}
