//! # kona-archiver
//!
//! Archives the blob sidecars of beacon blocks before beacon nodes prune them.
//!
//! The [`ArchiverService`] seeds itself from the current head and then runs two traversals that
//! walk parent links backwards:
//!
//! - **backfill** starts at the seed and walks towards the configured origin block, retrying the
//!   same block forever on failure.
//! - **live tracking** starts at `head` on every poll tick and walks back until it reaches a block
//!   that is already stored. A failure ends the current tick.
//!
//! Both traversals share one storage backend and never talk to each other. The existence check in
//! front of every write is the only coordination between them, which is sound because writes are
//! idempotent whole-record overwrites.

#![cfg_attr(not(test), warn(unused_crate_dependencies))]

#[macro_use]
extern crate tracing;

mod config;
pub use config::ArchiverConfig;

mod errors;
pub use errors::{ArchiverError, ArchiverResult};

mod metrics;
pub use metrics::{BlockSource, Metrics};

mod service;
pub use service::{ArchiverService, PersistedBlock};
