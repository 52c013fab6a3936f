//! # kona-archive-api
//!
//! Serves archived blob sidecars over the beacon API route
//! `GET /eth/v1/beacon/blob_sidecars/{block_id}`, so consumers can point an ordinary beacon client
//! at the archive once beacon nodes have pruned the blobs they need.
//!
//! Responses are JSON by default and SSZ when the request accepts `application/octet-stream`.

#![cfg_attr(not(test), warn(unused_crate_dependencies))]

#[macro_use]
extern crate tracing;

mod config;
pub use config::ApiConfig;

mod errors;
pub use errors::{ApiError, ErrorResponse};

mod handlers;
pub use handlers::{BLOB_SIDECARS_ROUTE, HEALTHZ_ROUTE, OCTET_STREAM};

mod metrics;
pub use metrics::Metrics;

mod server;
pub use server::{ApiServer, ApiState, router};
