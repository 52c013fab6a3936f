//! CLI flags.

mod globals;
pub use globals::GlobalArgs;

mod beacon;
pub use beacon::BeaconArgs;

mod storage;
pub use storage::{S3CredentialType, StorageArgs, StorageType};
