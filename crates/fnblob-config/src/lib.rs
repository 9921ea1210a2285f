//! fnblob Config
//!
//! This crate contains the serializable configuration types for fnblob.
//! They describe where a function's source blobs and results live and which
//! credential source the storage client should be built with.
//!
//! Configuration can be loaded from:
//! - JSON files (via the CLI with `--config=config.json`)
//! - Any serde source embedding [`StorageConfig`]
//!
//! The client crate turns these types into a live storage client; nothing here
//! touches the network.

mod connection;
mod error;
mod storage;

pub use connection::ConnectionString;
pub use error::ConfigError;
pub use storage::{CredentialSource, StorageConfig};
