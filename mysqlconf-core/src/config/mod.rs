//! Connection configuration types.
//!
//! - `ConnectionConfig`: connection parameters, driver options and URI rendering
//! - `SslMode`: TLS posture shared by the general, schema and replication paths
//! - `options`: well-known driver option keys
//!
//! # Security
//! Passwords are kept in zeroizing storage and are never serialized, logged,
//! or shown in `Debug`/`Display` output.

mod connection;
pub mod options;
mod ssl_mode;

pub use connection::{ConnectionConfig, DEFAULT_CONNECT_TIMEOUT_MS};
pub use ssl_mode::SslMode;
