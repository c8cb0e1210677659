//! Connection configuration for MySQL clients.
//!
//! This crate models the parameters of a MySQL connection target (host,
//! port, database, credentials, TLS posture and free-form driver options)
//! and renders them into a single `jdbc:mysql://` connection URI that a
//! driver can consume.
//!
//! # TLS resolution
//! The schema TLS mode takes precedence over the general one. Any mode other
//! than `DISABLED` is translated into the `useSSL`, `requireSSL` and
//! `verifyServerCertificate` driver options before the URI is serialized.
//!
//! # Security Guarantees
//! - Passwords are stored in `Zeroizing` containers and never serialized
//! - Rendered URIs are redacted before they reach the logs
//! - No network access: this crate only produces strings

pub mod config;
pub mod error;

// Re-export commonly used types
pub use config::{ConnectionConfig, DEFAULT_CONNECT_TIMEOUT_MS, SslMode};
pub use error::{MysqlConfError, Result, redact_connection_uri};
