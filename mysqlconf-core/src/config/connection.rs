//! MySQL connection configuration.
//!
//! This module provides the `ConnectionConfig` struct, which holds the
//! parameters of one connection target and renders them into a
//! `jdbc:mysql://` connection URI.
//!
//! Driver options live in a single ordered map. The typed TLS setters and the
//! option-string parser both write through to it, so the map is the only
//! source of truth for what ends up in the query string.

use super::options::{self, CONNECT_TIMEOUT, CONVERT_TO_NULL, ZERO_DATE_TIME_BEHAVIOR};
use super::SslMode;
use crate::error::{MysqlConfError, redact_connection_uri};
use crate::Result;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::hash::{Hash, Hasher};
use std::net::Ipv6Addr;
use url::Url;
use zeroize::Zeroizing;

/// Default socket connect timeout in milliseconds.
pub const DEFAULT_CONNECT_TIMEOUT_MS: u32 = 5000;

const URI_SCHEME_PREFIX: &str = "jdbc:";
const URI_BASE: &str = "mysql://localhost";

/// Configuration for a single MySQL connection target.
///
/// # Security
/// The password is held in a `Zeroizing` container, is never serialized, and
/// is masked in `Debug` output. `Display` omits credentials entirely.
///
/// # Example
/// ```rust
/// use mysqlconf_core::{ConnectionConfig, SslMode};
///
/// let mut config = ConnectionConfig::new()
///     .with_host("db1")
///     .with_port(3306)
///     .with_database("orders")
///     .with_ssl_mode(SslMode::Required);
///
/// let uri = config.build_connection_uri(false)?;
/// assert!(uri.starts_with("jdbc:mysql://db1:3306?"));
/// assert!(uri.contains("requireSSL=true"));
/// # Ok::<(), mysqlconf_core::MysqlConfError>(())
/// ```
#[derive(Clone, Serialize, Deserialize)]
#[serde(from = "ConnectionConfigDocument")]
pub struct ConnectionConfig {
    /// Server address; must be set before a URI can be rendered
    pub host: Option<String>,
    /// TCP port; `None` defers to the driver default
    pub port: Option<u16>,
    /// Default database to select on connect
    pub database: Option<String>,
    /// Login user
    pub user: Option<String>,
    /// Login password (never serialized)
    #[serde(skip_serializing)]
    pub password: Option<Zeroizing<String>>,
    /// General TLS policy
    pub ssl_mode: Option<SslMode>,
    /// TLS policy for replication connections; not used when rendering URIs
    pub replication_ssl_mode: Option<SslMode>,
    /// TLS policy for schema connections; overrides `ssl_mode` when set
    pub schema_ssl_mode: Option<SslMode>,
    jdbc_options: BTreeMap<String, String>,
    connect_timeout_ms: u32,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        let mut jdbc_options = BTreeMap::new();
        jdbc_options.insert(
            ZERO_DATE_TIME_BEHAVIOR.to_string(),
            CONVERT_TO_NULL.to_string(),
        );
        jdbc_options.insert(
            CONNECT_TIMEOUT.to_string(),
            DEFAULT_CONNECT_TIMEOUT_MS.to_string(),
        );

        Self {
            host: None,
            port: None,
            database: None,
            user: None,
            password: None,
            ssl_mode: None,
            replication_ssl_mode: None,
            schema_ssl_mode: None,
            jdbc_options,
            connect_timeout_ms: DEFAULT_CONNECT_TIMEOUT_MS,
        }
    }
}

impl ConnectionConfig {
    /// Creates a config seeded with the default driver options
    /// (`zeroDateTimeBehavior=convertToNull` and `connectTimeout=5000`).
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a config from explicit parameters.
    ///
    /// Unlike [`ConnectionConfig::new`], the option map starts empty: neither
    /// `zeroDateTimeBehavior` nor `connectTimeout` is seeded. The timeout
    /// field still reports the default.
    #[allow(clippy::too_many_arguments)]
    pub fn with_params(
        host: Option<String>,
        port: Option<u16>,
        database: Option<String>,
        user: Option<String>,
        password: Option<String>,
        ssl_mode: Option<SslMode>,
        replication_ssl_mode: Option<SslMode>,
        schema_ssl_mode: Option<SslMode>,
    ) -> Self {
        Self {
            host,
            port,
            database,
            user,
            password: password.map(Zeroizing::new),
            ssl_mode,
            replication_ssl_mode,
            schema_ssl_mode,
            jdbc_options: BTreeMap::new(),
            connect_timeout_ms: DEFAULT_CONNECT_TIMEOUT_MS,
        }
    }

    /// Builder method to set host.
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    /// Builder method to set port.
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Builder method to set database.
    pub fn with_database(mut self, database: impl Into<String>) -> Self {
        self.database = Some(database.into());
        self
    }

    /// Builder method to set user.
    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self
    }

    /// Builder method to set password.
    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(Zeroizing::new(password.into()));
        self
    }

    /// Builder method to set the general TLS mode.
    pub fn with_ssl_mode(mut self, mode: SslMode) -> Self {
        self.ssl_mode = Some(mode);
        self
    }

    /// Builder method to set the replication TLS mode.
    pub fn with_replication_ssl_mode(mut self, mode: SslMode) -> Self {
        self.replication_ssl_mode = Some(mode);
        self
    }

    /// Builder method to set the schema TLS mode.
    pub fn with_schema_ssl_mode(mut self, mode: SslMode) -> Self {
        self.schema_ssl_mode = Some(mode);
        self
    }

    /// Returns the password, if one is set.
    pub fn password(&self) -> Option<&str> {
        self.password.as_deref().map(String::as_str)
    }

    /// Checks if password is present without exposing it.
    pub fn has_password(&self) -> bool {
        self.password.is_some()
    }

    /// Connect timeout in milliseconds.
    pub fn connect_timeout_ms(&self) -> u32 {
        self.connect_timeout_ms
    }

    /// Sets the connect timeout and writes it through to the `connectTimeout` option.
    pub fn set_connect_timeout_ms(&mut self, timeout_ms: u32) {
        self.connect_timeout_ms = timeout_ms;
        self.set_option(CONNECT_TIMEOUT, timeout_ms.to_string());
    }

    /// All driver options, ordered by key.
    pub fn jdbc_options(&self) -> &BTreeMap<String, String> {
        &self.jdbc_options
    }

    /// Looks up a single driver option.
    pub fn option(&self, key: &str) -> Option<&str> {
        self.jdbc_options.get(key).map(String::as_str)
    }

    /// Sets a driver option, replacing any previous value for the key.
    pub fn set_option(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.jdbc_options.insert(key.into(), value.into());
    }

    /// Removes a driver option, returning its previous value.
    pub fn remove_option(&mut self, key: &str) -> Option<String> {
        self.jdbc_options.remove(key)
    }

    /// Sets `useSSL`.
    pub fn set_use_ssl(&mut self, should: bool) {
        self.set_option(options::USE_SSL, should.to_string());
    }

    /// Sets `requireSSL`.
    pub fn set_require_ssl(&mut self, should: bool) {
        self.set_option(options::REQUIRE_SSL, should.to_string());
    }

    /// Sets `verifyServerCertificate`.
    pub fn set_verify_server_certificate(&mut self, should: bool) {
        self.set_option(options::VERIFY_SERVER_CERTIFICATE, should.to_string());
    }

    /// Merges an `&`-delimited `key=value` option string into the driver options.
    ///
    /// `None` is a no-op. Segments that do not split into exactly one key and
    /// one value are dropped without error; accepted pairs overwrite existing
    /// keys.
    pub fn parse_option_string(&mut self, options: Option<&str>) {
        let Some(options) = options else {
            return;
        };
        self.jdbc_options.extend(options::parse_lenient(options));
    }

    /// Like [`ConnectionConfig::parse_option_string`], but fails on the first
    /// malformed segment.
    ///
    /// The whole string is validated before anything is applied, so on error
    /// the driver options are unchanged.
    ///
    /// # Errors
    /// Returns `MalformedOption` naming the offending segment
    pub fn parse_option_string_strict(&mut self, options: &str) -> Result<()> {
        let pairs = options::parse_strict(options)?;
        self.jdbc_options.extend(pairs);
        Ok(())
    }

    /// The TLS mode used for URI rendering: the schema mode if set, otherwise
    /// the general mode.
    pub fn effective_ssl_mode(&self) -> Option<SslMode> {
        self.schema_ssl_mode.or(self.ssl_mode)
    }

    /// Translates the effective TLS mode into `useSSL`, `requireSSL` and
    /// `verifyServerCertificate` options.
    ///
    /// When no mode is set, or the mode is `Disabled`, existing TLS options
    /// are left exactly as they are. Calling this more than once has no
    /// further effect.
    pub fn resolve_tls(&mut self) {
        let Some(mode) = self.effective_ssl_mode().filter(|mode| mode.uses_tls()) else {
            return;
        };

        self.set_use_ssl(true);
        self.set_verify_server_certificate(false);
        self.set_require_ssl(false);

        if mode.requires_tls() {
            self.set_require_ssl(true);
        }

        if mode.verifies_identity() {
            self.set_verify_server_certificate(true);
        }

        tracing::debug!(ssl_mode = %mode, "Resolved TLS driver options");
    }

    /// Serializes the config into a connection URI without touching TLS
    /// options.
    ///
    /// The path is `/<database>` only when a database is set and
    /// `include_database` is true. Every driver option becomes a query
    /// parameter, in key order.
    ///
    /// # Errors
    /// Returns `UriFormat` if the host is unset or empty, or if the host or
    /// port cannot be placed in a valid URI
    pub fn to_uri(&self, include_database: bool) -> Result<String> {
        let host = self
            .host
            .as_deref()
            .filter(|host| !host.is_empty())
            .ok_or_else(|| MysqlConfError::uri_format("host is not set", None))?;

        let mut url = Url::parse(URI_BASE)
            .map_err(|e| MysqlConfError::uri_format("invalid base URI", Some(e)))?;

        // bare IPv6 literals need brackets in a URI authority
        let authority_host = if host.parse::<Ipv6Addr>().is_ok() {
            Cow::Owned(format!("[{host}]"))
        } else {
            Cow::Borrowed(host)
        };

        url.set_host(Some(&authority_host))
            .map_err(|e| MysqlConfError::uri_format(format!("invalid host '{host}'"), Some(e)))?;

        url.set_port(self.port).map_err(|()| {
            MysqlConfError::uri_format(format!("port cannot be set for host '{host}'"), None)
        })?;

        if include_database && let Some(database) = &self.database {
            url.set_path(&format!("/{database}"));
        }

        if !self.jdbc_options.is_empty() {
            url.query_pairs_mut().extend_pairs(&self.jdbc_options);
        }

        Ok(format!("{URI_SCHEME_PREFIX}{url}"))
    }

    /// Resolves TLS options and renders the connection URI.
    ///
    /// # Errors
    /// Returns `UriFormat` if the URI cannot be assembled
    pub fn build_connection_uri(&mut self, include_database: bool) -> Result<String> {
        self.resolve_tls();
        let uri = self.to_uri(include_database)?;
        tracing::trace!(uri = %redact_connection_uri(&uri), "Rendered connection URI");
        Ok(uri)
    }

    /// Renders the connection URI including the database path.
    ///
    /// # Errors
    /// Returns `UriFormat` if the URI cannot be assembled
    pub fn connection_uri(&mut self) -> Result<String> {
        self.build_connection_uri(true)
    }

    /// Validates connection configuration parameters.
    ///
    /// # Errors
    /// Returns error if the host is missing or values are out of range
    pub fn validate(&self) -> Result<()> {
        match self.host.as_deref() {
            None => return Err(MysqlConfError::configuration("host must be set")),
            Some("") => return Err(MysqlConfError::configuration("host cannot be empty")),
            Some(_) => {}
        }

        if self.port == Some(0) {
            return Err(MysqlConfError::configuration("port must be greater than 0"));
        }

        if self.connect_timeout_ms == 0 {
            return Err(MysqlConfError::configuration(
                "connect_timeout_ms must be greater than 0",
            ));
        }

        Ok(())
    }

    /// Loads a config from a JSON document.
    ///
    /// Missing fields take their defaults. When the document carries
    /// `jdbc_options`, that map replaces the default options entirely;
    /// otherwise the defaults are seeded and `connect_timeout_ms` is written
    /// through to `connectTimeout`.
    ///
    /// # Errors
    /// Returns `Serialization` if the document is not a valid config
    pub fn from_json(document: &str) -> Result<Self> {
        serde_json::from_str(document).map_err(|e| MysqlConfError::Serialization {
            context: "Failed to parse connection config".to_string(),
            source: e,
        })
    }

    /// Serializes the config to pretty-printed JSON, without the password.
    ///
    /// # Errors
    /// Returns `Serialization` if encoding fails
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| MysqlConfError::Serialization {
            context: "Failed to serialize connection config".to_string(),
            source: e,
        })
    }
}

impl PartialEq for ConnectionConfig {
    fn eq(&self, other: &Self) -> bool {
        self.host == other.host
            && self.port == other.port
            && self.database == other.database
            && self.user == other.user
            && self.password() == other.password()
            && self.ssl_mode == other.ssl_mode
            && self.replication_ssl_mode == other.replication_ssl_mode
            && self.schema_ssl_mode == other.schema_ssl_mode
            && self.jdbc_options == other.jdbc_options
            && self.connect_timeout_ms == other.connect_timeout_ms
    }
}

impl Eq for ConnectionConfig {}

impl Hash for ConnectionConfig {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.host.hash(state);
        self.port.hash(state);
        self.database.hash(state);
        self.user.hash(state);
        self.password().hash(state);
        self.ssl_mode.hash(state);
        self.replication_ssl_mode.hash(state);
        self.schema_ssl_mode.hash(state);
        self.jdbc_options.hash(state);
        self.connect_timeout_ms.hash(state);
    }
}

impl std::fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "****"))
            .field("ssl_mode", &self.ssl_mode)
            .field("replication_ssl_mode", &self.replication_ssl_mode)
            .field("schema_ssl_mode", &self.schema_ssl_mode)
            .field("jdbc_options", &self.jdbc_options)
            .field("connect_timeout_ms", &self.connect_timeout_ms)
            .finish()
    }
}

impl std::fmt::Display for ConnectionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "ConnectionConfig({}{}{})",
            self.host.as_deref().unwrap_or("<unset>"),
            self.port.map_or_else(String::new, |p| format!(":{p}")),
            self.database
                .as_ref()
                .map_or_else(String::new, |db| format!("/{db}"))
        )
        // Intentionally omit user and never include credentials
    }
}

/// On-disk shape of a config; every field is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ConnectionConfigDocument {
    host: Option<String>,
    port: Option<u16>,
    database: Option<String>,
    user: Option<String>,
    ssl_mode: Option<SslMode>,
    replication_ssl_mode: Option<SslMode>,
    schema_ssl_mode: Option<SslMode>,
    jdbc_options: Option<BTreeMap<String, String>>,
    connect_timeout_ms: Option<u32>,
}

impl From<ConnectionConfigDocument> for ConnectionConfig {
    fn from(document: ConnectionConfigDocument) -> Self {
        let mut config = Self {
            host: document.host,
            port: document.port,
            database: document.database,
            user: document.user,
            ssl_mode: document.ssl_mode,
            replication_ssl_mode: document.replication_ssl_mode,
            schema_ssl_mode: document.schema_ssl_mode,
            ..Self::default()
        };

        match document.jdbc_options {
            Some(jdbc_options) => {
                config.jdbc_options = jdbc_options;
                if let Some(timeout_ms) = document.connect_timeout_ms {
                    config.connect_timeout_ms = timeout_ms;
                }
            }
            None => {
                if let Some(timeout_ms) = document.connect_timeout_ms {
                    config.set_connect_timeout_ms(timeout_ms);
                }
            }
        }

        config
    }
}
