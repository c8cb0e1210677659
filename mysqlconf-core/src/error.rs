//! Error types with credential sanitization.
//!
//! Error messages produced here never carry passwords. Rendered URIs that
//! are logged go through [`redact_connection_uri`] first, since driver options
//! parsed from an option string may contain secrets.

use thiserror::Error;

/// Query keys whose values are treated as secrets when a URI is redacted.
const SECRET_OPTION_KEYS: &[&str] = &[
    "password",
    "trustCertificateKeyStorePassword",
    "clientCertificateKeyStorePassword",
];

/// Main error type for connection configuration operations.
#[derive(Debug, Error)]
pub enum MysqlConfError {
    /// The configured components cannot be assembled into a valid URI
    #[error("Invalid connection URI: {context}")]
    UriFormat {
        context: String,
        #[source]
        source: Option<url::ParseError>,
    },

    /// Configuration or validation error
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// An option-string segment is not a single `key=value` pair
    #[error("Malformed driver option: '{segment}' is not a key=value pair")]
    MalformedOption { segment: String },

    /// Serialization or deserialization failed
    #[error("Serialization failed: {context}")]
    Serialization {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Convenience type alias for Results with `MysqlConfError`
pub type Result<T> = std::result::Result<T, MysqlConfError>;

impl MysqlConfError {
    /// Creates a URI format error, optionally carrying the parser failure
    pub fn uri_format(context: impl Into<String>, source: Option<url::ParseError>) -> Self {
        Self::UriFormat {
            context: context.into(),
            source,
        }
    }

    /// Creates a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Creates a malformed option error for the offending segment
    pub fn malformed_option(segment: impl Into<String>) -> Self {
        Self::MalformedOption {
            segment: segment.into(),
        }
    }
}

/// Safely redacts a connection URI for logging and error messages.
///
/// Masks the userinfo password (if any) and the values of credential-bearing
/// query parameters. Accepts both plain `mysql://` URIs and the `jdbc:`
/// prefixed form rendered by [`crate::ConnectionConfig`].
///
/// # Example
///
/// ```rust
/// use mysqlconf_core::error::redact_connection_uri;
///
/// let sanitized = redact_connection_uri("jdbc:mysql://db1:3306/app?user=ro&password=hunter2");
/// assert_eq!(sanitized, "jdbc:mysql://db1:3306/app?user=ro&password=****");
/// assert!(!sanitized.contains("hunter2"));
/// ```
pub fn redact_connection_uri(uri: &str) -> String {
    let (prefix, rest) = match uri.strip_prefix("jdbc:") {
        Some(rest) => ("jdbc:", rest),
        None => ("", uri),
    };

    let Ok(mut parsed) = url::Url::parse(rest) else {
        return "<redacted>".to_string();
    };

    if parsed.password().is_some() {
        // cannot fail: the URI already carries a password
        let _ = parsed.set_password(Some("****"));
    }

    let has_secret = parsed
        .query_pairs()
        .any(|(key, _)| SECRET_OPTION_KEYS.contains(&key.as_ref()));
    if has_secret {
        let pairs: Vec<(String, String)> = parsed
            .query_pairs()
            .map(|(key, value)| {
                if SECRET_OPTION_KEYS.contains(&key.as_ref()) {
                    (key.into_owned(), "****".to_string())
                } else {
                    (key.into_owned(), value.into_owned())
                }
            })
            .collect();
        parsed.query_pairs_mut().clear().extend_pairs(pairs);
    }

    format!("{prefix}{parsed}")
}
