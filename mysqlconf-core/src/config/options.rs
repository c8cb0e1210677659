//! Driver option keys and option-string parsing.
//!
//! Option strings have the form `key1=value1&key2=value2`. Each segment is
//! trimmed and must split on `=` into exactly two parts.

use crate::error::MysqlConfError;
use crate::Result;

/// Option-key controlling how zero dates are returned by the driver.
pub const ZERO_DATE_TIME_BEHAVIOR: &str = "zeroDateTimeBehavior";

/// Default value for [`ZERO_DATE_TIME_BEHAVIOR`].
pub const CONVERT_TO_NULL: &str = "convertToNull";

/// Option-key for the socket connect timeout, in milliseconds.
pub const CONNECT_TIMEOUT: &str = "connectTimeout";

/// Option-key enabling TLS.
pub const USE_SSL: &str = "useSSL";

/// Option-key making TLS mandatory.
pub const REQUIRE_SSL: &str = "requireSSL";

/// Option-key enabling server certificate verification.
pub const VERIFY_SERVER_CERTIFICATE: &str = "verifyServerCertificate";

/// Splits one segment into a key/value pair.
///
/// Trailing empty parts are discarded before counting, so the segment must
/// leave exactly two parts: `a=1` and `=1` are accepted, while `bad`, `k=`
/// and `c=3=4` are rejected.
fn split_pair(segment: &str) -> Option<(&str, &str)> {
    let mut parts: Vec<&str> = segment.trim().split('=').collect();
    while parts.last().is_some_and(|part| part.is_empty()) {
        parts.pop();
    }
    match parts.as_slice() {
        [key, value] => Some((*key, *value)),
        _ => None,
    }
}

/// Parses an option string, silently dropping malformed segments.
pub(crate) fn parse_lenient(options: &str) -> Vec<(String, String)> {
    options
        .split('&')
        .filter_map(|segment| match split_pair(segment) {
            Some((key, value)) => Some((key.to_string(), value.to_string())),
            None => {
                let key = segment.trim().split('=').next().unwrap_or_default();
                tracing::debug!(key, "Dropping malformed driver option segment");
                None
            }
        })
        .collect()
}

/// Parses an option string, rejecting the first malformed segment.
///
/// Empty segments (as produced by a trailing `&`) are skipped.
///
/// # Errors
/// Returns `MalformedOption` naming the first segment that is not a single
/// `key=value` pair
pub(crate) fn parse_strict(options: &str) -> Result<Vec<(String, String)>> {
    options
        .split('&')
        .filter(|segment| !segment.trim().is_empty())
        .map(|segment| {
            split_pair(segment)
                .map(|(key, value)| (key.to_string(), value.to_string()))
                .ok_or_else(|| MysqlConfError::malformed_option(segment.trim()))
        })
        .collect()
}
