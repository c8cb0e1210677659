//! TLS posture for MySQL connections.

use serde::{Deserialize, Serialize};

/// SSL/TLS connection mode, using the MySQL driver's mode names.
///
/// Controls whether TLS is negotiated and how much of the server's
/// certificate is verified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SslMode {
    /// No TLS (plaintext connection)
    Disabled,
    /// TLS when the server offers it, no verification
    Preferred,
    /// TLS required, server certificate is not verified
    Required,
    /// TLS required, server certificate must be signed by a trusted CA
    VerifyCa,
    /// TLS required, trusted CA and matching server identity
    VerifyIdentity,
}

impl SslMode {
    /// Whether any TLS is negotiated in this mode
    pub fn uses_tls(self) -> bool {
        self != Self::Disabled
    }

    /// Whether the connection must fail when TLS cannot be negotiated
    pub fn requires_tls(self) -> bool {
        matches!(self, Self::Required | Self::VerifyCa | Self::VerifyIdentity)
    }

    /// Whether the server certificate is checked against the host identity
    pub fn verifies_identity(self) -> bool {
        self == Self::VerifyIdentity
    }
}

impl std::fmt::Display for SslMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Disabled => write!(f, "DISABLED"),
            Self::Preferred => write!(f, "PREFERRED"),
            Self::Required => write!(f, "REQUIRED"),
            Self::VerifyCa => write!(f, "VERIFY_CA"),
            Self::VerifyIdentity => write!(f, "VERIFY_IDENTITY"),
        }
    }
}

impl std::str::FromStr for SslMode {
    type Err = crate::error::MysqlConfError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().replace('-', "_").as_str() {
            "DISABLED" => Ok(Self::Disabled),
            "PREFERRED" => Ok(Self::Preferred),
            "REQUIRED" => Ok(Self::Required),
            "VERIFY_CA" => Ok(Self::VerifyCa),
            "VERIFY_IDENTITY" => Ok(Self::VerifyIdentity),
            _ => Err(crate::error::MysqlConfError::configuration(format!(
                "invalid ssl mode '{s}': expected DISABLED, PREFERRED, REQUIRED, VERIFY_CA, or VERIFY_IDENTITY"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_driver_names() {
        assert_eq!("DISABLED".parse::<SslMode>().unwrap(), SslMode::Disabled);
        assert_eq!("PREFERRED".parse::<SslMode>().unwrap(), SslMode::Preferred);
        assert_eq!("REQUIRED".parse::<SslMode>().unwrap(), SslMode::Required);
        assert_eq!("VERIFY_CA".parse::<SslMode>().unwrap(), SslMode::VerifyCa);
        assert_eq!(
            "VERIFY_IDENTITY".parse::<SslMode>().unwrap(),
            SslMode::VerifyIdentity
        );
    }

    #[test]
    fn test_parse_is_lenient_about_case_and_dashes() {
        assert_eq!("verify-ca".parse::<SslMode>().unwrap(), SslMode::VerifyCa);
        assert_eq!(" required ".parse::<SslMode>().unwrap(), SslMode::Required);
    }

    #[test]
    fn test_parse_invalid_mode() {
        let err = "bogus".parse::<SslMode>().unwrap_err();
        assert!(err.to_string().contains("bogus"));
    }

    #[test]
    fn test_display_matches_parse() {
        for mode in [
            SslMode::Disabled,
            SslMode::Preferred,
            SslMode::Required,
            SslMode::VerifyCa,
            SslMode::VerifyIdentity,
        ] {
            assert_eq!(mode.to_string().parse::<SslMode>().unwrap(), mode);
        }
    }

    #[test]
    fn test_mode_predicates() {
        assert!(!SslMode::Disabled.uses_tls());
        assert!(SslMode::Preferred.uses_tls());
        assert!(!SslMode::Preferred.requires_tls());
        assert!(SslMode::VerifyCa.requires_tls());
        assert!(!SslMode::VerifyCa.verifies_identity());
        assert!(SslMode::VerifyIdentity.verifies_identity());
    }

    #[test]
    fn test_serde_uses_driver_names() {
        let json = serde_json::to_string(&SslMode::VerifyIdentity).unwrap();
        assert_eq!(json, "\"VERIFY_IDENTITY\"");

        let mode: SslMode = serde_json::from_str("\"VERIFY_CA\"").unwrap();
        assert_eq!(mode, SslMode::VerifyCa);
    }
}
